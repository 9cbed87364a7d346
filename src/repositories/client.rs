//! # Client Repository
//!
//! CRUD over `clients`. Ids are assigned by the caller. Updates replace the
//! whole editable surface: a field left out of the payload is written as null.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{clients, modules};
use crate::error::{AppError, AppResult};

/// Client row with the number of modules currently pointing at it.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct ClientSummary {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub fix_phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub max_history_days: Option<i32>,
    pub reports_enabled: Option<bool>,
    pub geofence_enabled: Option<bool>,
    pub max_zones: Option<i32>,
    pub tech_support: Option<bool>,
    pub modules_count: i64,
}

/// Editable client fields. Every field is written on create and update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ClientFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub fix_phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub max_history_days: Option<i32>,
    pub reports_enabled: Option<bool>,
    pub geofence_enabled: Option<bool>,
    pub max_zones: Option<i32>,
    pub tech_support: Option<bool>,
}

impl ClientFields {
    /// Every editable column `Set`, the key left alone.
    fn into_active_model(self) -> clients::ActiveModel {
        clients::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            email: Set(self.email),
            manager_name: Set(self.manager_name),
            manager_phone: Set(self.manager_phone),
            fix_phone: Set(self.fix_phone),
            address: Set(self.address),
            country: Set(self.country),
            status: Set(self.status),
            max_history_days: Set(self.max_history_days),
            reports_enabled: Set(self.reports_enabled),
            geofence_enabled: Set(self.geofence_enabled),
            max_zones: Set(self.max_zones),
            tech_support: Set(self.tech_support),
        }
    }
}

/// Repository for client database operations
pub struct ClientRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClientRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All clients, including those without modules (count 0).
    pub async fn list(&self) -> AppResult<Vec<ClientSummary>> {
        let rows = clients::Entity::find()
            .column_as(
                Expr::col((modules::Entity, modules::Column::Imei)).count(),
                "modules_count",
            )
            .join(JoinType::LeftJoin, clients::Relation::Modules.def())
            .group_by(clients::Column::Id)
            .order_by_asc(clients::Column::Id)
            .into_model::<ClientSummary>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: &str) -> AppResult<clients::Model> {
        clients::Entity::find_by_id(id.to_string())
            .one(self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }

    /// Insert with a caller-supplied id. A duplicate id surfaces as a
    /// database error.
    pub async fn create(&self, id: String, fields: ClientFields) -> AppResult<clients::Model> {
        let mut active = fields.into_active_model();
        active.id = Set(id);
        Ok(active.insert(self.db).await?)
    }

    /// Overwrite every editable field, nulling the ones not supplied.
    pub async fn replace(&self, id: &str, fields: ClientFields) -> AppResult<clients::Model> {
        let result = clients::Entity::update_many()
            .set(fields.into_active_model())
            .filter(clients::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Client not found".to_string()));
        }
        self.get(id).await
    }

    /// Hard delete. Modules of the client are left untouched.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = clients::Entity::delete_by_id(id.to_string())
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Client not found".to_string()));
        }
        Ok(())
    }
}

/// Existence check usable inside a transaction.
pub async fn client_exists<C: ConnectionTrait>(conn: &C, id: &str) -> AppResult<bool> {
    Ok(clients::Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .is_some())
}

/// Turn a missing client into the 404 callers expect.
pub async fn ensure_client<C: ConnectionTrait>(conn: &C, id: &str) -> AppResult<()> {
    if client_exists(conn, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Client not found".to_string()))
    }
}
