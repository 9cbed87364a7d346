//! # Module Repository
//!
//! Tracking modules keyed by IMEI. Two update paths are kept
//! distinct:
//!
//! * [`ModuleRepository::replace`] (PUT) writes the whole editable surface,
//!   nulling every field the caller left out.
//! * [`ModuleRepository::patch`] (PATCH) writes only the fields present in a
//!   [`ModulePatch`].
//!
//! A referenced client is checked inside the same transaction as the write.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::patch::{patch_value, present};
use crate::entity::{clients, modules};
use crate::error::{AppError, AppResult};
use crate::repositories::client::ensure_client;

/// Module joined with the name of its client (null when unassigned or the
/// client no longer exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct ModuleWithClient {
    pub imei: String,
    pub model: Option<String>,
    pub client_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub sim_number: Option<String>,
    pub validated_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub status: Option<String>,
    pub client_name: Option<String>,
}

/// Full editable surface of a module.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ModuleFields {
    pub model: Option<String>,
    pub client_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub sim_number: Option<String>,
    pub validated_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ModuleFields {
    fn into_active_model(self) -> modules::ActiveModel {
        modules::ActiveModel {
            imei: NotSet,
            model: Set(self.model),
            client_id: Set(self.client_id),
            vehicle_name: Set(self.vehicle_name),
            sim_number: Set(self.sim_number),
            validated_on: Set(self.validated_on),
            expires_on: Set(self.expires_on),
            status: Set(self.status),
        }
    }
}

/// Partial update. Each field is absent (untouched), `null` (cleared) or a
/// new value. Keys outside this set are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ModulePatch {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub client_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub vehicle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub sim_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<NaiveDate>)]
    pub validated_on: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<NaiveDate>)]
    pub expires_on: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,
}

impl ModulePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.client_id.is_none()
            && self.vehicle_name.is_none()
            && self.sim_number.is_none()
            && self.validated_on.is_none()
            && self.expires_on.is_none()
            && self.status.is_none()
    }

    fn into_active_model(self) -> modules::ActiveModel {
        modules::ActiveModel {
            imei: NotSet,
            model: patch_value(self.model),
            client_id: patch_value(self.client_id),
            vehicle_name: patch_value(self.vehicle_name),
            sim_number: patch_value(self.sim_number),
            validated_on: patch_value(self.validated_on),
            expires_on: patch_value(self.expires_on),
            status: patch_value(self.status),
        }
    }
}

/// Repository for module database operations
pub struct ModuleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModuleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<ModuleWithClient>> {
        let rows = with_client_name()
            .order_by_asc(modules::Column::Imei)
            .into_model::<ModuleWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, imei: &str) -> AppResult<ModuleWithClient> {
        find_with_client(self.db, imei)
            .await?
            .ok_or_else(module_not_found)
    }

    /// Insert a module. A supplied `client_id` must reference an existing
    /// client, otherwise nothing is written.
    pub async fn create(&self, imei: String, fields: ModuleFields) -> AppResult<modules::Model> {
        let txn = self.db.begin().await?;

        if let Some(client_id) = fields.client_id.as_deref() {
            ensure_client(&txn, client_id).await?;
        }

        let mut active = fields.into_active_model();
        active.imei = Set(imei);
        let module = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(module)
    }

    /// Full replace (PUT).
    pub async fn replace(&self, imei: &str, fields: ModuleFields) -> AppResult<modules::Model> {
        let txn = self.db.begin().await?;

        if let Some(client_id) = fields.client_id.as_deref() {
            ensure_client(&txn, client_id).await?;
        }

        let written = fields.clone();
        let result = modules::Entity::update_many()
            .set(fields.into_active_model())
            .filter(modules::Column::Imei.eq(imei))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(module_not_found());
        }
        txn.commit().await?;

        Ok(modules::Model {
            imei: imei.to_string(),
            model: written.model,
            client_id: written.client_id,
            vehicle_name: written.vehicle_name,
            sim_number: written.sim_number,
            validated_on: written.validated_on,
            expires_on: written.expires_on,
            status: written.status,
        })
    }

    /// Partial update (PATCH). Returns the row as stored afterwards.
    pub async fn patch(&self, imei: &str, patch: ModulePatch) -> AppResult<ModuleWithClient> {
        if patch.is_empty() {
            return Err(AppError::Validation("No valid fields to update".to_string()));
        }

        let txn = self.db.begin().await?;

        if let Some(Some(client_id)) = patch.client_id.as_ref() {
            ensure_client(&txn, client_id).await?;
        }

        let result = modules::Entity::update_many()
            .set(patch.into_active_model())
            .filter(modules::Column::Imei.eq(imei))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(module_not_found());
        }

        let updated = find_with_client(&txn, imei)
            .await?
            .ok_or_else(module_not_found)?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Detach the module from its client. Repeating it is harmless.
    pub async fn unassign(&self, imei: &str) -> AppResult<ModuleWithClient> {
        let result = modules::Entity::update_many()
            .col_expr(modules::Column::ClientId, Expr::value(Option::<String>::None))
            .filter(modules::Column::Imei.eq(imei))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(module_not_found());
        }

        self.get(imei).await
    }

    pub async fn delete(&self, imei: &str) -> AppResult<()> {
        let result = modules::Entity::delete_by_id(imei.to_string())
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(module_not_found());
        }
        Ok(())
    }
}

fn with_client_name() -> sea_orm::Select<modules::Entity> {
    modules::Entity::find()
        .column_as(clients::Column::Name, "client_name")
        .join(JoinType::LeftJoin, modules::Relation::Client.def())
}

async fn find_with_client<C: ConnectionTrait>(
    conn: &C,
    imei: &str,
) -> AppResult<Option<ModuleWithClient>> {
    Ok(with_client_name()
        .filter(modules::Column::Imei.eq(imei))
        .into_model::<ModuleWithClient>()
        .one(conn)
        .await?)
}

/// Existence check usable inside a transaction.
pub async fn module_exists<C: ConnectionTrait>(conn: &C, imei: &str) -> AppResult<bool> {
    Ok(modules::Entity::find_by_id(imei.to_string())
        .one(conn)
        .await?
        .is_some())
}

fn module_not_found() -> AppError {
    AppError::NotFound("Module not found".to_string())
}
