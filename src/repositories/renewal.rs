//! # Renewal Repository
//!
//! Subscription renewal records. A renewal must point at an existing module
//! and an existing client; both are checked in the insert's transaction.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{clients, renewals};
use crate::error::{AppError, AppResult};
use crate::repositories::client::client_exists;
use crate::repositories::module::module_exists;

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct RenewalWithClient {
    pub id: i32,
    pub imei: String,
    pub client_id: String,
    pub validated_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewRenewal {
    pub imei: String,
    pub client_id: String,
    pub validated_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

/// Repository for renewal database operations
pub struct RenewalRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RenewalRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every renewal whose module and client both still exist, most recent
    /// validation first.
    pub async fn list(&self) -> AppResult<Vec<RenewalWithClient>> {
        let rows = with_client_name()
            .order_by_desc(renewals::Column::ValidatedOn)
            .into_model::<RenewalWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    pub async fn list_for_module(&self, imei: &str) -> AppResult<Vec<RenewalWithClient>> {
        let rows = with_client_name()
            .filter(renewals::Column::Imei.eq(imei))
            .order_by_desc(renewals::Column::ValidatedOn)
            .into_model::<RenewalWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Record a renewal. The module is checked before the client, so a
    /// request missing both reports the module.
    pub async fn create(&self, renewal: NewRenewal) -> AppResult<renewals::Model> {
        let txn = self.db.begin().await?;

        if !module_exists(&txn, &renewal.imei).await? {
            return Err(AppError::NotFound("Module not found".to_string()));
        }
        if !client_exists(&txn, &renewal.client_id).await? {
            return Err(AppError::NotFound("Client not found".to_string()));
        }

        let created = renewals::ActiveModel {
            imei: Set(renewal.imei),
            client_id: Set(renewal.client_id),
            validated_on: Set(renewal.validated_on),
            expires_on: Set(renewal.expires_on),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }
}

fn with_client_name() -> sea_orm::Select<renewals::Entity> {
    renewals::Entity::find()
        .column_as(clients::Column::Name, "client_name")
        .join(JoinType::InnerJoin, renewals::Relation::Module.def())
        .join(JoinType::InnerJoin, renewals::Relation::Client.def())
}
