//! # Signal Repository
//!
//! Read-only view of "no signal" status records.

use chrono::NaiveDateTime;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::{clients, modules, signals};
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct SignalWithClient {
    pub id: i32,
    pub imei: String,
    pub no_signal_since: NaiveDateTime,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    pub status: Option<String>,
    pub client_name: Option<String>,
}

/// Repository for signal status queries
pub struct SignalRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SignalRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Signals of assigned modules, longest outage last.
    pub async fn list(&self) -> AppResult<Vec<SignalWithClient>> {
        let rows = with_client_name()
            .order_by_desc(signals::Column::NoSignalSince)
            .into_model::<SignalWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Most recent signal record of one module.
    pub async fn latest_for_module(&self, imei: &str) -> AppResult<Option<SignalWithClient>> {
        let row = with_client_name()
            .filter(signals::Column::Imei.eq(imei))
            .order_by_desc(signals::Column::NoSignalSince)
            .into_model::<SignalWithClient>()
            .one(self.db)
            .await?;

        Ok(row)
    }
}

fn with_client_name() -> sea_orm::Select<signals::Entity> {
    signals::Entity::find()
        .column_as(clients::Column::Name, "client_name")
        .join(JoinType::InnerJoin, signals::Relation::Module.def())
        .join(JoinType::InnerJoin, modules::Relation::Client.def())
}
