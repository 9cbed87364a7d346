//! # Diagnostics Repository
//!
//! Periodic sensor readings reported by modules. Only modules assigned to an
//! existing client are visible.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::dates::day_bounds;
use crate::entity::{anomalies, clients, diagnostics, modules};
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct DiagnosticWithClient {
    pub id: i32,
    pub imei: String,
    pub record_time: NaiveDateTime,
    pub status_icon: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub gsm_signal: Option<i32>,
    pub satellites: Option<i32>,
    pub ignition: Option<bool>,
    pub client_name: Option<String>,
}

/// Repository for diagnostics queries
pub struct DiagnosticsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DiagnosticsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<DiagnosticWithClient>> {
        let rows = with_client_name()
            .order_by_desc(diagnostics::Column::RecordTime)
            .into_model::<DiagnosticWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    pub async fn latest_for_module(&self, imei: &str) -> AppResult<Option<DiagnosticWithClient>> {
        let row = with_client_name()
            .filter(diagnostics::Column::Imei.eq(imei))
            .order_by_desc(diagnostics::Column::RecordTime)
            .into_model::<DiagnosticWithClient>()
            .one(self.db)
            .await?;

        Ok(row)
    }

    /// Readings of one module recorded on `day`, in chronological order.
    pub async fn for_module_on(
        &self,
        imei: &str,
        day: NaiveDate,
    ) -> AppResult<Vec<DiagnosticWithClient>> {
        let (start, end) = day_bounds(day);
        let rows = with_client_name()
            .filter(diagnostics::Column::Imei.eq(imei))
            .filter(diagnostics::Column::RecordTime.gte(start))
            .filter(diagnostics::Column::RecordTime.lt(end))
            .order_by_asc(diagnostics::Column::RecordTime)
            .into_model::<DiagnosticWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Total rows in the `anomalies` table for the module, regardless of date.
    pub async fn total_alerts(&self, imei: &str) -> AppResult<u64> {
        let count = anomalies::Entity::find()
            .filter(anomalies::Column::Imei.eq(imei))
            .count(self.db)
            .await?;

        Ok(count)
    }
}

/// Diagnostics joined through their module to the owning client's name.
pub(crate) fn with_client_name() -> sea_orm::Select<diagnostics::Entity> {
    diagnostics::Entity::find()
        .column_as(clients::Column::Name, "client_name")
        .join(JoinType::InnerJoin, diagnostics::Relation::Module.def())
        .join(JoinType::InnerJoin, modules::Relation::Client.def())
}
