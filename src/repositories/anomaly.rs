//! # Anomaly Repository
//!
//! Two notions of "anomaly" coexist and are served separately:
//!
//! * rows of the dedicated `anomalies` table (list, date search), and
//! * diagnostics rows whose `status_icon` is set to anything but `D`
//!   (per-module lookup).
//!
//! They are not reconciled; each endpoint keeps its own definition.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::dates::day_bounds;
use crate::entity::{anomalies, clients, diagnostics, modules};
use crate::error::AppResult;
use crate::repositories::diagnostics::{self as diagnostics_repo, DiagnosticWithClient};

/// Status icon of a healthy diagnostics reading.
pub const NORMAL_STATUS_ICON: &str = "D";

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct AnomalyWithClient {
    pub id: i32,
    pub imei: String,
    pub anomaly_type: Option<String>,
    pub data_count: Option<i32>,
    pub vehicle_id: Option<String>,
    pub sim_number: Option<String>,
    pub mileage_km: Option<f64>,
    pub fuel_level: Option<f64>,
    pub consumption_rate: Option<f64>,
    pub alert_count: i32,
    pub created_at: NaiveDateTime,
    pub client_name: Option<String>,
}

/// Anomaly as returned by the date search, labelled with the vehicle name.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct AnomalyOnDate {
    pub id: i32,
    pub data_count: Option<i32>,
    pub anomaly_type: Option<String>,
    pub vehicle_id: Option<String>,
    pub imei: String,
    pub sim_number: Option<String>,
    pub mileage_km: Option<f64>,
    pub fuel_level: Option<f64>,
    pub consumption_rate: Option<f64>,
    pub alert_count: i32,
    pub created_at: NaiveDateTime,
    pub module_name: Option<String>,
}

/// Repository for anomaly queries
pub struct AnomalyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AnomalyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Worst offenders first.
    pub async fn list(&self) -> AppResult<Vec<AnomalyWithClient>> {
        let rows = anomalies::Entity::find()
            .column_as(clients::Column::Name, "client_name")
            .join(JoinType::InnerJoin, anomalies::Relation::Module.def())
            .join(JoinType::InnerJoin, modules::Relation::Client.def())
            .order_by_desc(anomalies::Column::AlertCount)
            .into_model::<AnomalyWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Anomalies of one module derived from its diagnostics, newest first.
    pub async fn derived_for_module(&self, imei: &str) -> AppResult<Vec<DiagnosticWithClient>> {
        let rows = diagnostics_repo::with_client_name()
            .filter(diagnostics::Column::Imei.eq(imei))
            .filter(diagnostics::Column::StatusIcon.is_not_null())
            .filter(diagnostics::Column::StatusIcon.ne(NORMAL_STATUS_ICON))
            .order_by_desc(diagnostics::Column::RecordTime)
            .into_model::<DiagnosticWithClient>()
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Rows of the `anomalies` table created on `day`, newest first. An empty
    /// result is not an error.
    pub async fn created_on(&self, day: NaiveDate) -> AppResult<Vec<AnomalyOnDate>> {
        let (start, end) = day_bounds(day);
        let rows = anomalies::Entity::find()
            .column_as(modules::Column::VehicleName, "module_name")
            .join(JoinType::InnerJoin, anomalies::Relation::Module.def())
            .filter(anomalies::Column::CreatedAt.gte(start))
            .filter(anomalies::Column::CreatedAt.lt(end))
            .order_by_desc(anomalies::Column::CreatedAt)
            .into_model::<AnomalyOnDate>()
            .all(self.db)
            .await?;

        Ok(rows)
    }
}
