use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "anomalies")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modules::Entity",
        from = "Column::Imei",
        to = "super::modules::Column::Imei"
    )]
    Module,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
