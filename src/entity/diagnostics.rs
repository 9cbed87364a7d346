use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diagnostics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub imei: String,
    pub record_time: DateTime,
    /// `D` marks a normal reading; any other non-null icon flags an anomaly.
    pub status_icon: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub gsm_signal: Option<i32>,
    pub satellites: Option<i32>,
    pub ignition: Option<bool>,
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
