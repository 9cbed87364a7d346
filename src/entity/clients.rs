use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::modules::Entity")]
    Modules,
    #[sea_orm(has_many = "super::renewals::Entity")]
    Renewals,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modules.def()
    }
}

impl Related<super::renewals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renewals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
