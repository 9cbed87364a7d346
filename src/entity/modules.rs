use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub imei: String,
    pub model: Option<String>,
    pub client_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub sim_number: Option<String>,
    pub validated_on: Option<Date>,
    pub expires_on: Option<Date>,
    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::diagnostics::Entity")]
    Diagnostics,
    #[sea_orm(has_many = "super::signals::Entity")]
    Signals,
    #[sea_orm(has_many = "super::anomalies::Entity")]
    Anomalies,
    #[sea_orm(has_many = "super::renewals::Entity")]
    Renewals,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::diagnostics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnostics.def()
    }
}

impl Related<super::signals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Signals.def()
    }
}

impl Related<super::anomalies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Anomalies.def()
    }
}

impl Related<super::renewals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renewals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
