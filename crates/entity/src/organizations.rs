//! Organizations Entity
//!
//! Tenant boundary for data fields and rooms. Managed elsewhere in the
//! application; mapped here so data fields can cascade on deletion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         Uuid,
    pub name:       String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::data_fields::Entity")]
    DataFields,
    #[sea_orm(has_many = "super::rooms::Entity")]
    Rooms,
}

impl Related<super::data_fields::Entity> for Entity {
    fn to() -> RelationDef { Relation::DataFields.def() }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef { Relation::Rooms.def() }
}

impl ActiveModelBehavior for ActiveModel {}
