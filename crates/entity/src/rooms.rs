//! Rooms Entity
//!
//! A grouping context inside an organization. Data fields are made visible
//! in a room through `data_field_rooms` assignments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         Uuid,
    pub org_id:     Uuid,
    pub name:       String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrgId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(has_many = "super::data_field_rooms::Entity")]
    DataFieldAssignments,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl Related<super::data_field_rooms::Entity> for Entity {
    fn to() -> RelationDef { Relation::DataFieldAssignments.def() }
}

impl Related<super::data_fields::Entity> for Entity {
    fn to() -> RelationDef { super::data_field_rooms::Relation::DataField.def() }

    fn via() -> Option<RelationDef> { Some(super::data_field_rooms::Relation::Room.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
