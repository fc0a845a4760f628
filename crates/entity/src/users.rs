//! Users Entity
//!
//! Only the identity columns are mapped; a data field keeps a nullable
//! reference to the user that created it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         Uuid,
    pub email:      String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::data_fields::Entity")]
    CreatedDataFields,
}

impl Related<super::data_fields::Entity> for Entity {
    fn to() -> RelationDef { Relation::CreatedDataFields.def() }
}

impl ActiveModelBehavior for ActiveModel {}
