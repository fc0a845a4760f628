//! Data Fields Entity
//!
//! Reusable, organization-scoped attribute definitions referenced by KPI
//! formulas through their `variable_name`.
//!
//! `(org_id, variable_name)` is unique at the storage layer
//! (`uq_data_field_org_variable`). Room visibility lives in
//! [`super::data_field_rooms`]; a field may be assigned to any number of rooms.
//!
//! CUSTOMIZATION REGION START: data_fields_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::{ActiveValue, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::EntryInterval;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "data_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:             Uuid,
    pub org_id:         Uuid,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name:           String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub variable_name:  String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description:    Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub unit:           Option<String>,
    pub entry_interval: EntryInterval,
    pub created_by:     Option<Uuid>,
    pub created_at:     DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    CreatedByUser,
    #[sea_orm(has_many = "super::data_field_rooms::Entity")]
    RoomAssignments,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::CreatedByUser.def() }
}

impl Related<super::data_field_rooms::Entity> for Entity {
    fn to() -> RelationDef { Relation::RoomAssignments.def() }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef { super::data_field_rooms::Relation::Room.def() }

    fn via() -> Option<RelationDef> { Some(super::data_field_rooms::Relation::DataField.def().rev()) }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if let ActiveValue::Set(variable_name) = &self.variable_name {
                if variable_name.trim().is_empty() {
                    return Err(DbErr::Custom("data field variable_name must not be empty".to_string()));
                }
            }
        }
        else if self.variable_name.is_set() {
            // Formulas reference the key by value.
            return Err(DbErr::Custom(
                "data field variable_name is immutable after creation".to_string(),
            ));
        }

        Ok(self)
    }
}

// CUSTOMIZATION REGION START: data_fields_entity_methods
impl Model {
    /// Rooms this field is assigned to.
    pub async fn rooms<C>(&self, db: &C) -> Result<Vec<super::rooms::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(super::rooms::Entity).all(db).await
    }

    /// Identifiers of the rooms this field is assigned to, oldest assignment first.
    pub async fn room_ids<C>(&self, db: &C) -> Result<Vec<Uuid>, DbErr>
    where
        C: ConnectionTrait,
    {
        let assignments = self
            .find_related(super::data_field_rooms::Entity)
            .order_by_asc(super::data_field_rooms::Column::AssignedAt)
            .all(db)
            .await?;

        Ok(assignments
            .into_iter()
            .map(|assignment| assignment.room_id)
            .collect())
    }
}
// CUSTOMIZATION REGION END
