//! Data Field Rooms Entity
//!
//! Junction between data fields and rooms. Deleting either endpoint deletes
//! the assignment; `(data_field_id, room_id)` is unique (`uq_data_field_room`).
//!
//! CUSTOMIZATION REGION START: data_field_rooms_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::{QueryFilter, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "data_field_rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:            Uuid,
    pub data_field_id: Uuid,
    pub room_id:       Uuid,
    pub assigned_at:   DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_fields::Entity",
        from = "Column::DataFieldId",
        to = "super::data_fields::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DataField,
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Room,
}

impl Related<super::data_fields::Entity> for Entity {
    fn to() -> RelationDef { Relation::DataField.def() }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef { Relation::Room.def() }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: data_field_rooms_entity_methods

/// Assigns a data field to a room, stamped with the current time.
///
/// # Errors
///
/// Fails with the store's unique violation if the pair is already assigned,
/// or a foreign key violation if either side does not exist.
pub async fn assign<C>(db: &C, data_field_id: Uuid, room_id: Uuid) -> Result<Model, DbErr>
where
    C: ConnectionTrait,
{
    let assignment = ActiveModel {
        id: Set(Uuid::new_v4()),
        data_field_id: Set(data_field_id),
        room_id: Set(room_id),
        assigned_at: Set(chrono::Utc::now()),
    };
    assignment.insert(db).await
}

/// Removes a data field from a room.
///
/// Returns `false` when the field was not assigned to the room.
pub async fn unassign<C>(db: &C, data_field_id: Uuid, room_id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = Entity::delete_many()
        .filter(Column::DataFieldId.eq(data_field_id))
        .filter(Column::RoomId.eq(room_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
// CUSTOMIZATION REGION END
