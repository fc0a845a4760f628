//! # Room Assignment Planning
//!
//! Moves room associations between the single-valued `data_fields.room_id`
//! column and the `data_field_rooms` junction table, in both directions.
//!
//! The forward direction is lossless. The reverse direction keeps only the
//! earliest assignment of each field; every other assignment is discarded and
//! reported through [`CollapsePlan`].

use std::collections::BTreeMap;

use logging::{log_db_query, log_migration_anomaly};
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult, prelude::DateTimeUtc};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

/// Rows per multi-row insert during backfill.
pub const BACKFILL_BATCH_SIZE: usize = 500;

/// A data field's current room reference, as read before the column is dropped.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct RoomReferenceRow {
    pub data_field_id: Uuid,
    pub room_id:       Uuid,
    pub created_at:    DateTimeUtc,
    /// Whether `room_id` points at an existing room.
    pub room_exists:   bool,
}

/// An assignment row to be inserted into `data_field_rooms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAssignment {
    pub data_field_id: Uuid,
    pub room_id:       Uuid,
    pub assigned_at:   DateTimeUtc,
}

/// Result of [`plan_backfill`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillPlan {
    pub assignments: Vec<PlannedAssignment>,
    /// References to rooms that no longer exist. Skipped, not migrated.
    pub dangling:    Vec<RoomReferenceRow>,
}

/// An existing assignment, as read before the junction table is dropped.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct AssignmentRow {
    pub id:            Uuid,
    pub data_field_id: Uuid,
    pub room_id:       Uuid,
    pub assigned_at:   DateTimeUtc,
}

/// Result of [`collapse_assignments`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsePlan {
    /// `(data_field_id, room_id)` to write back, ordered by field id
    pub restored:               Vec<(Uuid, Uuid)>,
    /// Fields that had more than one assignment and lose all but the earliest
    pub lossy_fields:           Vec<Uuid>,
    /// Number of assignments that have no place in the restored shape
    pub discarded_assignments:  usize,
}

/// One assignment per valid room reference, stamped with the field's creation time.
pub fn plan_backfill(rows: impl IntoIterator<Item = RoomReferenceRow>) -> BackfillPlan {
    let mut plan = BackfillPlan::default();

    for row in rows {
        if row.room_exists {
            plan.assignments.push(PlannedAssignment {
                data_field_id: row.data_field_id,
                room_id:       row.room_id,
                assigned_at:   row.created_at,
            });
        }
        else {
            plan.dangling.push(row);
        }
    }

    plan.assignments.sort_by(|a, b| {
        a.assigned_at
            .cmp(&b.assigned_at)
            .then_with(|| a.data_field_id.cmp(&b.data_field_id))
    });
    plan
}

/// Picks, for each field, the room of its earliest assignment.
///
/// Ties on `assigned_at` fall back to the assignment id so repeated runs agree.
/// Fields without assignments do not appear and keep a null reference.
pub fn collapse_assignments(rows: impl IntoIterator<Item = AssignmentRow>) -> CollapsePlan {
    let mut by_field: BTreeMap<Uuid, Vec<AssignmentRow>> = BTreeMap::new();
    for row in rows {
        by_field.entry(row.data_field_id).or_default().push(row);
    }

    let mut plan = CollapsePlan::default();
    for (data_field_id, assignments) in by_field {
        let count = assignments.len();
        let earliest = assignments.into_iter().min_by(|a, b| {
            a.assigned_at
                .cmp(&b.assigned_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(earliest) = earliest {
            plan.restored.push((data_field_id, earliest.room_id));
        }
        if count > 1 {
            plan.lossy_fields.push(data_field_id);
            plan.discarded_assignments += count - 1;
        }
    }

    plan
}

/// Copies every valid `data_fields.room_id` into `data_field_rooms`.
///
/// Dangling references are logged and skipped rather than aborting the run.
pub async fn backfill<C>(conn: &C) -> Result<BackfillPlan, DbErr>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let query = Query::select()
        .expr_as(Expr::col((DataFields::Table, DataFields::Id)), Alias::new("data_field_id"))
        .column((DataFields::Table, DataFields::RoomId))
        .column((DataFields::Table, DataFields::CreatedAt))
        .expr_as(
            Expr::col((Rooms::Table, Rooms::Id)).is_not_null(),
            Alias::new("room_exists"),
        )
        .from(DataFields::Table)
        .left_join(
            Rooms::Table,
            Expr::col((Rooms::Table, Rooms::Id)).equals((DataFields::Table, DataFields::RoomId)),
        )
        .and_where(Expr::col((DataFields::Table, DataFields::RoomId)).is_not_null())
        .to_owned();

    let start = std::time::Instant::now();
    let rows = RoomReferenceRow::find_by_statement(backend.build(&query))
        .all(conn)
        .await?;
    log_db_query!("load room references", "data_fields", start.elapsed().as_millis());
    let plan = plan_backfill(rows);

    for row in &plan.dangling {
        log_migration_anomaly!(
            "dangling_room",
            data_field_id = %row.data_field_id,
            room_id = %row.room_id,
            "Skipping room assignment for missing room"
        );
    }

    for chunk in plan.assignments.chunks(BACKFILL_BATCH_SIZE) {
        let mut insert = Query::insert();
        insert.into_table(DataFieldRooms::Table).columns([
            DataFieldRooms::DataFieldId,
            DataFieldRooms::RoomId,
            DataFieldRooms::AssignedAt,
        ]);
        for assignment in chunk {
            insert
                .values([
                    assignment.data_field_id.into(),
                    assignment.room_id.into(),
                    assignment.assigned_at.into(),
                ])
                .map_err(|e| DbErr::Custom(format!("Failed to build assignment insert: {e}")))?;
        }
        conn.execute(backend.build(&insert)).await?;
    }

    Ok(plan)
}

/// Writes the earliest assignment of each field back into `data_fields.room_id`.
///
/// Lossy: see [`collapse_assignments`].
pub async fn collapse<C>(conn: &C) -> Result<CollapsePlan, DbErr>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let query = Query::select()
        .columns([
            DataFieldRooms::Id,
            DataFieldRooms::DataFieldId,
            DataFieldRooms::RoomId,
            DataFieldRooms::AssignedAt,
        ])
        .from(DataFieldRooms::Table)
        .to_owned();

    let rows = AssignmentRow::find_by_statement(backend.build(&query))
        .all(conn)
        .await?;
    let plan = collapse_assignments(rows);

    for (data_field_id, room_id) in &plan.restored {
        let update = Query::update()
            .table(DataFields::Table)
            .value(DataFields::RoomId, *room_id)
            .and_where(Expr::col(DataFields::Id).eq(*data_field_id))
            .to_owned();
        conn.execute(backend.build(&update)).await?;
    }

    if !plan.lossy_fields.is_empty() {
        tracing::warn!(
            target: "migrate",
            lossy_fields = plan.lossy_fields.len(),
            discarded_assignments = plan.discarded_assignments,
            "Collapsing room assignments discarded all but the earliest assignment per field"
        );
    }

    Ok(plan)
}

#[derive(DeriveIden)]
enum DataFields {
    Table,
    Id,
    RoomId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DataFieldRooms {
    Table,
    Id,
    DataFieldId,
    RoomId,
    AssignedAt,
}
