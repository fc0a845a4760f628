//! # Data Field Key Conflict Resolution
//!
//! Before `(org_id, variable_name)` becomes unique on its own, rows that only
//! differed by room must be given distinct keys. Planning is a pure function
//! over the full row set; [`resolve_conflicts`] loads the rows, plans, applies
//! the renames and verifies the post-condition.
//!
//! Within a group sharing `(org_id, variable_name)` the earliest created row
//! (ties broken by id) keeps its key. Every later row is renamed to
//! `{key}_{room_slug}` and `{name} ({room name})`, with `unassigned` standing in
//! for rows without a room. If that key is already taken in the organization,
//! the row id is appended, then a counter. Keys and names are shortened from
//! the front part so they fit their `varchar(255)` columns; the suffix that
//! makes them distinct is always kept.

use std::collections::{BTreeMap, HashMap, HashSet};

use logging::{log_db_query, log_key_rename};
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult, prelude::DateTimeUtc};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

/// Label used for rows that are not associated with any room.
pub const UNASSIGNED: &str = "unassigned";

/// Column width of `data_fields.variable_name` and `data_fields.name`, in characters.
pub const MAX_FIELD_LEN: usize = 255;

/// The columns of a data field row that take part in key conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FieldKeyRow {
    pub id:            Uuid,
    pub org_id:        Uuid,
    pub variable_name: String,
    pub name:          String,
    /// Name of the room the row currently belongs to, `None` when unassigned
    /// or when the room reference is dangling.
    pub room_name:     Option<String>,
    pub created_at:    DateTimeUtc,
}

/// A rename decided by [`plan_renames`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRename {
    pub id:                Uuid,
    pub org_id:            Uuid,
    pub old_variable_name: String,
    pub new_variable_name: String,
    pub old_name:          String,
    pub new_name:          String,
}

/// Outcome of a resolver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Number of data field rows inspected
    pub scanned: usize,
    /// Renames applied, in application order
    pub renames: Vec<KeyRename>,
}

/// Slug of a room name as used in renamed keys.
pub fn room_slug(room_name: Option<&str>) -> String {
    room_name
        .unwrap_or(UNASSIGNED)
        .to_lowercase()
        .replace(' ', "_")
}

/// Decides which rows must be renamed so that `(org_id, variable_name)` is unique.
///
/// Pure and deterministic: the same rows always yield the same renames,
/// whatever order they are given in.
pub fn plan_renames(rows: &[FieldKeyRow]) -> Vec<KeyRename> {
    let mut taken: HashMap<Uuid, HashSet<String>> = HashMap::new();
    let mut groups: BTreeMap<(Uuid, &str), Vec<&FieldKeyRow>> = BTreeMap::new();

    for row in rows {
        taken
            .entry(row.org_id)
            .or_default()
            .insert(row.variable_name.clone());
        groups
            .entry((row.org_id, row.variable_name.as_str()))
            .or_default()
            .push(row);
    }

    let mut renames = Vec::new();
    for ((org_id, _), mut members) in groups {
        if members.len() < 2 {
            continue;
        }

        members.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let org_keys = taken.entry(org_id).or_default();
        for row in members.into_iter().skip(1) {
            let slug = format!("_{}", room_slug(row.room_name.as_deref()));
            let new_variable_name = disambiguate(&row.variable_name, &slug, row.id, org_keys);
            org_keys.insert(new_variable_name.clone());
            let label = format!(" ({})", row.room_name.as_deref().unwrap_or(UNASSIGNED));

            renames.push(KeyRename {
                id: row.id,
                org_id,
                old_variable_name: row.variable_name.clone(),
                new_variable_name,
                old_name: row.name.clone(),
                new_name: fit_to_column(&row.name, &label, ""),
            });
        }
    }

    renames
}

/// Picks the first free key among `{stem}{tail}`, `{stem}{tail}_{id}`,
/// `{stem}{tail}_{id}_2`, ..., each shortened to [`MAX_FIELD_LEN`].
fn disambiguate(stem: &str, tail: &str, id: Uuid, taken: &HashSet<String>) -> String {
    let preferred = fit_to_column(stem, tail, "");
    if !taken.contains(&preferred) {
        return preferred;
    }

    let id_marker = format!("_{}", id.simple());
    let with_id = fit_to_column(stem, tail, &id_marker);
    if !taken.contains(&with_id) {
        return with_id;
    }

    let mut counter = 2_u32;
    loop {
        let candidate = fit_to_column(stem, tail, &format!("{id_marker}_{counter}"));
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Joins `stem`, `tail` and `marker` within [`MAX_FIELD_LEN`] characters.
///
/// `marker` is kept whole, `tail` is cut only once `stem` is gone, and `stem`
/// gives way first. Cuts fall on character boundaries.
fn fit_to_column(stem: &str, tail: &str, marker: &str) -> String {
    let budget = MAX_FIELD_LEN.saturating_sub(marker.chars().count());
    let tail_len = tail.chars().count().min(budget);
    let stem_len = budget - tail_len;

    stem.chars()
        .take(stem_len)
        .chain(tail.chars().take(tail_len))
        .chain(marker.chars())
        .collect()
}

/// Returns every `(org_id, variable_name)` still held by more than one row
/// once `renames` are applied to `rows`. Empty when the post-condition holds.
pub fn find_key_collisions(rows: &[FieldKeyRow], renames: &[KeyRename]) -> Vec<(Uuid, String)> {
    let renamed: HashMap<Uuid, &str> = renames
        .iter()
        .map(|rename| (rename.id, rename.new_variable_name.as_str()))
        .collect();

    let mut counts: BTreeMap<(Uuid, &str), usize> = BTreeMap::new();
    for row in rows {
        let key = renamed
            .get(&row.id)
            .copied()
            .unwrap_or(row.variable_name.as_str());
        *counts.entry((row.org_id, key)).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((org_id, key), _)| (org_id, key.to_string()))
        .collect()
}

/// Loads the rows the resolver needs, joined with their current room name.
///
/// Only valid while `data_fields.room_id` still exists.
pub async fn load_rows<C>(conn: &C) -> Result<Vec<FieldKeyRow>, DbErr>
where
    C: ConnectionTrait,
{
    let query = Query::select()
        .column((DataFields::Table, DataFields::Id))
        .column((DataFields::Table, DataFields::OrgId))
        .column((DataFields::Table, DataFields::VariableName))
        .column((DataFields::Table, DataFields::Name))
        .expr_as(Expr::col((Rooms::Table, Rooms::Name)), Alias::new("room_name"))
        .column((DataFields::Table, DataFields::CreatedAt))
        .from(DataFields::Table)
        .left_join(
            Rooms::Table,
            Expr::col((Rooms::Table, Rooms::Id)).equals((DataFields::Table, DataFields::RoomId)),
        )
        .to_owned();

    let start = std::time::Instant::now();
    let rows = FieldKeyRow::find_by_statement(conn.get_database_backend().build(&query))
        .all(conn)
        .await?;
    log_db_query!("load field keys", "data_fields", start.elapsed().as_millis());

    Ok(rows)
}

/// Computes the renames without writing anything.
pub async fn preview<C>(conn: &C) -> Result<ResolveReport, DbErr>
where
    C: ConnectionTrait,
{
    let rows = load_rows(conn).await?;
    Ok(ResolveReport {
        scanned: rows.len(),
        renames: plan_renames(&rows),
    })
}

/// Renames conflicting rows in place. Ids, organizations and rooms are untouched.
///
/// # Errors
///
/// Returns [`DbErr::Migration`] if the planned keys would still collide; the
/// caller's transaction must then be rolled back.
pub async fn resolve_conflicts<C>(conn: &C) -> Result<ResolveReport, DbErr>
where
    C: ConnectionTrait,
{
    let rows = load_rows(conn).await?;
    let renames = plan_renames(&rows);

    let collisions = find_key_collisions(&rows, &renames);
    if !collisions.is_empty() {
        let listed: Vec<String> = collisions
            .iter()
            .map(|(org_id, key)| format!("{org_id}/{key}"))
            .collect();
        return Err(DbErr::Migration(format!(
            "data field keys still collide after conflict resolution: {}",
            listed.join(", ")
        )));
    }

    let backend = conn.get_database_backend();
    for rename in &renames {
        let update = Query::update()
            .table(DataFields::Table)
            .values([
                (DataFields::VariableName, rename.new_variable_name.clone().into()),
                (DataFields::Name, rename.new_name.clone().into()),
            ])
            .and_where(Expr::col(DataFields::Id).eq(rename.id))
            .to_owned();
        conn.execute(backend.build(&update)).await?;

        log_key_rename!(rename.id, rename.old_variable_name, rename.new_variable_name);
    }

    Ok(ResolveReport {
        scanned: rows.len(),
        renames,
    })
}

#[derive(DeriveIden)]
enum DataFields {
    Table,
    Id,
    OrgId,
    Name,
    VariableName,
    RoomId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    Name,
}
