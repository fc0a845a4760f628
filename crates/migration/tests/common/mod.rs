//! # Common Test Utilities
//!
//! Shared PostgreSQL setup for the migration integration tests. Every test
//! starts from an empty `public` schema migrated to the baseline shape, so the
//! tests must run serially against a disposable database.

#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use migration::{BASELINE_MIGRATIONS, Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DbBackend, DbConn, FromQueryResult, Statement, Value};
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize test logging (run once per test session)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Database connection for tests
pub struct TestDb {
    pub conn: DbConn,
}

impl TestDb {
    /// Connect to the database named by `DATABASE_URL` and rebuild the
    /// baseline schema from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is unset or any setup statement fails
    pub async fn baseline() -> Result<Self, String> {
        init_test_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL environment variable not set".to_string())?;

        let conn = Database::connect(&database_url)
            .await
            .map_err(|e| format!("Failed to connect to test database: {}", e))?;

        conn.execute_unprepared("DROP SCHEMA public CASCADE; CREATE SCHEMA public;")
            .await
            .map_err(|e| format!("Failed to reset schema: {}", e))?;

        Migrator::up(&conn, Some(BASELINE_MIGRATIONS))
            .await
            .map_err(|e| format!("Failed to apply baseline migrations: {}", e))?;

        Ok(Self {
            conn,
        })
    }

    /// Get a reference to the database connection
    pub fn get_connection(&self) -> &DbConn { &self.conn }

    async fn exec(&self, sql: &str, values: Vec<Value>) -> Uuid {
        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await
            .expect("insert failed")
            .expect("insert returned no row");
        row.try_get("", "id").expect("missing id")
    }

    pub async fn create_org(&self, name: &str) -> Uuid {
        self.exec(
            "INSERT INTO organizations (name) VALUES ($1) RETURNING id",
            vec![name.into()],
        )
        .await
    }

    pub async fn create_room(&self, org_id: Uuid, name: &str) -> Uuid {
        self.exec(
            "INSERT INTO rooms (org_id, name) VALUES ($1, $2) RETURNING id",
            vec![org_id.into(), name.into()],
        )
        .await
    }

    /// Insert a pre-migration data field with an optional room reference.
    pub async fn create_field(
        &self,
        org_id: Uuid,
        room_id: Option<Uuid>,
        name: &str,
        variable_name: &str,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        self.exec(
            "INSERT INTO data_fields (org_id, room_id, name, variable_name, created_at) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
            vec![
                org_id.into(),
                room_id.into(),
                name.into(),
                variable_name.into(),
                created_at.into(),
            ],
        )
        .await
    }

    /// Insert a data field once the legacy room column is gone.
    pub async fn create_field_after_migration(&self, org_id: Uuid, name: &str, variable_name: &str) -> Uuid {
        self.exec(
            "INSERT INTO data_fields (org_id, name, variable_name) VALUES ($1, $2, $3) RETURNING id",
            vec![org_id.into(), name.into(), variable_name.into()],
        )
        .await
    }

    pub async fn field(&self, id: Uuid) -> FieldRow {
        FieldRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id, name, variable_name FROM data_fields WHERE id = $1",
            [id.into()],
        ))
        .one(&self.conn)
        .await
        .expect("select failed")
        .expect("field not found")
    }

    /// Room id stored on a field while the legacy column exists.
    pub async fn legacy_room_id(&self, id: Uuid) -> Option<Uuid> {
        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT room_id FROM data_fields WHERE id = $1",
                [id.into()],
            ))
            .await
            .expect("select failed")
            .expect("field not found");
        row.try_get("", "room_id").expect("missing room_id")
    }

    pub async fn assignments(&self, data_field_id: Uuid) -> Vec<AssignmentRow> {
        AssignmentRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT room_id, assigned_at FROM data_field_rooms WHERE data_field_id = $1 ORDER BY assigned_at",
            [data_field_id.into()],
        ))
        .all(&self.conn)
        .await
        .expect("select failed")
    }

    pub async fn assign(&self, data_field_id: Uuid, room_id: Uuid, assigned_at: DateTime<Utc>) {
        self.conn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "INSERT INTO data_field_rooms (data_field_id, room_id, assigned_at) VALUES ($1, $2, $3)",
                [data_field_id.into(), room_id.into(), assigned_at.into()],
            ))
            .await
            .expect("assignment insert failed");
    }

    pub async fn column_exists(&self, table: &str, column: &str) -> bool {
        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT COUNT(*) AS n FROM information_schema.columns WHERE table_name = $1 AND column_name = $2",
                [table.into(), column.into()],
            ))
            .await
            .expect("select failed")
            .expect("count returned no row");
        let n: i64 = row.try_get("", "n").expect("missing count");
        n > 0
    }

    pub async fn constraint_exists(&self, name: &str) -> bool {
        self.count(
            "SELECT COUNT(*) AS n FROM pg_constraint WHERE conname = $1 AND contype = 'u'",
            vec![name.into()],
        )
        .await
            > 0
    }

    /// Junction rows whose field or room no longer exists.
    pub async fn orphan_assignments(&self) -> i64 {
        self.count(
            "SELECT COUNT(*) AS n FROM data_field_rooms dfr \
             WHERE NOT EXISTS (SELECT 1 FROM data_fields df WHERE df.id = dfr.data_field_id) \
                OR NOT EXISTS (SELECT 1 FROM rooms r WHERE r.id = dfr.room_id)",
            vec![],
        )
        .await
    }

    pub async fn delete_room(&self, id: Uuid) {
        self.conn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "DELETE FROM rooms WHERE id = $1",
                [id.into()],
            ))
            .await
            .expect("room delete failed");
    }

    pub async fn delete_field(&self, id: Uuid) {
        self.conn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "DELETE FROM data_fields WHERE id = $1",
                [id.into()],
            ))
            .await
            .expect("field delete failed");
    }

    async fn count(&self, sql: &str, values: Vec<Value>) -> i64 {
        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await
            .expect("select failed")
            .expect("count returned no row");
        row.try_get("", "n").expect("missing count")
    }
}

#[derive(Debug, FromQueryResult)]
pub struct FieldRow {
    pub id:            Uuid,
    pub name:          String,
    pub variable_name: String,
}

#[derive(Debug, FromQueryResult)]
pub struct AssignmentRow {
    pub room_id:     Uuid,
    pub assigned_at: DateTime<Utc>,
}

/// Fixed, second-precision timestamp `hours` after a common origin.
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::hours(hours)
}

/// Skip the current test when no database is configured.
macro_rules! require_db {
    () => {{
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("Skipping database test: DATABASE_URL not set");
            return;
        }
        common::TestDb::baseline().await.expect("baseline setup failed")
    }};
}
