use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::RawRow;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// One uploaded spreadsheet as stored in `sheet_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocument {
    pub id: Uuid,
    pub sheet_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub json_data: Vec<RawRow>,
}

// This struct represents a row fetched from the sheet_details table.
#[derive(FromRow, Debug)]
struct DbSheet {
    sheet_id: Uuid,
    sheet_name: String,
    uploaded_at: DateTime<Utc>,
    json_data: Json<Vec<RawRow>>,
}

impl From<DbSheet> for SheetDocument {
    fn from(row: DbSheet) -> Self {
        Self {
            id: row.sheet_id,
            sheet_name: row.sheet_name,
            uploaded_at: row.uploaded_at,
            json_data: row.json_data.0,
        }
    }
}

/// All rows of all sheets, in the order the sheets were given.
pub(crate) fn concat_rows(sheets: Vec<Json<Vec<RawRow>>>) -> Vec<RawRow> {
    sheets.into_iter().flat_map(|Json(rows)| rows).collect()
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Stores one uploaded sheet and returns it with its new id and timestamp.
    pub async fn save_sheet(&self, sheet_name: &str, rows: &[RawRow]) -> Result<SheetDocument, DbError> {
        let sheet_id = Uuid::new_v4();
        let uploaded_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO sheet_details (sheet_id, sheet_name, json_data)
            VALUES ($1, $2, $3)
            RETURNING uploaded_at
            "#,
        )
        .bind(sheet_id)
        .bind(sheet_name)
        .bind(Json(rows))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%sheet_id, sheet_name, rows = rows.len(), "Saved uploaded sheet.");
        Ok(SheetDocument {
            id: sheet_id,
            sheet_name: sheet_name.to_string(),
            uploaded_at,
            json_data: rows.to_vec(),
        })
    }

    /// Every stored row, all sheets concatenated in upload order.
    pub async fn get_all_rows(&self) -> Result<Vec<RawRow>, DbError> {
        let sheets: Vec<Json<Vec<RawRow>>> = sqlx::query_scalar(
            "SELECT json_data FROM sheet_details ORDER BY uploaded_at ASC, sheet_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(concat_rows(sheets))
    }

    /// Fetches every stored sheet with its id, oldest first.
    pub async fn get_sheets_with_ids(&self) -> Result<Vec<SheetDocument>, DbError> {
        let sheets = sqlx::query_as::<_, DbSheet>(
            r#"
            SELECT sheet_id, sheet_name, uploaded_at, json_data
            FROM sheet_details
            ORDER BY uploaded_at ASC, sheet_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sheets.into_iter().map(SheetDocument::from).collect())
    }

    /// Deletes one sheet. Returns `DbError::NotFound` when no sheet has that id.
    pub async fn delete_sheet(&self, sheet_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM sheet_details WHERE sheet_id = $1")
            .bind(sheet_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(%sheet_id, "Deleted sheet.");
        Ok(())
    }
}
