//! # Spreadsheet Store
//!
//! This crate keeps uploaded spreadsheets in PostgreSQL. Each upload becomes one
//! `sheet_details` row whose `json_data` column holds the sheet's rows as an
//! opaque JSONB array; only the normalizer interprets them.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all database-specific logic and
//!   hides the SQL behind `DbRepository`.
//! - **Runtime-Checked Queries:** Queries are built with `sqlx::query` and bound
//!   parameters, so the crate builds without a live database.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy`: establish the connection pool.
//! - `run_migrations`: apply the embedded migrations.
//! - `DbRepository`: save, list, flatten and delete sheet documents.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_lazy, database_url, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, SheetDocument};
