use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// SQLSTATE duplicate_table
pub const SQLSTATE_DUPLICATE_TABLE: &str = "42P07";
/// SQLSTATE undefined_table
pub const SQLSTATE_UNDEFINED_TABLE: &str = "42P01";

pub type Result<T, E = Error> = std::result::Result<T, E>;

// Все ошибки терминальны для текущей операции, повторов внутри нет.
#[derive(Debug, Error)]
pub enum Error {
    #[error("table already exists: {table}")]
    SchemaConflict { table: String },

    #[error("table {table} references a missing table: {detail}")]
    DependencyMissing { table: String, detail: String },

    #[error("query failed: {0}")]
    QueryFailed(#[from] StoreError),

    #[error("menu item {id} references missing parent {parent_id}")]
    OrphanNode { id: i64, parent_id: i64 },

    #[error("unknown migration: {0}")]
    UnknownMigration(String),
}

impl Error {
    /// Переводит ошибку DDL в таксономию миграций по SQLSTATE.
    pub fn from_ddl(table: &str, err: StoreError) -> Self {
        match err.code() {
            Some(SQLSTATE_DUPLICATE_TABLE) => Error::SchemaConflict {
                table: table.to_string(),
            },
            Some(SQLSTATE_UNDEFINED_TABLE) => Error::DependencyMissing {
                table: table.to_string(),
                detail: err.to_string(),
            },
            _ => Error::QueryFailed(err),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
