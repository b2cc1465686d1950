//! store.rs
//!
//! Абстракция хранилища, через которую проходит весь SQL сервиса.
//!
//! Сервисы получают `Arc<dyn Store>` в конструкторе и не знают, что за ним:
//! пул Postgres (`database::Database`) в проде или заглушка в тестах.
//! Строки возвращаются как набор именованных колонок и декодируются через serde.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Параметр запроса. Позиция в срезе соответствует `$1`, `$2`, ...
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<u32> for Param {
    fn from(v: u32) -> Self {
        Param::Int(i64::from(v))
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Ошибка, которую вернула сама база. `code` - SQLSTATE, если он известен.
    #[error("database error: {message}")]
    Database {
        code: Option<String>,
        message: String,
    },
    #[error("failed to decode row: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn database(code: Option<&str>, message: impl Into<String>) -> Self {
        StoreError::Database {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Database { code, .. } => code.as_deref(),
            StoreError::Decode(_) => None,
        }
    }
}

/// Одна строка результата: имя колонки -> значение.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(columns: Map<String, Value>) -> Self {
        Row(columns)
    }

    pub fn get<T: DeserializeOwned>(&self, column: &str) -> Result<T, StoreError> {
        let value = self.0.get(column).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| StoreError::Decode(format!("column `{column}`: {e}")))
    }

    /// Декодирует строку целиком в структуру с полями по именам колонок.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl TryFrom<Value> for Row {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(columns) => Ok(Row(columns)),
            other => Err(StoreError::Decode(format!("expected a row object, got {other}"))),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Выполняет SELECT и возвращает все строки. Один вызов - один round trip.
    /// Порядок строк не гарантирован, сортировка - на стороне вызывающего.
    async fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, StoreError>;

    /// Выполняет DDL/DML и возвращает количество затронутых строк.
    async fn execute(&self, sql: &str, params: &[Param]) -> Result<u64, StoreError>;
}
