use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::{debug, info};

use crate::store::{Param, Row, Store, StoreError};

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        info!("Database pool ready ({} connections)", pool_size);
        Ok(Database { pool })
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>;
type PgScalar<'q> =
    sqlx::query::QueryScalar<'q, Postgres, Value, sqlx::postgres::PgArguments>;

fn bind_all<'q>(mut query: PgQuery<'q>, params: &'q [Param]) -> PgQuery<'q> {
    for param in params {
        query = match param {
            Param::Int(v) => query.bind(*v),
            Param::Text(v) => query.bind(v.as_str()),
            Param::Null => query.bind(None::<i64>),
        };
    }
    query
}

fn bind_all_scalar<'q>(mut query: PgScalar<'q>, params: &'q [Param]) -> PgScalar<'q> {
    for param in params {
        query = match param {
            Param::Int(v) => query.bind(*v),
            Param::Text(v) => query.bind(v.as_str()),
            Param::Null => query.bind(None::<i64>),
        };
    }
    query
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => StoreError::database(db.code().as_deref(), db.message()),
            _ => StoreError::database(None, err.to_string()),
        }
    }
}

#[async_trait]
impl Store for Database {
    async fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, StoreError> {
        // Оборачиваем любой SELECT в to_jsonb, чтобы получить строки с именованными колонками
        let wrapped = format!("SELECT to_jsonb(q) AS row FROM ({sql}) q");
        debug!(sql = %sql, params = params.len(), "store query");

        let values: Vec<Value> = bind_all_scalar(sqlx::query_scalar(&wrapped), params)
            .fetch_all(&self.pool)
            .await?;

        values.into_iter().map(Row::try_from).collect()
    }

    async fn execute(&self, sql: &str, params: &[Param]) -> Result<u64, StoreError> {
        debug!(sql = %sql, params = params.len(), "store execute");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
