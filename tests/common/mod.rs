#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cinema_menu::config::{AppConfig, Config, DatabaseConfig, MenuConfig};
use cinema_menu::store::{Param, Row, Store, StoreError};
use cinema_menu::AppState;

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: i64,
    pub name: &'static str,
    pub url: &'static str,
    pub parent_id: Option<i64>,
}

pub fn item(id: i64, name: &'static str, url: &'static str, parent_id: Option<i64>) -> MenuItem {
    MenuItem { id, name, url, parent_id }
}

/// Хранилище в памяти: `menu_items` обходится так же, как рекурсивный CTE,
/// остальные запросы отдают заготовленные строки.
#[derive(Default)]
pub struct MemoryStore {
    pub menu: Vec<MenuItem>,
    pub shows: Vec<Value>,
    pub fail: Option<String>,
    pub queries: AtomicUsize,
    pub last_params: Mutex<Vec<Param>>,
}

impl MemoryStore {
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self { menu, ..Self::default() }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn traverse(&self, max_depth: i64) -> Vec<Row> {
        let mut out = Vec::new();
        let mut queue: VecDeque<(&MenuItem, i64)> = self
            .menu
            .iter()
            .filter(|m| m.parent_id.is_none())
            .map(|m| (m, 0))
            .collect();
        while let Some((node, depth)) = queue.pop_front() {
            out.push(
                Row::try_from(json!({
                    "id": node.id,
                    "name": node.name,
                    "url": node.url,
                    "parent_id": node.parent_id,
                    "created_at": "2021-04-27T15:35:15+00:00",
                    "depth": depth,
                }))
                .unwrap(),
            );
            if depth < max_depth {
                queue.extend(
                    self.menu
                        .iter()
                        .filter(|m| m.parent_id == Some(node.id))
                        .map(|m| (m, depth + 1)),
                );
            }
        }
        out
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = params.to_vec();
        if let Some(message) = &self.fail {
            return Err(StoreError::database(Some("08006"), message.clone()));
        }
        if sql.contains("WITH RECURSIVE") {
            let max_depth = match params.first() {
                Some(Param::Int(d)) => *d,
                _ => i64::MAX,
            };
            return Ok(self.traverse(max_depth));
        }
        if sql.contains("FROM shows s") {
            return Ok(self
                .shows
                .iter()
                .cloned()
                .map(|v| Row::try_from(v).unwrap())
                .collect());
        }
        Ok(Vec::new())
    }

    async fn execute(&self, _sql: &str, _params: &[Param]) -> Result<u64, StoreError> {
        Ok(0)
    }
}

pub fn test_config(max_depth: u32) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            rust_log: "cinema_menu=debug".to_string(),
            log_json: false,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            pool_size: 1,
            run_migrations: false,
        },
        menu: MenuConfig { max_depth },
    }
}

pub fn state(store: Arc<MemoryStore>, max_depth: u32) -> Arc<AppState> {
    AppState::new(store, test_config(max_depth))
}

/// Меню из примера: All events -> Laracon/Reactcon -> воркшопы.
pub fn sample_menu() -> Vec<MenuItem> {
    vec![
        item(1, "All events", "/events", None),
        item(2, "Laracon", "/events/laracon", Some(1)),
        item(3, "Illuminate your knowledge of the laravel code base", "/events/laracon/workshops/illuminate", Some(2)),
        item(4, "The new Eloquent - load more with less", "/events/laracon/workshops/eloquent", Some(2)),
        item(5, "Reactcon", "/events/reactcon", Some(1)),
        item(6, "#NoClass pure functional programming", "/events/reactcon/workshops/noclass", Some(5)),
        item(7, "Navigating the function jungle", "/events/reactcon/workshops/jungle", Some(5)),
    ]
}
