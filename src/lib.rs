pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod logging;
pub mod menu;
pub mod models;
pub mod pricing;
pub mod schema;
pub mod services;
pub mod store;

use std::sync::Arc;

pub use error::{Error, Result};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub menu: menu::MenuService,
    pub shows: services::ShowService,
    pub config: config::Config,
}

impl AppState {
    /// Собирает сервисы поверх одного хранилища.
    pub fn new(store: Arc<dyn store::Store>, config: config::Config) -> Arc<Self> {
        let menu = menu::MenuService::new(store.clone(), config.menu.max_depth);
        let shows = services::ShowService::new(store);
        Arc::new(Self { menu, shows, config })
    }
}
