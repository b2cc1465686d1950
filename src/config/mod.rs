use anyhow::Context;
use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub menu: MenuConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_json: bool,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub run_migrations: bool,
}

// Настройки дерева меню
#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
    /// Максимальная глубина обхода, корни имеют глубину 0.
    pub max_depth: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl Config {
    /// Собирает конфигурацию: значения по умолчанию, затем переменные окружения
    /// вида `APP__PORT`, `DATABASE__POOL_SIZE`, `MENU__MAX_DEPTH`.
    /// `DATABASE_URL`, `PORT` и `RUST_LOG` поддерживаются как привычные алиасы.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::load(None)
    }

    /// То же, что `from_env`, но `database_url` имеет приоритет над окружением.
    pub fn load(database_url: Option<String>) -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "cinema_menu=debug,tower_http=debug")?
            .set_default("app.log_json", false)?
            .set_default("database.pool_size", 20)?
            .set_default("database.run_migrations", false)?
            .set_default("menu.max_depth", i64::from(MenuConfig::default().max_depth))?
            .add_source(
                ::config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", database_url.or_else(|| env::var("DATABASE_URL").ok()))?
            .set_override_option("app.port", env::var("PORT").ok())?
            .set_override_option("app.rust_log", env::var("RUST_LOG").ok())?
            .build()
            .context("failed to build configuration")?;

        settings
            .try_deserialize()
            .context("invalid configuration (is DATABASE_URL set?)")
    }
}
