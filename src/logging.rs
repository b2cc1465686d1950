use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Поднимает tracing-subscriber: фильтр из `app.rust_log`, JSON-вывод по `app.log_json`.
pub fn init(app: &AppConfig) {
    let filter = EnvFilter::new(&app.rust_log);
    if app.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
