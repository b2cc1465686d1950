//! Миграции схемы.
//!
//! Миграция - упорядоченный список таблиц. `apply` создает их по порядку,
//! `revert` удаляет в обратном. Каждая таблица перечисляет таблицы, на которые
//! ссылается, и порядок проверяется до того, как что-то пойдет в базу.

pub mod cinema;
pub mod menu;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::store::{Param, Store};

pub use cinema::CINEMA_SYSTEM;
pub use menu::MENU_ITEMS;

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    /// Таблицы, на которые ссылаются внешние ключи. Ссылка на себя не указывается.
    pub references: &'static [&'static str],
    pub create_sql: &'static str,
    /// Индексы и прочий DDL, выполняемый сразу после CREATE TABLE.
    pub extra_sql: &'static [&'static str],
}

#[derive(Debug)]
pub struct Migration {
    pub name: &'static str,
    pub tables: &'static [TableDef],
}

impl Migration {
    pub fn table_names(&self) -> impl DoubleEndedIterator<Item = &'static str> + '_ {
        self.tables.iter().map(|t| t.name)
    }

    /// Проверяет, что каждая ссылка указывает на таблицу, объявленную раньше:
    /// в `existing` (предыдущие миграции) или выше в этой же миграции.
    pub fn validate(&self, existing: &BTreeSet<&'static str>) -> Result<()> {
        let mut known = existing.clone();
        for table in self.tables {
            if let Some(missing) = table.references.iter().find(|r| !known.contains(*r)) {
                return Err(Error::DependencyMissing {
                    table: table.name.to_string(),
                    detail: format!("{} is not declared before {}", missing, table.name),
                });
            }
            if !known.insert(table.name) {
                return Err(Error::SchemaConflict {
                    table: table.name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Создает все таблицы в порядке зависимостей. При ошибке уже созданные
    /// в этом вызове таблицы удаляются обратно, база остается как до вызова.
    pub async fn apply(&self, store: &dyn Store) -> Result<()> {
        info!("Applying migration {}", self.name);
        let mut created: Vec<&'static str> = Vec::with_capacity(self.tables.len());

        for table in self.tables {
            if let Err(err) = store.execute(table.create_sql, &[]).await {
                let err = Error::from_ddl(table.name, err);
                error!("Migration {} failed on {}: {}", self.name, table.name, err);
                self.compensate(store, &created).await;
                return Err(err);
            }
            created.push(table.name);

            for stmt in table.extra_sql {
                if let Err(err) = store.execute(stmt, &[]).await {
                    let err = Error::from_ddl(table.name, err);
                    error!("Migration {} failed after creating {}: {}", self.name, table.name, err);
                    self.compensate(store, &created).await;
                    return Err(err);
                }
            }
        }

        info!("Migration {} applied ({} tables)", self.name, created.len());
        Ok(())
    }

    /// Удаляет таблицы миграции в порядке, обратном созданию.
    pub async fn revert(&self, store: &dyn Store) -> Result<()> {
        info!("Reverting migration {}", self.name);
        for name in self.table_names().rev() {
            store.execute(&drop_sql(name), &[]).await.map_err(|err| {
                error!("Revert of {} failed on {}: {}", self.name, name, err);
                Error::QueryFailed(err)
            })?;
        }
        info!("Migration {} reverted", self.name);
        Ok(())
    }

    async fn compensate(&self, store: &dyn Store, created: &[&'static str]) {
        let mut left_behind = Vec::new();
        for name in created.iter().rev() {
            if let Err(err) = store.execute(&drop_sql(name), &[]).await {
                warn!("Failed to drop {} while undoing {}: {}", name, self.name, err);
                left_behind.push(*name);
            }
        }
        if !left_behind.is_empty() {
            error!(
                "Migration {} left tables behind: {}",
                self.name,
                left_behind.join(", ")
            );
        }
    }
}

fn drop_sql(table: &str) -> String {
    format!("DROP TABLE {table}")
}

const LEDGER_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    name VARCHAR(255) PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
)
"#;

const LEDGER_DROP_SQL: &str = "DROP TABLE IF EXISTS schema_migrations";

/// Все миграции сервиса в порядке применения.
pub fn all() -> Vec<&'static Migration> {
    vec![&MENU_ITEMS, &CINEMA_SYSTEM]
}

/// Применяет миграции по журналу `schema_migrations`.
#[derive(Clone)]
pub struct Migrator {
    store: Arc<dyn Store>,
    migrations: Vec<&'static Migration>,
}

impl Migrator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_migrations(store, all())
    }

    pub fn with_migrations(store: Arc<dyn Store>, migrations: Vec<&'static Migration>) -> Self {
        Self { store, migrations }
    }

    pub fn validate(&self) -> Result<()> {
        let mut existing = BTreeSet::new();
        for migration in &self.migrations {
            migration.validate(&existing)?;
            existing.extend(migration.table_names());
        }
        Ok(())
    }

    fn find(&self, name: &str) -> Result<&'static Migration> {
        self.migrations
            .iter()
            .copied()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::UnknownMigration(name.to_string()))
    }

    async fn ensure_ledger(&self) -> Result<()> {
        self.store.execute(LEDGER_SQL, &[]).await?;
        Ok(())
    }

    pub async fn applied(&self) -> Result<BTreeSet<String>> {
        self.ensure_ledger().await?;
        let rows = self
            .store
            .query("SELECT name FROM schema_migrations", &[])
            .await?;
        rows.iter()
            .map(|row| row.get::<String>("name").map_err(Error::from))
            .collect()
    }

    async fn last_applied(&self) -> Result<Option<String>> {
        self.ensure_ledger().await?;
        let rows = self
            .store
            .query(
                "SELECT name FROM schema_migrations ORDER BY applied_at DESC, name DESC LIMIT 1",
                &[],
            )
            .await?;
        rows.first()
            .map(|row| row.get::<String>("name"))
            .transpose()
            .map_err(Error::from)
    }

    async fn record(&self, name: &str) -> Result<()> {
        self.store
            .execute(
                "INSERT INTO schema_migrations (name) VALUES ($1)",
                &[Param::from(name)],
            )
            .await?;
        Ok(())
    }

    async fn forget(&self, name: &str) -> Result<()> {
        self.store
            .execute(
                "DELETE FROM schema_migrations WHERE name = $1",
                &[Param::from(name)],
            )
            .await?;
        Ok(())
    }

    /// Применяет миграцию и пишет ее в журнал. Если запись не удалась,
    /// миграция откатывается: таблиц без записи в журнале быть не должно.
    async fn apply_and_record(&self, migration: &Migration) -> Result<()> {
        migration.apply(self.store.as_ref()).await?;
        if let Err(err) = self.record(migration.name).await {
            error!("Failed to record {}: {}", migration.name, err);
            if let Err(revert_err) = migration.revert(self.store.as_ref()).await {
                error!(
                    "Migration {} is applied but not recorded: {}",
                    migration.name, revert_err
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Откатывает миграцию и удаляет ее из журнала. Опустевший журнал удаляется.
    async fn revert_and_forget(&self, migration: &Migration) -> Result<()> {
        migration.revert(self.store.as_ref()).await?;
        self.forget(migration.name).await?;
        if self.applied().await?.is_empty() {
            self.store.execute(LEDGER_DROP_SQL, &[]).await?;
            info!("No migrations left, dropped schema_migrations");
        }
        Ok(())
    }

    /// Применяет все миграции, которых еще нет в журнале. Возвращает их имена.
    pub async fn run_pending(&self) -> Result<Vec<&'static str>> {
        self.validate()?;
        let applied = self.applied().await?;

        let mut ran = Vec::new();
        for migration in &self.migrations {
            if applied.contains(migration.name) {
                continue;
            }
            self.apply_and_record(migration).await?;
            ran.push(migration.name);
        }

        if ran.is_empty() {
            info!("Schema is up to date");
        }
        Ok(ran)
    }

    /// Откатывает последнюю примененную миграцию.
    pub async fn revert_last(&self) -> Result<Option<&'static str>> {
        let Some(name) = self.last_applied().await? else {
            info!("Nothing to revert");
            return Ok(None);
        };
        let migration = self.find(&name)?;
        self.revert_and_forget(migration).await?;
        Ok(Some(migration.name))
    }

    pub async fn apply_named(&self, name: &str) -> Result<()> {
        self.validate()?;
        let migration = self.find(name)?;
        self.ensure_ledger().await?;
        self.apply_and_record(migration).await
    }

    pub async fn revert_named(&self, name: &str) -> Result<()> {
        let migration = self.find(name)?;
        self.ensure_ledger().await?;
        self.revert_and_forget(migration).await
    }
}
