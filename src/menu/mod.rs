pub mod tree;

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{MenuItemRow, MenuNode};
use crate::store::{Param, Store};

pub use tree::build_forest;

/// Рекурсивный обход от корней. `$1` - максимальная глубина, корни имеют глубину 0.
pub const MENU_TREE_SQL: &str = r#"
WITH RECURSIVE tree AS (
    SELECT id, name, url, parent_id, created_at, 0 AS depth
    FROM menu_items
    WHERE parent_id IS NULL
    UNION ALL
    SELECT mi.id, mi.name, mi.url, mi.parent_id, mi.created_at, tree.depth + 1
    FROM menu_items mi
    JOIN tree ON mi.parent_id = tree.id
    WHERE tree.depth < $1
)
SELECT id, name, url, parent_id, created_at, depth
FROM tree
ORDER BY depth, id
"#;

#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn Store>,
    max_depth: u32,
}

impl MenuService {
    pub fn new(store: Arc<dyn Store>, max_depth: u32) -> Self {
        Self { store, max_depth }
    }

    /// Возвращает лес меню. Ровно один запрос к хранилищу независимо от
    /// глубины и числа пунктов, вся перестройка - в процессе.
    pub async fn get_menu_items(&self) -> Result<Vec<MenuNode>> {
        let rows = self
            .store
            .query(MENU_TREE_SQL, &[Param::from(self.max_depth)])
            .await?;

        let rows = rows
            .iter()
            .map(|row| row.decode::<MenuItemRow>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!("Loaded {} menu rows", rows.len());
        build_forest(rows, self.max_depth)
    }
}
