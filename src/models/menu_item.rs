use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Строка результата рекурсивного обхода `menu_items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Узел дерева меню в ответе `GET /api/menu`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn leaf(row: MenuItemRow) -> Self {
        MenuNode {
            id: row.id,
            name: row.name,
            url: row.url,
            parent_id: row.parent_id,
            created_at: row.created_at,
            children: Vec::new(),
        }
    }

    /// Общее количество узлов в поддереве, включая сам узел.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(MenuNode::size).sum::<usize>()
    }
}
