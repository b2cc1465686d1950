use super::{Migration, TableDef};

pub static MENU_ITEMS: Migration = Migration {
    name: "menu_items",
    tables: &[TableDef {
        name: "menu_items",
        references: &[],
        create_sql: r#"
CREATE TABLE menu_items (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    url VARCHAR(255) NOT NULL,
    parent_id INTEGER REFERENCES menu_items(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#,
        extra_sql: &["CREATE INDEX idx_menu_items_parent_id ON menu_items (parent_id)"],
    }],
};
