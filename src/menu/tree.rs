//! tree.rs
//!
//! Сборка леса меню из плоского набора строк.
//!
//! Строки приходят одним запросом в произвольном порядке. Дальше три линейных
//! прохода: карта id -> строка, карта родитель -> дети (по возрастанию id),
//! обход в ширину от корней с подсчетом глубины. Узлы собираются с конца
//! порядка обхода, поэтому дети всегда готовы раньше родителя.

use std::collections::{btree_map::Entry, BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{MenuItemRow, MenuNode};

pub fn build_forest(rows: Vec<MenuItemRow>, max_depth: u32) -> Result<Vec<MenuNode>> {
    let mut by_id: BTreeMap<i64, MenuItemRow> = BTreeMap::new();
    for row in rows {
        match by_id.entry(row.id) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(_) => debug!("menu item {} returned twice, keeping first", row.id),
        }
    }

    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut roots: Vec<i64> = Vec::new();
    for (&id, row) in &by_id {
        match row.parent_id {
            None => roots.push(id),
            Some(parent_id) if by_id.contains_key(&parent_id) => {
                children.entry(parent_id).or_default().push(id)
            }
            Some(parent_id) => return Err(Error::OrphanNode { id, parent_id }),
        }
    }

    // Обход в ширину. Узлы глубже max_depth посещаются, но в дерево не попадают
    let mut order: Vec<i64> = Vec::with_capacity(by_id.len());
    let mut visited: HashSet<i64> = HashSet::with_capacity(by_id.len());
    let mut queue: VecDeque<(i64, u32)> = roots.iter().map(|&id| (id, 0)).collect();
    let mut truncated = 0usize;

    while let Some((id, depth)) = queue.pop_front() {
        visited.insert(id);
        if depth <= max_depth {
            order.push(id);
        } else {
            truncated += 1;
        }
        if let Some(kids) = children.get(&id) {
            queue.extend(kids.iter().map(|&kid| (kid, depth + 1)));
        }
    }

    // Остались только узлы, замкнутые в цикл без корня
    if let Some((&id, row)) = by_id.iter().find(|(id, _)| !visited.contains(*id)) {
        let parent_id = row.parent_id.unwrap_or_default();
        warn!("menu item {} is not reachable from any root", id);
        return Err(Error::OrphanNode { id, parent_id });
    }

    let mut built: HashMap<i64, MenuNode> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let Some(row) = by_id.remove(&id) else { continue };
        let mut node = MenuNode::leaf(row);
        if let Some(kids) = children.get(&id) {
            node.children = kids.iter().filter_map(|kid| built.remove(kid)).collect();
        }
        built.insert(id, node);
    }

    let forest: Vec<MenuNode> = roots.iter().filter_map(|id| built.remove(id)).collect();
    debug!(
        "menu forest built: {} roots, {} nodes, {} truncated below depth {}",
        forest.len(),
        order.len(),
        truncated,
        max_depth
    );
    Ok(forest)
}
