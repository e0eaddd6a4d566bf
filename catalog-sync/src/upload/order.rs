//! Deterministic `order` assignment
//!
//! Records are grouped by a parent key and numbered 1, 2, 3, ... inside each
//! group after a stable sort on a secondary key. When no record has a parent
//! key the whole set is numbered 1..N by identity instead. Running the pass on
//! its own output yields the same numbers.

use serde::Serialize;
use std::cmp::Ordering;

use super::entities::{Product, product_cols};
use super::values::to_str;
use crate::sheet::Row;

/// The keys of one record that drive its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub identity: String,
    pub parent: Option<String>,
    pub secondary: Option<String>,
}

impl OrderKey {
    pub fn new(identity: impl Into<String>, parent: Option<String>, secondary: Option<String>) -> Self {
        Self {
            identity: identity.into(),
            parent,
            secondary,
        }
    }
}

/// Compute 1-based order values, aligned with `keys`
pub fn assign_orders(keys: &[OrderKey]) -> Vec<i64> {
    let mut indices: Vec<usize> = (0..keys.len()).collect();
    let mut orders = vec![0; keys.len()];

    if keys.iter().all(|k| k.parent.is_none()) {
        indices.sort_by(|&a, &b| keys[a].identity.cmp(&keys[b].identity));
        for (position, idx) in indices.into_iter().enumerate() {
            orders[idx] = position as i64 + 1;
        }
        return orders;
    }

    // sort_by is stable: equal secondary keys keep their input order
    indices.sort_by(|&a, &b| {
        keys[a]
            .parent
            .cmp(&keys[b].parent)
            .then_with(|| compare_secondary(&keys[a].secondary, &keys[b].secondary))
    });

    let mut group: Option<&Option<String>> = None;
    let mut counter = 0;
    for idx in indices {
        let parent = &keys[idx].parent;
        if group != Some(parent) {
            group = Some(parent);
            counter = 0;
        }
        counter += 1;
        orders[idx] = counter;
    }

    orders
}

/// Missing secondary keys sort after present ones
fn compare_secondary(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Overwrite each product's `order`: grouped by topic, sorted by level
pub fn reorder_products(products: &mut [Product]) {
    let keys: Vec<OrderKey> = products
        .iter()
        .map(|p| OrderKey::new(&p.product_id, Some(p.topic_id.clone()), p.level.clone()))
        .collect();

    for (product, order) in products.iter_mut().zip(assign_orders(&keys)) {
        product.order = order;
    }
}

/// One line of the product order report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrder {
    pub product_id: String,
    pub topic_id: Option<String>,
    pub level: Option<String>,
    pub order: i64,
}

/// Compute product orders straight from raw Products rows
///
/// Rows without a `productId` are ignored. Unlike the upload path, rows
/// without a `topicId` are kept, so a sheet with no topics at all is numbered
/// by `productId`.
pub fn product_orders(rows: &[Row]) -> Vec<ProductOrder> {
    let keys: Vec<OrderKey> = rows
        .iter()
        .filter_map(|row| {
            let identity = to_str(row.get(product_cols::ID), None)?;
            Some(OrderKey::new(
                identity,
                to_str(row.get(product_cols::TOPIC_ID), None),
                to_str(row.get(product_cols::LEVEL), None),
            ))
        })
        .collect();

    let orders = assign_orders(&keys);

    keys.into_iter()
        .zip(orders)
        .map(|(key, order)| ProductOrder {
            product_id: key.identity,
            topic_id: key.parent,
            level: key.secondary,
            order,
        })
        .collect()
}
