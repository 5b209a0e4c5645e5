//! Market-basket analysis: pairwise product co-occurrence.

use crate::compare::MetricSet;
use crate::records::{OrderItemRecord, OrderRecord};
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCombination {
    /// Unordered pair, stored in ascending id order. A pair is never
    /// reported in both orientations.
    pub products: [ProductId; 2],
    /// Distinct orders containing both products.
    pub co_order_count: u64,
    pub support_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketReport {
    /// Orders with at least two distinct products; the support denominator.
    pub total_orders_analyzed: u64,
    /// Descending by co-order count, ties by product ids.
    pub combinations: Vec<ProductCombination>,
}

/// Count unordered product pairs across orders. Pairs below `min_count`
/// co-orders are dropped; 0 is treated as the default threshold of 1.
pub fn analyze(
    orders: &[OrderRecord],
    items: &[OrderItemRecord],
    min_count: u64,
) -> BasketReport {
    let min_count = min_count.max(1);

    let eligible: HashSet<&str> = orders
        .iter()
        .filter(|o| o.status.is_revenue_bearing())
        .map(|o| o.id.as_str())
        .collect();

    // Distinct product set per order; duplicate lines of one product
    // collapse here.
    let mut baskets: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for item in items {
        if eligible.contains(item.order_id.as_str()) {
            baskets
                .entry(item.order_id.as_str())
                .or_default()
                .insert(item.product_id.as_str());
        }
    }

    let mut total_orders_analyzed = 0u64;
    let mut pair_counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for basket in baskets.values() {
        if basket.len() < 2 {
            continue;
        }
        total_orders_analyzed += 1;
        let products: Vec<&str> = basket.iter().copied().collect();
        for i in 0..products.len() {
            for j in (i + 1)..products.len() {
                *pair_counts.entry((products[i], products[j])).or_insert(0) += 1;
            }
        }
    }

    let mut combinations: Vec<ProductCombination> = pair_counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|((a, b), co_order_count)| ProductCombination {
            products: [a.to_string(), b.to_string()],
            co_order_count,
            support_rate: if total_orders_analyzed > 0 {
                co_order_count as f64 / total_orders_analyzed as f64
            } else {
                0.0
            },
        })
        .collect();
    // Stable sort on top of the map's id order keeps ties deterministic.
    combinations.sort_by(|a, b| b.co_order_count.cmp(&a.co_order_count));

    BasketReport {
        total_orders_analyzed,
        combinations,
    }
}

impl MetricSet for BasketReport {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            (
                "total_orders_analyzed",
                self.total_orders_analyzed as f64,
            ),
            ("combination_count", self.combinations.len() as f64),
        ]
    }
}
