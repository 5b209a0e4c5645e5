//! Sales view: revenue totals, average order value, per-day buckets.
//!
//! Only revenue-bearing orders count here; cancelled and refunded orders
//! show up in the order view's status distribution instead.

use crate::compare::MetricSet;
use crate::records::OrderRecord;
use crate::types::BranchId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
    pub order_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub order_count: u64,
    pub avg_order_value: f64,
    /// Ascending by date. Days without orders are omitted, not zero-filled.
    pub revenue_by_day: Vec<DailyRevenue>,
}

/// Per-branch share of a brand-scope row set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRevenue {
    pub branch_id: BranchId,
    pub revenue: f64,
    pub order_count: u64,
}

pub fn summarize(orders: &[OrderRecord]) -> SalesSummary {
    let mut total_revenue = 0.0;
    let mut order_count = 0u64;
    let mut by_day: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();

    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        total_revenue += order.total_amount;
        order_count += 1;
        let bucket = by_day.entry(order.placed_at.date_naive()).or_insert((0.0, 0));
        bucket.0 += order.total_amount;
        bucket.1 += 1;
    }

    let avg_order_value = total_revenue / order_count.max(1) as f64;

    SalesSummary {
        total_revenue,
        order_count,
        avg_order_value,
        revenue_by_day: by_day
            .into_iter()
            .map(|(date, (revenue, count))| DailyRevenue {
                date,
                revenue,
                order_count: count,
            })
            .collect(),
    }
}

/// Revenue per branch, descending, ties broken by branch id.
pub fn branch_rollup(orders: &[OrderRecord]) -> Vec<BranchRevenue> {
    let mut by_branch: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        let bucket = by_branch.entry(order.branch_id.as_str()).or_insert((0.0, 0));
        bucket.0 += order.total_amount;
        bucket.1 += 1;
    }

    let mut rollup: Vec<BranchRevenue> = by_branch
        .into_iter()
        .map(|(branch_id, (revenue, order_count))| BranchRevenue {
            branch_id: branch_id.to_string(),
            revenue,
            order_count,
        })
        .collect();
    rollup.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.branch_id.cmp(&b.branch_id))
    });
    rollup
}

impl MetricSet for SalesSummary {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("total_revenue", self.total_revenue),
            ("order_count", self.order_count as f64),
            ("avg_order_value", self.avg_order_value),
        ]
    }
}
