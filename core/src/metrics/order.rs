//! Order view: status distribution, per-day counts, peak hours.
//!
//! This view covers every order regardless of status; it is the
//! operational counterpart to the revenue-only sales view.

use crate::compare::MetricSet;
use crate::records::{OrderRecord, OrderStatus};
use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ALL_STATUSES: [OrderStatus; 4] = [
    OrderStatus::Placed,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSlice {
    pub status: OrderStatus,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: u64,
    pub completed_count: u64,
    /// Cancelled plus refunded.
    pub cancelled_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourSlice {
    pub hour: u8,
    pub order_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Present statuses only; percentages sum to 100 when any order exists.
    pub status_distribution: Vec<StatusSlice>,
    pub orders_by_day: Vec<DailyOrders>,
    /// Hours 0..=23 with at least one order, ascending.
    pub peak_hours: Vec<HourSlice>,
}

pub fn summarize(orders: &[OrderRecord]) -> OrderSummary {
    let total = orders.len() as u64;

    let mut status_counts: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, DailyOrders> = BTreeMap::new();
    let mut by_hour = [0u64; 24];

    for order in orders {
        *status_counts.entry(order.status.as_str()).or_insert(0) += 1;

        let day = by_day
            .entry(order.placed_at.date_naive())
            .or_insert_with(|| DailyOrders {
                date: order.placed_at.date_naive(),
                order_count: 0,
                completed_count: 0,
                cancelled_count: 0,
            });
        day.order_count += 1;
        match order.status {
            OrderStatus::Completed => day.completed_count += 1,
            OrderStatus::Cancelled | OrderStatus::Refunded => day.cancelled_count += 1,
            OrderStatus::Placed => {}
        }

        by_hour[order.placed_at.hour() as usize] += 1;
    }

    let status_distribution = ALL_STATUSES
        .iter()
        .filter_map(|status| {
            let count = status_counts.get(status.as_str()).copied().unwrap_or(0);
            if count == 0 {
                return None;
            }
            Some(StatusSlice {
                status: *status,
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
        })
        .collect();

    let peak_hours = by_hour
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(hour, &count)| HourSlice {
            hour: hour as u8,
            order_count: count,
        })
        .collect();

    OrderSummary {
        status_distribution,
        orders_by_day: by_day.into_values().collect(),
        peak_hours,
    }
}

impl MetricSet for OrderSummary {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        let total: u64 = self.status_distribution.iter().map(|s| s.count).sum();
        let completed = self
            .status_distribution
            .iter()
            .find(|s| s.status == OrderStatus::Completed)
            .map(|s| s.count)
            .unwrap_or(0);
        let cancelled: u64 = self
            .status_distribution
            .iter()
            .filter(|s| !s.status.is_revenue_bearing())
            .map(|s| s.count)
            .sum();
        vec![
            ("total_orders", total as f64),
            ("completed_orders", completed as f64),
            ("cancelled_orders", cancelled as f64),
        ]
    }
}
