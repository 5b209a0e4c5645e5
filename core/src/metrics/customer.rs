//! Customer view: population counts, lifetime value, repeat behavior.
//!
//! Needs two inputs: the in-range orders and the all-history lifetime
//! roll-ups, because `total_customers` and CLV reach beyond the analyzed
//! range by definition.

use crate::compare::MetricSet;
use crate::period::AnalyticsPeriod;
use crate::records::{CustomerLifetime, OrderRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Distinct customers across all history for the scope.
    pub total_customers: u64,
    /// Customers whose first-ever order falls inside the range.
    pub new_customers: u64,
    /// Customers with two or more orders inside the range.
    pub returning_customers: u64,
    /// Mean lifetime spend per customer.
    pub customer_lifetime_value: f64,
    pub repeat_customer_rate: f64,
    pub avg_orders_per_customer: f64,
}

pub fn summarize(
    orders: &[OrderRecord],
    lifetimes: &[CustomerLifetime],
    period: &AnalyticsPeriod,
) -> CustomerSummary {
    let total_customers = lifetimes.len() as u64;
    let new_customers = lifetimes
        .iter()
        .filter(|c| period.contains(c.first_order_at.date_naive()))
        .count() as u64;

    let mut in_range_counts: HashMap<&str, u64> = HashMap::new();
    for order in orders {
        *in_range_counts
            .entry(order.customer_phone.as_str())
            .or_insert(0) += 1;
    }
    let returning_customers = in_range_counts.values().filter(|&&n| n >= 2).count() as u64;
    let active_customers = in_range_counts.len() as u64;

    let lifetime_spend: f64 = lifetimes.iter().map(|c| c.total_spend).sum();
    let customer_lifetime_value = if total_customers > 0 {
        lifetime_spend / total_customers as f64
    } else {
        0.0
    };
    let repeat_customer_rate = if total_customers > 0 {
        returning_customers as f64 / total_customers as f64 * 100.0
    } else {
        0.0
    };
    let avg_orders_per_customer = if active_customers > 0 {
        orders.len() as f64 / active_customers as f64
    } else {
        0.0
    };

    CustomerSummary {
        total_customers,
        new_customers,
        returning_customers,
        customer_lifetime_value,
        repeat_customer_rate,
        avg_orders_per_customer,
    }
}

impl MetricSet for CustomerSummary {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("total_customers", self.total_customers as f64),
            ("new_customers", self.new_customers as f64),
            ("returning_customers", self.returning_customers as f64),
            (
                "customer_lifetime_value",
                self.customer_lifetime_value,
            ),
            ("repeat_customer_rate", self.repeat_customer_rate),
            ("avg_orders_per_customer", self.avg_orders_per_customer),
        ]
    }
}
