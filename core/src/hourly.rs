//! Hourly demand: top products per hour of day.

use crate::compare::MetricSet;
use crate::records::{OrderItemRecord, OrderRecord};
use crate::types::ProductId;
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const HOURLY_TOP_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyDemand {
    pub hour: u8,
    pub total_orders: u64,
    /// Top products by quantity; ties broken by revenue, then by first-seen
    /// row order.
    pub top_products: Vec<HourlyProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyDemandReport {
    /// Ascending by hour. Hours without orders are omitted.
    pub hourly_data: Vec<HourlyDemand>,
}

pub fn analyze(orders: &[OrderRecord], items: &[OrderItemRecord]) -> HourlyDemandReport {
    let mut order_hours: HashMap<&str, usize> = HashMap::new();
    let mut order_counts = [0u64; 24];
    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        let hour = order.placed_at.hour() as usize;
        order_hours.insert(order.id.as_str(), hour);
        order_counts[hour] += 1;
    }

    let mut rows: Vec<Vec<HourlyProduct>> = vec![Vec::new(); 24];
    let mut indices: Vec<HashMap<&str, usize>> = vec![HashMap::new(); 24];
    for item in items {
        // Items whose parent order is cancelled or out of the fetched set
        // never reach the ranking.
        let Some(&hour) = order_hours.get(item.order_id.as_str()) else {
            continue;
        };
        match indices[hour].get(item.product_id.as_str()) {
            Some(&i) => {
                rows[hour][i].quantity += item.quantity;
                rows[hour][i].revenue += item.revenue();
            }
            None => {
                indices[hour].insert(item.product_id.as_str(), rows[hour].len());
                rows[hour].push(HourlyProduct {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    revenue: item.revenue(),
                });
            }
        }
    }

    let hourly_data = (0..24)
        .filter(|&hour| order_counts[hour] > 0)
        .map(|hour| {
            let mut products = std::mem::take(&mut rows[hour]);
            products.sort_by(|a, b| {
                b.quantity
                    .cmp(&a.quantity)
                    .then(b.revenue.total_cmp(&a.revenue))
            });
            products.truncate(HOURLY_TOP_LIMIT);
            HourlyDemand {
                hour: hour as u8,
                total_orders: order_counts[hour],
                top_products: products,
            }
        })
        .collect();

    HourlyDemandReport { hourly_data }
}

impl MetricSet for HourlyDemandReport {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        let busiest = self
            .hourly_data
            .iter()
            .map(|h| h.total_orders)
            .max()
            .unwrap_or(0);
        vec![
            ("active_hours", self.hourly_data.len() as f64),
            ("busiest_hour_orders", busiest as f64),
        ]
    }
}
