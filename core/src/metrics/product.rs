//! Product view: revenue ranking and inventory turnover.

use crate::compare::MetricSet;
use crate::period::AnalyticsPeriod;
use crate::records::OrderItemRecord;
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const TOP_PRODUCT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub revenue: f64,
    pub revenue_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTurnover {
    /// Mean of sold quantity / average stock over products with a positive
    /// stock figure. 0 when no product has stock data.
    pub average_turnover_rate: f64,
    pub period_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub top_products: Vec<ProductSales>,
    pub sales_by_product: Vec<ProductSales>,
    pub inventory_turnover: InventoryTurnover,
}

/// Aggregate item lines per product. `stock_levels` maps product id to the
/// period's average stock quantity; products without an entry are skipped by
/// the turnover figure.
pub fn summarize(
    items: &[OrderItemRecord],
    stock_levels: &BTreeMap<ProductId, f64>,
    period: &AnalyticsPeriod,
) -> ProductSummary {
    // Aggregate in first-seen order so that revenue ties keep the original
    // row order after the stable sort below.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<ProductSales> = Vec::new();
    for item in items {
        match index.get(item.product_id.as_str()) {
            Some(&i) => {
                rows[i].quantity += item.quantity;
                rows[i].revenue += item.revenue();
            }
            None => {
                index.insert(item.product_id.as_str(), rows.len());
                rows.push(ProductSales {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    revenue: item.revenue(),
                    revenue_percentage: 0.0,
                });
            }
        }
    }

    let total_revenue: f64 = rows.iter().map(|r| r.revenue).sum();
    for row in &mut rows {
        row.revenue_percentage = if total_revenue > 0.0 {
            row.revenue / total_revenue * 100.0
        } else {
            0.0
        };
    }

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

    let sold: HashMap<&str, u64> = rows
        .iter()
        .map(|r| (r.product_id.as_str(), r.quantity))
        .collect();
    let mut rate_sum = 0.0;
    let mut rated = 0u64;
    for (product_id, stock) in stock_levels {
        if *stock > 0.0 {
            let sold_qty = sold.get(product_id.as_str()).copied().unwrap_or(0);
            rate_sum += sold_qty as f64 / stock;
            rated += 1;
        }
    }
    let average_turnover_rate = if rated > 0 {
        rate_sum / rated as f64
    } else {
        0.0
    };

    ProductSummary {
        top_products: rows.iter().take(TOP_PRODUCT_LIMIT).cloned().collect(),
        sales_by_product: rows,
        inventory_turnover: InventoryTurnover {
            average_turnover_rate,
            period_days: period.day_count(),
        },
    }
}

impl MetricSet for ProductSummary {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        let total_quantity: u64 = self.sales_by_product.iter().map(|p| p.quantity).sum();
        vec![
            ("distinct_products", self.sales_by_product.len() as f64),
            ("total_quantity", total_quantity as f64),
            (
                "average_turnover_rate",
                self.inventory_turnover.average_turnover_rate,
            ),
        ]
    }
}
