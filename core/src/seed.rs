//! Deterministic demo-data generation.
//!
//! RULE: the analyzers themselves are randomness-free; the only RNG in the
//! crate lives here, behind a single seeded stream. Same seed + profile +
//! anchor date = byte-identical dataset, which is what the integration
//! tests and the demo runner rely on.

use crate::config::SeedProfile;
use crate::error::AnalyticsResult;
use crate::records::{OrderItemRecord, OrderRecord, OrderStatus};
use crate::store::OrderStore;
use crate::types::{Phone, ProductId};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative order volume per hour of day, 0..=23. Cafe curve: morning and
/// lunch peaks, a smaller afternoon bump, quiet nights.
const HOUR_WEIGHTS: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.2, 1.0, 4.0, 6.0, 5.0, 3.0, 4.5, 7.0, 6.0, 3.0, 3.5, 3.0, 2.0,
    1.5, 1.0, 0.8, 0.5, 0.2, 0.1,
];

/// The seeded RNG stream behind all demo-data rolls.
pub struct SeedRng {
    inner: Pcg64Mcg,
}

impl SeedRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample from a simplified Pareto distribution.
    /// x_min: minimum value, alpha: shape parameter (higher = less skewed).
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedStats {
    pub orders: u64,
    pub items: u64,
    pub customers: u64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Generate `profile.days` days of orders ending at `anchor` and insert
/// them into the store.
pub fn seed_store(
    store: &OrderStore,
    profile: &SeedProfile,
    seed: u64,
    anchor: NaiveDate,
) -> AnalyticsResult<SeedStats> {
    let mut rng = SeedRng::new(seed);

    // Stable phone roster: one slice per branch, numbered consecutively so
    // reruns with the same profile reuse the same identities.
    let roster: Vec<Vec<Phone>> = (0..profile.branches.len())
        .map(|branch_index| {
            (0..profile.customers_per_branch)
                .map(|i| {
                    format!(
                        "555-{:04}",
                        branch_index as u64 * profile.customers_per_branch + i
                    )
                })
                .collect()
        })
        .collect();

    let popularity: Vec<f64> = profile.products.iter().map(|p| p.popularity).collect();

    let first_date = anchor - Duration::days(profile.days.max(1) - 1);
    let mut order_counter = 0u64;
    let mut item_counter = 0u64;

    for day_index in 0..profile.days.max(1) {
        let date = first_date + Duration::days(day_index);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let volume_factor = if weekend { profile.weekend_boost } else { 1.0 };

        for (branch_index, branch_id) in profile.branches.iter().enumerate() {
            let target = profile.orders_per_day * volume_factor;
            let order_count = (target * (0.75 + 0.5 * rng.next_f64())).floor() as u64;

            for _ in 0..order_count {
                let phone = pick_customer(&mut rng, &roster, branch_index, profile);
                let hour = weighted_pick(&mut rng, &HOUR_WEIGHTS) as u32;
                let minute = rng.next_u64_below(60) as u32;
                let placed_at = at_time(date, hour, minute);

                order_counter += 1;
                let order_id = format!("ord-{order_counter:08}");

                // Line picks may repeat a product; repeated picks merge
                // into one line with a higher quantity.
                let line_count = 1 + rng.next_u64_below(profile.max_items_per_order.max(1));
                let mut lines: BTreeMap<usize, u64> = BTreeMap::new();
                for _ in 0..line_count {
                    let product_index = weighted_pick(&mut rng, &popularity);
                    let quantity = 1 + ((rng.pareto(1.0, 3.0) - 1.0).floor() as u64).min(3);
                    *lines.entry(product_index).or_insert(0) += quantity;
                }

                let mut total_amount = 0.0;
                let mut items = Vec::with_capacity(lines.len());
                for (product_index, quantity) in lines {
                    let product = &profile.products[product_index];
                    total_amount += quantity as f64 * product.price;
                    items.push(OrderItemRecord {
                        order_id: order_id.clone(),
                        product_id: product.product_id.clone(),
                        product_name: product.name.clone(),
                        quantity,
                        unit_price: product.price,
                    });
                }

                let status = if rng.chance(profile.cancel_rate) {
                    OrderStatus::Cancelled
                } else if rng.chance(profile.refund_rate) {
                    OrderStatus::Refunded
                } else if rng.chance(0.08) {
                    OrderStatus::Placed
                } else {
                    OrderStatus::Completed
                };

                store.insert_order(&OrderRecord {
                    id: order_id,
                    branch_id: branch_id.clone(),
                    customer_phone: phone,
                    placed_at,
                    status,
                    total_amount,
                })?;
                for item in &items {
                    store.insert_order_item(item)?;
                    item_counter += 1;
                }
            }
        }
    }

    Ok(SeedStats {
        orders: order_counter,
        items: item_counter,
        customers: store.customer_count()? as u64,
        first_date,
        last_date: anchor,
    })
}

/// Average stock per product, as the turnover input expects it.
pub fn stock_levels(profile: &SeedProfile) -> BTreeMap<ProductId, f64> {
    profile
        .products
        .iter()
        .map(|p| (p.product_id.clone(), p.avg_stock))
        .collect()
}

fn pick_customer(
    rng: &mut SeedRng,
    roster: &[Vec<Phone>],
    branch_index: usize,
    profile: &SeedProfile,
) -> Phone {
    // A small share of orders comes from customers of other branches.
    let pool = if roster.len() > 1 && rng.chance(0.1) {
        &roster[rng.next_u64_below(roster.len() as u64) as usize]
    } else {
        &roster[branch_index]
    };
    // The loyal third of the roster places most repeat orders.
    let index = if rng.chance(profile.repeat_customer_share) {
        rng.next_u64_below((pool.len() as u64 / 3).max(1))
    } else {
        rng.next_u64_below(pool.len() as u64)
    };
    pool[index as usize].clone()
}

fn weighted_pick(rng: &mut SeedRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.next_f64() * total;
    for (i, weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll < 0.0 {
            return i;
        }
    }
    weights.len() - 1
}

fn at_time(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    NaiveDateTime::new(date, time).and_utc()
}
