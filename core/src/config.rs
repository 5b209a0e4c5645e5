use serde::{Deserialize, Serialize};

use crate::types::BranchId;

/// One product in the seeded catalog. `popularity` is a relative pick
/// weight; `avg_stock` feeds the inventory turnover figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub popularity: f64,
    pub avg_stock: f64,
}

/// Shape of a seeded demo dataset. Everything the generator rolls is
/// driven by this profile plus the seed, so a profile + seed + anchor date
/// triple always produces the same rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProfile {
    pub branches: Vec<BranchId>,
    pub products: Vec<ProductSpec>,
    pub customers_per_branch: u64,
    /// Days of history to generate, ending at the anchor date.
    pub days: i64,
    /// Mean orders per branch per day.
    pub orders_per_day: f64,
    pub max_items_per_order: u64,
    pub cancel_rate: f64,
    pub refund_rate: f64,
    /// Multiplier on weekend order volume.
    pub weekend_boost: f64,
    /// Probability an order comes from the loyal third of the roster.
    pub repeat_customer_share: f64,
}

impl SeedProfile {
    /// Load a profile from a JSON file.
    /// In tests and the demo runner, use SeedProfile::default_demo().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let profile: SeedProfile = serde_json::from_str(&content)?;
        Ok(profile)
    }

    /// Hardcoded cafe-chain profile used by tests and the demo runner.
    pub fn default_demo() -> Self {
        Self {
            branches: vec![
                "downtown".to_string(),
                "riverside".to_string(),
                "airport".to_string(),
            ],
            products: vec![
                ProductSpec::new("p-espresso", "Espresso", 3.00, 9.0, 400.0),
                ProductSpec::new("p-latte", "Latte", 4.50, 10.0, 350.0),
                ProductSpec::new("p-cappuccino", "Cappuccino", 4.20, 7.0, 300.0),
                ProductSpec::new("p-coldbrew", "Cold Brew", 4.80, 6.0, 250.0),
                ProductSpec::new("p-tea", "House Tea", 2.80, 4.0, 200.0),
                ProductSpec::new("p-croissant", "Butter Croissant", 3.40, 8.0, 150.0),
                ProductSpec::new("p-bagel", "Sesame Bagel", 2.90, 5.0, 120.0),
                ProductSpec::new("p-muffin", "Blueberry Muffin", 3.10, 5.0, 140.0),
                ProductSpec::new("p-sandwich", "Club Sandwich", 7.50, 6.0, 100.0),
                ProductSpec::new("p-cookie", "Oat Cookie", 2.20, 4.0, 180.0),
                ProductSpec::new("p-juice", "Orange Juice", 3.60, 3.0, 90.0),
                ProductSpec::new("p-brownie", "Fudge Brownie", 3.30, 3.0, 110.0),
            ],
            customers_per_branch: 120,
            days: 70,
            orders_per_day: 40.0,
            max_items_per_order: 4,
            cancel_rate: 0.05,
            refund_rate: 0.02,
            weekend_boost: 1.4,
            repeat_customer_share: 0.6,
        }
    }
}

impl ProductSpec {
    fn new(product_id: &str, name: &str, price: f64, popularity: f64, avg_stock: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            name: name.to_string(),
            price,
            popularity,
            avg_stock,
        }
    }
}
