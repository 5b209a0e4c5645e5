//! Validated input records.
//!
//! RULE: analyzers never see raw rows. Every record is constructed and
//! validated once at the fetch boundary (status text, timestamps), so the
//! aggregation code can assume well-formed data.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{BranchId, OrderId, Phone, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn parse(value: &str) -> AnalyticsResult<Self> {
        match value {
            "placed" => Ok(Self::Placed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(AnalyticsError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Cancelled and refunded orders carry no revenue.
    pub fn is_revenue_bearing(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Refunded)
    }
}

/// One placed order, flattened for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub branch_id: BranchId,
    pub customer_phone: Phone,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: f64,
}

/// One line of an order. Many per order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub unit_price: f64,
}

impl OrderItemRecord {
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// All-history roll-up for one customer, supplied by the row source.
/// `total_spend` covers revenue-bearing orders only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerLifetime {
    pub phone: Phone,
    pub first_order_at: DateTime<Utc>,
    pub order_count: u64,
    pub total_spend: f64,
}

/// Parse an RFC 3339 timestamp as stored by the backend.
pub fn parse_timestamp(value: &str) -> AnalyticsResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AnalyticsError::InvalidTimestamp {
            value: value.to_string(),
            source: e,
        })
}
