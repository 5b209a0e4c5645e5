//! The row-fetch collaborator seam.
//!
//! Analyzers are pure functions over already-materialized records; this
//! trait is the only I/O boundary they sit behind. The SQLite store in
//! `store.rs` is the reference implementation, but anything that can
//! produce validated records (a fixture vector, another database) works.

use crate::error::AnalyticsResult;
use crate::period::AnalyticsPeriod;
use crate::records::{CustomerLifetime, OrderItemRecord, OrderRecord};
use crate::request::Scope;
use crate::types::{OrderId, Phone};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub trait OrderSource {
    /// Orders placed inside the period for the scope, in a stable
    /// (placed_at, id) order. All statuses; analyzers filter.
    fn fetch_orders(
        &self,
        scope: &Scope,
        period: &AnalyticsPeriod,
    ) -> AnalyticsResult<Vec<OrderRecord>>;

    /// Item lines for the given orders, in a stable per-order line order.
    fn fetch_order_items(
        &self,
        scope: &Scope,
        order_ids: &[OrderId],
    ) -> AnalyticsResult<Vec<OrderItemRecord>>;

    /// First-ever order timestamp per customer, across all history for the
    /// scope. Independent of any analyzed range.
    fn fetch_first_order_dates(
        &self,
        scope: &Scope,
    ) -> AnalyticsResult<BTreeMap<Phone, DateTime<Utc>>>;

    /// All-history per-customer roll-ups for the scope.
    fn fetch_customer_lifetimes(&self, scope: &Scope) -> AnalyticsResult<Vec<CustomerLifetime>>;
}
