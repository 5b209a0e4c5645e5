//! The analytics engine: one façade over every report.
//!
//! EXECUTION ORDER (fixed for every report):
//!   1. Validate the scope (empty tenant identifiers fail fast).
//!   2. Resolve the date range against the request's `as_of` anchor.
//!   3. Fetch records through the `OrderSource` seam.
//!   4. Run the pure analyzer.
//!   5. When comparison is requested, repeat 3 and 4 for the previous
//!      period of equal length and diff the metric sets.
//!
//! RULES:
//!   - Caller-input errors surface before any fetch or aggregation.
//!   - Empty data never errors; every analyzer degrades to empty output.
//!   - Nothing here reads the wall clock or rolls randomness.

use crate::abc::{self, AbcReport};
use crate::basket::{self, BasketReport};
use crate::cohort::{self, CohortReport};
use crate::compare::{AnalyticsView, MetricSet};
use crate::error::AnalyticsResult;
use crate::hourly::{self, HourlyDemandReport};
use crate::metrics::customer::{self, CustomerSummary};
use crate::metrics::order::{self, OrderSummary};
use crate::metrics::product::{self, ProductSummary};
use crate::metrics::sales::{self, BranchRevenue, SalesSummary};
use crate::period::{AnalyticsPeriod, Granularity};
use crate::records::{OrderItemRecord, OrderRecord};
use crate::request::AnalyticsRequest;
use crate::rfm::{self, RfmReport};
use crate::source::OrderSource;
use crate::types::{OrderId, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the overview screen needs in one call, always for the
/// current period only. One roll-up row per branch in scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub period: AnalyticsPeriod,
    pub sales: SalesSummary,
    pub products: ProductSummary,
    pub orders: OrderSummary,
    pub customers: CustomerSummary,
    pub abc: AbcReport,
    pub by_branch: Vec<BranchRevenue>,
}

pub struct AnalyticsEngine<S: OrderSource> {
    source: S,
}

impl<S: OrderSource> AnalyticsEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validate the request and resolve its period. Every report starts
    /// here so bad input never reaches a fetch.
    fn resolve(&self, request: &AnalyticsRequest) -> AnalyticsResult<AnalyticsPeriod> {
        request.scope.validate()?;
        AnalyticsPeriod::resolve(
            request.start_date.as_deref(),
            request.end_date.as_deref(),
            request.as_of,
        )
    }

    /// Item lines for the revenue-bearing orders of the set.
    fn revenue_items(
        &self,
        request: &AnalyticsRequest,
        orders: &[OrderRecord],
    ) -> AnalyticsResult<Vec<OrderItemRecord>> {
        let ids: Vec<OrderId> = orders
            .iter()
            .filter(|o| o.status.is_revenue_bearing())
            .map(|o| o.id.clone())
            .collect();
        self.source.fetch_order_items(&request.scope, &ids)
    }

    /// Run `build` for the current period, and again for the previous
    /// period when the request asks for a comparison.
    fn build_view<T, F>(
        &self,
        request: &AnalyticsRequest,
        period: AnalyticsPeriod,
        build: F,
    ) -> AnalyticsResult<AnalyticsView<T>>
    where
        T: MetricSet,
        F: Fn(&AnalyticsPeriod) -> AnalyticsResult<T>,
    {
        let current = build(&period)?;
        if !request.compare {
            return Ok(AnalyticsView::single(current));
        }
        let previous = build(&period.previous())?;
        Ok(AnalyticsView::comparison(current, previous))
    }

    pub fn sales_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<SalesSummary>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            log::debug!("sales report: {} orders in {}..{}", orders.len(), p.start, p.end);
            Ok(sales::summarize(&orders))
        })
    }

    pub fn product_report(
        &self,
        request: &AnalyticsRequest,
        stock_levels: &BTreeMap<ProductId, f64>,
    ) -> AnalyticsResult<AnalyticsView<ProductSummary>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            let items = self.revenue_items(request, &orders)?;
            Ok(product::summarize(&items, stock_levels, p))
        })
    }

    pub fn order_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<OrderSummary>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            Ok(order::summarize(&orders))
        })
    }

    pub fn customer_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<CustomerSummary>> {
        let period = self.resolve(request)?;
        // All-history roll-ups serve both periods of a comparison.
        let lifetimes = self.source.fetch_customer_lifetimes(&request.scope)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            Ok(customer::summarize(&orders, &lifetimes, p))
        })
    }

    pub fn abc_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<AbcReport>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            let items = self.revenue_items(request, &orders)?;
            Ok(abc::classify(&items))
        })
    }

    pub fn hourly_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<HourlyDemandReport>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            let items = self.revenue_items(request, &orders)?;
            Ok(hourly::analyze(&orders, &items))
        })
    }

    pub fn basket_report(
        &self,
        request: &AnalyticsRequest,
        min_count: u64,
    ) -> AnalyticsResult<AnalyticsView<BasketReport>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            let items = self.revenue_items(request, &orders)?;
            Ok(basket::analyze(&orders, &items, min_count))
        })
    }

    pub fn cohort_report(
        &self,
        request: &AnalyticsRequest,
        granularity: Granularity,
    ) -> AnalyticsResult<AnalyticsView<CohortReport>> {
        let period = self.resolve(request)?;
        // First-order dates are all-history; shared across both periods.
        let first_orders = self.source.fetch_first_order_dates(&request.scope)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            Ok(cohort::analyze(&orders, &first_orders, p, granularity))
        })
    }

    pub fn rfm_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsView<RfmReport>> {
        let period = self.resolve(request)?;
        self.build_view(request, period, |p| {
            let orders = self.source.fetch_orders(&request.scope, p)?;
            Ok(rfm::segment(&orders, p))
        })
    }

    /// One fetch, every overview analyzer. Ignores the compare flag.
    pub fn dashboard(
        &self,
        request: &AnalyticsRequest,
        stock_levels: &BTreeMap<ProductId, f64>,
    ) -> AnalyticsResult<DashboardReport> {
        let period = self.resolve(request)?;
        let orders = self.source.fetch_orders(&request.scope, &period)?;
        let items = self.revenue_items(request, &orders)?;
        let lifetimes = self.source.fetch_customer_lifetimes(&request.scope)?;

        log::info!(
            "dashboard: {} orders, {} item lines, {} customers in {}..{}",
            orders.len(),
            items.len(),
            lifetimes.len(),
            period.start,
            period.end
        );

        Ok(DashboardReport {
            period,
            sales: sales::summarize(&orders),
            products: product::summarize(&items, stock_levels, &period),
            orders: order::summarize(&orders),
            customers: customer::summarize(&orders, &lifetimes, &period),
            abc: abc::classify(&items),
            by_branch: sales::branch_rollup(&orders),
        })
    }
}
