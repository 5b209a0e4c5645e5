//! RFM segmentation: recency, frequency, monetary quintile scoring.
//!
//! Scores are relative to the analyzed population, not absolute cutoffs,
//! so a small shop and a large brand both spread across the 1..=5 range.
//! The recency anchor is the period end date, never the wall clock.

use crate::compare::MetricSet;
use crate::period::AnalyticsPeriod;
use crate::records::OrderRecord;
use crate::types::Phone;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RfmSegment {
    Champions,
    Loyal,
    Potential,
    New,
    AtRisk,
    Lost,
}

pub const ALL_SEGMENTS: [RfmSegment; 6] = [
    RfmSegment::Champions,
    RfmSegment::Loyal,
    RfmSegment::Potential,
    RfmSegment::New,
    RfmSegment::AtRisk,
    RfmSegment::Lost,
];

impl RfmSegment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Champions => "Champions",
            Self::Loyal => "Loyal",
            Self::Potential => "Potential",
            Self::New => "New",
            Self::AtRisk => "At Risk",
            Self::Lost => "Lost",
        }
    }

    /// Rule table, first match wins. Total: every score triple lands
    /// somewhere.
    fn classify(r: u8, f: u8, m: u8) -> Self {
        if r >= 4 && f >= 4 && m >= 4 {
            Self::Champions
        } else if f >= 4 {
            Self::Loyal
        } else if r >= 3 && f >= 2 {
            Self::Potential
        } else if r >= 4 && f <= 2 {
            Self::New
        } else if r <= 2 && f >= 3 {
            Self::AtRisk
        } else {
            Self::Lost
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfmCustomer {
    pub customer_phone: Phone,
    /// Days between the last in-range order and the period end.
    pub recency: i64,
    pub frequency: u64,
    pub monetary: f64,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    /// `"R-F-M"`, e.g. `"5-4-5"`.
    pub rfm_score: String,
    pub segment: RfmSegment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: RfmSegment,
    pub customer_count: u64,
    pub avg_recency: f64,
    pub avg_frequency: f64,
    pub avg_monetary: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfmReport {
    /// Ascending by phone.
    pub customers: Vec<RfmCustomer>,
    /// Present segments only, in rule-table order.
    pub summary: Vec<SegmentSummary>,
}

struct RawRfm {
    phone: Phone,
    recency: i64,
    frequency: u64,
    monetary: f64,
}

/// Score every customer with at least one revenue-bearing order in range.
pub fn segment(orders: &[OrderRecord], period: &AnalyticsPeriod) -> RfmReport {
    let mut per_customer: BTreeMap<&str, (chrono::NaiveDate, u64, f64)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        let date = order.placed_at.date_naive();
        let entry = per_customer
            .entry(order.customer_phone.as_str())
            .or_insert((date, 0, 0.0));
        entry.0 = entry.0.max(date);
        entry.1 += 1;
        entry.2 += order.total_amount;
    }

    let raws: Vec<RawRfm> = per_customer
        .into_iter()
        .map(|(phone, (last_date, frequency, monetary))| RawRfm {
            phone: phone.to_string(),
            recency: (period.end - last_date).num_days(),
            frequency,
            monetary,
        })
        .collect();

    // Rank 1 is the worst customer on each dimension: most days since the
    // last order, fewest orders, least spend. Ties break on ascending phone
    // so scoring is reproducible.
    let r_scores = quintile_scores(&raws, |a, b| {
        b.recency.cmp(&a.recency).then_with(|| a.phone.cmp(&b.phone))
    });
    let f_scores = quintile_scores(&raws, |a, b| {
        a.frequency
            .cmp(&b.frequency)
            .then_with(|| a.phone.cmp(&b.phone))
    });
    let m_scores = quintile_scores(&raws, |a, b| {
        a.monetary
            .total_cmp(&b.monetary)
            .then_with(|| a.phone.cmp(&b.phone))
    });

    let customers: Vec<RfmCustomer> = raws
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let (r, f, m) = (r_scores[i], f_scores[i], m_scores[i]);
            RfmCustomer {
                customer_phone: raw.phone,
                recency: raw.recency,
                frequency: raw.frequency,
                monetary: raw.monetary,
                recency_score: r,
                frequency_score: f,
                monetary_score: m,
                rfm_score: format!("{r}-{f}-{m}"),
                segment: RfmSegment::classify(r, f, m),
            }
        })
        .collect();

    let summary = summarize_segments(&customers);

    RfmReport { customers, summary }
}

/// Positional quintile: `score = ceil(rank * 5 / n)` with rank 1 for the
/// first element of the comparator's order. A population of one scores 5.
fn quintile_scores<F>(raws: &[RawRfm], compare: F) -> Vec<u8>
where
    F: Fn(&RawRfm, &RawRfm) -> Ordering,
{
    let n = raws.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare(&raws[a], &raws[b]));

    let mut scores = vec![0u8; n];
    for (pos, &i) in order.iter().enumerate() {
        scores[i] = (((pos + 1) * 5).div_ceil(n)) as u8;
    }
    scores
}

fn summarize_segments(customers: &[RfmCustomer]) -> Vec<SegmentSummary> {
    let mut acc: BTreeMap<usize, (u64, f64, f64, f64)> = BTreeMap::new();
    for customer in customers {
        let slot = ALL_SEGMENTS
            .iter()
            .position(|s| *s == customer.segment)
            .unwrap_or(ALL_SEGMENTS.len() - 1);
        let entry = acc.entry(slot).or_insert((0, 0.0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += customer.recency as f64;
        entry.2 += customer.frequency as f64;
        entry.3 += customer.monetary;
    }

    acc.into_iter()
        .map(|(slot, (count, r_sum, f_sum, m_sum))| SegmentSummary {
            segment: ALL_SEGMENTS[slot],
            customer_count: count,
            avg_recency: r_sum / count as f64,
            avg_frequency: f_sum / count as f64,
            avg_monetary: m_sum / count as f64,
        })
        .collect()
}

impl MetricSet for RfmReport {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        let champions = self
            .summary
            .iter()
            .find(|s| s.segment == RfmSegment::Champions)
            .map(|s| s.customer_count)
            .unwrap_or(0);
        let monetary_sum: f64 = self.customers.iter().map(|c| c.monetary).sum();
        let avg_monetary = if self.customers.is_empty() {
            0.0
        } else {
            monetary_sum / self.customers.len() as f64
        };
        vec![
            ("customers", self.customers.len() as f64),
            ("champions", champions as f64),
            ("avg_monetary", avg_monetary),
        ]
    }
}
