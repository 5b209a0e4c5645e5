//! Cohort retention: first-order cohorts tracked across period offsets.

use crate::compare::MetricSet;
use crate::period::{AnalyticsPeriod, Granularity};
use crate::records::OrderRecord;
use crate::types::Phone;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionPoint {
    /// Bucket offset from the cohort start. Offset 0 is the cohort bucket
    /// itself and always reports 100%.
    pub period: u32,
    pub active_customers: u64,
    pub retention_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortRow {
    pub cohort_key: String,
    pub cohort_size: u64,
    /// One point per offset up to the bucket containing the range end.
    /// Quiet buckets inside that horizon appear as explicit zeros; nothing
    /// is padded beyond it, so later cohorts have shorter arrays.
    pub retention: Vec<RetentionPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortReport {
    pub granularity: Granularity,
    /// Ascending by cohort key.
    pub cohorts: Vec<CohortRow>,
}

/// Build retention rows for cohorts whose bucket falls inside the analyzed
/// range. Cohort membership comes from the all-history first-order map;
/// activity comes from the in-range orders.
pub fn analyze(
    orders: &[OrderRecord],
    first_orders: &BTreeMap<Phone, DateTime<Utc>>,
    period: &AnalyticsPeriod,
    granularity: Granularity,
) -> CohortReport {
    let start_bucket = granularity.bucket_of(period.start);
    let end_bucket = granularity.bucket_of(period.end);

    let mut members: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
    for (phone, first_at) in first_orders {
        let first_date = first_at.date_naive();
        if first_date > period.end {
            continue;
        }
        let bucket = granularity.bucket_of(first_date);
        if bucket >= start_bucket && bucket <= end_bucket {
            members.entry(bucket).or_default().push(phone.as_str());
        }
    }

    let mut activity: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    for order in orders {
        activity
            .entry(order.customer_phone.as_str())
            .or_default()
            .insert(granularity.bucket_of(order.placed_at.date_naive()));
    }

    let empty = BTreeSet::new();
    let cohorts = members
        .into_iter()
        .map(|(bucket, phones)| {
            let cohort_size = phones.len() as u64;
            let max_offset = granularity.offset_between(bucket, end_bucket);

            let mut retention = Vec::with_capacity(max_offset as usize + 1);
            for offset in 0..=max_offset {
                let (active_customers, retention_rate) = if offset == 0 {
                    (cohort_size, 100.0)
                } else {
                    let target = granularity.advance(bucket, offset as u32);
                    let active = phones
                        .iter()
                        .filter(|phone| {
                            activity
                                .get(*phone)
                                .unwrap_or(&empty)
                                .contains(&target)
                        })
                        .count() as u64;
                    (active, active as f64 / cohort_size as f64 * 100.0)
                };
                retention.push(RetentionPoint {
                    period: offset as u32,
                    active_customers,
                    retention_rate,
                });
            }

            CohortRow {
                cohort_key: granularity.key_of(bucket),
                cohort_size,
                retention,
            }
        })
        .collect();

    CohortReport {
        granularity,
        cohorts,
    }
}

impl MetricSet for CohortReport {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        let total_members: u64 = self.cohorts.iter().map(|c| c.cohort_size).sum();
        vec![
            ("cohort_count", self.cohorts.len() as f64),
            ("cohort_customers", total_members as f64),
        ]
    }
}
