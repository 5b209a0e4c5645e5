//! Current-vs-previous period comparison.
//!
//! Every report DTO exposes its numeric leaf metrics through [`MetricSet`];
//! the comparator zips the current and previous values into a percentage
//! change map. A zero previous value never produces `Infinity` or `NaN`:
//! flat-at-zero reports 0, growth from zero omits the key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric leaf metrics of a report, in a fixed order.
pub trait MetricSet {
    fn metrics(&self) -> Vec<(&'static str, f64)>;
}

/// Percentage change from `previous` to `current`, or `None` when no finite
/// percentage exists (growth from a zero base).
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        if current == 0.0 {
            Some(0.0)
        } else {
            None
        }
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// A report, either standalone or wrapped with its previous-period twin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsView<T> {
    Single {
        data: T,
    },
    Comparison {
        current: T,
        previous: T,
        changes: BTreeMap<String, f64>,
    },
}

impl<T: MetricSet> AnalyticsView<T> {
    pub fn single(data: T) -> Self {
        Self::Single { data }
    }

    pub fn comparison(current: T, previous: T) -> Self {
        let changes = diff_metrics(&current, &previous);
        Self::Comparison {
            current,
            previous,
            changes,
        }
    }

    /// The current-period data regardless of variant.
    pub fn data(&self) -> &T {
        match self {
            Self::Single { data } => data,
            Self::Comparison { current, .. } => current,
        }
    }
}

fn diff_metrics<T: MetricSet>(current: &T, previous: &T) -> BTreeMap<String, f64> {
    let mut changes = BTreeMap::new();
    for ((name, cur), (prev_name, prev)) in
        current.metrics().into_iter().zip(previous.metrics())
    {
        debug_assert_eq!(name, prev_name, "metric order must be stable");
        if let Some(delta) = pct_change(cur, prev) {
            changes.insert(name.to_string(), delta);
        }
    }
    changes
}
