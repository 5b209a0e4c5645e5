//! ABC classification: Pareto grading of products by revenue contribution.

use crate::compare::MetricSet;
use crate::records::OrderItemRecord;
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const GRADE_A_CUTOFF: f64 = 80.0;
pub const GRADE_B_CUTOFF: f64 = 95.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AbcGrade {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub revenue: f64,
    pub revenue_percentage: f64,
    /// Non-decreasing down the ranking; the last item lands at ~100.
    pub cumulative_percentage: f64,
    pub grade: AbcGrade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSummary {
    pub grade: AbcGrade,
    pub count: u64,
    /// Sum of the members' individual revenue percentages.
    pub revenue_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcReport {
    /// Descending by revenue; ties keep first-seen row order.
    pub items: Vec<AbcItem>,
    /// Always three entries, A then B then C, zeroed when absent.
    pub summary: Vec<GradeSummary>,
}

pub fn classify(items: &[OrderItemRecord]) -> AbcReport {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<(ProductId, String, f64)> = Vec::new();
    for item in items {
        match index.get(item.product_id.as_str()) {
            Some(&i) => rows[i].2 += item.revenue(),
            None => {
                index.insert(item.product_id.as_str(), rows.len());
                rows.push((
                    item.product_id.clone(),
                    item.product_name.clone(),
                    item.revenue(),
                ));
            }
        }
    }

    let total_revenue: f64 = rows.iter().map(|(_, _, revenue)| revenue).sum();
    if rows.is_empty() || total_revenue <= 0.0 {
        return AbcReport {
            items: Vec::new(),
            summary: zero_summary(),
        };
    }

    rows.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut graded = Vec::with_capacity(rows.len());
    let mut cumulative = 0.0;
    for (rank, (product_id, product_name, revenue)) in rows.into_iter().enumerate() {
        cumulative += revenue;
        let revenue_percentage = revenue / total_revenue * 100.0;
        let cumulative_percentage = cumulative / total_revenue * 100.0;
        // The top item is always A. After that the grade follows the
        // cumulative share including the item, so a cutoff-crossing item
        // falls into the lower grade.
        let grade = if rank == 0 || cumulative_percentage <= GRADE_A_CUTOFF {
            AbcGrade::A
        } else if cumulative_percentage <= GRADE_B_CUTOFF {
            AbcGrade::B
        } else {
            AbcGrade::C
        };
        graded.push(AbcItem {
            product_id,
            product_name,
            revenue,
            revenue_percentage,
            cumulative_percentage,
            grade,
        });
    }

    let mut summary = zero_summary();
    for item in &graded {
        let slot = match item.grade {
            AbcGrade::A => &mut summary[0],
            AbcGrade::B => &mut summary[1],
            AbcGrade::C => &mut summary[2],
        };
        slot.count += 1;
        slot.revenue_percentage += item.revenue_percentage;
    }

    AbcReport {
        items: graded,
        summary,
    }
}

fn zero_summary() -> Vec<GradeSummary> {
    [AbcGrade::A, AbcGrade::B, AbcGrade::C]
        .into_iter()
        .map(|grade| GradeSummary {
            grade,
            count: 0,
            revenue_percentage: 0.0,
        })
        .collect()
}

impl MetricSet for AbcReport {
    fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("grade_a_count", self.summary[0].count as f64),
            ("grade_b_count", self.summary[1].count as f64),
            ("grade_c_count", self.summary[2].count as f64),
        ]
    }
}
