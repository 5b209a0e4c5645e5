//! Report request surface: tenant scope and caller options.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::BranchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The tenant boundary a report is computed for. Brand scope aggregates
/// several branches and additionally gets a per-branch revenue roll-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scope {
    Branch {
        branch_id: BranchId,
    },
    Brand {
        brand_id: String,
        branch_ids: Vec<BranchId>,
    },
}

impl Scope {
    pub fn branch(branch_id: impl Into<BranchId>) -> Self {
        Self::Branch {
            branch_id: branch_id.into(),
        }
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        match self {
            Self::Branch { branch_id } => {
                if branch_id.is_empty() {
                    return Err(AnalyticsError::missing_scope("empty branch id"));
                }
            }
            Self::Brand {
                brand_id,
                branch_ids,
            } => {
                if brand_id.is_empty() {
                    return Err(AnalyticsError::missing_scope("empty brand id"));
                }
                if branch_ids.is_empty() {
                    return Err(AnalyticsError::missing_scope(format!(
                        "brand '{brand_id}' has no branches"
                    )));
                }
                if branch_ids.iter().any(|b| b.is_empty()) {
                    return Err(AnalyticsError::missing_scope(format!(
                        "brand '{brand_id}' contains an empty branch id"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The branch ids covered by this scope.
    pub fn branch_list(&self) -> Vec<BranchId> {
        match self {
            Self::Branch { branch_id } => vec![branch_id.clone()],
            Self::Brand { branch_ids, .. } => branch_ids.clone(),
        }
    }
}

/// One report request. `as_of` anchors the default trailing window; it is
/// always supplied by the caller, never read from the clock inside the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub scope: Scope,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub compare: bool,
    pub as_of: DateTime<Utc>,
}

impl AnalyticsRequest {
    pub fn new(scope: Scope, as_of: DateTime<Utc>) -> Self {
        Self {
            scope,
            start_date: None,
            end_date: None,
            compare: false,
            as_of,
        }
    }

    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_compare(mut self, compare: bool) -> Self {
        self.compare = compare;
        self
    }
}
