//! orderlens-core: batch analytics over multi-branch order data.
//!
//! The crate turns raw order and order-item rows into business reports:
//! sales and customer metrics, ABC product grading, hourly demand,
//! market-basket pairs, cohort retention, and RFM segmentation, each
//! optionally compared against the immediately preceding period.
//!
//! RULES:
//!   - Analyzers are pure functions over fetched records. All I/O goes
//!     through the `OrderSource` seam; only `store` talks SQL.
//!   - No wall-clock reads and no RNG outside `seed`. Same request, same
//!     data, same report.
//!   - Zero denominators report 0, never NaN or Infinity.

pub mod abc;
pub mod basket;
pub mod cohort;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod hourly;
pub mod metrics;
pub mod period;
pub mod records;
pub mod request;
pub mod rfm;
pub mod seed;
pub mod source;
pub mod store;
pub mod types;
