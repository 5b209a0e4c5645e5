//! The four basic metric views over one fetched row set.
//!
//! Each view is a pure function: records in, summary DTO out. No view
//! depends on another view's output, so they can be computed in any order
//! from the same fetch.

pub mod customer;
pub mod order;
pub mod product;
pub mod sales;
