//! Shared primitive types used across the analytics engine.

/// A stable order identifier, as issued by the ordering backend.
pub type OrderId = String;

/// A stable product identifier.
pub type ProductId = String;

/// A stable branch identifier.
pub type BranchId = String;

/// A customer's phone number, the customer key throughout the system.
pub type Phone = String;
