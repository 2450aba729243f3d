//! # xonter-core: Pure Business Logic for Xonter
//!
//! This crate holds the domain model and the metrics aggregator of the Xonter
//! business-management backend, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Xonter Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Views (out of scope here)                       │   │
//! │  │   Dashboard ─ Finance ─ Inventory ─ Employees ─ Calendar       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               xonter-db (Database Layer)                        │   │
//! │  │     owner-scoped repositories, ReportService, config            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ fetched records                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ xonter-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  metrics  │  │ validation│  │   │
//! │  │   │Transaction│  │   Money   │  │ Financial │  │  payload  │  │   │
//! │  │   │ Inventory │  │ (decimal) │  │ Inventory │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                  ┌───────────┐                                  │   │
//! │  │                  │  period   │  month boundaries, zones         │   │
//! │  │                  └───────────┘                                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Transaction, Employee, InventoryItem, ...)
//! - [`money`] - Decimal money type (no floating point)
//! - [`metrics`] - Financial and inventory aggregation, margins
//! - [`period`] - Calendar months and the reporting time zone
//! - [`error`] - Domain error types
//! - [`validation`] - Insert payload validation
//!
//! ## Example Usage
//!
//! ```rust
//! use xonter_core::metrics::{aggregate_financials, margin_percent};
//! use xonter_core::{Money, TransactionAmount, TransactionKind};
//!
//! let month = [
//!     TransactionAmount { kind: TransactionKind::Income, amount: "1000".parse().unwrap() },
//!     TransactionAmount { kind: TransactionKind::Expense, amount: "300".parse().unwrap() },
//! ];
//!
//! let summary = aggregate_financials(&month);
//! assert_eq!(summary.balance(), Money::from_major(700));
//!
//! let margin = margin_percent(Money::from_major(100), Money::from_major(150));
//! assert_eq!(margin.to_string(), "50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod money;
pub mod period;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use metrics::{
    aggregate_financials, aggregate_inventory, margin_percent, FinancialSummary,
    InventorySummary, MetricsResult,
};
pub use money::Money;
pub use period::{MonthRange, ReportingZone};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound on rows returned by a single list query.
///
/// List views show everything an owner has; this only stops a runaway query.
pub const MAX_LIST_ROWS: i64 = 10_000;
