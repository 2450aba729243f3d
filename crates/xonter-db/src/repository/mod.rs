//! # Repository Module
//!
//! Owner-scoped database repositories for Xonter.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Owner-Scoped Repositories                            │
//! │                                                                         │
//! │  db.transactions(&owner)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TransactionRepository { pool, owner }                                 │
//! │  ├── insert(&self, payload)                                            │
//! │  ├── list(&self, filter)                                               │
//! │  └── amounts_between(&self, month)                                     │
//! │       │                                                                 │
//! │       │  every statement binds `owner_id = ?`                          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  A row owned by someone else behaves exactly like a missing row.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Conventions
//! - Money is stored as decimal TEXT and parsed back with [`decode_money`]
//! - Enums are stored as lowercase TEXT through their `sqlx::Type` derive
//! - Rows are read into private `*Row` structs, then converted to domain types
//!
//! ## Available Repositories
//!
//! - [`TransactionRepository`](transaction::TransactionRepository) - Income and expenses
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Staff and headcount
//! - [`InventoryRepository`](inventory::InventoryRepository) - Products, services, stock
//! - [`ContactRepository`](contact::ContactRepository) - Clients and suppliers
//! - [`ActivityRepository`](activity::ActivityRepository) - Calendar entries

pub mod activity;
pub mod contact;
pub mod employee;
pub mod inventory;
pub mod transaction;

use xonter_core::{Money, OwnerId};

use crate::error::{DbError, DbResult};

/// Generates a new primary key.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Text form of a money column.
pub(crate) fn encode_money(amount: Money) -> String {
    amount.amount().to_string()
}

/// Parses a money column, reporting which column held bad text.
pub(crate) fn decode_money(column: &str, raw: &str) -> DbResult<Money> {
    raw.parse::<Money>()
        .map_err(|e| DbError::decode(column, e))
}

/// Parses an owner column.
pub(crate) fn decode_owner(raw: &str) -> DbResult<OwnerId> {
    OwnerId::parse(raw).map_err(|e| DbError::decode("owner_id", e))
}

/// Trims optional text, turning blanks into `None`.
pub(crate) fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
