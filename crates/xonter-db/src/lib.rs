//! # xonter-db: Database Layer for Xonter
//!
//! This crate provides owner-scoped storage for the Xonter records and
//! assembles the dashboard from them. It uses SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Xonter Data Flow                                 │
//! │                                                                         │
//! │  Caller (holds the authenticated OwnerId)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     xonter-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (owner-bound) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Transactions  │    │ 001_initial  │  │   │
//! │  │   │ AppConfig     │    │ Inventory ... │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                        ┌───────▼───────┐                        │   │
//! │  │                        │ ReportService │──► xonter_core::metrics│   │
//! │  │                        └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and repository accessors
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Database error types
//! - [`repository`] - Owner-scoped repositories
//! - [`reports`] - Dashboard, finance and inventory reports
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xonter_db::{AppConfig, Database};
//! use xonter_core::OwnerId;
//!
//! let config = AppConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let owner = OwnerId::parse(&user_id)?;
//! let dashboard = db
//!     .reports(&owner)
//!     .current_dashboard(&config.reporting_zone())
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use reports::{FinanceReport, InventoryReport, ItemMargin, ReportService};

// Repository re-exports for convenience
pub use repository::activity::ActivityRepository;
pub use repository::contact::ContactRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::transaction::TransactionRepository;
