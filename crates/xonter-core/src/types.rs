//! # Domain Types
//!
//! Core domain types used throughout Xonter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Transaction    │   │    Employee     │   │  InventoryItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind           │   │  position       │   │  quantity       │       │
//! │  │  category       │   │  salary         │   │  purchase_price │       │
//! │  │  amount         │   │  active         │   │  sale_price     │       │
//! │  │  occurred_on    │   │  hired_on       │   │  unit           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Contact      │   │    Activity     │   Every record carries:     │
//! │  │  ─────────────  │   │  ─────────────  │   • id (UUID v4)            │
//! │  │  kind: Client / │   │  kind           │   • owner_id (row scope)    │
//! │  │        Supplier │   │  starts_at      │   • created_at              │
//! │  │  company, notes │   │  completed      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payloads and Projections
//! - `New*` structs are insert payloads: what a form submits, before the
//!   store assigns `id`, `owner_id` and timestamps.
//! - `TransactionAmount` and `StockLevel` are narrow projections fetched by
//!   the dashboard, which only needs the columns the aggregator reads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::metrics::{self, FinancialSummary, InventorySummary};
use crate::money::Money;
use crate::period::MonthRange;
use crate::validation::validate_uuid;

/// Unit of measure used when an inventory form leaves it blank.
pub const DEFAULT_UNIT: &str = "unit";

fn unknown(kind: &str, value: &str) -> CoreError {
    CoreError::UnknownVariant {
        kind: kind.to_string(),
        value: value.to_string(),
    }
}

// =============================================================================
// Owner
// =============================================================================

/// Identifier of the authenticated user that owns a row.
///
/// Every stored record belongs to exactly one owner, and every read or write
/// is filtered by it. The value is opaque to this crate beyond being a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct OwnerId(String);

impl OwnerId {
    /// Parses and validates an owner id.
    ///
    /// ## Example
    /// ```rust
    /// use xonter_core::OwnerId;
    ///
    /// assert!(OwnerId::parse("550e8400-e29b-41d4-a716-446655440000").is_ok());
    /// assert!(OwnerId::parse("someone").is_err());
    /// ```
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let id = id.trim();
        validate_uuid(id)?;
        Ok(OwnerId(id.to_lowercase()))
    }

    /// Generates a fresh owner id (for tests and seeding).
    pub fn generate() -> Self {
        OwnerId(uuid::Uuid::new_v4().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OwnerId::parse(&value)
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Finance
// =============================================================================

/// The two mutually exclusive kinds of financial transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// Categories offered by the entry form for this kind.
    ///
    /// The category column is free text; these are suggestions only.
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &["Sales", "Services", "Investments", "Other income"],
            TransactionKind::Expense => &[
                "Salaries",
                "Rent",
                "Services",
                "Purchases",
                "Marketing",
                "Other expenses",
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Ok(TransactionKind::Income),
            "expense" | "egreso" => Ok(TransactionKind::Expense),
            other => Err(unknown("transaction kind", other)),
        }
    }
}

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub owner_id: OwnerId,
    pub kind: TransactionKind,
    pub category: String,
    /// Non-negative amount; the kind carries the sign.
    pub amount: Money,
    pub description: Option<String>,
    /// The business date of the transaction (not the insert time).
    #[ts(as = "String")]
    pub occurred_on: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Money,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub occurred_on: NaiveDate,
}

/// The two columns the dashboard reads from a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionAmount {
    pub kind: TransactionKind,
    pub amount: Money,
}

/// Which transactions the finance view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionFilter {
    /// `None` lists both kinds.
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        TransactionFilter { kind: None }
    }

    pub fn only(kind: TransactionKind) -> Self {
        TransactionFilter { kind: Some(kind) }
    }

    pub fn matches(&self, kind: TransactionKind) -> bool {
        self.kind.map_or(true, |wanted| wanted == kind)
    }
}

// =============================================================================
// Employees
// =============================================================================

/// A person on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub owner_id: OwnerId,
    pub name: String,
    pub position: String,
    pub salary: Money,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub hired_on: NaiveDate,
    /// Inactive employees are kept, never deleted.
    pub active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an employee. New employees start active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub salary: Money,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub hired_on: NaiveDate,
}

/// Employee counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Headcount {
    pub total: i64,
    pub active: i64,
}

impl Headcount {
    pub fn inactive(&self) -> i64 {
        self.total - self.active
    }
}

/// Splits employees into `(active, inactive)`, preserving order.
pub fn partition_by_status(employees: Vec<Employee>) -> (Vec<Employee>, Vec<Employee>) {
    employees.into_iter().partition(|e| e.active)
}

// =============================================================================
// Inventory
// =============================================================================

/// Whether an inventory entry is a physical product or a sellable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Service,
}

impl FromStr for ItemKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" | "producto" => Ok(ItemKind::Product),
            "service" | "servicio" => Ok(ItemKind::Service),
            other => Err(unknown("item kind", other)),
        }
    }
}

/// A stocked product or service with purchase and sale prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub kind: ItemKind,
    pub quantity: i64,
    pub purchase_price: Money,
    pub sale_price: Money,
    /// Unit of measure ("unit", "kg", "hour", ...).
    pub unit: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Markup of the sale price over the purchase price, in percent.
    #[inline]
    pub fn margin_percent(&self) -> Decimal {
        metrics::margin_percent(self.purchase_price, self.sale_price)
    }

    /// Quantity valued at the sale price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.sale_price.multiply_quantity(self.quantity)
    }
}

/// Insert payload for an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub name: String,
    pub description: Option<String>,
    pub kind: ItemKind,
    pub quantity: i64,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub unit: String,
}

impl NewInventoryItem {
    /// Returns the unit, falling back to [`DEFAULT_UNIT`] when blank.
    pub fn unit_or_default(&self) -> &str {
        let unit = self.unit.trim();
        if unit.is_empty() {
            DEFAULT_UNIT
        } else {
            unit
        }
    }
}

/// Which items the inventory view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryFilter {
    /// `None` lists products and services.
    pub kind: Option<ItemKind>,
}

impl InventoryFilter {
    pub fn all() -> Self {
        InventoryFilter { kind: None }
    }

    pub fn only(kind: ItemKind) -> Self {
        InventoryFilter { kind: Some(kind) }
    }

    pub fn matches(&self, kind: ItemKind) -> bool {
        self.kind.map_or(true, |wanted| wanted == kind)
    }
}

/// The two columns the dashboard reads from an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    pub quantity: i64,
    pub sale_price: Money,
}

// =============================================================================
// Contacts (Clients & Suppliers)
// =============================================================================

/// Clients and suppliers share one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Client,
    Supplier,
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactKind::Client => write!(f, "client"),
            ContactKind::Supplier => write!(f, "supplier"),
        }
    }
}

/// A client or supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub owner_id: OwnerId,
    pub kind: ContactKind,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a client or supplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewContact {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Calendar
// =============================================================================

/// What kind of calendar entry an activity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Meeting,
    Task,
    Reminder,
    Event,
}

impl FromStr for ActivityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meeting" | "reunión" | "reunion" => Ok(ActivityKind::Meeting),
            "task" | "tarea" => Ok(ActivityKind::Task),
            "reminder" | "recordatorio" => Ok(ActivityKind::Reminder),
            "event" | "evento" => Ok(ActivityKind::Event),
            other => Err(unknown("activity kind", other)),
        }
    }
}

/// A scheduled meeting, task, reminder or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Activity {
    pub id: String,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: Option<String>,
    /// Wall-clock start as entered by the user (no zone attached).
    #[ts(as = "String")]
    pub starts_at: NaiveDateTime,
    #[ts(as = "Option<String>")]
    pub ends_at: Option<NaiveDateTime>,
    pub kind: ActivityKind,
    pub completed: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an activity. New activities start pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub starts_at: NaiveDateTime,
    #[ts(as = "Option<String>")]
    pub ends_at: Option<NaiveDateTime>,
    pub kind: ActivityKind,
}

/// Splits activities into `(pending, completed)`, preserving order.
pub fn split_pending(activities: Vec<Activity>) -> (Vec<Activity>, Vec<Activity>) {
    activities.into_iter().partition(|a| !a.completed)
}

// =============================================================================
// Dashboard
// =============================================================================

/// Everything the dashboard cards display for one owner and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DashboardMetrics {
    /// Financial figures cover this month only; the other cards are totals.
    pub month: MonthRange,
    pub financials: FinancialSummary,
    pub inventory: InventorySummary,
    pub headcount: Headcount,
    pub total_clients: i64,
    pub total_suppliers: i64,
    pub pending_activities: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
