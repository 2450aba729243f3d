//! # Metrics Aggregator
//!
//! Pure reductions from already-fetched records to dashboard figures.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Metrics Aggregation                              │
//! │                                                                         │
//! │  Transactions (any LedgerEntry)                                        │
//! │  ┌───────────────────┐                                                  │
//! │  │ Income   1000.00  │──┐                                               │
//! │  │ Expense   300.00  │  ├──► aggregate_financials ──► FinancialSummary  │
//! │  │ Income     50.00  │──┘     income  1050.00                            │
//! │  └───────────────────┘        expense  300.00                            │
//! │                               balance  750.00 (income − expense)        │
//! │                                                                         │
//! │  Inventory (any StockEntry)                                            │
//! │  ┌───────────────────┐                                                  │
//! │  │ 10 ×  25.00       │──┐                                               │
//! │  │  3 × 100.00       │──┴──► aggregate_inventory ──► InventorySummary   │
//! │  └───────────────────┘        unit_count   13                           │
//! │                               total_value  550.00                       │
//! │                                                                         │
//! │  margin_percent(purchase, sale) = (sale − purchase) / purchase × 100   │
//! │                                   0 when purchase is 0                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - **Exact**: all sums are decimal, never binary floating point
//! - **Order independent**: any permutation of the input gives the same result
//! - **Total**: empty input yields zeros; nothing here returns an error or
//!   panics. Sums that leave the representable range saturate at its bounds
//! - **No validation**: records are reduced exactly as given
//!
//! Full entities and the slim projections the dashboard fetches
//! (`TransactionAmount`, `StockLevel`) go through the same functions via the
//! [`LedgerEntry`] and [`StockEntry`] traits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::period::MonthRange;
use crate::types::{InventoryItem, StockLevel, Transaction, TransactionAmount, TransactionKind};

// =============================================================================
// Record Traits
// =============================================================================

/// Anything that moves money in or out.
pub trait LedgerEntry {
    fn kind(&self) -> TransactionKind;
    fn amount(&self) -> Money;
}

/// A ledger entry with a business date.
pub trait DatedEntry: LedgerEntry {
    fn occurred_on(&self) -> NaiveDate;
}

/// Anything that holds stock valued at a unit sale price.
pub trait StockEntry {
    fn quantity(&self) -> i64;
    fn unit_sale_price(&self) -> Money;
}

impl LedgerEntry for Transaction {
    fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl DatedEntry for Transaction {
    fn occurred_on(&self) -> NaiveDate {
        self.occurred_on
    }
}

impl LedgerEntry for TransactionAmount {
    fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl StockEntry for InventoryItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_sale_price(&self) -> Money {
        self.sale_price
    }
}

impl StockEntry for StockLevel {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_sale_price(&self) -> Money {
        self.sale_price
    }
}

// =============================================================================
// Financial Summary
// =============================================================================

/// Income, expense and balance over a set of transactions.
///
/// Fields are private so `balance == total_income - total_expense` cannot be
/// broken after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct FinancialSummary {
    total_income: Money,
    total_expense: Money,
    balance: Money,
}

impl FinancialSummary {
    pub fn new(total_income: Money, total_expense: Money) -> Self {
        FinancialSummary {
            total_income,
            total_expense,
            balance: total_income.saturating_sub(total_expense),
        }
    }

    #[inline]
    pub fn total_income(&self) -> Money {
        self.total_income
    }

    #[inline]
    pub fn total_expense(&self) -> Money {
        self.total_expense
    }

    #[inline]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Adds one entry to the running totals, saturating at the `Money` bounds.
    fn record(&mut self, kind: TransactionKind, amount: Money) {
        match kind {
            TransactionKind::Income => {
                self.total_income = self.total_income.saturating_add(amount)
            }
            TransactionKind::Expense => {
                self.total_expense = self.total_expense.saturating_add(amount)
            }
        }
        self.balance = self.total_income.saturating_sub(self.total_expense);
    }
}

/// Sums transactions by kind.
///
/// ## Example
/// ```rust
/// use xonter_core::metrics::aggregate_financials;
/// use xonter_core::money::Money;
/// use xonter_core::types::{TransactionAmount, TransactionKind};
///
/// let entries = [
///     TransactionAmount { kind: TransactionKind::Income, amount: Money::from_major(1000) },
///     TransactionAmount { kind: TransactionKind::Expense, amount: Money::from_major(300) },
///     TransactionAmount { kind: TransactionKind::Income, amount: Money::from_major(50) },
/// ];
///
/// let summary = aggregate_financials(&entries);
/// assert_eq!(summary.total_income(), Money::from_major(1050));
/// assert_eq!(summary.total_expense(), Money::from_major(300));
/// assert_eq!(summary.balance(), Money::from_major(750));
/// ```
pub fn aggregate_financials<'a, T, I>(transactions: I) -> FinancialSummary
where
    T: LedgerEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut summary = FinancialSummary::default();
    for entry in transactions {
        summary.record(entry.kind(), entry.amount());
    }
    summary
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Units on hand and their value at sale price.
///
/// Both totals saturate (`i64::MAX`, `Money::MAX`) instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    pub unit_count: i64,
    pub total_value: Money,
}

/// Sums quantities and stock value (quantity × unit sale price).
///
/// ## Example
/// ```rust
/// use xonter_core::metrics::aggregate_inventory;
/// use xonter_core::money::Money;
/// use xonter_core::types::StockLevel;
///
/// let stock = [
///     StockLevel { quantity: 10, sale_price: Money::from_major(25) },
///     StockLevel { quantity: 3, sale_price: Money::from_major(100) },
/// ];
///
/// let summary = aggregate_inventory(&stock);
/// assert_eq!(summary.unit_count, 13);
/// assert_eq!(summary.total_value, Money::from_major(550));
/// ```
pub fn aggregate_inventory<'a, T, I>(items: I) -> InventorySummary
where
    T: StockEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .fold(InventorySummary::default(), |mut acc, item| {
            let quantity = item.quantity();
            acc.unit_count = acc.unit_count.saturating_add(quantity);
            acc.total_value = acc
                .total_value
                .saturating_add(item.unit_sale_price().multiply_quantity(quantity));
            acc
        })
}

// =============================================================================
// Margin
// =============================================================================

/// Markup of `sale` over `purchase`, in percent.
///
/// Returns zero when `purchase` is zero. The result is not clamped: selling
/// below cost gives a negative margin.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use xonter_core::metrics::margin_percent;
/// use xonter_core::money::Money;
///
/// assert_eq!(margin_percent(Money::from_major(100), Money::from_major(150)), Decimal::from(50));
/// assert_eq!(margin_percent(Money::from_major(100), Money::from_major(80)), Decimal::from(-20));
/// assert_eq!(margin_percent(Money::zero(), Money::from_major(50)), Decimal::ZERO);
/// ```
pub fn margin_percent(purchase: Money, sale: Money) -> Decimal {
    if purchase.is_zero() {
        return Decimal::ZERO;
    }

    let Some(markup) = sale.amount().checked_sub(purchase.amount()) else {
        return saturate((sale < purchase) != purchase.is_negative());
    };
    let hundred = Decimal::ONE_HUNDRED;

    // Multiply first so whole-number margins stay exact.
    markup
        .checked_mul(hundred)
        .and_then(|scaled| scaled.checked_div(purchase.amount()))
        .or_else(|| {
            markup
                .checked_div(purchase.amount())
                .and_then(|ratio| ratio.checked_mul(hundred))
        })
        .unwrap_or_else(|| saturate(markup.is_sign_negative() != purchase.is_negative()))
        .normalize()
}

fn saturate(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

// =============================================================================
// Combined Result
// =============================================================================

/// Financial and inventory figures computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct MetricsResult {
    pub financials: FinancialSummary,
    pub inventory: InventorySummary,
}

impl MetricsResult {
    /// Runs both aggregations.
    pub fn compute<'a, 'b, T, S, TI, SI>(transactions: TI, items: SI) -> Self
    where
        T: LedgerEntry + 'a,
        S: StockEntry + 'b,
        TI: IntoIterator<Item = &'a T>,
        SI: IntoIterator<Item = &'b S>,
    {
        MetricsResult {
            financials: aggregate_financials(transactions),
            inventory: aggregate_inventory(items),
        }
    }

    #[inline]
    pub fn total_income(&self) -> Money {
        self.financials.total_income()
    }

    #[inline]
    pub fn total_expense(&self) -> Money {
        self.financials.total_expense()
    }

    #[inline]
    pub fn balance(&self) -> Money {
        self.financials.balance()
    }

    #[inline]
    pub fn inventory_unit_count(&self) -> i64 {
        self.inventory.unit_count
    }

    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.inventory.total_value
    }
}

// =============================================================================
// Breakdowns
// =============================================================================

/// Total for one category of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CategoryTotal {
    pub kind: TransactionKind,
    pub category: String,
    pub total: Money,
    pub count: usize,
}

/// Groups transactions by `(kind, category)`.
///
/// Categories are compared after trimming, case-sensitively. Output is sorted
/// by kind (income first) then category.
pub fn category_breakdown<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: BTreeMap<(TransactionKind, &'a str), (Money, usize)> = BTreeMap::new();

    for tx in transactions {
        let slot = groups
            .entry((tx.kind, tx.category.trim()))
            .or_insert((Money::zero(), 0));
        slot.0 = slot.0.saturating_add(tx.amount);
        slot.1 += 1;
    }

    groups
        .into_iter()
        .map(|((kind, category), (total, count))| CategoryTotal {
            kind,
            category: category.to_string(),
            total,
            count,
        })
        .collect()
}

/// Financial summary for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct MonthlySummary {
    pub month: MonthRange,
    pub summary: FinancialSummary,
}

/// Groups entries by the month of their business date, oldest month first.
///
/// Months without entries are omitted.
pub fn monthly_breakdown<'a, T, I>(entries: I) -> Vec<MonthlySummary>
where
    T: DatedEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut months: BTreeMap<MonthRange, FinancialSummary> = BTreeMap::new();

    for entry in entries {
        months
            .entry(MonthRange::for_date(entry.occurred_on()))
            .or_default()
            .record(entry.kind(), entry.amount());
    }

    months
        .into_iter()
        .map(|(month, summary)| MonthlySummary { month, summary })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
