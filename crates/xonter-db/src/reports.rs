//! # Report Service
//!
//! Assembles the dashboard, finance and inventory views for one owner.
//!
//! ## Dashboard Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    dashboard(month)                                     │
//! │                                                                         │
//! │  tokio::try_join! ─┬─► transactions.amounts_between(month)  kind,amount│
//! │                    ├─► inventory.stock_levels()             qty,price  │
//! │                    ├─► employees.headcount()                            │
//! │                    ├─► clients.count()                                  │
//! │                    ├─► suppliers.count()                                │
//! │                    └─► activities.count_pending()                       │
//! │                              │                                          │
//! │                              ▼  first error aborts the whole report     │
//! │  metrics::aggregate_financials / aggregate_inventory                    │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                      DashboardMetrics                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The dashboard always counts every item; only the inventory view applies
//! an [`InventoryFilter`].
//!
//! All arithmetic happens in `xonter_core::metrics`; this module only fetches
//! and hands records over.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use xonter_core::metrics::{category_breakdown, CategoryTotal};
use xonter_core::{
    aggregate_financials, aggregate_inventory, DashboardMetrics, FinancialSummary,
    InventoryFilter, InventoryItem, InventorySummary, MonthRange, OwnerId, ReportingZone,
    Transaction, TransactionFilter,
};

use crate::error::DbResult;
use crate::pool::Database;

// =============================================================================
// Report Types
// =============================================================================

/// The finance view: listed transactions and totals over exactly that list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceReport {
    pub filter: TransactionFilter,
    pub transactions: Vec<Transaction>,
    pub summary: FinancialSummary,
    pub categories: Vec<CategoryTotal>,
}

/// One inventory row with its computed margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMargin {
    pub item: InventoryItem,
    pub margin_percent: Decimal,
}

/// The inventory view: listed items with margins, plus totals over exactly that list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub filter: InventoryFilter,
    pub items: Vec<ItemMargin>,
    pub summary: InventorySummary,
}

// =============================================================================
// Service
// =============================================================================

/// Builds reports for one owner.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
    owner: OwnerId,
}

impl ReportService {
    /// Creates a report service bound to `owner`.
    pub fn new(db: Database, owner: OwnerId) -> Self {
        ReportService { db, owner }
    }

    /// Dashboard figures: finance for `month`, everything else all-time.
    ///
    /// The six reads run concurrently; if any fails, the whole call fails and
    /// no partial figures are returned.
    pub async fn dashboard(&self, month: MonthRange) -> DbResult<DashboardMetrics> {
        let transactions = self.db.transactions(&self.owner);
        let inventory = self.db.inventory(&self.owner);
        let employees = self.db.employees(&self.owner);
        let clients = self.db.clients(&self.owner);
        let suppliers = self.db.suppliers(&self.owner);
        let activities = self.db.activities(&self.owner);

        let (amounts, stock, headcount, total_clients, total_suppliers, pending_activities) = tokio::try_join!(
            transactions.amounts_between(month),
            inventory.stock_levels(),
            employees.headcount(),
            clients.count(),
            suppliers.count(),
            activities.count_pending(),
        )?;

        let metrics = DashboardMetrics {
            month,
            financials: aggregate_financials(&amounts),
            inventory: aggregate_inventory(&stock),
            headcount,
            total_clients,
            total_suppliers,
            pending_activities,
        };

        info!(
            owner = %self.owner,
            %month,
            balance = %metrics.financials.balance(),
            inventory_value = %metrics.inventory.total_value,
            "Dashboard computed"
        );

        Ok(metrics)
    }

    /// Dashboard for the month containing today in `zone`.
    pub async fn current_dashboard(&self, zone: &ReportingZone) -> DbResult<DashboardMetrics> {
        self.dashboard(zone.current_month()).await
    }

    /// Finance view: the filtered list with totals and category breakdown.
    ///
    /// Totals cover every listed transaction regardless of date, matching the
    /// list the user is looking at.
    pub async fn finance(&self, filter: TransactionFilter) -> DbResult<FinanceReport> {
        let transactions = self.db.transactions(&self.owner).list(filter).await?;

        let summary = aggregate_financials(&transactions);
        let categories = category_breakdown(&transactions);

        debug!(
            owner = %self.owner,
            count = transactions.len(),
            balance = %summary.balance(),
            "Finance report computed"
        );

        Ok(FinanceReport {
            filter,
            transactions,
            summary,
            categories,
        })
    }

    /// Inventory view: the filtered items with their margins, plus stock
    /// totals over the same items.
    pub async fn inventory(&self, filter: InventoryFilter) -> DbResult<InventoryReport> {
        let items = self.db.inventory(&self.owner).list(filter).await?;
        let summary = aggregate_inventory(&items);

        debug!(
            owner = %self.owner,
            kind = ?filter.kind,
            count = items.len(),
            units = summary.unit_count,
            "Inventory report computed"
        );

        let items = items
            .into_iter()
            .map(|item| ItemMargin {
                margin_percent: item.margin_percent(),
                item,
            })
            .collect();

        Ok(InventoryReport {
            filter,
            items,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use xonter_core::{
        ActivityKind, Headcount, ItemKind, Money, NewActivity, NewContact, NewEmployee,
        NewInventoryItem, NewTransaction, TransactionKind,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(kind: TransactionKind, category: &str, amount: i64, on: NaiveDate) -> NewTransaction {
        NewTransaction {
            kind,
            category: category.to_string(),
            amount: Money::from_major(amount),
            description: None,
            occurred_on: on,
        }
    }

    fn item(name: &str, quantity: i64, purchase: i64, sale: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: name.to_string(),
            description: None,
            kind: ItemKind::Product,
            quantity,
            purchase_price: Money::from_major(purchase),
            sale_price: Money::from_major(sale),
            unit: "unit".to_string(),
        }
    }

    async fn seed(db: &Database, owner: &OwnerId) {
        let txs = db.transactions(owner);
        txs.insert(&tx(TransactionKind::Income, "Sales", 1000, date(2024, 5, 3)))
            .await
            .unwrap();
        txs.insert(&tx(TransactionKind::Expense, "Rent", 300, date(2024, 5, 5)))
            .await
            .unwrap();
        txs.insert(&tx(TransactionKind::Income, "Sales", 50, date(2024, 5, 31)))
            .await
            .unwrap();
        // Outside May
        txs.insert(&tx(TransactionKind::Income, "Sales", 9999, date(2024, 4, 30)))
            .await
            .unwrap();

        let inv = db.inventory(owner);
        inv.insert(&item("Pens", 10, 20, 25)).await.unwrap();
        inv.insert(&item("Chairs", 3, 100, 100)).await.unwrap();

        let staff = db.employees(owner);
        let ana = staff
            .insert(&NewEmployee {
                name: "Ana".to_string(),
                position: "Manager".to_string(),
                salary: Money::from_major(20_000),
                email: None,
                phone: None,
                hired_on: date(2022, 3, 1),
            })
            .await
            .unwrap();
        staff
            .insert(&NewEmployee {
                name: "Luis".to_string(),
                position: "Cashier".to_string(),
                salary: Money::from_major(9_000),
                email: None,
                phone: None,
                hired_on: date(2023, 7, 1),
            })
            .await
            .unwrap();
        staff.set_active(&ana.id, false).await.unwrap();

        for name in ["Acme", "Globex"] {
            db.clients(owner)
                .insert(&NewContact {
                    name: name.to_string(),
                    ..NewContact::default()
                })
                .await
                .unwrap();
        }
        db.suppliers(owner)
            .insert(&NewContact {
                name: "Papelera".to_string(),
                ..NewContact::default()
            })
            .await
            .unwrap();

        let starts_at = date(2024, 5, 10).and_hms_opt(9, 0, 0).unwrap();
        db.activities(owner)
            .insert(&NewActivity {
                title: "Supplier call".to_string(),
                description: None,
                starts_at,
                ends_at: None,
                kind: ActivityKind::Task,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_for_month() {
        let (db, owner, _) = setup().await;
        seed(&db, &owner).await;

        let may = MonthRange::from_year_month(2024, 5).unwrap();
        let dashboard = db.reports(&owner).dashboard(may).await.unwrap();

        assert_eq!(dashboard.month, may);
        assert_eq!(dashboard.financials.total_income(), Money::from_major(1050));
        assert_eq!(dashboard.financials.total_expense(), Money::from_major(300));
        assert_eq!(dashboard.financials.balance(), Money::from_major(750));
        assert_eq!(dashboard.inventory.unit_count, 13);
        assert_eq!(dashboard.inventory.total_value, Money::from_major(550));
        assert_eq!(dashboard.headcount, Headcount { total: 2, active: 1 });
        assert_eq!(dashboard.total_clients, 2);
        assert_eq!(dashboard.total_suppliers, 1);
        assert_eq!(dashboard.pending_activities, 1);
    }

    #[tokio::test]
    async fn test_dashboard_for_empty_owner_is_zero() {
        let (db, owner, stranger) = setup().await;
        seed(&db, &owner).await;

        let may = MonthRange::from_year_month(2024, 5).unwrap();
        let dashboard = db.reports(&stranger).dashboard(may).await.unwrap();

        assert!(dashboard.financials.balance().is_zero());
        assert_eq!(dashboard.inventory, InventorySummary::default());
        assert_eq!(dashboard.headcount, Headcount::default());
        assert_eq!(dashboard.total_clients, 0);
        assert_eq!(dashboard.pending_activities, 0);
    }

    #[tokio::test]
    async fn test_current_dashboard_uses_zone_month() {
        let (db, owner, _) = setup().await;
        let zone = ReportingZone::utc();

        let dashboard = db.reports(&owner).current_dashboard(&zone).await.unwrap();
        assert_eq!(dashboard.month, zone.current_month());
    }

    #[tokio::test]
    async fn test_finance_report() {
        let (db, owner, _) = setup().await;
        seed(&db, &owner).await;
        let reports = db.reports(&owner);

        let all = reports.finance(TransactionFilter::all()).await.unwrap();
        assert_eq!(all.transactions.len(), 4);
        assert_eq!(all.summary.total_income(), Money::from_major(11_049));
        assert_eq!(all.summary.balance(), Money::from_major(10_749));
        assert_eq!(all.categories.len(), 2);

        let expenses = reports
            .finance(TransactionFilter::only(TransactionKind::Expense))
            .await
            .unwrap();
        assert_eq!(expenses.transactions.len(), 1);
        assert!(expenses.summary.total_income().is_zero());
        assert_eq!(expenses.summary.balance(), Money::from_major(-300));
    }

    #[tokio::test]
    async fn test_inventory_report_margins() {
        let (db, owner, _) = setup().await;
        seed(&db, &owner).await;

        let report = db
            .reports(&owner)
            .inventory(InventoryFilter::all())
            .await
            .unwrap();
        assert_eq!(report.summary.unit_count, 13);

        let pens = report
            .items
            .iter()
            .find(|row| row.item.name == "Pens")
            .unwrap();
        assert_eq!(pens.margin_percent, dec!(25));

        let chairs = report
            .items
            .iter()
            .find(|row| row.item.name == "Chairs")
            .unwrap();
        assert_eq!(chairs.margin_percent, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_inventory_report_totals_follow_the_filter() {
        let (db, owner, _) = setup().await;
        seed(&db, &owner).await;
        db.inventory(&owner)
            .insert(&NewInventoryItem {
                kind: ItemKind::Service,
                unit: "hour".to_string(),
                ..item("Installation", 2, 50, 80)
            })
            .await
            .unwrap();
        let reports = db.reports(&owner);

        let all = reports.inventory(InventoryFilter::all()).await.unwrap();
        assert_eq!(all.items.len(), 3);
        assert_eq!(all.summary.unit_count, 15);
        assert_eq!(all.summary.total_value, Money::from_major(710));

        let products = reports
            .inventory(InventoryFilter::only(ItemKind::Product))
            .await
            .unwrap();
        assert_eq!(products.filter, InventoryFilter::only(ItemKind::Product));
        assert_eq!(products.items.len(), 2);
        assert_eq!(products.summary.unit_count, 13);
        assert_eq!(products.summary.total_value, Money::from_major(550));

        let services = reports
            .inventory(InventoryFilter::only(ItemKind::Service))
            .await
            .unwrap();
        assert_eq!(services.items.len(), 1);
        assert_eq!(services.items[0].margin_percent, dec!(60));
        assert_eq!(services.summary.unit_count, 2);
        assert_eq!(services.summary.total_value, Money::from_major(160));

        // The dashboard is not filtered.
        let may = MonthRange::from_year_month(2024, 5).unwrap();
        let dashboard = reports.dashboard(may).await.unwrap();
        assert_eq!(dashboard.inventory, all.summary);
    }
}
