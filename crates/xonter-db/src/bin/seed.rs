//! # Seed Data Generator
//!
//! Populates the database with a demo owner and prints its dashboard.
//!
//! ## Usage
//! ```bash
//! # Seed the database named in xonter.toml (or ./xonter.db)
//! cargo run -p xonter-db --bin seed
//!
//! # Specify database path and month count
//! cargo run -p xonter-db --bin seed -- --db ./data/xonter.db --months 6
//!
//! # Dump the resulting dashboard as JSON
//! cargo run -p xonter-db --bin seed -- --json
//! ```
//!
//! ## Generated Records
//! - One transaction set per month going back `--months` months
//! - A handful of inventory items, employees, clients, suppliers
//! - Calendar activities for the current month, some completed

use chrono::{Datelike, Days, NaiveDate};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xonter_core::{
    ActivityKind, ItemKind, Money, MonthRange, NewActivity, NewContact, NewEmployee,
    NewInventoryItem, NewTransaction, OwnerId, TransactionKind,
};
use xonter_db::{AppConfig, Database};

/// Fixed demo owner so repeated runs target the same rows.
const DEMO_OWNER: &str = "00000000-0000-4000-8000-000000000001";

/// (kind, category, amount in cents, day of month)
const MONTHLY_TRANSACTIONS: &[(TransactionKind, &str, i64, u32)] = &[
    (TransactionKind::Income, "Sales", 4_250_000, 3),
    (TransactionKind::Income, "Services", 1_180_050, 12),
    (TransactionKind::Income, "Sales", 2_975_000, 21),
    (TransactionKind::Expense, "Rent", 1_500_000, 1),
    (TransactionKind::Expense, "Salaries", 3_200_000, 15),
    (TransactionKind::Expense, "Services", 245_075, 18),
    (TransactionKind::Expense, "Marketing", 600_000, 25),
];

/// (name, kind, quantity, purchase cents, sale cents, unit)
const ITEMS: &[(&str, ItemKind, i64, i64, i64, &str)] = &[
    ("Printer paper", ItemKind::Product, 120, 8_900, 12_500, "ream"),
    ("Toner cartridge", ItemKind::Product, 14, 95_000, 139_900, "unit"),
    ("Office chair", ItemKind::Product, 6, 210_000, 289_000, "unit"),
    ("Desk lamp", ItemKind::Product, 0, 32_000, 45_000, "unit"),
    ("Installation", ItemKind::Service, 0, 0, 80_000, "hour"),
];

/// (name, position, monthly salary in whole units, active)
const EMPLOYEES: &[(&str, &str, i64, bool)] = &[
    ("Ana Torres", "Manager", 32_000, true),
    ("Luis Pérez", "Sales", 18_000, true),
    ("Marta Gómez", "Accounting", 21_000, true),
    ("Jorge Ruiz", "Warehouse", 12_500, false),
];

const CLIENTS: &[(&str, &str)] = &[
    ("Carla Méndez", "Acme Logistics"),
    ("Diego Salas", "Globex Retail"),
    ("Elena Vidal", "Initech"),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Pedro Lara", "Papelera del Norte"),
    ("Sofía Ríos", "Muebles Ríos"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default(None);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let SeedArgs {
        db_path,
        months,
        as_json,
    } = match parse_args(&args) {
        Ok(Command::Run(parsed)) => parsed,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let mut db_config = config.db_config();
    if let Some(path) = db_path {
        db_config.database_path = path;
    }

    println!("Xonter Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_config.database_path.display());
    println!("Months:   {}", months);
    println!();

    let db = Database::new(db_config).await?;
    let owner = OwnerId::parse(DEMO_OWNER)?;

    let existing = db.transactions(&owner).count().await?;
    if existing > 0 {
        println!("Demo owner already has {} transactions", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        seed(&db, &owner, months, &config).await?;
    }

    let zone = config.reporting_zone();
    let dashboard = db.reports(&owner).current_dashboard(&zone).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Dashboard for {} (zone {})", dashboard.month, zone);
    println!("  Income:              {}", dashboard.financials.total_income());
    println!("  Expenses:            {}", dashboard.financials.total_expense());
    println!("  Balance:             {}", dashboard.financials.balance());
    println!("  Units in stock:      {}", dashboard.inventory.unit_count);
    println!("  Inventory value:     {}", dashboard.inventory.total_value);
    println!(
        "  Employees:           {} active / {} total",
        dashboard.headcount.active, dashboard.headcount.total
    );
    println!("  Clients:             {}", dashboard.total_clients);
    println!("  Suppliers:           {}", dashboard.total_suppliers);
    println!("  Pending activities:  {}", dashboard.pending_activities);

    db.close().await;
    Ok(())
}

// =============================================================================
// Arguments
// =============================================================================

const DEFAULT_MONTHS: u32 = 3;
const MONTHS_RANGE: std::ops::RangeInclusive<u32> = 1..=24;

#[derive(Debug, PartialEq)]
struct SeedArgs {
    db_path: Option<PathBuf>,
    months: u32,
    as_json: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(SeedArgs),
    Help,
}

/// Parses the arguments after the program name.
///
/// Unknown flags, missing values and months outside 1..=24 are errors.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut parsed = SeedArgs {
        db_path: None,
        months: DEFAULT_MONTHS,
        as_json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{} requires a path", arg))?;
                parsed.db_path = Some(PathBuf::from(value));
            }
            "--months" | "-m" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{} requires a number", arg))?;
                parsed.months = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| MONTHS_RANGE.contains(n))
                    .ok_or_else(|| {
                        format!(
                            "invalid value '{}' for {}: expected a whole number from {} to {}",
                            value,
                            arg,
                            MONTHS_RANGE.start(),
                            MONTHS_RANGE.end()
                        )
                    })?;
            }
            "--json" => parsed.as_json = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }

    Ok(Command::Run(parsed))
}

fn print_usage() {
    println!("Xonter Seed Data Generator");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>      Database file path (default: from xonter.toml)");
    println!("  -m, --months <N>     Months of transactions to generate, 1 to 24 (default: 3)");
    println!("      --json           Print the dashboard as JSON");
    println!("  -h, --help           Show this help message");
}

// =============================================================================
// Seeding
// =============================================================================

async fn seed(
    db: &Database,
    owner: &OwnerId,
    months: u32,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let zone = config.reporting_zone();

    let mut month = zone.current_month();
    let transactions = db.transactions(owner);
    for _ in 0..months {
        for &(kind, category, cents, day) in MONTHLY_TRANSACTIONS {
            transactions
                .insert(&NewTransaction {
                    kind,
                    category: category.to_string(),
                    amount: Money::from_cents(cents),
                    description: None,
                    occurred_on: day_in(month, day),
                })
                .await?;
        }
        info!(%month, count = MONTHLY_TRANSACTIONS.len(), "Seeded transactions");
        month = month.previous();
    }

    let inventory = db.inventory(owner);
    for &(name, kind, quantity, purchase, sale, unit) in ITEMS {
        inventory
            .insert(&NewInventoryItem {
                name: name.to_string(),
                description: None,
                kind,
                quantity,
                purchase_price: Money::from_cents(purchase),
                sale_price: Money::from_cents(sale),
                unit: unit.to_string(),
            })
            .await?;
    }
    println!("Seeded {} inventory items", ITEMS.len());

    let employees = db.employees(owner);
    let today = zone.today();
    for (offset, &(name, position, salary, active)) in EMPLOYEES.iter().enumerate() {
        let hired_on = today
            .checked_sub_days(Days::new(90 * (offset as u64 + 1)))
            .unwrap_or(today);
        let employee = employees
            .insert(&NewEmployee {
                name: name.to_string(),
                position: position.to_string(),
                salary: Money::from_major(salary),
                email: Some(email_for(name)),
                phone: None,
                hired_on,
            })
            .await?;
        if !active {
            employees.set_active(&employee.id, false).await?;
        }
    }
    println!("Seeded {} employees", EMPLOYEES.len());

    for (contacts, rows) in [(db.clients(owner), CLIENTS), (db.suppliers(owner), SUPPLIERS)] {
        for &(name, company) in rows {
            contacts
                .insert(&NewContact {
                    name: name.to_string(),
                    company: Some(company.to_string()),
                    email: Some(email_for(name)),
                    ..NewContact::default()
                })
                .await?;
        }
        println!("Seeded {} {}s", rows.len(), contacts.kind());
    }

    let activities = db.activities(owner);
    let current = zone.current_month();
    let plans = [
        ("Quarterly review", ActivityKind::Meeting, 5, false),
        ("Order toner", ActivityKind::Task, 8, true),
        ("Pay rent", ActivityKind::Reminder, 1, true),
        ("Trade fair", ActivityKind::Event, 22, false),
    ];
    for (title, kind, day, done) in plans {
        let starts_at = day_in(current, day).and_hms_opt(10, 0, 0).unwrap_or_default();
        let activity = activities
            .insert(&NewActivity {
                title: title.to_string(),
                description: None,
                starts_at,
                ends_at: None,
                kind,
            })
            .await?;
        if done {
            activities.toggle_completed(&activity.id).await?;
        }
    }
    println!("Seeded {} activities", plans.len());

    Ok(())
}

/// The given day of `month`, clamped to its last day.
fn day_in(month: MonthRange, day: u32) -> NaiveDate {
    let last = month.end().day();
    month
        .start()
        .checked_add_days(Days::new(u64::from(day.clamp(1, last) - 1)))
        .unwrap_or(month.start())
}

fn email_for(name: &str) -> String {
    let local: String = name
        .split_whitespace()
        .next()
        .unwrap_or("contact")
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_lowercase();
    format!("{}@example.com", local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn run(raw: &[&str]) -> SeedArgs {
        match parse_args(&args(raw)) {
            Ok(Command::Run(parsed)) => parsed,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            run(&[]),
            SeedArgs {
                db_path: None,
                months: 3,
                as_json: false,
            }
        );
    }

    #[test]
    fn test_all_options() {
        let parsed = run(&["-d", "./data/x.db", "--months", "6", "--json"]);
        assert_eq!(parsed.db_path, Some(PathBuf::from("./data/x.db")));
        assert_eq!(parsed.months, 6);
        assert!(parsed.as_json);
        assert_eq!(run(&["-m", "24"]).months, 24);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(&args(&["--json", "-h"])), Ok(Command::Help));
    }

    #[test]
    fn test_bad_months_is_an_error() {
        for bad in ["abc", "", "-1", "0", "25", "3.5"] {
            let err = parse_args(&args(&["--months", bad])).unwrap_err();
            assert!(err.contains("--months"), "{}", err);
            assert!(err.contains(&format!("'{}'", bad)), "{}", err);
        }
    }

    #[test]
    fn test_missing_values_and_unknown_flags() {
        assert!(parse_args(&args(&["--months"]))
            .unwrap_err()
            .contains("requires a number"));
        assert!(parse_args(&args(&["--db"]))
            .unwrap_err()
            .contains("requires a path"));
        assert!(parse_args(&args(&["--mnths", "3"]))
            .unwrap_err()
            .contains("'--mnths'"));
    }
}
