use proptest::prelude::*;
use rust_decimal::Decimal;
use xonter_core::metrics::{aggregate_financials, aggregate_inventory, margin_percent};
use xonter_core::{Money, StockLevel, TransactionAmount, TransactionKind};

fn money_strategy() -> impl Strategy<Value = Money> {
    // Up to ten million with four decimal places, the widest scale a form allows.
    (0i64..100_000_000_000).prop_map(|raw| Money::new(Decimal::new(raw, 4)))
}

fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Income), Just(TransactionKind::Expense)]
}

fn entry_strategy() -> impl Strategy<Value = TransactionAmount> {
    (kind_strategy(), money_strategy()).prop_map(|(kind, amount)| TransactionAmount { kind, amount })
}

fn stock_strategy() -> impl Strategy<Value = StockLevel> {
    (0i64..100_000, money_strategy()).prop_map(|(quantity, sale_price)| StockLevel {
        quantity,
        sale_price,
    })
}

/// Any non-negative `Decimal`, up to `Decimal::MAX`, at any scale.
fn extreme_money_strategy() -> impl Strategy<Value = Money> {
    (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, scale)| Money::new(Decimal::from_parts(lo, mid, hi, false, scale)))
}

/// Rows that pass validation, including the largest quantities and prices.
fn extreme_stock_strategy() -> impl Strategy<Value = StockLevel> {
    (0i64..=i64::MAX, extreme_money_strategy()).prop_map(|(quantity, sale_price)| StockLevel {
        quantity,
        sale_price,
    })
}

fn extreme_entry_strategy() -> impl Strategy<Value = TransactionAmount> {
    (kind_strategy(), extreme_money_strategy())
        .prop_map(|(kind, amount)| TransactionAmount { kind, amount })
}

fn entries_with_shuffle() -> impl Strategy<Value = (Vec<TransactionAmount>, Vec<TransactionAmount>)> {
    proptest::collection::vec(entry_strategy(), 0..64).prop_flat_map(|entries| {
        let shuffled = Just(entries.clone()).prop_shuffle();
        (Just(entries), shuffled)
    })
}

fn stock_with_shuffle() -> impl Strategy<Value = (Vec<StockLevel>, Vec<StockLevel>)> {
    proptest::collection::vec(stock_strategy(), 0..64).prop_flat_map(|items| {
        let shuffled = Just(items.clone()).prop_shuffle();
        (Just(items), shuffled)
    })
}

proptest! {
    #[test]
    fn balance_is_income_minus_expense(entries in proptest::collection::vec(entry_strategy(), 0..64)) {
        let summary = aggregate_financials(&entries);
        prop_assert_eq!(summary.balance(), summary.total_income() - summary.total_expense());
    }

    #[test]
    fn totals_match_per_kind_sums(entries in proptest::collection::vec(entry_strategy(), 0..64)) {
        let summary = aggregate_financials(&entries);

        let income: Money = entries
            .iter()
            .filter(|e| e.kind == TransactionKind::Income)
            .map(|e| e.amount)
            .sum();
        let expense: Money = entries
            .iter()
            .filter(|e| e.kind == TransactionKind::Expense)
            .map(|e| e.amount)
            .sum();

        prop_assert_eq!(summary.total_income(), income);
        prop_assert_eq!(summary.total_expense(), expense);
    }

    #[test]
    fn financials_ignore_input_order((original, shuffled) in entries_with_shuffle()) {
        prop_assert_eq!(aggregate_financials(&original), aggregate_financials(&shuffled));
    }

    #[test]
    fn inventory_ignores_input_order((original, shuffled) in stock_with_shuffle()) {
        prop_assert_eq!(aggregate_inventory(&original), aggregate_inventory(&shuffled));
    }

    #[test]
    fn inventory_value_splits_over_concatenation(
        left in proptest::collection::vec(stock_strategy(), 0..32),
        right in proptest::collection::vec(stock_strategy(), 0..32),
    ) {
        let joined: Vec<StockLevel> = left.iter().chain(right.iter()).copied().collect();

        let a = aggregate_inventory(&left);
        let b = aggregate_inventory(&right);
        let whole = aggregate_inventory(&joined);

        prop_assert_eq!(whole.unit_count, a.unit_count + b.unit_count);
        prop_assert_eq!(whole.total_value, a.total_value + b.total_value);
    }

    #[test]
    fn aggregation_is_idempotent(entries in proptest::collection::vec(entry_strategy(), 0..64)) {
        prop_assert_eq!(aggregate_financials(&entries), aggregate_financials(&entries));
    }

    #[test]
    fn margin_is_zero_without_purchase_price(sale in money_strategy()) {
        prop_assert_eq!(margin_percent(Money::zero(), sale), Decimal::ZERO);
    }

    #[test]
    fn margin_sign_follows_markup(purchase in 1i64..1_000_000, sale in 0i64..2_000_000) {
        let margin = margin_percent(Money::from_cents(purchase), Money::from_cents(sale));
        prop_assert_eq!(margin.is_sign_negative() && !margin.is_zero(), sale < purchase);
        prop_assert_eq!(margin.is_zero(), sale == purchase);
    }

    #[test]
    fn inventory_totals_stay_in_range(items in proptest::collection::vec(extreme_stock_strategy(), 0..16)) {
        let summary = aggregate_inventory(&items);

        prop_assert!(summary.unit_count >= 0);
        prop_assert!(!summary.total_value.is_negative());
        for item in &items {
            prop_assert!(summary.unit_count >= item.quantity);
        }
    }

    #[test]
    fn financials_stay_in_range(entries in proptest::collection::vec(extreme_entry_strategy(), 0..16)) {
        let summary = aggregate_financials(&entries);

        prop_assert!(!summary.total_income().is_negative());
        prop_assert!(!summary.total_expense().is_negative());
        prop_assert_eq!(
            summary.balance(),
            summary.total_income().saturating_sub(summary.total_expense())
        );
    }

    #[test]
    fn margin_is_total_for_any_prices(purchase in extreme_money_strategy(), sale in extreme_money_strategy()) {
        let margin = margin_percent(purchase, sale);
        if purchase.is_zero() {
            prop_assert_eq!(margin, Decimal::ZERO);
        } else if sale < purchase {
            prop_assert!(margin <= Decimal::ZERO);
        } else {
            prop_assert!(margin >= Decimal::ZERO);
        }
    }
}
