//! Property-based tests for the mutation engine.
//!
//! Random sequences of entry and savings operations are applied the way the
//! unit of work applies them: against a copy that is kept only on success.
//! After every step the balance, budget and savings invariants must hold,
//! including that the goal holds exactly what its transfer entries moved.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fintrack_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::entry::EntryType;
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{EntryPatch, NewEntry};
use crate::account::UserAggregate;
use crate::budget::{BudgetService, NewBudget};
use crate::saving::{AutoSavingToggle, NewGoal, SavingService};

const CATEGORIES: [&str; 4] = ["food", "shopping", "saving", "salary"];

#[derive(Debug, Clone)]
enum Op {
    Create {
        income: bool,
        cents: i64,
        day: i64,
        category: usize,
    },
    Update {
        pick: usize,
        income: Option<bool>,
        cents: Option<i64>,
        day: Option<i64>,
    },
    Delete {
        pick: usize,
    },
    Deposit {
        cents: i64,
    },
    Withdraw {
        cents: i64,
    },
    Toggle {
        enabled: bool,
        percentage: u8,
    },
    CloseGoal,
    OpenGoal {
        target_cents: i64,
    },
}

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<bool>(), 0i64..200_000, -10i64..40, 0usize..CATEGORIES.len()).prop_map(
            |(income, cents, day, category)| Op::Create { income, cents, day, category }
        ),
        2 => (
            any::<usize>(),
            proptest::option::of(any::<bool>()),
            proptest::option::of(0i64..200_000),
            proptest::option::of(-10i64..40),
        )
            .prop_map(|(pick, income, cents, day)| Op::Update { pick, income, cents, day }),
        2 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
        1 => (1i64..50_000).prop_map(|cents| Op::Deposit { cents }),
        1 => (1i64..50_000).prop_map(|cents| Op::Withdraw { cents }),
        1 => (any::<bool>(), 0u8..60).prop_map(|(enabled, percentage)| Op::Toggle { enabled, percentage }),
        1 => Just(Op::CloseGoal),
        1 => (1i64..100_000).prop_map(|target_cents| Op::OpenGoal { target_cents }),
    ]
}

fn fixture(initial: Decimal, percentage: u8) -> UserAggregate {
    let mut agg = UserAggregate::new(
        UserId::new(),
        "Ayu".to_string(),
        "ayu@example.com".to_string(),
        initial,
    );
    SavingService::create_goal(
        &mut agg,
        NewGoal {
            goal_name: "Trip".to_string(),
            target_amount: dec!(500),
            target_date: base_date() + Duration::days(90),
        },
    )
    .unwrap();
    SavingService::toggle_auto_saving(
        &mut agg,
        AutoSavingToggle {
            enabled: true,
            percentage: Some(percentage),
        },
    )
    .unwrap();
    BudgetService::create(
        &mut agg.budget,
        NewBudget {
            title: "February".to_string(),
            start_date: base_date(),
            deadline: base_date() + Duration::days(27),
            categories: BTreeMap::new(),
        },
        &agg.entries,
    )
    .unwrap();
    agg
}

fn apply(agg: &mut UserAggregate, op: &Op) -> Result<(), LedgerError> {
    let pick_id = |agg: &UserAggregate, pick: usize| {
        (!agg.entries.is_empty()).then(|| agg.entries[pick % agg.entries.len()].id)
    };
    let entry_type = |income: bool| {
        if income {
            EntryType::Income
        } else {
            EntryType::Expense
        }
    };

    match op.clone() {
        Op::Create {
            income,
            cents,
            day,
            category,
        } => {
            let input = NewEntry {
                date: base_date() + Duration::days(day),
                entry_type: entry_type(income),
                category: CATEGORIES[category].to_string(),
                amount: Decimal::new(cents, 2),
                title: "generated".to_string(),
            };
            LedgerService::create_entry(agg, input).map(|_| ())
        }
        Op::Update {
            pick,
            income,
            cents,
            day,
        } => {
            let Some(id) = pick_id(agg, pick) else {
                return Ok(());
            };
            let patch = EntryPatch {
                date: day.map(|d| base_date() + Duration::days(d)),
                entry_type: income.map(entry_type),
                amount: cents.map(|c| Decimal::new(c, 2)),
                title: Some("edited".to_string()),
                ..EntryPatch::default()
            };
            LedgerService::update_entry(agg, id, patch).map(|_| ())
        }
        Op::Delete { pick } => {
            let Some(id) = pick_id(agg, pick) else {
                return Ok(());
            };
            LedgerService::delete_entry(agg, id).map(|_| ())
        }
        Op::Deposit { cents } => {
            SavingService::add_money(agg, Decimal::new(cents, 2), base_date())?;
            Ok(())
        }
        Op::Withdraw { cents } => {
            SavingService::withdraw(agg, Decimal::new(cents, 2), base_date())?;
            Ok(())
        }
        Op::Toggle {
            enabled,
            percentage,
        } => {
            let toggle = AutoSavingToggle {
                enabled,
                percentage: Some(percentage),
            };
            SavingService::toggle_auto_saving(agg, toggle)?;
            Ok(())
        }
        Op::CloseGoal => {
            SavingService::delete_goal(agg, base_date())?;
            Ok(())
        }
        Op::OpenGoal { target_cents } => {
            let input = NewGoal {
                goal_name: "Replacement".to_string(),
                target_amount: Decimal::new(target_cents, 2),
                target_date: base_date() + Duration::days(120),
            };
            SavingService::create_goal(agg, input)?;
            Ok(())
        }
    }
}

fn assert_invariants(agg: &UserAggregate) -> Result<(), TestCaseError> {
    prop_assert!(agg.is_balanced(), "balance drifted from entries");

    if let Some(budget) = &agg.budget {
        let mut rescanned = budget.clone();
        rescanned.recompute_spent(&agg.entries);
        prop_assert_eq!(budget, &rescanned);
    }

    if let Some(goal) = &agg.saving {
        prop_assert!(goal.current_amount <= goal.target_amount);
        prop_assert!(goal.current_amount >= Decimal::ZERO);
        prop_assert_eq!(
            goal.current_amount,
            goal.transferred_total(&agg.entries),
            "goal amount differs from its transfer entries"
        );
    }

    for entry in &agg.entries {
        prop_assert!(entry.amount >= Decimal::ZERO);
        if let Some(parent) = entry.source_entry_id {
            let parent = agg.entry(parent);
            prop_assert!(parent.is_some(), "transfer outlived its parent entry");
            prop_assert_eq!(parent.map(|p| p.date), Some(entry.date));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Balance, budget spend and goal amount stay consistent after every operation,
    /// and failed operations leave the aggregate untouched.
    #[test]
    fn test_invariants_hold_for_any_sequence(
        percentage in 1u8..=50,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut agg = fixture(dec!(1000), percentage);

        for op in &ops {
            let mut draft = agg.clone();
            match apply(&mut draft, op) {
                Ok(()) => agg = draft,
                Err(_) => prop_assert_eq!(&draft, &agg),
            }
            assert_invariants(&agg)?;
        }
    }

    /// Auto-saving never pushes the goal past its target.
    #[test]
    fn test_auto_saving_never_overshoots(
        percentage in 1u8..=50,
        incomes in prop::collection::vec(1i64..1_000_000, 1..30),
    ) {
        let mut agg = fixture(dec!(0), percentage);

        for cents in incomes {
            let input = NewEntry {
                date: base_date(),
                entry_type: EntryType::Income,
                category: "salary".to_string(),
                amount: Decimal::new(cents, 2),
                title: "pay".to_string(),
            };
            let _ = LedgerService::create_entry(&mut agg, input);
            let goal = agg.saving.as_ref().unwrap();
            prop_assert!(goal.current_amount <= goal.target_amount);
        }
    }
}

#[test]
fn test_scenario_income_expense_auto_saving_and_delete() {
    let mut agg = UserAggregate::new(
        UserId::new(),
        "Ayu".to_string(),
        "ayu@example.com".to_string(),
        dec!(1000),
    );
    let entry = |entry_type, category: &str, amount| NewEntry {
        date: base_date(),
        entry_type,
        category: category.to_string(),
        amount,
        title: "scenario".to_string(),
    };

    LedgerService::create_entry(&mut agg, entry(EntryType::Income, "salary", dec!(500))).unwrap();
    assert_eq!(agg.current_balance, dec!(1500));

    LedgerService::create_entry(&mut agg, entry(EntryType::Expense, "food", dec!(200))).unwrap();
    assert_eq!(agg.current_balance, dec!(1300));

    SavingService::create_goal(
        &mut agg,
        NewGoal {
            goal_name: "Emergency".to_string(),
            target_amount: dec!(1000),
            target_date: base_date() + Duration::days(365),
        },
    )
    .unwrap();
    SavingService::toggle_auto_saving(
        &mut agg,
        AutoSavingToggle {
            enabled: true,
            percentage: Some(10),
        },
    )
    .unwrap();

    let created =
        LedgerService::create_entry(&mut agg, entry(EntryType::Income, "bonus", dec!(300))).unwrap();
    assert_eq!(agg.saving.as_ref().unwrap().current_amount, dec!(30));
    assert_eq!(agg.current_balance, dec!(1570));
    assert_eq!(agg.entries.len(), 4);
    // The main entry keeps the requested amount; the transfer holds the share.
    assert_eq!(created.entry.amount, dec!(300));
    assert_eq!(created.savings_transfer.as_ref().unwrap().amount, dec!(30));

    LedgerService::delete_entry(&mut agg, created.entry.id).unwrap();
    assert_eq!(agg.current_balance, dec!(1300));
    assert_eq!(agg.saving.as_ref().unwrap().current_amount, dec!(0));
    assert_eq!(agg.entries.len(), 2);
    assert!(agg.is_balanced());
}
