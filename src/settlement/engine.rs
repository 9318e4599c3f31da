//! Settlement engine folding split shares over a household's expenses

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::split::split_shares;
use crate::types::*;

/// Text shown when nobody owes anything
pub const SETTLED_TEXT: &str = "All settled up!";

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Balances smaller than this in magnitude count as settled
    pub settled_tolerance: BigDecimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            settled_tolerance: BigDecimal::from(1) / BigDecimal::from(100),
        }
    }
}

/// Who owes whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementDirection {
    Settled,
    /// Positive balance
    BOwesA,
    /// Negative balance
    AOwesB,
}

impl SettlementDirection {
    /// Member who has to pay, if any
    pub fn debtor(&self) -> Option<Partner> {
        match self {
            SettlementDirection::Settled => None,
            SettlementDirection::BOwesA => Some(Partner::B),
            SettlementDirection::AOwesB => Some(Partner::A),
        }
    }

    /// Member who gets paid, if any
    pub fn creditor(&self) -> Option<Partner> {
        self.debtor().map(|p| p.other())
    }
}

/// What one member paid, what they are responsible for, and the difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub paid: BigDecimal,
    pub owed: BigDecimal,
    pub net: BigDecimal,
}

/// Per-member contribution breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributions {
    #[serde(rename = "A")]
    pub a: Contribution,
    #[serde(rename = "B")]
    pub b: Contribution,
}

impl Contributions {
    pub fn get(&self, partner: Partner) -> &Contribution {
        match partner {
            Partner::A => &self.a,
            Partner::B => &self.b,
        }
    }
}

/// Derived settlement state; recomputed on every read, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Positive when B owes A, negative when A owes B
    pub balance: BigDecimal,
    pub direction: SettlementDirection,
    /// Human-readable statement of who owes whom
    pub owed_text: String,
    /// Magnitude of the balance
    pub owed_amount: BigDecimal,
    pub contributions: Contributions,
    /// Sum of every expense amount
    pub total_expenses: BigDecimal,
}

impl Settlement {
    pub fn is_settled(&self) -> bool {
        self.direction == SettlementDirection::Settled
    }

    /// Owed amount rounded to cents
    pub fn rounded_amount(&self) -> BigDecimal {
        self.owed_amount.round(2)
    }
}

/// Computes settlements under a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: SettlementConfig,
}

impl SettlementEngine {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Fold every expense into a balance and a contribution breakdown
    ///
    /// The balance only tracks the debt moved onto the non-paying member,
    /// while contributions track absolute paid/owed totals. Both are kept.
    pub fn compute(&self, expenses: &[Expense], profiles: &Profiles) -> Settlement {
        let zero = BigDecimal::from(0);
        let mut balance = zero.clone();
        let mut paid_by_a = zero.clone();
        let mut paid_by_b = zero.clone();
        let mut owed_by_a = zero.clone();
        let mut owed_by_b = zero.clone();

        for expense in expenses {
            let shares = split_shares(expense, profiles);

            match expense.paid_by {
                Partner::A => {
                    balance += &shares.b;
                    paid_by_a += &expense.amount;
                }
                Partner::B => {
                    balance -= &shares.a;
                    paid_by_b += &expense.amount;
                }
            }

            owed_by_a += shares.a;
            owed_by_b += shares.b;
        }

        let direction = self.direction_of(&balance);
        let owed_text = match direction {
            SettlementDirection::Settled => SETTLED_TEXT.to_string(),
            SettlementDirection::BOwesA => format!("{} owes {}", profiles.b.name, profiles.a.name),
            SettlementDirection::AOwesB => format!("{} owes {}", profiles.a.name, profiles.b.name),
        };

        tracing::debug!(
            expenses = expenses.len(),
            balance = %balance,
            "computed settlement"
        );

        Settlement {
            owed_amount: balance.abs(),
            balance,
            direction,
            owed_text,
            contributions: Contributions {
                a: Contribution {
                    net: &paid_by_a - &owed_by_a,
                    paid: paid_by_a,
                    owed: owed_by_a,
                },
                b: Contribution {
                    net: &paid_by_b - &owed_by_b,
                    paid: paid_by_b,
                    owed: owed_by_b,
                },
            },
            total_expenses: expenses.iter().map(|e| &e.amount).sum(),
        }
    }

    fn direction_of(&self, balance: &BigDecimal) -> SettlementDirection {
        let zero = BigDecimal::from(0);
        if *balance == zero || balance.abs() < self.config.settled_tolerance {
            SettlementDirection::Settled
        } else if *balance > zero {
            SettlementDirection::BOwesA
        } else {
            SettlementDirection::AOwesB
        }
    }
}

/// Compute a settlement with the default configuration
pub fn compute_settlement(expenses: &[Expense], profiles: &Profiles) -> Settlement {
    SettlementEngine::default().compute(expenses, profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn household(income_a: i64, income_b: i64) -> Profiles {
        Profiles::new(
            MemberProfile::new("Alex".to_string(), String::new(), BigDecimal::from(income_a))
                .unwrap(),
            MemberProfile::new("Blair".to_string(), String::new(), BigDecimal::from(income_b))
                .unwrap(),
        )
    }

    fn expense(id: &str, amount: i64, paid_by: Partner, split: SplitRule) -> Expense {
        Expense {
            id: id.to_string(),
            description: format!("expense {}", id),
            amount: BigDecimal::from(amount),
            paid_by,
            split,
            category: Category::Other,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_empty_ledger_is_settled() {
        let settlement = compute_settlement(&[], &household(1000, 1000));
        assert_eq!(settlement.balance, BigDecimal::from(0));
        assert_eq!(settlement.owed_text, SETTLED_TEXT);
        assert_eq!(settlement.owed_amount, BigDecimal::from(0));
        assert_eq!(settlement.total_expenses, BigDecimal::from(0));
        assert!(settlement.is_settled());
    }

    #[test]
    fn test_even_split_sign() {
        let profiles = household(0, 0);

        let paid_by_a =
            compute_settlement(&[expense("1", 100, Partner::A, SplitRule::Even)], &profiles);
        assert_eq!(paid_by_a.balance, BigDecimal::from(50));
        assert_eq!(paid_by_a.direction, SettlementDirection::BOwesA);
        assert_eq!(paid_by_a.owed_text, "Blair owes Alex");

        let paid_by_b =
            compute_settlement(&[expense("1", 100, Partner::B, SplitRule::Even)], &profiles);
        assert_eq!(paid_by_b.balance, BigDecimal::from(-50));
        assert_eq!(paid_by_b.owed_amount, BigDecimal::from(50));
        assert_eq!(paid_by_b.owed_text, "Alex owes Blair");

        let debtor = paid_by_b.contributions.get(Partner::A);
        assert_eq!(debtor.paid, BigDecimal::from(0));
        assert_eq!(debtor.owed, BigDecimal::from(50));
        assert_eq!(debtor.net, BigDecimal::from(-50));
        assert_eq!(
            paid_by_b.contributions.get(Partner::B).net,
            BigDecimal::from(50)
        );
        assert_eq!(paid_by_b.direction.debtor(), Some(Partner::A));
        assert_eq!(paid_by_b.direction.creditor(), Some(Partner::B));
    }

    #[test]
    fn test_income_and_custom_splits() {
        let income = compute_settlement(
            &[expense("1", 100, Partner::A, SplitRule::Income)],
            &household(6000, 4000),
        );
        assert_eq!(income.balance, BigDecimal::from(40));

        let custom = compute_settlement(
            &[expense(
                "1",
                100,
                Partner::A,
                SplitRule::Custom(SplitPercent::new(70).unwrap()),
            )],
            &household(0, 0),
        );
        assert_eq!(custom.balance, BigDecimal::from(30));
    }

    #[test]
    fn test_balance_is_order_independent() {
        let profiles = household(5200, 3100);
        let mut expenses = vec![
            expense("1", 120, Partner::A, SplitRule::Income),
            expense("2", 37, Partner::B, SplitRule::Even),
            expense("3", 999, Partner::B, SplitRule::Custom(SplitPercent::new(15).unwrap())),
            expense("4", 13, Partner::A, SplitRule::Income),
        ];

        let forward = compute_settlement(&expenses, &profiles).balance;
        expenses.reverse();
        let backward = compute_settlement(&expenses, &profiles).balance;
        expenses.swap(0, 2);
        let shuffled = compute_settlement(&expenses, &profiles).balance;

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_even_contributions_mirror_each_other() {
        let expenses = vec![
            expense("1", 100, Partner::A, SplitRule::Even),
            expense("2", 40, Partner::B, SplitRule::Even),
        ];
        let settlement = compute_settlement(&expenses, &household(0, 0));

        assert_eq!(settlement.contributions.a.paid, BigDecimal::from(100));
        assert_eq!(settlement.contributions.a.owed, BigDecimal::from(70));
        assert_eq!(settlement.contributions.a.net, BigDecimal::from(30));
        assert_eq!(settlement.contributions.b.net, BigDecimal::from(-30));
        assert_eq!(
            settlement.contributions.a.net,
            -settlement.contributions.b.net.clone()
        );
        assert_eq!(settlement.total_expenses, BigDecimal::from(140));
    }

    #[test]
    fn test_balance_tracks_a_net_under_asymmetric_incomes() {
        let expenses = vec![
            expense("1", 250, Partner::A, SplitRule::Income),
            expense("2", 80, Partner::B, SplitRule::Income),
            expense("3", 19, Partner::B, SplitRule::Custom(SplitPercent::new(90).unwrap())),
        ];
        let settlement = compute_settlement(&expenses, &household(7000, 3001));

        assert_eq!(settlement.balance, settlement.contributions.a.net);
        assert_eq!(
            &settlement.contributions.a.net + &settlement.contributions.b.net,
            BigDecimal::from(0)
        );
    }

    #[test]
    fn test_tolerance_absorbs_fractional_noise() {
        let engine = SettlementEngine::new(SettlementConfig::default());
        let expenses = vec![
            expense("1", 10, Partner::A, SplitRule::Even),
            Expense {
                amount: "10.01".parse().unwrap(),
                ..expense("2", 10, Partner::B, SplitRule::Even)
            },
        ];

        let settlement = engine.compute(&expenses, &household(0, 0));
        assert_eq!(settlement.balance, "-0.005".parse::<BigDecimal>().unwrap());
        assert!(settlement.is_settled());
        assert_eq!(settlement.owed_text, SETTLED_TEXT);
    }

    #[test]
    fn test_rounded_amount() {
        let settlement = compute_settlement(
            &[expense("1", 100, Partner::A, SplitRule::Income)],
            &household(1, 2),
        );
        assert_eq!(settlement.rounded_amount(), "66.67".parse::<BigDecimal>().unwrap());
    }
}
