//! Split resolution: how much of one expense each member carries

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Both members' shares of a single expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shares {
    pub a: BigDecimal,
    pub b: BigDecimal,
}

impl Shares {
    /// Share carried by the given member
    pub fn of(&self, partner: Partner) -> &BigDecimal {
        match partner {
            Partner::A => &self.a,
            Partner::B => &self.b,
        }
    }
}

/// Partner A's share of `amount` under `rule`
///
/// An income split with no combined income falls back to an even split.
pub fn resolve_share_of(amount: &BigDecimal, rule: &SplitRule, profiles: &Profiles) -> BigDecimal {
    match rule {
        SplitRule::Even => amount / BigDecimal::from(2),
        SplitRule::Income => {
            let total_income = profiles.total_income();
            if total_income > BigDecimal::from(0) {
                (amount * &profiles.a.income) / total_income
            } else {
                amount / BigDecimal::from(2)
            }
        }
        SplitRule::Custom(percent) => {
            (amount * BigDecimal::from(percent.value())) / BigDecimal::from(100)
        }
    }
}

/// Partner A's share of an expense
pub fn resolve_share(expense: &Expense, profiles: &Profiles) -> BigDecimal {
    resolve_share_of(&expense.amount, &expense.split, profiles)
}

/// Both shares of an expense; partner B's is always `amount - share_a`
pub fn split_shares(expense: &Expense, profiles: &Profiles) -> Shares {
    let a = resolve_share(expense, profiles);
    let b = &expense.amount - &a;
    Shares { a, b }
}
