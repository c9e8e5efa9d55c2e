//! Loyalty points: balance, earning rules and the rewards catalog.
//!
//! Redemption is display-only; nothing here deducts from a balance.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Baht of sales needed to earn one point.
pub const BAHT_PER_POINT: u32 = 10;

/// Baht value of one point (0.1).
#[must_use]
pub fn point_value() -> Decimal {
    Decimal::new(1, 1)
}

/// Points earned for a sale of `amount`: one per full ฿10. Non-positive
/// amounts earn nothing; amounts beyond `u64` points saturate.
#[must_use]
pub fn points_for(amount: &Price) -> u64 {
    let points = (amount.amount / Decimal::from(BAHT_PER_POINT)).floor();
    if points.is_sign_negative() {
        0
    } else {
        points.to_u64().unwrap_or(u64::MAX)
    }
}

/// The seller's points account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    /// Points available now.
    pub balance: u64,
    /// Points earned since the account opened.
    pub lifetime_earned: u64,
}

impl LoyaltyAccount {
    /// Baht equivalent of the current balance, rounded to whole baht.
    #[must_use]
    pub fn monetary_value(&self) -> Price {
        let value = Decimal::from(self.balance) * point_value();
        Price::baht(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    #[must_use]
    pub const fn can_afford(&self, reward: &Reward) -> bool {
        self.balance >= reward.cost
    }
}

/// A redeemable benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub title: String,
    pub description: String,
    pub cost: u64,
}

/// How points are earned, as shown on the points page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningRule {
    pub title: &'static str,
    pub detail: &'static str,
}

/// The earning rules.
#[must_use]
pub const fn earning_rules() -> [EarningRule; 2] {
    [
        EarningRule {
            title: "Sell produce",
            detail: "฿10 in sales = 1 point",
        },
        EarningRule {
            title: "Organic produce",
            detail: "2x bonus points",
        },
    ]
}

/// The standard rewards catalog.
#[must_use]
pub fn default_rewards() -> Vec<Reward> {
    vec![
        Reward {
            title: "10% off shipping".to_string(),
            description: "Lower delivery costs for produce sent to customers".to_string(),
            cost: 50,
        },
        Reward {
            title: "50% off commission".to_string(),
            description: "Half the platform service fee for one month".to_string(),
            cost: 150,
        },
        Reward {
            title: "Free promotion".to_string(),
            description: "Promote one product for 7 days".to_string(),
            cost: 200,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monetary_value_rounds_to_whole_baht() {
        let account = LoyaltyAccount {
            balance: 1247,
            lifetime_earned: 2156,
        };
        assert_eq!(account.monetary_value().display(), "฿125");
    }

    #[test]
    fn test_monetary_value_half_rounds_up() {
        let account = LoyaltyAccount {
            balance: 5,
            lifetime_earned: 5,
        };
        assert_eq!(account.monetary_value().display(), "฿1");
    }

    #[test]
    fn test_points_for_floors() {
        assert_eq!(points_for(&Price::baht(Decimal::from(45))), 4);
        assert_eq!(points_for(&Price::baht(Decimal::from(80))), 8);
        assert_eq!(points_for(&Price::baht(Decimal::from(9))), 0);
        assert_eq!(points_for(&Price::baht(Decimal::new(995, 1))), 9);
    }

    #[test]
    fn test_points_for_extremes() {
        assert_eq!(points_for(&Price::baht(Decimal::MAX)), u64::MAX);
        assert_eq!(points_for(&Price::baht(Decimal::from(-45))), 0);
        assert_eq!(points_for(&Price::zero()), 0);
    }

    #[test]
    fn test_can_afford() {
        let account = LoyaltyAccount {
            balance: 150,
            lifetime_earned: 300,
        };
        let rewards = default_rewards();
        let affordable: Vec<_> = rewards.iter().map(|r| account.can_afford(r)).collect();
        assert_eq!(affordable, [true, true, false]);
    }
}
