//! Type-safe price representation using decimal arithmetic.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Largest unit price the catalog and seed files accept, in baht.
pub const MAX_UNIT_PRICE_BAHT: u32 = 1_000_000;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (baht, not satang).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Thai baht.
    #[must_use]
    pub const fn baht(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::THB)
    }

    /// A zero price in Thai baht.
    #[must_use]
    pub const fn zero() -> Self {
        Self::baht(Decimal::ZERO)
    }

    /// Price of `quantity` units at this unit price, saturating at the
    /// largest representable amount.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Price of `quantity` units, or `None` on overflow.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, rhs: Self) -> Option<Self> {
        self.amount
            .checked_add(rhs.amount)
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Whether this is a usable unit price: positive and no more than
    /// [`MAX_UNIT_PRICE_BAHT`].
    #[must_use]
    pub fn is_valid_unit_price(&self) -> bool {
        self.is_positive() && self.amount <= Decimal::from(MAX_UNIT_PRICE_BAHT)
    }

    /// Format for display, e.g. `฿1,234` or `฿45.50`.
    ///
    /// Whole amounts are shown without a fraction; anything else is shown
    /// with two decimal places. The integer part is grouped by thousands.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let whole = abs.trunc();
        let fraction = abs - whole;

        let mut out = format!(
            "{sign}{}{}",
            self.currency_code.symbol(),
            group_thousands(&whole.normalize().to_string())
        );
        if !fraction.is_zero() {
            let satang = (fraction * Decimal::ONE_HUNDRED).round().to_u32().unwrap_or(0);
            out.push_str(&format!(".{satang:02}"));
        }
        out
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at the largest representable amount.
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.amount.saturating_add(rhs.amount), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// Insert a comma between every group of three digits.
///
/// ```
/// assert_eq!(farm2hand_core::group_thousands("1247"), "1,247");
/// ```
#[must_use]
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    THB,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::THB => "฿",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::THB => "THB",
        }
    }
}
