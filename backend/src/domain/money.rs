//! Monetary amounts held in minor units.
//!
//! Prices cross the wire as decimal numbers in major units (`150.5`) but are
//! stored and multiplied as integer cents so booking totals never drift.

use std::fmt;

/// Errors raised when parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// Input was not a plain decimal number.
    #[error("amount must be a decimal number")]
    NotANumber,
    /// More than two fractional digits were supplied.
    #[error("amount must have at most two decimal places")]
    TooPrecise,
    /// The amount does not fit in the supported range.
    #[error("amount is out of range")]
    OutOfRange,
}

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Wrap a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly above zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Multiply by a whole quantity, returning `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Parse a decimal string in major units such as `"150"` or `"99.95"`.
    ///
    /// # Examples
    /// ```
    /// use rental_admin::domain::Money;
    ///
    /// assert_eq!(Money::parse_decimal("99.5").map(Money::cents), Ok(9950));
    /// assert!(Money::parse_decimal("1.234").is_err());
    /// ```
    pub fn parse_decimal(raw: &str) -> Result<Self, MoneyError> {
        let raw = raw.trim();
        let (negative, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(MoneyError::NotANumber);
        }
        // serde_json renders whole floats as "150.0"; trailing zeros carry no precision.
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(MoneyError::TooPrecise);
        }
        let whole_cents = whole
            .parse::<i64>()
            .ok()
            .and_then(|value| value.checked_mul(100))
            .ok_or(MoneyError::OutOfRange)?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyError::NotANumber)? * 10,
            _ => fraction.parse::<i64>().map_err(|_| MoneyError::NotANumber)?,
        };
        let cents = whole_cents
            .checked_add(fraction_cents)
            .ok_or(MoneyError::OutOfRange)?;
        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Amount in major units for JSON output.
    #[expect(
        clippy::cast_precision_loss,
        reason = "prices are far below 2^53 cents"
    )]
    pub fn to_major_units(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
