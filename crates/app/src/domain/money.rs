//! Monetary amounts held as integer minor units.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use sqlx::{Row, postgres::PgRow};
use thiserror::Error;

/// Number of fractional digits carried by an amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Why an amount could not be represented in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("must not be negative")]
    Negative,

    #[error("must have at most {MINOR_UNIT_SCALE} decimal places")]
    TooPrecise,

    #[error("is too large")]
    Overflow,
}

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(u64);

impl Cents {
    /// No money.
    pub const ZERO: Self = Self(0);

    /// Wrap a count of cents.
    #[must_use]
    pub const fn new(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount such as `9.99` into cents.
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts, amounts with more than two
    /// fractional digits, or amounts that do not fit.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }

        if amount.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(MoneyError::TooPrecise);
        }

        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_u64())
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), MINOR_UNIT_SCALE)
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(u64::from(quantity)).map(Self)
    }

    /// Value as stored in a `BIGINT` column.
    ///
    /// # Errors
    ///
    /// Returns an error when the amount exceeds `i64::MAX`.
    pub fn to_i64(self) -> Result<i64, MoneyError> {
        i64::try_from(self.0).map_err(|_overflow| MoneyError::Overflow)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.to_decimal(), f)
    }
}

/// Read a `BIGINT` cents column.
pub(crate) fn try_get_cents(row: &PgRow, column: &str) -> sqlx::Result<Cents> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value)
        .map(Cents::new)
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

/// Encode cents for a `BIGINT` bind parameter.
pub(crate) fn cents_to_bind(amount: Cents) -> sqlx::Result<i64> {
    amount.to_i64().map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn converts_two_decimal_places_exactly() -> TestResult {
        assert_eq!(Cents::from_decimal(Decimal::from_str("9.99")?)?, Cents::new(999));
        assert_eq!(Cents::from_decimal(Decimal::from_str("19.9")?)?, Cents::new(1990));
        assert_eq!(Cents::from_decimal(Decimal::from_str("5")?)?, Cents::new(500));

        Ok(())
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() -> TestResult {
        assert_eq!(
            Cents::from_decimal(Decimal::from_str("1.2300")?)?,
            Cents::new(123)
        );

        Ok(())
    }

    #[test]
    fn rejects_sub_cent_amounts() -> TestResult {
        assert_eq!(
            Cents::from_decimal(Decimal::from_str("0.001")?),
            Err(MoneyError::TooPrecise)
        );

        Ok(())
    }

    #[test]
    fn rejects_negative_amounts() -> TestResult {
        assert_eq!(
            Cents::from_decimal(Decimal::from_str("-1.00")?),
            Err(MoneyError::Negative)
        );

        Ok(())
    }

    #[test]
    fn formats_as_decimal() {
        assert_eq!(Cents::new(3997).to_string(), "39.97");
        assert_eq!(Cents::new(5).to_decimal(), Decimal::new(5, 2));
    }

    #[test]
    fn sums_without_float_drift() {
        let total = [Cents::new(10), Cents::new(20)]
            .into_iter()
            .try_fold(Cents::ZERO, Cents::checked_add);

        assert_eq!(total, Some(Cents::new(30)));
        assert_eq!(Cents::new(u64::MAX).checked_mul(2), None);
    }
}
