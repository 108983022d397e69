//! Sellable price derivation.
//!
//! Every place that turns a list price into the price a customer pays goes
//! through [`special_price`], so product rows, cart snapshots and order
//! snapshots all agree on the rounding.

use bigdecimal::{BigDecimal, RoundingMode, Zero};

use super::errors::DomainError;

/// Fractional digits kept on every monetary amount.
pub const MONEY_SCALE: i64 = 2;

/// `price - price * discount_percent / 100`, rounded half-up to cents.
pub fn special_price(price: &BigDecimal, discount_percent: &BigDecimal) -> BigDecimal {
    let hundred = BigDecimal::from(100);
    let discount = price * discount_percent / hundred;
    round_money(&(price - discount))
}

/// Contribution of one line to a cart or order total.
pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    round_money(&(unit_price * BigDecimal::from(quantity)))
}

pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

/// Largest amount a stored price column holds (12 digits, 2 of them cents).
pub fn max_price() -> BigDecimal {
    BigDecimal::new(999_999_999_999_i64.into(), MONEY_SCALE)
}

fn has_sub_cent_digits(amount: &BigDecimal) -> bool {
    &round_money(amount) != amount
}

/// Rejects a negative or oversized price, a discount outside `0..=100`, and
/// either value carrying more than two fractional digits.
pub fn validate_pricing(
    price: &BigDecimal,
    discount_percent: &BigDecimal,
) -> Result<(), DomainError> {
    if price < &BigDecimal::zero() {
        return Err(DomainError::validation("price", "must not be negative"));
    }
    if price > &max_price() {
        return Err(DomainError::validation(
            "price",
            format!("must not exceed {}", max_price()),
        ));
    }
    if has_sub_cent_digits(price) {
        return Err(DomainError::validation(
            "price",
            "must have at most two decimal places",
        ));
    }
    if has_sub_cent_digits(discount_percent) {
        return Err(DomainError::validation(
            "discount_percent",
            "must have at most two decimal places",
        ));
    }
    if discount_percent < &BigDecimal::zero() || discount_percent > &BigDecimal::from(100) {
        return Err(DomainError::validation(
            "discount_percent",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}
