//! Pricing and discount calculations.
//!
//! All arithmetic here runs on integer cents via [`Money`]; `Decimal`
//! appears only at the boundaries. A package price is authoritative over
//! the computed per-minute price whenever a package applies.

use rust_decimal::Decimal;

use super::error::{SchedulingError, SchedulingResult};
use crate::api::{ReaderRateCard, ReadingPackage, ReadingType};
use crate::models::money::Money;

/// Percentage saved when paying `discounted` instead of `original`,
/// rounded half away from zero.
///
/// # Arguments
/// * `original` - The reference price; must be strictly positive
/// * `discounted` - The actual price
///
/// # Returns
/// * `Ok(i32)` - Rounded percentage, negative when `discounted > original`
/// * `Err(SchedulingError::InvalidPrice)` - If `original <= 0` or a price
///   does not fit in cents
pub fn discount_percent(original: Decimal, discounted: Decimal) -> SchedulingResult<i32> {
    if original <= Decimal::ZERO {
        return Err(SchedulingError::InvalidPrice(format!(
            "Original price must be positive, got {}",
            original
        )));
    }

    let original_cents = Money::from_decimal(original)
        .ok_or_else(|| SchedulingError::InvalidPrice(format!("Price out of range: {}", original)))?
        .cents();
    let discounted_cents = Money::from_decimal(discounted)
        .ok_or_else(|| {
            SchedulingError::InvalidPrice(format!("Price out of range: {}", discounted))
        })?
        .cents();

    let numerator = i128::from(original_cents - discounted_cents) * 100;
    let percent = div_round_half_away(numerator, i128::from(original_cents));
    Ok(percent as i32)
}

/// Integer division rounding halves away from zero. `denom` must be positive.
fn div_round_half_away(num: i128, denom: i128) -> i128 {
    if num >= 0 {
        (2 * num + denom) / (2 * denom)
    } else {
        -((2 * -num + denom) / (2 * denom))
    }
}

/// Advertised discount of a package against its original price, if any.
pub fn package_discount(package: &ReadingPackage) -> Option<i32> {
    let original = package.original_price?;
    discount_percent(original, package.price).ok()
}

/// Price of a session, in cents.
///
/// The package price wins when a package applies; otherwise the price is
/// the reader's per-minute rate for the reading type scaled by the
/// duration. Returns `None` when neither source yields a price.
pub fn effective_price(
    package: Option<&ReadingPackage>,
    rate_card: Option<&ReaderRateCard>,
    reading_type: ReadingType,
    duration_minutes: u32,
) -> Option<Money> {
    if let Some(package) = package {
        return Money::from_decimal(package.price);
    }

    let rate = rate_card?.rate_for(reading_type)?;
    Money::from_decimal(rate)?.times_minutes(duration_minutes)
}
