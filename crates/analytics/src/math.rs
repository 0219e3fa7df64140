use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a display-facing value to cents, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100`, or zero for an empty whole.
pub(crate) fn percent(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

pub(crate) fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

/// Adds `value` into `total`. A sum that would leave the `Decimal` range
/// keeps its previous value and the addend is dropped.
pub(crate) fn accumulate(total: &mut Decimal, value: Decimal, field: &'static str) {
    match total.checked_add(value) {
        Some(sum) => *total = sum,
        None => tracing::warn!(field, %value, "Decimal overflow; value left out of the sum"),
    }
}

/// `numerator / denominator`, or zero when the denominator is zero or the
/// quotient is out of range.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal, field: &'static str) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        tracing::warn!(field, %numerator, %denominator, "Decimal overflow; ratio reported as zero");
        Decimal::ZERO
    })
}

/// `part / whole * 100` over decimals, zero when out of range.
pub(crate) fn percent_of(part: Decimal, whole: Decimal, field: &'static str) -> Decimal {
    ratio(part, whole, field)
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or_else(|| {
            tracing::warn!(field, %part, %whole, "Decimal overflow; percentage reported as zero");
            Decimal::ZERO
        })
}

/// `(avg_num * num_count) / (avg_den * den_count)`, zero when out of range.
pub(crate) fn weighted_ratio(
    avg_num: Decimal,
    num_count: usize,
    avg_den: Decimal,
    den_count: usize,
    field: &'static str,
) -> Decimal {
    let numerator = avg_num.checked_mul(Decimal::from(num_count));
    let denominator = avg_den.checked_mul(Decimal::from(den_count));
    match (numerator, denominator) {
        (Some(n), Some(d)) => ratio(n, d, field),
        _ => {
            tracing::warn!(field, "Decimal overflow; ratio reported as zero");
            Decimal::ZERO
        }
    }
}

/// Mean and population standard deviation. `None` for an empty sample or
/// when the moments leave the `Decimal` range.
pub(crate) fn mean_and_std_dev(values: &[Decimal]) -> Option<(Decimal, Decimal)> {
    if values.is_empty() {
        return None;
    }
    let moments = checked_moments(values);
    if moments.is_none() {
        tracing::warn!(samples = values.len(), "Decimal overflow computing standard deviation");
    }
    moments
}

fn checked_moments(values: &[Decimal]) -> Option<(Decimal, Decimal)> {
    let count = Decimal::from(values.len());
    let mut sum = Decimal::ZERO;
    for v in values {
        sum = sum.checked_add(*v)?;
    }
    let mean = sum.checked_div(count)?;

    let mut squares = Decimal::ZERO;
    for v in values {
        let deviation = v.checked_sub(mean)?;
        squares = squares.checked_add(deviation.checked_mul(deviation)?)?;
    }
    let std_dev = squares.checked_div(count)?.sqrt()?;
    Some((mean, std_dev))
}
