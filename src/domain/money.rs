//! Integer money helpers. Amounts are minor units, rates are basis points.

/// Basis points making up one whole (100 %, or a ×1 multiplier).
pub const BASIS_POINTS_PER_UNIT: i64 = 10_000;

/// Apply a basis point rate to an amount, rounding half away from zero.
///
/// `None` when the result does not fit in `i64`.
pub fn apply_basis_points(amount_cents: i64, rate_bp: i64) -> Option<i64> {
    let product = i128::from(amount_cents) * i128::from(rate_bp);
    let divisor = i128::from(BASIS_POINTS_PER_UNIT);
    let half = divisor / 2;

    let rounded = if product >= 0 {
        (product + half) / divisor
    } else {
        (product - half) / divisor
    };

    i64::try_from(rounded).ok()
}

/// Sum of `amounts`, or `None` on overflow.
pub fn checked_sum<I>(amounts: I) -> Option<i64>
where
    I: IntoIterator<Item = i64>,
{
    amounts
        .into_iter()
        .try_fold(0_i64, |total, amount| total.checked_add(amount))
}

/// Parse a non-negative decimal string into an integer scaled by `10^scale`.
///
/// `parse_fixed_point("12.5", 2)` yields `1250`. More fractional digits than
/// `scale` are rejected rather than silently truncated.
pub fn parse_fixed_point(input: &str, scale: u32) -> Option<i64> {
    let trimmed = input.trim().replace(',', ".");
    if trimmed.is_empty() {
        return None;
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
        || fraction.len() > scale as usize
    {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };

    let mut fraction_value: i64 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().ok()?
    };
    for _ in fraction.len()..scale as usize {
        fraction_value = fraction_value.checked_mul(10)?;
    }

    whole_value
        .checked_mul(10_i64.checked_pow(scale)?)?
        .checked_add(fraction_value)
}

/// Render minor units as a plain decimal string, e.g. `1250` -> `12.50`.
pub fn format_cents(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let absolute = amount_cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_points_round_half_away_from_zero() {
        assert_eq!(apply_basis_points(23_000, 1_000), Some(2_300));
        assert_eq!(apply_basis_points(5, 5_000), Some(3));
        assert_eq!(apply_basis_points(-5, 5_000), Some(-3));
        assert_eq!(apply_basis_points(10_000, 12_500), Some(12_500));
        assert_eq!(apply_basis_points(333, 3_333), Some(111));
    }

    #[test]
    fn out_of_range_amounts_are_not_wrapped() {
        assert_eq!(apply_basis_points(i64::MAX, 20_000), None);
        assert_eq!(apply_basis_points(i64::MIN, 20_000), None);
        assert_eq!(apply_basis_points(i64::MAX, 10_000), Some(i64::MAX));

        assert_eq!(checked_sum([1, 2, 3]), Some(6));
        assert_eq!(checked_sum([i64::MAX, 1]), None);
        assert_eq!(checked_sum(Vec::new()), Some(0));
    }

    #[test]
    fn parse_fixed_point_scales_and_rejects_garbage() {
        assert_eq!(parse_fixed_point("12.5", 2), Some(1250));
        assert_eq!(parse_fixed_point("12,50", 2), Some(1250));
        assert_eq!(parse_fixed_point("7", 2), Some(700));
        assert_eq!(parse_fixed_point(".5", 2), Some(50));
        assert_eq!(parse_fixed_point("1.25", 4), Some(12500));
        assert_eq!(parse_fixed_point("1.234", 2), None);
        assert_eq!(parse_fixed_point("-1", 2), None);
        assert_eq!(parse_fixed_point("abc", 2), None);
        assert_eq!(parse_fixed_point(".", 2), None);
        assert_eq!(parse_fixed_point("", 2), None);
    }

    #[test]
    fn format_cents_pads_fraction() {
        assert_eq!(format_cents(25_300), "253.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-1_050), "-10.50");
    }
}
