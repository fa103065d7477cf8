//! Decimal money helpers.
//!
//! Amounts are plain [`Decimal`] values in the store currency (EUR). The
//! server computes authoritative totals; these helpers back the local
//! optimistic recomputation and display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for money amounts.
pub const MONEY_SCALE: u32 = 2;

/// Price of `quantity` units, saturating at the representable bounds.
#[must_use]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price
        .checked_mul(Decimal::from(quantity))
        .unwrap_or_else(|| saturated(price.is_sign_negative()))
}

/// Sum `amounts`, saturating at the representable bounds.
#[must_use]
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .unwrap_or_else(|| saturated(amount.is_sign_negative()))
    })
}

const fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Round an amount to cents, midpoints away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount the way the storefront displays prices (`1.234,50 €`).
///
/// Uses `.` for thousands grouping and `,` for the decimal separator.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{cents} €")
}
