//! Dual-currency price formatting.
//!
//! Prices are stored in USD and displayed in both USD and VES (bolívares)
//! at the current exchange rate. Output must match the locale formatting the
//! business uses on its receipts: USD with a dot decimal and no grouping
//! ("13.50"), VES with es-VE separators - "." for thousands, "," for
//! decimals ("1.234,56"). Amounts are rounded to two fraction digits,
//! half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to two fraction digits, half away from zero.
fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a USD amount: two fraction digits, no grouping.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}

/// Format a VES amount with es-VE separators: "1.234,56".
#[must_use]
pub fn format_ves(amount: Decimal) -> String {
    let plain = format!("{:.2}", round2(amount));
    let (sign, digits) = plain
        .strip_prefix('-')
        .map_or(("", plain.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("{sign}{},{frac_part}", group_thousands(int_part))
}

/// Format the exchange-rate ticker: "Bs. 36.50/USD".
#[must_use]
pub fn format_rate(rate: Decimal) -> String {
    format!("Bs. {:.2}/USD", round2(rate))
}

/// The card price line showing both currencies: "$5.00 | Bs. 200,00".
#[must_use]
pub fn dual_label(price_usd: Decimal, rate: Decimal) -> String {
    format!(
        "${} | Bs. {}",
        format_usd(price_usd),
        format_ves(price_usd * rate)
    )
}

/// Insert a "." every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}
