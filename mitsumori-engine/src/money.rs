//! Whole-yen amount formatting.
//!
//! All amounts in the engine are integers in yen; rounding to a whole unit
//! happens before any value reaches this module, so formatting never deals
//! with fractions.

/// Format an amount as Japanese yen with digit grouping, e.g. `¥52,060`.
/// Negative amounts keep the sign ahead of the currency mark: `-¥3,300`.
#[must_use]
pub fn format_yen(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}¥{grouped}")
}

/// Format a signed amount for a breakdown row: surcharges get an explicit
/// leading `+`, discounts render as negative.
#[must_use]
pub fn format_signed_yen(amount: i64) -> String {
    if amount >= 0 {
        format!("+{}", format_yen(amount))
    } else {
        format_yen(amount)
    }
}
