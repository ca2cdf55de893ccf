//! Price display.
//!
//! Prices are shown in Pakistani rupees with no fraction digits and
//! thousands separators, e.g. `Rs 1,250`.

pub const CURRENCY_PREFIX: &str = "Rs";

/// Format a price for display, rounding half away from zero.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{} -", CURRENCY_PREFIX);
    }
    let rounded = amount.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!(
        "{}{} {}",
        sign,
        CURRENCY_PREFIX,
        group_thousands(rounded.unsigned_abs())
    )
}

/// Price of `quantity` units.
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    unit_price * f64::from(quantity)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
