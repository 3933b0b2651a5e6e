//! Small formatting helpers shared by the display modules

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::MoneyValue;

/// Format an amount with a currency symbol
pub fn money(amount: MoneyValue, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Format a ratio (1 = 100%) as a whole-number percentage
///
/// Ratios below 10% keep one decimal place.
pub fn format_percentage(ratio: Decimal) -> String {
    let pct = ratio * Decimal::ONE_HUNDRED;
    if pct.abs() < Decimal::TEN && !pct.is_zero() {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a bar for a ratio in 0..=1; values outside are clamped
pub fn format_bar(ratio: Decimal, width: usize) -> String {
    let ratio = ratio.clamp(Decimal::ZERO, Decimal::ONE);
    let filled = (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Centre a title in a field of `width`
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(padding), title)
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to at most `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// English month name for 1..=12
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(0.5)), "50%");
        assert_eq!(format_percentage(dec!(0.055)), "5.5%");
        assert_eq!(format_percentage(Decimal::ZERO), "0%");
        assert_eq!(format_percentage(Decimal::ONE), "100%");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(dec!(0.5), 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(bar.chars().count(), 10);

        let over = format_bar(dec!(3), 4);
        assert_eq!(over, "████");
        assert_eq!(format_bar(dec!(-1), 3), "░░░");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Café au lait", 7), "Café...");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(MoneyValue::from(-5), "$"), "-$5.00");
    }
}
