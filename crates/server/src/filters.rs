//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Formats a decimal amount as money, e.g. `$12.50`.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let amount: Decimal = value.to_string().parse().unwrap_or_default();
    Ok(format_money(amount))
}

fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_pads_cents() {
        assert_eq!(format_money(Decimal::new(125, 1)), "$12.50");
        assert_eq!(format_money(Decimal::from(7)), "$7.00");
    }

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(format_money(Decimal::new(12345, 3)), "$12.35");
    }
}
