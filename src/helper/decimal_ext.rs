use rust_decimal::Decimal;

/// Display helpers for prices and changes
pub trait DecimalExt {
    /// `$150.00`
    fn format_price(&self) -> String;
    /// `+50.00` / `-10.00`
    fn format_signed(&self) -> String;
    /// `+50.00%` / `-10.00%`, the value is already a percentage
    fn format_signed_percent(&self) -> String;
}

impl DecimalExt for Decimal {
    fn format_price(&self) -> String {
        format!("${:.2}", self.round_dp(2))
    }

    fn format_signed(&self) -> String {
        let sign = if self.is_sign_negative() { "" } else { "+" };
        format!("{sign}{:.2}", self.round_dp(2))
    }

    fn format_signed_percent(&self) -> String {
        format!("{}%", self.format_signed())
    }
}
