use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;

    /// Amount or `-` when zero, as shown in income/expense columns.
    fn format_optional(&self, amount: f64) -> String {
        if amount == 0.0 {
            "-".to_string()
        } else {
            self.format_amount(amount)
        }
    }
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}
