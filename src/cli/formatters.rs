use chrono::NaiveDate;
use fintrack_config::Config;
use fintrack_core::{CurrencyFormatter, DateFormatter};

/// Formatting rules taken from the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    symbol: String,
    precision: usize,
    grouping: Grouping,
}

/// Digit grouping of the integer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        let grouping = if config.locale.to_ascii_lowercase().ends_with("-in") {
            Grouping::Indian
        } else {
            Grouping::Thousands
        };
        Self {
            symbol: config.currency_symbol.clone(),
            precision: config.precision as usize,
            grouping,
        }
    }
}

impl Default for CliFormatters {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{:.prec$}", amount.abs(), prec = self.precision);
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };
        let mut text = String::new();
        // -0.00 prints without a sign
        if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
            text.push('-');
        }
        text.push_str(&self.symbol);
        text.push_str(&group_digits(whole, self.grouping));
        if let Some(fraction) = fraction {
            text.push('.');
            text.push_str(fraction);
        }
        text
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(len - 3);
    let size = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(size);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
