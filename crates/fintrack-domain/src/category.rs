//! Domain types representing the fixed entry categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::Displayable;

/// Fixed classification applied to every ledger entry.
///
/// Declaration order is the canonical ordering used by category totals and
/// chart labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Bills,
    Healthcare,
    Shopping,
    Education,
    Salary,
    Investment,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Bills,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Salary,
        Category::Investment,
        Category::Other,
    ];

    /// Stored value, e.g. `Bills`.
    pub fn value(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Salary => "Salary",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    /// Human label, e.g. `Bills & Utilities`.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills & Utilities",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Salary => "Salary",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Food => "🍕",
            Category::Transportation => "🚗",
            Category::Entertainment => "🎬",
            Category::Bills => "💡",
            Category::Healthcare => "🏥",
            Category::Shopping => "🛍️",
            Category::Education => "📚",
            Category::Salary => "💼",
            Category::Investment => "📈",
            Category::Other => "📦",
        }
    }

    /// Matches a stored value or display label, ignoring case and surrounding
    /// whitespace. Returns `None` for anything unrecognized.
    pub fn parse(input: &str) -> Option<Category> {
        let needle = input.trim();
        if needle.is_empty() {
            return None;
        }
        Category::ALL.into_iter().find(|category| {
            category.value().eq_ignore_ascii_case(needle)
                || category.label().eq_ignore_ascii_case(needle)
        })
    }

    /// Lenient conversion used at the ingestion boundary.
    pub fn from_value_or_other(input: Option<&str>) -> Category {
        input.and_then(Category::parse).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} {}", self.icon(), self.label())
    }
}

/// Category selector applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_TOKEN: &'static str = "All";

    /// Parses `All` or a category value/label.
    pub fn parse(input: &str) -> Option<CategoryFilter> {
        if input.trim().eq_ignore_ascii_case(Self::ALL_TOKEN) {
            return Some(CategoryFilter::All);
        }
        Category::parse(input).map(CategoryFilter::Only)
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CategoryFilter::Only(_))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL_TOKEN),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_values_and_labels() {
        assert_eq!(Category::parse("bills"), Some(Category::Bills));
        assert_eq!(Category::parse("Food & Dining"), Some(Category::Food));
        assert_eq!(Category::parse("  Salary "), Some(Category::Salary));
        assert_eq!(Category::parse("Groceries"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn unknown_values_fall_back_to_other() {
        assert_eq!(Category::from_value_or_other(Some("???")), Category::Other);
        assert_eq!(Category::from_value_or_other(None), Category::Other);
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn filter_parses_all_sentinel() {
        assert_eq!(CategoryFilter::parse("all"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("Food"),
            Some(CategoryFilter::Only(Category::Food))
        );
        assert_eq!(CategoryFilter::parse("nope"), None);
    }

    #[test]
    fn serde_uses_stored_values() {
        let json = serde_json::to_string(&Category::Healthcare).unwrap();
        assert_eq!(json, "\"Healthcare\"");
    }
}
