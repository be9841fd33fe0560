//! Dashboard aggregates over a user's expenses.

use std::{collections::HashMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Month};

use super::dto::to_cents;
use super::repo_types::ExpenseRow;

const UNCATEGORIZED: &str = "Uncategorized";

/// A calendar month written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month {s:?}, expected YYYY-MM");
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(invalid)?;
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    pub category_name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// `None` means every expense regardless of date.
    pub month: Option<String>,
    pub expense_count: usize,
    pub total_expenses: Decimal,
    pub by_category: Vec<CategoryTotal>,
    pub spending_limit: Decimal,
    pub remaining_limit: Decimal,
    pub limit_used_percent: Decimal,
}

/// Totals are sums of absolute amounts. Categories are ordered by total,
/// largest first, then by name.
pub fn summarize(rows: &[ExpenseRow], month: Option<YearMonth>, limit: Decimal) -> Summary {
    let mut total = Decimal::ZERO;
    let mut count = 0;
    let mut per_category: HashMap<&str, Decimal> = HashMap::new();

    for row in rows
        .iter()
        .filter(|row| month.map_or(true, |m| m.contains(row.date)))
    {
        let amount = row.amount.abs();
        total += amount;
        count += 1;
        let name = row.category_name.as_deref().unwrap_or(UNCATEGORIZED);
        *per_category.entry(name).or_default() += amount;
    }

    let mut by_category: Vec<CategoryTotal> = per_category
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            category_name: name.to_string(),
            total: to_cents(total),
        })
        .collect();
    by_category.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    // Percent is 0 when there is no positive limit and saturates when the
    // ratio does not fit in a Decimal.
    let limit = to_cents(limit);
    let limit_used_percent = if limit <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        total
            .checked_div(limit)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(to_cents)
            .unwrap_or(Decimal::MAX)
    };

    Summary {
        month: month.map(|m| m.to_string()),
        expense_count: count,
        total_expenses: to_cents(total),
        by_category,
        spending_limit: limit,
        remaining_limit: to_cents(limit - total),
        limit_used_percent,
    }
}
