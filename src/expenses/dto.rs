use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::ExpenseInput;
use crate::error::ApiError;

/// Largest magnitude a NUMERIC(10, 2) column holds.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Body of `POST /expenses` and `PUT /expenses/:id`. `amount` may be a JSON
/// number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub date: Date,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl TryFrom<ExpenseRequest> for ExpenseInput {
    type Error = ApiError;

    fn try_from(req: ExpenseRequest) -> Result<Self, Self::Error> {
        let amount = to_cents(req.amount);
        if amount.abs() >= AMOUNT_LIMIT {
            return Err(ApiError::Validation(format!(
                "Amount {amount} is out of range"
            )));
        }
        Ok(ExpenseInput {
            amount,
            description: req.description,
            date: req.date,
            category_id: req.category_id,
        })
    }
}

/// Rounds half away from zero to two fractional digits and fixes the scale at
/// two so the value always renders as `"12.50"`.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);
    amount
}

#[derive(Debug, Serialize)]
pub struct CreatedExpenseResponse {
    pub id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: Date,
    pub category_id: Option<i64>,
}

impl CreatedExpenseResponse {
    pub fn new(id: i64, input: ExpenseInput) -> Self {
        Self {
            id,
            amount: input.amount,
            description: input.description,
            date: input.date,
            category_id: input.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<String>,
}
