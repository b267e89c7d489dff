use spendguard_types::Intent;

/// An intent that passed structural validation, borrowed from the caller's document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidIntent<'a> {
    pub date: &'a str,
    pub category: &'a str,
    pub amount: f64,
    pub merchant: &'a str,
}

impl<'a> ValidIntent<'a> {
    /// `None` when `date` or `category` is missing or empty, or when `amount` is not a
    /// finite, non-negative JSON number.
    pub fn from_intent(intent: &'a Intent) -> Option<Self> {
        let date = non_empty(intent.date.as_deref())?;
        let category = non_empty(intent.category.as_deref())?;
        let amount = intent.amount_value()?;
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Self {
            date,
            category,
            amount,
            merchant: intent.merchant_or_empty(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
