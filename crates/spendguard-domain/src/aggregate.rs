use spendguard_types::Ledger;

/// Total committed spend on `date`, optionally narrowed to one `category`.
///
/// Events with a missing or non-numeric amount contribute zero.
pub fn spent_on(ledger: &Ledger, date: &str, category: Option<&str>) -> f64 {
    ledger
        .events
        .iter()
        .filter(|e| e.date == date)
        .filter(|e| category.is_none_or(|c| e.category == c))
        .map(|e| e.amount_or_zero())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{event, ledger_with};

    #[test]
    fn sums_by_date_and_category() {
        let ledger = ledger_with(vec![
            event("2024-01-01", "food", Some(3.0)),
            event("2024-01-01", "transport", Some(4.0)),
            event("2024-01-02", "food", Some(100.0)),
            event("2024-01-01", "food", Some(2.5)),
        ]);

        assert_eq!(spent_on(&ledger, "2024-01-01", None), 9.5);
        assert_eq!(spent_on(&ledger, "2024-01-01", Some("food")), 5.5);
        assert_eq!(spent_on(&ledger, "2024-01-03", None), 0.0);
    }

    #[test]
    fn missing_amounts_count_as_zero() {
        let ledger = ledger_with(vec![
            event("2024-01-01", "food", None),
            event("2024-01-01", "food", Some(1.0)),
        ]);
        assert_eq!(spent_on(&ledger, "2024-01-01", Some("food")), 1.0);
    }
}
