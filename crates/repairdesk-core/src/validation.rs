//! Draft validation: required fields and price/quantity bounds.

use crate::error::ValidationError;
use crate::order::OrderDraft;

/// Validate a draft before it becomes (or replaces) an order.
///
/// This checks:
/// - Tool name and client name are not blank
/// - Labor price is finite and non-negative
/// - Every part price is finite and non-negative
/// - Every part quantity is at least 1
pub fn validate_draft(draft: &OrderDraft) -> Result<(), ValidationError> {
    if draft.tool_name.trim().is_empty() {
        return Err(ValidationError::MissingToolName);
    }
    if draft.client_name.trim().is_empty() {
        return Err(ValidationError::MissingClientName);
    }
    if !is_valid_amount(draft.labor_price) {
        return Err(ValidationError::NegativeLaborPrice(draft.labor_price));
    }

    for part in &draft.parts {
        if !is_valid_amount(part.price) {
            return Err(ValidationError::NegativePartPrice {
                part: part.id.clone(),
                price: part.price,
            });
        }
        if part.quantity == 0 {
            return Err(ValidationError::ZeroQuantity(part.id.clone()));
        }
    }

    Ok(())
}

/// Trim text fields and turn a blank phone into `None`.
///
/// A blank phone is stored as an empty string and reads back as absent, so
/// normalizing here keeps the in-memory collection equal to what `load`
/// returns after a save.
pub fn normalize_draft(mut draft: OrderDraft) -> OrderDraft {
    draft.tool_name = draft.tool_name.trim().to_string();
    draft.client_name = draft.client_name.trim().to_string();
    draft.client_phone = draft
        .client_phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    for part in &mut draft.parts {
        part.name = part.name.trim().to_string();
    }
    draft
}

fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft() {
        let draft = OrderDraft::new("Drill", "Ivanov")
            .labor_price(500.0)
            .part("Brush", 100.0, 2);
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    #[test]
    fn test_required_fields() {
        let draft = OrderDraft::new("   ", "Ivanov");
        assert_eq!(validate_draft(&draft), Err(ValidationError::MissingToolName));

        let draft = OrderDraft::new("Drill", "");
        assert_eq!(validate_draft(&draft), Err(ValidationError::MissingClientName));
    }

    #[test]
    fn test_amount_bounds() {
        let draft = OrderDraft::new("Drill", "Ivanov").labor_price(-1.0);
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::NegativeLaborPrice(-1.0))
        );

        let draft = OrderDraft::new("Drill", "Ivanov").labor_price(f64::INFINITY);
        assert!(validate_draft(&draft).is_err());

        let draft = OrderDraft::new("Drill", "Ivanov").part("Brush", -5.0, 1);
        assert!(matches!(
            validate_draft(&draft),
            Err(ValidationError::NegativePartPrice { price, .. }) if price == -5.0
        ));

        let draft = OrderDraft::new("Drill", "Ivanov").part("Brush", 5.0, 0);
        assert!(matches!(
            validate_draft(&draft),
            Err(ValidationError::ZeroQuantity(_))
        ));
    }

    #[test]
    fn test_zero_prices_are_allowed() {
        let draft = OrderDraft::new("Drill", "Ivanov").part("Warranty swap", 0.0, 1);
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    #[test]
    fn test_normalize() {
        let draft = OrderDraft::new("  Drill ", " Ivanov")
            .phone("   ")
            .part(" Brush ", 1.0, 1);
        let draft = normalize_draft(draft);
        assert_eq!(draft.tool_name, "Drill");
        assert_eq!(draft.client_name, "Ivanov");
        assert_eq!(draft.client_phone, None);
        assert_eq!(draft.parts[0].name, "Brush");

        let draft = normalize_draft(OrderDraft::new("Saw", "Petrov").phone(" +7 900 "));
        assert_eq!(draft.client_phone.as_deref(), Some("+7 900"));
    }
}
