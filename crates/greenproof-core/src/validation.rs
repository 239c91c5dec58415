//! Validation of submitted action content.

use crate::action::{ActionContent, Category, NewAction};
use crate::error::ValidationError;

/// Validate typed action content.
///
/// This checks:
/// - `actor`, `title` and `unit` contain non-whitespace text
/// - `quantity` is finite and strictly positive
pub fn validate_content(content: &ActionContent) -> Result<(), ValidationError> {
    // 1. Required text
    require_text("actor", &content.actor)?;
    require_text("title", &content.title)?;
    require_text("unit", &content.unit)?;

    // 2. Quantity
    if !content.quantity.is_finite() {
        return Err(ValidationError::NonFiniteQuantity);
    }
    if content.quantity <= 0.0 {
        return Err(ValidationError::NonPositiveQuantity(content.quantity));
    }

    Ok(())
}

/// Validate a raw submission and convert it to typed content.
pub fn validate_new_action(new: NewAction) -> Result<ActionContent, ValidationError> {
    let category: Category = new.category.parse()?;

    let content = ActionContent {
        actor: new.actor,
        title: new.title,
        description: new.description,
        category,
        quantity: new.quantity,
        unit: new.unit,
        location: new.location,
        evidence_url: new.evidence_url,
    };
    validate_content(&content)?;
    Ok(content)
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
