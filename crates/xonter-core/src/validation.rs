//! # Validation Module
//!
//! Input validation for insert payloads.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Form payload (New*)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  payload.validate()  ← THIS MODULE                                      │
//! │  ├── required text, length limits                                      │
//! │  ├── non-negative amounts and quantities                               │
//! │  └── email shape, date ordering                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository insert (owner-scoped)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Metrics aggregation  ← trusts its input, never validates              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use xonter_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("Acme Corp").unwrap();
//! assert!(validate_quantity(-1).is_err());
//! ```

use chrono::NaiveDateTime;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewActivity, NewContact, NewEmployee, NewInventoryItem, NewTransaction};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted display name (people, items, companies).
pub const MAX_NAME_LENGTH: usize = 200;

/// Longest accepted category label.
pub const MAX_CATEGORY_LENGTH: usize = 100;

/// Longest accepted unit of measure.
pub const MAX_UNIT_LENGTH: usize = 30;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    require_text("name", name, MAX_NAME_LENGTH)
}

/// Validates a transaction category.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    require_text("category", category, MAX_CATEGORY_LENGTH)
}

/// Validates a unit of measure. Blank units are allowed (default applies).
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    if unit.trim().chars().count() > MAX_UNIT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LENGTH,
        });
    }
    Ok(())
}

/// Validates an optional email address.
///
/// ## Rules
/// - `None` and blank strings are accepted (the field is optional)
/// - Otherwise exactly one `@` with text on both sides, and a dot in the domain
///
/// ## Example
/// ```rust
/// use xonter_core::validation::validate_email;
///
/// assert!(validate_email(Some("ana@example.com")).is_ok());
/// assert!(validate_email(None).is_ok());
/// assert!(validate_email(Some("ana.example.com")).is_err());
/// ```
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let email = match email.map(str::trim) {
        None | Some("") => return Ok(()),
        Some(email) => email,
    };

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("expected name@domain"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount for storage.
///
/// ## Rules
/// - Must be non-negative; the transaction kind carries the direction
/// - Zero is allowed
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be non-negative (zero means out of stock)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Date & UUID Validators
// =============================================================================

/// Validates that an optional end does not precede its start.
pub fn validate_date_order(start: NaiveDateTime, end: Option<NaiveDateTime>) -> ValidationResult<()> {
    match end {
        Some(end) if end < start => Err(ValidationError::OutOfOrder {
            field: "ends_at".to_string(),
            start_field: "starts_at".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use xonter_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

impl NewTransaction {
    /// Checks the payload before it is stored.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_category(&self.category)?;
        validate_amount("amount", self.amount)
    }
}

impl NewEmployee {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        require_text("position", &self.position, MAX_NAME_LENGTH)?;
        validate_amount("salary", self.salary)?;
        validate_email(self.email.as_deref())
    }
}

impl NewInventoryItem {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        validate_amount("purchase_price", self.purchase_price)?;
        validate_amount("sale_price", self.sale_price)?;
        validate_unit(&self.unit)
    }
}

impl NewContact {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_email(self.email.as_deref())
    }
}

impl NewActivity {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("title", &self.title, MAX_NAME_LENGTH)?;
        validate_date_order(self.starts_at, self.ends_at)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityKind, ItemKind, TransactionKind};
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Acme Corp").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(201)).is_err());
        assert!(validate_name(&"ñ".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("ana@example.com")).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(None).is_ok());

        assert!(validate_email(Some("ana@")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
        assert!(validate_email(Some("ana@example")).is_err());
        assert!(validate_email(Some("ana@@example.com")).is_err());
        assert!(validate_email(Some("ana maria@example.com")).is_err());
    }

    #[test]
    fn test_validate_amount_and_quantity() {
        assert!(validate_amount("amount", Money::zero()).is_ok());
        assert!(validate_amount("amount", Money::from_cents(1999)).is_ok());
        assert_eq!(
            validate_amount("amount", Money::from_cents(-1)),
            Err(ValidationError::Negative {
                field: "amount".to_string()
            })
        );

        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }

    #[test]
    fn test_validate_date_order() {
        assert!(validate_date_order(at(9), None).is_ok());
        assert!(validate_date_order(at(9), Some(at(10))).is_ok());
        assert!(validate_date_order(at(9), Some(at(9))).is_ok());
        assert!(validate_date_order(at(10), Some(at(9))).is_err());
    }

    #[test]
    fn test_transaction_payload() {
        let mut payload = NewTransaction {
            kind: TransactionKind::Expense,
            category: "Rent".to_string(),
            amount: Money::from_major(1200),
            description: None,
            occurred_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        assert!(payload.validate().is_ok());

        payload.amount = Money::from_major(-5);
        assert!(payload.validate().is_err());

        payload.amount = Money::from_major(5);
        payload.category = " ".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_inventory_payload() {
        let payload = NewInventoryItem {
            name: "Paper".to_string(),
            description: None,
            kind: ItemKind::Product,
            quantity: -1,
            purchase_price: Money::from_major(1),
            sale_price: Money::from_major(2),
            unit: "ream".to_string(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_activity_payload() {
        let payload = NewActivity {
            title: "Quarterly review".to_string(),
            description: None,
            starts_at: at(15),
            ends_at: Some(at(14)),
            kind: ActivityKind::Meeting,
        };
        assert!(matches!(
            payload.validate(),
            Err(ValidationError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_contact_payload() {
        let payload = NewContact {
            name: "Papelera del Norte".to_string(),
            email: Some("ventas@papelera.mx".to_string()),
            ..NewContact::default()
        };
        assert!(payload.validate().is_ok());
    }
}
