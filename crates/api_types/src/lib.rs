//! Wire types shared by the HTTP server and the store.
//!
//! The inbound payload is validated by hand from an untyped
//! [`serde_json::Value`] so that every failing field can be reported back to
//! the client at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use transaction::{Transaction, TransactionNew};

/// Maximum number of characters accepted for a transaction description.
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// A single field that failed validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The inbound payload did not match the expected shape.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("validation failed: {}", summary(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

pub mod transaction {
    use serde_json::{Map, Value};

    use super::*;

    /// A transaction as submitted by a client, before it has an id.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount: f64,
        pub category: String,
        pub description: String,
        pub is_income: bool,
        pub date: String,
    }

    /// A stored transaction.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i32,
        pub amount: f64,
        pub category: String,
        pub description: String,
        pub is_income: bool,
        pub date: String,
    }

    impl TransactionNew {
        /// Attach the id assigned by the store.
        pub fn into_stored(self, id: i32) -> Transaction {
            Transaction {
                id,
                amount: self.amount,
                category: self.category,
                description: self.description,
                is_income: self.is_income,
                date: self.date,
            }
        }
    }

    /// Collects failures while the fields are pulled out of the payload.
    struct Fields<'a> {
        object: &'a Map<String, Value>,
        errors: Vec<FieldError>,
    }

    impl<'a> Fields<'a> {
        fn required(&mut self, name: &str) -> Option<&'a Value> {
            match self.object.get(name) {
                None => {
                    self.errors.push(FieldError::new(name, "field required"));
                    None
                }
                Some(Value::Null) => {
                    self.errors.push(FieldError::new(name, "must not be null"));
                    None
                }
                Some(value) => Some(value),
            }
        }

        fn number(&mut self, name: &str) -> Option<f64> {
            let value = self.required(name)?;
            let number = value.as_f64();
            if number.is_none() {
                self.errors.push(FieldError::new(name, "expected a number"));
            }
            number
        }

        fn string(&mut self, name: &str) -> Option<String> {
            let value = self.required(name)?;
            match value.as_str() {
                Some(s) => Some(s.to_string()),
                None => {
                    self.errors.push(FieldError::new(name, "expected a string"));
                    None
                }
            }
        }

        fn boolean(&mut self, name: &str) -> Option<bool> {
            let value = self.required(name)?;
            let flag = value.as_bool();
            if flag.is_none() {
                self.errors.push(FieldError::new(name, "expected a boolean"));
            }
            flag
        }
    }

    impl TryFrom<Value> for TransactionNew {
        type Error = ValidationError;

        fn try_from(value: Value) -> Result<Self, Self::Error> {
            let Value::Object(object) = value else {
                return Err(ValidationError {
                    errors: vec![FieldError::new("body", "expected a JSON object")],
                });
            };

            let mut fields = Fields {
                object: &object,
                errors: Vec::new(),
            };

            let amount = fields.number("amount");
            let category = fields.string("category");
            let description = fields.string("description");
            let is_income = fields.boolean("is_income");
            let date = fields.string("date");

            if let Some(description) = &description
                && description.chars().count() > DESCRIPTION_MAX_LEN
            {
                fields.errors.push(FieldError::new(
                    "description",
                    format!("must be at most {DESCRIPTION_MAX_LEN} characters"),
                ));
            }

            match (amount, category, description, is_income, date) {
                (Some(amount), Some(category), Some(description), Some(is_income), Some(date))
                    if fields.errors.is_empty() =>
                {
                    Ok(Self {
                        amount,
                        category,
                        description,
                        is_income,
                        date,
                    })
                }
                _ => Err(ValidationError {
                    errors: fields.errors,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lunch() -> serde_json::Value {
        json!({
            "amount": 1200.0,
            "category": "Food",
            "description": "Lunch",
            "is_income": false,
            "date": "2024-01-05",
        })
    }

    fn failing_fields(err: &ValidationError) -> Vec<&str> {
        err.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_payload_is_accepted() {
        let tx = TransactionNew::try_from(lunch()).unwrap();
        assert_eq!(
            tx,
            TransactionNew {
                amount: 1200.0,
                category: "Food".to_string(),
                description: "Lunch".to_string(),
                is_income: false,
                date: "2024-01-05".to_string(),
            }
        );
    }

    #[test]
    fn integer_amount_is_a_number() {
        let mut payload = lunch();
        payload["amount"] = json!(15);
        let tx = TransactionNew::try_from(payload).unwrap();
        assert_eq!(tx.amount, 15.0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut payload = lunch();
        payload["id"] = json!(99);
        payload["note"] = json!("ignored");
        assert!(TransactionNew::try_from(payload).is_ok());
    }

    #[test]
    fn missing_category_is_reported() {
        let mut payload = lunch();
        payload.as_object_mut().unwrap().remove("category");
        let err = TransactionNew::try_from(payload).unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError {
                field: "category".to_string(),
                message: "field required".to_string(),
            }]
        );
    }

    #[test]
    fn every_failing_field_is_reported() {
        let payload = json!({
            "amount": "12",
            "description": 3,
            "is_income": "yes",
            "date": null,
        });
        let err = TransactionNew::try_from(payload).unwrap_err();
        assert_eq!(
            failing_fields(&err),
            vec!["amount", "category", "description", "is_income", "date"]
        );
    }

    #[test]
    fn long_description_is_rejected() {
        let mut payload = lunch();
        payload["description"] = json!("x".repeat(DESCRIPTION_MAX_LEN + 1));
        let err = TransactionNew::try_from(payload).unwrap_err();
        assert_eq!(failing_fields(&err), vec!["description"]);
    }

    #[test]
    fn description_limit_counts_characters() {
        let mut payload = lunch();
        payload["description"] = json!("é".repeat(DESCRIPTION_MAX_LEN));
        assert!(TransactionNew::try_from(payload).is_ok());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = TransactionNew::try_from(json!([1, 2, 3])).unwrap_err();
        assert_eq!(failing_fields(&err), vec!["body"]);
    }

    #[test]
    fn stored_representation_adds_id() {
        let tx = TransactionNew::try_from(lunch()).unwrap();
        let stored = tx.clone().into_stored(7);
        assert_eq!(stored.id, 7);
        assert_eq!(stored.amount, tx.amount);
        assert_eq!(stored.category, tx.category);
        assert_eq!(stored.description, tx.description);
        assert_eq!(stored.is_income, tx.is_income);
        assert_eq!(stored.date, tx.date);
    }

    #[test]
    fn error_message_lists_fields() {
        let err = ValidationError {
            errors: vec![
                FieldError::new("amount", "expected a number"),
                FieldError::new("date", "field required"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "validation failed: amount: expected a number, date: field required"
        );
    }
}
