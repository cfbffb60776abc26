use chrono::Utc;
use serde_json::Value;

use super::actions::{CustomerAction, CustomerActionResult};
use super::error::CustomerError;
use crate::actor_framework::Entity;
use crate::domain::{Customer, CustomerCreate, CustomerPatch, MANUAL_CUSTOMER_KEY};

impl Entity for Customer {
    type Id = String;
    type CreateParams = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Error = CustomerError;

    fn id(&self) -> &String {
        &self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.trim().to_lowercase())
    }

    /// Creates a new Customer from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the customer
    /// * `params` - Name, email, phone and initial preferences
    fn from_create_params(id: String, params: CustomerCreate) -> Result<Self, CustomerError> {
        validate_name(&params.full_name)?;
        validate_email(&params.email)?;
        Ok(Self {
            id,
            full_name: params.full_name,
            email: params.email,
            phone: params.phone,
            preferences: params.preferences,
            created_at: Utc::now(),
        })
    }

    /// Updates the customer's contact information and merges preferences.
    ///
    /// # Fields Updated
    /// - `full_name`, `email`, `phone`
    /// - `preferences`: keys set to JSON `null` are removed
    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), CustomerError> {
        if let Some(name) = &patch.full_name {
            validate_name(name)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        if let Some(name) = patch.full_name {
            self.full_name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        for (key, value) in patch.preferences {
            if value.is_null() {
                self.preferences.remove(&key);
            } else {
                self.preferences.insert(key, value);
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CustomerAction) -> Result<CustomerActionResult, CustomerError> {
        match action {
            CustomerAction::SetManual(manual) => {
                self.preferences.insert(MANUAL_CUSTOMER_KEY.to_string(), Value::Bool(manual));
                Ok(CustomerActionResult::SetManual(manual))
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), CustomerError> {
    if name.trim().is_empty() {
        return Err(CustomerError::ValidationError("Name required".to_string()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), CustomerError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(CustomerError::ValidationError(format!("Invalid email: {}", email))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer() -> Customer {
        let params = CustomerCreate {
            full_name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            ..CustomerCreate::default()
        };
        Customer::from_create_params("customer_1".into(), params).unwrap()
    }

    #[test]
    fn test_create_requires_name_and_email() {
        let missing_email = CustomerCreate { full_name: "Ana".into(), ..CustomerCreate::default() };
        assert!(Customer::from_create_params("c".into(), missing_email).is_err());
        let bad_email = CustomerCreate {
            full_name: "Ana".into(),
            email: "ana.example.com".into(),
            ..CustomerCreate::default()
        };
        assert!(Customer::from_create_params("c".into(), bad_email).is_err());
    }

    #[test]
    fn test_preferences_are_merged() {
        let mut customer = customer();
        let mut patch = CustomerPatch::default();
        patch.preferences.insert("cpf".into(), json!("123.456.789-00"));
        patch.preferences.insert("birth_date".into(), json!("1990-04-02"));
        customer.on_update(patch).unwrap();

        let mut patch = CustomerPatch::default();
        patch.preferences.insert("birth_date".into(), Value::Null);
        customer.on_update(patch).unwrap();

        assert_eq!(customer.preference("cpf"), Some(&json!("123.456.789-00")));
        assert_eq!(customer.preference("birth_date"), None);
    }

    #[test]
    fn test_manual_flag() {
        let mut customer = customer();
        assert!(!customer.is_manual());
        customer.handle_action(CustomerAction::SetManual(true)).unwrap();
        assert!(customer.is_manual());
    }
}
