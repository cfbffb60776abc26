use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preference key marking a customer registered by an operator at the counter
/// instead of through the storefront.
pub const MANUAL_CUSTOMER_KEY: &str = "manual_customer";

/// Customer profile, one per user.
///
/// `preferences` is a schema-less JSON object holding tax id, birth date,
/// address and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferences: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new Customer instance.
    ///
    /// # Notes
    /// The `id` field is initialized as an empty string and will be set by the actor system.
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            preferences: Map::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.preferences
            .get(MANUAL_CUSTOMER_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn preference(&self, key: &str) -> Option<&Value> {
        self.preferences.get(key)
    }
}

/// Payload for creating a new customer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerCreate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferences: Map<String, Value>,
}

impl From<Customer> for CustomerCreate {
    fn from(customer: Customer) -> Self {
        Self {
            full_name: customer.full_name,
            email: customer.email,
            phone: customer.phone,
            preferences: customer.preferences,
        }
    }
}

/// Payload for updating an existing customer. Preference entries are merged;
/// a JSON `null` removes the key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub preferences: Map<String, Value>,
}
