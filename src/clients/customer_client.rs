use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::domain::{Customer, CustomerCreate, CustomerPatch};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

crate::impl_basic_client!(CustomerClient, Customer, CustomerError, customer);

impl CustomerClient {
    /// Registers a customer. Emails are unique, compared case-insensitively;
    /// the customer actor enforces it, so concurrent signups cannot both pass.
    #[instrument(fields(customer_email = %params.email), skip(self, params))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<String, CustomerError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(customer_id = %id, "Customer created");
        Ok(id)
    }

    /// Fails with [`CustomerError::AlreadyExists`] when the new email belongs
    /// to another customer.
    #[instrument(skip(self))]
    pub async fn update_customer(&self, id: String, patch: CustomerPatch) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, patch, None).await.map_err(CustomerError::from)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let customers = self.list_customers().await?;
        Ok(customers
            .into_iter()
            .find(|customer| customer.email.trim().eq_ignore_ascii_case(email.trim())))
    }

    #[instrument(skip(self))]
    pub async fn set_manual(&self, id: String, manual: bool) -> Result<(), CustomerError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CustomerAction::SetManual(manual), None).await? {
            CustomerActionResult::SetManual(_) => Ok(()),
        }
    }
}
