//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to play the
//! actor's side of each request.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};

/// Creates a client whose requests land on a receiver the test controls.
///
/// Clients such as `OrderClient` talk to several tables; with one mock per
/// table a test can answer every request itself (success, failure, missing
/// rows) and assert the exact sequence the client sends.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>, T::Error>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request. The expected
/// revision the client sent is returned alongside the action.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Option<u64>, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            expected_revision,
            respond_to,
        }) => Some((id, action, expected_revision, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::customer_actor::CustomerError;
    use crate::domain::{Customer, CustomerCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);

        let create_task = tokio::spawn(async move {
            let customer = CustomerCreate {
                full_name: "Test".to_string(),
                email: "test@example.com".to_string(),
                ..CustomerCreate::default()
            };
            client.create(customer).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.full_name, "Test");
        responder.send(Ok("customer_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("customer_1".to_string()));
    }

    #[tokio::test]
    async fn test_mock_reports_domain_errors() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);

        let get_task = tokio::spawn(async move { client.get("customer_9".to_string()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "customer_9");
        let rejection = FrameworkError::Domain(CustomerError::ValidationError("offline".to_string()));
        responder.send(Err(rejection.clone())).unwrap();

        assert_eq!(get_task.await.unwrap(), Err(rejection));
    }
}
