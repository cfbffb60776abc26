use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any stored row must implement to be managed by a [`ResourceActor`].
///
/// Each implementor corresponds to one backend table. The actor owns the rows,
/// the entity owns its validation and mutation rules.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: Send + Sync + Debug + Display + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and creation parameters
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Optimistic concurrency token. Entities that return `None` are never
    /// checked against an expected revision.
    fn revision(&self) -> Option<u64> {
        None
    }

    /// Natural key that must stay unique across the table (an email, a coupon
    /// code). Checked by the actor on create and update.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Failures surfaced by the resource layer. Domain rejections travel in
/// [`FrameworkError::Domain`] untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Revision conflict on {id}: expected {expected}, found {actual}")]
    Conflict { id: String, expected: u64, actual: u64 },
    #[error("Duplicate key: {0}")]
    Duplicate(String),
    #[error("{0}")]
    Domain(E),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        expected_revision: Option<u64>,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        expected_revision: Option<u64>,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    /// Row ids in insertion order, so listings read like a table scan.
    rows: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    table: &'static str,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        table: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            rows: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
            table,
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", fields(table = %self.table), skip(self))]
    pub async fn run(mut self) {
        info!("Resource actor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let rows: Vec<T> = self.rows.iter().filter_map(|id| self.store.get(id)).cloned().collect();
                    debug!(row_count = rows.len(), "Listed rows");
                    let _ = respond_to.send(Ok(rows));
                }
                ResourceRequest::Update { id, patch, expected_revision, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch, expected_revision));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, expected_revision, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action, expected_revision));
                }
                ResourceRequest::Shutdown => {
                    info!("Resource actor shutting down");
                    break;
                }
            }
        }

        info!("Resource actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Error>> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Domain)?;
        item.on_create().map_err(FrameworkError::Domain)?;
        self.check_unique(&item)?;
        self.store.insert(id.clone(), item);
        self.rows.push(id.clone());
        info!(id = %id, "Row created");
        Ok(id)
    }

    fn handle_update(
        &mut self,
        id: T::Id,
        patch: T::Patch,
        expected_revision: Option<u64>,
    ) -> Result<T, FrameworkError<T::Error>> {
        let current = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        check_revision(current, expected_revision)?;

        let mut updated = current.clone();
        updated.on_update(patch).map_err(FrameworkError::Domain)?;
        self.check_unique(&updated)?;
        self.store.insert(id.clone(), updated.clone());
        debug!(id = %id, "Row updated");
        Ok(updated)
    }

    /// Rejects `item` when another row already holds its unique key.
    fn check_unique(&self, item: &T) -> Result<(), FrameworkError<T::Error>> {
        let Some(key) = item.unique_key() else {
            return Ok(());
        };
        let taken = self
            .store
            .values()
            .any(|other| other.id() != item.id() && other.unique_key().as_deref() == Some(key.as_str()));
        if taken {
            warn!(id = %item.id(), key = %key, "Duplicate key rejected");
            return Err(FrameworkError::Duplicate(key));
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError<T::Error>> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Domain)?;
        self.store.remove(&id);
        self.rows.retain(|row| row != &id);
        info!(id = %id, "Row deleted");
        Ok(())
    }

    fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
        expected_revision: Option<u64>,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        check_revision(item, expected_revision)?;
        item.handle_action(action).map_err(FrameworkError::Domain)
    }
}

fn check_revision<T: Entity>(item: &T, expected: Option<u64>) -> Result<(), FrameworkError<T::Error>> {
    match (expected, item.revision()) {
        (Some(expected), Some(actual)) if expected != actual => {
            warn!(id = %item.id(), expected, actual, "Stale revision rejected");
            Err(FrameworkError::Conflict { id: item.id().to_string(), expected, actual })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(
        &self,
        id: T::Id,
        patch: T::Patch,
        expected_revision: Option<u64>,
    ) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, expected_revision, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
        expected_revision: Option<u64>,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, expected_revision, respond_to })
            .await
    }

    /// Ask the actor to stop once it has drained earlier requests.
    pub async fn shutdown(&self) -> Result<(), FrameworkError<T::Error>> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket {
        id: String,
        title: String,
        closed: bool,
        revision: u64,
    }

    #[derive(Debug)]
    struct TicketCreate {
        title: String,
    }

    #[derive(Debug)]
    struct TicketPatch {
        title: Option<String>,
    }

    #[derive(Debug)]
    enum TicketAction {
        Close,
    }

    impl Entity for Ticket {
        type Id = String;
        type CreateParams = TicketCreate;
        type Patch = TicketPatch;
        type Action = TicketAction;
        type ActionResult = bool;
        type Error = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: TicketCreate) -> Result<Self, String> {
            if params.title.is_empty() {
                return Err("title required".to_string());
            }
            Ok(Self { id, title: params.title, closed: false, revision: 1 })
        }

        fn revision(&self) -> Option<u64> {
            Some(self.revision)
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.title.to_lowercase())
        }

        fn on_update(&mut self, patch: TicketPatch) -> Result<(), String> {
            if let Some(title) = patch.title {
                self.title = title;
                self.revision += 1;
            }
            Ok(())
        }

        fn on_delete(&self) -> Result<(), String> {
            if self.closed {
                Err("closed tickets are kept".to_string())
            } else {
                Ok(())
            }
        }

        fn handle_action(&mut self, action: TicketAction) -> Result<bool, String> {
            match action {
                TicketAction::Close if self.closed => Ok(false),
                TicketAction::Close => {
                    self.closed = true;
                    self.revision += 1;
                    Ok(true)
                }
            }
        }
    }

    fn start() -> ResourceClient<Ticket> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("ticket_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new("tickets", 10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_create_get_list_and_action() {
        let client = start();

        let id = client.create(TicketCreate { title: "First".into() }).await.unwrap();
        assert_eq!(id, "ticket_1");
        client.create(TicketCreate { title: "Second".into() }).await.unwrap();

        assert!(client.perform_action(id.clone(), TicketAction::Close, None).await.unwrap());
        assert!(!client.perform_action(id.clone(), TicketAction::Close, None).await.unwrap());

        let ticket = client.get(id).await.unwrap().unwrap();
        assert!(ticket.closed);
        let titles: Vec<String> = client.list().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["First".to_string(), "Second".to_string()]);
    }

    #[tokio::test]
    async fn test_domain_rejection_is_passed_through() {
        let client = start();
        let err = client.create(TicketCreate { title: String::new() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Domain("title required".to_string()));

        let id = client.create(TicketCreate { title: "Keep".into() }).await.unwrap();
        client.perform_action(id.clone(), TicketAction::Close, None).await.unwrap();
        let err = client.delete(id).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Domain(_)));
    }

    #[tokio::test]
    async fn test_unique_key_is_enforced_by_the_actor() {
        let client = start();
        let other = client.clone();

        let (first, second) = tokio::join!(
            client.create(TicketCreate { title: "Same".into() }),
            other.create(TicketCreate { title: "SAME".into() }),
        );
        let rejected = [&first, &second].iter().filter(|r| r.is_err()).count();
        assert_eq!(rejected, 1);
        assert!([first, second].contains(&Err(FrameworkError::Duplicate("same".to_string()))));
        assert_eq!(client.list().await.unwrap().len(), 1);

        let id = client.create(TicketCreate { title: "Other".into() }).await.unwrap();
        let err = client
            .update(id.clone(), TicketPatch { title: Some("same".into()) }, None)
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::Duplicate("same".to_string()));
        let kept = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!((kept.title.as_str(), kept.revision), ("Other", 1));

        let renamed = client.update(id, TicketPatch { title: Some("other".into()) }, None).await.unwrap();
        assert_eq!(renamed.title, "other");
    }

    #[tokio::test]
    async fn test_stale_revision_is_rejected() {
        let client = start();
        let id = client.create(TicketCreate { title: "Race".into() }).await.unwrap();

        let patch = TicketPatch { title: Some("Renamed".into()) };
        let updated = client.update(id.clone(), patch, Some(1)).await.unwrap();
        assert_eq!(updated.revision, 2);

        let err = client.perform_action(id.clone(), TicketAction::Close, Some(1)).await.unwrap_err();
        assert_eq!(err, FrameworkError::Conflict { id: id.clone(), expected: 1, actual: 2 });
        assert!(!client.get(id).await.unwrap().unwrap().closed);
    }

    #[tokio::test]
    async fn test_missing_row_and_shutdown() {
        let client = start();
        let err = client.perform_action("ticket_9".into(), TicketAction::Close, None).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("ticket_9".to_string()));

        client.shutdown().await.unwrap();
        tokio::task::yield_now().await;
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, FrameworkError::ActorClosed | FrameworkError::ActorDropped));
    }
}
