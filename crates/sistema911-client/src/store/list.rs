//! Generic store for list-valued resources

use async_trait::async_trait;
use sistema911_model::{Keyed, ListEvent, ListState};
use tracing::warn;

use crate::api::ApiClient;
use crate::error::ApiError;

/// Fallback messages shown when an error carries no message of its own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Messages {
    pub fetch: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// A collection the backend exposes with list/create/update/delete
#[async_trait]
pub trait ListResource: Send + Sync + 'static {
    type Item: Keyed + Clone + Send + Sync;
    type Create: Send + Sync;
    type Update: Send + Sync;

    /// Name used in log lines
    const NAME: &'static str;
    const MESSAGES: Messages;

    async fn list(api: &ApiClient) -> Result<Vec<Self::Item>, ApiError>;
    async fn create(api: &ApiClient, input: &Self::Create) -> Result<Self::Item, ApiError>;
    async fn update(api: &ApiClient, id: &str, update: &Self::Update) -> Result<Self::Item, ApiError>;
    async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError>;
}

/// `{items, is_loading, error}` for one resource.
///
/// Mutations apply the server's answer to the cached list instead of
/// refetching. Failures are stored as a displayable message and returned.
pub struct ListStore<R: ListResource> {
    pub(crate) api: ApiClient,
    pub(crate) state: ListState<R::Item>,
    is_loading: bool,
    error: Option<String>,
}

impl<R: ListResource> ListStore<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: ListState::new(),
            is_loading: false,
            error: None,
        }
    }

    pub fn items(&self) -> &[R::Item] {
        self.state.items()
    }

    pub fn get(&self, id: &str) -> Option<&R::Item> {
        self.state.get(id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Initial load
    pub async fn mount(&mut self) -> Result<(), ApiError> {
        self.fetch().await
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.is_loading = true;
        self.error = None;
        let result = R::list(&self.api).await;
        self.is_loading = false;

        match result {
            Ok(items) => {
                self.state.apply(ListEvent::Loaded(items));
                Ok(())
            }
            Err(err) => Err(self.fail(err, R::MESSAGES.fetch)),
        }
    }

    pub async fn create(&mut self, input: &R::Create) -> Result<R::Item, ApiError> {
        self.error = None;
        match R::create(&self.api, input).await {
            Ok(item) => {
                self.state.apply(ListEvent::Created(item.clone()));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, R::MESSAGES.create)),
        }
    }

    pub async fn update(&mut self, id: &str, update: &R::Update) -> Result<R::Item, ApiError> {
        self.error = None;
        match R::update(&self.api, id, update).await {
            Ok(item) => {
                self.state.apply(ListEvent::Updated(item.clone()));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, R::MESSAGES.update)),
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.error = None;
        match R::delete(&self.api, id).await {
            Ok(()) => {
                self.state.apply(ListEvent::Deleted(id.to_string()));
                Ok(())
            }
            Err(err) => Err(self.fail(err, R::MESSAGES.delete)),
        }
    }

    /// Record `err` for display and hand it back
    pub(crate) fn fail(&mut self, err: ApiError, fallback: &str) -> ApiError {
        warn!(resource = R::NAME, error = %err, "{}", fallback);
        self.error = Some(err.display_message(fallback));
        err
    }
}
