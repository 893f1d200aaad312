use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::core::DashError;
use crate::poller::Trigger;
use crate::poller::controller::Shared;
use crate::resource::{Resource, ResourceRequest, Snapshot};

/// Stops the handle when the last clone goes away.
struct Owner<P: Resource> {
    shared: Arc<Shared<P>>,
}

impl<P: Resource> Drop for Owner<P> {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

/// A mounted resource: one request, its polling timer and its latest state.
///
/// Clones share the same state. Dropping every clone stops polling, same as
/// calling [`ResourceHandle::stop`].
pub struct ResourceHandle<P: Resource> {
    owner: Arc<Owner<P>>,
}

impl<P: Resource> Clone for ResourceHandle<P> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
        }
    }
}

impl<P: Resource> std::fmt::Debug for ResourceHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("key", &self.shared().label)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl<P: Resource> ResourceHandle<P> {
    pub(crate) fn new(shared: Arc<Shared<P>>) -> Self {
        Self {
            owner: Arc::new(Owner { shared }),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<Shared<P>> {
        &self.owner.shared
    }

    /// Fetches now with the current request. Does not move the timer.
    pub fn refresh(&self) -> Result<(), DashError> {
        self.shared().issue(Trigger::Refresh, |_| Ok(()))?;
        Ok(())
    }

    /// Swaps the request and fetches it. A response for the old request that
    /// arrives later is discarded.
    pub fn update_request(&self, request: ResourceRequest) -> Result<(), DashError> {
        self.modify_request(move |current| {
            *current = request;
            Ok(())
        })
    }

    /// Edits the request in place, then fetches. If `edit` fails nothing is
    /// issued and the request is left as `edit` found it.
    pub fn modify_request<F>(&self, edit: F) -> Result<(), DashError>
    where
        F: FnOnce(&mut ResourceRequest) -> Result<(), DashError>,
    {
        self.shared().issue(Trigger::UpdateRequest, |current| {
            let mut next = current.clone();
            edit(&mut next)?;
            *current = next;
            Ok(())
        })?;
        Ok(())
    }

    /// Moves a list resource to `page`, keeping its limit and search.
    pub fn set_page(&self, page: u32) -> Result<(), DashError> {
        self.modify_request(|request| {
            let cursor = request.cursor().ok_or_else(|| {
                DashError::InvalidRequest(format!("'{}' is not paginated", request.key()))
            })?;
            request.set_cursor(cursor.with_page(page)?);
            Ok(())
        })
    }

    /// Changes the search term and goes back to the first page.
    pub fn set_search(&self, search: Option<&str>) -> Result<(), DashError> {
        self.modify_request(|request| {
            if let Some(cursor) = request.cursor() {
                request.set_cursor(cursor.with_page(1)?);
            }
            request.set_search(search);
            Ok(())
        })
    }

    /// Stops the timer and discards any attempt still in flight. Idempotent.
    pub fn stop(&self) {
        self.shared().stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.shared().is_stopped()
    }

    pub fn snapshot(&self) -> Snapshot<P> {
        self.shared().state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<P>> {
        self.shared().state.subscribe()
    }

    /// Snapshot stream starting with the current value.
    pub fn stream(&self) -> WatchStream<Snapshot<P>> {
        WatchStream::new(self.subscribe())
    }

    /// The request the next attempt will use.
    pub fn request(&self) -> ResourceRequest {
        self.shared().control().request.clone()
    }

    /// Base key of the request the handle was started with.
    pub fn key(&self) -> &str {
        &self.shared().label
    }

    /// Number of attempts issued so far.
    pub fn attempts(&self) -> u64 {
        self.shared().control().issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FetchError, RawResponse, Transport};
    use crate::poller::PollController;
    use crate::resource::{PageCursor, User};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _: &ResourceRequest) -> Result<RawResponse, FetchError> {
            Err(FetchError::network("unreachable"))
        }
    }

    fn list_request() -> ResourceRequest {
        let mut request = ResourceRequest::get("/api/admin/users").with_key("users:admin");
        request.set_cursor(PageCursor::first(10).unwrap());
        request
    }

    #[tokio::test]
    async fn test_set_search_resets_page() {
        let handle = PollController::new(Unreachable)
            .start::<Vec<User>>(list_request(), None)
            .unwrap();
        handle.set_page(3).unwrap();
        handle.set_search(Some("sara")).unwrap();

        let request = handle.request();
        assert_eq!(request.query_value("page"), Some("1"));
        assert_eq!(request.query_value("search"), Some("sara"));
        assert_eq!(handle.attempts(), 3);
    }

    #[tokio::test]
    async fn test_invalid_page_issues_nothing() {
        let handle = PollController::new(Unreachable)
            .start::<Vec<User>>(list_request(), None)
            .unwrap();
        let err = handle.set_page(0).unwrap_err();
        assert!(matches!(err, DashError::InvalidRequest(_)));
        assert_eq!(handle.attempts(), 1);
        assert_eq!(handle.request().query_value("page"), Some("1"));
    }

    #[tokio::test]
    async fn test_operations_after_stop_are_rejected() {
        let handle = PollController::new(Unreachable)
            .start::<Vec<User>>(list_request(), None)
            .unwrap();
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        assert_eq!(handle.refresh(), Err(DashError::Stopped("users:admin".into())));
        assert_eq!(handle.attempts(), 1);
    }

    #[tokio::test]
    async fn test_dropping_last_clone_stops() {
        let handle = PollController::new(Unreachable)
            .start::<Vec<User>>(list_request(), None)
            .unwrap();
        let shared = handle.shared().clone();
        let other = handle.clone();
        drop(handle);
        assert!(!shared.is_stopped());
        drop(other);
        assert!(shared.is_stopped());
    }
}
