use std::fmt;

use crate::client::{FetchError, FetchErrorKind};
use crate::resource::{PageCursor, PageWindow, Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Failed(FetchErrorKind),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Loading => f.write_str("loading"),
            Status::Ready => f.write_str("ready"),
            Status::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// What a renderer sees for one mounted resource.
///
/// `data` and `pagination` hold the last good result and survive failed
/// refreshes; only `status` and `error` move on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P> {
    pub status: Status,
    pub data: Option<P>,
    pub pagination: Option<Pagination>,
    pub error: Option<FetchError>,
    /// Scoped key of the request that produced `data`.
    pub request_key: Option<String>,
    /// Page of the request that produced `data`.
    pub cursor: Option<PageCursor>,
}

impl<P> Default for Snapshot<P> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            data: None,
            pagination: None,
            error: None,
            request_key: None,
            cursor: None,
        }
    }
}

impl<P> Snapshot<P> {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }

    pub fn failure(&self) -> Option<FetchErrorKind> {
        match self.status {
            Status::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    /// First load still pending: nothing to render yet.
    pub fn is_initial_load(&self) -> bool {
        self.data.is_none() && matches!(self.status, Status::Idle | Status::Loading)
    }

    /// Row range of the committed page. Unpaged requests count as page 1.
    pub fn window(&self) -> Option<PageWindow> {
        let page = self.cursor.map_or(1, |c| c.page);
        self.pagination.map(|p| p.window(page))
    }

    pub(crate) fn begin(&mut self) {
        self.status = Status::Loading;
    }

    pub(crate) fn succeed(
        &mut self,
        data: P,
        pagination: Option<Pagination>,
        key: String,
        cursor: Option<PageCursor>,
    ) {
        self.status = Status::Ready;
        self.data = Some(data);
        self.pagination = pagination;
        self.error = None;
        self.request_key = Some(key);
        self.cursor = cursor;
    }

    pub(crate) fn fail(&mut self, error: FetchError) {
        self.status = Status::Failed(error.kind);
        self.error = Some(error);
    }
}
