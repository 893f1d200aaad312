use serde::{Deserialize, Serialize};

use crate::core::DashError;

/// Client-owned position in a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub page: u32,
    pub limit: u32,
}

impl PageCursor {
    pub fn new(page: u32, limit: u32) -> Result<Self, DashError> {
        if page < 1 {
            return Err(DashError::InvalidRequest(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if limit == 0 {
            return Err(DashError::InvalidRequest("limit must be > 0".into()));
        }
        Ok(Self { page, limit })
    }

    pub fn first(limit: u32) -> Result<Self, DashError> {
        Self::new(1, limit)
    }

    pub fn with_page(self, page: u32) -> Result<Self, DashError> {
        Self::new(page, self.limit)
    }
}

/// Server-derived paging metadata, returned next to list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u32,
    pub limit: u32,
}

impl Pagination {
    /// Window shown for `page`. Uses the server's `limit`, never the cursor's.
    pub fn window(&self, page: u32) -> PageWindow {
        let limit = u64::from(self.limit);
        let page = u64::from(page.max(1));
        let (from, to) = if self.total == 0 || limit == 0 {
            (0, 0)
        } else {
            let from = (page - 1) * limit + 1;
            let to = (page * limit).min(self.total);
            if from > self.total { (0, 0) } else { (from, to) }
        };
        PageWindow {
            from,
            to,
            total: self.total,
            has_previous: page > 1,
            has_next: page < u64::from(self.total_pages),
        }
    }
}

/// "Showing {from} to {to} of {total}".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub from: u64,
    pub to: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn twenty_five() -> Pagination {
        Pagination {
            total: 25,
            total_pages: 3,
            limit: 10,
        }
    }

    #[rstest]
    #[case::first(1, 1, 10, false, true)]
    #[case::middle(2, 11, 20, true, true)]
    #[case::last(3, 21, 25, true, false)]
    fn test_window(
        #[case] page: u32,
        #[case] from: u64,
        #[case] to: u64,
        #[case] has_previous: bool,
        #[case] has_next: bool,
    ) {
        let window = twenty_five().window(page);
        assert_eq!(window.from, from);
        assert_eq!(window.to, to);
        assert_eq!(window.total, 25);
        assert_eq!(window.has_previous, has_previous);
        assert_eq!(window.has_next, has_next);
    }

    #[test]
    fn test_empty_result_window() {
        let empty = Pagination {
            total: 0,
            total_pages: 0,
            limit: 10,
        };
        let window = empty.window(1);
        assert_eq!((window.from, window.to), (0, 0));
        assert!(!window.has_next);
    }

    #[test]
    fn test_page_past_the_end() {
        let window = twenty_five().window(7);
        assert_eq!((window.from, window.to), (0, 0));
        assert!(window.has_previous);
        assert!(!window.has_next);
    }

    #[test]
    fn test_cursor_rejects_invalid_values() {
        assert!(PageCursor::new(0, 10).is_err());
        assert!(PageCursor::new(1, 0).is_err());
        assert_eq!(
            PageCursor::first(10).unwrap(),
            PageCursor { page: 1, limit: 10 }
        );
    }

    #[test]
    fn test_pagination_wire_shape() {
        let parsed: Pagination =
            serde_json::from_str(r#"{"total":25,"totalPages":3,"limit":10}"#).unwrap();
        assert_eq!(parsed, twenty_five());
    }
}
