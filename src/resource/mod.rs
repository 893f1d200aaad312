pub mod catalog;
mod pagination;
mod payload;
mod request;
mod state;

pub use catalog::Resource;
pub use pagination::{PageCursor, PageWindow, Pagination};
pub use payload::{
    AdminStatistics, BookedProvider, BookedService, BookingDetails, ProviderStatistics, Rating,
    Revenue, User,
};
pub use request::{Method, ResourceRequest, TENANT_HEADER, TenantContext};
pub use state::{Snapshot, Status};
