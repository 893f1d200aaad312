mod confirm;
mod form;
mod users;

pub use confirm::{AssumeYes, Confirm};
pub use form::{Role, UserForm, UserStatus};
pub use users::{BulkAction, UserAdmin};
