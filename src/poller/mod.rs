mod controller;
mod handle;
mod schedule;

pub use controller::{PollController, Trigger};
pub use handle::ResourceHandle;
pub use schedule::PollSchedule;
