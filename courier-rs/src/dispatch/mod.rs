//! Queue-driven dispatch engine
//!
//! - [`dispatcher`]: single-flight drain loop over the message queue
//! - [`schedule`]: cron schedule for the periodic drain
//! - [`status`]: dispatch state and the status views read by the API

pub mod dispatcher;
pub mod schedule;
pub mod status;

pub use dispatcher::Dispatcher;
pub use schedule::{DrainSchedule, DEFAULT_SCHEDULE};
pub use status::{DispatchState, LastStatus, Outcome, QueueStatus};
