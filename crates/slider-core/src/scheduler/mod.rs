mod service;
pub mod tasks;

#[cfg(test)]
mod mock;

pub use service::{SchedulerEvent, SchedulerService};
pub use tasks::{run_tick, TickReport};
