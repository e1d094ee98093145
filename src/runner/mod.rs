//! Runner module: the crawl orchestration engine
//!
//! This module contains:
//! - Tasks and the LIFO stacks that hold them
//! - The category walker that discovers detail work
//! - The bounded detail worker pool that harvests it
//! - The cycle coordinator that repeats the whole pass on a delay

mod category;
mod coordinator;
mod detail;
mod hooks;
mod lease;
mod stats;
mod task;

pub use coordinator::{ListRunner, RunnerSettings};
pub use hooks::{Harvest, ListCrawler};
pub use stats::CycleStats;
pub use task::{Task, TaskStack};
