//! Cooperative task scheduler
//!
//! Single-threaded and non-preemptive: tasks are plain method calls made
//! from one tick loop.

pub mod executor;

pub use executor::{
    DueTasks, Scheduler, SchedulerError, TaskId, TaskIntervals, TaskSlot, MAX_TASKS,
};
