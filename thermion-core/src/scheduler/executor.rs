//! Cooperative tick scheduler
//!
//! Holds a fixed, ordered list of periodic tasks. The main loop calls
//! [`Scheduler::run_tick`] with the current time; every task whose
//! deadline has passed is returned, in registration order, and its next
//! deadline is set to `now + interval`. Missed deadlines are not caught
//! up: a slow iteration fires each late task once and moves on.

use heapless::Vec;

/// Maximum registered tasks
pub const MAX_TASKS: usize = 8;

/// Periodic tasks of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    /// Sample and denoise the thermistor
    Temperature,
    /// Compute the PID output
    Pid,
    /// Apply the PID output to the actuator
    Controller,
    /// Stream samples to a serial plotter
    Plot,
    /// Prompt and line editing
    Terminal,
    /// Dispatch a completed command line
    CommandExec,
}

impl TaskId {
    /// Every task in execution order
    pub const ALL: [TaskId; 6] = [
        TaskId::Temperature,
        TaskId::Pid,
        TaskId::Controller,
        TaskId::Plot,
        TaskId::Terminal,
        TaskId::CommandExec,
    ];
}

/// Task periods in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskIntervals {
    pub temperature_ms: u32,
    pub pid_ms: u32,
    pub controller_ms: u32,
    pub plot_ms: u32,
    pub terminal_ms: u32,
    pub command_ms: u32,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            temperature_ms: 100,
            pid_ms: 100,
            controller_ms: 100,
            plot_ms: 250,
            terminal_ms: 10,
            command_ms: 10,
        }
    }
}

impl TaskIntervals {
    /// Period of a given task
    pub fn interval(&self, task: TaskId) -> u32 {
        match task {
            TaskId::Temperature => self.temperature_ms,
            TaskId::Pid => self.pid_ms,
            TaskId::Controller => self.controller_ms,
            TaskId::Plot => self.plot_ms,
            TaskId::Terminal => self.terminal_ms,
            TaskId::CommandExec => self.command_ms,
        }
    }
}

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Task table is full
    Full,
    /// Task already registered
    Duplicate,
}

/// One registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSlot {
    pub task: TaskId,
    pub interval_ms: u32,
    pub next_due_ms: u64,
}

/// Tasks due in one tick, in execution order
pub type DueTasks = Vec<TaskId, MAX_TASKS>;

/// Periodic task scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    slots: Vec<TaskSlot, MAX_TASKS>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Create a scheduler with every controller task registered in order
    pub fn with_intervals(intervals: TaskIntervals) -> Self {
        let mut scheduler = Self::new();
        for task in TaskId::ALL {
            // Six distinct tasks always fit in MAX_TASKS
            let _ = scheduler.register(task, intervals.interval(task));
        }
        scheduler
    }

    /// Append a task; it is first due on the first tick
    pub fn register(&mut self, task: TaskId, interval_ms: u32) -> Result<(), SchedulerError> {
        if self.slots.iter().any(|s| s.task == task) {
            return Err(SchedulerError::Duplicate);
        }
        self.slots
            .push(TaskSlot {
                task,
                interval_ms,
                next_due_ms: 0,
            })
            .map_err(|_| SchedulerError::Full)
    }

    /// Registered tasks in order
    pub fn slots(&self) -> &[TaskSlot] {
        &self.slots
    }

    /// Next deadline of a task
    pub fn next_due(&self, task: TaskId) -> Option<u64> {
        self.slots
            .iter()
            .find(|s| s.task == task)
            .map(|s| s.next_due_ms)
    }

    /// Collect every task due at `now_ms` and advance its deadline
    pub fn run_tick(&mut self, now_ms: u64) -> DueTasks {
        let mut due = DueTasks::new();
        for slot in self.slots.iter_mut() {
            if now_ms >= slot.next_due_ms {
                slot.next_due_ms = now_ms + u64::from(slot.interval_ms);
                // Capacity equals the slot table's, so this cannot fail
                let _ = due.push(slot.task);
            }
        }
        due
    }
}
