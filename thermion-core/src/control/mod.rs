//! Closed-loop control: PID law, actuator output and shared state

pub mod actuator;
pub mod pid;
pub mod state;

pub use actuator::{ActuatorDriver, ActuatorError, ActuatorPins, PWM_MAX};
pub use pid::{PidController, PidGains, PID_INITIAL_TEMP_C};
pub use state::{ControlState, RunState};
