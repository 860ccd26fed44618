//! Controller application
//!
//! [`Thermostat`] owns the board, the profile and all control state. The
//! firmware calls [`Thermostat::poll`] in a loop; each call runs whatever
//! tasks the scheduler reports due, in order, to completion. Because every
//! task takes `&mut self`, one tick is the only critical section there is.

mod commands;

use thermion_hal::Board;

use crate::config::{Profile, ProfileStore};
use crate::control::{ActuatorDriver, ActuatorPins, ControlState, PidGains};
use crate::error::Fault;
use crate::scheduler::{DueTasks, Scheduler, TaskId, TaskIntervals};
use crate::sensor::{sample_temperature, Denoiser, SensorError};
use crate::terminal::{Console, LineEditor};

/// Name reported by `info`
pub const FIRMWARE_NAME: &str = "Thermion";

/// Version reported by `info`
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The heater controller
pub struct Thermostat<B: Board> {
    board: B,
    profile: Profile,
    state: ControlState,
    denoiser: Denoiser,
    actuator: ActuatorDriver,
    terminal: LineEditor,
    scheduler: Scheduler,
    store: ProfileStore,
    last_fault: Option<Fault>,
}

impl<B: Board> Thermostat<B> {
    /// Assemble a controller around an explicit profile
    ///
    /// Hardware is untouched until [`Thermostat::init`].
    pub fn new(board: B, profile: Profile, intervals: TaskIntervals) -> Self {
        let actuator = ActuatorDriver::new(ActuatorPins::from(&profile));
        Self {
            board,
            profile,
            state: ControlState::default(),
            denoiser: Denoiser::new(),
            actuator,
            terminal: LineEditor::new(),
            scheduler: Scheduler::with_intervals(intervals),
            store: ProfileStore::default(),
            last_fault: None,
        }
    }

    /// Boot sequence: load the stored profile, configure outputs, autorun
    ///
    /// An unreadable or missing profile falls back to defaults.
    pub fn boot(mut board: B, intervals: TaskIntervals) -> Self {
        let store = ProfileStore::default();
        let mut load_fault = None;

        let profile = match store.load(&mut board) {
            Ok(profile) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Profile loaded from storage");
                profile
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Stored profile unusable ({}), using defaults", e);
                load_fault = Some(Fault::from(e));
                Profile::default()
            }
        };

        let mut app = Self::new(board, profile, intervals);
        app.store = store;
        app.last_fault = load_fault;

        if let Err(_e) = app.init() {
            #[cfg(feature = "defmt")]
            defmt::error!("Actuator init failed: {}", _e);
        }

        if app.profile.autorun {
            #[cfg(feature = "defmt")]
            defmt::info!("Autorun enabled, starting control loop");
            app.start();
        }
        app
    }

    /// Configure actuator pins and force the output off
    pub fn init(&mut self) -> Result<(), Fault> {
        self.actuator
            .init(&mut self.board)
            .map_err(|e| self.record(e.into()))?;
        self.state.duty = self.actuator.duty();
        Ok(())
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Mutable profile access; pin changes take effect on the next
    /// `load` or `default`
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn terminal(&self) -> &LineEditor {
        &self.terminal
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Most recent fault, if any
    pub fn last_fault(&self) -> Option<Fault> {
        self.last_fault
    }

    /// Run every task due at the board's current time
    pub fn poll(&mut self) -> DueTasks {
        let now = self.board.now_ms();
        self.run_tick(now)
    }

    /// Run every task due at `now_ms`, returning the tasks that ran
    pub fn run_tick(&mut self, now_ms: u64) -> DueTasks {
        let due = self.scheduler.run_tick(now_ms);
        for &task in due.iter() {
            self.run_task(task);
        }
        due
    }

    fn run_task(&mut self, task: TaskId) {
        match task {
            TaskId::Temperature => self.temperature_task(),
            TaskId::Pid => self.pid_task(),
            TaskId::Controller => self.controller_task(),
            TaskId::Plot => self.plot_task(),
            TaskId::Terminal => self.terminal.poll(&mut self.board),
            TaskId::CommandExec => self.command_task(),
        }
    }

    /// Enter Running with fresh PID state
    ///
    /// The denoiser history and the last readings are kept.
    pub fn start(&mut self) {
        self.state.start();
    }

    /// Enter Stopped and switch the heater off
    pub fn stop(&mut self) {
        self.state.stop();
        match self.actuator.apply(&mut self.board, 0.0) {
            Ok(duty) => self.state.duty = duty,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Failed to switch heater off: {}", e);
                self.record(e.into());
            }
        }
    }

    fn temperature_task(&mut self) {
        let adc = match self.board.analog_read(self.profile.adc_pin) {
            Ok(adc) => adc,
            Err(_) => {
                self.sensor_fault(self.state.adc, SensorError::AdcRead);
                return;
            }
        };

        match sample_temperature(adc, &self.profile) {
            Ok(reading) => {
                let denoised = self.denoiser.denoise(
                    reading.celsius,
                    self.profile.denoise_order,
                    self.profile.slew_limit_c,
                );
                self.state.record_reading(reading, denoised);
            }
            Err(e) => self.sensor_fault(adc, e),
        }
    }

    fn sensor_fault(&mut self, adc: u16, fault: SensorError) {
        if self.state.sensor_fault != Some(fault) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sensor fault at adc={}: {}", adc, fault);
        }
        self.state.record_fault(adc, fault);
        self.record(fault.into());
    }

    fn pid_task(&mut self) {
        if !self.state.run_state.is_running() {
            return;
        }
        let Some(current) = self.state.regulated_temp() else {
            return;
        };
        let gains = PidGains::from(&self.profile);
        self.state
            .pid
            .step(gains, self.profile.setpoint_c, current, &self.board);
    }

    fn controller_task(&mut self) {
        if !self.state.run_state.is_running() {
            return;
        }
        // Heater stays off until a good sample exists
        let percentage = match self.state.regulated_temp() {
            Some(_) => self.state.pid.output,
            None => 0.0,
        };
        match self.actuator.apply(&mut self.board, percentage) {
            Ok(duty) => self.state.duty = duty,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Actuator write failed: {}", e);
                self.record(e.into());
            }
        }
    }

    fn plot_task(&mut self) {
        if !self.profile.plot || !self.state.run_state.is_running() {
            return;
        }
        let mut out = Console::new(&mut self.board);
        out.line(format_args!(
            "{:.2} {:.2} {:.2} {:.2}",
            self.state.noisy_temp,
            self.state.denoised_temp,
            self.profile.setpoint_c,
            self.state.pid.output
        ));
    }

    fn command_task(&mut self) {
        let Some(line) = self.terminal.take_command() else {
            return;
        };
        match line {
            Ok(line) => self.execute(&line),
            Err(e) => self.protocol_fault(e),
        }
        self.terminal.finish(&mut self.board);
    }

    /// Re-derive hardware bindings after the profile was replaced
    fn apply_profile(&mut self) {
        let pins = ActuatorPins::from(&self.profile);
        if pins == self.actuator.pins() {
            return;
        }
        self.actuator = ActuatorDriver::new(pins);
        if self.init().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("Actuator init failed after profile change");
        }
    }

    fn record(&mut self, fault: Fault) -> Fault {
        self.last_fault = Some(fault);
        fault
    }
}
