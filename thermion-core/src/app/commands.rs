//! Terminal command handlers

use thermion_hal::Board;

use crate::control::PWM_MAX;
use crate::terminal::{parse, Command, Console, ProtocolError, COMMANDS};

use super::{Thermostat, FIRMWARE_NAME, FIRMWARE_VERSION};

impl<B: Board> Thermostat<B> {
    /// Dispatch one completed line
    pub(super) fn execute(&mut self, line: &[u8]) {
        let command = match parse(line) {
            Ok(command) => command,
            Err(e) => return self.protocol_fault(e),
        };

        match command {
            Command::Help => self.cmd_help(),
            Command::Info => self.cmd_info(),
            Command::Run => self.cmd_run(),
            Command::Stop => self.cmd_stop(),
            Command::Default => self.cmd_default(),
            Command::Show => self.cmd_show(),
            Command::Load => self.cmd_load(),
            Command::Save => self.cmd_save(),
            Command::Set => self.reply("Not implemented"),
        }
    }

    pub(super) fn protocol_fault(&mut self, fault: ProtocolError) {
        match fault {
            ProtocolError::Overflow => self.reply("Command too long!"),
            ProtocolError::UnknownCommand => self.reply("Unknown Command!. Try 'help'."),
        }
        self.record(fault.into());
    }

    fn reply(&mut self, text: &str) {
        Console::new(&mut self.board).text(text);
    }

    fn cmd_help(&mut self) {
        let mut out = Console::new(&mut self.board);
        out.text("Commands:");
        for (name, _, help) in COMMANDS {
            out.line(format_args!("  {:<8} {}", name, help));
        }
    }

    fn cmd_info(&mut self) {
        let state = &self.state;
        let pid = &state.pid;
        let mut out = Console::new(&mut self.board);

        out.line(format_args!("{} v{}", FIRMWARE_NAME, FIRMWARE_VERSION));
        out.line(format_args!("State: {}", state.run_state.as_str()));
        out.line(format_args!("ADC: {}", state.adc));
        out.line(format_args!("Resistance: {:.2} Ohms", state.resistance));
        out.line(format_args!(
            "Temperature: {:.2} C (denoised {:.2} C)",
            state.noisy_temp, state.denoised_temp
        ));
        out.line(format_args!("Setpoint: {:.2} C", self.profile.setpoint_c));
        out.line(format_args!(
            "PID: error={:.2} P={:.2} I={:.2} D={:.2} output={:.2}",
            pid.error, pid.p, pid.i, pid.d, pid.output
        ));
        out.line(format_args!("Duty: {}/{}", state.duty, PWM_MAX));
        match state.sensor_fault {
            Some(_) => out.text("Sensor: FAULT"),
            None => out.text("Sensor: OK"),
        }
        if let Some(fault) = self.last_fault {
            out.line(format_args!("Last fault: {}", fault.as_str()));
        }
    }

    fn cmd_run(&mut self) {
        self.start();
        self.reply("Running");
    }

    fn cmd_stop(&mut self) {
        self.stop();
        self.reply("Stopped");
    }

    fn cmd_default(&mut self) {
        if self.state.run_state.is_running() {
            self.reply("Stop first!");
            return;
        }
        self.profile.restore_defaults();
        self.apply_profile();
        self.reply("Defaults restored");
    }

    fn cmd_show(&mut self) {
        let p = &self.profile;
        let mut out = Console::new(&mut self.board);

        out.line(format_args!("ADC pin: {}", p.adc_pin));
        out.line(format_args!("PWM pin: {}", p.pwm_pin));
        out.line(format_args!("INA pin: {}", p.dir_a_pin));
        out.line(format_args!("INB pin: {}", p.dir_b_pin));
        out.line(format_args!("ADC max: {}", p.adc_max));
        out.line(format_args!("Ref resistor: {:.2}", p.ref_resistor));
        out.line(format_args!("Nominal resistance: {:.2}", p.nominal_resistance));
        out.line(format_args!("Nominal temp: {:.2}", p.nominal_temp_c));
        out.line(format_args!("Beta: {:.2}", p.beta));
        out.line(format_args!("Denoise order: {}", p.denoise_order));
        out.line(format_args!("Slew limit: {:.2}", p.slew_limit_c));
        out.line(format_args!("kP: {:.2}", p.kp));
        out.line(format_args!("kI: {:.2}", p.ki));
        out.line(format_args!("kD: {:.2}", p.kd));
        out.line(format_args!("Setpoint: {:.2}", p.setpoint_c));
        out.line(format_args!("Autorun: {}", p.autorun));
        out.line(format_args!("Plot: {}", p.plot));
    }

    fn cmd_load(&mut self) {
        match self.store.load(&mut self.board) {
            Ok(profile) => {
                self.profile = profile;
                self.apply_profile();
                self.reply("OK");
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Profile load failed: {}", e);
                self.record(e.into());
                self.reply("ERROR!!");
            }
        }
    }

    fn cmd_save(&mut self) {
        match self.store.save(&mut self.board, &self.profile) {
            Ok(()) => self.reply("OK"),
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Profile save failed: {}", e);
                self.record(e.into());
                self.reply("ERROR!!");
            }
        }
    }
}
