//! Thermion - Heater Controller Firmware
//!
//! Main firmware binary for a Raspberry Pi Pico driving a resistive
//! heater through an H-bridge, regulated from an NTC thermistor and
//! tuned over a serial terminal.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermion_core::scheduler::TaskIntervals;
use thermion_core::Thermostat;
use thermion_hal::serial::SerialConfig;

use crate::board::{pwm_config, PicoBoard};
use crate::flash::FlashRegion;

mod board;
mod flash;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Thermion firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Terminal UART
    let baudrate = SerialConfig::default().baudrate;
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("UART initialized at {} baud", baudrate);

    // Thermistor on ADC0
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let thermistor = Channel::new_pin(p.PIN_26, Pull::None);

    // H-bridge: enable on PWM3 A, direction pins start low
    let pwm_cfg = pwm_config(0);
    let pwm = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, pwm_cfg.clone());
    let dir_a = Output::new(p.PIN_7, Level::Low);
    let dir_b = Output::new(p.PIN_8, Level::Low);

    let board = PicoBoard {
        adc,
        thermistor,
        pwm,
        pwm_config: pwm_cfg,
        dir_a,
        dir_b,
        uart,
        flash: FlashRegion::new(p.FLASH),
    };

    let mut app = Thermostat::boot(board, TaskIntervals::default());
    info!(
        "Boot complete: {}, setpoint {} C",
        app.state().run_state,
        app.profile().setpoint_c
    );

    loop {
        app.poll();
        Timer::after_millis(1).await;
    }
}
