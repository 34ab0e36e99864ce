// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Slave board firmware: drive the wheel motors as the master commands.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use log::{info, warn, LevelFilter};
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use rover::{
    config::{MOTOR_DRIVER_ADDR, MOTOR_PWM_HZ, MOTOR_PWM_STEPS},
    drivers::{HBridge, Led, MotorDriver},
    hw::{logger, I2cTarget, Pwm, SlavePins, TargetEvent, Usart},
    protocol::Parser,
};

#[entry]
fn main() -> ! {
    // Peripherals
    let Some(dp) = pac::Peripherals::take() else {
        panic!("peripherals already taken");
    };

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = SlavePins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    // Red LED stays lit if there is no log output
    let mut red = Led::active_low(pins.leds.red);
    red.light_on_err(logger::init(Usart::new(serial), LevelFilter::Info));

    // LED
    let mut led_rx = Led::active_low(pins.leds.green);

    // H-bridges on TIM4 CH1..CH4, coasting until the first command
    let _motor_pins = pins.motors;
    let pwm = Pwm::tim4(
        dp.TIM4,
        clocks.timclk1().raw(),
        MOTOR_PWM_HZ,
        MOTOR_PWM_STEPS,
    );
    let mut driver = MotorDriver::new(
        HBridge::new(pwm.ch1, pwm.ch2),
        HBridge::new(pwm.ch3, pwm.ch4),
    );

    // Command bus
    let _i2c_pins = pins.i2c1;
    let mut target = I2cTarget::new(dp.I2C1, MOTOR_DRIVER_ADDR);
    let mut parser = Parser::new();

    info!("motor driver listening at {:#04x}", MOTOR_DRIVER_ADDR);

    loop {
        match target.poll() {
            Some(TargetEvent::Byte(b)) => parser.push(b),
            Some(TargetEvent::End) => match parser.end_transaction() {
                Some(frame) => {
                    led_rx.toggle();
                    driver.apply(frame);
                }
                None => warn!("dropped malformed frame ({} so far)", parser.dropped()),
            },
            None => {}
        }
    }
}
