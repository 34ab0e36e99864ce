// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master board firmware: navigate the built-in track.

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::{delay::Delay, peripheral::NVIC};
use cortex_m_rt::{entry, exception};
use critical_section::Mutex;
use log::{error, info, warn, LevelFilter};
use panic_halt as _;

use hal::{
    gpio::{gpiod, Output, PushPull},
    i2c::{BlockingI2c, Mode},
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use rover::{
    config::{
        NavConfig, MOTOR_DRIVER_ADDR, SERVO_HZ, SERVO_PERIOD_COUNTS, STARTUP_DELAY_MS,
    },
    control::{Navigator, Phase},
    drivers::{Led, Servo, ServoSweep},
    hw::{
        encoder::{LEFT_LINE, RIGHT_LINE},
        logger,
        pins::SENSOR_ADC_INPUTS,
        EncoderEdges, MasterPins, Pwm, PwmChannel, SensorAdc, Usart,
    },
    protocol::CommandLink,
    sensors::{AdcRotation, EncoderAccumulator, SensorMux},
    track::{Track, ACTIVE},
};

static ENCODERS: EncoderAccumulator = EncoderAccumulator::new();
static SENSORS: SensorMux = SensorMux::new();

static SENSOR_ADC: Mutex<RefCell<Option<SensorAdc>>> = Mutex::new(RefCell::new(None));
static SERVO: Mutex<RefCell<Option<Servo<PwmChannel<pac::TIM3, 1>>>>> =
    Mutex::new(RefCell::new(None));
static LEFT_LED: Mutex<RefCell<Option<Led<gpiod::PD9<Output<PushPull>>>>>> =
    Mutex::new(RefCell::new(None));
static RIGHT_LED: Mutex<RefCell<Option<Led<gpiod::PD10<Output<PushPull>>>>>> =
    Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let (Some(dp), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) else {
        panic!("peripherals already taken");
    };

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;
    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    let pins = MasterPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);

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

    // Give the motor-driver board time to boot and the operator time to set the rover down
    info!("starting in {} ms", STARTUP_DELAY_MS);
    delay.delay_ms(STARTUP_DELAY_MS);

    // Status LEDs follow the encoder edges
    critical_section::with(|cs| {
        LEFT_LED
            .borrow_ref_mut(cs)
            .replace(Led::active_low(pins.leds.yellow));
        RIGHT_LED
            .borrow_ref_mut(cs)
            .replace(Led::active_low(pins.leds.green));
    });

    // Encoders
    let _encoder_pins = pins.encoder;
    let _edges = EncoderEdges::new(dp.EXTI, &dp.SYSCFG);

    // Sensors: measure the compass offset, which also starts the rotation
    let mut compass_set = pins.sensors.compass_set;
    let mut adc = SensorAdc::new(dp.ADC1, SENSOR_ADC_INPUTS);
    match SENSORS.reset_compass(&mut adc, &mut compass_set) {
        Ok(offset) => info!("compass offset {}", offset),
        Err(_) => warn!("compass set/reset line failed"),
    }
    critical_section::with(|cs| SENSOR_ADC.borrow_ref_mut(cs).replace(adc));

    // Scanning servo on TIM3 CH1, stepped from the TIM3 update interrupt
    let _servo_pin = pins.servo;
    let pwm = Pwm::tim3(
        dp.TIM3,
        clocks.timclk1().raw(),
        SERVO_HZ,
        SERVO_PERIOD_COUNTS,
    );
    let servo = Servo::new(pwm.ch1, ServoSweep::default());
    critical_section::with(|cs| SERVO.borrow_ref_mut(cs).replace(servo));
    Pwm::<pac::TIM3>::listen_update(true);

    unsafe {
        NVIC::unmask(pac::Interrupt::EXTI0);
        NVIC::unmask(pac::Interrupt::EXTI1);
        NVIC::unmask(pac::Interrupt::ADC);
        NVIC::unmask(pac::Interrupt::TIM3);
    }

    // Command bus to the motor-driver board
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(100.kHz()),
        &clocks,
        &mut apb1,
        10_000,
    );
    let link = CommandLink::new(i2c, MOTOR_DRIVER_ADDR);

    let mut nav = Navigator::new(
        Track::new(ACTIVE),
        link,
        &ENCODERS,
        delay,
        NavConfig::default(),
    );

    info!("running track with {} legs", Track::new(ACTIVE).len());
    log_heading(0);
    let result = loop {
        match nav.step() {
            Ok(Phase::Done) => break Ok(()),
            Ok(Phase::Turning) => log_heading(nav.state().cursor),
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };
    let stats = nav.link().stats();
    info!(
        "{} frames sent, {} retries, {} failed",
        stats.sent, stats.retries, stats.failed
    );

    let (_link, _encoders, mut delay) = nav.free();
    if let Err(e) = result {
        error!("navigation stopped: {}", e);
        loop {
            red.blink(&mut delay, 3);
            delay.delay_ms(1000_u32);
        }
    }

    loop {
        cortex_m::asm::wfi();
    }
}

/// Log the compass heading at the start of leg `cursor`.
fn log_heading(cursor: usize) {
    let heading = SENSORS
        .snapshot()
        .compass_heading_deg(SENSORS.compass_offset());
    info!("checkpoint {}: heading {} deg", cursor, heading as i32);
}

#[interrupt]
fn EXTI0() {
    EncoderEdges::clear(LEFT_LINE);
    ENCODERS.on_left_edge();
    critical_section::with(|cs| {
        if let Some(led) = LEFT_LED.borrow_ref_mut(cs).as_mut() {
            led.toggle();
        }
    });
}

#[interrupt]
fn EXTI1() {
    EncoderEdges::clear(RIGHT_LINE);
    ENCODERS.on_right_edge();
    critical_section::with(|cs| {
        if let Some(led) = RIGHT_LED.borrow_ref_mut(cs).as_mut() {
            led.toggle();
        }
    });
}

#[interrupt]
fn ADC() {
    critical_section::with(|cs| {
        if let Some(adc) = SENSOR_ADC.borrow_ref_mut(cs).as_mut() {
            let value = adc.take_result();
            if let Some(next) = SENSORS.on_conversion_complete(value) {
                adc.start(next.mux());
            }
        }
    });
}

#[interrupt]
fn TIM3() {
    Pwm::<pac::TIM3>::clear_update();
    critical_section::with(|cs| {
        if let Some(servo) = SERVO.borrow_ref_mut(cs).as_mut() {
            servo.tick();
        }
    });
}

/// Unexpected interrupt: flash the red LED forever.
#[exception]
unsafe fn DefaultHandler(_irqn: i16) {
    let gpiod = &*pac::GPIOD::ptr();
    loop {
        gpiod.odr.modify(|r, w| w.bits(r.bits() ^ (1 << 8)));
        cortex_m::asm::delay(4_000_000);
    }
}
