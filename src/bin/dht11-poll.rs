//! Polls a DHT11 wired to a Raspberry Pi GPIO line and prints every sample.

use std::{
    convert::Infallible,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dht11_sampler::{Dht11Sampler, SampleResult};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use rppal::gpio::{Gpio, IoPin, Level, Mode};

#[derive(Parser, Debug)]
#[command(version, about = "Read a DHT11 humidity and temperature sensor")]
struct Cli {
    /// BCM GPIO number of the sensor data line.
    #[arg(short, long, default_value_t = 14)]
    pin: u8,

    /// Milliseconds between samples. The DHT11 needs at least one second.
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1000..))]
    interval_ms: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the sensor forever (default).
    Poll,
    /// Print the raw level of the pin, with the pull-down enabled.
    Watch,
}

/// Data line that drives the pin on writes and switches it to input on reads.
struct DataLine(IoPin);

impl DataLine {
    fn drive(&mut self, level: Level) {
        if self.0.mode() != Mode::Output {
            self.0.set_mode(Mode::Output);
        }
        self.0.write(level);
    }

    fn release(&mut self) {
        if self.0.mode() != Mode::Input {
            self.0.set_mode(Mode::Input);
        }
    }
}

impl ErrorType for DataLine {
    type Error = Infallible;
}

impl OutputPin for DataLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(Level::High);
        Ok(())
    }
}

impl InputPin for DataLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.release();
        Ok(self.0.read() == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

/// Spins for microsecond delays; the OS scheduler is too coarse for them.
struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let gpio = Gpio::new().context("failed to initialise GPIO")?;
    let pin = gpio
        .get(cli.pin)
        .with_context(|| format!("GPIO {} is not available", cli.pin))?;

    match cli.command.unwrap_or(Command::Poll) {
        Command::Poll => poll(
            pin.into_io(Mode::Output),
            Duration::from_millis(cli.interval_ms),
        ),
        Command::Watch => {
            let input = pin.into_input_pulldown();
            println!("pin {} configured with pull-down", cli.pin);
            loop {
                println!("{}", u8::from(input.is_high()));
            }
        }
    }
}

fn poll(pin: IoPin, interval: Duration) -> anyhow::Result<()> {
    let mut sampler = Dht11Sampler::new(DataLine(pin), SpinDelay);

    loop {
        let Ok(result) = sampler.sample();
        println!("{result}");

        if let SampleResult::Valid(reading) = result {
            let dubious = reading.dubious();
            if dubious.humidity {
                eprintln!(
                    "warning: humidity {}% outside 20..90%, sensor may require recalibration",
                    reading.humidity
                );
            }
            if dubious.temperature {
                eprintln!(
                    "warning: temperature {}C out of range 0C..50C",
                    reading.temperature
                );
            }
        }

        thread::sleep(interval);
    }
}
