//! DHT11 Pulse-Timing Sampler for Embedded Rust
//!
//! This crate decodes the single-wire protocol of the DHT11 temperature and
//! humidity sensor by timing the level transitions of its data line, built on
//! top of the [`embedded-hal`] traits.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - One independent exchange per [`Dht11Sampler::sample`] call; rejected
//!   samples are an ordinary [`SampleResult::Invalid`], not an error
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This crate depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for the wake-up pulse and the 1 µs capture ticks
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs why samples are rejected
//! - `rpi`: Builds the `dht11-poll` binary for Raspberry Pi hosts
//!
//! # Example
//!
//! ```ignore
//! let mut sampler = Dht11Sampler::new(pin, delay);
//! loop {
//!     match sampler.sample()? {
//!         SampleResult::Valid(reading) => println!("{reading}"),
//!         SampleResult::Invalid => {}
//!     }
//!     delay.delay_ms(1000);
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

mod error;
mod frame;
pub mod reading;
pub mod sampler;

pub use reading::{Dubious, Fixed, Reading, SampleResult};
pub use sampler::{Dht11Sampler, Timing};
