use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::Rejection;
use crate::frame::RawFrame;
use crate::reading::{Reading, SampleResult};

/// Protocol timing constants.
///
/// Tick counts are in units of the capture loop, one `delay_us(1)` plus the
/// cost of a pin read each.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long the host holds the line low to wake the sensor.
    pub start_low_ms: u32,
    /// How long the host drives the line high before releasing it.
    pub start_high_us: u32,
    /// Upper bound on the transitions captured in one exchange.
    pub max_transitions: u8,
    /// Ticks at one level after which the sensor is considered silent.
    pub tick_ceiling: u8,
    /// Sensor response transitions preceding the first data bit.
    pub preamble_transitions: u8,
    /// High pulses longer than this many ticks are a 1 bit.
    pub bit_threshold: u8,
}

impl Timing {
    pub const DHT11: Timing = Timing {
        start_low_ms: 18,
        start_high_us: 40,
        max_transitions: 85,
        tick_ceiling: 255,
        preamble_transitions: 4,
        bit_threshold: 16,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Timing::DHT11
    }
}

/// Pulse-timing sampler for the DHT11 sensor.
///
/// Every call to [`sample`](Dht11Sampler::sample) is an independent
/// exchange with the sensor; nothing but the pin, the delay provider and the
/// timing is kept between calls.
pub struct Dht11Sampler<PIN, D> {
    pin: PIN,
    delay: D,
    timing: Timing,
}

impl<PIN, DELAY, E> Dht11Sampler<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a sampler using the DHT11 timing.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the DHT11 data line. Must support both input and output.
    ///   Setting it high must release the line (open drain, or switch to input).
    /// * `delay` - A delay provider implementing the `DelayNs` trait. Microsecond delays must busy-wait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Self::with_timing(pin, delay, Timing::DHT11)
    }

    /// Creates a sampler with custom protocol timing.
    pub fn with_timing(pin: PIN, delay: DELAY, timing: Timing) -> Self {
        Dht11Sampler { pin, delay, timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Gives back the pin and the delay provider.
    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }

    /// Runs one protocol exchange with the sensor.
    ///
    /// Busy-waits on the calling thread for the whole exchange, at most a
    /// few tens of milliseconds.
    ///
    /// # Returns
    ///
    /// * `Ok(SampleResult::Valid(_))` if 40 bits were captured and the checksum holds.
    /// * `Ok(SampleResult::Invalid)` otherwise. This is expected now and then; retry on the next interval.
    /// * `Err(E)` if the pin itself failed.
    pub fn sample(&mut self) -> Result<SampleResult, E> {
        self.wake()?;

        let mut frame = RawFrame::new();
        let timed_out = self.capture(&mut frame)?;

        let checked = frame.checked_data().map_err(|reason| match reason {
            Rejection::ShortFrame if timed_out => Rejection::Timeout,
            other => other,
        });

        match checked {
            Ok(data) => Ok(SampleResult::Valid(Reading::from_bytes(data))),
            Err(_reason) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "dht11: rejected sample: {} ({} bits)",
                    _reason,
                    frame.bits()
                );
                Ok(SampleResult::Invalid)
            }
        }
    }

    /// Sends the start signal and releases the line to the sensor.
    fn wake(&mut self) -> Result<(), E> {
        self.pin.set_low()?;
        self.delay.delay_ms(self.timing.start_low_ms);
        self.pin.set_high()?;
        self.delay.delay_us(self.timing.start_high_us);
        Ok(())
    }

    /// Measures transitions and shifts data bits into `frame`.
    ///
    /// Returns `true` if the capture ended because the line stopped changing.
    fn capture(&mut self, frame: &mut RawFrame) -> Result<bool, E> {
        let timing = self.timing;
        let mut last_high = true;

        for transition in 0..timing.max_transitions {
            let ticks = self.ticks_at(last_high)?;
            last_high = self.pin.is_high()?;

            if ticks >= timing.tick_ceiling {
                return Ok(true);
            }

            // Even transitions after the preamble are the high pulses; odd ones
            // are the fixed-width low separators.
            if transition >= timing.preamble_transitions && transition % 2 == 0 {
                frame.push_bit(ticks > timing.bit_threshold);
            }
        }

        Ok(false)
    }

    /// Counts ticks while the line stays at `high`, up to the tick ceiling.
    fn ticks_at(&mut self, high: bool) -> Result<u8, E> {
        let mut ticks: u8 = 0;
        while self.pin.is_high()? == high {
            ticks = ticks.saturating_add(1);
            self.delay.delay_us(1);
            if ticks >= self.timing.tick_ceiling {
                break;
            }
        }
        Ok(ticks)
    }
}
