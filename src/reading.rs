use core::fmt;

/// An integer-plus-fraction value at the sensor's 0.1 resolution.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fixed {
    /// Whole units.
    pub integral: u8,
    /// Tenths, as reported by the sensor. Carries no sign.
    pub fractional: u8,
}

impl Fixed {
    pub const fn new(integral: u8, fractional: u8) -> Self {
        Fixed {
            integral,
            fractional,
        }
    }

    pub fn to_f32(self) -> f32 {
        f32::from(self.integral) + f32::from(self.fractional) / 10.0
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.integral, self.fractional)
    }
}

/// A validated reading from the DHT11.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity: Fixed,
    /// Temperature in degrees Celsius.
    pub temperature: Fixed,
}

/// Relative humidity range (percent) over which the DHT11 stays calibrated.
const HUMIDITY_RANGE: core::ops::RangeInclusive<f32> = 20.0..=90.0;
/// Rated temperature range (degrees Celsius) of the DHT11.
const TEMPERATURE_RANGE: core::ops::RangeInclusive<f32> = 0.0..=50.0;

/// Plausibility flags for a [`Reading`].
///
/// A dubious reading is still a valid sample; it is up to the caller to
/// decide what to do with it.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dubious {
    /// Humidity is outside 20..=90 %; the sensor may require recalibration.
    pub humidity: bool,
    /// Temperature is outside the rated 0..=50 °C.
    pub temperature: bool,
}

impl Dubious {
    pub fn any(&self) -> bool {
        self.humidity || self.temperature
    }
}

impl Reading {
    /// Reinterprets the 4 data bytes of a frame, in wire order.
    pub(crate) fn from_bytes(data: [u8; 4]) -> Self {
        let [hum_int, hum_frac, temp_int, temp_frac] = data;
        Reading {
            humidity: Fixed::new(hum_int, hum_frac),
            temperature: Fixed::new(temp_int, temp_frac),
        }
    }

    /// Checks the reading against the ranges the DHT11 is specified for.
    pub fn dubious(&self) -> Dubious {
        Dubious {
            humidity: !HUMIDITY_RANGE.contains(&self.humidity.to_f32()),
            temperature: !TEMPERATURE_RANGE.contains(&self.temperature.to_f32()),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Humidity = {} % Temperature = {} C",
            self.humidity, self.temperature
        )
    }
}

/// Outcome of one protocol exchange.
///
/// A rejected sample carries no reason: timeouts, short frames and checksum
/// mismatches all end up as `Invalid`. Retry on the next polling interval.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleResult {
    Valid(Reading),
    Invalid,
}

impl SampleResult {
    pub fn reading(&self) -> Option<Reading> {
        match self {
            SampleResult::Valid(reading) => Some(*reading),
            SampleResult::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SampleResult::Valid(_))
    }
}

impl fmt::Display for SampleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleResult::Valid(reading) => fmt::Display::fmt(reading, f),
            SampleResult::Invalid => f.write_str("Bad sample, skip and try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let reading = Reading::from_bytes([0x32, 0x00, 0x18, 0x00]);
        assert_eq!(reading.humidity, Fixed::new(50, 0));
        assert_eq!(reading.temperature, Fixed::new(24, 0));
        assert_eq!(reading.humidity.to_f32(), 50.0);
        assert_eq!(reading.temperature.to_f32(), 24.0);
    }

    #[test]
    fn test_display_valid() {
        let result = SampleResult::Valid(Reading::from_bytes([55, 0, 22, 7]));
        assert_eq!(
            format!("{result}"),
            "Humidity = 55.0 % Temperature = 22.7 C"
        );
    }

    #[test]
    fn test_display_invalid() {
        assert_eq!(
            format!("{}", SampleResult::Invalid),
            "Bad sample, skip and try again"
        );
    }

    #[test]
    fn test_accessors() {
        let reading = Reading::from_bytes([40, 0, 20, 0]);
        assert!(SampleResult::Valid(reading).is_valid());
        assert_eq!(SampleResult::Valid(reading).reading(), Some(reading));
        assert!(!SampleResult::Invalid.is_valid());
        assert_eq!(SampleResult::Invalid.reading(), None);
    }

    #[test]
    fn test_dubious_in_range() {
        let reading = Reading::from_bytes([20, 0, 50, 0]);
        assert!(!reading.dubious().any());
    }

    #[test]
    fn test_dubious_humidity() {
        let dry = Reading::from_bytes([19, 9, 25, 0]).dubious();
        assert_eq!(
            dry,
            Dubious {
                humidity: true,
                temperature: false
            }
        );

        let damp = Reading::from_bytes([90, 1, 25, 0]).dubious();
        assert!(damp.humidity);
    }

    #[test]
    fn test_dubious_temperature() {
        let hot = Reading::from_bytes([45, 0, 50, 1]).dubious();
        assert_eq!(
            hot,
            Dubious {
                humidity: false,
                temperature: true
            }
        );
    }
}
