use crate::error::Rejection;

/// Number of data bits in one frame (4 data bytes plus the checksum byte).
pub(crate) const FRAME_BITS: u8 = 40;

/// Scratch buffer for the bits of one protocol exchange.
///
/// Bits are shifted in MSB first; every 8 bits the next byte starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RawFrame {
    bytes: [u8; 5],
    bits: u8,
}

impl RawFrame {
    pub(crate) const fn new() -> Self {
        RawFrame {
            bytes: [0; 5],
            bits: 0,
        }
    }

    /// Shifts one bit into the current byte. Bits past the 40th are dropped.
    pub(crate) fn push_bit(&mut self, one: bool) {
        if self.bits >= FRAME_BITS {
            return;
        }
        let byte = &mut self.bytes[usize::from(self.bits / 8)];
        *byte = (*byte << 1) | u8::from(one);
        self.bits += 1;
    }

    pub(crate) fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns the 4 data bytes if the frame is complete and its checksum holds.
    pub(crate) fn checked_data(&self) -> Result<[u8; 4], Rejection> {
        if self.bits() < FRAME_BITS {
            return Err(Rejection::ShortFrame);
        }

        let [hum_int, hum_frac, temp_int, temp_frac, sum] = self.bytes;
        let data = [hum_int, hum_frac, temp_int, temp_frac];
        if checksum(&data) != sum {
            return Err(Rejection::ChecksumMismatch);
        }
        Ok(data)
    }
}

/// Low 8 bits of the sum of the data bytes.
pub(crate) fn checksum(data: &[u8; 4]) -> u8 {
    data.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_byte(frame: &mut RawFrame, byte: u8) {
        for i in 0..8 {
            frame.push_bit((byte >> (7 - i)) & 1 == 1);
        }
    }

    fn frame_of(bytes: [u8; 5]) -> RawFrame {
        let mut frame = RawFrame::new();
        for byte in bytes {
            push_byte(&mut frame, byte);
        }
        frame
    }

    #[test]
    fn test_push_bit_msb_first() {
        let mut frame = RawFrame::new();
        push_byte(&mut frame, 0b1011_1010);
        assert_eq!(frame.bits(), 8);
        assert_eq!(frame.bytes[0], 0b1011_1010);
        assert_eq!(frame.bytes[1..], [0; 4]);
    }

    #[test]
    fn test_bits_past_frame_are_dropped() {
        let mut frame = frame_of([0x32, 0x00, 0x18, 0x00, 0x4A]);
        frame.push_bit(true);
        frame.push_bit(true);

        assert_eq!(frame.bits(), FRAME_BITS);
        assert_eq!(frame.checked_data(), Ok([0x32, 0x00, 0x18, 0x00]));
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0x32, 0x00, 0x18, 0x00]), 0x4A);
        assert_eq!(checksum(&[0xFF, 0x01, 0x80, 0x81]), 0x01);
    }

    #[test]
    fn test_checked_data_valid() {
        let frame = frame_of([0x37, 0x02, 0x16, 0x05, 0x54]);
        assert_eq!(frame.checked_data(), Ok([0x37, 0x02, 0x16, 0x05]));
    }

    #[test]
    fn test_checked_data_checksum_mismatch() {
        let frame = frame_of([0x32, 0x00, 0x18, 0x00, 0x4B]);
        assert_eq!(frame.checked_data(), Err(Rejection::ChecksumMismatch));
    }

    #[test]
    fn test_checked_data_short_frame() {
        // 39 bits of an otherwise plausible all-zero frame
        let mut frame = RawFrame::new();
        for _ in 0..39 {
            frame.push_bit(false);
        }
        assert_eq!(frame.checked_data(), Err(Rejection::ShortFrame));

        frame.push_bit(false);
        assert_eq!(frame.checked_data(), Ok([0; 4]));
    }
}
