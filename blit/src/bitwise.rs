/// Helpers to read and replace the two 4-bit halves of a byte.
/// `shift` is the position of the nibble from lsb: `0` for the low nibble,
/// `4` for the high one.
pub trait Nibbles: Copy {
    fn nibble(self, shift: u8) -> u8;

    /// Returns a copy where the nibble at `shift` holds `value` (masked to 4 bits)
    /// and the other nibble is untouched.
    #[must_use]
    fn with_nibble(self, shift: u8, value: u8) -> Self;

    fn low_nibble(self) -> u8 {
        self.nibble(0)
    }

    fn high_nibble(self) -> u8 {
        self.nibble(4)
    }
}

impl Nibbles for u8 {
    #[inline]
    fn nibble(self, shift: u8) -> u8 {
        debug_assert!(shift == 0 || shift == 4);
        (self >> shift) & 0xF
    }

    #[inline]
    fn with_nibble(self, shift: u8, value: u8) -> Self {
        debug_assert!(shift == 0 || shift == 4);

        // 0xF0 >> 0 keeps the high half, 0xF0 >> 4 keeps the low half.
        let keep = 0xF0 >> shift;
        ((value & 0xF) << shift) | (self & keep)
    }
}
