//! Pure Bit-Logik
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::traits::ShiftRegisterPins;
use crate::types::{LineIndex, OutputState};

/// Setzt oder löscht ein einzelnes Bit der Ausgangsmaske
///
/// Validiert `line` nicht gegen die Kettenlänge, das macht die Bank.
/// Leitungen ab 32 lassen den Zustand unverändert.
///
/// # Beispiele
///
/// ```
/// # use esp_core::{apply_line, OutputState};
/// let state = apply_line(OutputState::ALL_OFF, 3, true);
/// assert_eq!(state.bits(), 0b1000);
/// assert_eq!(apply_line(state, 3, false), OutputState::ALL_OFF);
/// ```
pub fn apply_line(state: OutputState, line: LineIndex, on: bool) -> OutputState {
    let mask = 1u32.checked_shl(u32::from(line)).unwrap_or(0);
    if on {
        OutputState::from_bits(state.bits() | mask)
    } else {
        OutputState::from_bits(state.bits() & !mask)
    }
}

/// Zerlegt die Maske in Bytes in Sende-Reihenfolge
///
/// Das erste Byte ist für den Chip am Ende der Kette (höchstwertige
/// Bits), denn jedes weitere Byte schiebt die vorherigen einen Chip weiter.
///
/// # Beispiele
///
/// ```
/// # use esp_core::{chip_bytes, OutputState};
/// let bytes = chip_bytes::<2>(OutputState::from_bits(0x8001));
/// assert_eq!(bytes, [0x80, 0x01]); // Bits [15:8] zuerst
/// ```
pub fn chip_bytes<const CHIPS: usize>(state: OutputState) -> [u8; CHIPS] {
    let mut bytes = [0u8; CHIPS];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let chip = (CHIPS - 1 - i) as u32;
        *byte = state.bits().checked_shr(8 * chip).unwrap_or(0) as u8;
    }
    bytes
}

/// Schiebt ein Byte MSB-first über SER/SRCLK
///
/// Datenbit steht vor der steigenden Taktflanke, danach geht der Takt
/// wieder auf LOW. Der Latch wird hier nicht angefasst.
pub fn shift_out_byte<P: ShiftRegisterPins + ?Sized>(pins: &mut P, byte: u8) {
    for bit in (0..8).rev() {
        pins.set_data(byte & (1 << bit) != 0);
        pins.set_shift_clock(true);
        pins.set_shift_clock(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_line_sets_single_bit() {
        let state = apply_line(OutputState::from_bits(0x0400), 3, true);
        assert_eq!(state.bits(), 0x0408);
    }

    #[test]
    fn test_apply_line_clears_single_bit() {
        let state = apply_line(OutputState::from_bits(0x0408), 3, false);
        assert_eq!(state.bits(), 0x0400);
    }

    #[test]
    fn test_apply_line_out_of_width_is_noop() {
        let state = OutputState::from_bits(0x1234);
        assert_eq!(apply_line(state, 40, true), state);
    }

    #[test]
    fn test_chip_bytes_two_chips_high_byte_first() {
        assert_eq!(chip_bytes::<2>(OutputState::from_bits(1 << 15)), [0x80, 0x00]);
        assert_eq!(chip_bytes::<2>(OutputState::from_bits(1)), [0x00, 0x01]);
    }

    #[test]
    fn test_chip_bytes_four_chips() {
        let bytes = chip_bytes::<4>(OutputState::from_bits(0x1234_5678));
        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_chip_bytes_single_chip() {
        assert_eq!(chip_bytes::<1>(OutputState::from_bits(0xA5)), [0xA5]);
    }

    /// Minimaler Pin-Mock: sammelt die bei steigender Flanke gelesenen Bits
    struct BitCollector {
        data: bool,
        clock: bool,
        bits: u32,
        count: u32,
    }

    impl ShiftRegisterPins for BitCollector {
        fn set_data(&mut self, high: bool) {
            self.data = high;
        }

        fn set_shift_clock(&mut self, high: bool) {
            if high && !self.clock {
                self.bits = (self.bits << 1) | u32::from(self.data);
                self.count += 1;
            }
            self.clock = high;
        }

        fn set_latch(&mut self, _high: bool) {}
    }

    #[test]
    fn test_shift_out_byte_msb_first() {
        let mut pins = BitCollector {
            data: false,
            clock: false,
            bits: 0,
            count: 0,
        };
        shift_out_byte(&mut pins, 0b1000_0001);
        assert_eq!(pins.count, 8);
        assert_eq!(pins.bits, 0b1000_0001);
        assert!(!pins.clock); // Takt endet LOW

        shift_out_byte(&mut pins, 0b0100_0000);
        assert_eq!(pins.count, 16);
        assert_eq!(pins.bits, 0b1000_0001_0100_0000);
    }
}
