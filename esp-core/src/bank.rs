//! Schieberegister-Bank
//!
//! Hält den Zustand aller Ausgangsleitungen einer Kette von
//! 74HC595-Schieberegistern und schreibt ihn atomar auf die Hardware.

use core::ops::Range;

use crate::logic::{apply_line, chip_bytes, shift_out_byte};
use crate::traits::ShiftRegisterPins;
use crate::types::{InvalidLineError, LineIndex, OutputState, RelayCommand};

/// Kette aus `CHIPS` daisy-chained 8-Bit-Schieberegistern
///
/// Die Bank besitzt den einzigen Cache der Ausgangsmaske. Jede Änderung
/// wird sofort als kompletter Latch-Zyklus auf den Bus geschrieben:
///
/// 1. RCLK auf LOW (alte Ausgänge bleiben sichtbar)
/// 2. `CHIPS` Bytes, Chip am Ende der Kette zuerst, jeweils MSB-first
/// 3. RCLK auf HIGH (alle Ausgänge schalten gleichzeitig um)
///
/// Alle Methoden nehmen `&mut self`, ein Latch-Zyklus kann also nicht
/// von einem anderen Aufrufer unterbrochen werden.
///
/// `CHIPS` muss zwischen 1 und 4 liegen (Maske ist ein `u32`), sonst
/// schlägt die Kompilierung von `new()` fehl.
///
/// # Beispiele
///
/// ```
/// # use esp_core::{ShiftRegisterBank, ShiftRegisterPins};
/// # struct NoPins;
/// # impl ShiftRegisterPins for NoPins {
/// #     fn set_data(&mut self, _: bool) {}
/// #     fn set_shift_clock(&mut self, _: bool) {}
/// #     fn set_latch(&mut self, _: bool) {}
/// # }
/// let mut bank: ShiftRegisterBank<_, 2> = ShiftRegisterBank::new(NoPins);
/// bank.set_line(3, true).unwrap();
/// bank.set_line(10, true).unwrap();
/// assert_eq!(bank.state().bits(), 0x408);
/// assert!(bank.set_line(16, true).is_err());
/// ```
pub struct ShiftRegisterBank<P, const CHIPS: usize> {
    pins: P,
    state: OutputState,
}

impl<P: ShiftRegisterPins, const CHIPS: usize> ShiftRegisterBank<P, CHIPS> {
    const CHIPS_SUPPORTED: () = assert!(
        CHIPS >= 1 && CHIPS <= 4,
        "ShiftRegisterBank supports 1 to 4 chained chips"
    );

    /// Anzahl der Ausgangsleitungen (`8 * CHIPS`)
    pub const LINE_COUNT: LineIndex = (8 * CHIPS) as LineIndex;

    /// Erstellt eine neue Bank, alle Leitungen aus
    ///
    /// Schreibt NICHT auf den Bus. Nach einem Kaltstart enthält die Kette
    /// zufällige Werte, daher vor dem Freigeben von /OE `refresh()` aufrufen.
    pub fn new(pins: P) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHIPS_SUPPORTED;
        Self {
            pins,
            state: OutputState::ALL_OFF,
        }
    }

    /// Anzahl der Ausgangsleitungen dieser Kette
    pub const fn line_count(&self) -> LineIndex {
        Self::LINE_COUNT
    }

    /// Gültiger Leitungsbereich `0..8 * CHIPS`
    pub fn valid_lines(&self) -> Range<LineIndex> {
        0..Self::LINE_COUNT
    }

    /// Gecachte Ausgangsmaske (kein Hardware-Zugriff)
    pub fn state(&self) -> OutputState {
        self.state
    }

    /// Zugriff auf die Pins, z.B. für Assertions in Tests
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Schaltet eine einzelne Leitung und schreibt die Kette neu
    ///
    /// # Fehlerbehandlung
    /// Gibt `InvalidLineError` zurück wenn `line >= 8 * CHIPS`. In dem
    /// Fall bleiben Zustand und Bus unverändert.
    pub fn set_line(
        &mut self,
        line: LineIndex,
        on: bool,
    ) -> Result<OutputState, InvalidLineError> {
        if line >= Self::LINE_COUNT {
            return Err(self.invalid_line(line));
        }

        self.state = apply_line(self.state, line, on);
        self.flush();
        Ok(self.state)
    }

    /// Schreibt eine komplette Maske in einem Latch-Zyklus
    ///
    /// # Fehlerbehandlung
    /// Sind Bits ab `8 * CHIPS` gesetzt, wird das höchste davon als
    /// `InvalidLineError` gemeldet. Zustand und Bus bleiben unverändert.
    pub fn set_state(&mut self, state: OutputState) -> Result<OutputState, InvalidLineError> {
        let stray = state.bits() & !Self::width_mask();
        if stray != 0 {
            let highest = (31 - stray.leading_zeros()) as LineIndex;
            return Err(self.invalid_line(highest));
        }

        self.state = state;
        self.flush();
        Ok(self.state)
    }

    /// Schaltet alle Leitungen in einem Latch-Zyklus aus
    pub fn clear(&mut self) {
        self.state = OutputState::ALL_OFF;
        self.flush();
    }

    /// Sendet den gecachten Zustand erneut, ohne ihn zu verändern
    ///
    /// Für Brown-out oder Reset der Register: die Chips verlieren ihren
    /// Inhalt, der Controller nicht.
    pub fn refresh(&mut self) {
        self.flush();
    }

    /// Wendet ein `RelayCommand` an
    ///
    /// Jedes erfolgreiche Kommando schreibt genau einen Latch-Zyklus.
    ///
    /// # Fehlerbehandlung
    /// Nur `SetLine` kann mit `InvalidLineError` fehlschlagen, dann
    /// bleiben Zustand und Bus unverändert.
    pub fn apply(&mut self, cmd: RelayCommand) -> Result<OutputState, InvalidLineError> {
        match cmd {
            RelayCommand::SetLine { line, on } => self.set_line(line, on),
            RelayCommand::AllOff => {
                self.clear();
                Ok(self.state)
            }
            RelayCommand::Refresh => {
                self.refresh();
                Ok(self.state)
            }
        }
    }

    fn flush(&mut self) {
        self.pins.set_latch(false);
        for byte in chip_bytes::<CHIPS>(self.state) {
            shift_out_byte(&mut self.pins, byte);
        }
        self.pins.set_latch(true);
    }

    fn invalid_line(&self, requested: LineIndex) -> InvalidLineError {
        InvalidLineError {
            requested,
            valid: self.valid_lines(),
        }
    }

    fn width_mask() -> u32 {
        u32::MAX.checked_shr(32 - 8 * CHIPS as u32).unwrap_or(0)
    }
}
