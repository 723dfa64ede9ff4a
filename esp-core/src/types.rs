//! Core Types für die Relais-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::ops::Range;

/// Index einer physischen Ausgangsleitung der Schieberegister-Kette
///
/// Gültig ist `0..8 * chip_count`. Leitung 0 ist Q0 des ersten Chips
/// (direkt am Controller), die höchste Leitung Q7 des letzten Chips.
pub type LineIndex = u8;

/// Bitmaske aller Ausgangsleitungen
///
/// Bit `i` ist gesetzt genau dann, wenn Leitung `i` HIGH getrieben wird.
/// Breite ist `8 * chip_count` Bits, darüber liegende Bits sind immer 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputState(u32);

impl OutputState {
    /// Alle Leitungen aus
    pub const ALL_OFF: Self = Self(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Liefert `true` wenn Leitung `line` eingeschaltet ist
    ///
    /// Leitungen außerhalb der 32 Bit sind immer aus.
    pub const fn is_on(self, line: LineIndex) -> bool {
        line < 32 && self.0 & (1 << line) != 0
    }
}

impl From<OutputState> for u32 {
    fn from(state: OutputState) -> Self {
        state.0
    }
}

/// Fehler: angefragte Leitung liegt außerhalb der konfigurierten Kette
///
/// Lokal und behebbar. Es wurde weder der Zustand verändert noch
/// etwas auf den Bus geschrieben.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {requested} outside valid range {valid:?}")]
pub struct InvalidLineError {
    /// Angefragte Leitung
    pub requested: LineIndex,
    /// Gültiger Bereich `0..8 * chip_count`
    pub valid: Range<LineIndex>,
}

/// Relais-Kommando für den Relais-Task
///
/// Wird vom Button-Task (und später vom Netzwerk-Layer) gesendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelayCommand {
    /// Schalte eine einzelne Leitung
    SetLine { line: LineIndex, on: bool },
    /// Schalte alle Leitungen aus (Not-Aus)
    AllOff,
    /// Sende den gecachten Zustand erneut (z.B. nach Brown-out)
    Refresh,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for OutputState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "OutputState({=u32:#x})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InvalidLineError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "InvalidLineError {{ requested: {}, valid: {}..{} }}",
            self.requested,
            self.valid.start,
            self.valid.end
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RelayCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RelayCommand::SetLine { line, on } => {
                defmt::write!(fmt, "SetLine {{ line: {}, on: {} }}", line, on)
            }
            RelayCommand::AllOff => defmt::write!(fmt, "AllOff"),
            RelayCommand::Refresh => defmt::write!(fmt, "Refresh"),
        }
    }
}
