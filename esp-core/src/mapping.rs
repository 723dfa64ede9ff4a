//! Statische Relais- und Lift-Tabellen
//!
//! Reine Konfigurationsdaten: welche Relais-Nummer auf welcher physischen
//! Ausgangsleitung liegt und welche drei Relais zu einem Lift gehören.
//! Die Bank selbst kennt nur Leitungsnummern.

use crate::types::{InvalidLineError, LineIndex};

/// Fehler beim Prüfen der Tabellen (beim Booten)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Lift-Tabelle verweist auf ein Relais, das die Output-Map nicht kennt
    #[error("relay {relay} not in output map ({relay_count} relays)")]
    RelayOutOfRange { relay: u8, relay_count: usize },

    /// Zwei Relais zeigen auf dieselbe physische Leitung
    #[error("output line {line} mapped twice")]
    DuplicateLine { line: LineIndex },

    /// Ein Relais ist mehreren Lift-Funktionen zugeordnet
    #[error("relay {relay} used by more than one lift function")]
    DuplicateRelay { relay: u8 },

    /// Output-Map zeigt auf eine Leitung außerhalb der Kette
    #[error(transparent)]
    Line(#[from] InvalidLineError),
}

/// Zuordnung Relais-Nummer → physische Ausgangsleitung
///
/// Eintrag `i` ist die Leitung für Relais `i`. Damit lässt sich die
/// Reihenfolge der Ausgänge ändern oder nur ein Teil davon nutzen,
/// ohne die Lift-Tabelle anzufassen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMap {
    lines: &'static [LineIndex],
}

impl OutputMap {
    pub const fn new(lines: &'static [LineIndex]) -> Self {
        Self { lines }
    }

    /// Anzahl der Relais in der Map
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Physische Leitung für `relay`, `None` wenn nicht gemappt
    pub fn physical(&self, relay: u8) -> Option<LineIndex> {
        self.lines.get(usize::from(relay)).copied()
    }

    /// Prüft alle Einträge gegen eine Kette mit `line_count` Leitungen
    pub fn validate(&self, line_count: LineIndex) -> Result<(), MappingError> {
        for (i, &line) in self.lines.iter().enumerate() {
            if line >= line_count {
                return Err(InvalidLineError {
                    requested: line,
                    valid: 0..line_count,
                }
                .into());
            }
            if self.lines[..i].contains(&line) {
                return Err(MappingError::DuplicateLine { line });
            }
        }
        Ok(())
    }
}

/// Funktion eines Lift-Relais
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LiftRelay {
    Up,
    Down,
    Lock,
}

impl LiftRelay {
    pub const ALL: [LiftRelay; 3] = [LiftRelay::Up, LiftRelay::Down, LiftRelay::Lock];
}

/// Die drei Relais-Nummern eines Lifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LiftRelays {
    pub up: u8,
    pub down: u8,
    pub lock: u8,
}

impl LiftRelays {
    pub const fn new(up: u8, down: u8, lock: u8) -> Self {
        Self { up, down, lock }
    }

    pub const fn relay(&self, kind: LiftRelay) -> u8 {
        match kind {
            LiftRelay::Up => self.up,
            LiftRelay::Down => self.down,
            LiftRelay::Lock => self.lock,
        }
    }
}

/// Lift-Tabelle eines Controllers
///
/// Lifts werden global durchnummeriert. Ein Controller, der Lift 6-10
/// bedient, hat `lift_begin = 5` und fünf Einträge in `lifts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftTable {
    /// Eindeutige Controller-Kennung (z.B. "con1")
    pub controller_id: &'static str,
    /// Globale Nummer des ersten Lifts dieses Controllers
    pub lift_begin: u8,
    /// Relais pro Lift, Index = globale Nummer - `lift_begin`
    pub lifts: &'static [LiftRelays],
}

impl LiftTable {
    /// Relais für den globalen Lift `lift`
    ///
    /// `None` wenn der Lift zu einem anderen Controller gehört.
    pub fn local(&self, lift: u8) -> Option<&LiftRelays> {
        let index = lift.checked_sub(self.lift_begin)?;
        self.lifts.get(usize::from(index))
    }

    /// Globale Lift-Nummer für Eintrag `index` der Tabelle
    ///
    /// `None` wenn der Eintrag fehlt oder die Nummer über 255 läge.
    pub fn lift_number(&self, index: usize) -> Option<u8> {
        if index >= self.lifts.len() {
            return None;
        }
        u8::try_from(index)
            .ok()
            .and_then(|index| self.lift_begin.checked_add(index))
    }

    /// Physische Leitung für eine Funktion eines globalen Lifts
    pub fn line_for(&self, map: &OutputMap, lift: u8, kind: LiftRelay) -> Option<LineIndex> {
        self.local(lift).and_then(|relays| map.physical(relays.relay(kind)))
    }

    /// Prüft, dass jedes Relais gemappt ist und nur einmal vorkommt
    pub fn validate(&self, map: &OutputMap) -> Result<(), MappingError> {
        for (i, relays) in self.lifts.iter().enumerate() {
            for kind in LiftRelay::ALL {
                let relay = relays.relay(kind);
                if map.physical(relay).is_none() {
                    return Err(MappingError::RelayOutOfRange {
                        relay,
                        relay_count: map.len(),
                    });
                }
                if self.uses_relay_before(i, kind, relay) {
                    return Err(MappingError::DuplicateRelay { relay });
                }
            }
        }
        Ok(())
    }

    /// Kommt `relay` schon in einem früheren Lift oder einer früheren
    /// Funktion desselben Lifts vor?
    fn uses_relay_before(&self, lift_index: usize, kind: LiftRelay, relay: u8) -> bool {
        let earlier_lifts = self.lifts[..lift_index]
            .iter()
            .any(|r| LiftRelay::ALL.iter().any(|&k| r.relay(k) == relay));
        let current = &self.lifts[lift_index];
        let earlier_kinds = LiftRelay::ALL
            .iter()
            .take_while(|&&k| k != kind)
            .any(|&k| current.relay(k) == relay);
        earlier_lifts || earlier_kinds
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for MappingError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MappingError::RelayOutOfRange { relay, relay_count } => defmt::write!(
                fmt,
                "RelayOutOfRange {{ relay: {}, relay_count: {} }}",
                relay,
                relay_count
            ),
            MappingError::DuplicateLine { line } => {
                defmt::write!(fmt, "DuplicateLine {{ line: {} }}", line)
            }
            MappingError::DuplicateRelay { relay } => {
                defmt::write!(fmt, "DuplicateRelay {{ relay: {} }}", relay)
            }
            MappingError::Line(e) => defmt::write!(fmt, "{}", e),
        }
    }
}
