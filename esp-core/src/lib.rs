//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Schieberegister-Bank, den Pin-Trait und
//! die statischen Relais-/Lift-Tabellen.

#![no_std]

pub mod bank;
pub mod logic;
pub mod mapping;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use bank::ShiftRegisterBank;
pub use logic::{apply_line, chip_bytes, shift_out_byte};
pub use mapping::{LiftRelay, LiftRelays, LiftTable, MappingError, OutputMap};
pub use traits::ShiftRegisterPins;
pub use types::{InvalidLineError, LineIndex, OutputState, RelayCommand};
