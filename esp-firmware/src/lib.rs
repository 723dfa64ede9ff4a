// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von esp-core
pub use esp_core::{
    InvalidLineError, LiftRelay, LiftTable, LineIndex, OutputMap, OutputState, RelayCommand,
    ShiftRegisterBank, ShiftRegisterPins,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::CHIP_COUNT;

/// Schieberegister-Bank mit der konfigurierten Kettenlänge
pub type RelayBank<P> = ShiftRegisterBank<P, CHIP_COUNT>;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================

/// Channel für Relais-Kommandos (Button/Netzwerk → Relais Task)
/// - 4: Nachrichten-Kapazität im Queue
pub type RelayCommandChannel = Channel<NoopRawMutex, RelayCommand, 4>;

/// Sender für Relais-Kommandos
/// Erzeugt aus RelayCommandChannel
pub type RelayCommandSender = Sender<'static, NoopRawMutex, RelayCommand, 4>;

/// Receiver für Relais-Kommandos (Relais Task empfängt)
/// Empfängt Commands von RelayCommandSender
pub type RelayCommandReceiver = Receiver<'static, NoopRawMutex, RelayCommand, 4>;
