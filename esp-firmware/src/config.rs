// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use esp_core::{LiftRelays, LiftTable, LineIndex, OutputMap};

// ============================================================================
// Schieberegister Konfiguration
// ============================================================================

/// GPIO-Pin für 74HC595 SER/DS (serielle Daten)
pub const SER_GPIO_PIN: u8 = 2;

/// GPIO-Pin für 74HC595 SRCLK/SHCP (Schiebetakt)
pub const SHCP_GPIO_PIN: u8 = 3;

/// GPIO-Pin für 74HC595 RCLK/STCP (Latch)
pub const STCP_GPIO_PIN: u8 = 4;

/// GPIO-Pin für 74HC595 /OE (Output Enable, active low)
pub const OE_GPIO_PIN: u8 = 5;

/// Anzahl der verketteten 74HC595
pub const CHIP_COUNT: usize = 2;

/// Anzahl der Relais-Leitungen (8 pro Chip)
pub const LINE_COUNT: LineIndex = (8 * CHIP_COUNT) as LineIndex;

/// Refresh-Intervall in Sekunden
/// Sendet den Zustand erneut, falls die Register durch Brown-out
/// ihren Inhalt verloren haben
pub const REFRESH_INTERVAL_SECS: u64 = 5;

// ============================================================================
// Button Konfiguration
// ============================================================================

/// GPIO-Pin für den Boot-Button (Not-Aus)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Entprell-Zeit nach einem Tastendruck in Millisekunden
pub const BUTTON_DEBOUNCE_MS: u64 = 200;

// ============================================================================
// Controller / Lift Konfiguration
// ============================================================================

/// Controller ID (muss eindeutig sein)
/// Wird zur Build-Zeit aus der Environment Variable CONTROLLER_ID geladen
/// Setze diese in .env file, Default ist "con1"
pub const CONTROLLER_ID: &str = match option_env!("CONTROLLER_ID") {
    Some(id) => id,
    None => "con1",
};

/// Globale Nummer des ersten Lifts
/// Lifts starten bei 0, bedient der Controller Lift 6-10 muss hier 5 stehen
pub const LIFT_BEGIN: u8 = 0;

/// Relais-Nummer → physische Leitung
/// Kann auch genutzt werden um die Reihenfolge der Ausgänge zu ändern
pub const OUTPUTS: [LineIndex; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Relais pro Lift (hoch, runter, Sperre)
pub const LIFTS: [LiftRelays; 5] = [
    LiftRelays::new(15, 14, 13),
    LiftRelays::new(12, 11, 10),
    LiftRelays::new(9, 8, 0),
    LiftRelays::new(1, 2, 3),
    LiftRelays::new(4, 5, 6),
];

/// Output-Map aus `OUTPUTS`
pub const OUTPUT_MAP: OutputMap = OutputMap::new(&OUTPUTS);

/// Lift-Tabelle dieses Controllers
pub const LIFT_TABLE: LiftTable = LiftTable {
    controller_id: CONTROLLER_ID,
    lift_begin: LIFT_BEGIN,
    lifts: &LIFTS,
};
