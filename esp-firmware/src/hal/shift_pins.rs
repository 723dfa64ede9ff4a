// Schieberegister-Pins und Output-Enable für die 74HC595-Kette
//
// Kapselt die drei GPIO-Outputs hinter dem ShiftRegisterPins-Trait
// aus esp-core, damit die Bank ohne Hardware testbar bleibt.

use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};

use crate::ShiftRegisterPins;

/// Real Hardware Shift Pins
///
/// SER, SRCLK und RCLK als Push-Pull Outputs. GPIO-Writes auf dem
/// ESP32 können nicht fehlschlagen.
pub struct EspShiftPins<'a> {
    data: Output<'a>,
    shift_clock: Output<'a>,
    latch: Output<'a>,
}

impl<'a> EspShiftPins<'a> {
    /// Erstellt die Pins, alle Leitungen starten auf LOW
    ///
    /// # Parameter
    /// - `data`: GPIO für SER/DS
    /// - `shift_clock`: GPIO für SRCLK/SHCP
    /// - `latch`: GPIO für RCLK/STCP
    pub fn new(
        data: impl OutputPin + 'a,
        shift_clock: impl OutputPin + 'a,
        latch: impl OutputPin + 'a,
    ) -> Self {
        Self {
            data: Output::new(data, Level::Low, OutputConfig::default()),
            shift_clock: Output::new(shift_clock, Level::Low, OutputConfig::default()),
            latch: Output::new(latch, Level::Low, OutputConfig::default()),
        }
    }
}

impl ShiftRegisterPins for EspShiftPins<'_> {
    fn set_data(&mut self, high: bool) {
        self.data.set_level(Level::from(high));
    }

    fn set_shift_clock(&mut self, high: bool) {
        self.shift_clock.set_level(Level::from(high));
    }

    fn set_latch(&mut self, high: bool) {
        self.latch.set_level(Level::from(high));
    }
}

/// /OE der 74HC595-Kette (active low)
///
/// Startet deaktiviert (HIGH): die Relais sehen den zufälligen
/// Power-on-Inhalt der Register nie.
pub struct OutputEnable<'a> {
    pin: Output<'a>,
}

impl<'a> OutputEnable<'a> {
    pub fn new(pin: impl OutputPin + 'a) -> Self {
        Self {
            pin: Output::new(pin, Level::High, OutputConfig::default()),
        }
    }

    /// Schaltet die Register-Ausgänge frei
    pub fn enable(&mut self) {
        self.pin.set_low();
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_set_low()
    }
}
