//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

/// Trait für die drei Steuerleitungen einer 74HC595-Kette
///
/// Abstrahiert SER (Daten), SRCLK (Schiebetakt) und RCLK (Latch).
/// Die Bank braucht exklusiven Zugriff auf alle drei Leitungen.
///
/// Pin-Writes sind unfehlbar: das 3-Draht-Protokoll hat keine
/// Bestätigung, es gibt also nichts, was zurückgemeldet werden könnte.
///
/// # Implementierungen
/// - **Production:** EspShiftPins (ESP32 GPIO Outputs)
/// - **Testing:** MockShiftPins (zeichnet jede Flanke auf)
pub trait ShiftRegisterPins: Send {
    /// Setzt die serielle Datenleitung (SER/DS)
    fn set_data(&mut self, high: bool);

    /// Setzt den Schiebetakt (SRCLK/SHCP), übernommen wird bei steigender Flanke
    fn set_shift_clock(&mut self, high: bool);

    /// Setzt den Latch-Takt (RCLK/STCP), steigende Flanke schaltet die Ausgänge
    fn set_latch(&mut self, high: bool);
}
