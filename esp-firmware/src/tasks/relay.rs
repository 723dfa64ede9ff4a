// Relais Task - Besitzt die Schieberegister-Bank und schaltet die Relais
use defmt::{debug, info, warn};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::peripherals::{GPIO2, GPIO3, GPIO4, GPIO5};

use crate::config::{
    OE_GPIO_PIN, REFRESH_INTERVAL_SECS, SER_GPIO_PIN, SHCP_GPIO_PIN, STCP_GPIO_PIN,
};
use crate::hal::{EspShiftPins, OutputEnable};
use crate::{
    InvalidLineError, OutputState, RelayBank, RelayCommand, RelayCommandReceiver,
    ShiftRegisterPins,
};

/// Relais Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Einziger Besitzer der Bank: alle anderen Tasks schicken Kommandos
/// über den Channel, dadurch läuft jeder Latch-Zyklus am Stück.
///
/// - Wendet eingehende `RelayCommand`s an
/// - Sendet den gecachten Zustand erneut, wenn seit dem letzten
///   Bus-Write `REFRESH_INTERVAL_SECS` vergangen sind (Brown-out der
///   Register, Controller-RAM bleibt erhalten). Abgelehnte Kommandos
///   schreiben nichts und verschieben den Refresh daher nicht.
///
/// # Parameter
/// - `bank`: Schieberegister-Bank (Hardware oder Mock-Pins)
/// - `command_receiver`: Channel Receiver für Relais-Kommandos
pub async fn relay_logic<P: ShiftRegisterPins>(
    mut bank: RelayBank<P>,
    command_receiver: RelayCommandReceiver,
) -> ! {
    let interval = Duration::from_secs(REFRESH_INTERVAL_SECS);
    let mut next_refresh = Instant::now() + interval;

    loop {
        match select(command_receiver.receive(), Timer::at(next_refresh)).await {
            Either::First(cmd) => {
                if apply_command(&mut bank, cmd).is_ok() {
                    next_refresh = Instant::now() + interval;
                }
            }
            Either::Second(()) => {
                bank.refresh();
                next_refresh = Instant::now() + interval;
                debug!("Relais: periodic refresh {}", bank.state());
            }
        }
    }
}

/// Wendet ein einzelnes Kommando auf die Bank an und loggt das Ergebnis
///
/// Ungültige Leitungen werden geloggt und verworfen, die Bank bleibt
/// dabei unverändert. `Ok` heißt: ein Latch-Zyklus wurde geschrieben.
pub fn apply_command<P: ShiftRegisterPins>(
    bank: &mut RelayBank<P>,
    cmd: RelayCommand,
) -> Result<OutputState, InvalidLineError> {
    info!("Relais: command received: {}", cmd);

    let result = bank.apply(cmd);
    match (&result, cmd) {
        (Ok(state), RelayCommand::SetLine { line, on }) => {
            info!("Relais: line {} -> {}, state {}", line, on, state)
        }
        (Ok(_), RelayCommand::AllOff) => warn!("Relais: all lines off"),
        (Ok(state), RelayCommand::Refresh) => info!("Relais: refreshed {}", state),
        (Err(e), _) => warn!("Relais: rejected command: {}", e),
    }
    result
}

/// Relais Task - Embassy Task für parallele Ausführung
///
/// Initialisiert die Pins, schreibt den Aus-Zustand in die Kette und
/// gibt erst danach /OE frei. Danach läuft `relay_logic()`.
///
/// # Parameter
/// - `data`, `shift_clock`, `latch`: GPIOs der 74HC595-Kette
/// - `output_enable`: GPIO für /OE (active low)
/// - `command_receiver`: Channel Receiver für Relais-Kommandos
#[embassy_executor::task]
pub async fn relay_task(
    data: GPIO2<'static>,
    shift_clock: GPIO3<'static>,
    latch: GPIO4<'static>,
    output_enable: GPIO5<'static>,
    command_receiver: RelayCommandReceiver,
) {
    info!(
        "Relais: SER=GPIO{} SHCP=GPIO{} STCP=GPIO{} OE=GPIO{}",
        SER_GPIO_PIN, SHCP_GPIO_PIN, STCP_GPIO_PIN, OE_GPIO_PIN
    );

    // /OE startet HIGH: Ausgänge hochohmig bis die Kette definiert ist
    let mut output_enable = OutputEnable::new(output_enable);
    let mut bank = RelayBank::new(EspShiftPins::new(data, shift_clock, latch));

    bank.refresh();
    output_enable.enable();
    info!(
        "Relais: {} lines ready, outputs enabled: {}",
        bank.line_count(),
        output_enable.is_enabled()
    );

    relay_logic(bank, command_receiver).await
}
