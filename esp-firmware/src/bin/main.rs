// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_lift_steuerung::config::{LIFT_TABLE, LINE_COUNT, OUTPUT_MAP};
use esp_lift_steuerung::tasks::{button_task, relay_task};
use esp_lift_steuerung::{LiftRelay, RelayCommandChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, prüft die Relais-Tabellen, startet Embassy
/// Runtime und spawnt Tasks. Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("Controller '{}' starting", LIFT_TABLE.controller_id);

    // Relais-Tabellen prüfen bevor irgendein Relais geschaltet wird
    // Eine falsche Verdrahtungstabelle würde die falschen Lifts bewegen
    if let Err(e) = OUTPUT_MAP
        .validate(LINE_COUNT)
        .and_then(|()| LIFT_TABLE.validate(&OUTPUT_MAP))
    {
        error!("Config: invalid relay mapping: {}", e);
        panic!("invalid relay mapping");
    }
    log_lift_table();

    // Relais Command-Channel erstellen (Button → Relais Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<RelayCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(RelayCommandChannel::new());
    let command_sender = command_channel.sender();
    let command_receiver = command_channel.receiver();

    // Spawn Relais Task (einziger Besitzer der Schieberegister-Bank)
    spawner
        .spawn(relay_task(
            peripherals.GPIO2,
            peripherals.GPIO3,
            peripherals.GPIO4,
            peripherals.GPIO5,
            command_receiver,
        ))
        .unwrap();

    // Spawn Button Task (Not-Aus)
    spawner
        .spawn(button_task(peripherals.GPIO9, command_sender))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Loggt die physischen Leitungen aller Lifts dieses Controllers
fn log_lift_table() {
    for index in 0..LIFT_TABLE.lifts.len() {
        let Some(lift) = LIFT_TABLE.lift_number(index) else {
            warn!("Lift table: entry {} beyond lift number 255", index);
            continue;
        };
        let line = |kind| LIFT_TABLE.line_for(&OUTPUT_MAP, lift, kind);
        info!(
            "Lift {}: up={} down={} lock={}",
            lift,
            line(LiftRelay::Up),
            line(LiftRelay::Down),
            line(LiftRelay::Lock)
        );
    }
}
