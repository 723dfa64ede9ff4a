// Button Task - Boot-Button als lokaler Not-Aus
use defmt::{info, warn};
use embassy_time::{Duration, Timer};
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::peripherals::GPIO9;

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_GPIO_PIN};
use crate::{RelayCommand, RelayCommandSender};

/// Button Task
///
/// Wartet auf die fallende Flanke des Boot-Buttons (GPIO9, Pull-up)
/// und schickt `RelayCommand::AllOff` an den Relais-Task.
#[embassy_executor::task]
pub async fn button_task(button: GPIO9<'static>, command_sender: RelayCommandSender) {
    let mut button = Input::new(button, InputConfig::default().with_pull(Pull::Up));
    info!("Button: emergency stop on GPIO{}", BUTTON_GPIO_PIN);

    loop {
        button.wait_for_falling_edge().await;
        warn!("Button: emergency stop, switching all relays off");
        command_sender.send(RelayCommand::AllOff).await;

        // Prellen ignorieren
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
    }
}
