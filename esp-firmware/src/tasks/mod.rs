// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (Button → Relais).

pub mod button;
pub mod relay;

// Re-export Tasks für einfachen Import
pub use button::button_task;
pub use relay::relay_task;
