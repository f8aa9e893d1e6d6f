pub mod autopilot;
pub mod fast_forward;
pub mod scheduler;

pub use autopilot::Autopilot;
pub use fast_forward::{play_for, play_round, RoundEnd};
pub use scheduler::{drive, RoundObserver};
