//! Geteilte Konfiguration für `core` und `app`.

pub mod options;

pub use options::InteractionOptions;
pub use options::{HOVER_MOTION_TOLERANCE_PX, LONG_HOVER_DELAY_MS};
