//! Application-Layer: Registry, State-Übergänge, Hover-Erkennung und Controller.

pub mod controller;
pub mod hover;
pub mod registry;
pub mod transition;

pub use controller::{InteractionController, InteractionSample, LongHoverTimer, SampleOutcome};
pub use hover::{detect_hover_state, detect_hover_state_within, HoverState};
pub use registry::{EventHandler, FeatureEvent, InteractiveRegistry};
pub use transition::{transition_event_state, Transition};
