//! Map Event-State Library.
//! Synchronisiert Interaktions-States (Hover, Long-Hover, Klick, Kontextmenü)
//! zwischen Pointer-Events und den an einen Karten-Renderer gebundenen Feature-Collections.

pub mod app;
pub mod core;
pub mod render;
pub mod replay;
pub mod shared;

pub use app::{
    detect_hover_state, transition_event_state, EventHandler, FeatureEvent, HoverState,
    InteractionController, InteractionSample, InteractiveRegistry, LongHoverTimer, SampleOutcome,
    Transition,
};
pub use core::{
    CollectionSet, DisplayCollection, EventPriority, EventStateMode, Feature, FeatureCollection,
    FeatureId, FeatureRef, InteractionType, MutableFeatureStore, PickedFeature, RenderingHandle,
    StyleBackedCollection,
};
pub use render::{RecordingTarget, RenderTarget, SharedRenderTarget};
pub use shared::InteractionOptions;
