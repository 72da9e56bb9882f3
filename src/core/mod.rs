//! Core-Domänentypen: Features, Interaktionsarten, Handles und Collections.

pub mod collection;
pub mod collection_set;
/// Feature-Datenmodell
///
/// - Feature: ID, Geometrie, Properties inkl. `eventState`
/// - FeatureRef: Index- oder ID-Referenz innerhalb einer Collection
/// - PickedFeature: Hit-Test-Ergebnis des Renderers
pub mod feature;
pub mod handle;
pub mod interaction;

pub use collection::{FeatureCollection, MutableFeatureStore};
pub use collection_set::{CollectionSet, DisplayCollection, StyleBackedCollection};
pub use feature::{Feature, FeatureId, FeatureProperties, FeatureRef, PickedFeature};
pub use handle::RenderingHandle;
pub use interaction::{EventPriority, EventStateMode, InteractionType};
