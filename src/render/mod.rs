//! Schnittstelle zum externen Karten-Renderer.
//!
//! Der Renderer selbst (Layer-Painting, Hit-Testing, GPU) liegt ausserhalb
//! dieser Library. Die Engine braucht nur drei Operationen: Layer-Sichtbarkeit
//! setzen, Source-Daten pushen und die Sichtbarkeit zurücklesen.

mod recording;

pub use recording::{RecordingTarget, RenderCall};

use crate::core::Feature;
use std::cell::RefCell;
use std::rc::Rc;

/// Vom Renderer bereitgestellte Operationen.
pub trait RenderTarget {
    /// Setzt das Layout-Property `visibility` eines Layers.
    fn set_layer_visibility(&mut self, layer_id: &str, visible: bool);

    /// Ersetzt die Daten einer Source vollständig.
    fn set_source_data(&mut self, source_id: &str, features: &[Feature]);

    /// Liest das Layout-Property `visibility` zurück (`None` = Layer unbekannt).
    fn layer_visibility(&self, layer_id: &str) -> Option<bool>;
}

/// Von allen Collections einer Karteninstanz geteilter Renderer.
///
/// Single-threaded: Mutationen laufen synchron aus der UI-Schleife.
pub type SharedRenderTarget = Rc<RefCell<dyn RenderTarget>>;
