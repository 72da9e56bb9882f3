//! Rendering-Handle: Bindung einer Collection an Source und Layer im Renderer.

use serde::{Deserialize, Serialize};

/// Identifiziert eine Collection im Renderer über Source-ID und Layer-IDs.
///
/// Zwei Handles sind äquivalent (`==`), wenn die Source-ID übereinstimmt und die
/// Layer-IDs elementweise gleich sind. Ein nach einem Style-Wechsel neu gebautes
/// Handle ist damit gleich dem alten und behält seine Registrierungen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderingHandle {
    /// ID der Datenquelle im Renderer
    pub source_id: String,
    /// Alle Layer, die aus dieser Quelle zeichnen
    pub layer_ids: Vec<String>,
}

impl RenderingHandle {
    /// Erstellt ein neues Handle.
    pub fn new<I, S>(source_id: impl Into<String>, layer_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_id: source_id.into(),
            layer_ids: layer_ids.into_iter().map(Into::into).collect(),
        }
    }
}
