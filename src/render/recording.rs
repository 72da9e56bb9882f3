//! Aufzeichnender Renderer für Tests, Benchmarks und den Replay-Modus.

use super::RenderTarget;
use crate::core::Feature;
use indexmap::IndexMap;

/// Ein aufgezeichneter Renderer-Aufruf.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// `set_layer_visibility`
    LayerVisibility {
        /// Layer-ID
        layer_id: String,
        /// Neuer Wert
        visible: bool,
    },
    /// `set_source_data`
    SourceData {
        /// Source-ID
        source_id: String,
        /// Gepushter Snapshot
        features: Vec<Feature>,
    },
}

/// Renderer-Attrappe, die jeden Aufruf mitschreibt.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    calls: Vec<RenderCall>,
    visibility: IndexMap<String, bool>,
    sources: IndexMap<String, Vec<Feature>>,
}

impl RecordingTarget {
    /// Erstellt einen leeren Recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle Aufrufe in Reihenfolge.
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Source-IDs aller Daten-Pushes in Reihenfolge (ein Eintrag pro Flush).
    pub fn flushed_sources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::SourceData { source_id, .. } => Some(source_id.as_str()),
                RenderCall::LayerVisibility { .. } => None,
            })
            .collect()
    }

    /// Anzahl der Daten-Pushes.
    pub fn flush_count(&self) -> usize {
        self.flushed_sources().len()
    }

    /// Zuletzt gepushte Daten einer Source.
    pub fn source_data(&self, source_id: &str) -> Option<&[Feature]> {
        self.sources.get(source_id).map(Vec::as_slice)
    }

    /// Vergisst alle bisher aufgezeichneten Aufrufe, behält aber den Renderer-Zustand.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn set_layer_visibility(&mut self, layer_id: &str, visible: bool) {
        self.visibility.insert(layer_id.to_owned(), visible);
        self.calls.push(RenderCall::LayerVisibility {
            layer_id: layer_id.to_owned(),
            visible,
        });
    }

    fn set_source_data(&mut self, source_id: &str, features: &[Feature]) {
        log::debug!(
            "Source '{}' aktualisiert ({} Features)",
            source_id,
            features.len()
        );
        self.sources.insert(source_id.to_owned(), features.to_vec());
        self.calls.push(RenderCall::SourceData {
            source_id: source_id.to_owned(),
            features: features.to_vec(),
        });
    }

    fn layer_visibility(&self, layer_id: &str) -> Option<bool> {
        self.visibility.get(layer_id).copied()
    }
}
