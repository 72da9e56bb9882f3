//! FeatureCollection: Besitz, Event-State-Mutation und Flush einer angezeigten Collection.
//!
//! Der Snapshot wird nur von dieser Struktur verändert (Single-Writer, in-place)
//! und erst beim Flush an den Renderer veröffentlicht. Ein ID→Index-Map wird bei
//! jedem `show` neu aufgebaut, da Mutatoren nur `eventState` ändern.

use super::interaction::may_override;
use super::{EventStateMode, Feature, FeatureRef, InteractionType, RenderingHandle};
use crate::render::SharedRenderTarget;
use std::collections::HashMap;
use std::fmt;

/// Fähigkeit "Event-State veränderbar".
///
/// Nur eigene, editierbare Collections implementieren diesen Trait;
/// style-basierte Quellen sind read-only.
pub trait MutableFeatureStore {
    /// Handle, an das die Collection gebunden ist.
    fn handle(&self) -> &RenderingHandle;

    /// Aktueller Snapshot.
    fn features(&self) -> &[Feature];

    /// Löst eine Referenz in einen Index auf.
    fn resolve(&self, feature_ref: &FeatureRef) -> Option<usize>;

    /// Setzt `state` am referenzierten Feature, siehe [`FeatureCollection::put_event_state`].
    fn put_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        state: InteractionType,
        mode: EventStateMode,
        show: bool,
    ) -> Option<usize>;

    /// Entfernt den State des referenzierten Features,
    /// siehe [`FeatureCollection::clean_event_state`].
    fn clean_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        cause: InteractionType,
        show: bool,
    ) -> bool;

    /// Entfernt States collection-weit, siehe [`FeatureCollection::clean_event_states`].
    fn clean_event_states(&mut self, states: Option<&[InteractionType]>, show: bool) -> bool;

    /// Pusht den aktuellen Snapshot an den Renderer.
    fn flush(&mut self);
}

/// Eigene, veränderbare Feature-Collection, gebunden an genau ein Handle.
pub struct FeatureCollection {
    handle: RenderingHandle,
    features: Vec<Feature>,
    /// Kanonische ID → erster Index mit dieser ID
    id_index: HashMap<String, usize>,
    target: Option<SharedRenderTarget>,
}

impl fmt::Debug for FeatureCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureCollection")
            .field("handle", &self.handle)
            .field("features", &self.features.len())
            .field("bound", &self.target.is_some())
            .finish()
    }
}

impl FeatureCollection {
    /// Erstellt eine leere, noch nicht an einen Renderer gebundene Collection.
    pub fn new(handle: RenderingHandle) -> Self {
        Self {
            handle,
            features: Vec::new(),
            id_index: HashMap::new(),
            target: None,
        }
    }

    /// Erstellt eine leere Collection, die direkt an den Renderer gebunden ist.
    pub fn bound(handle: RenderingHandle, target: SharedRenderTarget) -> Self {
        let mut collection = Self::new(handle);
        collection.target = Some(target);
        collection
    }

    /// Bindet die Collection an einen Renderer.
    pub fn set_target(&mut self, target: SharedRenderTarget) {
        self.target = Some(target);
    }

    /// Gibt das gebundene Handle zurück.
    pub fn handle(&self) -> &RenderingHandle {
        &self.handle
    }

    /// Source-ID des gebundenen Handles.
    pub fn source_id(&self) -> &str {
        &self.handle.source_id
    }

    /// Aktueller Snapshot (read-only).
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Gibt die Anzahl der Features zurück.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Gibt zurück ob die Collection leer ist.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Ersetzt den Snapshot vollständig und flusht.
    ///
    /// Alle Layer des Handles werden genau dann sichtbar, wenn die Collection nicht leer ist.
    pub fn show(&mut self, features: Vec<Feature>) {
        self.features = features;
        self.rebuild_id_index();
        self.flush();
    }

    /// Entspricht `show(vec![])`.
    pub fn clear(&mut self) {
        self.show(Vec::new());
    }

    /// Ersetzt das Handle (z.B. nach einem Style-Wechsel im Renderer) und veröffentlicht
    /// den aktuellen Snapshot erneut, da der Renderer seine Quellen neu aufgebaut hat.
    pub fn rebind(&mut self, handle: RenderingHandle) {
        log::debug!(
            "Collection '{}' neu gebunden ({} Layer)",
            handle.source_id,
            handle.layer_ids.len()
        );
        self.handle = handle;
        self.flush();
    }

    /// Liest aus dem Renderer, ob mindestens ein Layer der Collection sichtbar ist.
    pub fn is_visible(&self) -> bool {
        let target = self.expect_target().borrow();
        self.handle
            .layer_ids
            .iter()
            .any(|layer_id| target.layer_visibility(layer_id) == Some(true))
    }

    /// Löst eine Referenz auf. Index ausserhalb des Bereichs oder unbekannte ID → `None`.
    pub fn resolve(&self, feature_ref: &FeatureRef) -> Option<usize> {
        match feature_ref {
            FeatureRef::Index(index) => (*index < self.features.len()).then_some(*index),
            FeatureRef::Id(id) => self.id_index.get(id.canonical().as_ref()).copied(),
        }
    }

    /// Index des ersten Features, das `state` hält.
    pub fn holder_of(&self, state: InteractionType) -> Option<usize> {
        self.features
            .iter()
            .position(|f| f.event_state() == Some(state))
    }

    /// Setzt `state` am referenzierten Feature.
    ///
    /// - `Put`: entfernt `state` vorher von allen anderen Features (exklusiv).
    /// - `Add`: lässt andere Features unberührt.
    ///
    /// Hält das Ziel einen High-State und ist `state` Low, wird das Ziel nicht
    /// verändert und `None` zurückgegeben. Flusht einmal, wenn sich etwas geändert
    /// hat und `show` gesetzt ist. Ein blockiertes oder wiederholtes `put` ohne
    /// Änderung flusht auch bei `show = true` nicht.
    pub fn put_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        state: InteractionType,
        mode: EventStateMode,
        show: bool,
    ) -> Option<usize> {
        let Some(index) = self.resolve(feature_ref) else {
            log::trace!(
                "put_event_state({state}) auf '{}': {:?} nicht gefunden",
                self.handle.source_id,
                feature_ref
            );
            return None;
        };

        let mut changed = false;
        if mode == EventStateMode::Put {
            for (i, feature) in self.features.iter_mut().enumerate() {
                if i != index && feature.properties.event_state == Some(state) {
                    feature.properties.event_state = None;
                    changed = true;
                }
            }
        }

        let current = self.features[index].event_state();
        let result = if may_override(current, state) {
            if current != Some(state) {
                self.features[index].properties.event_state = Some(state);
                changed = true;
            }
            Some(index)
        } else {
            log::trace!(
                "put_event_state({state}) auf '{}'[{index}] blockiert: Feature hält {:?}",
                self.handle.source_id,
                current
            );
            None
        };

        if changed && show {
            self.flush();
        }
        result
    }

    /// Entfernt den State des referenzierten Features.
    ///
    /// `cause` ist die auslösende Interaktion: ein Low-`cause` entfernt keinen High-State.
    /// Gibt `true` zurück, wenn etwas entfernt wurde; nur dann wird (bei `show`) geflusht.
    pub fn clean_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        cause: InteractionType,
        show: bool,
    ) -> bool {
        let Some(index) = self.resolve(feature_ref) else {
            return false;
        };
        let current = self.features[index].event_state();
        if current.is_none() || !may_override(current, cause) {
            return false;
        }

        self.features[index].properties.event_state = None;
        if show {
            self.flush();
        }
        true
    }

    /// Entfernt `eventState` von allen Features, deren State in `states` liegt
    /// (`None` = alle States). Flusht höchstens einmal und nie bei einem No-op.
    pub fn clean_event_states(&mut self, states: Option<&[InteractionType]>, show: bool) -> bool {
        let mut changed = false;
        for feature in &mut self.features {
            let Some(current) = feature.properties.event_state else {
                continue;
            };
            if states.is_none_or(|states| states.contains(&current)) {
                feature.properties.event_state = None;
                changed = true;
            }
        }

        if changed && show {
            self.flush();
        }
        changed
    }

    /// Pusht den Snapshot an den Renderer und setzt die Layer-Sichtbarkeit.
    ///
    /// # Panics
    /// Wenn die Collection an keinen Renderer gebunden ist.
    pub fn flush(&mut self) {
        let visible = !self.features.is_empty();
        let mut target = self.expect_target().borrow_mut();
        for layer_id in &self.handle.layer_ids {
            target.set_layer_visibility(layer_id, visible);
        }
        target.set_source_data(&self.handle.source_id, &self.features);
    }

    fn expect_target(&self) -> &SharedRenderTarget {
        match &self.target {
            Some(target) => target,
            None => panic!(
                "Collection '{}' ist an keinen Renderer gebunden",
                self.handle.source_id
            ),
        }
    }

    fn rebuild_id_index(&mut self) {
        self.id_index.clear();
        for (index, feature) in self.features.iter().enumerate() {
            if let Some(id) = feature.effective_id() {
                self.id_index
                    .entry(id.canonical().into_owned())
                    .or_insert(index);
            }
        }
    }
}

impl MutableFeatureStore for FeatureCollection {
    fn handle(&self) -> &RenderingHandle {
        FeatureCollection::handle(self)
    }

    fn features(&self) -> &[Feature] {
        FeatureCollection::features(self)
    }

    fn resolve(&self, feature_ref: &FeatureRef) -> Option<usize> {
        FeatureCollection::resolve(self, feature_ref)
    }

    fn put_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        state: InteractionType,
        mode: EventStateMode,
        show: bool,
    ) -> Option<usize> {
        FeatureCollection::put_event_state(self, feature_ref, state, mode, show)
    }

    fn clean_event_state(
        &mut self,
        feature_ref: &FeatureRef,
        cause: InteractionType,
        show: bool,
    ) -> bool {
        FeatureCollection::clean_event_state(self, feature_ref, cause, show)
    }

    fn clean_event_states(&mut self, states: Option<&[InteractionType]>, show: bool) -> bool {
        FeatureCollection::clean_event_states(self, states, show)
    }

    fn flush(&mut self) {
        FeatureCollection::flush(self)
    }
}
