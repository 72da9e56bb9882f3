//! Registry der interaktiven Handles und ihrer Event-Handler.
//!
//! Handler-Buckets hängen an der Source-ID, nicht am Handle-Objekt. Dadurch
//! überleben Registrierungen einen Neuaufbau der Handles durch den Renderer
//! (z.B. nach einem Style-Wechsel), siehe [`InteractiveRegistry::update_if_registered`].

use crate::core::{InteractionType, PickedFeature, RenderingHandle};
use glam::Vec2;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An einen Handler übergebenes Ereignis.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEvent {
    /// Auslösende Interaktion
    pub interaction: InteractionType,
    /// Pointer-Position in Screen-Pixeln
    pub point: Vec2,
    /// Getroffenes Feature
    pub target: PickedFeature,
    /// Index des Features in seiner Collection (falls eigene Collection und nicht blockiert)
    pub index: Option<usize>,
}

/// Callback für Feature-Ereignisse. Gleichheit = gleiche `Rc`-Allokation.
pub type EventHandler = Rc<dyn Fn(&FeatureEvent)>;

/// Interaktive Handles und Handler-Buckets einer Karteninstanz.
#[derive(Default)]
pub struct InteractiveRegistry {
    /// Source-ID → aktuell gültiges Handle
    handles: IndexMap<String, RenderingHandle>,
    /// Vereinigung aller interaktiven Layer (für das Hit-Testing)
    layer_ids: IndexSet<String>,
    /// (Source-ID, Interaktionsart) → Handler in Registrierungsreihenfolge
    handlers: HashMap<(String, InteractionType), Vec<EventHandler>>,
}

impl fmt::Debug for InteractiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveRegistry")
            .field("handles", &self.handles)
            .field("layer_ids", &self.layer_ids)
            .field("buckets", &self.handlers.len())
            .finish()
    }
}

impl InteractiveRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markiert ein Handle als interaktiv.
    ///
    /// Ein vorhandenes Handle mit gleicher Source-ID wird ersetzt; die Layer-IDs
    /// werden in die globale Layer-Menge aufgenommen.
    pub fn ensure_added(&mut self, handle: &RenderingHandle) {
        self.layer_ids.extend(handle.layer_ids.iter().cloned());
        self.handles.insert(handle.source_id.clone(), handle.clone());
    }

    /// Registriert `handler` für `interaction` auf der Source des Handles.
    /// Derselbe Handler (gleiches `Rc`) wird nicht doppelt eingetragen.
    pub fn add_event_handler(
        &mut self,
        handle: &RenderingHandle,
        handler: EventHandler,
        interaction: InteractionType,
    ) {
        self.ensure_added(handle);
        let bucket = self
            .handlers
            .entry((handle.source_id.clone(), interaction))
            .or_default();
        if !bucket.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            bucket.push(handler);
            log::debug!(
                "Handler für '{}'/{} registriert ({} gesamt)",
                handle.source_id,
                interaction,
                bucket.len()
            );
        }
    }

    /// Entfernt den Bucket (Source, Interaktion), meldet das Handle ab und
    /// entfernt dessen Layer-IDs aus der globalen Menge (exakter Vergleich).
    pub fn remove(&mut self, handle: &RenderingHandle, interaction: InteractionType) {
        self.handlers.remove(&(handle.source_id.clone(), interaction));
        let stored = self.handles.shift_remove(&handle.source_id);

        let stale_layers = handle
            .layer_ids
            .iter()
            .chain(stored.iter().flat_map(|h| h.layer_ids.iter()));
        for layer_id in stale_layers {
            self.layer_ids.shift_remove(layer_id);
        }
    }

    /// Setzt die Registry vollständig zurück.
    pub fn remove_all(&mut self) {
        self.handles.clear();
        self.layer_ids.clear();
        self.handlers.clear();
    }

    /// Prüft ob ein äquivalentes Handle registriert ist.
    pub fn has(&self, handle: &RenderingHandle) -> bool {
        self.handles.get(&handle.source_id) == Some(handle)
    }

    /// Prüft ob für die Source-ID ein Handle registriert ist.
    pub fn has_source_id(&self, source_id: &str) -> bool {
        self.handles.contains_key(source_id)
    }

    /// Ersetzt registrierte Handles durch neu gebaute Kandidaten mit gleicher Source-ID.
    ///
    /// Kandidaten für nicht registrierte Sources werden ignoriert. Die Handler-Buckets
    /// bleiben unverändert. Gibt die Anzahl ersetzter Handles zurück.
    pub fn update_if_registered(&mut self, candidates: &[RenderingHandle]) -> usize {
        let mut updated = 0;
        for candidate in candidates {
            if self.has_source_id(&candidate.source_id) {
                self.ensure_added(candidate);
                updated += 1;
            }
        }
        if updated > 0 {
            log::debug!("{updated} interaktive Handles aktualisiert");
        }
        updated
    }

    /// Gespeichertes Handle zur Source-ID.
    pub fn handle(&self, source_id: &str) -> Option<&RenderingHandle> {
        self.handles.get(source_id)
    }

    /// Alle registrierten Handles in Registrierungsreihenfolge.
    pub fn handles(&self) -> impl Iterator<Item = &RenderingHandle> {
        self.handles.values()
    }

    /// Alle interaktiven Layer-IDs (Eingabe für das Hit-Testing des Renderers).
    pub fn interactive_layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layer_ids.iter().map(String::as_str)
    }

    /// Registrierte Handler für (Source, Interaktion).
    pub fn handlers(&self, source_id: &str, interaction: InteractionType) -> &[EventHandler] {
        self.handlers
            .get(&(source_id.to_owned(), interaction))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ruft alle Handler für Source und Interaktion des Ereignisses auf.
    /// Gibt die Anzahl aufgerufener Handler zurück.
    pub fn dispatch(&self, event: &FeatureEvent) -> usize {
        let handlers = self.handlers(&event.target.source_id, event.interaction);
        for handler in handlers {
            handler(event);
        }
        handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Feature;
    use std::cell::Cell;

    fn click_event(source_id: &str) -> FeatureEvent {
        FeatureEvent {
            interaction: InteractionType::Click,
            point: Vec2::new(5.0, 5.0),
            target: PickedFeature::new(Feature::with_id("1"), source_id, "icons"),
            index: Some(0),
        }
    }

    #[test]
    fn test_handler_is_not_registered_twice() {
        let mut registry = InteractiveRegistry::new();
        let handle = RenderingHandle::new("places", ["icons"]);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let cb: EventHandler = Rc::new(move |_: &FeatureEvent| counter.set(counter.get() + 1));

        registry.add_event_handler(&handle, cb.clone(), InteractionType::Click);
        registry.add_event_handler(&handle, cb, InteractionType::Click);

        assert_eq!(registry.handlers("places", InteractionType::Click).len(), 1);
        assert_eq!(registry.dispatch(&click_event("places")), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_handlers_are_separated_per_interaction() {
        let mut registry = InteractiveRegistry::new();
        let handle = RenderingHandle::new("places", ["icons"]);
        registry.add_event_handler(&handle, Rc::new(|_: &FeatureEvent| {}), InteractionType::Hover);

        assert_eq!(registry.dispatch(&click_event("places")), 0);
        assert_eq!(registry.handlers("places", InteractionType::Hover).len(), 1);
    }

    #[test]
    fn test_ensure_added_replaces_handle_and_unions_layers() {
        let mut registry = InteractiveRegistry::new();
        registry.ensure_added(&RenderingHandle::new("places", ["icons"]));
        registry.ensure_added(&RenderingHandle::new("places", ["icons-v2", "labels"]));

        assert!(registry.has(&RenderingHandle::new("places", ["icons-v2", "labels"])));
        assert!(!registry.has(&RenderingHandle::new("places", ["icons"])));
        let layers: Vec<&str> = registry.interactive_layer_ids().collect();
        assert_eq!(layers, vec!["icons", "icons-v2", "labels"]);
    }

    #[test]
    fn test_remove_drops_layers_exactly() {
        let mut registry = InteractiveRegistry::new();
        let route = RenderingHandle::new("route", ["route"]);
        let sections = RenderingHandle::new("sections", ["route-sections"]);
        registry.add_event_handler(&route, Rc::new(|_: &FeatureEvent| {}), InteractionType::Click);
        registry.add_event_handler(
            &sections,
            Rc::new(|_: &FeatureEvent| {}),
            InteractionType::Click,
        );

        registry.remove(&route, InteractionType::Click);

        assert!(!registry.has_source_id("route"));
        assert!(registry.has(&sections));
        let layers: Vec<&str> = registry.interactive_layer_ids().collect();
        assert_eq!(
            layers,
            vec!["route-sections"],
            "Layer mit gleichem Präfix darf nicht mit entfernt werden"
        );
        assert!(registry.handlers("route", InteractionType::Click).is_empty());
    }

    #[test]
    fn test_update_if_registered_keeps_handlers() {
        let mut registry = InteractiveRegistry::new();
        let handle1 = RenderingHandle::new("places", ["icons-light"]);
        let handle2 = RenderingHandle::new("places", ["icons-dark"]);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        registry.add_event_handler(
            &handle1,
            Rc::new(move |_: &FeatureEvent| flag.set(true)),
            InteractionType::Click,
        );

        let updated = registry.update_if_registered(&[
            handle2.clone(),
            RenderingHandle::new("unregistered", ["x"]),
        ]);

        assert_eq!(updated, 1);
        assert!(registry.has(&handle2));
        assert!(!registry.has_source_id("unregistered"));
        assert_eq!(registry.dispatch(&click_event("places")), 1);
        assert!(fired.get());
    }

    #[test]
    fn test_remove_all_resets_everything() {
        let mut registry = InteractiveRegistry::new();
        let handle = RenderingHandle::new("places", ["icons"]);
        registry.add_event_handler(&handle, Rc::new(|_: &FeatureEvent| {}), InteractionType::Hover);

        registry.remove_all();

        assert!(!registry.has(&handle));
        assert_eq!(registry.interactive_layer_ids().count(), 0);
        assert!(registry.handlers("places", InteractionType::Hover).is_empty());
    }
}
