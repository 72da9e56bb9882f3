//! Alle angezeigten Collections einer Karteninstanz, indexiert nach Source-ID.

use super::{FeatureCollection, InteractionType, MutableFeatureStore, RenderingHandle};
use indexmap::IndexMap;

/// Read-only Quelle, deren Daten direkt im Renderer-Style liegen.
///
/// Features aus solchen Quellen sind pickbar, tragen aber keinen Event-State.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBackedCollection {
    handle: RenderingHandle,
}

impl StyleBackedCollection {
    /// Erstellt eine style-basierte Quelle.
    pub fn new(handle: RenderingHandle) -> Self {
        Self { handle }
    }

    /// Gibt das Handle zurück.
    pub fn handle(&self) -> &RenderingHandle {
        &self.handle
    }
}

/// Eine angezeigte Collection: eigene (veränderbar) oder style-basiert (read-only).
#[derive(Debug)]
pub enum DisplayCollection {
    /// Eigene Collection mit Event-State
    Owned(FeatureCollection),
    /// Style-basierte Quelle ohne Event-State
    StyleBacked(StyleBackedCollection),
}

impl DisplayCollection {
    /// Handle der Collection.
    pub fn handle(&self) -> &RenderingHandle {
        match self {
            DisplayCollection::Owned(c) => c.handle(),
            DisplayCollection::StyleBacked(c) => c.handle(),
        }
    }

    /// Event-State-Fähigkeit, falls vorhanden.
    pub fn as_mutable(&mut self) -> Option<&mut dyn MutableFeatureStore> {
        match self {
            DisplayCollection::Owned(c) => Some(c),
            DisplayCollection::StyleBacked(_) => None,
        }
    }
}

/// Collections einer Karteninstanz. Wird pro Instanz erzeugt, nie global geteilt.
#[derive(Debug, Default)]
pub struct CollectionSet {
    collections: IndexMap<String, DisplayCollection>,
}

impl CollectionSet {
    /// Erstellt ein leeres Set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine eigene Collection unter ihrer Source-ID.
    /// Eine vorhandene Collection mit gleicher Source-ID wird ersetzt und zurückgegeben.
    pub fn insert_owned(&mut self, collection: FeatureCollection) -> Option<DisplayCollection> {
        let source_id = collection.source_id().to_owned();
        self.collections
            .insert(source_id, DisplayCollection::Owned(collection))
    }

    /// Registriert eine style-basierte Quelle.
    pub fn insert_style_backed(
        &mut self,
        collection: StyleBackedCollection,
    ) -> Option<DisplayCollection> {
        let source_id = collection.handle().source_id.clone();
        self.collections
            .insert(source_id, DisplayCollection::StyleBacked(collection))
    }

    /// Entfernt eine Collection (Modul wird abgebaut).
    pub fn remove(&mut self, source_id: &str) -> Option<DisplayCollection> {
        self.collections.shift_remove(source_id)
    }

    /// Gibt die Collection zur Source-ID zurück.
    pub fn get(&self, source_id: &str) -> Option<&DisplayCollection> {
        self.collections.get(source_id)
    }

    /// Eigene Collection zur Source-ID (read-only).
    pub fn owned(&self, source_id: &str) -> Option<&FeatureCollection> {
        match self.collections.get(source_id)? {
            DisplayCollection::Owned(c) => Some(c),
            DisplayCollection::StyleBacked(_) => None,
        }
    }

    /// Eigene Collection zur Source-ID (veränderbar, z.B. für `show`).
    pub fn owned_mut(&mut self, source_id: &str) -> Option<&mut FeatureCollection> {
        match self.collections.get_mut(source_id)? {
            DisplayCollection::Owned(c) => Some(c),
            DisplayCollection::StyleBacked(_) => None,
        }
    }

    /// Prüft ob die Source eine eigene (veränderbare) Collection ist.
    pub fn supports_event_state(&self, source_id: &str) -> bool {
        self.owned(source_id).is_some()
    }

    /// Event-State-Fähigkeit der Collection zur Source-ID.
    pub fn store_mut(&mut self, source_id: &str) -> Option<&mut dyn MutableFeatureStore> {
        self.collections.get_mut(source_id)?.as_mutable()
    }

    /// Bindet alle eigenen Collections mit passender Source-ID an die neuen Handles.
    /// Gibt die Anzahl neu gebundener Collections zurück.
    pub fn rebind_all(&mut self, handles: &[RenderingHandle]) -> usize {
        let mut rebound = 0;
        for handle in handles {
            match self.collections.get_mut(&handle.source_id) {
                Some(DisplayCollection::Owned(c)) => {
                    c.rebind(handle.clone());
                    rebound += 1;
                }
                Some(DisplayCollection::StyleBacked(c)) => {
                    *c = StyleBackedCollection::new(handle.clone());
                }
                None => {}
            }
        }
        rebound
    }

    /// Entfernt `states` aus allen eigenen Collections (ein Flush je geänderter Collection).
    pub fn clean_event_states(&mut self, states: Option<&[InteractionType]>) -> usize {
        self.collections
            .values_mut()
            .filter_map(DisplayCollection::as_mutable)
            .map(|store| store.clean_event_states(states, true))
            .filter(|changed| *changed)
            .count()
    }

    /// Iterator über alle Collections in Registrierungsreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &DisplayCollection> {
        self.collections.values()
    }

    /// Gibt die Anzahl der Collections zurück.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Gibt zurück ob keine Collection registriert ist.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
