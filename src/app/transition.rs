//! Übergabe eines Event-States vom bisherigen an das neue Ziel-Feature.
//!
//! Pro Interaktionsart gibt es höchstens einen Halter. Liegen alter und neuer
//! Halter in derselben Collection, wird in einem Durchgang umgeschrieben und
//! einmal geflusht. Liegen sie in verschiedenen Collections, wird zuerst die
//! alte, dann die neue Collection geflusht.

use crate::core::{
    CollectionSet, EventStateMode, InteractionType, MutableFeatureStore, PickedFeature,
};

/// Ergebnis eines Übergangs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Neuer Halter mit aktualisiertem Feature (`None` = kein aktives Feature)
    pub active: Option<PickedFeature>,
    /// Index des neuen Halters in seiner Collection
    pub index: Option<usize>,
}

/// Verschiebt `interaction` von `prev_target` auf `new_target`.
///
/// - Neues Ziel in veränderbarer Collection: State setzen, alten Halter aufräumen,
///   neue Collection genau einmal flushen.
/// - Sonst: alten Halter (falls veränderbar) aufräumen und flushen; kein aktives Feature.
///
/// Im Modus `Add` behält der alte Halter seinen State (Mehrfach-Highlight).
pub fn transition_event_state(
    collections: &mut CollectionSet,
    interaction: InteractionType,
    mode: EventStateMode,
    new_target: Option<&PickedFeature>,
    prev_target: Option<&PickedFeature>,
) -> Transition {
    let Some(new_target) =
        new_target.filter(|target| collections.supports_event_state(&target.source_id))
    else {
        if let Some(prev) = prev_target {
            if let Some(store) = collections.store_mut(&prev.source_id) {
                clean_previous(store, prev, interaction, true);
            }
        }
        log::debug!("{interaction}: Übergang ohne neues Ziel");
        return Transition::default();
    };

    let stale_prev = prev_target
        .filter(|prev| mode == EventStateMode::Put && !prev.is_same_feature(new_target));
    let same_collection = stale_prev.is_some_and(|prev| prev.source_id == new_target.source_id);

    if let Some(prev) = stale_prev.filter(|_| !same_collection) {
        if let Some(store) = collections.store_mut(&prev.source_id) {
            clean_previous(store, prev, interaction, true);
        }
    }

    let Some(store) = collections.store_mut(&new_target.source_id) else {
        return Transition::default();
    };

    let index = new_target
        .feature_ref()
        .and_then(|feature_ref| store.put_event_state(&feature_ref, interaction, mode, false));

    if same_collection {
        if let Some(prev_ref) = stale_prev.and_then(PickedFeature::feature_ref) {
            store.clean_event_state(&prev_ref, interaction, false);
        }
    }

    store.flush();

    log::debug!(
        "{interaction}: Ziel '{}' -> Index {:?}{}",
        new_target.source_id,
        index,
        if same_collection {
            " (gleiche Collection)"
        } else {
            ""
        }
    );

    let active = index.and_then(|i| store.features().get(i)).map(|feature| PickedFeature {
        feature: feature.clone(),
        source_id: new_target.source_id.clone(),
        layer_id: new_target.layer_id.clone(),
    });
    Transition { active, index }
}

/// Räumt den State des alten Halters auf.
///
/// Ohne auflösbare ID wird `interaction` collection-weit entfernt, da es pro
/// Collection höchstens einen Halter gibt.
fn clean_previous(
    store: &mut dyn MutableFeatureStore,
    prev: &PickedFeature,
    interaction: InteractionType,
    show: bool,
) -> bool {
    match prev.feature_ref() {
        Some(prev_ref) => store.clean_event_state(&prev_ref, interaction, show),
        None => store.clean_event_states(Some(&[interaction]), show),
    }
}
