//! Interaction Controller: verarbeitet Pointer-Samples einer Karteninstanz.
//!
//! Verbindet Hover-Erkennung, State-Übergänge und Handler-Dispatch. Timer
//! (Long-Hover) gehören dem Aufrufer: der Controller signalisiert nur, wann ein
//! Timer (neu) gestartet oder abgebrochen werden soll, und erwartet danach
//! [`InteractionSample::LongHoverElapsed`].

use super::hover::{detect_hover_state_within, HoverState};
use super::registry::{FeatureEvent, InteractiveRegistry};
use super::transition::{transition_event_state, Transition};
use crate::core::{
    CollectionSet, EventStateMode, FeatureCollection, InteractionType, PickedFeature,
    RenderingHandle, StyleBackedCollection,
};
use crate::shared::InteractionOptions;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Eingabe aus der UI-Schleife, inklusive Hit-Test-Ergebnis des Renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InteractionSample {
    /// Pointer bewegt (Feature unter dem Pointer oder keines)
    PointerMove {
        point: Vec2,
        #[serde(default)]
        picked: Option<PickedFeature>,
    },
    /// Long-Hover-Timer des Aufrufers ist abgelaufen
    LongHoverElapsed,
    /// Primärklick
    Click {
        point: Vec2,
        #[serde(default)]
        picked: Option<PickedFeature>,
    },
    /// Rechtsklick
    #[serde(rename = "contextmenu")]
    ContextMenu {
        point: Vec2,
        #[serde(default)]
        picked: Option<PickedFeature>,
    },
    /// Pointer hat die Karte verlassen
    PointerLeave,
}

/// Signal an den Aufrufer bezüglich seines Long-Hover-Timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LongHoverTimer {
    /// Nichts ändern
    #[default]
    Keep,
    /// Timer (neu) starten mit `InteractionOptions::long_hover_delay_ms`
    Schedule,
    /// Laufenden Timer abbrechen
    Cancel,
}

/// Ergebnis eines verarbeiteten Samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleOutcome {
    /// Hover-Klassifikation (nur bei `PointerMove` gesetzt)
    pub hover: HoverState,
    /// Anweisung für den Long-Hover-Timer
    pub long_hover_timer: LongHoverTimer,
    /// Anzahl aufgerufener Handler
    pub dispatched: usize,
    /// Neuer Halter der betroffenen Interaktion
    pub active: Option<PickedFeature>,
}

/// Interaktions-Zustand einer Karteninstanz.
///
/// Pro Instanz ein Objekt; mehrere Karten in einem Prozess teilen nichts.
#[derive(Debug, Default)]
pub struct InteractionController {
    collections: CollectionSet,
    registry: InteractiveRegistry,
    options: InteractionOptions,
    /// Aktueller Halter je Interaktionsart
    held: HashMap<InteractionType, PickedFeature>,
    last_point: Option<Vec2>,
    /// Letzter Hover-Pick, auch aus read-only Collections
    last_hovered: Option<PickedFeature>,
}

impl InteractionController {
    /// Erstellt einen Controller mit den übergebenen Optionen.
    pub fn new(options: InteractionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Laufzeit-Optionen.
    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Ersetzt die Laufzeit-Optionen.
    pub fn set_options(&mut self, options: InteractionOptions) {
        self.options = options;
    }

    /// Collections dieser Instanz.
    pub fn collections(&self) -> &CollectionSet {
        &self.collections
    }

    /// Collections dieser Instanz (veränderbar, z.B. für `show`).
    pub fn collections_mut(&mut self) -> &mut CollectionSet {
        &mut self.collections
    }

    /// Registry dieser Instanz.
    pub fn registry(&self) -> &InteractiveRegistry {
        &self.registry
    }

    /// Registry dieser Instanz (veränderbar, z.B. für `add_event_handler`).
    pub fn registry_mut(&mut self) -> &mut InteractiveRegistry {
        &mut self.registry
    }

    /// Registriert eine eigene Collection und markiert ihr Handle als interaktiv.
    pub fn add_collection(&mut self, collection: FeatureCollection) {
        self.registry.ensure_added(collection.handle());
        self.collections.insert_owned(collection);
    }

    /// Registriert eine style-basierte Quelle und markiert ihr Handle als interaktiv.
    pub fn add_style_backed(&mut self, collection: StyleBackedCollection) {
        self.registry.ensure_added(collection.handle());
        self.collections.insert_style_backed(collection);
    }

    /// Aktueller Halter einer Interaktionsart.
    pub fn held(&self, interaction: InteractionType) -> Option<&PickedFeature> {
        self.held.get(&interaction)
    }

    /// Verarbeitet einen Sample aus der UI-Schleife.
    pub fn handle_sample(&mut self, sample: InteractionSample) -> SampleOutcome {
        match sample {
            InteractionSample::PointerMove { point, picked } => self.pointer_move(point, picked),
            InteractionSample::LongHoverElapsed => self.long_hover_elapsed(),
            InteractionSample::Click { point, picked } => {
                let mode = self.options.click_mode;
                self.high_priority(InteractionType::Click, mode, point, picked)
            }
            InteractionSample::ContextMenu { point, picked } => {
                let mode = self.options.context_menu_mode;
                self.high_priority(InteractionType::ContextMenu, mode, point, picked)
            }
            InteractionSample::PointerLeave => self.pointer_leave(),
        }
    }

    /// Übernimmt nach einem Renderer-Neuaufbau die neuen Handles in Registry und Collections.
    /// Gibt die Anzahl aktualisierter Registry-Einträge zurück.
    pub fn refresh_handles(&mut self, candidates: &[RenderingHandle]) -> usize {
        let updated = self.registry.update_if_registered(candidates);
        self.collections.rebind_all(candidates);
        updated
    }

    /// Entfernt eine Interaktionsart aus allen Collections.
    pub fn reset_interaction(&mut self, interaction: InteractionType) {
        self.collections.clean_event_states(Some(&[interaction]));
        self.held.remove(&interaction);
        if interaction == InteractionType::Hover {
            self.last_hovered = None;
            self.last_point = None;
        }
    }

    /// Setzt alle States und Registrierungen zurück (Karteninstanz wird abgebaut).
    pub fn dispose(&mut self) {
        self.collections.clean_event_states(None);
        self.registry.remove_all();
        self.held.clear();
        self.last_hovered = None;
        self.last_point = None;
    }

    fn pointer_move(&mut self, point: Vec2, picked: Option<PickedFeature>) -> SampleOutcome {
        let picked = picked.filter(|p| self.registry.has_source_id(&p.source_id));
        let hover = detect_hover_state_within(
            point,
            picked.as_ref(),
            self.last_point,
            self.last_hovered.as_ref(),
            self.options.hover_motion_tolerance_px,
        );

        let mut outcome = SampleOutcome {
            hover,
            ..SampleOutcome::default()
        };

        if hover.hover_changed {
            self.drop_long_hover();
            let transition = self.transition(
                InteractionType::Hover,
                EventStateMode::Put,
                picked.as_ref(),
            );
            outcome.active = transition.active;
            if let Some(target) = &picked {
                outcome.dispatched =
                    self.dispatch(InteractionType::Hover, point, target, transition.index);
            }
            outcome.long_hover_timer = if picked.is_some() {
                self.long_hover_schedule()
            } else {
                LongHoverTimer::Cancel
            };
        } else if hover.mouse_in_motion_over_hovered_feature {
            outcome.active = self.held.get(&InteractionType::Hover).cloned();
            if !self.held.contains_key(&InteractionType::LongHover) {
                outcome.long_hover_timer = self.long_hover_schedule();
            }
        }

        self.last_point = Some(point);
        self.last_hovered = picked;
        outcome
    }

    fn long_hover_elapsed(&mut self) -> SampleOutcome {
        let Some(target) = self.last_hovered.clone() else {
            log::trace!("Long-Hover ohne gehovertes Feature ignoriert");
            return SampleOutcome::default();
        };
        if let Some(current) = self.held.get(&InteractionType::LongHover) {
            if current.is_same_feature(&target) {
                return SampleOutcome {
                    active: Some(current.clone()),
                    ..SampleOutcome::default()
                };
            }
        }

        let transition = self.transition(
            InteractionType::LongHover,
            EventStateMode::Put,
            Some(&target),
        );
        let point = self.last_point.unwrap_or(Vec2::ZERO);
        let dispatched =
            self.dispatch(InteractionType::LongHover, point, &target, transition.index);
        SampleOutcome {
            dispatched,
            active: transition.active,
            ..SampleOutcome::default()
        }
    }

    fn high_priority(
        &mut self,
        interaction: InteractionType,
        mode: EventStateMode,
        point: Vec2,
        picked: Option<PickedFeature>,
    ) -> SampleOutcome {
        let picked = picked.filter(|p| self.registry.has_source_id(&p.source_id));
        let transition = self.transition(interaction, mode, picked.as_ref());
        let dispatched = match &picked {
            Some(target) => self.dispatch(interaction, point, target, transition.index),
            None => 0,
        };
        SampleOutcome {
            dispatched,
            active: transition.active,
            ..SampleOutcome::default()
        }
    }

    fn pointer_leave(&mut self) -> SampleOutcome {
        self.drop_long_hover();
        self.transition(InteractionType::Hover, EventStateMode::Put, None);
        let hover = HoverState {
            hover_changed: self.last_hovered.is_some(),
            ..HoverState::default()
        };
        self.last_point = None;
        self.last_hovered = None;
        SampleOutcome {
            hover,
            long_hover_timer: LongHoverTimer::Cancel,
            ..SampleOutcome::default()
        }
    }

    /// Führt einen Übergang aus und aktualisiert den Halter der Interaktionsart.
    fn transition(
        &mut self,
        interaction: InteractionType,
        mode: EventStateMode,
        target: Option<&PickedFeature>,
    ) -> Transition {
        let prev = self.held.remove(&interaction);
        let transition =
            transition_event_state(&mut self.collections, interaction, mode, target, prev.as_ref());
        if let Some(active) = &transition.active {
            self.held.insert(interaction, active.clone());
        }
        transition
    }

    /// Vergisst den Long-Hover-Halter.
    ///
    /// Liegt Long-Hover auf dem aktuellen Hover-Halter, räumt der folgende
    /// Hover-Übergang dessen State mit auf (ein Flush). Sonst wird separat aufgeräumt.
    fn drop_long_hover(&mut self) {
        let Some(long_hover) = self.held.get(&InteractionType::LongHover) else {
            return;
        };
        let covered_by_hover = self
            .held
            .get(&InteractionType::Hover)
            .is_some_and(|hover| hover.is_same_feature(long_hover));
        if covered_by_hover {
            self.held.remove(&InteractionType::LongHover);
        } else {
            self.transition(InteractionType::LongHover, EventStateMode::Put, None);
        }
    }

    fn long_hover_schedule(&self) -> LongHoverTimer {
        if self.options.long_hover_enabled() {
            LongHoverTimer::Schedule
        } else {
            LongHoverTimer::Keep
        }
    }

    fn dispatch(
        &self,
        interaction: InteractionType,
        point: Vec2,
        target: &PickedFeature,
        index: Option<usize>,
    ) -> usize {
        self.registry.dispatch(&FeatureEvent {
            interaction,
            point,
            target: target.clone(),
            index,
        })
    }
}
