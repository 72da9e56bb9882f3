//! Replay-Modus: spielt ein aufgezeichnetes Interaktions-Szenario gegen einen
//! aufzeichnenden Renderer ab.
//!
//! Ein Szenario ist JSON mit Quellen (Handle plus Features) und einer Liste von
//! Schritten. Schritte sind entweder Pointer-Samples (`pointer-move`, `click`, ...)
//! oder Steuer-Schritte (`refresh-handles`, `reset-interaction`, `dispose`).

use crate::app::{InteractionController, InteractionSample, LongHoverTimer};
use crate::core::{
    Feature, FeatureCollection, InteractionType, RenderingHandle, StyleBackedCollection,
};
use crate::render::{RecordingTarget, RenderCall, SharedRenderTarget};
use crate::shared::InteractionOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

/// Eine Datenquelle im Szenario.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSource {
    /// Handle der Quelle im Renderer
    #[serde(flatten)]
    pub handle: RenderingHandle,
    /// Startdaten (nur für eigene Collections)
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Quelle stammt aus dem Style und kann keinen Event-State tragen
    #[serde(default)]
    pub style_backed: bool,
}

/// Steuer-Schritte, die keine Pointer-Eingabe sind.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControlStep {
    /// Renderer wurde neu aufgebaut, neue Handles übernehmen
    RefreshHandles { handles: Vec<RenderingHandle> },
    /// Eine Interaktionsart überall entfernen
    ResetInteraction { interaction: InteractionType },
    /// Karteninstanz abbauen
    Dispose,
}

/// Ein Schritt des Szenarios.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Sample(InteractionSample),
    Control(ControlStep),
}

/// Komplettes Szenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Optionen für diesen Lauf (sonst die geladenen Standard-Optionen)
    #[serde(default)]
    pub options: Option<InteractionOptions>,
    pub sources: Vec<ScenarioSource>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

/// Ergebnis eines einzelnen Schritts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepReport {
    /// Position im Szenario (0-basiert)
    pub step: usize,
    pub hover_changed: bool,
    pub mouse_in_motion_over_hovered_feature: bool,
    pub long_hover_timer: LongHoverTimer,
    /// Anzahl aufgerufener Handler
    pub dispatched: usize,
    /// `source:id` des neuen Halters, falls vorhanden
    pub active: Option<String>,
    /// Sources, deren Daten in diesem Schritt gepusht wurden (in Reihenfolge)
    pub flushed: Vec<String>,
}

/// Gesamtergebnis eines Replays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Anzahl Handler-Aufrufe über alle Schritte
    pub dispatched_total: usize,
}

impl ReplayReport {
    /// Anzahl aller Daten-Pushes.
    pub fn flush_count(&self) -> usize {
        self.steps.iter().map(|s| s.flushed.len()).sum()
    }
}

/// Parst ein Szenario aus JSON.
pub fn parse_scenario(json: &str) -> Result<Scenario> {
    let scenario: Scenario =
        serde_json::from_str(json).context("Fehler beim Parsen des Szenarios")?;
    validate(&scenario)?;
    Ok(scenario)
}

/// Lädt ein Szenario aus einer Datei.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Szenario konnte nicht gelesen werden: {}", path.display()))?;
    let scenario = parse_scenario(&content)?;
    log::info!(
        "Szenario geladen: {} Quellen, {} Schritte",
        scenario.sources.len(),
        scenario.steps.len()
    );
    Ok(scenario)
}

fn validate(scenario: &Scenario) -> Result<()> {
    let mut seen = HashSet::new();
    for source in &scenario.sources {
        if !seen.insert(source.handle.source_id.as_str()) {
            bail!("Source '{}' ist doppelt definiert", source.handle.source_id);
        }
        if source.style_backed && !source.features.is_empty() {
            bail!(
                "Style-Source '{}' darf keine Features enthalten",
                source.handle.source_id
            );
        }
    }
    Ok(())
}

/// Baut einen Controller samt aufzeichnendem Renderer für das Szenario auf.
pub fn build_controller(
    scenario: &Scenario,
    options: InteractionOptions,
) -> (InteractionController, Rc<RefCell<RecordingTarget>>) {
    let recorder = Rc::new(RefCell::new(RecordingTarget::new()));
    let target: SharedRenderTarget = recorder.clone();
    let mut controller = InteractionController::new(options);

    for source in &scenario.sources {
        if source.style_backed {
            controller.add_style_backed(StyleBackedCollection::new(source.handle.clone()));
            continue;
        }
        let mut collection = FeatureCollection::bound(source.handle.clone(), target.clone());
        collection.show(source.features.clone());
        controller.add_collection(collection);
    }

    // Initiales `show` zählt nicht zum Replay
    recorder.borrow_mut().clear_calls();
    (controller, recorder)
}

/// Spielt ein Szenario ab. `fallback` greift, wenn das Szenario keine Optionen mitbringt.
pub fn run(scenario: &Scenario, fallback: InteractionOptions) -> ReplayReport {
    let options = scenario.options.clone().unwrap_or(fallback);
    let (mut controller, recorder) = build_controller(scenario, options);
    let mut report = ReplayReport::default();

    for (step, entry) in scenario.steps.iter().enumerate() {
        let mut step_report = StepReport {
            step,
            ..StepReport::default()
        };

        match entry {
            ScenarioStep::Sample(sample) => {
                let outcome = controller.handle_sample(sample.clone());
                step_report.hover_changed = outcome.hover.hover_changed;
                step_report.mouse_in_motion_over_hovered_feature =
                    outcome.hover.mouse_in_motion_over_hovered_feature;
                step_report.long_hover_timer = outcome.long_hover_timer;
                step_report.dispatched = outcome.dispatched;
                step_report.active = outcome.active.map(|picked| {
                    let id = picked
                        .feature
                        .effective_id()
                        .map_or_else(|| "?".to_owned(), |id| id.to_string());
                    format!("{}:{}", picked.source_id, id)
                });
            }
            ScenarioStep::Control(ControlStep::RefreshHandles { handles }) => {
                let updated = controller.refresh_handles(handles);
                log::debug!("Schritt {}: {} Handles aktualisiert", step, updated);
            }
            ScenarioStep::Control(ControlStep::ResetInteraction { interaction }) => {
                controller.reset_interaction(*interaction);
            }
            ScenarioStep::Control(ControlStep::Dispose) => controller.dispose(),
        }

        step_report.flushed = drain_flushes(&recorder);
        report.dispatched_total += step_report.dispatched;
        report.steps.push(step_report);
    }

    log::info!(
        "Replay beendet: {} Schritte, {} Flushes",
        report.steps.len(),
        report.flush_count()
    );
    report
}

fn drain_flushes(recorder: &Rc<RefCell<RecordingTarget>>) -> Vec<String> {
    let mut recorder = recorder.borrow_mut();
    let flushed = recorder
        .calls()
        .iter()
        .filter_map(|call| match call {
            RenderCall::SourceData { source_id, .. } => Some(source_id.clone()),
            RenderCall::LayerVisibility { .. } => None,
        })
        .collect();
    recorder.clear_calls();
    flushed
}
