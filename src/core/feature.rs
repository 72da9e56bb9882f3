//! Feature-Datenmodell: IDs, Properties, Referenzen und Pick-Ergebnisse.

use super::InteractionType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Property-Schlüssel der sekundären (in den Properties eingebetteten) ID.
pub const EMBEDDED_ID_PROPERTY: &str = "id";

/// Stabile Feature-ID: Zahl oder Text.
///
/// Vergleich und Hashing laufen über die kanonische String-Form,
/// `5` und `"5"` bezeichnen also dasselbe Feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numerische ID
    Number(serde_json::Number),
    /// Text-ID
    Text(String),
}

impl FeatureId {
    /// Kanonische String-Form für Vergleiche und Index-Lookups.
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            FeatureId::Number(n) => Cow::Owned(canonical_number(n)),
            FeatureId::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Liest eine ID aus einem JSON-Wert (nur String oder Zahl).
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => Some(FeatureId::Number(n.clone())),
            serde_json::Value::String(s) => Some(FeatureId::Text(s.clone())),
            _ => None,
        }
    }
}

/// Ganzzahlige Gleitkommawerte (`5.0`, `1e1`) werden als Ganzzahl geschrieben.
fn canonical_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

impl PartialEq for FeatureId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for FeatureId {}

impl Hash for FeatureId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::Text(value.to_owned())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        FeatureId::Text(value)
    }
}

impl From<u64> for FeatureId {
    fn from(value: u64) -> Self {
        FeatureId::Number(value.into())
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        FeatureId::Number(value.into())
    }
}

/// Properties eines Features (GeoJSON-Layout).
///
/// `eventState` ist typisiert, alle übrigen Properties bleiben opakes JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Aktueller Interaktions-State (wird vom Renderer für das Styling gelesen)
    #[serde(
        rename = "eventState",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_state: Option<InteractionType>,
    /// Alle weiteren Properties
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Ein einzelnes darstellbares Feature (Marker, Routen-Abschnitt, Wegpunkt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Stabile Identität (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Geometrie, für die Engine opak
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    /// Properties inkl. `eventState`
    #[serde(default)]
    pub properties: FeatureProperties,
}

impl Feature {
    /// Erstellt ein Feature mit stabiler ID und leeren Properties.
    pub fn with_id(id: impl Into<FeatureId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Setzt ein zusätzliches Property (Builder-Stil).
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.extra.insert(key.to_owned(), value.into());
        self
    }

    /// Aktueller Interaktions-State.
    pub fn event_state(&self) -> Option<InteractionType> {
        self.properties.event_state
    }

    /// In den Properties eingebettete Sekundär-ID (`properties.id`).
    pub fn embedded_id(&self) -> Option<FeatureId> {
        self.properties
            .extra
            .get(EMBEDDED_ID_PROPERTY)
            .and_then(FeatureId::from_value)
    }

    /// Stabile ID, ersatzweise die eingebettete ID.
    pub fn effective_id(&self) -> Option<FeatureId> {
        self.id.clone().or_else(|| self.embedded_id())
    }
}

/// Referenz auf ein Feature innerhalb einer Collection: Index oder ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureRef {
    /// Position im Snapshot
    Index(usize),
    /// Stabile (oder eingebettete) ID
    Id(FeatureId),
}

impl From<usize> for FeatureRef {
    fn from(value: usize) -> Self {
        FeatureRef::Index(value)
    }
}

impl From<FeatureId> for FeatureRef {
    fn from(value: FeatureId) -> Self {
        FeatureRef::Id(value)
    }
}

impl From<&str> for FeatureRef {
    fn from(value: &str) -> Self {
        FeatureRef::Id(value.into())
    }
}

/// Ergebnis eines Hit-Tests im Renderer: Feature plus Quelle und Layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickedFeature {
    /// Kopie des getroffenen Features
    pub feature: Feature,
    /// Source-ID der besitzenden Collection
    pub source_id: String,
    /// Layer, auf dem der Treffer lag
    pub layer_id: String,
}

impl PickedFeature {
    /// Erstellt ein Pick-Ergebnis.
    pub fn new(
        feature: Feature,
        source_id: impl Into<String>,
        layer_id: impl Into<String>,
    ) -> Self {
        Self {
            feature,
            source_id: source_id.into(),
            layer_id: layer_id.into(),
        }
    }

    /// Referenz, über die das Feature in seiner Collection gefunden wird.
    pub fn feature_ref(&self) -> Option<FeatureRef> {
        self.feature.effective_id().map(FeatureRef::Id)
    }

    /// Prüft ob zwei Picks dasselbe Feature bezeichnen.
    ///
    /// Verschiedene Sources sind nie dasselbe Feature, auch bei gleicher ID.
    /// Sonst: stabile ID (beide vorhanden), dann eingebettete ID
    /// (beide vorhanden), sonst gleicher Layer.
    /// Zwei ID-lose Features im selben Layer gelten damit als gleich.
    pub fn is_same_feature(&self, other: &PickedFeature) -> bool {
        if self.source_id != other.source_id {
            return false;
        }
        if let (Some(a), Some(b)) = (&self.feature.id, &other.feature.id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.feature.embedded_id(), other.feature.embedded_id()) {
            return a == b;
        }
        self.layer_id == other.layer_id
    }
}
