//! Interaktionsarten, Prioritäten und Schreibmodi für den Event-State.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priorität einer Interaktionsart.
///
/// `High` schlägt `Low`: ein Feature mit Klick-State wird nicht von Hover überschrieben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// Hover, Long-Hover
    Low,
    /// Klick, Kontextmenü
    High,
}

/// Art der Benutzerinteraktion, die als `eventState` an einem Feature hängt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    /// Pointer liegt über dem Feature
    #[serde(rename = "hover")]
    Hover,
    /// Pointer liegt länger über dem Feature (vom Aufrufer per Timer ausgelöst)
    #[serde(rename = "long-hover")]
    LongHover,
    /// Primärklick
    #[serde(rename = "click")]
    Click,
    /// Rechtsklick
    #[serde(rename = "contextmenu")]
    ContextMenu,
}

impl InteractionType {
    /// Alle Interaktionsarten in fester Reihenfolge.
    pub const ALL: [InteractionType; 4] = [
        InteractionType::Hover,
        InteractionType::LongHover,
        InteractionType::Click,
        InteractionType::ContextMenu,
    ];

    /// Gibt die Priorität dieser Interaktionsart zurück.
    pub fn priority(self) -> EventPriority {
        match self {
            InteractionType::Click | InteractionType::ContextMenu => EventPriority::High,
            InteractionType::Hover | InteractionType::LongHover => EventPriority::Low,
        }
    }

    /// Kurzform für `priority() == High`.
    pub fn is_high_priority(self) -> bool {
        self.priority() == EventPriority::High
    }

    /// Name wie er im `eventState`-Property an den Renderer geht.
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Hover => "hover",
            InteractionType::LongHover => "long-hover",
            InteractionType::Click => "click",
            InteractionType::ContextMenu => "contextmenu",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unbekannte Interaktionsart: {s}"))
    }
}

/// Prüft ob ein Schreibzugriff mit `incoming` den aktuellen State überschreiben darf.
///
/// Gesperrt ist nur der Fall: aktueller State High, eingehende Operation Low.
pub fn may_override(current: Option<InteractionType>, incoming: InteractionType) -> bool {
    match current {
        Some(current) if current.is_high_priority() => incoming.is_high_priority(),
        _ => true,
    }
}

/// Schreibmodus für `put_event_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStateMode {
    /// Exklusiv: State wird vorher von allen anderen Features der Collection entfernt
    #[default]
    Put,
    /// Additiv: andere Features behalten den State (Mehrfach-Highlight)
    Add,
}
