//! Zentrale Konfiguration der Interaktions-Engine.
//!
//! `InteractionOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::EventStateMode;
use serde::{Deserialize, Serialize};

// ── Hover ───────────────────────────────────────────────────────────

/// Verweildauer bis zur Long-Hover-Promotion in Millisekunden (0 = deaktiviert).
pub const LONG_HOVER_DELAY_MS: u64 = 600;
/// Pointer-Bewegungen bis zu dieser Distanz (Screen-Pixel) gelten nicht als Bewegung.
pub const HOVER_MOTION_TOLERANCE_PX: f32 = 0.0;

// ── Klick ───────────────────────────────────────────────────────────

/// Standard-Modus für Klick-Highlights (exklusiv).
pub const CLICK_MODE: EventStateMode = EventStateMode::Put;

/// Alle zur Laufzeit änderbaren Interaktions-Optionen.
/// Wird als `map_event_state.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOptions {
    // ── Hover ───────────────────────────────────────────────────
    /// Verweildauer bis Long-Hover (der Timer gehört dem Aufrufer)
    pub long_hover_delay_ms: u64,
    /// Bewegungs-Toleranz für die Hover-Erkennung in Screen-Pixeln
    #[serde(default = "default_hover_motion_tolerance_px")]
    pub hover_motion_tolerance_px: f32,

    // ── Klick / Kontextmenü ─────────────────────────────────────
    /// `put` = ein Klick-Highlight, `add` = Mehrfach-Highlight
    #[serde(default)]
    pub click_mode: EventStateMode,
    /// Modus für Kontextmenü-Highlights
    #[serde(default)]
    pub context_menu_mode: EventStateMode,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            long_hover_delay_ms: LONG_HOVER_DELAY_MS,
            hover_motion_tolerance_px: HOVER_MOTION_TOLERANCE_PX,
            click_mode: CLICK_MODE,
            context_menu_mode: EventStateMode::Put,
        }
    }
}

/// Serde-Default für `hover_motion_tolerance_px` (Abwärtskompatibilität).
fn default_hover_motion_tolerance_px() -> f32 {
    HOVER_MOTION_TOLERANCE_PX
}

impl InteractionOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("map_event_state"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("map_event_state.toml")
    }

    /// Gibt zurück ob Long-Hover aktiv ist.
    pub fn long_hover_enabled(&self) -> bool {
        self.long_hover_delay_ms > 0
    }
}
