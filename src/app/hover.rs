//! Hover-Erkennung: klassifiziert einen Pointer-Sample gegen den vorherigen.

use crate::core::PickedFeature;
use glam::Vec2;

/// Ergebnis der Hover-Klassifikation. Beide Flags `false` = ruhiges Hovern bzw. nichts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverState {
    /// Das gehoverte Feature hat gewechselt (inkl. Betreten und Verlassen)
    pub hover_changed: bool,
    /// Gleiches Feature, aber der Pointer hat sich bewegt
    pub mouse_in_motion_over_hovered_feature: bool,
}

impl HoverState {
    /// Gibt zurück ob keines der Flags gesetzt ist.
    pub fn is_steady(&self) -> bool {
        !self.hover_changed && !self.mouse_in_motion_over_hovered_feature
    }
}

/// Klassifiziert einen Sample mit exaktem Positionsvergleich.
pub fn detect_hover_state(
    point: Vec2,
    feature: Option<&PickedFeature>,
    prev_point: Option<Vec2>,
    prev_feature: Option<&PickedFeature>,
) -> HoverState {
    detect_hover_state_within(point, feature, prev_point, prev_feature, 0.0)
}

/// Wie [`detect_hover_state`], Bewegungen bis `tolerance_px` zählen aber nicht als Bewegung.
///
/// Fehlt `prev_point`, gilt der Pointer als bewegt.
pub fn detect_hover_state_within(
    point: Vec2,
    feature: Option<&PickedFeature>,
    prev_point: Option<Vec2>,
    prev_feature: Option<&PickedFeature>,
    tolerance_px: f32,
) -> HoverState {
    match (feature, prev_feature) {
        (Some(feature), Some(prev_feature)) => {
            if !feature.is_same_feature(prev_feature) {
                return HoverState {
                    hover_changed: true,
                    ..HoverState::default()
                };
            }
            let moved = prev_point.is_none_or(|prev| prev.distance(point) > tolerance_px);
            HoverState {
                hover_changed: false,
                mouse_in_motion_over_hovered_feature: moved,
            }
        }
        (Some(_), None) | (None, Some(_)) => HoverState {
            hover_changed: true,
            ..HoverState::default()
        },
        (None, None) => HoverState::default(),
    }
}
