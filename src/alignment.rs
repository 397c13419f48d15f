//! Corner-diagonal alignment detection for the cube tableau.
//!
//! The cube hides its secret behind one of its eight space diagonals. Looking
//! straight down a diagonal makes `alignment` reach 1; raising it to the 100th
//! power leaves almost nothing until the view is within about a degree.

use std::time::Duration;

use iced::Color;
use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::cube::{CORNERS, EDGES, edge_midpoint};
use crate::math::color_from_hex;

const REVEAL_EXPONENT: i32 = 100;

/// Strength above which the cube fully reveals itself.
pub(crate) const FULL_REVEAL_THRESHOLD: f32 = 0.995;
/// Strength above which the cube starts to hint.
pub(crate) const HINT_THRESHOLD: f32 = 0.95;
/// How long a full reveal has to hold before the secret unlocks.
pub(crate) const UNLOCK_HOLD: Duration = Duration::from_secs(2);

const GOLD: u32 = 0xFFD700;
const HINT_FRONT: u32 = 0xFFFFFF;
const HINT_BACK: u32 = 0x555555;
const NEUTRAL_EDGE: u32 = 0x888888;

/// Maps a raw alignment in [0, 1] onto the reveal curve.
pub(crate) fn strength_from_alignment(alignment: f32) -> f32 {
    alignment.clamp(0.0, 1.0).powi(REVEAL_EXPONENT)
}

/// How strongly the view direction lines up with any corner diagonal of a
/// cube rotated by `object_rotation`.
pub(crate) fn compute_reveal_strength(
    view_direction: &Unit<Vector3<f32>>,
    object_rotation: &UnitQuaternion<f32>,
) -> f32 {
    let view = view_direction.into_inner();
    let alignment = CORNERS
        .iter()
        .map(|corner| {
            let diagonal = object_rotation * Unit::new_normalize(*corner);
            diagonal.dot(&view).abs()
        })
        .fold(0.0_f32, f32::max);

    strength_from_alignment(alignment)
}

/// Visual state the cube should be in for a given strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RevealLevel {
    Opaque,
    Hint,
    Full,
}

impl RevealLevel {
    pub(crate) fn from_strength(strength: f32) -> Self {
        if strength > FULL_REVEAL_THRESHOLD {
            RevealLevel::Full
        } else if strength > HINT_THRESHOLD {
            RevealLevel::Hint
        } else {
            RevealLevel::Opaque
        }
    }

    pub(crate) fn opacity_target(self) -> f32 {
        match self {
            RevealLevel::Opaque => 1.0,
            RevealLevel::Hint => 0.1,
            RevealLevel::Full => 0.0,
        }
    }
}

/// Edge colors for the current reveal level, in `EDGES` order.
///
/// While hinting, edges whose midpoint faces the camera are drawn light and
/// the ones behind are drawn dim.
pub(crate) fn edge_colors(
    level: RevealLevel,
    view_direction: &Unit<Vector3<f32>>,
    object_rotation: &UnitQuaternion<f32>,
) -> [Color; 12] {
    let view = view_direction.into_inner();
    match level {
        RevealLevel::Full => [color_from_hex(GOLD); 12],
        RevealLevel::Opaque => [color_from_hex(NEUTRAL_EDGE); 12],
        RevealLevel::Hint => EDGES.map(|edge| {
            let midpoint = object_rotation * edge_midpoint(edge);
            if midpoint.dot(&view) < 0.0 {
                color_from_hex(HINT_FRONT)
            } else {
                color_from_hex(HINT_BACK)
            }
        }),
    }
}

/// Result of one detector frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AlignmentFrame {
    pub(crate) strength: f32,
    pub(crate) level: RevealLevel,
    /// Set on the single frame where the hold time is first satisfied.
    pub(crate) unlocked: bool,
}

impl Default for AlignmentFrame {
    fn default() -> Self {
        Self {
            strength: 0.0,
            level: RevealLevel::Opaque,
            unlocked: false,
        }
    }
}

/// Per-frame detector with the debounced unlock timer.
#[derive(Debug, Default)]
pub(crate) struct AlignmentDetector {
    full_since: Option<Duration>,
    fired: bool,
}

impl AlignmentDetector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Evaluates one frame at time `now`.
    ///
    /// Auto-rotation forces the strength to zero so ambient motion can never
    /// trip the secret.
    pub(crate) fn update(
        &mut self,
        now: Duration,
        view_direction: &Unit<Vector3<f32>>,
        object_rotation: &UnitQuaternion<f32>,
        auto_rotate: bool,
    ) -> AlignmentFrame {
        let strength = if auto_rotate {
            0.0
        } else {
            compute_reveal_strength(view_direction, object_rotation)
        };
        let level = RevealLevel::from_strength(strength);
        log::trace!("reveal strength {strength:.5} ({level:?})");

        if level != RevealLevel::Full {
            if self.full_since.take().is_some() {
                log::debug!("alignment lost, hold timer cleared");
            }
            return AlignmentFrame {
                strength,
                level,
                unlocked: false,
            };
        }

        let since = *self.full_since.get_or_insert(now);
        let unlocked = !self.fired && now.saturating_sub(since) >= UNLOCK_HOLD;
        if unlocked {
            self.fired = true;
            log::info!("cube corner alignment held for {UNLOCK_HOLD:?}");
        }

        AlignmentFrame {
            strength,
            level,
            unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::f32::consts::PI;

    fn random_rotation(rng: &mut StdRng) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(
            rng.gen_range(-PI..PI),
            rng.gen_range(-PI..PI),
            rng.gen_range(-PI..PI),
        )
    }

    fn corner_view(rotation: &UnitQuaternion<f32>, corner: usize) -> Unit<Vector3<f32>> {
        rotation * Unit::new_normalize(CORNERS[corner])
    }

    #[test]
    fn looking_down_any_diagonal_is_a_perfect_match() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let rotation = random_rotation(&mut rng);
            for corner in 0..CORNERS.len() {
                let view = corner_view(&rotation, corner);
                let strength = compute_reveal_strength(&view, &rotation);
                assert!((strength - 1.0).abs() < 1e-4, "corner {corner}: {strength}");
            }
        }
    }

    #[test]
    fn reveal_curve_boundaries() {
        assert!((strength_from_alignment(0.995) - 0.606).abs() < 0.01);
        assert!((strength_from_alignment(0.99) - 0.366).abs() < 0.01);
        assert_eq!(strength_from_alignment(1.0), 1.0);
        assert_eq!(strength_from_alignment(0.0), 0.0);
    }

    #[test]
    fn reveal_curve_is_monotonic() {
        let mut previous = 0.0;
        for step in 0..=1000 {
            let strength = strength_from_alignment(step as f32 / 1000.0);
            assert!(strength >= previous);
            previous = strength;
        }
    }

    #[test]
    fn face_on_view_reveals_nothing() {
        let view = Vector3::z_axis();
        let strength = compute_reveal_strength(&view, &UnitQuaternion::identity());
        // Face-on, every diagonal sits at 1/sqrt(3).
        assert!(strength < 1e-20);
        assert_eq!(RevealLevel::from_strength(strength), RevealLevel::Opaque);
    }

    #[test]
    fn levels_and_opacity_targets() {
        assert_eq!(RevealLevel::from_strength(0.999), RevealLevel::Full);
        assert_eq!(RevealLevel::from_strength(0.995), RevealLevel::Hint);
        assert_eq!(RevealLevel::from_strength(0.96), RevealLevel::Hint);
        assert_eq!(RevealLevel::from_strength(0.95), RevealLevel::Opaque);
        assert_eq!(RevealLevel::Full.opacity_target(), 0.0);
        assert_eq!(RevealLevel::Hint.opacity_target(), 0.1);
        assert_eq!(RevealLevel::Opaque.opacity_target(), 1.0);
    }

    #[test]
    fn hint_shades_front_and_back_edges() {
        let rotation = UnitQuaternion::identity();
        // Looking from +Z toward the origin.
        let view = Unit::new_normalize(Vector3::new(0.0, 0.0, -1.0));
        let colors = edge_colors(RevealLevel::Hint, &view, &rotation);
        for (i, edge) in EDGES.iter().enumerate() {
            let midpoint = edge_midpoint(*edge);
            if midpoint.z > 0.0 {
                assert_eq!(colors[i], color_from_hex(HINT_FRONT), "edge {edge:?}");
            } else if midpoint.z < 0.0 {
                assert_eq!(colors[i], color_from_hex(HINT_BACK), "edge {edge:?}");
            }
        }
        assert_eq!(
            edge_colors(RevealLevel::Full, &view, &rotation),
            [color_from_hex(GOLD); 12]
        );
    }

    #[test]
    fn auto_rotate_suppresses_detection() {
        let rotation = UnitQuaternion::identity();
        let view = corner_view(&rotation, 7);
        let mut detector = AlignmentDetector::new();
        for ms in (0..5000).step_by(100) {
            let frame = detector.update(Duration::from_millis(ms), &view, &rotation, true);
            assert_eq!(frame.strength, 0.0);
            assert!(!frame.unlocked);
        }
    }

    #[test]
    fn unlock_fires_once_after_two_seconds_of_hold() {
        let rotation = UnitQuaternion::identity();
        let view = corner_view(&rotation, 3);
        let mut detector = AlignmentDetector::new();

        let mut fired_at = Vec::new();
        for ms in (0..=4000).step_by(100) {
            let now = Duration::from_millis(ms);
            if detector.update(now, &view, &rotation, false).unlocked {
                fired_at.push(ms);
            }
        }
        assert_eq!(fired_at, vec![2000]);
    }

    #[test]
    fn losing_alignment_restarts_the_hold() {
        let rotation = UnitQuaternion::identity();
        let aligned = corner_view(&rotation, 0);
        let off = Vector3::x_axis();
        let mut detector = AlignmentDetector::new();

        detector.update(Duration::from_millis(0), &aligned, &rotation, false);
        detector.update(Duration::from_millis(1900), &aligned, &rotation, false);
        detector.update(Duration::from_millis(1950), &off, &rotation, false);
        let frame = detector.update(Duration::from_millis(2100), &aligned, &rotation, false);
        assert!(!frame.unlocked);
        let frame = detector.update(Duration::from_millis(4100), &aligned, &rotation, false);
        assert!(frame.unlocked);
    }
}
