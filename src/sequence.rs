//! Flower of Life click sequence and the Metatron's Cube overlay.
//!
//! Thirteen circles sit on a center point and two hexagonal rings. Clicking
//! them in `ORDER` completes the pattern; any wrong click starts over.

use std::f32::consts::FRAC_PI_3;
use std::time::Duration;

use nalgebra::Point2;

/// Center, then alternate picks around the inner ring, then the outer ring.
pub(crate) const ORDER: [u32; 13] = [0, 1, 3, 5, 2, 4, 6, 7, 9, 11, 8, 10, 12];

pub(crate) const TARGET_COUNT: usize = ORDER.len();
/// Radius of each target circle in flower-plane units.
pub(crate) const TARGET_RADIUS: f32 = 0.5;
const INNER_RING_RADIUS: f32 = 1.0;
const OUTER_RING_RADIUS: f32 = 2.0;

const DIMMED_OPACITY: f32 = 0.3;
const OVERLAY_DELAY: Duration = Duration::from_secs(1);

/// Target centers by id: 0 at the origin, 1..=6 on the inner ring and
/// 7..=12 on the outer ring, both starting at angle 0 and stepping 60°.
pub(crate) fn target_centers() -> [Point2<f32>; TARGET_COUNT] {
    std::array::from_fn(|id| {
        if id == 0 {
            return Point2::origin();
        }
        let (radius, slot) = if id <= 6 {
            (INNER_RING_RADIUS, id - 1)
        } else {
            (OUTER_RING_RADIUS, id - 7)
        };
        let angle = slot as f32 * FRAC_PI_3;
        Point2::new(radius * angle.cos(), radius * angle.sin())
    })
}

/// Resolves a point on the flower plane to the nearest target containing it.
pub(crate) fn target_at(point: Point2<f32>) -> Option<u32> {
    target_centers()
        .iter()
        .enumerate()
        .map(|(id, center)| (id, nalgebra::distance(center, &point)))
        .filter(|&(_, distance)| distance <= TARGET_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id as u32)
}

/// Every pair of target centers, joined: the 78 segments of Metatron's Cube.
pub(crate) fn metatron_segments() -> Vec<(Point2<f32>, Point2<f32>)> {
    let centers = target_centers();
    let mut segments = Vec::with_capacity(TARGET_COUNT * (TARGET_COUNT - 1) / 2);
    for (i, a) in centers.iter().enumerate() {
        for b in &centers[i + 1..] {
            segments.push((*a, *b));
        }
    }
    segments
}

/// Outcome of clicking a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SequenceAttempt {
    pub(crate) accepted: bool,
    pub(crate) completed: bool,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SequenceGate {
    clicks_received: Vec<u32>,
    completed: bool,
    overlay_at: Option<Duration>,
    overlay_visible: bool,
}

impl SequenceGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clicks_received(&self) -> &[u32] {
        &self.clicks_received
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Drops partial progress. A completed pattern stays completed.
    pub(crate) fn clear_progress(&mut self) {
        if !self.completed {
            self.clicks_received.clear();
        }
    }

    pub(crate) fn on_target_clicked(&mut self, id: u32) -> SequenceAttempt {
        if self.completed {
            return SequenceAttempt {
                accepted: false,
                completed: true,
            };
        }

        let expected = ORDER[self.clicks_received.len()];
        if id != expected {
            log::debug!(
                "sequence broken at step {}: expected {expected}, got {id}",
                self.clicks_received.len()
            );
            self.clicks_received.clear();
            return SequenceAttempt {
                accepted: false,
                completed: false,
            };
        }

        self.clicks_received.push(id);
        if self.clicks_received.len() == ORDER.len() {
            self.completed = true;
            log::info!("flower of life sequence complete");
        }

        SequenceAttempt {
            accepted: true,
            completed: self.completed,
        }
    }

    /// Per-frame update; schedules and then reveals the overlay after completion.
    pub(crate) fn update(&mut self, now: Duration) {
        if !self.completed || self.overlay_visible {
            return;
        }
        let reveal_at = *self.overlay_at.get_or_insert(now + OVERLAY_DELAY);
        if now >= reveal_at {
            self.overlay_visible = true;
            log::info!("metatron overlay revealed");
        }
    }

    /// Opacity of a target circle: hidden once complete, dimmed once accepted.
    pub(crate) fn target_opacity(&self, id: u32) -> f32 {
        if self.completed {
            0.0
        } else if self.clicks_received.contains(&id) {
            DIMMED_OPACITY
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_a_permutation() {
        let mut sorted = ORDER;
        sorted.sort_unstable();
        assert_eq!(sorted, std::array::from_fn::<u32, 13, _>(|i| i as u32));
    }

    #[test]
    fn layout_rings() {
        let centers = target_centers();
        assert_eq!(centers[0], Point2::origin());
        for id in 1..=6 {
            assert!((centers[id].coords.norm() - 1.0).abs() < 1e-5);
        }
        for id in 7..=12 {
            assert!((centers[id].coords.norm() - 2.0).abs() < 1e-5);
        }
        assert!((centers[1].x - 1.0).abs() < 1e-6);
        assert!((centers[7].x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn hit_testing() {
        assert_eq!(target_at(Point2::new(0.1, -0.1)), Some(0));
        assert_eq!(target_at(Point2::new(1.9, 0.05)), Some(7));
        assert_eq!(target_at(Point2::new(0.55, 0.0)), Some(1));
        assert_eq!(target_at(Point2::new(5.0, 5.0)), None);
    }

    #[test]
    fn metatron_joins_every_pair() {
        assert_eq!(metatron_segments().len(), 78);
    }

    #[test]
    fn completes_only_on_the_thirteenth_click() {
        let mut gate = SequenceGate::new();
        for (step, &id) in ORDER.iter().enumerate() {
            let attempt = gate.on_target_clicked(id);
            assert!(attempt.accepted);
            assert_eq!(attempt.completed, step == ORDER.len() - 1);
        }
        assert!(gate.is_completed());
        assert_eq!(gate.clicks_received(), &ORDER);
    }

    #[test]
    fn wrong_click_clears_progress() {
        let mut gate = SequenceGate::new();
        gate.on_target_clicked(0);
        gate.on_target_clicked(1);
        let wrong = gate.on_target_clicked(2);
        assert!(!wrong.accepted);
        assert!(gate.clicks_received().is_empty());
        assert_eq!(gate.target_opacity(0), 1.0);
    }

    #[test]
    fn out_of_range_ids_are_wrong_clicks() {
        let mut gate = SequenceGate::new();
        gate.on_target_clicked(0);
        assert!(!gate.on_target_clicked(99).accepted);
        assert!(!gate.on_target_clicked(u32::MAX).accepted);
        assert!(gate.clicks_received().is_empty());
    }

    #[test]
    fn accepted_targets_dim() {
        let mut gate = SequenceGate::new();
        gate.on_target_clicked(0);
        assert_eq!(gate.target_opacity(0), DIMMED_OPACITY);
        assert_eq!(gate.target_opacity(1), 1.0);
    }

    #[test]
    fn nothing_is_accepted_after_completion() {
        let mut gate = SequenceGate::new();
        for id in ORDER {
            gate.on_target_clicked(id);
        }
        let after = gate.on_target_clicked(0);
        assert!(!after.accepted && after.completed);
        assert_eq!(gate.clicks_received().len(), 13);
        gate.clear_progress();
        assert!(gate.is_completed());
        assert_eq!(gate.target_opacity(5), 0.0);
    }

    #[test]
    fn overlay_appears_after_delay() {
        let mut gate = SequenceGate::new();
        gate.update(Duration::from_secs(1));
        assert!(!gate.overlay_visible());

        for id in ORDER {
            gate.on_target_clicked(id);
        }
        gate.update(Duration::from_millis(5000));
        assert!(!gate.overlay_visible());
        gate.update(Duration::from_millis(5999));
        assert!(!gate.overlay_visible());
        gate.update(Duration::from_millis(6000));
        assert!(gate.overlay_visible());
    }
}
