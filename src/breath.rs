//! The triangle's breathing cycle and its rhythm gate.
//!
//! A six-second sine cycle drives the triangle's color. Three clicks, each
//! landing on the inhale peak of a different cycle, complete the trinity.

use std::f64::consts::TAU;
use std::fmt;
use std::time::Duration;

use iced::Color;

use crate::math::lerp_color;

const CYCLE_SECONDS: f64 = 6.0;
const INHALE_SECONDS: f64 = 3.0;
/// Click window around the inhale peak at 1.5 s.
const PEAK_WINDOW_START: f64 = 1.3;
const PEAK_WINDOW_END: f64 = 1.7;
const HITS_FOR_TRINITY: u8 = 3;
const GLOW_DURATION: Duration = Duration::from_millis(500);

const EXHALED_COLOR: u32 = 0x333333;
const INHALED_COLOR: u32 = 0xFFFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreathPhase {
    Inhale,
    Exhale,
}

impl fmt::Display for BreathPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreathPhase::Inhale => write!(f, "inhale"),
            BreathPhase::Exhale => write!(f, "exhale"),
        }
    }
}

/// Outcome of a click on the triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BreathAttempt {
    pub(crate) success: bool,
    pub(crate) trinity_achieved: bool,
}

impl BreathAttempt {
    const MISS: Self = Self {
        success: false,
        trinity_achieved: false,
    };
}

#[derive(Debug, Clone)]
pub(crate) struct BreathCycleGate {
    /// Anchored by the first `update` after the gate is (re)started.
    cycle_start: Option<Duration>,
    counter: u8,
    last_success_cycle: Option<u64>,
    glow_expires_at: Option<Duration>,
    phase: BreathPhase,
    intensity: f32,
}

impl Default for BreathCycleGate {
    fn default() -> Self {
        Self {
            cycle_start: None,
            counter: 0,
            last_success_cycle: None,
            glow_expires_at: None,
            phase: BreathPhase::Inhale,
            intensity: 0.5,
        }
    }
}

impl BreathCycleGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Forgets the anchor and all progress; the next `update` starts a fresh cycle.
    pub(crate) fn restart(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn counter(&self) -> u8 {
        self.counter
    }

    pub(crate) fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Breath signal in [0, 1], peaking at 1.5 s into each cycle.
    pub(crate) fn intensity(&self) -> f32 {
        self.intensity
    }

    pub(crate) fn glow_active(&self) -> bool {
        self.glow_expires_at.is_some()
    }

    /// Triangle color for the current intensity.
    pub(crate) fn color(&self) -> Color {
        lerp_color(EXHALED_COLOR, INHALED_COLOR, self.intensity)
    }

    fn elapsed_seconds(&self, now: Duration) -> Option<f64> {
        self.cycle_start
            .map(|start| now.saturating_sub(start).as_secs_f64())
    }

    /// Per-frame update: anchors the cycle, recomputes phase and intensity,
    /// and expires the glow.
    pub(crate) fn update(&mut self, now: Duration) -> BreathPhase {
        let start = *self.cycle_start.get_or_insert(now);
        let elapsed = now.saturating_sub(start).as_secs_f64();
        let phase_time = elapsed % CYCLE_SECONDS;

        self.phase = if phase_time < INHALE_SECONDS {
            BreathPhase::Inhale
        } else {
            BreathPhase::Exhale
        };
        self.intensity = (0.5 + 0.5 * (TAU * elapsed / CYCLE_SECONDS).sin()) as f32;

        if self.glow_expires_at.is_some_and(|deadline| now >= deadline) {
            self.glow_expires_at = None;
        }

        log::trace!("breath {} at {phase_time:.2}s", self.phase);
        self.phase
    }

    /// Registers a click at time `now`.
    pub(crate) fn on_action_attempt(&mut self, now: Duration) -> BreathAttempt {
        let Some(elapsed) = self.elapsed_seconds(now) else {
            // No frame has anchored the cycle yet.
            self.miss();
            return BreathAttempt::MISS;
        };

        let phase_time = elapsed % CYCLE_SECONDS;
        let cycle = (elapsed / CYCLE_SECONDS).floor() as u64;
        let in_window = (PEAK_WINDOW_START..=PEAK_WINDOW_END).contains(&phase_time);

        if !in_window || self.last_success_cycle == Some(cycle) {
            log::debug!("breath miss at {phase_time:.2}s of cycle {cycle}");
            self.miss();
            return BreathAttempt::MISS;
        }

        self.last_success_cycle = Some(cycle);
        self.counter += 1;
        self.glow_expires_at = Some(now + GLOW_DURATION);
        log::debug!("breath hit {} in cycle {cycle}", self.counter);

        let trinity_achieved = self.counter >= HITS_FOR_TRINITY;
        if trinity_achieved {
            self.counter = 0;
            log::info!("breath trinity achieved");
        }

        BreathAttempt {
            success: true,
            trinity_achieved,
        }
    }

    fn miss(&mut self) {
        self.counter = 0;
        self.glow_expires_at = None;
    }
}
