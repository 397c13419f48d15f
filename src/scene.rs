//! Scene state and the controller that owns every gate.
//!
//! `SceneController` is the only thing allowed to mutate `SceneState`. The
//! host feeds it frames and clicks; it routes each click to the gate of the
//! tableau on screen and turns gate successes into unlock flags.

use std::fmt;
use std::time::Duration;

use chrono::Timelike;
use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::alignment::{AlignmentDetector, AlignmentFrame};
use crate::breath::BreathCycleGate;
use crate::clock_gate::ClockSecretGate;
use crate::sequence::SequenceGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tableau {
    Cube,
    Saturn,
    Triangle,
    Flower,
}

impl Tableau {
    pub(crate) const ALL: [Tableau; 4] = [
        Tableau::Cube,
        Tableau::Saturn,
        Tableau::Triangle,
        Tableau::Flower,
    ];
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tableau::Cube => write!(f, "Cube"),
            Tableau::Saturn => write!(f, "Saturn"),
            Tableau::Triangle => write!(f, "Triangle"),
            Tableau::Flower => write!(f, "Flower of Life"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Secret {
    Cube,
    Saturn,
    Trinity,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SceneState {
    pub(crate) active_tableau: Tableau,
    pub(crate) auto_rotate: bool,
    pub(crate) cube_secret_unlocked: bool,
    pub(crate) saturn_secret_unlocked: bool,
    pub(crate) trinity_secret_unlocked: bool,
    /// Normalized pointer position, both axes in [-1, 1], y up.
    pub(crate) pointer_x: f32,
    pub(crate) pointer_y: f32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            active_tableau: Tableau::Cube,
            auto_rotate: true,
            cube_secret_unlocked: false,
            saturn_secret_unlocked: false,
            trinity_secret_unlocked: false,
            pointer_x: 0.0,
            pointer_y: 0.0,
        }
    }
}

impl SceneState {
    pub(crate) fn is_unlocked(&self, secret: Secret) -> bool {
        match secret {
            Secret::Cube => self.cube_secret_unlocked,
            Secret::Saturn => self.saturn_secret_unlocked,
            Secret::Trinity => self.trinity_secret_unlocked,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SceneController {
    state: SceneState,
    magic: bool,
    alignment: AlignmentDetector,
    last_alignment: AlignmentFrame,
    clock: ClockSecretGate,
    breath: BreathCycleGate,
    sequence: SequenceGate,
}

impl SceneController {
    pub(crate) fn new() -> Self {
        Self {
            state: SceneState::default(),
            magic: false,
            alignment: AlignmentDetector::new(),
            last_alignment: AlignmentFrame::default(),
            clock: ClockSecretGate::new(),
            breath: BreathCycleGate::new(),
            sequence: SequenceGate::new(),
        }
    }

    pub(crate) fn state(&self) -> &SceneState {
        &self.state
    }

    pub(crate) fn alignment(&self) -> &AlignmentFrame {
        &self.last_alignment
    }

    pub(crate) fn clock(&self) -> &ClockSecretGate {
        &self.clock
    }

    pub(crate) fn breath(&self) -> &BreathCycleGate {
        &self.breath
    }

    pub(crate) fn sequence(&self) -> &SequenceGate {
        &self.sequence
    }

    pub(crate) fn is_magic(&self) -> bool {
        self.magic
    }

    /// Out-of-band bypass: unlocks every secret without touching any gate.
    pub(crate) fn enable_magic(&mut self) {
        log::info!("magic word accepted, all secrets unlocked");
        self.magic = true;
        self.state.cube_secret_unlocked = true;
        self.state.saturn_secret_unlocked = true;
        self.state.trinity_secret_unlocked = true;
    }

    /// Restores the initial state; the only way an unlock flag goes back to false.
    pub(crate) fn reset(&mut self) {
        log::info!("scene reset");
        *self = Self::new();
    }

    /// Whether the navigation control for `tableau` should be offered.
    pub(crate) fn is_available(&self, tableau: Tableau) -> bool {
        if self.magic {
            return true;
        }
        match tableau {
            Tableau::Cube => true,
            Tableau::Saturn => self.state.cube_secret_unlocked,
            Tableau::Triangle => self.state.saturn_secret_unlocked,
            Tableau::Flower => self.state.trinity_secret_unlocked,
        }
    }

    /// Switches the visible tableau. Unlock flags are left alone.
    pub(crate) fn show(&mut self, tableau: Tableau) {
        log::info!("showing {tableau}");
        self.state.active_tableau = tableau;

        match tableau {
            Tableau::Cube => {}
            Tableau::Saturn => {
                if !self.clock.is_unlocked() {
                    self.clock = ClockSecretGate::new();
                }
            }
            Tableau::Triangle => self.breath.restart(),
            Tableau::Flower => self.sequence.clear_progress(),
        }
    }

    pub(crate) fn toggle_auto_rotate(&mut self) {
        self.set_auto_rotate(!self.state.auto_rotate);
    }

    /// Only the cube rotates; the flag is left untouched elsewhere.
    pub(crate) fn set_auto_rotate(&mut self, auto_rotate: bool) {
        if self.state.active_tableau != Tableau::Cube {
            log::debug!("auto-rotate ignored outside the cube tableau");
            return;
        }
        self.state.auto_rotate = auto_rotate;
        if !auto_rotate {
            log::debug!("manual rotation");
        }
    }

    pub(crate) fn set_pointer(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.state.pointer_x = x.clamp(-1.0, 1.0);
        self.state.pointer_y = y.clamp(-1.0, 1.0);
    }

    /// Sets an unlock flag. Returns `true` if it was not already set.
    pub(crate) fn unlock(&mut self, secret: Secret) -> bool {
        let flag = match secret {
            Secret::Cube => &mut self.state.cube_secret_unlocked,
            Secret::Saturn => &mut self.state.saturn_secret_unlocked,
            Secret::Trinity => &mut self.state.trinity_secret_unlocked,
        };
        if *flag {
            return false;
        }
        *flag = true;
        log::info!("{secret:?} secret unlocked");
        true
    }

    /// Per-frame work for the active tableau.
    pub(crate) fn tick(
        &mut self,
        now: Duration,
        view_direction: &Unit<Vector3<f32>>,
        cube_rotation: &UnitQuaternion<f32>,
    ) {
        match self.state.active_tableau {
            Tableau::Cube => {
                let frame = self.alignment.update(
                    now,
                    view_direction,
                    cube_rotation,
                    self.state.auto_rotate,
                );
                if frame.unlocked {
                    self.unlock(Secret::Cube);
                }
                self.last_alignment = frame;
            }
            Tableau::Saturn => {}
            Tableau::Triangle => {
                self.breath.update(now);
            }
            Tableau::Flower => self.sequence.update(now),
        }
    }

    /// A click or tap on the viewport.
    ///
    /// `target` is the flower target under the pointer, if any; the other
    /// tableaux ignore it.
    pub(crate) fn on_press(
        &mut self,
        now: Duration,
        wall_clock: &impl Timelike,
        target: Option<u32>,
    ) {
        match self.state.active_tableau {
            Tableau::Cube => {}
            Tableau::Saturn => {
                if self.clock.on_action_attempt(wall_clock).unlocked {
                    self.unlock(Secret::Saturn);
                }
            }
            Tableau::Triangle => {
                if self.breath.on_action_attempt(now).trinity_achieved {
                    self.unlock(Secret::Trinity);
                }
            }
            Tableau::Flower => {
                let Some(id) = target else {
                    return;
                };
                self.sequence.on_target_clicked(id);
            }
        }
    }
}
