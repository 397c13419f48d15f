//! Saturn's secret: three clicks, each on a wall-clock second that shows a 6.

use chrono::Timelike;

const STRIKES_TO_UNLOCK: u8 = 3;

/// Outcome of a single click on the Saturn tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockAttempt {
    pub(crate) advanced: bool,
    pub(crate) unlocked: bool,
}

/// Whether the two-digit rendering of `second` contains a 6.
fn shows_six(second: u32) -> bool {
    format!("{second:02}").contains('6')
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ClockSecretGate {
    counter: u8,
    last_second_seen: Option<u32>,
    unlocked: bool,
}

impl ClockSecretGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn counter(&self) -> u8 {
        self.counter
    }

    pub(crate) fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Ring glow in [0, 1], one third per strike.
    pub(crate) fn emissive_intensity(&self) -> f32 {
        if self.unlocked {
            1.0
        } else {
            f32::from(self.counter) / f32::from(STRIKES_TO_UNLOCK)
        }
    }

    /// Registers a click made at wall-clock time `now`.
    ///
    /// Once unlocked the gate is terminal and ignores further clicks.
    pub(crate) fn on_action_attempt(&mut self, now: &impl Timelike) -> ClockAttempt {
        if self.unlocked {
            return ClockAttempt {
                advanced: false,
                unlocked: true,
            };
        }

        let second = now.second();
        if !shows_six(second) {
            if self.counter > 0 {
                log::debug!("clock gate reset at :{second:02}");
            }
            self.counter = 0;
            self.last_second_seen = Some(second);
            return ClockAttempt {
                advanced: false,
                unlocked: false,
            };
        }

        if self.last_second_seen == Some(second) {
            log::debug!("clock gate already credited :{second:02}");
            return ClockAttempt {
                advanced: false,
                unlocked: false,
            };
        }

        self.counter += 1;
        self.last_second_seen = Some(second);
        log::debug!("clock gate strike {} at :{second:02}", self.counter);

        if self.counter >= STRIKES_TO_UNLOCK {
            self.unlocked = true;
            log::info!("clock gate unlocked");
        }

        ClockAttempt {
            advanced: true,
            unlocked: self.unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(second: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(21, 4, second).unwrap()
    }

    #[test]
    fn seconds_with_a_six() {
        let sixes: Vec<u32> = (0..60).filter(|s| shows_six(*s)).collect();
        assert_eq!(sixes, vec![6, 16, 26, 36, 46, 56]);
    }

    #[test]
    fn three_strikes_unlock() {
        let mut gate = ClockSecretGate::new();
        let first = gate.on_action_attempt(&at(6));
        assert!(first.advanced && !first.unlocked);
        assert_eq!(gate.counter(), 1);

        gate.on_action_attempt(&at(16));
        assert_eq!(gate.counter(), 2);

        let third = gate.on_action_attempt(&at(26));
        assert_eq!(
            third,
            ClockAttempt {
                advanced: true,
                unlocked: true
            }
        );
        assert_eq!(gate.counter(), 3);
        assert!(gate.is_unlocked());
        assert_eq!(gate.emissive_intensity(), 1.0);
    }

    #[test]
    fn same_second_counts_once() {
        let mut gate = ClockSecretGate::new();
        assert!(gate.on_action_attempt(&at(6)).advanced);
        assert!(!gate.on_action_attempt(&at(6)).advanced);
        assert_eq!(gate.counter(), 1);
    }

    #[test]
    fn a_second_without_six_resets() {
        let mut gate = ClockSecretGate::new();
        gate.on_action_attempt(&at(6));
        gate.on_action_attempt(&at(16));
        assert_eq!(gate.counter(), 2);

        let miss = gate.on_action_attempt(&at(5));
        assert!(!miss.advanced);
        assert_eq!(gate.counter(), 0);
        assert_eq!(gate.emissive_intensity(), 0.0);

        // The reset clears the duplicate guard for :06 as well.
        assert!(gate.on_action_attempt(&at(6)).advanced);
    }

    #[test]
    fn repeated_misses_stay_at_zero() {
        let mut gate = ClockSecretGate::new();
        for second in [1, 2, 3, 59, 0, 45] {
            gate.on_action_attempt(&at(second));
            assert_eq!(gate.counter(), 0);
        }
    }

    #[test]
    fn unlocked_gate_is_terminal() {
        let mut gate = ClockSecretGate::new();
        for second in [6, 16, 26] {
            gate.on_action_attempt(&at(second));
        }
        let after = gate.on_action_attempt(&at(5));
        assert!(after.unlocked && !after.advanced);
        assert_eq!(gate.counter(), 3);
    }
}
