//! Stick-gesture arming mechanism

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the arming gesture detector.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ArmingParams {
    /// Channel A (thrust) position below which the gesture is active.
    pub a_low: f64,

    /// Channel B (steering) position below which the gesture selects arm.
    pub b_left: f64,

    /// Channel B (steering) position above which the gesture selects disarm.
    pub b_right: f64,

    /// Time the gesture must be held continuously before a transition fires.
    ///
    /// Units: seconds
    pub hold_s: f64,
}

/// Debounced detector for the pilot arm/disarm gesture.
///
/// The conventional gesture is thrust low with the steering stick held at an
/// extreme. Transitions are edge-triggered: one event per continuous hold,
/// and any momentary break in the gesture resets the hold timer.
#[derive(Clone, Copy, Debug)]
pub struct ArmingMechanism {
    params: ArmingParams,

    /// The gesture currently being held, if any.
    held: Option<ArmingEvent>,

    /// How long the current gesture has been held.
    ///
    /// Units: seconds
    hold_timer_s: f64,

    /// Set once the held gesture has fired, until the gesture breaks.
    fired: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A detected arming transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmingEvent {
    Arm,
    Disarm,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmingParams {
    fn default() -> Self {
        Self {
            a_low: 0.1,
            b_left: -0.9,
            b_right: 0.9,
            hold_s: 0.5,
        }
    }
}

impl Default for ArmingMechanism {
    fn default() -> Self {
        Self::new(ArmingParams::default())
    }
}

impl ArmingMechanism {
    /// Create a new mechanism with no gesture held.
    pub fn new(params: ArmingParams) -> Self {
        Self {
            params,
            held: None,
            hold_timer_s: 0f64,
            fired: false,
        }
    }

    /// Update the detector with the current channel positions.
    ///
    /// Returns a transition once the gesture has been held for the full
    /// debounce window, and `None` on every other call.
    pub fn update(&mut self, a_pos: f64, b_pos: f64, dt_s: f64) -> Option<ArmingEvent> {
        let gesture = if a_pos < self.params.a_low && b_pos < self.params.b_left {
            Some(ArmingEvent::Arm)
        } else if a_pos < self.params.a_low && b_pos > self.params.b_right {
            Some(ArmingEvent::Disarm)
        } else {
            None
        };

        // A change of gesture (including any break) restarts the debounce
        if gesture != self.held {
            self.held = gesture;
            self.hold_timer_s = 0f64;
            self.fired = false;
        }

        match self.held {
            Some(event) if !self.fired => {
                self.hold_timer_s += dt_s;

                if self.hold_timer_s >= self.params.hold_s {
                    self.fired = true;
                    Some(event)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Drop any gesture in progress, used when arming is refused.
    pub fn reset(&mut self) {
        self.held = None;
        self.hold_timer_s = 0f64;
        self.fired = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn mechanism() -> ArmingMechanism {
        ArmingMechanism::new(ArmingParams::default())
    }

    #[test]
    fn test_arm_after_hold() {
        let mut arm = mechanism();

        // 24 ticks is 0.48 s, just short of the window
        for _ in 0..24 {
            assert_eq!(arm.update(0.0, -1.0, DT), None);
        }

        assert_eq!(arm.update(0.0, -1.0, DT), Some(ArmingEvent::Arm));
    }

    #[test]
    fn test_edge_triggered() {
        let mut arm = mechanism();

        for _ in 0..25 {
            arm.update(0.0, -1.0, DT);
        }

        // Continuing to hold must not fire again
        for _ in 0..100 {
            assert_eq!(arm.update(0.0, -1.0, DT), None);
        }
    }

    #[test]
    fn test_break_resets_timer() {
        let mut arm = mechanism();

        for _ in 0..20 {
            arm.update(0.0, -1.0, DT);
        }

        // One tick off the gesture
        arm.update(0.0, 0.0, DT);

        // The full window is required again
        for _ in 0..24 {
            assert_eq!(arm.update(0.0, -1.0, DT), None);
        }
        assert_eq!(arm.update(0.0, -1.0, DT), Some(ArmingEvent::Arm));
    }

    #[test]
    fn test_disarm_gesture() {
        let mut arm = mechanism();

        for _ in 0..24 {
            assert_eq!(arm.update(0.0, 1.0, DT), None);
        }
        assert_eq!(arm.update(0.0, 1.0, DT), Some(ArmingEvent::Disarm));
    }

    #[test]
    fn test_thrust_high_blocks_gesture() {
        let mut arm = mechanism();

        for _ in 0..50 {
            assert_eq!(arm.update(0.5, -1.0, DT), None);
        }
    }
}
