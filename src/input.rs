//! Button gesture detection.
//!
//! The button is wired with a pull-up, so a high level (`true`) means
//! released. The state machine is polled once per control tick with the
//! raw level and turns press/release timing into gestures:
//!
//! | Gesture | Condition                         |
//! |---------|-----------------------------------|
//! | `Short` | released after less than the hold threshold |
//! | `Long`  | released after at least the hold threshold  |
//! | `None`  | anything else                     |
//!
//! A level change is only accepted once it has been seen continuously for
//! the settle window. Press and release times are taken from the first
//! tick that saw the new level, so the settle delay does not skew the
//! measured hold time.

use std::time::{Duration, Instant};
use tracing::trace;

use crate::config::{HOLD_THRESHOLD, SETTLE_WINDOW};

/// Button level while released (pull-up).
pub const RELEASED: bool = true;

/// Button level while pressed.
pub const PRESSED: bool = false;

/// Gesture produced by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// Press released before the hold threshold.
    Short,
    /// Press held for at least the hold threshold.
    Long,
    /// No gesture this tick.
    #[default]
    None,
}

/// Press tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// No press in progress.
    Idle,
    /// Press in progress since the given instant.
    Pressed {
        /// When the press was first seen.
        since: Instant,
    },
}

/// Debounced short/long press detector.
#[derive(Debug, Clone)]
pub struct InputStateMachine {
    hold_threshold: Duration,
    settle_window: Duration,
    /// Last accepted level.
    stable_level: bool,
    /// Level differing from `stable_level` and when it was first seen.
    pending: Option<(bool, Instant)>,
    state: ButtonState,
}

impl InputStateMachine {
    /// Create a detector with the default hold threshold and settle window.
    ///
    /// `initial_level` is the level read at startup. A button already held
    /// at startup produces no gesture when released.
    pub fn new(initial_level: bool) -> Self {
        Self {
            hold_threshold: HOLD_THRESHOLD,
            settle_window: SETTLE_WINDOW,
            stable_level: initial_level,
            pending: None,
            state: ButtonState::Idle,
        }
    }

    /// Override the hold threshold and settle window.
    ///
    /// A zero settle window accepts every level change on the tick it is seen.
    pub fn with_timing(mut self, hold_threshold: Duration, settle_window: Duration) -> Self {
        self.hold_threshold = hold_threshold;
        self.settle_window = settle_window;
        self
    }

    /// Current press state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Check if a press is in progress.
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, ButtonState::Pressed { .. })
    }

    /// Feed one raw level sample taken at `now`.
    pub fn poll(&mut self, level: bool, now: Instant) -> InputEvent {
        if level == self.stable_level {
            self.pending = None;
            return InputEvent::None;
        }

        let first_seen = match self.pending {
            Some((pending_level, since)) if pending_level == level => since,
            _ => {
                self.pending = Some((level, now));
                now
            }
        };

        if now.duration_since(first_seen) < self.settle_window {
            return InputEvent::None;
        }

        self.pending = None;
        self.stable_level = level;
        self.on_edge(level, first_seen)
    }

    fn on_edge(&mut self, level: bool, at: Instant) -> InputEvent {
        match self.state {
            ButtonState::Idle if level == PRESSED => {
                trace!("Button pressed");
                self.state = ButtonState::Pressed { since: at };
                InputEvent::None
            }
            ButtonState::Pressed { since } if level == RELEASED => {
                self.state = ButtonState::Idle;
                let held = at.duration_since(since);
                trace!("Button released after {:?}", held);
                if held >= self.hold_threshold {
                    InputEvent::Long
                } else {
                    InputEvent::Short
                }
            }
            _ => InputEvent::None,
        }
    }
}
