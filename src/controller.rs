//! Cook controller.
//!
//! Owns the session state (selected meat, menu flag) and the per-meat
//! targets. Gestures switch meats or cycle targets; temperature samples
//! are classified and compared against the current meat's target to drive
//! the buzzer and spoken alerts.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::alert::AlertSink;
use crate::data::{classify, MeatType, TargetState, TemperatureSample, Tier};
use crate::hardware::Buzzer;
use crate::input::InputEvent;

/// When the target alert is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertPolicy {
    /// Speak on every evaluation while at or above target.
    #[default]
    LevelTriggered,
    /// Speak once per crossing. Re-arms when the temperature drops below
    /// target, the meat changes or the target is cycled.
    EdgeTriggered,
}

/// Mutable session state. Nothing here survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CookSessionState {
    /// Currently selected meat.
    pub meat: MeatType,
    /// Whether short presses cycle the target instead of the meat.
    pub menu_open: bool,
}

/// Turns gestures and temperature samples into state changes and alerts.
pub struct CookController {
    session: CookSessionState,
    targets: TargetState,
    alert: Arc<dyn AlertSink>,
    buzzer: Buzzer,
    policy: AlertPolicy,
    /// Target already announced under [`AlertPolicy::EdgeTriggered`].
    target_announced: bool,
    started_at: Instant,
}

impl CookController {
    /// Create a controller with default session state and every target at
    /// its default tier.
    pub fn new(session: CookSessionState, alert: Arc<dyn AlertSink>, buzzer: Buzzer) -> Self {
        Self {
            session,
            targets: TargetState::new(),
            alert,
            buzzer,
            policy: AlertPolicy::default(),
            target_announced: false,
            started_at: Instant::now(),
        }
    }

    /// Set the alert policy.
    pub fn with_alert_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current session state.
    pub fn session(&self) -> &CookSessionState {
        &self.session
    }

    /// Per-meat targets.
    pub fn targets(&self) -> &TargetState {
        &self.targets
    }

    /// Target tier of the selected meat.
    pub fn current_target(&self) -> Tier {
        self.targets.current_target(self.session.meat)
    }

    /// Check if the buzzer is currently sounding.
    pub fn buzzer_on(&self) -> bool {
        self.buzzer.is_on()
    }

    /// Handle one input gesture.
    pub fn tick(&mut self, event: InputEvent, now: Instant) {
        if event == InputEvent::None {
            return;
        }
        debug!(
            "Gesture {:?} at +{:.2}s",
            event,
            now.saturating_duration_since(self.started_at).as_secs_f64()
        );

        match (event, self.session.menu_open) {
            (InputEvent::Long, _) => self.toggle_menu(),
            (InputEvent::Short, false) => self.switch_meat(),
            (InputEvent::Short, true) => self.cycle_target(),
            (InputEvent::None, _) => {}
        }
    }

    /// Evaluate one temperature sample against the selected meat's target.
    pub fn on_temperature(&mut self, sample: TemperatureSample) {
        let meat = self.session.meat;

        let Some(temperature_f) = sample.fahrenheit() else {
            warn!("[{}] Sensor not ready.", meat);
            self.buzzer.off();
            return;
        };

        info!(
            "[{}] {:.1}°F -> {}",
            meat,
            temperature_f,
            classify(meat, temperature_f)
        );

        let target = self.current_target();
        if temperature_f >= target.cutoff_f {
            let speak = match self.policy {
                AlertPolicy::LevelTriggered => true,
                AlertPolicy::EdgeTriggered => !self.target_announced,
            };
            if speak {
                self.announce(&format!("{} reached target {}", meat, target.spoken_label()));
                self.target_announced = true;
            }
            self.buzzer.on();
        } else {
            self.target_announced = false;
            self.buzzer.off();
        }
    }

    /// Silence the buzzer for teardown.
    pub fn shutdown(&mut self) {
        self.buzzer.off();
    }

    fn toggle_menu(&mut self) {
        self.session.menu_open = !self.session.menu_open;

        if self.session.menu_open {
            info!("[CookMenu] OPEN");
            self.announce("Cook menu open");
            let target = self.current_target();
            self.log_target(&target);
            self.announce(&format!(
                "{} target {}",
                self.session.meat,
                target.spoken_label()
            ));
        } else {
            info!("[CookMenu] CLOSE");
            self.announce("Cook menu closed");
        }
    }

    fn switch_meat(&mut self) {
        self.session.meat = self.session.meat.next();
        self.target_announced = false;

        let message = format!("Switched meat to {}", self.session.meat);
        info!("{}", message);
        self.announce(&message);
    }

    fn cycle_target(&mut self) {
        let meat = self.session.meat;
        let target = self.targets.cycle_target(meat);
        self.target_announced = false;

        self.log_target(&target);
        self.announce(&format!("{} target {}", meat, target.spoken_label()));
    }

    fn log_target(&self, target: &Tier) {
        info!(
            "[CookMenu] {} target -> {} ({}°F)",
            self.session.meat, target.label, target.cutoff_f
        );
    }

    fn announce(&self, text: &str) {
        if let Err(e) = self.alert.announce(text) {
            warn!("Announcement {:?} dropped: {}", text, e);
        }
    }
}
