//! Deadline machines: timers expressed as a target timestamp and resolved by
//! polling once per tick.
//!
//! Each machine checks its cancellation condition *before* the deadline on
//! every tick, because hiding or calming can happen between any two ticks.

use room_rules::{GameFlag, GameState, Timestamp};
use serde::{Deserialize, Serialize};

/// A single optional deadline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Deadline {
    due: Option<Timestamp>,
}

impl Deadline {
    /// Arm the deadline `secs` after `now`, replacing any previous one.
    pub fn start(&mut self, now: Timestamp, secs: f64) {
        self.due = Some(now.after(secs.max(0.0)));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Whether the deadline is armed and `now` has reached it.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due.is_some_and(|due| now >= due)
    }

    /// Seconds left, or `None` if not armed.
    pub fn remaining(&self, now: Timestamp) -> Option<f64> {
        self.due.map(|due| now.secs_until(due))
    }

    pub fn due_at(&self) -> Option<Timestamp> {
        self.due
    }
}

/// Result of advancing the chase machine by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseTick {
    /// No chase in progress.
    Idle,
    /// Still counting down.
    Running,
    /// The player hid (or the chase was called off) before the deadline.
    Escaped,
    /// The deadline passed while the player was exposed.
    Caught,
}

/// The doctor's patrol countdown.
#[derive(Debug, Clone, Default)]
pub struct ChaseTimer {
    deadline: Deadline,
}

impl ChaseTimer {
    /// Start the chase: the player is exposed until they hide.
    pub fn start(&mut self, now: Timestamp, secs: f64, state: &mut GameState) {
        state.set_flag(GameFlag::InChase, true);
        state.set_flag(GameFlag::IsHidden, false);
        self.deadline.start(now, secs);
    }

    pub fn tick(&mut self, now: Timestamp, state: &mut GameState) -> ChaseTick {
        if !self.deadline.is_armed() {
            return ChaseTick::Idle;
        }

        if !state.flag(GameFlag::InChase) || state.flag(GameFlag::IsHidden) {
            state.set_flag(GameFlag::InChase, false);
            self.deadline.cancel();
            return ChaseTick::Escaped;
        }

        if self.deadline.is_due(now) {
            self.deadline.cancel();
            return ChaseTick::Caught;
        }

        ChaseTick::Running
    }

    pub fn remaining(&self, now: Timestamp) -> Option<f64> {
        self.deadline.remaining(now)
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_armed()
    }

    pub fn reset(&mut self) {
        self.deadline.cancel();
    }
}

/// Result of advancing the scream machine by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreamTick {
    Idle,
    Running,
    /// The girl was calmed or the scream stopped in time.
    Calmed,
    TimedOut,
}

/// Countdown until the scream draws someone to the treatment room.
#[derive(Debug, Clone, Default)]
pub struct ScreamTimer {
    deadline: Deadline,
}

impl ScreamTimer {
    pub fn start(&mut self, now: Timestamp, secs: f64) {
        self.deadline.start(now, secs.max(0.1));
    }

    pub fn tick(&mut self, now: Timestamp, state: &GameState) -> ScreamTick {
        if !self.deadline.is_armed() {
            return ScreamTick::Idle;
        }

        if state.flag(GameFlag::GirlCalmed) || !state.flag(GameFlag::Screaming) {
            self.deadline.cancel();
            return ScreamTick::Calmed;
        }

        if self.deadline.is_due(now) {
            self.deadline.cancel();
            return ScreamTick::TimedOut;
        }

        ScreamTick::Running
    }

    pub fn stop(&mut self) {
        self.deadline.cancel();
    }

    pub fn remaining(&self, now: Timestamp) -> Option<f64> {
        self.deadline.remaining(now)
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_armed()
    }
}

/// A short-lived message banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub text: String,
    pub expires_at: Timestamp,
}

impl Toast {
    /// Shortest time a toast stays up.
    pub const MIN_SECONDS: f64 = 0.1;

    pub fn new(text: impl Into<String>, now: Timestamp, secs: f64) -> Self {
        Self {
            text: text.into(),
            expires_at: now.after(secs.max(Self::MIN_SECONDS)),
        }
    }

    pub fn is_visible(&self, now: Timestamp) -> bool {
        !self.text.is_empty() && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: f64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn test_deadline_lifecycle() {
        let mut deadline = Deadline::default();
        assert!(!deadline.is_due(at(100.0)));
        assert_eq!(deadline.remaining(at(0.0)), None);

        deadline.start(at(1.0), 2.0);
        assert!(!deadline.is_due(at(2.9)));
        assert!(deadline.is_due(at(3.0)));
        assert_eq!(deadline.remaining(at(2.0)), Some(1.0));
        assert_eq!(deadline.remaining(at(5.0)), Some(0.0));

        deadline.cancel();
        assert!(!deadline.is_armed());
    }

    #[test]
    fn test_chase_caught_once() {
        let mut state = GameState::new();
        let mut chase = ChaseTimer::default();
        chase.start(at(0.0), 10.0, &mut state);

        assert!(state.flag(GameFlag::InChase));
        assert_eq!(chase.tick(at(9.9), &mut state), ChaseTick::Running);
        assert_eq!(chase.tick(at(10.0), &mut state), ChaseTick::Caught);
        assert_eq!(chase.tick(at(10.1), &mut state), ChaseTick::Idle);
    }

    #[test]
    fn test_chase_hide_checked_before_deadline() {
        let mut state = GameState::new();
        let mut chase = ChaseTimer::default();
        chase.start(at(0.0), 10.0, &mut state);

        // Hidden and late in the same tick: hiding wins.
        state.set_flag(GameFlag::IsHidden, true);
        assert_eq!(chase.tick(at(12.0), &mut state), ChaseTick::Escaped);
        assert!(!state.flag(GameFlag::InChase));
        assert!(!chase.is_running());
    }

    #[test]
    fn test_chase_called_off() {
        let mut state = GameState::new();
        let mut chase = ChaseTimer::default();
        chase.start(at(0.0), 10.0, &mut state);

        state.set_flag(GameFlag::InChase, false);
        assert_eq!(chase.tick(at(1.0), &mut state), ChaseTick::Escaped);
    }

    #[test]
    fn test_chase_start_clears_hidden() {
        let mut state = GameState::new();
        state.set_flag(GameFlag::IsHidden, true);

        let mut chase = ChaseTimer::default();
        chase.start(at(0.0), 5.0, &mut state);
        assert!(!state.flag(GameFlag::IsHidden));
        assert_eq!(chase.remaining(at(2.0)), Some(3.0));
    }

    #[test]
    fn test_scream_calmed() {
        let mut state = GameState::new();
        state.set_flag(GameFlag::Screaming, true);

        let mut scream = ScreamTimer::default();
        scream.start(at(0.0), 12.0);
        assert_eq!(scream.tick(at(5.0), &state), ScreamTick::Running);

        state.set_flag(GameFlag::GirlCalmed, true);
        assert_eq!(scream.tick(at(20.0), &state), ScreamTick::Calmed);
        assert_eq!(scream.tick(at(21.0), &state), ScreamTick::Idle);
    }

    #[test]
    fn test_scream_times_out() {
        let mut state = GameState::new();
        state.set_flag(GameFlag::Screaming, true);

        let mut scream = ScreamTimer::default();
        scream.start(at(0.0), 12.0);
        assert_eq!(scream.tick(at(12.0), &state), ScreamTick::TimedOut);
        assert!(!scream.is_running());
    }

    #[test]
    fn test_toast_visibility() {
        let toast = Toast::new("Door unlocked.", at(1.0), 1.5);
        assert!(toast.is_visible(at(2.0)));
        assert!(!toast.is_visible(at(2.5)));

        let short = Toast::new("blink", at(0.0), 0.0);
        assert_eq!(short.expires_at, at(0.1));
    }
}
