//! Countdown clock for a single session.
//!
//! The clock knows nothing about game rules. It only counts down whole
//! seconds while running and reports when it hits zero. Real time is fed in
//! from outside through [`GameClock::tick`], one call per elapsed second.

use std::fmt;

/// Remaining time, minutes and seconds. `seconds` is always in `0..=59`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ClockState {
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockState {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes + seconds / 60,
            seconds: seconds % 60,
        }
    }

    pub fn from_secs(total: u32) -> Self {
        Self::new(0, total)
    }

    pub fn total_secs(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// One second earlier; a zero seconds field borrows a minute.
    fn decremented(self) -> Self {
        match (self.minutes, self.seconds) {
            (0, 0) => self,
            (m, 0) => Self {
                minutes: m - 1,
                seconds: 59,
            },
            (m, s) => Self {
                minutes: m,
                seconds: s - 1,
            },
        }
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum ClockPhase {
    Idle,
    Running,
    Stopped,
}

/// Result of delivering one second to the clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock was not running; nothing changed
    Ignored,
    /// One second elapsed, time remains
    Ticked(ClockState),
    /// This tick brought the clock to zero. Reported once per clock.
    Expired,
}

#[derive(Debug, Clone)]
pub struct GameClock {
    state: ClockState,
    phase: ClockPhase,
    expired: bool,
}

impl GameClock {
    pub fn new(initial: ClockState) -> Self {
        Self {
            state: initial,
            phase: ClockPhase::Idle,
            expired: false,
        }
    }

    /// An expired clock stays stopped; a new session gets a new clock.
    pub fn start(&mut self) {
        if self.phase != ClockPhase::Running && !self.expired {
            self.phase = ClockPhase::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Stopped;
        }
    }

    /// Count down one second. A clock started at zero expires on its first tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != ClockPhase::Running || self.expired {
            return TickOutcome::Ignored;
        }
        self.state = self.state.decremented();
        if self.state.is_zero() {
            self.expired = true;
            self.phase = ClockPhase::Stopped;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked(self.state)
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }
}
