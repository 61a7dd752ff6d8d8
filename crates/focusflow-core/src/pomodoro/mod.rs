//! Pomodoro sessions, the wall-clock countdown timer, and the tracker that
//! ties the two together.

mod session;
mod timer;
mod tracker;

pub use session::{PomodoroSession, SessionType, MAX_SESSION_SECS};
pub use timer::{PomodoroTimer, TimerEvent, TimerState};
pub use tracker::{SessionTracker, TrackerUpdate};
