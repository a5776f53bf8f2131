// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds argument parsing and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod ui;
pub mod word_bank;

pub use clock::{ClockState, GameClock, TickOutcome};
pub use error::{GameError, GameResult};
pub use game::{GameConfig, GameNotification, GameState, SessionId, SessionStatus};
pub use word_bank::{Language, WordBank};
