use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::game::{Scheduler, SessionId};

/// Interval between clock ticks.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner. Keys and clock ticks share
/// one queue so commands never run concurrently.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// One second elapsed for the session that armed the scheduler
    Tick(SessionId),
    /// No event arrived within the frame interval
    Frame,
}

/// Source of queued events (keyboard, resize, clock ticks)
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// The single command queue. Producers clone the sender.
pub struct EventQueue {
    tx: Sender<GameEvent>,
    rx: Receiver<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<GameEvent> {
        self.tx.clone()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventQueue {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Forward crossterm key and resize events into the queue from a reader thread.
pub fn spawn_terminal_reader(tx: Sender<GameEvent>) {
    thread::spawn(move || loop {
        let forwarded = match event::read() {
            Ok(CtEvent::Key(key)) => tx.send(GameEvent::Key(key)),
            Ok(CtEvent::Resize(_, _)) => tx.send(GameEvent::Resize),
            Ok(_) => Ok(()),
            Err(e) => {
                log::warn!("terminal reader stopped: {e}");
                break;
            }
        };
        if forwarded.is_err() {
            break;
        }
    });
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable frame interval
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the frame interval and returns the next event, or Frame on timeout
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                GameEvent::Frame
            }
        }
    }
}

struct Armed {
    session: SessionId,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler that spawns one interval thread per armed session.
///
/// Cancelling flips the thread's flag; the thread checks it after every sleep
/// and before every send. A tick that was already queued when the session
/// ended still carries the old [`SessionId`] and is dropped by the game.
pub struct ThreadScheduler {
    tx: Sender<GameEvent>,
    interval: Duration,
    armed: Option<Armed>,
}

impl ThreadScheduler {
    pub fn new(tx: Sender<GameEvent>) -> Self {
        Self::with_interval(tx, CLOCK_TICK)
    }

    pub fn with_interval(tx: Sender<GameEvent>, interval: Duration) -> Self {
        Self {
            tx,
            interval,
            armed: None,
        }
    }

    pub fn armed_session(&self) -> Option<SessionId> {
        self.armed.as_ref().map(|a| a.session)
    }

    fn cancel_current(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.cancelled.store(true, Ordering::SeqCst);
            log::debug!("tick scheduler cancelled for session {}", armed.session);
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn arm(&mut self, session: SessionId) {
        // at most one live countdown
        self.cancel_current();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let tx = self.tx.clone();
        let interval = self.interval;
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::SeqCst) || tx.send(GameEvent::Tick(session)).is_err() {
                break;
            }
        });

        log::debug!("tick scheduler armed for session {session}");
        self.armed = Some(Armed { session, cancelled });
    }

    fn cancel(&mut self, session: SessionId) {
        if self.armed_session() == Some(session) {
            self.cancel_current();
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.cancel_current();
    }
}
