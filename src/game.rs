//! The session state machine.
//!
//! `GameState` owns the hidden word, the guessed letters and the session's
//! clock. Status is recomputed inside each command and never inferred by the
//! presentation layer. Everything the UI shows comes from the read-only
//! queries below.

use crate::clock::{ClockPhase, ClockState, GameClock, TickOutcome};
use crate::error::{GameError, GameResult};
use crate::word_bank::{default_languages, default_words, Language, WordBank};
use itertools::Itertools;
use std::fmt;

pub const DEFAULT_INITIAL_SECONDS: u32 = 60;

pub const WIN_MESSAGE: &str = "You win! Well done! 🎉";
pub const LOSS_MESSAGE: &str = "Game over! You lose! Better start learning Assembly 😭";

/// Construction-time configuration, fixed for the lifetime of a `GameState`
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub initial_seconds: u32,
    /// `None` means one less than the number of language labels
    pub max_wrong_guesses: Option<usize>,
    pub words: Vec<String>,
    pub languages: Vec<Language>,
    /// Seed for word and farewell selection; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_seconds: DEFAULT_INITIAL_SECONDS,
            max_wrong_guesses: None,
            words: default_words(),
            languages: default_languages(),
            seed: None,
        }
    }
}

/// Identifies one session. Scheduled ticks carry the id of the session that armed them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    InProgress,
    Won,
    LostByGuesses,
    LostByTimeout,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }

    pub fn is_lost(self) -> bool {
        matches!(self, Self::LostByGuesses | Self::LostByTimeout)
    }
}

/// Keyboard view of a single letter
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum LetterState {
    Unguessed,
    Correct,
    Wrong,
}

/// What a call to [`GameState::guess_letter`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    /// Letter was already guessed; nothing changed
    Repeated,
    /// Session already over; nothing changed
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameNotification {
    /// Emitted after any command that changed state
    StateChanged,
    /// One second elapsed on the live session's clock
    Tick(ClockState),
    /// The live session left `InProgress`
    SessionEnded(SessionStatus),
}

/// Arms and cancels the once-per-second tick that drives [`GameState::deliver_tick`].
pub trait Scheduler {
    fn arm(&mut self, session: SessionId);
    fn cancel(&mut self, session: SessionId);
}

/// Scheduler for callers that deliver ticks themselves
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl Scheduler for ManualScheduler {
    fn arm(&mut self, _session: SessionId) {}
    fn cancel(&mut self, _session: SessionId) {}
}

type Listener = Box<dyn FnMut(&GameNotification)>;

pub struct GameState {
    bank: WordBank,
    initial_time: ClockState,
    max_wrong_guesses: usize,
    word: String,
    guessed: Vec<char>,
    clock: GameClock,
    status: SessionStatus,
    farewell: Option<String>,
    session: SessionId,
    scheduler: Box<dyn Scheduler>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("session", &self.session)
            .field("word", &self.word)
            .field("guessed", &self.guessed)
            .field("clock", &self.clock)
            .field("status", &self.status)
            .field("farewell", &self.farewell)
            .field("max_wrong_guesses", &self.max_wrong_guesses)
            .finish_non_exhaustive()
    }
}

/// Parse raw input into a guessable letter.
pub fn parse_letter(input: &str) -> GameResult<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => validate_letter(c),
        _ => Err(GameError::InvalidLetter(input.to_string())),
    }
}

fn validate_letter(letter: char) -> GameResult<char> {
    if letter.is_ascii_lowercase() {
        Ok(letter)
    } else {
        Err(GameError::InvalidLetter(letter.to_string()))
    }
}

fn derive_status(word: &str, guessed: &[char], wrong: usize, max_wrong: usize) -> SessionStatus {
    if word.chars().all(|c| guessed.contains(&c)) {
        SessionStatus::Won
    } else if wrong >= max_wrong {
        SessionStatus::LostByGuesses
    } else {
        SessionStatus::InProgress
    }
}

impl GameState {
    /// Build the game and start its first session. Ticks must be delivered by the caller.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        Self::with_scheduler(config, Box::new(ManualScheduler))
    }

    pub fn with_scheduler(config: GameConfig, scheduler: Box<dyn Scheduler>) -> GameResult<Self> {
        let mut bank = WordBank::new(config.words, config.languages, config.seed)?;
        let labels = bank.label_count();
        let max_wrong_guesses = config
            .max_wrong_guesses
            .unwrap_or_else(|| labels.saturating_sub(1));
        // each wrong guess costs one label, so the budget can never exceed the labels
        if max_wrong_guesses < 1 || max_wrong_guesses > labels {
            return Err(GameError::InvalidBudget(max_wrong_guesses));
        }

        let initial_time = ClockState::from_secs(config.initial_seconds);
        let word = bank.pick_random_word();

        let mut state = Self {
            bank,
            initial_time,
            max_wrong_guesses,
            word,
            guessed: Vec::new(),
            clock: GameClock::new(initial_time),
            status: SessionStatus::InProgress,
            farewell: None,
            session: SessionId(1),
            scheduler,
            listeners: Vec::new(),
        };
        state.start_session();
        Ok(state)
    }

    /// Register a callback for state-changed, tick and session-ended notifications.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&GameNotification) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, notification: GameNotification) {
        for listener in self.listeners.iter_mut() {
            listener(&notification);
        }
    }

    fn start_session(&mut self) {
        self.clock.start();
        self.scheduler.arm(self.session);
        log::info!(
            "session {} started: {} letters, {} wrong guesses allowed, {} on the clock",
            self.session,
            self.word.len(),
            self.max_wrong_guesses,
            self.initial_time
        );
        log::debug!("session {} word is {:?}", self.session, self.word);
    }

    fn finish_session(&mut self, status: SessionStatus) {
        self.status = status;
        self.clock.stop();
        self.scheduler.cancel(self.session);
        self.farewell = None;
        log::info!(
            "session {} ended: {} after {} guesses ({} wrong), {} left",
            self.session,
            status,
            self.guessed.len(),
            self.wrong_guess_count(),
            self.clock.state()
        );
        self.notify(GameNotification::SessionEnded(status));
    }

    /// Start a fresh session. The old clock is stopped and its ticks cancelled first.
    pub fn new_game(&mut self) {
        self.clock.stop();
        self.scheduler.cancel(self.session);

        self.session = self.session.next();
        self.word = self.bank.pick_random_word();
        self.guessed = Vec::new();
        self.clock = GameClock::new(self.initial_time);
        self.status = SessionStatus::InProgress;
        self.farewell = None;

        self.start_session();
        self.notify(GameNotification::StateChanged);
    }

    /// Guess one lowercase letter.
    ///
    /// Repeated letters and guesses after the session ended are no-ops.
    /// Anything other than `a`-`z` is rejected with [`GameError::InvalidLetter`]
    /// and leaves the state untouched.
    pub fn guess_letter(&mut self, letter: char) -> GameResult<GuessOutcome> {
        let letter = validate_letter(letter)?;
        if self.status.is_terminal() {
            log::debug!("ignoring guess {letter:?}: session is {}", self.status);
            return Ok(GuessOutcome::GameOver);
        }
        if self.guessed.contains(&letter) {
            return Ok(GuessOutcome::Repeated);
        }

        let correct = self.word.contains(letter);
        let wrong = self.wrong_guess_count() + usize::from(!correct);
        let mut guessed = self.guessed.clone();
        guessed.push(letter);
        let status = derive_status(&self.word, &guessed, wrong, self.max_wrong_guesses);

        // the Nth wrong guess says goodbye to label N-1
        let farewell = if !correct && status == SessionStatus::InProgress {
            Some(self.bank.farewell_for(wrong - 1)?)
        } else {
            None
        };

        self.guessed = guessed;
        self.farewell = farewell;
        log::debug!(
            "session {} guess {letter:?}: {} ({wrong}/{} wrong)",
            self.session,
            if correct { "correct" } else { "wrong" },
            self.max_wrong_guesses
        );

        if status.is_terminal() {
            self.finish_session(status);
        }
        self.notify(GameNotification::StateChanged);

        Ok(if correct {
            GuessOutcome::Correct
        } else {
            GuessOutcome::Wrong
        })
    }

    /// Like [`guess_letter`](Self::guess_letter) but for raw text input.
    pub fn guess_input(&mut self, input: &str) -> GameResult<GuessOutcome> {
        let letter = parse_letter(input)?;
        self.guess_letter(letter)
    }

    /// One second elapsed on the live session.
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.status.is_terminal() {
            return TickOutcome::Ignored;
        }
        let outcome = self.clock.tick();
        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Ticked(remaining) => {
                self.notify(GameNotification::Tick(remaining));
                self.notify(GameNotification::StateChanged);
            }
            TickOutcome::Expired => {
                self.notify(GameNotification::Tick(self.clock.state()));
                self.finish_session(SessionStatus::LostByTimeout);
                self.notify(GameNotification::StateChanged);
            }
        }
        outcome
    }

    /// Deliver a scheduled tick. Ticks armed by an earlier session are dropped.
    pub fn deliver_tick(&mut self, session: SessionId) -> TickOutcome {
        if session != self.session {
            log::debug!(
                "dropping stale tick from session {session} (live session {})",
                self.session
            );
            return TickOutcome::Ignored;
        }
        self.on_tick()
    }

    pub fn current_word(&self) -> &str {
        &self.word
    }

    pub fn guessed_letters(&self) -> &[char] {
        &self.guessed
    }

    pub fn wrong_guess_count(&self) -> usize {
        self.guessed
            .iter()
            .filter(|c| !self.word.contains(**c))
            .count()
    }

    pub fn max_wrong_guesses(&self) -> usize {
        self.max_wrong_guesses
    }

    pub fn guesses_remaining(&self) -> usize {
        self.max_wrong_guesses
            .saturating_sub(self.wrong_guess_count())
    }

    pub fn session_status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn session_id(&self) -> SessionId {
        self.session
    }

    pub fn remaining_time(&self) -> ClockState {
        self.clock.state()
    }

    pub fn initial_time(&self) -> ClockState {
        self.initial_time
    }

    pub fn clock_phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    pub fn farewell_message(&self) -> Option<&str> {
        self.farewell.as_deref()
    }

    pub fn languages(&self) -> &[Language] {
        self.bank.languages()
    }

    pub fn last_guess(&self) -> Option<char> {
        self.guessed.last().copied()
    }

    pub fn is_last_guess_incorrect(&self) -> bool {
        self.last_guess()
            .is_some_and(|c| !self.word.contains(c))
    }

    pub fn letter_state(&self, letter: char) -> LetterState {
        if !self.guessed.contains(&letter) {
            LetterState::Unguessed
        } else if self.word.contains(letter) {
            LetterState::Correct
        } else {
            LetterState::Wrong
        }
    }

    /// The word as the player sees it. Every letter is revealed once the session is lost.
    pub fn masked_word(&self) -> Vec<Option<char>> {
        let reveal_all = self.status.is_lost();
        self.word
            .chars()
            .map(|c| (reveal_all || self.guessed.contains(&c)).then_some(c))
            .collect()
    }

    /// Letters of the word the player never found, in word order without repeats.
    pub fn missed_letters(&self) -> Vec<char> {
        self.word
            .chars()
            .filter(|c| !self.guessed.contains(c))
            .unique()
            .collect()
    }

    /// The status line for the current state.
    pub fn status_text(&self) -> String {
        match self.status {
            SessionStatus::InProgress => match &self.farewell {
                Some(msg) if self.is_last_guess_incorrect() => msg.clone(),
                _ => String::new(),
            },
            SessionStatus::Won => WIN_MESSAGE.to_string(),
            SessionStatus::LostByGuesses | SessionStatus::LostByTimeout => {
                format!("{LOSS_MESSAGE} The word was: {}", self.word)
            }
        }
    }

    /// Plain-text summary for screen readers.
    pub fn announcement(&self) -> String {
        let mut parts = Vec::new();
        if let Some(letter) = self.last_guess() {
            if self.word.contains(letter) {
                parts.push(format!("Correct! The letter {letter} is in the word."));
            } else {
                parts.push(format!("Sorry, the letter {letter} is not in the word."));
            }
        }
        parts.push(format!(
            "You have {} attempts left.",
            self.guesses_remaining()
        ));
        let current = self
            .word
            .chars()
            .map(|c| {
                if self.guessed.contains(&c) {
                    format!("{c}.")
                } else {
                    "blank.".to_string()
                }
            })
            .join(" ");
        parts.push(format!("Current word: {current}"));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Arm(SessionId),
        Cancel(SessionId),
    }

    #[derive(Clone, Default)]
    struct RecordingScheduler {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Scheduler for RecordingScheduler {
        fn arm(&mut self, session: SessionId) {
            self.calls.lock().unwrap().push(Call::Arm(session));
        }
        fn cancel(&mut self, session: SessionId) {
            self.calls.lock().unwrap().push(Call::Cancel(session));
        }
    }

    fn config(word: &str, max_wrong: usize, secs: u32) -> GameConfig {
        GameConfig {
            initial_seconds: secs,
            max_wrong_guesses: Some(max_wrong),
            words: vec![word.to_string()],
            languages: default_languages(),
            seed: Some(3),
        }
    }

    fn game(word: &str, max_wrong: usize) -> GameState {
        GameState::new(config(word, max_wrong, 60)).unwrap()
    }

    fn guess_all(game: &mut GameState, letters: &str) {
        for c in letters.chars() {
            game.guess_letter(c).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let game = game("ocaml", 7);
        assert_eq!(game.current_word(), "ocaml");
        assert!(game.guessed_letters().is_empty());
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        assert_eq!(game.remaining_time(), ClockState::new(1, 0));
        assert_eq!(game.clock_phase(), ClockPhase::Running);
        assert_eq!(game.farewell_message(), None);
        assert_eq!(game.status_text(), "");
        assert_eq!(game.session_id(), SessionId(1));
    }

    #[test]
    fn test_default_budget_is_labels_minus_one() {
        let cfg = GameConfig {
            max_wrong_guesses: None,
            seed: Some(1),
            ..GameConfig::default()
        };
        let game = GameState::new(cfg).unwrap();
        assert_eq!(game.max_wrong_guesses(), 8);
        assert_eq!(game.remaining_time(), ClockState::from_secs(DEFAULT_INITIAL_SECONDS));
    }

    #[test]
    fn test_budget_validation() {
        assert_matches!(
            GameState::new(config("rust", 0, 60)),
            Err(GameError::InvalidBudget(0))
        );
        assert_matches!(
            GameState::new(config("rust", 10, 60)),
            Err(GameError::InvalidBudget(10))
        );
        let one_label = GameConfig {
            languages: vec![Language::new("Assembly", "#2D519F", "#F9F4DA")],
            max_wrong_guesses: None,
            ..config("rust", 1, 60)
        };
        assert_matches!(GameState::new(one_label), Err(GameError::InvalidBudget(0)));
    }

    #[test]
    fn test_construction_propagates_bank_errors() {
        let cfg = GameConfig {
            words: vec![],
            ..config("rust", 3, 60)
        };
        assert_matches!(GameState::new(cfg), Err(GameError::EmptyWordList));
        let cfg = GameConfig {
            languages: vec![],
            ..config("rust", 3, 60)
        };
        assert_matches!(GameState::new(cfg), Err(GameError::EmptyLabelList));
    }

    #[test]
    fn test_ocaml_scenario() {
        let mut game = game("ocaml", 7);
        guess_all(&mut game, "xyz");
        assert_eq!(game.wrong_guess_count(), 3);
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        let farewell = game.farewell_message().unwrap().to_string();
        assert!(farewell.contains("JavaScript"), "{farewell}");
        assert_eq!(game.status_text(), farewell);

        guess_all(&mut game, "ocaml");
        assert_eq!(game.session_status(), SessionStatus::Won);
        assert_eq!(game.wrong_guess_count(), 3);
        assert_eq!(game.farewell_message(), None);
        assert_eq!(game.status_text(), WIN_MESSAGE);
        assert_eq!(game.clock_phase(), ClockPhase::Stopped);
        assert_eq!(game.guessed_letters(), &['x', 'y', 'z', 'o', 'c', 'a', 'm', 'l']);
    }

    #[test]
    fn test_single_wrong_guess_budget() {
        let mut game = game("rust", 1);
        assert_eq!(game.guess_letter('q'), Ok(GuessOutcome::Wrong));
        assert_eq!(game.wrong_guess_count(), 1);
        assert_eq!(game.session_status(), SessionStatus::LostByGuesses);
        assert_eq!(game.clock_phase(), ClockPhase::Stopped);
        assert_eq!(game.farewell_message(), None);
        assert!(game.status_text().starts_with(LOSS_MESSAGE));
        assert!(game.status_text().ends_with("The word was: rust"));
    }

    #[test]
    fn test_loss_at_exact_budget() {
        let mut game = game("rust", 3);
        guess_all(&mut game, "ab");
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        game.guess_letter('c').unwrap();
        assert_eq!(game.session_status(), SessionStatus::LostByGuesses);
        assert_eq!(game.wrong_guess_count(), game.max_wrong_guesses());
        assert_eq!(game.guesses_remaining(), 0);
    }

    #[test]
    fn test_correct_guess_on_last_life_still_wins() {
        let mut game = game("go", 2);
        game.guess_letter('x').unwrap();
        game.guess_letter('g').unwrap();
        assert_eq!(game.guess_letter('o'), Ok(GuessOutcome::Correct));
        assert_eq!(game.session_status(), SessionStatus::Won);
        assert_eq!(game.wrong_guess_count(), 1);
    }

    #[test]
    fn test_repeated_guess_is_idempotent() {
        let mut game = game("rust", 5);
        game.guess_letter('q').unwrap();
        let farewell = game.farewell_message().map(str::to_string);
        let guessed = game.guessed_letters().to_vec();

        assert_eq!(game.guess_letter('q'), Ok(GuessOutcome::Repeated));
        assert_eq!(game.guessed_letters(), guessed.as_slice());
        assert_eq!(game.wrong_guess_count(), 1);
        assert_eq!(game.farewell_message().map(str::to_string), farewell);
    }

    #[test]
    fn test_correct_guess_clears_farewell() {
        let mut game = game("rust", 5);
        game.guess_letter('q').unwrap();
        assert!(game.farewell_message().is_some());
        game.guess_letter('r').unwrap();
        assert_eq!(game.farewell_message(), None);
        assert_eq!(game.status_text(), "");
    }

    #[test]
    fn test_farewell_tracks_latest_wrong_guess() {
        let mut game = game("rust", 8);
        game.guess_letter('a').unwrap();
        assert!(game.farewell_message().unwrap().contains("HTML"));
        game.guess_letter('b').unwrap();
        assert!(game.farewell_message().unwrap().contains("CSS"));
    }

    #[test]
    fn test_invalid_letters_are_rejected_without_change() {
        let mut game = game("rust", 5);
        for bad in ['A', '1', ' ', 'é', '-'] {
            assert_matches!(game.guess_letter(bad), Err(GameError::InvalidLetter(_)));
        }
        for bad in ["", "ab", "R"] {
            assert_matches!(game.guess_input(bad), Err(GameError::InvalidLetter(s)) if s == bad);
        }
        assert!(game.guessed_letters().is_empty());
        assert_eq!(game.guess_input("r"), Ok(GuessOutcome::Correct));
    }

    #[test]
    fn test_guesses_after_game_over_are_ignored() {
        let mut game = game("go", 3);
        guess_all(&mut game, "go");
        assert_eq!(game.guess_letter('z'), Ok(GuessOutcome::GameOver));
        assert_eq!(game.guessed_letters(), &['g', 'o']);
    }

    #[test]
    fn test_timeout_with_no_guesses() {
        let mut game = GameState::new(config("rust", 5, 2)).unwrap();
        assert_eq!(game.on_tick(), TickOutcome::Ticked(ClockState::from_secs(1)));
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        assert_eq!(game.on_tick(), TickOutcome::Expired);
        assert_eq!(game.session_status(), SessionStatus::LostByTimeout);
        assert_eq!(game.wrong_guess_count(), 0);
        assert!(game.status_text().contains("The word was: rust"));
        assert_eq!(game.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_zero_initial_time_loses_on_first_tick() {
        let mut game = GameState::new(config("rust", 5, 0)).unwrap();
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        game.on_tick();
        assert_eq!(game.session_status(), SessionStatus::LostByTimeout);
    }

    #[test]
    fn test_ticks_after_win_do_not_change_clock() {
        let mut game = game("go", 3);
        game.on_tick();
        guess_all(&mut game, "go");
        let remaining = game.remaining_time();
        assert_eq!(game.on_tick(), TickOutcome::Ignored);
        assert_eq!(game.remaining_time(), remaining);
        assert_eq!(game.session_status(), SessionStatus::Won);
    }

    #[test]
    fn test_new_game_resets_from_terminal_state() {
        let mut game = game("rust", 1);
        game.on_tick();
        game.guess_letter('q').unwrap();
        assert!(game.is_game_over());

        game.new_game();
        assert_eq!(game.session_status(), SessionStatus::InProgress);
        assert!(game.guessed_letters().is_empty());
        assert_eq!(game.remaining_time(), ClockState::new(1, 0));
        assert_eq!(game.farewell_message(), None);
        assert_eq!(game.clock_phase(), ClockPhase::Running);
        assert_eq!(game.session_id(), SessionId(2));
    }

    #[test]
    fn test_stale_ticks_are_dropped() {
        let mut game = game("rust", 5);
        let old = game.session_id();
        game.new_game();
        assert_eq!(game.deliver_tick(old), TickOutcome::Ignored);
        assert_eq!(game.remaining_time(), ClockState::new(1, 0));
        assert_eq!(
            game.deliver_tick(game.session_id()),
            TickOutcome::Ticked(ClockState::new(0, 59))
        );
    }

    #[test]
    fn test_scheduler_lifecycle() {
        let scheduler = RecordingScheduler::default();
        let calls = scheduler.calls.clone();
        let mut game = GameState::with_scheduler(config("go", 3, 60), Box::new(scheduler)).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![Call::Arm(SessionId(1))]);

        guess_all(&mut game, "go");
        assert_eq!(calls.lock().unwrap().last(), Some(&Call::Cancel(SessionId(1))));

        game.new_game();
        let recorded = calls.lock().unwrap().clone();
        assert_eq!(
            recorded[recorded.len() - 2..],
            [Call::Cancel(SessionId(1)), Call::Arm(SessionId(2))]
        );
    }

    #[test]
    fn test_new_game_mid_session_cancels_before_arming() {
        let scheduler = RecordingScheduler::default();
        let calls = scheduler.calls.clone();
        let mut game = GameState::with_scheduler(config("go", 3, 60), Box::new(scheduler)).unwrap();
        game.new_game();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                Call::Arm(SessionId(1)),
                Call::Cancel(SessionId(1)),
                Call::Arm(SessionId(2))
            ]
        );
    }

    #[test]
    fn test_notifications() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = GameState::new(config("go", 3, 2)).unwrap();
        let sink = seen.clone();
        game.subscribe(move |n| sink.borrow_mut().push(n.clone()));

        game.guess_letter('g').unwrap();
        game.on_tick();
        game.on_tick();

        assert_eq!(
            *seen.borrow(),
            vec![
                GameNotification::StateChanged,
                GameNotification::Tick(ClockState::from_secs(1)),
                GameNotification::StateChanged,
                GameNotification::Tick(ClockState::from_secs(0)),
                GameNotification::SessionEnded(SessionStatus::LostByTimeout),
                GameNotification::StateChanged,
            ]
        );

        seen.borrow_mut().clear();
        game.guess_letter('o').unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_masked_word_and_missed_letters() {
        let mut game = game("rust", 2);
        game.guess_letter('u').unwrap();
        assert_eq!(game.masked_word(), vec![None, Some('u'), None, None]);
        assert_eq!(game.missed_letters(), vec!['r', 's', 't']);

        guess_all(&mut game, "xy");
        assert!(game.session_status().is_lost());
        assert_eq!(
            game.masked_word(),
            vec![Some('r'), Some('u'), Some('s'), Some('t')]
        );
    }

    #[test]
    fn test_missed_letters_deduplicates() {
        let game = game("hello", 3);
        assert_eq!(game.missed_letters(), vec!['h', 'e', 'l', 'o']);
    }

    #[test]
    fn test_letter_state() {
        let mut game = game("rust", 5);
        guess_all(&mut game, "rq");
        assert_eq!(game.letter_state('r'), LetterState::Correct);
        assert_eq!(game.letter_state('q'), LetterState::Wrong);
        assert_eq!(game.letter_state('s'), LetterState::Unguessed);
    }

    #[test]
    fn test_announcement() {
        let mut game = game("go", 4);
        assert_eq!(
            game.announcement(),
            "You have 4 attempts left. Current word: blank. blank."
        );
        game.guess_letter('g').unwrap();
        assert_eq!(
            game.announcement(),
            "Correct! The letter g is in the word. You have 4 attempts left. Current word: g. blank."
        );
        game.guess_letter('z').unwrap();
        assert!(game
            .announcement()
            .starts_with("Sorry, the letter z is not in the word. You have 3 attempts left."));
    }

    #[test]
    fn test_parse_letter() {
        assert_eq!(parse_letter("a"), Ok('a'));
        assert_matches!(parse_letter("ab"), Err(GameError::InvalidLetter(_)));
        assert_matches!(parse_letter(""), Err(GameError::InvalidLetter(_)));
        assert_matches!(parse_letter("Z"), Err(GameError::InvalidLetter(_)));
    }
}
