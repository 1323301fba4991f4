//! Round and timer state machine.
//!
//! A [`Game`] walks through the configured rounds. Each round has a target
//! word, a countdown and at most [`MAX_ATTEMPTS`] rows. The machine never
//! reads the clock itself: every transition takes `now` so the event loop
//! and the tests drive time explicitly.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RoundConfig;
use crate::dictionary::{LookupResponse, Validation};
use crate::evaluate::{evaluate, KeyStates, LetterScore};
use crate::util::{ceil_secs, format_clock};
use crate::words::WordSource;

pub const MAX_ATTEMPTS: usize = 6;
pub const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Not enough letters!")]
    IncompleteGuess,
    #[error("{0} is not a valid English word")]
    RejectedWord(String),
    #[error("Dictionary unavailable. Only answers allowed offline.")]
    DictionaryUnreachable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least one round must be configured")]
    NoRounds,
    #[error("no words available for length {0}")]
    NoWords(usize),
}

/// Discrete input from either keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Enter,
    Backspace,
}

/// A dictionary check the event loop must perform before the guess can be scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub generation: u64,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The guess was scored straight away.
    Scored,
    /// The guess is waiting on a dictionary lookup.
    Pending(LookupRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Rejected(GuessError),
    /// The response belongs to a round or submission that is no longer active.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RoundOutcome {
    Solved,
    RowExhausted,
    TimedOut,
}

impl RoundOutcome {
    /// Pause before the next round starts.
    pub fn delay(&self) -> Duration {
        match self {
            RoundOutcome::Solved => Duration::from_millis(2000),
            RoundOutcome::RowExhausted => Duration::from_millis(2500),
            RoundOutcome::TimedOut => Duration::from_millis(1200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Validating { word: String },
    Advancing { outcome: RoundOutcome, at: Instant },
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub word: String,
    pub scores: Vec<LetterScore>,
}

#[derive(Debug, Clone)]
pub struct Round {
    pub index: usize,
    pub word_length: usize,
    pub target: String,
    pub time_limit: Duration,
    pub started_at: Instant,
    pub rows: Vec<Row>,
    pub guess: String,
    pub keys: KeyStates,
}

impl Round {
    fn new(index: usize, config: RoundConfig, target: String, now: Instant) -> Self {
        Self {
            index,
            word_length: config.word_length,
            target,
            time_limit: config.time_limit(),
            started_at: now,
            rows: Vec::with_capacity(MAX_ATTEMPTS),
            guess: String::new(),
            keys: KeyStates::new(),
        }
    }

    /// Time left on the countdown, counting whole elapsed seconds only.
    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        Duration::from_secs(self.time_limit.as_secs().saturating_sub(elapsed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundTime {
    pub word_length: usize,
    pub elapsed: Duration,
    /// False when the round was never finished and the full limit was charged.
    pub recorded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rounds: Vec<RoundTime>,
    pub total: Duration,
}

/// Decide whether a dictionary answer lets `word` through.
///
/// Known answers always pass; when the dictionary is unreachable they are
/// the only words that do.
pub fn accept(
    validation: Validation,
    word: &str,
    target: &str,
    words: &dyn WordSource,
) -> Result<(), GuessError> {
    let known = word == target || words.is_answer(word);
    match validation {
        Validation::Valid => Ok(()),
        Validation::Invalid if known => Ok(()),
        Validation::Invalid => Err(GuessError::RejectedWord(word.to_string())),
        Validation::Unreachable if known => Ok(()),
        Validation::Unreachable => Err(GuessError::DictionaryUnreachable),
    }
}

#[derive(Debug)]
pub struct Game {
    rounds: Vec<RoundConfig>,
    words: Box<dyn WordSource>,
    targets: Vec<String>,
    round: Round,
    phase: Phase,
    generation: u64,
    elapsed: Vec<Option<u64>>,
    toast: Option<Toast>,
}

impl Game {
    pub fn new(
        rounds: Vec<RoundConfig>,
        words: Box<dyn WordSource>,
        now: Instant,
    ) -> Result<Self, SetupError> {
        let targets = pick_targets(&rounds, words.as_ref())?;
        let round = Round::new(0, rounds[0], targets[0].clone(), now);
        let elapsed = vec![None; rounds.len()];

        let mut game = Self {
            rounds,
            words,
            targets,
            round,
            phase: Phase::AwaitingInput,
            generation: 0,
            elapsed,
            toast: None,
        };
        game.setup_round(0, now);
        Ok(game)
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_validating(&self) -> bool {
        matches!(self.phase, Phase::Validating { .. })
    }

    /// Recorded seconds for a round, if it has ended.
    pub fn elapsed(&self, index: usize) -> Option<u64> {
        self.elapsed.get(index).copied().flatten()
    }

    /// The current toast, if it has not expired yet.
    pub fn toast(&self, now: Instant) -> Option<&Toast> {
        self.toast
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < TOAST_DURATION)
    }

    /// Countdown line shown above the board.
    pub fn countdown_text(&self, now: Instant) -> String {
        format!(
            "Round {}/{} — {}",
            self.round.index + 1,
            self.rounds.len(),
            format_clock(self.round.remaining(now))
        )
    }

    /// Apply a key press. Returns a lookup the caller has to run when the
    /// key submitted a word that needs dictionary validation.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> Option<LookupRequest> {
        match (&self.phase, key) {
            (Phase::AwaitingInput, Key::Letter(c)) => {
                self.push_letter(c);
                None
            }
            (Phase::AwaitingInput, Key::Backspace) => {
                self.round.guess.pop();
                None
            }
            (Phase::AwaitingInput, Key::Enter) => match self.submit(now) {
                Ok(Submission::Pending(request)) => Some(request),
                Ok(Submission::Scored) => None,
                Err(e) => {
                    self.notify(e.to_string(), ToastKind::Error, now);
                    None
                }
            },
            (Phase::Finished, Key::Enter) => {
                self.restart(now);
                None
            }
            _ => None,
        }
    }

    fn push_letter(&mut self, c: char) {
        if !c.is_ascii_alphabetic() || self.round.guess.len() >= self.round.word_length {
            return;
        }
        self.round.guess.push(c.to_ascii_uppercase());
    }

    /// Only the round's own target skips the dictionary; everything else
    /// waits in `Validating` until [`Game::resolve_lookup`] is called.
    fn submit(&mut self, now: Instant) -> Result<Submission, GuessError> {
        if self.round.guess.len() != self.round.word_length {
            return Err(GuessError::IncompleteGuess);
        }

        if self.round.guess == self.round.target {
            self.score_guess(now);
            return Ok(Submission::Scored);
        }

        let word = self.round.guess.clone();
        debug!(%word, generation = self.generation, "awaiting dictionary");
        self.phase = Phase::Validating { word: word.clone() };
        Ok(Submission::Pending(LookupRequest {
            generation: self.generation,
            word,
        }))
    }

    /// Apply the answer to an earlier [`LookupRequest`].
    pub fn resolve_lookup(&mut self, response: &LookupResponse, now: Instant) -> Resolution {
        let pending = match &self.phase {
            Phase::Validating { word } => word,
            _ => {
                debug!(word = %response.word, "discarding lookup, nothing pending");
                return Resolution::Stale;
            }
        };
        if response.generation != self.generation || *pending != response.word {
            debug!(
                word = %response.word,
                generation = response.generation,
                current = self.generation,
                "discarding stale lookup"
            );
            return Resolution::Stale;
        }

        self.phase = Phase::AwaitingInput;
        match accept(
            response.validation,
            &response.word,
            &self.round.target,
            self.words.as_ref(),
        ) {
            Ok(()) => {
                self.score_guess(now);
                Resolution::Accepted
            }
            Err(e) => {
                self.notify(e.to_string(), ToastKind::Error, now);
                Resolution::Rejected(e)
            }
        }
    }

    fn score_guess(&mut self, now: Instant) {
        let word = std::mem::take(&mut self.round.guess);
        let scores = evaluate(&self.round.target, &word);
        self.round.keys.apply(&word, &scores);
        let solved = word == self.round.target;
        self.round.rows.push(Row { word, scores });

        if solved {
            let message = format!("You guessed it: {}!", self.round.target);
            self.notify(message, ToastKind::Success, now);
            self.finish_round(RoundOutcome::Solved, now);
        } else if self.round.rows.len() >= MAX_ATTEMPTS {
            let message = format!("The word was {}", self.round.target);
            self.notify(message, ToastKind::Error, now);
            self.finish_round(RoundOutcome::RowExhausted, now);
        }
    }

    /// Store the round time the first time it is called for a round.
    /// Capped at the round limit and rounded up to whole seconds.
    pub fn record_elapsed(&mut self, now: Instant) -> u64 {
        let index = self.round.index;
        if let Some(secs) = self.elapsed[index] {
            return secs;
        }
        let cap = self.round.time_limit.as_secs();
        let secs = ceil_secs(now.saturating_duration_since(self.round.started_at)).min(cap);
        self.elapsed[index] = Some(secs);
        secs
    }

    fn finish_round(&mut self, outcome: RoundOutcome, now: Instant) {
        if matches!(self.phase, Phase::Advancing { .. } | Phase::Finished) {
            return;
        }
        let secs = self.record_elapsed(now);
        info!(
            round = self.round.index + 1,
            %outcome,
            secs,
            attempts = self.round.rows.len(),
            "round over"
        );
        self.phase = Phase::Advancing {
            outcome,
            at: now + outcome.delay(),
        };
    }

    /// Periodic timer check: fires timeouts and due round transitions.
    pub fn on_tick(&mut self, now: Instant) {
        match self.phase {
            Phase::AwaitingInput | Phase::Validating { .. } => {
                if self.round.remaining(now).is_zero() {
                    self.time_out(now);
                }
            }
            Phase::Advancing { at, .. } if now >= at => self.advance(now),
            _ => {}
        }

        if self.toast(now).is_none() {
            self.toast = None;
        }
    }

    fn time_out(&mut self, now: Instant) {
        self.round.guess.clear();
        self.notify("Time's up! Moving to next round.", ToastKind::Error, now);
        self.finish_round(RoundOutcome::TimedOut, now);
    }

    fn advance(&mut self, now: Instant) {
        let next = self.round.index + 1;
        if next < self.rounds.len() {
            self.setup_round(next, now);
        } else {
            self.finish(now);
        }
    }

    fn setup_round(&mut self, index: usize, now: Instant) {
        self.generation += 1;
        self.round = Round::new(index, self.rounds[index], self.targets[index].clone(), now);
        self.phase = Phase::AwaitingInput;
        debug!(
            round = index + 1,
            length = self.round.word_length,
            generation = self.generation,
            "round started"
        );
        let message = format!("Round {} of {} begins!", index + 1, self.rounds.len());
        self.notify(message, ToastKind::Success, now);
    }

    fn finish(&mut self, now: Instant) {
        self.phase = Phase::Finished;
        let summary = self.summary();
        info!(total_secs = summary.total.as_secs(), "game finished");
        self.notify("You finished all rounds!", ToastKind::Success, now);
    }

    /// Start over from round one. New targets are picked rather than replaying the previous ones.
    pub fn restart(&mut self, now: Instant) {
        match pick_targets(&self.rounds, self.words.as_ref()) {
            Ok(targets) => self.targets = targets,
            Err(e) => warn!(error = %e, "keeping previous targets"),
        }
        self.elapsed = vec![None; self.rounds.len()];
        self.setup_round(0, now);
        self.notify("New spooky challenge started!", ToastKind::Info, now);
    }

    /// Per-round times; rounds without a recorded time are charged their full limit.
    pub fn summary(&self) -> Summary {
        let rounds: Vec<RoundTime> = self
            .rounds
            .iter()
            .zip(self.elapsed.iter())
            .map(|(config, recorded)| RoundTime {
                word_length: config.word_length,
                elapsed: Duration::from_secs(recorded.unwrap_or(config.time_limit_secs)),
                recorded: recorded.is_some(),
            })
            .collect();
        let total = rounds.iter().map(|r| r.elapsed).sum();
        Summary { rounds, total }
    }

    fn notify(&mut self, text: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toast = Some(Toast {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }
}

fn pick_targets(rounds: &[RoundConfig], words: &dyn WordSource) -> Result<Vec<String>, SetupError> {
    if rounds.is_empty() {
        return Err(SetupError::NoRounds);
    }
    rounds
        .iter()
        .map(|r| {
            words
                .pick_random(r.word_length)
                .ok_or(SetupError::NoWords(r.word_length))
        })
        .collect()
}
