//! Timed drill over a queue of one-move puzzles.
//!
//! A drill picks a side at random, queues a shuffled and capped sample of
//! that side's puzzles and serves them one at a time through a
//! [`PuzzleSession`] in drill mode. Each solved puzzle raises the rating by
//! the configured delta and each wrong move lowers it; both are recorded
//! with the time taken. The countdown ends the drill and appends the
//! session's results to the log in the store.
//!
//! Starting is split in two so that the dataset can be fetched in between:
//! [`DrillEngine::begin`] hands out a [`LoadTicket`] and
//! [`DrillEngine::populate`] accepts the puzzles for it. Tickets issued
//! before an exit or time-up are stale and their puzzles are dropped.

use chess_core::{Clock, Color, Countdown, Move, Position, RulesEngine};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DrillConfig;
use crate::dataset::{PuzzleRecord, PuzzleSource};
use crate::error::{DatasetError, DrillError, DrillResult, PuzzleError};
use crate::puzzle::{MoveVerdict, PuzzleMode, PuzzleSession, WrongMove, WrongMoveHook};
use crate::rating::RatingTracker;
use crate::results::{AttemptResult, DrillLog, DrillLogEntry, Scoreboard};
use crate::store::KeyValueStore;

/// Handle for one pending dataset load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    QueueExhausted,
    Exited,
    LoadFailed,
}

/// What a drill operation did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    PuzzleLoaded {
        id: String,
        rating: u32,
        /// SAN of the opponent's setup move
        setup: String,
    },
    Solved {
        id: String,
        time_ms: u64,
        rating: i64,
    },
    Failed {
        id: String,
        time_ms: u64,
        rating: i64,
        expected: Move,
        played: Move,
    },
    /// Puzzle data the rules engine could not follow; no rating change
    Skipped { id: String, reason: String },
    Ended {
        reason: EndReason,
        results: Vec<AttemptResult>,
    },
}

pub struct DrillEngine<R, C, S> {
    rules: R,
    clock: C,
    store: S,
    config: DrillConfig,
    rng: StdRng,

    active: bool,
    loading: bool,
    player_side: Color,
    queue: VecDeque<PuzzleRecord>,
    current: Option<PuzzleRecord>,
    puzzle: PuzzleSession,
    results: Vec<AttemptResult>,
    rating: RatingTracker,
    countdown: Countdown,

    next_ticket: u64,
    pending: Option<LoadTicket>,
    /// Epoch ms at which the player's turn began
    turn_started: u64,
    /// Set once the current puzzle's completion has been recorded
    recorded: bool,
    /// Filled by the puzzle's wrong-move hook, drained by `submit_move`
    missed: Rc<RefCell<Option<WrongMove>>>,
}

impl<R: RulesEngine, C: Clock, S: KeyValueStore> DrillEngine<R, C, S> {
    pub fn new(rules: R, clock: C, store: S, config: DrillConfig, seed: u64) -> Self {
        let rating = RatingTracker::load(&store, config.initial_rating, config.rating_delta);
        let countdown = config.countdown();
        Self {
            rules,
            clock,
            store,
            config,
            rng: StdRng::seed_from_u64(seed),
            active: false,
            loading: false,
            player_side: Color::White,
            queue: VecDeque::new(),
            current: None,
            puzzle: PuzzleSession::new(),
            results: Vec::new(),
            rating,
            countdown,
            next_ticket: 0,
            pending: None,
            turn_started: 0,
            recorded: false,
            missed: Rc::default(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start a drill, loading the chosen side's puzzles from `source`.
    pub fn start<P: PuzzleSource>(&mut self, source: &P) -> DrillResult<Vec<DrillEvent>> {
        let ticket = self.begin();
        match source.load(self.player_side) {
            Ok(puzzles) => self.populate(ticket, puzzles),
            Err(e) => {
                self.load_failed(ticket, &e);
                Err(DrillError::Dataset(e))
            }
        }
    }

    /// Pick a side and enter the loading state.
    pub fn begin(&mut self) -> LoadTicket {
        self.reset_session();
        self.player_side = if self.rng.gen_bool(0.5) {
            Color::White
        } else {
            Color::Black
        };
        self.active = true;
        self.loading = true;

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.pending = Some(ticket);
        info!(side = %self.player_side, "drill starting");
        ticket
    }

    /// Queue the loaded puzzles, start the clock and serve the first puzzle.
    ///
    /// Puzzles for a stale ticket are ignored.
    pub fn populate(
        &mut self,
        ticket: LoadTicket,
        mut puzzles: Vec<PuzzleRecord>,
    ) -> DrillResult<Vec<DrillEvent>> {
        if self.pending != Some(ticket) {
            debug!(?ticket, "ignoring stale puzzle load");
            return Ok(Vec::new());
        }
        self.pending = None;
        self.loading = false;

        puzzles.shuffle(&mut self.rng);
        puzzles.truncate(self.config.queue_cap);
        info!(count = puzzles.len(), "puzzles queued");
        self.queue = puzzles.into();

        self.countdown.start(self.clock.now_ms());
        self.load_next()
    }

    /// Abandon a drill whose dataset could not be loaded.
    pub fn load_failed(&mut self, ticket: LoadTicket, error: &DatasetError) -> Vec<DrillEvent> {
        if self.pending != Some(ticket) {
            return Vec::new();
        }
        warn!(%error, "could not load puzzles");
        vec![self.end(EndReason::LoadFailed)]
    }

    /// Serve the next puzzle from the queue.
    ///
    /// Puzzles the rules engine cannot set up are skipped. An empty queue
    /// ends the drill and saves its results.
    pub fn load_next(&mut self) -> DrillResult<Vec<DrillEvent>> {
        if !self.active {
            return Err(DrillError::NotActive);
        }
        if self.loading {
            return Err(DrillError::Loading);
        }
        self.puzzle.exit();
        self.current = None;

        let mut events = Vec::new();
        loop {
            let record = match self.pop_puzzle() {
                Ok(record) => record,
                Err(DrillError::QueueExhausted) => {
                    info!("puzzle queue exhausted");
                    events.push(self.end(EndReason::QueueExhausted));
                    return Ok(events);
                }
                Err(e) => return Err(e),
            };

            match self.start_puzzle(&record) {
                Ok(setup) => {
                    debug!(id = %record.id, %setup, "puzzle loaded");
                    events.push(DrillEvent::PuzzleLoaded {
                        id: record.id.clone(),
                        rating: record.rating,
                        setup,
                    });
                    self.current = Some(record);
                    self.recorded = false;
                    self.turn_started = self.clock.now_ms();
                    return Ok(events);
                }
                Err(reason) => {
                    warn!(id = %record.id, %reason, "skipping puzzle");
                    events.push(DrillEvent::Skipped {
                        id: record.id,
                        reason,
                    });
                }
            }
        }
    }

    fn pop_puzzle(&mut self) -> DrillResult<PuzzleRecord> {
        self.queue.pop_front().ok_or(DrillError::QueueExhausted)
    }

    /// Apply the setup move and begin the puzzle; returns the setup SAN.
    fn start_puzzle(&mut self, record: &PuzzleRecord) -> Result<String, String> {
        let setup = record
            .setup_position(&self.rules)
            .map_err(|e| format!("setup move: {e}"))?;
        let solution = record
            .solution_moves()
            .map_err(|e| format!("solution: {e}"))?;

        let id = record.id.clone();
        let missed = Rc::clone(&self.missed);
        let hook: WrongMoveHook = Box::new(move |w: &WrongMove| {
            debug!(%id, expected = %w.expected, played = %w.played, "wrong move");
            *missed.borrow_mut() = Some(*w);
        });
        self.puzzle
            .start(
                &self.rules,
                setup.position,
                solution,
                PuzzleMode::Drill,
                Some(hook),
            )
            .map_err(|e| e.to_string())?;
        Ok(setup.san)
    }

    /// Submit the player's move for the current puzzle.
    ///
    /// Illegal moves are reported as errors and change nothing. A wrong
    /// move fails the puzzle; either outcome moves on to the next one.
    pub fn submit_move(&mut self, mv: Move) -> DrillResult<Vec<DrillEvent>> {
        if !self.active {
            return Err(DrillError::NotActive);
        }
        if self.loading {
            return Err(DrillError::Loading);
        }

        match self.puzzle.submit(&self.rules, mv) {
            Ok(MoveVerdict::Wrong { .. }) => {
                let missed = self.missed.borrow_mut().take();
                match missed {
                    Some(wrong) => self.record_failure(wrong),
                    None => Ok(Vec::new()),
                }
            }
            Ok(MoveVerdict::Correct { .. }) => Ok(Vec::new()),
            Ok(MoveVerdict::Solved) => self.check_completion(),
            Err(PuzzleError::EngineDesync { index, mv, source }) => {
                let id = self.current_id();
                warn!(%id, index, %mv, %source, "solution desync, skipping puzzle");
                let mut events = vec![DrillEvent::Skipped {
                    id,
                    reason: format!("solution move {index} ({mv}): {source}"),
                }];
                events.extend(self.load_next()?);
                Ok(events)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record the current puzzle as solved if it is complete.
    ///
    /// Safe to call any number of times per puzzle: the success is recorded
    /// once and the next puzzle is loaded once.
    pub fn check_completion(&mut self) -> DrillResult<Vec<DrillEvent>> {
        if !self.active
            || self.recorded
            || !self.puzzle.is_completed()
            || self.puzzle.mode() != PuzzleMode::Drill
        {
            return Ok(Vec::new());
        }
        self.recorded = true;

        let time_ms = self.elapsed_ms();
        let rating = self.rating.increment();
        self.persist_rating();
        self.results.push(AttemptResult {
            success: true,
            time_ms,
        });
        let id = self.current_id();
        info!(%id, time_ms, rating, "puzzle solved");

        let mut events = vec![DrillEvent::Solved {
            id,
            time_ms,
            rating,
        }];
        events.extend(self.load_next()?);
        Ok(events)
    }

    /// Record the miss reported by the wrong-move hook.
    fn record_failure(&mut self, wrong: WrongMove) -> DrillResult<Vec<DrillEvent>> {
        let WrongMove { expected, played, .. } = wrong;
        if self.recorded {
            return Ok(Vec::new());
        }
        self.recorded = true;

        let time_ms = self.elapsed_ms();
        let rating = self.rating.decrement();
        self.persist_rating();
        self.results.push(AttemptResult {
            success: false,
            time_ms,
        });
        let id = self.current_id();
        info!(%id, time_ms, rating, %expected, %played, "puzzle failed");

        let mut events = vec![DrillEvent::Failed {
            id,
            time_ms,
            rating,
            expected,
            played,
        }];
        events.extend(self.load_next()?);
        Ok(events)
    }

    /// Check the countdown; ends the drill once it has run out.
    pub fn tick(&mut self) -> Vec<DrillEvent> {
        if self.active && !self.loading && self.countdown.is_expired(self.clock.now_ms()) {
            return self.time_up();
        }
        Vec::new()
    }

    /// Save the session's results and stop. The puzzle in progress is
    /// dropped without a rating change.
    pub fn time_up(&mut self) -> Vec<DrillEvent> {
        if !self.active {
            return Vec::new();
        }
        info!(attempts = self.results.len(), "time up");
        vec![self.end(EndReason::TimeUp)]
    }

    /// Stop without saving results.
    pub fn exit(&mut self) -> Vec<DrillEvent> {
        if !self.active {
            return Vec::new();
        }
        info!("drill exited");
        vec![self.end(EndReason::Exited)]
    }

    fn end(&mut self, reason: EndReason) -> DrillEvent {
        let results = std::mem::take(&mut self.results);
        if matches!(reason, EndReason::TimeUp | EndReason::QueueExhausted) {
            let entry = DrillLogEntry {
                timestamp: self.clock.now_ms(),
                results: results.clone(),
            };
            if let Err(e) = DrillLog::append(&mut self.store, entry) {
                warn!(error = %e, "could not save drill results");
            }
        }
        self.reset_session();
        DrillEvent::Ended { reason, results }
    }

    fn reset_session(&mut self) {
        self.active = false;
        self.loading = false;
        self.pending = None;
        self.queue.clear();
        self.current = None;
        self.puzzle.exit();
        self.results.clear();
        self.countdown.stop();
        self.recorded = false;
        self.missed.borrow_mut().take();
    }

    fn persist_rating(&mut self) {
        if let Err(e) = self.rating.save(&mut self.store) {
            warn!(error = %e, "could not save rating");
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.turn_started)
    }

    fn current_id(&self) -> String {
        self.current
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn player_side(&self) -> Color {
        self.player_side
    }

    pub fn current_puzzle(&self) -> Option<&PuzzleRecord> {
        self.current.as_ref()
    }

    /// Position the player is solving from.
    pub fn position(&self) -> Option<&Position> {
        self.current.as_ref().map(|_| self.puzzle.position())
    }

    pub fn puzzle_session(&self) -> &PuzzleSession {
        &self.puzzle
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    pub fn rating(&self) -> i64 {
        self.rating.rating()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::from_results(&self.results)
    }

    pub fn remaining(&self) -> Duration {
        self.countdown.remaining(self.clock.now_ms())
    }

    /// Remaining time as `M:SS`.
    pub fn remaining_label(&self) -> String {
        Countdown::format(self.remaining())
    }

    pub fn is_low_time(&self) -> bool {
        self.countdown.is_low_time(self.clock.now_ms())
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
