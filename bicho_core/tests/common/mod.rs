#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use bicho_core::{
    OutcomeError, OutcomeSource, ReelSurface, Slot, SlotConfig, SlotDisplay, SpinMotion,
    SpinResponse, SymbolView, Timer, WinLine,
};

pub struct TokioTimer;

impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Completion fires after this fraction of the spin duration.
    Completes(f64),
    /// Completion never fires (backgrounded tab).
    Stalls,
}

/// `(reel, call)` pairs in the order the surfaces saw them.
pub type EventLog = Rc<RefCell<Vec<(usize, &'static str)>>>;

pub struct FakeReel {
    pub id: usize,
    pub events: EventLog,
    pub entries: Vec<String>,
    pub highlights: BTreeSet<usize>,
    pub animation: Animation,
    pub plays: usize,
    pub cancels: usize,
    pub forced_finishes: usize,
    pub last_motion: Option<SpinMotion>,
    finished: Rc<Cell<bool>>,
}

impl FakeReel {
    pub fn new(animation: Animation) -> Self {
        Self::logged(0, animation, EventLog::default())
    }

    pub fn logged(id: usize, animation: Animation, events: EventLog) -> Self {
        Self {
            id,
            events,
            entries: Vec::new(),
            highlights: BTreeSet::new(),
            animation,
            plays: 0,
            cancels: 0,
            forced_finishes: 0,
            last_motion: None,
            finished: Rc::new(Cell::new(false)),
        }
    }
}

impl ReelSurface for FakeReel {
    type Settled = LocalBoxFuture<'static, ()>;

    fn append(&mut self, symbols: &[SymbolView]) {
        self.events.borrow_mut().push((self.id, "append"));
        self.entries.extend(symbols.iter().map(|s| s.name().to_string()));
    }

    fn remove_leading(&mut self, count: usize) {
        self.entries.drain(..count);
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn add_highlight(&mut self, row: usize) {
        self.highlights.insert(row);
    }

    fn cancel_animation(&mut self) {
        self.cancels += 1;
        self.finished.set(false);
    }

    fn play_animation(&mut self, motion: SpinMotion) -> Self::Settled {
        self.plays += 1;
        self.events.borrow_mut().push((self.id, "play"));
        self.last_motion = Some(motion);
        let finished = Rc::clone(&self.finished);
        match self.animation {
            Animation::Completes(fraction) => async move {
                tokio::time::sleep(motion.duration.mul_f64(fraction)).await;
                finished.set(true);
            }
            .boxed_local(),
            Animation::Stalls => futures::future::pending::<()>().boxed_local(),
        }
    }

    fn animation_finished(&self) -> bool {
        self.finished.get()
    }

    fn finish_animation(&mut self) {
        self.forced_finishes += 1;
        self.finished.set(true);
    }
}

#[derive(Default)]
pub struct FakeDisplay {
    pub balance: Option<String>,
    pub bet: Option<String>,
    pub win: Option<String>,
    pub wins_shown: usize,
    pub deposit_prompts: usize,
    pub spin_enabled_log: Vec<bool>,
    /// Autoplay reports enabled this many more times.
    pub autoplay_rounds: Cell<u32>,
}

impl SlotDisplay for FakeDisplay {
    fn show_balance(&mut self, text: &str) {
        self.balance = Some(text.to_string());
    }

    fn show_bet(&mut self, text: &str) {
        self.bet = Some(text.to_string());
    }

    fn show_win(&mut self, text: &str, _fade_after: Duration) {
        self.win = Some(text.to_string());
        self.wins_shown += 1;
    }

    fn show_deposit_prompt(&mut self) {
        self.deposit_prompts += 1;
    }

    fn set_spin_enabled(&mut self, enabled: bool) {
        self.spin_enabled_log.push(enabled);
    }

    fn autoplay_enabled(&self) -> bool {
        let left = self.autoplay_rounds.get();
        if left == 0 {
            return false;
        }
        self.autoplay_rounds.set(left - 1);
        true
    }
}

/// Replays canned outcomes; an empty script behaves like a dead network.
#[derive(Default)]
pub struct ScriptedSource {
    script: RefCell<VecDeque<Result<SpinResponse, OutcomeError>>>,
    pub requests: RefCell<Vec<f64>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: SpinResponse) -> Self {
        self.script.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(self) -> Self {
        self.script
            .borrow_mut()
            .push_back(Err(OutcomeError::Transport("connection refused".into())));
        self
    }
}

impl OutcomeSource for ScriptedSource {
    async fn request_outcome(&self, bet: f64) -> Result<SpinResponse, OutcomeError> {
        self.requests.borrow_mut().push(bet);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(OutcomeError::Transport("no scripted response".into())))
    }
}

pub type TestSlot = Slot<ScriptedSource, FakeDisplay, FakeReel, TokioTimer>;

pub fn slot_with(source: ScriptedSource, animation: Animation) -> TestSlot {
    let surfaces = (0..5).map(|_| FakeReel::new(animation)).collect();
    Slot::new(
        SlotConfig::default(),
        source,
        FakeDisplay::default(),
        TokioTimer,
        surfaces,
        7,
    )
}

/// Like [`slot_with`], with every reel writing to one event log. Setup
/// calls are cleared from the log.
pub fn slot_with_log(source: ScriptedSource, animation: Animation) -> (TestSlot, EventLog) {
    let log = EventLog::default();
    let surfaces = (0..5)
        .map(|id| FakeReel::logged(id, animation, Rc::clone(&log)))
        .collect();
    let slot = Slot::new(
        SlotConfig::default(),
        source,
        FakeDisplay::default(),
        TokioTimer,
        surfaces,
        7,
    );
    log.borrow_mut().clear();
    (slot, log)
}

pub fn grid_of(name: &str) -> Vec<Vec<String>> {
    vec![vec![name.to_string(); 5]; 5]
}

pub fn response(grid: Vec<Vec<String>>, balance: f64) -> SpinResponse {
    SpinResponse {
        grid: Some(grid),
        balance_player: Some(balance),
        wins: None,
        win: None,
    }
}

pub fn win_line(positions: &[[usize; 2]]) -> WinLine {
    WinLine {
        positions: positions.to_vec(),
    }
}
