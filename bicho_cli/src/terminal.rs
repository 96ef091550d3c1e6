use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use bicho_core::{ReelSurface, SlotDisplay, SpinMotion, SymbolView, Timer, WinLine, DEPOSIT_URL};

pub struct TokioTimer;

impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

/// In-memory strip for one reel; the animation is a scaled sleep.
/// Winning cells are drawn from the round report, not from here.
pub struct TerminalReel {
    entries: Vec<String>,
    finished: Rc<Cell<bool>>,
    speed: f64,
}

impl TerminalReel {
    /// `speed` scales animation time; 0 settles immediately.
    pub fn new(speed: f64) -> Self {
        Self {
            entries: Vec::new(),
            finished: Rc::new(Cell::new(true)),
            speed: speed.max(0.0),
        }
    }
}

impl ReelSurface for TerminalReel {
    type Settled = LocalBoxFuture<'static, ()>;

    fn append(&mut self, symbols: &[SymbolView]) {
        self.entries.extend(symbols.iter().map(|s| s.name().to_string()));
    }

    fn remove_leading(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
    }

    fn clear_highlights(&mut self) {}

    fn add_highlight(&mut self, row: usize) {
        tracing::trace!(row, symbol = self.entries.get(row).map(String::as_str), "win cell");
    }

    fn cancel_animation(&mut self) {
        self.finished.set(false);
    }

    fn play_animation(&mut self, motion: SpinMotion) -> Self::Settled {
        let finished = Rc::clone(&self.finished);
        let scaled = motion.duration.mul_f64(self.speed);
        async move {
            tokio::time::sleep(scaled).await;
            finished.set(true);
        }
        .boxed_local()
    }

    fn animation_finished(&self) -> bool {
        self.finished.get()
    }

    fn finish_animation(&mut self) {
        self.finished.set(true);
    }
}

/// Prints slot widgets to stdout. Starts quiet so setup noise is skipped.
#[derive(Default)]
pub struct TerminalDisplay {
    balance: String,
    bet: String,
    prompt_shown: bool,
    autoplay_left: Cell<u32>,
    quiet: bool,
}

impl TerminalDisplay {
    pub fn new(autoplay_rounds: u32) -> Self {
        Self {
            autoplay_left: Cell::new(autoplay_rounds),
            quiet: true,
            ..Self::default()
        }
    }

    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn status_line(&self) -> String {
        format!("saldo {}  aposta {}", self.balance, self.bet)
    }
}

impl SlotDisplay for TerminalDisplay {
    fn show_balance(&mut self, text: &str) {
        self.balance = text.to_string();
    }

    fn show_bet(&mut self, text: &str) {
        self.bet = text.to_string();
    }

    fn show_win(&mut self, text: &str, _fade_after: Duration) {
        if !self.quiet {
            println!("*** ganhou {text} ***");
        }
    }

    fn show_deposit_prompt(&mut self) {
        if self.quiet || self.prompt_shown {
            return;
        }
        self.prompt_shown = true;
        println!("Saldo insuficiente!! Deposite em {DEPOSIT_URL}");
    }

    fn set_spin_enabled(&mut self, enabled: bool) {
        tracing::trace!(enabled, "spin control");
    }

    fn autoplay_enabled(&self) -> bool {
        let left = self.autoplay_left.get();
        if left == 0 {
            return false;
        }
        self.autoplay_left.set(left - 1);
        true
    }
}

/// Rows top to bottom, reels left to right; winning cells in brackets.
pub fn render_grid(grid: &[Vec<String>], wins: &[WinLine]) -> String {
    let winning: BTreeSet<(usize, usize)> = wins
        .iter()
        .flat_map(|w| w.positions.iter().map(|&[reel, row]| (reel, row)))
        .collect();
    let rows = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for row in 0..rows {
        let cells: Vec<String> = grid
            .iter()
            .enumerate()
            .map(|(reel, column)| {
                let name = column.get(row).map(String::as_str).unwrap_or("-");
                if winning.contains(&(reel, row)) {
                    format!("[{name:^9}]")
                } else {
                    format!(" {name:^9} ")
                }
            })
            .collect();
        out.push_str(cells.join("|").trim_end());
        out.push('\n');
    }
    out
}
