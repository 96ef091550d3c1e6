use futures::future::join_all;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use bicho_shared::{SpinResponse, WinLine};

use crate::config::SlotConfig;
use crate::help::HelpContext;
use crate::outcome::OutcomeSource;
use crate::reel::{Reel, SettledBy, VISIBLE_ROWS};
use crate::surface::{ReelSurface, SlotDisplay, Timer};
use crate::symbols::{random_symbol, SymbolCache};

/// `grid[reel][row]`.
pub type Grid = Vec<Vec<String>>;

pub const INITIAL_GRID: [[&str; VISIBLE_ROWS]; 5] = [
    ["avestruz", "aguia", "burro", "borboleta", "cachorro"],
    ["cabra", "carneiro", "camelo", "cobra", "coelho"],
    ["cavalo", "elefante", "galo", "gato", "jacare"],
    ["leao", "macaco", "porco", "pavao", "peru"],
    ["touro", "tigre", "urso", "veado", "vaca"],
];

pub fn format_money(amount: f64) -> String {
    format!("R$ {amount:.2}")
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSource {
    Server,
    /// Request failed or carried no grid; symbols were drawn locally.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub bet: f64,
    pub grid: Grid,
    pub source: GridSource,
    pub wins: Vec<WinLine>,
    pub win_amount: f64,
    pub balance: f64,
    pub settled_by: Vec<SettledBy>,
}

type StartHook = Box<dyn FnMut(&Grid)>;
type EndHook = Box<dyn FnMut(&[WinLine])>;

#[derive(Default)]
pub struct SpinHooks {
    pub on_spin_start: Option<StartHook>,
    pub on_spin_end: Option<EndHook>,
}

pub struct Slot<O, D, S, T> {
    config: SlotConfig,
    balance: f64,
    bet: f64,
    current: Grid,
    next: Grid,
    reels: Vec<Reel<S>>,
    cache: SymbolCache,
    rng: StdRng,
    source: O,
    display: D,
    timer: T,
    hooks: SpinHooks,
}

impl<O, D, S, T> Slot<O, D, S, T>
where
    O: OutcomeSource,
    D: SlotDisplay,
    S: ReelSurface,
    T: Timer,
{
    /// Builds one reel per surface, left to right. `seed` drives filler
    /// symbols and the offline fallback grid only.
    pub fn new(config: SlotConfig, source: O, display: D, timer: T, surfaces: Vec<S>, seed: u64) -> Self {
        let mut cache = SymbolCache::new();
        cache.preload();
        let mut rng = StdRng::seed_from_u64(seed);

        let current: Grid = (0..surfaces.len())
            .map(|idx| match INITIAL_GRID.get(idx) {
                Some(column) => column.iter().map(|s| s.to_string()).collect(),
                None => (0..VISIBLE_ROWS).map(|_| random_symbol(&mut rng).to_string()).collect(),
            })
            .collect();
        let reels = surfaces
            .into_iter()
            .enumerate()
            .map(|(idx, surface)| Reel::new(idx, surface, &current[idx], &mut cache))
            .collect();

        let mut slot = Self {
            bet: config.initial_bet,
            config,
            balance: 0.0,
            next: current.clone(),
            current,
            reels,
            cache,
            rng,
            source,
            display,
            timer,
            hooks: SpinHooks::default(),
        };
        slot.update_ui(0.0);
        slot
    }

    pub fn with_hooks(mut self, hooks: SpinHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn reels(&self) -> &[Reel<S>] {
        &self.reels
    }

    pub fn current_grid(&self) -> &Grid {
        &self.current
    }

    pub fn next_grid(&self) -> &Grid {
        &self.next
    }

    pub fn cache(&self) -> &SymbolCache {
        &self.cache
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn source(&self) -> &O {
        &self.source
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn help_context(&self) -> HelpContext {
        HelpContext::new(self.reels.len(), VISIBLE_ROWS)
    }

    /// Overrides the locally known balance (offline play, tests).
    pub fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
        self.update_ui(0.0);
    }

    /// First contact with the server: adopts whatever grid and balance it
    /// reports. Failures are logged and otherwise ignored.
    pub async fn init(&mut self) {
        match self.source.request_outcome(self.bet).await {
            Ok(resp) => {
                if let Some(grid) = resp.grid() {
                    self.next = grid.clone();
                }
                if let Some(balance) = resp.balance_player {
                    self.balance = balance;
                    self.update_ui(0.0);
                }
                info!(balance = self.balance, "initial state loaded");
            }
            Err(err) => warn!(error = %err, "initial outcome request failed"),
        }
    }

    fn random_grid(&mut self) -> Grid {
        let mut grid = Vec::with_capacity(self.current.len());
        for column in &self.current {
            grid.push(
                (0..column.len())
                    .map(|_| random_symbol(&mut self.rng).to_string())
                    .collect(),
            );
        }
        grid
    }

    /// Plays one round. Returns `None` without touching any state when the
    /// balance does not cover the bet.
    pub async fn spin(&mut self) -> Option<RoundReport> {
        if self.balance < self.bet {
            debug!(balance = self.balance, bet = self.bet, "spin rejected");
            return None;
        }
        self.display.set_spin_enabled(false);

        let response: Option<SpinResponse> = match self.source.request_outcome(self.bet).await {
            Ok(resp) => Some(resp),
            Err(err) => {
                warn!(error = %err, "outcome request failed, spinning locally");
                None
            }
        };

        let source = match response.as_ref().and_then(|r| r.grid()) {
            Some(grid) => {
                self.next = grid.clone();
                if let Some(balance) = response.as_ref().and_then(|r| r.balance_player) {
                    self.balance = balance;
                }
                GridSource::Server
            }
            None => {
                self.next = self.random_grid();
                GridSource::Fallback
            }
        };

        if let Some(hook) = self.hooks.on_spin_start.as_mut() {
            hook(&self.next);
        }

        // Every reel gets its symbols before any of them starts moving.
        for reel in &mut self.reels {
            let column = self.next.get(reel.index()).map(Vec::as_slice).unwrap_or(&[]);
            reel.render_symbols(column, &mut self.cache, &mut self.rng);
        }
        let timer = &self.timer;
        let settled_by = join_all(self.reels.iter_mut().map(|reel| reel.spin(timer))).await;

        let wins: Vec<WinLine> = response.as_ref().map(|r| r.wins().to_vec()).unwrap_or_default();
        for win in &wins {
            self.highlight_win(win);
        }
        let win_amount = response.as_ref().map(SpinResponse::win_amount).unwrap_or(0.0);
        self.update_ui(win_amount);
        self.current = self.next.clone();

        self.display.set_spin_enabled(true);
        if let Some(hook) = self.hooks.on_spin_end.as_mut() {
            hook(&wins);
        }
        info!(?source, win = win_amount, balance = self.balance, "round finished");

        Some(RoundReport {
            bet: self.bet,
            grid: self.current.clone(),
            source,
            wins,
            win_amount,
            balance: self.balance,
            settled_by,
        })
    }

    /// Spins, then keeps spinning while autoplay is on and the balance
    /// covers the bet.
    pub async fn play(&mut self) -> Vec<RoundReport> {
        let mut rounds = Vec::new();
        while let Some(report) = self.spin().await {
            rounds.push(report);
            if !self.display.autoplay_enabled() {
                break;
            }
            self.timer.sleep(self.config.autoplay_delay()).await;
        }
        rounds
    }

    fn highlight_win(&mut self, win: &WinLine) {
        for &[reel, row] in &win.positions {
            match self.reels.get_mut(reel) {
                Some(r) => {
                    r.mark_win(row);
                }
                None => warn!(reel, row, "win position outside the reel set"),
            }
        }
    }

    /// Lowers the bet by one step, capped to the balance but never below
    /// `bet_min`. A balance under `bet_min` therefore leaves the bet above
    /// the balance, and the next spin is rejected until a deposit.
    pub fn bet_minus(&mut self) {
        let step = self.config.effective_step();
        let mut bet = round_cents(self.bet - step).max(self.config.bet_min);
        if bet > self.balance {
            bet = self.balance.max(self.config.bet_min);
        }
        self.bet = bet;
        self.update_ui(0.0);
    }

    pub fn bet_plus(&mut self) {
        let step = self.config.effective_step();
        self.bet = round_cents(self.bet + step).min(self.config.bet_max);
        self.update_ui(0.0);
    }

    pub fn update_ui(&mut self, win_amount: f64) {
        self.display.show_balance(&format_money(self.balance));
        self.display.show_bet(&format_money(self.bet));
        if win_amount > 0.0 {
            self.display.show_win(&format_money(win_amount), self.config.win_fade());
        }
        if self.balance <= 0.0 {
            self.display.show_deposit_prompt();
        }
    }
}
