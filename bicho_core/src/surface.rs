use std::future::Future;
use std::time::Duration;

use crate::symbols::SymbolView;

/// Scroll parameters for one reel spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinMotion {
    pub duration: Duration,
    /// How many visible windows (of 5 rows) the strip travels.
    pub windows: f64,
}

/// Where a reel's strip is drawn, plus its single animation primitive.
///
/// Entries are addressed by position: index 0 is the oldest (top) entry.
pub trait ReelSurface {
    /// Completion signal of one animation run. Never resolving is allowed;
    /// the reel races it against a fallback timer.
    type Settled: Future<Output = ()>;

    fn append(&mut self, symbols: &[SymbolView]);
    fn remove_leading(&mut self, count: usize);

    fn clear_highlights(&mut self);
    fn add_highlight(&mut self, row: usize);

    fn cancel_animation(&mut self);
    fn play_animation(&mut self, motion: SpinMotion) -> Self::Settled;
    fn animation_finished(&self) -> bool;
    fn finish_animation(&mut self);
}

/// Slot-level widgets: balance, bet and win labels plus the controls.
///
/// Implementations must tolerate missing widgets; every call is best-effort.
pub trait SlotDisplay {
    fn show_balance(&mut self, text: &str);
    fn show_bet(&mut self, text: &str);
    /// Show a win and fade it out after `fade_after`.
    fn show_win(&mut self, text: &str, fade_after: Duration);
    /// Blocking "insufficient balance" prompt. Called again while it is
    /// already visible; showing it twice must be a no-op.
    fn show_deposit_prompt(&mut self);
    fn set_spin_enabled(&mut self, enabled: bool);
    fn autoplay_enabled(&self) -> bool;
}

pub trait Timer {
    type Sleep: Future<Output = ()>;

    fn sleep(&self, duration: Duration) -> Self::Sleep;
}
