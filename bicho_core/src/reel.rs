use std::collections::{BTreeSet, VecDeque};
use std::pin::pin;
use std::time::Duration;

use futures::future::{select, Either};
use rand::Rng;
use tracing::debug;

use crate::surface::{ReelSurface, SpinMotion, Timer};
use crate::symbols::{random_symbol, SymbolCache, SymbolView};

/// Rows in the visible window.
pub const VISIBLE_ROWS: usize = 5;
/// Strip entries appended per whole unit of [`factor`].
pub const SYMBOLS_PER_FACTOR: usize = 25;

/// Duration and distance multiplier of reel `index`: `1 + (index / 2)^2`.
pub fn factor(index: usize) -> f64 {
    1.0 + (index as f64 / 2.0).powi(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelState {
    Idle,
    Animating,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledBy {
    Animation,
    Timeout,
}

pub struct Reel<S> {
    index: usize,
    strip: VecDeque<SymbolView>,
    highlighted: BTreeSet<usize>,
    state: ReelState,
    surface: S,
}

impl<S: ReelSurface> Reel<S> {
    pub fn new(index: usize, mut surface: S, initial: &[String], cache: &mut SymbolCache) -> Self {
        let mut strip: VecDeque<SymbolView> = initial.iter().map(|name| cache.view(name)).collect();
        surface.cancel_animation();
        surface.append(strip.make_contiguous());
        Self {
            index,
            strip,
            highlighted: BTreeSet::new(),
            state: ReelState::Idle,
            surface,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn factor(&self) -> f64 {
        factor(self.index)
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    pub fn strip(&self) -> impl ExactSizeIterator<Item = &SymbolView> {
        self.strip.iter()
    }

    pub fn symbol_names(&self) -> Vec<String> {
        self.strip.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn highlighted_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlighted.iter().copied()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Number of entries [`Reel::render_symbols`] appends for this reel.
    pub fn render_len(&self) -> usize {
        self.factor().floor() as usize * SYMBOLS_PER_FACTOR
    }

    /// Appends the scroll filler followed by the next visible window.
    ///
    /// The last [`VISIBLE_ROWS`] appended entries are `next`; a short
    /// `next` is padded with random symbols.
    pub fn render_symbols<R: Rng>(&mut self, next: &[String], cache: &mut SymbolCache, rng: &mut R) {
        let total = self.render_len();
        let window_start = total - VISIBLE_ROWS;
        let mut fresh = Vec::with_capacity(total);
        for i in 0..total {
            let name = if i >= window_start {
                next.get(i - window_start)
                    .map(String::as_str)
                    .unwrap_or_else(|| random_symbol(rng))
            } else {
                random_symbol(rng)
            };
            fresh.push(cache.view(name));
        }
        self.surface.append(&fresh);
        self.strip.extend(fresh);
    }

    pub fn motion(&self) -> SpinMotion {
        let factor = self.factor();
        SpinMotion {
            duration: Duration::from_secs_f64(factor),
            windows: (factor.floor() * SYMBOLS_PER_FACTOR as f64) / VISIBLE_ROWS as f64,
        }
    }

    /// Runs one spin: restart the animation, wait for it or for the fallback
    /// timer, then drop everything above the new visible window.
    pub async fn spin<T: Timer>(&mut self, timer: &T) -> SettledBy {
        let motion = self.motion();
        self.surface.cancel_animation();
        self.state = ReelState::Animating;
        let settled = self.surface.play_animation(motion);
        let fallback = timer.sleep(motion.duration);

        let by = match select(pin!(settled), pin!(fallback)).await {
            Either::Left(_) => SettledBy::Animation,
            Either::Right(_) => SettledBy::Timeout,
        };
        if !self.surface.animation_finished() {
            self.surface.finish_animation();
        }

        let excess = self.strip.len().saturating_sub(VISIBLE_ROWS);
        self.strip.drain(..excess);
        self.surface.remove_leading(excess);
        self.highlighted.clear();
        self.surface.clear_highlights();
        self.state = ReelState::Settled;
        debug!(reel = self.index, ?by, removed = excess, "reel settled");
        by
    }

    pub fn highlight_row(&mut self, row: usize) {
        self.highlighted.clear();
        self.surface.clear_highlights();
        self.mark_win(row);
    }

    /// Marks `row` as winning without clearing other marks. Rows past the
    /// strip are ignored.
    pub fn mark_win(&mut self, row: usize) -> bool {
        if row >= self.strip.len() {
            return false;
        }
        if self.highlighted.insert(row) {
            self.surface.add_highlight(row);
        }
        true
    }
}
