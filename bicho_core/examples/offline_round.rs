use std::future::{ready, Ready};
use std::time::Duration;

use bicho_core::{
    format_money, OutcomeError, OutcomeSource, ReelSurface, Slot, SlotConfig, SlotDisplay, SpinMotion, SpinResponse,
    SymbolView, Timer, INITIAL_GRID,
};

struct Offline;

impl OutcomeSource for Offline {
    async fn request_outcome(&self, _bet: f64) -> Result<SpinResponse, OutcomeError> {
        Err(OutcomeError::Transport("no server in this example".into()))
    }
}

/// Settles as soon as it starts.
#[derive(Default)]
struct InstantReel(Vec<String>);

impl ReelSurface for InstantReel {
    type Settled = Ready<()>;

    fn append(&mut self, symbols: &[SymbolView]) {
        self.0.extend(symbols.iter().map(|s| s.name().to_string()));
    }
    fn remove_leading(&mut self, count: usize) {
        self.0.drain(..count.min(self.0.len()));
    }
    fn clear_highlights(&mut self) {}
    fn add_highlight(&mut self, _row: usize) {}
    fn cancel_animation(&mut self) {}
    fn play_animation(&mut self, _motion: SpinMotion) -> Self::Settled {
        ready(())
    }
    fn animation_finished(&self) -> bool {
        true
    }
    fn finish_animation(&mut self) {}
}

struct Stdout;

impl SlotDisplay for Stdout {
    fn show_balance(&mut self, text: &str) {
        println!("balance {text}");
    }
    fn show_bet(&mut self, _text: &str) {}
    fn show_win(&mut self, text: &str, _fade_after: Duration) {
        println!("win {text}");
    }
    fn show_deposit_prompt(&mut self) {
        println!("insufficient balance");
    }
    fn set_spin_enabled(&mut self, _enabled: bool) {}
    fn autoplay_enabled(&self) -> bool {
        false
    }
}

struct NoWait;

impl Timer for NoWait {
    type Sleep = Ready<()>;

    fn sleep(&self, _duration: Duration) -> Self::Sleep {
        ready(())
    }
}

fn main() {
    let surfaces = (0..INITIAL_GRID.len()).map(|_| InstantReel::default()).collect();
    let mut slot = Slot::new(SlotConfig::default(), Offline, Stdout, NoWait, surfaces, 42);
    slot.set_balance(2.0);

    futures::executor::block_on(async {
        // The server owns the balance, so offline rounds never drain it.
        for _ in 0..3 {
            let Some(report) = slot.spin().await else {
                break;
            };
            for (reel, column) in report.grid.iter().enumerate() {
                println!("reel {reel}: {}", column.join(" "));
            }
            println!("{:?} round, balance {}", report.source, format_money(report.balance));
        }
    });
}
