pub mod config;
pub mod help;
pub mod outcome;
pub mod reel;
pub mod shared;
pub mod slot;
pub mod surface;
pub mod symbols;

pub use crate::config::{ConfigError, SlotConfig, DEFAULT_ENDPOINT, DEPOSIT_URL};
pub use crate::help::{
    HelpContext, HelpOverlay, HelpTab, MemoryPreferences, PreferenceStore, CLOSE_ANIMATION, OPEN_ANIMATION,
    STARTUP_DELAY,
};
#[cfg(feature = "http")]
pub use crate::outcome::HttpOutcomeSource;
pub use crate::outcome::{OutcomeError, OutcomeSource};
pub use crate::reel::{factor, Reel, ReelState, SettledBy, SYMBOLS_PER_FACTOR, VISIBLE_ROWS};
pub use crate::shared::SharedSlot;
pub use crate::slot::{format_money, Grid, GridSource, RoundReport, Slot, SpinHooks, INITIAL_GRID};
pub use crate::surface::{ReelSurface, SlotDisplay, SpinMotion, Timer};
pub use crate::symbols::{asset_url, random_symbol, SymbolAsset, SymbolCache, SymbolView, SYMBOL_NAMES};
pub use bicho_shared::{SpinResponse, WinLine};
