use std::collections::HashMap;
use std::time::Duration;

use crate::symbols::SYMBOL_NAMES;

pub const STARTUP_KEY: &str = "slotsMachineHelpOnStartup";
pub const OPEN_ANIMATION: Duration = Duration::from_millis(10);
pub const CLOSE_ANIMATION: Duration = Duration::from_millis(300);
pub const STARTUP_DELAY: Duration = Duration::from_millis(800);

/// String key/value storage that survives reloads (`localStorage`, a file).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences(HashMap<String, String>);

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpTab {
    #[default]
    Symbols,
    Paylines,
    Rules,
}

impl HelpTab {
    pub const ALL: [HelpTab; 3] = [HelpTab::Symbols, HelpTab::Paylines, HelpTab::Rules];

    pub fn key(self) -> &'static str {
        match self {
            HelpTab::Symbols => "symbols",
            HelpTab::Paylines => "paylines",
            HelpTab::Rules => "rules",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// What the overlay is allowed to know about the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpContext {
    pub symbols: Vec<String>,
    pub reels: usize,
    pub rows: usize,
    pub min_win_length: usize,
    pub scatter_threshold: u32,
    pub free_spin_multiplier: f64,
}

impl HelpContext {
    pub fn new(reels: usize, rows: usize) -> Self {
        Self {
            symbols: SYMBOL_NAMES.iter().map(|s| s.to_string()).collect(),
            reels,
            rows,
            min_win_length: 3,
            scatter_threshold: 3,
            free_spin_multiplier: 1.25,
        }
    }

    /// Longest match shown in the symbol table.
    pub fn max_match_length(&self) -> usize {
        self.reels.min(5)
    }

    /// Sample value of a `length`-long match. Presentation data only; the
    /// server's payouts are not derived from it.
    pub fn sample_value(&self, base: f64, length: usize) -> f64 {
        let multiplier = match length {
            4 => 1.5,
            5 => 2.5,
            _ => 1.0,
        };
        base * multiplier * (length as f64 / self.min_win_length as f64)
    }
}

pub struct HelpOverlay<P> {
    context: HelpContext,
    prefs: P,
    open: bool,
    tab: HelpTab,
}

impl<P: PreferenceStore> HelpOverlay<P> {
    pub fn new(context: HelpContext, prefs: P) -> Self {
        Self {
            context,
            prefs,
            open: false,
            tab: HelpTab::default(),
        }
    }

    pub fn context(&self) -> &HelpContext {
        &self.context
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn tab(&self) -> HelpTab {
        self.tab
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Absent or anything but `"false"` means show.
    pub fn show_on_startup(&self) -> bool {
        self.prefs.get(STARTUP_KEY).as_deref() != Some("false")
    }

    pub fn set_show_on_startup(&mut self, show: bool) {
        self.prefs.set(STARTUP_KEY, if show { "true" } else { "false" });
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn switch_tab(&mut self, tab: HelpTab) {
        self.tab = tab;
    }

    /// Escape closes the overlay; returns whether it did.
    pub fn on_escape(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.close();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> HelpOverlay<MemoryPreferences> {
        HelpOverlay::new(HelpContext::new(5, 5), MemoryPreferences::default())
    }

    #[test]
    fn shows_on_startup_by_default() {
        assert!(overlay().show_on_startup());
    }

    #[test]
    fn startup_flag_round_trips_through_store() {
        let mut help = overlay();
        help.set_show_on_startup(false);
        assert_eq!(help.prefs().get(STARTUP_KEY).as_deref(), Some("false"));
        assert!(!help.show_on_startup());
        help.set_show_on_startup(true);
        assert!(help.show_on_startup());
    }

    #[test]
    fn escape_only_closes_an_open_overlay() {
        let mut help = overlay();
        assert!(!help.on_escape());
        help.open();
        help.switch_tab(HelpTab::Rules);
        assert!(help.on_escape());
        assert!(!help.is_open());
        assert_eq!(help.tab(), HelpTab::Rules);
    }

    #[test]
    fn sample_values_jump_at_four_and_five() {
        let ctx = HelpContext::new(5, 5);
        assert!((ctx.sample_value(10.0, 3) - 10.0).abs() < 1e-9);
        assert!((ctx.sample_value(10.0, 4) - 20.0).abs() < 1e-9);
        assert!((ctx.sample_value(12.0, 5) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn tab_keys() {
        assert_eq!(HelpTab::from_key("paylines"), Some(HelpTab::Paylines));
        assert_eq!(HelpTab::from_key("bonus"), None);
    }
}
