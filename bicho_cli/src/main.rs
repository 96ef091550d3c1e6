mod history;
mod prefs;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use bicho_core::{
    asset_url, format_money, HelpOverlay, HttpOutcomeSource, OutcomeError, OutcomeSource, Slot, SlotConfig,
    SpinHooks, SpinResponse, INITIAL_GRID, SYMBOL_NAMES,
};
use history::History;
use prefs::FilePreferences;
use terminal::{render_grid, TerminalDisplay, TerminalReel, TokioTimer};

#[derive(Parser)]
#[command(name = "bicho-cli", about = "Terminal front-end for the bicho slot", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Outcome endpoint, default is the production game server
    #[arg(long, env = "BACKEND_URL")]
    endpoint: Option<String>,
    /// JSON file with bet limits and timings
    #[arg(long, env = "SLOT_CONFIG")]
    config: Option<PathBuf>,
    /// Preferences file, default under the user config dir
    #[arg(long)]
    prefs: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds against the server (or locally with --offline)
    Play {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: u32,
        /// Never contact the server; every round uses a local grid
        #[arg(long)]
        offline: bool,
        /// Starting balance for offline play
        #[arg(long, default_value_t = 10.0)]
        balance: f64,
        /// Bet button presses before the first round (negative lowers)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        bet_steps: i32,
        /// Animation time scale; 0 settles reels at once
        #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
        speed: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Write one CSV row per round to this path
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// List symbols and their image URLs
    Symbols,
    /// Show the rules summary; optionally change the show-on-startup flag
    Help {
        #[arg(long)]
        show_on_startup: Option<bool>,
    },
}

const MAX_SPEED: f64 = 100.0;

fn parse_speed(raw: &str) -> Result<f64, String> {
    let speed: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if !(0.0..=MAX_SPEED).contains(&speed) {
        return Err(format!("must be between 0 and {MAX_SPEED}"));
    }
    Ok(speed)
}

/// Either the real server or nothing at all.
enum Source {
    Http(HttpOutcomeSource),
    Offline,
}

impl OutcomeSource for Source {
    async fn request_outcome(&self, bet: f64) -> Result<SpinResponse, OutcomeError> {
        match self {
            Source::Http(http) => http.request_outcome(bet).await,
            Source::Offline => Err(OutcomeError::Transport("offline mode".into())),
        }
    }
}

type TerminalSlot = Slot<Source, TerminalDisplay, TerminalReel, TokioTimer>;

fn build_slot(config: SlotConfig, source: Source, display: TerminalDisplay, speed: f64, seed: u64) -> TerminalSlot {
    let surfaces = (0..INITIAL_GRID.len()).map(|_| TerminalReel::new(speed)).collect();
    Slot::new(config, source, display, TokioTimer, surfaces, seed)
}

fn print_rules(help: &HelpOverlay<FilePreferences>) {
    let ctx = help.context();
    println!("Como jogar");
    println!("  Ajuste a aposta com + e -, depois gire.");
    println!("  Combinações pagam da esquerda para a direita.");
    println!(
        "  {} ou mais Scatters dão giros grátis; ganhos multiplicados por {}.",
        ctx.scatter_threshold, ctx.free_spin_multiplier
    );
    println!("  {} símbolos, {} rolos x {} linhas.", ctx.symbols.len(), ctx.reels, ctx.rows);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SlotConfig::load(path)?,
        None => SlotConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    let prefs = FilePreferences::open(cli.prefs.unwrap_or_else(FilePreferences::default_path));

    match cli.command {
        Commands::Symbols => {
            for name in SYMBOL_NAMES {
                println!("{:<10} {}", name, asset_url(name).unwrap_or_default());
            }
        }
        Commands::Help { show_on_startup } => {
            let slot = build_slot(config, Source::Offline, TerminalDisplay::new(0), 0.0, 0);
            let mut help = HelpOverlay::new(slot.help_context(), prefs);
            if let Some(show) = show_on_startup {
                help.set_show_on_startup(show);
                println!("show on startup: {show} ({})", help.prefs().path().display());
            }
            print_rules(&help);
        }
        Commands::Play {
            rounds,
            offline,
            balance,
            bet_steps,
            speed,
            seed,
            history,
        } => {
            let source = if offline {
                Source::Offline
            } else {
                Source::Http(HttpOutcomeSource::new(config.endpoint.clone()))
            };
            let display = TerminalDisplay::new(rounds.saturating_sub(1));
            let seed = seed.unwrap_or_else(rand::random);
            let mut slot = build_slot(config, source, display, speed, seed).with_hooks(SpinHooks {
                on_spin_start: Some(Box::new(|_: &bicho_core::Grid| println!("girando..."))),
                on_spin_end: None,
            });

            let help = HelpOverlay::new(slot.help_context(), prefs);
            if help.show_on_startup() {
                print_rules(&help);
            }

            if offline {
                slot.set_balance(balance);
            } else {
                slot.init().await;
            }
            for _ in 0..bet_steps.unsigned_abs() {
                if bet_steps > 0 {
                    slot.bet_plus();
                } else {
                    slot.bet_minus();
                }
            }
            slot.display_mut().set_quiet(false);
            slot.update_ui(0.0);
            println!("{}", slot.display().status_line());

            let reports = slot.play().await;
            let mut log = history.as_deref().map(History::create).transpose()?;
            for report in &reports {
                print!("{}", render_grid(&report.grid, &report.wins));
                println!("saldo {}", format_money(report.balance));
                if let Some(log) = log.as_mut() {
                    log.record(report)?;
                }
            }
            if reports.is_empty() {
                println!("nenhuma rodada: saldo menor que a aposta");
            }
            if let (Some(log), Some(path)) = (log, history) {
                let rows = log.finish()?;
                info!(rows, path = %path.display(), "history written");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_args(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut args = vec!["bicho-cli", "play", "--offline"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args)
    }

    #[test]
    fn speed_must_be_a_sane_scale() {
        for bad in ["1e300", "inf", "NaN", "-1"] {
            assert!(play_args(&["--speed", bad]).is_err(), "{bad}");
        }
        let cli = play_args(&["--speed", "0"]).unwrap();
        assert!(matches!(cli.command, Commands::Play { speed, .. } if speed == 0.0));
    }

    #[test]
    fn zero_rounds_is_rejected() {
        assert!(play_args(&["--rounds", "0"]).is_err());
        let cli = play_args(&["--rounds", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Play { rounds: 3, .. }));
    }
}
