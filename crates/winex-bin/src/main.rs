//! winex entrypoint.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_config::{Config, load_from};
use core_markup::AttributeRegistry;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod drivers;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "winex", version, about = "winex text engine drivers")]
struct Args {
    /// Optional configuration file path (overrides discovery of `winex.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse SGR-colored text from stdin into JSON segment lines.
    Markup,
    /// Filter candidate lines from stdin and print the highlighted view.
    Filter {
        /// Case-insensitive regular expression.
        pattern: String,
    },
    /// Replay a key script (`ctrl-a alt-f ctrl-space end backspace`) over TEXT.
    Edit {
        text: String,
        keys: Vec<String>,
        /// Completion candidate (repeatable).
        #[arg(long = "candidate")]
        candidates: Vec<String>,
        /// Earlier command for history search, oldest first (repeatable).
        #[arg(long = "history")]
        history: Vec<String>,
    },
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("winex.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "winex.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Registry seeded with config overrides first, then the built-in palette.
fn build_registry(config: &Config) -> Arc<AttributeRegistry> {
    let registry = Arc::new(AttributeRegistry::new());
    let overrides = config.apply_palette(&registry);
    registry.register_default_palette();
    info!(target: "runtime.startup", overrides, registered = registry.len(), "registry_ready");
    registry
}

fn run(args: Args) -> Result<()> {
    let config_override = args.config.is_some();
    let config = load_from(args.config)?;
    info!(
        target: "runtime.startup",
        config_override,
        config_loaded = config.raw.is_some(),
        command = ?args.command,
        "bootstrap_complete"
    );
    let registry = build_registry(&config);

    let stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());
    match args.command {
        Command::Markup => drivers::markup(registry, stdin, &mut stdout)?,
        Command::Filter { pattern } => {
            let styles = drivers::list_styles(&config.file);
            drivers::filter(&registry, styles, &pattern, stdin, &mut stdout)?
        }
        Command::Edit {
            text,
            keys,
            candidates,
            history,
        } => {
            let cwd = std::env::current_dir().context("resolving working directory")?;
            let script = drivers::EditScript {
                text,
                keys,
                candidates,
                history,
            };
            drivers::edit(&config.file, &registry, &script, cwd, &mut stdout)?
        }
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");
    let result = run(Args::parse());
    info!(target: "runtime", ok = result.is_ok(), "shutdown");
    drop(startup.log_guard.take());
    result
}
