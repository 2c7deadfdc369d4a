use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::engine::{Engine, EngineOptions};
use crate::platform::rpm::Rpm;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "initcheck",
    version,
    about = "List SysV init scripts and tell which ones need attention before init script support is removed"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Check,
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = crate::config::load().map_err(crate::exit::invalid_args_err)?;
    if let Some(dir) = &cli.dir {
        cfg.scan.directory = dir.clone();
    }

    let color = io::stdout().is_terminal()
        && cfg.ui.color
        && !cli.no_color
        && std::env::var_os("NO_COLOR").is_none();

    let ui_cfg = UiConfig {
        color,
        wrap_width: cfg.ui.wrap_width,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            crate::scan::validate_excludes(&cfg.scan.exclude)
                .map_err(crate::exit::invalid_args_err)?;
            let rpm = Rpm::from_command_line(
                &cfg.packages.rpm_command,
                Duration::from_secs(cli.timeout),
            )
            .map_err(crate::exit::invalid_args_err)?;

            let engine = Engine::new(
                EngineOptions {
                    directory: cfg.scan.directory.clone(),
                    exclude: cfg.scan.exclude.clone(),
                    vendor_prefix: cfg.classify.vendor_prefix.clone(),
                    show_progress: !cli.quiet && !cli.json,
                },
                &rpm,
            );
            let report = engine.check()?;
            if cli.json {
                write_json(&report)?;
            } else {
                crate::ui::print_report(&report, &ui_cfg);
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "initcheck", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    serde_json::to_writer_pretty(io::stdout().lock(), &cfg)?;
                    println!();
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `initcheck config --show`");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("initcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("initcheck=warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .try_init();
}

fn write_json(report: &crate::core::Report) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(report)?;

    let mut stdout = io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}
