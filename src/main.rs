//! sfxedit CLI
//!
//! Command-line interface for the sound-effect editor.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use sfxedit::cli::{commands, Cli, Commands};
use sfxedit::EditorConfig;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("sfxedit v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        if let Some(sfx) = e.downcast_ref::<sfxedit::SfxError>() {
            eprintln!("{}", sfx.friendly_message());
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Some(cmd) => handle_command(config, cmd),
        None => {
            println!("sfxedit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(config: EditorConfig, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Edit { input, output, ops } => commands::edit(config, &input, &output, &ops)
            .with_context(|| format!("editing {}", input.display())),
        Commands::Generate {
            sound,
            output,
            freq,
            duration,
            volume,
            wave,
            seed,
        } => commands::generate(config, &sound, &output, freq, duration, volume, &wave, seed)
            .with_context(|| format!("generating {}", sound)),
        Commands::Mix {
            first,
            second,
            output,
        } => commands::mix(config, &first, &second, &output)
            .with_context(|| format!("mixing {} + {}", first.display(), second.display())),
        Commands::Info {
            input,
            columns,
            rows,
        } => commands::info(config, &input, columns, rows)
            .with_context(|| format!("reading {}", input.display())),
    }
}
