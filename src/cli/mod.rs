//! CLI Module
//!
//! Command-line front end for the sound-effect editor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::editor::EditCommand;

/// sfxedit - trim, shape, mix and synthesize game sound effects
#[derive(Parser, Debug)]
#[command(name = "sfxedit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply edits to an audio file and write the result as WAV
    #[command(name = "edit")]
    Edit {
        /// Input audio file (WAV, MP3 or FLAC)
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Operation to apply, in order (repeatable), e.g. --op fade-in=500
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<EditCommand>,
    },

    /// Synthesize a preset (coin, gunshot, steps, random) or a custom tone
    #[command(name = "generate")]
    Generate {
        /// Preset name, or "custom"
        sound: String,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Tone frequency in Hz (custom only)
        #[arg(long, default_value_t = 440.0)]
        freq: f64,

        /// Duration in ms (custom only)
        #[arg(long, default_value_t = 1000.0)]
        duration: f64,

        /// Volume, 0-100 %
        #[arg(long)]
        volume: Option<f64>,

        /// Wave type: sine, square or noise (custom only)
        #[arg(long, default_value = "sine")]
        wave: String,

        /// Seed for reproducible noise and random presets
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Mix two audio files; the result is as long as the longer one
    #[command(name = "mix")]
    Mix {
        first: PathBuf,
        second: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show metadata and a text waveform of an audio file
    #[command(name = "info")]
    Info {
        input: PathBuf,

        /// Waveform width in characters
        #[arg(long)]
        columns: Option<usize>,

        /// Waveform height in lines
        #[arg(long, default_value_t = 8)]
        rows: usize,
    },
}
