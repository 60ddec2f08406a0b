//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};

use crate::config::EditorConfig;
use crate::editor::{AudioEditor, EditCommand};
use crate::engine::{import_audio, SoundPreset, Synth, WaveType};
use crate::error::Result;
use crate::waveform::{Waveform, WaveformView};

/// Load `input`, apply `ops` in order and save the result.
pub fn edit(config: EditorConfig, input: &Path, output: &Path, ops: &[EditCommand]) -> Result<()> {
    info!("Editing {} ({} ops)", input.display(), ops.len());

    let mut editor = AudioEditor::with_config(config);
    editor.load_audio(input)?;

    for op in ops {
        let before = editor.history().undo_count();
        op.apply(&mut editor)?;
        if matches!(op, EditCommand::Undo | EditCommand::Redo)
            && editor.history().undo_count() == before
        {
            warn!("'{}' had nothing to step to", op);
        }
    }

    editor.save_audio(output)?;
    print_history(&editor);
    println!("Saved: {}", output.display());

    Ok(())
}

/// Synthesize a preset or a custom tone and save it.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    config: EditorConfig,
    sound: &str,
    output: &Path,
    freq: f64,
    duration: f64,
    volume: Option<f64>,
    wave: &str,
    seed: Option<u64>,
) -> Result<()> {
    let synth = match seed {
        Some(seed) => Synth::with_seed(seed),
        None => Synth::new(),
    };
    let volume = volume.unwrap_or(config.synth_volume);
    let mut editor = AudioEditor::with_synth(
        EditorConfig {
            synth_volume: volume,
            ..config
        },
        synth,
    );

    if sound.eq_ignore_ascii_case("custom") {
        let wave: WaveType = wave.parse()?;
        editor.generate_sound(freq, duration, volume, wave)?;
    } else {
        let preset: SoundPreset = sound.parse()?;
        editor.generate_preset(preset)?;
    }

    editor.save_audio(output)?;
    if let Some(buffer) = editor.current() {
        println!(
            "Generated {} ({} ms) -> {}",
            sound,
            buffer.len_ms(),
            output.display()
        );
    }

    Ok(())
}

/// Mix two files and save the result.
pub fn mix(config: EditorConfig, first: &Path, second: &Path, output: &Path) -> Result<()> {
    info!("Mixing {} + {}", first.display(), second.display());

    let mut editor = AudioEditor::with_config(config);
    editor.add_audio_file(first)?;
    editor.add_audio_file(second)?;
    editor.mix_audio(first, second)?;
    editor.save_audio(output)?;

    println!("Mixed -> {}", output.display());
    Ok(())
}

/// Print metadata, fingerprint and a text waveform.
pub fn info(config: EditorConfig, input: &Path, columns: Option<usize>, rows: usize) -> Result<()> {
    let buffer = import_audio(input)?;
    let columns = columns.unwrap_or(config.waveform_columns).max(1);

    println!("File:        {}", input.display());
    println!("Duration:    {} ms", buffer.len_ms());
    println!("Sample rate: {} Hz", buffer.sample_rate());
    println!("Channels:    {}", buffer.channels());
    println!("Bit depth:   {}", buffer.sample_width() * 8);
    println!("Peak:        {}", buffer.peak());
    println!("RMS level:   {:.1} dBFS", buffer.dbfs());
    println!("SHA-256:     {}", buffer.fingerprint());
    println!();

    let view = WaveformView {
        waveform: Waveform::from_buffer(&buffer, columns),
        effects: Vec::new(),
        key_points: Vec::new(),
        playhead_ms: 0,
    };
    print!("{}", view.render_text(rows));

    Ok(())
}

/// Show the session's history, oldest first.
fn print_history(editor: &AudioEditor) {
    let history = editor.history();

    println!("History:");
    println!("{:-<60}", "");
    let last = history.entries().len().saturating_sub(1);
    for (i, entry) in history.entries().iter().enumerate() {
        let marker = if i == last { ">>> " } else { "    " };
        println!(
            "{}{}: {} ({})",
            marker,
            entry.action_type,
            entry.label,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("{:-<60}", "");
    println!(
        "Undo stack: {} | Redo stack: {}",
        history.undo_count(),
        history.redo_count()
    );
}
