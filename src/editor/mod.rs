//! Audio Editor
//!
//! [`AudioEditor`] is the single owner of a session: the active buffer, the
//! library of loaded files, effect overlays, the transport and the undo
//! history. Every edit computes a new buffer from the active one; on
//! success the result becomes active and is pushed as one history entry.
//! A failed edit leaves everything untouched.

pub mod command;

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::EditorConfig;
use crate::dsp::{
    mix, Compressor, Echo, Effect, FadeIn, FadeOut, NoiseReduction, PitchShift, Reverb, Trim,
    Volume,
};
use crate::engine::{
    export_wav, import_audio, AudioBuffer, SoundPreset, Synth, ToneSpec, TransportState, WaveType,
};
use crate::error::{Result, SfxError};
use crate::state::{ActionType, AudioState, EffectRecord, HistoryManager};
use crate::waveform::{Waveform, WaveformView};

pub use command::EditCommand;

/// Stateful sound-effect editor
#[derive(Debug)]
pub struct AudioEditor {
    config: EditorConfig,
    state: AudioState,
    history: HistoryManager,
    synth: Synth,
}

impl Default for AudioEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEditor {
    /// Create an editor with default settings
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an editor with custom settings
    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_synth(config, Synth::new())
    }

    /// Create an editor with a specific generator, e.g. a seeded one
    pub fn with_synth(config: EditorConfig, synth: Synth) -> Self {
        Self {
            history: HistoryManager::with_max_depth(config.history_depth),
            config,
            state: AudioState::new(),
            synth,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &AudioState {
        &self.state
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// The active buffer, if any
    pub fn current(&self) -> Option<&AudioBuffer> {
        self.state.current.as_ref()
    }

    fn require_current(&self) -> Result<&AudioBuffer> {
        self.state.current.as_ref().ok_or(SfxError::NoAudioLoaded)
    }

    /// Make `buffer` active and record it
    fn commit(&mut self, action_type: ActionType, label: String, buffer: AudioBuffer) {
        debug!(
            "{}: {} frames, {} ms",
            label,
            buffer.frame_count(),
            buffer.len_ms()
        );
        self.history.push(action_type, label, buffer.clone());
        self.state.current = Some(buffer);
    }

    /// Run an effect on the active buffer and commit the result
    fn apply_effect(&mut self, effect: &dyn Effect) -> Result<&AudioBuffer> {
        let output = effect.apply(self.require_current()?)?;
        self.commit(ActionType::Effect, effect.label(), output);
        self.require_current()
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Load a file, add it to the library and make it active
    pub fn load_audio(&mut self, path: &Path) -> Result<()> {
        let buffer = import_audio(path)?;
        self.state.library.insert(path.to_path_buf(), buffer.clone());
        self.state.transport.stop();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.commit(ActionType::Load, format!("Load {}", name), buffer);

        info!("Loaded {} ({} ms)", path.display(), self.state.duration_ms());
        Ok(())
    }

    /// Add a file to the library without changing the active buffer
    pub fn add_audio_file(&mut self, path: &Path) -> Result<()> {
        let buffer = import_audio(path)?;
        self.state.library.insert(path.to_path_buf(), buffer);
        info!("Added {} to library", path.display());
        Ok(())
    }

    /// Write the active buffer as WAV
    pub fn save_audio(&self, path: &Path) -> Result<()> {
        export_wav(self.require_current()?, path)
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Keep only `start_ms..end_ms`
    pub fn trim(&mut self, start_ms: u64, end_ms: u64) -> Result<()> {
        self.apply_effect(&Trim::new(start_ms, end_ms))?;
        Ok(())
    }

    pub fn fade_in(&mut self, duration_ms: u64) -> Result<()> {
        let fade = FadeIn::new(duration_ms);
        let end_ms = fade.end_ms(self.require_current()?);
        self.apply_effect(&fade)?;
        self.state.effects.push(EffectRecord::FadeIn { end_ms });
        Ok(())
    }

    pub fn fade_out(&mut self, duration_ms: u64) -> Result<()> {
        let fade = FadeOut::new(duration_ms);
        let (start_ms, end_ms) = fade.span_ms(self.require_current()?);
        self.apply_effect(&fade)?;
        self.state
            .effects
            .push(EffectRecord::FadeOut { start_ms, end_ms });
        Ok(())
    }

    /// Change loudness by `gain_db`, within the configured range
    pub fn adjust_volume(&mut self, gain_db: f64) -> Result<()> {
        self.config.check_volume(gain_db)?;
        self.apply_effect(&Volume::new(gain_db))?;
        self.state.last_volume_db = Some(gain_db);
        Ok(())
    }

    pub fn add_echo(&mut self, delay_ms: u64) -> Result<()> {
        self.apply_effect(&Echo::new(delay_ms))?;
        self.state.effects.push(EffectRecord::Echo { delay_ms });
        Ok(())
    }

    pub fn add_reverb(&mut self, reverberance: u32) -> Result<()> {
        self.apply_effect(&Reverb::new(reverberance))?;
        self.state.effects.push(EffectRecord::Reverb { reverberance });
        Ok(())
    }

    pub fn pitch_up(&mut self, semitones: u32) -> Result<()> {
        self.apply_effect(&PitchShift::up(semitones))?;
        Ok(())
    }

    pub fn pitch_down(&mut self, semitones: u32) -> Result<()> {
        self.apply_effect(&PitchShift::down(semitones))?;
        Ok(())
    }

    pub fn noise_reduction(&mut self) -> Result<()> {
        self.apply_effect(&NoiseReduction::default())?;
        Ok(())
    }

    pub fn apply_compression(&mut self, threshold_db: f64, ratio: f64) -> Result<()> {
        self.apply_effect(&Compressor::new(threshold_db, ratio))?;
        Ok(())
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Step back one edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(buffer) => {
                self.state.current = Some(buffer);
                self.state.transport.stop();
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    /// Re-apply the last undone edit. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(buffer) => {
                self.state.current = Some(buffer);
                self.state.transport.stop();
                true
            }
            None => {
                debug!("Nothing to redo");
                false
            }
        }
    }

    // ========================================================================
    // Mixing and generation
    // ========================================================================

    /// Mix two library files; the result becomes active and starts playing
    pub fn mix_audio(&mut self, first: &Path, second: &Path) -> Result<()> {
        let a = self.library_buffer(first)?;
        let b = self.library_buffer(second)?;
        let mixed = mix(a, b)?;

        let label = format!("Mix {} + {}", first.display(), second.display());
        self.commit(ActionType::Mix, label, mixed);
        self.play()
    }

    fn library_buffer(&self, path: &Path) -> Result<&AudioBuffer> {
        self.state
            .library_buffer(path)
            .ok_or_else(|| SfxError::NotInLibrary {
                path: PathBuf::from(path),
            })
    }

    /// Generate a preset at the configured volume and start playing it
    pub fn generate_preset(&mut self, preset: SoundPreset) -> Result<()> {
        let spec = self.synth.preset_spec(preset, self.config.synth_volume);
        self.generate_spec(&spec, format!("Generate {}", preset))?;
        self.play()
    }

    pub fn generate_coin_sound(&mut self) -> Result<()> {
        self.generate_preset(SoundPreset::Coin)
    }

    pub fn generate_gunshot_sound(&mut self) -> Result<()> {
        self.generate_preset(SoundPreset::Gunshot)
    }

    pub fn generate_steps_sound(&mut self) -> Result<()> {
        self.generate_preset(SoundPreset::Steps)
    }

    pub fn generate_random_audio(&mut self) -> Result<()> {
        self.generate_preset(SoundPreset::Random)
    }

    /// Generate a custom tone and make it active
    pub fn generate_sound(
        &mut self,
        frequency_hz: f64,
        duration_ms: f64,
        volume: f64,
        wave: WaveType,
    ) -> Result<()> {
        let spec = ToneSpec::new(frequency_hz, duration_ms, volume, wave);
        let label = format!("Generate {} {} Hz", wave, frequency_hz);
        self.generate_spec(&spec, label)
    }

    /// Generate a sine, make it active and write it as WAV
    pub fn export_custom_audio(
        &mut self,
        path: &Path,
        frequency_hz: f64,
        duration_ms: f64,
        volume: f64,
    ) -> Result<()> {
        self.generate_sound(frequency_hz, duration_ms, volume, WaveType::Sine)?;
        self.save_audio(path)
    }

    fn generate_spec(&mut self, spec: &ToneSpec, label: String) -> Result<()> {
        let buffer = self.synth.generate(spec)?;
        self.state.transport.stop();
        self.commit(ActionType::Generate, label, buffer);
        Ok(())
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Start playback, or resume if paused
    pub fn play(&mut self) -> Result<()> {
        let duration_ms = self.require_current()?.len_ms();
        self.state.transport.play(duration_ms);
        Ok(())
    }

    /// Pause playback; pausing again resumes
    pub fn pause(&mut self) {
        self.state.transport.pause();
    }

    pub fn stop(&mut self) {
        self.state.transport.stop();
    }

    /// Advance the playhead by `elapsed_ms` of wall time; returns its position
    pub fn tick(&mut self, elapsed_ms: u64) -> u64 {
        self.state.transport.tick(elapsed_ms)
    }

    pub fn transport_state(&self) -> TransportState {
        self.state.transport.state()
    }

    // ========================================================================
    // Visualization
    // ========================================================================

    /// Mark a point of interest on the clip
    pub fn add_key_point(&mut self, ms: u64) {
        self.state.key_points.push(ms);
    }

    /// Waveform overview of the active buffer with all overlays
    pub fn waveform(&self, columns: usize) -> Result<WaveformView> {
        let buffer = self.require_current()?;
        Ok(WaveformView {
            waveform: Waveform::from_buffer(buffer, columns),
            effects: self.state.effects.clone(),
            key_points: self.state.key_points.clone(),
            playhead_ms: self.state.playhead_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> AudioEditor {
        AudioEditor::with_synth(EditorConfig::default(), Synth::with_seed(42))
    }

    /// Editor with a 1 s, 440 Hz sine active
    fn with_tone() -> AudioEditor {
        let mut editor = seeded();
        editor
            .generate_sound(440.0, 1000.0, 50.0, WaveType::Sine)
            .unwrap();
        editor
    }

    #[test]
    fn test_edits_require_audio() {
        let mut editor = seeded();
        assert!(matches!(editor.fade_in(100), Err(SfxError::NoAudioLoaded)));
        assert!(matches!(editor.add_echo(100), Err(SfxError::NoAudioLoaded)));
        assert!(matches!(editor.play(), Err(SfxError::NoAudioLoaded)));
        assert!(matches!(
            editor.save_audio(Path::new("out.wav")),
            Err(SfxError::NoAudioLoaded)
        ));
        assert!(editor.waveform(10).is_err());
        assert_eq!(editor.history().undo_count(), 0);
    }

    #[test]
    fn test_each_edit_pushes_once() {
        let mut editor = with_tone();
        editor.fade_in(100).unwrap();
        editor.add_echo(50).unwrap();
        editor.adjust_volume(-6.0).unwrap();
        assert_eq!(editor.history().undo_count(), 4);
        assert_eq!(editor.state().last_volume_db, Some(-6.0));
    }

    #[test]
    fn test_failed_edit_leaves_state() {
        let mut editor = with_tone();
        let before = editor.current().cloned();

        assert!(editor.trim(900, 100).is_err());
        assert!(editor.adjust_volume(45.0).is_err());
        assert!(editor.add_reverb(150).is_err());

        assert_eq!(editor.current().cloned(), before);
        assert_eq!(editor.history().undo_count(), 1);
        assert!(editor.state().effects.is_empty());
    }

    #[test]
    fn test_effect_records() {
        let mut editor = with_tone();
        editor.fade_in(2000).unwrap();
        editor.fade_out(300).unwrap();
        editor.add_echo(500).unwrap();
        editor.add_reverb(70).unwrap();

        assert_eq!(
            editor.state().effects,
            vec![
                EffectRecord::FadeIn { end_ms: 1000 },
                EffectRecord::FadeOut {
                    start_ms: 700,
                    end_ms: 1000
                },
                EffectRecord::Echo { delay_ms: 500 },
                EffectRecord::Reverb { reverberance: 70 },
            ]
        );

        // Undo rewinds audio but not the overlay records
        editor.undo();
        assert_eq!(editor.state().effects.len(), 4);
    }

    #[test]
    fn test_undo_redo_restore_buffers() {
        let mut editor = with_tone();
        let original = editor.current().cloned().unwrap();
        editor.trim(0, 500).unwrap();
        let trimmed = editor.current().cloned().unwrap();

        assert!(editor.undo());
        assert_eq!(editor.current(), Some(&original));
        assert!(!editor.undo());

        assert!(editor.redo());
        assert_eq!(editor.current(), Some(&trimmed));
        assert!(!editor.redo());
    }

    #[test]
    fn test_undo_redo_stop_playback() {
        let mut editor = with_tone();
        editor.add_echo(500).unwrap();
        editor.play().unwrap();
        editor.tick(1500);

        assert!(editor.undo());
        assert_eq!(editor.transport_state(), TransportState::Stopped);
        assert_eq!(editor.state().playhead_ms(), 0);

        editor.play().unwrap();
        assert!(editor.redo());
        assert_eq!(editor.transport_state(), TransportState::Stopped);
    }

    #[test]
    fn test_huge_durations_clamp_to_clip() {
        let mut editor = with_tone();
        editor.fade_in(u64::MAX / 1000).unwrap();
        editor.fade_out(u64::MAX).unwrap();
        editor.add_echo(u64::MAX).unwrap();

        let buffer = editor.current().unwrap();
        assert_eq!(buffer.len_ms(), 2000);
        assert_eq!(
            editor.state().effects[0],
            EffectRecord::FadeIn { end_ms: 1000 }
        );
    }

    #[test]
    fn test_mix_requires_library() {
        let mut editor = with_tone();
        let result = editor.mix_audio(Path::new("a.wav"), Path::new("b.wav"));
        assert!(matches!(result, Err(SfxError::NotInLibrary { .. })));
    }

    #[test]
    fn test_presets_start_playback() {
        let mut editor = seeded();
        editor.generate_coin_sound().unwrap();
        assert_eq!(editor.current().unwrap().frame_count(), 4410);
        assert_eq!(editor.transport_state(), TransportState::Playing);

        editor.generate_gunshot_sound().unwrap();
        assert_eq!(editor.current().unwrap().len_ms(), 300);
        editor.generate_steps_sound().unwrap();
        assert_eq!(editor.current().unwrap().len_ms(), 200);
        editor.generate_random_audio().unwrap();
        let len = editor.current().unwrap().len_ms();
        assert!((99..1000).contains(&len));
        assert_eq!(editor.history().undo_count(), 4);
    }

    #[test]
    fn test_transport_flow() {
        let mut editor = with_tone();
        editor.play().unwrap();
        assert_eq!(editor.tick(100), 100);

        editor.pause();
        assert_eq!(editor.transport_state(), TransportState::Paused);
        assert_eq!(editor.tick(100), 100);

        editor.pause();
        assert_eq!(editor.transport_state(), TransportState::Playing);
        assert_eq!(editor.tick(2000), 0);
        assert_eq!(editor.transport_state(), TransportState::Stopped);

        editor.play().unwrap();
        editor.tick(300);
        editor.stop();
        assert_eq!(editor.state().playhead_ms(), 0);
    }

    #[test]
    fn test_waveform_view() {
        let mut editor = with_tone();
        editor.fade_in(200).unwrap();
        editor.add_key_point(500);

        let view = editor.waveform(20).unwrap();
        assert_eq!(view.waveform.columns(), 20);
        assert_eq!(view.waveform.duration_ms, 1000);
        assert_eq!(view.key_points, vec![500]);
        assert_eq!(view.effects.len(), 1);
    }

    #[test]
    fn test_history_depth_from_config() {
        let config = EditorConfig {
            history_depth: Some(2),
            ..EditorConfig::default()
        };
        let mut editor = AudioEditor::with_synth(config, Synth::with_seed(1));
        editor
            .generate_sound(440.0, 200.0, 50.0, WaveType::Sine)
            .unwrap();
        editor.fade_in(10).unwrap();
        editor.fade_out(10).unwrap();

        assert_eq!(editor.history().undo_count(), 2);
        assert!(editor.undo());
        assert!(!editor.undo());
    }
}
