//! Edit commands
//!
//! Textual form of the editor operations, as given to `sfxedit edit --op`.
//! Arguments are optional where the editor has a configured default:
//!
//! ```text
//! fade-in[=MS]  fade-out[=MS]  echo[=MS]  reverb[=N]  volume=DB
//! trim=START..END  pitch-up[=N]  pitch-down[=N]  noise-reduction
//! compress[=THRESHOLD:RATIO]  undo  redo
//! ```

use std::fmt;
use std::str::FromStr;

use crate::dsp::CompressorParams;
use crate::editor::AudioEditor;
use crate::error::{Result, SfxError};

/// One editor operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditCommand {
    FadeIn(Option<u64>),
    FadeOut(Option<u64>),
    Echo(Option<u64>),
    Reverb(Option<u32>),
    Volume(f64),
    Trim { start_ms: u64, end_ms: u64 },
    PitchUp(Option<u32>),
    PitchDown(Option<u32>),
    NoiseReduction,
    Compress { threshold_db: f64, ratio: f64 },
    Undo,
    Redo,
}

impl EditCommand {
    /// Run the command against `editor`, filling defaults from its config
    ///
    /// Undo and redo with nothing to step to are not errors.
    pub fn apply(&self, editor: &mut AudioEditor) -> Result<()> {
        let config = editor.config().clone();
        match *self {
            EditCommand::FadeIn(ms) => editor.fade_in(ms.unwrap_or(config.fade_ms)),
            EditCommand::FadeOut(ms) => editor.fade_out(ms.unwrap_or(config.fade_ms)),
            EditCommand::Echo(ms) => editor.add_echo(ms.unwrap_or(config.echo_delay_ms)),
            EditCommand::Reverb(n) => editor.add_reverb(n.unwrap_or(config.reverberance)),
            EditCommand::Volume(db) => editor.adjust_volume(db),
            EditCommand::Trim { start_ms, end_ms } => editor.trim(start_ms, end_ms),
            EditCommand::PitchUp(n) => editor.pitch_up(n.unwrap_or(config.pitch_step)),
            EditCommand::PitchDown(n) => editor.pitch_down(n.unwrap_or(config.pitch_step)),
            EditCommand::NoiseReduction => editor.noise_reduction(),
            EditCommand::Compress { threshold_db, ratio } => {
                editor.apply_compression(threshold_db, ratio)
            }
            EditCommand::Undo => {
                editor.undo();
                Ok(())
            }
            EditCommand::Redo => {
                editor.redo();
                Ok(())
            }
        }
    }
}

impl FromStr for EditCommand {
    type Err = SfxError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s, None),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "fade-in" => EditCommand::FadeIn(parse_opt(name, arg)?),
            "fade-out" => EditCommand::FadeOut(parse_opt(name, arg)?),
            "echo" => EditCommand::Echo(parse_opt(name, arg)?),
            "reverb" => EditCommand::Reverb(parse_opt(name, arg)?),
            "volume" => {
                let arg = require(name, arg, "a gain in dB, e.g. volume=-6")?;
                EditCommand::Volume(parse(name, arg)?)
            }
            "trim" => {
                let arg = require(name, arg, "START..END in ms, e.g. trim=0..1500")?;
                let (start, end) = arg.split_once("..").ok_or_else(|| {
                    SfxError::invalid_param(name, arg, "START..END in ms")
                })?;
                EditCommand::Trim {
                    start_ms: parse(name, start.trim())?,
                    end_ms: parse(name, end.trim())?,
                }
            }
            "pitch-up" => EditCommand::PitchUp(parse_opt(name, arg)?),
            "pitch-down" => EditCommand::PitchDown(parse_opt(name, arg)?),
            "noise-reduction" => no_arg(name, arg, EditCommand::NoiseReduction)?,
            "compress" => {
                let defaults = CompressorParams::default();
                match arg {
                    None => EditCommand::Compress {
                        threshold_db: defaults.threshold_db,
                        ratio: defaults.ratio,
                    },
                    Some(arg) => {
                        let (threshold, ratio) = arg.split_once(':').ok_or_else(|| {
                            SfxError::invalid_param(name, arg, "THRESHOLD:RATIO, e.g. -20:4")
                        })?;
                        EditCommand::Compress {
                            threshold_db: parse(name, threshold.trim())?,
                            ratio: parse(name, ratio.trim())?,
                        }
                    }
                }
            }
            "undo" => no_arg(name, arg, EditCommand::Undo)?,
            "redo" => no_arg(name, arg, EditCommand::Redo)?,
            _ => {
                return Err(SfxError::invalid_param(
                    "op",
                    s,
                    "fade-in, fade-out, echo, reverb, volume, trim, pitch-up, \
                     pitch-down, noise-reduction, compress, undo or redo",
                ))
            }
        };
        Ok(command)
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, v: Option<T>) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{}={}", name, v),
                None => write!(f, "{}", name),
            }
        }
        match *self {
            EditCommand::FadeIn(v) => opt(f, "fade-in", v),
            EditCommand::FadeOut(v) => opt(f, "fade-out", v),
            EditCommand::Echo(v) => opt(f, "echo", v),
            EditCommand::Reverb(v) => opt(f, "reverb", v),
            EditCommand::Volume(db) => write!(f, "volume={}", db),
            EditCommand::Trim { start_ms, end_ms } => write!(f, "trim={}..{}", start_ms, end_ms),
            EditCommand::PitchUp(v) => opt(f, "pitch-up", v),
            EditCommand::PitchDown(v) => opt(f, "pitch-down", v),
            EditCommand::NoiseReduction => write!(f, "noise-reduction"),
            EditCommand::Compress { threshold_db, ratio } => {
                write!(f, "compress={}:{}", threshold_db, ratio)
            }
            EditCommand::Undo => write!(f, "undo"),
            EditCommand::Redo => write!(f, "redo"),
        }
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SfxError::invalid_param(name, value, "a number"))
}

fn parse_opt<T: FromStr>(name: &str, arg: Option<&str>) -> Result<Option<T>> {
    arg.map(|a| parse(name, a)).transpose()
}

fn require<'a>(name: &str, arg: Option<&'a str>, expected: &str) -> Result<&'a str> {
    arg.ok_or_else(|| SfxError::invalid_param(name, "", expected))
}

fn no_arg(name: &str, arg: Option<&str>, command: EditCommand) -> Result<EditCommand> {
    match arg {
        None => Ok(command),
        Some(arg) => Err(SfxError::invalid_param(name, arg, "no argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::engine::{Synth, WaveType};
    use crate::state::EffectRecord;
    use test_case::test_case;

    #[test_case("fade-in", EditCommand::FadeIn(None) ; "fade in default")]
    #[test_case("fade-out=750", EditCommand::FadeOut(Some(750)) ; "fade out ms")]
    #[test_case("echo=250", EditCommand::Echo(Some(250)) ; "echo ms")]
    #[test_case("reverb", EditCommand::Reverb(None) ; "reverb default")]
    #[test_case("volume=-6.5", EditCommand::Volume(-6.5) ; "volume db")]
    #[test_case("trim=100..900", EditCommand::Trim { start_ms: 100, end_ms: 900 } ; "trim range")]
    #[test_case("pitch-up=2", EditCommand::PitchUp(Some(2)) ; "pitch up steps")]
    #[test_case("PITCH-DOWN", EditCommand::PitchDown(None) ; "case insensitive")]
    #[test_case("noise-reduction", EditCommand::NoiseReduction ; "noise reduction")]
    #[test_case(" undo ", EditCommand::Undo ; "undo trimmed")]
    #[test_case("redo", EditCommand::Redo ; "redo")]
    fn test_parse(text: &str, expected: EditCommand) {
        assert_eq!(text.parse::<EditCommand>().unwrap(), expected);
    }

    #[test]
    fn test_parse_compress() {
        assert_eq!(
            "compress".parse::<EditCommand>().unwrap(),
            EditCommand::Compress {
                threshold_db: -20.0,
                ratio: 4.0
            }
        );
        assert_eq!(
            "compress=-12:2.5".parse::<EditCommand>().unwrap(),
            EditCommand::Compress {
                threshold_db: -12.0,
                ratio: 2.5
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "volume",
            "trim=100",
            "trim=a..b",
            "echo=soon",
            "undo=2",
            "compress=-12",
            "sparkle",
        ] {
            assert!(
                matches!(bad.parse::<EditCommand>(), Err(SfxError::InvalidParameter { .. })),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_display_parses_back() {
        for text in ["fade-in=10", "reverb", "trim=5..10", "compress=-20:4", "undo"] {
            let command: EditCommand = text.parse().unwrap();
            assert_eq!(command.to_string(), text);
        }
    }

    #[test]
    fn test_apply_out_of_range_values() {
        let mut editor = AudioEditor::with_synth(EditorConfig::default(), Synth::with_seed(3));
        editor
            .generate_sound(440.0, 200.0, 50.0, WaveType::Sine)
            .unwrap();

        for op in ["echo=18446744073709551615", "fade-in=18446744073709551615"] {
            op.parse::<EditCommand>().unwrap().apply(&mut editor).unwrap();
        }
        assert_eq!(editor.current().unwrap().len_ms(), 400);

        let pitch: EditCommand = "pitch-down=4294967295".parse().unwrap();
        assert!(matches!(
            pitch.apply(&mut editor),
            Err(SfxError::InvalidParameter { .. })
        ));
        assert_eq!(editor.history().undo_count(), 3);
    }

    #[test]
    fn test_apply_uses_config_defaults() {
        let config = EditorConfig {
            echo_delay_ms: 123,
            ..EditorConfig::default()
        };
        let mut editor = AudioEditor::with_synth(config, Synth::with_seed(3));
        editor
            .generate_sound(440.0, 500.0, 50.0, WaveType::Sine)
            .unwrap();

        EditCommand::Echo(None).apply(&mut editor).unwrap();
        EditCommand::Reverb(None).apply(&mut editor).unwrap();
        assert_eq!(
            editor.state().effects,
            vec![
                EffectRecord::Echo { delay_ms: 123 },
                EffectRecord::Reverb { reverberance: 70 },
            ]
        );

        EditCommand::Undo.apply(&mut editor).unwrap();
        EditCommand::Undo.apply(&mut editor).unwrap();
        EditCommand::Undo.apply(&mut editor).unwrap();
        assert_eq!(editor.history().undo_count(), 1);
    }
}
