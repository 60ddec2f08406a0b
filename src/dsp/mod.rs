//! Editing effects
//!
//! Every effect is a pure `AudioBuffer -> AudioBuffer` transformation
//! behind the [`Effect`] trait. Sample values are clipped to the range of
//! the buffer's sample width.

mod compressor;
mod delay;
mod edit;
mod effect;
mod gain;
mod noise;
mod pitch;

pub use compressor::{Compressor, CompressorParams};
pub use delay::{overlay, Echo, Reverb, DEFAULT_REVERBERANCE, REVERB_TAPS};
pub use edit::{mix, Trim};
pub use effect::Effect;
pub use gain::{apply_gain, FadeIn, FadeOut, Volume};
pub use noise::{NoiseReduction, NOISE_PROFILE_MS};
pub use pitch::PitchShift;
