//! Waveform overview data
//!
//! Reduces a buffer to per-column min/max peaks for plotting, and bundles
//! those peaks with the markers drawn over them: effect regions, key points
//! and the playhead. [`WaveformView::render_text`] draws the whole thing as
//! a fixed-size character plot for terminals.

use crate::engine::AudioBuffer;
use crate::state::EffectRecord;

/// Minimum and maximum normalized sample value within one column
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnPeak {
    pub min: f32,
    pub max: f32,
}

/// Min/max overview of a buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub peaks: Vec<ColumnPeak>,
    pub duration_ms: u64,
}

impl Waveform {
    /// Reduce `buffer` to `columns` peaks
    ///
    /// Channels are averaged to mono before reduction. Columns past the end
    /// of a very short clip stay at zero.
    pub fn from_buffer(buffer: &AudioBuffer, columns: usize) -> Self {
        let channels = buffer.channels() as usize;
        let scale = buffer.max_possible_amplitude();
        let mono: Vec<f32> = buffer
            .samples()
            .chunks_exact(channels)
            .map(|frame| {
                let sum: f64 = frame.iter().map(|&s| s as f64).sum();
                (sum / channels as f64 / scale) as f32
            })
            .collect();

        let frames = mono.len();
        let peaks = (0..columns)
            .map(|c| {
                let start = c * frames / columns;
                let end = (c + 1) * frames / columns;
                let bucket = &mono[start..end];
                if bucket.is_empty() {
                    return ColumnPeak::default();
                }
                bucket.iter().fold(
                    ColumnPeak {
                        min: f32::MAX,
                        max: f32::MIN,
                    },
                    |acc, &v| ColumnPeak {
                        min: acc.min.min(v),
                        max: acc.max.max(v),
                    },
                )
            })
            .collect();

        Self {
            peaks,
            duration_ms: buffer.len_ms(),
        }
    }

    pub fn columns(&self) -> usize {
        self.peaks.len()
    }

    /// Column containing `ms`, or `None` past the end of the clip
    pub fn column_for_ms(&self, ms: u64) -> Option<usize> {
        if self.duration_ms == 0 || self.peaks.is_empty() || ms > self.duration_ms {
            return None;
        }
        let column = (ms as u128 * self.peaks.len() as u128 / self.duration_ms as u128) as usize;
        Some(column.min(self.peaks.len() - 1))
    }
}

/// Everything needed to draw the editor's waveform panel
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformView {
    pub waveform: Waveform,
    pub effects: Vec<EffectRecord>,
    pub key_points: Vec<u64>,
    pub playhead_ms: u64,
}

impl WaveformView {
    /// Draw the view as text
    ///
    /// `rows` lines of waveform (`#` where the signal reaches), followed by
    /// one marker line: `P` playhead, `k` key point, `f`/`e`/`r` effect
    /// regions, `-` elsewhere.
    pub fn render_text(&self, rows: usize) -> String {
        let rows = rows.max(2);
        let columns = self.waveform.columns();
        let mut out = String::with_capacity((columns + 1) * (rows + 1));

        for r in 0..rows {
            let top = 1.0 - 2.0 * r as f32 / rows as f32;
            let bottom = 1.0 - 2.0 * (r + 1) as f32 / rows as f32;
            for peak in &self.waveform.peaks {
                let reaches = peak.max >= bottom && peak.min <= top;
                out.push(if reaches { '#' } else { ' ' });
            }
            out.push('\n');
        }

        out.extend(self.marker_line());
        out.push('\n');
        out
    }

    /// One marker character per column
    pub fn marker_line(&self) -> Vec<char> {
        let mut markers = vec!['-'; self.waveform.columns()];

        for effect in &self.effects {
            let (start, end) = effect.span_ms();
            let first = self.waveform.column_for_ms(start);
            let last = self.waveform.column_for_ms(end.min(self.waveform.duration_ms));
            if let (Some(first), Some(last)) = (first, last) {
                for marker in &mut markers[first..=last] {
                    *marker = effect.marker();
                }
            }
        }

        for &point in &self.key_points {
            if let Some(column) = self.waveform.column_for_ms(point) {
                markers[column] = 'k';
            }
        }

        if let Some(column) = self.waveform.column_for_ms(self.playhead_ms) {
            markers[column] = 'P';
        }

        markers
    }
}
