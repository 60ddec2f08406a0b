//! Playback Transport
//!
//! Play / pause / stop state machine and the playhead it drives. There is
//! no audio device behind it: a front end calls [`Transport::tick`] from its
//! redraw timer (every [`PLAYHEAD_POLL_INTERVAL_MS`]) to move the playhead
//! marker while a clip plays.

use std::fmt;

use log::debug;

/// How often a front end is expected to poll the playhead
pub const PLAYHEAD_POLL_INTERVAL_MS: u64 = 100;

/// Transport states representing the current playback mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing playing, playhead at 0 (default state)
    #[default]
    Stopped,
    /// Audio is actively playing
    Playing,
    /// Playback halted; resumes from the playhead
    Paused,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Stopped => write!(f, "Stopped"),
            TransportState::Playing => write!(f, "Playing"),
            TransportState::Paused => write!(f, "Paused"),
        }
    }
}

/// Tracks transport state and playhead position for one clip
#[derive(Debug, Clone, Default)]
pub struct Transport {
    state: TransportState,
    /// Playhead offset in milliseconds
    playhead_ms: u64,
    /// Length of the clip being played
    duration_ms: u64,
}

impl Transport {
    /// Create a stopped transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or resume playback of a clip lasting `duration_ms`
    ///
    /// State transitions:
    /// - Stopped -> Playing (from 0)
    /// - Paused -> Playing (from the playhead)
    /// - Playing -> Playing (restarts from 0, like pressing play again)
    ///
    /// # Example
    /// ```
    /// use sfxedit::engine::Transport;
    /// let mut transport = Transport::new();
    /// transport.play(1000);
    /// assert!(transport.is_playing());
    /// ```
    pub fn play(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        match self.state {
            TransportState::Paused => {
                debug!("[TRANSPORT] Resume from {}ms", self.playhead_ms);
            }
            TransportState::Stopped | TransportState::Playing => {
                self.playhead_ms = 0;
                debug!("[TRANSPORT] Play {}ms clip", duration_ms);
            }
        }
        self.state = TransportState::Playing;
    }

    /// Pause playback, or resume if already paused
    ///
    /// Has no effect while stopped.
    pub fn pause(&mut self) {
        match self.state {
            TransportState::Playing => {
                self.state = TransportState::Paused;
                debug!("[TRANSPORT] Paused at {}ms", self.playhead_ms);
            }
            TransportState::Paused => {
                self.state = TransportState::Playing;
                debug!("[TRANSPORT] Resume from {}ms", self.playhead_ms);
            }
            TransportState::Stopped => {
                debug!("[TRANSPORT] Nothing to pause");
            }
        }
    }

    /// Stop playback and reset the playhead to the start
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.playhead_ms = 0;
        debug!("[TRANSPORT] Stopped, playhead reset to 0");
    }

    /// Advance the playhead by `elapsed_ms` if playing
    ///
    /// When the playhead reaches the end of the clip the transport stops.
    /// Returns the playhead position after the tick.
    pub fn tick(&mut self, elapsed_ms: u64) -> u64 {
        if self.state != TransportState::Playing {
            return self.playhead_ms;
        }

        self.playhead_ms = self.playhead_ms.saturating_add(elapsed_ms);
        if self.playhead_ms >= self.duration_ms {
            debug!("[TRANSPORT] Reached end of {}ms clip", self.duration_ms);
            self.stop();
        }
        self.playhead_ms
    }

    /// Current state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Current playhead offset in milliseconds
    pub fn playhead_ms(&self) -> u64 {
        self.playhead_ms
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == TransportState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state == TransportState::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let transport = Transport::new();
        assert!(transport.is_stopped());
        assert_eq!(transport.playhead_ms(), 0);
        assert_eq!(transport.state().to_string(), "Stopped");
    }

    #[test]
    fn test_tick_only_moves_while_playing() {
        let mut transport = Transport::new();
        assert_eq!(transport.tick(PLAYHEAD_POLL_INTERVAL_MS), 0);

        transport.play(1000);
        assert_eq!(transport.tick(PLAYHEAD_POLL_INTERVAL_MS), 100);
        assert_eq!(transport.tick(PLAYHEAD_POLL_INTERVAL_MS), 200);

        transport.pause();
        assert_eq!(transport.tick(PLAYHEAD_POLL_INTERVAL_MS), 200);
    }

    #[test]
    fn test_pause_toggles_resume() {
        let mut transport = Transport::new();
        transport.play(1000);
        transport.tick(300);

        transport.pause();
        assert!(transport.is_paused());
        transport.pause();
        assert!(transport.is_playing());
        assert_eq!(transport.playhead_ms(), 300);
    }

    #[test]
    fn test_play_after_pause_resumes() {
        let mut transport = Transport::new();
        transport.play(1000);
        transport.tick(400);
        transport.pause();
        transport.play(1000);
        assert!(transport.is_playing());
        assert_eq!(transport.playhead_ms(), 400);
    }

    #[test]
    fn test_stop_resets_playhead() {
        let mut transport = Transport::new();
        transport.play(1000);
        transport.tick(500);
        transport.stop();
        assert!(transport.is_stopped());
        assert_eq!(transport.playhead_ms(), 0);
    }

    #[test]
    fn test_reaching_end_stops() {
        let mut transport = Transport::new();
        transport.play(250);
        transport.tick(100);
        transport.tick(100);
        assert!(transport.is_playing());
        assert_eq!(transport.tick(100), 0);
        assert!(transport.is_stopped());
    }

    #[test]
    fn test_pause_while_stopped_is_noop() {
        let mut transport = Transport::new();
        transport.pause();
        assert!(transport.is_stopped());
    }
}
