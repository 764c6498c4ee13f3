use std::path::PathBuf;

/// Errors produced while playing the notification sound.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("sound file not found: {}", .0.display())]
    MissingResource(PathBuf),

    #[error("playback backend failed: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
