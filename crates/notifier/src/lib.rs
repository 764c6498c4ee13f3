//! Completion sound.
//!
//! [`TransitionNotifier`] watches status transitions and plays a sound once
//! for every Working→Standby edge. Playback goes through the [`SoundPlayer`]
//! trait; [`CommandPlayer`] drives the platform's command-line player.

mod error;
mod notifier;
mod player;

pub use error::PlaybackError;
pub use notifier::TransitionNotifier;
pub use player::{CommandPlayer, PlayFuture, SoundPlayer};
