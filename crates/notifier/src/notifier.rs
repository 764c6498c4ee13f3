//! Working→Standby edge detection.

use std::sync::Arc;

use pulsetray_protocol::Transition;
use pulsetray_settings::ConfigStore;
use pulsetray_status::Completions;
use tokio_util::sync::CancellationToken;

use crate::SoundPlayer;

/// Plays the completion sound once per Working→Standby transition.
///
/// Volume is read from the settings store at trigger time, so a change from
/// the tray menu applies to the very next transition.
#[derive(Clone)]
pub struct TransitionNotifier {
    player: Arc<dyn SoundPlayer>,
    settings: Arc<ConfigStore>,
}

impl TransitionNotifier {
    pub fn new(player: Arc<dyn SoundPlayer>, settings: Arc<ConfigStore>) -> Self {
        Self { player, settings }
    }

    /// Reacts to one committed transition.
    ///
    /// Returns `true` if playback was dispatched. Must be called from
    /// within a tokio runtime.
    pub fn on_transition(&self, transition: &Transition) -> bool {
        if !transition.is_completion() {
            return false;
        }
        tracing::debug!("task completed, playing notification");
        self.play_now();
        true
    }

    /// Dispatches playback without waiting for it.
    pub fn play_now(&self) {
        let volume = self.settings.volume();
        let player = Arc::clone(&self.player);
        tokio::spawn(async move {
            match player.play(volume).await {
                Ok(()) => tracing::info!(
                    volume_pct = (volume * 100.0).round() as u32,
                    "notification sound played"
                ),
                Err(e) => tracing::warn!("failed to play notification sound: {e}"),
            }
        });
    }

    /// Plays once per completion from `completions`, until cancelled or the
    /// store is dropped.
    ///
    /// Completions that pile up while the task is descheduled arrive as one
    /// batch and still get one playback each.
    pub async fn run(self, mut completions: Completions, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = completions.next() => match received {
                    Some(count) => {
                        if count > 1 {
                            tracing::debug!(count, "several tasks completed at once");
                        }
                        for _ in 0..count {
                            self.play_now();
                        }
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("transition notifier stopped");
    }
}
