//! Sound playback backends.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use crate::PlaybackError;

/// A boxed future returned by [`SoundPlayer::play`].
pub type PlayFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PlaybackError>> + Send + 'a>>;

/// Plays the notification sound.
///
/// `volume` is in `[0, 1]`. The future may run as long as the sound lasts;
/// callers spawn it rather than await it.
pub trait SoundPlayer: Send + Sync + 'static {
    fn play(&self, volume: f32) -> PlayFuture<'_>;
}

/// Plays a WAV file through the platform's command-line player.
///
/// - Linux: `paplay --volume=<0..65536>`
/// - macOS: `afplay -v <0..1>`
/// - Windows: PowerShell `System.Windows.Media.MediaPlayer`
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    sound_file: PathBuf,
}

impl CommandPlayer {
    pub fn new(sound_file: impl Into<PathBuf>) -> Self {
        Self {
            sound_file: sound_file.into(),
        }
    }

    pub fn sound_file(&self) -> &Path {
        &self.sound_file
    }

    /// Program and arguments used to play at `volume`.
    pub fn command_line(&self, volume: f32) -> (String, Vec<String>) {
        let volume = volume.clamp(0.0, 1.0);
        platform_command(&self.sound_file, volume)
    }
}

#[cfg(target_os = "linux")]
fn platform_command(file: &Path, volume: f32) -> (String, Vec<String>) {
    // PulseAudio's linear scale: 65536 is 100%.
    let level = (volume * 65536.0).round() as u32;
    (
        "paplay".into(),
        vec![format!("--volume={level}"), file.display().to_string()],
    )
}

#[cfg(target_os = "macos")]
fn platform_command(file: &Path, volume: f32) -> (String, Vec<String>) {
    (
        "afplay".into(),
        vec!["-v".into(), format!("{volume:.2}"), file.display().to_string()],
    )
}

#[cfg(target_os = "windows")]
fn platform_command(file: &Path, volume: f32) -> (String, Vec<String>) {
    (
        "powershell.exe".into(),
        vec![
            "-NoProfile".into(),
            "-Command".into(),
            media_player_script(file, volume),
        ],
    )
}

/// Waits for the clip's own length before closing the player. A clip whose
/// length never resolves gets [`UNKNOWN_LENGTH_WAIT_MS`].
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn media_player_script(file: &Path, volume: f32) -> String {
    let path = file.display().to_string().replace('\'', "''");
    format!(
        "Add-Type -AssemblyName PresentationCore; \
         $p = New-Object System.Windows.Media.MediaPlayer; \
         $p.Volume = {volume:.2}; $p.Open([Uri]'{path}'); \
         $n = 0; while (-not $p.NaturalDuration.HasTimeSpan -and $n -lt 50) \
         {{ Start-Sleep -Milliseconds 100; $n++ }}; \
         $p.Play(); \
         if ($p.NaturalDuration.HasTimeSpan) \
         {{ Start-Sleep -Milliseconds ([int]$p.NaturalDuration.TimeSpan.TotalMilliseconds + 200) }} \
         else {{ Start-Sleep -Milliseconds {UNKNOWN_LENGTH_WAIT_MS} }}; \
         $p.Close()"
    )
}

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
const UNKNOWN_LENGTH_WAIT_MS: u32 = 3000;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_command(file: &Path, _volume: f32) -> (String, Vec<String>) {
    ("aplay".into(), vec!["-q".into(), file.display().to_string()])
}

impl SoundPlayer for CommandPlayer {
    fn play(&self, volume: f32) -> PlayFuture<'_> {
        Box::pin(async move {
            if !self.sound_file.is_file() {
                return Err(PlaybackError::MissingResource(self.sound_file.clone()));
            }

            let (program, args) = self.command_line(volume);
            let status = tokio::process::Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map_err(|e| PlaybackError::Backend(format!("failed to run {program}: {e}")))?;

            if !status.success() {
                return Err(PlaybackError::Backend(format!("{program} exited with {status}")));
            }
            Ok(())
        })
    }
}
