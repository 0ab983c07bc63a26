//! Mute/unmute feedback sounds.
//!
//! Playback is fire-and-forget: a missing file, a missing output device or a decode error is
//! logged at debug level and otherwise ignored.

use std::path::{Path, PathBuf};

use silence_settings::Settings;

/// Plays a short sound file without blocking the caller.
pub trait FeedbackPlayer {
    /// Start `path` at `volume` (0-1), cutting off anything still playing.
    fn play(&mut self, path: &Path, volume: f32);
}

/// Player used when no audio output is available.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl FeedbackPlayer for SilentPlayer {
    fn play(&mut self, path: &Path, _volume: f32) {
        tracing::debug!(path = %path.display(), "sound output unavailable, skipping");
    }
}

/// Bundled presets live in `<exe dir>/Assets/sounds`.
pub fn default_sounds_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Assets")
        .join("sounds")
}

/// Pick the file for a mute (`true`) or unmute sound.
///
/// An existing custom file wins over the preset. Presets resolve to `<preset>_mute.mp3` or
/// `<preset>_unmute.mp3`.
pub fn resolve_sound_path(settings: &Settings, sounds_dir: &Path, muted: bool) -> Option<PathBuf> {
    let (custom, preset, suffix) = if muted {
        (&settings.custom_mute_sound_path, &settings.mute_sound, "mute")
    } else {
        (&settings.custom_unmute_sound_path, &settings.unmute_sound, "unmute")
    };

    if let Some(custom) = custom.as_deref().filter(|p| !p.trim().is_empty()) {
        let path = PathBuf::from(custom);
        if path.is_file() {
            return Some(path);
        }
        tracing::debug!(path = %path.display(), "custom sound not found, falling back to preset");
    }

    let preset = preset.as_deref().filter(|p| !p.trim().is_empty())?;
    let path = sounds_dir.join(format!("{preset}_{suffix}.mp3"));
    if path.is_file() {
        Some(path)
    } else {
        tracing::debug!(path = %path.display(), "sound preset not found");
        None
    }
}

#[cfg(windows)]
pub use self::rodio_player::RodioPlayer;

#[cfg(windows)]
mod rodio_player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc;
    use std::thread;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use super::FeedbackPlayer;

    struct Request {
        path: PathBuf,
        volume: f32,
    }

    /// `rodio` playback on a dedicated thread.
    ///
    /// The output stream is opened on first use and kept; each request stops the previous sink.
    pub struct RodioPlayer {
        sender: Option<mpsc::Sender<Request>>,
        worker: Option<thread::JoinHandle<()>>,
    }

    impl RodioPlayer {
        pub fn spawn() -> std::io::Result<Self> {
            let (sender, requests) = mpsc::channel();
            let worker = thread::Builder::new()
                .name("feedback-sound".into())
                .spawn(move || run(requests))?;
            Ok(Self {
                sender: Some(sender),
                worker: Some(worker),
            })
        }
    }

    impl FeedbackPlayer for RodioPlayer {
        fn play(&mut self, path: &Path, volume: f32) {
            let Some(sender) = &self.sender else {
                return;
            };
            let request = Request {
                path: path.to_path_buf(),
                volume: volume.clamp(0.0, 1.0),
            };
            if sender.send(request).is_err() {
                tracing::debug!("sound worker has exited");
            }
        }
    }

    impl Drop for RodioPlayer {
        fn drop(&mut self) {
            // Closing the channel ends the worker loop.
            self.sender.take();
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
    }

    fn run(requests: mpsc::Receiver<Request>) {
        let mut output: Option<(OutputStream, OutputStreamHandle)> = None;
        let mut current: Option<Sink> = None;

        for request in requests {
            if let Some(sink) = current.take() {
                sink.stop();
            }

            if output.is_none() {
                match OutputStream::try_default() {
                    Ok(stream) => output = Some(stream),
                    Err(e) => {
                        tracing::debug!("no audio output: {e}");
                        continue;
                    }
                }
            }
            let Some((_, handle)) = &output else {
                continue;
            };

            match start(handle, &request) {
                Ok(sink) => current = Some(sink),
                Err(e) => tracing::debug!(path = %request.path.display(), "sound failed: {e}"),
            }
        }
    }

    fn start(handle: &OutputStreamHandle, request: &Request) -> anyhow::Result<Sink> {
        let file = File::open(&request.path)?;
        let source = Decoder::new(BufReader::new(file))?;
        let sink = Sink::try_new(handle)?;
        sink.set_volume(request.volume);
        sink.append(source);
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sounds() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let sounds = dir.path().join("sounds");
        fs::create_dir_all(&sounds).expect("mkdir");
        fs::write(sounds.join("blob_mute.mp3"), b"ID3").expect("write");
        fs::write(sounds.join("blob_unmute.mp3"), b"ID3").expect("write");
        (dir, sounds)
    }

    #[test]
    fn presets_resolve_by_state() {
        let (_dir, sounds) = sounds();
        let settings = Settings::default();

        assert_eq!(
            resolve_sound_path(&settings, &sounds, true),
            Some(sounds.join("blob_mute.mp3"))
        );
        assert_eq!(
            resolve_sound_path(&settings, &sounds, false),
            Some(sounds.join("blob_unmute.mp3"))
        );
    }

    #[test]
    fn existing_custom_file_wins() {
        let (dir, sounds) = sounds();
        let custom = dir.path().join("click.wav");
        fs::write(&custom, b"RIFF").expect("write");

        let mut settings = Settings::default();
        settings.custom_mute_sound_path = Some(custom.display().to_string());

        assert_eq!(resolve_sound_path(&settings, &sounds, true), Some(custom));
        assert_eq!(
            resolve_sound_path(&settings, &sounds, false),
            Some(sounds.join("blob_unmute.mp3"))
        );
    }

    #[test]
    fn missing_custom_file_falls_back_to_preset() {
        let (dir, sounds) = sounds();
        let mut settings = Settings::default();
        settings.custom_mute_sound_path = Some(dir.path().join("gone.wav").display().to_string());

        assert_eq!(
            resolve_sound_path(&settings, &sounds, true),
            Some(sounds.join("blob_mute.mp3"))
        );
    }

    #[test]
    fn missing_preset_or_none_gives_nothing() {
        let (_dir, sounds) = sounds();
        let mut settings = Settings::default();
        settings.mute_sound = Some("scifi".into());
        settings.unmute_sound = None;

        assert_eq!(resolve_sound_path(&settings, &sounds, true), None);
        assert_eq!(resolve_sound_path(&settings, &sounds, false), None);
    }
}
