//! Companion voice playback through rodio.
//!
//! Clips are fetched and checked on the backend worker; the output stream and
//! the [`Sink`] playing the current clip live on the UI thread.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

/// Encoded audio bytes shared between the view state and the playing sink.
pub type AudioClip = Arc<[u8]>;

/// Confirms rodio can decode the clip before it reaches the UI thread.
pub fn decode_dialogue_audio(bytes: Vec<u8>) -> Result<AudioClip, String> {
    if bytes.is_empty() {
        return Err("dialogue audio response was empty".to_string());
    }
    let clip: AudioClip = bytes.into();
    Decoder::new(Cursor::new(Arc::clone(&clip))).map_err(|err| err.to_string())?;
    Ok(clip)
}

enum Output {
    Device {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    },
    #[cfg(test)]
    Detached,
}

impl Output {
    fn open() -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default().map_err(|err| err.to_string())?;
        Ok(Self::Device {
            _stream: stream,
            handle,
        })
    }

    fn sink(&self) -> Result<Sink, String> {
        match self {
            Self::Device { handle, .. } => Sink::try_new(handle).map_err(|err| err.to_string()),
            #[cfg(test)]
            Self::Detached => Ok(Sink::new_idle().0),
        }
    }
}

/// Playback for the dialogue view: the current reference, the clip behind it
/// and the sink playing it.
pub struct DialogueAudio {
    output: Option<Output>,
    volume: f32,
    source: Option<String>,
    clip: Option<AudioClip>,
    sink: Option<Sink>,
    last_error: Option<String>,
}

impl DialogueAudio {
    /// The output device is opened on first playback.
    pub fn new(volume: f32) -> Self {
        Self {
            output: None,
            volume,
            source: None,
            clip: None,
            sink: None,
            last_error: None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Follows the reply's audio reference. A new reference stops the old
    /// clip; the new one starts on its own once its bytes are ready. `None`
    /// stops playback.
    pub fn sync(&mut self, source: Option<&str>, clip: Option<&AudioClip>) {
        if self.source.as_deref() != source {
            self.stop();
            self.source = source.map(str::to_owned);
            self.clip = None;
            self.last_error = None;
        }
        if self.source.is_none() || self.clip.is_some() {
            return;
        }
        if let Some(clip) = clip {
            self.clip = Some(Arc::clone(clip));
            self.start();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    /// Pauses or resumes the current clip; a finished clip plays again from the start.
    pub fn toggle(&mut self) {
        match self.sink.as_ref() {
            Some(sink) if !sink.empty() => {
                if sink.is_paused() {
                    sink.play();
                } else {
                    sink.pause();
                }
            }
            _ => self.start(),
        }
    }

    fn start(&mut self) {
        self.stop();
        let Some(clip) = self.clip.clone() else {
            return;
        };
        match self.open_sink(clip) {
            Ok(sink) => {
                tracing::debug!(source = ?self.source, "dialogue audio started");
                self.sink = Some(sink);
            }
            Err(err) => {
                tracing::warn!(source = ?self.source, "failed to play dialogue audio: {err}");
                self.last_error = Some(format!("Could not play audio: {err}"));
            }
        }
    }

    fn open_sink(&mut self, clip: AudioClip) -> Result<Sink, String> {
        let output = match self.output.take() {
            Some(output) => output,
            None => Output::open()?,
        };
        let sink = self.output.insert(output).sink()?;
        let decoder = Decoder::new(Cursor::new(clip)).map_err(|err| err.to_string())?;
        sink.set_volume(self.volume);
        sink.append(decoder);
        Ok(sink)
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for DialogueAudio {
    fn drop(&mut self) {
        self.stop();
    }
}


#[cfg(test)]
mod tests {
    use client_core::ClientSettings;

    use super::*;

    fn detached(volume: f32) -> DialogueAudio {
        let mut audio = DialogueAudio::new(volume);
        audio.output = Some(Output::Detached);
        audio
    }

    fn clip() -> AudioClip {
        decode_dialogue_audio(fixtures::pcm_wav(8_000)).expect("wav")
    }

    #[test]
    fn default_settings_autoplay_a_new_reply() {
        let mut audio = detached(ClientSettings::default().clamped_volume());
        audio.sync(Some("/audio/reply.mp3"), None);
        assert_eq!(audio.source(), Some("/audio/reply.mp3"));
        assert!(!audio.is_playing());

        audio.sync(Some("/audio/reply.mp3"), Some(&clip()));
        assert!(audio.is_playing());
        assert!(audio.last_error().is_none());
    }

    #[test]
    fn toggle_pauses_and_resumes_the_same_sink() {
        let mut audio = detached(1.0);
        audio.sync(Some("/audio/reply.mp3"), Some(&clip()));

        audio.toggle();
        assert!(!audio.is_playing());
        assert!(audio.sink.as_ref().is_some_and(Sink::is_paused));

        audio.toggle();
        assert!(audio.is_playing());
        assert!(audio.sink.as_ref().is_some_and(|sink| !sink.empty()));
    }

    #[test]
    fn paused_clip_is_not_restarted_by_later_frames() {
        let mut audio = detached(1.0);
        let clip = clip();
        audio.sync(Some("/audio/reply.mp3"), Some(&clip));
        audio.toggle();

        audio.sync(Some("/audio/reply.mp3"), Some(&clip));
        assert!(!audio.is_playing());
    }

    #[test]
    fn new_reference_replaces_playback_and_none_stops_it() {
        let mut audio = detached(0.5);
        audio.sync(Some("/audio/first.wav"), Some(&clip()));
        assert!(audio.is_playing());

        audio.sync(Some("/audio/second.wav"), None);
        assert_eq!(audio.source(), Some("/audio/second.wav"));
        assert!(!audio.is_playing());
        assert!(audio.sink.is_none());

        audio.sync(Some("/audio/second.wav"), Some(&clip()));
        assert!(audio.is_playing());

        audio.sync(None, None);
        assert!(!audio.is_playing());
        assert_eq!(audio.source(), None);
    }

    #[test]
    fn decoding_accepts_wav_and_rejects_garbage() {
        let wav = fixtures::pcm_wav(16);
        assert_eq!(decode_dialogue_audio(wav.clone()).expect("wav").len(), wav.len());
        assert!(decode_dialogue_audio(b"not audio at all".to_vec()).is_err());
        assert!(decode_dialogue_audio(Vec::new()).is_err());
    }
}
