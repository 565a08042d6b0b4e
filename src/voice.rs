use std::path::PathBuf;

pub const RECORDING_FILE_NAME: &str = "nubemcopilot_audio.wav";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHandle {
    pub path: PathBuf,
}

/// Audio capture contract used by the voice dialog.
pub trait VoiceRecorder {
    fn start_recording(&mut self) -> RecordingHandle;
    fn stop_recording(&mut self, handle: &RecordingHandle);
}

/// Recorder without a capture backend: hands out the fixed recording path
/// and never writes audio to it.
#[derive(Debug, Default)]
pub struct PlaceholderRecorder;

impl VoiceRecorder for PlaceholderRecorder {
    fn start_recording(&mut self) -> RecordingHandle {
        let path = std::env::temp_dir().join(RECORDING_FILE_NAME);
        log::info!("[voice] recording requested; no capture backend, using {}", path.display());
        RecordingHandle { path }
    }

    fn stop_recording(&mut self, handle: &RecordingHandle) {
        log::info!("[voice] recording stopped: {}", handle.path.display());
    }
}

/// State behind the voice dialog's record toggle.
pub struct VoiceSession<R: VoiceRecorder> {
    recorder: R,
    active: Option<RecordingHandle>,
    last: Option<RecordingHandle>,
}

impl<R: VoiceRecorder> VoiceSession<R> {
    pub fn new(recorder: R) -> Self {
        Self {
            recorder,
            active: None,
            last: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn toggle(&mut self) {
        match self.active.take() {
            Some(handle) => {
                self.recorder.stop_recording(&handle);
                self.last = Some(handle);
            }
            None => {
                let handle = self.recorder.start_recording();
                self.last = Some(handle.clone());
                self.active = Some(handle);
            }
        }
    }

    /// Finish the session and return the recorded file, if any recording
    /// was started.
    pub fn finish(mut self) -> Option<PathBuf> {
        if let Some(handle) = self.active.take() {
            self.recorder.stop_recording(&handle);
        }
        self.last.map(|h| h.path)
    }
}
