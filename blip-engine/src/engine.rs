//! Engine facade - lifecycle, fire-and-forget playback, ambient loop control
//!
//! `SfxEngine` is the only type the surrounding application talks to. It
//! spawns one engine thread that owns the output stream and the rendered
//! catalog; commands cross a bounded channel and never block the caller.
//! Sound is a cosmetic layer: nothing here panics or returns an error, and
//! a machine without audio simply gets a silent, permanently-disabled
//! engine.

use crate::error::EngineError;
use crate::mixer::VoiceMixer;
use crate::output;
use crate::prefs::Prefs;
use crate::voice::Voice;
use blip_synth::{render_catalog, SoundBuffer, SoundName};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Command channel capacity; bursts beyond this drop cues rather than
/// blocking the caller.
const COMMAND_CAPACITY: usize = 256;

/// How long `initialize` waits for the engine thread to come up.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Commands sent to the engine thread.
#[derive(Debug, Clone)]
enum Command {
    Play { name: SoundName, gain: f32 },
    StartAmbient { gain: f32 },
    StopAmbient,
    SetMasterVolume(f32),
    SetMuted(bool),
    Shutdown,
}

/// Live engine resources, present only while initialized.
struct Inner {
    command_tx: Sender<Command>,
    mixer: Arc<Mutex<VoiceMixer>>,
    sample_rate: u32,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

/// Sound effect engine: renders the catalog once, then plays cues on
/// demand through the platform output.
pub struct SfxEngine {
    inner: Option<Inner>,
    prefs: Prefs,
}

impl SfxEngine {
    /// Create an uninitialized engine with default preferences.
    pub fn new() -> Self {
        Self::with_prefs(Prefs::default())
    }

    /// Create an uninitialized engine with the given preferences.
    pub fn with_prefs(prefs: Prefs) -> Self {
        Self { inner: None, prefs }
    }

    /// Bring the engine up: open the output stream, render the catalog,
    /// start accepting cues.
    ///
    /// Idempotent - calling on an initialized engine returns immediately.
    /// Every failure (no device, unsupported config, stream error) is
    /// caught and logged; the engine then stays disabled and later calls
    /// are safe no-ops.
    pub fn initialize(&mut self) {
        if self.inner.is_some() {
            tracing::debug!("initialize called on a running engine");
            return;
        }

        let mixer = Arc::new(Mutex::new(VoiceMixer::new()));
        {
            let mut m = mixer.lock();
            m.set_master_volume(self.prefs.master_volume);
            m.set_muted(self.prefs.muted);
        }

        let (command_tx, command_rx) = bounded(COMMAND_CAPACITY);
        let (ready_tx, ready_rx) = bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_mixer = mixer.clone();
        let thread_shutdown = shutdown.clone();
        let thread = std::thread::Builder::new()
            .name("blip-engine".into())
            .spawn(move || run_engine_thread(thread_mixer, command_rx, ready_tx, thread_shutdown));
        let thread = match thread {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("could not spawn engine thread: {e}; sound disabled");
                return;
            }
        };

        match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(Ok(sample_rate)) => {
                tracing::info!(sample_rate, "sound engine ready");
                self.inner = Some(Inner {
                    command_tx,
                    mixer,
                    sample_rate,
                    shutdown,
                    thread: Some(thread),
                });
            }
            Ok(Err(e)) => {
                tracing::warn!("audio unavailable: {e}; sound disabled");
                let _ = thread.join();
            }
            Err(_) => {
                tracing::warn!("{}; sound disabled", EngineError::StartupTimeout);
                // The thread may be wedged inside the platform audio API;
                // flag shutdown and leave it detached.
                shutdown.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Whether the engine is up and accepting cues.
    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    /// Output sample rate, once initialized.
    pub fn sample_rate(&self) -> Option<u32> {
        self.inner.as_ref().map(|inner| inner.sample_rate)
    }

    /// Schedule an independent playback of `name` at `volume` and return
    /// immediately.
    ///
    /// Volume is clamped to [0, 1]. Before initialization (or after a
    /// failed one) this is a no-op. Concurrent plays of the same sound
    /// overlap; a saturated command queue drops the cue without affecting
    /// other in-flight sounds.
    pub fn play(&self, name: SoundName, volume: f32) {
        let gain = volume.clamp(0.0, 1.0);
        let Some(inner) = &self.inner else {
            tracing::warn!(sound = name.as_str(), "play ignored: engine not initialized");
            return;
        };
        if inner.command_tx.try_send(Command::Play { name, gain }).is_err() {
            tracing::warn!(sound = name.as_str(), "play dropped: command queue full");
        }
    }

    /// Start the looping ambient drone, replacing any loop already
    /// running. Gain comes from preferences.
    pub fn start_ambient(&self) {
        let gain = self.prefs.ambient_volume.clamp(0.0, 1.0);
        self.send(Command::StartAmbient { gain });
    }

    /// Stop the ambient drone. A no-op when none is running.
    pub fn stop_ambient(&self) {
        self.send(Command::StopAmbient);
    }

    /// Whether the ambient loop is currently registered.
    pub fn is_ambient_active(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.mixer.lock().has_ambient())
    }

    /// Number of fire-and-forget cues still rendering.
    pub fn active_voices(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.mixer.lock().active_voices())
    }

    /// Set master volume (0.0 - 2.0) and remember it in preferences.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.prefs.master_volume = volume.clamp(0.0, 2.0);
        let v = self.prefs.master_volume;
        self.send(Command::SetMasterVolume(v));
    }

    pub fn master_volume(&self) -> f32 {
        self.prefs.master_volume
    }

    /// Mute or unmute all output, remembering the flag in preferences.
    pub fn set_muted(&mut self, muted: bool) {
        self.prefs.muted = muted;
        self.send(Command::SetMuted(muted));
    }

    pub fn is_muted(&self) -> bool {
        self.prefs.muted
    }

    /// Current preferences (as adjusted at runtime).
    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    /// Persist current preferences. Best effort - failure is logged.
    pub fn save_prefs(&self) {
        if let Err(e) = self.prefs.save() {
            tracing::warn!("could not save preferences: {e}");
        }
    }

    /// Tear the engine down: stop all playback, release the output stream,
    /// discard the rendered catalog.
    ///
    /// The engine returns to its uninitialized state and can be brought
    /// back with `initialize`. Calling on an uninitialized engine is a
    /// no-op.
    pub fn cleanup(&mut self) {
        let Some(mut inner) = self.inner.take() else {
            return;
        };
        inner.shutdown.store(true, Ordering::SeqCst);
        let _ = inner.command_tx.try_send(Command::Shutdown);
        if let Some(thread) = inner.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("sound engine shut down");
    }

    fn send(&self, command: Command) {
        let Some(inner) = &self.inner else {
            tracing::debug!(?command, "command ignored: engine not initialized");
            return;
        };
        if inner.command_tx.try_send(command).is_err() {
            tracing::warn!("command dropped: queue full");
        }
    }
}

// Convenience wrappers, one per catalog entry, each a fixed-gain play.
impl SfxEngine {
    pub fn click(&self) {
        self.play(SoundName::Click, 0.5);
    }

    pub fn alert(&self) {
        self.play(SoundName::Alert, 0.6);
    }

    pub fn success(&self) {
        self.play(SoundName::Success, 0.6);
    }

    pub fn error(&self) {
        self.play(SoundName::Error, 0.55);
    }

    pub fn typing(&self) {
        self.play(SoundName::Typing, 0.35);
    }

    pub fn startup(&self) {
        self.play(SoundName::Startup, 0.6);
    }

    pub fn loading_beep(&self) {
        self.play(SoundName::LoadingBeep, 0.4);
    }

    pub fn loading_progress(&self) {
        self.play(SoundName::LoadingProgress, 0.45);
    }

    pub fn loading_complete(&self) {
        self.play(SoundName::LoadingComplete, 0.6);
    }

    pub fn system_initialize(&self) {
        self.play(SoundName::SystemInitialize, 0.6);
    }

    pub fn data_transfer(&self) {
        self.play(SoundName::DataTransfer, 0.4);
    }
}

impl Default for SfxEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SfxEngine {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Engine thread body: open the stream, render the catalog, then service
/// commands until shutdown. The stream is dropped on exit, which stops any
/// in-flight playback.
fn run_engine_thread(
    mixer: Arc<Mutex<VoiceMixer>>,
    command_rx: Receiver<Command>,
    ready_tx: Sender<Result<u32, EngineError>>,
    shutdown: Arc<AtomicBool>,
) {
    let stream = match output::open(mixer.clone()) {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    // Synthesize the whole catalog once, at the device rate.
    let catalog: HashMap<SoundName, Arc<SoundBuffer>> = render_catalog(stream.sample_rate)
        .into_iter()
        .map(|buffer| (buffer.name(), Arc::new(buffer)))
        .collect();

    let _ = ready_tx.send(Ok(stream.sample_rate));

    while !shutdown.load(Ordering::Relaxed) {
        match command_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(Command::Shutdown) => break,
            Ok(command) => handle_command(&mixer, &catalog, command),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    mixer.lock().clear();
}

fn handle_command(
    mixer: &Mutex<VoiceMixer>,
    catalog: &HashMap<SoundName, Arc<SoundBuffer>>,
    command: Command,
) {
    match command {
        Command::Play { name, gain } => {
            if let Some(buffer) = catalog.get(&name) {
                mixer.lock().spawn(Voice::new(buffer.clone(), gain, false));
            }
        }
        Command::StartAmbient { gain } => {
            if let Some(buffer) = catalog.get(&SoundName::LoadingAmbient) {
                mixer
                    .lock()
                    .start_ambient(Voice::new(buffer.clone(), gain, true));
            }
        }
        Command::StopAmbient => {
            mixer.lock().stop_ambient();
        }
        Command::SetMasterVolume(volume) => {
            mixer.lock().set_master_volume(volume);
        }
        Command::SetMuted(muted) => {
            mixer.lock().set_muted(muted);
        }
        Command::Shutdown => {} // Handled in the thread loop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_before_initialize_is_noop() {
        let engine = SfxEngine::new();
        for name in SoundName::ALL {
            engine.play(name, 0.5);
        }
        assert!(!engine.is_initialized());
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn test_wild_volumes_never_panic() {
        let engine = SfxEngine::new();
        for v in [-10.0, -0.001, 0.0, 0.5, 1.0, 1.5, f32::NAN, f32::INFINITY] {
            engine.play(SoundName::Success, v);
        }
    }

    #[test]
    fn test_ambient_control_before_initialize() {
        let engine = SfxEngine::new();
        engine.stop_ambient();
        engine.start_ambient();
        engine.stop_ambient();
        engine.stop_ambient();
        assert!(!engine.is_ambient_active());
    }

    #[test]
    fn test_cleanup_uninitialized_is_noop() {
        let mut engine = SfxEngine::new();
        engine.cleanup();
        engine.cleanup();
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_full_lifecycle_never_panics() {
        // On machines without audio, initialize leaves the engine disabled
        // and every call below must still be a safe no-op.
        let mut engine = SfxEngine::new();
        engine.initialize();
        engine.initialize(); // idempotent

        for name in SoundName::ALL {
            engine.play(name, 2.0);
            engine.play(name, -1.0);
        }
        engine.start_ambient();
        engine.start_ambient();
        engine.stop_ambient();
        engine.stop_ambient();
        engine.set_master_volume(0.7);
        engine.set_muted(true);
        engine.set_muted(false);

        engine.cleanup();
        assert!(!engine.is_initialized());

        // full restart restores the same contract
        engine.initialize();
        engine.play(SoundName::Click, 0.5);
        engine.cleanup();
    }

    #[test]
    fn test_convenience_wrappers_cover_catalog() {
        let engine = SfxEngine::new();
        engine.click();
        engine.alert();
        engine.success();
        engine.error();
        engine.typing();
        engine.startup();
        engine.loading_beep();
        engine.loading_progress();
        engine.loading_complete();
        engine.system_initialize();
        engine.data_transfer();
    }

    #[test]
    fn test_volume_prefs_track_runtime_changes() {
        let mut engine = SfxEngine::new();
        engine.set_master_volume(5.0);
        assert_eq!(engine.master_volume(), 2.0);
        engine.set_master_volume(-1.0);
        assert_eq!(engine.master_volume(), 0.0);
        engine.set_muted(true);
        assert!(engine.is_muted());
    }

    #[test]
    fn test_mixer_ambient_contract() {
        // the start-twice/stop-twice contract, exercised at the mixer
        // level where no audio device is needed
        let mixer = Arc::new(Mutex::new(VoiceMixer::new()));
        let catalog: HashMap<SoundName, Arc<SoundBuffer>> = render_catalog(48000)
            .into_iter()
            .map(|b| (b.name(), Arc::new(b)))
            .collect();

        handle_command(&mixer, &catalog, Command::StartAmbient { gain: 0.35 });
        handle_command(&mixer, &catalog, Command::StartAmbient { gain: 0.35 });
        assert!(mixer.lock().has_ambient());
        assert_eq!(mixer.lock().active_voices(), 0);

        handle_command(&mixer, &catalog, Command::StopAmbient);
        assert!(!mixer.lock().has_ambient());
        handle_command(&mixer, &catalog, Command::StopAmbient);
    }

    #[test]
    fn test_play_command_spawns_voice() {
        let mixer = Arc::new(Mutex::new(VoiceMixer::new()));
        let catalog: HashMap<SoundName, Arc<SoundBuffer>> = render_catalog(48000)
            .into_iter()
            .map(|b| (b.name(), Arc::new(b)))
            .collect();

        handle_command(
            &mixer,
            &catalog,
            Command::Play {
                name: SoundName::Click,
                gain: 0.5,
            },
        );
        assert_eq!(mixer.lock().active_voices(), 1);
    }
}
