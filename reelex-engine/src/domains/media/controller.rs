//! Media resource controller: binds one feed slot's playback state to a
//! real decodable surface.
//!
//! One controller exists per live slot in the activation window. It owns
//! the slot's state machine, translates element events into transitions,
//! chooses native vs adaptive playback, and carries the retry/stall
//! policy. Attach completions race with navigation, so every binding has
//! a generation; anything arriving with an older generation is stale and
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use reelex_config::{PlaybackConfig, PlayerPolicy};
use reelex_contracts::adaptive::AdaptiveEngine;
use reelex_contracts::media::{
    MediaBackend, MediaElement, MediaEvent, MediaMetadata,
};
use reelex_model::item::{FeedItem, MediaSources};
use reelex_model::playback::{
    PlaybackError, PlaybackErrorKind, PlaybackPhase, PlaybackSnapshot,
    QualitySelection,
};
use reelex_model::prelude::{ResumeHint, VideoId};
use url::Url;

use crate::common::messages::{Effect, TimerId};
use crate::domains::player::machine::{PlaybackEvent, PlayerStateMachine};

/// Everything the runtime needs to drive one attach to completion,
/// detached from engine state so the load can run concurrently.
#[derive(Clone)]
pub struct AttachLoader {
    element: Arc<dyn MediaElement>,
    adaptive: Option<Arc<dyn AdaptiveEngine>>,
    url: Url,
}

impl AttachLoader {
    pub async fn run(&self) -> Result<MediaMetadata, PlaybackError> {
        match &self.adaptive {
            Some(adaptive) => adaptive.load(self.url.clone()).await,
            None => self.element.load(self.url.clone()).await,
        }
    }
}

impl std::fmt::Debug for AttachLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachLoader")
            .field("url", &self.url.as_str())
            .field("adaptive", &self.adaptive.is_some())
            .finish()
    }
}

/// Live playback binding for one feed slot.
pub struct MediaResourceController {
    index: usize,
    item_id: VideoId,
    machine: PlayerStateMachine,
    snapshot: PlaybackSnapshot,
    element: Arc<dyn MediaElement>,
    adaptive: Option<Arc<dyn AdaptiveEngine>>,
    url: Url,
    generation: u64,
    config: PlaybackConfig,
    retries_used: u32,
    /// Play as soon as the attach resolves (set for the active slot).
    autoplay_pending: bool,
    disposed: bool,
}

impl std::fmt::Debug for MediaResourceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResourceController")
            .field("index", &self.index)
            .field("item_id", &self.item_id)
            .field("phase", &self.machine.phase())
            .field("generation", &self.generation)
            .finish()
    }
}

impl MediaResourceController {
    /// Bind a slot to a source, choosing native playback when the backend
    /// supports it and falling back to the adaptive engine otherwise.
    ///
    /// The returned controller is in `loading` with an attach effect
    /// pending, or already in `error` (`not_supported`) when neither path
    /// can play the source.
    pub fn attach(
        index: usize,
        item: &FeedItem,
        backend: &dyn MediaBackend,
        config: PlaybackConfig,
        policy: &PlayerPolicy,
        generation: u64,
        resume: Option<ResumeHint>,
    ) -> (Self, Vec<Effect>) {
        let element = backend.create_element();
        element.set_muted(policy.start_muted);
        element.set_volume(policy.default_volume);

        let (adaptive, url, supported) =
            select_source(&item.sources, backend);

        let mut snapshot = PlaybackSnapshot {
            volume: policy.default_volume,
            muted: policy.start_muted,
            playback_rate: 1.0,
            ..PlaybackSnapshot::default()
        };
        if let Some(hint) = resume {
            snapshot.current_time = hint.position.max(0.0);
        }

        let mut controller = Self {
            index,
            item_id: item.id,
            machine: PlayerStateMachine::new(),
            snapshot,
            element,
            adaptive,
            url,
            generation,
            config,
            retries_used: 0,
            autoplay_pending: false,
            disposed: false,
        };

        let effects = if supported {
            controller.begin_load()
        } else {
            tracing::warn!(
                index,
                item = %controller.item_id,
                "no playable source: native unsupported and no manifest"
            );
            controller.machine.transition_if_valid(PlaybackEvent::LoadRequested);
            controller.fail(PlaybackError::new(
                PlaybackErrorKind::NotSupported,
                "no playable source for this surface",
            ))
        };
        (controller, effects)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_id(&self) -> VideoId {
        self.item_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.machine.phase()
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    /// Mark this slot as the one eligible for playback once ready.
    pub fn set_autoplay_pending(&mut self, pending: bool) {
        self.autoplay_pending = pending;
    }

    fn begin_load(&mut self) -> Vec<Effect> {
        match self.machine.transition(PlaybackEvent::LoadRequested) {
            Ok(phase) => {
                self.snapshot.phase = phase;
                self.snapshot.last_error = None;
                vec![Effect::Attach {
                    index: self.index,
                    generation: self.generation,
                    loader: AttachLoader {
                        element: self.element.clone(),
                        adaptive: self.adaptive.clone(),
                        url: self.url.clone(),
                    },
                }]
            }
            Err(rejected) => {
                tracing::debug!(index = self.index, %rejected, "load ignored");
                Vec::new()
            }
        }
    }

    /// An attach started by [`Effect::Attach`] resolved.
    pub fn on_attach_resolved(
        &mut self,
        generation: u64,
        result: Result<MediaMetadata, PlaybackError>,
    ) -> Vec<Effect> {
        if generation != self.generation || self.disposed {
            tracing::debug!(
                index = self.index,
                generation,
                current = self.generation,
                "stale attach resolution dropped"
            );
            return Vec::new();
        }

        match result {
            Ok(metadata) => {
                if self
                    .machine
                    .transition(PlaybackEvent::MetadataLoaded)
                    .is_err()
                {
                    return Vec::new();
                }
                self.snapshot.phase = self.machine.phase();
                self.snapshot.duration = metadata.duration;
                if self.snapshot.current_time > 0.0 {
                    self.element.seek(self.snapshot.current_time);
                }
                if self.autoplay_pending {
                    self.play()
                } else {
                    Vec::new()
                }
            }
            Err(error) => self.handle_failure(error),
        }
    }

    fn handle_failure(&mut self, error: PlaybackError) -> Vec<Effect> {
        if error.kind == PlaybackErrorKind::Network
            && self.machine.phase() == PlaybackPhase::Loading
            && self.retries_used < self.config.max_network_retries
        {
            self.retries_used += 1;
            tracing::info!(
                index = self.index,
                attempt = self.retries_used,
                "network failure, retrying after backoff"
            );
            return vec![Effect::Schedule {
                id: TimerId::Retry {
                    index: self.index,
                    generation: self.generation,
                },
                delay: Duration::from_millis(self.config.retry_backoff_ms),
            }];
        }
        self.fail(error)
    }

    fn fail(&mut self, error: PlaybackError) -> Vec<Effect> {
        tracing::error!(
            index = self.index,
            item = %self.item_id,
            kind = ?error.kind,
            "playback failure surfaced: {}",
            error.message
        );
        self.machine.transition_if_valid(PlaybackEvent::Failed);
        self.snapshot.phase = self.machine.phase();
        self.snapshot.last_error = Some(error);
        vec![Effect::CancelTimer {
            id: TimerId::Stall {
                index: self.index,
                generation: self.generation,
            },
        }]
    }

    /// The retry backoff elapsed; relaunch the attach.
    pub fn on_retry_timer(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation
            || self.machine.phase() != PlaybackPhase::Loading
        {
            return Vec::new();
        }
        vec![Effect::Attach {
            index: self.index,
            generation: self.generation,
            loader: AttachLoader {
                element: self.element.clone(),
                adaptive: self.adaptive.clone(),
                url: self.url.clone(),
            },
        }]
    }

    /// The stall grace period elapsed while still buffering.
    pub fn on_stall_timer(&mut self, generation: u64) -> Vec<Effect> {
        if generation == self.generation
            && self.machine.phase() == PlaybackPhase::Buffering
            && self
                .machine
                .transition(PlaybackEvent::StallTimeout)
                .is_ok()
        {
            tracing::warn!(index = self.index, "buffering exceeded stall threshold");
            self.snapshot.phase = self.machine.phase();
        }
        Vec::new()
    }

    /// Translate one low-level element event into machine transitions.
    pub fn on_element_event(&mut self, event: MediaEvent) -> Vec<Effect> {
        match event {
            MediaEvent::Playing => {
                // A stalled instance recovers through buffering first.
                self.machine.transition_if_valid(PlaybackEvent::Recovered);
                self.machine.transition_if_valid(PlaybackEvent::Resumed);
                self.machine
                    .transition_if_valid(PlaybackEvent::PlayRequested);
                self.snapshot.phase = self.machine.phase();
                vec![Effect::CancelTimer {
                    id: TimerId::Stall {
                        index: self.index,
                        generation: self.generation,
                    },
                }]
            }
            MediaEvent::Waiting => {
                if self
                    .machine
                    .transition(PlaybackEvent::StarvationDetected)
                    .is_ok()
                {
                    self.snapshot.phase = self.machine.phase();
                    vec![Effect::Schedule {
                        id: TimerId::Stall {
                            index: self.index,
                            generation: self.generation,
                        },
                        delay: Duration::from_millis(
                            self.config.stall_threshold_ms,
                        ),
                    }]
                } else {
                    Vec::new()
                }
            }
            MediaEvent::TimeUpdate { position } => {
                self.snapshot.current_time = position.max(0.0);
                Vec::new()
            }
            MediaEvent::Progress { buffered } => {
                self.snapshot.buffered_ranges = buffered;
                Vec::new()
            }
            MediaEvent::Ended => {
                if self.machine.transition(PlaybackEvent::EndReached).is_ok() {
                    self.snapshot.phase = self.machine.phase();
                }
                Vec::new()
            }
            MediaEvent::Failed { error } => self.handle_failure(error),
        }
    }

    /// Request playback. No-op outside `ready`/`paused`.
    pub fn play(&mut self) -> Vec<Effect> {
        match self.machine.transition(PlaybackEvent::PlayRequested) {
            Ok(phase) => {
                self.snapshot.phase = phase;
                self.autoplay_pending = false;
                if let Err(error) = self.element.play() {
                    return self.handle_failure(error);
                }
                Vec::new()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Request pause. No-op outside `playing`.
    pub fn pause(&mut self) -> Vec<Effect> {
        self.autoplay_pending = false;
        if self
            .machine
            .transition(PlaybackEvent::PauseRequested)
            .is_ok()
        {
            self.snapshot.phase = self.machine.phase();
            self.element.pause();
        }
        Vec::new()
    }

    pub fn toggle_play_pause(&mut self) -> Vec<Effect> {
        match self.machine.phase() {
            PlaybackPhase::Playing => self.pause(),
            PlaybackPhase::Ready | PlaybackPhase::Paused => self.play(),
            _ => Vec::new(),
        }
    }

    /// Absolute seek, valid only while seekable; otherwise a no-op.
    pub fn seek(&mut self, position: f64) -> Vec<Effect> {
        if !self.machine.phase().can_seek() {
            return Vec::new();
        }
        let clamped = match self.snapshot.duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        };
        self.snapshot.current_time = clamped;
        self.element.seek(clamped);
        Vec::new()
    }

    pub fn seek_forward(&mut self, delta: Option<f64>) -> Vec<Effect> {
        let step = delta.unwrap_or(self.config.seek_step_secs);
        self.seek(self.snapshot.current_time + step)
    }

    pub fn seek_backward(&mut self, delta: Option<f64>) -> Vec<Effect> {
        let step = delta.unwrap_or(self.config.seek_step_secs);
        self.seek(self.snapshot.current_time - step)
    }

    pub fn toggle_mute(&mut self) -> Vec<Effect> {
        self.snapshot.muted = !self.snapshot.muted;
        self.element.set_muted(self.snapshot.muted);
        Vec::new()
    }

    pub fn set_muted(&mut self, muted: bool) -> Vec<Effect> {
        if self.snapshot.muted != muted {
            self.snapshot.muted = muted;
            self.element.set_muted(muted);
        }
        Vec::new()
    }

    /// Seek to the start and play again. From `ended` this re-arms the
    /// machine through a fresh load of the already-attached source.
    pub fn restart(&mut self) -> Vec<Effect> {
        match self.machine.phase() {
            PlaybackPhase::Playing | PlaybackPhase::Paused => {
                let mut effects = self.seek(0.0);
                effects.extend(self.play());
                effects
            }
            PlaybackPhase::Ended => {
                self.snapshot.current_time = 0.0;
                self.autoplay_pending = true;
                self.retries_used = 0;
                self.begin_load()
            }
            _ => Vec::new(),
        }
    }

    /// User-driven retry after a surfaced error.
    pub fn retry(&mut self) -> Vec<Effect> {
        if self.machine.phase() != PlaybackPhase::Error {
            return Vec::new();
        }
        self.retries_used = 0;
        self.begin_load()
    }

    /// Pin a quality level or return to automatic selection. No-op for
    /// native playback, where the source has a single rendition.
    pub fn set_quality(&mut self, selection: QualitySelection) -> Vec<Effect> {
        let Some(adaptive) = &self.adaptive else {
            tracing::debug!(index = self.index, "set_quality on native source");
            return Vec::new();
        };
        adaptive.set_level(selection);
        self.snapshot.quality = selection;
        Vec::new()
    }

    /// Tear the binding down on every exit path: abort any in-flight
    /// attach, disarm timers, release decode resources, and hand back the
    /// resume hint for the caller to persist.
    pub fn dispose(&mut self) -> (Vec<Effect>, ResumeHint) {
        self.disposed = true;
        let effects = vec![
            Effect::CancelAttach {
                generation: self.generation,
            },
            Effect::CancelTimer {
                id: TimerId::Stall {
                    index: self.index,
                    generation: self.generation,
                },
            },
            Effect::CancelTimer {
                id: TimerId::Retry {
                    index: self.index,
                    generation: self.generation,
                },
            },
        ];

        self.machine.transition_if_valid(PlaybackEvent::PauseRequested);
        self.machine.transition_if_valid(PlaybackEvent::Released);
        self.snapshot.phase = self.machine.phase();

        if let Some(adaptive) = &self.adaptive {
            adaptive.detach();
        }
        self.element.release();

        (effects, ResumeHint::at_position(self.snapshot.current_time))
    }
}

fn select_source(
    sources: &MediaSources,
    backend: &dyn MediaBackend,
) -> (Option<Arc<dyn AdaptiveEngine>>, Url, bool) {
    if backend.supports_native(sources) {
        return (None, sources.url.clone(), true);
    }
    if let Some(manifest) = &sources.hls_url
        && let Some(adaptive) = backend.create_adaptive()
    {
        return (Some(adaptive), manifest.clone(), true);
    }
    (None, sources.url.clone(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelex_contracts::prelude::{
        MockAdaptiveEngine, MockMediaBackend, MockMediaElement,
    };
    use reelex_model::item::Author;
    use reelex_model::prelude::AuthorId;

    fn item() -> FeedItem {
        let mut item = FeedItem::new(
            VideoId::new(),
            MediaSources::with_hls(
                Url::parse("https://cdn.example.com/v/1.mp4").unwrap(),
                Url::parse("https://cdn.example.com/v/1.m3u8").unwrap(),
            ),
            Author {
                id: AuthorId::new(),
                handle: "clipsmith".into(),
                display_name: "Clip Smith".into(),
                avatar_url: None,
                verified: true,
            },
        );
        item.description = "test clip".into();
        item
    }

    fn permissive_element() -> MockMediaElement {
        let mut element = MockMediaElement::new();
        element.expect_set_muted().return_const(());
        element.expect_set_volume().return_const(());
        element.expect_seek().return_const(());
        element.expect_pause().return_const(());
        element.expect_play().returning(|| Ok(()));
        element.expect_release().return_const(());
        element
    }

    fn native_backend() -> MockMediaBackend {
        let mut backend = MockMediaBackend::new();
        backend.expect_supports_native().return_const(true);
        backend
            .expect_create_element()
            .returning(|| Arc::new(permissive_element()));
        backend
    }

    fn attach_controller(
        backend: &dyn MediaBackend,
    ) -> (MediaResourceController, Vec<Effect>) {
        MediaResourceController::attach(
            0,
            &item(),
            backend,
            PlaybackConfig::default(),
            &PlayerPolicy::default(),
            7,
            None,
        )
    }

    fn resolve_ok(controller: &mut MediaResourceController) {
        let effects = controller.on_attach_resolved(
            controller.generation(),
            Ok(MediaMetadata {
                duration: Some(30.0),
                width: None,
                height: None,
            }),
        );
        assert!(effects.is_empty());
        assert_eq!(controller.phase(), PlaybackPhase::Ready);
    }

    #[test]
    fn native_support_skips_the_adaptive_engine() {
        let backend = native_backend();
        let (controller, effects) = attach_controller(&backend);
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Attach { generation: 7, .. }]
        ));
        assert!(controller.adaptive.is_none());
    }

    #[test]
    fn manifest_source_uses_the_adaptive_engine() {
        let mut backend = MockMediaBackend::new();
        backend.expect_supports_native().return_const(false);
        backend
            .expect_create_element()
            .returning(|| Arc::new(permissive_element()));
        backend.expect_create_adaptive().returning(|| {
            let mut adaptive = MockAdaptiveEngine::new();
            adaptive.expect_detach().return_const(());
            Some(Arc::new(adaptive) as Arc<dyn AdaptiveEngine>)
        });

        let (controller, effects) = attach_controller(&backend);
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
        assert_eq!(effects.len(), 1);
        assert!(controller.adaptive.is_some());
        assert_eq!(controller.url.as_str(), "https://cdn.example.com/v/1.m3u8");
    }

    #[test]
    fn unplayable_source_surfaces_not_supported() {
        let mut backend = MockMediaBackend::new();
        backend.expect_supports_native().return_const(false);
        backend
            .expect_create_element()
            .returning(|| Arc::new(permissive_element()));
        backend.expect_create_adaptive().returning(|| None);

        let (controller, effects) = attach_controller(&backend);
        assert_eq!(controller.phase(), PlaybackPhase::Error);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Attach { .. })));
        let error = controller.snapshot().last_error.as_ref().unwrap();
        assert_eq!(error.kind, PlaybackErrorKind::NotSupported);
        assert!(!error.recoverable);
    }

    #[test]
    fn stale_attach_resolution_is_dropped() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        let effects = controller.on_attach_resolved(
            3, // older binding
            Ok(MediaMetadata::default()),
        );
        assert!(effects.is_empty());
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn network_failure_retries_once_then_surfaces() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);

        let network = PlaybackError::new(PlaybackErrorKind::Network, "timeout");
        let effects =
            controller.on_attach_resolved(7, Err(network.clone()));
        assert!(matches!(
            effects.as_slice(),
            [Effect::Schedule {
                id: TimerId::Retry { index: 0, generation: 7 },
                ..
            }]
        ));
        assert_eq!(controller.phase(), PlaybackPhase::Loading);

        let effects = controller.on_retry_timer(7);
        assert!(matches!(effects.as_slice(), [Effect::Attach { .. }]));

        // Second consecutive network failure surfaces with the
        // recoverable flag set.
        let effects = controller.on_attach_resolved(7, Err(network));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Schedule { .. })));
        assert_eq!(controller.phase(), PlaybackPhase::Error);
        let error = controller.snapshot().last_error.as_ref().unwrap();
        assert_eq!(error.kind, PlaybackErrorKind::Network);
        assert!(error.recoverable);
    }

    #[test]
    fn decode_failure_surfaces_immediately() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        let effects = controller.on_attach_resolved(
            7,
            Err(PlaybackError::new(PlaybackErrorKind::Decode, "bad stream")),
        );
        assert!(!effects.iter().any(|e| matches!(e, Effect::Schedule { .. })));
        assert_eq!(controller.phase(), PlaybackPhase::Error);
    }

    #[test]
    fn autoplay_pending_starts_playback_on_ready() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        controller.set_autoplay_pending(true);
        controller.on_attach_resolved(
            7,
            Ok(MediaMetadata {
                duration: Some(12.0),
                width: None,
                height: None,
            }),
        );
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn starvation_buffers_then_stalls_then_recovers() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        resolve_ok(&mut controller);
        controller.play();

        let effects = controller.on_element_event(MediaEvent::Waiting);
        assert_eq!(controller.phase(), PlaybackPhase::Buffering);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Schedule {
                id: TimerId::Stall { index: 0, generation: 7 },
                ..
            }]
        ));

        controller.on_stall_timer(7);
        assert_eq!(controller.phase(), PlaybackPhase::Stalled);

        controller.on_element_event(MediaEvent::Playing);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn stall_timer_is_ignored_once_playing_again() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        resolve_ok(&mut controller);
        controller.play();
        controller.on_element_event(MediaEvent::Waiting);
        controller.on_element_event(MediaEvent::Playing);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);

        // A racing stall fire for the old buffering episode is dropped.
        controller.on_stall_timer(7);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn seek_is_a_no_op_while_loading() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        controller.seek(10.0);
        assert_eq!(controller.snapshot().current_time, 0.0);

        resolve_ok(&mut controller);
        controller.seek(10.0);
        assert_eq!(controller.snapshot().current_time, 10.0);
    }

    #[test]
    fn relative_seeks_clamp_to_the_timeline() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        resolve_ok(&mut controller);

        controller.seek_forward(None);
        assert_eq!(controller.snapshot().current_time, 10.0);
        controller.seek_forward(Some(100.0));
        assert_eq!(controller.snapshot().current_time, 30.0);
        controller.seek_backward(Some(100.0));
        assert_eq!(controller.snapshot().current_time, 0.0);
    }

    #[test]
    fn ended_restart_reloads_and_autoplays() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        resolve_ok(&mut controller);
        controller.play();
        controller.on_element_event(MediaEvent::Ended);
        assert_eq!(controller.phase(), PlaybackPhase::Ended);

        let effects = controller.restart();
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
        assert!(matches!(effects.as_slice(), [Effect::Attach { .. }]));

        controller.on_attach_resolved(7, Ok(MediaMetadata::default()));
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn dispose_cancels_everything_and_reports_resume() {
        let backend = native_backend();
        let (mut controller, _) = attach_controller(&backend);
        resolve_ok(&mut controller);
        controller.play();
        controller.on_element_event(MediaEvent::TimeUpdate { position: 21.5 });

        let (effects, hint) = controller.dispose();
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::CancelAttach { generation: 7 }
        )));
        assert_eq!(hint.position, 21.5);
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
    }
}
