//! The feed engine: composition root and message router.
//!
//! All state mutation funnels through [`FeedEngine::handle`], which drains
//! an internal FIFO of follow-up messages before returning. Input arriving
//! while a commit is being processed is therefore ordered strictly after
//! it — index-change notifications are never re-entrant.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use reelex_config::{ConfigGuardRailError, EngineConfig};
use reelex_contracts::media::MediaBackend;
use reelex_contracts::resume::ResumeStore;
use reelex_model::error::ModelError;
use reelex_model::item::FeedItem;
use reelex_model::playback::{PlaybackPhase, PlaybackSnapshot};
use reelex_model::prelude::VideoId;

use crate::common::messages::{
    DomainUpdate, Effect, EngineEvent, EngineMessage, EngineOutput, TimerId,
};
use crate::domains::feed::messages::FeedMessage;
use crate::domains::feed::scroll::{ScrollController, ScrollState};
use crate::domains::feed::{activation, target_set};
use crate::domains::gesture::recognizer::{
    GestureRecognizer, RecognizerUpdate,
};
use crate::domains::media::controller::MediaResourceController;
use crate::domains::media::messages::MediaMessage;
use crate::infra::time::TimeProvider;
use crate::orchestrator::{self, Interaction, OrchestratorState};

use std::time::Duration;

/// Errors surfaced at engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigGuardRailError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Headless engine for one vertical feed.
pub struct FeedEngine {
    pub(crate) config: EngineConfig,
    pub(crate) backend: Arc<dyn MediaBackend>,
    pub(crate) resume_store: Option<Arc<dyn ResumeStore>>,
    pub(crate) items: Vec<FeedItem>,
    pub(crate) has_more: bool,
    pub(crate) recognizer: GestureRecognizer,
    pub(crate) scroll: ScrollController,
    /// Live media bindings, keyed by feed index. Membership is decided
    /// exclusively by activation plans in [`Self::apply_activation`].
    pub(crate) slots: BTreeMap<usize, MediaResourceController>,
    pub(crate) orchestrator: OrchestratorState,
    pub(crate) muted: bool,
    generation_counter: u64,
}

impl std::fmt::Debug for FeedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedEngine")
            .field("items", &self.items.len())
            .field("live", &self.live_indices())
            .field("active", &self.scroll.active_index())
            .finish()
    }
}

impl FeedEngine {
    /// Build an engine over an initial set of items.
    ///
    /// The configuration runs its guard rails (warnings are logged) and
    /// every item is validated; the first video change commits once the
    /// host reports its layout via [`FeedMessage::ViewportChanged`].
    pub fn new(
        config: EngineConfig,
        backend: Arc<dyn MediaBackend>,
        resume_store: Option<Arc<dyn ResumeStore>>,
        items: Vec<FeedItem>,
        has_more: bool,
        time: Arc<dyn TimeProvider>,
    ) -> Result<Self, EngineError> {
        config.validate()?.log();
        for item in &items {
            item.validate()?;
        }

        let recognizer =
            GestureRecognizer::new(config.gesture.clone(), time.clone());
        let mut scroll = ScrollController::new(&config.scroll, time);
        scroll.set_item_count(items.len());

        Ok(Self {
            muted: config.policy.start_muted,
            config,
            backend,
            resume_store,
            items,
            has_more,
            recognizer,
            scroll,
            slots: BTreeMap::new(),
            orchestrator: OrchestratorState::default(),
            generation_counter: 0,
        })
    }

    /// Process one message and everything it cascades into.
    pub fn handle(&mut self, message: EngineMessage) -> EngineOutput {
        let mut output = EngineOutput::default();
        let mut queue = VecDeque::new();
        queue.push_back(message);

        while let Some(message) = queue.pop_front() {
            let update = self.dispatch(message);
            queue.extend(update.messages);
            output.effects.extend(update.effects);
            output.events.extend(update.events);
        }
        output
    }

    fn dispatch(&mut self, message: EngineMessage) -> DomainUpdate {
        match message {
            EngineMessage::Pointer(event) => {
                let recognized = self.recognizer.handle_pointer(event);
                self.consume_recognizer(recognized)
            }
            EngineMessage::Command(command) => {
                orchestrator::handle_command(self, command)
            }
            EngineMessage::Feed(message) => self.dispatch_feed(message),
            EngineMessage::Media(message) => self.dispatch_media(message),
            EngineMessage::Timer(id) => self.dispatch_timer(id),
        }
    }

    fn dispatch_feed(&mut self, message: FeedMessage) -> DomainUpdate {
        match message {
            FeedMessage::ScrollOffset { offset } => {
                let before = self.scroll.active_index();
                let after = self.scroll.handle_scroll(offset);
                let mut update = DomainUpdate::effect(Effect::Schedule {
                    id: TimerId::ScrollQuiet,
                    delay: Duration::from_millis(
                        self.config.scroll.quiet_period_ms,
                    ),
                });
                // Preload follows the index through the gesture; the
                // video-change notification waits for the commit.
                if after != before {
                    update.merge(self.apply_activation());
                }
                update
            }
            FeedMessage::ViewportChanged {
                width,
                height,
                item_height,
            } => {
                self.recognizer.set_surface_width(width);
                self.scroll.set_layout(height, item_height);
                orchestrator::commit_active_index(self)
            }
            FeedMessage::SeekBarChanged { region } => {
                self.recognizer.set_seek_bar(region);
                DomainUpdate::none()
            }
            FeedMessage::PageLoaded(page) => {
                self.orchestrator.load_more_inflight = false;
                let mut accepted = 0usize;
                for item in page.items {
                    match item.validate() {
                        Ok(()) => {
                            self.items.push(item);
                            accepted += 1;
                        }
                        Err(error) => {
                            tracing::warn!(%error, "dropping invalid feed item");
                        }
                    }
                }
                self.has_more = page.has_more;
                self.scroll.set_item_count(self.items.len());
                tracing::debug!(
                    accepted,
                    total = self.items.len(),
                    has_more = self.has_more,
                    "feed page appended"
                );
                self.apply_activation()
            }
            FeedMessage::PageFailed(error) => {
                tracing::warn!(%error, "load-more failed; feed unchanged");
                self.orchestrator.load_more_inflight = false;
                self.orchestrator.load_more_requested_at = None;
                DomainUpdate::none()
            }
        }
    }

    fn dispatch_media(&mut self, message: MediaMessage) -> DomainUpdate {
        match message {
            MediaMessage::AttachResolved {
                index,
                generation,
                result,
            } => self.with_slot(index, |slot| {
                slot.on_attach_resolved(generation, result)
            }),
            MediaMessage::Element { index, event } => {
                self.with_slot(index, |slot| slot.on_element_event(event))
            }
        }
    }

    fn dispatch_timer(&mut self, id: TimerId) -> DomainUpdate {
        match id {
            TimerId::PendingTap | TimerId::LongPress { .. } => {
                let recognized = self.recognizer.handle_timer(id);
                self.consume_recognizer(recognized)
            }
            TimerId::ScrollQuiet => {
                let (index, offset) = self.scroll.settle();
                let mut update = DomainUpdate::event(
                    EngineEvent::ScrollToIndex { index, offset },
                );
                update.merge(orchestrator::commit_active_index(self));
                update
            }
            TimerId::Stall { index, generation } => {
                self.with_slot(index, |slot| slot.on_stall_timer(generation))
            }
            TimerId::Retry { index, generation } => {
                self.with_slot(index, |slot| slot.on_retry_timer(generation))
            }
        }
    }

    fn consume_recognizer(&mut self, recognized: RecognizerUpdate) -> DomainUpdate {
        let mut update = DomainUpdate::none();
        for (id, delay) in recognized.schedule {
            update.effects.push(Effect::Schedule { id, delay });
        }
        for id in recognized.cancel {
            update.effects.push(Effect::CancelTimer { id });
        }
        for gesture in recognized.events {
            tracing::debug!(?gesture, "gesture recognized");
            update.merge(orchestrator::handle_gesture(self, gesture));
        }
        update
    }

    /// Recompute the activation window and apply the resulting plan.
    ///
    /// Safe to call repeatedly: an unchanged target set performs zero
    /// attach/detach work. This is the only place controllers are created
    /// or destroyed.
    pub(crate) fn apply_activation(&mut self) -> DomainUpdate {
        let active = self.scroll.active_index();
        let mounted = self.scroll.mounted_range();
        let target =
            target_set(active, &mounted, &self.config.activation);
        let live = self.slots.keys().copied().collect();
        let plan = activation::plan(&live, &target);

        let mut update = DomainUpdate::none();
        if !plan.is_empty() {
            tracing::debug!(active, ?plan, "activation plan");
        }

        for index in plan.release {
            if let Some(mut slot) = self.slots.remove(&index) {
                let (effects, mut hint) = slot.dispose();
                let interaction =
                    self.orchestrator.interaction(&slot.item_id());
                hint.is_liked = interaction.liked;
                hint.is_saved = interaction.saved;
                if let Some(store) = &self.resume_store {
                    store.store(&slot.item_id(), hint);
                }
                update.effects.extend(effects);
            }
        }

        for index in plan.attach {
            let Some(item) = self.items.get(index) else {
                continue;
            };
            self.generation_counter += 1;
            let generation = self.generation_counter;
            let resume = self
                .resume_store
                .as_ref()
                .and_then(|store| store.load(&item.id));
            let mut policy = self.config.policy.clone();
            policy.start_muted = self.muted;
            let (controller, effects) = MediaResourceController::attach(
                index,
                item,
                self.backend.as_ref(),
                self.config.playback.clone(),
                &policy,
                generation,
                resume,
            );
            update.effects.extend(effects);
            update.events.push(EngineEvent::PlaybackChanged {
                index,
                snapshot: controller.snapshot().clone(),
            });
            self.slots.insert(index, controller);
        }

        // Playback policy pass: exactly the active slot may play.
        let autoplay = self.config.policy.autoplay;
        let indices: Vec<usize> = self.slots.keys().copied().collect();
        for index in indices {
            let Some(slot) = self.slots.get_mut(&index) else {
                continue;
            };
            let before = slot.phase();
            let mut effects = Vec::new();
            if index == active {
                if autoplay {
                    match before {
                        PlaybackPhase::Ready | PlaybackPhase::Paused => {
                            effects = slot.play();
                        }
                        PlaybackPhase::Loading => {
                            slot.set_autoplay_pending(true);
                        }
                        _ => {}
                    }
                }
            } else {
                slot.set_autoplay_pending(false);
                if before == PlaybackPhase::Playing {
                    effects = slot.pause();
                }
            }
            let after = slot.phase();
            let snapshot = slot.snapshot().clone();
            update.effects.extend(effects);
            if after != before {
                update
                    .events
                    .push(EngineEvent::PlaybackChanged { index, snapshot });
            }
        }

        debug_assert!(
            self.slots.len() <= self.config.activation.max_live_resources,
            "live resources exceed budget"
        );
        update
    }

    /// Run a closure against one live slot, surfacing its new snapshot.
    pub(crate) fn with_slot(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut MediaResourceController) -> Vec<Effect>,
    ) -> DomainUpdate {
        let Some(slot) = self.slots.get_mut(&index) else {
            tracing::debug!(index, "message for a released slot dropped");
            return DomainUpdate::none();
        };
        let effects = f(slot);
        let snapshot = slot.snapshot().clone();
        let mut update = DomainUpdate::event(EngineEvent::PlaybackChanged {
            index,
            snapshot,
        });
        update.effects.extend(effects);
        update
    }

    pub(crate) fn with_active_slot(
        &mut self,
        f: impl FnOnce(&mut MediaResourceController) -> Vec<Effect>,
    ) -> DomainUpdate {
        self.with_slot(self.scroll.active_index(), f)
    }

    pub(crate) fn active_item(&self) -> Option<&FeedItem> {
        self.items.get(self.scroll.active_index())
    }

    // --- Read surface for hosts and tests ---

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn live_indices(&self) -> Vec<usize> {
        self.slots.keys().copied().collect()
    }

    pub fn slot_snapshot(&self, index: usize) -> Option<PlaybackSnapshot> {
        self.slots.get(&index).map(|slot| slot.snapshot().clone())
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether a seek drag currently owns the pointer; overlays keep the
    /// scrub UI up while this holds.
    pub fn is_seek_dragging(&self) -> bool {
        self.orchestrator.seek_drag_active
    }

    pub fn interaction(&self, id: &VideoId) -> Interaction {
        self.orchestrator.interaction(id)
    }
}
