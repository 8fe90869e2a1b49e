//! Feed orchestration: gestures and host commands become index
//! transitions, playback commands, or UI callbacks — never more than one
//! category per event.

use std::collections::HashMap;

use reelex_model::item::FeedItem;
use reelex_model::prelude::VideoId;

use crate::common::messages::{DomainUpdate, EngineEvent, PlayerCommand};
use crate::domains::gesture::messages::{
    GestureEvent, SwipeDirection, TapZone,
};
use crate::engine::FeedEngine;

/// Per-video user interaction the engine tracks across releases.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interaction {
    pub liked: bool,
    pub saved: bool,
}

/// Orchestrator bookkeeping carried by the engine.
#[derive(Debug, Default)]
pub struct OrchestratorState {
    pub(crate) ledger: HashMap<VideoId, Interaction>,
    /// Index of the last committed video change; `None` before the first
    /// commit.
    pub(crate) last_committed: Option<usize>,
    /// A load-more request is in flight; no further requests until it
    /// resolves.
    pub(crate) load_more_inflight: bool,
    /// Item count at the last load-more request. Guards the debounce: one
    /// request per threshold crossing, not one per commit.
    pub(crate) load_more_requested_at: Option<usize>,
    pub(crate) seek_drag_active: bool,
}

impl OrchestratorState {
    pub fn interaction(&self, id: &VideoId) -> Interaction {
        self.ledger.get(id).copied().unwrap_or_default()
    }
}

/// Route one recognized gesture.
pub fn handle_gesture(
    engine: &mut FeedEngine,
    event: GestureEvent,
) -> DomainUpdate {
    match event {
        GestureEvent::Swipe { direction, .. } => match direction {
            SwipeDirection::Up => navigate(engine, 1),
            SwipeDirection::Down => navigate(engine, -1),
            SwipeDirection::Left | SwipeDirection::Right => {
                tracing::trace!(?direction, "horizontal swipe ignored");
                DomainUpdate::none()
            }
        },
        GestureEvent::SingleTap { zone } => match zone {
            TapZone::Center => engine.with_active_slot(|slot| slot.toggle_play_pause()),
            TapZone::Left | TapZone::Right => {
                tracing::trace!(?zone, "edge tap ignored");
                DomainUpdate::none()
            }
        },
        GestureEvent::DoubleTap { position, .. } => {
            like_active(engine, Some(position))
        }
        GestureEvent::LongPress => match engine.active_item().cloned() {
            Some(item) => DomainUpdate::event(
                EngineEvent::ContextSheetRequested { item },
            ),
            None => DomainUpdate::none(),
        },
        GestureEvent::SeekDragStart { progress } => {
            engine.orchestrator.seek_drag_active = true;
            seek_preview(engine, progress)
        }
        GestureEvent::SeekDragProgress { progress } => {
            seek_preview(engine, progress)
        }
        GestureEvent::SeekDragEnd { progress } => {
            engine.orchestrator.seek_drag_active = false;
            let mut update = engine.with_active_slot(|slot| {
                let target = slot
                    .snapshot()
                    .duration
                    .map(|duration| duration * progress)
                    .unwrap_or(0.0);
                slot.seek(target)
            });
            update.events.push(EngineEvent::SeekPreview {
                index: engine.scroll.active_index(),
                progress,
            });
            update
        }
    }
}

/// Route one imperative host command.
pub fn handle_command(
    engine: &mut FeedEngine,
    command: PlayerCommand,
) -> DomainUpdate {
    match command {
        PlayerCommand::Play => engine.with_active_slot(|slot| slot.play()),
        PlayerCommand::Pause => engine.with_active_slot(|slot| slot.pause()),
        PlayerCommand::TogglePlayPause => {
            engine.with_active_slot(|slot| slot.toggle_play_pause())
        }
        PlayerCommand::Seek(position) => {
            engine.with_active_slot(|slot| slot.seek(position))
        }
        PlayerCommand::SeekForward(delta) => {
            engine.with_active_slot(|slot| slot.seek_forward(delta))
        }
        PlayerCommand::SeekBackward(delta) => {
            engine.with_active_slot(|slot| slot.seek_backward(delta))
        }
        PlayerCommand::ToggleMute => toggle_mute(engine),
        PlayerCommand::Restart => {
            engine.with_active_slot(|slot| slot.restart())
        }
        PlayerCommand::SetQuality(selection) => {
            engine.with_active_slot(|slot| slot.set_quality(selection))
        }
        PlayerCommand::Retry => engine.with_active_slot(|slot| slot.retry()),
        // Skipping a failed item advances exactly as a swipe would.
        PlayerCommand::Skip => navigate(engine, 1),
        PlayerCommand::ScrollToIndex(index) => jump(engine, index),
        PlayerCommand::Like => like_active(engine, None),
        PlayerCommand::ToggleSave => toggle_save(engine),
        PlayerCommand::Comment => active_item_event(engine, |item| {
            EngineEvent::CommentRequested { item }
        }),
        PlayerCommand::Share => active_item_event(engine, |item| {
            EngineEvent::ShareRequested { item }
        }),
        PlayerCommand::AuthorClick => active_item_event(engine, |item| {
            EngineEvent::AuthorClicked { item }
        }),
    }
}

/// Discrete navigation by `delta` items. Out-of-range swipes are absorbed
/// with a bounce event and no state change.
pub fn navigate(engine: &mut FeedEngine, delta: i64) -> DomainUpdate {
    let count = engine.scroll.item_count();
    if count == 0 {
        return DomainUpdate::none();
    }
    let current = engine.scroll.active_index() as i64;
    let target = current + delta;
    if target < 0 {
        return DomainUpdate::event(EngineEvent::EdgeBounce {
            direction: SwipeDirection::Down,
        });
    }
    if target >= count as i64 {
        return DomainUpdate::event(EngineEvent::EdgeBounce {
            direction: SwipeDirection::Up,
        });
    }
    jump(engine, target as usize)
}

/// Programmatic snap to an absolute index, followed by a commit.
pub fn jump(engine: &mut FeedEngine, index: usize) -> DomainUpdate {
    let count = engine.scroll.item_count();
    if count == 0 {
        return DomainUpdate::none();
    }
    let clamped = index.min(count - 1);
    let offset = engine.scroll.scroll_to_index(clamped);
    let mut update = DomainUpdate::event(EngineEvent::ScrollToIndex {
        index: clamped,
        offset,
    });
    update.merge(commit_active_index(engine));
    update
}

/// Commit the current rest index: recompute activation, notify the host
/// exactly once per changed index, and consider pagination.
pub fn commit_active_index(engine: &mut FeedEngine) -> DomainUpdate {
    let index = engine.scroll.active_index();
    let mut update = engine.apply_activation();

    if engine.orchestrator.last_committed != Some(index)
        && let Some(item) = engine.items.get(index).cloned()
    {
        engine.orchestrator.last_committed = Some(index);
        tracing::debug!(index, item = %item.id, "video change committed");
        update.events.push(EngineEvent::VideoChanged { item, index });
    }

    update.merge(maybe_request_more(engine));
    update
}

/// Request the next page when the committed index approaches the end of
/// the loaded window. Debounced: one request per threshold crossing.
fn maybe_request_more(engine: &mut FeedEngine) -> DomainUpdate {
    let loaded = engine.items.len();
    if !engine.has_more
        || engine.orchestrator.load_more_inflight
        || loaded == 0
        || engine.orchestrator.load_more_requested_at == Some(loaded)
    {
        return DomainUpdate::none();
    }
    let index = engine.scroll.active_index();
    let remaining = loaded - 1 - index.min(loaded - 1);
    if remaining > engine.config.activation.load_more_threshold {
        return DomainUpdate::none();
    }

    engine.orchestrator.load_more_inflight = true;
    engine.orchestrator.load_more_requested_at = Some(loaded);
    tracing::debug!(loaded, remaining, "requesting next feed page");
    DomainUpdate::effect(crate::common::messages::Effect::RequestLoadMore {
        loaded,
    })
}

fn like_active(
    engine: &mut FeedEngine,
    position: Option<crate::domains::gesture::messages::Point>,
) -> DomainUpdate {
    let Some(item) = engine.active_item().cloned() else {
        return DomainUpdate::none();
    };
    let entry = engine
        .orchestrator
        .ledger
        .entry(item.id)
        .or_default();
    entry.liked = true;
    DomainUpdate::event(EngineEvent::Liked { item, position })
}

fn toggle_save(engine: &mut FeedEngine) -> DomainUpdate {
    let Some(item) = engine.active_item().cloned() else {
        return DomainUpdate::none();
    };
    let entry = engine
        .orchestrator
        .ledger
        .entry(item.id)
        .or_default();
    entry.saved = !entry.saved;
    DomainUpdate::event(EngineEvent::SaveChanged {
        is_saved: entry.saved,
        item,
    })
}

fn toggle_mute(engine: &mut FeedEngine) -> DomainUpdate {
    engine.muted = !engine.muted;
    let muted = engine.muted;
    let indices: Vec<usize> = engine.slots.keys().copied().collect();
    let mut update = DomainUpdate::none();
    for index in indices {
        update.merge(engine.with_slot(index, |slot| slot.set_muted(muted)));
    }
    update
}

fn seek_preview(engine: &mut FeedEngine, progress: f64) -> DomainUpdate {
    DomainUpdate::event(EngineEvent::SeekPreview {
        index: engine.scroll.active_index(),
        progress,
    })
}

fn active_item_event(
    engine: &mut FeedEngine,
    event: impl FnOnce(FeedItem) -> EngineEvent,
) -> DomainUpdate {
    match engine.active_item().cloned() {
        Some(item) => DomainUpdate::event(event(item)),
        None => DomainUpdate::none(),
    }
}
