//! Cross-domain message, effect, and event plumbing.
//!
//! Every mutation of engine state happens by dispatching an
//! [`EngineMessage`]; every consequence leaves the engine as either an
//! [`EngineEvent`] (rendered by the host) or an [`Effect`] (executed by the
//! async runtime against the contract collaborators). Domain update
//! functions accumulate all three in a [`DomainUpdate`].

use std::time::Duration;

use reelex_contracts::content::{ContentError, FeedPage};
use reelex_model::item::FeedItem;
use reelex_model::playback::{PlaybackSnapshot, QualitySelection};

use crate::domains::feed::messages::FeedMessage;
use crate::domains::gesture::messages::{Point, PointerEvent, SwipeDirection};
use crate::domains::media::controller::AttachLoader;
use crate::domains::media::messages::MediaMessage;

/// Imperative calls the hosting UI layer may issue directly, bypassing
/// gesture recognition (overlay buttons, accessibility actions, tests).
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    TogglePlayPause,
    /// Absolute seek in seconds on the active item.
    Seek(f64),
    /// Relative seek; `None` uses the configured step.
    SeekForward(Option<f64>),
    SeekBackward(Option<f64>),
    ToggleMute,
    Restart,
    SetQuality(QualitySelection),
    /// Retry the active item after a surfaced error.
    Retry,
    /// Skip past a failed item; advances exactly as a swipe would.
    Skip,
    /// Programmatic navigation to an absolute index.
    ScrollToIndex(usize),
    Like,
    ToggleSave,
    Comment,
    Share,
    AuthorClick,
}

/// Identity of a scheduled engine timer.
///
/// Stall and retry timers carry the attach generation they were armed
/// for; a fire whose generation no longer matches the slot is stale and
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Double-tap window lapsed; a withheld single tap resolves.
    PendingTap,
    LongPress { pointer_id: u64 },
    /// Scroll quiet period lapsed; the rest index commits.
    ScrollQuiet,
    Stall { index: usize, generation: u64 },
    Retry { index: usize, generation: u64 },
}

/// The main engine message router.
#[derive(Debug)]
pub enum EngineMessage {
    /// Raw pointer input from the gesture surface.
    Pointer(PointerEvent),
    /// Imperative host command.
    Command(PlayerCommand),
    /// Feed domain: scroll offsets, layout, pagination results.
    Feed(FeedMessage),
    /// Media domain: attach resolutions and element events.
    Media(MediaMessage),
    /// A scheduled timer fired.
    Timer(TimerId),
}

/// Side effects the runtime executes on the engine's behalf.
///
/// The engine itself never awaits; everything asynchronous is expressed
/// here so state mutation stays on one cooperative loop.
#[derive(Debug)]
pub enum Effect {
    /// Start (or restart) loading media into a slot. Resolves back as
    /// [`MediaMessage::AttachResolved`] carrying the same generation.
    Attach {
        index: usize,
        generation: u64,
        loader: AttachLoader,
    },
    /// Abort an in-flight attach; its eventual completion is discarded.
    CancelAttach { generation: u64 },
    /// Ask the content source for the next page.
    RequestLoadMore { loaded: usize },
    /// Arm (or re-arm) a timer; fires back as [`EngineMessage::Timer`].
    Schedule { id: TimerId, delay: Duration },
    CancelTimer { id: TimerId },
}

/// Outbound callbacks consumed by the hosting UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Fired exactly once per committed index change, never during
    /// transient gesture motion.
    VideoChanged { item: FeedItem, index: usize },
    /// Overlay-driving snapshot of one slot's playback.
    PlaybackChanged {
        index: usize,
        snapshot: PlaybackSnapshot,
    },
    /// A like was applied (double tap or command). `position` is the raw
    /// tap position for heart-animation placement when gesture-driven.
    Liked {
        item: FeedItem,
        position: Option<Point>,
    },
    SaveChanged { item: FeedItem, is_saved: bool },
    CommentRequested { item: FeedItem },
    ShareRequested { item: FeedItem },
    AuthorClicked { item: FeedItem },
    ContextSheetRequested { item: FeedItem },
    /// Swipe past either end of the feed; render resistance/bounce, no
    /// state changed.
    EdgeBounce { direction: SwipeDirection },
    /// Scrub preview while a seek drag is in progress.
    SeekPreview { index: usize, progress: f64 },
    /// Snap the scroll surface to a stable rest offset.
    ScrollToIndex { index: usize, offset: f32 },
}

/// Result of one domain update pass.
#[derive(Debug, Default)]
pub struct DomainUpdate {
    /// Follow-up messages to be processed before new input.
    pub messages: Vec<EngineMessage>,
    /// Effects for the runtime.
    pub effects: Vec<Effect>,
    /// Events to surface to the host.
    pub events: Vec<EngineEvent>,
}

impl DomainUpdate {
    /// Create an empty update (no messages, effects, or events)
    pub fn none() -> Self {
        Self::default()
    }

    /// Create an update with a single follow-up message
    pub fn message(message: impl Into<EngineMessage>) -> Self {
        Self {
            messages: vec![message.into()],
            ..Self::default()
        }
    }

    /// Create an update with a single event
    pub fn event(event: EngineEvent) -> Self {
        Self {
            events: vec![event],
            ..Self::default()
        }
    }

    /// Create an update with a single effect
    pub fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }

    pub fn add_message(mut self, message: impl Into<EngineMessage>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn add_event(mut self, event: EngineEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn add_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Fold another update into this one, preserving order.
    pub fn merge(&mut self, other: DomainUpdate) {
        self.messages.extend(other.messages);
        self.effects.extend(other.effects);
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.effects.is_empty()
            && self.events.is_empty()
    }
}

/// What one call to [`FeedEngine::handle`](crate::engine::FeedEngine::handle)
/// hands back to the driver: internal follow-ups already drained, only
/// host-visible output remains.
#[derive(Debug, Default)]
pub struct EngineOutput {
    pub events: Vec<EngineEvent>,
    pub effects: Vec<Effect>,
}

impl EngineOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }
}

impl From<FeedMessage> for EngineMessage {
    fn from(message: FeedMessage) -> Self {
        EngineMessage::Feed(message)
    }
}

impl From<MediaMessage> for EngineMessage {
    fn from(message: MediaMessage) -> Self {
        EngineMessage::Media(message)
    }
}

impl From<PlayerCommand> for EngineMessage {
    fn from(command: PlayerCommand) -> Self {
        EngineMessage::Command(command)
    }
}

impl From<PointerEvent> for EngineMessage {
    fn from(event: PointerEvent) -> Self {
        EngineMessage::Pointer(event)
    }
}

/// Re-exported for hosts that construct pagination results in tests.
pub type PageResult = Result<FeedPage, ContentError>;
