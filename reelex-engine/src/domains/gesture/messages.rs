//! Pointer input and the closed gesture vocabulary.

/// Surface-local pointer position in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Raw pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The host lost the pointer (palm rejection, window blur). The
    /// session is discarded without emitting anything.
    Cancel,
}

/// One raw pointer event as delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn down(pointer_id: u64, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerEventKind::Down,
            position,
        }
    }

    pub fn moved(pointer_id: u64, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerEventKind::Move,
            position,
        }
    }

    pub fn up(pointer_id: u64, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerEventKind::Up,
            position,
        }
    }
}

/// Horizontal thirds of the tap surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapZone {
    Left,
    Center,
    Right,
}

/// Dominant axis and sign of a committed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// One recognized user action. At most one is emitted per pointer
/// session, except the seek-drag family which spans a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    SingleTap {
        zone: TapZone,
    },
    DoubleTap {
        zone: TapZone,
        position: Point,
    },
    LongPress,
    Swipe {
        direction: SwipeDirection,
        /// Net travel along the dominant axis, px.
        distance: f32,
        /// Recency-weighted speed at commit time, px/ms.
        velocity: f32,
    },
    SeekDragStart {
        progress: f64,
    },
    SeekDragProgress {
        progress: f64,
    },
    SeekDragEnd {
        progress: f64,
    },
}
