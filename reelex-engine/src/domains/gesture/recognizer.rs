//! Pointer-session gesture classification.
//!
//! The recognizer is a pure function of the pointer stream plus a clock:
//! it knows nothing about video or the feed. Each pointer session emits at
//! most one semantic gesture (taps, long press, swipe), except seek drags,
//! which own their session exclusively and stream progress until release.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reelex_config::GestureConfig;

use crate::common::messages::TimerId;
use crate::infra::time::TimeProvider;

use super::messages::{
    GestureEvent, Point, PointerEvent, PointerEventKind, SwipeDirection,
    TapZone,
};

/// Time constant for the exponential recency weighting of pointer
/// velocity samples.
const VELOCITY_TAU_MS: f32 = 100.0;

/// Visual seek bar placement on the gesture surface, px from the top.
/// The grab slop around it comes from
/// [`GestureConfig::seek_bar_tolerance_multiplier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekBarRegion {
    pub y: f32,
    pub height: f32,
}

impl SeekBarRegion {
    fn hit(&self, position: Point, tolerance_multiplier: f32) -> bool {
        let center = self.y + self.height / 2.0;
        let slop = (self.height * tolerance_multiplier) / 2.0;
        (position.y - center).abs() <= slop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionKind {
    /// Still collecting evidence; could become anything.
    Undecided,
    /// Captured by the seek bar; swipe/tap recognition is off for this
    /// pointer.
    SeekDrag,
    /// A swipe already fired; the rest of the session is ignored.
    SwipeCommitted,
    /// A long press already fired; release must not produce a tap.
    Consumed,
}

#[derive(Debug)]
struct PointerSession {
    origin: Point,
    last: Point,
    last_sample: Instant,
    /// Recency-weighted velocity, px/ms per axis.
    velocity: (f32, f32),
    kind: SessionKind,
}

impl PointerSession {
    fn travel(&self) -> f32 {
        self.origin.distance_to(self.last)
    }

    fn net(&self) -> (f32, f32) {
        (self.last.x - self.origin.x, self.last.y - self.origin.y)
    }
}

#[derive(Debug)]
struct PendingTap {
    zone: TapZone,
    position: Point,
    at: Instant,
}

/// What one recognizer step produced: gestures plus timer bookkeeping the
/// engine turns into effects.
#[derive(Debug, Default)]
pub struct RecognizerUpdate {
    pub events: Vec<GestureEvent>,
    pub schedule: Vec<(TimerId, Duration)>,
    pub cancel: Vec<TimerId>,
}

impl RecognizerUpdate {
    fn event(mut self, event: GestureEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Stateful recognizer over raw pointer events.
pub struct GestureRecognizer {
    config: GestureConfig,
    time: Arc<dyn TimeProvider>,
    surface_width: f32,
    seek_bar: Option<SeekBarRegion>,
    sessions: HashMap<u64, PointerSession>,
    pending_tap: Option<PendingTap>,
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("surface_width", &self.surface_width)
            .field("seek_bar", &self.seek_bar)
            .field("sessions", &self.sessions.len())
            .field("pending_tap", &self.pending_tap.is_some())
            .finish()
    }
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig, time: Arc<dyn TimeProvider>) -> Self {
        Self {
            config,
            time,
            surface_width: 0.0,
            seek_bar: None,
            sessions: HashMap::new(),
            pending_tap: None,
        }
    }

    /// Update the tap surface width used for zone partitioning and seek
    /// progress mapping.
    pub fn set_surface_width(&mut self, width: f32) {
        self.surface_width = width.max(0.0);
    }

    /// Place (or remove) the seek bar hit region.
    pub fn set_seek_bar(&mut self, region: Option<SeekBarRegion>) {
        self.seek_bar = region;
    }

    fn zone_for(&self, position: Point) -> TapZone {
        if self.surface_width <= 0.0 {
            return TapZone::Center;
        }
        let third = self.surface_width / 3.0;
        if position.x < third {
            TapZone::Left
        } else if position.x < third * 2.0 {
            TapZone::Center
        } else {
            TapZone::Right
        }
    }

    fn seek_progress(&self, position: Point) -> f64 {
        if self.surface_width <= 0.0 {
            return 0.0;
        }
        f64::from((position.x / self.surface_width).clamp(0.0, 1.0))
    }

    /// Feed one raw pointer event through the classifier.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> RecognizerUpdate {
        match event.kind {
            PointerEventKind::Down => self.on_down(event),
            PointerEventKind::Move => self.on_move(event),
            PointerEventKind::Up => self.on_up(event),
            PointerEventKind::Cancel => self.on_cancel(event),
        }
    }

    /// A previously scheduled gesture timer fired.
    pub fn handle_timer(&mut self, id: TimerId) -> RecognizerUpdate {
        match id {
            TimerId::PendingTap => {
                let Some(pending) = self.pending_tap.take() else {
                    return RecognizerUpdate::default();
                };
                RecognizerUpdate::default()
                    .event(GestureEvent::SingleTap { zone: pending.zone })
            }
            TimerId::LongPress { pointer_id } => {
                let Some(session) = self.sessions.get_mut(&pointer_id) else {
                    return RecognizerUpdate::default();
                };
                if session.kind != SessionKind::Undecided
                    || session.travel() > self.config.movement_threshold_px
                {
                    return RecognizerUpdate::default();
                }
                session.kind = SessionKind::Consumed;
                RecognizerUpdate::default().event(GestureEvent::LongPress)
            }
            _ => RecognizerUpdate::default(),
        }
    }

    fn on_down(&mut self, event: PointerEvent) -> RecognizerUpdate {
        let now = self.time.now();
        let mut update = RecognizerUpdate::default();

        let captured_by_seek_bar = self
            .seek_bar
            .is_some_and(|bar| {
                bar.hit(event.position, self.config.seek_bar_tolerance_multiplier)
            });

        let kind = if captured_by_seek_bar {
            update
                .events
                .push(GestureEvent::SeekDragStart {
                    progress: self.seek_progress(event.position),
                });
            SessionKind::SeekDrag
        } else {
            update.schedule.push((
                TimerId::LongPress {
                    pointer_id: event.pointer_id,
                },
                Duration::from_millis(self.config.long_press_delay_ms),
            ));
            SessionKind::Undecided
        };

        self.sessions.insert(
            event.pointer_id,
            PointerSession {
                origin: event.position,
                last: event.position,
                last_sample: now,
                velocity: (0.0, 0.0),
                kind,
            },
        );
        update
    }

    fn on_move(&mut self, event: PointerEvent) -> RecognizerUpdate {
        let now = self.time.now();
        let Some(session) = self.sessions.get_mut(&event.pointer_id) else {
            return RecognizerUpdate::default();
        };

        // Recency-weighted velocity update from the instantaneous sample.
        let dt_ms = now
            .saturating_duration_since(session.last_sample)
            .as_secs_f32()
            * 1_000.0;
        if dt_ms > 0.0 {
            let inst = (
                (event.position.x - session.last.x) / dt_ms,
                (event.position.y - session.last.y) / dt_ms,
            );
            let alpha = 1.0 - (-dt_ms / VELOCITY_TAU_MS).exp();
            session.velocity.0 += (inst.0 - session.velocity.0) * alpha;
            session.velocity.1 += (inst.1 - session.velocity.1) * alpha;
        }
        session.last = event.position;
        session.last_sample = now;

        let mut update = RecognizerUpdate::default();
        match session.kind {
            SessionKind::SeekDrag => {
                update.events.push(GestureEvent::SeekDragProgress {
                    progress: self.seek_progress(event.position),
                });
            }
            SessionKind::Undecided => {
                if session.travel() > self.config.movement_threshold_px {
                    update.cancel.push(TimerId::LongPress {
                        pointer_id: event.pointer_id,
                    });
                    let (dx, dy) = session.net();
                    let distance = dx.abs().max(dy.abs());
                    if distance >= self.config.swipe_distance_px {
                        session.kind = SessionKind::SwipeCommitted;
                        update.events.push(swipe_event(
                            (dx, dy),
                            session.velocity,
                        ));
                    }
                }
            }
            SessionKind::SwipeCommitted | SessionKind::Consumed => {}
        }
        update
    }

    fn on_up(&mut self, event: PointerEvent) -> RecognizerUpdate {
        let now = self.time.now();
        let Some(session) = self.sessions.remove(&event.pointer_id) else {
            return RecognizerUpdate::default();
        };

        let mut update = RecognizerUpdate::default();
        match session.kind {
            SessionKind::SeekDrag => {
                update.events.push(GestureEvent::SeekDragEnd {
                    progress: self.seek_progress(event.position),
                });
                return update;
            }
            SessionKind::SwipeCommitted | SessionKind::Consumed => {
                return update;
            }
            SessionKind::Undecided => {}
        }

        update.cancel.push(TimerId::LongPress {
            pointer_id: event.pointer_id,
        });

        if session.travel() <= self.config.movement_threshold_px {
            return self.resolve_tap(update, event.position, now);
        }

        // Moved too far for a tap but short of the distance threshold:
        // a fast release can still commit a swipe.
        let (vx, vy) = session.velocity;
        let speed = vx.abs().max(vy.abs());
        if speed >= self.config.swipe_velocity_px_per_ms {
            update
                .events
                .push(swipe_event(session.net(), session.velocity));
        }
        update
    }

    fn on_cancel(&mut self, event: PointerEvent) -> RecognizerUpdate {
        let mut update = RecognizerUpdate::default();
        if self.sessions.remove(&event.pointer_id).is_some() {
            update.cancel.push(TimerId::LongPress {
                pointer_id: event.pointer_id,
            });
        }
        update
    }

    fn resolve_tap(
        &mut self,
        mut update: RecognizerUpdate,
        position: Point,
        now: Instant,
    ) -> RecognizerUpdate {
        let zone = self.zone_for(position);
        let window = Duration::from_millis(self.config.double_tap_window_ms);

        if let Some(pending) = self.pending_tap.take() {
            let paired = now.saturating_duration_since(pending.at) <= window
                && pending.position.distance_to(position)
                    <= self.config.double_tap_radius_px;
            if paired {
                update.cancel.push(TimerId::PendingTap);
                update.events.push(GestureEvent::DoubleTap { zone, position });
                return update;
            }
            // Unrelated second tap: flush the old one immediately rather
            // than juggling two pending-tap timers.
            update.events.push(GestureEvent::SingleTap {
                zone: pending.zone,
            });
        }

        self.pending_tap = Some(PendingTap { zone, position, at: now });
        update.schedule.push((TimerId::PendingTap, window));
        update
    }
}

fn swipe_event(net: (f32, f32), velocity: (f32, f32)) -> GestureEvent {
    let (dx, dy) = net;
    let horizontal = dx.abs() >= dy.abs();
    let direction = if horizontal {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else if dy > 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    };
    let distance = if horizontal { dx.abs() } else { dy.abs() };
    let speed = if horizontal {
        velocity.0.abs()
    } else {
        velocity.1.abs()
    };
    GestureEvent::Swipe {
        direction,
        distance,
        velocity: speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::time::VirtualTimeProvider;

    fn recognizer() -> (GestureRecognizer, Arc<VirtualTimeProvider>) {
        let time = Arc::new(VirtualTimeProvider::new());
        let mut recognizer =
            GestureRecognizer::new(GestureConfig::default(), time.clone());
        recognizer.set_surface_width(300.0);
        (recognizer, time)
    }

    fn tap(
        recognizer: &mut GestureRecognizer,
        time: &VirtualTimeProvider,
        at: Point,
    ) -> Vec<GestureEvent> {
        let mut events = recognizer
            .handle_pointer(PointerEvent::down(1, at))
            .events;
        time.advance(Duration::from_millis(40));
        events.extend(recognizer.handle_pointer(PointerEvent::up(1, at)).events);
        events
    }

    #[test]
    fn single_tap_is_withheld_until_window_lapses() {
        let (mut recognizer, time) = recognizer();
        let events = tap(&mut recognizer, &time, Point::new(150.0, 200.0));
        assert!(events.is_empty(), "tap resolved early: {events:?}");

        time.advance(Duration::from_millis(301));
        let update = recognizer.handle_timer(TimerId::PendingTap);
        assert_eq!(
            update.events,
            vec![GestureEvent::SingleTap {
                zone: TapZone::Center
            }]
        );
    }

    #[test]
    fn double_tap_suppresses_both_single_taps() {
        let (mut recognizer, time) = recognizer();
        let position = Point::new(150.0, 200.0);

        let first = tap(&mut recognizer, &time, position);
        assert!(first.is_empty());

        time.advance(Duration::from_millis(120));
        let second = tap(&mut recognizer, &time, position);
        assert_eq!(
            second,
            vec![GestureEvent::DoubleTap {
                zone: TapZone::Center,
                position
            }]
        );

        // The pending-tap timer was cancelled; a late fire is a no-op.
        let update = recognizer.handle_timer(TimerId::PendingTap);
        assert!(update.events.is_empty());
    }

    #[test]
    fn distant_second_tap_flushes_the_first() {
        let (mut recognizer, time) = recognizer();
        let first = tap(&mut recognizer, &time, Point::new(20.0, 200.0));
        assert!(first.is_empty());

        time.advance(Duration::from_millis(100));
        let second = tap(&mut recognizer, &time, Point::new(280.0, 200.0));
        assert_eq!(
            second,
            vec![GestureEvent::SingleTap { zone: TapZone::Left }]
        );
    }

    #[test]
    fn tap_zones_partition_the_surface() {
        let (mut recognizer, _) = recognizer();
        assert_eq!(recognizer.zone_for(Point::new(10.0, 0.0)), TapZone::Left);
        assert_eq!(
            recognizer.zone_for(Point::new(150.0, 0.0)),
            TapZone::Center
        );
        assert_eq!(
            recognizer.zone_for(Point::new(290.0, 0.0)),
            TapZone::Right
        );
    }

    #[test]
    fn long_press_fires_once_and_eats_the_release() {
        let (mut recognizer, time) = recognizer();
        let at = Point::new(150.0, 200.0);
        let update = recognizer.handle_pointer(PointerEvent::down(1, at));
        assert_eq!(
            update.schedule.first().map(|(id, _)| *id),
            Some(TimerId::LongPress { pointer_id: 1 })
        );

        time.advance(Duration::from_millis(400));
        let update = recognizer.handle_timer(TimerId::LongPress { pointer_id: 1 });
        assert_eq!(update.events, vec![GestureEvent::LongPress]);

        let update = recognizer.handle_pointer(PointerEvent::up(1, at));
        assert!(update.events.is_empty());
    }

    #[test]
    fn movement_cancels_long_press() {
        let (mut recognizer, time) = recognizer();
        recognizer.handle_pointer(PointerEvent::down(1, Point::new(150.0, 200.0)));
        time.advance(Duration::from_millis(50));
        let update = recognizer
            .handle_pointer(PointerEvent::moved(1, Point::new(150.0, 230.0)));
        assert!(
            update
                .cancel
                .contains(&TimerId::LongPress { pointer_id: 1 })
        );

        // Even if the runtime races and the timer still fires, nothing is
        // emitted.
        let update = recognizer.handle_timer(TimerId::LongPress { pointer_id: 1 });
        assert!(update.events.is_empty());
    }

    #[test]
    fn swipe_commits_on_distance_mid_gesture() {
        let (mut recognizer, time) = recognizer();
        recognizer.handle_pointer(PointerEvent::down(1, Point::new(150.0, 400.0)));
        time.advance(Duration::from_millis(30));
        let update = recognizer
            .handle_pointer(PointerEvent::moved(1, Point::new(150.0, 340.0)));
        match update.events.as_slice() {
            [GestureEvent::Swipe {
                direction: SwipeDirection::Up,
                distance,
                ..
            }] => assert!(*distance >= 50.0),
            other => panic!("expected committed swipe, got {other:?}"),
        }

        // Nothing further from the same session.
        time.advance(Duration::from_millis(30));
        let update = recognizer
            .handle_pointer(PointerEvent::moved(1, Point::new(150.0, 200.0)));
        assert!(update.events.is_empty());
        let update =
            recognizer.handle_pointer(PointerEvent::up(1, Point::new(150.0, 180.0)));
        assert!(update.events.is_empty());
    }

    #[test]
    fn fast_flick_commits_on_velocity() {
        let (mut recognizer, time) = recognizer();
        recognizer.handle_pointer(PointerEvent::down(1, Point::new(150.0, 400.0)));
        // 42 px over 24 ms: beyond the movement threshold, short of the
        // distance threshold, well over 0.3 px/ms once weighted.
        for y in [386.0, 372.0, 358.0] {
            time.advance(Duration::from_millis(8));
            recognizer.handle_pointer(PointerEvent::moved(1, Point::new(150.0, y)));
        }
        let update =
            recognizer.handle_pointer(PointerEvent::up(1, Point::new(150.0, 358.0)));
        match update.events.as_slice() {
            [GestureEvent::Swipe {
                direction: SwipeDirection::Up,
                velocity,
                ..
            }] => assert!(*velocity >= 0.3, "velocity {velocity}"),
            other => panic!("expected velocity swipe, got {other:?}"),
        }
    }

    #[test]
    fn slow_drift_emits_nothing() {
        let (mut recognizer, time) = recognizer();
        recognizer.handle_pointer(PointerEvent::down(1, Point::new(150.0, 400.0)));
        time.advance(Duration::from_millis(500));
        recognizer.handle_pointer(PointerEvent::moved(1, Point::new(150.0, 380.0)));
        time.advance(Duration::from_millis(500));
        let update =
            recognizer.handle_pointer(PointerEvent::up(1, Point::new(150.0, 375.0)));
        assert!(update.events.is_empty(), "{:?}", update.events);
    }

    #[test]
    fn seek_drag_owns_its_session_exclusively() {
        let (mut recognizer, time) = recognizer();
        recognizer.set_seek_bar(Some(SeekBarRegion {
            y: 500.0,
            height: 4.0,
        }));

        let update = recognizer
            .handle_pointer(PointerEvent::down(1, Point::new(30.0, 501.0)));
        match update.events.as_slice() {
            [GestureEvent::SeekDragStart { progress }] => {
                assert!((progress - 0.1).abs() < 1e-6)
            }
            other => panic!("expected drag start, got {other:?}"),
        }

        // A violent horizontal drag that would otherwise be a swipe.
        time.advance(Duration::from_millis(16));
        let update = recognizer
            .handle_pointer(PointerEvent::moved(1, Point::new(150.0, 501.0)));
        assert_eq!(
            update.events,
            vec![GestureEvent::SeekDragProgress { progress: 0.5 }]
        );

        time.advance(Duration::from_millis(16));
        let update =
            recognizer.handle_pointer(PointerEvent::up(1, Point::new(300.0, 501.0)));
        assert_eq!(
            update.events,
            vec![GestureEvent::SeekDragEnd { progress: 1.0 }]
        );
    }

    #[test]
    fn press_outside_tolerance_is_not_captured() {
        let (mut recognizer, _) = recognizer();
        recognizer.set_seek_bar(Some(SeekBarRegion {
            y: 500.0,
            height: 4.0,
        }));
        // 7x tolerance on a 4 px bar reaches 14 px from center.
        let update = recognizer
            .handle_pointer(PointerEvent::down(1, Point::new(30.0, 530.0)));
        assert!(update.events.is_empty());
    }

    #[test]
    fn cancel_discards_the_session() {
        let (mut recognizer, time) = recognizer();
        recognizer.handle_pointer(PointerEvent::down(1, Point::new(150.0, 200.0)));
        time.advance(Duration::from_millis(40));
        recognizer.handle_pointer(PointerEvent {
            pointer_id: 1,
            kind: PointerEventKind::Cancel,
            position: Point::new(150.0, 200.0),
        });
        time.advance(Duration::from_millis(400));
        let update = recognizer.handle_timer(TimerId::PendingTap);
        assert!(update.events.is_empty());
    }
}
