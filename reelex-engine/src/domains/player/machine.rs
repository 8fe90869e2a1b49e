//! Per-video playback state machine.
//!
//! The machine owns no I/O: it validates transitions and nothing else.
//! Illegal transitions are rejected with [`InvalidTransition`] and leave
//! the current phase untouched, so callers can sequence side effects
//! strictly after a successful transition.

use reelex_model::playback::PlaybackPhase;

/// Events that drive phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    /// A (re)load was requested. Valid from `idle` and from the terminal
    /// phases, where it begins a retry.
    LoadRequested,
    /// Source metadata became available.
    MetadataLoaded,
    PlayRequested,
    PauseRequested,
    /// The decoder ran out of buffered data mid-playback.
    StarvationDetected,
    /// Buffered data arrived and playback resumed.
    Resumed,
    /// Starvation outlived the stall grace period.
    StallTimeout,
    /// A stalled instance began buffering again.
    Recovered,
    EndReached,
    Failed,
    /// The slot was released back to the pool.
    Released,
}

/// Rejected transition: the machine stays in `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no transition from {from} on {event:?}")]
pub struct InvalidTransition {
    pub from: PlaybackPhase,
    pub event: PlaybackEvent,
}

/// Validated playback phase tracker for one video instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStateMachine {
    phase: PlaybackPhase,
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Apply an event. On success the new phase is stored and returned;
    /// on rejection the phase is unchanged.
    pub fn transition(
        &mut self,
        event: PlaybackEvent,
    ) -> Result<PlaybackPhase, InvalidTransition> {
        use PlaybackEvent as E;
        use PlaybackPhase as P;

        let next = match (self.phase, event) {
            (P::Idle, E::LoadRequested) => P::Loading,
            (P::Loading, E::MetadataLoaded) => P::Ready,
            (P::Loading, E::Failed) => P::Error,
            (P::Ready, E::PlayRequested) => P::Playing,
            (P::Ready, E::Failed) => P::Error,
            (P::Playing, E::PauseRequested) => P::Paused,
            (P::Playing, E::StarvationDetected) => P::Buffering,
            (P::Playing, E::EndReached) => P::Ended,
            (P::Playing, E::Failed) => P::Error,
            (P::Buffering, E::Resumed) => P::Playing,
            (P::Buffering, E::StallTimeout) => P::Stalled,
            (P::Buffering, E::Failed) => P::Error,
            (P::Stalled, E::Recovered) => P::Buffering,
            (P::Stalled, E::Failed) => P::Error,
            (P::Paused, E::PlayRequested) => P::Playing,
            (P::Paused, E::Released) => P::Idle,
            // Terminal phases admit exactly one exit: a fresh load.
            (P::Error, E::LoadRequested) => P::Loading,
            (P::Ended, E::LoadRequested) => P::Loading,
            (from, event) => {
                return Err(InvalidTransition { from, event });
            }
        };

        tracing::trace!(from = %self.phase, to = %next, ?event, "transition");
        self.phase = next;
        Ok(next)
    }

    /// Apply an event, ignoring rejection. For paths where the event is a
    /// hint rather than a command (e.g. duplicate element events).
    pub fn transition_if_valid(
        &mut self,
        event: PlaybackEvent,
    ) -> Option<PlaybackPhase> {
        self.transition(event).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlaybackEvent as E;
    use PlaybackPhase as P;

    fn machine_in(phase: P) -> PlayerStateMachine {
        let mut machine = PlayerStateMachine::new();
        let path: &[E] = match phase {
            P::Idle => &[],
            P::Loading => &[E::LoadRequested],
            P::Ready => &[E::LoadRequested, E::MetadataLoaded],
            P::Playing => {
                &[E::LoadRequested, E::MetadataLoaded, E::PlayRequested]
            }
            P::Paused => &[
                E::LoadRequested,
                E::MetadataLoaded,
                E::PlayRequested,
                E::PauseRequested,
            ],
            P::Buffering => &[
                E::LoadRequested,
                E::MetadataLoaded,
                E::PlayRequested,
                E::StarvationDetected,
            ],
            P::Stalled => &[
                E::LoadRequested,
                E::MetadataLoaded,
                E::PlayRequested,
                E::StarvationDetected,
                E::StallTimeout,
            ],
            P::Error => &[E::LoadRequested, E::Failed],
            P::Ended => &[
                E::LoadRequested,
                E::MetadataLoaded,
                E::PlayRequested,
                E::EndReached,
            ],
        };
        for event in path {
            machine.transition(*event).unwrap();
        }
        assert_eq!(machine.phase(), phase);
        machine
    }

    #[test]
    fn full_happy_path() {
        let mut machine = PlayerStateMachine::new();
        assert_eq!(machine.transition(E::LoadRequested), Ok(P::Loading));
        assert_eq!(machine.transition(E::MetadataLoaded), Ok(P::Ready));
        assert_eq!(machine.transition(E::PlayRequested), Ok(P::Playing));
        assert_eq!(machine.transition(E::PauseRequested), Ok(P::Paused));
        assert_eq!(machine.transition(E::PlayRequested), Ok(P::Playing));
        assert_eq!(machine.transition(E::EndReached), Ok(P::Ended));
    }

    #[test]
    fn starvation_stall_and_recovery() {
        let mut machine = machine_in(P::Playing);
        assert_eq!(machine.transition(E::StarvationDetected), Ok(P::Buffering));
        assert_eq!(machine.transition(E::StallTimeout), Ok(P::Stalled));
        assert_eq!(machine.transition(E::Recovered), Ok(P::Buffering));
        assert_eq!(machine.transition(E::Resumed), Ok(P::Playing));
    }

    #[test]
    fn rejection_does_not_mutate() {
        let mut machine = machine_in(P::Loading);
        let err = machine.transition(E::PlayRequested).unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                from: P::Loading,
                event: E::PlayRequested
            }
        );
        assert_eq!(machine.phase(), P::Loading);
    }

    #[test]
    fn terminal_phases_admit_only_reload() {
        for phase in [P::Error, P::Ended] {
            let mut machine = machine_in(phase);
            for event in [
                E::PlayRequested,
                E::PauseRequested,
                E::Resumed,
                E::EndReached,
                E::Failed,
                E::Released,
            ] {
                assert!(machine.transition(event).is_err(), "{phase} {event:?}");
                assert_eq!(machine.phase(), phase);
            }
            assert_eq!(machine.transition(E::LoadRequested), Ok(P::Loading));
        }
    }

    #[test]
    fn release_only_from_paused() {
        let mut machine = machine_in(P::Paused);
        assert_eq!(machine.transition(E::Released), Ok(P::Idle));

        let mut machine = machine_in(P::Playing);
        assert!(machine.transition(E::Released).is_err());
    }

    #[test]
    fn no_undefined_states_over_random_walks() {
        // Any accepted event must land in one of the nine phases, and any
        // rejected event must leave the phase alone.
        let events = [
            E::LoadRequested,
            E::MetadataLoaded,
            E::PlayRequested,
            E::PauseRequested,
            E::StarvationDetected,
            E::Resumed,
            E::StallTimeout,
            E::Recovered,
            E::EndReached,
            E::Failed,
            E::Released,
        ];
        let mut machine = PlayerStateMachine::new();
        // Deterministic walk: cycle the event list a few hundred times.
        for i in 0..400 {
            let event = events[i % events.len()];
            let before = machine.phase();
            match machine.transition(event) {
                Ok(next) => assert_eq!(machine.phase(), next),
                Err(rejected) => {
                    assert_eq!(machine.phase(), before);
                    assert_eq!(rejected.from, before);
                }
            }
        }
    }
}
