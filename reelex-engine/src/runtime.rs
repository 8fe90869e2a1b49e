//! Async driver for the engine.
//!
//! The engine never awaits; this runtime owns it on one cooperative task
//! and executes its effects: attach loads, pagination fetches, and
//! timers. Cancellable work (attaches, timers) is keyed so a stale
//! completion can be aborted the moment the engine moves on.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use reelex_contracts::content::ContentSource;
use reelex_contracts::media::MediaEvent;
use std::sync::Arc;

use crate::common::messages::{
    Effect, EngineEvent, EngineMessage, EngineOutput, PlayerCommand, TimerId,
};
use crate::domains::feed::messages::FeedMessage;
use crate::domains::gesture::messages::PointerEvent;
use crate::domains::gesture::recognizer::SeekBarRegion;
use crate::domains::media::messages::MediaMessage;
use crate::engine::FeedEngine;

/// Cloneable input side of a running feed.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    messages: mpsc::UnboundedSender<EngineMessage>,
    shutdown: CancellationToken,
}

impl RuntimeHandle {
    pub fn send(&self, message: EngineMessage) {
        if self.messages.send(message).is_err() {
            tracing::warn!("runtime stopped; message dropped");
        }
    }

    pub fn pointer(&self, event: PointerEvent) {
        self.send(EngineMessage::Pointer(event));
    }

    pub fn scroll(&self, offset: f32) {
        self.send(EngineMessage::Feed(FeedMessage::ScrollOffset { offset }));
    }

    pub fn viewport(&self, width: f32, height: f32, item_height: f32) {
        self.send(EngineMessage::Feed(FeedMessage::ViewportChanged {
            width,
            height,
            item_height,
        }));
    }

    pub fn seek_bar(&self, region: Option<SeekBarRegion>) {
        self.send(EngineMessage::Feed(FeedMessage::SeekBarChanged { region }));
    }

    pub fn command(&self, command: PlayerCommand) {
        self.send(EngineMessage::Command(command));
    }

    pub fn media_event(&self, index: usize, event: MediaEvent) {
        self.send(EngineMessage::Media(MediaMessage::Element {
            index,
            event,
        }));
    }

    /// Stop the runtime loop; in-flight work is cancelled.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Owns a [`FeedEngine`] and drives it against the async collaborators.
pub struct FeedRuntime {
    engine: FeedEngine,
    source: Arc<dyn ContentSource>,
    messages_rx: mpsc::UnboundedReceiver<EngineMessage>,
    messages_tx: mpsc::UnboundedSender<EngineMessage>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    timers: HashMap<TimerId, CancellationToken>,
    attaches: HashMap<u64, CancellationToken>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for FeedRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedRuntime")
            .field("engine", &self.engine)
            .field("timers", &self.timers.len())
            .field("attaches", &self.attaches.len())
            .finish()
    }
}

impl FeedRuntime {
    /// Wire a runtime around an engine. Returns the runtime (to be
    /// `run().await`ed), the input handle, and the event stream.
    pub fn new(
        engine: FeedEngine,
        source: Arc<dyn ContentSource>,
    ) -> (
        Self,
        RuntimeHandle,
        mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let handle = RuntimeHandle {
            messages: messages_tx.clone(),
            shutdown: shutdown.clone(),
        };
        (
            Self {
                engine,
                source,
                messages_rx,
                messages_tx,
                events_tx,
                timers: HashMap::new(),
                attaches: HashMap::new(),
                shutdown,
            },
            handle,
            events_rx,
        )
    }

    /// Drive the engine until shutdown. All engine mutation happens on
    /// this one task; spawned work only ever reports back as messages.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                message = self.messages_rx.recv() => {
                    let Some(message) = message else { break };
                    self.step(message);
                }
            }
        }
        self.cancel_all();
    }

    fn step(&mut self, message: EngineMessage) {
        // A resolved attach is done either way; drop its abort handle.
        if let EngineMessage::Media(MediaMessage::AttachResolved {
            generation,
            ..
        }) = &message
        {
            self.attaches.remove(generation);
        }
        if let EngineMessage::Timer(id) = &message {
            self.timers.remove(id);
        }

        let output = self.engine.handle(message);
        self.execute(output);
    }

    fn execute(&mut self, output: EngineOutput) {
        for event in output.events {
            if self.events_tx.send(event).is_err() {
                tracing::debug!("event receiver dropped");
            }
        }
        for effect in output.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Attach {
                index,
                generation,
                loader,
            } => {
                let token = CancellationToken::new();
                self.attaches.insert(generation, token.clone());
                let messages = self.messages_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            tracing::debug!(index, generation, "attach aborted");
                        }
                        result = loader.run() => {
                            let _ = messages.send(EngineMessage::Media(
                                MediaMessage::AttachResolved {
                                    index,
                                    generation,
                                    result,
                                },
                            ));
                        }
                    }
                });
            }
            Effect::CancelAttach { generation } => {
                if let Some(token) = self.attaches.remove(&generation) {
                    token.cancel();
                }
            }
            Effect::RequestLoadMore { loaded } => {
                let source = self.source.clone();
                let messages = self.messages_tx.clone();
                tokio::spawn(async move {
                    let message = match source.load_more(loaded).await {
                        Ok(page) => FeedMessage::PageLoaded(page),
                        Err(error) => FeedMessage::PageFailed(error),
                    };
                    let _ = messages.send(EngineMessage::Feed(message));
                });
            }
            Effect::Schedule { id, delay } => {
                // Re-arming replaces the previous instance of the timer.
                if let Some(previous) = self.timers.remove(&id) {
                    previous.cancel();
                }
                let token = CancellationToken::new();
                self.timers.insert(id, token.clone());
                let messages = self.messages_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(delay) => {
                            let _ = messages.send(EngineMessage::Timer(id));
                        }
                    }
                });
            }
            Effect::CancelTimer { id } => {
                if let Some(token) = self.timers.remove(&id) {
                    token.cancel();
                }
            }
        }
    }

    fn cancel_all(&mut self) {
        for (_, token) in self.timers.drain() {
            token.cancel();
        }
        for (_, token) in self.attaches.drain() {
            token.cancel();
        }
    }
}
