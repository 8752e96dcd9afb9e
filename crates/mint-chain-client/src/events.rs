//! Single-consumer hand-off for contract notifications.
//!
//! Subscriptions hold a [`MintedEventSink`] and push into it from whatever
//! context the notification arrives in; the session owns the matching
//! [`MintedEventQueue`] and applies events on its own schedule.

use futures::FutureExt;
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use mint_types::MintedEvent;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MintedEventSink {
    tx: UnboundedSender<MintedEvent>,
}

impl MintedEventSink {
    /// Returns `false` once the consumer is gone; the event is dropped.
    pub fn push(&self, event: MintedEvent) -> bool {
        match self.tx.unbounded_send(event) {
            Ok(()) => true,
            Err(err) => {
                debug!("minted event dropped, queue closed: {:?}", err.into_inner());
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct MintedEventQueue {
    rx: UnboundedReceiver<MintedEvent>,
}

impl MintedEventQueue {
    /// Take everything already delivered without waiting for more.
    pub fn drain(&mut self) -> Vec<MintedEvent> {
        let mut events = Vec::new();
        while let Some(Some(event)) = self.rx.next().now_or_never() {
            events.push(event);
        }
        events
    }
}

pub fn minted_channel() -> (MintedEventSink, MintedEventQueue) {
    let (tx, rx) = mpsc::unbounded();
    (MintedEventSink { tx }, MintedEventQueue { rx })
}
