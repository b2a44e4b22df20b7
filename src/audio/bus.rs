//! Publish/subscribe channel for playback state.
//!
//! Each subscriber owns the receiving end of an `mpsc` channel. New
//! subscribers get the current snapshot replayed first, so they never have to
//! wait for the next change to render something. Subscribers whose receiver
//! was dropped are pruned on the next publish.

#[cfg(test)]
use std::sync::mpsc::{self, Receiver};
use std::sync::mpsc::Sender;

use super::types::{NowPlaying, StateUpdate};

#[derive(Debug, Default)]
pub struct StateBus {
    current: NowPlaying,
    subscribers: Vec<Sender<StateUpdate>>,
}

impl StateBus {
    #[cfg(test)]
    pub fn subscribe(&mut self) -> Receiver<StateUpdate> {
        let (tx, rx) = mpsc::channel();
        self.attach(tx);
        rx
    }

    pub fn attach(&mut self, tx: Sender<StateUpdate>) {
        let alive = self
            .current
            .replay()
            .into_iter()
            .all(|update| tx.send(update).is_ok());
        if alive {
            self.subscribers.push(tx);
        }
    }

    pub fn publish(&mut self, update: StateUpdate) {
        self.current.apply(&update);
        self.subscribers.retain(|tx| tx.send(update.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> &NowPlaying {
        &self.current
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
