// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outward broadcast of supervisor events.

use tokio::sync::broadcast;

use super::SupervisorEvent;

const CAPACITY: usize = 256;

/// Fan-out of [`SupervisorEvent`]s to async subscribers.
///
/// Each subscriber sees the events published after it subscribed, in
/// publish order. A subscriber more than 256 events behind gets
/// `RecvError::Lagged` and resumes at the oldest retained event.
///
/// # Examples
///
/// ```
/// use huesync_lib::event::{EventBus, SupervisorEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(SupervisorEvent::TokenChanged { token: "abc".into() });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SupervisorEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.sender.subscribe()
    }

    /// Sends `event` to current subscribers; dropped when there are none.
    pub fn publish(&self, event: SupervisorEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No subscribers for supervisor event");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    use super::*;

    fn token(value: &str) -> SupervisorEvent {
        SupervisorEvent::TokenChanged {
            token: value.to_string(),
        }
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(token("a"));
        bus.publish(token("b"));

        assert_eq!(rx.try_recv().unwrap(), token("a"));
        assert_eq!(rx.try_recv().unwrap(), token("b"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(token("before"));

        let mut rx = bus.subscribe();
        bus.publish(token("after"));

        assert_eq!(rx.try_recv().unwrap(), token("after"));
    }

    #[tokio::test]
    async fn slow_subscriber_is_told_it_lagged() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        for i in 0..=CAPACITY {
            bus.publish(token(&i.to_string()));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(rx.recv().await.unwrap(), token("1"));
    }
}
