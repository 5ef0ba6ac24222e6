use std::time::Duration;

use futures::{channel::oneshot, pin_mut, select, FutureExt};
use tokio::sync::mpsc;

use crate::api::{ChangeEvent, Store, Watch};

// Space each resubscription attempt by ATTEMPT_SPACING
const ATTEMPT_SPACING_SECS: u64 = 1;

/// What the feed runner reports to its consumer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeedUpdate {
    /// Subscription (re)established. Notifications may have been missed
    /// while disconnected: reload in full before trusting the feed again.
    Connected,
    Disconnected,
    Event(ChangeEvent),
}

/// Keep a change subscription alive until cancelled, forwarding
/// everything into `updates`.
///
/// A dropped subscription (stream end, or a failing subscribe call) is
/// recoverable: the runner unsubscribes, reports `Disconnected`, waits a
/// beat and subscribes again. Consumers reloading in full on every
/// `Connected` converge even across notification gaps. Returns once
/// `cancel`'s receiving end is dropped, or the consumer goes away.
pub async fn run_event_feed<S: Store>(
    store: &S,
    watch: Watch,
    updates: mpsc::UnboundedSender<FeedUpdate>,
    mut cancel: oneshot::Sender<()>,
) {
    let mut first_attempt = true;
    'resubscribe: loop {
        match first_attempt {
            true => first_attempt = false,
            false => {
                tracing::warn!(?watch, "lost change subscription");
                if updates.send(FeedUpdate::Disconnected).is_err() {
                    return;
                }
                tokio::time::sleep(Duration::from_secs(ATTEMPT_SPACING_SECS)).await;
            }
        }

        let mut sub = match store.subscribe(watch).await {
            Ok(sub) => sub,
            Err(err) => {
                tracing::warn!(?watch, ?err, "failed subscribing to change feed");
                continue 'resubscribe;
            }
        };
        tracing::info!(?watch, "subscribed to change feed");
        if updates.send(FeedUpdate::Connected).is_err() {
            let _ = store.unsubscribe(sub.id).await;
            return;
        }

        let mut cancellation = cancel.cancellation().fuse();
        loop {
            let next = sub.events.recv().fuse();
            pin_mut!(next);
            select! {
                _ = cancellation => {
                    let _ = store.unsubscribe(sub.id).await;
                    tracing::info!(?watch, "change feed cancelled");
                    return;
                }
                event = next => match event {
                    None => {
                        let _ = store.unsubscribe(sub.id).await;
                        continue 'resubscribe;
                    }
                    Some(event) => {
                        if updates.send(FeedUpdate::Event(event)).is_err() {
                            let _ = store.unsubscribe(sub.id).await;
                            return;
                        }
                    }
                },
            }
        }
    }
}
