//! Per-instance publish/subscribe.
//!
//! ## Dispatch contract
//!
//! - Handlers run one at a time, in subscription order, each awaited to
//!   completion before the next starts.
//! - The handler list is snapshotted at publish time.
//! - `cancel()` stops dispatch for the current publish.
//! - A failing handler aborts dispatch; the error reaches the publisher.
//! - Once-subscriptions are removed right after their single invocation.
//!
//! ```
//! # futures_util::FutureExt::now_or_never(async {
//! use merge_grid::events::{handler_fn, EventBus, EventName, EventPayload};
//!
//! let mut bus = EventBus::new();
//! bus.subscribe(EventName::AfterCalculateMergeValue, handler_fn(|event| {
//!     event.payload = EventPayload::MergeValue(64);
//!     Ok(())
//! }));
//!
//! let result = bus
//!     .publish(EventName::AfterCalculateMergeValue, EventPayload::MergeValue(8))
//!     .await
//!     .unwrap();
//! assert!(!result.cancelled);
//! assert_eq!(result.payload, EventPayload::MergeValue(64));
//! # }).unwrap();
//! ```

use std::future::Future;
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::event::{EventName, EventPayload, EventResult, GameEvent};
use crate::core::{BoxError, GameError, Result};

/// Something that reacts to an event.
///
/// Most hosts use [`handler_fn`] or [`async_handler`] rather than
/// implementing this directly.
pub trait EventHandler {
    /// Handle one event. The returned future runs to completion before the
    /// next handler is invoked.
    fn handle<'a>(&'a self, event: &'a mut GameEvent) -> LocalBoxFuture<'a, std::result::Result<(), BoxError>>;
}

/// Synchronous closure handler.
pub struct FnHandler<F>(F);

impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&mut GameEvent) -> std::result::Result<(), BoxError>,
{
    fn handle<'a>(&'a self, event: &'a mut GameEvent) -> LocalBoxFuture<'a, std::result::Result<(), BoxError>> {
        futures_util::future::ready((self.0)(event)).boxed_local()
    }
}

/// Asynchronous handler that takes the event by value and returns it.
pub struct AsyncHandler<F>(F);

impl<F, Fut> EventHandler for AsyncHandler<F>
where
    F: Fn(GameEvent) -> Fut,
    Fut: Future<Output = std::result::Result<GameEvent, BoxError>> + 'static,
{
    fn handle<'a>(&'a self, event: &'a mut GameEvent) -> LocalBoxFuture<'a, std::result::Result<(), BoxError>> {
        let pending = (self.0)(event.clone());
        async move {
            let returned = pending.await?;
            let cancelled = returned.is_cancelled();
            event.payload = returned.payload;
            if cancelled {
                event.cancel();
            }
            Ok(())
        }
        .boxed_local()
    }
}

/// Wrap a synchronous closure as a handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut GameEvent) -> std::result::Result<(), BoxError>,
{
    FnHandler(f)
}

/// Wrap an async closure as a handler.
///
/// The closure receives a copy of the event and returns the (possibly
/// modified or cancelled) event; its payload and cancel flag are written
/// back before the next handler runs.
pub fn async_handler<F, Fut>(f: F) -> AsyncHandler<F>
where
    F: Fn(GameEvent) -> Fut,
    Fut: Future<Output = std::result::Result<GameEvent, BoxError>> + 'static,
{
    AsyncHandler(f)
}

/// Identifies one subscription, for targeted unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    handler: Rc<dyn EventHandler>,
    once: bool,
}

/// Event bus owned by one game instance.
#[derive(Default)]
pub struct EventBus {
    handlers: FxHashMap<EventName, Vec<Subscription>>,
    next_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, name: EventName, handler: Rc<dyn EventHandler>, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(name)
            .or_default()
            .push(Subscription { id, handler, once });
        id
    }

    /// Subscribe a handler for every publish of `name`.
    pub fn subscribe<H: EventHandler + 'static>(&mut self, name: EventName, handler: H) -> SubscriptionId {
        self.add(name, Rc::new(handler), false)
    }

    /// Subscribe a handler for the next publish of `name` only.
    pub fn subscribe_once<H: EventHandler + 'static>(&mut self, name: EventName, handler: H) -> SubscriptionId {
        self.add(name, Rc::new(handler), true)
    }

    /// Remove one subscription, or every subscription for `name` when `id`
    /// is `None`. Returns how many were removed.
    pub fn unsubscribe(&mut self, name: EventName, id: Option<SubscriptionId>) -> usize {
        let Some(list) = self.handlers.get_mut(&name) else {
            return 0;
        };

        let before = list.len();
        match id {
            Some(id) => list.retain(|s| s.id != id),
            None => list.clear(),
        }
        let removed = before - list.len();

        if list.is_empty() {
            self.handlers.remove(&name);
        }
        removed
    }

    /// Number of live subscriptions for `name`.
    #[must_use]
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.handlers.get(&name).map_or(0, Vec::len)
    }

    /// Remove every subscription.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Publish an event and await every handler.
    pub async fn publish(&mut self, name: EventName, payload: EventPayload) -> Result<EventResult> {
        let snapshot = match self.handlers.get(&name) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => {
                return Ok(EventResult {
                    cancelled: false,
                    payload,
                })
            }
        };

        let mut event = GameEvent::new(name, payload);
        for subscription in snapshot {
            let outcome = subscription.handler.handle(&mut event).await;
            if subscription.once {
                let _ = self.unsubscribe(name, Some(subscription.id));
            }
            outcome.map_err(|source| GameError::Handler { event: name, source })?;

            if event.is_cancelled() {
                trace!(%name, subscription = %subscription.id, "event cancelled");
                break;
            }
        }

        Ok(EventResult {
            cancelled: event.is_cancelled(),
            payload: event.payload,
        })
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(name, list)| (*name, list.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn block_on<F: Future>(future: F) -> F::Output {
        futures_util::FutureExt::now_or_never(future).expect("future should not suspend")
    }

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> FnHandler<impl Fn(&mut GameEvent) -> std::result::Result<(), BoxError>> {
        let log = Rc::clone(log);
        handler_fn(move |_| {
            log.borrow_mut().push(label);
            Ok(())
        })
    }

    #[test]
    fn test_no_subscribers_returns_payload() {
        let mut bus = EventBus::new();
        let result = block_on(bus.publish(EventName::BeforeReset, EventPayload::MergeValue(4))).unwrap();
        assert!(!result.cancelled);
        assert_eq!(result.payload, EventPayload::MergeValue(4));
    }

    #[test]
    fn test_handlers_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventName::AfterReset, recorder(&log, "first"));
        bus.subscribe(EventName::AfterReset, recorder(&log, "second"));
        bus.subscribe(EventName::BeforeReset, recorder(&log, "other"));

        block_on(bus.publish(EventName::AfterReset, EventPayload::None)).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_cancel_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventName::BeforeReset, recorder(&log, "first"));
        bus.subscribe(
            EventName::BeforeReset,
            handler_fn(|event| {
                event.cancel();
                Ok(())
            }),
        );
        bus.subscribe(EventName::BeforeReset, recorder(&log, "never"));

        let result = block_on(bus.publish(EventName::BeforeReset, EventPayload::None)).unwrap();
        assert!(result.cancelled);
        assert!(!result.proceed());
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn test_last_mutation_wins() {
        let mut bus = EventBus::new();
        for value in [10, 20] {
            bus.subscribe(
                EventName::AfterCalculateMergeValue,
                handler_fn(move |event| {
                    event.payload = EventPayload::MergeValue(value);
                    Ok(())
                }),
            );
        }

        let result = block_on(bus.publish(EventName::AfterCalculateMergeValue, EventPayload::MergeValue(1))).unwrap();
        assert_eq!(result.payload, EventPayload::MergeValue(20));
    }

    #[test]
    fn test_once_is_removed_after_invocation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe_once(EventName::AfterDrag, recorder(&log, "once"));
        bus.subscribe(EventName::AfterDrag, recorder(&log, "always"));

        block_on(bus.publish(EventName::AfterDrag, EventPayload::None)).unwrap();
        assert_eq!(bus.subscriber_count(EventName::AfterDrag), 1);
        block_on(bus.publish(EventName::AfterDrag, EventPayload::None)).unwrap();

        assert_eq!(*log.borrow(), vec!["once", "always", "always"]);
    }

    #[test]
    fn test_handler_error_aborts_dispatch() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventName::BeforeReset, handler_fn(|_| Err("boom".into())));
        bus.subscribe(EventName::BeforeReset, recorder(&log, "never"));

        let err = block_on(bus.publish(EventName::BeforeReset, EventPayload::None)).unwrap_err();
        assert!(matches!(err, GameError::Handler { event: EventName::BeforeReset, .. }));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let first = bus.subscribe(EventName::AfterSelect, recorder(&log, "first"));
        bus.subscribe(EventName::AfterSelect, recorder(&log, "second"));

        assert_eq!(bus.unsubscribe(EventName::AfterSelect, Some(first)), 1);
        block_on(bus.publish(EventName::AfterSelect, EventPayload::None)).unwrap();
        assert_eq!(*log.borrow(), vec!["second"]);

        assert_eq!(bus.unsubscribe(EventName::AfterSelect, None), 1);
        assert_eq!(bus.subscriber_count(EventName::AfterSelect), 0);
        assert_eq!(bus.unsubscribe(EventName::AfterSelect, None), 0);
    }

    #[test]
    fn test_async_handler_writes_back() {
        let mut bus = EventBus::new();
        bus.subscribe(
            EventName::BeforeProcessMerge,
            async_handler(|mut event: GameEvent| async move {
                event.payload = EventPayload::MergeValue(2);
                event.cancel();
                Ok::<_, BoxError>(event)
            }),
        );

        let result = block_on(bus.publish(EventName::BeforeProcessMerge, EventPayload::None)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.payload, EventPayload::MergeValue(2));
    }
}
