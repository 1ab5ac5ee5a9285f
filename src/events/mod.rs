//! Lifecycle event system.
//!
//! Every step the game takes is bracketed by events so hosts can observe,
//! veto, or rewrite behaviour without modifying the core.
//!
//! ## Key Components
//!
//! - [`EventName`]: Closed set of lifecycle event names
//! - [`EventPayload`]: Typed data carried by each event
//! - [`GameEvent`]: The mutable record each handler receives
//! - [`EventBus`]: Ordered, awaited, cancelable dispatch
//!
//! ## Before and After
//!
//! `Before*` events are vetoes: a handler calling [`GameEvent::cancel`]
//! stops the step. `After*` events are rewrites: whatever payload the last
//! handler leaves behind is what the game uses (for example, a replacement
//! block from `AfterGenerateBlock`).

mod bus;
mod event;

pub use bus::{async_handler, handler_fn, AsyncHandler, EventBus, EventHandler, FnHandler, SubscriptionId};
pub use event::{EventName, EventPayload, EventResult, GameEvent, MergeOutcome, PayloadKind};
