//! Runtime core: submission, dispatch and completion tracking.
//!
//! The public API of this module is [`EventSourcing`] (plus its builder and the
//! small value types it returns).
//!
//! Internal modules:
//! - [`sourcing`]: the service handle; persists and enqueues submitted events;
//! - [`worker`]: the dispatch loop; fans each event out to its matched subscriptions;
//! - [`outstanding`]: the wait group counting in-flight deliveries;
//! - [`builder`]: configuration and initial subscriptions.

mod builder;
mod outstanding;
mod sourcing;
mod worker;

pub use builder::EventSourcingBuilder;
pub use outstanding::WaitOutcome;
pub use sourcing::{EventSourcing, Submitted};
