//! # Event contract
//!
//! The engine treats events as opaque, immutable values. The only thing it ever
//! asks of an event is whether it compares equal to a subscription filter.
//!
//! Any type that is `PartialEq + Default + Debug + Send + Sync + 'static`
//! is an [`Event`] through a blanket impl:
//! - `PartialEq` is the **matching contract**: subscription `(h, f)` fires for `e` iff `f == e`;
//! - `Default` is the **generic empty event**: what `add_default()` submits and
//!   what `subscribe()` uses as filter.
//!
//! ## Kind matching
//! To subscribe to "any event of kind X" regardless of payload, write `PartialEq`
//! so that a payload-less value equals every value of the same variant:
//!
//! ```rust
//! use std::mem::discriminant;
//!
//! #[derive(Debug, Default, Clone)]
//! enum Shop {
//!     #[default]
//!     Generic,
//!     OrderCreated(Option<(String, u32)>),
//! }
//!
//! impl PartialEq for Shop {
//!     fn eq(&self, other: &Self) -> bool {
//!         match (self, other) {
//!             (Shop::OrderCreated(a), Shop::OrderCreated(b)) => a.is_none() || b.is_none() || a == b,
//!             _ => discriminant(self) == discriminant(other),
//!         }
//!     }
//! }
//!
//! let template = Shop::OrderCreated(None);
//! assert_eq!(template, Shop::OrderCreated(Some(("ada".into(), 3))));
//! assert_ne!(template, Shop::Generic);
//! assert_eq!(Shop::default(), Shop::Generic);
//! ```

use std::fmt::Debug;

/// Marker trait for values that can be submitted to the engine.
///
/// Implemented automatically; see the [module docs](self) for the matching contract.
pub trait Event: PartialEq + Default + Debug + Send + Sync + 'static {}

impl<T> Event for T where T: PartialEq + Default + Debug + Send + Sync + 'static {}
