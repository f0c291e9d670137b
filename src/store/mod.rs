//! # Durability gateway
//!
//! Every submitted event goes through this module before it can reach a handler:
//!
//! ```text
//! add_event(e) ──► persist(factory, &e)
//!                     ├─► factory.create()   ──► Box<dyn UnitOfWork<E>>
//!                     ├─► unit.insert(&e)
//!                     ├─► unit.commit()
//!                     └─► drop(unit)          (release, always)
//! ```
//!
//! ## Contents
//! - [`UnitOfWork`], [`UnitOfWorkFactory`] the external contracts
//! - [`MemoryJournal`] an in-memory reference implementation

mod memory;
mod unit_of_work;

pub use memory::{MemoryJournal, Op, Record};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};

pub(crate) use unit_of_work::persist;
