use crate::config::Config;
use crate::core::sourcing::EventSourcing;
use crate::event::Event;
use crate::handlers::HandlerRef;
use crate::registry::Subscription;
use crate::store::UnitOfWorkFactory;

/// Builder for an [`EventSourcing`] instance with custom configuration.
pub struct EventSourcingBuilder<E: Event> {
    cfg: Config,
    factory: Box<dyn UnitOfWorkFactory<E>>,
    subscriptions: Vec<Subscription<E>>,
}

impl<E: Event> EventSourcingBuilder<E> {
    pub(crate) fn new(factory: Box<dyn UnitOfWorkFactory<E>>) -> Self {
        Self {
            cfg: Config::default(),
            factory,
            subscriptions: Vec::new(),
        }
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Registers `handler` for the generic event before the worker starts.
    pub fn with_subscriber(self, handler: HandlerRef<E>) -> Self {
        self.with_subscriber_to(handler, E::default())
    }

    /// Registers `handler` for events equal to `filter` before the worker starts.
    pub fn with_subscriber_to(mut self, handler: HandlerRef<E>, filter: E) -> Self {
        self.subscriptions.push(Subscription::new(handler, filter));
        self
    }

    /// Builds the instance and spawns its dispatch worker.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime context.
    pub fn build(self) -> EventSourcing<E> {
        EventSourcing::start(self.cfg, self.factory, self.subscriptions)
    }
}
