//! Event bus decoupling data mutations from view refreshes

pub mod names;
pub mod bus;

pub use bus::{EventBus, EventHandler, SubscriptionId};
pub use names::{Event, EventName, EventPayload};
