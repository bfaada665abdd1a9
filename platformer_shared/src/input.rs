//! Input action abstraction.
//!
//! Actions are owned by whoever consumes them and must be enabled before
//! they produce values. Button edges are delivered through explicit
//! subscriptions rather than a shared event bus.

use crate::math::Vec2;

/// Callback invoked when a button action is performed.
pub type ActionCallback = Box<dyn FnMut() + Send>;

/// Token returned by [`ButtonAction::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

/// Continuous action, e.g. "Move".
pub trait AxisAction: Send {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
    /// Current value. Disabled actions read zero.
    fn read_value(&self) -> Vec2;
}

/// Discrete action with a "performed" edge, e.g. "Jump".
pub trait ButtonAction: Send {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
    fn subscribe(&mut self, callback: ActionCallback) -> Subscription;
    /// Returns false if the token was not subscribed.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}
