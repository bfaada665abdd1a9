//! Input handling.
//!
//! A headless keyboard device plus the actions built on top of it. The
//! host feeds raw key transitions with [`Keyboard::press`] and
//! [`Keyboard::release`]; consumers own the [`KeyAxisAction`] and
//! [`KeyButtonAction`] handles and read them through the shared input
//! traits.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use platformer_shared::{
    input::{ActionCallback, AxisAction, ButtonAction, Subscription},
    math::Vec2,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Physical keys the headless keyboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    S,
    W,
    Space,
}

struct ButtonBinding {
    id: u64,
    key: Key,
    enabled: bool,
    callbacks: Vec<(Subscription, ActionCallback)>,
}

#[derive(Default)]
struct KeyboardInner {
    held: HashSet<Key>,
    buttons: Vec<ButtonBinding>,
    next_id: u64,
}

impl KeyboardInner {
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn button_mut(&mut self, id: u64) -> Option<&mut ButtonBinding> {
        self.buttons.iter_mut().find(|b| b.id == id)
    }

    fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut v = 0.0;
        if self.held.contains(&negative) {
            v -= 1.0;
        }
        if self.held.contains(&positive) {
            v += 1.0;
        }
        v
    }
}

/// Shared keyboard state. Cloning yields another handle to the same device.
#[derive(Clone, Default)]
pub struct Keyboard {
    inner: Arc<Mutex<KeyboardInner>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, KeyboardInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a key held. Enabled buttons bound to it fire on the press edge.
    ///
    /// Callbacks run while the device is locked and must not call back
    /// into the keyboard.
    ///
    /// Returns true if the key was not already held.
    pub fn press(&self, key: Key) -> bool {
        let mut inner = self.lock();
        if !inner.held.insert(key) {
            return false;
        }
        trace!(?key, "Key pressed");
        for button in inner.buttons.iter_mut() {
            if button.enabled && button.key == key {
                for (_, callback) in button.callbacks.iter_mut() {
                    callback();
                }
            }
        }
        true
    }

    /// Returns true if the key was held.
    pub fn release(&self, key: Key) -> bool {
        let released = self.lock().held.remove(&key);
        if released {
            trace!(?key, "Key released");
        }
        released
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.lock().held.contains(&key)
    }

    /// Callbacks subscribed across every button bound to `key`.
    pub fn subscriber_count(&self, key: Key) -> usize {
        self.lock()
            .buttons
            .iter()
            .filter(|b| b.key == key)
            .map(|b| b.callbacks.len())
            .sum()
    }

    /// Releases every key without firing anything.
    pub fn clear(&self) {
        self.lock().held.clear();
    }

    /// 1D composite on the x axis: `positive - negative`.
    pub fn axis(&self, negative: Key, positive: Key) -> KeyAxisAction {
        KeyAxisAction {
            keyboard: self.clone(),
            x: (negative, positive),
            y: None,
            enabled: false,
        }
    }

    /// 2D composite. Diagonals are not normalized.
    pub fn axis_2d(&self, left: Key, right: Key, down: Key, up: Key) -> KeyAxisAction {
        KeyAxisAction {
            keyboard: self.clone(),
            x: (left, right),
            y: Some((down, up)),
            enabled: false,
        }
    }

    pub fn button(&self, key: Key) -> KeyButtonAction {
        let mut inner = self.lock();
        let id = inner.alloc_id();
        inner.buttons.push(ButtonBinding {
            id,
            key,
            enabled: false,
            callbacks: Vec::new(),
        });
        KeyButtonAction {
            keyboard: self.clone(),
            id,
        }
    }
}

/// Composite axis over keyboard keys.
pub struct KeyAxisAction {
    keyboard: Keyboard,
    x: (Key, Key),
    y: Option<(Key, Key)>,
    enabled: bool,
}

impl AxisAction for KeyAxisAction {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn read_value(&self) -> Vec2 {
        if !self.enabled {
            return Vec2::ZERO;
        }
        let inner = self.keyboard.lock();
        let x = inner.axis(self.x.0, self.x.1);
        let y = self.y.map_or(0.0, |(down, up)| inner.axis(down, up));
        Vec2::new(x, y)
    }
}

/// Button bound to a single key. Unbinds itself when dropped.
pub struct KeyButtonAction {
    keyboard: Keyboard,
    id: u64,
}

impl KeyButtonAction {
    fn with_binding<R>(&self, f: impl FnOnce(&mut ButtonBinding) -> R) -> Option<R> {
        self.keyboard.lock().button_mut(self.id).map(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.with_binding(|b| b.callbacks.len()).unwrap_or(0)
    }
}

impl ButtonAction for KeyButtonAction {
    fn enable(&mut self) {
        self.with_binding(|b| b.enabled = true);
    }

    fn disable(&mut self) {
        self.with_binding(|b| b.enabled = false);
    }

    fn is_enabled(&self) -> bool {
        self.with_binding(|b| b.enabled).unwrap_or(false)
    }

    fn subscribe(&mut self, callback: ActionCallback) -> Subscription {
        let mut inner = self.keyboard.lock();
        let subscription = Subscription(inner.alloc_id());
        // Bindings are only removed when the action itself is dropped.
        let bound = match inner.button_mut(self.id) {
            Some(binding) => {
                binding.callbacks.push((subscription, callback));
                true
            }
            None => false,
        };
        debug_assert!(bound, "subscribe on an unbound button action");
        if !bound {
            trace!(id = self.id, "Subscribe on unbound button dropped");
        }
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.with_binding(|b| {
            let before = b.callbacks.len();
            b.callbacks.retain(|(s, _)| *s != subscription);
            b.callbacks.len() != before
        })
        .unwrap_or(false)
    }
}

impl Drop for KeyButtonAction {
    fn drop(&mut self) {
        let id = self.id;
        self.keyboard.lock().buttons.retain(|b| b.id != id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, ActionCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (
            count,
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn axis_reads_zero_until_enabled() {
        let kb = Keyboard::new();
        let mut axis = kb.axis(Key::Left, Key::Right);
        kb.press(Key::Right);
        assert_eq!(axis.read_value(), Vec2::ZERO);
        axis.enable();
        assert_eq!(axis.read_value(), Vec2::new(1.0, 0.0));
        kb.press(Key::Left);
        assert_eq!(axis.read_value(), Vec2::ZERO);
        kb.release(Key::Right);
        assert_eq!(axis.read_value(), Vec2::new(-1.0, 0.0));
        axis.disable();
        assert_eq!(axis.read_value(), Vec2::ZERO);
    }

    #[test]
    fn axis_2d_reads_both_components() {
        let kb = Keyboard::new();
        let mut axis = kb.axis_2d(Key::A, Key::D, Key::S, Key::W);
        axis.enable();
        kb.press(Key::D);
        kb.press(Key::W);
        assert_eq!(axis.read_value(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn button_fires_on_press_edge_only() {
        let kb = Keyboard::new();
        let mut jump = kb.button(Key::Space);
        let (count, cb) = counter();
        jump.subscribe(cb);

        kb.press(Key::Space);
        assert_eq!(count.load(Ordering::SeqCst), 0, "disabled action must not fire");
        kb.release(Key::Space);

        jump.enable();
        assert!(kb.press(Key::Space));
        assert!(!kb.press(Key::Space));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        kb.release(Key::Space);
        kb.press(Key::Space);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_stops_callbacks() {
        let kb = Keyboard::new();
        let mut jump = kb.button(Key::Space);
        jump.enable();
        let (count, cb) = counter();
        let sub = jump.subscribe(cb);
        assert_eq!(jump.subscriber_count(), 1);
        assert_eq!(kb.subscriber_count(Key::Space), 1);

        assert!(jump.unsubscribe(sub));
        assert!(!jump.unsubscribe(sub));
        kb.press(Key::Space);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropped_button_unbinds() {
        let kb = Keyboard::new();
        let (count, cb) = counter();
        {
            let mut jump = kb.button(Key::Space);
            jump.enable();
            jump.subscribe(cb);
        }
        kb.press(Key::Space);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
