/*!
# Event Bus

Per-object publish/subscribe registry.

Every entity owns exactly one bus. Handlers are plain values (compared by
equality) instead of closures, so a bus can be cloned, inspected and tested
without any shared mutable state leaking out of its owner. The owner decides
what a handler value *does* when it dispatches an emitted event.

Reentrancy is not guarded: a handler that emits back into the bus it was
called from can recurse forever. Callers must not build such cycles.
*/

use std::collections::HashMap;
use std::hash::Hash;

/// Mapping from event kind to an ordered set of handlers.
#[derive(Debug, Clone)]
pub struct EventBus<K, H> {
    handlers: HashMap<K, Vec<H>>,
}

impl<K, H> Default for EventBus<K, H> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<K, H> EventBus<K, H>
where
    K: Eq + Hash,
    H: PartialEq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`. Registering the same handler twice is a no-op.
    pub fn on(&mut self, kind: K, handler: H) -> &mut Self {
        let set = self.handlers.entry(kind).or_default();
        if !set.contains(&handler) {
            set.push(handler);
        }
        self
    }

    /// Deregisters `handler` from `kind`. Unknown handlers are ignored.
    pub fn off(&mut self, kind: &K, handler: &H) -> &mut Self {
        if let Some(set) = self.handlers.get_mut(kind) {
            set.retain(|registered| registered != handler);
            if set.is_empty() {
                self.handlers.remove(kind);
            }
        }
        self
    }

    /// Hands every handler registered for `kind` to `dispatch`, in registration
    /// order, and returns how many were invoked. No handlers means no calls.
    pub fn emit<F>(&self, kind: &K, mut dispatch: F) -> usize
    where
        F: FnMut(H),
    {
        let Some(set) = self.handlers.get(kind) else {
            return 0;
        };
        for handler in set.iter().cloned() {
            dispatch(handler);
        }
        set.len()
    }

    pub fn is_subscribed(&self, kind: &K, handler: &H) -> bool {
        self.handlers
            .get(kind)
            .is_some_and(|set| set.contains(handler))
    }

    pub fn handler_count(&self, kind: &K) -> usize {
        self.handlers.get(kind).map_or(0, Vec::len)
    }
}
