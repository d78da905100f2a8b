//! Animation registry
//!
//! Maps each running animation's identity to the elements still animating
//! under it. Every mutation builds a new snapshot and swaps it in, so a
//! snapshot handed out earlier never changes underneath its holder, while
//! [`Registry::contains`] and friends always read the latest binding.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Opaque, monotonically increasing animation handle. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Elements owned by one animation record
pub type ElementList<E> = SmallVec<[E; 4]>;

/// Immutable registry contents
pub type Snapshot<E> = FxHashMap<AnimationId, ElementList<E>>;

/// Copy-on-write store of active animations
pub struct Registry<E> {
    current: RefCell<Rc<Snapshot<E>>>,
    next_id: Cell<u64>,
}

impl<E: Clone + PartialEq> Registry<E> {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Rc::new(Snapshot::default())),
            next_id: Cell::new(0),
        }
    }

    /// The current snapshot. Later mutations do not affect it.
    pub fn snapshot(&self) -> Rc<Snapshot<E>> {
        self.current.borrow().clone()
    }

    /// Record a new animation over `elements` and return its identity
    pub fn track(&self, elements: &[E]) -> AnimationId {
        let id = AnimationId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut next = (*self.snapshot()).clone();
        next.insert(id, elements.iter().cloned().collect());
        self.replace(next);
        id
    }

    /// Forget an animation entirely
    pub fn untrack(&self, id: AnimationId) {
        if !self.contains(id) {
            return;
        }
        let mut next = (*self.snapshot()).clone();
        next.remove(&id);
        self.replace(next);
    }

    /// Remove `stopped` from every record, dropping records left empty.
    /// Returns how many records changed.
    pub fn remove_elements(&self, stopped: &[E]) -> usize {
        let current = self.snapshot();
        let mut next = Snapshot::default();
        let mut changed = 0;

        for (id, elements) in current.iter() {
            let remaining: ElementList<E> = elements
                .iter()
                .filter(|element| !stopped.contains(element))
                .cloned()
                .collect();
            if remaining.len() == elements.len() {
                next.insert(*id, remaining);
                continue;
            }
            changed += 1;
            if !remaining.is_empty() {
                next.insert(*id, remaining);
            }
        }

        if changed > 0 {
            self.replace(next);
        }
        changed
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.current.borrow().contains_key(&id)
    }

    /// Elements still animating under `id`, `None` once it is gone
    pub fn elements(&self, id: AnimationId) -> Option<ElementList<E>> {
        self.current.borrow().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.current.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.borrow().is_empty()
    }

    fn replace(&self, next: Snapshot<E>) {
        *self.current.borrow_mut() = Rc::new(next);
    }
}

impl<E: Clone + PartialEq> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}
