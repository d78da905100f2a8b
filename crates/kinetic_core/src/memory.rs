//! In-memory host with a virtual clock
//!
//! `MemoryHost` keeps a flat document of elements (tag, id, classes, inline
//! styles, attributes) and a manually advanced clock. Nothing runs until
//! [`MemoryHost::advance`] is called, which makes frame-by-frame behavior
//! deterministic for tests and headless drivers.

use crate::host::{ElementSource, FrameCallback, FrameScheduler, MutationSink, TimerCallback};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};

new_key_type! {
    pub struct ElementId;
}

#[derive(Debug, Default)]
struct ElementNode {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    styles: FxHashMap<String, String>,
    attributes: FxHashMap<String, String>,
}

struct Timer {
    due: f64,
    seq: u64,
    callback: TimerCallback,
}

/// A compound selector such as `div`, `#hero`, `.card` or `circle.dot`
#[derive(Debug, Default)]
struct SimpleSelector {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
}

impl SimpleSelector {
    fn parse(input: &str) -> Self {
        let mut selector = SimpleSelector::default();
        let mut current = String::new();
        let mut kind = ' ';

        fn flush(kind: char, text: &mut String, selector: &mut SimpleSelector) {
            if text.is_empty() {
                return;
            }
            let part = std::mem::take(text);
            match kind {
                '#' => selector.id = Some(part),
                '.' => selector.classes.push(part),
                _ if part == "*" => selector.universal = true,
                _ => selector.tag = Some(part.to_ascii_lowercase()),
            }
        }

        for ch in input.chars() {
            if ch == '#' || ch == '.' {
                flush(kind, &mut current, &mut selector);
                kind = ch;
            } else {
                current.push(ch);
            }
        }
        flush(kind, &mut current, &mut selector);
        selector
    }

    fn is_empty(&self) -> bool {
        !self.universal && self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    fn matches(&self, node: &ElementNode) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if *tag != node.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id.as_ref() != Some(id) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| node.classes.iter().any(|c| c == class))
    }
}

/// In-memory document and virtual frame clock
pub struct MemoryHost {
    elements: RefCell<SlotMap<ElementId, ElementNode>>,
    now: Cell<f64>,
    frames: RefCell<Vec<FrameCallback>>,
    timers: RefCell<Vec<Timer>>,
    timer_seq: Cell<u64>,
    mutations: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(SlotMap::with_key()),
            now: Cell::new(0.0),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            timer_seq: Cell::new(0),
            mutations: Cell::new(0),
        }
    }

    // ========================================================================
    // Document
    // ========================================================================

    /// Append a new element with the given tag name
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.elements.borrow_mut().insert(ElementNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })
    }

    pub fn set_id(&self, element: ElementId, id: &str) {
        if let Some(node) = self.elements.borrow_mut().get_mut(element) {
            node.id = Some(id.to_string());
        }
    }

    pub fn add_class(&self, element: ElementId, class: &str) {
        if let Some(node) = self.elements.borrow_mut().get_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    /// Current attribute value, `None` when unset
    pub fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(element)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    /// Number of style and attribute writes performed so far
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    pub fn element_count(&self) -> usize {
        self.elements.borrow().len()
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the clock forward by `ms`, fire every timer that came due, then
    /// run one display frame at the new time.
    ///
    /// Frame callbacks requested while the frame runs are queued for the
    /// next call.
    pub fn advance(&self, ms: f64) {
        let now = self.now.get() + ms.max(0.0);
        self.now.set(now);

        while let Some(timer) = self.take_due_timer(now) {
            (timer.callback)();
        }

        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        tracing::trace!(now, count = frames.len(), "running frame callbacks");
        for callback in frames {
            callback(now);
        }
    }

    /// Advance `count` frames of `frame_ms` each
    pub fn run_frames(&self, count: usize, frame_ms: f64) {
        for _ in 0..count {
            self.advance(frame_ms);
        }
    }

    /// Keep advancing by `frame_ms` until no frames or timers are pending,
    /// giving up after `max_frames`. Returns the number of frames run.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames && (self.pending_frames() > 0 || self.pending_timers() > 0) {
            self.advance(frame_ms);
            ran += 1;
        }
        ran
    }

    fn take_due_timer(&self, now: f64) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(timers.remove(index))
    }

    fn bump_mutations(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementSource for MemoryHost {
    type Element = ElementId;

    /// Supports comma-separated lists of compound selectors built from a
    /// tag, `*`, `#id` and `.class` parts. Combinators are not supported.
    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let groups: Vec<SimpleSelector> = selector
            .split(',')
            .map(|group| SimpleSelector::parse(group.trim()))
            .collect();

        self.elements
            .borrow()
            .iter()
            .filter(|(_, node)| groups.iter().any(|group| group.matches(node)))
            .map(|(key, _)| key)
            .collect()
    }
}

impl MutationSink for MemoryHost {
    fn style(&self, element: &ElementId, property: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(*element)
            .and_then(|node| node.styles.get(property).cloned())
    }

    fn set_style(&self, element: &ElementId, property: &str, value: &str) {
        if let Some(node) = self.elements.borrow_mut().get_mut(*element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
        self.bump_mutations();
    }

    fn set_attribute(&self, element: &ElementId, name: &str, value: &str) {
        if let Some(node) = self.elements.borrow_mut().get_mut(*element) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
        self.bump_mutations();
    }
}

impl FrameScheduler for MemoryHost {
    fn request_animation_frame(&self, callback: FrameCallback) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_timeout(&self, callback: TimerCallback, delay_ms: f64) {
        let seq = self.timer_seq.get();
        self.timer_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay_ms.max(0.0),
            seq,
            callback,
        });
    }
}
