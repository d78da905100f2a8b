//! Animation requests
//!
//! An [`AnimationRequest`] carries the reserved options (targets, timing,
//! callbacks, looping) as typed fields and every other entry as an ordered
//! map of animated properties. Requests are loose when built by callers and
//! fully resolved after [`crate::normalize::normalize`].

use crate::value::Value;
use indexmap::IndexMap;
use kinetic_core::ElementSource;
use std::fmt;
use std::rc::Rc;

/// Callback receiving the resolved target elements
pub type Callback<E> = Rc<dyn Fn(&[E])>;

/// Which elements an animation (or a stop request) addresses
#[derive(Clone, Debug, PartialEq)]
pub enum Targets<E> {
    /// Resolved through the host's [`ElementSource`]
    Selector(String),
    One(E),
    Many(Vec<E>),
}

impl<E: Clone> Targets<E> {
    pub fn selector(selector: impl Into<String>) -> Self {
        Targets::Selector(selector.into())
    }

    pub fn one(element: E) -> Self {
        Targets::One(element)
    }

    pub fn many(elements: impl IntoIterator<Item = E>) -> Self {
        Targets::Many(elements.into_iter().collect())
    }

    /// Uniform ordered element list
    pub fn resolve<S>(&self, source: &S) -> Vec<E>
    where
        S: ElementSource<Element = E> + ?Sized,
    {
        match self {
            Targets::Selector(selector) => source.query_selector_all(selector),
            Targets::One(element) => vec![element.clone()],
            Targets::Many(elements) => elements.clone(),
        }
    }

    /// Elements held directly; empty for an unresolved selector
    pub fn as_slice(&self) -> &[E] {
        match self {
            Targets::Selector(_) => &[],
            Targets::One(element) => std::slice::from_ref(element),
            Targets::Many(elements) => elements,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Targets::Many(_))
    }
}

impl<E> From<&str> for Targets<E> {
    fn from(selector: &str) -> Self {
        Targets::Selector(selector.to_string())
    }
}

impl<E> From<String> for Targets<E> {
    fn from(selector: String) -> Self {
        Targets::Selector(selector)
    }
}

impl<E> From<Vec<E>> for Targets<E> {
    fn from(elements: Vec<E>) -> Self {
        Targets::Many(elements)
    }
}

impl<E: Clone> From<&[E]> for Targets<E> {
    fn from(elements: &[E]) -> Self {
        Targets::Many(elements.to_vec())
    }
}

/// A property's target value, or its explicit `[from, to]` pair
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Single(Value),
    Pair(Value, Value),
}

impl PropertyValue {
    pub fn pair(&self) -> Option<(&Value, &Value)> {
        match self {
            PropertyValue::Single(_) => None,
            PropertyValue::Pair(from, to) => Some((from, to)),
        }
    }

    /// Both values, or the single target value
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        let (first, second) = match self {
            PropertyValue::Single(value) => (value, None),
            PropertyValue::Pair(from, to) => (from, Some(to)),
        };
        std::iter::once(first).chain(second)
    }

    /// Apply `f` to every value, keeping the shape
    pub fn map_values<F>(&self, mut f: F) -> crate::error::Result<PropertyValue>
    where
        F: FnMut(&Value) -> crate::error::Result<Value>,
    {
        Ok(match self {
            PropertyValue::Single(value) => PropertyValue::Single(f(value)?),
            PropertyValue::Pair(from, to) => PropertyValue::Pair(f(from)?, f(to)?),
        })
    }

    /// Swap `from` and `to`
    pub fn reversed(self) -> PropertyValue {
        match self {
            PropertyValue::Pair(from, to) => PropertyValue::Pair(to, from),
            single => single,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Single(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Single(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Single(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Single(value.into())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Single(value.into())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for PropertyValue {
    fn from((from, to): (A, B)) -> Self {
        PropertyValue::Pair(from.into(), to.into())
    }
}

/// Build a `[from, to]` pair
pub fn pair(from: impl Into<Value>, to: impl Into<Value>) -> PropertyValue {
    PropertyValue::Pair(from.into(), to.into())
}

/// Playback direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Normal,
    /// Run to→from, applied once before the first frame
    Reverse,
    /// Swap from/to on every loop iteration
    Alternate,
}

/// A request to animate a set of elements
pub struct AnimationRequest<E> {
    pub elements: Targets<E>,
    /// Milliseconds to wait before `on_begin` and the first frame
    pub delay: Option<f64>,
    pub on_begin: Option<Callback<E>>,
    pub on_complete: Option<Callback<E>>,
    /// Restart on natural completion
    pub looping: bool,
    pub direction: Option<Direction>,
    /// Milliseconds; filled from the engine defaults when absent
    pub duration: Option<f64>,
    /// `"<name>"` or `"<name> <frequency>"`; filled from the engine defaults when absent
    pub easing: Option<String>,
    pub properties: IndexMap<String, PropertyValue>,
}

impl<E> AnimationRequest<E> {
    pub fn new(elements: impl Into<Targets<E>>) -> Self {
        Self {
            elements: elements.into(),
            delay: None,
            on_begin: None,
            on_complete: None,
            looping: false,
            direction: None,
            duration: None,
            easing: None,
            properties: IndexMap::new(),
        }
    }

    /// Builder: animate `name` to a target value or across a `[from, to]` pair
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder: set duration in milliseconds
    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    /// Builder: set easing, e.g. `"easeInOutQuad"` or `"easeOutElastic 300"`
    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Builder: set delay in milliseconds
    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn on_begin(mut self, callback: impl Fn(&[E]) + 'static) -> Self {
        self.on_begin = Some(Rc::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl Fn(&[E]) + 'static) -> Self {
        self.on_complete = Some(Rc::new(callback));
        self
    }

    pub fn property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

impl<E: Clone> Clone for AnimationRequest<E> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            delay: self.delay,
            on_begin: self.on_begin.clone(),
            on_complete: self.on_complete.clone(),
            looping: self.looping,
            direction: self.direction,
            duration: self.duration,
            easing: self.easing.clone(),
            properties: self.properties.clone(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for AnimationRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("elements", &self.elements)
            .field("delay", &self.delay)
            .field("on_begin", &self.on_begin.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("looping", &self.looping)
            .field("direction", &self.direction)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("properties", &self.properties)
            .finish()
    }
}
