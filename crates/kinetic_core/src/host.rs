//! Host collaborator traits
//!
//! Everything the engine needs from its embedding environment. Handles are
//! single-threaded: callbacks are boxed `FnOnce` closures without `Send`.

use std::fmt::Debug;

/// Callback run on the next display refresh, receiving the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback run once after a delay
pub type TimerCallback = Box<dyn FnOnce()>;

/// Resolves selectors into element handles
pub trait ElementSource {
    /// Opaque handle to one element of the host document
    type Element: Clone + PartialEq + Debug + 'static;

    /// All elements matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;
}

/// Style and attribute access on host elements
pub trait MutationSink: ElementSource {
    /// Current inline style value, `None` when unset
    fn style(&self, element: &Self::Element, property: &str) -> Option<String>;

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
}

/// Display-synchronized frame clock plus one-shot timers
pub trait FrameScheduler {
    /// Run `callback` on the next frame
    fn request_animation_frame(&self, callback: FrameCallback);

    /// Run `callback` once `delay_ms` milliseconds have passed
    fn set_timeout(&self, callback: TimerCallback, delay_ms: f64);
}

/// Everything an animation engine needs from its environment
pub trait Host: MutationSink + FrameScheduler + 'static {}

impl<T> Host for T where T: MutationSink + FrameScheduler + 'static {}
