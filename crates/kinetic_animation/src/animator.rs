//! Animation lifecycle
//!
//! [`Animator`] starts animations, drives their frame loops through the
//! host's [`FrameScheduler`](kinetic_core::FrameScheduler) and cancels them
//! by element. Each animation moves through:
//!
//! ```text
//! Pending --(delay elapsed, on_begin)--> Running --(elapsed >= duration)--> Completed
//!                                           |
//!                                           +--(stop removed its elements)--> Cancelled
//! ```
//!
//! A completed animation with `looping` set starts a fresh instance from its
//! resolved request: `Alternate` swaps every pair, `Reverse` clears the
//! direction so the already reversed values run unchanged.

use crate::config::AnimationDefaults;
use crate::error::Result;
use crate::normalize::{normalize, reverse_pairs};
use crate::progress::{
    apply_progress, describe_properties, frame_values, set_will_change, will_change_hint,
    AnimatedPropertyDescriptor,
};
use crate::registry::{AnimationId, Registry};
use crate::request::{AnimationRequest, Direction, Targets};
use kinetic_core::Host;
use std::cell::Cell;
use std::rc::{Rc, Weak};

struct AnimatorInner<H: Host> {
    /// Weak so frames queued on the host never keep the host alive
    host: Weak<H>,
    registry: Registry<H::Element>,
    defaults: AnimationDefaults,
}

impl<H: Host> AnimatorInner<H> {
    fn start(
        self: &Rc<Self>,
        host: &Rc<H>,
        request: AnimationRequest<H::Element>,
    ) -> Result<AnimationId> {
        let request = normalize(request, &**host, &self.defaults)?;
        let descriptors = describe_properties(&request)?;
        let duration = request.duration.unwrap_or(self.defaults.duration);

        let id = self.registry.track(request.elements.as_slice());
        tracing::debug!(
            %id,
            elements = request.elements.as_slice().len(),
            properties = descriptors.len(),
            duration,
            "animation started"
        );

        if let Some(hint) = will_change_hint(&request) {
            set_will_change(&**host, request.elements.as_slice(), &hint);
        }

        let animation = Rc::new(RunningAnimation {
            animator: self.clone(),
            id,
            request,
            descriptors,
            duration,
            start_time: Cell::new(None),
        });
        animation.begin(host);

        Ok(id)
    }
}

/// Starts, drives and cancels animations on one host.
///
/// Cloning is cheap; clones share the host and the registry. Running
/// animations only hold the host weakly: once every strong reference to it
/// is dropped, their queued frames do nothing.
pub struct Animator<H: Host> {
    host: Rc<H>,
    inner: Rc<AnimatorInner<H>>,
}

impl<H: Host> Clone for Animator<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> Animator<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self::with_defaults(host, AnimationDefaults::default())
    }

    pub fn with_defaults(host: Rc<H>, defaults: AnimationDefaults) -> Self {
        Self {
            inner: Rc::new(AnimatorInner {
                host: Rc::downgrade(&host),
                registry: Registry::new(),
                defaults,
            }),
            host,
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn defaults(&self) -> &AnimationDefaults {
        &self.inner.defaults
    }

    pub fn registry(&self) -> &Registry<H::Element> {
        &self.inner.registry
    }

    /// Begin one animation.
    ///
    /// The request is normalized and its properties parsed before anything
    /// is tracked, so an error leaves no trace in the registry.
    pub fn start(&self, request: AnimationRequest<H::Element>) -> Result<AnimationId> {
        self.inner.start(&self.host, request)
    }

    /// Cancel animations for the given elements.
    ///
    /// Elements that are not animating are ignored. Other elements sharing
    /// an animation with a stopped one keep animating.
    pub fn stop(&self, targets: impl Into<Targets<H::Element>>) {
        let stopped = targets.into().resolve(&*self.host);
        let changed = self.inner.registry.remove_elements(&stopped);
        tracing::debug!(elements = stopped.len(), records = changed, "animations stopped");
    }

    pub fn is_animating(&self, id: AnimationId) -> bool {
        self.inner.registry.contains(id)
    }

    /// Number of animations still tracked
    pub fn active_count(&self) -> usize {
        self.inner.registry.len()
    }
}

/// Request for the next loop iteration
fn next_iteration<E>(mut request: AnimationRequest<E>) -> AnimationRequest<E> {
    match request.direction {
        Some(Direction::Alternate) => reverse_pairs(request),
        Some(Direction::Reverse) => {
            request.direction = None;
            request
        }
        _ => request,
    }
}

/// One animation instance from first frame to completion
struct RunningAnimation<H: Host> {
    animator: Rc<AnimatorInner<H>>,
    id: AnimationId,
    request: AnimationRequest<H::Element>,
    descriptors: Vec<AnimatedPropertyDescriptor>,
    duration: f64,
    start_time: Cell<Option<f64>>,
}

impl<H: Host> RunningAnimation<H> {
    /// Pending -> Running, after the optional delay
    fn begin(self: Rc<Self>, host: &Rc<H>) {
        let delay = self.request.delay.filter(|delay| *delay > 0.0);
        match delay {
            Some(delay) => host.set_timeout(
                Box::new(move || {
                    if let Some(host) = self.animator.host.upgrade() {
                        self.enter(&host);
                    }
                }),
                delay,
            ),
            None => self.enter(host),
        }
    }

    fn enter(self: Rc<Self>, host: &Rc<H>) {
        if let Some(on_begin) = &self.request.on_begin {
            on_begin(self.request.elements.as_slice());
        }
        self.schedule_frame(host);
    }

    fn schedule_frame(self: Rc<Self>, host: &Rc<H>) {
        host.request_animation_frame(Box::new(move |now| self.step(now)));
    }

    fn step(self: Rc<Self>, now: f64) {
        let Some(host) = self.animator.host.upgrade() else {
            tracing::trace!(id = %self.id, "host dropped");
            return;
        };
        let Some(elements) = self.animator.registry.elements(self.id) else {
            tracing::trace!(id = %self.id, "animation cancelled");
            return;
        };

        let start = match self.start_time.get() {
            Some(start) => start,
            None => {
                self.start_time.set(Some(now));
                now
            }
        };
        let elapsed = now - start;
        let running = elapsed < self.duration;

        let progress = frame_values(&self.descriptors, elapsed, self.duration);
        for element in &elements {
            apply_progress(&*host, element, &self.descriptors, &progress);
        }

        if running {
            self.schedule_frame(&host);
        } else {
            self.complete(&host);
        }
    }

    /// Running -> Completed, then loop re-entry if requested
    fn complete(&self, host: &Rc<H>) {
        self.animator.registry.untrack(self.id);
        tracing::debug!(id = %self.id, "animation completed");

        if let Some(on_complete) = &self.request.on_complete {
            on_complete(self.request.elements.as_slice());
        }

        if self.request.looping {
            let next = next_iteration(self.request.clone());
            match self.animator.start(host, next) {
                Ok(next_id) => tracing::debug!(id = %self.id, %next_id, "animation looped"),
                Err(err) => tracing::warn!(id = %self.id, "failed to restart loop: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::pair;
    use kinetic_core::{ElementId, MemoryHost, MutationSink};

    fn setup() -> (Rc<MemoryHost>, Animator<MemoryHost>, ElementId) {
        let host = Rc::new(MemoryHost::new());
        let el = host.create_element("div");
        let animator = Animator::new(host.clone());
        (host, animator, el)
    }

    #[test]
    fn test_next_iteration_directions() {
        let base = || AnimationRequest::<ElementId>::new(Vec::new()).property("x", pair(0, 1));

        let alternate = next_iteration(base().direction(Direction::Alternate));
        assert_eq!(alternate.property_value("x"), Some(&pair(1, 0)));
        assert_eq!(alternate.direction, Some(Direction::Alternate));

        let reverse = next_iteration(base().direction(Direction::Reverse));
        assert_eq!(reverse.property_value("x"), Some(&pair(0, 1)));
        assert_eq!(reverse.direction, None);

        let normal = next_iteration(base().direction(Direction::Normal));
        assert_eq!(normal.property_value("x"), Some(&pair(0, 1)));
    }

    #[test]
    fn test_start_tracks_and_completes() {
        let (host, animator, el) = setup();
        let id = animator
            .start(
                AnimationRequest::new(Targets::one(el))
                    .property("opacity", pair(0, 1))
                    .duration(100.0),
            )
            .unwrap();

        assert!(animator.is_animating(id));
        assert_eq!(host.style(&el, "will-change").as_deref(), Some("opacity"));

        host.advance(16.0);
        assert_eq!(host.style(&el, "opacity").as_deref(), Some("0"));

        host.advance(100.0);
        assert_eq!(host.style(&el, "opacity").as_deref(), Some("1"));
        assert!(!animator.is_animating(id));
        assert_eq!(animator.active_count(), 0);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_invalid_request_is_not_tracked() {
        let (host, animator, el) = setup();
        let result = animator.start(
            AnimationRequest::new(Targets::one(el))
                .property("cx", 10)
                .duration(100.0),
        );
        assert!(result.is_err());
        assert_eq!(animator.active_count(), 0);
        assert_eq!(host.pending_frames(), 0);

        let result = animator.start(
            AnimationRequest::new(Targets::one(el))
                .property("opacity", 0)
                .easing("easeSomehow"),
        );
        assert!(result.is_err());
        assert_eq!(animator.active_count(), 0);
    }

    #[test]
    fn test_zero_duration_writes_final_value_on_first_frame() {
        let (host, animator, el) = setup();
        animator
            .start(
                AnimationRequest::new(Targets::one(el))
                    .property("translateY", 20)
                    .duration(0.0),
            )
            .unwrap();

        host.advance(16.0);
        assert_eq!(host.style(&el, "transform").as_deref(), Some("translateY(20px)"));
        assert_eq!(animator.active_count(), 0);
    }

    #[test]
    fn test_queued_frames_do_not_keep_host_alive() {
        let (host, animator, el) = setup();
        animator
            .start(
                AnimationRequest::new(Targets::one(el))
                    .property("opacity", pair(0, 1))
                    .duration(100.0)
                    .looping(true),
            )
            .unwrap();
        host.advance(16.0);
        assert_eq!(host.pending_frames(), 1);

        let weak = Rc::downgrade(&host);
        drop(animator);
        drop(host);
        assert!(weak.upgrade().is_none());
    }
}
