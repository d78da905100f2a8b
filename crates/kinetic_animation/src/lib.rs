//! Kinetic Animation Engine
//!
//! Declarative property animation for host elements: transforms, opacity
//! and arbitrary attributes (including colors), interpolated over time with
//! Penner easing functions and written frame by frame.
//!
//! # Features
//!
//! - **Normalization**: bare targets get type defaults, transforms get units,
//!   hex colors become `rgb(...)`
//! - **Easing**: linear plus In/Out/InOut Quad, Cubic, Quart, Quint, Sine,
//!   Expo, Circ, Elastic, Back, and Out-Bounce
//! - **Batched writes**: transform functions collapse into one `transform`
//! - **Lifecycle**: delays, begin/complete callbacks, looping with
//!   `Reverse` / `Alternate` directions, cancellation by element
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::{pair, AnimationRequest, Animator, Targets};
//! use kinetic_core::{MemoryHost, MutationSink};
//! use std::rc::Rc;
//!
//! let host = Rc::new(MemoryHost::new());
//! let el = host.create_element("div");
//! let animator = Animator::new(host.clone());
//!
//! animator
//!     .start(
//!         AnimationRequest::new(Targets::one(el))
//!             .property("translateX", 100)
//!             .property("opacity", pair(0, 1))
//!             .duration(300.0)
//!             .easing("easeOutCubic"),
//!     )
//!     .unwrap();
//!
//! host.run_until_idle(16.0, 100);
//! assert_eq!(host.style(&el, "transform").as_deref(), Some("translateX(100px)"));
//! assert_eq!(host.style(&el, "opacity").as_deref(), Some("1"));
//! ```

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod registry;
pub mod request;
pub mod value;

pub use animator::Animator;
pub use config::AnimationDefaults;
pub use easing::{Easing, EasingSpec};
pub use error::{AnimationError, ConfigError, Result};
pub use normalize::normalize;
pub use progress::AnimatedPropertyDescriptor;
pub use registry::{AnimationId, Registry};
pub use request::{pair, AnimationRequest, Callback, Direction, PropertyValue, Targets};
pub use value::{SplitValue, Value};
