//! Kinetic Core
//!
//! Host seams the animation engine talks through:
//!
//! - **Element source**: resolves selectors into element handles
//! - **Mutation sink**: style and attribute reads/writes on those handles
//! - **Frame scheduler**: display-synchronized frame callbacks and delays
//!
//! The engine in `kinetic_animation` is generic over a [`Host`]. A browser
//! embedding implements these traits over its DOM bindings; [`MemoryHost`]
//! implements them over an in-memory document with a virtual clock.
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::{FrameScheduler, MemoryHost, MutationSink};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let host = MemoryHost::new();
//! let el = host.create_element("div");
//! host.set_style(&el, "opacity", "0.5");
//! assert_eq!(host.style(&el, "opacity").as_deref(), Some("0.5"));
//!
//! let seen = Rc::new(Cell::new(None));
//! let seen_clone = seen.clone();
//! host.request_animation_frame(Box::new(move |now| seen_clone.set(Some(now))));
//! host.advance(16.0);
//! assert_eq!(seen.get(), Some(16.0));
//! ```

pub mod host;
pub mod memory;

pub use host::{ElementSource, FrameCallback, FrameScheduler, Host, MutationSink, TimerCallback};
pub use memory::{ElementId, MemoryHost};
