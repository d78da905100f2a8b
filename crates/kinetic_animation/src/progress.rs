//! Progress engine
//!
//! Computes every animated property's textual value for an elapsed time and
//! writes those values to elements. Transform functions are batched into a
//! single `transform` style write per element per frame.

use crate::easing::EasingSpec;
use crate::error::{AnimationError, Result};
use crate::normalize::{is_style_property, is_transform_function};
use crate::request::AnimationRequest;
use crate::value::{recompose, Digit, SplitValue, Value};
use kinetic_core::MutationSink;
use smallvec::SmallVec;

/// Per-property interpolation plan, built once per animation instance
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedPropertyDescriptor {
    pub name: String,
    pub from: SplitValue,
    pub to: SplitValue,
    /// Caller-supplied target, written verbatim on the last frame
    pub final_value: String,
    pub is_transform_function: bool,
    pub is_color: bool,
    pub easing: EasingSpec,
}

impl AnimatedPropertyDescriptor {
    pub fn new(name: &str, from: &Value, to: &Value, easing: EasingSpec) -> Result<Self> {
        let from_split = from.split();
        let to_split = to.split();
        if from_split.digits.len() < to_split.digits.len() {
            return Err(AnimationError::ComponentMismatch {
                property: name.to_string(),
                from: from_split.digits.len(),
                to: to_split.digits.len(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            from: from_split,
            to: to_split,
            final_value: to.to_string(),
            is_transform_function: is_transform_function(name),
            is_color: from.is_rgb(),
            easing,
        })
    }

    /// Value at `elapsed`; the literal final value once `elapsed >= duration`
    pub fn value_at(&self, elapsed: f64, duration: f64) -> String {
        if elapsed >= duration {
            self.final_value.clone()
        } else {
            self.interpolate(elapsed, duration)
        }
    }

    /// Eased value for every numeric component, stitched into the target's
    /// scaffolding. Components with identical endpoints are held as written
    /// in the target.
    pub fn interpolate(&self, elapsed: f64, duration: f64) -> String {
        let digits: SmallVec<[Digit; 4]> = self
            .to
            .digits
            .iter()
            .zip(self.from.digits.iter())
            .map(|(end, start)| {
                if start.value == end.value {
                    return end.clone();
                }
                let value = self
                    .easing
                    .apply(elapsed, start.value, end.value - start.value, duration);
                if self.is_color {
                    Digit::computed(round_half_up(value))
                } else {
                    Digit::computed(value)
                }
            })
            .collect();
        recompose(&digits, &self.to.others)
    }
}

/// Round to the nearest integer, halves toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Build descriptors for every animated property of a normalized request
pub fn describe_properties<E>(
    request: &AnimationRequest<E>,
) -> Result<Vec<AnimatedPropertyDescriptor>> {
    let easing = match &request.easing {
        Some(text) => EasingSpec::parse(text)?,
        None => EasingSpec::default(),
    };

    request
        .properties
        .iter()
        .map(|(name, value)| {
            let (from, to) = value
                .pair()
                .ok_or_else(|| AnimationError::MissingStartValue(name.clone()))?;
            AnimatedPropertyDescriptor::new(name, from, to, easing)
        })
        .collect()
}

/// Current value of every property, in descriptor order
pub fn frame_values(
    descriptors: &[AnimatedPropertyDescriptor],
    elapsed: f64,
    duration: f64,
) -> Vec<String> {
    descriptors
        .iter()
        .map(|descriptor| descriptor.value_at(elapsed, duration))
        .collect()
}

/// Composite transform string, `None` when no transform function is animated
pub fn transform_string(
    descriptors: &[AnimatedPropertyDescriptor],
    progress: &[String],
) -> Option<String> {
    let parts: Vec<String> = descriptors
        .iter()
        .zip(progress)
        .filter(|(descriptor, _)| descriptor.is_transform_function)
        .map(|(descriptor, value)| format!("{}({})", descriptor.name, value))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Write one frame of progress to `element`
pub fn apply_progress<S>(
    sink: &S,
    element: &S::Element,
    descriptors: &[AnimatedPropertyDescriptor],
    progress: &[String],
) where
    S: MutationSink + ?Sized,
{
    for (descriptor, value) in descriptors.iter().zip(progress) {
        if descriptor.is_transform_function {
            continue;
        }
        if descriptor.name == "opacity" {
            sink.set_style(element, "opacity", value);
        } else {
            sink.set_attribute(element, &descriptor.name, value);
        }
    }

    if let Some(transform) = transform_string(descriptors, progress) {
        sink.set_style(element, "transform", &transform);
    }
}

/// `will-change` hint for the style categories a request animates
pub fn will_change_hint<E>(request: &AnimationRequest<E>) -> Option<String> {
    let mut hints: SmallVec<[&str; 2]> = SmallVec::new();
    let style_props = || request.properties.keys().filter(|name| is_style_property(name));

    if style_props().any(|name| is_transform_function(name)) {
        hints.push("transform");
    }
    if style_props().any(|name| name == "opacity") {
        hints.push("opacity");
    }

    if hints.is_empty() {
        None
    } else {
        Some(hints.join(","))
    }
}

/// Set the `will-change` hint on every element that has none yet
pub fn set_will_change<S>(sink: &S, elements: &[S::Element], hint: &str)
where
    S: MutationSink + ?Sized,
{
    for element in elements {
        let already_set = sink
            .style(element, "will-change")
            .is_some_and(|value| !value.is_empty());
        if !already_set {
            sink.set_style(element, "will-change", hint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::request::{pair, Targets};
    use kinetic_core::{ElementId, MemoryHost};

    fn descriptor(
        name: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
        easing: Easing,
    ) -> AnimatedPropertyDescriptor {
        AnimatedPropertyDescriptor::new(name, &from.into(), &to.into(), EasingSpec::new(easing))
            .unwrap()
    }

    #[test]
    fn test_linear_interpolation_keeps_target_scaffolding() {
        let d = descriptor("translateX", "0px", "100px", Easing::Linear);
        assert_eq!(d.value_at(0.0, 1000.0), "0px");
        assert_eq!(d.value_at(250.0, 1000.0), "25px");
        assert_eq!(d.value_at(500.0, 1000.0), "50px");
    }

    #[test]
    fn test_final_value_is_literal() {
        let d = descriptor("translateX", "0.1px", "100.0px", Easing::EaseOutElastic);
        assert_eq!(d.value_at(1000.0, 1000.0), "100.0px");
        assert_eq!(d.value_at(5000.0, 1000.0), "100.0px");
    }

    #[test]
    fn test_equal_components_hold_for_every_easing() {
        for easing in Easing::ALL {
            let d = descriptor("scale", 2, 2, easing);
            for elapsed in [0.0, 1.0, 333.0, 999.0] {
                assert_eq!(d.value_at(elapsed, 1000.0), "2", "{easing}");
            }
        }
    }

    #[test]
    fn test_held_components_keep_their_spelling() {
        let d = descriptor("scale", "1.50 0.10", "1.50 0.30", Easing::Linear);
        assert_eq!(d.value_at(500.0, 1000.0), "1.50 0.2");
        assert_eq!(d.value_at(1000.0, 1000.0), "1.50 0.30");

        let d = descriptor("rotate", "-0deg", "-0deg", Easing::EaseInOutBack);
        assert_eq!(d.value_at(400.0, 1000.0), "-0deg");
    }

    #[test]
    fn test_only_changing_components_are_eased() {
        let d = descriptor("viewBox", "0 0 100 100", "0 0 200 50", Easing::Linear);
        assert_eq!(d.value_at(500.0, 1000.0), "0 0 150 75");
    }

    #[test]
    fn test_colors_round_to_integers() {
        let d = descriptor("fill", "rgb(255, 255, 255)", "rgb(0, 0, 0)", Easing::Linear);
        assert!(d.is_color);
        assert_eq!(d.value_at(500.0, 1000.0), "rgb(128, 128, 128)");
        assert_eq!(d.value_at(1000.0, 1000.0), "rgb(0, 0, 0)");
    }

    #[test]
    fn test_component_mismatch_is_rejected() {
        let err = AnimatedPropertyDescriptor::new(
            "points",
            &Value::from("0"),
            &Value::from("1 2"),
            EasingSpec::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnimationError::ComponentMismatch {
                property: "points".to_string(),
                from: 1,
                to: 2
            }
        );
    }

    #[test]
    fn test_describe_parses_easing_frequency() {
        let request: AnimationRequest<ElementId> = AnimationRequest::new(Targets::Many(Vec::new()))
            .easing("easeInElastic 250")
            .property("opacity", pair(0, 1));
        let descriptors = describe_properties(&request).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].easing.easing, Easing::EaseInElastic);
        assert_eq!(descriptors[0].easing.frequency, Some(250.0));
        assert!(!descriptors[0].is_transform_function);
    }

    #[test]
    fn test_apply_progress_batches_transforms() {
        let host = MemoryHost::new();
        let el = host.create_element("div");
        let descriptors = vec![
            descriptor("translateX", "0px", "100px", Easing::Linear),
            descriptor("opacity", 0, 1, Easing::Linear),
            descriptor("rotate", "0deg", "90deg", Easing::Linear),
            descriptor("data-step", 0, 10, Easing::Linear),
        ];

        let progress = frame_values(&descriptors, 500.0, 1000.0);
        apply_progress(&host, &el, &descriptors, &progress);

        assert_eq!(
            host.style(&el, "transform").as_deref(),
            Some("translateX(50px) rotate(45deg)")
        );
        assert_eq!(host.style(&el, "opacity").as_deref(), Some("0.5"));
        assert_eq!(host.attribute(el, "data-step").as_deref(), Some("5"));
        // one opacity write, one attribute write, one composite transform
        assert_eq!(host.mutation_count(), 3);
    }

    #[test]
    fn test_will_change_hint() {
        let base = || AnimationRequest::<ElementId>::new(Targets::Many(Vec::new()));
        assert_eq!(will_change_hint(&base().property("r", pair(0, 1))), None);
        assert_eq!(
            will_change_hint(&base().property("opacity", 0)).as_deref(),
            Some("opacity")
        );
        assert_eq!(
            will_change_hint(&base().property("opacity", 0).property("scale", 2)).as_deref(),
            Some("transform,opacity")
        );
    }

    #[test]
    fn test_will_change_respects_existing_hint() {
        let host = MemoryHost::new();
        let fresh = host.create_element("div");
        let hinted = host.create_element("div");
        host.set_style(&hinted, "will-change", "contents");

        set_will_change(&host, &[fresh, hinted], "transform");
        assert_eq!(host.style(&fresh, "will-change").as_deref(), Some("transform"));
        assert_eq!(host.style(&hinted, "will-change").as_deref(), Some("contents"));
    }
}
