//! Parameter normalization
//!
//! Turns a loosely specified [`AnimationRequest`] into a resolved one. The
//! stages run in a fixed order and each leaves an already-normalized request
//! untouched:
//!
//! 1. [`fill_defaults`] - duration and easing
//! 2. [`build_missing_pairs`] - bare style values become `[default, value]`
//! 3. [`add_units`] - `px` / `deg` suffixes on transform functions
//! 4. [`ensure_rgb`] - hex colors on attributes become `rgb(...)`
//! 5. [`resolve_elements`] - selector / element / collection to a list
//! 6. [`apply_initial_direction`] - `Reverse` swaps every pair
//!
//! Reversal runs last so it swaps values that are already unit-suffixed and
//! color-canonical.

use crate::config::AnimationDefaults;
use crate::error::{AnimationError, Result};
use crate::request::{AnimationRequest, Direction, PropertyValue, Targets};
use crate::value::{hex_to_rgb, Value};
use kinetic_core::ElementSource;

/// Style properties the engine writes as CSS rather than as attributes
pub const STYLE_PROPERTIES: [&str; 15] = [
    "opacity",
    "translateX",
    "translateY",
    "scale",
    "rotate",
    "scaleX",
    "scaleY",
    "rotateX",
    "rotateY",
    "perspective",
    "skewX",
    "skewY",
    "translateZ",
    "rotateZ",
    "scaleZ",
];

pub fn is_style_property(name: &str) -> bool {
    STYLE_PROPERTIES.contains(&name)
}

/// Every supported style property except opacity
pub fn is_transform_function(name: &str) -> bool {
    name != "opacity" && is_style_property(name)
}

/// Start value used when a style property is given only a target
pub fn default_style_value(name: &str) -> Value {
    match name {
        "opacity" | "scale" | "scaleX" | "scaleY" => Value::Number(1.0),
        _ => Value::Number(0.0),
    }
}

/// Unit appended to unitless values of a transform function, if any
pub fn default_unit(transform_function: &str) -> Option<&'static str> {
    if transform_function.contains("scale") {
        None
    } else if transform_function.contains("rotate") || transform_function.contains("skew") {
        Some("deg")
    } else {
        Some("px")
    }
}

/// Run every stage in order
pub fn normalize<E, S>(
    request: AnimationRequest<E>,
    source: &S,
    defaults: &AnimationDefaults,
) -> Result<AnimationRequest<E>>
where
    E: Clone,
    S: ElementSource<Element = E> + ?Sized,
{
    let request = fill_defaults(request, defaults);
    let request = build_missing_pairs(request)?;
    let request = add_units(request);
    let request = ensure_rgb(request)?;
    let request = resolve_elements(request, source);
    Ok(apply_initial_direction(request))
}

/// Stage 1: fill duration and easing. Delay, callbacks, loop and direction
/// stay absent when unset.
pub fn fill_defaults<E>(
    mut request: AnimationRequest<E>,
    defaults: &AnimationDefaults,
) -> AnimationRequest<E> {
    if request.duration.is_none() {
        request.duration = Some(defaults.duration);
    }
    if request.easing.is_none() {
        request.easing = Some(defaults.easing.clone());
    }
    request
}

/// Stage 2: wrap bare style values as `[default, value]`.
///
/// Attributes have no type default, so a bare attribute value is an error.
pub fn build_missing_pairs<E>(mut request: AnimationRequest<E>) -> Result<AnimationRequest<E>> {
    for (name, value) in request.properties.iter_mut() {
        let PropertyValue::Single(target) = value else {
            continue;
        };
        if !is_style_property(name) {
            return Err(AnimationError::MissingStartValue(name.clone()));
        }
        *value = PropertyValue::Pair(default_style_value(name), target.clone());
    }
    Ok(request)
}

/// Stage 3: give every transform-function value an explicit unit
pub fn add_units<E>(mut request: AnimationRequest<E>) -> AnimationRequest<E> {
    for (name, value) in request.properties.iter_mut() {
        if !is_transform_function(name) {
            continue;
        }
        let Some(unit) = default_unit(name) else {
            continue;
        };
        if let PropertyValue::Pair(from, to) = value {
            for v in [from, to] {
                if !v.has_unit() {
                    *v = v.with_unit(unit);
                }
            }
        }
    }
    request
}

/// Stage 4: canonicalize hex colors on attribute properties
pub fn ensure_rgb<E>(mut request: AnimationRequest<E>) -> Result<AnimationRequest<E>> {
    for (name, value) in request.properties.iter_mut() {
        if is_style_property(name) || !value.values().any(Value::is_hex) {
            continue;
        }
        *value = value.map_values(|v| hex_to_rgb(&v.to_string()).map(Value::Text))?;
    }
    Ok(request)
}

/// Stage 5: resolve targets into an ordered element list
pub fn resolve_elements<E, S>(mut request: AnimationRequest<E>, source: &S) -> AnimationRequest<E>
where
    E: Clone,
    S: ElementSource<Element = E> + ?Sized,
{
    if !request.elements.is_resolved() {
        request.elements = Targets::Many(request.elements.resolve(source));
    }
    request
}

/// Stage 6: pre-apply `Reverse`. `Alternate` only takes effect on loop re-entry.
pub fn apply_initial_direction<E>(request: AnimationRequest<E>) -> AnimationRequest<E> {
    if request.direction == Some(Direction::Reverse) {
        reverse_pairs(request)
    } else {
        request
    }
}

/// Swap `from` and `to` of every animated property
pub fn reverse_pairs<E>(mut request: AnimationRequest<E>) -> AnimationRequest<E> {
    for value in request.properties.values_mut() {
        *value = std::mem::replace(value, PropertyValue::Single(Value::Number(0.0))).reversed();
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::pair;
    use kinetic_core::{ElementId, MemoryHost};

    fn request() -> AnimationRequest<ElementId> {
        AnimationRequest::new(Targets::Many(Vec::new()))
    }

    #[test]
    fn test_fill_defaults_only_touches_duration_and_easing() {
        let filled = fill_defaults(request(), &AnimationDefaults::default());
        assert_eq!(filled.duration, Some(1000.0));
        assert_eq!(filled.easing.as_deref(), Some("easeOutElastic"));
        assert_eq!(filled.delay, None);
        assert_eq!(filled.direction, None);
        assert!(!filled.looping);

        let kept = fill_defaults(
            request().duration(200.0).easing("linear"),
            &AnimationDefaults::default(),
        );
        assert_eq!(kept.duration, Some(200.0));
        assert_eq!(kept.easing.as_deref(), Some("linear"));
    }

    #[test]
    fn test_missing_pairs_use_type_defaults() {
        let built = build_missing_pairs(
            request()
                .property("opacity", 0.5)
                .property("scaleX", 2)
                .property("translateY", 40)
                .property("rotate", pair(10, 20)),
        )
        .unwrap();

        assert_eq!(built.property_value("opacity"), Some(&pair(1, 0.5)));
        assert_eq!(built.property_value("scaleX"), Some(&pair(1, 2)));
        assert_eq!(built.property_value("translateY"), Some(&pair(0, 40)));
        assert_eq!(built.property_value("rotate"), Some(&pair(10, 20)));
    }

    #[test]
    fn test_bare_attribute_value_is_rejected() {
        let err = build_missing_pairs(request().property("r", 20)).unwrap_err();
        assert_eq!(err, AnimationError::MissingStartValue("r".to_string()));
    }

    #[test]
    fn test_unit_table_for_every_transform_function() {
        for name in STYLE_PROPERTIES {
            let normalized = add_units(build_missing_pairs(request().property(name, 5)).unwrap());
            let expected = match name {
                "opacity" => pair(1, 5),
                "scale" | "scaleX" | "scaleY" => pair(1, 5),
                "scaleZ" => pair(0, 5),
                "rotate" | "rotateX" | "rotateY" | "rotateZ" | "skewX" | "skewY" => {
                    pair("0deg", "5deg")
                }
                _ => pair("0px", "5px"),
            };
            assert_eq!(normalized.property_value(name), Some(&expected), "{name}");
        }
    }

    #[test]
    fn test_existing_units_are_kept() {
        let normalized = add_units(
            request()
                .property("translateX", pair("10%", 50))
                .property("rotate", pair("1turn", "0.5turn")),
        );
        assert_eq!(normalized.property_value("translateX"), Some(&pair("10%", "50px")));
        assert_eq!(normalized.property_value("rotate"), Some(&pair("1turn", "0.5turn")));
    }

    #[test]
    fn test_hex_colors_on_attributes_become_rgb() {
        let normalized = ensure_rgb(
            request()
                .property("fill", pair("#fff", "rgb(0, 0, 0)"))
                .property("stroke", pair("rgb(1, 2, 3)", "rgb(4, 5, 6)")),
        )
        .unwrap();
        assert_eq!(
            normalized.property_value("fill"),
            Some(&pair("rgb(255, 255, 255)", "rgb(0, 0, 0)"))
        );
        assert_eq!(
            normalized.property_value("stroke"),
            Some(&pair("rgb(1, 2, 3)", "rgb(4, 5, 6)"))
        );

        let err = ensure_rgb(request().property("fill", pair("#fff", "red"))).unwrap_err();
        assert_eq!(err, AnimationError::InvalidColor("red".to_string()));
    }

    #[test]
    fn test_resolve_elements_from_selector() {
        let host = MemoryHost::new();
        let a = host.create_element("circle");
        let _b = host.create_element("rect");
        let c = host.create_element("circle");

        let resolved = resolve_elements(AnimationRequest::new("circle"), &host);
        assert_eq!(resolved.elements, Targets::Many(vec![a, c]));

        let resolved = resolve_elements(AnimationRequest::new(Targets::one(a)), &host);
        assert_eq!(resolved.elements, Targets::Many(vec![a]));
    }

    #[test]
    fn test_reverse_direction_is_pre_applied() {
        let host = MemoryHost::new();
        let reversed = normalize(
            request()
                .property("translateX", 100)
                .direction(Direction::Reverse),
            &host,
            &AnimationDefaults::default(),
        )
        .unwrap();
        assert_eq!(reversed.property_value("translateX"), Some(&pair("100px", "0px")));

        let alternate = normalize(
            request()
                .property("translateX", 100)
                .direction(Direction::Alternate),
            &host,
            &AnimationDefaults::default(),
        )
        .unwrap();
        assert_eq!(alternate.property_value("translateX"), Some(&pair("0px", "100px")));
    }

    #[test]
    fn test_normalize_is_idempotent_without_reverse() {
        let host = MemoryHost::new();
        let defaults = AnimationDefaults::default();
        let once = normalize(
            request()
                .property("translateX", 100)
                .property("opacity", 0)
                .property("fill", pair("#000", "#0f0")),
            &host,
            &defaults,
        )
        .unwrap();
        let twice = normalize(once.clone(), &host, &defaults).unwrap();
        assert_eq!(once.properties, twice.properties);
        assert_eq!(
            twice.property_value("fill"),
            Some(&pair("rgb(0, 0, 0)", "rgb(0, 255, 0)"))
        );
    }
}
