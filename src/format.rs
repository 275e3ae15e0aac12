//! Display helpers shared by pages.

use wasm_bindgen::JsValue;

/// Render an RFC 3339 timestamp in the user's locale, falling back to the
/// raw string when the browser cannot parse it.
pub fn local_datetime(rfc3339: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(rfc3339));
    if date.get_time().is_nan() {
        return rfc3339.to_string();
    }
    date.to_locale_string("default", &JsValue::UNDEFINED)
        .as_string()
        .unwrap_or_else(|| rfc3339.to_string())
}

/// CSS modifier for a probability, used to colour bars and badges.
pub fn probability_class(probability: u8) -> &'static str {
    match probability {
        70..=100 => "prob-high",
        40..=69 => "prob-medium",
        _ => "prob-low",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_class_bands() {
        assert_eq!(probability_class(85), "prob-high");
        assert_eq!(probability_class(70), "prob-high");
        assert_eq!(probability_class(50), "prob-medium");
        assert_eq!(probability_class(10), "prob-low");
    }
}
