use crate::api::model::Color;
use crate::errors::InvalidColorFormat;
use serde_json::Value;

/// Parse a nested `{red, green, blue, alpha}` object into a [`Color`].
/// Missing or non-numeric components fall back to their defaults (alpha 1.0,
/// channels 0.0). Out-of-range floats pass through unchanged; the remote API
/// owns that validation.
pub fn parse_color(value: &Value) -> Result<Color, InvalidColorFormat> {
    let Value::Object(fields) = value else {
        return Err(InvalidColorFormat);
    };

    let component =
        |key: &str, default: f64| fields.get(key).and_then(Value::as_f64).unwrap_or(default);

    Ok(Color {
        red: component("red", 0.0),
        green: component("green", 0.0),
        blue: component("blue", 0.0),
        alpha: component("alpha", 1.0),
    })
}
