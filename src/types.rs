//! Shared types passed between the validator, resolver, partitioner and
//! generators.
//!
//! Input types ([`Block`], [`CoverImage`], [`QueryItem`]) keep every field
//! optional so they deserialize from loosely-shaped job files and the
//! [`validate`](crate::validate) module can report exactly which field is
//! missing. Once validated, the generators work with [`MediaQuery`] and
//! [`Target`], where "width or height, never both" is enforced by the type.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::validate::InputError;

/// Extra transformation parameters forwarded to the backend.
///
/// Insertion-ordered: base params first, computed `input`/`width`/`height`
/// inserted afterwards (overwriting a base entry in place).
pub type Params = serde_json::Map<String, Value>;

/// One logical image placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverImage>,
}

/// Source image metadata as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    /// Identifier or URL the backend understands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Natural pixel width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Natural pixel height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Block {
    /// Block whose cover has all three fields present.
    pub fn with_cover(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            cover: Some(CoverImage {
                src: Some(src.into()),
                width: Some(width),
                height: Some(height),
            }),
        }
    }
}

/// Axis a media query or resize applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Width,
    Height,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Property::Width => "width",
            Property::Height => "height",
        }
    }

    /// Resize target for this axis.
    pub fn target(self, value: f64) -> Target {
        match self {
            Property::Width => Target::Width(value),
            Property::Height => Target::Height(value),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width" => Ok(Property::Width),
            "height" => Ok(Property::Height),
            other => Err(InputError::InvalidProperty(other.to_string())),
        }
    }
}

/// Requested size on exactly one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Width(f64),
    Height(f64),
}

/// A media query item as supplied by the caller. Checked into a
/// [`MediaQuery`] before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl QueryItem {
    /// Check required fields in order: query, selector, then exactly one of
    /// width/height.
    pub fn to_media_query(&self) -> Result<MediaQuery, InputError> {
        let query = self.query.as_ref().ok_or(InputError::MissingQuery)?;
        let selector = self.selector.as_ref().ok_or(InputError::MissingSelector)?;
        let target = match (self.width, self.height) {
            (None, None) => return Err(InputError::MissingTarget),
            (Some(_), Some(_)) => return Err(InputError::ConflictingTarget),
            (Some(w), None) => Target::Width(w),
            (None, Some(h)) => Target::Height(h),
        };
        Ok(MediaQuery {
            query: query.clone(),
            selector: selector.clone(),
            target,
        })
    }
}

/// A validated responsive CSS rule to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    /// Media condition, e.g. `(max-width: 399px)`.
    pub query: String,
    /// CSS selector receiving the background image.
    pub selector: String,
    pub target: Target,
}

/// Output of the srcset generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Srcset {
    /// Full-resolution URL.
    pub src: String,
    /// Comma-and-space separated `"<url> <N>w"` entries.
    pub srcset: String,
}

/// JSON value for a computed pixel dimension.
///
/// Integral values become JSON integers so they render as `300` rather than
/// `300.0`; fractional values are passed through unrounded.
pub fn pixel_value(px: f64) -> Value {
    if px.is_finite() && px.fract() == 0.0 && px.abs() < 9_007_199_254_740_992.0 {
        Value::from(px as i64)
    } else {
        Number::from_f64(px).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Parse a `key=value` pair into a param entry.
///
/// Values are tried as bool, then number, then kept as a string. A number
/// is only taken when it prints back to the same text, so `000000` and
/// `1.10` stay strings.
pub fn parse_param(pair: &str) -> Result<(String, Value), String> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{pair}'"));
    }
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && pixel_value(n).to_string() == raw => pixel_value(n),
            _ => Value::String(raw.to_string()),
        },
    };
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // QueryItem checks
    // =========================================================================

    fn item(width: Option<f64>, height: Option<f64>) -> QueryItem {
        QueryItem {
            query: Some("(max-width: 399px)".into()),
            selector: Some(".hero".into()),
            width,
            height,
        }
    }

    #[test]
    fn query_item_with_width_becomes_width_target() {
        let mq = item(Some(399.0), None).to_media_query().unwrap();
        assert_eq!(mq.target, Target::Width(399.0));
        assert_eq!(mq.selector, ".hero");
    }

    #[test]
    fn query_item_with_height_becomes_height_target() {
        let mq = item(None, Some(200.0)).to_media_query().unwrap();
        assert_eq!(mq.target, Target::Height(200.0));
    }

    #[test]
    fn query_item_requires_query_before_selector() {
        let err = QueryItem::default().to_media_query().unwrap_err();
        assert!(matches!(err, InputError::MissingQuery));
    }

    #[test]
    fn query_item_requires_selector() {
        let mut q = item(Some(1.0), None);
        q.selector = None;
        assert!(matches!(
            q.to_media_query().unwrap_err(),
            InputError::MissingSelector
        ));
    }

    #[test]
    fn query_item_rejects_missing_and_conflicting_targets() {
        assert!(matches!(
            item(None, None).to_media_query().unwrap_err(),
            InputError::MissingTarget
        ));
        assert!(matches!(
            item(Some(1.0), Some(2.0)).to_media_query().unwrap_err(),
            InputError::ConflictingTarget
        ));
    }

    // =========================================================================
    // Property
    // =========================================================================

    #[test]
    fn property_parses_known_names() {
        assert_eq!("width".parse::<Property>().unwrap(), Property::Width);
        assert_eq!("height".parse::<Property>().unwrap(), Property::Height);
    }

    #[test]
    fn property_rejects_other_names() {
        let err = "depth".parse::<Property>().unwrap_err();
        assert!(matches!(err, InputError::InvalidProperty(ref p) if p == "depth"));
    }

    #[test]
    fn property_target_matches_axis() {
        assert_eq!(Property::Width.target(10.0), Target::Width(10.0));
        assert_eq!(Property::Height.target(10.0), Target::Height(10.0));
    }

    // =========================================================================
    // Param values
    // =========================================================================

    #[test]
    fn pixel_value_integral_is_integer() {
        assert_eq!(pixel_value(300.0).to_string(), "300");
    }

    #[test]
    fn pixel_value_fraction_is_passed_through() {
        assert_eq!(pixel_value(266.5).to_string(), "266.5");
    }

    #[test]
    fn parse_param_types() {
        assert_eq!(parse_param("quality=80").unwrap().1, Value::from(80));
        assert_eq!(parse_param("sharp=true").unwrap().1, Value::Bool(true));
        assert_eq!(
            parse_param("filter=sepia").unwrap(),
            ("filter".to_string(), Value::String("sepia".into()))
        );
    }

    #[test]
    fn parse_param_keeps_number_text_that_would_change() {
        assert_eq!(parse_param("bg=000000").unwrap().1, Value::String("000000".into()));
        assert_eq!(parse_param("v=1.10").unwrap().1, Value::String("1.10".into()));
        assert_eq!(parse_param("n=+5").unwrap().1, Value::String("+5".into()));
        assert_eq!(parse_param("h=266.5").unwrap().1, Value::from(266.5));
        assert_eq!(parse_param("dx=-4").unwrap().1, Value::from(-4));
    }

    #[test]
    fn parse_param_keeps_equals_in_value() {
        let (k, v) = parse_param("q=a=b").unwrap();
        assert_eq!(k, "q");
        assert_eq!(v, Value::String("a=b".into()));
    }

    #[test]
    fn parse_param_rejects_malformed() {
        assert!(parse_param("nope").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn block_deserializes_with_missing_fields() {
        let block: Block = serde_json::from_str(r#"{"cover": {"src": "a.jpg"}}"#).unwrap();
        let cover = block.cover.unwrap();
        assert_eq!(cover.src.as_deref(), Some("a.jpg"));
        assert_eq!(cover.width, None);
    }
}
