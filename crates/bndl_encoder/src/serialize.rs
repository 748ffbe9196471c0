// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical value tokens.
//!
//! Shapes are tried in a fixed order: resource reference, numeric tuple,
//! boolean, number, string. A value matching none of them has no token and
//! is omitted by callers.

use crate::diagnostics::Diagnostics;
use bndl_graph::{ResourceKind, ResourceRef, Value};

/// Sentinel wrapping string tokens
pub const STRING_SENTINEL: &str = "©";

/// Token for boolean true
pub const TRUE_TOKEN: &str = "<True>";

/// Token for boolean false
pub const FALSE_TOKEN: &str = "<False>";

/// Sentinel glyph for a resource category, `None` for unknown categories
pub fn resource_sentinel(kind: &ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Material => Some("❆"),
        ResourceKind::Object => Some("⊞"),
        ResourceKind::Collection => Some("✸"),
        ResourceKind::Image => Some("✷"),
        ResourceKind::Mesh => Some("⧉"),
        ResourceKind::Curve => Some("𝒞"),
        ResourceKind::Other(_) => None,
    }
}

/// Boolean token
pub fn bool_token(value: bool) -> &'static str {
    if value {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

/// Render a number in fixed-point with trailing zeros stripped.
///
/// Negative zero (including values that round to it) renders as `0`.
/// Non-finite numbers have no rendering.
pub fn format_number(value: f64, decimals: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    Some(text)
}

/// Wrap `name` in `mark`, doubling every embedded `mark`
pub(crate) fn wrap_escaped(name: &str, mark: &str, diagnostics: &mut Diagnostics) -> String {
    if name.contains(mark) {
        diagnostics.warn(format!(
            "Name contains sentinel {mark}, escaping in output: {name:?}"
        ));
    }
    let escaped = name.replace(mark, &format!("{mark}{mark}"));
    format!("{mark}{escaped}{mark}")
}

/// Token for a resource reference; unknown categories have none
pub fn serialize_resource(resource: &ResourceRef, diagnostics: &mut Diagnostics) -> Option<String> {
    match resource_sentinel(&resource.kind) {
        Some(mark) => Some(wrap_escaped(&resource.name, mark, diagnostics)),
        None => {
            diagnostics.warn(format!(
                "Unsupported resource category {:?} for '{}', omitting value",
                resource.kind, resource.name
            ));
            None
        }
    }
}

/// Serialize any value to its canonical token
pub fn serialize_value(
    value: &Value,
    decimals: usize,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match value {
        Value::Resource(resource) => serialize_resource(resource, diagnostics),
        Value::Tuple(items) => {
            if items.is_empty() {
                return None;
            }
            let parts = items
                .iter()
                .map(|x| format_number(*x, decimals))
                .collect::<Option<Vec<_>>>();
            match parts {
                Some(parts) => Some(format!("<{}>", parts.join(", "))),
                None => {
                    diagnostics.warn(format!("Non-finite tuple {items:?}, omitting value"));
                    None
                }
            }
        }
        Value::Bool(b) => Some(bool_token(*b).to_string()),
        Value::Int(i) => Some(format!("<{i}>")),
        Value::Float(f) => match format_number(*f, decimals) {
            Some(text) => Some(format!("<{text}>")),
            None => {
                diagnostics.warn(format!("Non-finite number {f}, omitting value"));
                None
            }
        },
        Value::String(s) => Some(wrap_escaped(s, STRING_SENTINEL, diagnostics)),
        Value::Unsupported(type_name) => {
            tracing::debug!("No token for value of type {type_name}");
            None
        }
    }
}

/// Parse the numbers inside a `<a, b, c>` token.
///
/// `None` when the token is not bracketed or any part is not a number.
pub fn parse_numeric_token(token: &str) -> Option<Vec<f64>> {
    let inner = token.strip_prefix('<')?.strip_suffix('>')?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: impl Into<Value>) -> Option<String> {
        serialize_value(&value.into(), 6, &mut Diagnostics::new())
    }

    #[test]
    fn test_number_canonicalization() {
        assert_eq!(token(2.5).as_deref(), Some("<2.5>"));
        assert_eq!(token(2.500000001), token(2.5));
        assert_eq!(token(-0.0).as_deref(), Some("<0>"));
        assert_eq!(token(-0.0000001).as_deref(), Some("<0>"));
        assert_eq!(token(3.0).as_deref(), Some("<3>"));
        assert_eq!(token(1e20).as_deref(), Some("<100000000000000000000>"));
        assert_eq!(token(7_i64).as_deref(), Some("<7>"));
    }

    #[test]
    fn test_zero_decimals_keeps_integers() {
        assert_eq!(format_number(30.0, 0).as_deref(), Some("30"));
        assert_eq!(format_number(-0.2, 0).as_deref(), Some("0"));
    }

    #[test]
    fn test_non_finite_is_omitted() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(serialize_value(&Value::Float(f64::NAN), 6, &mut diagnostics), None);
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_tuples_and_bools() {
        assert_eq!(token([1.0, 0.5, -0.0]).as_deref(), Some("<1, 0.5, 0>"));
        assert_eq!(token(Value::Tuple(Vec::new())), None);
        assert_eq!(token(true).as_deref(), Some("<True>"));
        assert_eq!(token(false).as_deref(), Some("<False>"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(token("").as_deref(), Some("©©"));
        assert_eq!(token("Hello").as_deref(), Some("©Hello©"));
        assert_eq!(token("a©b").as_deref(), Some("©a©©b©"));
    }

    #[test]
    fn test_resource_escaping_warns() {
        let mut diagnostics = Diagnostics::new();
        let value = Value::Resource(ResourceRef::new(ResourceKind::Material, "Steel❆2"));
        let token = serialize_value(&value, 6, &mut diagnostics);
        assert_eq!(token.as_deref(), Some("❆Steel❆❆2❆"));
        assert_eq!(diagnostics.warnings().len(), 1);

        let mut clean = Diagnostics::new();
        let value = Value::Resource(ResourceRef::new(ResourceKind::Curve, "Path"));
        assert_eq!(serialize_value(&value, 6, &mut clean).as_deref(), Some("𝒞Path𝒞"));
        assert!(clean.is_empty());
    }

    #[test]
    fn test_unknown_shapes_have_no_token() {
        let value = Value::Resource(ResourceRef::new(ResourceKind::Other("Light".into()), "Sun"));
        assert_eq!(token(value), None);
        assert_eq!(token(Value::Unsupported("Matrix".into())), None);
    }

    #[test]
    fn test_parse_numeric_token() {
        assert_eq!(parse_numeric_token("<1, 0, 0>"), Some(vec![1.0, 0.0, 0.0]));
        assert_eq!(parse_numeric_token("<2.5>"), Some(vec![2.5]));
        assert_eq!(parse_numeric_token("<True>"), None);
        assert_eq!(parse_numeric_token("©x©"), None);
    }
}
