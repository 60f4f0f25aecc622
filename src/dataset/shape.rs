//! Structural shape checking of raw JSON before typed decoding
//!
//! Shape rules:
//! - All required fields are present
//! - No undeclared fields exist
//! - No null values
//! - JSON types match exactly (no coercion of numbers to strings)
//!
//! Every violation is collected with its field path; checking never stops
//! at the first problem.

use serde_json::{Map, Value};

use super::errors::Violation;

/// Expected JSON shape of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    String,
    /// Homogeneous array
    Array(Box<Shape>),
    /// Object with declared fields; anything undeclared is rejected
    Object(Vec<FieldSpec>),
    /// Any of the listed shapes
    OneOf(Vec<Shape>),
}

impl Shape {
    fn array(element: Shape) -> Self {
        Shape::Array(Box::new(element))
    }

    pub fn type_name(&self) -> String {
        match self {
            Shape::String => "string".into(),
            Shape::Array(element) => format!("array of {}", element.type_name()),
            Shape::Object(_) => "object".into(),
            Shape::OneOf(shapes) => shapes
                .iter()
                .map(Shape::type_name)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Whether `value` matches this shape at the top level only.
    fn accepts_kind(&self, value: &Value) -> bool {
        match self {
            Shape::String => value.is_string(),
            Shape::Array(_) => value.is_array(),
            Shape::Object(_) => value.is_object(),
            Shape::OneOf(shapes) => shapes.iter().any(|s| s.accepts_kind(value)),
        }
    }
}

/// Declared field of an object shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl FieldSpec {
    fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

fn annotated_cell_shape() -> Shape {
    Shape::Object(vec![
        FieldSpec::required("value", Shape::String),
        FieldSpec::required("strategy", Shape::array(Shape::String)),
    ])
}

fn source_table_shape() -> Shape {
    Shape::Object(vec![
        FieldSpec::required("table_title", Shape::String),
        FieldSpec::required("header", Shape::array(Shape::String)),
        FieldSpec::required("data", Shape::array(Shape::array(Shape::String))),
        FieldSpec::optional(
            "primary_key",
            Shape::OneOf(vec![Shape::String, Shape::array(Shape::String)]),
        ),
    ])
}

fn table_extraction_shape() -> Shape {
    Shape::Object(vec![
        FieldSpec::required("header", Shape::array(Shape::array(Shape::String))),
        FieldSpec::required("data", Shape::array(Shape::array(annotated_cell_shape()))),
    ])
}

/// Shape of one case record.
pub fn case_shape() -> Shape {
    Shape::Object(vec![
        FieldSpec::required("name", Shape::String),
        FieldSpec::required("table", Shape::array(source_table_shape())),
        FieldSpec::required("document", Shape::String),
        FieldSpec::required("ground_truth", Shape::array(table_extraction_shape())),
    ])
}

/// Checks one case value and returns every shape violation found.
///
/// Paths are relative to the case. Violations carry the case name when the
/// `name` field is a string.
pub fn check_case(value: &Value) -> Vec<Violation> {
    let mut out = Vec::new();
    check_value(value, &case_shape(), "", &mut out);

    let name = value.get("name").and_then(Value::as_str);
    out.into_iter().map(|v| v.in_case(None, name)).collect()
}

/// Checks `value` against `shape`, appending violations to `out`.
pub fn check_value(value: &Value, shape: &Shape, path: &str, out: &mut Vec<Violation>) {
    if value.is_null() {
        out.push(Violation::null_value(display_path(path)));
        return;
    }

    match shape {
        Shape::String => {
            if !value.is_string() {
                out.push(type_mismatch(path, shape, value));
            }
        }
        Shape::Array(element) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_value(item, element, &format!("{}[{}]", path, i), out);
                }
            }
            None => out.push(type_mismatch(path, shape, value)),
        },
        Shape::Object(fields) => match value.as_object() {
            Some(obj) => check_object(obj, fields, path, out),
            None => out.push(type_mismatch(path, shape, value)),
        },
        Shape::OneOf(shapes) => match shapes.iter().find(|s| s.accepts_kind(value)) {
            Some(matched) => check_value(value, matched, path, out),
            None => out.push(type_mismatch(path, shape, value)),
        },
    }
}

fn check_object(obj: &Map<String, Value>, fields: &[FieldSpec], path: &str, out: &mut Vec<Violation>) {
    for key in obj.keys() {
        if !fields.iter().any(|f| f.name == key) {
            out.push(Violation::unexpected_field(make_path(path, key)));
        }
    }

    for field in fields {
        let field_path = make_path(path, field.name);
        match obj.get(field.name) {
            Some(value) => check_value(value, &field.shape, &field_path, out),
            None if field.required => out.push(Violation::missing_field(field_path)),
            None => {}
        }
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$root"
    } else {
        path
    }
}

fn type_mismatch(path: &str, shape: &Shape, actual: &Value) -> Violation {
    Violation::type_mismatch(display_path(path), shape.type_name(), json_type_name(actual))
}
