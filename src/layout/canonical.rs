//! Canonical JSON serialization.
//!
//! Produces a compact JSON encoding in which every object's keys are emitted
//! in ascending byte order. Two values have the same canonical form iff they
//! are the same JSON document up to key order and whitespace, so the
//! canonical form can be compared byte-for-byte to test structural equality.
//!
//! Numbers are normalized so that spellings of the same value agree: a float
//! with no fractional part that fits an integer type is written as that
//! integer (`1.0` as `1`, `1e2` as `100`), and any other float is written in
//! its shortest round-trip form.

use serde_json::{Number, Value};

/// Returns the canonical encoding of a JSON value.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Returns `true` if both values have byte-identical canonical encodings.
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    canonical_string(a) == canonical_string(b)
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(item, out);
            }
            out.push('}');
        }
        Value::String(s) => write_string(s, out),
        Value::Number(n) => write_number(n, out),
        // Null and Bool display as compact JSON.
        other => out.push_str(&other.to_string()),
    }
}

fn write_number(n: &Number, out: &mut String) {
    if n.is_i64() || n.is_u64() {
        out.push_str(&n.to_string());
        return;
    }
    let Some(f) = n.as_f64() else {
        out.push_str(&n.to_string());
        return;
    };
    // Bounds are exclusive: i64::MAX and u64::MAX round up to 2^63 and 2^64.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        out.push_str(&(f as i64).to_string());
    } else if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        out.push_str(&(f as u64).to_string());
    } else {
        out.push_str(&n.to_string());
    }
}

fn write_string(s: &str, out: &mut String) {
    // Display of a JSON string value is its escaped, quoted form.
    out.push_str(&Value::String(s.to_owned()).to_string());
}
