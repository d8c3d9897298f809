/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use serde_json::Value;

/// Longest array rendered element by element in the detail pane.
const MAX_INLINE_ITEMS: usize = 8;

/// Format a JSON value into a short, single-line representation for
/// the detail pane.
///
/// Scalars render as-is (strings unquoted). Short arrays of scalars
/// are listed (`[0, 1, 2]`); longer arrays and nested values are
/// summarized by their size (`[12]`, `{5}`).
pub(crate) fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) if arr.len() <= MAX_INLINE_ITEMS && arr.iter().all(is_scalar) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Array(arr) => format!("[{}]", arr.len()),
        Value::Object(obj) => format!("{{{}}}", obj.len()),
    }
}

fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Array(_) | Value::Object(_))
}

/// Format a CRUSH weight or reweight with fixed precision.
pub(crate) fn format_weight(v: &Value) -> Option<String> {
    v.as_f64().map(|w| format!("{:.5}", w))
}

/// Render a detail field: weights get fixed precision, everything
/// else goes through [`format_value`].
pub(crate) fn format_field(key: &str, v: &Value) -> String {
    match key {
        "crush_weight" | "reweight" | "primary_affinity" => {
            format_weight(v).unwrap_or_else(|| format_value(v))
        }
        _ => format_value(v),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_render_as_is() {
        assert_eq!(format_value(&json!("hdd")), "hdd");
        assert_eq!(format_value(&json!(-3)), "-3");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&Value::Null), "null");
    }

    #[test]
    fn short_arrays_are_listed() {
        assert_eq!(format_value(&json!([0, 1, 2])), "[0, 1, 2]");
        assert_eq!(format_value(&json!([])), "[]");
    }

    #[test]
    fn long_or_nested_values_are_summarized() {
        let long: Vec<i64> = (0..20).collect();
        assert_eq!(format_value(&json!(long)), "[20]");
        assert_eq!(format_value(&json!([[1], [2]])), "[2]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2}");
    }

    #[test]
    fn weights_get_fixed_precision() {
        assert_eq!(format_field("crush_weight", &json!(0.0194)), "0.01940");
        assert_eq!(format_field("reweight", &json!(1)), "1.00000");
        assert_eq!(format_field("reweight", &json!("n/a")), "n/a");
        assert_eq!(format_field("device_class", &json!("ssd")), "ssd");
    }
}
