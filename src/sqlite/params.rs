use crate::types::{BindValue, Params, Value};

/// Convert a single caller [`Value`] into the engine-safe [`BindValue`] set.
///
/// First matching rule wins:
/// - dates become integer epoch milliseconds, so `DateTime::from_timestamp_millis` on the
///   stored value gives back the same instant and stored values sort numerically;
/// - undefined becomes NULL;
/// - raw buffers are copied into an owned byte array;
/// - everything else passes through.
#[must_use]
pub fn normalize_value(value: &Value) -> BindValue {
    match value {
        Value::Date(dt) => BindValue::Int(dt.timestamp_millis()),
        Value::Undefined | Value::Null => BindValue::Null,
        Value::Buffer(bytes) => BindValue::Blob(bytes.to_vec()),
        Value::Blob(bytes) => BindValue::Blob(bytes.clone()),
        Value::Int(i) => BindValue::Int(*i),
        Value::Float(f) => BindValue::Float(*f),
        Value::Text(s) => BindValue::Text(s.clone()),
        Value::Bool(b) => BindValue::Bool(*b),
        Value::BigInt(i) => BindValue::BigInt(*i),
    }
}

/// Normalize a whole parameter list.
///
/// Total: never fails, and `None` yields an empty list. Applied exactly once per call,
/// element by element (no recursion into nested values).
#[must_use]
pub fn normalize(params: Option<&Params>) -> Vec<BindValue> {
    params.map_or_else(Vec::new, |p| p.0.iter().map(normalize_value).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    #[test]
    fn absent_params_normalize_to_empty_list() {
        assert!(normalize(None).is_empty());
        assert!(normalize(Some(&Params::new())).is_empty());
    }

    #[test]
    fn dates_become_epoch_millis_that_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let out = normalize(Some(&Params::from(Value::Date(dt))));
        assert_eq!(out, vec![BindValue::Int(1_705_314_600_000)]);

        let BindValue::Int(ms) = out[0] else {
            panic!("expected integer");
        };
        assert_eq!(DateTime::from_timestamp_millis(ms).unwrap(), dt);
    }

    #[test]
    fn undefined_becomes_null_and_null_stays_null() {
        let out = normalize(Some(&Params::from(vec![Value::Undefined, Value::Null])));
        assert_eq!(out, vec![BindValue::Null, BindValue::Null]);
    }

    #[test]
    fn buffers_copy_into_byte_arrays() {
        let raw: Arc<[u8]> = Arc::from(&b"\x00\x01\xfe\xff"[..]);
        let out = normalize(Some(&Params::from(Value::Buffer(Arc::clone(&raw)))));
        let BindValue::Blob(bytes) = &out[0] else {
            panic!("expected blob");
        };
        assert_eq!(bytes.len(), raw.len());
        assert_eq!(bytes.as_slice(), &raw[..]);
    }

    #[test]
    fn other_values_pass_through_in_order() {
        let params = Params::from(vec![
            Value::Text("a".into()),
            Value::Int(7),
            Value::Float(1.5),
            Value::Bool(true),
            Value::BigInt(i64::MAX),
            Value::Blob(vec![1, 2]),
        ]);
        assert_eq!(
            normalize(Some(&params)),
            vec![
                BindValue::Text("a".into()),
                BindValue::Int(7),
                BindValue::Float(1.5),
                BindValue::Bool(true),
                BindValue::BigInt(i64::MAX),
                BindValue::Blob(vec![1, 2]),
            ]
        );
    }
}
