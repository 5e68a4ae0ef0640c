//! Response envelope unwrapping.
//!
//! List endpoints answer in one of three shapes: a bare array, `{data: [...]}`
//! or the paginated `{data: {data: [...]}}`. Resource services call
//! [`unwrap_envelope`] instead of branching on the shape themselves.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiResult;

/// Extract the item list from a response body.
///
/// Tries, in order: a top-level array, `.data` as an array, `.data.data` as
/// an array. Anything else yields an empty list.
pub fn unwrap_envelope(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Unwrap an envelope and deserialize every item into `T`.
pub fn unwrap_envelope_as<T: DeserializeOwned>(body: Value) -> ApiResult<Vec<T>> {
    unwrap_envelope(body)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    #[rstest]
    #[case::bare_array(json!([1, 2]), vec![json!(1), json!(2)])]
    #[case::data_array(json!({"data": [1]}), vec![json!(1)])]
    #[case::paginated(json!({"data": {"data": [3], "total": 1}}), vec![json!(3)])]
    #[case::data_not_array(json!({"data": {"id": 1}}), vec![])]
    #[case::scalar(json!("nope"), vec![])]
    #[case::null(Value::Null, vec![])]
    #[case::missing_data(json!({"items": [1]}), vec![])]
    fn test_unwrap_envelope(#[case] body: Value, #[case] expected: Vec<Value>) {
        assert_eq!(unwrap_envelope(body), expected);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Classroom {
        id: i64,
        name: String,
    }

    #[test]
    fn test_unwrap_envelope_as_typed() {
        let body = json!({"data": {"data": [{"id": 1, "name": "A-101"}], "page": 1}});
        let rooms: Vec<Classroom> = unwrap_envelope_as(body).unwrap();
        assert_eq!(
            rooms,
            vec![Classroom {
                id: 1,
                name: "A-101".to_string()
            }]
        );
    }

    #[test]
    fn test_unwrap_envelope_as_bad_item() {
        let body = json!([{"id": "x"}]);
        let result = unwrap_envelope_as::<Classroom>(body);
        assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
    }
}
