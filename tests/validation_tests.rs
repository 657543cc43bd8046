// Response validator properties
// Author: kelexine (https://github.com/kelexine)

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use wildlife_id::error::IdentifyError;
use wildlife_id::validation::{strip_code_fence, validate_response};

const OPTIONAL_FIELDS: [&str; 4] = [
    "scientificName",
    "confidence",
    "conservationSummary",
    "commonThreats",
];

fn free_text() -> impl Strategy<Value = String> {
    // Printable text including quotes, backticks and newlines
    "[a-zA-Z0-9 '`\"\\n.,()-]{1,40}"
}

fn identification_object() -> impl Strategy<Value = String> {
    (
        free_text(),
        free_text(),
        proptest::collection::vec(proptest::option::of(free_text()), 4),
    )
        .prop_map(|(species, status, optional)| {
            let mut map = Map::new();
            map.insert("speciesName".into(), Value::String(species));
            map.insert("isEndangeredStatus".into(), Value::String(status));
            for (field, value) in OPTIONAL_FIELDS.iter().zip(optional) {
                if let Some(value) = value {
                    map.insert((*field).into(), Value::String(value));
                }
            }
            serde_json::to_string_pretty(&Value::Object(map)).unwrap()
        })
}

proptest! {
    #[test]
    fn fenced_and_bare_replies_validate_identically(
        body in identification_object(),
        tag in prop_oneof![Just(""), Just("json")],
        pad in "[ \\n\\t]{0,3}",
    ) {
        let fenced = format!("{pad}```{tag}\n{body}\n```{pad}");
        let bare = validate_response(&body).unwrap();
        let unwrapped = validate_response(&fenced).unwrap();
        prop_assert_eq!(bare, unwrapped);
    }

    #[test]
    fn both_required_fields_suffice(body in identification_object()) {
        prop_assert!(validate_response(&body).is_ok());
    }

    #[test]
    fn missing_required_field_is_incomplete(
        body in identification_object(),
        drop_species in any::<bool>(),
    ) {
        let mut value: Value = serde_json::from_str(&body).unwrap();
        let field = if drop_species { "speciesName" } else { "isEndangeredStatus" };
        value.as_object_mut().unwrap().remove(field);

        let result = validate_response(&value.to_string());
        prop_assert!(matches!(result, Err(IdentifyError::IncompleteData)));
    }
}

#[test]
fn test_fence_without_newlines() {
    let body = json!({"speciesName": "Koala", "isEndangeredStatus": "Vulnerable"}).to_string();
    assert_eq!(strip_code_fence(&format!("```json{}```", body)), body);
}

#[test]
fn test_parse_error_keeps_original_text() {
    let err = validate_response("not json").unwrap_err();
    assert!(matches!(err, IdentifyError::MalformedResponse { .. }));
    assert_eq!(err.to_string(), "Failed to parse AI response. Raw text: not json");
}

#[test]
fn test_null_required_field_is_incomplete() {
    let body = r#"{"speciesName": null, "isEndangeredStatus": "Endangered"}"#;
    assert!(matches!(validate_response(body), Err(IdentifyError::IncompleteData)));
}
