//! Failure modes: every error aborts the conversion and no markup is returned.

use crate::common::{basic_formats, delta};
use delta_babel::{
    convert, convert_delta, ConvertError, ConvertOptions, FormatDescriptor, Operation,
    UnknownAttributes,
};
use serde_json::json;

#[test]
fn test_operation_without_insert() {
    let input = delta(json!({"ops": [{"attributes": {"bold": true}}]}));
    let result = convert_delta(&input, &basic_formats(), &ConvertOptions::default());

    match result {
        Err(ConvertError::InvalidOperation { index }) => assert_eq!(index, 0),
        other => panic!("Expected InvalidOperation error, got {other:?}"),
    }
}

#[test]
fn test_retain_and_delete_are_rejected() {
    let input = delta(json!([{"insert": "ok\n"}, {"retain": 3}]));
    let result = convert_delta(&input, &basic_formats(), &ConvertOptions::default());
    assert!(matches!(
        result,
        Err(ConvertError::InvalidOperation { index: 1 })
    ));

    let input = delta(json!([{"delete": 3}]));
    let result = convert_delta(&input, &basic_formats(), &ConvertOptions::default());
    assert!(matches!(
        result,
        Err(ConvertError::InvalidOperation { index: 0 })
    ));
}

#[test]
fn test_error_message_mentions_non_insert_operations() {
    let error = convert(&[Operation::default()], &basic_formats(), &ConvertOptions::default())
        .unwrap_err();
    assert!(error
        .to_string()
        .contains("Cannot convert delta with non-insert operations"));
}

#[test]
fn test_unknown_attribute_ignored_by_default() {
    let input = delta(json!([{"insert": "hi", "attributes": {"glitter": true}}]));
    let html = convert_delta(&input, &basic_formats(), &ConvertOptions::default()).unwrap();
    assert_eq!(html, "<div>hi</div>");
}

#[test]
fn test_unknown_attribute_rejected_when_strict() {
    let input = delta(json!([{"insert": "hi", "attributes": {"bold": true, "glitter": true}}]));
    let options = ConvertOptions::new().with_unknown_attributes(UnknownAttributes::Reject);
    let result = convert_delta(&input, &basic_formats(), &options);

    match result {
        Err(ConvertError::UnknownAttribute { name }) => assert_eq!(name, "glitter"),
        other => panic!("Expected UnknownAttribute error, got {other:?}"),
    }
}

#[test]
fn test_callback_error_propagates() {
    #[derive(Debug)]
    struct Refused;
    impl std::fmt::Display for Refused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("refused")
        }
    }
    impl std::error::Error for Refused {}

    let registry = basic_formats().with(
        "grumpy",
        FormatDescriptor::new().line().with_mutate(|_, _| Err(Refused.into())),
    );
    let ops = [
        Operation::text("line"),
        Operation::text("\n").with_attribute("grumpy", true),
    ];

    match convert(&ops, &registry, &ConvertOptions::default()) {
        Err(ConvertError::FormatCallback { format, source }) => {
            assert_eq!(format, "grumpy");
            assert!(source.downcast_ref::<Refused>().is_some());
        }
        other => panic!("Expected FormatCallback error, got {other:?}"),
    }
}
