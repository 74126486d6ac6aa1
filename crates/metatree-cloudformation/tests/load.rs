//! End-to-end tests for CloudFormation template loading.

use metatree_cloudformation::{Error, NodeType, Position, load};
use serde_json::json;

const TEMPLATE: &str = "\
Resources:
    rTest:
        Type: 'AWS::RDS::OptionGroup'
        Properties:
        EngineName: mysql
        OptionGroupDescription: !Ref 'AWS::StackName'
        Tags:
            -   Key: Name
                Value: !Join [\"\", [!Ref 'AWS::StackName' , \"-option-group\"]]
        X: true
        Y: null
";

#[test]
fn test_yaml_template_resolves_intrinsics() {
    let template = load(TEMPLATE, "yaml").unwrap();

    assert_eq!(
        template.raw(),
        json!({
            "Resources": {
                "rTest": {
                    "Type": "AWS::RDS::OptionGroup",
                    "Properties": null,
                    "EngineName": "mysql",
                    "OptionGroupDescription": {"Ref": "AWS::StackName"},
                    "Tags": [
                        {
                            "Key": "Name",
                            "Value": {
                                "Fn::Join": [
                                    "",
                                    [{"Ref": "AWS::StackName"}, "-option-group"],
                                ],
                            },
                        },
                    ],
                    "X": true,
                    "Y": null,
                },
            },
        })
    );
}

#[test]
fn test_intrinsic_value_is_an_object_node() {
    let template = load(TEMPLATE, "yaml").unwrap();
    let resource = template.get("Resources").unwrap().get("rTest").unwrap();

    let description = resource.get("OptionGroupDescription").unwrap();
    assert_eq!(description.data_type, NodeType::Object);
    assert_eq!(description.raw(), json!({"Ref": "AWS::StackName"}));
    assert_eq!(description.span.start.line, 6);

    // The long-form key is itself a string node, addressable like any
    // other mapping key.
    let inner = description.get("Ref").unwrap();
    assert_eq!(inner.as_str(), Some("AWS::StackName"));
}

#[test]
fn test_key_nodes_carry_positions() {
    let template = load(TEMPLATE, "yaml").unwrap();
    let resources = template.get("Resources").unwrap();

    let (key, _) = resources.as_mapping().unwrap().iter().next().unwrap();
    assert_eq!(key.as_str(), Some("rTest"));
    assert_eq!(key.span.start, Position::new(2, 4));
    assert_eq!(key.span.end, Position::new(2, 9));
}

#[test]
fn test_scalar_types_survive_intrinsic_pass() {
    let template = load(TEMPLATE, "yaml").unwrap();
    let resource = template.get("Resources").unwrap().get("rTest").unwrap();

    assert_eq!(resource.get("X").unwrap().data_type, NodeType::Boolean);
    assert_eq!(resource.get("Y").unwrap().data_type, NodeType::Null);
    assert_eq!(resource.get("Properties").unwrap().data_type, NodeType::Null);
}

#[test]
fn test_getatt_scalar_and_sequence_forms_agree() {
    let scalar_form = load("value: !GetAtt logicalId.attr", "yaml").unwrap();
    let sequence_form = load("value: !GetAtt [logicalId, attr]", "yaml").unwrap();

    let expected = json!({"Fn::GetAtt": ["logicalId", "attr"]});
    assert_eq!(scalar_form.get("value").unwrap().raw(), expected);
    assert_eq!(sequence_form.get("value").unwrap().raw(), expected);
}

#[test]
fn test_getatt_mapping_shape_rejected() {
    let err = load("value: !GetAtt {a: b}", "yaml").unwrap_err();
    assert!(matches!(
        err,
        Error::Yaml(metatree_yaml::Error::UnsupportedNodeShape { .. })
    ));
}

#[test]
fn test_json_format_dispatch() {
    let template = load(r#"{"Resources": {"a": 1}}"#, "json").unwrap();
    assert_eq!(template.raw(), json!({"Resources": {"a": 1}}));

    let number = template.get("Resources").unwrap().get("a").unwrap();
    assert_eq!(number.span.start, Position::new(1, 20));
    assert_eq!(number.span.end, Position::new(1, 21));
}

#[test]
fn test_unknown_format_rejected() {
    for format in ["toml", "JSON", "Yaml", ""] {
        let err = load("{}", format).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedFormat {
                format: format.to_string(),
            }
        );
    }
}

#[test]
fn test_malformed_template_is_parse_error() {
    assert!(matches!(
        load("key: [unclosed", "yaml").unwrap_err(),
        Error::Yaml(metatree_yaml::Error::Parse { .. })
    ));
    assert!(matches!(
        load("{", "json").unwrap_err(),
        Error::Json(metatree_json::Error::Parse { .. })
    ));
}

#[test]
fn test_load_is_idempotent_across_formats() {
    let yaml_first = load(TEMPLATE, "yaml").unwrap();
    let yaml_second = load(TEMPLATE, "yaml").unwrap();
    assert_eq!(yaml_first, yaml_second);

    let json_text = r#"{"a": [1, {"b": null}]}"#;
    let json_first = load(json_text, "json").unwrap();
    let json_second = load(json_text, "json").unwrap();
    assert_eq!(json_first, json_second);
}
