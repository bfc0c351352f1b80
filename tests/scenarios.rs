use pretty_assertions::assert_eq;

use asn1_proto::asn1::{Expr, ExprType, MetaType};
use asn1_proto::config::Options;
use asn1_proto::constraint::Constraint;
use asn1_proto::emit::BufferSink;
use asn1_proto::ident::{self, SnakeCase};
use asn1_proto::value::Value;

fn translate(source_file: &str, module_name: &str, defs: &[Expr]) -> String {
    let mut sink = BufferSink::new();
    asn1_proto::translate_module(source_file, module_name, defs, &mut sink, &Options::new())
        .expect("scenario fixtures never hit the unrenderable-value error path");
    sink.into_string()
}

fn body_after_imports(text: &str) -> &str {
    let marker = "import \"validate/v1/validate.proto\";\n\n";
    let idx = text.find(marker).expect("validate import always present");
    &text[idx + marker.len()..]
}

#[test]
fn enum_without_zero() {
    let mut color = Expr {
        identifier: "Color".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Enumerated),
        ..Default::default()
    };
    for (name, value) in [("red", 1), ("green", 2), ("blue", 3)] {
        color.children.push(Expr {
            identifier: name.to_string(),
            expr_type: Some(ExprType::UniverVal),
            value: Some(Value::Integer(value.to_string())),
            ..Default::default()
        });
    }

    let text = translate("color.asn1", "Color-Module", &[color]);
    assert_eq!(
        "enum Color {\n  COLOR_UNDEFINED = 0; // auto generated\n  COLOR_RED = 1;\n  COLOR_GREEN = 2;\n  COLOR_BLUE = 3;\n};\n\n",
        body_after_imports(&text)
    );
}

#[test]
fn integer_with_range() {
    let age = Expr {
        identifier: "Age".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Integer),
        constraint: Some(Constraint::Range {
            lo: Some(Value::Integer("0".to_string())),
            hi: Some(Value::Integer("120".to_string())),
        }),
        ..Default::default()
    };

    let text = translate("age.asn1", "Age-Module", &[age]);
    assert_eq!(
        "message Age {\n  int32 value = 1 [(validate.v1.rules).int32 = {gte: 0, lte: 120}];\n};\n\n",
        body_after_imports(&text)
    );
}

#[test]
fn string_with_size() {
    let name = Expr {
        identifier: "Name".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Ia5String),
        constraint: Some(Constraint::Size(Box::new(Constraint::Range {
            lo: Some(Value::Integer("1".to_string())),
            hi: Some(Value::Integer("32".to_string())),
        }))),
        ..Default::default()
    };

    let text = translate("name.asn1", "Name-Module", &[name]);
    assert_eq!(
        "message Name {\n  string value = 1 [(validate.v1.rules).string = {min_len: 1, max_len: 32}];\n};\n\n",
        body_after_imports(&text)
    );
}

#[test]
fn choice_becomes_single_oneof() {
    let shape = Expr {
        identifier: "Shape".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Choice),
        children: vec![
            Expr {
                identifier: "circle".to_string(),
                expr_type: Some(ExprType::Reference),
                reference: vec!["Circle".to_string()],
                ..Default::default()
            },
            Expr {
                identifier: "square".to_string(),
                expr_type: Some(ExprType::Reference),
                reference: vec!["Square".to_string()],
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let text = translate("shape.asn1", "Shape-Module", &[shape]);
    assert_eq!(
        "message Shape {\n  oneof shape {\n    Circle circle = 1;\n    Square square = 2;\n  }\n};\n\n",
        body_after_imports(&text)
    );
}

#[test]
fn sequence_of_reference() {
    let point_list = Expr {
        identifier: "PointList".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::SequenceOf),
        children: vec![Expr {
            expr_type: Some(ExprType::Reference),
            reference: vec!["Point".to_string()],
            ..Default::default()
        }],
        ..Default::default()
    };

    let text = translate("points.asn1", "Point-Module", &[point_list]);
    assert_eq!(
        "message PointList {\n  repeated Point value = 1;\n};\n\n",
        body_after_imports(&text)
    );
}

#[test]
fn identifier_casing() {
    assert_eq!("E2ApPdu", ident::to_pascal("e2AP-PDU"));
    assert_eq!("e2_ap_pdu", ident::to_snake("e2AP-PDU", SnakeCase::Lower));
    assert_eq!("E2_AP_PDU", ident::to_snake("e2AP-PDU", SnakeCase::Upper));
}

#[test]
fn field_numbers_have_no_gaps_across_fields_and_oneofs() {
    let shape = Expr {
        identifier: "Shape".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Choice),
        children: vec![
            Expr {
                identifier: "a".to_string(),
                expr_type: Some(ExprType::Reference),
                reference: vec!["A".to_string()],
                ..Default::default()
            },
            Expr {
                identifier: "b".to_string(),
                expr_type: Some(ExprType::Reference),
                reference: vec!["B".to_string()],
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let text = translate("shape.asn1", "Shape-Module", &[shape]);
    assert!(text.contains(" = 1;"));
    assert!(text.contains(" = 2;"));
    assert!(!text.contains(" = 3;"));
}

#[test]
fn validate_import_is_always_last_and_appears_once() {
    let age = Expr {
        identifier: "Age".to_string(),
        meta_type: Some(MetaType::Type),
        expr_type: Some(ExprType::Integer),
        ..Default::default()
    };
    let text = translate("age.asn1", "Age-Module", &[age]);
    assert_eq!(1, text.matches("validate/v1/validate.proto").count());
    // No user imports declared here, so it's also the only import line.
    assert_eq!(1, text.matches("import \"").count());
}
