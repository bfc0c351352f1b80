use super::{type_token, Sink};
use crate::ident::{self, SnakeCase};
use crate::model::{Field, Message, Oneof};

pub fn emit_message(m: &Message, sink: &mut dyn Sink) {
    emit_comment(&m.comment, sink);
    let name = ident::to_pascal(&m.name);
    sink.write_str(&format!("message {name} {{\n"));

    let mut number = 1i64;
    for field in &m.fields {
        emit_field(field, &mut number, 1, sink);
    }
    for oneof in &m.oneofs {
        emit_oneof(oneof, &mut number, sink);
    }

    sink.write_str("};\n\n");
}

fn emit_oneof(oneof: &Oneof, number: &mut i64, sink: &mut dyn Sink) {
    emit_comment(&oneof.comment, sink);
    let name = ident::to_snake(&oneof.name, SnakeCase::Lower);
    sink.write_str(&format!("  oneof {name} {{\n"));
    for field in &oneof.fields {
        emit_field(field, number, 2, sink);
    }
    sink.write_str("  }\n");
}

fn emit_field(field: &Field, number: &mut i64, indent: usize, sink: &mut dyn Sink) {
    let indent_str = "  ".repeat(indent);
    let repeated = if field.repeated { "repeated " } else { "" };
    let type_tok = type_token(&field.type_name);
    let field_name = ident::to_snake(&field.name, SnakeCase::Lower);
    let rule = if field.rule.is_empty() {
        String::new()
    } else {
        format!(" [(validate.v1.rules).{}]", field.rule)
    };
    let comment = if field.comment.is_empty() {
        String::new()
    } else {
        format!(" // {}", field.comment)
    };
    sink.write_str(&format!(
        "{indent_str}{repeated}{type_tok} {field_name} = {number}{rule};{comment}\n"
    ));
    *number += 1;
}

fn emit_comment(comment: &str, sink: &mut dyn Sink) {
    for line in comment.lines() {
        sink.write_str(&format!("// {line}\n"));
    }
}
