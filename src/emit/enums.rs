use super::Sink;
use crate::ident::{self, SnakeCase};
use crate::model::Enum;

pub fn emit_enum(e: &Enum, sink: &mut dyn Sink) {
    emit_comment(&e.comment, sink);
    let name = ident::to_pascal(&e.name);
    let enum_upper = ident::to_snake(&e.name, SnakeCase::Upper);

    sink.write_str(&format!("enum {name} {{\n"));

    let has_explicit_zero = e.entries.iter().any(|entry| entry.index == Some(0));
    if !has_explicit_zero {
        sink.write_str(&format!("  {enum_upper}_UNDEFINED = 0; // auto generated\n"));
    }

    let mut next_auto = 1i64;
    for entry in &e.entries {
        let index = match entry.index {
            Some(i) if i >= 0 => i,
            _ => {
                let v = next_auto;
                next_auto += 1;
                v
            }
        };
        let entry_upper = ident::to_snake(&entry.name, SnakeCase::Upper);
        sink.write_str(&format!("  {enum_upper}_{entry_upper} = {index};\n"));
    }

    sink.write_str("};\n\n");
}

fn emit_comment(comment: &str, sink: &mut dyn Sink) {
    for line in comment.lines() {
        sink.write_str(&format!("// {line}\n"));
    }
}
