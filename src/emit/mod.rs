//! Emitter: walks the Proto model and writes proto3 text with casing,
//! indentation, comments, imports, package name, and the auto-generated
//! zero-valued enum entry.

mod enums;
mod messages;

use crate::config::Options;
use crate::ident::{self, SnakeCase};
use crate::model::{Import, Module};

/// The capability REDESIGN FLAGS §9 asks for in place of a process-wide
/// mutable output-mode selector and buffer: a small append-bytes target.
/// Two implementations are provided below; both must produce
/// byte-identical content for the same `Module` (spec.md §4.6).
pub trait Sink {
    fn write_str(&mut self, s: &str);
}

/// Writes straight to standard output.
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_str(&mut self, s: &str) {
        use std::io::Write;
        print!("{s}");
        let _ = std::io::stdout().flush();
    }
}

/// Accumulates into an owned, in-memory buffer.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Sink for BufferSink {
    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }
}

/// Known proto3 scalar/builtin type names that are written verbatim
/// rather than PascalCased (spec.md §4.6: "PascalCase unless it is one of
/// the known proto scalars").
const PROTOSCALARTYPES: &[&str] = &["int32", "float", "bool", "string", "BitString", "BasicOid"];

fn is_scalar_type(name: &str) -> bool {
    PROTOSCALARTYPES.contains(&name)
}

pub(super) fn type_token(name: &str) -> String {
    if is_scalar_type(name) {
        name.to_string()
    } else {
        ident::to_pascal(name)
    }
}

pub fn emit(module: &Module, sink: &mut dyn Sink, options: &Options) {
    let package_id = package_identifier(&module.source_file);

    sink.write_str(&format!(
        "// Protobuf generated from {} by {}-{}\n",
        module.source_file,
        options.tool_name_str(),
        options.tool_version_str()
    ));
    sink.write_str(&format!(
        "// {}{}\n",
        module.name,
        module
            .oid
            .as_ref()
            .map(|oid| format!(" {}", print_oid(oid)))
            .unwrap_or_default()
    ));
    sink.write_str("\n");

    sink.write_str("syntax = \"proto3\";\n");
    sink.write_str("\n");

    sink.write_str(&format!("package {};\n", package_line(&package_id)));
    sink.write_str("\n");

    for import in &module.imports {
        sink.write_str(&import_line(import));
    }
    sink.write_str("import \"validate/v1/validate.proto\";\n");
    sink.write_str("\n");

    for e in &module.enums {
        enums::emit_enum(e, sink);
    }
    for m in &module.messages {
        messages::emit_message(m, sink);
    }
}

fn package_identifier(source_file: &str) -> String {
    let stripped = ident::remove_rel_path(source_file);
    let last = stripped.rsplit('/').next().unwrap_or(stripped);
    ident::to_snake(last, SnakeCase::Lower)
}

fn package_line(package_id: &str) -> String {
    if ident::starts_with_nonlower(package_id) {
        format!("pkg{package_id}.v1;")
    } else {
        format!("{package_id}.v1;")
    }
}

fn import_line(import: &Import) -> String {
    let stripped = ident::remove_rel_path(&import.path);
    let stem = stripped.rsplit('/').next().unwrap_or(stripped);
    let dir_id = ident::to_snake(stem, SnakeCase::Lower);
    let file_id = ident::to_lower(stem);
    let prefix = if ident::starts_with_nonlower(&dir_id) { "pkg" } else { "" };
    let mut line = format!("import \"{prefix}{dir_id}/v1/{file_id}.proto\";");
    if let Some(oid) = &import.oid {
        line.push_str(&format!(" // {}", print_oid(oid)));
    }
    line.push('\n');
    line
}

fn print_oid(oid: &crate::model::ObjectIdentifier) -> String {
    let arcs = oid
        .arcs
        .iter()
        .map(|arc| match (&arc.name, arc.number) {
            (Some(name), Some(n)) => format!("{name}({n})"),
            (Some(name), None) => name.clone(),
            (None, Some(n)) => n.to_string(),
            (None, None) => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{{ {arcs} }}")
}
