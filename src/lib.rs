//! Lowers a parsed ASN.1 module tree into proto3 source text annotated
//! with `protoc-gen-validate`-style field rules.
//!
//! This crate is the *core* of a larger ASN.1-to-proto3 translator: it
//! consumes an already-parsed, already-fix-normalized [`asn1::Expr`] tree
//! (built by a parser collaborator outside this crate's scope) and
//! produces proto3 text, either to standard output or into an in-memory
//! buffer.
//!
//! ```no_run
//! use asn1_proto::asn1::{Expr, ExprType, MetaType};
//! use asn1_proto::config::Options;
//! use asn1_proto::emit::BufferSink;
//!
//! let age = Expr {
//!     identifier: "Age".to_string(),
//!     meta_type: Some(MetaType::Type),
//!     expr_type: Some(ExprType::Integer),
//!     ..Default::default()
//! };
//!
//! let mut sink = BufferSink::new();
//! asn1_proto::translate_module("age.asn1", "Age-Module", &[age], &mut sink, &Options::new())
//!     .expect("translation only fails on an unrenderable VALUE expression");
//! println!("{}", sink.into_string());
//! ```

pub mod asn1;
pub mod config;
pub mod constraint;
pub mod emit;
pub mod error;
pub mod ident;
pub mod ioc;
pub mod lower;
pub mod model;
pub mod value;

use emit::Sink;
use error::LowerError;
use lower::{Lowered, SymbolTable};
use model::Module;

/// Lowers every top-level definition in `definitions`, then emits the
/// resulting module to `sink`.
///
/// `source_file` and `module_name` feed the header comment and the
/// package/import naming policy (spec.md §4.6, §6). Returns `Err` only
/// for the one unrecoverable case spec.md §7 defines: a `meta = VALUE`
/// expression whose `expr_type` has no value printer. Every other
/// unhandled construct degrades to a `// ERROR` comment in the output and
/// translation proceeds.
pub fn translate_module(
    source_file: &str,
    module_name: &str,
    definitions: &[asn1::Expr],
    sink: &mut dyn Sink,
    options: &config::Options,
) -> Result<(), LowerError> {
    let symbols = SymbolTable::build(definitions);
    let mut lowered = Lowered::default();
    for expr in definitions {
        lower::lower_expr(expr, &symbols, options, &mut lowered)?;
    }

    let mut module = Module::new(module_name, source_file);
    for e in lowered.enums {
        module.add_enum(e);
    }
    for m in lowered.messages {
        module.add_message(m);
    }

    emit::emit(&module, sink, options);
    Ok(())
}
