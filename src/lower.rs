//! ExprLowerer: dispatches on each top-level ASN.1 definition's
//! [`asn1::Case`] and produces proto messages or enums, recursing into
//! children and specializations.

use std::collections::HashMap;

use crate::asn1::{Case, Expr, ExprType, MetaType};
use crate::config::Options;
use crate::constraint::{contains_strict_string_range, print_constraint, ConstraintFlags};
use crate::error::{LowerError, LowerErrorKind};

use crate::model::{Enum, EnumEntry, Field, Message, Oneof, Param, ParamKind};
use crate::value::{print_value, Value, ValueFlags};

/// The two append-only collections `lower_expr` fills (spec.md §4.4
/// "appends to (messages, enums)").
#[derive(Debug, Default)]
pub struct Lowered {
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
}

/// A lookup of every top-level definition by identifier, used only to
/// follow `TYPEREF` chains to their terminal type (spec.md §4.4 "single-
/// field message whose field type is `<terminal-id><3-digit-uniq>`,
/// resolved by following the reference chain to the terminal type").
pub struct SymbolTable<'a> {
    by_identifier: HashMap<&'a str, &'a Expr>,
}

impl<'a> SymbolTable<'a> {
    pub fn build(exprs: &'a [Expr]) -> Self {
        let mut by_identifier = HashMap::new();
        for e in exprs {
            if e.has_identifier() {
                by_identifier.insert(e.identifier.as_str(), e);
            }
        }
        SymbolTable { by_identifier }
    }

    fn lookup(&self, name: &str) -> Option<&'a Expr> {
        self.by_identifier.get(name).copied()
    }
}

pub fn lower_expr(
    expr: &Expr,
    symbols: &SymbolTable<'_>,
    options: &Options,
    out: &mut Lowered,
) -> Result<(), LowerError> {
    if !expr.specializations.is_empty() {
        for spec in &expr.specializations {
            lower_expr(spec, symbols, options, out)?;
        }
        return Ok(());
    }
    if !expr.has_identifier() {
        return Ok(());
    }

    match expr.classify() {
        Case::Enumerated(e) => {
            out.enums.push(build_enum(e));
            Ok(())
        }
        Case::ValueInteger(e) => {
            out.messages.push(build_value_integer(e, options, None));
            Ok(())
        }
        Case::ValueReferenceInteger(e) => {
            let comment = Some(e.reference.join("."));
            out.messages.push(build_value_integer(e, options, comment));
            Ok(())
        }
        Case::ValueReferenceString(e) => {
            out.messages.push(build_value_reference_string(e, options));
            Ok(())
        }
        Case::ValueReferenceIoc(e) => {
            let table = e
                .ioc_table
                .as_ref()
                .expect("ValueReferenceIoc classified only when ioc_table is Some");
            out.messages.push(crate::ioc::extract_columns(
                &e.identifier,
                table,
                &e.reference.join("."),
                &e.source_file,
                e.source_line,
            ));
            Ok(())
        }
        Case::ValueSetInteger(e) => {
            out.messages.push(build_value_set_integer(e, options));
            Ok(())
        }
        Case::ValueSetOther(_) => Ok(()),
        Case::Scalar(e) => {
            out.messages.push(build_scalar(e, options));
            Ok(())
        }
        Case::Structural(e) => {
            out.messages.push(build_structural(e, symbols, options));
            Ok(())
        }
        Case::Choice(e) => {
            out.messages.push(build_choice(e, symbols, options));
            Ok(())
        }
        Case::ClassDef(_) => Ok(()),
        Case::TypeRef(e) => {
            out.messages.push(build_typeref(e, symbols));
            Ok(())
        }
        Case::Unhandled(e) if e.meta_type == Some(MetaType::Value) => Err(LowerError {
            identifier: e.identifier.clone(),
            source_file: e.source_file.clone(),
            source_line: e.source_line,
            kind: LowerErrorKind::UnhandledValueExpr,
        }),
        Case::Unhandled(e) => {
            log::warn!("unhandled construct for `{}`, emitting as comment", e.identifier);
            out.messages.push(unhandled_placeholder(e));
            Ok(())
        }
    }
}

fn value_flags(options: &Options) -> ValueFlags {
    ValueFlags {
        int32_value: options.int32_value_enabled(),
        string_value: false,
        double_quote_string_escaping: options.double_quote_string_escaping_enabled(),
    }
}

fn constraint_flags(options: &Options, string_value: bool) -> ConstraintFlags {
    ConstraintFlags {
        string_value,
        int32_value: options.int32_value_enabled(),
        double_quote_string_escaping: options.double_quote_string_escaping_enabled(),
        strict_string_length_endpoints: options.strict_string_length_endpoints_enabled(),
    }
}

/// The visible half of `Options::strict_string_length_endpoints`: a field
/// comment flagging that a strict `LL_RANGE`/`UL_RANGE` endpoint was
/// widened to inclusive `min_len`/`max_len`, alongside the warning
/// `print_constraint` itself logs (SPEC_FULL.md §D).
fn strict_string_range_comment(
    constraint: Option<&crate::constraint::Constraint>,
    options: &Options,
) -> Option<String> {
    if !options.strict_string_length_endpoints_enabled() {
        return None;
    }
    constraint
        .filter(|c| contains_strict_string_range(c))
        .map(|_| {
            "strict string-length endpoint (LL_RANGE/UL_RANGE) widened to inclusive min_len/max_len"
                .to_string()
        })
}

fn apply_params(message: &mut Message, expr: &Expr) {
    for p in &expr.lhs_params {
        let kind = if p.governor.is_empty() {
            ParamKind::Type
        } else if p.argument.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            ParamKind::Value
        } else {
            ParamKind::ValueSet
        };
        message.add_param(Param {
            kind,
            name: p.argument.clone(),
            governor: p.governor.clone(),
            argument: p.argument.clone(),
        });
        let line = format!("Param {}:{}", p.governor, p.argument);
        if message.comment.is_empty() {
            message.comment = line;
        } else {
            message.comment = format!("{}\n{}", message.comment, line);
        }
    }
}

fn build_enum(expr: &Expr) -> Enum {
    let mut e = Enum::new(expr.identifier.clone());
    for child in &expr.children {
        if child.expr_type != Some(ExprType::UniverVal) {
            continue;
        }
        let index = match &child.value {
            Some(Value::Integer(n)) => n.parse::<i64>().ok().filter(|n| *n >= 0),
            _ => None,
        };
        e.add_entry(EnumEntry {
            // Raw; emitter combines enum.name + entry.name, each snake-UPPERed.
            name: child.identifier.clone(),
            index,
        });
    }
    e
}

fn build_value_integer(expr: &Expr, options: &Options, extra_comment: Option<String>) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    if let Some(c) = extra_comment {
        message.comment = c;
    }
    let rendered = expr
        .value
        .as_ref()
        .map(|v| print_value(v, value_flags(options)))
        .unwrap_or_default();
    message.add_field(Field {
        name: "value".to_string(),
        type_name: "int32".to_string(),
        rule: format!("int32.const = {rendered}"),
        comment: String::new(),
        repeated: false,
    });
    apply_params(&mut message, expr);
    message
}

fn build_value_reference_string(expr: &Expr, options: &Options) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let rendered = expr
        .value
        .as_ref()
        .map(|v| print_value(v, value_flags(options)))
        .unwrap_or_else(|| "\"\"".to_string());
    message.add_field(Field {
        name: "value".to_string(),
        type_name: "string".to_string(),
        rule: format!("string.const = {rendered}"),
        comment: String::new(),
        repeated: false,
    });
    apply_params(&mut message, expr);
    message
}

fn build_value_set_integer(expr: &Expr, options: &Options) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let values = expr
        .constraint
        .as_ref()
        .map(|c| print_constraint(c, constraint_flags(options, false)))
        .unwrap_or_default();
    message.add_field(Field {
        name: "value".to_string(),
        type_name: "int32".to_string(),
        rule: format!("int32 = {{in: [{values}]}}"),
        comment: String::new(),
        repeated: false,
    });
    apply_params(&mut message, expr);
    message
}

fn build_scalar(expr: &Expr, options: &Options) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let (proto_type, string_context) = match expr.expr_type {
        Some(ExprType::Integer) => ("int32", false),
        Some(ExprType::Ia5String) | Some(ExprType::BmpString) => ("string", true),
        Some(ExprType::Boolean) => ("bool", false),
        _ => ("int32", false),
    };
    let rule = expr
        .constraint
        .as_ref()
        .map(|c| print_constraint(c, constraint_flags(options, string_context)))
        .filter(|body| !body.is_empty())
        .map(|body| format!("{proto_type} = {{{body}}}"))
        .unwrap_or_default();
    let comment = if string_context {
        strict_string_range_comment(expr.constraint.as_ref(), options).unwrap_or_default()
    } else {
        String::new()
    };
    message.add_field(Field {
        name: "value".to_string(),
        type_name: proto_type.to_string(),
        rule,
        comment,
        repeated: false,
    });
    apply_params(&mut message, expr);
    message
}

fn build_structural(expr: &Expr, symbols: &SymbolTable<'_>, options: &Options) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let parent_repeated = expr.expr_type == Some(ExprType::SequenceOf);
    let (fields, extensible) = lower_children(&expr.children, parent_repeated, symbols, options);
    message.fields = fields;
    message.extensible = extensible;
    apply_params(&mut message, expr);
    message
}

fn build_choice(expr: &Expr, symbols: &SymbolTable<'_>, options: &Options) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let (fields, _extensible) = lower_children(&expr.children, false, symbols, options);
    message.add_oneof(Oneof {
        name: expr.identifier.clone(),
        comment: String::new(),
        fields,
    });
    apply_params(&mut message, expr);
    message
}

fn build_typeref(expr: &Expr, symbols: &SymbolTable<'_>) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    let (terminal_id, unique) = resolve_terminal(expr, symbols);
    message.add_field(Field {
        name: "value".to_string(),
        type_name: format!("{terminal_id}{unique:03}"),
        rule: String::new(),
        comment: String::new(),
        repeated: false,
    });
    apply_params(&mut message, expr);
    message
}

/// Follows a `TYPEREF` chain to its terminal (non-`TYPEREF`) type,
/// bounded by the number of definitions in the symbol table so a cyclic
/// or dangling reference chain can't loop forever.
fn resolve_terminal<'a>(start: &'a Expr, symbols: &SymbolTable<'a>) -> (String, i64) {
    let mut current = start;
    let mut steps = symbols.by_identifier.len() + 1;
    while current.meta_type == Some(MetaType::TypeRef) && steps > 0 {
        let Some(target_name) = current.reference.last() else {
            break;
        };
        let Some(next) = symbols.lookup(target_name) else {
            return (target_name.clone(), current.type_unique_index);
        };
        current = next;
        steps -= 1;
    }
    (current.identifier.clone(), current.type_unique_index)
}

fn unhandled_placeholder(expr: &Expr) -> Message {
    let mut message = Message::new(expr.identifier.clone());
    message.comment = format!(
        "ERROR unhandled construct at {}:{}",
        expr.source_file, expr.source_line
    );
    message
}

/// Children lowering for SEQUENCE, SEQUENCE OF, and CHOICE members
/// (spec.md §4.4.1). `parent_repeated` is `true` when the enclosing
/// definition is itself a SEQUENCE OF (every field it produces is
/// `repeated`); a nested SEQUENCE OF child sets `repeated` on just
/// itself regardless of the parent's own flag.
fn lower_children(
    children: &[Expr],
    parent_repeated: bool,
    symbols: &SymbolTable<'_>,
    options: &Options,
) -> (Vec<Field>, bool) {
    let mut fields = Vec::new();
    let mut extensible = false;
    for child in children {
        match child.expr_type {
            Some(ExprType::Extensible) => {
                extensible = true;
                continue;
            }
            Some(ExprType::UniverVal) => continue,
            _ => {}
        }
        if let Some(field) = lower_child_field(child, parent_repeated, symbols, options) {
            fields.push(field);
        }
    }
    (fields, extensible)
}

fn field_name(child: &Expr) -> String {
    if child.has_identifier() {
        child.identifier.clone()
    } else {
        "value".to_string()
    }
}

fn lower_child_field(
    child: &Expr,
    parent_repeated: bool,
    symbols: &SymbolTable<'_>,
    options: &Options,
) -> Option<Field> {
    let name = field_name(child);
    match child.expr_type {
        Some(ExprType::BitString) => Some(Field {
            name,
            type_name: "BitString".to_string(),
            rule: String::new(),
            comment: String::new(),
            repeated: parent_repeated,
        }),
        Some(ExprType::ObjectIdentifier) => Some(Field {
            name,
            type_name: "BasicOid".to_string(),
            rule: String::new(),
            comment: String::new(),
            repeated: parent_repeated,
        }),
        Some(ExprType::Boolean) => Some(Field {
            name,
            type_name: "bool".to_string(),
            rule: String::new(),
            comment: String::new(),
            repeated: parent_repeated,
        }),
        Some(ExprType::Utf8String) | Some(ExprType::TeletexString) => {
            let rule = child
                .constraint
                .as_ref()
                .map(|c| print_constraint(c, constraint_flags(options, true)))
                .filter(|b| !b.is_empty())
                .map(|b| format!("string = {{{b}}}"))
                .unwrap_or_default();
            let comment =
                strict_string_range_comment(child.constraint.as_ref(), options).unwrap_or_default();
            Some(Field {
                name,
                type_name: "string".to_string(),
                rule,
                comment,
                repeated: parent_repeated,
            })
        }
        Some(ExprType::Integer) => {
            let rule = child
                .constraint
                .as_ref()
                .map(|c| print_constraint(c, constraint_flags(options, false)))
                .filter(|b| !b.is_empty())
                .map(|b| format!("int32 = {{{b}}}"))
                .unwrap_or_default();
            Some(Field {
                name,
                type_name: "int32".to_string(),
                rule,
                comment: String::new(),
                repeated: parent_repeated,
            })
        }
        Some(ExprType::SequenceOf) => {
            let referenced = child.children.first().and_then(|first| {
                resolve_reference_path(&first.reference)
            });
            match referenced {
                Some(type_name) => Some(Field {
                    name,
                    type_name,
                    rule: String::new(),
                    comment: String::new(),
                    repeated: true,
                }),
                None => {
                    log::warn!(
                        "SEQUENCE OF `{}` has no single-component reference member, skipping",
                        child.identifier
                    );
                    None
                }
            }
        }
        Some(ExprType::Reference) => resolve_reference_path(&child.reference).map(|type_name| Field {
            name,
            type_name,
            rule: String::new(),
            comment: String::new(),
            repeated: parent_repeated,
        }),
        Some(ExprType::Sequence) | Some(ExprType::Choice) => Some(Field {
            name,
            type_name: child.identifier.clone(),
            rule: String::new(),
            comment: String::new(),
            repeated: parent_repeated,
        }),
        Some(ExprType::TypeRef) => {
            let (terminal_id, unique) = resolve_terminal(child, symbols);
            Some(Field {
                name,
                type_name: format!("{terminal_id}{unique:03}"),
                rule: String::new(),
                comment: String::new(),
                repeated: parent_repeated,
            })
        }
        _ => {
            log::warn!(
                "unhandled child construct for `{}`, dropping from message",
                child.identifier
            );
            None
        }
    }
}

/// Resolves a `REFERENCE`/`TYPEREF` dotted path per spec.md §4.4.1: one
/// component names the type directly; two components target the second
/// (the instantiated type inside a class); three or more are not
/// handled.
fn resolve_reference_path(path: &[String]) -> Option<String> {
    match path.len() {
        1 => Some(path[0].clone()),
        2 => Some(path[1].clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::Param as AsnParam;

    fn base_expr(identifier: &str) -> Expr {
        Expr {
            identifier: identifier.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn enum_without_explicit_zero_leaves_entries_unindexed() {
        let mut e = base_expr("Color");
        e.expr_type = Some(ExprType::Enumerated);
        for (name, value) in [("red", 1), ("green", 2), ("blue", 3)] {
            e.children.push(Expr {
                identifier: name.to_string(),
                expr_type: Some(ExprType::UniverVal),
                value: Some(Value::Integer(value.to_string())),
                ..Default::default()
            });
        }
        let built = build_enum(&e);
        assert_eq!("Color", built.name);
        assert_eq!(3, built.entries.len());
        assert_eq!(Some(1), built.entries[0].index);
        // Stored raw; the emitter is what snake-UPPERs this at print time.
        assert_eq!("red", built.entries[0].name);
    }

    #[test]
    fn value_set_integer_delegates_to_generic_constraint_printer() {
        let mut e = base_expr("AllowedCodes");
        e.meta_type = Some(MetaType::ValueSet);
        e.expr_type = Some(ExprType::Integer);
        // A union of single values, not a Csv: the old hand-rolled match on
        // `Constraint::Csv` would have dropped this entirely.
        e.constraint = Some(crate::constraint::Constraint::Union(vec![
            crate::constraint::Constraint::Value { value: Value::Integer("1".into()), tail: None },
            crate::constraint::Constraint::Value { value: Value::Integer("2".into()), tail: None },
        ]));
        let message = build_value_set_integer(&e, &Options::new());
        assert_eq!("int32 = {in: [12]}", message.fields[0].rule);
    }

    #[test]
    fn value_set_integer_csv_constraint_still_renders() {
        let mut e = base_expr("AllowedCodes");
        e.meta_type = Some(MetaType::ValueSet);
        e.expr_type = Some(ExprType::Integer);
        e.constraint = Some(crate::constraint::Constraint::Csv(vec![
            crate::constraint::Constraint::Value { value: Value::Integer("1".into()), tail: None },
            crate::constraint::Constraint::Value { value: Value::Integer("2".into()), tail: None },
        ]));
        let message = build_value_set_integer(&e, &Options::new());
        assert_eq!("int32 = {in: [1,2]}", message.fields[0].rule);
    }

    #[test]
    fn scalar_integer_with_range_produces_rule_body() {
        let mut e = base_expr("Age");
        e.meta_type = Some(MetaType::Type);
        e.expr_type = Some(ExprType::Integer);
        e.constraint = Some(crate::constraint::Constraint::Range {
            lo: Some(Value::Integer("0".into())),
            hi: Some(Value::Integer("120".into())),
        });
        let message = build_scalar(&e, &Options::new());
        assert_eq!("int32", message.fields[0].type_name);
        assert_eq!("int32 = {gte: 0, lte: 120}", message.fields[0].rule);
    }

    #[test]
    fn sequence_of_reference_produces_single_repeated_field() {
        let mut e = base_expr("PointList");
        e.meta_type = Some(MetaType::Type);
        e.expr_type = Some(ExprType::SequenceOf);
        e.children.push(Expr {
            expr_type: Some(ExprType::Reference),
            reference: vec!["Point".to_string()],
            ..Default::default()
        });
        let symbols = SymbolTable::build(&[]);
        let message = build_structural(&e, &symbols, &Options::new());
        assert_eq!(1, message.fields.len());
        assert_eq!("value", message.fields[0].name);
        assert_eq!("Point", message.fields[0].type_name);
        assert!(message.fields[0].repeated);
    }

    #[test]
    fn choice_produces_single_oneof() {
        let mut e = base_expr("Shape");
        e.meta_type = Some(MetaType::Type);
        e.expr_type = Some(ExprType::Choice);
        for (name, ty) in [("circle", "Circle"), ("square", "Square")] {
            e.children.push(Expr {
                identifier: name.to_string(),
                expr_type: Some(ExprType::Reference),
                reference: vec![ty.to_string()],
                ..Default::default()
            });
        }
        let symbols = SymbolTable::build(&[]);
        let message = build_choice(&e, &symbols, &Options::new());
        assert_eq!(1, message.oneofs.len());
        // Stored raw; the emitter snake-lowers this at print time.
        assert_eq!("Shape", message.oneofs[0].name);
        assert_eq!(2, message.oneofs[0].fields.len());
        assert_eq!("Circle", message.oneofs[0].fields[0].type_name);
    }

    #[test]
    fn lhs_params_fold_into_param_records_and_comment() {
        let mut e = base_expr("Wrapper");
        e.meta_type = Some(MetaType::Type);
        e.expr_type = Some(ExprType::Integer);
        e.lhs_params.push(AsnParam {
            governor: "INTEGER".to_string(),
            argument: "n".to_string(),
        });
        let message = build_scalar(&e, &Options::new());
        assert_eq!(1, message.params.len());
        assert_eq!(ParamKind::Value, message.params[0].kind);
        assert_eq!("Param INTEGER:n", message.comment);
    }

    #[test]
    fn strict_string_length_endpoints_toggle_adds_field_comment() {
        let mut e = base_expr("Name");
        e.meta_type = Some(MetaType::Type);
        e.expr_type = Some(ExprType::Ia5String);
        e.constraint = Some(crate::constraint::Constraint::LlRange {
            lo: Some(Value::Integer("1".into())),
            hi: Some(Value::Integer("8".into())),
        });

        let lenient = build_scalar(&e, &Options::new());
        assert!(lenient.fields[0].comment.is_empty());

        let mut opts = Options::new();
        opts.strict_string_length_endpoints(true);
        let strict = build_scalar(&e, &opts);
        assert!(strict.fields[0].comment.contains("widened to inclusive"));
        // Rule text itself is unaffected by the toggle.
        assert_eq!(lenient.fields[0].rule, strict.fields[0].rule);
    }

    #[test]
    fn typeref_follows_chain_to_terminal() {
        let a = Expr {
            identifier: "A".to_string(),
            meta_type: Some(MetaType::TypeRef),
            reference: vec!["B".to_string()],
            type_unique_index: 1,
            ..Default::default()
        };
        let b = Expr {
            identifier: "B".to_string(),
            meta_type: Some(MetaType::Type),
            expr_type: Some(ExprType::Integer),
            type_unique_index: 2,
            ..Default::default()
        };
        let symbols = SymbolTable::build(std::slice::from_ref(&b));
        let message = build_typeref(&a, &symbols);
        assert_eq!("B002", message.fields[0].type_name);
    }

    #[test]
    fn value_reference_with_unrenderable_value_kind_errors_instead_of_faking_int32() {
        let mut e = base_expr("X");
        e.meta_type = Some(MetaType::Value);
        e.expr_type = Some(ExprType::Reference);
        e.value = Some(Value::Real(1.5));
        let symbols = SymbolTable::build(&[]);
        let mut out = Lowered::default();
        let err = lower_expr(&e, &symbols, &Options::new(), &mut out)
            .expect_err("unhandled value-context expr_type must not silently succeed");
        assert_eq!(LowerErrorKind::UnhandledValueExpr, err.kind);
        assert!(out.messages.is_empty());
    }
}
