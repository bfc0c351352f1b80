//! ConstraintPrinter: flattens an ASN.1 constraint tree into a
//! `protoc-gen-validate` rule fragment such as `gte: 0, lte: 255` or
//! `min_len: 1, max_len: 8`.

use itertools::Itertools;

use crate::value::{print_value, Value, ValueFlags};

#[derive(Debug, Clone, Copy)]
pub struct ConstraintFlags {
    /// The field being constrained is string-typed: numeric comparisons
    /// (`gte`/`lte`/`gt`/`lt`) become length comparisons
    /// (`min_len`/`max_len`).
    pub string_value: bool,
    pub int32_value: bool,
    pub double_quote_string_escaping: bool,
    /// `Options::strict_string_length_endpoints`: when `true`, a string-
    /// context `LL_RANGE`/`UL_RANGE` (open endpoint silently widened to
    /// `min_len`/`max_len`) logs a warning instead of widening quietly.
    /// The rendered rule text is unchanged either way: `protoc-gen-
    /// validate` has no strict-exclusive string-length relation to emit.
    pub strict_string_length_endpoints: bool,
}

impl Default for ConstraintFlags {
    fn default() -> Self {
        ConstraintFlags {
            string_value: false,
            int32_value: false,
            double_quote_string_escaping: true,
            strict_string_length_endpoints: false,
        }
    }
}

impl ConstraintFlags {
    fn value_flags(self) -> ValueFlags {
        ValueFlags {
            int32_value: self.int32_value,
            string_value: self.string_value,
            double_quote_string_escaping: self.double_quote_string_escaping,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Constraint {
    // Element
    Type {
        subtype: Box<Constraint>,
        tail: Option<Box<Constraint>>,
    },
    Value {
        value: Value,
        tail: Option<Box<Constraint>>,
    },
    Range {
        lo: Option<Value>,
        hi: Option<Value>,
    },
    /// Both endpoints strict (open). Spec-named asymmetrically with
    /// `UlRange` but rendered identically: see §9 open question, the
    /// string-context form silently widens to inclusive `min_len`/`max_len`.
    LlRange {
        lo: Option<Value>,
        hi: Option<Value>,
    },
    /// Rendered identically to `Range` (both endpoints inclusive) per
    /// spec.md §4.2's explicit grouping of `RANGE`/`RL_RANGE`.
    RlRange {
        lo: Option<Value>,
        hi: Option<Value>,
    },
    UlRange {
        lo: Option<Value>,
        hi: Option<Value>,
    },
    Ext,

    // Container
    Size(Box<Constraint>),
    From(Box<Constraint>),
    WithComponent {
        child: Box<Constraint>,
        tail: Option<Box<Constraint>>,
    },
    WithComponents(Vec<Constraint>),
    ConstrainedBy(Box<Constraint>),
    Containing(Box<Constraint>),
    Pattern(Box<Constraint>),

    // Algebraic
    Union(Vec<Constraint>),
    Intersection(Vec<Constraint>),
    Except(Vec<Constraint>),
    AllExcept {
        tail: Option<Box<Constraint>>,
    },
    Csv(Vec<Constraint>),
    Crc(Vec<Constraint>),
    Set(Vec<Constraint>),

    /// A structural impossibility from the parser's point of view: never
    /// expected to reach the printer.
    Invalid,
}

/// True when `node` contains a string-context `LL_RANGE`/`UL_RANGE`
/// anywhere in its tree. Used by `lower` to attach a visible comment
/// alongside `Options::strict_string_length_endpoints`'s warning, per
/// SPEC_FULL.md §D: the widened rule text itself never changes, only
/// whether callers are told about the gap.
pub fn contains_strict_string_range(node: &Constraint) -> bool {
    match node {
        Constraint::LlRange { .. } | Constraint::UlRange { .. } => true,
        Constraint::Type { subtype, tail } => {
            contains_strict_string_range(subtype)
                || tail.as_deref().is_some_and(contains_strict_string_range)
        }
        Constraint::Value { tail, .. } => tail.as_deref().is_some_and(contains_strict_string_range),
        Constraint::Size(child) | Constraint::From(child) | Constraint::ConstrainedBy(child)
        | Constraint::Containing(child) | Constraint::Pattern(child) => {
            contains_strict_string_range(child)
        }
        Constraint::WithComponent { child, tail } => {
            contains_strict_string_range(child)
                || tail.as_deref().is_some_and(contains_strict_string_range)
        }
        Constraint::WithComponents(children)
        | Constraint::Union(children)
        | Constraint::Intersection(children)
        | Constraint::Except(children)
        | Constraint::Csv(children)
        | Constraint::Crc(children)
        | Constraint::Set(children) => children.iter().any(contains_strict_string_range),
        Constraint::AllExcept { tail } => tail.as_deref().is_some_and(contains_strict_string_range),
        Constraint::Range { .. } | Constraint::RlRange { .. } | Constraint::Ext | Constraint::Invalid => false,
    }
}

pub fn print_constraint(node: &Constraint, flags: ConstraintFlags) -> String {
    match node {
        Constraint::Type { subtype, tail } => {
            with_tail(print_constraint(subtype, flags), tail.as_deref(), flags)
        }
        Constraint::Value { value, tail } => {
            let base = if flags.string_value {
                let v = print_value(value, flags.value_flags());
                format!("min_len: {v}, max_len: {v}")
            } else {
                print_value(value, flags.value_flags())
            };
            with_tail(base, tail.as_deref(), flags)
        }
        Constraint::Range { lo, hi } | Constraint::RlRange { lo, hi } => {
            print_range(lo.as_ref(), hi.as_ref(), flags, false)
        }
        Constraint::LlRange { lo, hi } | Constraint::UlRange { lo, hi } => {
            print_range(lo.as_ref(), hi.as_ref(), flags, true)
        }
        Constraint::Ext => String::new(),

        Constraint::Size(child) => print_constraint(child, flags),
        Constraint::From(child) => format!("FROM {}", print_constraint(child, flags)),
        Constraint::WithComponent { child, tail } => with_tail(
            format!("WITH COMPONENT {}", print_constraint(child, flags)),
            tail.as_deref(),
            flags,
        ),
        Constraint::WithComponents(children) => format!(
            "WITH COMPONENTS {}",
            join_children(children, ", ", flags)
        ),
        Constraint::ConstrainedBy(child) => {
            format!("CONSTRAINED BY {}", print_constraint(child, flags))
        }
        Constraint::Containing(child) => format!("CONTAINING {}", print_constraint(child, flags)),
        Constraint::Pattern(child) => format!("PATTERN {}", print_constraint(child, flags)),

        Constraint::Union(children) => join_children(children, "", flags),
        Constraint::Intersection(children) => join_children(children, " ^ ", flags),
        Constraint::Except(children) => join_children(children, " EXCEPT ", flags),
        Constraint::AllExcept { tail } => {
            with_tail("ALL EXCEPT".to_string(), tail.as_deref(), flags)
        }
        Constraint::Csv(children) => join_children(children, ",", flags),
        Constraint::Crc(children) => format!("{{{}}}", join_children(children, ",", flags)),
        Constraint::Set(children) => join_children(children, "} ", flags),

        Constraint::Invalid => unreachable!("INVALID constraint node reached the printer"),
    }
}

fn with_tail(base: String, tail: Option<&Constraint>, flags: ConstraintFlags) -> String {
    match tail {
        Some(t) => format!("{base} {}", print_constraint(t, flags)),
        None => base,
    }
}

fn join_children(children: &[Constraint], sep: &str, flags: ConstraintFlags) -> String {
    children.iter().map(|c| print_constraint(c, flags)).join(sep)
}

fn print_range(lo: Option<&Value>, hi: Option<&Value>, flags: ConstraintFlags, strict: bool) -> String {
    let (lo_key, hi_key) = if flags.string_value {
        if strict && flags.strict_string_length_endpoints {
            log::warn!(
                "strict string-length endpoint (LL_RANGE/UL_RANGE) has no exclusive \
                 protoc-gen-validate relation; widening to inclusive min_len/max_len"
            );
        }
        ("min_len", "max_len")
    } else if strict {
        ("gt", "lt")
    } else {
        ("gte", "lte")
    };
    // Gate each segment on the *rendered* value being non-empty, not on the
    // endpoint merely being `Some`: `Value::Max` with `int32_value(false)`
    // prints as an empty string, and the original only appends `, lte: ...`
    // (or `lo_key: ...`) when there's an actual value to put there.
    let lo_rendered = lo.map(|v| print_value(v, flags.value_flags())).filter(|s| !s.is_empty());
    let hi_rendered = hi.map(|v| print_value(v, flags.value_flags())).filter(|s| !s.is_empty());
    lo_rendered
        .map(|v| format!("{lo_key}: {v}"))
        .into_iter()
        .chain(hi_rendered.map(|v| format!("{hi_key}: {v}")))
        .join(", ")
}
