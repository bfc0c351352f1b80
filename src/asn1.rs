//! The input ASN.1 tree (spec.md §3): consumed, not owned. Produced by a
//! parser/fixer collaborator out of this crate's scope; read-only here.

use crate::constraint::Constraint;
use crate::ioc::IocTable;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    Type,
    Value,
    ValueSet,
    TypeRef,
    ObjectClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Enumerated,
    Integer,
    Boolean,
    Ia5String,
    BmpString,
    Utf8String,
    TeletexString,
    BitString,
    ObjectIdentifier,
    Sequence,
    SequenceOf,
    Choice,
    ClassDef,
    Reference,
    UniverVal,
    Extensible,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub governor: String,
    pub argument: String,
}

/// One ASN.1 definition: a type, value, value set, type reference, or
/// object-class definition, with its children and specializations.
#[derive(Debug, Clone, Default)]
pub struct Expr {
    pub identifier: String,
    pub meta_type: Option<MetaType>,
    pub expr_type: Option<ExprType>,
    pub value: Option<Value>,
    pub constraint: Option<Constraint>,
    pub children: Vec<Expr>,
    pub lhs_params: Vec<Param>,
    pub reference: Vec<String>,
    pub ioc_table: Option<IocTable>,
    pub specializations: Vec<Expr>,
    pub source_file: String,
    pub source_line: u32,
    pub spec_index: i64,
    pub type_unique_index: i64,
}

impl Expr {
    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }
}

/// A tagged view of an [`Expr`]'s dispatch category: REDESIGN FLAGS §9's
/// sum type replacing `ExprLowerer`'s nested `meta_type`/`expr_type`
/// `if`/`else` chain with one exhaustive `match` in `lower::lower_expr`.
/// Built by [`Expr::classify`]; never constructed directly.
#[derive(Debug)]
pub enum Case<'a> {
    Enumerated(&'a Expr),
    ValueInteger(&'a Expr),
    ValueReferenceInteger(&'a Expr),
    ValueReferenceString(&'a Expr),
    ValueReferenceIoc(&'a Expr),
    ValueSetInteger(&'a Expr),
    ValueSetOther(&'a Expr),
    Scalar(&'a Expr),
    Structural(&'a Expr),
    Choice(&'a Expr),
    ClassDef(&'a Expr),
    TypeRef(&'a Expr),
    Unhandled(&'a Expr),
}

impl Expr {
    pub fn classify(&self) -> Case<'_> {
        use ExprType::*;
        use MetaType::*;

        if let Some(Enumerated) = self.expr_type {
            return Case::Enumerated(self);
        }

        match (self.meta_type, self.expr_type) {
            (Some(Value), Some(Integer)) => Case::ValueInteger(self),
            (Some(Value), Some(Reference)) => match &self.value {
                Some(crate::value::Value::Integer(_)) | Some(crate::value::Value::Referenced(_))
                    if self.ioc_table.is_none() =>
                {
                    Case::ValueReferenceInteger(self)
                }
                Some(crate::value::Value::String(_)) => Case::ValueReferenceString(self),
                _ if self.ioc_table.is_some() => Case::ValueReferenceIoc(self),
                // Any other value kind (REAL, NULL, TRUE/FALSE, ...) has no
                // printer pairing in this context: the original's equivalent
                // switch (asn1printproto.c:180-201) only handles
                // ATV_INTEGER/ATV_STRING/ATV_UNPARSED+ioc and falls through
                // to an error for everything else. Unhandled, not a bogus
                // int32 constant.
                _ => Case::Unhandled(self),
            },
            (Some(ValueSet), Some(Integer)) => Case::ValueSetInteger(self),
            (Some(ValueSet), _) => Case::ValueSetOther(self),
            (Some(Type), Some(Integer | Ia5String | BmpString | Boolean)) => Case::Scalar(self),
            (Some(Type), Some(Sequence | SequenceOf)) => Case::Structural(self),
            (Some(Type), Some(Choice)) => Case::Choice(self),
            (_, Some(ClassDef)) => Case::ClassDef(self),
            (Some(TypeRef), _) => Case::TypeRef(self),
            _ => Case::Unhandled(self),
        }
    }
}
