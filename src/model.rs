//! The in-memory Proto model: modules, messages, oneofs, enums, fields,
//! imports. Built once per translation by `lower`, then walked read-only
//! by `emit`. Append-only: no field is rewritten once added (§3
//! Lifecycle).

/// A named arc in a dotted OID, e.g. the `itu-t(0)` in `{ itu-t(0) 3 6 }`.
#[derive(Debug, Clone)]
pub struct ObjectIdentifierArc {
    pub name: Option<String>,
    pub number: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectIdentifier {
    pub arcs: Vec<ObjectIdentifierArc>,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub path: String,
    pub oid: Option<ObjectIdentifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Type,
    Value,
    ValueSet,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub kind: ParamKind,
    pub name: String,
    /// The raw `governor:argument` pair this was derived from, folded into
    /// a `Param <gov>:<arg>` comment line per spec.md §4.4.
    pub governor: String,
    pub argument: String,
}

#[derive(Debug, Clone, Default)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    pub rule: String,
    pub comment: String,
    pub repeated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Oneof {
    pub name: String,
    pub comment: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub name: String,
    pub spec_index: i64,
    pub type_unique_index: i64,
    pub fields: Vec<Field>,
    pub oneofs: Vec<Oneof>,
    pub comment: String,
    pub params: Vec<Param>,
    /// Set when the source SEQUENCE/CHOICE carried an extensibility
    /// marker (`...`); not itself a field, see spec.md §4.4.1.
    pub extensible: bool,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Message { name: name.into(), ..Default::default() }
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn add_oneof(&mut self, oneof: Oneof) {
        self.oneofs.push(oneof);
    }

    pub fn add_param(&mut self, param: Param) {
        self.params.push(param);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnumEntry {
    pub name: String,
    /// `None` means "assign the next running counter value at emission
    /// time"; `Some` is an explicit, already-resolved index.
    pub index: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Enum {
    pub name: String,
    pub comment: String,
    pub entries: Vec<EnumEntry>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum { name: name.into(), ..Default::default() }
    }

    pub fn add_entry(&mut self, entry: EnumEntry) {
        self.entries.push(entry);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    pub source_file: String,
    pub oid: Option<ObjectIdentifier>,
    pub imports: Vec<Import>,
    pub enums: Vec<Enum>,
    pub messages: Vec<Message>,
    pub comment: String,
}

impl Module {
    pub fn new(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            source_file: source_file.into(),
            ..Default::default()
        }
    }

    pub fn add_import(&mut self, import: Import) {
        self.imports.push(import);
    }

    pub fn add_enum(&mut self, e: Enum) {
        self.enums.push(e);
    }

    pub fn add_message(&mut self, m: Message) {
        self.messages.push(m);
    }
}
