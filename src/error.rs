use std::fmt;

/// The one case the lowering pass cannot silently paper over: an
/// `expr_type` it was asked to render as a *value* (not a structural
/// member) that it has no printer for. Every other unhandled construct
/// becomes an `// ERROR` comment in the model and the pass continues.
#[derive(Debug)]
pub struct LowerError {
    pub identifier: String,
    pub source_file: String,
    pub source_line: u32,
    pub kind: LowerErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerErrorKind {
    /// `meta = VALUE` with an `expr_type` the ValuePrinter/ExprLowerer
    /// pairing has no rendering for.
    UnhandledValueExpr,
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: cannot lower value expression `{}`: {}",
            self.source_file,
            self.source_line,
            self.identifier,
            match self.kind {
                LowerErrorKind::UnhandledValueExpr => "unhandled expr_type in value context",
            }
        )
    }
}

impl std::error::Error for LowerError {}
