/// Behavior toggles for a single translation.
///
/// Mirrors the builder shape of the teacher crate's own config type: plain
/// setters taking `&mut self` and returning `&mut Self` so calls chain,
/// constructed fresh per translation (no shared, mutable global state).
#[derive(Debug, Clone)]
pub struct Options {
    int32_value: bool,
    strict_string_length_endpoints: bool,
    double_quote_string_escaping: bool,
    tool_name: String,
    tool_version: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            int32_value: true,
            strict_string_length_endpoints: false,
            double_quote_string_escaping: true,
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    /// Whether `MAX` renders as `2147483647` in an INTEGER value context.
    pub fn int32_value(&mut self, enabled: bool) -> &mut Self {
        self.int32_value = enabled;
        self
    }

    pub fn int32_value_enabled(&self) -> bool {
        self.int32_value
    }

    /// `LL_RANGE`/`UL_RANGE` string-length endpoints are widened to
    /// inclusive `min_len`/`max_len` by default, matching the original
    /// tool byte-for-byte. Set `true` to log a warning annotating the gap
    /// instead of silently widening (this crate has no strict-exclusive
    /// string-length rule to emit in its place; `protoc-gen-validate` has
    /// none either).
    pub fn strict_string_length_endpoints(&mut self, enabled: bool) -> &mut Self {
        self.strict_string_length_endpoints = enabled;
        self
    }

    pub fn strict_string_length_endpoints_enabled(&self) -> bool {
        self.strict_string_length_endpoints
    }

    /// Embedded `"` in a STRING value render as doubled `""` by default
    /// (byte-compatible with the original, though not valid proto3
    /// string-literal syntax). Set `false` to backslash-escape instead.
    pub fn double_quote_string_escaping(&mut self, enabled: bool) -> &mut Self {
        self.double_quote_string_escaping = enabled;
        self
    }

    pub fn double_quote_string_escaping_enabled(&self) -> bool {
        self.double_quote_string_escaping
    }

    pub fn tool_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.tool_name = name.into();
        self
    }

    pub fn tool_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.tool_version = version.into();
        self
    }

    pub(crate) fn tool_name_str(&self) -> &str {
        &self.tool_name
    }

    pub(crate) fn tool_version_str(&self) -> &str {
        &self.tool_version
    }
}
