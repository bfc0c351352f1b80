//! Pure functions for converting identifiers between the casings the
//! emitter needs: PascalCase for messages/enums, snake_lower for fields and
//! oneofs, snake_UPPER for enum entries.
//!
//! These are a direct, byte-compatible port of the original tool's
//! `toPascalCaseDup`/`toSnakeCaseDup`/`toLowercaseDup` helpers rather than a
//! call into `heck`: the acronym-run handling (`HTTPServer` -> `HttpServer`)
//! and the `&`/`-`/`_` boundary rules are specific to this tool and don't
//! match `heck`'s CamelCase/SnakeCase conversions.

/// Which direction [`to_snake`] folds case in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeCase {
    Lower,
    Upper,
}

/// ASCII-lowercases every character.
pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Converts an identifier to PascalCase.
///
/// `-`, `_` and `&` are treated as word boundaries and dropped, uppercasing
/// the character that follows. Within a run of consecutive uppercase
/// letters, the first letter of the run keeps its case and so does the
/// last letter *if* it's immediately followed by a lowercase letter (it
/// starts the next word); every other letter in the run is lowercased. So
/// `HTTPServer` becomes `HttpServer` (the run `HTTPS` folds to `Http` +
/// the `S` that anchors `Server`) rather than `HTTPServer`.
pub fn to_pascal(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '-' || c == '&' || c == '_' {
            if let Some(&next) = chars.get(i + 1) {
                out.push(next.to_ascii_uppercase());
                i += 2;
                continue;
            }
            i += 1;
            continue;
        } else if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else if c.is_ascii_uppercase() {
            let prev_is_upper = chars[i - 1].is_ascii_uppercase();
            let next_is_upper = chars.get(i + 1).is_some_and(|n| n.is_ascii_uppercase());
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let run_start = !prev_is_upper;
            let run_last = !next_is_upper;
            if run_start || (run_last && next_is_lower) {
                out.push(c);
            } else {
                out.push(c.to_ascii_lowercase());
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

/// Converts an identifier to snake_lower or SNAKE_UPPER.
///
/// `-` and `.` become `_`; a leading `&` is dropped. An internal uppercase
/// letter starting a new run (the previous character wasn't itself folded by
/// this function) gets an `_` inserted before it; subsequent letters of the
/// same run pass straight through with their case folded. For
/// [`SnakeCase::Lower`] uppercase letters are lowercased; for
/// [`SnakeCase::Upper`] lowercase letters are uppercased.
///
/// The run-start guard is applied the same way for both directions. The
/// original tool's `SNAKECASE_UPPER` branch is missing this guard (it
/// inserts `_` before *every* internal uppercase letter, not just the start
/// of a run), which produces doubled underscores the `SNAKECASE_LOWER`
/// branch never does; that asymmetry looks like a bug rather than
/// intentional behavior, so both directions are guarded here. See
/// DESIGN.md.
pub fn to_snake(s: &str, case: SnakeCase) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    let mut last_changed = false;
    for (i, &c) in chars.iter().enumerate() {
        if i == 0 && c == '&' {
            last_changed = true;
            continue;
        }
        match case {
            SnakeCase::Lower if i > 0 && c.is_ascii_uppercase() && !last_changed => {
                out.push('_');
                out.push(c.to_ascii_lowercase());
                last_changed = true;
            }
            SnakeCase::Upper if c.is_ascii_lowercase() => {
                out.push(c.to_ascii_uppercase());
                last_changed = true;
            }
            SnakeCase::Upper if i > 0 && c.is_ascii_uppercase() && !last_changed => {
                out.push('_');
                out.push(c.to_ascii_uppercase());
                last_changed = true;
            }
            SnakeCase::Upper if c.is_ascii_uppercase() => {
                out.push(c);
                last_changed = true;
            }
            SnakeCase::Lower if c.is_ascii_uppercase() => {
                out.push(c.to_ascii_lowercase());
                last_changed = true;
            }
            _ if c == '-' || c == '.' => {
                out.push('_');
                last_changed = true;
            }
            _ => {
                out.push(c);
                last_changed = false;
            }
        }
    }
    out
}

/// Strips any leading `./` or `../` path segments.
pub fn remove_rel_path(s: &str) -> &str {
    let mut rest = s;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            break;
        }
    }
    rest
}

/// True if the first character is not a lowercase ASCII letter.
///
/// Drives the `pkg`-prefix policy for package/import names (§4.6).
pub fn starts_with_nonlower(s: &str) -> bool {
    match s.chars().next() {
        Some(c) => !c.is_ascii_lowercase(),
        None => true,
    }
}
