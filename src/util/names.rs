//! Declared-name sanitization.
//!
//! Every grammar the encoders emit restricts what may appear in a DEF
//! identifier. Names coming from the collaborator (object, mesh, material,
//! image names) are cleaned once at build time so all four encodings accept
//! them verbatim.

/// Sanitize a name for use as a declared identifier.
///
/// Control characters, whitespace, quotes and the bracket/punctuation set
/// `# , . [ ] \ { }` become `_`; a leading digit or sign gets a `_` prefix;
/// an empty name becomes `"None"`.
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return "None".to_string();
    }

    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '-') {
        out.push('_');
    }
    for c in name.chars() {
        let mapped = match c {
            '\u{01}'..='\u{1f}' | '\u{7f}' => '_',
            ' ' | '"' | '\'' | '#' | ',' | '.' | '[' | ']' | '\\' | '{' | '}' => '_',
            _ => c,
        };
        out.push(mapped);
    }
    out
}
