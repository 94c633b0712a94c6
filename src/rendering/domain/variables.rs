//! `$name` / `${name}` substitution in code snippets.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

/// Replaces `$name` and `${name}` references whose name appears in `mapping`.
///
/// A bare `$name` only matches a whole identifier, so `$item` is left alone
/// when only `it` is mapped. Unknown names are kept verbatim.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use kernel_results::rendering::domain::substitute_variables;
///
/// let mapping = BTreeMap::from([("it".to_owned(), "res12".to_owned())]);
/// assert_eq!(
///     substitute_variables("HTML($it + ${it}) + $item", &mapping),
///     "HTML(res12 + res12) + $item",
/// );
/// ```
#[must_use]
pub fn substitute_variables(code: &str, mapping: &BTreeMap<String, String>) -> String {
    let mut output = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            output.push(ch);
            continue;
        }
        let reference = Reference::read(&mut chars);
        if let Some(replacement) = reference.name().and_then(|name| mapping.get(name)) {
            output.push_str(replacement);
            continue;
        }
        output.push('$');
        output.push_str(&reference.raw);
    }
    output
}

/// Returns `true` when `code` references `name` as a variable.
#[must_use]
pub fn references_variable(code: &str, name: &str) -> bool {
    let mut chars = code.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '$' && Reference::read(&mut chars).name() == Some(name) {
            return true;
        }
    }
    false
}

/// Text following a `$`.
struct Reference {
    raw: String,
    name: String,
    valid: bool,
}

impl Reference {
    fn read(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut raw = String::new();
        let mut name = String::new();
        if chars.next_if_eq(&'{').is_some() {
            raw.push('{');
            for ch in chars.by_ref() {
                raw.push(ch);
                if ch == '}' {
                    let valid = is_identifier(&name);
                    return Self { raw, name, valid };
                }
                name.push(ch);
            }
            return Self {
                raw,
                name,
                valid: false,
            };
        }
        while let Some(ch) = chars.next_if(|ch| is_identifier_char(*ch)) {
            raw.push(ch);
            name.push(ch);
        }
        let valid = is_identifier(&name);
        Self { raw, name, valid }
    }

    fn name(&self) -> Option<&str> {
        self.valid.then_some(self.name.as_str())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(is_identifier_char)
}

fn is_identifier_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}
