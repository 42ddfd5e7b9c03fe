//! Small shared helpers.

use once_cell::sync::Lazy;
use regex::Regex;

static SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_][A-Za-z0-9_-]*)(?:\((?P<arg>[^()]*)\))?$")
        .expect("spec pattern is valid")
});

/// Split a component specification such as `simple` or `limit(5000)` into
/// its name and optional argument. Returns `None` for malformed input.
pub(crate) fn parse_spec(spec: &str) -> Option<(String, Option<String>)> {
    let caps = SPEC_RE.captures(spec.trim())?;
    let name = caps["name"].to_string();
    let arg = caps
        .name("arg")
        .map(|m| m.as_str().trim().to_string())
        .filter(|a| !a.is_empty());
    Some((name, arg))
}
