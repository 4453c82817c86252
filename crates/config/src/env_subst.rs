/// Replace `${VAR}` and `${VAR:-fallback}` placeholders in raw config text.
///
/// Unset variables without a fallback are left as-is so the parse error (or
/// the odd path) points at the placeholder the user wrote.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Implementation behind [`substitute_env`] with an injectable lookup.
pub(crate) fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let inner = &after[..end];
        let (name, fallback) = match inner.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner, None),
        };

        match lookup(name).filter(|v| !v.is_empty() || fallback.is_none()) {
            Some(value) => out.push_str(&value),
            None => match fallback {
                Some(fallback) => out.push_str(fallback),
                None => {
                    out.push_str("${");
                    out.push_str(inner);
                    out.push('}');
                },
            },
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
