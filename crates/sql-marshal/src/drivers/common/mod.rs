//! Connection string helpers shared across drivers.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Percent-encode a credential for use inside a URL.
pub fn url_credential(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// `user:password@` URL userinfo, or `user@` when there is no password.
pub fn url_userinfo(user: &str, password: &str) -> String {
    if user.is_empty() {
        return String::new();
    }
    if password.is_empty() {
        format!("{}@", url_credential(user))
    } else {
        format!("{}:{}@", url_credential(user), url_credential(password))
    }
}

/// URL query string from connection arguments, starting with `?`.
pub fn url_query(args: &BTreeMap<String, String>, leading: &[(&str, String)]) -> String {
    let mut pairs: Vec<String> = leading
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    pairs.extend(
        args.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))),
    );
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Quote a `key=value;` connection string value when it contains separators.
///
/// Values containing `;`, `{`, `}` or surrounding whitespace are wrapped in
/// braces with `}` doubled.
pub fn keyword_value(value: &str) -> Cow<'_, str> {
    let needs_quote = value.contains(&[';', '{', '}'][..])
        || value.starts_with(' ')
        || value.ends_with(' ');
    if needs_quote {
        Cow::Owned(format!("{{{}}}", value.replace('}', "}}")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Append `key=value;` pairs for each connection argument.
pub fn keyword_arguments(out: &mut String, args: &BTreeMap<String, String>) {
    for (k, v) in args {
        out.push_str(k);
        out.push('=');
        out.push_str(&keyword_value(v));
        out.push(';');
    }
}
