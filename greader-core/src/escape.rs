//! HTML-escape normalization of client-supplied names.
//!
//! Category, tag and feed names are stored HTML-escaped. Every name or URL
//! taken from a request is escaped with [`escape_html`] before it is used
//! in a store lookup or mutation, so the stored value never carries raw
//! markup into the rendering and logging layers downstream. Names leaving
//! the adapter in stream ids are turned back with [`unescape_html`].

/// Escape `&`, `<`, `>` and `"`. Single quotes are left alone.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const ENTITIES: [(&str, char); 7] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#039;", '\''),
    ("&#39;", '\''),
    ("&apos;", '\''),
];

/// Reverse [`escape_html`], also decoding single-quote entities.
///
/// Unknown entities are kept verbatim.
pub fn unescape_html(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
