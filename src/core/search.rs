/// Converts free text into the wildcard/OR expression the content search
/// feed expects. `http://` substrings break the feed and are removed first.
/// Multi-word terms become `"a OR b "` (each token followed by a space, no
/// trailing `OR`); single tokens are wrapped as `"*term*"`.
pub fn encode_search_term(term: &str) -> String {
    let stripped = strip_http(term);
    let split: Vec<&str> = stripped.trim().split(char::is_whitespace).collect();

    if split.len() > 1 {
        let mut out = String::new();
        for (i, token) in split.iter().enumerate() {
            if !token.is_empty() {
                out.push_str(token);
                out.push(' ');
                if i < split.len() - 1 {
                    out.push_str("OR ");
                }
            }
        }
        out
    } else {
        format!("*{}*", stripped)
    }
}

/// Removes every `http://` occurrence, case-insensitively, in one
/// left-to-right pass.
fn strip_http(term: &str) -> String {
    const NEEDLE: &[u8] = b"http://";
    let bytes = term.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].len() >= NEEDLE.len() && bytes[i..i + NEEDLE.len()].eq_ignore_ascii_case(NEEDLE) {
            i += NEEDLE.len();
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    // The needle is pure ASCII, so removal keeps the UTF-8 intact.
    String::from_utf8_lossy(&out).into_owned()
}
