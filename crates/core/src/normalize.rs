/// Removes `//` line comments, then `/* */` block comments, then `#` line
/// comments. Each pass runs over the whole text regardless of language, so
/// markers inside string literals are stripped too.
pub fn strip_comments(text: &str) -> String {
    let text = strip_line_comments(text, "//");
    let text = strip_block_comments(&text);
    strip_line_comments(&text, "#")
}

/// Comment-free, single-line form of a submission used for exact matching.
pub fn normalize_code(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = strip_comments(text);
    let mut out = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn strip_line_comments(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(marker) {
        out.push_str(&rest[..start]);
        rest = match rest[start..].find('\n') {
            Some(newline) => &rest[start + newline..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        // unterminated: nothing after this point can close a comment
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}
