//! Document tokenizer: maximal runs of `[A-Za-z0-9_]`, lowercased,
//! matching `\b\w+\b` over ASCII word characters against lowercased
//! text. Non-ASCII letters are not word characters and so split tokens
//! — a known limitation, not a bug to silently paper over.

/// Splits `text` into maximal ASCII-word-character runs, lowercased.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
