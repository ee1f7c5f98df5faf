//! Markup removal for free-text fields.

use scraper::Html;

/// Remove every markup tag from `input`, keeping the text content.
///
/// Parsed as an HTML5 body fragment, so the tokenizer's rules apply:
/// - `<` not followed by a letter, `/`, `!` or `?` is literal text.
/// - Quoted attribute values may contain `>`.
/// - Comments are dropped whole.
/// - An unterminated tag at the end of input is dropped.
/// - Character references are decoded (`&amp;` becomes `&`).
pub fn strip_tags(input: &str) -> String {
    if !input.contains(['<', '&']) {
        return input.to_string();
    }
    Html::parse_fragment(input)
        .root_element()
        .text()
        .collect()
}
