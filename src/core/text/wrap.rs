//! Word wrapping for plain message text.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Wrap a single line of text to `width` display columns.
///
/// Breaks at space boundaries where possible; a word wider than `width` is
/// split at grapheme boundaries. Trailing whitespace is trimmed from each
/// produced line. `width == 0` disables wrapping.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for token in split_tokens(line) {
        let token_width = visible_width(&token);
        let is_whitespace = token.trim().is_empty();

        if token_width > width && !is_whitespace {
            if !current.is_empty() {
                wrapped.push(current.trim_end().to_string());
                current.clear();
                current_width = 0;
            }
            let pieces = break_word(&token, width);
            if let Some((last, head)) = pieces.split_last() {
                wrapped.extend_from_slice(head);
                current = last.clone();
                current_width = visible_width(&current);
            }
            continue;
        }

        if current_width + token_width > width && current_width > 0 {
            wrapped.push(current.trim_end().to_string());
            if is_whitespace {
                current.clear();
                current_width = 0;
            } else {
                current = token;
                current_width = token_width;
            }
        } else {
            current.push_str(&token);
            current_width += token_width;
        }
    }

    if !current.is_empty() {
        wrapped.push(current.trim_end().to_string());
    }

    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped
    }
}

/// Split into alternating runs of spaces and non-space text.
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_whitespace = false;

    for ch in line.chars() {
        let is_space = ch == ' ';
        if is_space != in_whitespace && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        in_whitespace = is_space;
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn break_word(word: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for grapheme in word.graphemes(true) {
        let grapheme_cols = grapheme_width(grapheme);
        if current_width + grapheme_cols > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push_str(grapheme);
        current_width += grapheme_cols;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}
