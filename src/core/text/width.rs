//! Grapheme and visible width helpers.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Byte length of the escape sequence starting at `pos`, if one starts there.
///
/// Recognizes the CSI (`ESC [ … final`) and OSC (`ESC ] … BEL` / `ESC ] … ESC \`)
/// forms this crate's renderers can produce; any other byte after ESC is
/// consumed as a two-byte sequence. An unterminated sequence swallows the rest
/// of the string.
fn escape_len(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) {
        return None;
    }
    match bytes.get(pos + 1) {
        Some(b'[') => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if (0x40..=0x7e).contains(&bytes[idx]) {
                    return Some(idx + 1 - pos);
                }
                idx += 1;
            }
            Some(bytes.len() - pos)
        }
        Some(b']') => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if bytes[idx] == 0x07 {
                    return Some(idx + 1 - pos);
                }
                if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
                    return Some(idx + 2 - pos);
                }
                idx += 1;
            }
            Some(bytes.len() - pos)
        }
        Some(_) => Some(2),
        None => Some(1),
    }
}

/// Terminal display width of a single grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }

    // RGI emoji sequences occupy two cells even when their parts do not add up.
    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Display width of `input`, ignoring ANSI escape sequences.
pub fn visible_width(input: &str) -> usize {
    if input.is_empty() {
        return 0;
    }

    let mut clean = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(len) = escape_len(input, idx) {
            idx += len;
            continue;
        }
        let ch = input[idx..].chars().next().expect("missing char");
        clean.push(ch);
        idx += ch.len_utf8();
    }

    clean.graphemes(true).map(grapheme_width).sum()
}
