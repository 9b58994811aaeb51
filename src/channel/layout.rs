//! Column planning and bordered frames for batched output.

use crate::core::text::{visible_width, wrap_line};

pub(crate) struct ColumnPlan {
    pub rows: usize,
    pub col_widths: Vec<usize>,
}

/// Find the smallest row count whose column-major layout fits the terminal.
///
/// Items are chunked column-major into columns of `rows` entries; each column
/// is as wide as its widest member. The layout fits when the column widths
/// plus one prefix per column come in strictly under `terminal_cols`. Returns
/// `None` when not even one item per row fits.
pub(crate) fn column_plan(
    widths: &[usize],
    prefix_width: usize,
    terminal_cols: usize,
) -> Option<ColumnPlan> {
    for rows in 1..=widths.len() {
        let col_widths: Vec<usize> = widths
            .chunks(rows)
            .map(|col| col.iter().copied().max().unwrap_or(0))
            .collect();
        let total: usize = col_widths.iter().sum::<usize>() + col_widths.len() * prefix_width;
        if total < terminal_cols {
            return Some(ColumnPlan { rows, col_widths });
        }
    }
    None
}

/// Build the lines of a bordered box around `text`.
///
/// Input lines are word-wrapped to the interior width (terminal width minus
/// the four border columns; unlimited when the width is unknown). The frame is
/// sized to the longest wrapped line, capped at the terminal width, and every
/// line is centered within the interior.
pub(crate) fn framed_lines(text: &str, terminal_cols: Option<usize>) -> Vec<String> {
    let interior_limit = terminal_cols.map(|cols| cols.saturating_sub(4));

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        match interior_limit {
            Some(limit) if limit > 0 => lines.extend(wrap_line(line, limit)),
            _ => lines.push(line.to_string()),
        }
    }

    let max_len = lines.iter().map(|line| visible_width(line)).max().unwrap_or(0);
    let frame = match terminal_cols {
        Some(cols) => cols.min(max_len + 4),
        None => max_len + 4,
    };
    let available = frame.saturating_sub(4);
    let start_pad = available.saturating_sub(max_len) / 2;
    let line_width = available.saturating_sub(start_pad);

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push("*".repeat(frame));
    for line in &lines {
        let fill = line_width.saturating_sub(visible_width(line));
        out.push(format!(
            "* {}{}{} *",
            " ".repeat(start_pad),
            line,
            " ".repeat(fill)
        ));
    }
    out.push("*".repeat(frame));
    out
}
