//! Plain-text rendering of the active pattern.
//!
//! ```text
//! pattern 00 (4 rows)
//!    row | Amp  Pan  | Vo M | Not Ve Cuto  Not Ve Cuto
//! >    0 | .... .... | .. . | C-4 40 ....  ... .. ....
//! ```
//!
//! Tracks within a group are separated by two spaces, groups by `|`.
//! `>` marks the cursor row, `*` rows inside the selection.

use sg_session::{EditSession, Group, ParameterCatalog, Pattern, Position, Selection};

use super::cell_format::format_cell;

fn non_empty_groups(pattern: &Pattern) -> impl Iterator<Item = Group> + '_ {
    Group::ALL.into_iter().filter(|&g| !pattern.is_group_empty(g))
}

fn header(pattern: &Pattern) -> String {
    let groups: Vec<String> = non_empty_groups(pattern)
        .map(|g| {
            let track: Vec<String> = (0..pattern.parameter_count(g))
                .map(|i| {
                    let param = pattern.describe(g, i);
                    let name: String = param.name.chars().take(param.display_width).collect();
                    format!("{:<width$}", name, width = param.display_width)
                })
                .collect();
            vec![track.join(" "); pattern.track_count(g)].join("  ")
        })
        .collect();
    format!("   row | {}", groups.join(" | "))
}

fn row_line(pattern: &Pattern, row: u16, cursor: &Position, selection: Option<&Selection>) -> String {
    let marker = if row == cursor.row {
        '>'
    } else if selection.is_some_and(|s| s.rows(pattern).contains(&row)) {
        '*'
    } else {
        ' '
    };
    let groups: Vec<String> = non_empty_groups(pattern)
        .map(|g| {
            let tracks: Vec<String> = (0..pattern.track_count(g))
                .map(|t| {
                    let cells: Vec<String> = (0..pattern.parameter_count(g))
                        .map(|p| {
                            let param = pattern.describe(g, p);
                            let value = pattern.get(row, g, t as u8, p as u8).unwrap_or(param.value_none);
                            format_cell(param, value)
                        })
                        .collect();
                    cells.join(" ")
                })
                .collect();
            tracks.join("  ")
        })
        .collect();
    format!("{} {:>4X} | {}", marker, row, groups.join(" | "))
}

/// Render a pattern with cursor and selection markers.
pub fn render_pattern(pattern: &Pattern, cursor: &Position, selection: Option<&Selection>) -> String {
    let mut out = format!("pattern {} ({} rows)\n", pattern.name, pattern.rows());
    out.push_str(&header(pattern));
    out.push('\n');
    for row in 0..pattern.rows() {
        out.push_str(row_line(pattern, row, cursor, selection).trim_end());
        out.push('\n');
    }
    out
}

/// Render the session's active pattern, or a placeholder line.
pub fn render(session: &EditSession) -> String {
    match session.pattern() {
        Some(pattern) => render_pattern(pattern, session.cursor(), session.selection()),
        None => "no pattern\n".to_string(),
    }
}

/// One-line cursor and selection status.
pub fn status(session: &EditSession) -> String {
    let c = session.cursor();
    let mut line = format!(
        "cursor row {:02X} {:?} track {} param {} sub {}",
        c.row, c.group, c.track, c.param, c.subfield
    );
    if let Some(sel) = session.selection() {
        line.push_str(&format!(
            ", selection {:02X}..{:02X} {:?}",
            sel.begin_row, sel.end_row, sel.mode
        ));
    }
    line
}
