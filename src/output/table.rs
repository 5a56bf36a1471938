use std::ops::Range;

use colored::Colorize;

use super::{capitalize, truncate};
use crate::pipeline::{ListView, SortDirection, SortKey};
use crate::profile::{HeaderBadge, ProfileView};
use crate::state::{ViewState, PAGE_SIZE_OPTIONS};

const COLUMNS: [&str; 4] = ["Post ID", "Name", "Email", "Comment"];
const MAX_TEXT_COLUMN: usize = 32;

fn header_line(header: &HeaderBadge) -> String {
    format!(
        ":: {} :: {}\n",
        format!(" {} ", header.initials).bold().reversed(),
        header.display_name.bold()
    )
}

fn sort_arrow(state: &ViewState, key: SortKey) -> String {
    match state.sort.direction_for(key) {
        Some(SortDirection::Asc) => "↑".bold().to_string(),
        Some(SortDirection::Desc) => "↓".bold().to_string(),
        None => "↑".dimmed().to_string(),
    }
}

fn controls_line(state: &ViewState) -> String {
    let mut out = String::new();
    for key in SortKey::ALL {
        out.push_str(&format!("[Sort {} {}] ", key.label(), sort_arrow(state, key)));
    }
    if state.search.is_empty() {
        out.push_str(&"Search name, email, comment".dimmed().to_string());
    } else {
        out.push_str(&format!("Search: {}", state.search.bold()));
    }
    out.push('\n');
    out
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let head: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{head}…")
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

/// Footer text: `"21-25 of 25 items"` or `"No results"`.
pub fn range_label(view: &ListView) -> String {
    match view.range {
        Some(range) => format!("{}-{} of {} items", range.start, range.end, view.total),
        None => "No results".to_string(),
    }
}

fn pager_line(state: &ViewState, view: &ListView, window: Range<usize>) -> String {
    let mut out = String::new();
    out.push_str(&range_label(view));
    out.push_str("   ");

    let prev = if state.page == 0 {
        "‹".dimmed().to_string()
    } else {
        "‹".to_string()
    };
    out.push_str(&prev);
    for i in window {
        if i == state.page {
            out.push_str(&format!(" [{}]", (i + 1).to_string().bold()));
        } else {
            out.push_str(&format!(" {}", i + 1));
        }
    }
    let next = if state.page.saturating_add(1) >= view.total_pages {
        "›".dimmed().to_string()
    } else {
        "›".to_string()
    };
    out.push(' ');
    out.push_str(&next);

    let options = PAGE_SIZE_OPTIONS
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("|");
    out.push_str(&format!(
        "   {} / Page {}\n",
        state.rows_per_page,
        format!("({options})").dimmed()
    ));
    out
}

pub fn render_comments_text(
    header: &HeaderBadge,
    state: &ViewState,
    view: &ListView,
    window: Range<usize>,
    truncate_width: usize,
) -> String {
    let rows = view
        .visible
        .iter()
        .map(|c| {
            [
                c.post_id.to_string(),
                clip(&capitalize(&c.name), MAX_TEXT_COLUMN),
                clip(&c.email.to_lowercase(), MAX_TEXT_COLUMN),
                capitalize(&truncate(&c.body, truncate_width)),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&header_line(header));
    out.push('\n');
    out.push_str(&controls_line(state));
    out.push('\n');

    let head = COLUMNS
        .iter()
        .zip(widths.iter())
        .map(|(c, w)| pad(c, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("{}\n", head.trim_end().bold()));
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"─".repeat(rule_len));
    out.push('\n');

    for row in &rows {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&pager_line(state, view, window));
    out
}

pub fn render_profile_text(header: &HeaderBadge, profile: Option<&ProfileView>) -> String {
    let mut out = String::new();
    out.push_str(&header_line(header));
    out.push('\n');

    let Some(p) = profile else {
        out.push_str("No profile available\n");
        return out;
    };

    out.push_str(&format!("Welcome, {}\n\n", p.name.bold()));
    out.push_str(&format!(
        "{}  {}\n     {}\n\n",
        format!(" {} ", p.initials).bold().reversed(),
        p.name.bold(),
        p.email.dimmed()
    ));
    let user_id = p.user_id.to_string();
    let fields = [
        ("User ID", user_id.as_str()),
        ("Name", p.name.as_str()),
        ("Email ID", p.email.as_str()),
        ("Address", p.address.as_str()),
        ("Phone", p.phone.as_str()),
    ];
    for (label, value) in fields {
        out.push_str(&format!(":: {:<10}: {}\n", label, value));
    }
    out
}
