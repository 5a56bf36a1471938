pub mod table;

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::pipeline::ListView;
use crate::profile::{HeaderBadge, ProfileView};
use crate::state::ViewState;

pub const DEFAULT_TRUNCATE_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// First character uppercased, the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn trailing_partial_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\S*$").expect("valid truncation pattern"))
}

/// Cuts `value` to `max` characters, drops the word the cut landed in and
/// appends `...`. Short values are returned as is.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let head: String = value.chars().take(max).collect();
    let head = trailing_partial_word().replace(&head, "");
    format!("{head}...")
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsReport<'a> {
    pub header: &'a HeaderBadge,
    pub state: &'a ViewState,
    pub view: &'a ListView,
    pub page_window: Vec<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProfileReport<'a> {
    pub header: &'a HeaderBadge,
    pub profile: Option<&'a ProfileView>,
}

pub fn render_comments(
    format: OutputFormat,
    header: &HeaderBadge,
    state: &ViewState,
    view: &ListView,
    window: Range<usize>,
    truncate_width: usize,
) -> Vec<u8> {
    match format {
        OutputFormat::Text => {
            table::render_comments_text(header, state, view, window, truncate_width).into_bytes()
        }
        OutputFormat::Json => {
            let report = CommentsReport {
                header,
                state,
                view,
                page_window: window.collect(),
            };
            render_json(&report)
        }
    }
}

pub fn render_profile(
    format: OutputFormat,
    header: &HeaderBadge,
    profile: Option<&ProfileView>,
) -> Vec<u8> {
    match format {
        OutputFormat::Text => table::render_profile_text(header, profile).into_bytes(),
        OutputFormat::Json => render_json(&ProfileReport { header, profile }),
    }
}

fn render_json<T: Serialize>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}
