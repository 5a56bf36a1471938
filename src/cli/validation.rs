use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::pipeline::SortKey;
use crate::state::RowsPerPage;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    for raw in &args.sort {
        if SortKey::parse(raw).is_none() {
            return Err(format!(
                "invalid --sort '{raw}', expected postId, name or email"
            ));
        }
    }
    if let Some(rows) = args.rows {
        RowsPerPage::try_from(rows).map_err(|e| format!("invalid --rows: {e}"))?;
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid --page, pages start at 1".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    if let Some(width) = args.truncate_width {
        if width == 0 {
            return Err("invalid --truncate-width, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    for (flag, url) in [
        ("--comments-url", args.comments_url.as_deref()),
        ("--users-url", args.users_url.as_deref()),
    ] {
        if let Some(url) = url {
            reqwest::Url::parse(url).map_err(|e| format!("invalid {flag} '{url}': {e}"))?;
        }
    }
    if args.profile
        && (args.search.is_some()
            || !args.sort.is_empty()
            || args.rows.is_some()
            || args.page.is_some()
            || args.next
            || args.prev
            || args.reset)
    {
        return Err("table options cannot be combined with --profile".to_string());
    }
    Ok(())
}
