use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::dashboard::Dashboard;
use crate::fetcher::{self, FetcherOptions, HttpFetcher};
use crate::output::{self, OutputFormat};
use crate::pipeline::SortKey;
use crate::profile::{HeaderBadge, ProfileView};
use crate::state::{FileStorage, RowsPerPage, StorageBackend, ViewStateStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRequest {
    /// 0-based page index.
    Goto(usize),
    Next,
    Prev,
}

/// User events for the comments table, applied in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableEdits {
    pub reset: bool,
    pub search: Option<String>,
    pub rows_per_page: Option<RowsPerPage>,
    pub sort_clicks: Vec<SortKey>,
    pub page: Option<PageRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Screen {
    Comments(TableEdits),
    Profile,
}

#[derive(Clone, Debug)]
struct RunConfig {
    screen: Screen,
    fetcher: FetcherOptions,
    state_file: PathBuf,
    output_format: OutputFormat,
    no_color: bool,
    truncate_width: usize,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let output_format_raw = args
        .output_format
        .or(cfg.output_format)
        .unwrap_or_else(|| "text".to_string());
    let output_format = OutputFormat::parse(&output_format_raw)
        .ok_or_else(|| format!("invalid output format '{output_format_raw}'"))?;

    let truncate_width = args
        .truncate_width
        .or(cfg.truncate_width)
        .unwrap_or(output::DEFAULT_TRUNCATE_WIDTH);
    if truncate_width == 0 {
        return Err("invalid truncate_width, expected positive integer".to_string());
    }

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let comments_url = args
        .comments_url
        .or(cfg.comments_url)
        .unwrap_or_else(|| fetcher::DEFAULT_COMMENTS_URL.to_string());
    let users_url = args
        .users_url
        .or(cfg.users_url)
        .unwrap_or_else(|| fetcher::DEFAULT_USERS_URL.to_string());
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let state_file = args
        .state_file
        .or(cfg.state_file)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or_else(config::default_state_path);

    let screen = if args.profile {
        Screen::Profile
    } else {
        let mut sort_clicks = Vec::with_capacity(args.sort.len());
        for raw in &args.sort {
            let key = SortKey::parse(raw).ok_or_else(|| format!("invalid --sort '{raw}'"))?;
            sort_clicks.push(key);
        }
        let rows_per_page = args
            .rows
            .map(RowsPerPage::try_from)
            .transpose()
            .map_err(|e| format!("invalid --rows: {e}"))?;
        let page = if args.next {
            Some(PageRequest::Next)
        } else if args.prev {
            Some(PageRequest::Prev)
        } else {
            args.page.map(|p| PageRequest::Goto(p.saturating_sub(1)))
        };
        Screen::Comments(TableEdits {
            reset: args.reset,
            search: args.search,
            rows_per_page,
            sort_clicks,
            page,
        })
    };

    Ok(RunConfig {
        screen,
        fetcher: FetcherOptions {
            comments_url,
            users_url,
            timeout_seconds,
            proxy,
        },
        state_file,
        output_format,
        no_color,
        truncate_width,
        verbose: args.verbose,
    })
}

/// Replays one round of table events against the dashboard. Each event is
/// persisted by the dashboard as it happens.
pub fn apply_edits<B: StorageBackend>(dashboard: &mut Dashboard<B>, edits: &TableEdits) {
    if edits.reset {
        dashboard.reset();
    }
    if let Some(search) = edits.search.as_deref() {
        dashboard.set_search(search);
    }
    if let Some(rows) = edits.rows_per_page {
        dashboard.set_rows_per_page(rows);
    }
    for key in &edits.sort_clicks {
        dashboard.toggle_sort(*key);
    }
    // A page remembered from a larger result set may no longer exist. With no
    // records at all (failed fetch) the stored page is left alone.
    if !dashboard.records().is_empty() {
        dashboard.clamp_page();
    }
    let honoured = match edits.page {
        Some(PageRequest::Goto(page)) => dashboard.change_page(page),
        Some(PageRequest::Next) => dashboard.next_page(),
        Some(PageRequest::Prev) => dashboard.previous_page(),
        None => true,
    };
    if !honoured {
        warn!(
            "page request ignored, {} page(s) available",
            dashboard.total_pages()
        );
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("commentboard={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn loading_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn write_stdout(bytes: &[u8]) -> Result<(), String> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(bytes)
        .and_then(|_| handle.flush())
        .map_err(|e| format!("failed to write output: {e}"))
}

async fn run_comments(
    run: &RunConfig,
    fetcher: &HttpFetcher,
    edits: &TableEdits,
) -> Result<(), String> {
    let pb = loading_spinner("Loading comments...");
    let records = match fetcher.fetch_comments().await {
        Ok(records) => records,
        Err(e) => {
            warn!("could not load comments: {e}");
            Vec::new()
        }
    };
    pb.finish_and_clear();

    let store = ViewStateStore::new(FileStorage::new(&run.state_file));
    let mut dashboard = Dashboard::mount(records, store);
    apply_edits(&mut dashboard, edits);

    let view = dashboard.view();
    debug!(state = ?dashboard.state(), total = view.total, "rendering comments");
    let bytes = output::render_comments(
        run.output_format,
        &HeaderBadge::for_user(None),
        dashboard.state(),
        &view,
        dashboard.page_window(),
        run.truncate_width,
    );
    write_stdout(&bytes)
}

async fn run_profile(run: &RunConfig, fetcher: &HttpFetcher) -> Result<(), String> {
    let pb = loading_spinner("Loading Profile...");
    let user = match fetcher.fetch_first_user().await {
        Ok(user) => user,
        Err(e) => {
            warn!("could not load profile: {e}");
            None
        }
    };
    pb.finish_and_clear();

    let header = HeaderBadge::for_user(user.as_ref());
    let profile = user.as_ref().map(ProfileView::from_user);
    let bytes = output::render_profile(run.output_format, &header, profile.as_ref());
    write_stdout(&bytes)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let fetcher = HttpFetcher::new(run.fetcher.clone()).map_err(|e| e.to_string())?;
    info!(
        comments_url = %run.fetcher.comments_url,
        users_url = %run.fetcher.users_url,
        state_file = %run.state_file.display(),
        "starting"
    );

    match &run.screen {
        Screen::Comments(edits) => run_comments(&run, &fetcher, edits).await,
        Screen::Profile => run_profile(&run, &fetcher).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                return e
                    .print()
                    .map_err(|e| format!("failed to print help: {e}"));
            }
            _ => return Err(e.to_string()),
        },
    };

    let mut template_error = None;
    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => {
                let (cfg, init_error) = config::load_or_init_config(&path)?;
                template_error = init_error;
                cfg
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(run.verbose);
    if let Some(e) = template_error {
        warn!("could not write default config: {e}");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use crate::model::Comment;
    use crate::pipeline::SortSpec;
    use crate::state::{MemoryStorage, ViewState};
    use clap::Parser;

    fn comments(n: u64) -> Vec<Comment> {
        (1..=n)
            .map(|i| Comment {
                id: i,
                post_id: (i + 4) / 5,
                name: format!("name {i}"),
                email: format!("user{i}@mail.test"),
                body: "et omnis dolorem".to_string(),
            })
            .collect()
    }

    fn edits_for(argv: &[&str]) -> TableEdits {
        let mut full = vec!["commentboard"];
        full.extend_from_slice(argv);
        let args = CliArgs::parse_from(full);
        match build_run_config(args, ConfigFile::default()).unwrap().screen {
            Screen::Comments(edits) => edits,
            Screen::Profile => panic!("expected comments screen"),
        }
    }

    #[test]
    fn sort_flags_become_ordered_clicks() {
        let edits = edits_for(&["--sort", "name", "--sort", "name", "-k", "postId"]);
        assert_eq!(
            edits.sort_clicks,
            vec![SortKey::Name, SortKey::Name, SortKey::PostId]
        );
    }

    #[test]
    fn page_flag_is_one_based() {
        let edits = edits_for(&["--page", "3"]);
        assert_eq!(edits.page, Some(PageRequest::Goto(2)));
    }

    #[test]
    fn invalid_rows_are_rejected() {
        let args = CliArgs::parse_from(["commentboard", "--rows", "25"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn invalid_sort_key_is_rejected() {
        let args = CliArgs::parse_from(["commentboard", "--sort", "body"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn profile_rejects_table_options() {
        let args = CliArgs::parse_from(["commentboard", "--profile", "--search", "x"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
        let args = CliArgs::parse_from(["commentboard", "--profile"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.screen, Screen::Profile);
    }

    #[test]
    fn profile_rejects_reset() {
        let args = CliArgs::parse_from(["commentboard", "--profile", "--reset"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("--profile"));
    }

    #[test]
    fn flags_override_config_file() {
        let cfg = ConfigFile {
            timeout: Some(3),
            output_format: Some("json".to_string()),
            comments_url: Some("http://localhost:9/comments".to_string()),
            ..Default::default()
        };
        let args = CliArgs::parse_from(["commentboard", "--timeout", "7"]);
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.fetcher.timeout_seconds, 7);
        assert_eq!(run.output_format, OutputFormat::Json);
        assert_eq!(run.fetcher.comments_url, "http://localhost:9/comments");
        assert_eq!(run.fetcher.users_url, fetcher::DEFAULT_USERS_URL);
    }

    #[test]
    fn state_file_flag_overrides_default() {
        let args = CliArgs::parse_from(["commentboard", "--state-file", "/tmp/cb/state.json"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.state_file, PathBuf::from("/tmp/cb/state.json"));
    }

    #[test]
    fn edits_apply_in_order_and_persist() {
        let store = ViewStateStore::new(MemoryStorage::new());
        let mut dash = Dashboard::mount(comments(60), store);
        let edits = TableEdits {
            search: Some("name".to_string()),
            rows_per_page: Some(RowsPerPage::try_from(50).unwrap()),
            sort_clicks: vec![SortKey::Email, SortKey::Email],
            page: Some(PageRequest::Next),
            ..Default::default()
        };
        apply_edits(&mut dash, &edits);
        let expected = ViewState {
            page: 1,
            rows_per_page: RowsPerPage::try_from(50).unwrap(),
            search: "name".to_string(),
            sort: SortSpec::Desc(SortKey::Email),
        };
        assert_eq!(dash.state(), &expected);
        assert_eq!(dash.store().load(), expected);
        assert_eq!(dash.view().visible.len(), 10);
    }

    #[test]
    fn out_of_range_page_request_keeps_page() {
        let store = ViewStateStore::new(MemoryStorage::new());
        let mut dash = Dashboard::mount(comments(25), store);
        apply_edits(
            &mut dash,
            &TableEdits {
                page: Some(PageRequest::Goto(7)),
                ..Default::default()
            },
        );
        assert_eq!(dash.state().page, 0);
    }

    #[test]
    fn failed_fetch_keeps_stored_page() {
        let mut store = ViewStateStore::new(MemoryStorage::new());
        let saved = ViewState {
            page: 4,
            ..ViewState::default()
        };
        store.save(&saved).unwrap();
        let mut dash = Dashboard::mount(Vec::new(), store);
        apply_edits(&mut dash, &TableEdits::default());
        assert_eq!(dash.state(), &saved);
        assert_eq!(dash.view().range, None);
    }
}
