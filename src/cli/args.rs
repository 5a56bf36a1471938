use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "commentboard",
    version,
    about = "searchable, sortable, paginated comments dashboard",
    long_about = "Commentboard fetches comment records from a REST endpoint and shows them as a searchable, sortable, paginated table. The page, page size, search text and sort are remembered between runs.\n\nExamples:\n  commentboard\n  commentboard --search laudantium --sort name\n  commentboard --sort name --sort name --page 3\n  commentboard --rows 50 --next\n  commentboard --profile\n\nTip: each --sort is one click on that column; clicking the same column cycles ascending, descending, unsorted."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'w',
        long = "tw",
        visible_alias = "truncate-width",
        value_name = "N",
        help_heading = "Output",
        help = "Characters of each comment shown before it is cut."
    )]
    pub truncate_width: Option<usize>,

    #[arg(
        short = 'P',
        long = "pf",
        visible_alias = "profile",
        help_heading = "View",
        help = "Show the user profile instead of the comments table."
    )]
    pub profile: bool,

    #[arg(
        short = 's',
        long = "sr",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Table",
        help = "Search name, email and comment (case-insensitive). An empty value clears the search."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'k',
        long = "st",
        visible_alias = "sort",
        value_name = "KEY",
        action = ArgAction::Append,
        help_heading = "Table",
        help = "Click a sort column: postId, name or email (repeatable)."
    )]
    pub sort: Vec<String>,

    #[arg(
        short = 'r',
        long = "rpp",
        visible_aliases = ["rows", "rows-per-page"],
        value_name = "N",
        help_heading = "Table",
        help = "Rows per page (10, 50 or 100). Changing it returns to the first page."
    )]
    pub rows: Option<usize>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Table",
        help = "Go to page N (1-based). Pages that do not exist are ignored."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "nx",
        visible_alias = "next",
        conflicts_with_all = ["page", "prev"],
        help_heading = "Table",
        help = "Go to the next page."
    )]
    pub next: bool,

    #[arg(
        long = "pv",
        visible_alias = "prev",
        conflicts_with = "page",
        help_heading = "Table",
        help = "Go to the previous page."
    )]
    pub prev: bool,

    #[arg(
        long = "rs",
        visible_alias = "reset",
        help_heading = "Table",
        help = "Forget the remembered page, page size, search and sort."
    )]
    pub reset: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.commentboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'S',
        long = "sf",
        visible_alias = "state-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "File the table state is remembered in (defaults to ~/.commentboard/storage.json)."
    )]
    pub state_file: Option<String>,

    #[arg(
        long = "cu",
        visible_alias = "comments-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Endpoint returning the JSON array of comments."
    )]
    pub comments_url: Option<String>,

    #[arg(
        long = "uu",
        visible_alias = "users-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Endpoint returning the JSON array of users; the first one is shown."
    )]
    pub users_url: Option<String>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,
}
