use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub comments_url: Option<String>,
    pub users_url: Option<String>,
    #[serde(alias = "storage_file")]
    pub state_file: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub truncate_width: Option<usize>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

fn app_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".commentboard"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(app_dir()?.join("config.yml"))
}

/// Where the view state lives when neither flag nor config names a file.
pub fn default_state_path() -> PathBuf {
    app_dir()
        .unwrap_or_else(|| PathBuf::from(".commentboard"))
        .join("storage.json")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Commentboard config
#
# Location (default):
#   ~/.commentboard/config.yml

# Endpoints
comments_url: https://jsonplaceholder.typicode.com/comments
users_url: https://jsonplaceholder.typicode.com/users

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080

# Where the table's page, page size, search and sort are remembered
# state_file: ~/.commentboard/storage.json

# Output
output_format: text
no_color: false
truncate_width: 40
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

/// Loads the config at the default location, writing the commented template
/// there first when no file exists yet. A template that cannot be written is
/// not fatal: the error comes back next to the built-in defaults.
pub fn load_or_init_config(path: &PathBuf) -> Result<(ConfigFile, Option<String>), String> {
    match ensure_default_config_file(path) {
        Ok(()) => Ok((load_config(path, false)?, None)),
        Err(e) => Ok((ConfigFile::default(), Some(e))),
    }
}
