use clap::{Parser, ValueEnum};
use cricket_api::client::ApiConfig;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Namma Cricket in your terminal")]
pub struct Cli {
    /// Project URL of the backend, e.g. https://xyz.supabase.co
    #[arg(long, env = "CRICTUI_SUPABASE_URL")]
    pub supabase_url: String,

    /// Public anon key of the project
    #[arg(long, env = "CRICTUI_SUPABASE_ANON_KEY", hide_env_values = true)]
    pub anon_key: String,

    /// Where the signed-in session is kept between runs
    #[arg(long, env = "CRICTUI_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[arg(long, env = "CRICTUI_LOG_LEVEL", value_enum, default_value_t = LogLevel::Error)]
    pub log_level: LogLevel,

    /// Start without the tab bar
    #[arg(long)]
    pub full_screen: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "lower_case")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub api: ApiConfig,
    pub session_file: PathBuf,
}

impl AppSettings {
    pub fn from_cli(cli: Cli) -> Self {
        let session_file = cli.session_file.unwrap_or_else(|| {
            default_session_file(std::env::var("XDG_CONFIG_HOME").ok(), std::env::var("HOME").ok())
        });
        Self {
            full_screen: cli.full_screen,
            log_level: cli.log_level.into(),
            api: ApiConfig::new(cli.supabase_url, cli.anon_key),
            session_file,
        }
    }
}

fn default_session_file(config_home: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(config_dir) = config_home.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(config_dir).join("crictui").join("session.json");
    }
    if let Some(home) = home.filter(|h| !h.trim().is_empty()) {
        return PathBuf::from(home).join(".config").join("crictui").join("session.json");
    }
    PathBuf::from("crictui-session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_prefers_xdg() {
        let path = default_session_file(Some("/tmp/cfg".into()), Some("/home/asha".into()));
        assert_eq!(path, PathBuf::from("/tmp/cfg/crictui/session.json"));
    }

    #[test]
    fn test_session_file_falls_back_to_home() {
        let path = default_session_file(Some("  ".into()), Some("/home/asha".into()));
        assert_eq!(path, PathBuf::from("/home/asha/.config/crictui/session.json"));
        assert_eq!(default_session_file(None, None), PathBuf::from("crictui-session.json"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "crictui",
            "--supabase-url",
            "https://demo.supabase.co/",
            "--anon-key",
            "k",
            "--log-level",
            "debug",
            "--session-file",
            "/tmp/s.json",
            "--full-screen",
        ])
        .unwrap();
        let settings = AppSettings::from_cli(cli);
        assert_eq!(settings.api.base_url, "https://demo.supabase.co");
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.session_file, PathBuf::from("/tmp/s.json"));
        assert!(settings.full_screen);
    }
}
