use std::path::PathBuf;
use std::str::FromStr;

use lazy_regex::regex_is_match;
use log::LevelFilter;
use structopt::StructOpt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirPathParseError {
    #[error("exists, but is not a directory")]
    InvalidType,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptError {
    #[error("team name is required (--team or SLACK_TEAM)")]
    MissingTeam,
    #[error("access token is required (--token or SLACK_TOKEN)")]
    MissingToken,
    #[error("invalid team name `{0}`")]
    InvalidTeam(String),
    #[error("--parallel must be at least 1")]
    NoParallelism,
    #[error("--timeout must be at least 1 second")]
    NoTimeout,
}

/// Missing directories are fine, they get created once there is something to write
fn valid_dir_path(src: &str) -> Result<PathBuf, DirPathParseError> {
    let path = PathBuf::from(src);
    match path.metadata() {
        Ok(meta) if !meta.is_dir() => Err(DirPathParseError::InvalidType),
        _ => Ok(path),
    }
}

/// Where the emote list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manifest,
    Twitch,
    Bttv,
}

impl Source {
    pub const VARIANTS: [&'static str; 3] = ["manifest", "twitch", "bttv"];
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manifest" => Ok(Self::Manifest),
            "twitch" => Ok(Self::Twitch),
            "bttv" => Ok(Self::Bttv),
            other => Err(format!("unknown source `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub team: String,
    pub token: String,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "slackmote",
    about = "Upload Twitch and BTTV emotes as custom emoji to a Slack workspace."
)]
pub struct Opt {
    /// Team or workspace name, as in `<team>.slack.com`
    #[structopt(long, env = "SLACK_TEAM")]
    pub team: Option<String>,

    /// Access token sent along with every upload
    #[structopt(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where to get the emote list from
    #[structopt(long, default_value = "manifest", possible_values = &Source::VARIANTS)]
    pub source: Source,

    /// Manifest to read emotes from when the source is `manifest`
    #[structopt(long, parse(from_os_str), default_value = "twitch.yaml")]
    pub file: PathBuf,

    /// Image size to request from BTTV
    #[structopt(
        long = "bttv-size",
        default_value = "1x",
        possible_values = &crate::bttv::SIZES
    )]
    pub bttv_size: String,

    /// Write the acquired emotes to `<dir>/<title>.yaml`
    #[structopt(long, parse(try_from_str = valid_dir_path))]
    pub export: Option<PathBuf>,

    /// Only list the acquired emotes, don't download or upload anything
    #[structopt(long)]
    pub list: bool,

    /// How many emotes to download and upload at the same time
    #[structopt(long, default_value = "1")]
    pub parallel: usize,

    /// Milliseconds to wait after each upload
    #[structopt(long = "delay-ms", default_value = "0")]
    pub delay_ms: u64,

    /// Timeout in seconds for every request
    #[structopt(long, default_value = "30")]
    pub timeout: u64,

    /// One of `off`, `error`, `warn`, `info`, `debug` or `trace`
    #[structopt(long = "log-level", default_value = "info")]
    pub log_level: LevelFilter,

    #[structopt(long = "twitch-catalog-url", hidden = true)]
    pub twitch_catalog_url: Option<String>,

    #[structopt(long = "twitch-image-template", hidden = true)]
    pub twitch_image_template: Option<String>,

    #[structopt(long = "bttv-catalog-url", hidden = true)]
    pub bttv_catalog_url: Option<String>,

    #[structopt(long = "workspace-url", hidden = true)]
    pub workspace_url: Option<String>,
}

impl Opt {
    /// Check everything that has to be present before any request is made
    pub fn credentials(&self) -> Result<Credentials, OptError> {
        let team = self.team.as_deref().map(str::trim).unwrap_or_default();
        let token = self.token.as_deref().map(str::trim).unwrap_or_default();

        if team.is_empty() {
            return Err(OptError::MissingTeam);
        }
        if token.is_empty() {
            return Err(OptError::MissingToken);
        }
        if !regex_is_match!(r"^[A-Za-z0-9][A-Za-z0-9-]*$", team) {
            return Err(OptError::InvalidTeam(team.to_string()));
        }
        if self.parallel == 0 {
            return Err(OptError::NoParallelism);
        }
        if self.timeout == 0 {
            return Err(OptError::NoTimeout);
        }

        Ok(Credentials {
            team: team.to_string(),
            token: token.to_string(),
        })
    }
}
