use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::loader::LoadOptions;

#[derive(Deserialize, Debug)]
pub struct Site {
    pub title: String,
    pub site_url: String,
    pub feed_url: Option<String>,
    pub description: Option<String>,
}

impl Site {
    pub fn feed_url(&self) -> String {
        match self.feed_url {
            Some(ref url) => url.clone(),
            None => format!("{}/feed.xml", self.site_url.trim_end_matches('/')),
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub feed_output: PathBuf,
    pub projects_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub content: LoadOptions,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "Could not find the executable directory")
    })?;
    let relative = path.strip_prefix("${exe_dir}")
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;
    Ok(exe_dir.join(relative))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir)?,
        feed_output: parse_path(cfg.paths.feed_output)?,
        projects_dir: cfg.paths.projects_dir.map(parse_path).transpose()?,
    };
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
