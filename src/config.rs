use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanReportError};
use crate::report::OutputFormat;
use crate::session::EngineSettings;

pub const DEFAULT_EXPORT_FILE: &str = "qr_code_scans_data.xlsx";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub export: Option<ExportConfig>,
    #[serde(default)]
    pub stats: Option<StatsConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineConfig {
    pub offset_hours: Option<i32>,
    pub weekly_threshold_days: Option<i64>,
    pub top_cities: Option<usize>,
    pub top_countries: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportConfig {
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StatsConfig {
    pub json: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolvedConfig {
    pub engine: EngineSettings,
    pub report: ResolvedReportConfig,
    pub export: ResolvedExportConfig,
    pub stats: ResolvedStatsConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedReportConfig {
    pub format: OutputFormat,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedExportConfig {
    pub output: PathBuf,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolvedStatsConfig {
    pub json: bool,
}

impl Default for ResolvedReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
        }
    }
}

impl Default for ResolvedExportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl ResolvedConfig {
    pub fn from_config(config: &Config) -> Self {
        let mut resolved = Self::default();
        if let Some(cfg) = &config.engine {
            apply_engine(&mut resolved.engine, cfg);
        }
        if let Some(cfg) = &config.report {
            resolved.report.apply(cfg);
        }
        if let Some(cfg) = &config.export {
            resolved.export.apply(cfg);
        }
        if let Some(cfg) = &config.stats {
            resolved.stats.apply(cfg);
        }
        resolved
    }
}

fn apply_engine(settings: &mut EngineSettings, cfg: &EngineConfig) {
    if let Some(value) = cfg.offset_hours {
        settings.offset_hours = value;
    }
    if let Some(value) = cfg.weekly_threshold_days {
        settings.weekly_threshold_days = value;
    }
    if let Some(value) = cfg.top_cities {
        settings.top_cities = value;
    }
    if let Some(value) = cfg.top_countries {
        settings.top_countries = value;
    }
}

impl ResolvedReportConfig {
    fn apply(&mut self, cfg: &ReportConfig) {
        if let Some(value) = cfg.format {
            self.format = value;
        }
    }
}

impl ResolvedExportConfig {
    fn apply(&mut self, cfg: &ExportConfig) {
        if let Some(value) = cfg.output.clone() {
            self.output = value;
        }
    }
}

impl ResolvedStatsConfig {
    fn apply(&mut self, cfg: &StatsConfig) {
        if let Some(value) = cfg.json {
            self.json = value;
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut config = Config::default();
    for path in SearchEnv::from_process().search_paths() {
        if !path.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&path)?;
        let parsed = parse_config(&contents).map_err(|err| {
            ScanReportError::InvalidArgs(format!(
                "Failed to parse config {}: {}",
                path.display(),
                err
            ))
        })?;
        merge_config(&mut config, parsed);
    }
    Ok(config)
}

pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

fn merge_config(base: &mut Config, other: Config) {
    merge_section(&mut base.engine, other.engine, EngineConfig::merge);
    merge_section(&mut base.report, other.report, ReportConfig::merge);
    merge_section(&mut base.export, other.export, ExportConfig::merge);
    merge_section(&mut base.stats, other.stats, StatsConfig::merge);
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
    if let Some(other_section) = other {
        match base {
            Some(existing) => merge(existing, other_section),
            None => *base = Some(other_section),
        }
    }
}

impl EngineConfig {
    fn merge(&mut self, other: EngineConfig) {
        merge_opt(&mut self.offset_hours, other.offset_hours);
        merge_opt(&mut self.weekly_threshold_days, other.weekly_threshold_days);
        merge_opt(&mut self.top_cities, other.top_cities);
        merge_opt(&mut self.top_countries, other.top_countries);
    }
}

impl ReportConfig {
    fn merge(&mut self, other: ReportConfig) {
        merge_opt(&mut self.format, other.format);
    }
}

impl ExportConfig {
    fn merge(&mut self, other: ExportConfig) {
        merge_opt(&mut self.output, other.output);
    }
}

impl StatsConfig {
    fn merge(&mut self, other: StatsConfig) {
        merge_opt(&mut self.json, other.json);
    }
}

fn merge_opt<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

/// Process locations that decide where config files are looked up.
#[derive(Clone, Debug, Default)]
struct SearchEnv {
    home: Option<PathBuf>,
    config_home: Option<PathBuf>,
    appdata: Option<PathBuf>,
    cwd: Option<PathBuf>,
}

impl SearchEnv {
    fn from_process() -> Self {
        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        Self {
            config_home: env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|| home.as_ref().map(|h| h.join(".config"))),
            appdata: env::var_os("APPDATA").map(PathBuf::from),
            cwd: env::current_dir().ok(),
            home,
        }
    }

    /// Config files in increasing priority: user-level files first, then
    /// each directory from the filesystem root down to the working directory.
    fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home) = &self.home {
            if let Some(config_home) = &self.config_home {
                paths.push(config_home.join("scanreport").join("scanreport.toml"));
            }
            if let Some(appdata) = &self.appdata {
                paths.push(appdata.join("scanreport").join("scanreport.toml"));
            }
            paths.push(home.join(".scanreportrc"));
        }

        if let Some(cwd) = &self.cwd {
            let mut dirs: Vec<&Path> = cwd.ancestors().collect();
            dirs.reverse();
            for dir in dirs {
                paths.push(dir.join(".scanreportrc"));
                paths.push(dir.join("scanreport.toml"));
            }
        }

        paths
    }
}

pub fn render_config(config: &ResolvedConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|err| ScanReportError::InvalidArgs(format!("Failed to render config: {}", err)))
}
