use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use teller_core::Rollover;
use teller_ingest::ProcessorOptions;

pub const DEFAULT_CONFIG_FILE: &str = "teller.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub extraction: ExtractionSection,
    pub run: RunSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// Directory holding `<page_count>.json` table templates.
    pub templates_dir: PathBuf,
    pub x_tolerance: f64,
    /// Treat a December line printed after January lines as the previous year.
    pub backward_year_rollover: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Keep processing other statements after one fails.
    pub keep_going: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            extraction: ExtractionSection::default(),
            run: RunSection::default(),
        }
    }
}

impl Default for ExtractionSection {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("tabula_templates"),
            x_tolerance: 1.0,
            backward_year_rollover: true,
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            keep_going: false,
            format: OutputFormat::Csv,
        }
    }
}

impl Config {
    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            templates_dir: self.extraction.templates_dir.clone(),
            x_tolerance: self.extraction.x_tolerance,
            narrative_rollover: Rollover::Boundary {
                backward: self.extraction.backward_year_rollover,
            },
        }
    }
}

/// Load `path`, or `./teller.toml` when no path is given. Only an explicit
/// path is required to exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[extraction]
backward_year_rollover = false

[run]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.extraction.templates_dir, PathBuf::from("tabula_templates"));
        assert!(!cfg.extraction.backward_year_rollover);
        assert_eq!(cfg.run.format, OutputFormat::Json);
        assert_eq!(
            cfg.processor_options().narrative_rollover,
            Rollover::Boundary { backward: false }
        );
    }

    #[test]
    fn test_init_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        init_config(&path).unwrap();
        assert_eq!(load_config(Some(path.as_path())).unwrap(), Config::default());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(missing.as_path())).is_err());
    }
}
