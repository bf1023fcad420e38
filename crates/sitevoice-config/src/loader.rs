use crate::schema::{GithubConfig, PlannerConfig};
use crate::Config;
use anyhow::{Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: [&str; 2] = ["sitevoice.jsonc", "sitevoice.json"];

static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{env:([^}]+)\}").expect("env reference regex"));

pub struct ConfigLoader {
    config: Config,
    config_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            config_paths: Vec::new(),
        }
    }

    /// Files merged so far, in load order.
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        let content = substitute_env_vars(content);
        let config = parse_jsonc(&content).with_context(|| "Failed to parse config content")?;
        self.config.merge(config);
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let content = substitute_env_vars(&content);
        let config = parse_jsonc(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        self.config.merge(config);
        self.config_paths.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(())
    }

    /// `<config_dir>/sitevoice/sitevoice.json{c}`; the `.jsonc` variant wins.
    pub fn load_global(&mut self) -> Result<()> {
        let Some(dir) = global_config_dir() else {
            return Ok(());
        };
        self.load_first_of(&dir)
    }

    pub fn load_project<P: AsRef<Path>>(&mut self, project_dir: P) -> Result<()> {
        self.load_first_of(project_dir.as_ref())
    }

    fn load_first_of(&mut self, dir: &Path) -> Result<()> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return self.load_from_file(&path);
            }
        }
        Ok(())
    }

    pub fn load_from_env(&mut self) -> Result<()> {
        if let Ok(config_path) = env::var("SITEVOICE_CONFIG") {
            self.load_from_file(&config_path)?;
        }
        Ok(())
    }

    pub fn load_from_env_content(&mut self) -> Result<()> {
        if let Ok(config_content) = env::var("SITEVOICE_CONFIG_CONTENT") {
            self.load_from_str(&config_content)?;
        }
        Ok(())
    }

    /// Deployment variables (`OPENAI_API_KEY`, `GITHUB_TOKEN`, ...) override
    /// anything read from files. Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| env::var(name).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let github = GithubConfig {
            token: read("GITHUB_TOKEN"),
            repo: read("GITHUB_REPO"),
            base_branch: read("GITHUB_BASE_BRANCH"),
            ..Default::default()
        };
        let planner = PlannerConfig {
            api_key: read("OPENAI_API_KEY"),
            model: read("OPENAI_MODEL"),
            ..Default::default()
        };

        self.config.merge(Config {
            github: Some(github),
            planner: Some(planner),
            ..Default::default()
        });
    }

    /// Merge order, lowest precedence first:
    /// 1. Global config (`<config_dir>/sitevoice/sitevoice.json{,c}`)
    /// 2. Custom config file (`SITEVOICE_CONFIG`)
    /// 3. Project config (`sitevoice.json{,c}` in `project_dir`)
    /// 4. Inline config (`SITEVOICE_CONFIG_CONTENT`)
    /// 5. Deployment variables
    pub fn load_all<P: AsRef<Path>>(&mut self, project_dir: P) -> Result<Config> {
        self.load_global()?;
        self.load_from_env()?;
        self.load_project(project_dir)?;
        self.load_from_env_content()?;
        self.apply_env_overrides();
        Ok(self.config.clone())
    }

    pub fn into_config(self) -> Config {
        self.config
    }
}

fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sitevoice"))
}

/// Replace `{env:VAR}` references; unset variables become empty strings.
fn substitute_env_vars(text: &str) -> String {
    ENV_REFERENCE
        .replace_all(text, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_default()
        })
        .to_string()
}

fn parse_jsonc(content: &str) -> Result<Config> {
    let parse_options = ParseOptions {
        allow_trailing_commas: true,
        ..Default::default()
    };
    let parsed = parse_to_serde_value(content, &parse_options)
        .with_context(|| "Failed to parse JSONC")?
        .context("Config content is empty")?;
    serde_json::from_value(parsed).with_context(|| "Failed to parse config JSON")
}

pub fn load_config<P: AsRef<Path>>(project_dir: P) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    loader.load_all(project_dir)
}
