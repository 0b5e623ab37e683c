// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use htmlview_render::visual::SUPPORT_URL;
use htmlview_render::VisualOptions;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

pub const APP_NAME: &str = "htmlview";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOCALE: &str = "en-US";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub render: Render,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            render: Render::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Render {
    pub sanitize: Option<bool>,
    pub locale: Option<String>,
    pub support_url: Option<String>,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            sanitize: Some(true),
            locale: Some(DEFAULT_LOCALE.to_owned()),
            support_url: Some(SUPPORT_URL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: Some(DEFAULT_LOG_FILTER.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HTMLVIEW_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set HTMLVIEW_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [render] and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(locale) = &self.render.locale
            && locale.trim().is_empty()
        {
            bail!(
                "render.locale in {} must not be empty; use a tag such as \"en-US\"",
                path.display()
            );
        }

        if let Some(support_url) = &self.render.support_url {
            let parsed = Url::parse(support_url).with_context(|| {
                format!(
                    "render.support_url in {} is not an absolute URL: {support_url:?}",
                    path.display()
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "render.support_url in {} must use http or https, got {:?}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(filter) = &self.log.filter {
            EnvFilter::try_new(filter).with_context(|| {
                format!(
                    "log.filter in {} is not a valid filter directive: {filter:?}",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn sanitize(&self) -> bool {
        self.render.sanitize.unwrap_or(true)
    }

    pub fn locale(&self) -> &str {
        self.render.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    pub fn support_url(&self) -> &str {
        self.render.support_url.as_deref().unwrap_or(SUPPORT_URL)
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn visual_options(&self) -> VisualOptions {
        VisualOptions {
            sanitize: self.sanitize(),
            support_url: self.support_url().to_owned(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# htmlview config\n# Place this file at: {}\n\nversion = 1\n\n[render]\n# Turning this off renders row content exactly as supplied.\nsanitize = true\nlocale = \"{}\"\nsupport_url = \"{}\"\n\n[log]\n# RUST_LOG takes precedence when set.\nfilter = \"{}\"\n",
            path.display(),
            DEFAULT_LOCALE,
            SUPPORT_URL,
            DEFAULT_LOG_FILTER,
        )
    }
}
