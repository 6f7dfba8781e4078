// SPDX-License-Identifier: MPL-2.0

//! Storage utilities: the preference cookie jar and the plain-text save action
//!
//! Preferences are kept as browser-style cookies, one `Set-Cookie` line per
//! cookie, so the persisted file reads the same as a cookie header:
//!
//! ```text
//! theme=dark; expires=Tue, 19 Oct 2027 10:00:00 GMT; path=/; SameSite=Lax
//! ```

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// A single persisted cookie
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Absent for session cookies
    pub expires: Option<DateTime<Utc>>,
    pub path: String,
    pub same_site: SameSite,
}

impl Cookie {
    /// Cookie expiring `days` from `now` on path `/` with `SameSite=Lax`
    pub fn with_max_age(name: &str, value: &str, days: i64, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires: Some(now + Duration::days(days)),
            path: crate::constants::theme::COOKIE_PATH.to_string(),
            same_site: SameSite::Lax,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Serialize in `Set-Cookie` form
    pub fn to_header(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(expires) = self.expires {
            header.push_str("; expires=");
            header.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        header.push_str("; path=");
        header.push_str(&self.path);
        header.push_str("; SameSite=");
        header.push_str(self.same_site.as_str());
        header
    }

    /// Parse a `Set-Cookie` line. Unknown attributes are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            value: value.trim().to_string(),
            expires: None,
            path: crate::constants::theme::COOKIE_PATH.to_string(),
            same_site: SameSite::default(),
        };

        for attribute in parts {
            let (key, val) = attribute.split_once('=').unwrap_or((attribute, ""));
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => {
                    cookie.expires = DateTime::parse_from_rfc2822(val.trim())
                        .ok()
                        .map(|t| t.with_timezone(&Utc));
                }
                "path" => cookie.path = val.trim().to_string(),
                "samesite" => {
                    if let Some(same_site) = SameSite::parse(val) {
                        cookie.same_site = same_site;
                    }
                }
                _ => {}
            }
        }

        Some(cookie)
    }
}

/// Key/value preference storage
///
/// Writes may fail (read-only home, missing config dir); callers decide
/// whether that matters.
pub trait PreferenceStore {
    /// Current value, `None` if absent or expired
    fn get(&self, name: &str) -> Option<String>;

    /// Store `value` under `name` for `max_age_days`
    fn set(&mut self, name: &str, value: &str, max_age_days: i64) -> AppResult<()>;
}

/// Cookie jar persisted to a single file, or kept in memory
#[derive(Debug, Default)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: BTreeMap<String, Cookie>,
}

impl CookieJar {
    /// Jar that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the jar at `path`. A missing or unreadable file yields an empty jar.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cookies = match std::fs::read_to_string(&path) {
            Ok(contents) => contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| match Cookie::parse(line) {
                    Some(cookie) => Some((cookie.name.clone(), cookie)),
                    None => {
                        warn!(line, "Ignoring malformed cookie line");
                        None
                    }
                })
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read cookie jar");
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), count = cookies.len(), "Cookie jar opened");
        Self {
            path: Some(path),
            cookies,
        }
    }

    /// Default jar location inside the application config directory
    pub fn default_path() -> Option<PathBuf> {
        crate::config::config_dir().map(|dir| dir.join("cookies"))
    }

    /// Look up a live cookie
    pub fn cookie(&self, name: &str, now: DateTime<Utc>) -> Option<&Cookie> {
        self.cookies
            .get(name.trim())
            .filter(|cookie| !cookie.is_expired(now))
    }

    /// Insert or replace a cookie and persist the jar
    pub fn insert(&mut self, cookie: Cookie) -> AppResult<()> {
        self.cookies.insert(cookie.name.clone(), cookie);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let now = Utc::now();
        let mut contents = String::new();
        for cookie in self.cookies.values().filter(|c| !c.is_expired(now)) {
            contents.push_str(&cookie.to_header());
            contents.push('\n');
        }

        std::fs::write(path, contents)?;
        debug!(path = %path.display(), "Cookie jar written");
        Ok(())
    }
}

impl PreferenceStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookie(name, Utc::now()).map(|c| c.value.clone())
    }

    fn set(&mut self, name: &str, value: &str, max_age_days: i64) -> AppResult<()> {
        self.insert(Cookie::with_max_age(name, value, max_age_days, Utc::now()))
    }
}

/// Write `content` as a UTF-8 text file named `file_name` inside `dir`
///
/// The directory is created if needed. An existing file is overwritten.
pub fn save_text(dir: &Path, file_name: &str, content: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::Storage(format!("{}: {}", dir.display(), e)))?;

    let path = dir.join(file_name);
    std::fs::write(&path, content.as_bytes())
        .map_err(|e| AppError::Storage(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), bytes = content.len(), "Saved scan result");
    Ok(path)
}
