//! Engine settings loaded from `settings.conf`.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Directory name used under the user's config home.
const APP_DIR: &str = "invoice-tray";

/// How aggregation and checkout treat selections spanning several currencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MixedCurrencyPolicy {
    /// Take the first entry's currency and sum everything (reference behavior).
    #[default]
    FirstWins,
    /// Refuse to build a checkout payload for mixed currencies.
    Reject,
}

impl MixedCurrencyPolicy {
    /// Parse a policy from its settings key.
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_wins" | "first" => Some(Self::FirstWins),
            "reject" | "error" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Which rows the "select all" header checkbox acts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectAllScope {
    /// Rows of the visible page only.
    #[default]
    Page,
    /// Every row loaded for the current filter context.
    Loaded,
}

impl SelectAllScope {
    /// Parse a scope from its settings key.
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" | "current_page" => Some(Self::Page),
            "loaded" | "all" | "across_pages" => Some(Self::Loaded),
            _ => None,
        }
    }
}

/// Decimal places per currency code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyTable {
    /// Fallback for codes without an explicit entry.
    pub default_decimals: u32,
    /// Per-code overrides keyed by upper-case code.
    pub decimals: HashMap<String, u32>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        let decimals = [("JPY", 0), ("KRW", 0), ("BHD", 3), ("KWD", 3)]
            .into_iter()
            .map(|(code, dp)| (code.to_string(), dp))
            .collect();
        Self {
            default_decimals: 2,
            decimals,
        }
    }
}

impl CurrencyTable {
    /// Decimal places configured for `code`.
    pub fn decimals_for(&self, code: &str) -> u32 {
        self.decimals
            .get(&code.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(self.default_decimals)
    }

    /// What: Merge a `CODE:N, CODE:N` list into the table.
    ///
    /// Details:
    /// - Malformed pairs are skipped; decimal places above 8 are ignored.
    pub fn merge_pairs(&mut self, raw: &str) {
        for pair in raw.split(',') {
            let Some((code, dp)) = pair.split_once(':') else {
                continue;
            };
            let code = code.trim().to_ascii_uppercase();
            if code.is_empty() {
                continue;
            }
            if let Ok(dp) = dp.trim().parse::<u32>()
                && dp <= 8
            {
                self.decimals.insert(code, dp);
            }
        }
    }
}

/// User-tunable engine settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    /// Default page size.
    pub page_size: usize,
    /// Page sizes offered by the pagination control.
    pub page_size_options: Vec<usize>,
    /// Decimal places per currency.
    pub currencies: CurrencyTable,
    /// Mixed-currency handling.
    pub mixed_currency: MixedCurrencyPolicy,
    /// Header checkbox scope.
    pub select_all_scope: SelectAllScope,
    /// Timeout applied by the HTTP collaborators.
    pub request_timeout_secs: u64,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![10, 20, 30],
            currencies: CurrencyTable::default(),
            mixed_currency: MixedCurrencyPolicy::default(),
            select_all_scope: SelectAllScope::default(),
            request_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

/// What: Check if a line should be skipped (empty or comment).
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Split a `key = value` line, normalizing the key.
///
/// Output:
/// - `Some((key, value))` with the key lower-cased and `.`/`-`/space mapped to `_`.
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once('=')?;
    let key = key.trim().to_lowercase().replace(['.', '-', ' '], "_");
    let value = match value.find(" #") {
        Some(pos) => &value[..pos],
        None => value,
    };
    Some((key, value.trim().to_string()))
}

impl EngineSettings {
    /// What: Parse settings from `settings.conf` content on top of defaults.
    ///
    /// Inputs:
    /// - `content`: File content.
    ///
    /// Output:
    /// - Settings with every recognized key applied.
    ///
    /// Details:
    /// - Unknown keys and unparsable values are ignored (logged at debug level).
    pub fn from_conf_str(content: &str) -> Self {
        let mut settings = Self::default();
        for line in content.lines() {
            if skip_comment_or_empty(line) {
                continue;
            }
            let Some((key, val)) = parse_key_value(line) else {
                continue;
            };
            if !settings.apply_key(&key, &val) {
                tracing::debug!(key = %key, value = %val, "ignoring settings entry");
            }
        }
        settings
    }

    /// Apply one entry; returns `false` when the key or value is not usable.
    fn apply_key(&mut self, key: &str, val: &str) -> bool {
        match key {
            "page_size" | "per_page" => match val.parse::<usize>() {
                Ok(v) if v > 0 => {
                    self.page_size = v;
                    true
                }
                _ => false,
            },
            "page_size_options" => {
                let opts: Vec<usize> = val
                    .split(',')
                    .filter_map(|s| s.trim().parse::<usize>().ok())
                    .filter(|v| *v > 0)
                    .collect();
                if opts.is_empty() {
                    return false;
                }
                self.page_size_options = opts;
                true
            }
            "default_currency_decimals" => match val.parse::<u32>() {
                Ok(v) if v <= 8 => {
                    self.currencies.default_decimals = v;
                    true
                }
                _ => false,
            },
            "currency_decimals" => {
                self.currencies.merge_pairs(val);
                true
            }
            "mixed_currency" => MixedCurrencyPolicy::from_config_key(val)
                .map(|p| self.mixed_currency = p)
                .is_some(),
            "select_all_scope" => SelectAllScope::from_config_key(val)
                .map(|s| self.select_all_scope = s)
                .is_some(),
            "request_timeout_secs" => val
                .parse::<u64>()
                .map(|v| self.request_timeout_secs = v)
                .is_ok(),
            "log_level" => {
                if val.is_empty() {
                    return false;
                }
                self.log_level = val.to_string();
                true
            }
            _ => false,
        }
    }

    /// What: Load settings from `path`, falling back to defaults when unreadable.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::info!(path = %path.display(), "loaded settings");
                Self::from_conf_str(&content)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read settings; using defaults");
                Self::default()
            }
        }
    }

    /// Load settings from the resolved config path, or defaults when none exists.
    pub fn load() -> Self {
        resolve_settings_config_path().map_or_else(Self::default, |p| Self::load_from(&p))
    }
}

/// What: Candidate config directories, `$HOME/.config` first, then `$XDG_CONFIG_HOME`.
fn config_dir_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(h) = env::var("HOME") {
        candidates.push(Path::new(&h).join(".config").join(APP_DIR));
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        candidates.push(Path::new(&xdg).join(APP_DIR));
    }
    candidates
}

/// Determine the settings file path, searching in priority order.
pub fn resolve_settings_config_path() -> Option<PathBuf> {
    config_dir_candidates()
        .into_iter()
        .map(|d| d.join("settings.conf"))
        .find(|p| p.is_file())
}

/// Directory for log files (`<config>/logs`); `None` when no home is known.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir_candidates()
        .into_iter()
        .next()
        .map(|d| d.join("logs"))
}
