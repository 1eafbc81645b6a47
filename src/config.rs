use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Error;

/// Output syntax for heading anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum AnchorStyle {
    /// Trailing-brace style: `Heading {#anchor}`.
    GitBook,
    /// Inline-tag style: `<a name="anchor"></a> Heading`.
    GitHub,
}

/// Output partitioning policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One page per module, dotted names mapped to a directory tree.
    PerModule,
    /// Every module concatenated into a single `index.md`; all cross-module
    /// links collapse to same-page anchors.
    SingleFile,
}

/// Generation options, loaded from `docpage.toml` and overridable from the
/// command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Heading anchor syntax.
    pub anchor_style: AnchorStyle,
    /// Whether entities with a leading-underscore name are documented.
    pub include_private: bool,
    /// Display labels for special alias types, keyed by fully-qualified name.
    /// Consulted first by the type formatter.
    pub labels: BTreeMap<String, String>,
    /// Output partitioning policy.
    pub layout: Layout,
    /// Whether builtin type names link to the upstream language docs.
    pub stdlib_links: bool,
}

/// Raw TOML structure for `docpage.toml`.
#[derive(serde::Deserialize)]
struct DocpageTomlConfig {
    anchor_style: Option<AnchorStyle>,
    #[serde(default)]
    include_private: bool,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    layout: Option<Layout>,
    #[serde(default)]
    stdlib_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchor_style: AnchorStyle::GitHub,
            include_private: false,
            labels: BTreeMap::new(),
            layout: Layout::PerModule,
            stdlib_links: false,
        }
    }
}

impl Config {
    /// Load config from `docpage.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join("docpage.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DocpageTomlConfig = toml::from_str(&content)?;
        let defaults = Self::default();
        Ok(Self {
            anchor_style: raw.anchor_style.unwrap_or(defaults.anchor_style),
            include_private: raw.include_private,
            labels: raw.labels,
            layout: raw.layout.unwrap_or(defaults.layout),
            stdlib_links: raw.stdlib_links,
        })
    }
}
