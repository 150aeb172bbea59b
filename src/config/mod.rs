//! Runtime configuration.
//!
//! Options come from an optional YAML config file overlaid with CLI flags
//! (flags win). The file is looked up at `--config PATH`, then
//! `.db2erd.yaml` in the working directory, then `~/.db2erd.yaml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Description sources recognized in `show_descriptions`
pub const DESCRIPTION_ENUM_VALUES: &str = "enumValues";
pub const DESCRIPTION_COLUMN_COMMENTS: &str = "columnComments";

const CONFIG_FILE_NAME: &str = ".db2erd.yaml";

/// All recognized options, each independently settable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErdConfig {
    /// Connection string; empty means "ask interactively"
    #[serde(default)]
    pub connection_string: String,
    /// Suggestions offered by the interactive connection prompt
    #[serde(default)]
    pub connection_string_suggestions: Vec<String>,
    /// Explicit schema list; bypasses schema introspection
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Take every available schema without prompting
    #[serde(default)]
    pub use_all_schemas: bool,
    /// Explicit `schema.table` list; bypasses table introspection
    #[serde(default)]
    pub selected_tables: Vec<String>,
    /// Take every table without prompting
    #[serde(default)]
    pub use_all_tables: bool,
    /// Description sources: `enumValues`, `columnComments`
    #[serde(default)]
    pub show_descriptions: Vec<String>,
    /// Render no PK/FK attribute key markers
    #[serde(default)]
    pub omit_attribute_keys: bool,
    /// Render relationships without column labels
    #[serde(default)]
    pub omit_constraint_labels: bool,
    /// Render constraints even when an endpoint table is not selected
    #[serde(default)]
    pub show_all_constraints: bool,
    /// Prefix table names with their schema
    #[serde(default)]
    pub show_schema_prefix: bool,
    /// Separator between schema and table name
    #[serde(default = "default_separator")]
    pub schema_prefix_separator: String,
    /// Wrap the output in a ```mermaid code fence
    #[serde(default)]
    pub enclose_with_mermaid_backticks: bool,
    /// Output file; empty means stdout
    #[serde(default)]
    pub output_file_name: String,
}

fn default_separator() -> String {
    "_".to_string()
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            connection_string_suggestions: Vec::new(),
            schemas: Vec::new(),
            use_all_schemas: false,
            selected_tables: Vec::new(),
            use_all_tables: false,
            show_descriptions: Vec::new(),
            omit_attribute_keys: false,
            omit_constraint_labels: false,
            show_all_constraints: false,
            show_schema_prefix: false,
            schema_prefix_separator: default_separator(),
            enclose_with_mermaid_backticks: false,
            output_file_name: String::new(),
        }
    }
}

impl ErdConfig {
    /// Load configuration from `path`, or from the first discovered config
    /// file, or defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_file(),
        };

        match file {
            Some(file) => Self::from_file(&file),
            None => Ok(Self::default()),
        }
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn shows_enum_values(&self) -> bool {
        self.show_descriptions
            .iter()
            .any(|s| s == DESCRIPTION_ENUM_VALUES)
    }

    pub fn shows_column_comments(&self) -> bool {
        self.show_descriptions
            .iter()
            .any(|s| s == DESCRIPTION_COLUMN_COMMENTS)
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let cwd = PathBuf::from(CONFIG_FILE_NAME);
    if cwd.exists() {
        return Some(cwd);
    }

    let home = dirs::home_dir()?.join(CONFIG_FILE_NAME);
    home.exists().then_some(home)
}
