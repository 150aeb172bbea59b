//! Interactive prompts for connection, schema, and table selection.

use anyhow::{bail, Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Blocking interactive questions the selector falls back to when neither
/// configuration nor introspection settles a choice.
pub trait Questioner {
    /// Ask for a connection string, offering the configured suggestions.
    fn ask_connection_question(&mut self, suggestions: &[String]) -> Result<String>;
    /// Multi-select from the available schema names.
    fn ask_schema_question(&mut self, options: &[String]) -> Result<Vec<String>>;
    /// Multi-select from the available `schema.table` names.
    fn ask_table_question(&mut self, options: &[String]) -> Result<Vec<String>>;
}

/// Terminal questioner backed by rustyline.
///
/// Multi-select works on a numbered list: `1,3-5` picks entries, `all`
/// picks everything.
pub struct TerminalQuestioner {
    editor: DefaultEditor,
}

impl TerminalQuestioner {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialize prompt")?;
        Ok(Self { editor })
    }

    fn readline(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line.trim().to_string()),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                bail!("prompt cancelled")
            }
            Err(err) => Err(err.into()),
        }
    }

    fn multi_select(&mut self, what: &str, options: &[String]) -> Result<Vec<String>> {
        if options.is_empty() {
            bail!("no {what}s to choose from");
        }

        eprintln!("Available {what}s:");
        for (index, option) in options.iter().enumerate() {
            eprintln!("  {}) {}", index + 1, option);
        }

        let line = self.readline(&format!("Select {what}s (e.g. 1,3-5 or all): "))?;
        let selected = parse_selection(&line, options)?;
        if selected.is_empty() {
            bail!("no {what}s selected");
        }
        Ok(selected)
    }
}

impl Questioner for TerminalQuestioner {
    fn ask_connection_question(&mut self, suggestions: &[String]) -> Result<String> {
        if !suggestions.is_empty() {
            eprintln!("Connection string suggestions:");
            for suggestion in suggestions {
                eprintln!("  {suggestion}");
            }
        }

        let line = self.readline("Connection string: ")?;
        if line.is_empty() {
            bail!("no connection string entered");
        }
        Ok(line)
    }

    fn ask_schema_question(&mut self, options: &[String]) -> Result<Vec<String>> {
        self.multi_select("schema", options)
    }

    fn ask_table_question(&mut self, options: &[String]) -> Result<Vec<String>> {
        self.multi_select("table", options)
    }
}

/// Resolve a selection expression against the option list.
///
/// Accepts comma-separated one-based indices and inclusive ranges, or the
/// keyword `all`. Duplicate picks collapse; result keeps option order.
fn parse_selection(line: &str, options: &[String]) -> Result<Vec<String>> {
    if line.eq_ignore_ascii_case("all") {
        return Ok(options.to_vec());
    }

    let mut picked = vec![false; options.len()];
    for part in line.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_index(start, options)?, parse_index(end, options)?),
            None => {
                let index = parse_index(part, options)?;
                (index, index)
            }
        };
        if start > end {
            bail!("invalid range {part:?}");
        }
        for index in start..=end {
            picked[index] = true;
        }
    }

    Ok(options
        .iter()
        .zip(&picked)
        .filter(|(_, &picked)| picked)
        .map(|(option, _)| option.clone())
        .collect())
}

fn parse_index(value: &str, options: &[String]) -> Result<usize> {
    let number: usize = value
        .trim()
        .parse()
        .with_context(|| format!("invalid selection {value:?}"))?;
    if number == 0 || number > options.len() {
        bail!("selection {number} is out of range (1-{})", options.len());
    }
    Ok(number - 1)
}
