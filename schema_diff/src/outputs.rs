//! Action outputs and workflow commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Sink for the step's named outputs.
pub trait ActionOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()>;
}

/// Appends outputs to the runner's `GITHUB_OUTPUT` file.
#[derive(Debug, Clone)]
pub struct GitHubOutputFile {
    path: Option<PathBuf>,
}

impl GitHubOutputFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        let path = std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        if path.is_none() {
            tracing::warn!("GITHUB_OUTPUT not set -- outputs will only be logged");
        }
        Self::new(path)
    }
}

/// A heredoc delimiter that does not occur in `value`.
fn delimiter_for(value: &str) -> String {
    let mut delimiter = String::from("SCHEMA_DIFF_EOF");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    delimiter
}

impl ActionOutputs for GitHubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            tracing::info!(output = name, "{}", value);
            return Ok(());
        };

        let delimiter = delimiter_for(value);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")?;
        Ok(())
    }
}

/// Escape a message for a `::error::` workflow command.
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Mark the step as failed with `message`.
pub fn report_failure(message: &str) {
    println!("::error::{}", escape_command_data(message));
}

/// Collects outputs in memory (for testing).
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryOutputs {
    pub values: Vec<(String, String)>,
}

#[cfg(test)]
impl MemoryOutputs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
impl ActionOutputs for MemoryOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        self.values.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_multiline_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        let mut outputs = GitHubOutputFile::new(Some(path.clone()));

        outputs.set_output("diff", "-a\n+b").unwrap();
        outputs.set_output("comment_url", "").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "diff<<SCHEMA_DIFF_EOF\n-a\n+b\nSCHEMA_DIFF_EOF\ncomment_url<<SCHEMA_DIFF_EOF\n\nSCHEMA_DIFF_EOF\n"
        );
    }

    #[test]
    fn delimiter_avoids_value() {
        assert_eq!(delimiter_for("plain"), "SCHEMA_DIFF_EOF");
        assert_eq!(delimiter_for("x\nSCHEMA_DIFF_EOF\n"), "SCHEMA_DIFF_EOF_");
    }

    #[test]
    fn missing_output_file_is_not_an_error() {
        let mut outputs = GitHubOutputFile::new(None);
        outputs.set_output("diff", "x").unwrap();
    }

    #[test]
    fn escapes_workflow_command_data() {
        assert_eq!(
            escape_command_data("100% broken\r\nagain"),
            "100%25 broken%0D%0Aagain"
        );
    }
}
