//! Assistant side-tools exposed from the chat surface.
//!
//! Each tool also renders to an Ollama Modelfile so it can be mounted as
//! a dedicated local model; the registry key doubles as the Modelfile
//! suffix.

pub mod calculator;
pub mod notes;

pub use calculator::CalculatorTool;
pub use notes::NotesTool;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Base model every generated Modelfile builds on.
const MODELFILE_BASE: &str = "llama3.2:3b";

/// A tool the chat surface can dispatch to by name.
pub trait Tool {
    fn name(&self) -> &str;
    fn describe(&self) -> &str;
    /// System prompt used when the tool is mounted as its own model.
    fn instructions(&self) -> String;
    fn execute(&self, input: &str) -> Result<String>;
}

/// Name-keyed tool collection.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registry preloaded with the built-in tools.
    pub fn with_builtin_tools(notes_dir: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CalculatorTool));
        registry.register(Box::new(NotesTool::new(notes_dir)));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(normalize_name(tool.name()), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(&normalize_name(name)).map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn execute(&self, name: &str, input: &str) -> Result<String> {
        let tool = self
            .get(name)
            .with_context(|| format!("Unknown tool '{}'", name))?;
        tool.execute(input)
    }

    /// Renders the Modelfile for one registered tool.
    pub fn modelfile(&self, name: &str) -> Option<String> {
        self.get(name).map(render_modelfile)
    }

    /// Writes `Modelfile.<key>` for every registered tool into `dir` and
    /// returns the written paths.
    pub fn write_modelfiles(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create Modelfile directory {}", dir.display()))?;
        let mut written = Vec::new();
        for (key, tool) in &self.tools {
            let path = dir.join(format!("Modelfile.{key}"));
            fs::write(&path, render_modelfile(tool.as_ref()))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry key for a display name: trimmed, lowercased, spaces to
/// dashes. "Note Taking" becomes "note-taking".
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

fn render_modelfile(tool: &dyn Tool) -> String {
    format!(
        "FROM {MODELFILE_BASE}\n\nPARAMETER temperature 0.7\n\nSYSTEM \"\"\"\n{}\n\"\"\"\n",
        tool.instructions().trim()
    )
}
