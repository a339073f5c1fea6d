//! Persistent note-taking tool backed by one JSON file per note.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::Tool;

#[derive(Debug, Serialize, Deserialize)]
struct Note {
    title: String,
    content: String,
    created: DateTime<Utc>,
}

/// Notes live as `<slug>.json` files under one directory. Titles are
/// matched by slug, so "Meeting Notes" and "meeting notes" name the
/// same note.
pub struct NotesTool {
    notes_dir: PathBuf,
}

impl NotesTool {
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
        }
    }

    fn note_path(&self, title: &str) -> Result<PathBuf> {
        let slug = slugify(title);
        if slug.is_empty() {
            bail!("Note title needs at least one letter or digit");
        }
        Ok(self.notes_dir.join(format!("{slug}.json")))
    }

    fn save(&self, title: &str, content: &str) -> Result<String> {
        let path = self.note_path(title)?;
        fs::create_dir_all(&self.notes_dir).with_context(|| {
            format!("Failed to create notes directory {}", self.notes_dir.display())
        })?;
        let note = Note {
            title: title.to_string(),
            content: content.to_string(),
            created: Utc::now(),
        };
        let payload = serde_json::to_string_pretty(&note).context("Failed to serialize note")?;
        fs::write(&path, payload)
            .with_context(|| format!("Failed to write note {}", path.display()))?;
        Ok(format!("Saved note '{}'.", title))
    }

    fn get(&self, title: &str) -> Result<String> {
        let path = self.note_path(title)?;
        if !path.exists() {
            return Ok(format!("No note named '{}'.", title));
        }
        let note = read_note(&path)?;
        Ok(format!(
            "{} ({}):\n{}",
            note.title,
            note.created.format("%Y-%m-%d %H:%M"),
            note.content
        ))
    }

    fn list(&self) -> Result<String> {
        if !self.notes_dir.exists() {
            return Ok("No notes saved yet.".to_string());
        }
        let mut notes = Vec::new();
        for entry in WalkDir::new(&self.notes_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_note(entry.path()) {
                Ok(note) => notes.push(note),
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %format!("{err:#}"), "skipping unreadable note");
                }
            }
        }
        if notes.is_empty() {
            return Ok("No notes saved yet.".to_string());
        }
        notes.sort_by(|a, b| b.created.cmp(&a.created));
        let mut out = String::from("Notes (newest first):");
        for note in &notes {
            out.push_str(&format!("\n- {}: {}", note.title, preview(&note.content)));
        }
        Ok(out)
    }

    fn delete(&self, title: &str) -> Result<String> {
        let path = self.note_path(title)?;
        if !path.exists() {
            return Ok(format!("No note named '{}'.", title));
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete note {}", path.display()))?;
        Ok(format!("Deleted note '{}'.", title))
    }
}

impl Tool for NotesTool {
    fn name(&self) -> &str {
        "Note Taking"
    }

    fn describe(&self) -> &str {
        "Saves, lists, retrieves, and deletes short notes"
    }

    fn instructions(&self) -> String {
        concat!(
            "You are a note-taking assistant. Reply with exactly one command per request: ",
            "SAVE:title|content to store a note, GET:title to read one back, LIST to list all ",
            "notes, or DELETE:title to remove one. Do not add commentary around the command."
        )
        .to_string()
    }

    fn execute(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("list") {
            return self.list();
        }
        let Some((verb, rest)) = input.split_once(':') else {
            bail!("Expected SAVE:, GET:, LIST, or DELETE:");
        };
        match verb.trim().to_uppercase().as_str() {
            "SAVE" => {
                let (title, content) = rest
                    .split_once('|')
                    .context("SAVE expects 'title|content'")?;
                self.save(title.trim(), content.trim())
            }
            "GET" => self.get(rest.trim()),
            "DELETE" => self.delete(rest.trim()),
            "LIST" => self.list(),
            other => bail!("Unknown notes action '{}'", other),
        }
    }
}

fn read_note(path: &Path) -> Result<Note> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid note file {}", path.display()))
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() <= 100 {
        return flat;
    }
    let cut = flat
        .char_indices()
        .nth(100)
        .map(|(i, _)| i)
        .unwrap_or(flat.len());
    format!("{}...", &flat[..cut])
}
