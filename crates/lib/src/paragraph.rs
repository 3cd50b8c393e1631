//! Reader and writer for `Key: Value` paragraph files.
//!
//! Port descriptors, the status database and published CONTROL records all
//! share this format:
//!
//! ```text
//! Package: zlib
//! Version: 1.2.8
//! Description: A compression library
//!   continued on an indented line
//!
//! Package: libpng
//! ...
//! ```
//!
//! Paragraphs are separated by one or more blank lines. A line starting with
//! whitespace continues the value of the previous field.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParagraphError {
  #[error("line {line}: expected `Field: value`")]
  MissingColon { line: usize },

  #[error("line {line}: continuation line without a preceding field")]
  OrphanContinuation { line: usize },

  #[error("line {line}: duplicate field `{field}`")]
  DuplicateField { line: usize, field: String },

  #[error("missing required field `{0}`")]
  MissingField(String),

  #[error("expected exactly one paragraph, found {0}")]
  NotSingle(usize),
}

/// A single parsed paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
  fields: BTreeMap<String, String>,
}

impl Paragraph {
  pub fn get(&self, field: &str) -> Option<&str> {
    self.fields.get(field).map(String::as_str)
  }

  /// Like [`Paragraph::get`], but a missing field is an error.
  pub fn required(&self, field: &str) -> Result<&str, ParagraphError> {
    self
      .get(field)
      .ok_or_else(|| ParagraphError::MissingField(field.to_string()))
  }

  /// Splits a comma-separated field into trimmed, non-empty items.
  pub fn list(&self, field: &str) -> Vec<String> {
    self.get(field).map(split_list).unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

pub fn split_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}

/// Parse every paragraph in `text`.
pub fn parse_paragraphs(text: &str) -> Result<Vec<Paragraph>, ParagraphError> {
  let mut paragraphs = Vec::new();
  let mut current = Paragraph::default();
  let mut last_field: Option<String> = None;

  for (idx, raw) in text.lines().enumerate() {
    let line = idx + 1;

    if raw.trim().is_empty() {
      if !current.is_empty() {
        paragraphs.push(std::mem::take(&mut current));
      }
      last_field = None;
      continue;
    }

    if raw.starts_with(' ') || raw.starts_with('\t') {
      let Some(field) = &last_field else {
        return Err(ParagraphError::OrphanContinuation { line });
      };
      if let Some(value) = current.fields.get_mut(field) {
        value.push('\n');
        value.push_str(raw.trim());
      }
      continue;
    }

    let Some((field, value)) = raw.split_once(':') else {
      return Err(ParagraphError::MissingColon { line });
    };
    let field = field.trim().to_string();
    if current.fields.contains_key(&field) {
      return Err(ParagraphError::DuplicateField { line, field });
    }
    current.fields.insert(field.clone(), value.trim().to_string());
    last_field = Some(field);
  }

  if !current.is_empty() {
    paragraphs.push(current);
  }

  Ok(paragraphs)
}

/// Parse text that must contain exactly one paragraph.
pub fn parse_single(text: &str) -> Result<Paragraph, ParagraphError> {
  let mut paragraphs = parse_paragraphs(text)?;
  match paragraphs.len() {
    1 => Ok(paragraphs.remove(0)),
    n => Err(ParagraphError::NotSingle(n)),
  }
}

/// Append `Field: value` to `out`, indenting continuation lines.
pub fn write_field(out: &mut String, field: &str, value: &str) {
  out.push_str(field);
  out.push_str(": ");
  let mut lines = value.lines();
  if let Some(first) = lines.next() {
    out.push_str(first);
  }
  for line in lines {
    out.push_str("\n  ");
    out.push_str(line);
  }
  out.push('\n');
}
