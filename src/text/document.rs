//! Text input for the rasterizer.

use super::error::RenderError;

/// An ordered sequence of text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
}

impl TextDocument {
    /// Build a document from lines. Each entry is rendered as one line.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split text on `\n` or `\r\n`.
    ///
    /// A trailing newline does not add an empty line; an empty string gives
    /// an empty document.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length of the longest line in characters, whitespace included.
    pub fn max_line_chars(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Hard-wrap every line to at most `width` characters.
    ///
    /// Lines are cut at character boundaries, never inside a multi-byte
    /// character, and without hyphenation. Shorter lines are kept as-is and
    /// empty lines survive as empty lines.
    pub fn wrapped(&self, width: usize) -> Result<TextDocument, RenderError> {
        if width == 0 {
            return Err(RenderError::InvalidWrapWidth);
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            wrap_line(line, width, &mut lines);
        }
        Ok(TextDocument { lines })
    }
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let starts: Vec<usize> = line
        .char_indices()
        .map(|(i, _)| i)
        .step_by(width)
        .collect();

    if starts.len() <= 1 {
        out.push(line.to_owned());
        return;
    }

    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(line.len());
        out.push(line[start..end].to_owned());
    }
}

impl<S: Into<String>> FromIterator<S> for TextDocument {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}
