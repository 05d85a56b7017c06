//! Error types for loading project documents

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unexpected document shape at line {line}, column {column}: {message}")]
    Shape {
        line: usize,
        column: usize,
        message: String,
    },
}

impl DocumentError {
    /// Classify a JSON error by whether the text or its structure is at fault
    pub fn from_json(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let (line, column) = (err.line(), err.column());
        let message = strip_position(&err.to_string());
        match err.classify() {
            Category::Io => DocumentError::Io(err.into()),
            Category::Syntax | Category::Eof => DocumentError::Syntax {
                line,
                column,
                message,
            },
            Category::Data => DocumentError::Shape {
                line,
                column,
                message,
            },
        }
    }

    /// Byte range in `source` the error points at
    pub fn span(&self, source: &str) -> Span {
        match self {
            DocumentError::Io(_) => 0..0,
            DocumentError::Syntax { line, column, .. } | DocumentError::Shape { line, column, .. } => {
                let start = offset_of(source, *line, *column);
                let end = source[start..]
                    .chars()
                    .next()
                    .map_or(start, |c| start + c.len_utf8());
                start..end
            }
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = match self {
            DocumentError::Io(err) => return format!("{filename}: {err}"),
            DocumentError::Syntax { message, .. } => message,
            DocumentError::Shape { message, .. } => message,
        };
        let title = match self {
            DocumentError::Shape { .. } => "unexpected project document shape",
            _ => "invalid project JSON",
        };
        let span = self.span(source);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(title)
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// serde_json appends " at line L column C"; the report shows that visually
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

/// Byte offset of a 1-based line and column, clamped to the source
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = source[line_start..].split('\n').next().unwrap_or("");
    let col = column.saturating_sub(1).min(line_text.len());
    let mut offset = line_start + col;
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset.min(source.len())
}
