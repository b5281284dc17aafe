//! Load errors. Every variant is terminal for the load attempt.

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};

/// Characters of raw text kept on each side of a parse error.
pub const CONTEXT_RADIUS: usize = 100;

/// Alias for `Result<T, LoadError>`.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a log document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but holds nothing but whitespace.
    #[error("log file is empty")]
    Empty,

    /// The text is not valid JSON.
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        /// The parser's own message.
        message: String,
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// Byte offset of the error in the raw text.
        offset: usize,
        /// Raw text surrounding the error.
        context: String,
    },

    /// Neither a `logs` array nor a top-level array was found.
    #[error("invalid log data: no `logs` array found")]
    MissingLogs,

    /// A field holds a value of the wrong JSON type.
    #[error("invalid log data: {0}")]
    Schema(String),
}

impl LoadError {
    /// Build a [`LoadError::Parse`] from a serde error against the raw text.
    pub fn from_parse(err: &serde_json::Error, source: &str) -> Self {
        let line = err.line();
        let column = err.column();
        let offset = byte_offset(source, line, column);
        Self::Parse {
            message: strip_position(&err.to_string()),
            line,
            column,
            offset,
            context: context_window(source, offset, CONTEXT_RADIUS).to_string(),
        }
    }

    /// Render an annotated report pointing into `source`. Variants without a
    /// position render as a single line.
    pub fn render_report(&self, source: &str, filename: &str) -> String {
        let Self::Parse {
            message, offset, ..
        } = self
        else {
            return format!("error: {self}\n");
        };

        let total = source.chars().count();
        let start = source[..floor_boundary(source, *offset)]
            .chars()
            .count()
            .min(total.saturating_sub(1));
        let end = start + 1;
        let mut output = Vec::new();
        Report::build(ReportKind::Error, (filename, start..end))
            .with_message("log file is not valid JSON")
            .with_label(
                Label::new((filename, start..end))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
        String::from_utf8(output).unwrap_or_default()
    }
}

/// serde_json appends " at line L column C"; the variant carries those
/// separately.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

/// Byte offset of a 1-based line/column pair, clamped into `source`.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, l) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = column.saturating_sub(1).min(l.len());
            return floor_boundary(source, offset + within);
        }
        offset += l.len();
    }
    source.len()
}

fn floor_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Up to `radius` bytes of text on each side of `offset`, cut on char
/// boundaries.
pub fn context_window(source: &str, offset: usize, radius: usize) -> &str {
    let start = floor_boundary(source, offset.saturating_sub(radius));
    let end = ceil_boundary(source, offset.saturating_add(radius));
    &source[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> LoadError {
        let err = serde_json::from_str::<serde_json::Value>(text).unwrap_err();
        LoadError::from_parse(&err, text)
    }

    #[test]
    fn parse_error_carries_position_and_context() {
        let text = "{\n  \"title\": \"x\",\n  \"logs\": [ oops ]\n}";
        match parse_err(text) {
            LoadError::Parse {
                line,
                context,
                message,
                ..
            } => {
                assert_eq!(line, 3);
                assert!(context.contains("oops"));
                assert!(!message.contains("at line"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn display_mentions_line() {
        let err = parse_err("[1, 2,");
        assert!(err.to_string().starts_with("JSON parse error at line 1"));
    }

    #[test]
    fn context_window_respects_char_boundaries() {
        let s = "甲乙丙丁戊";
        // offset 4 is inside the second character
        let w = context_window(s, 4, 2);
        assert!(w.starts_with('甲') || w.starts_with('乙'));
        assert!(s.contains(w));
    }

    #[test]
    fn report_names_the_file() {
        let text = "{ \"logs\": [ , ] }";
        let report = parse_err(text).render_report(text, "broken.json");
        assert!(report.contains("broken.json"));
        assert!(report.contains("not valid JSON"));
    }

    #[test]
    fn report_for_positionless_errors() {
        let report = LoadError::MissingLogs.render_report("{}", "x.json");
        assert_eq!(report, "error: invalid log data: no `logs` array found\n");
    }
}
