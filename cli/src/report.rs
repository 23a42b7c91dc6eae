use std::path::Path;

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use serde_json::error::Category;
use splits_query::LoadError;

/// Renders an annotated snippet of the input for a JSON syntax error. Any
/// other load error has no location and renders nothing.
pub(crate) fn explain(path: &Path, err: &LoadError, color: bool) {
    let Some(diagnostic_input) = DiagnosticInput::from_error(err) else {
        return;
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(path.display().to_string(), diagnostic_input.text);
    let diagnostic = Diagnostic::error()
        .with_message("invalid JSON")
        .with_labels(vec![
            Label::primary(file_id, diagnostic_input.span.clone())
                .with_message(diagnostic_input.message.clone()),
        ])
        .with_notes(diagnostic_input.note.into_iter().map(str::to_string).collect());

    let writer = StandardStream::stderr(if color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    });
    let config = term::Config::default();
    term::emit(&mut writer.lock(), &config, &files, &diagnostic).ok();
}

struct DiagnosticInput<'a> {
    text: &'a str,
    span: std::ops::Range<usize>,
    message: String,
    note: Option<&'static str>,
}

impl<'a> DiagnosticInput<'a> {
    fn from_error(err: &'a LoadError) -> Option<Self> {
        let text = err.source_text()?;
        let (line, column) = err.location()?;

        let start = byte_offset(text, line, column);
        let end = text[start..]
            .chars()
            .next()
            .map(|ch| start + ch.len_utf8())
            .unwrap_or(start);

        let (message, note) = match err {
            LoadError::InvalidJson { error, .. } => (
                without_location(&error.to_string(), line, column),
                match error.classify() {
                    Category::Eof => Some("the file ended before the JSON value was complete"),
                    Category::Syntax | Category::Data | Category::Io => None,
                },
            ),
            LoadError::TooDeep { limit, .. } => (
                format!("nesting deeper than {} levels", limit),
                Some("arrays and objects may not nest any deeper than this"),
            ),
            _ => return None,
        };

        Some(Self {
            text,
            span: start..end,
            message,
            note,
        })
    }
}

/// `serde_json` reports one-based lines and byte columns. Column 0 means
/// the start of the line.
pub(crate) fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_len = text[line_start..]
        .split('\n')
        .next()
        .map(str::len)
        .unwrap_or(0);

    let mut offset = line_start + column.saturating_sub(1).min(line_len);
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn without_location(message: &str, line: usize, column: usize) -> String {
    let suffix = format!(" at line {} column {}", line, column);
    message
        .strip_suffix(&suffix)
        .unwrap_or(message)
        .to_string()
}
