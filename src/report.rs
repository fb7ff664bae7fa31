use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ReportConfig;
use crate::records::{BestSet, MusicResult, RecordSet};
use crate::select::over_const;
use crate::video::VideoLinks;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Column alignment in a markdown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn marker(self) -> &'static str {
        match self {
            Align::Left => ":---",
            Align::Center => ":---:",
            Align::Right => "---:",
        }
    }
}

/// Markdown table built row by row.
pub struct MarkdownTable {
    header: String,
    alignment: String,
    rows: Vec<String>,
}

impl MarkdownTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        let header = pipe_join(columns.iter().map(|(name, _)| *name));
        let alignment = pipe_join(columns.iter().map(|(_, align)| align.marker()));
        Self {
            header,
            alignment,
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: AsRef<str>>(&mut self, cells: &[S]) {
        self.rows.push(pipe_join(cells.iter().map(|c| c.as_ref())));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header line, alignment line, then the body. Always ends with a newline.
    pub fn render(&self) -> String {
        format!("{}\n{}\n{}\n", self.header, self.alignment, self.rows.join("\n"))
    }
}

fn pipe_join<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push_str(cell);
        line.push('|');
    }
    line
}

pub const RESULT_COLUMNS: [(&str, Align); 8] = [
    ("title", Align::Left),
    ("best", Align::Center),
    ("diff", Align::Center),
    ("Lv.", Align::Center),
    ("score", Align::Right),
    ("const", Align::Right),
    ("rate", Align::Right),
    ("yt", Align::Center),
];

/// Escaped asterisk, so markdown shows a literal `*`.
const BEST_MARKER: &str = "\\*";

/// Render results as a markdown table, one row per result in the given order.
pub fn render_results<'a>(
    results: impl IntoIterator<Item = &'a MusicResult>,
    bests: &BestSet,
    links: &VideoLinks,
) -> String {
    let mut table = MarkdownTable::new(&RESULT_COLUMNS);
    for result in results {
        table.push_row(&result_row(result, bests, links));
    }
    table.render()
}

fn result_row(result: &MusicResult, bests: &BestSet, links: &VideoLinks) -> [String; 8] {
    let marker = if bests.contains(result) {
        BEST_MARKER.to_string()
    } else {
        String::new()
    };
    let url = links.get(result);
    let link = if url.is_empty() {
        String::new()
    } else {
        format!("[yt]({url})")
    };
    [
        result.title.clone(),
        marker,
        result.diff.clone(),
        format!("{:.1}", result.level),
        format!("`{}`", result.score),
        format!("{:.1}", result.constant),
        // Printed as reported, never rounded
        result.rating.to_string(),
        link,
    ]
}

/// Heading and note paragraph followed by the table.
pub fn render_document(title: &str, note: &str, table: &str) -> String {
    format!("# {title}\n\n{note}\n\n{table}")
}

/// Render the full report document: results with const >= `min_const`,
/// best 30 marked, under the configured heading and note.
pub fn build_report(
    records: &RecordSet,
    links: &VideoLinks,
    config: &ReportConfig,
    min_const: f64,
) -> (String, usize) {
    let bests = records.best_keys();
    let selected = over_const(&records.records, min_const);
    let table = render_results(selected.iter().copied(), &bests, links);
    (render_document(&config.title, &config.note, &table), selected.len())
}

/// Build the report and overwrite `output` with it. Returns the number of table rows.
pub fn write_report(
    records: &RecordSet,
    links: &VideoLinks,
    config: &ReportConfig,
    min_const: f64,
    output: &Path,
) -> Result<usize, ReportError> {
    let (document, rows) = build_report(records, links, config, min_const);
    std::fs::write(output, document).map_err(|source| ReportError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {rows} rows to {}", output.display());
    Ok(rows)
}
