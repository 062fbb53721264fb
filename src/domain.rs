use std::io::Error;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

use crate::i18n::Lang;

#[derive(Debug)]
pub enum MejaError {
    IoError(Error),
    /// The ingested text is too short to contain a header and a data row.
    MalformedInput(String),
    FileNotFound,
    PermissionDenied,
    UnsupportedFileType,
    HttpError(reqwest::Error),
    EmptyResponse,
}

impl From<Error> for MejaError {
    fn from(err: Error) -> Self {
        MejaError::IoError(err)
    }
}

impl From<reqwest::Error> for MejaError {
    fn from(err: reqwest::Error) -> Self {
        MejaError::HttpError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct MejaConfig {
    /// Milliseconds to wait for a terminal event before redrawing.
    pub event_poll_time: u64,
    /// Rendered columns are capped at this width.
    pub max_column_width: usize,
    /// Number of leading rows included in the analysis prompt.
    pub sample_rows: usize,
    pub api_url: String,
    pub api_key: Option<String>,
    pub lang: Lang,
}

impl Default for MejaConfig {
    fn default() -> Self {
        MejaConfig {
            event_poll_time: 100,
            max_column_width: 40,
            sample_rows: 10,
            api_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent".to_string(),
            api_key: None,
            lang: Lang::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CMDMode {
    FilterColumn,
    Analyze,
    InsertRow,
    EditRow,
}

#[derive(Debug)]
pub enum Message {
    Quit,
    Exit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    NextView,
    PreviousView,
    SortColumn,
    Filter,
    ClearFilters,
    ClearDataset,
    InsertRow,
    EditRow,
    DeleteRow,
    Summary,
    Analyze,
    CopyCell,
    CopyRow,
    Help,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
meja - business data viewer

  q             quit
  Esc           close popup / cancel input
  arrows, hjkl  move the selection
  PgUp / PgDn   move one page
  g / G         jump to the first / last row
  Tab / BackTab next / previous dataset
  s             sort by the selected column (press again to flip)
  f             filter the selected column (empty input clears it)
  F             clear all filters
  i             add a row (comma separated values)
  e             edit the selected row
  d             delete the selected row
  v             value summary for the selected column
  x             clear the active dataset
  a             ask the analysis service about the data
  c / C         copy the cell / row to the clipboard
  ?             show this help
";
