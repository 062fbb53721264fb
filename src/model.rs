use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::analysis;
use crate::data::{Dataset, Row, Value};
use crate::domain::{CMDMode, HELP_TEXT, MejaConfig, MejaError, Message};
use crate::engine::{self, FilterSet, SortSpec};
use crate::i18n::Catalog;
use crate::ingest;
use crate::inputter::{InputResult, Inputter};
use crate::seed;
use crate::store::{Command, Store};
use crate::ui::{CMDLINE_HEIGHT, STATUSLINE_HEIGHT, TABLE_HEADER_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
}

/// One dataset plus its transient view state. Filters and sort only exist
/// here; the derived order is recomputed whenever they change.
struct DataView {
    name: String,
    headers: Vec<String>,
    rows: Store<Row>,
    filters: FilterSet,
    sort: Option<SortSpec>,
    order: Vec<usize>,
    cursor_row: usize,
    cursor_column: usize,
    offset_row: usize,
}

impl DataView {
    fn from_dataset(dataset: Dataset) -> Self {
        let mut view = DataView {
            name: dataset.name,
            headers: dataset.headers,
            rows: Store::new(dataset.rows),
            filters: FilterSet::new(),
            sort: None,
            order: Vec::new(),
            cursor_row: 0,
            cursor_column: 0,
            offset_row: 0,
        };
        view.refresh();
        view
    }

    fn refresh(&mut self) {
        self.order = engine::view_order(
            &self.headers,
            self.rows.items(),
            &self.filters,
            self.sort.as_ref(),
        );
    }
}

pub struct Model {
    config: MejaConfig,
    catalog: Catalog,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    views: Vec<DataView>,
    active_view: usize,
    upload_view: Option<usize>,
    table_width: usize,
    table_height: usize,
    clipboard: Option<Clipboard>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    show_popup: bool,
    popup_message: String,
    status_message: String,
}

impl Model {
    pub fn init(config: &MejaConfig) -> Self {
        let catalog = Catalog::new(config.lang);
        let views = seed::initial_datasets()
            .into_iter()
            .map(DataView::from_dataset)
            .collect();
        let status_message = catalog.tr("Ready");
        Model {
            config: config.clone(),
            catalog,
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            views,
            active_view: 0,
            upload_view: None,
            table_width: 80,
            table_height: 20,
            clipboard: Clipboard::new().ok(),
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            show_popup: false,
            popup_message: String::new(),
            status_message,
        }
    }

    /// Opens a CSV file as the upload dataset. Failures reset the upload
    /// dataset and surface as a localized status message, the application
    /// keeps running either way.
    pub fn open_file(&mut self, path: &Path) {
        match self.load_file(path) {
            Ok((rows, name)) => {
                info!("Loaded {rows} rows from {name}");
                let message = self.catalog.tr_args(
                    "Loaded file",
                    &[("rows", &rows.to_string()), ("name", &name)],
                );
                self.set_status_message(message);
            }
            Err(err) => {
                warn!("Opening {path:?} failed: {err:?}");
                self.reset_upload();
                let reason = match &err {
                    MejaError::MalformedInput(_) => self.catalog.tr("Malformed CSV"),
                    MejaError::UnsupportedFileType => self.catalog.tr("Only CSV supported"),
                    MejaError::FileNotFound => self.catalog.tr("File not found"),
                    MejaError::PermissionDenied => self.catalog.tr("Permission denied"),
                    other => format!("{other:?}"),
                };
                let message = self
                    .catalog
                    .tr_args("File processing failed", &[("message", &reason)]);
                self.set_status_message(message);
            }
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(usize, String), MejaError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MejaError::FileNotFound,
            ErrorKind::PermissionDenied => MejaError::PermissionDenied,
            _ => MejaError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(MejaError::FileNotFound);
        }
        let is_csv = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(MejaError::UnsupportedFileType);
        }

        let text = fs::read_to_string(path)?;
        let (headers, rows) = ingest::parse_csv(&text)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();
        let count = rows.len();
        self.install_upload(Dataset::new(name.clone(), headers, rows));
        Ok((count, name))
    }

    /// A new upload replaces the previous one wholesale.
    fn install_upload(&mut self, dataset: Dataset) {
        match self.upload_view {
            Some(idx) => {
                let view = &mut self.views[idx];
                view.name = dataset.name;
                view.headers = dataset.headers;
                view.rows.apply(Command::Replace(dataset.rows));
                view.filters.clear();
                view.sort = None;
                view.cursor_row = 0;
                view.cursor_column = 0;
                view.offset_row = 0;
                view.refresh();
                self.active_view = idx;
            }
            None => {
                self.views.push(DataView::from_dataset(dataset));
                self.upload_view = Some(self.views.len() - 1);
                self.active_view = self.views.len() - 1;
            }
        }
    }

    fn reset_upload(&mut self) {
        if let Some(idx) = self.upload_view {
            Self::clear_view(&mut self.views[idx]);
        }
    }

    fn clear_view(view: &mut DataView) {
        view.headers.clear();
        view.rows.apply(Command::Clear);
        view.filters.clear();
        view.sort = None;
        view.cursor_row = 0;
        view.cursor_column = 0;
        view.offset_row = 0;
        view.refresh();
    }

    pub fn update(&mut self, message: Message) -> Result<(), MejaError> {
        trace!("Update: {:?} in {:?}", message, self.modus);
        match self.modus {
            Modus::TABLE => match message {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MovePageUp => self.move_selection_up(self.table_height.max(1)),
                Message::MovePageDown => self.move_selection_down(self.table_height.max(1)),
                Message::MoveBeginning => self.move_selection_beginning(),
                Message::MoveEnd => self.move_selection_end(),
                Message::MoveLeft => self.move_selection_left(),
                Message::MoveRight => self.move_selection_right(),
                Message::NextView => self.switch_view(1),
                Message::PreviousView => self.switch_view(-1),
                Message::SortColumn => self.sort_cursor_column(),
                Message::Filter => self.enter_cmd_mode(CMDMode::FilterColumn),
                Message::ClearFilters => self.clear_filters(),
                Message::ClearDataset => self.clear_active_dataset(),
                Message::InsertRow => self.enter_cmd_mode(CMDMode::InsertRow),
                Message::EditRow => self.start_edit(),
                Message::DeleteRow => self.delete_row(),
                Message::Summary => self.show_summary(),
                Message::Analyze => self.start_analysis(),
                Message::CopyCell => self.copy_cell(),
                Message::CopyRow => self.copy_row(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::RawKey(_) => {}
            },
            Modus::POPUP => match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => {}
            },
            Modus::CMDINPUT => match message {
                Message::RawKey(key) => self.raw_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => {}
            },
        }
        Ok(())
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    // -------------------- view state transitions ---------------------- //

    fn active(&self) -> &DataView {
        &self.views[self.active_view]
    }

    fn active_mut(&mut self) -> &mut DataView {
        &mut self.views[self.active_view]
    }

    fn clamp_active(&mut self) {
        let height = self.table_height.max(1);
        let view = self.active_mut();
        let total = view.order.len();
        if total == 0 {
            view.cursor_row = 0;
            view.offset_row = 0;
        } else {
            view.offset_row = view.offset_row.min(total - 1);
            let visible = (total - view.offset_row).min(height);
            view.cursor_row = view.cursor_row.min(visible - 1);
        }
        view.cursor_column = match view.headers.len() {
            0 => 0,
            len => view.cursor_column.min(len - 1),
        };
    }

    fn move_selection_up(&mut self, size: usize) {
        let view = self.active_mut();
        if view.cursor_row > 0 {
            view.cursor_row = view.cursor_row.saturating_sub(size);
        } else {
            view.offset_row = view.offset_row.saturating_sub(size);
        }
    }

    fn move_selection_down(&mut self, size: usize) {
        let height = self.table_height.max(1);
        let view = self.active_mut();
        let total = view.order.len();
        if total == 0 {
            return;
        }
        let target = (view.offset_row + view.cursor_row + size).min(total - 1);
        if target < view.offset_row + height {
            view.cursor_row = target - view.offset_row;
        } else {
            view.offset_row = target + 1 - height;
            view.cursor_row = height - 1;
        }
    }

    fn move_selection_beginning(&mut self) {
        let view = self.active_mut();
        view.cursor_row = 0;
        view.offset_row = 0;
    }

    fn move_selection_end(&mut self) {
        let total = self.active().order.len();
        self.move_selection_beginning();
        self.move_selection_down(total);
    }

    fn move_selection_left(&mut self) {
        let view = self.active_mut();
        view.cursor_column = view.cursor_column.saturating_sub(1);
    }

    fn move_selection_right(&mut self) {
        let view = self.active_mut();
        if view.cursor_column + 1 < view.headers.len() {
            view.cursor_column += 1;
        }
    }

    fn switch_view(&mut self, step: i32) {
        let count = self.views.len();
        self.active_view = (self.active_view as i32 + step).rem_euclid(count as i32) as usize;
        let name = self.active().name.clone();
        let message = self.catalog.tr_args("Switched dataset", &[("name", &name)]);
        self.set_status_message(message);
    }

    fn sort_cursor_column(&mut self) {
        let (column, spec) = {
            let view = self.active();
            if view.headers.is_empty() {
                return;
            }
            let column = view.headers[view.cursor_column].clone();
            let spec = SortSpec::toggle(view.sort.as_ref(), &column);
            (column, spec)
        };
        let direction = spec.direction.label().to_string();
        let view = self.active_mut();
        view.sort = Some(spec);
        view.refresh();
        self.clamp_active();
        let message = self
            .catalog
            .tr_args("Sorted by", &[("column", &column), ("direction", &direction)]);
        self.set_status_message(message);
    }

    fn apply_filter(&mut self, text: String) {
        let column = {
            let view = self.active();
            match view.headers.get(view.cursor_column) {
                Some(column) => column.clone(),
                None => return,
            }
        };
        let view = self.active_mut();
        if text.is_empty() {
            view.filters.remove(&column);
        } else {
            view.filters.insert(column.clone(), text.clone());
        }
        view.refresh();
        self.clamp_active();
        let message = if text.is_empty() {
            self.catalog.tr_args("Filter removed", &[("column", &column)])
        } else {
            self.catalog
                .tr_args("Filter applied", &[("column", &column), ("text", &text)])
        };
        self.set_status_message(message);
    }

    fn clear_filters(&mut self) {
        let view = self.active_mut();
        view.filters.clear();
        view.refresh();
        self.clamp_active();
        let message = self.catalog.tr("Filters cleared");
        self.set_status_message(message);
    }

    fn clear_active_dataset(&mut self) {
        Self::clear_view(&mut self.views[self.active_view]);
        let message = self.catalog.tr("Dataset cleared");
        self.set_status_message(message);
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.popup_message = HELP_TEXT.to_string();
        self.show_popup = true;
    }

    fn close_popup(&mut self) {
        self.show_popup = false;
        self.popup_message.clear();
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
    }

    // -------------------- command line input ---------------------- //

    fn enter_cmd_mode(&mut self, mode: CMDMode) {
        if matches!(mode, CMDMode::FilterColumn | CMDMode::InsertRow)
            && self.active().headers.is_empty()
        {
            return;
        }
        trace!("Entering command mode {mode:?}");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;
        self.input.clear();
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            self.handle_cmd_input();
        }
    }

    fn handle_cmd_input(&mut self) {
        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        let result = self.last_input.clone();
        let mode = self.cmd_mode.take();
        if result.canceled {
            return;
        }
        debug!("Command input {:?}: {}", mode, result.input);
        match mode {
            Some(CMDMode::FilterColumn) => self.apply_filter(result.input),
            Some(CMDMode::Analyze) => self.run_analysis(&result.input),
            Some(CMDMode::InsertRow) => self.insert_row(&result.input),
            Some(CMDMode::EditRow) => self.update_row(&result.input),
            None => {}
        }
    }

    // -------------------- record commands ---------------------- //

    fn insert_row(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let view = self.active_mut();
        let row = ingest::parse_record(&view.headers, text);
        view.rows.apply(Command::Insert(row));
        view.refresh();
        self.clamp_active();
        let message = self.catalog.tr("Row inserted");
        self.set_status_message(message);
    }

    /// Editing starts from the selected row re-encoded as a CSV line, so the
    /// user reworks the existing values instead of retyping them.
    fn start_edit(&mut self) {
        let Some(line) = self.selected_row_as_csv() else {
            return;
        };
        self.enter_cmd_mode(CMDMode::EditRow);
        self.input.set(&line);
        self.last_input = self.input.get();
    }

    fn update_row(&mut self, text: &str) {
        let Some(index) = self.selected_row_index() else {
            return;
        };
        let view = self.active_mut();
        let item = ingest::parse_record(&view.headers, text);
        if view.rows.apply(Command::Update { index, item }).is_none() {
            return;
        }
        view.refresh();
        self.clamp_active();
        let message = self.catalog.tr("Row updated");
        self.set_status_message(message);
    }

    fn delete_row(&mut self) {
        let Some(index) = self.selected_row_index() else {
            return;
        };
        let view = self.active_mut();
        if view.rows.apply(Command::Remove { index }).is_none() {
            return;
        }
        view.refresh();
        self.clamp_active();
        let message = self.catalog.tr("Row deleted");
        self.set_status_message(message);
    }

    fn show_summary(&mut self) {
        let text = {
            let view = self.active();
            match view.headers.get(view.cursor_column) {
                Some(column) => column_summary(column, &view.order, view.rows.items()),
                None => return,
            }
        };
        self.popup_message = text;
        self.show_popup = true;
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn start_analysis(&mut self) {
        if self.active().rows.is_empty() {
            let message = self.catalog.tr("No data to analyze");
            self.set_status_message(message);
            return;
        }
        self.enter_cmd_mode(CMDMode::Analyze);
    }

    fn run_analysis(&mut self, question: &str) {
        if question.trim().is_empty() {
            return;
        }
        // One blocking round trip; the UI waits, there is no cancellation.
        // The service sees the data the way the user sees it, filters and
        // sort applied.
        let result = {
            let view = self.active();
            let rows = engine::apply(
                &view.headers,
                view.rows.items(),
                &view.filters,
                view.sort.as_ref(),
            );
            analysis::analyze(&view.headers, &rows, question, &self.config, &self.catalog)
        };
        self.popup_message = result;
        self.show_popup = true;
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        let message = self.catalog.tr("Analysis done");
        self.set_status_message(message);
    }

    // -------------------- clipboard ---------------------- //

    fn selected_row_index(&self) -> Option<usize> {
        let view = self.active();
        view.order.get(view.offset_row + view.cursor_row).copied()
    }

    fn copy_cell(&mut self) {
        let text = {
            let view = self.active();
            match (self.selected_row_index(), view.headers.get(view.cursor_column)) {
                (Some(ridx), Some(column)) => view.rows.items()[ridx]
                    .get(column)
                    .unwrap_or(&Value::Missing)
                    .render(),
                _ => return,
            }
        };
        self.copy_to_clipboard(text, "Copied cell");
    }

    fn copy_row(&mut self) {
        let Some(line) = self.selected_row_as_csv() else {
            return;
        };
        self.copy_to_clipboard(line, "Copied row");
    }

    /// The selected row as one CSV line in header order.
    fn selected_row_as_csv(&self) -> Option<String> {
        let view = self.active();
        let ridx = self.selected_row_index()?;
        let row = &view.rows.items()[ridx];
        Some(
            view.headers
                .iter()
                .map(|h| wrap_cell_content(&row.get(h).unwrap_or(&Value::Missing).render()))
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    fn copy_to_clipboard(&mut self, text: String, done_key: &str) {
        let message = match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(text) {
                Ok(_) => self.catalog.tr(done_key),
                Err(e) => {
                    warn!("Error copying to clipboard: {e:?}");
                    self.catalog.tr("Clipboard unavailable")
                }
            },
            None => self.catalog.tr("Clipboard unavailable"),
        };
        self.set_status_message(message);
    }

    // -------------------- ui access ---------------------- //

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI resized to {width}x{height}");
        self.table_width = width;
        self.table_height =
            height.saturating_sub(TABLE_HEADER_HEIGHT + STATUSLINE_HEIGHT + CMDLINE_HEIGHT);
        self.clamp_active();
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn view_name(&self) -> &str {
        &self.active().name
    }

    pub fn headers(&self) -> &[String] {
        &self.active().headers
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.active().sort.as_ref()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.active().filters
    }

    /// The currently visible window of the derived order, cell values
    /// rendered as text.
    pub fn visible_rows(&self) -> Vec<Vec<String>> {
        let view = self.active();
        let begin = view.offset_row.min(view.order.len());
        let end = (begin + self.table_height.max(1)).min(view.order.len());
        view.order[begin..end]
            .iter()
            .map(|&ridx| {
                let row = &view.rows.items()[ridx];
                view.headers
                    .iter()
                    .map(|h| row.get(h).unwrap_or(&Value::Missing).render())
                    .collect()
            })
            .collect()
    }

    /// (cursor row within the visible window, cursor column).
    pub fn cursor(&self) -> (usize, usize) {
        let view = self.active();
        (view.cursor_row, view.cursor_column)
    }

    /// (rows surviving the filters, rows in the dataset).
    pub fn row_counts(&self) -> (usize, usize) {
        let view = self.active();
        (view.order.len(), view.rows.len())
    }

    pub fn selected_abs_row(&self) -> usize {
        let view = self.active();
        view.offset_row + view.cursor_row
    }

    /// Per column render widths derived from the header and the visible
    /// window, capped at the configured maximum and the terminal width.
    pub fn column_widths(&self) -> Vec<u16> {
        let rows = self.visible_rows();
        let cap = self.config.max_column_width.min(self.table_width.max(1));
        self.headers()
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let mut width = header.chars().count() + 2;
                for row in &rows {
                    width = width.max(row[idx].chars().count());
                }
                width.min(cap) as u16
            })
            .collect()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn popup(&self) -> Option<&str> {
        self.show_popup.then_some(self.popup_message.as_str())
    }

    /// Prompt label and current line editor state, while input is active.
    pub fn cmdline(&self) -> Option<(String, InputResult)> {
        if !self.active_cmdinput {
            return None;
        }
        let label = match self.cmd_mode {
            Some(CMDMode::FilterColumn) => {
                let view = self.active();
                let column = view
                    .headers
                    .get(view.cursor_column)
                    .cloned()
                    .unwrap_or_default();
                self.catalog.tr_args("Filter prompt", &[("column", &column)])
            }
            Some(CMDMode::Analyze) => self.catalog.tr("Analyze prompt"),
            Some(CMDMode::InsertRow) => self.catalog.tr("Insert prompt"),
            Some(CMDMode::EditRow) => self.catalog.tr("Edit prompt"),
            None => String::new(),
        };
        Some((label, self.last_input.clone()))
    }
}

/// Frequency bars for one column over the rows in display order, most
/// common values first. Caps at twelve entries so the popup stays readable.
fn column_summary(column: &str, order: &[usize], rows: &[Row]) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for &idx in order {
        let text = rows[idx].get(column).unwrap_or(&Value::Missing).render();
        let label = if text.is_empty() {
            "(empty)".to_string()
        } else {
            text
        };
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let top = counts.first().map(|(_, count)| *count).unwrap_or(1);
    let mut out = format!(
        "{column}: {} rows, {} distinct values\n\n",
        order.len(),
        counts.len()
    );
    for (label, count) in counts.iter().take(12) {
        let mut label = label.clone();
        if label.chars().count() > 20 {
            label = label.chars().take(19).collect::<String>() + "…";
        }
        let bar = "#".repeat((count * 30 / top).max(1));
        out.push_str(&format!("{label:<20} {bar} {count}\n"));
    }
    out
}

/// Quotes a cell for a CSV line the way the clipboard export needs it:
/// internal quotes doubled, wrapping quotes added when the cell contains
/// whitespace or a comma.
fn wrap_cell_content(cell: &str) -> String {
    let needs_escaping = cell.contains('"');
    let needs_wrapping = cell.chars().any(|c| c == ' ' || c == '\t' || c == ',');
    let mut out = String::from(cell);
    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}
