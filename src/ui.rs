use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Clear, Paragraph, Row as TableRow, Table, TableState, Wrap},
};

use crate::engine::Direction;
use crate::model::Model;

/// Rows of the terminal not available for data, the model needs these to
/// size its visible window.
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const CMDLINE_HEIGHT: usize = 1;

/// Renders the model. The only state kept here is the [`TableState`]
/// driving the row and column highlight.
#[derive(Default)]
pub struct TableUI {
    state: TableState,
}

impl TableUI {
    pub fn draw(&mut self, frame: &mut Frame, model: &Model) {
        let [table_area, status_area, cmd_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
            Constraint::Length(CMDLINE_HEIGHT as u16),
        ])
        .areas(frame.area());

        self.draw_table(frame, table_area, model);
        draw_status(frame, status_area, model);
        draw_cmdline(frame, cmd_area, model);
        if let Some(text) = model.popup() {
            draw_popup(frame, text);
        }
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect, model: &Model) {
        let sort = model.sort();
        let filters = model.filters();
        let header = TableRow::new(model.headers().iter().map(|h| {
            let mut label = h.clone();
            if let Some(spec) = sort
                && &spec.column == h
            {
                label.push_str(match spec.direction {
                    Direction::Ascending => " ^",
                    Direction::Descending => " v",
                });
            }
            if filters.contains_key(h) {
                label.push_str(" *");
            }
            label
        }))
        .style(Style::new().bold());

        let rows = model.visible_rows().into_iter().map(TableRow::new);
        let widths: Vec<Constraint> = model
            .column_widths()
            .into_iter()
            .map(Constraint::Length)
            .collect();

        let (cursor_row, cursor_column) = model.cursor();
        self.state.select(Some(cursor_row));
        self.state.select_column(Some(cursor_column));

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .cell_highlight_style(Style::new().add_modifier(Modifier::REVERSED | Modifier::BOLD));
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, model: &Model) {
    let (shown, total) = model.row_counts();
    let position = if shown == 0 {
        0
    } else {
        model.selected_abs_row() + 1
    };
    let line = Line::from(vec![
        format!(" {} ", model.view_name()).bold().reversed(),
        format!(" {position}/{shown} ({total} rows) ").into(),
        model.status_message().to_string().italic(),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_cmdline(frame: &mut Frame, area: Rect, model: &Model) {
    let Some((label, input)) = model.cmdline() else {
        return;
    };
    let prefix = format!("{label}> ");
    let offset = prefix.chars().count() + input.cursor;
    let line = Line::from(vec![prefix.bold(), input.input.into()]);
    frame.render_widget(Paragraph::new(line), area);
    frame.set_cursor_position((area.x + offset as u16, area.y));
}

fn draw_popup(frame: &mut Frame, text: &str) {
    let area = popup_area(frame.area(), 70, 60);
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(Line::from(" meja ".bold()).centered())
        .title_bottom(Line::from(" Esc to close ").centered());
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MejaConfig, Message};
    use crate::i18n::Lang;
    use ratatui::{Terminal, backend::TestBackend};

    fn test_model() -> Model {
        let config = MejaConfig::default().with_lang(Lang::En);
        let mut model = Model::init(&config);
        model.update(Message::Resize(80, 20)).unwrap();
        model
    }

    fn render(model: &Model) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut ui = TableUI::default();
        terminal.draw(|frame| ui.draw(frame, model)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn renders_headers_rows_and_status() {
        let model = test_model();
        let screen = render(&model);
        assert!(screen.contains("Date"));
        assert!(screen.contains("Customer"));
        assert!(screen.contains("Toko Laris"));
        assert!(screen.contains("transactions"));
        assert!(screen.contains("(3 rows)"));
    }

    #[test]
    fn marks_the_sorted_column_in_the_header() {
        let mut model = test_model();
        model.update(Message::SortColumn).unwrap();
        let screen = render(&model);
        assert!(screen.contains("Date ^"));
        model.update(Message::SortColumn).unwrap();
        assert!(render(&model).contains("Date v"));
    }

    #[test]
    fn help_popup_is_drawn_over_the_table() {
        let mut model = test_model();
        model.update(Message::Help).unwrap();
        let screen = render(&model);
        assert!(screen.contains("BackTab"));
        assert!(screen.contains("Esc to close"));
    }

    #[test]
    fn cmdline_shows_the_filter_prompt() {
        let mut model = test_model();
        model.update(Message::Filter).unwrap();
        let screen = render(&model);
        assert!(screen.contains("filter Date>"));
    }

    #[test]
    fn empty_view_renders_without_panicking() {
        let mut model = test_model();
        model.update(Message::ClearDataset).unwrap();
        let screen = render(&model);
        assert!(screen.contains("0/0 (0 rows)"));
    }
}
