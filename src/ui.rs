use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    reconcile::{CharClass, Position},
    session::Phase,
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        // corrected slots get orange, clearly apart from plain green
        let orange_bold_style = Style::default().patch(bold_style).fg(Color::Rgb(255, 165, 0));
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let cursor_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1), // header
                    Constraint::Length(1), // padding
                    Constraint::Min(1),    // code area
                    Constraint::Length(1), // status line
                ]
                .as_ref(),
            )
            .split(area);

        let header = format!(
            "{}  |  {}  |  {} wpm  |  {}",
            session.snippet.name,
            session.formatted_time(),
            session.wpm(),
            session.indicator(),
        );
        Paragraph::new(Span::styled(header, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let target_lines = session.target_lines();
        let reconciliation = session.reconciliation();
        let cursor = reconciliation.cursor;

        let mut rendered: Vec<Line> = Vec::new();
        for line_idx in session.viewport().visible_range(target_lines.len()) {
            let target: Vec<char> = target_lines[line_idx].chars().collect();
            let typed: Vec<char> = reconciliation
                .typed_lines
                .get(line_idx)
                .map(|l| l.chars().collect())
                .unwrap_or_default();

            // one extra slot when the caret rests at the end of this line
            let mut cols = target.len().max(typed.len()).max(1);
            if cursor.line == line_idx {
                cols = cols.max(cursor.col + 1);
            }

            let mut spans: Vec<Span> = Vec::new();
            for col in 0..cols {
                let pos = Position::new(line_idx, col);
                let at_cursor = pos == cursor;

                // errors show what was typed; everything else shows the target
                let shown = match reconciliation.classify(pos) {
                    CharClass::Error => typed.get(col).copied(),
                    _ => target.get(col).copied().or_else(|| typed.get(col).copied()),
                };

                let glyph = match shown {
                    Some(' ') if reconciliation.classify(pos) == CharClass::Error => {
                        "·".to_string()
                    }
                    Some(c) => c.to_string(),
                    // past both line ends; only drawn to carry the cursor
                    None => " ".to_string(),
                };

                let mut style = match reconciliation.classify(pos) {
                    CharClass::Correct => green_bold_style,
                    CharClass::Error => red_bold_style,
                    CharClass::Fixed => orange_bold_style,
                    CharClass::Pending => dim_style,
                };
                if at_cursor {
                    style = style.patch(cursor_style);
                }

                spans.push(Span::styled(glyph, style));
            }
            rendered.push(Line::from(spans));
        }

        // narrow snippets center nicely; wide ones stay left-aligned
        let widest = target_lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let alignment = if (widest as u16) < chunks[2].width / 2 {
            Alignment::Center
        } else {
            Alignment::Left
        };

        Paragraph::new(rendered)
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .render(chunks[2], buf);

        let status = match session.phase() {
            Phase::Paused => Span::styled(
                "PAUSED - press any key to resume",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ),
            Phase::Completed => Span::styled(
                format!(
                    "completed in {} at {} wpm  (<- retry, -> next, esc quit)",
                    session.formatted_time(),
                    session.wpm()
                ),
                green_bold_style,
            ),
            _ => Span::styled("<- retry  |  -> next snippet  |  esc quit", dim_style),
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}
