use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use reordr::session::result::SessionSummary;

use crate::ui::theme::Theme;

/// End-of-game score card.
pub struct Summary<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

fn checks_label(n: u32) -> String {
    if n == 1 {
        "1 check".to_string()
    } else {
        format!("{n} checks")
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Game Over ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let s = self.summary;
        let score_text = format!("{}/{}", s.score, s.total);
        let pct_text = format!("  ({:.0}%)", s.percent());
        let score_color = if s.score == s.total {
            colors.success()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Final score:  ", Style::default().fg(colors.fg())),
            Span::styled(
                &*score_text,
                Style::default()
                    .fg(score_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&*pct_text, Style::default().fg(colors.muted())),
        ]))
        .render(layout[1], buf);

        let first_try_text = format!(
            "{} of {} on the first check, {} used",
            s.first_try(),
            s.total,
            checks_label(s.total_attempts()),
        );
        Paragraph::new(Line::from(vec![
            Span::styled("  Accuracy:     ", Style::default().fg(colors.fg())),
            Span::styled(&*first_try_text, Style::default().fg(colors.accent())),
        ]))
        .render(layout[2], buf);

        if s.total > 1 {
            let lines: Vec<Line> = s
                .attempts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    Line::from(Span::styled(
                        format!("    Round {:>2}: {}", i + 1, checks_label(n)),
                        Style::default().fg(colors.muted()),
                    ))
                })
                .collect();
            Paragraph::new(lines).render(layout[3], buf);
        }

        let help = Paragraph::new(Line::from(Span::styled(
            "  [r] Play again  [e] New text  [q] Quit",
            Style::default().fg(colors.accent()),
        )));
        help.render(layout[4], buf);
    }
}
