use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use reordr::engine::Granularity;
use reordr::session::round::Verdict;

use crate::ui::layout::unit_label;
use crate::ui::theme::Theme;

/// Where the dragged unit is drawn while it follows the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub index: usize,
    pub area: Rect,
}

/// The live order of the current round, one box per unit.
pub struct Board<'a> {
    units: &'a [String],
    rects: &'a [Rect],
    granularity: Granularity,
    verdict: Verdict,
    focused: Option<usize>,
    dragging: Option<usize>,
    drop_target: Option<usize>,
    ghost: Option<Ghost>,
    title: String,
    theme: &'a Theme,
}

impl<'a> Board<'a> {
    pub fn new(
        units: &'a [String],
        rects: &'a [Rect],
        granularity: Granularity,
        verdict: Verdict,
        theme: &'a Theme,
    ) -> Self {
        Self {
            units,
            rects,
            granularity,
            verdict,
            focused: None,
            dragging: None,
            drop_target: None,
            ghost: None,
            title: String::new(),
            theme,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn focused(mut self, focused: Option<usize>) -> Self {
        self.focused = focused;
        self
    }

    pub fn dragging(mut self, dragging: Option<usize>, drop_target: Option<usize>) -> Self {
        self.dragging = dragging;
        self.drop_target = drop_target;
        self
    }

    pub fn ghost(mut self, ghost: Option<Ghost>) -> Self {
        self.ghost = ghost;
        self
    }

    fn unit_style(&self, idx: usize) -> Style {
        let colors = &self.theme.colors;
        let base = Style::default().fg(colors.fg()).bg(colors.header_bg());
        if self.dragging == Some(idx) {
            // The ghost carries the label; the slot it left stays visible but faint.
            return Style::default()
                .fg(colors.muted())
                .bg(colors.bg())
                .add_modifier(Modifier::DIM);
        }
        if self.drop_target == Some(idx) {
            return base.fg(colors.bg()).bg(colors.drop_slot());
        }
        if self.focused == Some(idx) {
            return base
                .fg(colors.bg())
                .bg(colors.unit_focused())
                .add_modifier(Modifier::BOLD);
        }
        base
    }

    fn border_color(&self) -> Color {
        let colors = &self.theme.colors;
        match self.verdict {
            Verdict::Unverified => colors.unit_border(),
            Verdict::Correct => colors.success(),
            Verdict::Incorrect => colors.error(),
        }
    }

    fn render_unit(&self, label: &str, rect: Rect, style: Style, buf: &mut Buffer) {
        match self.granularity {
            Granularity::Word => {
                buf.set_style(rect, style);
                let text = format!(" {label} ");
                buf.set_stringn(rect.x, rect.y, &text, rect.width as usize, style);
            }
            Granularity::Sentence => {
                buf.set_style(rect, style);
                let text_area = Rect::new(
                    rect.x.saturating_add(1),
                    rect.y,
                    rect.width.saturating_sub(2),
                    rect.height,
                );
                Paragraph::new(Line::from(Span::styled(label.to_string(), style)))
                    .wrap(Wrap { trim: true })
                    .render(text_area, buf);
            }
        }
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut block = Block::bordered()
            .border_style(Style::default().fg(self.border_color()))
            .style(Style::default().bg(colors.bg()));
        if !self.title.is_empty() {
            block = block.title(format!(" {} ", self.title));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for (idx, (unit, rect)) in self.units.iter().zip(self.rects).enumerate() {
            let visible = rect.intersection(inner);
            if visible.is_empty() {
                continue;
            }
            self.render_unit(unit_label(unit), visible, self.unit_style(idx), buf);
        }

        if let Some(ghost) = self.ghost {
            let Some(unit) = self.units.get(ghost.index) else {
                return;
            };
            let visible = ghost.area.intersection(inner);
            if visible.is_empty() {
                return;
            }
            Clear.render(visible, buf);
            let style = Style::default()
                .fg(colors.bg())
                .bg(colors.unit_dragging())
                .add_modifier(Modifier::BOLD);
            self.render_unit(unit_label(unit), visible, style, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn words_render_as_chips() {
        let theme = Theme::default();
        let units = vec!["one ".to_string(), "two".to_string()];
        let rects = vec![Rect::new(1, 1, 5, 1), Rect::new(7, 1, 5, 1)];
        let area = Rect::new(0, 0, 14, 3);
        let mut buf = Buffer::empty(area);
        Board::new(&units, &rects, Granularity::Word, Verdict::Unverified, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), "│ one   two  │");
    }

    #[test]
    fn ghost_is_drawn_over_units() {
        let theme = Theme::default();
        let units = vec!["ab".to_string(), "cd".to_string()];
        let rects = vec![Rect::new(1, 1, 4, 1), Rect::new(6, 1, 4, 1)];
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        let ghost = Ghost {
            index: 0,
            area: Rect::new(6, 1, 4, 1),
        };
        Board::new(&units, &rects, Granularity::Word, Verdict::Unverified, &theme)
            .dragging(Some(0), Some(1))
            .ghost(Some(ghost))
            .render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), "│ ab   ab  │");
        assert_eq!(buf[(7, 1)].bg, theme.colors.unit_dragging());
    }

    #[test]
    fn offscreen_units_are_skipped() {
        let theme = Theme::default();
        let units = vec!["far away".to_string()];
        let rects = vec![Rect::new(1, 40, 10, 1)];
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        Board::new(&units, &rects, Granularity::Sentence, Verdict::Correct, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), "│          │");
    }
}
