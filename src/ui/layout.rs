use ratatui::layout::{Constraint, Direction, Layout, Rect};

use reordr::engine::Granularity;

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub feedback: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            feedback: vertical[2],
            footer: vertical[3],
        }
    }
}

/// Text drawn for a unit: the separator whitespace words carry is not shown.
pub fn unit_label(unit: &str) -> &str {
    unit.trim()
}

/// Places every unit inside `area`. Sentences stack one per row block,
/// wrapped to the area width; words flow left to right as one-line chips
/// with a blank row between lines. Units past the bottom still get a rect
/// (clipped when drawn) so hit testing stays index-aligned.
pub fn unit_rects(units: &[String], area: Rect, granularity: Granularity) -> Vec<Rect> {
    if area.width == 0 {
        return vec![Rect::new(area.x, area.y, 0, 0); units.len()];
    }
    match granularity {
        Granularity::Sentence => stack_rects(units, area),
        Granularity::Word => flow_rects(units, area),
    }
}

fn stack_rects(units: &[String], area: Rect) -> Vec<Rect> {
    let text_width = area.width.saturating_sub(2).max(1) as usize;
    let mut y = area.y;
    units
        .iter()
        .map(|unit| {
            let height = wrapped_line_count(unit_label(unit), text_width).max(1) as u16;
            let rect = Rect::new(area.x, y, area.width, height);
            y = y.saturating_add(height + 1);
            rect
        })
        .collect()
}

fn flow_rects(units: &[String], area: Rect) -> Vec<Rect> {
    let right = area.x.saturating_add(area.width);
    let mut x = area.x;
    let mut y = area.y;
    units
        .iter()
        .map(|unit| {
            let width = (unit_label(unit).chars().count() as u16 + 2).min(area.width);
            if x > area.x && x.saturating_add(width) > right {
                x = area.x;
                y = y.saturating_add(2);
            }
            let rect = Rect::new(x, y, width, 1);
            x = x.saturating_add(width + 1);
            rect
        })
        .collect()
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
        has_hint = true;
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let target_w = (area.width.saturating_mul(percent_x.min(100)) / 100).max(40).min(area.width);
    let target_h = (area.height.saturating_mul(percent_y.min(100)) / 100).max(10).min(area.height);

    let left = area.x.saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area.y.saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn words_flow_and_wrap() {
        let area = Rect::new(2, 1, 12, 10);
        let rects = unit_rects(&units(&["one ", "two ", "three"]), area, Granularity::Word);
        assert_eq!(rects[0], Rect::new(2, 1, 5, 1));
        assert_eq!(rects[1], Rect::new(8, 1, 5, 1));
        // "three" needs 7 columns; only 1 left on the first line.
        assert_eq!(rects[2], Rect::new(2, 3, 7, 1));
    }

    #[test]
    fn long_word_is_clipped_to_width() {
        let area = Rect::new(0, 0, 6, 4);
        let rects = unit_rects(&units(&["extraordinary"]), area, Granularity::Word);
        assert_eq!(rects[0], Rect::new(0, 0, 6, 1));
    }

    #[test]
    fn sentences_stack_with_wrapping() {
        let area = Rect::new(0, 0, 12, 20);
        let rects = unit_rects(&units(&["Short one.", "This sentence is long."]), area, Granularity::Sentence);
        assert_eq!(rects[0], Rect::new(0, 0, 12, 1));
        // 22 chars in 10 columns of text.
        assert_eq!(rects[1], Rect::new(0, 2, 12, 3));
    }

    #[test]
    fn zero_width_area_keeps_one_rect_per_unit() {
        let rects = unit_rects(&units(&["a", "b"]), Rect::new(0, 0, 0, 5), Granularity::Word);
        assert_eq!(rects.len(), 2);
    }

    #[test]
    fn hints_pack_into_lines() {
        let lines = pack_hint_lines(&["[a] one", "[b] two", "[c] three"], 18);
        assert_eq!(lines, vec![" [a] one  [b] two", " [c] three"]);
    }

    #[test]
    fn centered_rect_fits_area() {
        let area = Rect::new(0, 0, 30, 8);
        let r = centered_rect(50, 50, area);
        assert_eq!(r, Rect::new(0, 0, 30, 8));
    }
}
