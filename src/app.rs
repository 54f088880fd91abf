use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::Block;
use tracing::{debug, info};

use reordr::config::Config;
use reordr::content::RoundSet;
use reordr::engine::pointer::DragFeedback;
use reordr::engine::{DragStyle, Granularity, MoveRequest, Point};
use reordr::error::SessionError;
use reordr::session::game::{Phase, Session};
use reordr::session::result::Advance;

use crate::ui::components::board::Ghost;
use crate::ui::layout::{AppLayout, unit_rects};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub input: LineInput,
    pub granularity: Granularity,
    /// Editor text is a `|`-separated phrase list, one round per phrase.
    pub phrase_mode: bool,
    pub sets: Vec<String>,
    pub set_selected: usize,
    pub user_dir: Option<PathBuf>,
    pub focused: usize,
    /// Inside of the board frame as last drawn.
    pub board_area: Rect,
    /// One rect per live unit, index-aligned, as last drawn.
    pub unit_rects: Vec<Rect>,
    pub ghost: Option<Ghost>,
    pub drop_target: Option<usize>,
    /// Content loading problems; validation errors come from the session.
    pub notice: Option<String>,
    pub should_quit: bool,
}

fn cell_point(column: u16, row: u16) -> Point {
    Point::new(column as f32 + 0.5, row as f32 + 0.5)
}

fn engine_rect(r: Rect) -> reordr::engine::Rect {
    reordr::engine::Rect::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
}

impl App {
    pub fn new(config: Config, theme: Theme, seed: Option<u64>, user_dir: Option<PathBuf>) -> Self {
        let session = match seed {
            Some(seed) => Session::with_seed(config.rules(), seed),
            None => Session::new(config.rules()),
        };
        let sets = RoundSet::available(user_dir.as_deref());
        let set_selected = sets
            .iter()
            .position(|s| *s == config.default_set)
            .unwrap_or(0);

        let mut app = Self {
            session,
            theme,
            input: LineInput::new(""),
            granularity: Granularity::Sentence,
            phrase_mode: false,
            sets,
            set_selected,
            user_dir,
            focused: 0,
            board_area: Rect::default(),
            unit_rects: Vec::new(),
            ghost: None,
            drop_target: None,
            notice: None,
            should_quit: false,
        };
        if let Some(name) = app.sets.get(app.set_selected).cloned() {
            app.preview_set(&name);
        }
        app
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn selected_set(&self) -> Option<&str> {
        self.sets.get(self.set_selected).map(String::as_str)
    }

    /// Puts a set's texts in the editor without starting it.
    pub fn preview_set(&mut self, query: &str) {
        match RoundSet::resolve(query, self.user_dir.as_deref()) {
            Ok(set) => {
                self.show_set(&set);
                self.notice = None;
            }
            Err(err) => {
                debug!(%err, set = query, "set preview failed");
                self.notice = Some(err.to_string());
            }
        }
    }

    /// Loads a set and starts playing it right away. `granularity`
    /// overrides the one the set declares.
    pub fn play_set(&mut self, query: &str, granularity: Option<Granularity>) {
        let mut set = match RoundSet::resolve(query, self.user_dir.as_deref()) {
            Ok(set) => set,
            Err(err) => {
                self.notice = Some(err.to_string());
                return;
            }
        };
        if let Some(granularity) = granularity {
            set.granularity = granularity;
        }
        self.show_set(&set);
        info!(set = %set.name, "playing round set");
        if self.session.submit_set(&set).is_ok() {
            self.round_started();
        }
    }

    fn show_set(&mut self, set: &RoundSet) {
        self.input.set(&set.texts.join(" | "));
        self.granularity = set.granularity;
        self.phrase_mode = set.texts.len() > 1;
    }

    pub fn cycle_set(&mut self, forward: bool) {
        if self.sets.is_empty() {
            return;
        }
        let n = self.sets.len();
        self.set_selected = if forward {
            (self.set_selected + 1) % n
        } else {
            (self.set_selected + n - 1) % n
        };
        let name = self.sets[self.set_selected].clone();
        self.preview_set(&name);
    }

    pub fn toggle_granularity(&mut self) {
        self.granularity = match self.granularity {
            Granularity::Sentence => Granularity::Word,
            Granularity::Word => Granularity::Sentence,
        };
    }

    /// Starts a game from the editor: one round for the whole text, or one
    /// per phrase in phrase-list mode.
    pub fn submit_input(&mut self) {
        let text = self.input.value();
        let set = if self.phrase_mode {
            RoundSet::from_phrase_list(text, self.granularity)
        } else {
            RoundSet::from_text(text, self.granularity)
        };
        match self.session.submit_set(&set) {
            Ok(_) => self.round_started(),
            Err(err) => debug!(%err, "input not accepted"),
        }
    }

    fn round_started(&mut self) {
        self.focused = 0;
        self.notice = None;
        self.clear_drag_visuals();
    }

    fn clear_drag_visuals(&mut self) {
        self.ghost = None;
        self.drop_target = None;
    }

    /// Recomputes the board geometry for a frame of `area`.
    pub fn layout(&mut self, area: Rect) {
        let main = AppLayout::new(area).main;
        self.board_area = Block::bordered().inner(main);
        let state = self.session.state();
        self.unit_rects = unit_rects(state.live, self.board_area, state.granularity);
        if self.focused >= self.unit_rects.len() {
            self.focused = self.unit_rects.len().saturating_sub(1);
        }
    }

    fn bounds(&self) -> Vec<reordr::engine::Rect> {
        self.unit_rects.iter().copied().map(engine_rect).collect()
    }

    fn container_origin(&self) -> Point {
        Point::new(self.board_area.x as f32, self.board_area.y as f32)
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        if !self.board_area.contains(pos) {
            return None;
        }
        self.unit_rects.iter().position(|r| r.contains(pos))
    }

    fn is_dragging(&self) -> bool {
        self.session.state().dragging.is_some()
    }

    fn after_move(&mut self, result: Result<Option<MoveRequest>, SessionError>) {
        self.clear_drag_visuals();
        match result {
            Ok(Some(request)) => self.focused = request.to,
            Ok(None) => {}
            Err(err) => debug!(%err, "drop ignored"),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.phase() != Phase::Playing {
            return;
        }
        let point = cell_point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.hit_test(mouse.column, mouse.row) else {
                    return;
                };
                let element = engine_rect(self.unit_rects[index]);
                let origin = self.container_origin();
                match self
                    .session
                    .begin_drag(DragStyle::Tracked, index, point, element, origin)
                {
                    Ok(()) => {
                        self.focused = index;
                        self.ghost = Some(Ghost {
                            index,
                            area: self.unit_rects[index],
                        });
                        self.drop_target = Some(index);
                    }
                    Err(err) => debug!(%err, "drag not started"),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.is_dragging() {
                    return;
                }
                if !self.board_area.contains(Position::new(mouse.column, mouse.row)) {
                    self.session.cancel_drag();
                    self.clear_drag_visuals();
                    return;
                }
                let bounds = self.bounds();
                if let Ok(feedback) = self.session.update_drag(point, &bounds) {
                    self.show_feedback(feedback);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.is_dragging() {
                    return;
                }
                let bounds = self.bounds();
                let result = self.session.end_drag(point, &bounds);
                self.after_move(result);
            }
            _ => {}
        }
    }

    fn show_feedback(&mut self, feedback: DragFeedback) {
        let len = self.unit_rects.len();
        self.drop_target = feedback.slot.and_then(|slot| slot.target_index(len));
        let Some(offset) = feedback.visual_offset else {
            return;
        };
        let Some(ghost) = self.ghost.as_mut() else {
            return;
        };
        let Some(source) = self.unit_rects.get(ghost.index) else {
            return;
        };
        let x = (self.board_area.x as f32 + offset.x).round().max(0.0) as u16;
        let y = (self.board_area.y as f32 + offset.y).round().max(0.0) as u16;
        ghost.area = Rect::new(x, y, source.width, source.height);
    }

    /// The terminal lost focus mid-drag: drop where the pointer was last seen.
    pub fn focus_lost(&mut self) {
        if !self.is_dragging() || self.ghost.is_none() {
            return;
        }
        let bounds = self.bounds();
        let result = self.session.release_drag(&bounds);
        self.after_move(result);
    }

    pub fn paste(&mut self, text: &str) {
        if self.phase() == Phase::Input {
            self.input.paste(text);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.phase() {
            Phase::Input => self.handle_input_key(key),
            Phase::Playing | Phase::Checking => self.handle_board_key(key),
            Phase::Finished => self.handle_finished_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.toggle_granularity(),
            KeyCode::BackTab => self.phrase_mode = !self.phrase_mode,
            KeyCode::Up => self.cycle_set(false),
            KeyCode::Down => self.cycle_set(true),
            _ => match self.input.handle(key) {
                InputResult::Submit => self.submit_input(),
                InputResult::Cancel => self.should_quit = true,
                InputResult::Continue => {}
            },
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let len = self.unit_rects.len();
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                self.focused = self.focused.saturating_sub(1);
                self.hover_focused();
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                if self.focused + 1 < len {
                    self.focused += 1;
                }
                self.hover_focused();
            }
            KeyCode::Char('[') => self.nudge(false),
            KeyCode::Char(']') => self.nudge(true),
            KeyCode::Char(' ') => self.toggle_grab(),
            KeyCode::Enter | KeyCode::Char('c') if self.phase() == Phase::Playing => {
                if self.is_dragging() {
                    self.toggle_grab();
                }
                if let Err(err) = self.session.verify_current() {
                    debug!(%err, "check ignored");
                }
            }
            KeyCode::Enter | KeyCode::Char('n') => self.advance(),
            KeyCode::Char('r') => {
                if self.session.replay_round().is_ok() {
                    self.round_started();
                }
            }
            KeyCode::Esc if self.is_dragging() => {
                self.session.cancel_drag();
                self.clear_drag_visuals();
            }
            KeyCode::Esc | KeyCode::Char('e') => self.exit_to_input(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                if self.session.restart().is_ok() {
                    self.round_started();
                }
            }
            KeyCode::Esc | KeyCode::Char('e') => self.exit_to_input(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Space picks up the focused unit, and a second Space drops it on
    /// whichever unit has focus by then.
    fn toggle_grab(&mut self) {
        if self.is_dragging() {
            let result = self.session.drop_drag(self.focused);
            self.after_move(result);
            return;
        }
        let Some(rect) = self.unit_rects.get(self.focused).copied() else {
            return;
        };
        let origin = self.container_origin();
        let pointer = engine_rect(rect).origin();
        match self
            .session
            .begin_drag(DragStyle::Direct, self.focused, pointer, engine_rect(rect), origin)
        {
            Ok(()) => self.drop_target = Some(self.focused),
            Err(err) => debug!(%err, "grab ignored"),
        }
    }

    fn hover_focused(&mut self) {
        if self.ghost.is_none() && self.session.hover_drag(self.focused).is_ok() {
            self.drop_target = Some(self.focused);
        }
    }

    /// Swaps the focused unit with its neighbour without a drag.
    fn nudge(&mut self, forward: bool) {
        if self.is_dragging() {
            return;
        }
        let from = self.focused;
        let to = if forward {
            from + 1
        } else {
            match from.checked_sub(1) {
                Some(to) => to,
                None => return,
            }
        };
        if let Ok(true) = self.session.move_unit(from, to) {
            self.focused = to;
        }
    }

    fn advance(&mut self) {
        match self.session.advance_round() {
            Ok(Advance::Started(_)) => self.round_started(),
            Ok(Advance::Finished(summary)) => {
                debug!(score = summary.score, total = summary.total, "summary shown");
                self.clear_drag_visuals();
            }
            Err(err) => debug!(%err, "advance ignored"),
        }
    }

    fn exit_to_input(&mut self) {
        if self.session.exit().is_ok() {
            let last = self.session.last_text().to_string();
            self.input.set(&last);
            self.clear_drag_visuals();
        }
    }
}
