mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reordr::config::Config;
use reordr::content::RoundSet;
use reordr::engine::Granularity;
use reordr::session::game::Phase;
use reordr::session::result::FeedbackKind;

use app::App;
use event::{AppEvent, EventHandler};
use ui::components::board::Board;
use ui::components::summary::Summary;
use ui::layout::{AppLayout, pack_hint_lines};

#[derive(Parser)]
#[command(name = "reordr", version, about = "Put shuffled sentences and words back in order")]
struct Cli {
    #[arg(short, long, help = "Round set to play: a bundled or user set name, or a file path")]
    set: Option<String>,

    #[arg(short, long, conflicts_with = "sentences", help = "Split text into words")]
    words: bool,

    #[arg(long, help = "Split text into sentences")]
    sentences: bool,

    #[arg(long, help = "Seed for reproducible shuffles")]
    seed: Option<u64>,

    #[arg(long, help = "Log file (default: <data dir>/reordr/reordr.log)")]
    log_file: Option<PathBuf>,

    #[arg(long, help = "Print the available round sets and exit")]
    list_sets: bool,
}

impl Cli {
    fn granularity(&self) -> Option<Granularity> {
        if self.words {
            Some(Granularity::Word)
        } else if self.sentences {
            Some(Granularity::Sentence)
        } else {
            None
        }
    }
}

fn init_tracing(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let user_dir = RoundSet::user_dir();

    if cli.list_sets {
        for name in RoundSet::available(user_dir.as_deref()) {
            println!("{name}");
        }
        return Ok(());
    }

    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let log_path = cli.log_file.clone().unwrap_or_else(Config::log_path);
    init_tracing(&log_path, &config.log_level)?;
    if let Some(err) = config_err {
        warn!(error = %err, "config unreadable, using defaults");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let mut app = App::new(config, ui::theme::Theme::load_user(), cli.seed, user_dir);
    if let Some(granularity) = cli.granularity() {
        app.granularity = granularity;
    }
    if let Some(ref query) = cli.set {
        app.play_set(query, cli.granularity());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        EnableFocusChange
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!("exiting");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            app.layout(frame.area());
            render(frame, app);
        })?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
            AppEvent::Paste(text) => app.paste(&text),
            AppEvent::FocusLost => app.focus_lost(),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events; Repeat would double-move units
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    app.handle_key(key);
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.phase() {
        Phase::Input => render_input(frame, app, layout.main),
        Phase::Playing | Phase::Checking => render_board(frame, app, layout.main),
        Phase::Finished => {
            let summary = app.session.summary();
            let centered = ui::layout::centered_rect(60, 70, layout.main);
            frame.render_widget(Summary::new(&summary, &app.theme), centered);
        }
    }

    render_feedback(frame, app, layout.feedback);
    render_footer(frame, app, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let state = app.session.state();

    let info = match state.phase {
        Phase::Input => format!(
            " Set: {} | {}",
            app.selected_set().unwrap_or("custom"),
            granularity_label(app.granularity)
        ),
        _ => format!(
            " Round {}/{} | Score {} | {}",
            state.round_index + 1,
            state.round_count,
            state.score,
            granularity_label(state.granularity),
        ),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " reordr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn granularity_label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Sentence => "Sentences",
        Granularity::Word => "Words",
    }
}

fn render_input(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(area);

    let set_lines: Vec<Line> = app
        .sets
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let selected = i == app.set_selected;
            let indicator = if selected { ">" } else { " " };
            let style = if selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            Line::from(Span::styled(format!(" {indicator} {name}"), style))
        })
        .collect();
    let sets = Paragraph::new(set_lines).block(
        Block::bordered()
            .title(" Sets ")
            .border_style(Style::default().fg(colors.unit_border())),
    );
    frame.render_widget(sets, columns[0]);

    let (before, cursor, after) = app.input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
    let mut spans = vec![Span::styled(before, Style::default().fg(colors.fg()))];
    match cursor {
        Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans.push(Span::styled(after, Style::default().fg(colors.fg())));

    let editor = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .title(format!(
                    " {}: {} ",
                    if app.phrase_mode {
                        "Phrases (| between rounds)"
                    } else {
                        "Text"
                    },
                    granularity_label(app.granularity)
                ))
                .border_style(Style::default().fg(colors.accent())),
        );
    frame.render_widget(editor, columns[1]);
}

fn render_board(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let state = app.session.state();
    let title = match state.phase {
        Phase::Checking => "Solved",
        _ if state.dragging.is_some() => "Drop it in place",
        _ => "Put the pieces in order",
    };
    let board = Board::new(
        state.live,
        &app.unit_rects,
        state.granularity,
        state.verdict,
        &app.theme,
    )
    .title(title)
    .focused(Some(app.focused))
    .dragging(state.dragging, app.drop_target)
    .ghost(app.ghost);
    frame.render_widget(board, area);
}

fn render_feedback(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let state = app.session.state();

    let (message, color) = match (state.feedback, &app.notice) {
        (Some(feedback), _) => {
            let color = match feedback.kind {
                FeedbackKind::Correct => colors.success(),
                FeedbackKind::Incorrect | FeedbackKind::Error => colors.error(),
                FeedbackKind::Final => colors.accent(),
            };
            (feedback.message.clone(), color)
        }
        (None, Some(notice)) => (notice.clone(), colors.error()),
        (None, None) => return,
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {message}"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true })
    .block(Block::bordered().border_style(Style::default().fg(color)));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let hints: &[&str] = match app.phase() {
        Phase::Input => &[
            "[Enter] Start",
            "[Tab] Sentences/Words",
            "[S-Tab] Text/Phrases",
            "[Up/Down] Set",
            "[Esc] Quit",
        ],
        Phase::Playing => &[
            "[Mouse] Drag",
            "[Space] Grab/Drop",
            "[Arrows] Focus",
            "[ / ] Nudge",
            "[Enter] Check",
            "[r] Reshuffle",
            "[e] Exit",
        ],
        Phase::Checking => &["[Enter/n] Next", "[r] Replay", "[e] Exit", "[q] Quit"],
        Phase::Finished => &["[r] Play again", "[e] New text", "[q] Quit"],
    };
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
