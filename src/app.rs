//! Interactive terminal UI for generating tiles

use std::error::Error;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use image::RgbaImage;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{info, warn};

use crate::asset::{AssetCategory, GenerationRequest, PixelSize};
use crate::client::{Credential, ImageGenClient, ImageGenerator};
use crate::config::AppConfig;
use crate::fetch::{HttpFetcher, ImageFetcher};
use crate::pipeline::{Session, SessionState};
use crate::viewer;

const BOX_WIDTH: u16 = 76;
const BOX_HEIGHT: u16 = 22;
const FORM_WIDTH: u16 = 40;

/// What the event loop should do after a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    None,
    Generate,
    Save,
    View,
    Quit,
}

/// Currently selected field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ApiKey,
    Asset,
    Size,
    Generate,
    Save,
    View,
    Quit,
}

impl Field {
    fn next(&self) -> Field {
        match self {
            Field::ApiKey => Field::Asset,
            Field::Asset => Field::Size,
            Field::Size => Field::Generate,
            Field::Generate => Field::Save,
            Field::Save => Field::View,
            Field::View => Field::Quit,
            Field::Quit => Field::ApiKey,
        }
    }

    fn prev(&self) -> Field {
        match self {
            Field::ApiKey => Field::Quit,
            Field::Asset => Field::ApiKey,
            Field::Size => Field::Asset,
            Field::Generate => Field::Size,
            Field::Save => Field::Generate,
            Field::View => Field::Save,
            Field::Quit => Field::View,
        }
    }

    fn is_cyclable(&self) -> bool {
        matches!(self, Field::Asset | Field::Size)
    }
}

/// UI state wrapped around a [`Session`]
pub struct App {
    session: Session,
    category: AssetCategory,
    size: PixelSize,
    selected: Field,
    editing: bool,
    input_buffer: String,
    /// One-off message (save result, window errors) shown instead of the session status
    notice: Option<String>,
    output_dir: PathBuf,
}

impl App {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            session: Session::new(),
            category: AssetCategory::default(),
            size: PixelSize::default(),
            selected: Field::ApiKey,
            editing: false,
            input_buffer: String::new(),
            notice: None,
            output_dir,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.category, self.size)
    }

    fn has_asset(&self) -> bool {
        self.session.asset().is_some()
    }

    /// Apply one key press; returns work the caller has to carry out.
    pub fn handle_key(&mut self, code: KeyCode) -> Command {
        if self.editing {
            match code {
                KeyCode::Enter => self.confirm_edit(),
                KeyCode::Esc => self.cancel_edit(),
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) if !c.is_control() => self.input_buffer.push(c),
                _ => {}
            }
            return Command::None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Command::Quit,
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.selected = self.selected.prev();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = self.selected.next();
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_selected(false),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_selected(true),
            KeyCode::Char('g') => return Command::Generate,
            KeyCode::Enter => return self.activate(),
            _ => {}
        }
        Command::None
    }

    /// Bracketed paste goes straight into the key field while editing.
    pub fn handle_paste(&mut self, text: &str) {
        if self.editing {
            self.input_buffer.push_str(text.trim());
        }
    }

    fn activate(&mut self) -> Command {
        match self.selected {
            Field::ApiKey => {
                self.editing = true;
                self.input_buffer.clear();
                Command::None
            }
            _ if self.selected.is_cyclable() => {
                self.cycle_selected(true);
                Command::None
            }
            Field::Generate => Command::Generate,
            Field::Save | Field::View if !self.has_asset() => {
                self.notice = Some("Nothing generated yet".to_string());
                Command::None
            }
            Field::Save => Command::Save,
            Field::View => Command::View,
            Field::Quit => Command::Quit,
            _ => Command::None,
        }
    }

    fn cycle_selected(&mut self, forward: bool) {
        match self.selected {
            Field::Asset => self.category = self.category.cycle(forward),
            Field::Size => self.size = self.size.cycle(forward),
            _ => {}
        }
    }

    fn confirm_edit(&mut self) {
        self.session.credential = Credential::new(std::mem::take(&mut self.input_buffer));
        self.editing = false;
    }

    fn cancel_edit(&mut self) {
        self.editing = false;
        self.input_buffer.clear();
    }

    /// Mark the session busy so the next draw shows the indicator.
    pub fn begin_generation(&mut self) {
        self.notice = None;
        self.session.begin();
    }

    /// Run the pipeline for the current selection, blocking until it finishes.
    pub fn generate(&mut self, generator: &dyn ImageGenerator, fetcher: &dyn ImageFetcher) {
        self.notice = None;
        let request = self.request();
        self.session.trigger(request, generator, fetcher);
    }

    /// Save the current asset into the output directory.
    pub fn save(&mut self) {
        self.notice = Some(match self.session.save_download(&self.output_dir) {
            Ok(Some(path)) => format!("Saved {}", path.display()),
            Ok(None) => "Nothing generated yet".to_string(),
            Err(e) => {
                warn!("save failed: {}", e);
                format!("Save failed: {}", e)
            }
        });
    }

    /// Text and colour of the single status line
    fn status_line(&self) -> (String, Color) {
        if let Some(notice) = &self.notice {
            return (notice.clone(), Color::Cyan);
        }
        match self.session.state() {
            SessionState::Idle => (
                "Set an API key, pick an asset and size, then Generate".to_string(),
                Color::DarkGray,
            ),
            SessionState::Generating => ("Generating...".to_string(), Color::Yellow),
            SessionState::Previewing(asset) => (asset.caption(), Color::Green),
            SessionState::Failed(message) => (format!("Error: {}", message), Color::Red),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            area,
        );

        let box_x = (area.width.saturating_sub(BOX_WIDTH)) / 2;
        let box_y = (area.height.saturating_sub(BOX_HEIGHT + 2)) / 2;
        let box_area = Rect::new(box_x, box_y, BOX_WIDTH, BOX_HEIGHT).intersection(area);

        let block = Block::default()
            .title(" RPG Asset Maker ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let mut y = inner.y;
        self.render_section_header(frame, inner.x + 1, y, "Credentials");
        y += 1;
        self.render_field(frame, inner.x + 2, y, "API Key:", self.format_api_key(), Field::ApiKey);
        y += 2;

        self.render_section_header(frame, inner.x + 1, y, "Tile");
        y += 1;
        self.render_cycle_field(frame, inner.x + 2, y, "Asset:", self.category.label(), Field::Asset);
        y += 1;
        self.render_cycle_field(frame, inner.x + 2, y, "Size:", &self.size.to_string(), Field::Size);
        y += 2;

        if self.selected == Field::Asset {
            let desc = Paragraph::new(self.category.description())
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            put(frame, desc, Rect::new(inner.x + 2, y, FORM_WIDTH - 2, 1));
        }

        let preview_area = Rect::new(
            inner.x + FORM_WIDTH + 1,
            inner.y,
            inner.width.saturating_sub(FORM_WIDTH + 1),
            inner.height.saturating_sub(3),
        )
        .intersection(inner);
        self.render_preview(frame, preview_area);

        let sep_y = inner.y + inner.height.saturating_sub(3);
        for x in box_area.x + 1..(box_area.x + box_area.width).saturating_sub(1) {
            if sep_y < area.y + area.height {
                frame.buffer_mut()[(x, sep_y)].set_char('─').set_fg(Color::Cyan);
            }
        }

        self.render_buttons(frame, inner.x, sep_y + 1, inner.width);

        let (status, color) = self.status_line();
        put(
            frame,
            Paragraph::new(status)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center),
            Rect::new(box_area.x, box_area.y + box_area.height, box_area.width, 1),
        );

        let help = if self.editing {
            "Type or paste key, Enter: Confirm, Esc: Cancel"
        } else {
            "↑↓/jk: Navigate  Enter: Select  ←→/hl: Cycle  g: Generate  q: Quit"
        };
        put(
            frame,
            Paragraph::new(help)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            Rect::new(box_area.x, box_area.y + box_area.height + 1, box_area.width, 1),
        );
    }

    fn render_section_header(&self, frame: &mut Frame, x: u16, y: u16, title: &str) {
        let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        put(
            frame,
            Paragraph::new(format!("─ {} ─", title)).style(style),
            Rect::new(x, y, title.len() as u16 + 6, 1),
        );
    }

    fn label_style(&self, field: Field) -> Style {
        if self.selected == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    }

    fn value_style(&self, field: Field) -> Style {
        if self.selected == field {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        }
    }

    fn render_field(&self, frame: &mut Frame, x: u16, y: u16, label: &str, value: String, field: Field) {
        put(
            frame,
            Paragraph::new(format!("{:<10}", label)).style(self.label_style(field)),
            Rect::new(x, y, 10, 1),
        );
        put(
            frame,
            Paragraph::new(format!(" {:<24}", value)).style(self.value_style(field)),
            Rect::new(x + 10, y, 26, 1),
        );
    }

    fn render_cycle_field(&self, frame: &mut Frame, x: u16, y: u16, label: &str, value: &str, field: Field) {
        let arrow_style = if self.selected == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        put(
            frame,
            Paragraph::new(format!("{:<10}", label)).style(self.label_style(field)),
            Rect::new(x, y, 10, 1),
        );
        put(frame, Paragraph::new("< ").style(arrow_style), Rect::new(x + 10, y, 2, 1));
        put(
            frame,
            Paragraph::new(format!(" {:<20}", value)).style(self.value_style(field)),
            Rect::new(x + 12, y, 22, 1),
        );
        put(frame, Paragraph::new(" >").style(arrow_style), Rect::new(x + 34, y, 2, 1));
    }

    /// Masked key: one bullet per character, never the key itself
    fn format_api_key(&self) -> String {
        if self.editing {
            let count = self.input_buffer.chars().count().min(22);
            return format!("{}_", "•".repeat(count));
        }
        match self.session.credential.char_count() {
            0 => "(not set)".to_string(),
            n => "•".repeat(n.min(24)),
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let block = Block::default()
            .title(" Preview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.session.state() {
            SessionState::Previewing(asset) => draw_half_blocks(frame.buffer_mut(), inner, &asset.preview),
            SessionState::Generating => {
                let text = Paragraph::new("Generating...")
                    .style(Style::default().fg(Color::Yellow))
                    .alignment(Alignment::Center);
                put(frame, text, Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1));
            }
            _ => {
                let text = Paragraph::new("No image")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                put(frame, text, Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1));
            }
        }
    }

    fn render_buttons(&self, frame: &mut Frame, x: u16, y: u16, width: u16) {
        let buttons = [
            (Field::Generate, "[ Generate ]", Color::Green, true),
            (Field::Save, "[ Save PNG ]", Color::Cyan, self.has_asset()),
            (Field::View, "[ View ]", Color::Cyan, self.has_asset()),
            (Field::Quit, "[ Quit ]", Color::Red, true),
        ];
        let gap: u16 = 4;
        let total: u16 = buttons.iter().map(|(_, t, _, _)| t.len() as u16).sum::<u16>()
            + gap * (buttons.len() as u16 - 1);
        let mut bx = x + width.saturating_sub(total) / 2;

        for (field, text, color, enabled) in buttons {
            let color = if enabled { color } else { Color::DarkGray };
            let style = if self.selected == field {
                Style::default().fg(Color::Black).bg(color)
            } else {
                Style::default().fg(color)
            };
            put(frame, Paragraph::new(text).style(style), Rect::new(bx, y, text.len() as u16, 1));
            bx += text.len() as u16 + gap;
        }
    }
}

/// Render a widget clipped to the frame.
fn put<W: Widget>(frame: &mut Frame, widget: W, rect: Rect) {
    let rect = rect.intersection(frame.area());
    if !rect.is_empty() {
        frame.render_widget(widget, rect);
    }
}

/// Draw an image as `▀` cells: the glyph is the upper pixel, the background the lower.
fn draw_half_blocks(buf: &mut Buffer, area: Rect, img: &RgbaImage) {
    let mut side = area.width.min(area.height * 2);
    side -= side % 2;
    if side == 0 || img.width() == 0 || img.height() == 0 {
        return;
    }

    let x0 = area.x + (area.width - side) / 2;
    let y0 = area.y + (area.height - side / 2) / 2;
    let sample = |px: u16, py: u16| {
        let sx = px as u32 * img.width() / side as u32;
        let sy = py as u32 * img.height() / side as u32;
        let p = img.get_pixel(sx, sy);
        Color::Rgb(p[0], p[1], p[2])
    };

    for cy in 0..side / 2 {
        for cx in 0..side {
            let top = sample(cx, cy * 2);
            let bottom = sample(cx, cy * 2 + 1);
            buf[(x0 + cx, y0 + cy)].set_char('▀').set_fg(top).set_bg(bottom);
        }
    }
}

/// Run the interactive app until the user quits
pub fn run_app(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let generator = ImageGenClient::new(config.image_gen.clone())?;
    let fetcher = HttpFetcher::new(config.image_gen.timeout_secs)?;
    let mut app = App::new(config.output_dir.clone());

    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(model = %generator.config().model, "app started");
    let result = event_loop(&mut terminal, &mut app, &generator, &fetcher);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("app closed");

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    generator: &dyn ImageGenerator,
    fetcher: &dyn ImageFetcher,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let command = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
            Event::Paste(text) => {
                app.handle_paste(&text);
                Command::None
            }
            _ => Command::None,
        };

        match command {
            Command::None => {}
            Command::Quit => return Ok(()),
            Command::Generate => {
                app.begin_generation();
                terminal.draw(|f| app.render(f))?;
                app.generate(generator, fetcher);
            }
            Command::Save => app.save(),
            Command::View => {
                let shown = app
                    .session()
                    .asset()
                    .map(|asset| viewer::run_preview_window(&asset.caption(), &asset.preview));
                if let Some(Err(e)) = shown {
                    warn!("preview window failed: {}", e);
                    app.notice = Some(format!("Preview window unavailable: {}", e));
                }
                terminal.clear()?;
            }
        }
    }
}
