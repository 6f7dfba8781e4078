// SPDX-License-Identifier: GPL-3.0-only

//! Terminal scanner page
//!
//! Renders the application model with ratatui and turns key presses into
//! [`Message`]s. The camera preview uses Unicode half-block characters for
//! improved vertical resolution. Every loop iteration is one display refresh
//! and sends a `Tick` before drawing.

use crate::app::{AppModel, Dialog, Message, ResultView, Task, ThemeMode};
use crate::backends::camera::CameraFrame;
use crate::constants::ui;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Image types offered by the file picker
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Run the scanner page until the user quits
///
/// `initial_image` is scanned once before the first refresh.
pub fn run(
    app: &mut AppModel,
    initial_image: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if let Some(path) = initial_image {
        app.update(Message::ImageSelected(path));
    }

    // Run the app
    let result = run_app(&mut terminal, app);

    // Release the camera before handing the terminal back
    app.camera.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppModel,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Scanner page running");

    loop {
        app.update(Message::Tick(Instant::now()));

        terminal.draw(|f| render(f, app))?;

        // Handle input with timeout for frame updates
        if event::poll(ui::FRAME_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(message) = key_to_message(key, app.dialog.as_ref())
        {
            match app.update(message) {
                Task::None => {}
                Task::Quit => break,
                Task::PickImage => {
                    if let Some(path) = pick_image() {
                        app.update(Message::ImageSelected(path));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Ask the desktop for one image file
fn pick_image() -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .set_title("Choose an image with a QR code")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file();
    debug!(?path, "File picker closed");
    path
}

/// Map a key press to a message
///
/// While a dialog is open only its answers (and Ctrl+C) are recognised.
pub fn key_to_message(key: KeyEvent, dialog: Option<&Dialog>) -> Option<Message> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }

    if dialog.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(Message::DialogAccept),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => Some(Message::DialogDismiss),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('c') | KeyCode::Char(' ') => Some(Message::ToggleCamera),
        KeyCode::Char('o') => Some(Message::PickImage),
        KeyCode::Char('t') => Some(Message::ToggleTheme),
        KeyCode::Char('y') => Some(Message::CopyResult),
        KeyCode::Char('s') => Some(Message::SaveResult),
        KeyCode::Enter | KeyCode::Char('l') => Some(Message::FollowLink),
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
        _ => None,
    }
}

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: Color,
    foreground: Color,
    muted: Color,
    link: Color,
    bar: Color,
}

impl Palette {
    fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Rgb(0xf4, 0xf4, 0xf4),
                foreground: Color::Rgb(0x33, 0x33, 0x33),
                muted: Color::Rgb(0x88, 0x88, 0x88),
                link: Color::Rgb(0x00, 0x66, 0xcc),
                bar: Color::Rgb(0xdd, 0xdd, 0xdd),
            },
            ThemeMode::Dark => Self {
                background: Color::Rgb(0x12, 0x12, 0x12),
                foreground: Color::Rgb(0xe0, 0xe0, 0xe0),
                muted: Color::Rgb(0x80, 0x80, 0x80),
                link: Color::Rgb(0x4d, 0xa3, 0xff),
                bar: Color::Rgb(0x2a, 0x2a, 0x2a),
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }
}

fn render(f: &mut Frame, app: &AppModel) {
    let palette = Palette::for_mode(app.theme.mode());
    let area = f.area();
    f.render_widget(Block::default().style(palette.base()), area);

    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    f.render_widget(Header { app, palette }, header_area);

    if app.camera.is_video_visible() {
        let [preview_area, result_area] =
            Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(body_area);
        f.render_widget(
            FrameWidget {
                frame: app.camera.preview_frame(),
                mirror: app.config.mirror_preview,
            },
            preview_area,
        );
        f.render_widget(result_panel(&app.presenter.view(), palette), result_area);
    } else {
        f.render_widget(result_panel(&app.presenter.view(), palette), body_area);
    }

    let message = app
        .status
        .clone()
        .unwrap_or_else(|| build_status_message(app.presenter.result().is_some()));
    f.render_widget(
        StatusBar {
            message: &message,
            palette,
        },
        status_area,
    );

    if let Some(dialog) = &app.dialog {
        render_dialog(f, dialog, palette);
    }
}

fn build_status_message(has_result: bool) -> String {
    let mut msg = String::from("'c' camera | 'o' open image");
    if has_result {
        msg.push_str(" | 'y' copy | 's' save | 'enter' open link");
    }
    msg.push_str(" | 't' theme | 'q' quit");
    msg
}

/// Result area: a link, preformatted text, or a hint
fn result_panel(view: &ResultView, palette: Palette) -> Paragraph<'static> {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" Result ")
        .style(palette.base());

    match view {
        ResultView::Hidden => Paragraph::new(Line::styled(
            "Open the camera or choose an image to scan a QR code.",
            Style::default().fg(palette.muted),
        ))
        .block(block),
        ResultView::Link { text, href } => {
            let mut lines = vec![Line::from(Span::styled(
                text.clone(),
                Style::default()
                    .fg(palette.link)
                    .add_modifier(Modifier::UNDERLINED),
            ))];
            if href != text {
                lines.push(Line::styled(
                    format!("→ {}", href),
                    Style::default().fg(palette.muted),
                ));
            }
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false })
        }
        // Preformatted: keep line breaks and leading whitespace, no wrapping
        ResultView::Text(text) => {
            let lines: Vec<Line<'static>> = text.lines().map(|l| Line::raw(l.to_string())).collect();
            Paragraph::new(lines).block(block)
        }
    }
}

fn render_dialog(f: &mut Frame, dialog: &Dialog, palette: Palette) {
    let area = centered(f.area(), 60, 9);
    let hint = match dialog {
        Dialog::Alert { .. } => "[enter] OK",
        Dialog::Confirm { .. } => "[y] OK   [n] Cancel",
    };

    let mut lines: Vec<Line> = dialog.message().lines().map(Line::raw).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(hint, Style::default().fg(palette.muted)));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).style(palette.base())),
        area,
    );
}

/// Rectangle of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Title, theme toggle icon and camera toggle label
struct Header<'a> {
    app: &'a AppModel,
    palette: Palette,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.palette.foreground).bg(self.palette.bar);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }

        buf.set_string(
            area.x + 1,
            area.y,
            "QR Code Scanner",
            style.add_modifier(Modifier::BOLD),
        );

        let controls = format!(
            "[{}]  {} ",
            self.app.camera.toggle_label(),
            self.app.theme.icon()
        );
        let width = Line::raw(controls.as_str()).width() as u16;
        let x = area.x + area.width.saturating_sub(width);
        buf.set_string(x, area.y, &controls, style);
    }
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a CameraFrame>,
    mirror: bool,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.filter(|f| f.width > 0 && f.height > 0) else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                let column = if self.mirror {
                    display_width - 1 - tx
                } else {
                    tx
                };
                let src_x = (column as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (r, g, b) = frame.rgb_at(src_x, src_y_top);
                let top_color = Color::Rgb(r, g, b);
                let (r, g, b) = frame.rgb_at(src_x, src_y_bottom);
                let bottom_color = Color::Rgb(r, g, b);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
    palette: Palette,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.palette.foreground).bg(self.palette.bar);

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }

        // set_stringn clips at the area width on a char boundary
        buf.set_stringn(area.x, area.y, self.message, area.width as usize, style);
    }
}
