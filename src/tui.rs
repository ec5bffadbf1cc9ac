// Cockpit LED TUI Application
// Interactive lighting control

use std::io::{self, stdout, Stdout};
use std::time::Duration;

use cockpit_keyboard::{
    FirmwareVersion, Hsv, KeyboardError, LedController, RgbEffect, SPEED_DEFAULT,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};

/// Step for hue/saturation/value/speed keys
const STEP: u8 = 16;

/// Application state
struct App {
    led: LedController,
    effect: RgbEffect,
    color: Hsv,
    speed: u8,
    skadis: bool,
    white: bool,
    firmware: Option<FirmwareVersion>,
    status_msg: String,
    show_help: bool,
}

impl App {
    fn new(led: LedController) -> Self {
        Self {
            led,
            effect: RgbEffect::Static,
            color: Hsv::DEFAULT,
            speed: SPEED_DEFAULT,
            skadis: false,
            white: false,
            firmware: None,
            status_msg: String::new(),
            show_help: false,
        }
    }

    /// First screen: sync with the keyboard, or say why there is none
    fn start(&mut self, connect_error: Option<KeyboardError>) {
        match connect_error {
            None if self.led.is_connected() => self.refresh(),
            Some(e) => self.status_msg = format!("No keyboard ({e}) - press r to reconnect"),
            None => self.status_msg = "Not connected - press r to reconnect".to_string(),
        }
    }

    /// Pull the keyboard's current settings so the UI starts in sync
    fn refresh(&mut self) {
        match self.led.get_state() {
            Ok(state) => {
                if let Some(effect) = state.effect() {
                    self.effect = effect;
                }
                self.color = state.color;
                self.speed = state.speed;
                self.skadis = state.skadis_mode;
                self.white = state.white_mode;
                self.status_msg = "State loaded".to_string();
            }
            Err(e) => self.status_msg = format!("Could not read state: {e}"),
        }
        self.firmware = self.led.get_version().ok();
    }

    fn reconnect(&mut self) {
        match self.led.connect() {
            Ok(info) => {
                self.refresh();
                self.status_msg = format!("Reconnected to {}", info.display_name());
            }
            Err(e) => self.status_msg = format!("Reconnect failed: {e}"),
        }
    }

    fn report(&mut self, what: String, result: Result<Vec<u8>, KeyboardError>) {
        self.status_msg = match result {
            Ok(_) => what,
            Err(e) if e.is_not_connected() => "Not connected - press r to reconnect".to_string(),
            Err(e) => format!("{what} failed: {e}"),
        };
    }

    fn send_color(&mut self) {
        let result = self.led.set_color(self.color);
        self.report(format!("Color {}", self.color), result);
    }

    fn send_effect(&mut self) {
        let result = self.led.set_rgb_effect(self.effect);
        self.report(format!("Effect {}", self.effect), result);
    }

    fn send_speed(&mut self) {
        let result = self.led.set_animation_speed(self.speed);
        self.report(format!("Speed {}", self.speed), result);
    }

    /// Handle one key press. Returns false when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return true;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('r') => self.reconnect(),
            KeyCode::Char('s') => {
                let enabled = !self.skadis;
                let result = self.led.set_skadis_mode(enabled);
                if result.is_ok() {
                    self.skadis = enabled;
                }
                self.report(format!("Skadis {}", if enabled { "on" } else { "off" }), result);
            }
            KeyCode::Char('w') => {
                let enabled = !self.white;
                let result = self.led.set_white_mode(enabled);
                if result.is_ok() {
                    self.white = enabled;
                }
                self.report(format!("White {}", if enabled { "on" } else { "off" }), result);
            }
            KeyCode::Char('e') | KeyCode::Right => {
                self.effect = self.effect.next();
                self.send_effect();
            }
            KeyCode::Char('E') | KeyCode::Left => {
                self.effect = self.effect.prev();
                self.send_effect();
            }
            KeyCode::Char('h') => {
                self.color.h = self.color.h.wrapping_add(STEP);
                self.send_color();
            }
            KeyCode::Char('H') => {
                self.color.h = self.color.h.wrapping_sub(STEP);
                self.send_color();
            }
            KeyCode::Char('c') => {
                self.color.s = self.color.s.wrapping_add(STEP);
                self.send_color();
            }
            KeyCode::Char('C') => {
                self.color.s = self.color.s.wrapping_sub(STEP);
                self.send_color();
            }
            KeyCode::Char('v') | KeyCode::Up => {
                self.color.v = self.color.v.wrapping_add(STEP);
                self.send_color();
            }
            KeyCode::Char('V') | KeyCode::Down => {
                self.color.v = self.color.v.wrapping_sub(STEP);
                self.send_color();
            }
            KeyCode::Char('a') => {
                self.speed = self.speed.wrapping_add(STEP);
                self.send_speed();
            }
            KeyCode::Char('A') => {
                self.speed = self.speed.wrapping_sub(STEP);
                self.send_speed();
            }
            KeyCode::Char(']') => {
                let result = self.led.set_direction(false);
                self.report("Stepped forward".to_string(), result);
            }
            KeyCode::Char('[') => {
                let result = self.led.set_direction(true);
                self.report("Stepped back".to_string(), result);
            }
            _ => {}
        }
        true
    }
}

/// Run the interactive UI until the user quits
///
/// `connect_error` is the startup connect failure, if any. The UI opens
/// either way; `r` retries the connection without leaving it.
pub fn run(led: LedController, connect_error: Option<KeyboardError>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = Terminal::new(CrosstermBackend::new(stdout())).and_then(|mut terminal| {
        let mut app = App::new(led);
        app.start(connect_error);
        event_loop(&mut terminal, &mut app)
    });

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Settings
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let connected = app.led.is_connected();
    let title_text = match (app.led.device_info(), app.firmware) {
        (Some(info), Some(fw)) => format!("{} {} - LED Control", info.display_name(), fw),
        (Some(info), None) => format!("{} - LED Control", info.display_name()),
        _ => "Keyboard LED Control".to_string(),
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_led_settings(f, app, chunks[1]);

    let status_color = if connected { Color::Green } else { Color::Red };
    let conn_status = if connected { "Connected" } else { "Disconnected" };
    let status = Paragraph::new(format!(
        " [{}] {} | ?:Help q:Quit",
        conn_status, app.status_msg
    ))
    .style(Style::default().fg(status_color))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_led_settings(f: &mut Frame, app: &App, area: Rect) {
    let bar = |val: u8| -> String {
        let bars = (val as usize * 16 / 255).min(16);
        format!("{:3} {}", val, "█".repeat(bars))
    };
    let on_off = |b: bool| if b { "< ON >" } else { "< OFF >" };
    let toggle_style = |b: bool| Style::default().fg(if b { Color::Green } else { Color::Gray });
    let (r, g, b) = app.color.to_rgb();
    let yellow = Style::default().fg(Color::Yellow);

    let items: Vec<ListItem> = vec![
        ListItem::new(Line::from(vec![
            Span::raw("Skadis:     "),
            Span::styled(on_off(app.skadis), toggle_style(app.skadis)),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("White:      "),
            Span::styled(on_off(app.white), toggle_style(app.white)),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Effect:     "),
            Span::styled(
                format!("< {} ({}) >", app.effect, app.effect.as_u8()),
                yellow,
            ),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Hue:        "),
            Span::styled(format!("< {} >", bar(app.color.h)), yellow),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Saturation: "),
            Span::styled(format!("< {} >", bar(app.color.s)), yellow),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Value:      "),
            Span::styled(format!("< {} >", bar(app.color.v)), yellow),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Speed:      "),
            Span::styled(format!("< {} >", bar(app.speed)), yellow),
        ])),
        ListItem::new(Line::from(vec![
            Span::raw("Preview:    "),
            Span::styled(
                format!("████████ #{r:02X}{g:02X}{b:02X}"),
                Style::default().fg(Color::Rgb(r, g, b)),
            ),
        ])),
    ];

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Lighting [s w e h c v a]"),
    );
    f.render_widget(list, area);
}

fn render_help_popup(f: &mut Frame, area: Rect) {
    let popup_width = (area.width as f32 * 0.6) as u16;
    let popup_height = 16.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{k:>10}  "), Style::default().fg(Color::Yellow)),
            Span::raw(desc),
        ])
    };
    let lines = vec![
        key("s", "Toggle Skadis mode"),
        key("w", "Toggle white mode"),
        key("e / →", "Next effect"),
        key("E / ←", "Previous effect"),
        key("h / H", "Hue up / down"),
        key("c / C", "Saturation up / down"),
        key("v / ↑ ↓", "Value up / down"),
        key("a / A", "Animation speed up / down"),
        key("] / [", "Step animation forward / back"),
        key("r", "Reconnect"),
        key("q / Esc", "Quit"),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help [?/Esc to close]"),
        ),
        popup,
    );
}
