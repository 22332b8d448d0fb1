use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use halfpie::activation::active_path;
use halfpie::render::{visible_labels, ARC_SEGMENTS};
use halfpie::{load_config, DrawPrimitive, HostArgs, LiftedCopy, MenuEngine, Rgba, Viewport};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect as UiRect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Virtual pixels per terminal cell
const CELL_WIDTH: f32 = 8.0;
const CELL_HEIGHT: f32 = 16.0;

const LOG_FILE: &str = "halfpie-tui.log";
const MAX_PLACED: usize = 16;

struct App {
    engine: MenuEngine,
    placed: Vec<LiftedCopy>,
    status: String,
    canvas_area: Option<UiRect>,
    should_quit: bool,
}

impl App {
    fn new(engine: MenuEngine) -> Self {
        Self {
            engine,
            placed: Vec::new(),
            status: String::from("Click the half-pie to open a branch"),
            canvas_area: None,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => {
                self.placed.clear();
                self.engine.clear_dragged();
                self.status = String::from("Cleared");
            }
            KeyCode::Char('r') => {
                self.engine.reset();
                self.status = String::from("Menu reset");
            }
            _ => {}
        }
    }

    /// Centre of the cell under the mouse, in menu pixels.
    fn to_menu_point(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let area = self.canvas_area?;
        if !point_in_rect(area, column, row) {
            return None;
        }
        let x = (column - area.x) as f32 * CELL_WIDTH + CELL_WIDTH * 0.5;
        let y = (row - area.y) as f32 * CELL_HEIGHT + CELL_HEIGHT * 0.5;
        Some((x, y))
    }

    fn on_mouse(&mut self, event: MouseEvent) {
        let Some((x, y)) = self.to_menu_point(event.column, event.row) else {
            return;
        };

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.engine.mouse_pressed(x, y) && self.engine.dragged_nodes().is_empty() {
                    self.status = String::from("Outside the menu");
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.engine.mouse_dragged(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                for copy in self.engine.mouse_released(x, y) {
                    info!(label = copy.node.label(), x, y, "loop placed");
                    self.status = format!("Placed {}", copy.node.label());
                    self.placed.push(copy);
                }
                if self.placed.len() > MAX_PLACED {
                    let excess = self.placed.len() - MAX_PLACED;
                    self.placed.drain(..excess);
                }
            }
            _ => {}
        }
    }

    fn sync_viewport(&mut self, area: UiRect) {
        let width = area.width as f32 * CELL_WIDTH;
        let height = area.height as f32 * CELL_HEIGHT;
        if self.engine.viewport() != Viewport::new(width, height) {
            self.engine.resize(width, height);
        }
    }
}

fn point_in_rect(rect: UiRect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Terminal colours have no alpha: blend toward the black background.
fn to_color(color: Rgba) -> Color {
    let alpha = color.a.max(96) as u16;
    let blend = |c: u8| ((c as u16 * alpha) / 255) as u8;
    Color::Rgb(blend(color.r), blend(color.g), blend(color.b))
}

fn draw_polyline(ctx: &mut Context, points: &[glam::Vec2], height: f64, color: Color) {
    if points.len() < 2 {
        return;
    }
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        ctx.draw(&CanvasLine {
            x1: p.x as f64,
            y1: height - p.y as f64,
            x2: q.x as f64,
            y2: height - q.y as f64,
            color,
        });
    }
}

fn draw_primitive(ctx: &mut Context, prim: &DrawPrimitive, height: f64) {
    match prim {
        DrawPrimitive::Circle { center, radius, color } => ctx.draw(&Circle {
            x: center.x as f64,
            y: height - center.y as f64,
            radius: *radius as f64,
            color: to_color(*color),
        }),
        DrawPrimitive::Sector(sector) => {
            draw_polyline(ctx, &sector.outline(ARC_SEGMENTS), height, to_color(sector.color));
        }
        DrawPrimitive::Polygon { points, color } => draw_polyline(ctx, points, height, to_color(*color)),
    }
}

fn draw_ui(frame: &mut Frame, app: &mut App) {
    let root = frame.area();
    let split = Layout::horizontal([Constraint::Length(34), Constraint::Min(30)]).split(root);
    let left = split[0];
    let right = split[1];

    let left_rows = Layout::vertical([Constraint::Length(3), Constraint::Min(6), Constraint::Length(5)]).split(left);

    frame.render_widget(
        Paragraph::new(app.status.as_str()).block(Block::default().title(" Status ").borders(Borders::ALL)),
        left_rows[0],
    );

    let info_lines = {
        let tree = app.engine.tree();
        let path: Vec<&str> = active_path(tree)
            .into_iter()
            .filter_map(|id| tree.node(id).map(|n| n.label()))
            .collect();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Open: ", Style::default().fg(Color::Gray)),
                Span::raw(path.join(" > ")),
            ]),
            Line::from(vec![
                Span::styled("Dragging: ", Style::default().fg(Color::Gray)),
                Span::raw(app.engine.dragged_nodes().len().to_string()),
            ]),
            Line::from(Span::styled("Placed:", Style::default().fg(Color::Gray))),
        ];
        for copy in app.placed.iter().rev() {
            let beats = copy.node.payload().map(|p| p.length.get()).unwrap_or(0);
            lines.push(Line::from(format!("  {} ({} beats)", copy.node.label(), beats)));
        }
        lines
    };
    frame.render_widget(
        Paragraph::new(info_lines).block(Block::default().title(" Menu ").borders(Borders::ALL)),
        left_rows[1],
    );

    let help_lines = vec![
        Line::from("Click: open branch / lift loop"),
        Line::from("Drag + release: place loop"),
        Line::from("c: clear   r: reset   q: quit"),
    ];
    frame.render_widget(
        Paragraph::new(help_lines).block(Block::default().title(" Controls ").borders(Borders::ALL)),
        left_rows[2],
    );

    let canvas_block = Block::default().title(" halfpie ").borders(Borders::ALL);
    let canvas_inner = canvas_block.inner(right);
    app.canvas_area = Some(canvas_inner);
    app.sync_viewport(canvas_inner);

    let viewport = app.engine.viewport();
    let height = viewport.height as f64;
    let primitives = app.engine.draw();
    let labels: Vec<(glam::Vec2, String)> = visible_labels(app.engine.tree())
        .into_iter()
        .map(|(p, l)| (p, l.to_string()))
        .collect();
    let placed = &app.placed;

    let canvas = Canvas::default()
        .block(canvas_block)
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width as f64])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for copy in placed {
                let prim = halfpie::render::node_primitive(&copy.node, copy.node.color());
                draw_primitive(ctx, &prim, height);
            }
            for prim in &primitives {
                draw_primitive(ctx, prim, height);
            }
            ctx.layer();
            for (position, label) in &labels {
                ctx.print(
                    position.x as f64,
                    height - position.y as f64,
                    Line::styled(label.clone(), Style::default().fg(Color::White)),
                );
            }
        });
    frame.render_widget(canvas, right);
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> std::io::Result<()> {
    loop {
        terminal.draw(|frame| {
            draw_ui(frame, app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = HostArgs::parse();

    // The terminal is taken over, so logs go to a file
    let log_file = File::create(LOG_FILE).with_context(|| format!("creating {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("halfpie=info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = load_config(&args.config).with_context(|| format!("loading {}", args.config.display()))?;
    let catalog = args.load_catalog().with_context(|| match &args.catalog {
        Some(path) => format!("loading menu from {}", path.display()),
        None => String::from("building the sample menu"),
    })?;
    let engine = MenuEngine::from_catalog(catalog, config, Viewport::default())?;
    let mut app = App::new(engine);

    enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    app_result.context("terminal loop failed")
}
