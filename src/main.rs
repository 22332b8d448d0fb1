use anyhow::Context;
use clap::Parser;
use eframe::egui;
use halfpie::render::{visible_labels, ARC_SEGMENTS};
use halfpie::{load_config, DrawPrimitive, HostArgs, LiftedCopy, MenuEngine, Rgba, Viewport};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Released copies kept on screen
const MAX_PLACED: usize = 64;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("halfpie=info")))
        .init();

    let args = HostArgs::parse();
    let config = load_config(&args.config).with_context(|| format!("loading {}", args.config.display()))?;
    let catalog = args.load_catalog().with_context(|| match &args.catalog {
        Some(path) => format!("loading menu from {}", path.display()),
        None => String::from("building the sample menu"),
    })?;
    info!(nodes = catalog.tree.node_count(), "menu loaded");

    let engine = MenuEngine::from_catalog(catalog, config, Viewport::new(1200.0, 800.0))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("halfpie"),
        ..Default::default()
    };

    eframe::run_native(
        "halfpie",
        options,
        Box::new(|cc| {
            configure_custom_style(&cc.egui_ctx);
            Box::new(HalfPieApp::new(engine))
        }),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

fn configure_custom_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgb(15, 23, 42);
    visuals.window_rounding = egui::Rounding::same(12.0);
    ctx.set_visuals(visuals);
}

struct HalfPieApp {
    engine: MenuEngine,
    /// Copies dropped by the user, oldest first
    placed: Vec<LiftedCopy>,
    last_size: egui::Vec2,
}

impl HalfPieApp {
    fn new(engine: MenuEngine) -> Self {
        Self {
            engine,
            placed: Vec::new(),
            last_size: egui::Vec2::ZERO,
        }
    }

    fn place(&mut self, released: Vec<LiftedCopy>) {
        for copy in released {
            info!(label = copy.node.label(), x = copy.position().x, y = copy.position().y, "loop placed");
            self.placed.push(copy);
        }
        if self.placed.len() > MAX_PLACED {
            let excess = self.placed.len() - MAX_PLACED;
            self.placed.drain(..excess);
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let (pressed, down, released, moved, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };

        let local = pos - rect.min;
        if pressed && rect.contains(pos) {
            self.engine.mouse_pressed(local.x, local.y);
        } else if down && moved {
            self.engine.mouse_dragged(local.x, local.y);
        }
        if released {
            let copies = self.engine.mouse_released(local.x, local.y);
            self.place(copies);
        }
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        let offset = rect.min.to_vec2();
        for copy in &self.placed {
            let prim = halfpie::render::node_primitive(&copy.node, copy.node.color().with_alpha(160));
            paint_primitive(painter, offset, &prim);
        }

        for prim in self.engine.draw() {
            paint_primitive(painter, offset, &prim);
        }

        for (position, label) in visible_labels(self.engine.tree()) {
            painter.text(
                to_pos(offset, position),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }
        for copy in self.engine.dragged_nodes() {
            painter.text(
                to_pos(offset, copy.position()),
                egui::Align2::CENTER_CENTER,
                copy.node.label(),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }
    }
}

fn to_pos(offset: egui::Vec2, point: glam::Vec2) -> egui::Pos2 {
    egui::pos2(point.x, point.y) + offset
}

fn to_color32(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn paint_primitive(painter: &egui::Painter, offset: egui::Vec2, prim: &DrawPrimitive) {
    let outline = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 30));
    match prim {
        DrawPrimitive::Circle { center, radius, color } => {
            painter.circle(to_pos(offset, *center), *radius, to_color32(*color), outline);
        }
        DrawPrimitive::Sector(sector) => {
            let points = sector.outline(ARC_SEGMENTS).into_iter().map(|p| to_pos(offset, p)).collect();
            painter.add(egui::Shape::convex_polygon(points, to_color32(sector.color), egui::Stroke::NONE));
        }
        DrawPrimitive::Polygon { points, color } => {
            let points = points.iter().map(|p| to_pos(offset, *p)).collect();
            painter.add(egui::Shape::convex_polygon(points, to_color32(*color), outline));
        }
    }
}

impl eframe::App for HalfPieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("halfpie");
                ui.separator();
                ui.label(format!("Placed: {}", self.placed.len()));
                ui.label(format!("Dragging: {}", self.engine.dragged_nodes().len()));
                if ui.button("Clear").clicked() {
                    self.placed.clear();
                    self.engine.clear_dragged();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            if rect.size() != self.last_size {
                self.last_size = rect.size();
                self.engine.resize(rect.width(), rect.height());
            }

            self.handle_input(ctx, rect);
            self.paint(ui.painter(), rect);

            if !self.engine.dragged_nodes().is_empty() {
                ctx.request_repaint();
            }
        });
    }
}
