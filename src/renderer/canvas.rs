//! Canvas 2D renderer for the browser build
//!
//! Draws placeholder shapes for every entity plus the HUD. Sprite sheets are
//! out of scope; colors stand in for them.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{FrameStats, RenderError, Renderer};
use crate::sim::{BoostKind, EnemyKind, Facing, FrameSnapshot, GameOverReason, RunState};

const GRID_PX: f32 = 100.0;
const ARROW_RADIUS_PX: f64 = 60.0;

fn js_err(e: JsValue) -> RenderError {
    RenderError::Canvas(format!("{:?}", e))
}

fn boost_color(kind: BoostKind) -> &'static str {
    match kind {
        BoostKind::Coin => "#ffd54f",
        BoostKind::Clock => "#90caf9",
        BoostKind::Energy => "#66bb6a",
    }
}

fn dash_color(variant: Option<&str>) -> &'static str {
    match variant {
        Some("blue_car") => "#1e88e5",
        Some("green_car") => "#43a047",
        Some("yellow_car") => "#fdd835",
        _ => "#e53935",
    }
}

fn format_clock(ms: f32) -> String {
    let secs = (ms / 1000.0).ceil().max(0.0) as u32;
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or(RenderError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::NoContext)?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the CSS size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn circle(&self, center: Vec2, radius: f32, color: &str) -> Result<(), RenderError> {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(js_err)?;
        self.ctx.fill();
        Ok(())
    }

    fn text(&self, s: &str, x: f64, y: f64, color: &str, font: &str) -> Result<(), RenderError> {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(font);
        self.ctx.fill_text(s, x, y).map_err(js_err)
    }

    fn draw_grid(&self, offset: Vec2, view: Vec2) {
        self.ctx.set_stroke_style_str("#2e3b2e");
        self.ctx.set_line_width(1.0);
        self.ctx.begin_path();
        let start_x = (offset.x / GRID_PX).floor() * GRID_PX;
        let mut x = start_x;
        while x <= offset.x + view.x {
            self.ctx.move_to(x as f64, offset.y as f64);
            self.ctx.line_to(x as f64, (offset.y + view.y) as f64);
            x += GRID_PX;
        }
        let mut y = (offset.y / GRID_PX).floor() * GRID_PX;
        while y <= offset.y + view.y {
            self.ctx.move_to(offset.x as f64, y as f64);
            self.ctx.line_to((offset.x + view.x) as f64, y as f64);
            y += GRID_PX;
        }
        self.ctx.stroke();
    }

    /// World layer, already translated by the camera offset
    fn draw_world(&self, snap: &FrameSnapshot) -> Result<(), RenderError> {
        self.draw_grid(snap.camera.offset_px, snap.camera.view_px);

        if let Some(obj) = &snap.objective {
            let half = obj.size_px / 2.0;
            self.ctx.set_fill_style_str("#8d6e63");
            self.ctx.fill_rect(
                (obj.center_px.x - half) as f64,
                (obj.center_px.y - half) as f64,
                obj.size_px as f64,
                obj.size_px as f64,
            );
        }

        for b in &snap.boosts {
            // Two-frame pulse
            let r = b.size_px / 2.0 * if b.frame % 2 == 0 { 1.0 } else { 0.9 };
            self.circle(b.center_px, r, boost_color(b.kind))?;
        }

        for e in &snap.enemies {
            match e.kind {
                EnemyKind::Mob => self.circle(e.center_px, e.size_px / 2.0, "#7e57c2")?,
                EnemyKind::Dash => {
                    self.ctx.save();
                    self.ctx
                        .translate(e.center_px.x as f64, e.center_px.y as f64)
                        .map_err(js_err)?;
                    self.ctx.rotate(e.rotation as f64).map_err(js_err)?;
                    self.ctx.set_fill_style_str(dash_color(e.variant.as_deref()));
                    let (w, h) = (e.size_px as f64, e.size_px as f64 * 0.5);
                    self.ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
                    self.ctx.restore();
                }
            }
        }

        let p = &snap.player;
        let size = p.rect.size();
        let flashing = p.hit_flash_ms > 0.0;
        self.ctx
            .set_fill_style_str(if flashing { "#ffffff" } else { "#ff7043" });
        self.ctx.fill_rect(
            p.rect.min.x as f64,
            p.rect.min.y as f64,
            size.x as f64,
            size.y as f64,
        );
        // Facing marker
        let c = p.rect.center();
        let dir = match p.facing {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Side if p.facing_left => Vec2::new(-1.0, 0.0),
            Facing::Side => Vec2::new(1.0, 0.0),
        };
        self.circle(c + dir * size.x * 0.3, 4.0, "#263238")?;
        Ok(())
    }

    fn draw_arrow(&self, center: Vec2, bearing: f32, color: &str) -> Result<(), RenderError> {
        self.ctx.save();
        self.ctx
            .translate(center.x as f64, center.y as f64)
            .map_err(js_err)?;
        self.ctx.rotate(bearing as f64).map_err(js_err)?;
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(ARROW_RADIUS_PX + 14.0, 0.0);
        self.ctx.line_to(ARROW_RADIUS_PX, -7.0);
        self.ctx.line_to(ARROW_RADIUS_PX, 7.0);
        self.ctx.close_path();
        self.ctx.fill();
        self.ctx.restore();
        Ok(())
    }

    /// Screen-space layer
    fn draw_hud(&self, snap: &FrameSnapshot, stats: &FrameStats) -> Result<(), RenderError> {
        let p = &snap.player;
        let player_screen = p.rect.center() - snap.camera.offset_px;

        if let Some(b) = snap.objective_bearing {
            self.draw_arrow(player_screen, b, "#ffab40")?;
        }
        if let Some(b) = snap.nearest_boost_bearing {
            self.draw_arrow(player_screen, b, "#80deea")?;
        }

        for (i, t) in snap.float_texts.iter().enumerate() {
            self.ctx.set_global_alpha((1.0 - t.progress()) as f64);
            let rise = t.progress() * 30.0;
            self.text(
                &t.text,
                player_screen.x as f64,
                (player_screen.y - 40.0 - rise - i as f32 * 18.0) as f64,
                t.color,
                "bold 16px sans-serif",
            )?;
        }
        self.ctx.set_global_alpha(1.0);

        let font = "18px monospace";
        self.ctx.set_text_align("left");
        self.text(&format_clock(snap.timer_remaining_ms), 16.0, 28.0, "#ffffff", font)?;
        self.text(
            &format!("HP {:.0}/{:.0}", p.hp, p.max_hp),
            16.0,
            52.0,
            "#ef9a9a",
            font,
        )?;
        self.text(&format!("Coins {}", p.coins), 16.0, 76.0, "#ffd54f", font)?;
        self.text(
            &format!("Delivered {}", snap.deliveries),
            16.0,
            100.0,
            "#ffffff",
            font,
        )?;
        self.ctx.set_text_align("right");
        self.text(
            &format!("{:.0} fps", stats.fps),
            (snap.camera.view_px.x - 16.0) as f64,
            28.0,
            "#9e9e9e",
            font,
        )?;

        let view = snap.camera.view_px;
        let banner = match (snap.game_over, snap.run_state) {
            (Some(GameOverReason::TimeUp), _) => Some("TIME UP - press R"),
            (Some(GameOverReason::Defeated), _) => Some("DEFEATED - press R"),
            (None, RunState::Paused) => Some("PAUSED"),
            _ => None,
        };
        if let Some(banner) = banner {
            self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            self.ctx.fill_rect(0.0, 0.0, view.x as f64, view.y as f64);
            self.ctx.set_text_align("center");
            self.text(
                banner,
                (view.x / 2.0) as f64,
                (view.y / 2.0) as f64,
                "#ffffff",
                "bold 36px sans-serif",
            )?;
        }
        self.ctx.set_text_align("left");
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snap: &FrameSnapshot, stats: &FrameStats) -> Result<(), RenderError> {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.set_fill_style_str("#1b2a1b");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.save();
        let offset = snap.camera.offset_px;
        self.ctx
            .translate(-offset.x as f64, -offset.y as f64)
            .map_err(js_err)?;
        let world = self.draw_world(snap);
        self.ctx.restore();
        world?;

        self.draw_hud(snap, stats)
    }
}
