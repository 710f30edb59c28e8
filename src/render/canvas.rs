//! Canvas 2D presenter
//!
//! Draws a [`FramePlan`] onto a 2D canvas at the fixed playfield resolution;
//! CSS scales the element to the window. Sprites are drawn procedurally.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{FramePlan, Ghost, PlayerSprite, RazorSprite, Scene, SpriteSheet};
use crate::consts::*;
use crate::effects::{Cloud, Effects, Mote, Particle, ParticleKind};

const RED_CANDLE: &str = "#EF5350";
const GREEN_CANDLE: &str = "#26A69A";
const BLADE_STEEL: &str = "#CFD8DC";
const BLADE_HEIGHT: f64 = 80.0;
const BLADE_TEETH: usize = 6;
/// Candle bars are narrower than the blade
const BAR_INSET: f64 = 10.0;

const BURST_PALETTE: [&str; 6] = [
    "#FF4444", "#EF5350", "#FF6B6B", "#E53935", "#D32F2F", "#C62828",
];

const FONT: &str = "\"Creepster\", cursive";

pub struct CanvasPresenter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPresenter {
    /// Bind to the `<canvas>` with the given id and size it to the playfield
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into()?;
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        log::info!("Canvas presenter ready ({}x{})", GAME_WIDTH, GAME_HEIGHT);
        Ok(Self { ctx })
    }

    /// Draw one frame. `top_scores` feeds the start screen leaderboard.
    pub fn draw(
        &self,
        plan: &FramePlan,
        effects: &Effects,
        top_scores: &[u32],
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);
        ctx.clear_rect(0.0, 0.0, w, h);

        ctx.save();
        ctx.translate(plan.camera.shake.x as f64, plan.camera.shake.y as f64)?;

        match plan.scene {
            Scene::StartScreen => self.draw_start_screen(plan, effects, top_scores)?,
            Scene::Gameplay => {
                ctx.save();
                if plan.camera.zoom != 1.0 {
                    let (fx, fy) = (plan.camera.focus.x as f64, plan.camera.focus.y as f64);
                    let zoom = plan.camera.zoom as f64;
                    ctx.translate(fx, fy)?;
                    ctx.scale(zoom, zoom)?;
                    ctx.translate(-fx, -fy)?;
                }

                ctx.set_fill_style_str("#FFFFFF");
                ctx.fill_rect(0.0, 0.0, w, h);
                for cloud in effects.ambient.clouds() {
                    self.draw_cloud(cloud)?;
                }
                if plan.draw_motes {
                    for mote in effects.ambient.motes() {
                        self.draw_mote(mote)?;
                    }
                }
                for razor in &plan.razors {
                    self.draw_razor(razor);
                }
                for ghost in &plan.trail {
                    self.draw_ghost(ghost)?;
                }
                self.draw_player(&plan.player)?;
                if let Some(score) = plan.score {
                    self.draw_score(score)?;
                }
                if plan.draw_particles {
                    for p in effects.score_particles.particles() {
                        self.draw_particle(p)?;
                    }
                }
                ctx.restore();

                self.draw_grading(plan.overlays.desaturation, plan.overlays.vignette)?;
                if plan.overlays.transition > 0.0 {
                    let cover = format!("rgba(45, 26, 74, {})", plan.overlays.transition);
                    ctx.set_fill_style_str(&cover);
                    ctx.fill_rect(0.0, 0.0, w, h);
                }
            }
        }
        ctx.restore();

        // Outside the shake transform
        if plan.overlays.flash > 0.0 {
            ctx.set_fill_style_str(&format!("rgba(255, 50, 50, {})", plan.overlays.flash));
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        if plan.overlays.flash_burst > 0.0 {
            ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", plan.overlays.flash_burst));
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        Ok(())
    }

    fn draw_start_screen(
        &self,
        plan: &FramePlan,
        effects: &Effects,
        top_scores: &[u32],
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);
        let t = plan.time_ms;

        let bg = ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, h)?;
        bg.add_color_stop(0.0, "#2d1a4a")?;
        bg.add_color_stop(0.5, "#1a0d2a")?;
        bg.add_color_stop(1.0, "#0f0812")?;
        ctx.set_fill_style_canvas_gradient(&bg);
        ctx.fill_rect(0.0, 0.0, w, h);

        if plan.draw_motes {
            for mote in effects.ambient.motes() {
                self.draw_mote(mote)?;
            }
        }

        ctx.save();
        ctx.set_font(&format!("bold 108px {FONT}"));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_shadow_color("rgba(157, 78, 221, 0.6)");
        ctx.set_shadow_blur(20.0);
        ctx.set_fill_style_str("#e0aaff");
        ctx.fill_text("FLAP EMONAD", w / 2.0, 170.0)?;
        ctx.restore();

        let bob = (t / 300.0).sin() as f32 * 8.0;
        let mut flapping = plan.player;
        flapping.center.y += bob;
        self.draw_player(&flapping)?;

        ctx.save();
        ctx.set_font(&format!("52px {FONT}"));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_global_alpha(0.5 + 0.5 * (t / 600.0).sin());
        ctx.set_fill_style_str("#e0aaff");
        ctx.set_shadow_color("rgba(157, 78, 221, 0.5)");
        ctx.set_shadow_blur(10.0);
        ctx.fill_text("TAP TO START", w / 2.0, h / 2.0)?;
        ctx.restore();

        let wobble = ((t / 150.0).sin() * 5.0).to_radians() as f32;
        self.draw_player(&PlayerSprite {
            center: glam::Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT * 0.65),
            rotation: wobble,
            sheet: SpriteSheet::Death,
            frame: plan.player.frame,
        })?;

        if !top_scores.is_empty() {
            let y = h * 0.78;
            ctx.save();
            ctx.set_text_align("center");
            ctx.set_font(&format!("bold 32px {FONT}"));
            ctx.set_fill_style_str("#FFD700");
            ctx.set_shadow_color("rgba(255, 215, 0, 0.5)");
            ctx.set_shadow_blur(10.0);
            ctx.fill_text("TOP SCORES", w / 2.0, y)?;
            ctx.set_font(&format!("28px {FONT}"));
            ctx.set_shadow_blur(5.0);
            for (i, (score, color)) in top_scores
                .iter()
                .zip(["#FFD700", "#C0C0C0", "#CD7F32"])
                .enumerate()
            {
                ctx.set_fill_style_str(color);
                let row_y = y + 40.0 + i as f64 * 35.0;
                ctx.fill_text(&format!("{}. {}", i + 1, score), w / 2.0, row_y)?;
            }
            ctx.restore();
        }
        Ok(())
    }

    fn draw_cloud(&self, cloud: &Cloud) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let cx = (cloud.pos.x + cloud.size.x / 2.0) as f64;
        let cy = (cloud.pos.y + cloud.size.y / 2.0) as f64;
        let (rx, ry) = (cloud.size.x as f64 / 2.0, cloud.size.y as f64 / 2.0);

        let gradient = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, rx)?;
        gradient.add_color_stop(0.0, "rgba(30, 20, 50, 0.8)")?;
        gradient.add_color_stop(0.5, "rgba(30, 20, 50, 0.4)")?;
        gradient.add_color_stop(1.0, "rgba(30, 20, 50, 0)")?;

        ctx.save();
        ctx.set_global_alpha(cloud.opacity as f64);
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.begin_path();
        ctx.ellipse(cx, cy, rx, ry, 0.0, 0.0, TAU)?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    fn draw_mote(&self, mote: &Mote) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let color = if mote.light { "#c77dff" } else { "#9d4edd" };
        ctx.save();
        ctx.set_global_alpha(mote.opacity as f64);
        ctx.set_fill_style_str(color);
        ctx.set_shadow_color(color);
        ctx.set_shadow_blur(10.0);
        ctx.begin_path();
        ctx.arc(mote.pos.x as f64, mote.pos.y as f64, mote.size as f64, 0.0, TAU)?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    fn draw_razor(&self, razor: &RazorSprite) {
        let ctx = &self.ctx;
        let x = razor.x as f64;
        let width = RAZOR_WIDTH as f64;
        let top = razor.gap_top as f64;
        let bottom = razor.gap_bottom as f64;

        let top_bar = top - BLADE_HEIGHT;
        if top_bar > 0.0 {
            ctx.set_fill_style_str(RED_CANDLE);
            ctx.fill_rect(x + BAR_INSET, 0.0, width - BAR_INSET * 2.0, top_bar);
        }
        self.draw_blade(x, top_bar, top);

        let bottom_bar = bottom + BLADE_HEIGHT;
        self.draw_blade(x, bottom_bar, bottom);
        if bottom_bar < GAME_HEIGHT as f64 {
            ctx.set_fill_style_str(GREEN_CANDLE);
            ctx.fill_rect(
                x + BAR_INSET,
                bottom_bar,
                width - BAR_INSET * 2.0,
                GAME_HEIGHT as f64 - bottom_bar,
            );
        }
    }

    /// Serrated blade from its spine at `base_y` to its teeth at `edge_y`
    fn draw_blade(&self, x: f64, base_y: f64, edge_y: f64) {
        let ctx = &self.ctx;
        let width = RAZOR_WIDTH as f64;
        let tooth = width / BLADE_TEETH as f64;
        let direction = (edge_y - base_y).signum();
        let shoulder = edge_y - direction * BLADE_HEIGHT * 0.3;

        ctx.set_fill_style_str(BLADE_STEEL);
        ctx.begin_path();
        ctx.move_to(x, base_y);
        ctx.line_to(x + width, base_y);
        ctx.line_to(x + width, shoulder);
        for i in (0..BLADE_TEETH).rev() {
            let left = x + i as f64 * tooth;
            ctx.line_to(left + tooth / 2.0, edge_y);
            ctx.line_to(left, shoulder);
        }
        ctx.close_path();
        ctx.fill();
    }

    fn draw_ghost(&self, ghost: &Ghost) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let r = ghost.radius as f64;
        ctx.save();
        ctx.set_global_alpha(ghost.alpha as f64);
        ctx.translate(ghost.center.x as f64, ghost.center.y as f64)?;
        ctx.rotate(ghost.rotation as f64)?;
        ctx.set_fill_style_str("rgba(157, 78, 221, 0.5)");
        ctx.begin_path();
        ctx.ellipse(0.0, 0.0, r, r * 0.7, 0.0, 0.0, TAU)?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    fn draw_player(&self, sprite: &PlayerSprite) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let body = PLAYER_WIDTH as f64 * 0.32;
        let (fill, wing) = match sprite.sheet {
            SpriteSheet::Flap => ("#9d4edd", "#e0aaff"),
            SpriteSheet::Death => ("#6c5b7b", "#a99bb5"),
        };
        // Frames 0..3 sweep the wings up, level, down
        let wing_lift = (sprite.frame as f64 - 1.0) * body * 0.35;

        ctx.save();
        ctx.translate(sprite.center.x as f64, sprite.center.y as f64)?;
        ctx.rotate(sprite.rotation as f64)?;

        ctx.set_fill_style_str(wing);
        for side in [-1.0, 1.0] {
            ctx.begin_path();
            let (rx, ry) = (body * 0.6, body * 0.25);
            ctx.ellipse(side * body * 0.9, wing_lift, rx, ry, side * 0.4, 0.0, TAU)?;
            ctx.fill();
        }

        ctx.set_fill_style_str(fill);
        ctx.set_shadow_color("rgba(157, 78, 221, 0.5)");
        ctx.set_shadow_blur(25.0);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, body, 0.0, TAU)?;
        ctx.fill();
        ctx.set_shadow_blur(0.0);

        let eye_y = -body * 0.2;
        let eye_r = body * 0.14;
        match sprite.sheet {
            SpriteSheet::Flap => {
                ctx.set_fill_style_str("#FFFFFF");
                for side in [-1.0, 1.0] {
                    ctx.begin_path();
                    ctx.arc(side * body * 0.35, eye_y, eye_r, 0.0, TAU)?;
                    ctx.fill();
                }
            }
            SpriteSheet::Death => {
                ctx.set_stroke_style_str("#FFFFFF");
                ctx.set_line_width(6.0);
                for side in [-1.0, 1.0] {
                    let ex = side * body * 0.35;
                    ctx.begin_path();
                    ctx.move_to(ex - eye_r, eye_y - eye_r);
                    ctx.line_to(ex + eye_r, eye_y + eye_r);
                    ctx.move_to(ex + eye_r, eye_y - eye_r);
                    ctx.line_to(ex - eye_r, eye_y + eye_r);
                    ctx.stroke();
                }
            }
        }
        ctx.restore();
        Ok(())
    }

    fn draw_score(&self, score: u32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let text = score.to_string();
        let (x, y) = (GAME_WIDTH as f64 / 2.0, 75.0);

        ctx.save();
        ctx.set_font(&format!("bold 130px {FONT}"));
        ctx.set_text_align("center");
        ctx.set_text_baseline("top");
        ctx.set_shadow_color("rgba(157, 78, 221, 0.8)");
        ctx.set_shadow_blur(30.0);
        ctx.set_fill_style_str("rgba(200, 150, 255, 0.5)");
        ctx.fill_text(&text, x, y)?;
        ctx.set_shadow_color("rgba(255, 255, 255, 0.9)");
        ctx.set_shadow_blur(15.0);
        ctx.set_fill_style_str("#FFFFFF");
        ctx.fill_text(&text, x, y)?;
        ctx.restore();
        Ok(())
    }

    fn draw_particle(&self, p: &Particle) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let color = BURST_PALETTE[p.shade as usize % BURST_PALETTE.len()];
        let (x, y, size) = (p.pos.x as f64, p.pos.y as f64, p.size as f64);

        ctx.save();
        ctx.set_global_alpha(p.alpha() as f64);
        ctx.set_shadow_color(color);
        match p.kind {
            ParticleKind::Ring => {
                ctx.set_fill_style_str(color);
                ctx.set_shadow_blur(15.0);
                ctx.begin_path();
                ctx.arc(x, y, size, 0.0, TAU)?;
                ctx.fill();
            }
            ParticleKind::Coin => {
                let rotation = p.rotation as f64;
                ctx.translate(x, y)?;
                ctx.rotate(rotation)?;
                ctx.scale(1.0, 0.3 + (rotation * 2.0).cos().abs() * 0.7)?;
                ctx.set_fill_style_str(color);
                ctx.set_shadow_blur(20.0);
                ctx.begin_path();
                ctx.arc(0.0, 0.0, size, 0.0, TAU)?;
                ctx.fill();
                ctx.set_shadow_blur(0.0);
                ctx.set_fill_style_str("#FF8A80");
                ctx.begin_path();
                ctx.arc(-size * 0.3, -size * 0.3, size * 0.3, 0.0, TAU)?;
                ctx.fill();
            }
            ParticleKind::Sparkle => {
                let r = size * (0.7 + 0.3 * (p.twinkle as f64).sin());
                ctx.translate(x, y)?;
                ctx.set_fill_style_str(color);
                ctx.set_shadow_blur(10.0);
                ctx.begin_path();
                for i in 0..4 {
                    let angle = i as f64 / 4.0 * TAU - PI / 4.0;
                    let inner = angle + PI / 4.0;
                    let (ox, oy) = (angle.cos() * r, angle.sin() * r);
                    if i == 0 {
                        ctx.move_to(ox, oy);
                    } else {
                        ctx.line_to(ox, oy);
                    }
                    ctx.line_to(inner.cos() * r * 0.3, inner.sin() * r * 0.3);
                }
                ctx.close_path();
                ctx.fill();
            }
            ParticleKind::Orb => {
                let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, size)?;
                gradient.add_color_stop(0.0, "#ffffff")?;
                gradient.add_color_stop(0.3, color)?;
                gradient.add_color_stop(1.0, "transparent")?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.set_shadow_blur(20.0);
                ctx.begin_path();
                ctx.arc(x, y, size, 0.0, TAU)?;
                ctx.fill();
            }
            ParticleKind::Confetti => {
                ctx.translate(x, y)?;
                ctx.rotate(p.rotation as f64)?;
                ctx.set_fill_style_str(color);
                ctx.set_shadow_blur(5.0);
                ctx.fill_rect(-size / 2.0, -size / 4.0, size, size / 2.0);
            }
            ParticleKind::Ember => {
                let r = size * 2.5;
                let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
                gradient.add_color_stop(0.0, "#ffffff")?;
                gradient.add_color_stop(0.2, color)?;
                gradient.add_color_stop(1.0, "transparent")?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.set_shadow_blur(25.0);
                ctx.begin_path();
                ctx.arc(x, y, r, 0.0, TAU)?;
                ctx.fill();
            }
        }
        ctx.restore();
        Ok(())
    }

    /// Death color grading: desaturate, then darken the edges
    fn draw_grading(&self, desaturation: f32, vignette: f32) -> Result<(), JsValue> {
        if desaturation <= 0.0 {
            return Ok(());
        }
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);

        ctx.save();
        ctx.set_global_composite_operation("saturation")?;
        ctx.set_fill_style_str(&format!("rgba(128, 128, 128, {desaturation})"));
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.restore();

        let (cx, cy) = (w / 2.0, h / 2.0);
        let gradient = ctx.create_radial_gradient(cx, cy, h * 0.3, cx, cy, h * 0.8)?;
        gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)")?;
        gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {vignette})"))?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }
}
