//! Canvas 2D painter
//!
//! Draws one frame from a shared borrow of the game state. Nothing here
//! mutates the simulation.

use std::f64::consts::TAU;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::pose::ArcherPose;
use super::shapes::{
    ARROW_FLETCHING, ARROW_SHAFT, BOW_HALF_LENGTH, BOW_LIMB_CONTROL, RoundRect, Segment,
    bow_string_control, limb, target_rings,
};
use crate::consts::GROUND_HEIGHT;
use crate::sim::{Arrow, FloatingMessage, GamePhase, GameState, Target};

/// Scenic backdrop
pub const BACKGROUND_URL: &str =
    "https://images.unsplash.com/photo-1503264116251-35a269479413?auto=format&fit=crop&w=1920&q=80";

const SKIN: &str = "#f1c27d";
const CLOTH: &str = "#3c3130";
const TROUSERS: &str = "#2e2624";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    background: Option<HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        let background = match HtmlImageElement::new() {
            Ok(img) => {
                img.set_cross_origin(Some("anonymous"));
                img.set_src(BACKGROUND_URL);
                Some(img)
            }
            Err(e) => {
                log::warn!("Background image unavailable: {:?}", e);
                None
            }
        };
        Self { ctx, background }
    }

    /// Paint a full frame
    pub fn render(&self, state: &GameState) -> Result<(), JsValue> {
        let (w, h) = (state.width as f64, state.height as f64);

        self.draw_background(w, h)?;
        for target in &state.targets {
            self.draw_target(target)?;
        }
        for arrow in &state.arrows {
            self.draw_arrow(arrow)?;
        }
        self.draw_messages(&state.messages)?;

        // Archer last (foreground)
        let pose = ArcherPose::compute(state.archer_base(), state.pointer, state.draw.power);
        self.draw_archer(&pose, state.draw.power)?;

        match state.phase {
            GamePhase::Paused => self.draw_banner("Paused", w, h)?,
            GamePhase::Finished if state.targets.is_empty() => {
                self.draw_banner("No more targets", w, h)?
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_background(&self, w: f64, h: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match &self.background {
            Some(img) if img.complete() && img.natural_width() > 0 => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)?;
            }
            _ => {
                ctx.set_fill_style_str("#cdeffd");
                ctx.fill_rect(0.0, 0.0, w, h);
            }
        }

        // Keep the foreground readable
        ctx.set_fill_style_str("rgba(18,28,34,0.08)");
        ctx.fill_rect(0.0, 0.0, w, h);

        let ground = GROUND_HEIGHT as f64;
        ctx.set_fill_style_str("#8fbf88");
        ctx.fill_rect(0.0, h - ground, w, ground);
        Ok(())
    }

    fn draw_target(&self, target: &Target) -> Result<(), JsValue> {
        let pos = target.pos();
        for ring in target_rings(target.ring_radius()) {
            self.ctx.begin_path();
            self.ctx.set_fill_style_str(ring.color);
            self.ctx
                .arc(pos.x as f64, pos.y as f64, ring.radius as f64, 0.0, TAU)?;
            self.ctx.fill();
        }
        Ok(())
    }

    fn draw_arrow(&self, arrow: &Arrow) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(arrow.pos.x as f64, arrow.pos.y as f64)?;
        ctx.rotate(arrow.angle as f64)?;

        let (x, y, w, h) = ARROW_SHAFT;
        ctx.set_fill_style_str("#2b2b2b");
        ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);

        ctx.set_fill_style_str("#d1e8ff");
        ctx.begin_path();
        let [a, b, c] = ARROW_FLETCHING;
        ctx.move_to(a.x as f64, a.y as f64);
        ctx.line_to(b.x as f64, b.y as f64);
        ctx.line_to(c.x as f64, c.y as f64);
        ctx.close_path();
        ctx.fill();

        ctx.restore();
        Ok(())
    }

    fn draw_messages(&self, messages: &[FloatingMessage]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_font("bold 28px Inter, sans-serif");
        for msg in messages {
            ctx.set_global_alpha(msg.alpha.max(0.0) as f64);
            ctx.set_fill_style_str("#fff");
            ctx.set_stroke_style_str("rgba(0,0,0,0.5)");
            ctx.set_line_width(4.0);
            ctx.stroke_text(msg.text, msg.pos.x as f64, msg.pos.y as f64)?;
            ctx.fill_text(msg.text, msg.pos.x as f64, msg.pos.y as f64)?;
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_archer(&self, pose: &ArcherPose, power: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (bx, by) = (pose.base.x as f64, pose.base.y as f64);

        // Torso and hips
        ctx.set_fill_style_str(CLOTH);
        self.fill_round_rect(&RoundRect::new(pose.base.x - 22.0, pose.base.y - 120.0, 44.0, 80.0, 10.0))?;
        ctx.set_fill_style_str(TROUSERS);
        ctx.fill_rect(bx - 22.0, by - 40.0, 44.0, 16.0);

        // Head
        ctx.begin_path();
        ctx.set_fill_style_str(SKIN);
        ctx.arc(pose.head.x as f64, pose.head.y as f64, 20.0, 0.0, TAU)?;
        ctx.fill();

        for (hip, foot) in pose.legs {
            self.draw_limb(&limb(hip, foot), 10.0, TROUSERS)?;
        }

        self.draw_limb(&limb(pose.bow_shoulder, pose.bow_elbow), 12.0, SKIN)?;
        self.draw_limb(&limb(pose.draw_shoulder, pose.draw_elbow), 12.0, SKIN)?;

        self.draw_bow(pose, power)?;

        // Hands
        ctx.set_fill_style_str(SKIN);
        for hand in [pose.bow_hand, pose.draw_hand] {
            ctx.begin_path();
            ctx.arc(hand.x as f64, hand.y as f64, 8.0, 0.0, TAU)?;
            ctx.fill();
        }

        // Quiver on the hip
        ctx.set_fill_style_str("#2b2b2b");
        self.fill_round_rect(&RoundRect::new(pose.base.x - 32.0, pose.base.y - 30.0, 12.0, 36.0, 6.0))?;
        Ok(())
    }

    fn draw_bow(&self, pose: &ArcherPose, power: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let half = BOW_HALF_LENGTH as f64;

        ctx.save();
        ctx.translate(pose.bow_hand.x as f64, pose.bow_hand.y as f64)?;
        ctx.rotate(pose.bow_rotation as f64)?;

        ctx.set_stroke_style_str("#4b2a19");
        ctx.set_line_width(6.0);
        ctx.begin_path();
        ctx.move_to(0.0, -half);
        ctx.quadratic_curve_to(BOW_LIMB_CONTROL.x as f64, BOW_LIMB_CONTROL.y as f64, 0.0, half);
        ctx.stroke();

        let string = bow_string_control(power);
        ctx.set_stroke_style_str("#222");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, -half);
        ctx.quadratic_curve_to(string.x as f64, string.y as f64, 0.0, half);
        ctx.stroke();

        ctx.restore();
        Ok(())
    }

    fn draw_limb(&self, seg: &Segment, width: f32, color: &str) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(seg.origin.x as f64, seg.origin.y as f64)?;
        ctx.rotate(seg.angle as f64)?;
        ctx.set_fill_style_str(color);
        self.fill_round_rect(&RoundRect::for_limb(seg, width))?;
        ctx.restore();
        Ok(())
    }

    fn fill_round_rect(&self, rect: &RoundRect) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y, w, h, r) = (
            rect.x as f64,
            rect.y as f64,
            rect.w as f64,
            rect.h as f64,
            rect.r as f64,
        );
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r)?;
        ctx.arc_to(x + w, y + h, x, y + h, r)?;
        ctx.arc_to(x, y + h, x, y, r)?;
        ctx.arc_to(x, y, x + w, y, r)?;
        ctx.close_path();
        ctx.fill();
        Ok(())
    }

    fn draw_banner(&self, text: &str, w: f64, h: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_font("bold 48px Inter, sans-serif");
        ctx.set_line_width(6.0);
        ctx.set_stroke_style_str("rgba(0,0,0,0.6)");
        ctx.set_fill_style_str("#fff");
        ctx.stroke_text(text, w / 2.0, h / 2.0)?;
        ctx.fill_text(text, w / 2.0, h / 2.0)?;
        Ok(())
    }
}
