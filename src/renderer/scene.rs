//! Scene drawing
//!
//! A pure function of [`GameState`]: nothing here mutates the simulation.
//! Every entity list is culled against the viewport before any drawing call
//! is issued for it.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::canvas::{Canvas, TextAlign, TextBaseline};
use crate::sim::{Aabb, GameState, GrassPatch, Obstacle, ObstacleKind, Roadblock};
use crate::world_to_screen;

const GROUND_COLOR: &str = "#415d2d";
const GRASS_ALPHA: f32 = 0.2;

const TRUNK_COLOR: &str = "#614c2a";
const SHADOW_COLOR: &str = "#222";
const LABEL_FILL: &str = "#fff";
const LABEL_INK: &str = "#233618";
const LABEL_HEIGHT: f32 = 32.0;
const LABEL_RADIUS: f32 = 12.0;

const ROADBLOCK_OUTLINE: &str = "#333";
const PASSED_ROADBLOCK_ALPHA: f32 = 0.35;
const PASSED_MARKER_ALPHA: f32 = 0.15;

const OVERLAY_ALPHA: f32 = 0.9;

/// Draw one frame
pub fn render<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    draw_ground(canvas, state)?;
    draw_highway(canvas, state);
    draw_obstacles(canvas, state)?;
    draw_roadblocks(canvas, state)?;
    draw_player(canvas, state)?;
    if !state.player.can_move() {
        draw_block_overlay(canvas, state)?;
    }
    Ok(())
}

// ============================================================================
// CULLING
// ============================================================================

/// Grass patches touching the viewport, with their screen centers
pub fn visible_grass(state: &GameState) -> impl Iterator<Item = (&GrassPatch, Vec2)> {
    let s = &state.settings;
    let offset = state.world.offset;
    state.grass_patches.iter().filter_map(move |patch| {
        let center = world_to_screen(patch.pos, offset, s.viewport_width);
        let bounds = Aabb::square(center, patch.size * 2.0);
        (!bounds.is_outside_viewport(s.viewport_width, s.viewport_height)).then_some((patch, center))
    })
}

/// Obstacles touching the viewport, with their screen centers
pub fn visible_obstacles(state: &GameState) -> impl Iterator<Item = (&Obstacle, Vec2)> {
    let s = &state.settings;
    let offset = state.world.offset;
    state.obstacles.iter().filter_map(move |ob| {
        let center = world_to_screen(ob.pos, offset, s.viewport_width);
        let bounds = Aabb::new(center, ob.size);
        (!bounds.is_outside_viewport(s.viewport_width, s.viewport_height)).then_some((ob, center))
    })
}

/// Roadblocks touching the viewport, with their screen centers
pub fn visible_roadblocks(state: &GameState) -> impl Iterator<Item = (&Roadblock, Vec2)> {
    let s = &state.settings;
    let offset = state.world.offset;
    state.roadblocks.iter().filter_map(move |rb| {
        let center = world_to_screen(rb.pos, offset, s.viewport_width);
        let bounds = Aabb::new(center, rb.size);
        (!bounds.is_outside_viewport(s.viewport_width, s.viewport_height)).then_some((rb, center))
    })
}

/// Screen x of the first centerline dash.
///
/// Periodic in `offset_x` with period `line_length + line_gap`, so the dashes
/// scroll continuously.
pub fn dash_start(offset_x: f32, viewport_width: f32, period: f32) -> f32 {
    let screen_left = offset_x - viewport_width / 2.0;
    -screen_left.rem_euclid(period)
}

// ============================================================================
// LAYERS
// ============================================================================

fn draw_ground<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    let s = &state.settings;
    canvas.save();
    canvas.set_fill_style(GROUND_COLOR);
    canvas.fill_rect(0.0, 0.0, s.viewport_width, s.viewport_height);

    for (patch, center) in visible_grass(state) {
        canvas.save();
        canvas.set_global_alpha(GRASS_ALPHA);
        canvas.begin_path();
        canvas.arc(center.x, center.y, patch.size, 0.0, TAU)?;
        canvas.set_fill_style(&patch.color);
        canvas.fill();
        canvas.restore();
    }
    canvas.restore();
    Ok(())
}

fn draw_highway<C: Canvas>(canvas: &mut C, state: &GameState) {
    let s = &state.settings;
    let highway_y = s.highway_y();

    canvas.save();
    canvas.set_fill_style(&s.highway_color);
    canvas.fill_rect(
        0.0,
        highway_y - s.highway_width / 2.0,
        s.viewport_width,
        s.highway_width,
    );

    let period = s.dash_period();
    canvas.set_fill_style(&s.highway_line_color);
    let mut x = dash_start(state.world.offset.x, s.viewport_width, period);
    while x < s.viewport_width {
        canvas.fill_rect(
            x,
            highway_y - s.highway_line_width / 2.0,
            s.highway_line_length,
            s.highway_line_width,
        );
        x += period;
    }
    canvas.restore();
}

fn draw_obstacles<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    for (ob, center) in visible_obstacles(state) {
        canvas.save();
        match ob.kind {
            ObstacleKind::Tree => {
                draw_tree(canvas, state, ob, center)?;
            }
            ObstacleKind::Rock => {
                draw_rock(canvas, ob, center)?;
            }
        }
        canvas.restore();
    }
    Ok(())
}

fn draw_tree<C: Canvas>(
    canvas: &mut C,
    state: &GameState,
    ob: &Obstacle,
    center: Vec2,
) -> Result<(), C::Error> {
    let (w, h) = (ob.size.x, ob.size.y);

    // Trunk
    canvas.set_fill_style(TRUNK_COLOR);
    canvas.fill_rect(center.x - 7.0, center.y + h / 2.0 - 18.0, 14.0, 22.0);

    // Canopy
    canvas.begin_path();
    canvas.arc(center.x, center.y, w / 2.0, 0.0, TAU)?;
    canvas.set_fill_style(ob.color());
    canvas.fill();

    if let Some(id) = ob.tree_id {
        if center.distance(state.player.pos) <= state.settings.tree_label_radius {
            draw_tree_label(canvas, id, center, w)?;
        }
    }

    // Ground shadow
    canvas.set_global_alpha(0.1);
    canvas.begin_path();
    canvas.arc(center.x, center.y + 12.0, w / 2.0 + 10.0, 0.0, TAU)?;
    canvas.set_fill_style(SHADOW_COLOR);
    canvas.fill();
    canvas.set_global_alpha(1.0);
    Ok(())
}

/// Numbered rounded box floating above a tree canopy
fn draw_tree_label<C: Canvas>(
    canvas: &mut C,
    id: u32,
    center: Vec2,
    canopy_width: f32,
) -> Result<(), C::Error> {
    let label = id.to_string();
    canvas.set_font("bold 20px Arial");
    canvas.set_text_align(TextAlign::Center);
    canvas.set_text_baseline(TextBaseline::Middle);

    let box_w = canvas.measure_text(&label)? + 20.0;
    let box_h = LABEL_HEIGHT;
    let top = center.y - canopy_width / 2.0 - box_h / 2.0 - 6.0;
    let left = center.x - box_w / 2.0;
    let r = LABEL_RADIUS;

    canvas.save();
    canvas.begin_path();
    canvas.move_to(left + r, top);
    canvas.line_to(left + box_w - r, top);
    canvas.quadratic_curve_to(left + box_w, top, left + box_w, top + r);
    canvas.line_to(left + box_w, top + box_h - r);
    canvas.quadratic_curve_to(left + box_w, top + box_h, left + box_w - r, top + box_h);
    canvas.line_to(left + r, top + box_h);
    canvas.quadratic_curve_to(left, top + box_h, left, top + box_h - r);
    canvas.line_to(left, top + r);
    canvas.quadratic_curve_to(left, top, left + r, top);
    canvas.close_path();

    canvas.set_fill_style(LABEL_FILL);
    canvas.set_shadow("rgba(0,0,0,0.2)", 5.0);
    canvas.fill();
    canvas.set_shadow("rgba(0,0,0,0.2)", 0.0);

    canvas.set_stroke_style(LABEL_INK);
    canvas.set_line_width(2.0);
    canvas.stroke();
    canvas.set_fill_style(LABEL_INK);
    canvas.fill_text(&label, center.x, top + box_h / 2.0 + 1.0)?;
    canvas.restore();
    Ok(())
}

fn draw_rock<C: Canvas>(canvas: &mut C, ob: &Obstacle, center: Vec2) -> Result<(), C::Error> {
    let (rx, ry) = (ob.size.x / 2.0, ob.size.y / 2.0);
    let tilt = PI / 8.0;

    canvas.begin_path();
    canvas.ellipse(center.x, center.y, rx, ry, tilt, 0.0, TAU)?;
    canvas.set_fill_style(ob.color());
    canvas.fill();

    canvas.set_global_alpha(0.2);
    canvas.begin_path();
    canvas.ellipse(center.x, center.y + 8.0, rx + 8.0, ry + 4.0, tilt, 0.0, TAU)?;
    canvas.set_fill_style(SHADOW_COLOR);
    canvas.fill();
    canvas.set_global_alpha(1.0);
    Ok(())
}

fn draw_roadblocks<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    let color = &state.settings.roadblock_color;

    for (rb, c) in visible_roadblocks(state) {
        let (hw, hh) = (rb.size.x / 2.0, rb.size.y / 2.0);
        let active = rb.active();

        canvas.save();
        canvas.set_global_alpha(if active { 1.0 } else { PASSED_ROADBLOCK_ALPHA });
        canvas.set_fill_style(color);
        canvas.set_stroke_style(ROADBLOCK_OUTLINE);
        canvas.set_line_width(3.0);
        canvas.begin_path();
        canvas.move_to(c.x - hw, c.y - hh);
        canvas.line_to(c.x + hw, c.y - hh);
        canvas.line_to(c.x + hw, c.y + hh);
        canvas.line_to(c.x - hw, c.y + hh);
        canvas.close_path();
        canvas.fill();
        canvas.stroke();

        // Warning marker
        canvas.set_global_alpha(if active { 1.0 } else { PASSED_MARKER_ALPHA });
        canvas.set_fill_style("#fff");
        canvas.set_font("bold 16px Arial");
        canvas.set_text_align(TextAlign::Center);
        canvas.set_text_baseline(TextBaseline::Middle);
        canvas.fill_text("STOP", c.x, c.y)?;
        canvas.restore();
    }
    Ok(())
}

/// Safari truck at the fixed screen position
fn draw_player<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    let Vec2 { x: px, y: py } = state.player.pos;
    let w = state.player.size;
    let h = state.player.size * 0.6;
    let (left, top) = (px - w / 2.0, py - h / 2.0);

    canvas.save();

    // Body
    canvas.set_fill_style("#dfc98b");
    canvas.fill_rect(left, top, w, h);

    // Cabin
    canvas.set_fill_style("#bca76a");
    canvas.fill_rect(left + 4.0, top + 4.0, w * 0.55, h - 8.0);

    // Roof rack
    canvas.save();
    canvas.set_stroke_style("#555");
    canvas.set_line_width(3.0);
    canvas.begin_path();
    canvas.move_to(left + 6.0, top - 7.0);
    canvas.line_to(px + w / 2.0 - 6.0, top - 7.0);
    canvas.stroke();
    canvas.restore();

    // Spare tire
    canvas.begin_path();
    canvas.arc(px + w / 2.0 + 4.0, py + h / 2.0 - 5.0, 8.0, 0.0, TAU)?;
    canvas.set_fill_style("#232323");
    canvas.fill();

    // Headlights
    canvas.begin_path();
    canvas.arc(left + 7.0, top + 5.0, 5.0, 0.0, TAU)?;
    canvas.arc(left + 7.0, py + h / 2.0 - 5.0, 5.0, 0.0, TAU)?;
    canvas.set_fill_style("#fff9c4");
    canvas.fill();

    // Bumper guard
    canvas.save();
    canvas.set_stroke_style("#666");
    canvas.set_line_width(4.0);
    canvas.begin_path();
    canvas.move_to(left - 6.0, top + 2.0);
    canvas.line_to(left - 6.0, py + h / 2.0 - 2.0);
    canvas.stroke();
    canvas.restore();

    // Wheels
    let wheel = 9.0;
    canvas.begin_path();
    canvas.arc(left + 12.0, top + h, wheel, 0.0, TAU)?;
    canvas.arc(px + w / 2.0 - 12.0, top + h, wheel, 0.0, TAU)?;
    canvas.arc(left + 12.0, top, wheel, 0.0, TAU)?;
    canvas.arc(px + w / 2.0 - 12.0, top, wheel, 0.0, TAU)?;
    canvas.set_fill_style("#232323");
    canvas.fill();

    // Windows
    canvas.set_global_alpha(0.65);
    canvas.set_fill_style("#aeeaf7");
    canvas.fill_rect(left + 8.0, top + 8.0, w * 0.32, h - 16.0);

    canvas.restore();
    Ok(())
}

/// Full-screen dim with the remaining wait in whole seconds
fn draw_block_overlay<C: Canvas>(canvas: &mut C, state: &GameState) -> Result<(), C::Error> {
    let s = &state.settings;
    let (cx, cy) = (s.viewport_width / 2.0, s.viewport_height / 2.0);
    let seconds = (state.player.block_timer / 1000.0).ceil() as u32;

    canvas.save();
    canvas.set_global_alpha(OVERLAY_ALPHA);
    canvas.set_fill_style("#000");
    canvas.fill_rect(0.0, 0.0, s.viewport_width, s.viewport_height);
    canvas.set_global_alpha(1.0);

    canvas.set_fill_style("#fff");
    canvas.set_font("bold 32px Arial");
    canvas.set_text_align(TextAlign::Center);
    canvas.set_text_baseline(TextBaseline::Middle);
    canvas.fill_text("Road Block! Please Wait...", cx, cy - 30.0)?;
    canvas.set_font("bold 24px Arial");
    canvas.fill_text(&format!("{} seconds", seconds), cx, cy + 10.0)?;
    canvas.restore();
    Ok(())
}
