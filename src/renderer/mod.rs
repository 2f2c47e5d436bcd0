//! Draw-list generation
//!
//! The simulation is drawn by turning the current state into a flat list of
//! primitives. Whatever backend paints the frame only has to know circles,
//! lines and text.

use glam::Vec2;

use crate::consts::PLAYER_RENDER_EXTENT;
use crate::polar_to_cartesian;
use crate::sim::{
    Entity, EntityKind, GameState, Modifier, ParticleEmitter, Player, Viewport,
};

pub type Rgb = crate::sim::particles::Rgb;

/// Colors for game elements
pub mod colors {
    use super::Rgb;

    pub const SHIP: Rgb = [255, 0, 0];
    pub const SHIP_HEADING: Rgb = [255, 255, 255];
    pub const ASTEROID: Rgb = [50, 50, 50];
    pub const BULLET: Rgb = [60, 60, 255];
    pub const MARKER: Rgb = [0, 255, 0];
    pub const LASER: Rgb = [255, 0, 0];
    pub const HUD_SCORE: Rgb = [255, 255, 255];
    pub const HUD_ROUND: Rgb = [255, 255, 0];
    pub const HUD_BEST: Rgb = [255, 100, 100];
    pub const PANEL_TEXT: Rgb = [255, 255, 0];
    pub const DISABLED_TEXT: Rgb = [120, 120, 120];
}

/// Laser sight line length
const LASER_LENGTH: f32 = 1000.0;
/// Predictive sight: dot count and step scale
const PREDICTIVE_DOTS: usize = 100;
const PREDICTIVE_STEP: f32 = 2.0;
const PREDICTIVE_DOT_RADIUS: f32 = 2.0;

/// One drawing primitive, in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle { center: Vec2, radius: f32, color: Rgb },
    Line { from: Vec2, to: Vec2, color: Rgb },
    Text { pos: Vec2, text: String, color: Rgb, size: f32 },
}

/// Everything visible in `viewport`, in entity order, followed by the HUD
pub fn draw_list(state: &GameState, viewport: &Viewport) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    for entity in state
        .entities
        .iter()
        .filter(|e| e.body.on_screen(viewport))
    {
        draw_entity(state, entity, &mut out);
    }
    draw_hud(state, viewport, &mut out);
    draw_overlay(state, viewport, &mut out);
    out
}

fn draw_entity(state: &GameState, entity: &Entity, out: &mut Vec<DrawCommand>) {
    let pos = entity.body.pos;
    match &entity.kind {
        EntityKind::Player(player) => draw_player(player, entity, out),
        EntityKind::Spawner(spawner) => {
            if let Some(emitter) = spawner.factory.emitter().and_then(|id| state.emitters.get(id)) {
                draw_particles(emitter, out);
            }
        }
        EntityKind::Asteroid(asteroid) => out.push(DrawCommand::Circle {
            center: pos,
            radius: asteroid.size,
            color: colors::ASTEROID,
        }),
        EntityKind::Bullet(bullet) => {
            draw_particles(&bullet.trail, out);
            out.push(DrawCommand::Circle {
                center: pos,
                radius: bullet.size,
                color: colors::BULLET,
            });
        }
        EntityKind::Marker(marker) => out.push(DrawCommand::Text {
            pos,
            text: marker.label(),
            color: colors::MARKER,
            size: 14.0,
        }),
    }
}

fn draw_player(player: &Player, entity: &Entity, out: &mut Vec<DrawCommand>) {
    let pos = entity.body.pos;
    for modifier in &player.modifiers {
        match modifier {
            Modifier::LaserSight => out.push(DrawCommand::Line {
                from: pos,
                to: pos + polar_to_cartesian(LASER_LENGTH, player.bearing),
                color: colors::LASER,
            }),
            Modifier::PredictiveLaserSight => {
                // Where bullets fired now will actually go
                let step = (entity.body.vel
                    + polar_to_cartesian(player.loadout.bullet_speed, player.bearing))
                    * PREDICTIVE_STEP;
                let mut dot = pos;
                for _ in 0..PREDICTIVE_DOTS {
                    out.push(DrawCommand::Circle {
                        center: dot,
                        radius: PREDICTIVE_DOT_RADIUS,
                        color: colors::LASER,
                    });
                    dot += step;
                }
            }
            _ => {}
        }
    }
    draw_particles(&player.exhaust, out);
    draw_particles(&player.muzzle, out);
    out.push(DrawCommand::Line {
        from: pos,
        to: pos + polar_to_cartesian(PLAYER_RENDER_EXTENT, player.bearing),
        color: colors::SHIP_HEADING,
    });
    out.push(DrawCommand::Circle {
        center: pos,
        radius: player.size,
        color: colors::SHIP,
    });
}

fn draw_particles(emitter: &ParticleEmitter, out: &mut Vec<DrawCommand>) {
    out.extend(emitter.particles().iter().map(|p| DrawCommand::Circle {
        center: p.body.pos,
        radius: p.size,
        color: p.color,
    }));
}

fn draw_hud(state: &GameState, viewport: &Viewport, out: &mut Vec<DrawCommand>) {
    let center_x = (viewport.top_left.x + viewport.bottom_right.x) / 2.0;
    if let Some(player) = state.player() {
        let lines = [
            (format!("Score Remaining to Spend: {:.1}", player.score), colors::HUD_SCORE),
            (
                format!("Total Score This Round: {:.1}", player.highest_this_round),
                colors::HUD_ROUND,
            ),
            (format!("Best Score Ever: {:.1}", player.best_ever), colors::HUD_BEST),
        ];
        for (row, (text, color)) in lines.into_iter().enumerate() {
            out.push(DrawCommand::Text {
                pos: Vec2::new(center_x, 5.0 + row as f32 * 10.0),
                text,
                color,
                size: 10.0,
            });
        }
    }
    if state.settings.show_entity_count {
        out.push(DrawCommand::Text {
            pos: Vec2::new(viewport.top_left.x, viewport.bottom_right.y - 10.0),
            text: format!("Entities: {}", state.entities.len()),
            color: colors::HUD_SCORE,
            size: 10.0,
        });
    }
}

/// Shop panel and the open prompt, drawn on top of everything
fn draw_overlay(state: &GameState, viewport: &Viewport, out: &mut Vec<DrawCommand>) {
    if state.shop_open() {
        let origin = viewport.top_left + Vec2::splat(55.0);
        out.push(DrawCommand::Text {
            pos: origin,
            text: "Leave Shop".to_string(),
            color: colors::PANEL_TEXT,
            size: 12.0,
        });
        for (slot, item) in state.shop.items.iter().enumerate() {
            out.push(DrawCommand::Text {
                pos: origin + Vec2::new(5.0, 60.0 + slot as f32 * 30.0),
                text: format!("[{}] {}", slot + 1, item.label()),
                color: if item.is_sold_out() {
                    colors::DISABLED_TEXT
                } else {
                    colors::PANEL_TEXT
                },
                size: 12.0,
            });
        }
    }
    if let Some(prompt) = state.pending_prompt() {
        let center = (viewport.top_left + viewport.bottom_right) / 2.0;
        out.push(DrawCommand::Text {
            pos: center,
            text: prompt.message.clone(),
            color: colors::PANEL_TEXT,
            size: 20.0,
        });
    }
}
