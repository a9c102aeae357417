//! Draw list generation
//!
//! Turns a `Session` into flat draw commands in world space plus a HUD
//! layer in screen space. The host paints them; nothing here touches a
//! canvas.

use glam::Vec2;

use crate::sim::{Combatant, Habitat, LevelPhase, Rect, Rgba, Session};

const COIN_IMAGE: &str = "assets/ui/coin.png";
const BOSS_BAR_WIDTH: f32 = 140.0;
const BOSS_BAR_HEIGHT: f32 = 12.0;
/// Gap between the top of the boss box and its health bar
const BOSS_BAR_OFFSET: f32 = 26.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle
    Fill { rect: Rect, color: Rgba },
    /// Repeating tile texture, `fallback` until the image has loaded
    Tile {
        rect: Rect,
        image: String,
        fallback: Rgba,
    },
    /// Feet-anchored actor sprite
    Sprite {
        image: String,
        rect: Rect,
        /// Mirror horizontally (facing left)
        flip: bool,
        /// Additive white blink while invulnerable
        lighten: bool,
    },
    /// Image scaled about its center
    Pulse { image: String, rect: Rect, scale: f32 },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Text { text: String, pos: Vec2, size: f32, color: Rgba },
}

/// One frame worth of draw commands
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub background: Option<Rgba>,
    /// World-space offset to subtract from `world` commands
    pub camera: Vec2,
    pub world: Vec<DrawCommand>,
    /// Screen-space overlay
    pub hud: Vec<DrawCommand>,
}

pub fn background(habitat: Habitat) -> Rgba {
    match habitat {
        Habitat::Land => Rgba::rgb(0x45, 0x86, 0xff),
        Habitat::Sea => Rgba::rgb(0x23, 0x5d, 0xff),
        Habitat::Sky => Rgba::rgb(0x9c, 0xd2, 0xff),
    }
}

/// Placeholder color for a platform type
pub fn platform_color(kind: &str) -> Rgba {
    match kind {
        "ground" => Rgba::rgb(0x65, 0x43, 0x21),
        "ice" => Rgba::rgb(0x66, 0xcc, 0xff),
        "sky" => Rgba::rgb(0xbb, 0xbb, 0xbb),
        "water" => Rgba::rgb(0x00, 0x44, 0x88),
        _ => Rgba::rgb(0x77, 0x77, 0x77),
    }
}

fn sprite<C: Combatant>(actor: &C, image: String) -> DrawCommand {
    DrawCommand::Sprite {
        image,
        rect: actor.rect(),
        flip: actor.facing() < 0.0,
        lighten: actor.blink_on(),
    }
}

pub fn build_frame(session: &Session) -> Frame {
    let mut world = Vec::new();

    for p in session.platforms() {
        world.push(DrawCommand::Tile {
            rect: p.rect,
            image: format!("assets/level-tiles/{}.png", p.kind),
            fallback: platform_color(&p.kind),
        });
    }

    for coin in &session.coins {
        world.push(DrawCommand::Pulse {
            image: COIN_IMAGE.to_string(),
            rect: coin.rect,
            scale: coin.scale,
        });
    }

    for enemy in session.enemies.iter().filter(|e| !e.is_defeated()) {
        let image = format!("assets/enemies/{}", enemy.frames.frame(enemy.pose()));
        world.push(sprite(enemy, image));
    }

    if let Some(boss) = session.boss.as_ref().filter(|b| !b.is_defeated()) {
        let image = format!("assets/bosses/{}", boss.frames.frame(boss.pose()));
        world.push(sprite(boss, image));

        let top = boss.body.pos.y - boss.body.size.y - BOSS_BAR_OFFSET;
        let left = boss.body.pos.x - BOSS_BAR_WIDTH / 2.0;
        let fill = if boss.phase() == 1 {
            Rgba::rgb(0xff, 0x4d, 0x4d)
        } else {
            Rgba::rgb(0xff, 0x8c, 0x1a)
        };
        world.push(DrawCommand::Fill {
            rect: Rect::new(left, top, BOSS_BAR_WIDTH, BOSS_BAR_HEIGHT),
            color: Rgba::rgb(0, 0, 0),
        });
        world.push(DrawCommand::Fill {
            rect: Rect::new(left, top, boss.vitality.fraction() * BOSS_BAR_WIDTH, BOSS_BAR_HEIGHT),
            color: fill,
        });
    }

    let player = &session.player;
    world.push(sprite(player, player.character.frame_path(player.pose())));

    for p in session.effects.render() {
        world.push(DrawCommand::Circle {
            center: p.pos,
            radius: p.radius,
            color: p.color,
        });
    }

    Frame {
        background: Some(background(session.habitat)),
        camera: crate::sim::tick::camera_pixels(session),
        world,
        hud: hud(session),
    }
}

fn hud(session: &Session) -> Vec<DrawCommand> {
    let white = Rgba::WHITE;
    let mut hud = vec![
        DrawCommand::Text {
            text: format!(
                "Coins: {}/{}",
                session.coins_collected, session.tuning.coins_per_level
            ),
            pos: Vec2::new(12.0, 26.0),
            size: 20.0,
            color: white,
        },
        DrawCommand::Text {
            text: format!("Lives: {}", session.player.lives().max(0)),
            pos: Vec2::new(12.0, 52.0),
            size: 20.0,
            color: white,
        },
        DrawCommand::Text {
            text: format!("Score: {}", session.score),
            pos: Vec2::new(12.0, 78.0),
            size: 20.0,
            color: white,
        },
    ];

    let banner = match session.phase {
        LevelPhase::Playing => None,
        LevelPhase::Complete => Some("Level Complete!"),
        LevelPhase::GameOver => Some("Game Over"),
    };
    if let Some(text) = banner {
        hud.push(DrawCommand::Text {
            text: text.to_string(),
            pos: Vec2::new(session.viewport.x / 2.0 - 90.0, session.viewport.y / 2.0),
            size: 32.0,
            color: white,
        });
    }
    hud
}
