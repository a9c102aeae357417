//! Per-frame simulation step
//!
//! Order within a frame: player, coins, boss spawn, enemy prune, enemies,
//! boss, punch strikes, particles, camera, win/lose. Enemies and the boss see
//! the player's already-updated position, so contact damage lands the same
//! frame.

use glam::Vec2;

use super::actor::HitSource;
use super::effects::BurstStyle;
use super::input::InputSnapshot;
use super::state::{LevelPhase, Session, Transition};

/// Advance the session by `dt` seconds (already capped by the host).
/// Returns the phase change this frame caused, if any.
pub fn tick(session: &mut Session, input: &InputSnapshot, dt: f32) -> Option<Transition> {
    if session.phase != LevelPhase::Playing {
        return None;
    }
    session.time_ticks += 1;

    session.player.update(
        dt,
        input,
        &session.motion,
        &session.terrain,
        &mut session.effects,
    );

    collect_coins(session, dt);

    if !session.boss_spawned() && session.coins_collected >= session.tuning.coins_per_level {
        session.spawn_boss();
    }

    session.enemies.retain(|e| !e.vitality.defeated);
    update_opponents(session, dt);
    resolve_punch(session);

    session.effects.step(dt);
    session.update_camera();

    // A defeated player wins over a simultaneous boss kill
    if session.player.vitality.defeated {
        session.phase = LevelPhase::GameOver;
        log::info!("game over after {} ticks", session.time_ticks);
        return Some(Transition::GameOver);
    }
    if session.boss.as_ref().is_some_and(|b| b.vitality.defeated) {
        session.phase = LevelPhase::Complete;
        log::info!("level complete, score {}", session.score);
        return Some(Transition::LevelComplete {
            habitat: session.habitat,
        });
    }
    None
}

fn collect_coins(session: &mut Session, dt: f32) {
    let player_box = session.player.body.rect();
    let mut picked = 0u32;
    let mut pickup_spots = Vec::new();

    session.coins.retain_mut(|coin| {
        coin.update(dt);
        if coin.touches(&player_box) {
            picked += 1;
            pickup_spots.push(coin.rect.center());
            false
        } else {
            true
        }
    });

    if picked == 0 {
        return;
    }
    for spot in pickup_spots {
        session.effects.spawn(spot, &BurstStyle::coin());
    }
    session.coins_collected += picked;
    session.score += u64::from(picked) * session.tuning.bonus_per_coin;

    if session.coins.is_empty() && !session.all_coins_bonus {
        session.all_coins_bonus = true;
        session.score += session.tuning.bonus_all_coins;
        log::info!("all {} coins collected", session.coins_total);
    }
}

/// Enemies then boss. Contact damage flows back through the callback.
fn update_opponents(session: &mut Session, dt: f32) {
    let Session {
        player,
        enemies,
        boss,
        terrain,
        motion,
        effects,
        ..
    } = session;
    let gravity = motion.gravity;
    let terrain = &*terrain;

    for enemy in enemies.iter_mut() {
        let target = player.body;
        enemy.update(dt, gravity, &target, terrain, &mut |damage, source| {
            log::debug!("player touched by {source:?}");
            player.take_hit(damage, effects);
        });
    }

    if let Some(boss) = boss.as_mut().filter(|b| !b.vitality.defeated) {
        let target = player.body;
        boss.update(dt, gravity, &target, terrain, &mut |damage, source| {
            log::debug!("player touched by {source:?}");
            player.take_hit(damage, effects);
        });
    }
}

/// While punching, hit every opponent in reach once per punch
fn resolve_punch(session: &mut Session) {
    let Some(reach) = session.player.punch_box() else {
        return;
    };
    let Session {
        player,
        enemies,
        boss,
        effects,
        ..
    } = session;
    let knock_dir = player.facing;

    for enemy in enemies.iter_mut() {
        if enemy.vitality.defeated || !enemy.body.rect().intersects(&reach) {
            continue;
        }
        if player.mark_struck(HitSource::Enemy(enemy.id)) {
            enemy.take_hit(1, knock_dir, effects);
        }
    }

    if let Some(boss) = boss.as_mut() {
        if !boss.vitality.defeated
            && boss.body.rect().intersects(&reach)
            && player.mark_struck(HitSource::Boss)
        {
            boss.take_hit(1, knock_dir, effects);
        }
    }
}

/// Camera offset rounded to whole pixels for the host
pub fn camera_pixels(session: &Session) -> Vec2 {
    session.camera.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::manifest::{Registry, find_character};

    const DT: f32 = 1.0 / 60.0;

    fn level(coins: &str, enemies: &str) -> String {
        format!(
            r#"{{
                "playerStart": {{ "x": 100, "y": 500 }},
                "platforms": [ {{ "x": 0, "y": 500, "w": 4000, "h": 60, "type": "ground" }} ],
                "coins": [ {coins} ],
                "enemies": [ {enemies} ],
                "boss": {{ "id": "king-bobber", "x": 3000, "y": 500 }}
            }}"#
        )
    }

    fn session_with(json: &str, tuning: Tuning) -> Session {
        Session::from_json(json, find_character("fertle").unwrap(), &Registry::builtin(), tuning, 3)
            .unwrap()
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn test_coin_pickup_scores_and_spawns_boss() {
        let tuning = Tuning {
            coins_per_level: 2,
            ..Tuning::default()
        };
        // Both coins overlap the player's start box
        let json = level(r#"{ "x": 80, "y": 460 }, { "x": 100, "y": 450 }"#, "");
        let mut s = session_with(&json, tuning);

        assert_eq!(tick(&mut s, &idle(), DT), None);
        assert_eq!(s.coins_collected, 2);
        assert_eq!(s.score, 2 * 10 + 200);
        assert!(s.all_coins_bonus);
        assert!(s.boss.is_some());

        // Nothing more to collect or spawn
        tick(&mut s, &idle(), DT);
        assert_eq!(s.score, 220);
    }

    #[test]
    fn test_boss_waits_for_threshold() {
        let json = level(r#"{ "x": 80, "y": 460 }"#, "");
        let mut s = session_with(&json, Tuning::default());
        for _ in 0..10 {
            tick(&mut s, &idle(), DT);
        }
        assert_eq!(s.coins_collected, 1);
        assert!(s.boss.is_none());
    }

    #[test]
    fn test_enemy_contact_hurts_player_same_frame() {
        let json = level("", r#"{ "type": "bobber", "x": 130, "y": 500 }"#);
        let mut s = session_with(&json, Tuning::default());
        tick(&mut s, &idle(), DT);
        assert_eq!(s.player.lives(), 2);
        assert!(s.player.vitality.is_invulnerable());

        // Window holds while contact persists
        tick(&mut s, &idle(), DT);
        assert_eq!(s.player.lives(), 2);
    }

    #[test]
    fn test_punch_strikes_once_and_defeated_enemy_is_pruned() {
        let json = level("", r#"{ "type": "bobber", "x": 170, "y": 500 }"#);
        let mut s = session_with(&json, Tuning::default());
        s.player.vitality.inv_timer = 100.0;

        let reset = |s: &mut Session| {
            let e = &mut s.enemies[0];
            e.body.pos = Vec2::new(170.0, 500.0);
            e.body.vel = Vec2::ZERO;
            e.vitality.inv_timer = 0.0;
        };

        for expected in [2, 1] {
            reset(&mut s);
            assert!(s.attack());
            tick(&mut s, &idle(), DT);
            assert_eq!(s.enemies[0].vitality.health, expected);

            // Same punch, enemy hittable again: no second strike
            s.enemies[0].vitality.inv_timer = 0.0;
            tick(&mut s, &idle(), DT);
            assert_eq!(s.enemies[0].vitality.health, expected);

            for _ in 0..25 {
                tick(&mut s, &idle(), DT);
            }
        }

        reset(&mut s);
        assert!(s.attack());
        tick(&mut s, &idle(), DT);
        assert!(s.enemies[0].vitality.defeated);
        tick(&mut s, &idle(), DT);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_player_defeat_ends_session_once() {
        let json = level("", "");
        let mut s = session_with(&json, Tuning::default());
        let mut fx = crate::sim::effects::Effects::new(0, 10);
        s.player.take_hit(3, &mut fx);
        assert_eq!(tick(&mut s, &idle(), DT), Some(Transition::GameOver));
        assert_eq!(s.phase, LevelPhase::GameOver);
        assert_eq!(tick(&mut s, &idle(), DT), None);
        assert!(!s.attack());
    }

    #[test]
    fn test_boss_defeat_completes_level() {
        let json = level("", "");
        let mut s = session_with(&json, Tuning::default());
        s.spawn_boss();
        let mut fx = crate::sim::effects::Effects::new(0, 10);
        if let Some(boss) = s.boss.as_mut() {
            boss.take_hit(100, 1.0, &mut fx);
        }
        assert_eq!(
            tick(&mut s, &idle(), DT),
            Some(Transition::LevelComplete {
                habitat: crate::sim::manifest::Habitat::Land
            })
        );
        assert_eq!(s.phase, LevelPhase::Complete);
    }

    #[test]
    fn test_same_seed_same_run() {
        let json = level(
            r#"{ "x": 300, "y": 460 }"#,
            r#"{ "type": "bobber", "x": 600, "y": 500 }"#,
        );
        let mut a = session_with(&json, Tuning::default());
        let mut b = session_with(&json, Tuning::default());
        let right = InputSnapshot {
            right: true,
            ..Default::default()
        };
        for i in 0..240 {
            let input = if i % 3 == 0 { idle() } else { right };
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.player.body, b.player.body);
        assert_eq!(a.effects.particles(), b.effects.particles());
        assert_eq!(a.score, b.score);
    }
}
