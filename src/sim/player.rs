//! The player's ship: controls, gun, score, sprees and upgrades

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{Body, Bounds, ClipRegion};
use super::bullet::Bullet;
use super::collision::touches_any_asteroid;
use super::entity::{EntityId, Others, TickContext};
use super::modifiers::Modifier;
use super::particles::{ENGINE_EXHAUST, MUZZLE_FLASH, ParticleEmitter};
use super::state::{GameEvent, Prompt, PromptAction};
use super::tick::{InputEvent, Key};
use crate::consts::*;
use crate::normalize_angle;

/// Muzzle sparks per shot (inclusive)
const MUZZLE_BURST: (u32, u32) = (2, 4);
/// Muzzle spark power, in tenths (inclusive)
const MUZZLE_POWER: (u32, u32) = (10, 30);

/// First-run tips, shown once
pub const TUTORIAL_TIPS: [&str; 5] = [
    "Since this is (presumably) your first time playing the game, here are some tips!",
    "Use W, A, S and D to fly, SPACE to pew pew and B to open the shop!",
    "Hit asteroids for points, hit several in a row for multipliers!",
    "That's it! Now shoot stuff!",
    "Oh yeah, it goes without saying but, don't touch the asteroids :/",
];

/// Ship parameters that modifiers tune
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    /// Score spent per unit of thrust
    pub fuel_cost: f32,
    /// Minimum time between shots (ms)
    pub shot_delay_ms: f32,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    /// Holding fire keeps shooting
    pub automatic_fire: bool,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            fuel_cost: FUEL_COST,
            shot_delay_ms: SHOT_DELAY_MS,
            bullet_size: BULLET_SIZE,
            bullet_speed: BULLET_SPEED,
            automatic_fire: false,
        }
    }
}

/// Requested motion from held keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    /// Linear acceleration along the bearing
    pub thrust: f32,
    /// Bearing change per step
    pub turn: f32,
    pub fire: bool,
}

#[derive(Debug)]
pub struct Player {
    pub size: f32,
    pub bearing: f32,
    pub accel: f32,
    pub rotation_step: f32,
    pub loadout: Loadout,
    pub controls: Controls,

    /// Spendable score
    pub score: f32,
    pub highest_this_round: f32,
    /// All-time best, as loaded from and written back to the profile
    pub best_ever: f32,
    pub score_multiplier: f32,
    pub spree_start: f64,
    /// Spree window (seconds)
    pub spree_window: f64,

    pub last_shot: f64,
    pub last_popup: f64,
    pub lost: bool,
    pub paused: bool,
    pub tutorial_pending: bool,

    /// Owned upgrades, in purchase order
    pub modifiers: Vec<Modifier>,
    pub exhaust: ParticleEmitter,
    pub muzzle: ParticleEmitter,
}

impl Player {
    pub fn new(pos: Vec2, best_ever: f32, now: f64, particle_scale: f32, rng: &mut Pcg32) -> Self {
        let mut player = Self {
            size: PLAYER_SIZE,
            bearing: 0.0,
            accel: PLAYER_ACCEL,
            rotation_step: PLAYER_ROTATION_STEP,
            loadout: Loadout::default(),
            controls: Controls::default(),
            score: PLAYER_START_SCORE,
            highest_this_round: PLAYER_START_SCORE,
            best_ever,
            score_multiplier: 1.0,
            spree_start: f64::NEG_INFINITY,
            spree_window: SPREE_WINDOW_MS / 1000.0,
            last_shot: now,
            last_popup: now,
            lost: false,
            paused: false,
            tutorial_pending: false,
            modifiers: Vec::new(),
            exhaust: ParticleEmitter::new(ENGINE_EXHAUST.scaled(particle_scale), pos, now, rng),
            muzzle: ParticleEmitter::new(MUZZLE_FLASH.scaled(particle_scale), pos, now, rng),
        };
        if player.highest_this_round > player.best_ever {
            player.best_ever = player.highest_this_round;
        }
        player
    }

    /// Body for a player centred in a wrap-clipped screen
    pub fn body(resolution: Vec2) -> Body {
        Body::new(resolution / 2.0)
            .with_friction(PLAYER_FRICTION)
            .with_clip(ClipRegion::wrap(Vec2::ZERO, resolution))
            .with_render_bounds(Some(Bounds::square(PLAYER_RENDER_EXTENT)))
    }

    /// Install a modifier and apply its one-time effect; returns its slot
    pub fn add_modifier(&mut self, modifier: Modifier) -> usize {
        modifier.initialize(&mut self.loadout);
        self.modifiers.push(modifier);
        self.modifiers.len() - 1
    }

    /// Replace the modifier in `slot` with its next tier, in place
    pub fn upgrade_modifier(&mut self, slot: usize) -> Option<&Modifier> {
        let next = self.modifiers.get(slot)?.upgrade();
        next.initialize(&mut self.loadout);
        self.modifiers[slot] = next;
        self.modifiers.get(slot)
    }

    /// Rate-limited toast; `force` skips the interval check
    pub fn popup(&mut self, ctx: &mut TickContext<'_>, text: impl Into<String>, force: bool) {
        if force || ctx.now >= self.last_popup + POPUP_INTERVAL_MS / 1000.0 {
            ctx.emit(GameEvent::Toast(text.into()));
            self.last_popup = ctx.now;
        }
    }

    /// Score a kill against an asteroid of the given sizes (before halving).
    ///
    /// Returns the new multiplier when the kill extended a spree.
    pub fn register_kill(&mut self, now: f64, max_size: f32, size: f32) -> Option<f32> {
        let extended = now < self.spree_start + self.spree_window;
        if extended {
            self.score_multiplier = (self.score_multiplier + 1.0).min(MAX_SCORE_MULTIPLIER);
        } else {
            self.score_multiplier = 1.0;
        }
        self.spree_start = now;
        self.score += (max_size - size + 1.0) * self.score_multiplier;
        extended.then_some(self.score_multiplier)
    }

    pub fn notify(&mut self, event: &InputEvent) {
        for modifier in &self.modifiers {
            modifier.notify(event);
        }
        match *event {
            InputEvent::Pressed(key) => match key {
                Key::Thrust => self.controls.thrust = self.accel,
                Key::Reverse => self.controls.thrust = -self.accel,
                Key::RotateLeft => self.controls.turn = -self.rotation_step,
                Key::RotateRight => self.controls.turn = self.rotation_step,
                Key::Fire => self.controls.fire = true,
                Key::Pause => self.paused = true,
                _ => {}
            },
            InputEvent::Released(key) => match key {
                Key::Thrust | Key::Reverse => self.controls.thrust = 0.0,
                Key::RotateLeft | Key::RotateRight => self.controls.turn = 0.0,
                Key::Fire => self.controls.fire = false,
                _ => {}
            },
        }
    }

    pub fn think(&mut self, id: EntityId, body: &mut Body, others: &mut Others<'_>, ctx: &mut TickContext<'_>) {
        if self.tutorial_pending {
            self.tutorial_pending = false;
            for tip in TUTORIAL_TIPS {
                ctx.open_prompt(Prompt::acknowledge(tip, PromptAction::Tutorial));
            }
            ctx.emit(GameEvent::TutorialFinished);
        }
        if self.paused {
            self.paused = false;
            ctx.open_prompt(Prompt::acknowledge(
                "The game is paused, press OK to continue!",
                PromptAction::Resume,
            ));
        }
        if self.lost {
            ctx.reset_requested = true;
            return;
        }

        for modifier in &self.modifiers {
            modifier.per_tick(body, &mut self.score, others);
        }

        self.track_high_score(ctx);
        self.try_fire(id, body, ctx);

        body.accelerate(self.bearing, self.controls.thrust);
        self.score -= self.loadout.fuel_cost * self.controls.thrust.abs();
        self.bearing = normalize_angle(self.bearing + self.controls.turn);

        self.exhaust.pos = body.pos;
        self.exhaust
            .set_direction(self.bearing + PI, 5.0 * self.controls.thrust);
        self.exhaust.think(ctx.now, ctx.rng);
        self.muzzle.think(ctx.now, ctx.rng);

        if touches_any_asteroid(body.pos, self.size, others) {
            self.lose("hit an asteroid");
        }
        if self.score <= 0.0 {
            self.lose("ran out of score");
        }
    }

    fn lose(&mut self, reason: &str) {
        if !self.lost {
            log::info!("player lost: {} (score {:.1})", reason, self.score);
        }
        self.lost = true;
    }

    fn track_high_score(&mut self, ctx: &mut TickContext<'_>) {
        if self.score <= self.highest_this_round {
            return;
        }
        let mut text = String::from("Woot! New high score for this round!");
        self.highest_this_round = self.score;
        if self.highest_this_round > self.best_ever {
            text.push_str(&format!(
                " You beat the best score ever! Bonus {} points!",
                BEST_SCORE_BONUS
            ));
            self.score += BEST_SCORE_BONUS;
            self.highest_this_round += BEST_SCORE_BONUS;
            self.best_ever = self.highest_this_round;
            ctx.emit(GameEvent::BestScore(self.best_ever));
        }
        self.popup(ctx, text, false);
    }

    fn try_fire(&mut self, id: EntityId, body: &mut Body, ctx: &mut TickContext<'_>) {
        if !self.controls.fire
            || ctx.now < self.last_shot + self.loadout.shot_delay_ms as f64 / 1000.0
        {
            return;
        }
        self.last_shot = ctx.now;
        self.score -= SHOT_COST;
        if !self.loadout.automatic_fire {
            self.controls.fire = false;
        }

        let bullet_id = ctx.alloc_id();
        let resolution = ctx.settings.resolution();
        let bullet = Bullet::spawn(
            bullet_id,
            id,
            body.pos,
            body.vel,
            self.bearing,
            &self.loadout,
            ClipRegion::wrap(Vec2::ZERO, resolution),
            ctx.now,
            ctx.settings.particle_scale(),
            ctx.rng,
        );
        ctx.spawn(bullet);

        // Recoil
        body.accelerate(self.bearing, -self.accel * 2.0);

        let sparks = ctx.rng.random_range(MUZZLE_BURST.0..=MUZZLE_BURST.1);
        self.muzzle
            .burst(body.pos, sparks, MUZZLE_POWER, ctx.now, ctx.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{Entity, EntityKind};
    use crate::sim::particles::Emitters;
    use rand::SeedableRng;

    fn player() -> Player {
        let mut rng = Pcg32::seed_from_u64(11);
        Player::new(Vec2::new(400.0, 300.0), 0.0, 0.0, 1.0, &mut rng)
    }

    /// Empty field around a single ship
    struct Cockpit {
        rng: Pcg32,
        emitters: Emitters,
        settings: Settings,
        events: Vec<GameEvent>,
        next_id: u32,
        body: Body,
    }

    impl Cockpit {
        fn new() -> Self {
            let settings = Settings::default();
            Self {
                rng: Pcg32::seed_from_u64(21),
                emitters: Emitters::default(),
                body: Player::body(settings.resolution()),
                settings,
                events: Vec::new(),
                next_id: 2,
            }
        }

        /// One think at `now`; returns the bullets fired
        fn think(&mut self, player: &mut Player, now: f64) -> Vec<Entity> {
            let mut ctx = TickContext::new(
                now,
                &mut self.rng,
                &mut self.emitters,
                &self.settings,
                &mut self.events,
                &mut self.next_id,
            );
            let mut world: Vec<Entity> = Vec::new();
            let (before, after) = world.split_at_mut(0);
            let mut others = Others::new(before, after);
            player.think(EntityId(1), &mut self.body, &mut others, &mut ctx);
            ctx.take_spawned()
                .into_iter()
                .filter(|e| matches!(e.kind, EntityKind::Bullet(_)))
                .collect()
        }
    }

    #[test]
    fn test_kill_scoring_uses_sizes_and_multiplier() {
        let mut p = player();
        p.score = 0.0;
        p.score_multiplier = 2.0;
        p.spree_start = 9.5;
        // Within the window: multiplier 2 -> 3
        assert_eq!(p.register_kill(10.0, 32.0, 16.0), Some(3.0));
        assert_eq!(p.score, 51.0);
    }

    #[test]
    fn test_spree_resets_outside_window() {
        let mut p = player();
        p.score_multiplier = 5.0;
        p.spree_start = 1.0;
        assert_eq!(p.register_kill(2.5, 32.0, 32.0), None);
        assert_eq!(p.score_multiplier, 1.0);
        assert_eq!(p.spree_start, 2.5);
    }

    #[test]
    fn test_spree_multiplier_caps_at_ten() {
        let mut p = player();
        let mut now = 0.0;
        for _ in 0..15 {
            p.register_kill(now, 32.0, 32.0);
            now += 0.5;
        }
        assert_eq!(p.score_multiplier, MAX_SCORE_MULTIPLIER);
    }

    #[test]
    fn test_every_hit_refreshes_window() {
        let mut p = player();
        // Hits 0.9 s apart keep the spree alive well past the first hit's window
        for i in 0..4 {
            p.register_kill(i as f64 * 0.9, 32.0, 32.0);
        }
        assert_eq!(p.score_multiplier, 4.0);
    }

    #[test]
    fn test_first_kill_starts_at_one() {
        let mut p = player();
        assert_eq!(p.register_kill(0.0, 32.0, 32.0), None);
        assert_eq!(p.score_multiplier, 1.0);
        assert_eq!(p.score, PLAYER_START_SCORE + 1.0);
    }

    #[test]
    fn test_controls_from_events() {
        let mut p = player();
        p.notify(&InputEvent::Pressed(Key::Thrust));
        assert_eq!(p.controls.thrust, PLAYER_ACCEL);
        p.notify(&InputEvent::Pressed(Key::RotateLeft));
        assert_eq!(p.controls.turn, -PLAYER_ROTATION_STEP);
        p.notify(&InputEvent::Released(Key::Thrust));
        p.notify(&InputEvent::Released(Key::RotateLeft));
        assert_eq!(p.controls, Controls::default());
        p.notify(&InputEvent::Pressed(Key::Pause));
        assert!(p.paused);
    }

    #[test]
    fn test_upgrade_in_place_and_reinitialize() {
        let mut p = player();
        p.add_modifier(Modifier::RapidFire);
        let slot = p.add_modifier(Modifier::LaserSight);
        assert_eq!(p.loadout.shot_delay_ms, SHOT_DELAY_MS - 100.0);
        p.upgrade_modifier(slot);
        assert_eq!(p.modifiers, vec![Modifier::RapidFire, Modifier::PredictiveLaserSight]);
        p.upgrade_modifier(0);
        assert_eq!(p.modifiers[0], Modifier::RapidFire);
        assert_eq!(p.loadout.shot_delay_ms, SHOT_DELAY_MS - 200.0);
        assert!(p.upgrade_modifier(7).is_none());
    }

    #[test]
    fn test_running_out_of_score_loses() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.score = 0.05;
        p.notify(&InputEvent::Pressed(Key::Thrust));
        cockpit.think(&mut p, 0.1);
        assert!(p.score <= 0.0);
        assert!(p.lost);
    }

    #[test]
    fn test_thrust_burns_fuel_and_accelerates() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.notify(&InputEvent::Pressed(Key::Thrust));
        cockpit.think(&mut p, 0.1);
        assert!((p.score - (PLAYER_START_SCORE - FUEL_COST * PLAYER_ACCEL)).abs() < 1e-5);
        assert!((cockpit.body.vel.x - PLAYER_ACCEL).abs() < 1e-6);

        // Reverse thrust costs the same
        p.notify(&InputEvent::Pressed(Key::Reverse));
        cockpit.think(&mut p, 0.2);
        assert!((p.score - (PLAYER_START_SCORE - 2.0 * FUEL_COST * PLAYER_ACCEL)).abs() < 1e-5);
        assert!(!p.lost);
    }

    #[test]
    fn test_shot_delay_gates_fire() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.add_modifier(Modifier::AutomaticGun);
        p.notify(&InputEvent::Pressed(Key::Fire));

        // The gun is cold for one delay after the ship appears
        assert!(cockpit.think(&mut p, 0.1).is_empty());
        assert_eq!(cockpit.think(&mut p, 0.25).len(), 1);
        assert!(cockpit.think(&mut p, 0.3).is_empty());
        assert_eq!(cockpit.think(&mut p, 0.5).len(), 1);
        assert_eq!(p.last_shot, 0.5);
    }

    #[test]
    fn test_automatic_fire_repeats_while_held() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.add_modifier(Modifier::AutomaticGun);
        p.notify(&InputEvent::Pressed(Key::Fire));
        // Polled every 70 ms: shots at 0.21, 0.42, 0.63, 0.84 and 1.05 s
        let fired: usize = (1..=15)
            .map(|step| cockpit.think(&mut p, step as f64 * 0.07).len())
            .sum();
        assert_eq!(fired, 5);
        assert!(p.controls.fire);

        p.notify(&InputEvent::Released(Key::Fire));
        assert!(cockpit.think(&mut p, 2.0).is_empty());
    }

    #[test]
    fn test_single_shot_clears_fire_request() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.notify(&InputEvent::Pressed(Key::Fire));
        assert_eq!(cockpit.think(&mut p, 1.0).len(), 1);
        assert!(!p.controls.fire);
        assert!(cockpit.think(&mut p, 2.0).is_empty());
        assert_eq!(p.score, PLAYER_START_SCORE - SHOT_COST);
    }

    #[test]
    fn test_firing_recoils_against_bearing() {
        let mut cockpit = Cockpit::new();
        let mut p = player();
        p.notify(&InputEvent::Pressed(Key::Fire));
        let bullets = cockpit.think(&mut p, 1.0);
        assert!((cockpit.body.vel.x + 2.0 * PLAYER_ACCEL).abs() < 1e-6);
        assert!(cockpit.body.vel.y.abs() < 1e-6);
        // The bullet left before the kick
        assert!((bullets[0].body.vel.x - BULLET_SPEED).abs() < 1e-5);
        assert!(p.muzzle.population() >= MUZZLE_BURST.0 as usize);
    }
}
