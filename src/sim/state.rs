//! Game state and the modal prompt machinery
//!
//! Everything a round needs lives here: the entity list, shared emitters, the
//! shop, and a queue of prompts that replace blocking dialogs. While a prompt
//! is open the phase is modal and entities are frozen.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::asteroid::AsteroidFactory;
use super::body::Body;
use super::entity::{Entity, EntityId, EntityKind};
use super::particles::Emitters;
use super::player::Player;
use super::shop::{PurchaseOutcome, Shop};
use super::spawner::Spawner;
use crate::consts::*;
use crate::settings::Settings;

pub const WELCOME_TOAST: &str = "Welcome to Asteroids Survival! :)";
pub const GAME_OVER_MESSAGE: &str = "Game Over! Press any key to try again!";
pub const QUIT_MESSAGE: &str = "Are you sure you want to quit?";
pub const CANNOT_AFFORD_MESSAGE: &str = "You cannot afford this item!";

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Entities think and move
    Playing,
    /// Pause notice open
    Paused,
    /// Shop open, simulation frozen
    InShop,
    /// A confirmation or notice is open
    Confirming,
    /// Loss notice open; answering starts a new round
    GameOver,
    /// Player confirmed quitting
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Yes / no
    Confirm,
    /// OK only
    Acknowledge,
}

/// What happens when a prompt is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Resume,
    Tutorial,
    Purchase(usize),
    Notice,
    Quit,
    NewRound,
}

/// A modal question waiting for the player
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub message: String,
    pub action: PromptAction,
    /// Answers before this time are ignored
    pub not_before: f64,
}

impl Prompt {
    pub fn confirm(message: impl Into<String>, action: PromptAction) -> Self {
        Self {
            kind: PromptKind::Confirm,
            message: message.into(),
            action,
            not_before: f64::NEG_INFINITY,
        }
    }

    pub fn acknowledge(message: impl Into<String>, action: PromptAction) -> Self {
        Self {
            kind: PromptKind::Acknowledge,
            message: message.into(),
            action,
            not_before: f64::NEG_INFINITY,
        }
    }

    pub fn with_not_before(mut self, not_before: f64) -> Self {
        self.not_before = not_before;
        self
    }

    /// Phase shown while this prompt is at the front of the queue
    pub fn phase(&self) -> GamePhase {
        match self.action {
            PromptAction::Resume => GamePhase::Paused,
            PromptAction::NewRound => GamePhase::GameOver,
            _ => GamePhase::Confirming,
        }
    }

    pub fn is_answerable(&self, now: f64) -> bool {
        now >= self.not_before
    }
}

/// Notifications for the collaborators outside the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Transient on-screen message
    Toast(String),
    /// New all-time best; persist it
    BestScore(f32),
    /// Tutorial shown; persist the flag
    TutorialFinished,
    RoundStarted { round: u32 },
    RoundOver { score: f32, highest: f32 },
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    /// Simulation clock (seconds)
    pub now: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Rounds started so far (1-based once running)
    pub round: u32,
    pub phase: GamePhase,
    /// Phase to return to once the prompt queue empties
    resume_phase: GamePhase,
    /// Every live entity, in think order
    pub entities: Vec<Entity>,
    /// Emitters shared by several entities
    pub emitters: Emitters,
    pub shop: Shop,
    pub player_id: EntityId,
    pub prompts: VecDeque<Prompt>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) next_id: u32,
    /// All-time best score as last persisted
    pub best_score: f32,
    pub tutorial_done: bool,
}

impl GameState {
    /// Create a game and start its first round
    pub fn new(seed: u64, settings: Settings, best_score: f32, tutorial_done: bool) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            now: 0.0,
            time_ticks: 0,
            round: 0,
            phase: GamePhase::Playing,
            resume_phase: GamePhase::Playing,
            entities: Vec::new(),
            emitters: Emitters::default(),
            shop: Shop::default(),
            player_id: EntityId(0),
            prompts: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
            best_score,
            tutorial_done,
        };
        state.start_round();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Throw away the round and build a fresh one around a new ship
    pub fn start_round(&mut self) {
        self.round += 1;
        self.entities.clear();
        self.emitters.clear();
        self.shop.reset();
        self.prompts.clear();
        self.phase = GamePhase::Playing;
        self.resume_phase = GamePhase::Playing;

        let resolution = self.settings.resolution();
        let scale = self.settings.particle_scale();

        self.player_id = self.next_entity_id();
        let body = Player::body(resolution);
        let mut player = Player::new(body.pos, self.best_score, self.now, scale, &mut self.rng);
        player.tutorial_pending = !self.tutorial_done;
        self.entities.push(Entity::new(
            self.player_id,
            body,
            EntityKind::Player(Box::new(player)),
        ));

        let debris = AsteroidFactory::debris_emitter(self.now, scale, &mut self.rng);
        let factory = AsteroidFactory::new(self.player_id, &mut self.emitters, debris);
        let spawner = Spawner::new(
            Box::new(factory),
            ASTEROID_SPAWN_DELAY_MS,
            ASTEROID_MAX_POPULATION,
            self.now,
            &mut self.rng,
        );
        let spawner_id = self.next_entity_id();
        self.entities.push(Entity::new(
            spawner_id,
            Body::new(Vec2::ZERO).with_render_bounds(None),
            EntityKind::Spawner(spawner),
        ));

        if !self.tutorial_done {
            self.events.push(GameEvent::Toast(WELCOME_TOAST.to_string()));
        }
        self.events.push(GameEvent::RoundStarted { round: self.round });
        log::info!("round {} started (seed {})", self.round, self.seed);
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities
            .iter()
            .find(|e| e.id == self.player_id)
            .and_then(|e| e.as_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        find_player_mut(&mut self.entities, self.player_id)
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == self.player_id)
    }

    /// Number of live asteroids
    pub fn asteroid_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_asteroid()).count()
    }

    /// Queue a prompt; the first one freezes the simulation
    pub fn open_prompt(&mut self, prompt: Prompt) {
        if self.prompts.is_empty() && matches!(self.phase, GamePhase::Playing | GamePhase::InShop) {
            self.resume_phase = self.phase;
        }
        log::debug!("prompt: {}", prompt.message);
        self.prompts.push_back(prompt);
        self.sync_phase();
    }

    /// Front prompt, if any
    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.prompts.front()
    }

    /// Answer the front prompt. Returns false when there is none or it
    /// cannot be answered yet.
    pub fn answer_prompt(&mut self, yes: bool) -> bool {
        let answerable = self
            .prompts
            .front()
            .is_some_and(|p| p.is_answerable(self.now));
        if !answerable {
            return false;
        }
        let Some(prompt) = self.prompts.pop_front() else {
            return false;
        };

        match prompt.action {
            PromptAction::Resume | PromptAction::Tutorial | PromptAction::Notice => {}
            PromptAction::Purchase(slot) => {
                if yes {
                    self.complete_purchase(slot);
                }
            }
            PromptAction::Quit => {
                if yes {
                    log::info!("quit confirmed");
                    self.prompts.clear();
                    self.phase = GamePhase::Quit;
                    return true;
                }
            }
            PromptAction::NewRound => {
                self.start_round();
                return true;
            }
        }
        self.sync_phase();
        true
    }

    /// Shop visible, possibly under a purchase prompt
    pub fn shop_open(&self) -> bool {
        self.phase == GamePhase::InShop
            || (!self.prompts.is_empty() && self.resume_phase == GamePhase::InShop)
    }

    /// Open the shop (only from live play)
    pub fn open_shop(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::InShop;
        }
    }

    /// Leave the shop; the ship comes back paused
    pub fn close_shop(&mut self) {
        if self.phase != GamePhase::InShop {
            return;
        }
        self.phase = GamePhase::Playing;
        if let Some(player) = self.player_mut() {
            player.paused = true;
        }
    }

    /// Ask for a purchase confirmation for `slot`
    pub fn select_shop_item(&mut self, slot: usize) {
        if self.phase != GamePhase::InShop {
            return;
        }
        if let Some(prompt) = self.shop.offer(slot) {
            self.open_prompt(prompt);
        }
    }

    pub fn request_quit(&mut self) {
        self.open_prompt(Prompt::confirm(QUIT_MESSAGE, PromptAction::Quit));
    }

    /// The round is lost: report it and wait for the player
    pub(crate) fn game_over(&mut self) {
        if let Some(player) = self.player() {
            let (score, highest) = (player.score, player.highest_this_round);
            log::info!("round {} over: score {:.1}, round best {:.1}", self.round, score, highest);
            self.events.push(GameEvent::RoundOver { score, highest });
        }
        self.open_prompt(
            Prompt::acknowledge(GAME_OVER_MESSAGE, PromptAction::NewRound)
                .with_not_before(self.now + GAME_OVER_IGNORE_MS / 1000.0),
        );
    }

    /// Hand queued events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn complete_purchase(&mut self, slot: usize) {
        let Some(player) = find_player_mut(&mut self.entities, self.player_id) else {
            return;
        };
        let outcome = self.shop.purchase(slot, player);
        match &outcome {
            PurchaseOutcome::CannotAfford => {
                self.prompts
                    .push_front(Prompt::acknowledge(CANNOT_AFFORD_MESSAGE, PromptAction::Notice));
            }
            _ => {
                if let Some(text) = outcome.toast() {
                    self.events.push(GameEvent::Toast(text));
                }
            }
        }
    }

    fn sync_phase(&mut self) {
        if self.phase == GamePhase::Quit {
            return;
        }
        self.phase = match self.prompts.front() {
            Some(prompt) => prompt.phase(),
            None => self.resume_phase,
        };
    }
}

fn find_player_mut(entities: &mut [Entity], id: EntityId) -> Option<&mut Player> {
    entities
        .iter_mut()
        .find(|e| e.id == id)
        .and_then(|e| e.as_player_mut())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Settings::default(), 0.0, true)
    }

    #[test]
    fn test_new_round_layout() {
        let mut state = state();
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.entities.len(), 2);
        assert!(state.player().is_some());
        assert!(matches!(state.entities[1].kind, EntityKind::Spawner(_)));
        assert_eq!(state.drain_events(), vec![GameEvent::RoundStarted { round: 1 }]);
    }

    #[test]
    fn test_first_run_welcomes_and_queues_tutorial() {
        let mut state = GameState::new(7, Settings::default(), 0.0, false);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::Toast(WELCOME_TOAST.to_string()));
        assert!(state.player().is_some_and(|p| p.tutorial_pending));
    }

    #[test]
    fn test_prompts_queue_and_resume() {
        let mut state = state();
        state.open_prompt(Prompt::acknowledge("one", PromptAction::Tutorial));
        state.open_prompt(Prompt::acknowledge("paused", PromptAction::Resume));
        assert_eq!(state.phase, GamePhase::Confirming);
        assert!(state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.answer_prompt(true));
    }

    #[test]
    fn test_game_over_ignores_early_answers() {
        let mut state = state();
        state.game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        state.now += 0.5;
        assert!(!state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::GameOver);
        state.now += 0.5;
        assert!(state.answer_prompt(true));
        assert_eq!(state.round, 2);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut state = state();
        state.request_quit();
        assert!(state.answer_prompt(false));
        assert_eq!(state.phase, GamePhase::Playing);
        state.request_quit();
        assert!(state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::Quit);
    }

    #[test]
    fn test_shop_purchase_flow() {
        let mut state = state();
        state.drain_events();
        if let Some(player) = state.player_mut() {
            player.score = 700.0;
        }
        state.open_shop();
        state.select_shop_item(0);
        assert_eq!(state.phase, GamePhase::Confirming);
        assert!(state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::InShop);
        assert_eq!(state.player().map(|p| p.score), Some(200.0));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Toast("You bought 'Efficient Engine 1' for 500 points!".into())]
        );

        // Too poor for the upgrade: a notice, then back to the shop
        state.select_shop_item(0);
        assert!(state.answer_prompt(true));
        assert_eq!(state.pending_prompt().map(|p| p.message.as_str()), Some(CANNOT_AFFORD_MESSAGE));
        assert!(state.answer_prompt(true));
        assert_eq!(state.phase, GamePhase::InShop);

        state.close_shop();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player().is_some_and(|p| p.paused));
    }

    #[test]
    fn test_declined_purchase_changes_nothing() {
        let mut state = state();
        if let Some(player) = state.player_mut() {
            player.score = 10_000.0;
        }
        state.open_shop();
        state.select_shop_item(2);
        assert!(state.answer_prompt(false));
        assert_eq!(state.player().map(|p| p.score), Some(10_000.0));
        assert_eq!(state.shop.items[2].level, 0);
    }
}
