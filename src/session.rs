//! Frame driver
//!
//! A [`Session`] owns one game and its profile store. Each frame it runs a
//! simulation step, lets the dialog port answer whatever prompt is up, and
//! forwards game events to the toast and storage ports.

use crate::consts::SIM_DT;
use crate::platform::{Dialogs, ScoreStore, Toasts};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, InputEvent, PromptKind, tick};

pub struct Session<S: ScoreStore> {
    state: GameState,
    store: S,
}

impl<S: ScoreStore> Session<S> {
    /// Start a game seeded with the profile held by `store`
    pub fn new(seed: u64, settings: Settings, store: S) -> Self {
        let state = GameState::new(
            seed,
            settings,
            store.load_best_score(),
            store.is_tutorial_done(),
        );
        Self { state, store }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The player confirmed quitting
    pub fn is_finished(&self) -> bool {
        self.state.phase == GamePhase::Quit
    }

    /// Run one frame: simulate, resolve prompts, deliver events
    pub fn frame(&mut self, input: &[InputEvent], dialogs: &mut dyn Dialogs, toasts: &mut dyn Toasts) {
        tick(&mut self.state, input, SIM_DT);
        self.resolve_prompts(dialogs);
        self.deliver_events(toasts);
    }

    fn resolve_prompts(&mut self, dialogs: &mut dyn Dialogs) {
        while let Some(prompt) = self.state.pending_prompt() {
            if !prompt.is_answerable(self.state.now) {
                return;
            }
            let answer = match prompt.kind {
                PromptKind::Confirm => dialogs.confirm(&prompt.message),
                PromptKind::Acknowledge => dialogs.acknowledge(&prompt.message).then_some(true),
            };
            let Some(yes) = answer else {
                return;
            };
            if !self.state.answer_prompt(yes) {
                return;
            }
        }
    }

    fn deliver_events(&mut self, toasts: &mut dyn Toasts) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Toast(text) => toasts.popup(&text),
                GameEvent::BestScore(score) => self.store.save_best_score(score),
                GameEvent::TutorialFinished => self.store.mark_tutorial_done(),
                GameEvent::RoundStarted { round } => log::debug!("round {} running", round),
                GameEvent::RoundOver { score, highest } => {
                    log::info!("round over with {:.1} left of {:.1}", score, highest)
                }
            }
        }
    }
}
