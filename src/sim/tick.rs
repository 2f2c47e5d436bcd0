//! Fixed cadence simulation tick
//!
//! One call advances the clock, routes input, and (while playing) runs the
//! notify → think → reap → move phases over the entity list.

use super::entity::{Others, TickContext};
use super::state::{GameEvent, GamePhase, GameState};

/// Logical keys; the platform layer maps physical keys onto these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Thrust,
    Reverse,
    RotateLeft,
    RotateRight,
    Fire,
    Pause,
    Shop,
    Escape,
    Confirm,
    /// Shop catalogue slot
    Slot(usize),
    Other,
}

/// A discrete input event for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Advance the game by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &[InputEvent], dt: f64) {
    if state.phase == GamePhase::Quit {
        return;
    }
    state.now += dt;
    state.time_ticks += 1;

    let forwarded = route_input(state, input);
    for entity in &mut state.entities {
        for event in &forwarded {
            entity.notify(event);
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    run_entities(state);
}

/// Handle game-level keys and modal answers; returns what entities should see
fn route_input(state: &mut GameState, input: &[InputEvent]) -> Vec<InputEvent> {
    let mut forwarded = Vec::with_capacity(input.len());
    for &event in input {
        match (state.phase, event) {
            (GamePhase::Quit, _) => break,
            (GamePhase::Playing, InputEvent::Pressed(Key::Escape)) => state.request_quit(),
            (GamePhase::Playing, InputEvent::Pressed(Key::Shop)) => state.open_shop(),
            (GamePhase::Playing, _) => forwarded.push(event),
            // Releases always get through so held controls never stick
            (_, InputEvent::Released(_)) => forwarded.push(event),
            (GamePhase::InShop, InputEvent::Pressed(Key::Shop | Key::Escape)) => state.close_shop(),
            (GamePhase::InShop, InputEvent::Pressed(Key::Slot(slot))) => state.select_shop_item(slot),
            (GamePhase::InShop, InputEvent::Pressed(_)) => {}
            (GamePhase::GameOver, InputEvent::Pressed(_)) => {
                state.answer_prompt(true);
            }
            (_, InputEvent::Pressed(Key::Confirm)) => {
                state.answer_prompt(true);
            }
            (_, InputEvent::Pressed(Key::Escape)) => {
                state.answer_prompt(false);
            }
            (_, InputEvent::Pressed(_)) => {}
        }
    }
    forwarded
}

/// Think in collection order, then reap, then move
fn run_entities(state: &mut GameState) {
    let first_new_event = state.events.len();
    let GameState {
        now,
        rng,
        emitters,
        settings,
        events,
        next_id,
        entities,
        ..
    } = state;
    let mut ctx = TickContext::new(*now, rng, emitters, settings, events, next_id);

    let mut index = 0;
    while index < entities.len() {
        let (before, rest) = entities.split_at_mut(index);
        if let Some((current, after)) = rest.split_first_mut() {
            let mut others = Others::new(before, after);
            current.think(&mut others, &mut ctx);
        }
        // New entities think later in this same tick
        entities.extend(ctx.take_spawned());
        index += 1;
    }
    let prompts = ctx.take_prompts();
    let reset_requested = ctx.reset_requested;

    entities.retain(|e| !e.body.remove);
    for entity in entities.iter_mut() {
        entity.body.move_step();
    }

    for event in &state.events[first_new_event..] {
        match event {
            GameEvent::BestScore(best) => state.best_score = *best,
            GameEvent::TutorialFinished => state.tutorial_done = true,
            _ => {}
        }
    }
    for prompt in prompts {
        state.open_prompt(prompt);
    }
    if reset_requested {
        state.game_over();
    }
}
