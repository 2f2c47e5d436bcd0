//! Platform abstraction layer
//!
//! The simulation never talks to a window, a filesystem or a person directly.
//! These ports are what the [`Session`](crate::Session) drives instead:
//! - Dialogs (yes/no questions and notices)
//! - Toasts (transient messages)
//! - Score storage (best score and the tutorial flag)

use std::collections::VecDeque;

/// Answers modal prompts
pub trait Dialogs {
    /// Yes/no question; `None` while the player has not answered
    fn confirm(&mut self, message: &str) -> Option<bool>;
    /// Notice with a single OK; returns true once dismissed
    fn acknowledge(&mut self, message: &str) -> bool;
}

/// Shows transient messages
pub trait Toasts {
    fn popup(&mut self, text: &str);
}

/// Persists the player's profile
pub trait ScoreStore {
    fn load_best_score(&self) -> f32;
    fn save_best_score(&mut self, score: f32);
    fn is_tutorial_done(&self) -> bool;
    fn mark_tutorial_done(&mut self);
}

/// Dialogs that answer immediately (headless runs)
#[derive(Debug, Clone)]
pub struct AutoDialogs {
    /// Answer given to every confirmation
    pub answer: bool,
}

impl Default for AutoDialogs {
    fn default() -> Self {
        Self { answer: true }
    }
}

impl Dialogs for AutoDialogs {
    fn confirm(&mut self, message: &str) -> Option<bool> {
        log::debug!("dialog: {} -> {}", message, self.answer);
        Some(self.answer)
    }

    fn acknowledge(&mut self, message: &str) -> bool {
        log::debug!("notice: {}", message);
        true
    }
}

/// Dialogs answered from a script, then left pending
#[derive(Debug, Clone, Default)]
pub struct ScriptedDialogs {
    pub answers: VecDeque<bool>,
    /// Every message shown, in order
    pub seen: Vec<String>,
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, message: &str) -> Option<bool> {
        let answer = self.answers.pop_front()?;
        self.seen.push(message.to_string());
        Some(answer)
    }

    fn acknowledge(&mut self, message: &str) -> bool {
        self.seen.push(message.to_string());
        true
    }
}

/// Toasts written to the log
#[derive(Debug, Clone, Default)]
pub struct LogToasts;

impl Toasts for LogToasts {
    fn popup(&mut self, text: &str) {
        log::info!("toast: {}", text);
    }
}

/// Toasts kept in memory, newest last, capped like an on-screen stack
#[derive(Debug, Clone)]
pub struct ToastStack {
    pub capacity: usize,
    pub messages: VecDeque<String>,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self {
            capacity: 10,
            messages: VecDeque::new(),
        }
    }
}

impl Toasts for ToastStack {
    fn popup(&mut self, text: &str) {
        if self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(text.to_string());
    }
}
