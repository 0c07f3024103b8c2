//! FixBot, the canned-response repair assistant.

use crate::i18n::Translator;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Topics FixBot recognizes, in priority order.
pub const KEYWORDS: [&str; 7] = ["hello", "hi", "screen", "battery", "water", "cost", "time"];

/// Keywords at least this long also match words they begin.
const PREFIX_MATCH_MIN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: usize,
    #[serde(rename = "type")]
    pub sender: Sender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// First keyword mentioned in `input`, if any.
pub fn match_keyword(input: &str) -> Option<&'static str> {
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    KEYWORDS.into_iter().find(|keyword| {
        words.iter().any(|word| {
            *word == *keyword || (keyword.len() >= PREFIX_MATCH_MIN && word.starts_with(keyword))
        })
    })
}

/// Translation key of the answer to `input`.
pub fn response_key(input: &str) -> String {
    format!("chatBot.responses.{}", match_keyword(input).unwrap_or("default"))
}

#[derive(Debug, Clone)]
pub struct FixBot {
    history: Vec<ChatMessage>,
}

impl FixBot {
    /// Start a conversation with the greeting in the current locale.
    pub fn new<S: KeyValueStore>(t: &Translator<S>) -> Self {
        let mut bot = Self {
            history: Vec::new(),
        };
        bot.push(Sender::Bot, t.t("chatBot.greeting").to_string());
        bot
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Record the user's message and FixBot's answer, returning the answer.
    /// Blank input is ignored.
    pub fn reply<S: KeyValueStore>(&mut self, t: &Translator<S>, input: &str) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.push(Sender::User, input.to_string());
        let key = response_key(input);
        self.push(Sender::Bot, t.t(&key).to_string());
        self.history.last()
    }

    fn push(&mut self, sender: Sender, message: String) {
        self.history.push(ChatMessage {
            id: self.history.len() + 1,
            sender,
            message,
            timestamp: Utc::now(),
        });
    }
}
