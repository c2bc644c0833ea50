//! Keyword-driven workflow assistant.
//!
//! Replies are canned; the only side effect is the occasional suggestion to
//! add a node, which the editor carries out.

use chrono::Utc;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{catalog::NodeType, graph::Graph};

pub const GREETING: &str = "How can I help you build your workflow today?";
pub const DEPLOYED: &str = "Your workflow has been successfully deployed! It's now available in your profile.";

/// Every reply opens with this.
const PREFIX: &str = "I'll help you with that! ";

const FALLBACK: &str =
    "What specific functionality are you trying to add to your workflow? I can help with payments, messaging, data transformation, and more.";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// unix millis
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(
        role: ChatRole,
        content: &str,
    ) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// node type to add when the graph has none yet
    pub add_node: Option<NodeType>,
}

struct Rule {
    pattern: Regex,
    reply: &'static str,
    add_node: Option<&'static str>,
}

const RULES: &[(&str, &str, Option<&str>)] = &[
    (
        r"sms",
        "To add SMS functionality, drag the AfricasTalking SMS node from the library to the canvas. You can then configure the recipient number and message content.",
        Some("messaging"),
    ),
    (
        r"payment",
        "For payment processing, use the M-Pesa node which integrates with the popular mobile money service in East Africa.",
        None,
    ),
    (
        r"condition|\bif\b",
        "You can add conditional logic with the Condition node, which allows you to create different paths based on your data.",
        None,
    ),
];

pub struct Assistant {
    transcript: Vec<ChatMessage>,
    rules: Vec<Rule>,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new()
    }
}

impl Assistant {
    pub fn new() -> Self {
        let mut rules = Vec::with_capacity(RULES.len());
        for (pattern, reply, add_node) in RULES {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => rules.push(Rule {
                    pattern: regex,
                    reply: *reply,
                    add_node: *add_node,
                }),
                Err(e) => warn!(pattern, error = %e, "assistant rule skipped: invalid pattern"),
            }
        }

        Self {
            transcript: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            rules,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Record the user's message and answer it. Blank input is ignored.
    pub fn chat(
        &mut self,
        input: &str,
        graph: &Graph,
    ) -> Option<Reply> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::new(ChatRole::User, input));

        let reply = match self.rules.iter().find(|r| r.pattern.is_match(input)) {
            Some(rule) => Reply {
                text: format!("{}{}", PREFIX, rule.reply),
                add_node: rule.add_node.map(NodeType::from).filter(|t| !graph.contains_node_type(t)),
            },
            None => Reply {
                text: format!("{}{}", PREFIX, FALLBACK),
                add_node: None,
            },
        };
        debug!(add_node = ?reply.add_node, "assistant replied");

        self.say(&reply.text);
        Some(reply)
    }

    /// Append an assistant message, e.g. a deploy confirmation.
    pub fn say(
        &mut self,
        content: &str,
    ) {
        self.transcript.push(ChatMessage::new(ChatRole::Assistant, content));
    }
}
