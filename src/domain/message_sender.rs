use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who authored a message. Closed set: history snapshots and the LLM role
/// mapping branch exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageSender {
    User,
    Bot,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSender::User => "USER",
            MessageSender::Bot => "BOT",
        }
    }
}

impl FromStr for MessageSender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(MessageSender::User),
            "BOT" => Ok(MessageSender::Bot),
            _ => Err(format!("Invalid message sender: {}", s)),
        }
    }
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
