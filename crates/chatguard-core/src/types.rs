//! Core types for ChatGuard

use serde::{Deserialize, Serialize};

/// A chat message as kept in a room's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: String,

    /// Name of the player or staff member who sent the message
    pub sender: String,

    /// Raw message text
    pub content: String,

    /// Send time in milliseconds, as supplied by the caller
    #[serde(default)]
    pub sent_at_ms: u64,

    /// Moderation flag, if the message is blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<Flag>,
}

impl ChatMessage {
    /// Create a new, unflagged chat message
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
        sent_at_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            content: content.into(),
            sent_at_ms,
            flag: None,
        }
    }

    /// Attach a flag to this message
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Whether the message is currently blocked
    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }

    /// Whether the message's status belongs to the message classifier.
    ///
    /// Clear messages and `filter` flags are owned by the classifier; flags
    /// raised by signals or moderators are not.
    pub fn is_filter_owned(&self) -> bool {
        match &self.flag {
            None => true,
            Some(flag) => flag.origin == FlagOrigin::Filter,
        }
    }
}

/// Why and by whom a message was blocked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    /// Mechanism that raised the flag
    pub origin: FlagOrigin,

    /// Human-readable reason, e.g. `SPAM: CAPS (91%)`
    pub reason: String,
}

impl Flag {
    /// Flag raised by the message classifier
    pub fn filter(reason: impl Into<String>) -> Self {
        Self {
            origin: FlagOrigin::Filter,
            reason: reason.into(),
        }
    }

    /// Flag raised by a named content signal
    pub fn signal(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: FlagOrigin::Signal { name: name.into() },
            reason: reason.into(),
        }
    }

    /// Flag raised by a moderator
    pub fn manual(moderator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: FlagOrigin::Manual {
                moderator: moderator.into(),
            },
            reason: reason.into(),
        }
    }
}

/// Mechanism that raised a flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlagOrigin {
    /// Message classifier (caps / repeat rules)
    Filter,

    /// External content signal such as the toxicity lexicon
    Signal {
        /// Signal name
        name: String,
    },

    /// Moderator action
    Manual {
        /// Moderator who flagged the message
        moderator: String,
    },
}
