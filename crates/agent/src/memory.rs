use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::llm::{ChatMessage, ChatRole};

#[derive(Clone, Debug)]
pub struct Turn {
    pub role: ChatRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Ordered in-process conversation history, appended after each exchange
/// and discarded at process exit. Bounded: the oldest turns fall off once
/// the limit is reached.
#[derive(Clone, Debug)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    limit: usize,
}

impl ConversationMemory {
    pub fn new(limit: usize) -> Self {
        Self { turns: VecDeque::new(), limit: limit.max(1) }
    }

    pub fn record_user(&mut self, content: impl Into<String>) {
        self.push(ChatRole::User, content.into());
    }

    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatRole::Assistant, content.into());
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.turns.push_back(Turn { role, content, at: Utc::now() });
        while self.turns.len() > self.limit {
            self.turns.pop_front();
        }
    }

    pub fn as_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|turn| ChatMessage { role: turn.role, content: turn.content.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::llm::ChatRole;

    use super::ConversationMemory;

    #[test]
    fn turns_are_kept_in_order() {
        let mut memory = ConversationMemory::new(10);
        memory.record_user("first");
        memory.record_assistant("second");

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn oldest_turns_fall_off_at_the_limit() {
        let mut memory = ConversationMemory::new(3);
        for index in 0..5 {
            memory.record_user(format!("turn {index}"));
        }

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "turn 2");
        assert_eq!(messages[2].content, "turn 4");
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let mut memory = ConversationMemory::new(0);
        memory.record_user("only");
        memory.record_user("kept");
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.as_messages()[0].content, "kept");
    }
}
