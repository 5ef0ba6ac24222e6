use std::collections::HashSet;

use crate::api::{ChangeEvent, ChatMessage, Error, MessageId, Store};

/// The displayed chat transcript, kept current by append-merge: each
/// insert notification is appended in place, at most once per message id
/// however many deliveries arrive for it.
#[derive(Debug, Default)]
pub struct ChatView {
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
    reload_seq: u64,
}

/// Identifies one reload round; a ticket from an older round no longer
/// installs, so a slow bulk fetch cannot erase messages appended since.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReloadTicket(u64);

impl ChatView {
    pub fn new() -> ChatView {
        ChatView::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns whether the message was actually appended (false for a
    /// redelivery of an id already on display)
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.id) {
            tracing::debug!(message = ?message.id, "skipping redelivered chat message");
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Full-reload fallback; keeps the first occurrence per id
    pub fn replace_all(&mut self, messages: Vec<ChatMessage>) {
        let ticket = self.begin_reload();
        self.complete_reload(ticket, messages);
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.reload_seq += 1;
        ReloadTicket(self.reload_seq)
    }

    /// Swap the transcript for `messages`, unless the ticket went stale
    /// in the meantime. Returns whether it installed.
    pub fn complete_reload(&mut self, ticket: ReloadTicket, messages: Vec<ChatMessage>) -> bool {
        if ticket.0 != self.reload_seq {
            tracing::info!("dropping stale chat reload response");
            return false;
        }
        self.messages = Vec::with_capacity(messages.len());
        self.seen = HashSet::with_capacity(messages.len());
        for m in messages {
            self.append(m);
        }
        true
    }

    pub fn handle_event(&mut self, event: &ChangeEvent) -> bool {
        match event {
            ChangeEvent::MessageInserted(m) => self.append(m.clone()),
            _ => false,
        }
    }

    /// Bulk-fetch the transcript and replace the display. On failure the
    /// transcript on display stays exactly as it was.
    pub async fn reload<S: Store>(&mut self, store: &S) -> Result<(), Error> {
        let ticket = self.begin_reload();
        let messages = store.list_messages().await?;
        self.complete_reload(ticket, messages);
        Ok(())
    }
}
