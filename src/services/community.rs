//! Community room — per-language group chat with simulated peers.

use rand::Rng;
use rand::seq::IndexedRandom;
use time::Duration;

use crate::store::models::{Language, Message, MessageRole, now_millis};
use crate::store::{Repository, StoreError};

pub const PEERS: [&str; 4] = ["Alice", "Rahul", "Elena", "Kento"];
pub const DEFAULT_REPLY_CHANCE: f64 = 0.6;

/// Two peer messages shown in a room nobody has posted to yet.
#[must_use]
pub fn seed_messages(language: &Language) -> Vec<Message> {
    let now = now_millis();
    vec![
        Message::new(
            MessageRole::Peer,
            format!("Hi everyone! I just started learning {} today. Any tips?", language.name),
        )
        .with_id("p1")
        .with_author("Alice")
        .at(now - Duration::minutes(5)),
        Message::new(
            MessageRole::Peer,
            "Welcome Alice! I find the Lessons section here really helpful. Focus on the foundations first.",
        )
        .with_id("p2")
        .with_author("Elena")
        .at(now - Duration::minutes(2)),
    ]
}

pub struct CommunityRoom {
    repo: Repository,
    language: Language,
    messages: Vec<Message>,
    reply_chance: f64,
}

impl CommunityRoom {
    /// Open the room for `language`, seeding and saving it when empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a seeded log cannot be saved.
    pub fn open(repo: Repository, language: Language) -> Result<Self, StoreError> {
        let mut messages = repo.community_chat(&language.code);
        if messages.is_empty() {
            messages = seed_messages(&language);
            repo.save_community_chat(&language.code, &messages)?;
        }
        Ok(Self { repo, language, messages, reply_chance: DEFAULT_REPLY_CHANCE })
    }

    /// Probability (0.0–1.0) that a post draws a peer reply.
    #[cfg(test)]
    pub fn with_reply_chance(mut self, chance: f64) -> Self {
        self.reply_chance = chance.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Post with the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the room cannot be saved.
    pub fn post(&mut self, text: &str) -> Result<Option<&Message>, StoreError> {
        self.post_with_rng(text, &mut rand::rng())
    }

    /// Append the learner's message and maybe a peer reply, then save.
    /// Blank input is ignored. Returns the peer reply, if one was drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the room cannot be saved.
    pub fn post_with_rng<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Result<Option<&Message>, StoreError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.messages.push(Message::new(MessageRole::User, text));

        let replied = rng.random_bool(self.reply_chance);
        if replied {
            let peer = PEERS.choose(rng).copied().unwrap_or(PEERS[0]);
            let reply = Message::new(
                MessageRole::Peer,
                format!("That's interesting! I was thinking the same thing about {}.", self.language.name),
            )
            .with_author(peer);
            self.messages.push(reply);
        }

        self.repo.save_community_chat(&self.language.code, &self.messages)?;
        tracing::debug!(lang = %self.language.code, replied, "community: post saved");
        Ok(if replied { self.messages.last() } else { None })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog;
    use crate::store::MemoryStore;

    fn room(code: &str) -> (Repository, CommunityRoom) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let room = CommunityRoom::open(repo.clone(), catalog::language(code).unwrap()).unwrap();
        (repo, room)
    }

    #[test]
    fn empty_room_is_seeded_and_saved() {
        let (repo, room) = room("hi");
        let seeded = room.messages();
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].id, "p1");
        assert_eq!(seeded[0].author.as_deref(), Some("Alice"));
        assert!(seeded[0].content.contains("learning Hindi today"));
        assert_eq!(seeded[1].author.as_deref(), Some("Elena"));
        assert!(seeded[0].timestamp < seeded[1].timestamp);
        assert_eq!(repo.community_chat("hi"), seeded);
    }

    #[test]
    fn post_with_certain_reply_adds_peer_message() {
        let (repo, room) = room("es");
        let mut room = room.with_reply_chance(1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let reply = room.post_with_rng("¿Alguien quiere practicar?", &mut rng).unwrap().unwrap().clone();

        assert_eq!(reply.role, MessageRole::Peer);
        assert!(PEERS.contains(&reply.author.as_deref().unwrap()));
        assert!(reply.content.ends_with("about Spanish."));
        assert_eq!(repo.community_chat("es").len(), 4);
    }

    #[test]
    fn post_without_reply_saves_user_message_only() {
        let (repo, room) = room("es");
        let mut room = room.with_reply_chance(0.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(room.post_with_rng("hola", &mut rng).unwrap().is_none());
        let stored = repo.community_chat("es");
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2].role, MessageRole::User);
    }

    #[test]
    fn blank_post_is_ignored() {
        let (repo, mut room) = room("fr");
        assert!(room.post("  ").unwrap().is_none());
        assert_eq!(repo.community_chat("fr").len(), 2);
    }

    #[test]
    fn reopened_room_keeps_history() {
        let (repo, room) = room("de");
        let mut room = room.with_reply_chance(0.0);
        room.post("Guten Tag").unwrap();
        let reopened = CommunityRoom::open(repo, catalog::language("de").unwrap()).unwrap();
        assert_eq!(reopened.messages().len(), 3);
    }
}
