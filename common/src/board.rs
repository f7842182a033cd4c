//! The message board state machine.
//!
//! A fixed arena of [`BOARD_CAPACITY`] slots indexed by `id % BOARD_CAPACITY`
//! holds the most recent messages. `next_id` only ever grows, so each accepted
//! message gets a fresh id; once more than [`BOARD_CAPACITY`] messages have
//! been sent, every new message overwrites the oldest slot in place and the
//! evicted message is unrecoverable.

use serde::{Deserialize, Serialize};

use crate::auth::{SignatureDomain, SignedPost};
use crate::error::BoardError;
use crate::event::{BoardEvent, MessageLiked, MessageSent};
use crate::identity::AuthorId;

/// Number of simultaneously retrievable messages.
pub const BOARD_CAPACITY: usize = 10;

/// One slot of the circular buffer.
///
/// `author == None` marks a slot that has never been written; the board
/// starts with all slots in that state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub author: Option<AuthorId>,
    pub contents: String,
    pub likes: u64,
}

impl Message {
    /// Whether this slot has never held a message.
    pub fn is_sentinel(&self) -> bool {
        self.author.is_none()
    }
}

/// Parameters that make each board contract unique.
///
/// The domain doubles as the signature-binding context for all posts, so two
/// boards with different parameters never accept each other's signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardParameters {
    pub domain: SignatureDomain,
}

/// A single relayed operation against the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoardUpdate {
    Post(SignedPost),
    Like { id: u64, liker: AuthorId },
}

/// Summary for the delta sync protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub next_id: u64,
    /// Like count per slot, in storage order.
    #[serde(default)]
    pub slot_likes: Vec<u64>,
}

/// The board state: id counter plus the circular message buffer.
///
/// Slots are exclusively owned by the board; all mutation goes through
/// [`send_message`](Self::send_message) and
/// [`like_message`](Self::like_message), each of which checks every
/// precondition before touching any state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBoard {
    next_id: u64,
    slots: [Message; BOARD_CAPACITY],
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBoard {
    /// A board with every slot empty and the id counter at zero.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            slots: std::array::from_fn(|_| Message::default()),
        }
    }

    /// The id the next accepted message will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    fn slot_index(id: u64) -> usize {
        (id % BOARD_CAPACITY as u64) as usize
    }

    /// The full slot array in storage order.
    ///
    /// Storage order is `id % BOARD_CAPACITY`, not chronological: after a
    /// wraparound the array mixes relative ages by index. Always exactly
    /// [`BOARD_CAPACITY`] entries; slots never written are sentinels.
    pub fn last_messages(&self) -> &[Message; BOARD_CAPACITY] {
        &self.slots
    }

    /// Look up a live message by id.
    ///
    /// `None` if the id was never issued or its slot has since been
    /// overwritten by a later message.
    pub fn message(&self, id: u64) -> Option<&Message> {
        let slot = &self.slots[Self::slot_index(id)];
        (id < self.next_id && slot.id == id && !slot.is_sentinel()).then_some(slot)
    }

    /// Accept a post on behalf of its signing author.
    ///
    /// The submitter is irrelevant; authorship comes from the signature.
    /// Overwrites the oldest message once the board is full.
    pub fn send_message(
        &mut self,
        domain: &SignatureDomain,
        post: &SignedPost,
    ) -> Result<MessageSent, BoardError> {
        if post.contents.is_empty() {
            return Err(BoardError::EmptyMessage);
        }
        if !post.verify(domain) {
            return Err(BoardError::InvalidSignature);
        }

        let id = self.next_id;
        self.slots[Self::slot_index(id)] = Message {
            id,
            author: Some(post.author.clone()),
            contents: post.contents.clone(),
            likes: 0,
        };
        self.next_id += 1;

        Ok(MessageSent {
            id,
            author: post.author.clone(),
        })
    }

    /// Record a like against a live message.
    ///
    /// Repeat likes from the same liker accumulate; there is no dedup.
    pub fn like_message(&mut self, id: u64, liker: AuthorId) -> Result<MessageLiked, BoardError> {
        let issued = id < self.next_id;
        let slot = &mut self.slots[Self::slot_index(id)];
        let author = match &slot.author {
            Some(author) if issued && slot.id == id => author.clone(),
            _ => return Err(BoardError::MessageDoesntExist(id)),
        };
        slot.likes += 1;

        Ok(MessageLiked { id, liker, author })
    }

    /// Dispatch one relayed operation.
    pub fn apply(
        &mut self,
        domain: &SignatureDomain,
        update: BoardUpdate,
    ) -> Result<BoardEvent, BoardError> {
        match update {
            BoardUpdate::Post(post) => self.send_message(domain, &post).map(BoardEvent::Sent),
            BoardUpdate::Like { id, liker } => self.like_message(id, liker).map(BoardEvent::Liked),
        }
    }

    /// Check the structural invariants of a full board state.
    ///
    /// Signatures are not stored, so this is everything a replica can check
    /// about a state it receives: each written slot holds the newest issued
    /// id mapping to its index with non-empty contents, and slots are
    /// sentinel exactly when no issued id maps to them.
    pub fn validate(&self) -> bool {
        for (index, slot) in self.slots.iter().enumerate() {
            let written =
                self.next_id >= BOARD_CAPACITY as u64 || (index as u64) < self.next_id;
            match &slot.author {
                None => {
                    if written || *slot != Message::default() {
                        return false;
                    }
                }
                Some(_) => {
                    if !written || slot.contents.is_empty() {
                        return false;
                    }
                    let newest = self.next_id - 1;
                    let expected = newest - ((newest - index as u64) % BOARD_CAPACITY as u64);
                    if slot.id != expected {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Merge a replica of the same board into this one.
    ///
    /// The replica that has issued more ids wins wholesale; where both
    /// replicas hold the same message, the higher like count is kept.
    pub fn merge(&mut self, other: MessageBoard) {
        let (mut newer, older) = if other.next_id > self.next_id {
            (other, std::mem::take(self))
        } else {
            (std::mem::take(self), other)
        };
        for (slot, old) in newer.slots.iter_mut().zip(older.slots.iter()) {
            if slot.id == old.id && slot.author == old.author && old.likes > slot.likes {
                slot.likes = old.likes;
            }
        }
        *self = newer;
    }

    /// Produce a summary for the delta sync protocol.
    pub fn summarize(&self) -> BoardSummary {
        BoardSummary {
            next_id: self.next_id,
            slot_likes: self.slots.iter().map(|m| m.likes).collect(),
        }
    }

    /// Full state if this board holds anything the summary's sender lacks.
    pub fn delta(&self, summary: &BoardSummary) -> Option<MessageBoard> {
        let likes_match = self
            .slots
            .iter()
            .map(|m| m.likes)
            .eq(summary.slot_likes.iter().copied());
        if self.next_id <= summary.next_id && likes_match {
            None
        } else {
            Some(self.clone())
        }
    }
}
