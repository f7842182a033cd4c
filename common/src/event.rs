use serde::{Deserialize, Serialize};

use crate::identity::AuthorId;

/// Emitted when a post is accepted onto the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSent {
    pub id: u64,
    pub author: AuthorId,
}

/// Emitted when a live message receives a like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLiked {
    pub id: u64,
    pub liker: AuthorId,
    pub author: AuthorId,
}

/// Either event, as produced by [`crate::board::MessageBoard::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    Sent(MessageSent),
    Liked(MessageLiked),
}
