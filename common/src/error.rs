use thiserror::Error;

/// Failures of the board's mutating operations.
///
/// Every variant is raised before any state change, so a failed call leaves
/// the board exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A post was submitted with empty contents.
    #[error("message contents must not be empty")]
    EmptyMessage,
    /// A like targeted an id that was never issued or whose slot has been
    /// overwritten by a later message.
    #[error("message {0} does not exist on the board")]
    MessageDoesntExist(u64),
    /// The post's signature does not verify under the claimed author and
    /// this board's domain.
    #[error("signature does not verify for the claimed author")]
    InvalidSignature,
}
