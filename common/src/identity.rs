use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

/// A message author's public identity.
///
/// The board has no accounts; an author is simply the ed25519 verifying key
/// their posts must verify under. The transaction submitter (relayer) never
/// appears in the data model, only the signing author does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorId(pub VerifyingKey);

impl PartialEq for AuthorId {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes() == other.0.as_bytes()
    }
}
impl Eq for AuthorId {}

impl PartialOrd for AuthorId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for AuthorId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_bytes().cmp(other.0.as_bytes())
    }
}
impl Hash for AuthorId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_bytes().hash(state);
    }
}
