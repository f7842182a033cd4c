//! Operator CLI for a ChatBox board.
//!
//! Plays the relayer role: signs posts with a local key file and applies them
//! to a board state file, using the same JSON encoding the board contract
//! replicates. Anyone holding a signed post can submit it, so the key used to
//! sign need not belong to whoever runs the command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use tracing::debug;

use chatbox_common::auth::{SignatureDomain, SignedPost};
use chatbox_common::board::MessageBoard;
use chatbox_common::identity::AuthorId;

#[derive(Parser)]
#[command(name = "chatbox", about = "ChatBox message board CLI")]
struct Cli {
    /// Board state file (JSON). Created on the first write if missing.
    #[arg(long, default_value = "board.json")]
    board: PathBuf,

    /// Signature domain: application name.
    #[arg(long, default_value = "ChatBox")]
    name: String,

    /// Signature domain: payload schema version.
    #[arg(long, default_value = "1")]
    version: String,

    /// Signature domain: chain id of the target network.
    #[arg(long, default_value_t = 1)]
    chain_id: u64,

    /// Signature domain: board contract instance.
    #[arg(long, default_value = "dev")]
    instance: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a fresh ed25519 signing key.
    Keygen {
        /// Where to write the key (JSON).
        #[arg(long, default_value = "chatbox-key.json")]
        out: PathBuf,
    },
    /// Sign a message with the key and post it to the board.
    Post {
        /// Signing key file.
        #[arg(long, default_value = "chatbox-key.json")]
        key: PathBuf,
        /// Message contents.
        contents: String,
    },
    /// Like a message by id, as the key's identity.
    Like {
        /// Signing key file (only the public half is used).
        #[arg(long, default_value = "chatbox-key.json")]
        key: PathBuf,
        /// Id of the message to like.
        id: u64,
    },
    /// Print the board's slots in storage order.
    Show,
    /// Print the id the next post will receive.
    NextId,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Cli {
        board: board_path,
        name,
        version,
        chain_id,
        instance,
        command,
    } = Cli::parse();

    let domain = SignatureDomain {
        name,
        version,
        chain_id,
        instance,
    };

    match command {
        Command::Keygen { out } => {
            let key = SigningKey::generate(&mut OsRng);
            fs::write(&out, serde_json::to_vec(&key)?)
                .with_context(|| format!("writing key file {}", out.display()))?;
            println!(
                "wrote {} (author {})",
                out.display(),
                short_key(&AuthorId(key.verifying_key()))
            );
        }
        Command::Post { key, contents } => {
            let key = load_key(&key)?;
            let mut board = load_board(&board_path)?;
            let post = SignedPost::sign(&key, &domain, contents);
            let event = board
                .send_message(&domain, &post)
                .context("board rejected the post")?;
            save_board(&board_path, &board)?;
            println!("message {} posted by {}", event.id, short_key(&event.author));
        }
        Command::Like { key, id } => {
            let key = load_key(&key)?;
            let mut board = load_board(&board_path)?;
            let event = board
                .like_message(id, AuthorId(key.verifying_key()))
                .context("board rejected the like")?;
            save_board(&board_path, &board)?;
            println!(
                "message {} (by {}) liked by {}",
                event.id,
                short_key(&event.author),
                short_key(&event.liker)
            );
        }
        Command::Show => {
            let board = load_board(&board_path)?;
            for (index, message) in board.last_messages().iter().enumerate() {
                match &message.author {
                    None => println!("slot {index}: (empty)"),
                    Some(author) => println!(
                        "slot {index}: #{} [{} likes] {}: {}",
                        message.id,
                        message.likes,
                        short_key(author),
                        message.contents
                    ),
                }
            }
        }
        Command::NextId => {
            let board = load_board(&board_path)?;
            println!("{}", board.next_id());
        }
    }

    Ok(())
}

fn load_board(path: &Path) -> Result<MessageBoard> {
    if !path.exists() {
        debug!("no board file at {}, starting empty", path.display());
        return Ok(MessageBoard::new());
    }
    let bytes =
        fs::read(path).with_context(|| format!("reading board file {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing board file {}", path.display()))
}

fn save_board(path: &Path, board: &MessageBoard) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(board)?;
    fs::write(path, bytes).with_context(|| format!("writing board file {}", path.display()))
}

fn load_key(path: &Path) -> Result<SigningKey> {
    let bytes = fs::read(path).with_context(|| format!("reading key file {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing key file {}", path.display()))
}

/// Abbreviated hex rendering of an author key for display.
fn short_key(author: &AuthorId) -> String {
    author.0.as_bytes()[..6]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
