//! DropDeck - drop an audio file anywhere, play it right away.
//!
//! This is the core library behind the DropDeck shell. It provides the
//! document-level drag-and-drop intake with smoothed cursor feedback and the
//! lifecycle manager for the single audio source a dropped file becomes.

pub mod config;
pub mod dropzone;
pub mod error;
pub mod player;
pub mod processing;
pub mod store;

pub use config::DeckConfig;
pub use dropzone::{DragPhase, DropZone};
pub use error::{DeckError, DeckResult, TagReadError};
pub use player::{AudioSourceManager, SourceFile};
pub use store::Store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropdeck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Starting DropDeck v{}", env!("CARGO_PKG_VERSION"));
    }
    installed
}
