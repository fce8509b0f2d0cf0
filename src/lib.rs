pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod search;
pub mod store;
pub mod utils;

pub use error::{ArchiveError, ExtractError, IngestError, StoreError};
pub use ingest::{ingest_archive, ingest_with_config};
pub use models::{ConversationRecord, FailedFile, IngestReport, SearchHit};
pub use search::{search_conversations, PREVIEW_CHARS};
pub use store::ConversationStore;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber (call once from the frontend at startup) / 初始化日志
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatsearch_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
