//! Search service / 搜索服务
//!
//! Read-side projection over the conversation store: matches come back as
//! (id, preview) pairs sized for a result grid.

use crate::error::StoreError;
use crate::models::SearchHit;
use crate::store::ConversationStore;
use crate::utils::truncate_chars;

/// Preview length in characters / 预览长度（按字符数）
pub const PREVIEW_CHARS: usize = 100;

/// Search stored conversations / 搜索已存储的会话
///
/// Delegates the substring match to the store and truncates each match's
/// content to the first [`PREVIEW_CHARS`] characters. Content shorter than
/// that is returned whole. A query with no matches returns an empty list.
pub async fn search_conversations(
    store: &ConversationStore,
    term: &str,
) -> Result<Vec<SearchHit>, StoreError> {
    let matches = store.search(term).await?;
    tracing::debug!("Search for {:?} matched {} conversations", term, matches.len());

    Ok(matches
        .into_iter()
        .map(|record| {
            let preview = truncate_chars(&record.content, PREVIEW_CHARS).to_string();
            SearchHit {
                id: record.id,
                preview,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationRecord;

    async fn setup(records: &[ConversationRecord]) -> ConversationStore {
        let store = ConversationStore::open_in_memory().await.unwrap();
        store.init().await.unwrap();
        store.upsert(records).await.unwrap();
        store
    }

    fn record(id: &str, content: &str) -> ConversationRecord {
        ConversationRecord {
            id: id.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_short_content_is_returned_whole() {
        let store = setup(&[record("a", "short text")]).await;

        let hits = search_conversations(&store, "short").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].preview, "short text");
    }

    #[tokio::test]
    async fn test_long_content_is_truncated_to_100_chars() {
        let long = "x".repeat(250);
        let store = setup(&[record("a", &long)]).await;

        let hits = search_conversations(&store, "xxx").await.unwrap();
        assert_eq!(hits[0].preview.chars().count(), PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn test_truncation_counts_characters_not_bytes() {
        // 120 three-byte characters
        let long = "搜".repeat(120);
        let store = setup(&[record("a", &long)]).await;

        let hits = search_conversations(&store, "搜").await.unwrap();
        assert_eq!(hits[0].preview.chars().count(), PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn test_no_match_returns_empty_list() {
        let store = setup(&[record("a", "hello")]).await;
        let hits = search_conversations(&store, "absent").await.unwrap();
        assert!(hits.is_empty());
    }
}
