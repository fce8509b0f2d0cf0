use serde::{Deserialize, Serialize};

/// One conversation as persisted / 单条会话记录
///
/// `content` is the canonical serialized form of the exported payload;
/// search runs over this text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationRecord {
    pub id: String,
    pub content: String,
}

/// A record file that could not be parsed / 解析失败的记录文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of one ingest call / 单次摄入结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records written to the store / 写入的记录数
    pub inserted: u64,
    /// Entries dropped for missing id/content fields / 缺字段被跳过的条目数
    pub skipped: u64,
    /// Record files that failed to parse / 解析失败的文件
    pub failed_files: Vec<FailedFile>,
}

/// Display-ready search result / 搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// First 100 characters of the stored content / 内容前100个字符
    pub preview: String,
}
