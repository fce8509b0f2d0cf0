//! Conversation store - SQLite persistence / 会话存储
//!
//! 存储方案：
//! - 单表 conversations：id 为主键，content 为规范化后的会话文本
//! - SQLite + WAL 模式，批量写入走单个事务 + 重试机制
//!
//! 特性：
//! - 幂等建表（不清除已有数据）
//! - 按 id 插入或替换（重复摄入同一份导出不会产生重复行）
//! - 大小写不敏感的子串搜索，空查询匹配所有记录

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::ConversationRecord;

/// Conversation store handle / 会话存储句柄
///
/// Opened by the frontend at startup and closed at shutdown. All writes to
/// the underlying table go through this handle.
pub struct ConversationStore {
    db: Pool<Sqlite>,
    /// Serializes batch writes so two ingest calls cannot interleave / 写锁
    write_lock: Mutex<()>,
}

impl ConversationStore {
    /// Open (and create if needed) the database file / 打开数据库文件
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.to_string_lossy());
        let db = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&db_url)
            .await?;

        // 启用WAL模式，提高并发性能
        sqlx::query("PRAGMA journal_mode=WAL").execute(&db).await?;
        // 设置busy_timeout，避免锁超时
        sqlx::query("PRAGMA busy_timeout=5000").execute(&db).await?;
        // 优化写入性能
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&db).await?;

        tracing::info!("Conversation database opened: {:?} (WAL mode)", db_path);
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    /// In-memory store for tests / 测试用内存数据库
    ///
    /// Single connection: with sqlx every pooled connection to `:memory:` is
    /// a separate database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    /// Create the conversations table if missing / 幂等建表
    /// 只在表不存在时创建，不删除已有数据
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Insert or replace a batch of records / 批量插入或替换 - 带重试机制
    ///
    /// The whole batch is applied in one transaction: after a failure the
    /// table looks as if the batch was never attempted. Records are applied
    /// in input order, so a duplicate id within one batch resolves to the
    /// last occurrence.
    pub async fn upsert(&self, records: &[ConversationRecord]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;

        // 重试机制：最多重试3次
        let max_retries = 3u32;
        let mut last_error = String::new();

        for attempt in 0..max_retries {
            match self.do_upsert(records).await {
                Ok(count) => return Ok(count),
                Err(e) => {
                    let message = e.to_string();
                    if message.contains("database is locked") || message.contains("SQLITE_BUSY") {
                        // 数据库锁定，等待后重试
                        let delay = 100 * u64::from(attempt + 1);
                        tracing::debug!(
                            "Database locked, retrying in {}ms (attempt {}/{})",
                            delay,
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                        last_error = message;
                        continue;
                    }
                    return Err(StoreError::Database(e));
                }
            }
        }

        Err(StoreError::Busy {
            retries: max_retries,
            message: last_error,
        })
    }

    /// 实际执行批量写入（单事务）
    async fn do_upsert(&self, records: &[ConversationRecord]) -> Result<u64, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        for record in records {
            sqlx::query("INSERT OR REPLACE INTO conversations (id, content) VALUES (?, ?)")
                .bind(&record.id)
                .bind(&record.content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    /// Case-insensitive substring search over stored content / 子串搜索
    ///
    /// Matching is plain containment against the lower-cased content; the
    /// returned content keeps its original casing. An empty term matches
    /// every record. Results come back ordered by id.
    pub async fn search(&self, term: &str) -> Result<Vec<ConversationRecord>, StoreError> {
        let needle = term.to_lowercase();

        let rows = sqlx::query_as::<_, ConversationRecord>(
            "SELECT id, content FROM conversations ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|record| record.content.to_lowercase().contains(&needle))
            .collect())
    }

    /// Number of stored conversations / 已存储的会话数
    pub async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations")
            .fetch_one(&self.db)
            .await?;
        let count: i64 = row.get("cnt");
        Ok(count as u64)
    }

    /// Close the database connection pool / 关闭数据库连接池
    pub async fn close(&self) {
        self.db.close().await;
    }
}
