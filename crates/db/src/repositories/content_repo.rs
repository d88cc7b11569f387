//! Cross-table content lookups keyed by content type.
//!
//! The moderation pipeline does not own content storage; it only needs to
//! resolve "does this content still exist" by (content_type, content_id).

use sqlx::PgPool;

use pawlink_core::types::DbId;

/// Provides existence checks against the content tables.
pub struct ContentRepo;

impl ContentRepo {
    /// Check whether the content referenced by a case still exists.
    ///
    /// Unknown content types resolve to `false` rather than erroring; the
    /// engine treats that the same as vanished content.
    pub async fn exists(
        pool: &PgPool,
        content_type: &str,
        content_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let table = match content_table(content_type) {
            Some(table) => table,
            None => return Ok(false),
        };
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(content_id)
            .fetch_one(pool)
            .await
    }
}

/// Map a content type name to its owning table.
fn content_table(content_type: &str) -> Option<&'static str> {
    match content_type {
        "post" => Some("posts"),
        "comment" => Some("comments"),
        "media" => Some("media_items"),
        "wiki_revision" => Some("wiki_revisions"),
        _ => None,
    }
}
