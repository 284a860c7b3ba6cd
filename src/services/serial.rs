//! Per-user serial numbers for items.
//!
//! Serial numbers are decimal strings counting up from `1` for each owner.
//! The highest existing serial is taken numerically, so `"10"` follows `"9"`;
//! values that are not plain digit strings are ignored when picking it.

use sqlx::PgExecutor;
use uuid::Uuid;

/// Serials longer than this cannot be represented as `i64` and are skipped.
const MAX_SN_DIGITS: usize = 18;

/// Computes the serial following the highest numeric one in `existing`.
pub fn next_sn<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_sn)
        .max()
        .map_or(1, |last| last + 1)
        .to_string()
}

fn parse_sn(sn: &str) -> Option<i64> {
    let sn = sn.trim();
    if sn.is_empty() || sn.len() > MAX_SN_DIGITS || !sn.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    sn.parse().ok()
}

/// Returns the serial the next item created by `user_id` would receive.
///
/// This is a plain read; creating an item must hold the owner's sequence
/// lock (see [`lock_sequence`]) for the value to stay unique.
pub async fn allocate_next_sn<'e, E>(executor: E, user_id: Uuid) -> Result<String, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let last: Option<String> = sqlx::query_scalar(
        r#"
        SELECT sn FROM items
        WHERE user_id = $1 AND sn ~ '^[0-9]{1,18}$'
        ORDER BY sn::bigint DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(next_sn(last.as_deref()))
}

/// Serialises serial allocation for one owner until the surrounding
/// transaction ends. Fails with `RowNotFound` when the user is unknown.
pub async fn lock_sequence<'e, E>(executor: E, user_id: Uuid) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_one(executor)
        .await?;
    Ok(())
}
