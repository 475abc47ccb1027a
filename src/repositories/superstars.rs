use crate::common::context::Context;
use crate::entities::superstars::Superstar;

const TABLE_NAME: &str = "superstars";
const READ_FIELDS: &str = "id, stage_name, avatar_url, bio, is_active";

pub async fn fetch_one<C: Context>(ctx: &C, superstar_id: i64) -> sqlx::Result<Superstar> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(superstar_id)
        .fetch_one(ctx.db())
        .await
}
