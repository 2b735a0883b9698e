use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Row of the `kv_store` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`KvEntry`]; written with `REPLACE INTO`.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::kv_store)]
pub struct NewKvEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub updated_at: NaiveDateTime,
}
