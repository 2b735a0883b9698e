use chrono::Utc;
use diesel::prelude::*;

use crate::models::kv_entry::{KvEntry, NewKvEntry};
use crate::repository::{DieselRepository, KeyValueReader, KeyValueWriter, RepositoryResult};

impl DieselRepository {
    /// Every stored entry ordered by key.
    pub fn list_entries(&self) -> RepositoryResult<Vec<KvEntry>> {
        use crate::schema::kv_store;

        let mut conn = self.conn()?;

        let entries = kv_store::table
            .select(KvEntry::as_select())
            .order(kv_store::key.asc())
            .load(&mut conn)?;

        Ok(entries)
    }
}

impl KeyValueReader for DieselRepository {
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        use crate::schema::kv_store;

        let mut conn = self.conn()?;

        let value = kv_store::table
            .find(key)
            .select(kv_store::value)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(value)
    }
}

impl KeyValueWriter for DieselRepository {
    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        use crate::schema::kv_store;

        let mut conn = self.conn()?;
        let entry = NewKvEntry {
            key,
            value,
            updated_at: Utc::now().naive_utc(),
        };

        diesel::replace_into(kv_store::table)
            .values(&entry)
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepositoryResult<usize> {
        use crate::schema::kv_store;

        let mut conn = self.conn()?;

        let affected = diesel::delete(kv_store::table.find(key)).execute(&mut conn)?;

        Ok(affected)
    }
}
