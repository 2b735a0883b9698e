use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use pushkind_configurator::db::run_migrations;

mod common;

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn migrations_create_kv_store_and_are_idempotent() {
    let test_db = common::TestDb::new();
    run_migrations(&test_db.pool()).expect("second run should be a no-op");

    let mut conn = test_db.pool().get().unwrap();
    let tables: Vec<TableName> =
        sql_query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'")
            .load(&mut conn)
            .unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "kv_store");
}
