use pushkind_configurator::builder::{
    ACTIVE_BUILD_KEY, BuildRepository, DEFAULT_BUILD_NAME, SAVED_BUILDS_KEY,
};
use pushkind_configurator::domain::category::Category;
use pushkind_configurator::domain::product::Product;
use pushkind_configurator::domain::types::{BuildName, ProductId};
use pushkind_configurator::repository::{
    CatalogReader, DieselRepository, KeyValueReader, KeyValueWriter, StaticCatalog,
};

mod common;

fn product(catalog: &StaticCatalog, id: i32) -> Product {
    catalog
        .get_product_by_id(ProductId::new(id).expect("valid product id"))
        .expect("catalog lookup should succeed")
        .expect("product should exist")
}

#[test]
fn kv_store_round_trips_and_overwrites() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    assert_eq!(repo.get_value("missing").unwrap(), None);

    repo.set_value("answer", "41").unwrap();
    repo.set_value("answer", "42").unwrap();
    assert_eq!(repo.get_value("answer").unwrap().as_deref(), Some("42"));

    let entries = repo.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "answer");

    assert_eq!(repo.remove_value("answer").unwrap(), 1);
    assert_eq!(repo.remove_value("answer").unwrap(), 0);
    assert_eq!(repo.get_value("answer").unwrap(), None);
}

#[test]
fn builds_survive_a_restart() {
    let test_db = common::TestDb::new();
    let catalog = StaticCatalog::bundled().expect("bundled catalog should parse");

    let (first, second, snapshot) = {
        let mut builds = BuildRepository::new(DieselRepository::new(test_db.pool()));
        builds.initialize();
        let first = builds.active_build_id().expect("default build is active");
        builds
            .select_product(Category::Cpu, product(&catalog, 2))
            .unwrap();
        builds
            .select_product(Category::Motherboard, product(&catalog, 4))
            .unwrap();

        let second = builds.create_build(BuildName::new("Budget").unwrap());
        builds
            .select_product(Category::Ram, product(&catalog, 6))
            .unwrap();
        builds.load_build(first).unwrap();

        (first, second, builds.saved_builds().to_vec())
    };

    let mut restored = BuildRepository::new(DieselRepository::new(test_db.reopen()));
    restored.initialize();

    assert_eq!(restored.saved_builds(), snapshot.as_slice());
    assert_eq!(restored.active_build_id(), Some(first));
    assert_eq!(restored.selected_items_count(), 2);
    assert_eq!(restored.total_price(), 450.0 + 220.0);
    assert!(restored.compatibility_issues().is_empty());
    assert_eq!(restored.find_build(second).unwrap().name.as_str(), "Budget");

    let keys: Vec<String> = restored
        .store()
        .list_entries()
        .unwrap()
        .into_iter()
        .map(|entry| entry.key)
        .collect();
    assert_eq!(keys, vec![ACTIVE_BUILD_KEY, SAVED_BUILDS_KEY]);
}

#[test]
fn corrupted_blob_in_database_yields_default_build() {
    let test_db = common::TestDb::new();
    let store = DieselRepository::new(test_db.pool());
    store.set_value(SAVED_BUILDS_KEY, "[{\"id\":").unwrap();
    store.set_value(ACTIVE_BUILD_KEY, "42").unwrap();

    let mut builds = BuildRepository::new(store);
    builds.initialize();

    assert_eq!(builds.saved_builds().len(), 1);
    assert_eq!(builds.saved_builds()[0].name.as_str(), DEFAULT_BUILD_NAME);
    assert!(builds.build().is_empty());

    let persisted = builds.store().get_value(SAVED_BUILDS_KEY).unwrap().unwrap();
    assert!(persisted.starts_with('['));
    assert!(persisted.contains(DEFAULT_BUILD_NAME));
}
