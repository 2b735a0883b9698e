use std::cmp::Ordering;
use std::path::Path;

use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::repository::{CatalogReader, ProductListQuery, RepositoryResult, SortOption};

const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// Catalog served from an in-memory product list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a JSON array of products.
    pub fn from_json_str(json: &str) -> RepositoryResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Load a JSON array of products from disk.
    pub fn from_path(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Catalog shipped with the crate.
    pub fn bundled() -> RepositoryResult<Self> {
        Self::from_json_str(BUNDLED_PRODUCTS)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

fn compare(sort: SortOption, a: &Product, b: &Product) -> Ordering {
    match sort {
        SortOption::Default => Ordering::Equal,
        SortOption::PriceAsc => a.price.get().total_cmp(&b.price.get()),
        SortOption::PriceDesc => b.price.get().total_cmp(&a.price.get()),
        SortOption::Name => a
            .name
            .as_str()
            .to_lowercase()
            .cmp(&b.name.as_str().to_lowercase()),
    }
}

impl CatalogReader for StaticCatalog {
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut items: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.category.is_none_or(|category| p.category == category))
            .filter(|p| {
                search
                    .as_deref()
                    .is_none_or(|search| p.name.as_str().to_lowercase().contains(search))
            })
            .filter(|p| query.filter.matches(p))
            .collect();

        // Stable sort keeps catalog order for ties.
        items.sort_by(|a, b| compare(query.sort, a, b));

        let total = items.len();

        let items = match &query.pagination {
            Some(pagination) => items
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .cloned()
                .collect(),
            None => items.into_iter().cloned().collect(),
        };

        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::repository::ProductFilter;

    fn catalog() -> StaticCatalog {
        StaticCatalog::bundled().unwrap()
    }

    fn ids(items: &[Product]) -> Vec<i32> {
        items.iter().filter_map(|p| p.id.as_number()).collect()
    }

    #[test]
    fn bundled_catalog_covers_every_category() {
        let catalog = catalog();
        for category in Category::ALL {
            let (total, _) = catalog
                .list_products(&ProductListQuery::default().category(category))
                .unwrap();
            assert!(total > 0, "no products for {category}");
        }
    }

    #[test]
    fn paginates_after_counting() {
        let (total, items) = catalog()
            .list_products(&ProductListQuery::default().paginate(2, 4))
            .unwrap();

        assert_eq!(total, 15);
        assert_eq!(ids(&items), vec![5, 6, 7, 8]);
    }

    #[test]
    fn sorts_by_price_and_name() {
        let catalog = catalog();
        let query = ProductListQuery::default().category(Category::Cpu);

        let (_, items) = catalog
            .list_products(&query.clone().sort(SortOption::PriceAsc))
            .unwrap();
        assert_eq!(ids(&items), vec![2, 1]);

        let (_, items) = catalog
            .list_products(&query.clone().sort(SortOption::PriceDesc))
            .unwrap();
        assert_eq!(ids(&items), vec![1, 2]);

        let cases = ProductListQuery::default()
            .category(Category::Case)
            .sort(SortOption::Name);
        let (_, items) = catalog.list_products(&cases).unwrap();
        assert_eq!(ids(&items), vec![15, 14, 13]);
    }

    #[test]
    fn searches_names_case_insensitively() {
        let (total, items) = catalog()
            .list_products(&ProductListQuery::default().search("rtx"))
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(ids(&items), vec![7, 8]);
    }

    #[test]
    fn filters_by_price_and_spec() {
        let mut filter = ProductFilter {
            max_price: Some(500.0),
            ..ProductFilter::default()
        };
        filter.specs.insert("memoryType".into(), "DDR5".into());

        let (_, items) = catalog()
            .list_products(&ProductListQuery::default().filter(filter))
            .unwrap();

        assert_eq!(ids(&items), vec![4, 5]);
    }

    #[test]
    fn finds_products_by_id() {
        let catalog = catalog();
        let product = catalog
            .get_product_by_id(ProductId::new(10).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(product.name.as_str(), "DeepCool PF500 (500W)");
        assert!(
            catalog
                .get_product_by_id(ProductId::new(99).unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn rejects_malformed_catalog_json() {
        assert!(StaticCatalog::from_json_str("[{\"id\": 0}]").is_err());
    }

    #[test]
    fn finds_products_keyed_by_text() {
        let catalog = StaticCatalog::from_json_str(
            r#"[{
                "id": "ram-5",
                "name": "Kingston 16GB",
                "price": 55,
                "category": "ram",
                "image": "assets/ram.png",
                "specs": { "memoryType": "DDR4" }
            }]"#,
        )
        .unwrap();

        let product = catalog
            .get_product_by_id(ProductId::key("ram-5").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(product.image.as_str(), "assets/ram.png");
        assert_eq!(product.id.to_string(), "ram-5");
    }

    #[test]
    fn sort_option_parses_query_values() {
        assert_eq!(SortOption::try_from("price-desc").unwrap(), SortOption::PriceDesc);
        assert_eq!(SortOption::try_from("").unwrap(), SortOption::Default);
        assert!(SortOption::try_from("rating").is_err());
    }
}
