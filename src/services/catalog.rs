use serde::Deserialize;

use crate::builder::BuildRepository;
use crate::compatibility;
use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CatalogReader, KeyValueReader, KeyValueWriter, ProductFilter, ProductListQuery, SortOption,
};

use super::{ServiceError, ServiceResult};

const MAX_ITEMS_PER_PAGE: usize = 100;

/// Query parameters accepted by the product listing endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ProductsQueryParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// Inclusive lower price bound.
    pub price_gte: Option<f64>,
    /// Inclusive upper price bound.
    pub price_lte: Option<f64>,
    pub socket: Option<String>,
    pub memory_type: Option<String>,
    pub form_factor: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ProductsQueryParams {
    fn into_query(self) -> ServiceResult<(ProductListQuery, usize, usize)> {
        let mut query = ProductListQuery::default();

        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            query = query.category(Category::try_from(category)?);
        }
        if let Some(search) = self.search {
            query = query.search(search);
        }
        if let Some(sort) = self.sort.as_deref() {
            let sort = SortOption::try_from(sort).map_err(|e| ServiceError::Form(e.to_string()))?;
            query = query.sort(sort);
        }

        let mut filter = ProductFilter {
            min_price: self.price_gte,
            max_price: self.price_lte,
            ..ProductFilter::default()
        };
        for (key, value) in [
            ("socket", self.socket),
            ("memoryType", self.memory_type),
            ("formFactor", self.form_factor),
        ] {
            if let Some(value) = value {
                filter.specs.insert(key.to_string(), value);
            }
        }
        query = query.filter(filter);

        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE);
        Ok((query.paginate(page, per_page), page, per_page))
    }
}

/// One page of catalog products matching `params`.
pub fn list_products<C>(
    params: ProductsQueryParams,
    catalog: &C,
) -> ServiceResult<Paginated<Product>>
where
    C: CatalogReader,
{
    let (query, page, per_page) = params.into_query()?;

    match catalog.list_products(&query) {
        Ok((total, products)) => Ok(Paginated::new(products, page, per_page, total)),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Products of `category` that would not raise a physical compatibility
/// issue against the active build.
pub fn list_compatible_products<S, C>(
    category: &str,
    repo: &BuildRepository<S>,
    catalog: &C,
) -> ServiceResult<Vec<Product>>
where
    S: KeyValueReader + KeyValueWriter,
    C: CatalogReader,
{
    let category = Category::try_from(category)?;

    let products = match catalog.list_products(&ProductListQuery::default().category(category)) {
        Ok((_total, products)) => products,
        Err(e) => {
            log::error!("Failed to list products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(compatibility::compatible_products(repo.build(), category, &products)
        .into_iter()
        .cloned()
        .collect())
}
