use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::repository::StaticCatalog;
use crate::routes::{SharedBuilds, error_response, lock_builds};
use crate::services::catalog::{
    ProductsQueryParams, list_compatible_products as list_compatible_products_service,
    list_products as list_products_service,
};

#[derive(Deserialize)]
struct CompatibleQueryParams {
    category: String,
}

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductsQueryParams>,
    catalog: web::Data<StaticCatalog>,
) -> impl Responder {
    match list_products_service(params.into_inner(), catalog.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list products"),
    }
}

#[get("/products/compatible")]
pub async fn list_compatible_products(
    params: web::Query<CompatibleQueryParams>,
    builds: web::Data<SharedBuilds>,
    catalog: web::Data<StaticCatalog>,
) -> impl Responder {
    let repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match list_compatible_products_service(&params.category, &repo, catalog.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err, "list compatible products"),
    }
}
