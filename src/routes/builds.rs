use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::forms::builds::{CreateBuildForm, RenameBuildForm, SelectProductForm};
use crate::repository::StaticCatalog;
use crate::routes::{SharedBuilds, error_response, lock_builds};
use crate::services::builds::{
    create_build as create_build_service, delete_build as delete_build_service,
    download_build as download_build_service, duplicate_build as duplicate_build_service,
    list_builds as list_builds_service, load_build as load_build_service,
    remove_product as remove_product_service, rename_build as rename_build_service,
    select_product as select_product_service, show_build as show_build_service,
};

#[derive(Deserialize)]
struct DownloadQueryParams {
    format: String,
}

#[get("/build")]
pub async fn show_build(builds: web::Data<SharedBuilds>) -> impl Responder {
    match lock_builds(&builds) {
        Ok(repo) => HttpResponse::Ok().json(show_build_service(&repo)),
        Err(response) => response,
    }
}

#[put("/build/name")]
pub async fn rename_build(
    builds: web::Data<SharedBuilds>,
    web::Json(form): web::Json<RenameBuildForm>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match rename_build_service(form, &mut repo) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "rename build"),
    }
}

#[put("/build/{category}")]
pub async fn select_product(
    category: web::Path<String>,
    builds: web::Data<SharedBuilds>,
    catalog: web::Data<StaticCatalog>,
    web::Json(form): web::Json<SelectProductForm>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match select_product_service(&category, form, &mut repo, catalog.get_ref()) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "select product"),
    }
}

#[delete("/build/{category}")]
pub async fn remove_product(
    category: web::Path<String>,
    builds: web::Data<SharedBuilds>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match remove_product_service(&category, &mut repo) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "remove product"),
    }
}

#[get("/builds")]
pub async fn list_builds(builds: web::Data<SharedBuilds>) -> impl Responder {
    match lock_builds(&builds) {
        Ok(repo) => HttpResponse::Ok().json(list_builds_service(&repo)),
        Err(response) => response,
    }
}

#[post("/builds")]
pub async fn create_build(
    builds: web::Data<SharedBuilds>,
    web::Json(form): web::Json<CreateBuildForm>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match create_build_service(form, &mut repo) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => error_response(err, "create build"),
    }
}

#[post("/builds/{id}/load")]
pub async fn load_build(id: web::Path<String>, builds: web::Data<SharedBuilds>) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match load_build_service(&id, &mut repo) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "load build"),
    }
}

#[post("/builds/{id}/duplicate")]
pub async fn duplicate_build(
    id: web::Path<String>,
    builds: web::Data<SharedBuilds>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match duplicate_build_service(&id, &mut repo) {
        Ok(copy) => HttpResponse::Created().json(copy),
        Err(err) => error_response(err, "duplicate build"),
    }
}

#[delete("/builds/{id}")]
pub async fn delete_build(
    id: web::Path<String>,
    builds: web::Data<SharedBuilds>,
) -> impl Responder {
    let mut repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match delete_build_service(&id, &mut repo) {
        Ok(remaining) => HttpResponse::Ok().json(remaining),
        Err(err) => error_response(err, "delete build"),
    }
}

#[get("/builds/{id}/download")]
pub async fn download_build(
    id: web::Path<String>,
    params: web::Query<DownloadQueryParams>,
    builds: web::Data<SharedBuilds>,
) -> impl Responder {
    let repo = match lock_builds(&builds) {
        Ok(repo) => repo,
        Err(response) => return response,
    };
    match download_build_service(&id, &params.format, &repo) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(err) => error_response(err, "download build"),
    }
}
