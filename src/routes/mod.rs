use std::sync::{Mutex, MutexGuard};

use actix_web::{HttpResponse, web};

use crate::builder::BuildRepository;
use crate::repository::DieselRepository;
use crate::services::ServiceError;

pub mod builds;
pub mod catalog;

/// Build repository shared by every handler. One lock serializes all
/// mutations.
pub type SharedBuilds = Mutex<BuildRepository<DieselRepository>>;

/// Register every JSON endpoint under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(catalog::list_products)
            .service(catalog::list_compatible_products)
            .service(builds::show_build)
            .service(builds::rename_build)
            .service(builds::select_product)
            .service(builds::remove_product)
            .service(builds::list_builds)
            .service(builds::create_build)
            .service(builds::load_build)
            .service(builds::duplicate_build)
            .service(builds::delete_build)
            .service(builds::download_build),
    );
}

pub(crate) fn lock_builds(
    builds: &SharedBuilds,
) -> Result<MutexGuard<'_, BuildRepository<DieselRepository>>, HttpResponse> {
    builds.lock().map_err(|_| {
        log::error!("Build repository lock poisoned");
        HttpResponse::InternalServerError().finish()
    })
}

pub(crate) fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => HttpResponse::BadRequest().body(message),
        ServiceError::Internal => {
            log::error!("Failed to {action}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
