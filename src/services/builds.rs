//! Use cases over the build repository.
//!
//! Each function validates raw input, performs a single repository
//! operation and returns a DTO, so that HTTP handlers stay thin wrappers.

use crate::builder::BuildRepository;
use crate::domain::category::Category;
use crate::domain::types::BuildId;
use crate::dto::builds::{BuildSummary, SavedBuildSummary};
use crate::forms::builds::{
    CreateBuildForm, CreateBuildFormPayload, RenameBuildForm, RenameBuildFormPayload,
    SelectProductForm, SelectProductFormPayload,
};
use crate::repository::{CatalogReader, KeyValueReader, KeyValueWriter};
use crate::services::export::{
    BOM_HEADERS, DownloadFile, DownloadFormat, bill_of_materials, export_file_stem,
    render_download_file,
};

use super::{ServiceError, ServiceResult};

fn parse_build_id(id: &str) -> ServiceResult<BuildId> {
    BuildId::parse(id).map_err(|_| ServiceError::NotFound)
}

fn parse_category(category: &str) -> ServiceResult<Category> {
    Category::try_from(category).map_err(|_| ServiceError::NotFound)
}

/// The active build with totals and compatibility issues.
pub fn show_build<S>(repo: &BuildRepository<S>) -> BuildSummary
where
    S: KeyValueReader + KeyValueWriter,
{
    BuildSummary::from_repository(repo)
}

/// Every saved build, most recently created first.
pub fn list_builds<S>(repo: &BuildRepository<S>) -> Vec<SavedBuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let active = repo.active_build_id();
    repo.saved_builds()
        .iter()
        .map(|saved| SavedBuildSummary::new(saved, active))
        .collect()
}

/// Create an empty build and make it active.
pub fn create_build<S>(
    form: CreateBuildForm,
    repo: &mut BuildRepository<S>,
) -> ServiceResult<BuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let payload: CreateBuildFormPayload = form.try_into()?;
    let id = repo.create_build(payload.name);
    log::info!("Created build {id}");
    Ok(BuildSummary::from_repository(repo))
}

/// Make the build `id` active.
pub fn load_build<S>(id: &str, repo: &mut BuildRepository<S>) -> ServiceResult<BuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let id = parse_build_id(id)?;
    repo.load_build(id)?;
    Ok(BuildSummary::from_repository(repo))
}

/// Rename the active build.
pub fn rename_build<S>(
    form: RenameBuildForm,
    repo: &mut BuildRepository<S>,
) -> ServiceResult<BuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let payload: RenameBuildFormPayload = form.try_into()?;
    repo.rename_build(payload.name);
    Ok(BuildSummary::from_repository(repo))
}

/// Delete build `id` and return the remaining builds.
pub fn delete_build<S>(
    id: &str,
    repo: &mut BuildRepository<S>,
) -> ServiceResult<Vec<SavedBuildSummary>>
where
    S: KeyValueReader + KeyValueWriter,
{
    let id = parse_build_id(id)?;
    repo.delete_build(id)?;
    log::info!("Deleted build {id}");
    Ok(list_builds(repo))
}

/// Copy build `id`. The active build does not change.
pub fn duplicate_build<S>(
    id: &str,
    repo: &mut BuildRepository<S>,
) -> ServiceResult<SavedBuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let id = parse_build_id(id)?;
    let copy_id = repo.duplicate_build(id)?;
    let active = repo.active_build_id();
    match repo.find_build(copy_id) {
        Some(copy) => Ok(SavedBuildSummary::new(copy, active)),
        None => {
            log::error!("Duplicated build {copy_id} vanished from the collection");
            Err(ServiceError::Internal)
        }
    }
}

/// Put catalog product `form.product_id` into the `category` slot of the
/// active build.
pub fn select_product<S, C>(
    category: &str,
    form: SelectProductForm,
    repo: &mut BuildRepository<S>,
    catalog: &C,
) -> ServiceResult<BuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
    C: CatalogReader,
{
    let category = parse_category(category)?;
    let payload: SelectProductFormPayload = form.try_into()?;

    let product = match catalog.get_product_by_id(payload.product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    repo.select_product(category, product)?;
    Ok(BuildSummary::from_repository(repo))
}

/// Empty the `category` slot of the active build.
pub fn remove_product<S>(
    category: &str,
    repo: &mut BuildRepository<S>,
) -> ServiceResult<BuildSummary>
where
    S: KeyValueReader + KeyValueWriter,
{
    let category = parse_category(category)?;
    repo.remove_product(category);
    Ok(BuildSummary::from_repository(repo))
}

/// Render the bill of materials of build `id` as CSV or XLSX.
pub fn download_build<S>(
    id: &str,
    format: &str,
    repo: &BuildRepository<S>,
) -> ServiceResult<DownloadFile>
where
    S: KeyValueReader + KeyValueWriter,
{
    let format = DownloadFormat::try_from(format)?;
    let id = parse_build_id(id)?;
    let saved = repo.find_build(id).ok_or(ServiceError::NotFound)?;

    let file = render_download_file(
        &export_file_stem(saved),
        format,
        &BOM_HEADERS,
        &bill_of_materials(saved),
    )?;
    Ok(file)
}
