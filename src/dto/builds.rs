use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregates;
use crate::builder::BuildRepository;
use crate::compatibility::{CompatibilityIssue, CompatibilityRule, IssueDetail, Severity};
use crate::domain::build::{BuildState, SavedBuild};
use crate::domain::types::{BuildId, BuildName};
use crate::repository::{KeyValueReader, KeyValueWriter};

/// A compatibility issue together with its rendered message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDto {
    pub rule: CompatibilityRule,
    pub severity: Severity,
    pub message: String,
    pub detail: IssueDetail,
}

impl From<CompatibilityIssue> for IssueDto {
    fn from(value: CompatibilityIssue) -> Self {
        Self {
            message: value.to_string(),
            rule: value.rule,
            severity: value.severity,
            detail: value.detail,
        }
    }
}

/// The active build with everything the builder screen shows next to it.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub id: Option<BuildId>,
    pub name: Option<BuildName>,
    pub build: BuildState,
    pub total_price: f64,
    pub total_wattage: f64,
    pub recommended_psu_wattage: f64,
    pub selected_items_count: usize,
    pub issues: Vec<IssueDto>,
}

impl BuildSummary {
    pub fn from_repository<S>(repo: &BuildRepository<S>) -> Self
    where
        S: KeyValueReader + KeyValueWriter,
    {
        let total_wattage = repo.total_wattage();
        Self {
            id: repo.active_build_id(),
            name: repo.active_build_name().cloned(),
            build: repo.build().clone(),
            total_price: repo.total_price(),
            total_wattage,
            recommended_psu_wattage: aggregates::recommended_psu_wattage(total_wattage),
            selected_items_count: repo.selected_items_count(),
            issues: repo
                .compatibility_issues()
                .into_iter()
                .map(IssueDto::from)
                .collect(),
        }
    }
}

/// One row of the saved builds list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedBuildSummary {
    pub id: BuildId,
    pub name: BuildName,
    pub active: bool,
    pub selected_items_count: usize,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedBuildSummary {
    pub fn new(saved: &SavedBuild, active: Option<BuildId>) -> Self {
        Self {
            id: saved.id,
            name: saved.name.clone(),
            active: active == Some(saved.id),
            selected_items_count: aggregates::selected_items_count(&saved.build),
            total_price: aggregates::total_price(&saved.build),
            created_at: saved.created_at,
            updated_at: saved.updated_at,
        }
    }
}
