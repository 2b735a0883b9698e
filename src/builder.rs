//! Named builds, the active-build pointer and the working copy mirrored into it.
//!
//! [`BuildRepository`] owns every [`SavedBuild`]. Exactly one of them may be
//! active; its contents are exposed as a working [`BuildState`] and name.
//! Every mutation of the working copy is written straight back into the
//! active saved build (bumping `updated_at`), after which the change hook
//! persists both blobs and notifies subscribers. Persistence failures are
//! logged and never surface to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::aggregates;
use crate::compatibility::{self, CompatibilityIssue};
use crate::domain::build::{BuildState, BuildStateError, SavedBuild};
use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::domain::types::{BuildId, BuildName};
use crate::repository::{KeyValueReader, KeyValueWriter};

/// Storage key of the JSON array of saved builds.
pub const SAVED_BUILDS_KEY: &str = "pc_builder_saved_builds";
/// Storage key of the JSON string holding the active build id.
pub const ACTIVE_BUILD_KEY: &str = "pc_builder_active_build_id";
/// Name given to builds created implicitly.
pub const DEFAULT_BUILD_NAME: &str = BuildName::DEFAULT;
const COPY_SUFFIX: &str = " (Copy)";

/// Errors returned by [`BuildRepository`] mutators. State is left unchanged
/// whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("build {0} not found")]
    NotFound(BuildId),
    #[error(transparent)]
    CategoryMismatch(#[from] BuildStateError),
}

pub type BuilderResult<T> = Result<T, BuilderError>;

/// Source of creation and modification timestamps.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock truncated to the millisecond precision builds are stored with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Notification sent to subscribers after a mutation has been applied and
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEvent {
    /// Saved builds were read from storage and a build was activated.
    Restored(BuildId),
    Created(BuildId),
    Loaded(BuildId),
    /// The active build's parts or name changed.
    Updated(BuildId),
    Deleted(BuildId),
    Duplicated { source: BuildId, copy: BuildId },
}

type Listener = Box<dyn Fn(&BuildEvent) + Send>;

/// State holder for the saved build collection and the active build.
pub struct BuildRepository<S> {
    store: S,
    clock: Box<dyn Clock>,
    /// Most recently created first.
    builds: Vec<SavedBuild>,
    active_id: Option<BuildId>,
    working: BuildState,
    working_name: Option<BuildName>,
    listeners: Vec<Listener>,
}

impl<S> BuildRepository<S>
where
    S: KeyValueReader + KeyValueWriter,
{
    /// Repository over `store` using the system clock. Nothing is loaded
    /// until [`Self::initialize`] runs.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            builds: Vec::new(),
            active_id: None,
            working: BuildState::empty(),
            working_name: None,
            listeners: Vec::new(),
        }
    }

    /// Load saved builds and the last active id from the store.
    ///
    /// Missing or unreadable data counts as absent. Saved builds are read
    /// one entry at a time and only unreadable entries are dropped. The
    /// previously active build is restored when it still exists, otherwise
    /// the first saved build; with nothing saved a default build is created.
    pub fn initialize(&mut self) {
        self.builds = self.read_saved_builds();

        for saved in &mut self.builds {
            let cleared = saved.build.reconcile();
            if !cleared.is_empty() {
                log::warn!(
                    "Cleared mismatched slots {cleared:?} while restoring build {}",
                    saved.id
                );
            }
        }

        let remembered = self
            .read_blob::<BuildId>(ACTIVE_BUILD_KEY)
            .filter(|id| self.position(*id).is_some());
        let target = remembered.or_else(|| self.builds.first().map(|saved| saved.id));

        match target {
            Some(id) => {
                self.activate(id);
                log::info!("Restored {} saved build(s), active {id}", self.builds.len());
                self.on_change(BuildEvent::Restored(id));
            }
            None => {
                self.create_build(BuildName::default_build());
            }
        }
    }

    /// Register a listener invoked after every applied mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&BuildEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Create an empty build, put it first and make it active.
    pub fn create_build(&mut self, name: BuildName) -> BuildId {
        let saved = SavedBuild::new(name, self.clock.now());
        let id = saved.id;
        self.builds.insert(0, saved);
        self.activate(id);
        self.on_change(BuildEvent::Created(id));
        id
    }

    /// Make build `id` active and replace the working copy with its contents.
    pub fn load_build(&mut self, id: BuildId) -> BuilderResult<()> {
        if self.position(id).is_none() {
            return Err(BuilderError::NotFound(id));
        }
        self.activate(id);
        self.on_change(BuildEvent::Loaded(id));
        Ok(())
    }

    /// Put `product` into the `category` slot, returning the product it
    /// replaced.
    pub fn select_product(
        &mut self,
        category: Category,
        product: Product,
    ) -> BuilderResult<Option<Product>> {
        let replaced = self.working.set(category, product)?;
        self.sync_active();
        Ok(replaced)
    }

    /// Empty the `category` slot. Clearing an already empty slot changes
    /// nothing and does not touch `updated_at`.
    pub fn remove_product(&mut self, category: Category) -> Option<Product> {
        let removed = self.working.clear(category);
        if removed.is_some() {
            self.sync_active();
        }
        removed
    }

    /// Rename the active build.
    pub fn rename_build(&mut self, name: BuildName) {
        self.working_name = Some(name);
        self.sync_active();
    }

    /// Remove build `id`.
    ///
    /// When it was active, the build that followed it becomes active,
    /// falling back to the one before it; deleting the last build creates a
    /// fresh default one.
    pub fn delete_build(&mut self, id: BuildId) -> BuilderResult<()> {
        let index = self.position(id).ok_or(BuilderError::NotFound(id))?;
        self.builds.remove(index);

        if self.active_id != Some(id) {
            self.on_change(BuildEvent::Deleted(id));
            return Ok(());
        }

        self.active_id = None;
        let successor = self
            .builds
            .get(index)
            .or_else(|| index.checked_sub(1).and_then(|i| self.builds.get(i)))
            .map(|saved| saved.id);

        match successor {
            Some(next) => {
                self.activate(next);
                self.on_change(BuildEvent::Deleted(id));
            }
            None => {
                self.working = BuildState::empty();
                self.working_name = None;
                self.on_change(BuildEvent::Deleted(id));
                self.create_build(BuildName::default_build());
            }
        }
        Ok(())
    }

    /// Copy build `id` under a new id and a `" (Copy)"` name. The copy goes
    /// first in the collection; the active build does not change.
    pub fn duplicate_build(&mut self, id: BuildId) -> BuilderResult<BuildId> {
        let source = self.find_build(id).ok_or(BuilderError::NotFound(id))?;
        let now = self.clock.now();
        let copy = SavedBuild {
            id: BuildId::generate(),
            name: source.name.suffixed(COPY_SUFFIX),
            build: source.build.clone(),
            created_at: now,
            updated_at: now,
        };
        let copy_id = copy.id;
        self.builds.insert(0, copy);
        self.on_change(BuildEvent::Duplicated {
            source: id,
            copy: copy_id,
        });
        Ok(copy_id)
    }

    /// Working copy of the active build.
    pub fn build(&self) -> &BuildState {
        &self.working
    }

    pub fn total_price(&self) -> f64 {
        aggregates::total_price(&self.working)
    }

    pub fn total_wattage(&self) -> f64 {
        aggregates::total_wattage(&self.working)
    }

    pub fn selected_items_count(&self) -> usize {
        aggregates::selected_items_count(&self.working)
    }

    pub fn compatibility_issues(&self) -> Vec<CompatibilityIssue> {
        compatibility::validate(&self.working, self.total_wattage())
    }

    /// Saved builds, most recently created first.
    pub fn saved_builds(&self) -> &[SavedBuild] {
        &self.builds
    }

    pub fn find_build(&self, id: BuildId) -> Option<&SavedBuild> {
        self.builds.iter().find(|saved| saved.id == id)
    }

    pub fn active_build_id(&self) -> Option<BuildId> {
        self.active_id
    }

    pub fn active_build_name(&self) -> Option<&BuildName> {
        self.working_name.as_ref()
    }

    pub fn active_build(&self) -> Option<&SavedBuild> {
        self.active_id.and_then(|id| self.find_build(id))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: BuildId) -> Option<usize> {
        self.builds.iter().position(|saved| saved.id == id)
    }

    fn activate(&mut self, id: BuildId) {
        let Some((build, name)) = self
            .find_build(id)
            .map(|saved| (saved.build.clone(), saved.name.clone()))
        else {
            return;
        };
        self.working = build;
        self.working_name = Some(name);
        self.active_id = Some(id);
    }

    /// Mirror the working copy into the active saved build.
    fn sync_active(&mut self) {
        let Some(id) = self.active_id else {
            return;
        };
        let now = self.clock.now();
        let Some(saved) = self.builds.iter_mut().find(|saved| saved.id == id) else {
            return;
        };
        saved.build = self.working.clone();
        if let Some(name) = &self.working_name {
            saved.name = name.clone();
        }
        saved.updated_at = now;
        self.on_change(BuildEvent::Updated(id));
    }

    fn on_change(&self, event: BuildEvent) {
        self.persist();
        for listener in &self.listeners {
            listener(&event);
        }
    }

    fn persist(&self) {
        self.write_blob(SAVED_BUILDS_KEY, &self.builds);
        match self.active_id {
            Some(id) => self.write_blob(ACTIVE_BUILD_KEY, &id),
            None => {
                if let Err(e) = self.store.remove_value(ACTIVE_BUILD_KEY) {
                    log::error!("Failed to clear active build id: {e}");
                }
            }
        }
    }

    fn write_blob<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set_value(key, &json) {
            log::error!("Failed to persist {key}: {e}");
        }
    }

    fn read_saved_builds(&self) -> Vec<SavedBuild> {
        let Some(entries) = self.read_blob::<Vec<serde_json::Value>>(SAVED_BUILDS_KEY) else {
            return Vec::new();
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(saved) => Some(saved),
                Err(e) => {
                    log::warn!("Dropping unreadable saved build #{index}: {e}");
                    None
                }
            })
            .collect()
    }

    fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get_value(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Discarding unreadable {key}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to read {key}: {e}");
                None
            }
        }
    }
}
