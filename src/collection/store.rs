use campus_core::models::Entity;

use super::envelope::extract_list;
use super::filter::{recompute_filtered, FilterCriteria, StatusFilter};

/// Progress of the most recent full load.
///
/// - `Idle`: Nothing loaded yet
/// - `Loading`: A load is in flight; hosts show a loading indicator
/// - `Loaded`: `canonical` holds the last server answer
/// - `Failed`: The last load failed; hosts offer a retry, and a way back to
///   login when `requires_login` is set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed {
        message: String,
        requires_login: bool,
    },
}

/// Canonical list of one screen plus its filtered view.
///
/// Every setter recomputes `filtered` before returning, so the view can never
/// be observed out of sync with the list or the criteria.
#[derive(Debug, Clone)]
pub struct EntityCollection<E: Entity> {
    canonical: Vec<E>,
    filtered: Vec<E>,
    criteria: FilterCriteria<E>,
    load_state: LoadState,
}

impl<E: Entity> Default for EntityCollection<E> {
    fn default() -> Self {
        Self {
            canonical: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            load_state: LoadState::Idle,
        }
    }
}

impl<E: Entity> EntityCollection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canonical(&self) -> &[E] {
        &self.canonical
    }

    pub fn filtered(&self) -> &[E] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria<E> {
        &self.criteria
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn find(&self, id: i64) -> Option<&E> {
        self.canonical.iter().find(|e| e.id() == id)
    }

    /// Replace the canonical list from a raw list payload.
    ///
    /// Unknown envelopes load as an empty list and items that don't decode as
    /// `E` (no `id`, not an object) are skipped. An unrecognized status alone
    /// doesn't drop an item. Returns the number of entities loaded.
    pub fn load(&mut self, payload: serde_json::Value) -> usize {
        let items = extract_list(payload);
        let total = items.len();
        let entities: Vec<E> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<E>(item) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!("Skipping malformed list item: {}", e);
                    None
                }
            })
            .collect();

        if entities.len() < total {
            tracing::warn!("Loaded {} of {} list items", entities.len(), total);
        }

        let loaded = entities.len();
        self.replace(entities);
        loaded
    }

    /// Replace the canonical list wholesale.
    pub fn replace(&mut self, entities: Vec<E>) {
        self.canonical = entities;
        self.load_state = LoadState::Loaded;
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.recompute();
    }

    pub fn set_filter_field(&mut self, field: E::Field) {
        self.criteria.field = field;
        self.recompute();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter<E::Status>) {
        self.criteria.status = status;
        self.recompute();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria<E>) {
        self.criteria = criteria;
        self.recompute();
    }

    pub(crate) fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Record a failed load. The previous canonical list is kept.
    pub(crate) fn fail_loading(&mut self, message: String, requires_login: bool) {
        self.load_state = LoadState::Failed {
            message,
            requires_login,
        };
    }

    fn recompute(&mut self) {
        self.filtered = recompute_filtered(&self.canonical, &self.criteria);
    }
}
