//! The filter engine: a pure function from a canonical list and criteria to
//! the displayed subset.

use campus_core::models::Entity;

/// Status constraint of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        Self::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    /// `Only` never matches an entity without a recognized status.
    pub fn matches(&self, status: Option<&S>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == Some(wanted),
        }
    }
}

/// What the operator typed and picked above a list.
#[derive(Debug, Clone)]
pub struct FilterCriteria<E: Entity> {
    pub search_term: String,
    /// Field the search term is matched against.
    pub field: E::Field,
    pub status: StatusFilter<E::Status>,
}

impl<E: Entity> Default for FilterCriteria<E> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            field: E::Field::default(),
            status: StatusFilter::All,
        }
    }
}

impl<E: Entity> FilterCriteria<E> {
    pub fn new(
        search_term: impl Into<String>,
        field: E::Field,
        status: StatusFilter<E::Status>,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            field,
            status,
        }
    }

    pub fn matches(&self, entity: &E, needle: Option<&str>) -> bool {
        let text_ok = match needle {
            None => true,
            Some(needle) => entity
                .field_text(self.field)
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false),
        };
        text_ok && self.status.matches(entity.status().as_ref())
    }
}

/// Compute the displayed subset of `canonical`.
///
/// A non-empty search term keeps entities whose selected field contains it,
/// case-insensitively; entities without that field never match. A status
/// filter other than `All` keeps entities in exactly that status. Both
/// constraints must hold. Order follows `canonical`.
pub fn recompute_filtered<E: Entity>(canonical: &[E], criteria: &FilterCriteria<E>) -> Vec<E> {
    let needle = if criteria.search_term.is_empty() {
        None
    } else {
        Some(criteria.search_term.to_lowercase())
    };

    canonical
        .iter()
        .filter(|entity| criteria.matches(entity, needle.as_deref()))
        .cloned()
        .collect()
}
