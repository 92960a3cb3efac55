use serde::{Deserialize, Serialize};

/// A value given either once for every item or as a per-index list.
///
/// Lists shorter than the item count fall back to the caller's default for missing indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerItem<T> {
    /// Same value for every index.
    Uniform(T),
    /// One value per index.
    Each(Vec<T>),
}

impl<T: Clone> PerItem<T> {
    /// Resolve the value for `index`, or `default` when a list has no entry for it.
    pub fn resolve(&self, index: usize, default: T) -> T {
        match self {
            Self::Uniform(v) => v.clone(),
            Self::Each(vs) => vs.get(index).cloned().unwrap_or(default),
        }
    }
}

/// [`PerItem::resolve`] over an optional override.
pub fn resolve_per_item<T: Clone>(value: Option<&PerItem<T>>, index: usize, default: T) -> T {
    match value {
        Some(v) => v.resolve(index, default),
        None => default,
    }
}
