//! Invalidation scopes and their resolution to store operations.

use crate::keys::{CacheKey, KeyDeriver};

/// What a mutation removes from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// A single, fully derived key.
    Key(CacheKey),
    /// Every key of exactly this namespace, whatever its actor and params.
    Namespace(String),
    /// The namespace plus its child namespaces (`ns:*`).
    Tree(String),
}

/// A concrete store operation produced from an [`Invalidation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Exact(String),
    Prefix(String),
}

impl Target {
    pub fn as_str(&self) -> &str {
        match self {
            Target::Exact(key) | Target::Prefix(key) => key,
        }
    }
}

impl Invalidation {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Invalidation::Namespace(namespace.into())
    }

    pub fn tree(namespace: impl Into<String>) -> Self {
        Invalidation::Tree(namespace.into())
    }

    pub fn targets(&self, keys: &KeyDeriver) -> Vec<Target> {
        match self {
            Invalidation::Key(key) => vec![Target::Exact(key.as_str().to_string())],
            Invalidation::Namespace(ns) => vec![Target::Prefix(keys.namespace_prefix(ns))],
            Invalidation::Tree(ns) => vec![
                Target::Prefix(keys.namespace_prefix(ns)),
                Target::Prefix(keys.children_prefix(ns)),
            ],
        }
    }
}

impl From<CacheKey> for Invalidation {
    fn from(key: CacheKey) -> Self {
        Invalidation::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::QueryParams;

    #[test]
    fn test_namespace_target_is_delimited() {
        let keys = KeyDeriver::new("app");
        let targets = Invalidation::namespace("admin:4").targets(&keys);
        assert_eq!(targets, vec![Target::Prefix("app:admin:4|".to_string())]);

        let other = keys.derive("admin:42", None, &QueryParams::new());
        assert!(!other.as_str().starts_with(targets[0].as_str()));
    }

    #[test]
    fn test_tree_covers_children() {
        let keys = KeyDeriver::new("app");
        let targets = Invalidation::tree("analytics").targets(&keys);
        assert_eq!(
            targets,
            vec![
                Target::Prefix("app:analytics|".to_string()),
                Target::Prefix("app:analytics:".to_string()),
            ]
        );

        let summary = keys.derive("analytics:summary", Some(1), &QueryParams::new());
        assert!(summary.as_str().starts_with(targets[1].as_str()));
    }

    #[test]
    fn test_key_target_is_exact() {
        let keys = KeyDeriver::new("app");
        let key = keys.derive("card:3", None, &QueryParams::new());
        assert_eq!(
            Invalidation::from(key.clone()).targets(&keys),
            vec![Target::Exact(key.into_string())]
        );
    }
}
