//! Session-scoped registry of raw style trees.
//!
//! Every style tree selected during a build session is appended here before
//! it is rewritten. The name extractor reads the whole list once at finalize.
//! The registry only grows: a repeated pass appends again and the extractor's
//! last-wins merge absorbs the duplicate.

use crate::tree::BuildTree;

#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    trees: Vec<BuildTree>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tree: BuildTree) {
        tracing::debug!(
            index = self.trees.len(),
            files = tree.len(),
            "Accumulated raw style tree"
        );
        self.trees.push(tree);
    }

    pub fn trees(&self) -> &[BuildTree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_push_order() {
        let mut registry = StyleRegistry::new();
        assert!(registry.is_empty());

        let first = BuildTree::from_entries([("a/style.css", ".x {}")]);
        let second = BuildTree::from_entries([("b/style.css", ".y {}")]);
        registry.push(first.clone());
        registry.push(second.clone());
        registry.push(first.clone());

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.trees(), &[first.clone(), second, first][..]);
    }
}
