//! Merge-on-insert collection of recommendations.

use std::collections::HashMap;

use super::{default_config, Candidate, Recommendation};

/// Separator placed between reasons of merged candidates
pub const REASON_SEPARATOR: &str = "; ";

/// Recommendations keyed by name, kept in first-detected order.
///
/// Adding a candidate whose name is already present merges into the existing
/// entry: the priority becomes the maximum of both, the new reason is appended
/// after `REASON_SEPARATOR`, and the existing config is kept (first writer wins).
#[derive(Debug, Default, Clone)]
pub struct RecommendationSet {
    items: Vec<Recommendation>,
    by_name: HashMap<String, usize>,
}

impl RecommendationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a candidate into the set
    pub fn add(&mut self, candidate: Candidate) {
        if let Some(&idx) = self.by_name.get(&candidate.name) {
            let existing = &mut self.items[idx];
            existing.priority = existing.priority.max(candidate.priority);
            existing.reason.push_str(REASON_SEPARATOR);
            existing.reason.push_str(&candidate.reason);
            return;
        }

        let config = match candidate.config {
            Some(config) => config,
            None => default_config(&candidate.name),
        };

        self.by_name.insert(candidate.name.clone(), self.items.len());
        self.items.push(Recommendation {
            name: candidate.name,
            priority: candidate.priority,
            reason: candidate.reason,
            config,
        });
    }

    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        for candidate in candidates {
            self.add(candidate);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Recommendation> {
        self.by_name.get(name).map(|&idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.items.iter()
    }

    /// Recommendations by priority, highest first. Equal priorities keep
    /// insertion order.
    pub fn sorted(&self) -> Vec<&Recommendation> {
        let mut sorted: Vec<&Recommendation> = self.items.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    /// Names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.sorted().into_iter().map(|r| r.name.as_str()).collect()
    }
}
