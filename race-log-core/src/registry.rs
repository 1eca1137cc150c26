//! Competitor registry
//!
//! Owns every `Competitor` seen during a run, keyed by id.

use crate::competitor::Competitor;
use crate::types::CompetitorId;
use std::collections::HashMap;

/// All competitors of a race, created lazily on first reference
#[derive(Debug, Clone, Default)]
pub struct Registry {
    competitors: HashMap<CompetitorId, Competitor>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            competitors: HashMap::new(),
        }
    }

    /// Get a competitor, creating a blank one on first access
    pub fn get_or_create(&mut self, id: CompetitorId) -> &mut Competitor {
        self.competitors.entry(id).or_insert_with(|| {
            log::debug!("New competitor({})", id);
            Competitor::new(id)
        })
    }

    pub fn get(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// Competitors ordered by end time, then id (unset end times first)
    pub fn by_end_time(&self) -> Vec<&Competitor> {
        let mut ordered: Vec<&Competitor> = self.competitors.values().collect();
        ordered.sort_by_key(|comp| (comp.end_time, comp.id));
        ordered
    }
}
