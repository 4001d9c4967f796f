//! Producer registry.

use std::collections::HashSet;

use super::handler::FragmentProducer;
use crate::types::NoticeType;

/// Ordered registry of fragment producers.
///
/// Producers run, and their fragments are merged, in registration order.
/// Individual producers can be disabled by name without unregistering
/// them.
pub struct ProducerRegistry {
    producers: Vec<Box<dyn FragmentProducer>>,
    disabled: HashSet<String>,
}

impl ProducerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            producers: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    /// Register a producer after all previously registered ones.
    ///
    /// A producer registered under an existing name replaces it in place.
    pub fn register(&mut self, producer: impl FragmentProducer + 'static) {
        let producer: Box<dyn FragmentProducer> = Box::new(producer);
        match self.producers.iter().position(|p| p.name() == producer.name()) {
            Some(index) => self.producers[index] = producer,
            None => self.producers.push(producer),
        }
    }

    /// Disable producers by name.
    pub fn disable(&mut self, names: impl IntoIterator<Item = impl Into<String>>) {
        for name in names {
            self.disabled.insert(name.into());
        }
    }

    /// Enabled producers that apply to a notice type, in registration order.
    #[must_use]
    pub fn producers_for(&self, notice_type: NoticeType) -> Vec<&dyn FragmentProducer> {
        self.producers
            .iter()
            .filter(|p| !self.disabled.contains(p.name()))
            .filter(|p| p.applies_to(notice_type))
            .map(|p| p.as_ref())
            .collect()
    }

    /// Names and business terms of all registered producers.
    #[must_use]
    pub fn business_terms(&self) -> Vec<(&'static str, &'static str)> {
        self.producers
            .iter()
            .map(|p| (p.name(), p.business_term()))
            .collect()
    }

    /// Check if a producer is registered under a name.
    #[must_use]
    pub fn has_producer(&self, name: &str) -> bool {
        self.producers.iter().any(|p| p.name() == name)
    }

    /// Check if a registered producer is disabled.
    #[must_use]
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

impl Default for ProducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
