use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use crate::InvariantViolation;
use crate::TimeTickSyncOperator;

/// Channel name -> sync operator, at most one operator per channel.
///
/// Entries are only created by `try_register` and destroyed by
/// `try_unregister`; nothing mutates an entry in place.
#[derive(Default)]
pub(crate) struct OperatorRegistry {
    operators: DashMap<String, Arc<dyn TimeTickSyncOperator>>,
}

impl OperatorRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_register(
        &self,
        operator: Arc<dyn TimeTickSyncOperator>,
    ) -> Result<(), InvariantViolation> {
        let channel = operator.channel();
        let channel_display = channel.to_string();

        match self.operators.entry(channel.name) {
            Entry::Occupied(entry) => Err(InvariantViolation::DuplicateOperator {
                channel: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(operator);
                info!(channel = %channel_display, "RegisterSyncOperator");
                Ok(())
            }
        }
    }

    pub(crate) fn try_unregister(
        &self,
        channel_name: &str,
    ) -> Result<Arc<dyn TimeTickSyncOperator>, InvariantViolation> {
        info!(channel = channel_name, "UnregisterSyncOperator");

        self.operators
            .remove(channel_name)
            .map(|(_, operator)| operator)
            .ok_or_else(|| InvariantViolation::OperatorNotFound {
                channel: channel_name.to_string(),
            })
    }

    pub(crate) fn get(
        &self,
        channel_name: &str,
    ) -> Option<Arc<dyn TimeTickSyncOperator>> {
        self.operators.get(channel_name).map(|entry| entry.value().clone())
    }

    pub(crate) fn must_get(
        &self,
        channel_name: &str,
    ) -> Result<Arc<dyn TimeTickSyncOperator>, InvariantViolation> {
        self.get(channel_name).ok_or_else(|| InvariantViolation::OperatorNotFound {
            channel: channel_name.to_string(),
        })
    }

    /// Visits a snapshot of the registry taken before the first visit, so
    /// `visit` never runs under a shard lock and may touch the registry.
    pub(crate) fn for_each(
        &self,
        mut visit: impl FnMut(&str, &Arc<dyn TimeTickSyncOperator>),
    ) {
        let snapshot: Vec<(String, Arc<dyn TimeTickSyncOperator>)> = self
            .operators
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        for (name, operator) in &snapshot {
            visit(name, operator);
        }
    }

    pub(crate) fn channel_names(&self) -> Vec<String> {
        self.operators.iter().map(|entry| entry.key().clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.operators.len()
    }
}
