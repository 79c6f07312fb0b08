//! # Graph Manager
//!
//! Owns every activated graph instance and drives them from the host tick.
//!
//! Instances share nothing mutable: each owns its topology, node states and
//! queues. The behavior table is shared read-only through an `Arc`, so
//! instances can be ticked one after another or on scoped worker threads.

use crate::asset::GraphAsset;
use crate::behavior::BehaviorTable;
use crate::config::EngineConfig;
use crate::engine::TickReport;
use crate::instance::GraphInstance;
use crate::types::{GraphError, InstanceId, SocketHandle};
use crate::value::Payload;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

/// Per-instance outcome of a bulk tick, in instance id order.
pub type TickResults = Vec<(InstanceId, Result<TickReport, GraphError>)>;

/// Registry of live graph instances.
#[derive(Debug)]
pub struct GraphManager {
    table: Arc<BehaviorTable>,
    config: EngineConfig,
    instances: BTreeMap<InstanceId, GraphInstance>,
    next_id: u64,
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::builtin(EngineConfig::default())
    }
}

impl GraphManager {
    /// Create a manager dispatching through `table`.
    #[must_use]
    pub fn new(table: BehaviorTable, config: EngineConfig) -> Self {
        Self {
            table: Arc::new(table),
            config,
            instances: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a manager with every built-in node kind registered.
    #[must_use]
    pub fn builtin(config: EngineConfig) -> Self {
        Self::new(BehaviorTable::builtin(), config)
    }

    /// Activate an asset and return the new instance's id.
    ///
    /// # Errors
    /// Propagates any error from [`GraphInstance::activate`]. No id is
    /// consumed on failure.
    pub fn activate(&mut self, asset: &GraphAsset) -> Result<InstanceId, GraphError> {
        let instance = GraphInstance::activate(asset, Arc::clone(&self.table), self.config)?;
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(id, instance);

        tracing::info!(instance = id.0, graph = %asset.name, "instance activated");
        Ok(id)
    }

    /// Tear down an instance, returning it for final inspection.
    ///
    /// # Errors
    /// Returns `GraphError::InstanceNotFound` if `id` is not live.
    pub fn deactivate(&mut self, id: InstanceId) -> Result<GraphInstance, GraphError> {
        let instance = self
            .instances
            .remove(&id)
            .ok_or(GraphError::InstanceNotFound(id))?;
        tracing::info!(instance = id.0, graph = %instance.name(), "instance deactivated");
        Ok(instance)
    }

    /// Tick a single instance.
    ///
    /// # Errors
    /// Returns `GraphError::InstanceNotFound` for an unknown id, otherwise
    /// whatever the instance's tick returns.
    pub fn tick(&mut self, id: InstanceId) -> Result<TickReport, GraphError> {
        self.instances
            .get_mut(&id)
            .ok_or(GraphError::InstanceNotFound(id))?
            .tick()
    }

    /// Tick every instance on the calling thread, in id order.
    ///
    /// One instance failing does not stop the others.
    pub fn tick_all(&mut self) -> TickResults {
        self.instances
            .iter_mut()
            .map(|(id, instance)| (*id, instance.tick()))
            .collect()
    }

    /// Tick every instance on its own scoped thread.
    ///
    /// Results are reported in id order regardless of completion order. A
    /// behavior that panics only fails its own instance, reported as
    /// `GraphError::WorkerPanicked`. That instance's queued events and
    /// uncommitted active-set requests are discarded, so its next tick does
    /// not resume the interrupted one.
    pub fn tick_all_parallel(&mut self) -> TickResults {
        let results: TickResults = thread::scope(|scope| {
            let workers: Vec<_> = self
                .instances
                .iter_mut()
                .map(|(id, instance)| (*id, scope.spawn(move || instance.tick())))
                .collect();

            workers
                .into_iter()
                .map(|(id, worker)| {
                    let result = worker.join().unwrap_or_else(|_| {
                        tracing::error!(instance = id.0, "tick worker panicked");
                        Err(GraphError::WorkerPanicked(id))
                    });
                    (id, result)
                })
                .collect()
        });

        for (id, result) in &results {
            if let Err(GraphError::WorkerPanicked(_)) = result
                && let Some(instance) = self.instances.get_mut(id)
            {
                instance.discard_in_flight();
            }
        }
        results
    }

    /// Queue an external signal or value on an instance's input socket.
    ///
    /// # Errors
    /// Returns `GraphError::InstanceNotFound` for an unknown id, otherwise
    /// see [`GraphInstance::inject`].
    pub fn inject(
        &mut self,
        id: InstanceId,
        socket: SocketHandle,
        payload: Payload,
    ) -> Result<(), GraphError> {
        self.instances
            .get_mut(&id)
            .ok_or(GraphError::InstanceNotFound(id))?
            .inject(socket, payload)
    }

    /// Get a live instance.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&GraphInstance> {
        self.instances.get(&id)
    }

    /// Iterate over live instance ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.keys().copied()
    }

    /// Get the limits applied to newly activated instances.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the shared behavior table.
    #[must_use]
    pub fn table(&self) -> &BehaviorTable {
        &self.table
    }

    /// Get the number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if no instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
