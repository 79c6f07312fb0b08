//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::host::HostFile;
use serde::Serialize;
use std::path::Path;
use vsgraph_core::{
    BehaviorTable, GraphError, GraphInstance, GraphManager, GraphTopology, NodeKind, Payload,
    SocketDirection, TickReport, TopologyMetrics,
};

// =============================================================================
// RUN RESULTS
// =============================================================================

/// Outcome of one host tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickOutcome {
    /// Zero-based tick number.
    pub tick: usize,
    /// Report of a successful tick.
    pub report: Option<TickReport>,
    /// Error message of a failed tick.
    pub error: Option<String>,
    /// Active set after the tick.
    pub active: Vec<u64>,
}

/// Everything a `Print` node recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintOutput {
    /// The node handle.
    pub node: u64,
    /// Deliveries recorded.
    pub count: u64,
    /// Retained payloads, oldest first.
    pub history: Vec<Payload>,
}

/// Result of driving a graph file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// Graph name.
    pub graph: String,
    /// Per-tick outcomes in order.
    pub ticks: Vec<TickOutcome>,
    /// Final `Print` node records in node order.
    pub prints: Vec<PrintOutput>,
    /// Whether the graph ended quiescent.
    pub quiescent: bool,
}

/// Activate `file` and drive it for up to `ticks` host ticks.
///
/// A failed tick (cycle cap) is recorded and the run continues, since the
/// instance stays usable.
///
/// # Errors
/// Returns activation errors and rejected injections.
pub fn run_graph(
    file: &HostFile,
    ticks: usize,
    until_quiescent: bool,
) -> Result<RunOutcome, GraphError> {
    let mut manager = GraphManager::builtin(file.engine);
    let id = manager.activate(&file.asset())?;
    let last_injection = file.inject.iter().map(|i| i.tick).max();
    let mut outcomes = Vec::with_capacity(ticks);

    for tick in 0..ticks {
        for injection in file.injections_at(tick) {
            manager.inject(id, injection.socket, injection.payload.clone())?;
        }

        let (report, error) = match manager.tick(id) {
            Ok(report) => (Some(report), None),
            Err(e) => {
                tracing::warn!(tick, error = %e, "tick failed");
                (None, Some(e.to_string()))
            }
        };
        let instance = manager
            .instance(id)
            .ok_or(GraphError::InstanceNotFound(id))?;
        outcomes.push(TickOutcome {
            tick,
            report,
            error,
            active: instance.active_nodes().iter().map(|n| n.0).collect(),
        });

        let injections_done = last_injection.is_none_or(|last| last <= tick);
        if until_quiescent && injections_done && instance.is_quiescent() {
            break;
        }
    }

    let instance = manager.deactivate(id)?;
    Ok(RunOutcome {
        graph: instance.name().to_string(),
        ticks: outcomes,
        prints: collect_prints(&instance),
        quiescent: instance.is_quiescent(),
    })
}

fn collect_prints(instance: &GraphInstance) -> Vec<PrintOutput> {
    instance
        .node_states()
        .filter_map(|(node, state)| {
            state.as_print().map(|p| PrintOutput {
                node: node.0,
                count: p.count,
                history: p.history.iter().cloned().collect(),
            })
        })
        .collect()
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Drive a graph file and report every tick.
pub fn cmd_run(
    path: &Path,
    ticks: usize,
    until_quiescent: bool,
    json_mode: bool,
    verbose: bool,
) -> Result<(), GraphError> {
    let file = HostFile::load(path)?;
    let outcome = run_graph(&file, ticks, until_quiescent)?;

    if json_mode {
        let output = serde_json::json!({
            "file": path.to_string_lossy(),
            "graph": outcome.graph,
            "ticks": outcome.ticks,
            "prints": outcome.prints,
            "quiescent": outcome.quiescent
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Graph Run: {}", outcome.graph);
    println!("==========");
    for tick in &outcome.ticks {
        match (&tick.report, &tick.error) {
            (Some(r), _) => println!(
                "tick {:>4}: passes={} updates={} deliveries={} dropped={}",
                tick.tick, r.passes, r.updates, r.deliveries, r.dropped
            ),
            (None, Some(e)) => println!("tick {:>4}: FAILED {}", tick.tick, e),
            (None, None) => println!("tick {:>4}: -", tick.tick),
        }
        if verbose {
            println!("           active={:?}", tick.active);
        }
    }
    println!();
    for print in &outcome.prints {
        let values: Vec<String> = print.history.iter().map(ToString::to_string).collect();
        println!(
            "print {:>4}: count={} [{}]",
            print.node,
            print.count,
            values.join(", ")
        );
    }
    println!(
        "Quiescent: {}",
        if outcome.quiescent { "yes" } else { "no" }
    );

    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Activate a graph file and report whether it is well-formed.
pub fn cmd_validate(path: &Path, json_mode: bool) -> Result<(), GraphError> {
    let file = HostFile::load(path)?;
    let mut manager = GraphManager::builtin(file.engine);
    let id = manager.activate(&file.asset())?;
    let instance = manager.deactivate(id)?;

    let topology = instance.topology();
    if json_mode {
        let output = serde_json::json!({
            "file": path.to_string_lossy(),
            "graph": instance.name(),
            "valid": true,
            "node_count": topology.node_count(),
            "edge_count": topology.edge_count(),
            "initially_active": instance.active_nodes().len()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "OK: '{}' activates ({} nodes, {} edges, {} initially active)",
        instance.name(),
        topology.node_count(),
        topology.edge_count(),
        instance.active_nodes().len()
    );
    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Print topology metrics and the fan-out of every output socket.
pub fn cmd_inspect(path: &Path, json_mode: bool) -> Result<(), GraphError> {
    let file = HostFile::load(path)?;
    let topology = GraphTopology::build(&file.nodes, &file.edges)?;
    let metrics = TopologyMetrics::from_topology(&topology);
    let fanout = fanout_entries(&topology);

    if json_mode {
        let output = serde_json::json!({
            "file": path.to_string_lossy(),
            "graph": file.name,
            "metrics": metrics,
            "fanout": fanout
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Graph Topology: {}", file.name);
    println!("===============");
    println!("Nodes:            {}", metrics.node_count);
    println!("Sockets:          {}", metrics.socket_count);
    println!("Edges:            {}", metrics.edge_count);
    println!("Signal Edges:     {}", metrics.signal_edges);
    println!("Data Edges:       {}", metrics.data_edges);
    println!("Converting Edges: {}", metrics.converting_edges);
    println!("Max Fan-out:      {}", metrics.max_fanout);
    println!();
    println!("Kinds:");
    for (kind, count) in &metrics.kinds {
        println!("  {:<10} {}", kind.name(), count);
    }
    println!();
    println!("Fan-out:");
    for entry in &fanout {
        let targets: Vec<String> = entry
            .targets
            .iter()
            .map(|t| format!("{}@{} ({})", t.socket, t.node, t.socket_type))
            .collect();
        println!(
            "  {}@{} {} ({}) -> [{}]",
            entry.socket,
            entry.node,
            entry.name,
            entry.socket_type,
            targets.join(", ")
        );
    }

    Ok(())
}

/// One output socket and everything it feeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanoutEntry {
    /// Output socket handle.
    pub socket: u64,
    /// Owning node.
    pub node: u64,
    /// Pin name.
    pub name: String,
    /// Declared type.
    pub socket_type: String,
    /// Connected inputs.
    pub targets: Vec<FanoutTargetEntry>,
}

/// One input fed by an output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanoutTargetEntry {
    /// Edge handle.
    pub edge: u64,
    /// Input socket handle.
    pub socket: u64,
    /// Owning node.
    pub node: u64,
    /// Declared type.
    pub socket_type: String,
}

/// List every output socket with its fan-out, in socket order.
pub fn fanout_entries(topology: &GraphTopology) -> Vec<FanoutEntry> {
    topology
        .sockets()
        .filter(|(_, info)| info.direction == SocketDirection::Output)
        .map(|(socket, info)| FanoutEntry {
            socket: socket.0,
            node: info.node.0,
            name: info.name.clone(),
            socket_type: info.socket_type.to_string(),
            targets: topology
                .fanout(socket)
                .iter()
                .map(|t| FanoutTargetEntry {
                    edge: t.edge.0,
                    socket: t.socket.0,
                    node: t.node.0,
                    socket_type: t.socket_type.to_string(),
                })
                .collect(),
        })
        .collect()
}

// =============================================================================
// KINDS COMMAND
// =============================================================================

/// One-line description of a built-in node kind.
#[must_use]
pub fn kind_summary(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "fires its output signal on the first tick after activation",
        NodeKind::Wait => "delays an input signal by a fixed number of ticks",
        NodeKind::Print => "records and logs every delivered value",
        NodeKind::Constant => "emits a stored value on trigger, then an optional signal",
        NodeKind::Add => "re-emits the float sum of its two inputs on every delivery",
        NodeKind::Relay => "forwards every input signal to its output",
    }
}

/// List the node kinds registered in the built-in behavior table.
pub fn cmd_kinds(json_mode: bool) -> Result<(), GraphError> {
    let table = BehaviorTable::builtin();

    if json_mode {
        let kinds: Vec<_> = table
            .kinds()
            .map(|kind| {
                serde_json::json!({
                    "kind": kind.name(),
                    "summary": kind_summary(kind)
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&kinds).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Built-in Node Kinds");
    println!("===================");
    for kind in table.kinds() {
        println!("  {:<10} {}", kind.name(), kind_summary(kind));
    }
    Ok(())
}
