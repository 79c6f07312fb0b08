//! # Host Graph Files
//!
//! Loading of the TOML harness format the CLI drives.
//!
//! A host file carries an optional `[engine]` table, the node and edge
//! lists of one graph asset, and optional `[[inject]]` entries that feed
//! external signals or values into input sockets on given ticks.
//!
//! ```toml
//! name = "hello"
//!
//! [engine]
//! max_propagation_rounds = 1000
//!
//! [[nodes]]
//! id = 1
//! kind = "Start"
//! sockets = [{ id = 10, name = "out", direction = "Output", type = "Signal" }]
//! state = { Start = { output = 10 } }
//!
//! [[nodes]]
//! id = 2
//! kind = "Print"
//! sockets = [{ id = 20, name = "in", direction = "Input", type = "Signal" }]
//! state = { Print = { input = 20 } }
//!
//! [[edges]]
//! id = 1
//! from = 10
//! to = 20
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use vsgraph_core::{EdgeDesc, EngineConfig, GraphAsset, GraphError, NodeDesc, Payload, SocketHandle};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a graph file (16 MB).
pub const MAX_GRAPH_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GraphError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| GraphError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(GraphError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `path` to a canonical regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, GraphError> {
    let canonical = path.canonicalize().map_err(|e| {
        GraphError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(GraphError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// HOST FILE
// =============================================================================

/// An external event scheduled by the host file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Injection {
    /// Zero-based host tick before which the event is queued.
    #[serde(default)]
    pub tick: usize,
    /// Target input socket.
    pub socket: SocketHandle,
    /// Payload to deliver. Defaults to a signal.
    #[serde(default = "signal")]
    pub payload: Payload,
}

fn signal() -> Payload {
    Payload::Signal
}

/// Parsed contents of a host graph file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostFile {
    /// Engine limits.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Graph name.
    #[serde(default)]
    pub name: String,
    /// Node declarations.
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    /// Edge declarations.
    #[serde(default)]
    pub edges: Vec<EdgeDesc>,
    /// Scheduled external events.
    #[serde(default)]
    pub inject: Vec<Injection>,
}

impl HostFile {
    /// Parse a host file from TOML text.
    ///
    /// # Errors
    /// Returns `GraphError::Config` if the text is not a valid host file.
    pub fn parse(text: &str) -> Result<Self, GraphError> {
        toml::from_str(text).map_err(|e| GraphError::Config(e.to_string()))
    }

    /// Read and parse a host file.
    ///
    /// # Errors
    /// - `GraphError::Io` if the path is not a readable file within the size limit
    /// - `GraphError::Config` if the contents do not parse
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let path = validate_file_path(path)?;
        validate_file_size(&path, MAX_GRAPH_FILE_SIZE)?;

        let text = std::fs::read_to_string(&path)
            .map_err(|e| GraphError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
        let file = Self::parse(&text)?;

        tracing::debug!(
            path = %path.display(),
            nodes = file.nodes.len(),
            edges = file.edges.len(),
            injections = file.inject.len(),
            "graph file loaded"
        );
        Ok(file)
    }

    /// Build the graph asset described by this file.
    #[must_use]
    pub fn asset(&self) -> GraphAsset {
        GraphAsset {
            name: self.name.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Injections scheduled before host tick `tick`, in file order.
    pub fn injections_at(&self, tick: usize) -> impl Iterator<Item = &Injection> + '_ {
        self.inject.iter().filter(move |i| i.tick == tick)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vsgraph_core::{NodeKind, SocketType};

    const HELLO: &str = r#"
name = "hello"

[engine]
max_propagation_rounds = 1000

[[nodes]]
id = 1
kind = "Start"
sockets = [{ id = 10, name = "out", direction = "Output", type = "Signal" }]
state = { Start = { output = 10 } }

[[nodes]]
id = 2
kind = "Print"
sockets = [{ id = 20, name = "in", direction = "Input", type = "Int" }]
state = { Print = { input = 20, once = true } }

[[edges]]
id = 1
from = 10
to = 20

[[inject]]
tick = 2
socket = 20
payload = { type = "Float", value = 3.7 }
"#;

    #[test]
    fn parses_full_file() {
        let file = HostFile::parse(HELLO).expect("parse");

        assert_eq!(file.name, "hello");
        assert_eq!(file.engine.max_propagation_rounds, 1000);
        assert_eq!(
            file.engine.max_passes_per_tick,
            EngineConfig::default().max_passes_per_tick
        );
        assert_eq!(file.nodes.len(), 2);
        assert_eq!(file.nodes[0].kind, NodeKind::Start);
        assert_eq!(file.nodes[1].sockets[0].socket_type, SocketType::Int);
        assert_eq!(file.edges.len(), 1);
        assert_eq!(file.inject[0].payload, Payload::Float(3.7));
        assert_eq!(file.injections_at(2).count(), 1);
        assert_eq!(file.injections_at(0).count(), 0);
    }

    #[test]
    fn injection_defaults_to_signal_at_first_tick() {
        let file = HostFile::parse("[[inject]]\nsocket = 5\n").expect("parse");
        assert_eq!(file.inject[0].tick, 0);
        assert_eq!(file.inject[0].payload, Payload::Signal);
    }

    #[test]
    fn empty_file_is_empty_graph() {
        let file = HostFile::parse("").expect("parse");
        assert_eq!(file, HostFile::default());
        assert!(file.asset().nodes.is_empty());
    }

    #[test]
    fn bad_toml_is_config_error() {
        let result = HostFile::parse("nodes = 3");
        assert!(matches!(result, Err(GraphError::Config(_))));
    }
}
