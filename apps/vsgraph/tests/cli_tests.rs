//! Integration tests for graph file loading and the CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use vsgraph::cli::{cmd_inspect, cmd_kinds, cmd_validate, fanout_entries, run_graph};
use vsgraph::host::HostFile;
use vsgraph_core::{GraphError, GraphTopology, Payload, Vector2};

fn bundled(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("graphs")
        .join(name)
}

fn write_graph(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write");
    file.flush().expect("flush");
    file
}

// =============================================================================
// BUNDLED GRAPHS
// =============================================================================

#[test]
fn hello_prints_once() {
    let file = HostFile::load(&bundled("hello.toml")).expect("load");
    let outcome = run_graph(&file, 3, false).expect("run");

    assert_eq!(outcome.graph, "hello");
    assert_eq!(outcome.ticks.len(), 3);
    assert_eq!(outcome.prints.len(), 1);
    assert_eq!(outcome.prints[0].count, 1);
    assert_eq!(outcome.prints[0].history, vec![Payload::Signal]);
    assert!(outcome.quiescent);
}

#[test]
fn convert_delivers_converted_values() {
    let file = HostFile::load(&bundled("convert.toml")).expect("load");
    let outcome = run_graph(&file, 1, false).expect("run");

    let history = |node: u64| {
        outcome
            .prints
            .iter()
            .find(|p| p.node == node)
            .map(|p| p.history.clone())
            .unwrap_or_default()
    };
    assert_eq!(history(3), vec![Payload::Int(3)]);
    assert_eq!(history(4), vec![Payload::Vector2(Vector2::new(3.7, 0.0))]);
    assert_eq!(
        history(6),
        vec![Payload::Float(3.7), Payload::Float(3.7 + 3.7)]
    );
    assert_eq!(history(7), vec![Payload::Signal]);
}

#[test]
fn delay_stops_when_quiescent() {
    let file = HostFile::load(&bundled("delay.toml")).expect("load");
    let outcome = run_graph(&file, 100, true).expect("run");

    assert_eq!(outcome.ticks.len(), 5);
    assert_eq!(outcome.ticks[1].active, vec![1]);
    assert_eq!(outcome.prints[0].count, 1);
    assert!(outcome.quiescent);
}

#[test]
fn bundled_graphs_validate_and_inspect() {
    for name in ["hello.toml", "convert.toml", "delay.toml"] {
        let path = bundled(name);
        cmd_validate(&path, true).expect("validate");
        cmd_inspect(&path, true).expect("inspect");
    }
    cmd_kinds(true).expect("kinds");
}

// =============================================================================
// ERROR PATHS
// =============================================================================

#[test]
fn missing_file_is_io_error() {
    let result = HostFile::load(Path::new("/definitely/not/here.toml"));
    assert!(matches!(result, Err(GraphError::Io(_))));
}

#[test]
fn directory_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = HostFile::load(dir.path());
    assert!(matches!(result, Err(GraphError::Io(_))));
}

#[test]
fn malformed_graph_fails_validation() {
    let file = write_graph(
        r#"
[[nodes]]
id = 1
kind = "Start"
sockets = [{ id = 10, direction = "Output", type = "Signal" }]
state = { Start = { output = 10 } }

[[edges]]
id = 1
from = 10
to = 99
"#,
    );
    let result = cmd_validate(file.path(), true);
    assert!(matches!(result, Err(GraphError::MalformedGraph(_))));
}

#[test]
fn kind_state_mismatch_is_malformed() {
    let file = write_graph(
        r#"
[[nodes]]
id = 1
kind = "Print"
sockets = [{ id = 10, direction = "Output", type = "Signal" }]
state = { Start = { output = 10 } }
"#,
    );
    let host = HostFile::load(file.path()).expect("load");
    let result = run_graph(&host, 1, false);
    assert!(matches!(result, Err(GraphError::MalformedGraph(_))));
}

#[test]
fn injection_into_output_is_rejected() {
    let file = write_graph(
        r#"
[[nodes]]
id = 1
kind = "Start"
sockets = [{ id = 10, direction = "Output", type = "Signal" }]
state = { Start = { output = 10 } }

[[inject]]
socket = 10
"#,
    );
    let host = HostFile::load(file.path()).expect("load");
    let result = run_graph(&host, 1, false);
    assert!(matches!(result, Err(GraphError::InvalidInjection(_))));
}

#[test]
fn cycle_is_reported_per_tick() {
    let file = write_graph(
        r#"
[engine]
max_propagation_rounds = 32

[[nodes]]
id = 1
kind = "Relay"
sockets = [
    { id = 10, direction = "Input", type = "Signal" },
    { id = 11, direction = "Output", type = "Signal" },
]
state = { Relay = { input = 10, output = 11 } }

[[edges]]
id = 1
from = 11
to = 10

[[inject]]
tick = 0
socket = 10
"#,
    );
    let host = HostFile::load(file.path()).expect("load");
    let outcome = run_graph(&host, 2, false).expect("run");

    assert!(outcome.ticks[0].report.is_none());
    assert!(outcome.ticks[0].error.is_some());
    assert!(outcome.ticks[1].report.is_some());
    assert!(outcome.quiescent);
}

#[test]
fn fanout_lists_every_output() {
    let host = HostFile::load(&bundled("convert.toml")).expect("load");
    let topology = GraphTopology::build(&host.nodes, &host.edges).expect("build");
    let entries = fanout_entries(&topology);

    let value = entries.iter().find(|e| e.socket == 21).expect("value output");
    assert_eq!(value.targets.len(), 4);
    assert_eq!(value.socket_type, "Float");
    assert_eq!(entries.len(), 4);
}
