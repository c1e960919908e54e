//! doc-address CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Resolves a node of a document snapshot to its paragraph address:
//!
//!     doc-address <snapshot.json> <node-id> [offset]

use doc_address::address::resolve_current_position;
use doc_address::{Document, HostSelection, LocatorConfig, NodeId, NodeSnapshot};
use std::error::Error;
use std::process::ExitCode;

fn usage() {
    println!("doc-address: paragraph addressing core");
    println!("======================================");
    println!();
    println!("This is a library crate. To use it:");
    println!();
    println!("  1. Build WASM: wasm-pack build --target web");
    println!("  2. Load it from the add-on host and call WasmSession");
    println!();
    println!("To resolve a node of a snapshot from the command line:");
    println!("  doc-address <snapshot.json> <node-id> [offset]");
}

fn run(snapshot_path: &str, node: &str, offset: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = std::fs::read_to_string(snapshot_path)?;
    let snapshot: NodeSnapshot = serde_json::from_str(&json)?;
    let doc = Document::from_snapshot(&snapshot)?;

    let node = NodeId(node.parse()?);
    let offset = offset.map(str::parse).transpose()?.unwrap_or(0);
    let state = HostSelection::cursor(node, offset);

    match resolve_current_position(&doc, &state, &LocatorConfig::default())? {
        Some(address) => println!("{}", serde_json::to_string(&address)?),
        None => println!("{node} is not inside a paragraph"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, node) = match (args.first(), args.get(1)) {
        (Some(path), Some(node)) => (path, node),
        _ => {
            usage();
            return ExitCode::SUCCESS;
        }
    };

    match run(path, node, args.get(2).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
