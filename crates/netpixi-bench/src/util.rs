use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// An undirected random graph as NDJSON. Every vertex has coordinates in
/// `[0, 1000)`; edges never repeat in either direction.
pub fn generate_synthetic_graph(vertex_count: usize, edge_count: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lines = Vec::with_capacity(1 + vertex_count + edge_count);

    lines.push(serde_json::json!({"type": "settings", "props": {}}).to_string());
    for i in 0..vertex_count {
        lines.push(
            serde_json::json!({
                "type": "vertex",
                "id": i,
                "props": {
                    "x": rng.gen_range(0.0..1000.0),
                    "y": rng.gen_range(0.0..1000.0),
                }
            })
            .to_string(),
        );
    }

    let mut seen = HashSet::new();
    let wanted = edge_count.min(vertex_count * vertex_count.saturating_sub(1) / 2);
    while seen.len() < wanted {
        let source = rng.gen_range(0..vertex_count);
        let target = rng.gen_range(0..vertex_count);
        if source == target || !seen.insert((source.min(target), source.max(target))) {
            continue;
        }
        lines.push(
            serde_json::json!({"type": "edge", "source": source, "target": target}).to_string(),
        );
    }

    lines.join("\n")
}

pub fn write_synthetic_graph(
    vertex_count: usize,
    edge_count: usize,
    seed: u64,
) -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("graph.ndjson");
    fs::write(&path, generate_synthetic_graph(vertex_count, edge_count, seed))?;
    Ok((temp_dir, path))
}
