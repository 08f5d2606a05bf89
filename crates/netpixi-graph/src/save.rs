use crate::graph::Network;
use netpixi_core::VertexId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{self, Write};

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OutRecord<'a> {
    Settings {
        props: Map<String, Value>,
    },
    Vertex {
        id: &'a VertexId,
        props: Map<String, Value>,
    },
    Edge {
        source: &'a VertexId,
        target: &'a VertexId,
        props: Map<String, Value>,
    },
}

fn write_record<W: Write>(writer: &mut W, record: &OutRecord<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")
}

/// Writes the network back as NDJSON: the settings override if there is one,
/// every vertex at its current drawing-space position, then every edge in its
/// logical direction. Returns the number of records written.
pub fn write_network<W: Write>(network: &Network, mut writer: W) -> io::Result<usize> {
    let mut written = 0;

    let overrides = network.settings.overrides();
    if !overrides.is_empty() {
        write_record(
            &mut writer,
            &OutRecord::Settings {
                props: overrides.to_props(),
            },
        )?;
        written += 1;
    }

    for vertex in network.vertices() {
        let mut props = Map::new();
        props.insert("x".to_string(), Value::from(vertex.position.x));
        props.insert("y".to_string(), Value::from(vertex.position.y));
        props.extend(vertex.props.to_map());
        write_record(
            &mut writer,
            &OutRecord::Vertex {
                id: &vertex.id,
                props,
            },
        )?;
        written += 1;
    }

    for (source, target, props) in network.edges() {
        write_record(
            &mut writer,
            &OutRecord::Edge {
                source: &network[source].id,
                target: &network[target].id,
                props: props.to_map(),
            },
        )?;
        written += 1;
    }

    writer.flush()?;
    tracing::info!("Wrote {} records", written);
    Ok(written)
}
