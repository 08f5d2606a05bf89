use anyhow::{Context, Result, bail};
use clap::Parser;
use crossbeam_channel::bounded;
use netpixi_core::LoadError;
use netpixi_graph::{
    IngestContext, NetworkConverter, NetworkView, RawGraph, RecordingSurface, ViewOptions,
    write_network,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// NDJSON graph to load, or `-` for standard input
    path: PathBuf,

    /// Let the lower-degree endpoint lead each edge
    #[arg(long)]
    broker: bool,

    /// Keep input coordinates as they are instead of filling the canvas
    #[arg(long)]
    no_normalize: bool,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Canvas width over height
    #[arg(long)]
    aspect: Option<f64>,

    /// Seed for coordinates drawn at random
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with view options; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the laid-out graph back as NDJSON
    #[arg(long)]
    save: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Result<ViewOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ViewOptions::from_json(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ViewOptions::default(),
        };
        options.broker |= self.broker;
        if self.no_normalize {
            options.normalize = false;
        }
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(aspect) = self.aspect {
            options.aspect = aspect;
        }
        if self.seed.is_some() {
            options.seed = self.seed;
        }
        if !(options.width > 0.0 && options.aspect > 0.0) {
            bail!("width and aspect must be positive");
        }
        Ok(options)
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        if self.path.as_os_str() == "-" {
            return Ok(Box::new(BufReader::new(io::stdin())));
        }
        let file = File::open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads lines on a separate thread and validates them as they arrive.
fn ingest(reader: Box<dyn BufRead + Send>) -> Result<RawGraph, LoadError> {
    // Bounded so a slow validator holds the reader back
    let (tx, rx) = bounded::<io::Result<String>>(1024);

    let reader_handle = thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });

    let mut context = IngestContext::new();
    let mut result = Ok(());
    for line in &rx {
        result = line
            .map_err(LoadError::from)
            .and_then(|line| context.process_line(&line));
        if result.is_err() {
            break;
        }
    }
    // Dropping the receiver stops the reader at its next send
    drop(rx);
    if reader_handle.join().is_err() {
        tracing::error!("Reader thread panicked");
    }

    result.map(|()| context.finish())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let options = args.options()?;

    let raw = ingest(args.open()?).with_context(|| format!("loading {}", args.path.display()))?;
    let network = NetworkConverter::new(&options).convert(raw, &mut options.rng());

    let view = NetworkView::new(network, &options, RecordingSurface::new());
    let network = view.network();
    let visible = view.index().visible(network.vertices()).count();

    println!("Vertices: {}", network.vertex_count());
    println!("Edges: {}", network.edge_count());
    println!("Areas: {}", network.area_count());
    if let Some(area) = network.areas().max_by_key(|area| area.edge_count()) {
        println!(
            "Largest area: {} with {} edges",
            network[area.leader].id,
            area.edge_count()
        );
    }
    println!(
        "Visible at {}x{}: {}",
        view.camera().width(),
        view.camera().height(),
        visible
    );
    println!("Strokes drawn: {}", view.surface().stroke_count());

    if let Some(path) = &args.save {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let written = write_network(network, BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved {} records to {}", written, path.display());
    }

    Ok(())
}
