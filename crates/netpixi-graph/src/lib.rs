pub mod batch;
pub mod bundling;
pub mod camera;
pub mod converter;
pub mod edit;
pub mod graph;
pub mod ingest;
pub mod layout;
pub mod options;
pub mod record;
pub mod save;
pub mod scheduler;
pub mod stream;
pub mod surface;
pub mod view;
pub mod viewport;

pub use batch::{AreaBatch, Path, Stroke, build_area_batch};
pub use bundling::{Bundles, EdgeBundler};
pub use camera::{Camera, MIN_PERCENT, Scales, step_percent};
pub use converter::{NetworkConverter, load_network};
pub use edit::{EditOutcome, Scope};
pub use graph::{Area, Axis, EdgeSlot, Neighbor, Network, Vec2, Vertex, VertexIndex};
pub use ingest::{EdgeTable, Extent, IngestContext, PendingVertex, RawGraph};
pub use layout::{LayoutNormalizer, Layouter};
pub use options::ViewOptions;
pub use record::{Record, RecordError};
pub use save::write_network;
pub use scheduler::{RedrawPlan, RedrawScheduler};
pub use stream::{LineDecoder, ingest_chunks, ingest_reader, ingest_str};
pub use surface::{RecordingSurface, RenderSurface, VertexSprite};
pub use view::NetworkView;
pub use viewport::{Bounds, ViewportIndex};
