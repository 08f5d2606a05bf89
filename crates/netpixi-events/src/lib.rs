use crossbeam_channel::{unbounded, Receiver, Sender};
use netpixi_core::VertexId;
use serde::{Deserialize, Serialize};

/// Interaction events reported by the rendering surface.
///
/// Pointer offsets are in canvas pixels, relative to the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // ========================================================================
    // Pointer
    // ========================================================================
    /// Button pressed over empty canvas.
    PointerDown { x: f64, y: f64 },
    /// Button pressed over a vertex.
    VertexPointerDown { id: VertexId },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Pointer entered a vertex.
    VertexHover { id: VertexId },
    /// Pointer left a vertex.
    VertexUnhover { id: VertexId },
    Wheel { delta_y: f64, x: f64, y: f64 },
    DoubleClick,

    // ========================================================================
    // Canvas
    // ========================================================================
    /// The host element changed width; height follows the aspect ratio.
    Resize { width: f64 },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener, one at a time, in order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
            handled += 1;
        }
        handled
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
