//! Packet interception
//!
//! Listeners are registered against one packet type and get to edit each
//! matching packet before it reaches the transport.

use std::collections::HashMap;
use std::sync::Arc;

use crate::display::DisplayEngine;
use super::packet::{Packet, PacketType};

/// A hook on outgoing packets of one type
pub trait PacketListener: Send + Sync {
    fn packet_type(&self) -> PacketType;

    /// Edit the packet in place; must not block
    fn on_send(&self, packet: &mut Packet);
}

/// Injects active stats into window contents
#[derive(Debug, Clone)]
pub struct WindowItemsListener {
    engine: DisplayEngine,
}

impl WindowItemsListener {
    pub fn new(engine: DisplayEngine) -> Self {
        Self { engine }
    }
}

impl PacketListener for WindowItemsListener {
    fn packet_type(&self) -> PacketType {
        PacketType::WindowItems
    }

    fn on_send(&self, packet: &mut Packet) {
        let Packet::WindowItems(window) = packet else {
            return;
        };
        match window.items.take() {
            Some(items) if !items.is_empty() => {
                window.items = Some(self.engine.rewrite_items(items));
            }
            untouched => window.items = untouched,
        }
    }
}

/// Listeners by packet type, run in registration order
#[derive(Default, Clone)]
pub struct PacketPipeline {
    listeners: HashMap<PacketType, Vec<Arc<dyn PacketListener>>>,
}

impl PacketPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Arc<dyn PacketListener>) {
        log::debug!("Registered packet listener for {:?}", listener.packet_type());
        self.listeners
            .entry(listener.packet_type())
            .or_default()
            .push(listener);
    }

    pub fn listener_count(&self, packet_type: PacketType) -> usize {
        self.listeners.get(&packet_type).map_or(0, Vec::len)
    }

    /// Run every listener for this packet's type
    pub fn dispatch_outgoing(&self, packet: &mut Packet) {
        if let Some(listeners) = self.listeners.get(&packet.packet_type()) {
            for listener in listeners {
                listener.on_send(packet);
            }
        }
    }
}

impl std::fmt::Debug for PacketPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self.listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("PacketPipeline").field("listeners", &counts).finish()
    }
}
