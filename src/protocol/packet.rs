//! Outgoing packets
//!
//! The subset of clientbound play packets the interception layer sees.
//! Framing and encoding belong to the transport.

use serde::{Deserialize, Serialize};

use crate::items::ItemStack;

/// Clientbound packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    /// Replaces every slot of an open window
    WindowItems,
    /// Replaces a single slot
    SetSlot,
    KeepAlive,
}

/// Full contents of a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowItems {
    pub window_id: u8,
    pub state_id: i32,
    /// Slots in window order; None when the packet carries no list
    pub items: Option<Vec<ItemStack>>,
    /// Item on the cursor
    pub carried: ItemStack,
}

/// A single slot update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSlot {
    pub window_id: i8,
    pub state_id: i32,
    pub slot: i16,
    pub item: ItemStack,
}

/// An outgoing packet as handed to listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    WindowItems(WindowItems),
    SetSlot(SetSlot),
    KeepAlive(i64),
}

impl Packet {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::WindowItems(_) => PacketType::WindowItems,
            Packet::SetSlot(_) => PacketType::SetSlot,
            Packet::KeepAlive(_) => PacketType::KeepAlive,
        }
    }
}
