//! Protocol interception
//!
//! Outgoing packet types and the listener pipeline that edits them.

pub mod packet;
pub mod listener;

pub use packet::{Packet, PacketType, WindowItems, SetSlot};
pub use listener::{PacketListener, PacketPipeline, WindowItemsListener};
