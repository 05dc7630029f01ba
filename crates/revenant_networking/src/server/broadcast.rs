//! # Update Broadcaster
//!
//! Turns the server's entity table into `EntityUpdate` packets.
//!
//! Segments carry no length prefix, so a segment is never split across
//! packets: every returned packet drains on its own.

use revenant_shared::{PacketType, MAX_PACKET_SIZE};

use crate::entity::EntityTable;
use crate::protocol::PacketWriter;

/// Size of the packet type tag at the start of every packet.
const TAG_SIZE: usize = 4;

/// Encodes entity state into size-limited update packets.
///
/// Keeps its scratch buffers between calls.
#[derive(Debug)]
pub struct UpdateBroadcaster {
    max_packet_size: usize,
    segment: PacketWriter,
}

impl UpdateBroadcaster {
    /// Creates a broadcaster splitting at [`MAX_PACKET_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_packet_size(MAX_PACKET_SIZE)
    }

    /// Creates a broadcaster splitting at `max_packet_size` bytes.
    ///
    /// A single segment larger than the limit still goes out, alone in its
    /// packet.
    #[must_use]
    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self {
            max_packet_size,
            segment: PacketWriter::with_capacity(64),
        }
    }

    /// Byte budget per packet.
    #[must_use]
    pub const fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    /// Writes one segment per entity (only changed ones if `only_changed`)
    /// in dense order. A changed-only pass clears the flag of every entity it
    /// writes. A full pass leaves the flags alone.
    ///
    /// Returns no packets when there is nothing to send.
    pub fn encode_updates(
        &mut self,
        table: &mut EntityTable,
        only_changed: bool,
    ) -> Vec<Vec<u8>> {
        let mut packets = Vec::new();
        let mut current = PacketWriter::packet(PacketType::EntityUpdate);
        let mut segments = 0usize;
        let mut total = 0usize;

        for entity in table.iter_mut() {
            if only_changed && !entity.has_changed() {
                continue;
            }
            self.segment.reset();
            entity.serialize(&mut self.segment);
            if only_changed {
                entity.set_changed(false);
            }

            if segments > 0 && current.len() + self.segment.len() > self.max_packet_size {
                packets.push(current.into_bytes());
                current = PacketWriter::packet(PacketType::EntityUpdate);
                segments = 0;
            }
            current.write_bytes(self.segment.as_slice());
            segments += 1;
            total += 1;
        }
        if segments > 0 {
            packets.push(current.into_bytes());
        }

        if total > 0 {
            tracing::debug!(
                "Encoded {} entity segments into {} packets",
                total,
                packets.len()
            );
        }
        debug_assert!(packets.iter().all(|p| p.len() > TAG_SIZE));
        packets
    }
}

impl Default for UpdateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
