//! MRT RIB encoder module
//!
//! Writes a TABLE_DUMP_V2 RIB dump: one PEER_INDEX_TABLE record describing the single peer,
//! followed by one RIB record per route. Every record goes through the [ByteSink] as it is
//! encoded, so memory use is bounded by the sink capacity rather than by the number of routes.
use crate::encoder::{encode_attributes, encode_nlri_prefix, push_address, ByteSink, FlushOutcome};
use crate::error::MrtGenError;
use crate::log_category;
use crate::models::*;
use std::borrow::Borrow;
use std::io::Write;
use std::time::Duration;

/// How the final flush retries an output that keeps refusing bytes.
///
/// The wait between attempts starts at `initial_backoff` and doubles up to `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushRetry {
    pub attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for FlushRetry {
    fn default() -> Self {
        FlushRetry {
            attempts: 100,
            initial_backoff: Duration::from_micros(100),
            max_backoff: Duration::from_millis(10),
        }
    }
}

impl FlushRetry {
    /// Wait after the failed attempt number `attempt`, counting from zero.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Writes a complete MRT record: common header with a patched length, then the body produced by
/// `body`.
///
/// A record that fails half way is dropped from the sink, leaving earlier records intact.
fn encode_record<W, F>(
    sink: &mut ByteSink<W>,
    timestamp: u32,
    subtype: TableDumpV2Type,
    body: F,
) -> Result<(), MrtGenError>
where
    W: Write,
    F: FnOnce(&mut ByteSink<W>) -> Result<(), MrtGenError>,
{
    sink.begin_record();
    match encode_record_inner(sink, timestamp, subtype, body) {
        Ok(()) => {
            sink.end_record();
            Ok(())
        }
        Err(e) => {
            sink.abort_record();
            Err(e)
        }
    }
}

fn encode_record_inner<W, F>(
    sink: &mut ByteSink<W>,
    timestamp: u32,
    subtype: TableDumpV2Type,
    body: F,
) -> Result<(), MrtGenError>
where
    W: Write,
    F: FnOnce(&mut ByteSink<W>) -> Result<(), MrtGenError>,
{
    sink.push_u32(timestamp)?;
    sink.push_u16(EntryType::TABLE_DUMP_V2.into())?;
    sink.push_u16(subtype.into())?;
    let length_offset = sink.position();
    sink.push_u32(0)?;

    let body_start = sink.position();
    body(sink)?;
    let length = sink.position() - body_start;
    sink.backpatch(length_offset, 4, length as u64)
}

/// Writes the PEER_INDEX_TABLE record for `peer`.
///
/// The table has an empty view name and exactly one peer entry, which every RIB record refers
/// to as index 0. The peer type always announces four-byte AS numbers, plus the IPv6 bit when
/// the peer address is IPv6.
pub fn write_peer_index_table<W: Write>(
    peer: &PeerDescriptor,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    encode_record(sink, peer.timestamp, TableDumpV2Type::PeerIndexTable, |sink| {
        sink.push_u32(peer.collector_bgp_id.into())?;
        // view name length, no view name
        sink.push_u16(0)?;
        // peer count
        sink.push_u16(1)?;

        sink.push_u8(PeerType::for_address(&peer.address).bits())?;
        sink.push_u32(peer.bgp_id.into())?;
        push_address(&peer.address, sink)?;
        sink.push_u32(peer.as_number)
    })?;

    log_category!(
        sink.log_ctx(),
        Bgp,
        debug,
        "peer index table: peer {} AS {} bgp-id {}",
        peer.address,
        peer.as_number,
        peer.bgp_id
    );
    Ok(())
}

/// Writes one RIB record holding `entry` as the only RIB entry, attributed to peer index 0.
///
/// The subtype follows the prefix family and SAFI; anything other than IPv4/IPv6 unicast goes
/// out as RIB_GENERIC with explicit AFI and SAFI fields.
pub fn write_rib_entry<W: Write>(
    entry: &RouteEntry,
    originated_time: u32,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    let subtype = TableDumpV2Type::for_rib(entry.prefix_afi(), entry.prefix_safi);
    encode_record(sink, originated_time, subtype, |sink| {
        sink.push_u32(entry.sequence)?;
        if subtype == TableDumpV2Type::RibGeneric {
            sink.push_u16(entry.prefix_afi().into())?;
            sink.push_u8(entry.prefix_safi.into())?;
        }
        encode_nlri_prefix(&entry.prefix, sink)?;

        // entry count
        sink.push_u16(1)?;
        // peer index
        sink.push_u16(0)?;
        sink.push_u32(originated_time)?;

        let attr_length_offset = sink.position();
        sink.push_u16(0)?;
        let attr_start = sink.position();
        encode_attributes(entry, sink)?;
        let attr_length = sink.position() - attr_start;
        sink.backpatch(attr_length_offset, 2, attr_length as u64)
    })?;

    log_category!(sink.log_ctx(), Bgp, trace, "{}", entry);
    Ok(())
}

/// Writes a full RIB dump for `peer` and returns the number of RIB records written.
///
/// Entries are consumed one by one, so a `Vec<RouteEntry>` passed by value is released as the
/// dump proceeds. The sink is flushed whenever it passes its high-water mark and drained with
/// [finish] at the end.
///
/// On an encoding error the partial record is discarded, the records completed so far are
/// offered to the output once more, and the error is returned.
pub fn write_rib<W, I>(
    entries: I,
    peer: &PeerDescriptor,
    sink: &mut ByteSink<W>,
) -> Result<usize, MrtGenError>
where
    W: Write,
    I: IntoIterator,
    I::Item: Borrow<RouteEntry>,
{
    write_rib_with_retry(entries, peer, sink, &FlushRetry::default())
}

/// [write_rib] with a caller-chosen retry policy for the final flush.
pub fn write_rib_with_retry<W, I>(
    entries: I,
    peer: &PeerDescriptor,
    sink: &mut ByteSink<W>,
    retry: &FlushRetry,
) -> Result<usize, MrtGenError>
where
    W: Write,
    I: IntoIterator,
    I::Item: Borrow<RouteEntry>,
{
    let mut count = 0;
    let result = write_peer_index_table(peer, sink).and_then(|()| {
        for entry in entries {
            if sink.needs_flush() {
                sink.flush();
            }
            write_rib_entry(entry.borrow(), peer.timestamp, sink)?;
            count += 1;
        }
        Ok(())
    });

    if let Err(e) = result {
        log_category!(
            sink.log_ctx(),
            Error,
            error,
            "RIB dump stopped after {} entries: {}",
            count,
            e
        );
        sink.flush();
        return Err(e);
    }

    finish_with_retry(sink, retry)?;
    log_category!(sink.log_ctx(), Normal, info, "wrote {} RIB entries", count);
    Ok(count)
}

/// Drains the sink into its writer and flushes the writer, retrying with the default
/// [FlushRetry].
pub fn finish<W: Write>(sink: &mut ByteSink<W>) -> Result<(), MrtGenError> {
    finish_with_retry(sink, &FlushRetry::default())
}

/// Drains the sink into its writer and flushes the writer.
///
/// Gives up with [MrtGenError::FlushIncomplete] when the output still refuses bytes after
/// `retry.attempts` tries. A closed output counts as drained.
pub fn finish_with_retry<W: Write>(
    sink: &mut ByteSink<W>,
    retry: &FlushRetry,
) -> Result<(), MrtGenError> {
    for attempt in 0..retry.attempts {
        if sink.flush() == FlushOutcome::Drained {
            if !sink.is_closed() {
                sink.get_mut().flush()?;
            }
            return Ok(());
        }
        if attempt + 1 < retry.attempts {
            let backoff = retry.backoff(attempt);
            log_category!(
                sink.log_ctx(),
                Io,
                trace,
                "output stalled, retrying in {:?}",
                backoff
            );
            std::thread::sleep(backoff);
        }
    }

    log_category!(
        sink.log_ctx(),
        Error,
        error,
        "output stalled with {} bytes pending",
        sink.len()
    );
    Err(MrtGenError::FlushIncomplete {
        pending: sink.len(),
    })
}
