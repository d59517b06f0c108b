use ipnet::IpNet;
use mrtgen::encoder::{write_rib, ByteSink};
use mrtgen::generator::generate_rib;
use mrtgen::logging::LogContext;
use mrtgen::models::*;
use mrtgen::RecordIterator;
use smallvec::smallvec;
use std::fs::File;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

fn config(prefix: &str, next_hop: &str, prefix_count: u32) -> GenerationConfig {
    GenerationConfig {
        base: RouteEntry {
            prefix: IpNet::from_str(prefix).unwrap(),
            next_hop: IpAddr::from_str(next_hop).unwrap(),
            ..Default::default()
        },
        prefix_count,
        nexthop_pool_size: 3,
    }
}

/// Generates and writes a dump to `path`, returning the generated routes.
fn write_dump(
    path: &Path,
    config: &GenerationConfig,
    peer: &PeerDescriptor,
    capacity: usize,
) -> anyhow::Result<Vec<RouteEntry>> {
    config.validate()?;
    let routes = generate_rib(config, LogContext::silent());
    let mut sink = ByteSink::with_capacity(File::create(path)?, capacity, LogContext::silent());
    let count = write_rib(&routes, peer, &mut sink)?;
    assert_eq!(count, routes.len());
    Ok(routes)
}

fn read_dump(path: &Path) -> anyhow::Result<Vec<MrtRecord>> {
    let mut records = vec![];
    for record in RecordIterator::from_path(path)? {
        records.push(record?);
    }
    Ok(records)
}

fn rib(record: &MrtRecord) -> &RibEntries {
    match &record.message {
        TableDumpV2Message::Rib(rib) => rib,
        other => panic!("expected a RIB record, got {:?}", other),
    }
}

fn mp_reach(entry: &RibEntry) -> Option<&Nlri> {
    match entry.get_attr(AttrType::MP_REACHABLE_NLRI) {
        Some(AttributeValue::MpReachNlri(nlri)) => Some(nlri),
        _ => None,
    }
}

/// Walks the record framing of a file: every length field has to land exactly on the next
/// record header, and the last one on the end of the file.
fn assert_framing(path: &Path, expected_records: usize) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let mut offset = 0;
    let mut records = 0;
    while offset < data.len() {
        let length = u32::from_be_bytes(data[offset + 8..offset + 12].try_into()?) as usize;
        offset += COMMON_HEADER_LEN + length;
        records += 1;
    }
    assert_eq!(offset, data.len());
    assert_eq!(records, expected_records);
    Ok(())
}

#[test]
fn test_ipv4_unicast_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("ipv4.mrt");
    let peer = PeerDescriptor::default();
    let routes = write_dump(&path, &config("10.0.0.0/24", "172.16.0.0", 10), &peer, 4096)?;

    assert_framing(&path, 11)?;
    let records = read_dump(&path)?;
    assert_eq!(records.len(), 11);

    match &records[0].message {
        TableDumpV2Message::PeerIndexTable(table) => {
            assert_eq!(table.collector_bgp_id, peer.collector_bgp_id);
            assert_eq!(table.peers.len(), 1);
            assert_eq!(table.peers[0].peer_address, peer.address);
            assert_eq!(table.peers[0].peer_asn, peer.as_number);
            assert_eq!(table.peers[0].peer_type, PeerType::AS_SIZE_32BIT);
        }
        other => panic!("expected the peer index table first, got {:?}", other),
    }

    for (i, (record, route)) in records[1..].iter().zip(routes.iter()).enumerate() {
        assert_eq!(record.common_header.entry_type, EntryType::TABLE_DUMP_V2);
        assert_eq!(record.common_header.timestamp, peer.timestamp);
        let rib = rib(record);
        assert_eq!(rib.rib_type, TableDumpV2Type::RibIpv4Unicast);
        assert_eq!(rib.sequence_number, i as u32);
        assert_eq!(rib.prefix, route.prefix);
        assert_eq!(rib.rib_entries.len(), 1);

        let entry = &rib.rib_entries[0];
        assert_eq!(entry.peer_index, 0);
        assert_eq!(entry.originated_time, peer.timestamp);
        assert_eq!(
            entry.get_attr(AttrType::ORIGIN),
            Some(&AttributeValue::Origin(Origin::IGP))
        );
        assert_eq!(
            entry.get_attr(AttrType::AS_PATH),
            Some(&AttributeValue::AsPath(vec![100_000]))
        );
        assert_eq!(
            entry.get_attr(AttrType::NEXT_HOP),
            Some(&AttributeValue::NextHop(route.next_hop))
        );
        assert!(entry.get_attr(AttrType::LOCAL_PREFERENCE).is_none());
        assert!(mp_reach(entry).is_none());
    }

    // pool of three next hops
    assert_eq!(routes[3].next_hop, routes[0].next_hop);
    assert_eq!(routes[9].prefix, IpNet::from_str("10.0.9.0/24")?);
    Ok(())
}

#[test]
fn test_ipv6_unicast() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("ipv6.mrt");
    let mut config = config("2001:db8::/48", "2001:db8::1", 5);
    config.base.local_preference = Some(250);
    let routes = write_dump(&path, &config, &PeerDescriptor::default(), 4096)?;

    assert_framing(&path, 6)?;
    let records = read_dump(&path)?;
    for (record, route) in records[1..].iter().zip(routes.iter()) {
        let rib = rib(record);
        assert_eq!(rib.rib_type, TableDumpV2Type::RibIpv6Unicast);
        assert_eq!(rib.afi, Afi::Ipv6);

        let entry = &rib.rib_entries[0];
        assert!(entry.get_attr(AttrType::NEXT_HOP).is_none());
        assert_eq!(
            entry.get_attr(AttrType::LOCAL_PREFERENCE),
            Some(&AttributeValue::LocalPreference(250))
        );
        let nlri = mp_reach(entry).expect("MP_REACH_NLRI for an IPv6 prefix");
        assert_eq!(nlri.afi, Afi::Ipv6);
        assert_eq!(nlri.safi, Safi::Unicast);
        assert_eq!(nlri.next_hop, Some(route.next_hop));
        assert_eq!(nlri.prefixes, vec![route.prefix]);
    }
    Ok(())
}

#[test]
fn test_label_unicast_uses_rib_generic() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("labeled.mrt");
    let mut config = config("10.0.0.0/32", "172.16.0.0", 4);
    config.base.prefix_safi = Safi::LabelUnicast;
    let routes = write_dump(&path, &config, &PeerDescriptor::default(), 4096)?;

    let records = read_dump(&path)?;
    assert_eq!(records.len(), 5);
    for (record, route) in records[1..].iter().zip(routes.iter()) {
        assert_eq!(record.common_header.entry_subtype, 6);
        let rib = rib(record);
        assert_eq!((rib.afi, rib.safi), (Afi::Ipv4, Safi::LabelUnicast));
        assert_eq!(rib.prefix, route.prefix);

        let entry = &rib.rib_entries[0];
        // the IPv4 next hop is still carried as NEXT_HOP
        assert_eq!(
            entry.get_attr(AttrType::NEXT_HOP),
            Some(&AttributeValue::NextHop(route.next_hop))
        );
        let nlri = mp_reach(entry).expect("MP_REACH_NLRI for a labeled prefix");
        assert_eq!(nlri.safi, Safi::LabelUnicast);
        assert_eq!(nlri.next_hop, None);
        assert_eq!(nlri.prefixes, vec![route.prefix]);
    }
    Ok(())
}

#[test]
fn test_small_buffer_many_routes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("many.mrt");
    let mut config = config("10.0.0.0/32", "172.16.0.0", 2000);
    config.nexthop_pool_size = 100;
    // a few records per buffer, so flushes happen in the middle of records
    let routes = write_dump(&path, &config, &PeerDescriptor::default(), 200)?;

    assert_framing(&path, 2001)?;
    let records = read_dump(&path)?;
    assert_eq!(records.len(), 2001);
    let sequences: Vec<u32> = records[1..]
        .iter()
        .map(|r| rib(r).sequence_number)
        .collect();
    assert_eq!(sequences, (0..2000).collect::<Vec<u32>>());
    assert_eq!(rib(&records[2000]).prefix, routes[1999].prefix);
    Ok(())
}

#[test]
fn test_as_path_stops_at_zero() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("aspath.mrt");
    let mut config = config("10.0.0.0/32", "172.16.0.0", 1);
    config.base.as_path = smallvec![65001, 65002, 0, 65003];
    config.base.origin = Origin::INCOMPLETE;
    write_dump(&path, &config, &PeerDescriptor::default(), 4096)?;

    let records = read_dump(&path)?;
    let entry = &rib(&records[1]).rib_entries[0];
    assert_eq!(
        entry.get_attr(AttrType::AS_PATH),
        Some(&AttributeValue::AsPath(vec![65001, 65002]))
    );
    assert_eq!(
        entry.get_attr(AttrType::ORIGIN),
        Some(&AttributeValue::Origin(Origin::INCOMPLETE))
    );
    Ok(())
}

#[test]
fn test_ipv6_peer() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("peer6.mrt");
    let peer = PeerDescriptor::new(IpAddr::from_str("2001:db8:ffff::1")?, 65000);
    write_dump(&path, &config("10.0.0.0/32", "172.16.0.0", 2), &peer, 4096)?;

    let records = read_dump(&path)?;
    match &records[0].message {
        TableDumpV2Message::PeerIndexTable(table) => {
            let entry = &table.peers[0];
            assert_eq!(
                entry.peer_type,
                PeerType::AS_SIZE_32BIT | PeerType::ADDRESS_FAMILY_IPV6
            );
            assert_eq!(entry.peer_address, peer.address);
            assert!(entry.peer_bgp_id.is_unspecified());
        }
        other => panic!("expected the peer index table first, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_family_mismatch_rejected_before_writing() {
    let config = config("2001:db8::/48", "172.16.0.0", 1);
    assert!(matches!(
        config.validate(),
        Err(mrtgen::MrtGenError::AddressFamilyMismatch { .. })
    ));
}
