use crate::log_category;
use crate::logging::LogContext;
use crate::models::*;
use ipnet::IpNet;
use std::net::IpAddr;

/// Address distance between two consecutive prefixes of the length of `prefix`.
///
/// A zero-length prefix covers the whole address space, so its stride is zero and every
/// generated route repeats the base prefix.
pub fn prefix_stride(prefix: &IpNet) -> u128 {
    let bits = Afi::from(prefix.addr()).address_bits();
    let len = prefix.prefix_len();
    match len {
        0 => 0,
        len if len <= bits => 1u128 << (bits - len),
        _ => 0,
    }
}

/// Iterator over the routes generated from a [GenerationConfig].
///
/// The generator keeps a cursor route that starts out as the template. Every call to `next`
/// stamps the cursor with the next sequence number, hands out a copy, then advances the cursor
/// prefix by one stride and the cursor next hop by one address.
///
/// The next hop wraps back to the template next hop once `nexthop_pool_size` distinct next hops
/// have been issued. A pool size of zero never wraps.
#[derive(Debug, Clone)]
pub struct RibGenerator {
    cursor: RouteEntry,
    base_next_hop: IpAddr,
    prefix_stride: u128,
    nexthop_pool_size: u32,
    /// Next hops issued since the last wrap, counting the current one.
    nexthop_counter: u32,
    next_sequence: u32,
    prefix_count: u32,
}

impl RibGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        RibGenerator {
            cursor: config.base.clone(),
            base_next_hop: config.base.next_hop,
            prefix_stride: prefix_stride(&config.base.prefix),
            nexthop_pool_size: config.nexthop_pool_size,
            nexthop_counter: 1,
            next_sequence: 0,
            prefix_count: config.prefix_count,
        }
    }

    pub fn prefix_stride(&self) -> u128 {
        self.prefix_stride
    }

    fn advance(&mut self) {
        let prefix_addr = self.cursor.prefix.addr().wrapping_add_u128(self.prefix_stride);
        // same family and length as before, so the length is always valid
        if let Ok(prefix) = IpNet::new(prefix_addr, self.cursor.prefix.prefix_len()) {
            self.cursor.prefix = prefix;
        }

        if self.nexthop_counter == self.nexthop_pool_size {
            self.cursor.next_hop = self.base_next_hop;
            self.nexthop_counter = 1;
        } else {
            self.cursor.next_hop = self.cursor.next_hop.wrapping_add_u128(1);
            self.nexthop_counter = self.nexthop_counter.wrapping_add(1);
        }
    }
}

impl Iterator for RibGenerator {
    type Item = RouteEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_sequence >= self.prefix_count {
            return None;
        }

        self.cursor.sequence = self.next_sequence;
        let entry = self.cursor.clone();
        self.next_sequence += 1;
        self.advance();
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.prefix_count - self.next_sequence) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RibGenerator {}

/// Generates the full ordered route sequence for `config`.
///
/// Running out of memory stops generation early: the error is logged and the routes generated
/// so far are returned.
pub fn generate_rib(config: &GenerationConfig, log_ctx: LogContext) -> Vec<RouteEntry> {
    let generator = RibGenerator::new(config);
    log_category!(
        log_ctx,
        Normal,
        debug,
        "generating {} routes from {}, prefix stride {}",
        config.prefix_count,
        config.base.prefix,
        generator.prefix_stride()
    );

    let mut entries = Vec::new();
    if entries
        .try_reserve_exact(config.prefix_count as usize)
        .is_err()
    {
        log_category!(
            log_ctx,
            Error,
            warn,
            "cannot reserve memory for {} routes up front",
            config.prefix_count
        );
    }

    for entry in generator {
        if entries.try_reserve(1).is_err() {
            log_category!(
                log_ctx,
                Error,
                error,
                "out of memory after {} routes, generation stopped",
                entries.len()
            );
            break;
        }
        entries.push(entry);
    }

    log_category!(log_ctx, Normal, info, "generated {} routes", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config(prefix: &str, next_hop: &str, prefix_count: u32, pool: u32) -> GenerationConfig {
        GenerationConfig {
            base: RouteEntry {
                prefix: IpNet::from_str(prefix).unwrap(),
                next_hop: IpAddr::from_str(next_hop).unwrap(),
                ..Default::default()
            },
            prefix_count,
            nexthop_pool_size: pool,
        }
    }

    fn prefixes(entries: &[RouteEntry]) -> Vec<String> {
        entries.iter().map(|e| e.prefix.to_string()).collect()
    }

    fn next_hops(entries: &[RouteEntry]) -> Vec<String> {
        entries.iter().map(|e| e.next_hop.to_string()).collect()
    }

    #[test]
    fn test_prefix_stride() {
        assert_eq!(prefix_stride(&IpNet::from_str("10.0.0.0/32").unwrap()), 1);
        assert_eq!(prefix_stride(&IpNet::from_str("10.0.0.0/24").unwrap()), 256);
        assert_eq!(prefix_stride(&IpNet::from_str("10.0.0.0/1").unwrap()), 1 << 31);
        assert_eq!(prefix_stride(&IpNet::from_str("2001:db8::/64").unwrap()), 1 << 64);
        assert_eq!(prefix_stride(&IpNet::from_str("2001:db8::/128").unwrap()), 1);
        assert_eq!(prefix_stride(&IpNet::from_str("::/1").unwrap()), 1 << 127);
        assert_eq!(prefix_stride(&IpNet::from_str("0.0.0.0/0").unwrap()), 0);
        assert_eq!(prefix_stride(&IpNet::from_str("::/0").unwrap()), 0);
    }

    #[test]
    fn test_generate_ipv4_host_routes() {
        let entries = generate_rib(&config("10.0.0.0/32", "172.16.0.0", 3, 2000), LogContext::silent());
        assert_eq!(prefixes(&entries), vec!["10.0.0.0/32", "10.0.0.1/32", "10.0.0.2/32"]);
        assert_eq!(next_hops(&entries), vec!["172.16.0.0", "172.16.0.1", "172.16.0.2"]);
    }

    #[test]
    fn test_generate_sequence_numbers() {
        let entries = generate_rib(&GenerationConfig::default(), LogContext::silent());
        assert_eq!(entries.len(), 10);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.sequence, i as u32);
        }
    }

    #[test]
    fn test_generate_copies_template() {
        let mut config = config("10.0.0.0/24", "172.16.0.0", 4, 2000);
        config.base.local_preference = Some(200);
        config.base.origin = Origin::EGP;
        let entries = generate_rib(&config, LogContext::silent());
        assert!(entries.iter().all(|e| e.local_preference == Some(200)
            && e.origin == Origin::EGP
            && e.as_path == config.base.as_path
            && e.labels == config.base.labels));
    }

    #[test]
    fn test_nexthop_wrap() {
        let entries = generate_rib(&config("10.0.0.0/32", "172.16.0.0", 5, 2), LogContext::silent());
        assert_eq!(
            next_hops(&entries),
            vec!["172.16.0.0", "172.16.0.1", "172.16.0.0", "172.16.0.1", "172.16.0.0"]
        );
    }

    #[test]
    fn test_nexthop_pool_of_one() {
        let entries = generate_rib(&config("10.0.0.0/32", "172.16.0.9", 4, 1), LogContext::silent());
        assert!(entries.iter().all(|e| e.next_hop.to_string() == "172.16.0.9"));
    }

    #[test]
    fn test_nexthop_pool_of_zero_never_wraps() {
        let entries = generate_rib(&config("10.0.0.0/32", "172.16.0.254", 4, 0), LogContext::silent());
        assert_eq!(
            next_hops(&entries),
            vec!["172.16.0.254", "172.16.0.255", "172.16.1.0", "172.16.1.1"]
        );
    }

    #[test]
    fn test_generate_prefix_stride_24() {
        let entries = generate_rib(&config("10.0.255.0/24", "172.16.0.0", 3, 2000), LogContext::silent());
        assert_eq!(prefixes(&entries), vec!["10.0.255.0/24", "10.1.0.0/24", "10.1.1.0/24"]);
    }

    #[test]
    fn test_generate_ipv6() {
        let entries = generate_rib(&config("2001:db8::/64", "2001:db8::1", 3, 2000), LogContext::silent());
        assert_eq!(
            prefixes(&entries),
            vec!["2001:db8::/64", "2001:db8:0:1::/64", "2001:db8:0:2::/64"]
        );
        assert_eq!(
            next_hops(&entries),
            vec!["2001:db8::1", "2001:db8::2", "2001:db8::3"]
        );
    }

    #[test]
    fn test_generate_zero_length_prefix() {
        let entries = generate_rib(&config("0.0.0.0/0", "172.16.0.0", 3, 2000), LogContext::silent());
        assert!(entries.iter().all(|e| e.prefix.to_string() == "0.0.0.0/0"));
    }

    #[test]
    fn test_generate_wraps_address_space() {
        let entries = generate_rib(&config("255.255.255.255/32", "255.255.255.255", 2, 2000), LogContext::silent());
        assert_eq!(prefixes(&entries), vec!["255.255.255.255/32", "0.0.0.0/32"]);
        assert_eq!(next_hops(&entries), vec!["255.255.255.255", "0.0.0.0"]);
    }

    #[test]
    fn test_generate_empty() {
        let entries = generate_rib(&config("10.0.0.0/32", "172.16.0.0", 0, 2000), LogContext::silent());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_iterator_size_hint() {
        let mut generator = RibGenerator::new(&GenerationConfig::default());
        assert_eq!(generator.len(), 10);
        generator.next();
        assert_eq!(generator.len(), 9);
        assert_eq!(generator.count(), 9);
    }
}
