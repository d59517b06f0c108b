use clap::{ArgAction, Parser, ValueEnum};
use ipnet::IpNet;
use itertools::Itertools;
use mrtgen::encoder::{write_rib, ByteSink};
use mrtgen::generator::generate_rib;
use mrtgen::log_category;
use mrtgen::logging::{LogCategory, LogContext};
use mrtgen::models::{GenerationConfig, Origin, PeerDescriptor, RouteEntry, Safi};
use smallvec::smallvec;
use std::fs::File;
use std::net::IpAddr;
use std::path::PathBuf;

const LOG_HELP: &str = "Log categories (enable with -l, repeatable):
  normal  progress and configuration summaries (default on)
  error   failures (default on)
  bgp     per-route encoding details
  io      write buffer and flush activity

Use -v, -vv to see debug and trace messages of the enabled categories.";

/// mrtgen generates a synthetic BGP RIB and writes it as an MRT TABLE_DUMP_V2 file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, after_help = LOG_HELP)]
struct Opts {
    /// Output file name
    #[clap(short, long, default_value = "gen.mrt")]
    file: PathBuf,

    /// Base AS number, the first hop of every AS path
    #[clap(short, long, default_value_t = 100_000)]
    asn: u32,

    /// Base prefix, stepped by one prefix block per route
    #[clap(short, long, default_value = "10.0.0.0/32")]
    prefix: IpNet,

    /// Number of routes to generate
    #[clap(short = 'P', long, default_value_t = 10)]
    prefix_count: u32,

    /// Base next hop
    #[clap(short, long, default_value = "172.16.0.0")]
    nexthop: IpAddr,

    /// Number of distinct next hops before wrapping back to the base next hop, 0 never wraps
    #[clap(short = 'N', long, default_value_t = 2000)]
    nexthop_count: u32,

    /// Local preference, 0 leaves the attribute out
    #[clap(short = 'L', long)]
    local_pref: Option<u32>,

    /// MPLS label
    #[clap(short = 'M', long, default_value_t = 100_000)]
    label: u32,

    /// Subsequent address family of the generated prefixes
    #[clap(short, long, value_enum, default_value_t = SafiArg::Unicast)]
    safi: SafiArg,

    /// Route origin
    #[clap(short, long, value_enum, default_value_t = OriginArg::Igp)]
    origin: OriginArg,

    /// Address of the dumped peer, also its BGP identifier when IPv4
    #[clap(long, default_value = "192.168.1.1")]
    peer_address: IpAddr,

    /// AS number of the dumped peer
    #[clap(long, default_value_t = 4_200_000_000)]
    peer_asn: u32,

    /// Enable a log category
    #[clap(short, long, value_enum)]
    logging: Vec<LogCategory>,

    /// Raise log verbosity
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SafiArg {
    Unicast,
    LabelUnicast,
    VpnUnicast,
}

impl From<SafiArg> for Safi {
    fn from(value: SafiArg) -> Self {
        match value {
            SafiArg::Unicast => Safi::Unicast,
            SafiArg::LabelUnicast => Safi::LabelUnicast,
            SafiArg::VpnUnicast => Safi::VpnUnicast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OriginArg {
    Igp,
    Egp,
    Incomplete,
}

impl From<OriginArg> for Origin {
    fn from(value: OriginArg) -> Self {
        match value {
            OriginArg::Igp => Origin::IGP,
            OriginArg::Egp => Origin::EGP,
            OriginArg::Incomplete => Origin::INCOMPLETE,
        }
    }
}

impl Opts {
    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            base: RouteEntry {
                sequence: 0,
                as_path: smallvec![self.asn],
                origin: self.origin.into(),
                prefix: self.prefix,
                prefix_safi: self.safi.into(),
                next_hop: self.nexthop,
                next_hop_safi: Safi::Unicast,
                labels: smallvec![self.label],
                local_preference: self.local_pref.filter(|v| *v != 0),
            },
            prefix_count: self.prefix_count,
            nexthop_pool_size: self.nexthop_count,
        }
    }
}

fn main() {
    let opts: Opts = Opts::parse();

    let default_level = match opts.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let log_ctx = LogContext::with_categories(&opts.logging);
    let config = opts.generation_config();

    log_category!(
        log_ctx,
        Normal,
        info,
        "file {}, origin {}, AS {}, prefix {} x {}, nexthop {} pool {}, label {}, logging [{}]",
        opts.file.display(),
        config.base.origin,
        opts.asn,
        config.base.prefix,
        config.prefix_count,
        config.base.next_hop,
        config.nexthop_pool_size,
        opts.label,
        LogCategory::ALL
            .iter()
            .filter(|c| log_ctx.is_enabled(**c))
            .map(|c| c.name())
            .join(",")
    );

    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {}", e);
        std::process::exit(1);
    }

    let file = match File::create(&opts.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cannot open {}: {}", opts.file.display(), e);
            std::process::exit(1);
        }
    };

    let peer = PeerDescriptor::new(opts.peer_address, opts.peer_asn);
    let routes = generate_rib(&config, log_ctx);

    let mut sink = ByteSink::new(file, log_ctx);
    match write_rib(routes, &peer, &mut sink) {
        Ok(count) => {
            log_category!(
                log_ctx,
                Normal,
                info,
                "wrote {} routes to {}",
                count,
                opts.file.display()
            );
        }
        Err(e) => {
            eprintln!("writing {} failed: {}", opts.file.display(), e);
            std::process::exit(1);
        }
    }
}
