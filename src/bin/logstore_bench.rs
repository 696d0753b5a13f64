//! Workload report: insert, filter and stream timings for one store.
//!
//! Builds six indexes (token length / trie depth 4/3, 4/2, 3/3, 3/2, 2/2,
//! 1/1), two streams, inserts N entries whose tokens all repeat the byte
//! `i % 256`, then runs every exact-token query. Prints a summary table,
//! or the stats snapshot as JSON with `--json`.
//!
//! Run: cargo run --release --bin logstore_bench -- --entries 100000

use std::time::Instant;

use anyhow::{bail, Context};
use logstore::{BasicFilter, Entry, FilterQuery, IndexId, LogStore, StoreConfig, Token};

const HEADER_LEN: usize = 40;
const SHAPES: [(usize, usize); 6] = [(4, 3), (4, 2), (3, 3), (3, 2), (2, 2), (1, 1)];
const DEFAULT_ENTRIES: u64 = 2560;

struct Options {
    entries: u64,
    json: bool,
}

fn print_usage() {
    println!("logstore_bench {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: logstore_bench [--entries <n>] [--json]");
    println!();
    println!("Flags:");
    println!("  --entries <n>  Number of entries to insert (default: {})", DEFAULT_ENTRIES);
    println!("  --json         Print the stats snapshot as JSON");
    println!("  -V, --version  Print version information");
    println!("  -h, --help     Print this help message");
}

fn parse_args() -> anyhow::Result<Option<Options>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("logstore_bench {}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(None);
    }

    let entries = match args.iter().position(|a| a == "--entries") {
        Some(i) => {
            let raw = args.get(i + 1).context("--entries needs a value")?;
            raw.parse::<u64>()
                .with_context(|| format!("invalid --entries value '{}'", raw))?
        }
        None => DEFAULT_ENTRIES,
    };
    if entries == 0 {
        bail!("--entries must be at least 1");
    }

    Ok(Some(Options {
        entries,
        json: args.iter().any(|a| a == "--json"),
    }))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let Some(opts) = parse_args()? else {
        return Ok(());
    };

    let config = StoreConfig {
        expected_entries: opts.entries as usize,
        ..StoreConfig::fixed_header(HEADER_LEN)
    };
    let store = LogStore::with_config(config)?;

    let index_ids: Vec<IndexId> = SHAPES
        .iter()
        .map(|&(len, depth)| store.add_index(len, depth))
        .collect::<logstore::Result<_>>()?;
    let tenth = store.add_stream(|e: &Entry<'_>| e.id % 10 == 0);
    let cutoff = opts.entries / 10;
    let leading = store.add_stream(move |e: &Entry<'_>| e.id < cutoff);

    let token_sets: Vec<Vec<Token>> = (0..=255u8)
        .map(|v| {
            index_ids
                .iter()
                .zip(SHAPES.iter())
                .map(|(&id, &(len, _))| Token::new(id, vec![v; len]))
                .collect()
        })
        .collect();

    let start = Instant::now();
    for i in 0..opts.entries {
        let v = (i % 256) as u8;
        store.insert(&[v; HEADER_LEN], &token_sets[v as usize])?;
    }
    let insert_elapsed = start.elapsed();

    let start = Instant::now();
    let mut queries = 0usize;
    let mut hits = 0usize;
    for v in 0..=255u8 {
        for (&id, &(len, _)) in index_ids.iter().zip(SHAPES.iter()) {
            hits += store
                .filter(&FilterQuery::single(BasicFilter::prefix(id, vec![v; len])))?
                .len();
            queries += 1;
        }
    }
    let filter_elapsed = start.elapsed();

    let stats = store.stats();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("LogStore workload ({} entries)", opts.entries);
    println!("========================================");
    println!();
    println!(
        "insert:  {:>10.2} ms  ({:.0} entries/s)",
        insert_elapsed.as_secs_f64() * 1000.0,
        opts.entries as f64 / insert_elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!(
        "filter:  {:>10.2} ms  ({} queries, {} hits)",
        filter_elapsed.as_secs_f64() * 1000.0,
        queries,
        hits
    );
    let tenth_hits = store.get_stream(tenth)?.len();
    let leading_hits = store.get_stream(leading)?.len();
    println!("streams: {} every-tenth, {} leading", tenth_hits, leading_hits);
    println!();
    println!(
        "{:<8} {:>6} {:>6} {:>10} {:>10} {:>10}",
        "Index", "Len", "Depth", "Nodes", "Buckets", "Postings"
    );
    println!("{:-<56}", "");
    for idx in &stats.indexes {
        println!(
            "{:<8} {:>6} {:>6} {:>10} {:>10} {:>10}",
            idx.index_id, idx.token_len, idx.max_prefix_depth, idx.node_count, idx.bucket_count, idx.posting_count
        );
    }
    println!();
    println!("header bytes: {}, token bytes: {}", stats.header_bytes, stats.token_bytes);

    Ok(())
}
