use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use siphasher::sip::SipHasher;

use arena_hash::ChainedHashMap;
use arena_hash::OpenHashMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f32,

    /// Fraction of the inserted keys removed again before reporting
    #[arg(short = 'r', long = "remove_ratio", default_value_t = 0.25)]
    remove_ratio: f64,
}

struct SimpleHasher;

impl core::hash::BuildHasher for SimpleHasher {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

fn main() {
    let args = Args::parse();

    println!(
        "Filling both maps with {} random keys at load factor {}",
        args.count, args.load_factor
    );

    let mut chained = ChainedHashMap::with_size_and_hasher(0, args.load_factor, SimpleHasher);
    let mut open = OpenHashMap::with_size_and_hasher(0, args.load_factor, SimpleHasher);

    let mut rng = SmallRng::from_os_rng();
    let keys = (0..args.count)
        .map(|_| rng.random::<u64>())
        .collect::<Vec<_>>();

    for &key in &keys {
        chained.insert(key, key);
        open.insert(key, key);
    }

    let remove_ratio = args.remove_ratio.clamp(0.0, 1.0);
    let mut removed = 0;
    for key in &keys {
        if rng.random_bool(remove_ratio) {
            let from_chained = chained.remove(key);
            let from_open = open.remove(key);
            assert_eq!(from_chained, from_open);
            removed += from_chained.is_some() as usize;
        }
    }
    println!("Removed {} keys, {} remain", removed, chained.len());

    println!();
    println!("--- chained ---");
    chained.stats().print();
    chained.print_bucket_occupation();

    println!();
    println!("--- open addressing ---");
    open.stats().print();
    println!("Tombstones: {}", open.occupation() - open.len());
    open.print_probe_histogram();
}
