use chain_hash::HashMap;
use chain_hash::ResizePolicy;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    #[arg(long = "lower", default_value_t = ResizePolicy::DEFAULT_LOWER_LOAD_FACTOR)]
    lower: f64,

    #[arg(long = "upper", default_value_t = ResizePolicy::DEFAULT_UPPER_LOAD_FACTOR)]
    upper: f64,

    #[arg(short = 'm', long = "minimum_capacity", default_value_t = ResizePolicy::DEFAULT_MINIMUM_CAPACITY)]
    minimum_capacity: usize,
}

fn main() {
    let args = Args::parse();

    let policy = match ResizePolicy::new(args.lower, args.upper, args.minimum_capacity) {
        Ok(policy) => policy,
        Err(err) => {
            eprintln!("invalid policy: {err}");
            std::process::exit(2);
        }
    };

    let mut map: HashMap<u64, u64, _> = HashMap::with_policy(policy);
    println!("Starting capacity: {}", map.capacity());

    println!("Inserting {} keys...", args.count);
    let mut capacity = map.capacity();
    for key in 0..args.count {
        map.insert(key, key * key);
        if map.capacity() != capacity {
            println!(
                "  len {:>8}: capacity {:>8} -> {:>8} (load {:.4})",
                map.len(),
                capacity,
                map.capacity(),
                map.load_factor()
            );
            capacity = map.capacity();
        }
    }

    let largest_bucket = map
        .keys()
        .filter_map(|key| map.bucket_size(key).ok())
        .max()
        .unwrap_or(0);
    println!(
        "Filled: len {} capacity {} load {:.2}% largest bucket {}",
        map.len(),
        map.capacity(),
        map.load_factor() * 100.0,
        largest_bucket
    );

    println!("Erasing every key...");
    for key in 0..args.count {
        map.erase(&key);
        if map.capacity() != capacity {
            println!(
                "  len {:>8}: capacity {:>8} -> {:>8} (load {:.4})",
                map.len(),
                capacity,
                map.capacity(),
                map.load_factor()
            );
            capacity = map.capacity();
        }
    }

    println!("Final capacity: {}", map.capacity());
}
