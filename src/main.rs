//! Koi genetics CLI - Spawn, breed, simulate and encode koi from JSON configuration.

use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::Vec2;
use koi_genetics::{
    codec,
    compute::{Fish, FrameClock, GenomeRng, MutationEvent, School, Steering, genome_distance},
    schema::{Genome, KoiConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example_config(),
        "spawn" if args.len() >= 3 => {
            let count = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(4);
            spawn(&load_config(&args[2]), count);
        }
        "breed" if args.len() >= 3 => {
            let generations = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
            breed(&load_config(&args[2]), generations);
        }
        "swim" if args.len() >= 3 => {
            let seconds = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10.0);
            swim(&load_config(&args[2]), seconds);
        }
        "encode" if args.len() >= 4 => {
            encode(&load_config(&args[2]), &PathBuf::from(&args[3]), args.get(4));
        }
        "decode" if args.len() >= 3 => decode(&PathBuf::from(&args[2])),
        _ => {
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [arguments]", program);
    eprintln!();
    eprintln!("Spawn, breed and encode koi genomes.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  spawn <config.json> [count]             Spawn fish from blueprints (default: 4)");
    eprintln!("  breed <config.json> [generations]       Breed a lineage (default: 10)");
    eprintln!("  swim <config.json> [seconds]            Simulate a school (default: 10)");
    eprintln!("  encode <config.json> <out.png> [name]   Write a fish as a visual code");
    eprintln!("  decode <in.png>                         Read a genome from a visual code");
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn load_config(path: &str) -> KoiConfig {
    KoiConfig::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    })
}

fn make_rng(config: &KoiConfig) -> GenomeRng {
    match config.random_seed {
        Some(seed) => GenomeRng::new(seed),
        None => GenomeRng::random(),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn describe_genome(genome: &Genome) -> String {
    let kinds: Vec<String> = genome
        .layers()
        .iter()
        .map(|layer| format!("{:?}", layer.kind()).to_lowercase())
        .collect();

    format!(
        "layers [{}], length {}, radius {}, {} bytes",
        kinds.join(", "),
        genome.body.length,
        genome.body.radius,
        genome.serialized_len()
    )
}

fn spawn(config: &KoiConfig, count: usize) {
    let mut rng = make_rng(config);

    println!("Spawning {} fish from {} blueprints", count, config.blueprints.len());
    println!();

    for i in 0..count {
        let blueprint = &config.blueprints[i % config.blueprints.len()];
        let fish = Fish::spawn(blueprint, &mut rng, Vec2::new(i as f32, 0.0), Vec2::X);
        let genome = fish.genome();

        println!("{} #{}: {}", blueprint.name, i, describe_genome(&genome));
        println!("  {}", fish.describe(config.units));
        println!("  {}", hex(&genome.to_bytes()));
    }
}

fn breed(config: &KoiConfig, generations: usize) {
    let mut rng = make_rng(config);
    let second = config.blueprints.len().min(2) - 1;

    let mut mother = Fish::spawn(&config.blueprints[0], &mut rng, Vec2::ZERO, Vec2::X);
    let mut father = Fish::spawn(&config.blueprints[second], &mut rng, Vec2::X, Vec2::X);

    println!("Breeding {} generations", generations);
    println!("  Mother: {}", describe_genome(&mother.genome()));
    println!("  Father: {}", describe_genome(&father.genome()));
    println!();

    let start = Instant::now();
    let mut total_mutations = 0;

    for generation in 0..generations {
        let distance = genome_distance(&mother.genome(), &father.genome());
        let on_mutate = |event: &MutationEvent| {
            log::debug!("Generation {}: {:?}", generation, event);
        };
        let (litter, mut offspring) =
            mother.breed(&mut father, &config.breeding, &mut rng, on_mutate);
        total_mutations += litter.mutations;

        println!(
            "  Generation {}: parent distance={:.4}, litter={}, mutations={}",
            generation + 1,
            distance,
            litter.offspring.len(),
            litter.mutations
        );

        // The two most recent offspring become the next parents
        if offspring.len() >= 2 {
            father = offspring.remove(1);
            mother = offspring.remove(0);
        } else if let Some(child) = offspring.pop() {
            mother = child;
        }
    }

    println!();
    println!("Final mother: {}", describe_genome(&mother.genome()));
    println!("  {}", hex(&mother.to_bytes()));
    println!(
        "Total mutations: {} in {:.2}ms",
        total_mutations,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

fn swim(config: &KoiConfig, seconds: f32) {
    let mut rng = make_rng(config);
    let mut school = School::new();

    for (i, blueprint) in config.blueprints.iter().enumerate() {
        let position = Vec2::new(0.0, i as f32 * 2.0);
        school.push(Fish::spawn(blueprint, &mut rng, position, Vec2::X));
    }

    let mut clock = FrameClock::from_config(config);
    let frame_time = 1.0 / 60.0;
    let frames = (seconds / frame_time) as usize;
    let start = Instant::now();
    let mut ticks = 0u64;
    let mut triangles = 0;

    println!("Swimming {} fish for {:.1}s", school.len(), seconds);

    for frame in 0..frames {
        let advance = clock.advance(frame_time);
        for _ in 0..advance.ticks {
            school.update(|index, fish| {
                let heading = Vec2::from_angle(0.2 * (index as f32 + 1.0));
                let speed = 0.02 + 0.01 * index as f32;
                Steering {
                    head: fish.body().spine()[0] + heading * speed,
                    direction: heading,
                    speed,
                }
            });
        }
        ticks += advance.ticks as u64;

        if (frame + 1) % (frames / 10).max(1) == 0 {
            triangles = school.render(&[], advance.progress).triangle_count();
        }
    }

    println!(
        "  {} ticks in {:.2}s, {} triangles per frame",
        ticks,
        start.elapsed().as_secs_f32(),
        triangles
    );
    for (i, fish) in school.fish().iter().enumerate() {
        println!("  Fish {}: age {}, {}", i, fish.body().age(), fish.describe(config.units));
    }
}

fn encode(config: &KoiConfig, path: &Path, name: Option<&String>) {
    let blueprint = match name {
        Some(name) => config.blueprint(name).unwrap_or_else(|| {
            eprintln!("Unknown blueprint: {}", name);
            std::process::exit(1);
        }),
        None => &config.blueprints[0],
    };

    let genome = blueprint.spawn(&mut make_rng(config));
    let image = codec::encode(&genome).unwrap_or_else(|e| {
        eprintln!("Error encoding genome: {}", e);
        std::process::exit(1);
    });

    image.save(path).unwrap_or_else(|e| {
        eprintln!("Error writing image: {}", e);
        std::process::exit(1);
    });

    println!("Wrote {} ({})", path.display(), describe_genome(&genome));
}

fn decode(path: &Path) {
    let image = image::open(path).unwrap_or_else(|e| {
        eprintln!("Error reading image: {}", e);
        std::process::exit(1);
    });

    match codec::decode_image(&image) {
        Some(genome) => {
            println!("{}", describe_genome(&genome));
            println!(
                "{}",
                serde_json::to_string_pretty(&genome).unwrap_or_else(|e| format!("<{}>", e))
            );
        }
        None => {
            eprintln!("No valid koi code found in {}", path.display());
            std::process::exit(1);
        }
    }
}

fn print_example_config() {
    let config = KoiConfig {
        random_seed: Some(42),
        ..KoiConfig::default()
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
