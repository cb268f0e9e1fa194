use std::collections::VecDeque;

use anyhow::{Result, bail};
use clap::Parser;
use floorgen::{
    FLOOR_HEIGHT, FLOOR_WIDTH, FloorLayout, FloorProperties, GeneratedFloor, GenerationOptions, Occupant, Pos, Terrain, TileGrid,
    generate_floor,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about = "Generate many random floors and check layout invariants", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    floors: u32,
}

fn random_props(rng: &mut ChaCha8Rng) -> FloorProperties {
    let mut roll = |n: u64| (rng.next_u64() % n) as i32;
    FloorProperties {
        layout: FloorLayout::ALL[roll(FloorLayout::ALL.len() as u64) as usize],
        room_density: roll(12) - 3,
        floor_connectivity: roll(30) + 1,
        allow_dead_ends: roll(2) == 0,
        secondary_structures: roll(2) == 0,
        max_secondary_structures: roll(6),
        kecleon_shop_spawn_chance: roll(101),
        monster_house_spawn_chance: roll(101),
        extra_hallways: roll(8),
        item_density: roll(10),
        trap_density: roll(8),
        secondary_terrain_density: roll(5),
        ..FloorProperties::default()
    }
}

/// Every open tile in a real room must be reachable from the stairs.
fn unreachable_room_tiles(floor: &GeneratedFloor, stairs: Pos) -> usize {
    let tiles = &floor.tiles;
    let mut seen = vec![false; (FLOOR_WIDTH * FLOOR_HEIGHT) as usize];
    let index = |pos: Pos| (pos.y * FLOOR_WIDTH + pos.x) as usize;
    let mut queue = VecDeque::from([stairs]);
    seen[index(stairs)] = true;
    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = Pos::new(pos.x + dx, pos.y + dy);
            if TileGrid::in_bounds(next.x, next.y) && !seen[index(next)] && tiles.at(next).is_open() {
                seen[index(next)] = true;
                queue.push_back(next);
            }
        }
    }
    tiles
        .iter()
        .filter(|(pos, tile)| tile.is_open() && tile.in_real_room() && !tile.is_unreachable_from_stairs && !seen[index(*pos)])
        .count()
}

fn check(floor: &GeneratedFloor) -> Result<()> {
    let tiles = &floor.tiles;
    for x in 0..FLOOR_WIDTH {
        for y in [0, 1, FLOOR_HEIGHT - 2, FLOOR_HEIGHT - 1] {
            if tiles.terrain(x, y) != Terrain::Wall {
                bail!("border tile ({x}, {y}) is not wall");
            }
        }
    }
    if tiles.count(|tile| tile.is_anchor()) != 0 {
        bail!("anchor sentinel survived finishing");
    }
    if tiles.count(|tile| tile.occupant == Occupant::Player) > 1 {
        bail!("more than one player spawn");
    }
    if floor.summary.used_fallback {
        return Ok(());
    }
    let Some(stairs) = floor.summary.stairs else {
        bail!("accepted floor has no stairs");
    };
    let stranded = unreachable_room_tiles(floor, stairs);
    if stranded > 0 {
        bail!("{stranded} room tiles unreachable from the stairs");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Sweeping {} floors from seed {}...", args.floors, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut fallbacks = 0;

    for index in 0..args.floors {
        let props = random_props(&mut rng);
        let seed = rng.next_u32();
        let floor = generate_floor(&props, seed, GenerationOptions::default());
        if floor.summary.used_fallback {
            fallbacks += 1;
        }
        if let Err(e) = check(&floor) {
            bail!("floor {index} (layout {}, seed {seed:#010x}) failed: {e}\n{}", props.layout, floor.render_ascii());
        }
    }

    println!("Sweep completed: {} floors, {fallbacks} fell back.", args.floors);
    Ok(())
}
