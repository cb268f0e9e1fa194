use floorgen::mapgen::fix_junctions;
use floorgen::{NO_ROOM, Terrain, TileGrid};

/// A room at x 10..16, y 10..15 with a hallway leaving its right edge on row 12.
fn room_with_hallway() -> TileGrid {
    let mut tiles = TileGrid::new();
    tiles.mark_rect(10, 10, 16, 15, |tile| {
        tile.terrain = Terrain::Open;
        tile.room = 3;
    });
    tiles.mark_rect(16, 12, 24, 13, |tile| {
        tile.terrain = Terrain::Open;
        tile.room = NO_ROOM;
    });
    tiles
}

#[test]
fn fix_junctions_erases_secondary_terrain_next_to_a_hallway() {
    let mut tiles = room_with_hallway();
    tiles.set_terrain(15, 12, Terrain::Secondary);
    tiles.set_terrain(15, 11, Terrain::Secondary);

    fix_junctions(&mut tiles);
    assert_eq!(tiles.terrain(15, 12), Terrain::Open, "junction water must be erased");
    assert!(tiles.tile(15, 12).is_junction);
    assert_eq!(tiles.terrain(15, 11), Terrain::Secondary, "diagonal neighbours are untouched");

    // Re-running on an already fixed grid changes nothing further.
    let once = tiles.clone();
    fix_junctions(&mut tiles);
    assert_eq!(tiles, once);
}

#[test]
fn secondary_terrain_reintroduced_after_fixing_is_erased_again() {
    let mut tiles = room_with_hallway();
    fix_junctions(&mut tiles);
    tiles.set_terrain(15, 12, Terrain::Secondary);

    fix_junctions(&mut tiles);
    assert_eq!(tiles.terrain(15, 12), Terrain::Open);
}
