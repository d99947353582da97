//! Point values of every scoring event

const CLOSED_FOREST_TILE_POINTS: u32 = 2;
const CLOSED_FOREST_MUSHROOM_POINTS: u32 = 3;
const CLOSED_RIVER_TILE_POINTS: u32 = 1;
const CLOSED_RIVER_FISH_POINTS: u32 = 1;
const MAMMOTH_POINTS: u32 = 3;
const AUROCHS_POINTS: u32 = 2;
const DEER_POINTS: u32 = 1;
const FISHER_HUT_POINTS: u32 = 1;
const LOGBOAT_POINTS: u32 = 2;
const RAFT_POINTS: u32 = 1;

/// Points for a closed forest, made of at least two tiles
pub fn for_closed_forest(tile_count: u32, mushroom_group_count: u32) -> u32 {
    debug_assert!(tile_count > 1);
    tile_count * CLOSED_FOREST_TILE_POINTS + mushroom_group_count * CLOSED_FOREST_MUSHROOM_POINTS
}

/// Points for a closed river, made of at least two tiles
pub fn for_closed_river(tile_count: u32, fish_count: u32) -> u32 {
    debug_assert!(tile_count > 1);
    tile_count * CLOSED_RIVER_TILE_POINTS + fish_count * CLOSED_RIVER_FISH_POINTS
}

pub fn for_meadow(mammoth_count: u32, aurochs_count: u32, deer_count: u32) -> u32 {
    mammoth_count * MAMMOTH_POINTS + aurochs_count * AUROCHS_POINTS + deer_count * DEER_POINTS
}

pub fn for_river_system(fish_count: u32) -> u32 {
    fish_count * FISHER_HUT_POINTS
}

pub fn for_logboat(lake_count: u32) -> u32 {
    debug_assert!(lake_count > 0);
    lake_count * LOGBOAT_POINTS
}

pub fn for_raft(lake_count: u32) -> u32 {
    debug_assert!(lake_count > 0);
    lake_count * RAFT_POINTS
}
