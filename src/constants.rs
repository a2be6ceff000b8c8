/// Edge length of a world tile in metres; section coordinates are tile-relative
pub const TILE_SIZE: f32 = 2048.0;

/// Hard cap on the number of concurrent paths kept by one station exploration
pub const MAX_STATION_PATHS: usize = 100;

/// Distance (m) an item location may overshoot the end of its track node
pub const LOCATION_TOLERANCE: f32 = 0.5;
