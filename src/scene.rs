use crate::types::GridVertex;

/// Half extent of the reference grid in world units
pub const GRID_HALF_EXTENT: i32 = 20;
/// Every Nth line is drawn brighter
pub const GRID_MAJOR_EVERY: i32 = 5;

/// Line list for a square grid on the y = 0 plane plus the three world axes
pub fn create_grid_scene() -> Vec<GridVertex> {
    let extent = GRID_HALF_EXTENT as f32;

    let shade = |i: i32| {
        if i == 0 {
            0.9
        } else if i % GRID_MAJOR_EVERY == 0 {
            0.55
        } else {
            0.25
        }
    };

    // Lines running along Z, one per X coordinate
    let along_z = (-GRID_HALF_EXTENT..=GRID_HALF_EXTENT).flat_map(move |x| {
        let fx = x as f32;
        let s = shade(x);
        [
            GridVertex::new([fx, 0.0, -extent], s),
            GridVertex::new([fx, 0.0, extent], s),
        ]
    });

    // Lines running along X, one per Z coordinate
    let along_x = (-GRID_HALF_EXTENT..=GRID_HALF_EXTENT).flat_map(move |z| {
        let fz = z as f32;
        let s = shade(z);
        [
            GridVertex::new([-extent, 0.0, fz], s),
            GridVertex::new([extent, 0.0, fz], s),
        ]
    });

    // Vertical post at the origin so height is readable
    let post = [
        GridVertex::new([0.0, 0.0, 0.0], 1.0),
        GridVertex::new([0.0, extent * 0.25, 0.0], 1.0),
    ];

    let vertices: Vec<GridVertex> = along_z.chain(along_x).chain(post).collect();
    log::debug!("Grid scene created: {} line vertices", vertices.len());
    vertices
}
