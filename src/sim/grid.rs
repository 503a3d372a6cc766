//! Uniform spatial hash for the collision broad phase
//!
//! Entities are bucketed by `(⌊x / cell⌋, ⌊y / cell⌋)` and a query returns
//! everything in the 3x3 block of cells around the query point. The grid
//! stores indices into the slice it was filled from and keeps no history:
//! callers `clear` and refill it every cycle.
//!
//! Only the cell containing an entity's centre is used, so two entities
//! whose radii sum to more than one cell size can be missed when they sit
//! two cells apart. Cell size is tuned well above the largest radius to
//! keep that out of play.

use std::collections::HashMap;

use glam::DVec2;

use super::collision::Collidable;

/// Integer cell coordinate
pub type CellCoord = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell containing a point
    #[inline]
    pub fn cell_of(&self, p: DVec2) -> CellCoord {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Drop every bucket, keeping allocations for the next fill
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Bucket one entity under `index`
    pub fn insert(&mut self, index: usize, entity: &impl Collidable) {
        let cell = self.cell_of(entity.position());
        self.cells.entry(cell).or_default().push(index);
    }

    /// Bucket a whole slice; indices refer to positions in `entities`
    pub fn insert_all<T: Collidable>(&mut self, entities: &[T]) {
        for (index, entity) in entities.iter().enumerate() {
            self.insert(index, entity);
        }
    }

    /// Indices in the entity's own cell and its eight neighbours.
    ///
    /// Order is deterministic: cells row by row from the top-left, then
    /// insertion order within a cell.
    pub fn query(&self, entity: &impl Collidable) -> Vec<usize> {
        let (cx, cy) = self.cell_of(entity.position());
        let mut found = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend_from_slice(bucket);
                }
            }
        }
        found
    }

    /// Number of entities currently bucketed
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::sim::collision::CollisionBox;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Dot {
        pos: DVec2,
        r: f64,
    }

    impl Collidable for Dot {
        fn position(&self) -> DVec2 {
            self.pos
        }

        fn radius(&self) -> f64 {
            self.r
        }
    }

    fn dot(x: f64, y: f64) -> Dot {
        Dot {
            pos: DVec2::new(x, y),
            r: 5.0,
        }
    }

    #[test]
    fn test_cell_of_negative_coordinates() {
        let grid = SpatialGrid::new(100.0);
        assert_eq!(grid.cell_of(DVec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(DVec2::new(99.9, 100.0)), (0, 1));
        assert_eq!(grid.cell_of(DVec2::new(-0.1, -100.0)), (-1, -1));
    }

    #[test]
    fn test_query_neighbourhood() {
        let mut grid = SpatialGrid::new(100.0);
        let dots = vec![
            dot(150.0, 150.0), // own cell (1,1)
            dot(250.0, 50.0),  // neighbour (2,0)
            dot(350.0, 150.0), // two cells away
            dot(5.0, 299.0),   // neighbour (0,2)
        ];
        grid.insert_all(&dots);
        assert_eq!(grid.len(), 4);

        let mut found = grid.query(&dots[0]);
        found.sort();
        assert_eq!(found, vec![0, 1, 3]);
    }

    #[test]
    fn test_clear_empties_grid() {
        let mut grid = SpatialGrid::new(50.0);
        grid.insert_all(&[dot(1.0, 1.0), dot(500.0, 500.0)]);
        assert!(!grid.is_empty());
        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.query(&dot(1.0, 1.0)).is_empty());
    }

    fn brute_force_pairs(a: &[Dot], b: &[Dot]) -> BTreeSet<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        for (i, x) in a.iter().enumerate() {
            for (j, y) in b.iter().enumerate() {
                if x.collision_box().intersects(&y.collision_box()) {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    fn grid_pairs(a: &[Dot], b: &[Dot], cell_size: f64) -> BTreeSet<(usize, usize)> {
        let mut grid = SpatialGrid::new(cell_size);
        grid.insert_all(b);
        let mut pairs = BTreeSet::new();
        for (i, x) in a.iter().enumerate() {
            let bx: CollisionBox = x.collision_box();
            for j in grid.query(x) {
                if bx.intersects(&b[j].collision_box()) {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    fn arb_dot() -> impl Strategy<Value = Dot> {
        (-400.0f64..1200.0, -300.0f64..900.0, 1.0f64..50.0).prop_map(|(x, y, r)| Dot {
            pos: DVec2::new(x, y),
            r,
        })
    }

    proptest! {
        #[test]
        fn grid_matches_brute_force(
            a in prop::collection::vec(arb_dot(), 0..40),
            b in prop::collection::vec(arb_dot(), 0..40),
        ) {
            // Radii sum to at most 100, so one cell of 100 is always enough
            prop_assert_eq!(grid_pairs(&a, &b, 100.0), brute_force_pairs(&a, &b));
        }
    }
}
