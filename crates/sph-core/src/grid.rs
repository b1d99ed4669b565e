use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash, Hasher};

use glam::Vec3;
use smallvec::SmallVec;

/// Integer cell coordinates. Negative coordinates are valid: positions can
/// momentarily leave the domain between integration and reflection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Hash for GridCell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mixed = (self.x as u32)
            .wrapping_mul(73_856_093)
            ^ (self.y as u32).wrapping_mul(19_349_663)
            ^ (self.z as u32).wrapping_mul(83_492_791);
        state.write_u32(mixed);
    }
}

/// Pass-through hasher: `GridCell` already mixes its coordinates, so the
/// map uses that value directly instead of rehashing it.
#[derive(Default)]
struct CellHasher(u64);

impl Hasher for CellHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.0 = n as u64;
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | b as u64;
        }
    }
}

type Bucket = SmallVec<[u32; 8]>;

/// Grid occupancy statistics, as reported through `Solver::info`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridStats {
    /// Number of occupied cells.
    pub cells: usize,
    /// Total indices across all buckets.
    pub particles: usize,
    pub avg_bucket_len: f32,
    pub max_bucket_len: usize,
}

/// Uniform spatial hash grid for O(N) neighbor candidate search.
///
/// Cell side equals the smoothing length, so the 3x3x3 neighborhood of a
/// point's cell covers every particle within kernel support. Only occupied
/// cells hold a bucket; empty regions cost nothing.
pub struct SpatialHashGrid {
    cell_size: f32,
    inv_cell_size: f32,
    buckets: HashMap<GridCell, Bucket, BuildHasherDefault<CellHasher>>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            buckets: HashMap::default(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Convert a world position to its cell coordinates.
    #[inline]
    pub fn cell_of(&self, point: Vec3) -> GridCell {
        GridCell {
            x: (point.x * self.inv_cell_size).floor() as i32,
            y: (point.y * self.inv_cell_size).floor() as i32,
            z: (point.z * self.inv_cell_size).floor() as i32,
        }
    }

    /// Rebuild the grid from current positions.
    ///
    /// Clears the map (the table allocation is kept across steps) and
    /// inserts every index into its cell's bucket in insertion order.
    /// Between rebuilds the grid is stale and must not be queried.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.buckets.clear();
        for (i, &pos) in positions.iter().enumerate() {
            self.buckets
                .entry(self.cell_of(pos))
                .or_default()
                .push(i as u32);
        }
    }

    /// Iterate the candidate indices in the 27 cells around `point`.
    ///
    /// The result is a superset of the true neighborhood within one cell
    /// size of `point`; callers that need exact neighbors filter by
    /// distance themselves.
    pub fn query(&self, point: Vec3) -> impl Iterator<Item = u32> + '_ {
        let center = self.cell_of(point);
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).flat_map(move |dz| {
                    let cell = GridCell {
                        x: center.x + dx,
                        y: center.y + dy,
                        z: center.z + dz,
                    };
                    self.bucket(cell).iter().copied()
                })
            })
        })
    }

    /// Indices currently hashed to `cell`, in insertion order.
    pub fn bucket(&self, cell: GridCell) -> &[u32] {
        self.buckets.get(&cell).map_or(&[], |b| b.as_slice())
    }

    pub fn stats(&self) -> GridStats {
        if self.buckets.is_empty() {
            return GridStats::default();
        }
        let mut total = 0usize;
        let mut max = 0usize;
        for bucket in self.buckets.values() {
            total += bucket.len();
            max = max.max(bucket.len());
        }
        GridStats {
            cells: self.buckets.len(),
            particles: total,
            avg_bucket_len: total as f32 / self.buckets.len() as f32,
            max_bucket_len: max,
        }
    }
}
