use grid_util::point::Point;

/// Smallest coordinate representable in a [CellKey].
pub const KEY_COORD_MIN: i32 = i16::MIN as i32;
/// Largest coordinate representable in a [CellKey].
pub const KEY_COORD_MAX: i32 = i16::MAX as i32;

/// Packs a cell into a single integer for hashing. The x coordinate occupies the high 16 bits
/// and y the low 16 bits, both as two's-complement 16-bit values, so every cell with both
/// coordinates in [KEY_COORD_MIN]..=[KEY_COORD_MAX] has a distinct key. Coordinates outside
/// that range are a caller error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u32);

impl CellKey {
    #[inline]
    pub fn new(x: i32, y: i32) -> CellKey {
        debug_assert!(
            CellKey::supports(x, y),
            "({x}, {y}) is outside the supported key range"
        );
        CellKey(((x as u16 as u32) << 16) | (y as u16 as u32))
    }

    #[inline]
    pub fn from_cell(cell: &Point) -> CellKey {
        CellKey::new(cell.x, cell.y)
    }

    /// Checks whether both coordinates fit the encoding.
    #[inline]
    pub fn supports(x: i32, y: i32) -> bool {
        (KEY_COORD_MIN..=KEY_COORD_MAX).contains(&x) && (KEY_COORD_MIN..=KEY_COORD_MAX).contains(&y)
    }

    /// Recovers the cell a key was built from.
    pub fn to_cell(self) -> Point {
        Point::new((self.0 >> 16) as u16 as i16 as i32, self.0 as u16 as i16 as i32)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}
