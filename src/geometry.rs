//! Board geometry: the 249-point diamond grid and its index/coordinate tables.
//!
//! Points are numbered 1..=249 row by row, starting at the top row (y = 8)
//! and reading left to right. Both lookup tables are built at compile time.

/// A board intersection, addressed by its 1-based linear index.
pub type Point = usize;

/// Number of intersections on the board.
pub const NUM_POINTS: usize = 249;

/// Largest |x| or |y| on the grid.
pub const RADIUS: i32 = 8;

const SPAN: usize = (2 * RADIUS + 1) as usize;

/// Orthogonal unit steps: north, east, south, west.
pub const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// The 8-neighbourhood in clockwise order, starting north.
pub const RING: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Half width of the row at height `y`, or -1 when the row does not exist.
const fn half_width(y: i32) -> i32 {
    let ay = if y < 0 { -y } else { y };
    match ay {
        8 => 4,
        7 => 5,
        6 => 6,
        5 => 7,
        0..=4 => 8,
        _ => -1,
    }
}

const fn build_coords() -> [(i8, i8); NUM_POINTS + 1] {
    let mut t = [(0i8, 0i8); NUM_POINTS + 1];
    let mut idx = 1;
    let mut y = RADIUS;
    while y >= -RADIUS {
        let h = half_width(y);
        let mut x = -h;
        while x <= h {
            t[idx] = (x as i8, y as i8);
            idx += 1;
            x += 1;
        }
        y -= 1;
    }
    t
}

const fn build_index_map() -> [[u8; SPAN]; SPAN] {
    let coords = build_coords();
    let mut m = [[0u8; SPAN]; SPAN];
    let mut idx = 1;
    while idx <= NUM_POINTS {
        let (x, y) = coords[idx];
        m[(y as i32 + RADIUS) as usize][(x as i32 + RADIUS) as usize] = idx as u8;
        idx += 1;
    }
    m
}

/// (x, y) for each point. Slot 0 is unused.
static COORDS: [(i8, i8); NUM_POINTS + 1] = build_coords();

/// Point index for each (y + 8, x + 8); 0 marks an off-grid cell.
static INDEX_MAP: [[u8; SPAN]; SPAN] = build_index_map();

/// The centre of the board, (0, 0).
pub const CENTER: Point = 125;

/// Point at (x, y), or `None` when the coordinate is off the grid.
#[inline]
pub fn index_of(x: i32, y: i32) -> Option<Point> {
    if !(-RADIUS..=RADIUS).contains(&x) || !(-RADIUS..=RADIUS).contains(&y) {
        return None;
    }
    match INDEX_MAP[(y + RADIUS) as usize][(x + RADIUS) as usize] {
        0 => None,
        idx => Some(idx as Point),
    }
}

/// Coordinates of `p`, or `None` when `p` is not a board index.
#[inline]
pub fn coords_of(p: Point) -> Option<(i32, i32)> {
    if is_valid(p) {
        Some(xy(p))
    } else {
        None
    }
}

/// Unchecked coordinate lookup for indices already known to be valid.
#[inline(always)]
pub(crate) fn xy(p: Point) -> (i32, i32) {
    let (x, y) = COORDS[p];
    (x as i32, y as i32)
}

#[inline(always)]
pub fn is_valid(p: Point) -> bool {
    (1..=NUM_POINTS).contains(&p)
}

/// All board points in index order.
#[inline]
pub fn all_points() -> std::ops::RangeInclusive<Point> {
    1..=NUM_POINTS
}

/// The point `(dx, dy)` away from `p`, if it is on the grid.
#[inline]
pub fn offset(p: Point, dx: i32, dy: i32) -> Option<Point> {
    let (x, y) = xy(p);
    index_of(x + dx, y + dy)
}

/// The 8 surrounding cells of `p` in clockwise order; off-grid slots are `None`.
pub fn neighbors8(p: Point) -> [Option<Point>; 8] {
    let mut out = [None; 8];
    for (slot, &(dx, dy)) in out.iter_mut().zip(RING.iter()) {
        *slot = offset(p, dx, dy);
    }
    out
}

/// On-grid orthogonal neighbours of `p`.
pub fn orthogonal_neighbors(p: Point) -> impl Iterator<Item = Point> {
    ORTHOGONAL
        .iter()
        .filter_map(move |&(dx, dy)| offset(p, dx, dy))
}

#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    let (ax, ay) = xy(a);
    let (bx, by) = xy(b);
    (ax - bx).abs() + (ay - by).abs()
}

#[inline]
pub fn distance_to_center(p: Point) -> i32 {
    let (x, y) = xy(p);
    x.abs() + y.abs()
}

/// True when `a` and `b` are 8-neighbours.
#[inline]
pub fn is_adjacent8(a: Point, b: Point) -> bool {
    let (ax, ay) = xy(a);
    let (bx, by) = xy(b);
    a != b && (ax - bx).abs() <= 1 && (ay - by).abs() <= 1
}

/// Unit step from `a` towards `b` when both share a row or a column.
#[inline]
pub fn axis_step(a: Point, b: Point) -> Option<(i32, i32)> {
    let (ax, ay) = xy(a);
    let (bx, by) = xy(b);
    if a == b {
        None
    } else if ax == bx {
        Some((0, (by - ay).signum()))
    } else if ay == by {
        Some(((bx - ax).signum(), 0))
    } else {
        None
    }
}
