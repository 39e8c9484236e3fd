//! Target positions for each container shape.
//!
//! Containers call these after every mutation to re-lay out their live
//! entities; the entities then ease toward the new targets on `tick`.

use glam::Vec2;

use crate::options::LayoutOptions;

fn origin(opts: &LayoutOptions) -> Vec2 {
    Vec2::from(opts.origin)
}

/// Row-major grid cell `index` (arrays, deque ring slots).
#[must_use]
pub fn grid(index: usize, opts: &LayoutOptions) -> Vec2 {
    let columns = opts.columns.max(1);
    let col = (index % columns) as f32;
    let row = (index / columns) as f32;
    origin(opts) + Vec2::new(col, row) * opts.pitch()
}

/// Single horizontal row (linked nodes).
#[must_use]
pub fn row(index: usize, opts: &LayoutOptions) -> Vec2 {
    origin(opts) + Vec2::new(index as f32 * opts.pitch() * 1.5, 0.0)
}

/// Bucket column on the left, chain extending right.
#[must_use]
pub fn chain(bucket: usize, depth: usize, opts: &LayoutOptions) -> Vec2 {
    let pitch = opts.pitch();
    origin(opts) + Vec2::new((depth + 1) as f32 * pitch * 1.5, bucket as f32 * pitch)
}

/// Tree node by in-order rank and depth.
#[must_use]
pub fn tree(rank: usize, depth: usize, opts: &LayoutOptions) -> Vec2 {
    origin(opts)
        + Vec2::new(rank as f32 * opts.pitch(), depth as f32 * opts.level_height)
}

/// Heap slot drawn as a complete binary tree of `len` slots.
#[must_use]
pub fn heap(index: usize, len: usize, opts: &LayoutOptions) -> Vec2 {
    let level = (usize::BITS - 1 - (index + 1).leading_zeros()) as usize;
    let first_in_level = (1usize << level) - 1;
    let offset = index - first_in_level;
    let levels = if len == 0 {
        1
    } else {
        (usize::BITS - len.leading_zeros()) as usize
    };
    let width = (1usize << (levels - 1)) as f32 * opts.pitch();
    let span = width / (1usize << level) as f32;
    origin(opts)
        + Vec2::new(
            span * (offset as f32 + 0.5),
            level as f32 * opts.level_height,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_wraps_rows() {
        let opts = LayoutOptions {
            origin: [0.0, 0.0],
            cell_size: 10.0,
            gap: 0.0,
            columns: 4,
            ..LayoutOptions::default()
        };
        assert_eq!(grid(0, &opts), Vec2::ZERO);
        assert_eq!(grid(3, &opts), Vec2::new(30.0, 0.0));
        assert_eq!(grid(5, &opts), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn chain_depth_moves_right() {
        let opts = LayoutOptions::default();
        let a = chain(2, 0, &opts);
        let b = chain(2, 1, &opts);
        assert_eq!(a.y, b.y);
        assert!(b.x > a.x);
    }

    #[test]
    fn heap_levels_descend() {
        let opts = LayoutOptions::default();
        let root = heap(0, 7, &opts);
        let left = heap(1, 7, &opts);
        let right = heap(2, 7, &opts);
        assert!(left.y > root.y);
        assert_eq!(left.y, right.y);
        assert!(left.x < root.x && root.x < right.x);
        assert_eq!(heap(6, 7, &opts).y, opts.origin[1] + 2.0 * opts.level_height);
    }
}
