use tilenav_core::Coord;

/// Manhattan (L1) distance between two coordinates.
#[inline]
pub fn manhattan<P: Coord>(a: P, b: P) -> i32 {
    (0..P::DIM).map(|i| (a.axis(i) - b.axis(i)).abs()).sum()
}

/// Chebyshev (L∞) distance between two coordinates.
#[inline]
pub fn chebyshev<P: Coord>(a: P, b: P) -> i32 {
    (0..P::DIM)
        .map(|i| (a.axis(i) - b.axis(i)).abs())
        .max()
        .unwrap_or(0)
}

/// Euclidean (L2) distance between two coordinates.
#[inline]
pub fn euclidean<P: Coord>(a: P, b: P) -> f32 {
    (a.distance_squared(b) as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilenav_core::{Point, Point3};

    #[test]
    fn metrics_in_two_and_three_dimensions() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 5);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(chebyshev(a, b), 4);
        assert_eq!(euclidean(a, b), 5.0);

        let c = Point3::new(0, 0, 0);
        let d = Point3::new(1, -2, 2);
        assert_eq!(manhattan(c, d), 5);
        assert_eq!(chebyshev(c, d), 2);
        assert_eq!(euclidean(c, d), 3.0);
    }
}
