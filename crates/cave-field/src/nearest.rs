//! Nearest-point queries against a sampled curve.

use std::collections::HashSet;

use cave_geometry::SampledCurve;
use cave_math::Point2;
use kiddo::{KdTree, SquaredEuclidean};
use serde::{Deserialize, Serialize};

/// Exact nearest-neighbour distance over a fixed, non-empty point set.
pub trait NearestPoint: Send + Sync {
    /// Squared Euclidean distance from `query` to the closest indexed point.
    fn nearest_distance_sq(&self, query: Point2) -> f64;

    /// Number of indexed points, after any deduplication.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Linear scan over every point.
#[derive(Debug, Clone)]
pub struct BruteForceIndex {
    points: Vec<Point2>,
}

impl BruteForceIndex {
    pub fn new(curve: &SampledCurve) -> Self {
        Self {
            points: curve.points().to_vec(),
        }
    }
}

impl NearestPoint for BruteForceIndex {
    fn nearest_distance_sq(&self, query: Point2) -> f64 {
        self.points
            .iter()
            .map(|p| (query - *p).length_squared())
            .fold(f64::INFINITY, f64::min)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Rotation applied to every coordinate entering the tree, as `(cos, sin)`
/// of roughly 0.3 rad.
///
/// kiddo cannot split a bucket whose points all share one coordinate, and
/// any horizontal or vertical stretch of path produces exactly that.
const TREE_FRAME: (f64, f64) = (0.955_336_489_125_606, 0.295_520_206_661_339_6);

fn to_tree_frame(p: Point2) -> [f64; 2] {
    let (c, s) = TREE_FRAME;
    [c * p.x - s * p.y, s * p.x + c * p.y]
}

/// k-d tree index backed by `kiddo`.
///
/// Candidates are found in a rotated frame; the reported distance is
/// recomputed from the original coordinates so it matches
/// [`BruteForceIndex`] whenever both pick the same point. Exact duplicate
/// points are indexed once, since kiddo cannot split a bucket of identical
/// entries either.
#[derive(Debug, Clone)]
pub struct KdTreeIndex {
    tree: KdTree<f64, 2>,
    points: Vec<Point2>,
}

impl KdTreeIndex {
    pub fn new(curve: &SampledCurve) -> Self {
        let mut seen = HashSet::with_capacity(curve.len());
        // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
        let points: Vec<Point2> = curve
            .iter()
            .copied()
            .filter(|p| seen.insert([(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()]))
            .collect();
        if points.len() < curve.len() {
            log::debug!(
                "k-d index: dropped {} duplicate point(s) of {}",
                curve.len() - points.len(),
                curve.len()
            );
        }
        let entries: Vec<[f64; 2]> = points.iter().map(|&p| to_tree_frame(p)).collect();
        let tree: KdTree<f64, 2> = (&entries).into();
        Self { tree, points }
    }
}

impl NearestPoint for KdTreeIndex {
    fn nearest_distance_sq(&self, query: Point2) -> f64 {
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&to_tree_frame(query));
        match self.points.get(result.item as usize) {
            Some(p) => (query - *p).length_squared(),
            None => result.distance,
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Which nearest-point implementation a field computation uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    BruteForce,
    #[default]
    KdTree,
}

impl IndexKind {
    pub fn build(self, curve: &SampledCurve) -> Box<dyn NearestPoint> {
        match self {
            IndexKind::BruteForce => Box::new(BruteForceIndex::new(curve)),
            IndexKind::KdTree => Box::new(KdTreeIndex::new(curve)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cave_geometry::{sample_uniform, BezierSpline, Waypoints};
    use cave_math::dvec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_curve(rng: &mut StdRng, n: usize) -> SampledCurve {
        let pts = (0..n)
            .map(|_| dvec2(rng.random_range(0.0..70.0), rng.random_range(-15.0..35.0)))
            .collect();
        SampledCurve::from_points(pts).unwrap()
    }

    #[test]
    fn test_frame_rotation_is_orthonormal() {
        let (c, s) = TREE_FRAME;
        assert_relative_eq!(c * c + s * s, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_brute_force_single_point() {
        let curve = SampledCurve::from_points(vec![dvec2(1.0, 1.0)]).unwrap();
        let index = BruteForceIndex::new(&curve);
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest_distance_sq(dvec2(4.0, 5.0)), 25.0);
    }

    #[test]
    fn test_exact_hit_is_zero() {
        let curve =
            SampledCurve::from_points(vec![dvec2(0.0, 0.0), dvec2(3.0, 4.0), dvec2(6.0, 0.0)])
                .unwrap();
        for kind in [IndexKind::BruteForce, IndexKind::KdTree] {
            let index = kind.build(&curve);
            assert_eq!(index.nearest_distance_sq(dvec2(3.0, 4.0)), 0.0);
        }
    }

    #[test]
    fn test_kd_tree_matches_brute_force_on_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for &n in &[1, 5, 40, 500] {
            let curve = random_curve(&mut rng, n);
            let brute = BruteForceIndex::new(&curve);
            let tree = KdTreeIndex::new(&curve);
            for _ in 0..200 {
                let q = dvec2(rng.random_range(-10.0..80.0), rng.random_range(-25.0..45.0));
                assert_relative_eq!(
                    tree.nearest_distance_sq(q),
                    brute.nearest_distance_sq(q),
                    epsilon = 1e-9,
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_kd_tree_handles_axis_aligned_runs() {
        // 400 points on one horizontal line and 400 on one vertical line.
        let mut pts: Vec<Point2> = (0..400).map(|i| dvec2(i as f64 * 0.1, 2.0)).collect();
        pts.extend((0..400).map(|i| dvec2(50.0, i as f64 * 0.1)));
        let curve = SampledCurve::from_points(pts).unwrap();
        let brute = BruteForceIndex::new(&curve);
        let tree = KdTreeIndex::new(&curve);
        for &q in &[dvec2(10.05, 5.0), dvec2(49.0, 20.0), dvec2(-3.0, 2.0), dvec2(60.0, 60.0)] {
            assert_relative_eq!(
                tree.nearest_distance_sq(q),
                brute.nearest_distance_sq(q),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_kd_tree_tolerates_repeated_points() {
        let mut pts = vec![dvec2(3.0, 4.0); 64];
        pts.extend(std::iter::repeat(dvec2(-0.0, 7.5)).take(40));
        pts.extend(std::iter::repeat(dvec2(0.0, 7.5)).take(40));
        pts.extend((0..50).map(|i| dvec2(10.0, i as f64)));
        pts.extend((0..50).map(|i| dvec2(10.0, i as f64)));
        let curve = SampledCurve::from_points(pts).unwrap();
        let brute = BruteForceIndex::new(&curve);
        let tree = KdTreeIndex::new(&curve);
        assert_eq!(tree.len(), 2 + 50);
        for &q in &[dvec2(3.0, 4.0), dvec2(0.0, 0.0), dvec2(1.0, 7.0), dvec2(12.0, 20.3)] {
            assert_eq!(tree.nearest_distance_sq(q), brute.nearest_distance_sq(q));
        }

        let single = SampledCurve::from_points(vec![dvec2(3.0, 4.0); 64]).unwrap();
        let tree = KdTreeIndex::new(&single);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nearest_distance_sq(dvec2(0.0, 0.0)), 25.0);
    }

    #[test]
    fn test_kd_tree_survives_samples_collapsing_at_large_coordinates() {
        let spline = BezierSpline::from_waypoints(
            Waypoints::from_xz(&[[1e17, 0.0], [1e17 + 16.0, 0.0]]).unwrap(),
        );
        let curve = sample_uniform(&spline, 80).unwrap();
        let brute = BruteForceIndex::new(&curve);
        let tree = KdTreeIndex::new(&curve);
        assert!(tree.len() < curve.len());
        let q = dvec2(0.0, 0.0);
        assert_relative_eq!(
            tree.nearest_distance_sq(q),
            brute.nearest_distance_sq(q),
            max_relative = 1e-12
        );
    }
}
