//! Rejection sampling of triangle spots inside a region.
use std::collections::HashMap;

use glam::DVec2;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::Result;
use crate::filter::ops::OutlineOps;
use crate::geometry::{Bounds, Outline};
use crate::sampling::{build_triangle, rand01, rand_range, Distribution, Triangle};

/// Attempt multiplier applied when a weighted distribution rejects extra candidates.
pub const DEFAULT_DISTRIBUTION_COMPENSATION: f64 = 2.0;

/// Upper bound on sampling attempts per invocation.
pub const MAX_ATTEMPTS: usize = 4_000_000;

/// Triangle spot sampler.
#[derive(Debug, Clone)]
pub struct SpotSampler {
    /// Attempts per unit area of the region's bounding box.
    pub density: f64,
    /// Mean leg length of each triangle.
    pub size: f64,
    /// Relative jitter of leg lengths, in [0, 1].
    pub variance: f64,
    /// Distance weighting around the spark point.
    pub distribution: Distribution,
    /// Attempt multiplier used with weighted distributions.
    pub distribution_compensation: f64,
}

impl Default for SpotSampler {
    fn default() -> Self {
        Self {
            density: 0.0002,
            size: 15.0,
            variance: 0.5,
            distribution: Distribution::None,
            distribution_compensation: DEFAULT_DISTRIBUTION_COMPENSATION,
        }
    }
}

impl SpotSampler {
    pub fn new(density: f64, size: f64, variance: f64) -> Self {
        Self {
            density,
            size,
            variance,
            ..Default::default()
        }
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_distribution_compensation(mut self, factor: f64) -> Self {
        self.distribution_compensation = factor;
        self
    }

    /// Number of sampling attempts for a region with the given bounds.
    pub fn attempt_count(&self, bounds: &Bounds) -> usize {
        let mut count = (bounds.width * bounds.height * self.density).floor();
        if self.distribution.is_weighted() && self.distribution_compensation.is_finite() {
            count = (count * self.distribution_compensation.max(0.0)).floor();
        }
        if !count.is_finite() || count <= 0.0 {
            return 0;
        }
        if count > MAX_ATTEMPTS as f64 {
            warn!(
                "Requested {} sampling attempts; capping at {}.",
                count, MAX_ATTEMPTS
            );
            return MAX_ATTEMPTS;
        }
        count as usize
    }

    /// Grid cell size covering the largest triangle the sampler can build.
    ///
    /// Triangles are built from the magnitude of `size`, so the grid is too.
    fn index_cell_size(&self) -> f64 {
        self.size.abs() * (1.0 + self.variance.clamp(0.0, 1.0)) * 2.0
    }

    /// Sample triangles inside `region` without merging them.
    pub fn sample(&self, region: &Outline, rng: &mut dyn RngCore) -> SpotSet {
        let Some(bounds) = region.bounds() else {
            return SpotSet::default();
        };
        let attempts = self.attempt_count(&bounds);
        if attempts == 0 || !self.size.is_finite() || !region.is_finite() {
            return SpotSet {
                bounds: Some(bounds),
                ..Default::default()
            };
        }

        let spark = DVec2::new(
            rand_range(rng, bounds.left, bounds.right()),
            rand_range(rng, bounds.bottom, bounds.top()),
        );
        let scale = bounds.diagonal();
        let mut index = SpotIndex::new(self.index_cell_size());

        let mut set = SpotSet {
            spark: Some(spark),
            bounds: Some(bounds),
            attempts,
            ..Default::default()
        };

        for _ in 0..attempts {
            let p = DVec2::new(
                rand_range(rng, bounds.left, bounds.right()),
                rand_range(rng, bounds.bottom, bounds.top()),
            );
            if !region.contains(p) {
                set.rejected_outside += 1;
                continue;
            }
            if index.covers(p, &set.triangles) {
                set.rejected_covered += 1;
                continue;
            }
            if self.distribution.is_weighted() {
                let probability = self.distribution.probability(p.distance(spark), scale);
                if rand01(rng) > probability {
                    set.rejected_distribution += 1;
                    continue;
                }
            }
            let triangle = build_triangle(p, self.size, self.variance, rng);
            index.insert(set.triangles.len(), &triangle);
            set.triangles.push(triangle);
        }

        debug!(
            "Sampled {} spots from {} attempts (outside: {}, covered: {}, distribution: {}).",
            set.triangles.len(),
            set.attempts,
            set.rejected_outside,
            set.rejected_covered,
            set.rejected_distribution
        );
        set
    }

    /// Sample triangles inside `region` and merge them into one overlap-free shape set.
    pub fn generate(
        &self,
        region: &Outline,
        ops: &dyn OutlineOps,
        rng: &mut dyn RngCore,
    ) -> Result<SpotSet> {
        let mut set = self.sample(region, rng);
        if !set.triangles.is_empty() {
            let raw: Outline = set.triangles.iter().map(Triangle::to_contour).collect();
            set.merged = ops.remove_overlap(&raw)?;
        }
        Ok(set)
    }
}

/// Accepted spots of one invocation.
#[derive(Debug, Clone, Default)]
pub struct SpotSet {
    /// Accepted triangles in acceptance order, before merging.
    pub triangles: Vec<Triangle>,
    /// Union of all triangles with overlaps removed. Empty until merged.
    pub merged: Outline,
    /// Reference point for distance weighting.
    pub spark: Option<DVec2>,
    /// Bounding box the candidates were drawn from.
    pub bounds: Option<Bounds>,
    pub attempts: usize,
    pub rejected_outside: usize,
    pub rejected_covered: usize,
    pub rejected_distribution: usize,
}

impl SpotSet {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Positions the triangles were built from.
    pub fn origins(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.triangles.iter().map(Triangle::origin)
    }
}

/// Uniform hash grid of triangle bounds for the covered-spot test.
struct SpotIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpotIndex {
    fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn cell(&self, p: DVec2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    fn insert(&mut self, idx: usize, triangle: &Triangle) {
        let b = triangle.bounds();
        let (x0, y0) = self.cell(b.min());
        let (x1, y1) = self.cell(b.max());
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.cells.entry((x, y)).or_default().push(idx);
            }
        }
    }

    fn covers(&self, p: DVec2, triangles: &[Triangle]) -> bool {
        self.cells
            .get(&self.cell(p))
            .is_some_and(|ids| ids.iter().any(|&i| triangles[i].contains(p)))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::filter::ops::PolygonOps;
    use crate::geometry::Contour;

    fn square(extent: f64) -> Outline {
        Outline::from_contour(Contour::rect(0.0, 0.0, extent, extent))
    }

    #[test]
    fn attempt_count_floors_and_doubles_for_weighted_modes() {
        let b = Bounds::new(0.0, 0.0, 1000.0, 1000.0);
        let s = SpotSampler::new(0.0002, 15.0, 0.5);
        assert_eq!(s.attempt_count(&b), 200);
        let g = s.clone().with_distribution(Distribution::Gaussian);
        assert_eq!(g.attempt_count(&b), 400);
        let tuned = g.with_distribution_compensation(1.0);
        assert_eq!(tuned.attempt_count(&b), 200);
    }

    #[test]
    fn zero_or_negative_density_yields_empty_set() {
        let mut rng = StdRng::seed_from_u64(1);
        for density in [0.0, -1.0, f64::NAN] {
            let s = SpotSampler::new(density, 15.0, 0.5);
            let set = s.sample(&square(1000.0), &mut rng);
            assert!(set.is_empty());
            assert_eq!(set.attempts, 0);
        }
    }

    #[test]
    fn empty_or_flat_region_yields_no_spots() {
        let mut rng = StdRng::seed_from_u64(2);
        let s = SpotSampler::new(1.0, 1.0, 0.5);
        assert!(s.sample(&Outline::default(), &mut rng).is_empty());
        let flat = Outline::from_contour(Contour::rect(0.0, 0.0, 100.0, 0.0));
        assert!(s.sample(&flat, &mut rng).is_empty());
    }

    #[test]
    fn spots_lie_inside_the_region() {
        let mut rng = StdRng::seed_from_u64(3);
        let region = Outline::new(vec![
            Contour::rect(0.0, 0.0, 400.0, 400.0),
            Contour::rect(100.0, 100.0, 200.0, 200.0).reversed(),
        ]);
        let set = SpotSampler::new(0.005, 5.0, 0.5).sample(&region, &mut rng);
        assert!(!set.is_empty());
        for p in set.origins() {
            assert!(region.contains(p), "{p:?} outside region");
        }
        assert_eq!(
            set.len() + set.rejected_outside + set.rejected_covered,
            set.attempts
        );
    }

    #[test]
    fn no_spot_lands_inside_an_earlier_triangle() {
        let mut rng = StdRng::seed_from_u64(4);
        let set = SpotSampler::new(0.01, 20.0, 0.5).sample(&square(300.0), &mut rng);
        assert!(set.rejected_covered > 0);
        for (i, t) in set.triangles.iter().enumerate() {
            for earlier in &set.triangles[..i] {
                assert!(!earlier.contains(t.origin()));
            }
        }
    }

    #[test]
    fn negative_size_indexes_like_its_magnitude() {
        let negative = SpotSampler::new(0.01, -20.0, 0.5);
        assert_eq!(
            negative.index_cell_size(),
            SpotSampler::new(0.01, 20.0, 0.5).index_cell_size()
        );
        assert_eq!(negative.index_cell_size(), 60.0);

        let mut rng = StdRng::seed_from_u64(4);
        let set = negative.sample(&square(300.0), &mut rng);
        assert!(set.rejected_covered > 0);
        for (i, t) in set.triangles.iter().enumerate() {
            for earlier in &set.triangles[..i] {
                assert!(!earlier.contains(t.origin()));
            }
        }
    }

    #[test]
    fn generate_merges_into_overlap_free_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let set = SpotSampler::new(0.002, 15.0, 0.5)
            .generate(&square(500.0), &PolygonOps::default(), &mut rng)
            .expect("generate");
        assert!(!set.merged.is_empty());
        assert!(set.merged.contours.iter().all(|c| c.len() >= 3));
        let raw: f64 = set.triangles.iter().map(Triangle::signed_area).sum();
        let merged = set.merged.signed_area();
        assert!(merged > 0.0 && merged <= raw + 1e-6);
    }
}
