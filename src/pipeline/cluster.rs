//! Density-based spatial clustering (DBSCAN) over latitude/longitude pairs.
//!
//! Distances are Euclidean in raw degrees. A longitude degree shrinks
//! towards the poles, so clusters are narrower on the ground at high
//! latitudes than near the equator for the same `eps`.

use std::collections::{HashMap, VecDeque};

/// Cluster identifier. Non-negative ids are assigned in discovery order and
/// are only meaningful within one clustering run.
pub type ClusterId = i32;

/// Label of points that belong to no cluster.
pub const NOISE: ClusterId = -1;

// ---------------------------------------------------------------------------
// Grid index for radius queries
// ---------------------------------------------------------------------------

/// Uniform grid with cells of side `radius`; a radius query only has to
/// look at the 3x3 block of cells around the query point.
struct GridIndex<'a> {
    points: &'a [[f64; 2]],
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    fn build(points: &'a [[f64; 2]], cell_size: f64) -> Self {
        let mut index = Self {
            points,
            cell_size,
            cells: HashMap::new(),
        };
        for (i, p) in points.iter().enumerate() {
            let cell = index.cell_of(p[0], p[1]);
            index.cells.entry(cell).or_default().push(i);
        }
        index
    }

    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    /// Indices of all points within `radius` of point `i`, `i` included.
    fn within(&self, i: usize, radius: f64) -> Vec<usize> {
        let [x, y] = self.points[i];
        let min_c = self.cell_of(x - radius, y - radius);
        let max_c = self.cell_of(x + radius, y + radius);

        let mut result = Vec::new();
        for cx in min_c.0..=max_c.0 {
            for cy in min_c.1..=max_c.1 {
                let Some(members) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &j in members {
                    let [px, py] = self.points[j];
                    if (px - x).hypot(py - y) <= radius {
                        result.push(j);
                    }
                }
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------
// DBSCAN
// ---------------------------------------------------------------------------

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    /// Neighbourhood radius (inclusive).
    pub eps: f64,
    /// Neighbours required for a core point, the point itself included.
    pub min_samples: usize,
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    /// Label every point with a cluster id or [`NOISE`].
    ///
    /// Points are scanned in input order; each unlabelled core point opens
    /// the next cluster id, which is then grown through every core point
    /// reachable from it. A border point within `eps` of two clusters keeps
    /// the first one that reached it. Non-finite coordinates are noise.
    pub fn fit(&self, points: &[[f64; 2]]) -> Vec<ClusterId> {
        let cell_size = if self.eps > 0.0 { self.eps } else { 1.0 };
        let finite: Vec<bool> = points
            .iter()
            .map(|p| p[0].is_finite() && p[1].is_finite())
            .collect();
        let index = GridIndex::build(points, cell_size);

        // None = not visited yet
        let mut labels: Vec<Option<ClusterId>> = vec![None; points.len()];
        let mut next_id: ClusterId = 0;

        for i in 0..points.len() {
            if labels[i].is_some() {
                continue;
            }
            if !finite[i] {
                labels[i] = Some(NOISE);
                continue;
            }
            let neighbours = index.within(i, self.eps);
            if neighbours.len() < self.min_samples {
                labels[i] = Some(NOISE);
                continue;
            }

            let id = next_id;
            next_id += 1;
            labels[i] = Some(id);

            let mut queue: VecDeque<usize> = neighbours.into();
            while let Some(j) = queue.pop_front() {
                match labels[j] {
                    // Visited earlier as non-core: becomes a border point.
                    Some(NOISE) => labels[j] = Some(id),
                    Some(_) => {}
                    None => {
                        labels[j] = Some(id);
                        let reach = index.within(j, self.eps);
                        if reach.len() >= self.min_samples {
                            queue.extend(reach);
                        }
                    }
                }
            }
        }

        labels.into_iter().map(|l| l.unwrap_or(NOISE)).collect()
    }
}

/// Number of distinct non-noise clusters in a label vector.
pub fn cluster_count(labels: &[ClusterId]) -> usize {
    labels
        .iter()
        .filter(|&&l| l != NOISE)
        .max()
        .map_or(0, |&max| max as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_neighbours(points: &[[f64; 2]], i: usize, eps: f64) -> usize {
        points
            .iter()
            .filter(|p| (p[0] - points[i][0]).hypot(p[1] - points[i][1]) <= eps)
            .count()
    }

    /// Deterministic spread of points over a few blobs plus scattered noise.
    fn scattered_points() -> Vec<[f64; 2]> {
        let mut state: u64 = 7;
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        let centers = [[40.0, -75.0], [40.3, -75.2], [33.4, -112.0]];
        let mut points = Vec::new();
        for c in centers {
            for _ in 0..40 {
                points.push([c[0] + (next() - 0.5) * 0.3, c[1] + (next() - 0.5) * 0.3]);
            }
        }
        for _ in 0..30 {
            points.push([25.0 + next() * 20.0, -120.0 + next() * 40.0]);
        }
        points
    }

    #[test]
    fn test_tight_group_and_isolated_point() {
        let points = [
            [40.0, -75.0],
            [40.01, -75.0],
            [40.0, -75.01],
            [40.02, -75.02],
            [39.99, -74.99],
            [10.0, 10.0],
        ];
        let labels = Dbscan::new(0.1, 5).fit(&points);

        assert_eq!(&labels[..5], &[0, 0, 0, 0, 0]);
        assert_eq!(labels[5], NOISE);
        assert_eq!(cluster_count(&labels), 1);
    }

    #[test]
    fn test_too_few_points_is_all_noise() {
        let points = [[1.0, 1.0], [1.0, 1.01], [1.01, 1.0], [1.0, 0.99]];
        let labels = Dbscan::new(0.1, 5).fit(&points);
        assert!(labels.iter().all(|&l| l == NOISE));
        assert_eq!(cluster_count(&labels), 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(Dbscan::new(0.1, 5).fit(&[]).is_empty());
    }

    #[test]
    fn test_eps_boundary_is_inclusive() {
        // Two points exactly eps apart with min_samples 2 form a cluster.
        let points = [[0.0, 0.0], [0.0, 0.5]];
        let labels = Dbscan::new(0.5, 2).fit(&points);
        assert_eq!(labels, vec![0, 0]);
    }

    #[test]
    fn test_border_point_joins_cluster() {
        // A chain of three core points and a border point that only sees
        // one of them.
        let mut points = vec![[0.0, 0.0]; 3];
        points.extend([[0.0, 0.05], [0.0, 0.05], [0.0, 0.14]]);
        let labels = Dbscan::new(0.1, 4).fit(&points);
        assert_eq!(labels, vec![0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ids_in_discovery_order() {
        let mut points = vec![[50.0, 8.0]; 5];
        points.extend(vec![[10.0, 10.0]; 5]);
        let labels = Dbscan::new(0.1, 5).fit(&points);
        assert_eq!(labels, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_deterministic() {
        let points = scattered_points();
        let model = Dbscan::new(0.1, 5);
        assert_eq!(model.fit(&points), model.fit(&points));
    }

    #[test]
    fn test_reachability_properties() {
        let points = scattered_points();
        let (eps, min_samples) = (0.1, 5);
        let labels = Dbscan::new(eps, min_samples).fit(&points);

        let is_core: Vec<bool> = (0..points.len())
            .map(|i| brute_force_neighbours(&points, i, eps) >= min_samples)
            .collect();

        for (i, &label) in labels.iter().enumerate() {
            let near_core = (0..points.len()).any(|j| {
                is_core[j]
                    && (points[j][0] - points[i][0]).hypot(points[j][1] - points[i][1]) <= eps
            });
            if label == NOISE {
                assert!(!is_core[i], "noise point {i} is a core point");
                assert!(!near_core, "noise point {i} is reachable from a core point");
            } else {
                assert!(is_core[i] || near_core, "point {i} clustered without support");
            }
            if is_core[i] {
                // Every core neighbour shares the same cluster.
                for (j, p) in points.iter().enumerate() {
                    if is_core[j] && (p[0] - points[i][0]).hypot(p[1] - points[i][1]) <= eps {
                        assert_eq!(labels[j], label);
                    }
                }
            }
        }
        assert!(cluster_count(&labels) >= 2);
    }

    #[test]
    fn test_non_finite_points_are_noise() {
        let mut points = vec![[1.0, 1.0]; 5];
        points.push([f64::NAN, 1.0]);
        let labels = Dbscan::new(0.1, 5).fit(&points);
        assert_eq!(labels[5], NOISE);
        assert_eq!(&labels[..5], &[0; 5]);
    }
}
