use crate::models::GeoPoint;

/// Greedy nearest-neighbor tour construction.
///
/// Index 0 is the fixed start. Each step extends the path from its last
/// point to the closest unvisited one; the first point in input order wins a
/// tie. O(n²) distance evaluations, no optimality guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSolver;

impl RouteSolver {
    pub fn new() -> Self {
        RouteSolver
    }

    /// Visiting order as a permutation of `0..points.len()` starting at 0.
    pub fn solve(&self, points: &[GeoPoint]) -> Vec<usize> {
        let n = points.len();
        if n == 0 {
            return Vec::new();
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        order.push(0);
        visited[0] = true;

        for _ in 1..n {
            let last = points[order[order.len() - 1]];
            let mut next: Option<(usize, f64)> = None;

            for (i, point) in points.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let dist = last.distance_to(point);
                match next {
                    Some((_, best)) if dist >= best => {}
                    _ => next = Some((i, dist)),
                }
            }

            // n - 1 iterations over n - 1 unvisited points: always Some
            if let Some((idx, _)) = next {
                order.push(idx);
                visited[idx] = true;
            }
        }

        order
    }
}
