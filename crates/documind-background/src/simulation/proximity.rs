//! All-pairs proximity pass for the constellation links

use crate::math::Vec2;

/// A pair of items closer than the link distance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// `base_alpha * (1 - distance / max_distance)`, always > 0
    pub alpha: f32,
}

/// Counters from one proximity pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProximityStats {
    /// Unordered pairs examined; always `n * (n - 1) / 2`
    pub pairs_considered: usize,
    /// Pairs that produced a link
    pub links: usize,
}

/// Visit every unordered pair once and report the ones closer than
/// `max_distance`
///
/// Pairs are rejected on squared distance first; the square root is only
/// taken for pairs that pass.
pub fn scan_links<T>(
    items: &[T],
    position: impl Fn(&T) -> Vec2,
    max_distance: f32,
    base_alpha: f32,
    mut on_link: impl FnMut(Link),
) -> ProximityStats {
    let max_sq = max_distance * max_distance;
    let mut stats = ProximityStats::default();

    for (i, first) in items.iter().enumerate() {
        let a = position(first);
        for (offset, second) in items[i + 1..].iter().enumerate() {
            stats.pairs_considered += 1;

            let dist_sq = a.distance_squared(position(second));
            if dist_sq >= max_sq {
                continue;
            }

            let distance = dist_sq.sqrt();
            stats.links += 1;
            on_link(Link {
                a: i,
                b: i + 1 + offset,
                distance,
                alpha: (1.0 - distance / max_distance) * base_alpha,
            });
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(points: &[Vec2]) -> (ProximityStats, Vec<Link>) {
        let mut links = Vec::new();
        let stats = scan_links(points, |p| *p, 120.0, 0.35, |link| links.push(link));
        (stats, links)
    }

    #[test]
    fn test_pairs_considered() {
        for n in [0usize, 1, 2, 5, 30] {
            let points: Vec<Vec2> = (0..n).map(|i| Vec2::new(i as f32 * 500.0, 0.0)).collect();
            let (stats, links) = scan(&points);
            assert_eq!(stats.pairs_considered, n * n.saturating_sub(1) / 2);
            assert!(links.is_empty());
        }
    }

    #[test]
    fn test_link_alpha() {
        let (stats, links) = scan(&[Vec2::new(0.0, 0.0), Vec2::new(60.0, 0.0)]);
        assert_eq!(stats.links, 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].alpha - 0.175).abs() < 1e-5);
    }

    #[test]
    fn test_exact_threshold_excluded() {
        let (stats, _) = scan(&[Vec2::new(0.0, 0.0), Vec2::new(120.0, 0.0)]);
        assert_eq!(stats.links, 0);
    }

    #[test]
    fn test_coincident_points_full_alpha() {
        let (_, links) = scan(&[Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0)]);
        assert!((links[0].alpha - 0.35).abs() < 1e-6);
    }
}
