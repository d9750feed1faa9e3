//! Proximity ordering.
//!
//! Orders crossings (or anything else with a position) by distance to a
//! reference point.
//!
//! Distance is planar Euclidean distance on raw degree differences, not
//! great-circle distance. Across a single metro area the ordering this gives
//! matches the geodesic ordering closely enough for a "nearest first" list;
//! it drifts as the covered area grows or moves away from the equator, since
//! a degree of longitude shrinks with latitude while a degree of latitude
//! does not.

use crate::domain::{Crossing, CrossingLocation, LatLng};

/// Something with a position on the map.
pub trait Located {
    fn location(&self) -> LatLng;
}

impl Located for Crossing {
    fn location(&self) -> LatLng {
        self.location
    }
}

impl Located for CrossingLocation {
    fn location(&self) -> LatLng {
        self.location
    }
}

impl Located for LatLng {
    fn location(&self) -> LatLng {
        *self
    }
}

/// Planar distance between two points, in degrees.
///
/// # Examples
///
/// ```
/// use crossing_watch::domain::LatLng;
/// use crossing_watch::proximity::planar_distance;
///
/// let a = LatLng::new(0.0, 0.0).unwrap();
/// let b = LatLng::new(3.0, 4.0).unwrap();
/// assert_eq!(planar_distance(a, b), 5.0);
/// ```
pub fn planar_distance(a: LatLng, b: LatLng) -> f64 {
    (b.lat() - a.lat()).hypot(b.lng() - a.lng())
}

/// Return `items` ordered nearest-first to `point`.
///
/// The sort is stable: items at equal distance keep their input order, so
/// repeated sorts against the same point never shuffle ties. The input is
/// left untouched.
pub fn sort_by_distance<T: Located + Clone>(items: &[T], point: LatLng) -> Vec<T> {
    // Compute each distance once, then sort indices.
    let mut keyed: Vec<(f64, usize)> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (planar_distance(item.location(), point), idx))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    keyed.into_iter().map(|(_, idx)| items[idx].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CrossingId;
    use proptest::prelude::*;

    fn pt(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn crossing(id: &str, lat: f64, lng: f64) -> Crossing {
        Crossing::unknown(CrossingLocation {
            id: CrossingId::new(id).unwrap(),
            title: format!("Crossing {id}"),
            location: pt(lat, lng),
        })
    }

    fn ids(crossings: &[Crossing]) -> Vec<&str> {
        crossings.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn two_crossings_swap_when_point_moves() {
        let list = vec![crossing("1", 35.0, -85.0), crossing("2", 36.0, -84.0)];

        let near_one = sort_by_distance(&list, pt(35.0, -85.0));
        assert_eq!(ids(&near_one), vec!["1", "2"]);

        let near_two = sort_by_distance(&list, pt(36.0, -84.0));
        assert_eq!(ids(&near_two), vec!["2", "1"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let list = vec![crossing("far", 40.0, -80.0), crossing("near", 35.0, -85.0)];
        let before = list.clone();

        let sorted = sort_by_distance(&list, pt(35.0, -85.0));

        assert_eq!(list, before);
        assert_eq!(ids(&sorted), vec!["near", "far"]);
    }

    #[test]
    fn ties_keep_input_order() {
        // All four are exactly 1 degree from the origin.
        let list = vec![
            crossing("n", 1.0, 0.0),
            crossing("e", 0.0, 1.0),
            crossing("s", -1.0, 0.0),
            crossing("w", 0.0, -1.0),
        ];

        let sorted = sort_by_distance(&list, pt(0.0, 0.0));
        assert_eq!(ids(&sorted), vec!["n", "e", "s", "w"]);
    }

    #[test]
    fn empty_and_single() {
        let empty: Vec<Crossing> = vec![];
        assert!(sort_by_distance(&empty, pt(0.0, 0.0)).is_empty());

        let one = vec![crossing("1", 10.0, 10.0)];
        assert_eq!(ids(&sort_by_distance(&one, pt(0.0, 0.0))), vec!["1"]);
    }

    #[test]
    fn distance_is_planar_not_geodesic() {
        // At 60°N a degree of longitude is half a degree of latitude on the
        // ground, but planar distance treats them as equal.
        let origin = pt(60.0, 0.0);
        assert_eq!(
            planar_distance(origin, pt(61.0, 0.0)),
            planar_distance(origin, pt(60.0, 1.0))
        );
    }

    fn arb_point() -> impl Strategy<Value = LatLng> {
        // Coarse grid so equal distances actually occur.
        (-20i32..=20, -20i32..=20).prop_map(|(a, b)| pt(a as f64 / 4.0, b as f64 / 4.0))
    }

    proptest! {
        #[test]
        fn sorted_is_permutation_and_non_decreasing(
            points in proptest::collection::vec(arb_point(), 0..60),
            center in arb_point(),
        ) {
            let sorted = sort_by_distance(&points, center);

            prop_assert_eq!(sorted.len(), points.len());
            let mut a: Vec<_> = points.iter().map(|p| (p.lat().to_bits(), p.lng().to_bits())).collect();
            let mut b: Vec<_> = sorted.iter().map(|p| (p.lat().to_bits(), p.lng().to_bits())).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);

            for pair in sorted.windows(2) {
                prop_assert!(planar_distance(pair[0], center) <= planar_distance(pair[1], center));
            }
        }

        #[test]
        fn equal_distances_keep_input_order(
            points in proptest::collection::vec(arb_point(), 0..60),
            center in arb_point(),
        ) {
            let tagged: Vec<(usize, LatLng)> = points.into_iter().enumerate().collect();

            #[derive(Clone)]
            struct Tagged(usize, LatLng);
            impl Located for Tagged {
                fn location(&self) -> LatLng {
                    self.1
                }
            }

            let items: Vec<Tagged> = tagged.iter().map(|(i, p)| Tagged(*i, *p)).collect();
            let sorted = sort_by_distance(&items, center);

            for pair in sorted.windows(2) {
                if planar_distance(pair[0].1, center) == planar_distance(pair[1].1, center) {
                    prop_assert!(pair[0].0 < pair[1].0);
                }
            }
        }

        #[test]
        fn sorting_twice_changes_nothing(
            points in proptest::collection::vec(arb_point(), 0..60),
            center in arb_point(),
        ) {
            let once = sort_by_distance(&points, center);
            let twice = sort_by_distance(&once, center);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn result_ignores_previous_order(
            points in proptest::collection::vec(arb_point(), 0..60),
            first in arb_point(),
            second in arb_point(),
        ) {
            // Stable sorting means the previous order only matters for ties,
            // so compare distance sequences rather than items.
            let via_first = sort_by_distance(&sort_by_distance(&points, first), second);
            let direct = sort_by_distance(&points, second);

            let d = |v: &[LatLng]| v.iter().map(|p| planar_distance(*p, second)).collect::<Vec<_>>();
            prop_assert_eq!(d(&via_first), d(&direct));
        }
    }
}
