//! Spurious-candidate suppression.
//!
//! Contours of one ball routinely produce several circles (outer and hole
//! contour of the same edge ring, fragments of a broken edge). The filter
//! drops circles below the minimum tracked radius, then collapses every
//! circle whose center lies inside a dominating neighbor.
//!
//! Both decisions are taken against a frozen snapshot of the input, so the
//! result does not depend on which candidate happens to be removed first.

use crate::Candidate;

/// Drop undersized candidates and collapse nested ones.
///
/// Candidate `i` is discarded when `radius < min_radius_px`, or when any other
/// size-filtered candidate `j` contains `i`'s center and dominates it: `j` has
/// a larger radius, or an equal radius and a lower index. `j` counts even if
/// it is itself discarded. Survivors keep their input order.
pub fn remove_trash(candidates: &[Candidate], min_radius_px: f32) -> Vec<Candidate> {
    let sized: Vec<Candidate> = candidates
        .iter()
        .copied()
        .filter(|c| c.radius >= min_radius_px)
        .collect();

    let kept = collapse_nested(&sized);
    log::debug!(
        "trash filter: {} candidates -> {} sized -> {} kept",
        candidates.len(),
        sized.len(),
        kept.len()
    );
    kept
}

/// Nesting stage of [`remove_trash`] on an already size-filtered list.
pub fn collapse_nested(candidates: &[Candidate]) -> Vec<Candidate> {
    if candidates.len() < 2 {
        return candidates.to_vec();
    }

    let keep: Vec<bool> = candidates
        .iter()
        .enumerate()
        .map(|(i, ci)| {
            !candidates
                .iter()
                .enumerate()
                .any(|(j, cj)| j != i && dominates(j, cj, i, ci) && cj.contains_center_of(ci))
        })
        .collect();

    candidates
        .iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(*c))
        .collect()
}

#[inline]
fn dominates(j: usize, cj: &Candidate, i: usize, ci: &Candidate) -> bool {
    cj.radius > ci.radius || (cj.radius == ci.radius && j < i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_lists_pass_through() {
        assert!(remove_trash(&[], 5.0).is_empty());

        let one = [Candidate::new(10.0, 10.0, 8.0)];
        assert_eq!(remove_trash(&one, 5.0), one.to_vec());
    }

    #[test]
    fn undersized_single_candidate_is_dropped() {
        let one = [Candidate::new(10.0, 10.0, 3.0)];
        assert!(remove_trash(&one, 5.0).is_empty());
    }

    #[test]
    fn nested_circle_is_removed_regardless_of_order() {
        let big = Candidate::new(100.0, 100.0, 40.0);
        let small = Candidate::new(103.0, 100.0, 10.0);

        assert_eq!(remove_trash(&[big, small], 5.0), vec![big]);
        assert_eq!(remove_trash(&[small, big], 5.0), vec![big]);
    }

    #[test]
    fn separated_circles_survive_in_input_order() {
        let a = Candidate::new(50.0, 50.0, 20.0);
        let b = Candidate::new(200.0, 60.0, 12.0);
        let c = Candidate::new(400.0, 300.0, 30.0);
        assert_eq!(remove_trash(&[a, b, c], 5.0), vec![a, b, c]);
    }

    #[test]
    fn equal_radii_reciprocal_nesting_keeps_first_index() {
        let a = Candidate::new(100.0, 100.0, 20.0);
        let b = Candidate::new(105.0, 100.0, 20.0);
        assert_eq!(remove_trash(&[a, b], 5.0), vec![a]);
        assert_eq!(remove_trash(&[b, a], 5.0), vec![b]);
    }

    #[test]
    fn filter_is_a_fixed_point() {
        let input = [
            Candidate::new(100.0, 100.0, 40.0),
            Candidate::new(101.0, 99.0, 38.0),
            Candidate::new(130.0, 100.0, 9.0),
            Candidate::new(300.0, 200.0, 2.0),
            Candidate::new(320.0, 240.0, 15.0),
            Candidate::new(322.0, 240.0, 15.0),
            Candidate::new(500.0, 400.0, 25.0),
        ];
        let once = remove_trash(&input, 5.0);
        let twice = remove_trash(&once, 5.0);
        assert_eq!(once, twice);
        assert!(once.iter().all(|c| c.radius >= 5.0));
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn small_circle_containing_big_center_does_not_remove_it() {
        // Both centers lie inside each other's circle; only the smaller goes.
        let big = Candidate::new(0.0, 0.0, 30.0);
        let small = Candidate::new(2.0, 0.0, 6.0);
        assert_eq!(collapse_nested(&[big, small]), vec![big]);
    }

    #[test]
    fn discarded_candidate_still_shadows_what_it_contains() {
        // a is only inside b; b is inside c. Both a and b go.
        let c = Candidate::new(0.0, 0.0, 10.0);
        let b = Candidate::new(8.0, 0.0, 5.0);
        let a = Candidate::new(12.0, 0.0, 2.0);
        assert!(!c.contains_center_of(&a));
        assert_eq!(collapse_nested(&[a, b, c]), vec![c]);
        assert_eq!(collapse_nested(&[c, a, b]), vec![c]);
    }
}
