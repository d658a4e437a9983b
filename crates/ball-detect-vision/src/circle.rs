//! Minimal enclosing circle of a point set.
//!
//! Incremental Welzl construction: each point that falls outside the current
//! circle must lie on the boundary of the circle of the points seen so far.

use ball_detect_core::Candidate;
use nalgebra::{Point2, Vector2};

const EPS: f64 = 1e-7;

#[derive(Clone, Copy, Debug)]
struct Circle {
    c: Point2<f64>,
    r: f64,
}

impl Circle {
    fn contains(&self, p: &Point2<f64>) -> bool {
        nalgebra::distance(&self.c, p) <= self.r * (1.0 + EPS) + EPS
    }

    fn from_two(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let c = nalgebra::center(a, b);
        Self {
            c,
            r: nalgebra::distance(&c, a),
        }
    }

    fn from_three(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Self {
        let ab: Vector2<f64> = b - a;
        let ac: Vector2<f64> = c - a;
        let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
        if d.abs() < EPS {
            // Collinear: the widest pair spans the circle.
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .max_by(|x, y| x.r.total_cmp(&y.r))
                .unwrap_or(Self::from_two(a, b));
        }
        let ab2 = ab.norm_squared();
        let ac2 = ac.norm_squared();
        let ux = (ac.y * ab2 - ab.y * ac2) / d;
        let uy = (ab.x * ac2 - ac.x * ab2) / d;
        let center = Point2::new(a.x + ux, a.y + uy);
        Self {
            c: center,
            r: nalgebra::distance(&center, a),
        }
    }
}

/// Smallest circle containing every point, or `None` for an empty set.
pub fn min_enclosing_circle(points: &[Point2<f32>]) -> Option<Candidate> {
    let pts: Vec<Point2<f64>> = points.iter().map(|p| p.cast::<f64>()).collect();
    let first = pts.first()?;

    let mut circle = Circle { c: *first, r: 0.0 };
    for i in 1..pts.len() {
        if circle.contains(&pts[i]) {
            continue;
        }
        circle = Circle { c: pts[i], r: 0.0 };
        for j in 0..i {
            if circle.contains(&pts[j]) {
                continue;
            }
            circle = Circle::from_two(&pts[i], &pts[j]);
            for k in 0..j {
                if !circle.contains(&pts[k]) {
                    circle = Circle::from_three(&pts[i], &pts[j], &pts[k]);
                }
            }
        }
    }

    Some(Candidate::new(
        circle.c.x as f32,
        circle.c.y as f32,
        circle.r as f32,
    ))
}
