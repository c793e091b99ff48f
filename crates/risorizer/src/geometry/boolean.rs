//! Overlap removal on `cavalier_contours` boolean operations.
//!
//! Contours are split at their self-intersections into simple loops. Each loop is then folded
//! into a partition of the plane into simple, hole-free pieces labelled with their winding
//! number, cutting existing pieces with `And`/`Not`. Pieces whose winding counts as filled are
//! reassembled with `Or` into outer boundaries (counter-clockwise) and holes (clockwise).
//!
//! Every cut and merge is checked for area conservation, so a boolean that loses geometry fails
//! with [`Error::Geometry`] instead of returning a damaged region.
use cavalier_contours::polyline::{BooleanOp, PlineSource};
use glam::DVec2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::cleanup::cleanup_contour;
use crate::geometry::pline::{from_pline, to_pline};
use crate::geometry::{Bounds, Contour};

/// Rule deciding which winding numbers count as filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Filled wherever the winding number is not zero.
    #[default]
    NonZero,
    /// Filled only where the winding number is positive. Clockwise (inverted) loops vanish.
    Positive,
}

impl FillRule {
    #[inline]
    pub fn is_filled(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::Positive => winding > 0,
        }
    }
}

/// Allowed area drift of a boolean step, relative to the squared diagonal of its operands.
const AREA_TOLERANCE: f64 = 1e-5;

/// Pieces thinner than this (relative to the squared diagonal) are treated as empty.
const SLIVER_TOLERANCE: f64 = 1e-12;

/// Compute the region filled by `contours` under `rule` as non-overlapping contours.
///
/// Outer boundaries come out counter-clockwise, holes clockwise, and islands inside holes
/// counter-clockwise again, so the result's winding number is 1 inside and 0 outside.
/// Contours with fewer than three points or no area are ignored.
pub fn fill_region(contours: &[Contour], rule: FillRule) -> Result<Vec<Contour>> {
    if contours.iter().any(|c| !c.is_finite()) {
        return Err(Error::Geometry(
            "fill_region: contour contains non-finite coordinates".into(),
        ));
    }

    let mut pieces: Vec<Piece> = Vec::new();
    let mut loops = 0usize;
    for contour in contours {
        for simple in simple_loops(contour) {
            let area = simple.signed_area();
            let Some(lp) = normalized(simple) else {
                continue;
            };
            loops += 1;
            add_loop(&mut pieces, lp, if area > 0.0 { 1 } else { -1 })?;
        }
    }

    let filled: Vec<Contour> = pieces
        .into_iter()
        .filter(|p| rule.is_filled(p.winding))
        .map(|p| p.contour)
        .collect();
    let expected: f64 = filled.iter().map(Contour::area).sum();
    let scale = filled
        .iter()
        .filter_map(Contour::bounds)
        .reduce(|a, b| a.union(&b));

    let out = assemble(filled)?;
    if let Some(scale) = scale {
        let actual: f64 = out.iter().map(Contour::signed_area).sum();
        check_area("fill_region", expected, actual, &scale)?;
    }
    debug!(
        "Filled {} simple loops into {} contours.",
        loops,
        out.len()
    );
    Ok(out)
}

/// Split a contour at every point where it touches or crosses itself.
///
/// The loops' winding numbers add up to the contour's own, so filling them is equivalent to
/// filling the contour. Loops without area are dropped.
pub(crate) fn simple_loops(contour: &Contour) -> Vec<Contour> {
    let mut out = Vec::new();
    let mut pending = vec![cleanup_contour(&contour.points)];
    while let Some(current) = pending.pop() {
        let points = current.points;
        if points.len() < 3 {
            continue;
        }
        match find_self_contact(&points) {
            Some((i, j, p)) => {
                let mut first = points[..=i].to_vec();
                first.push(p);
                first.extend_from_slice(&points[j + 1..]);
                let mut second = vec![p];
                second.extend_from_slice(&points[i + 1..=j]);
                pending.push(cleanup_contour(&first));
                pending.push(cleanup_contour(&second));
            }
            None => {
                let simple = Contour::new(points);
                if simple.signed_area() != 0.0 {
                    out.push(simple);
                }
            }
        }
    }
    out
}

/// First pair of non-adjacent edges `(i, j)`, `i < j`, that share a point, with that point.
fn find_self_contact(points: &[DVec2]) -> Option<(usize, usize, DVec2)> {
    let n = points.len();
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (points[j], points[(j + 1) % n]);
            if let Some(p) = segment_contact(a, b, c, d) {
                return Some((i, j, p));
            }
        }
    }
    None
}

/// A point shared by segments `a-b` and `c-d`, preferring existing endpoints.
fn segment_contact(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> Option<DVec2> {
    let r = b - a;
    let s = d - c;
    let q = c - a;
    let denom = r.perp_dot(s);
    if denom != 0.0 {
        let t = q.perp_dot(s) / denom;
        let u = q.perp_dot(r) / denom;
        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }
        let p = if t == 0.0 {
            a
        } else if t == 1.0 {
            b
        } else if u == 0.0 {
            c
        } else if u == 1.0 {
            d
        } else {
            a + r * t
        };
        return Some(p);
    }
    if q.perp_dot(r) != 0.0 {
        return None;
    }
    let on = |p: DVec2, s0: DVec2, s1: DVec2| {
        let len = (s1 - s0).length_squared();
        len > 0.0 && (0.0..=1.0).contains(&((p - s0).dot(s1 - s0) / len))
    };
    [c, d]
        .into_iter()
        .find(|&p| on(p, a, b))
        .or_else(|| [a, b].into_iter().find(|&p| on(p, c, d)))
}

/// A simple region labelled with the winding number of every point inside it.
struct Piece {
    winding: i32,
    contour: Contour,
    bounds: Bounds,
}

impl Piece {
    fn new(winding: i32, contour: Contour) -> Option<Self> {
        let bounds = contour.bounds()?;
        Some(Self {
            winding,
            contour,
            bounds,
        })
    }
}

/// Fold a counter-clockwise simple loop with the given winding into the partition.
fn add_loop(pieces: &mut Vec<Piece>, lp: Contour, winding: i32) -> Result<()> {
    let Some(lb) = lp.bounds() else {
        return Ok(());
    };
    let loop_area = lp.area();
    let mut covered = 0.0;
    let mut rest = vec![lp.clone()];
    let mut next = Vec::with_capacity(pieces.len() + 1);

    for piece in pieces.drain(..) {
        if !piece.bounds.intersects(&lb) {
            next.push(piece);
            continue;
        }
        let inside = intersection(&piece.contour, &lp);
        if inside.is_empty() {
            next.push(piece);
            continue;
        }
        let outside = difference(&piece.contour, &lp)?;
        let inside_area: f64 = inside.iter().map(Contour::area).sum();
        let outside_area: f64 = outside.iter().map(Contour::area).sum();
        check_area(
            "cutting a piece",
            piece.contour.area(),
            inside_area + outside_area,
            &piece.bounds.union(&lb),
        )?;
        covered += inside_area;

        let mut remaining = Vec::with_capacity(rest.len());
        for r in &rest {
            remaining.extend(difference(r, &piece.contour)?);
        }
        rest = remaining;

        next.extend(
            outside
                .into_iter()
                .filter_map(|c| Piece::new(piece.winding, c)),
        );
        let level = piece.winding + winding;
        if level != 0 {
            next.extend(inside.into_iter().filter_map(|c| Piece::new(level, c)));
        }
    }

    let rest_area: f64 = rest.iter().map(Contour::area).sum();
    check_area("adding a loop", loop_area, covered + rest_area, &lb)?;
    next.extend(rest.into_iter().filter_map(|c| Piece::new(winding, c)));
    *pieces = next;
    Ok(())
}

/// An outer boundary with the holes inside it, all stored counter-clockwise.
struct Face {
    outer: Contour,
    holes: Vec<Contour>,
    bounds: Bounds,
}

/// Merge disjoint simple pieces into faces and emit them as outer and hole contours.
fn assemble(pieces: Vec<Contour>) -> Result<Vec<Contour>> {
    let mut faces: Vec<Face> = Vec::new();

    for piece in pieces {
        let (Some(probe), Some(bounds)) = (piece.interior_point(), piece.bounds()) else {
            continue;
        };

        // A piece inside an existing outer can only sit in one of its holes.
        let owner = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.bounds.contains(probe) && f.outer.contains(probe))
            .min_by(|(_, a), (_, b)| a.outer.area().total_cmp(&b.outer.area()))
            .map(|(i, _)| i);
        if let Some(owner) = owner {
            let face = &mut faces[owner];
            let Some(h) = face.holes.iter().position(|h| h.contains(probe)) else {
                return Err(Error::Geometry(
                    "fill_region: piece overlaps filled area".into(),
                ));
            };
            let hole = &face.holes[h];
            let (shrunk, islands) = boolean(hole, &piece, BooleanOp::Not);
            let remaining = sum_area(&shrunk) - sum_area(&islands);
            check_area(
                "filling a hole",
                hole.area() - piece.area(),
                remaining,
                &face.bounds,
            )?;
            if islands.is_empty() {
                face.holes.splice(h..=h, shrunk);
                continue;
            }
            // The piece floats inside the hole and becomes a face of its own.
        }

        let mut acc = Face {
            outer: piece,
            holes: Vec::new(),
            bounds,
        };
        loop {
            let found = faces
                .iter()
                .enumerate()
                .filter(|(_, f)| f.bounds.intersects(&acc.bounds))
                .find_map(|(i, f)| merge_outers(&f.outer, &acc.outer).map(|m| (i, m)));
            let Some((i, (outer, created))) = found else {
                break;
            };
            let Some(bounds) = outer.bounds() else {
                break;
            };
            let face = faces.swap_remove(i);
            let mut holes = face.holes;
            holes.extend(acc.holes);
            holes.extend(created);
            acc = Face {
                outer,
                holes,
                bounds,
            };
        }
        faces.push(acc);
    }

    let mut out = Vec::with_capacity(faces.len());
    for face in faces {
        out.push(face.outer);
        out.extend(face.holes.into_iter().map(Contour::reversed));
    }
    Ok(out)
}

/// Union of two interior-disjoint outers, if they touch along an edge.
///
/// Returns `None` when the union would not be one contour, or when its area shows one outer
/// swallowed the other (an island inside a hole).
fn merge_outers(a: &Contour, b: &Contour) -> Option<(Contour, Vec<Contour>)> {
    let (mut outer, holes) = boolean(a, b, BooleanOp::Or);
    if outer.len() != 1 {
        return None;
    }
    let outer = outer.pop()?;
    let scale = a.bounds()?.union(&b.bounds()?);
    let merged = outer.area() - sum_area(&holes);
    check_area("merging", a.area() + b.area(), merged, &scale)
        .ok()
        .map(|_| (outer, holes))
}

fn intersection(a: &Contour, b: &Contour) -> Vec<Contour> {
    boolean(a, b, BooleanOp::And).0
}

/// `a` minus `b` as hole-free pieces.
///
/// When `b` lies strictly inside `a`, `a` is first cut in two along a vertical line through `b`.
fn difference(a: &Contour, b: &Contour) -> Result<Vec<Contour>> {
    let (pieces, holes) = boolean(a, b, BooleanOp::Not);
    if holes.is_empty() {
        return Ok(pieces);
    }
    let (Some(ab), Some(bb)) = (a.bounds(), b.bounds()) else {
        return Ok(pieces);
    };
    let cut = bb.center().x;
    let margin = DVec2::ONE;
    let halves = [
        Bounds::from_min_max(ab.min() - margin, DVec2::new(cut, ab.top() + 1.0)),
        Bounds::from_min_max(DVec2::new(cut, ab.bottom - 1.0), ab.max() + margin),
    ];

    let mut out = Vec::new();
    for half in halves {
        let slab = Contour::rect(half.left, half.bottom, half.width, half.height);
        for part in intersection(a, &slab) {
            let (cut_pieces, cut_holes) = boolean(&part, b, BooleanOp::Not);
            if !cut_holes.is_empty() {
                return Err(Error::Geometry(
                    "fill_region: could not split a piece around an enclosed loop".into(),
                ));
            }
            out.extend(cut_pieces);
        }
    }
    Ok(out)
}

/// Run a cavalier boolean on two simple contours, returning its positive and negative loops
/// as counter-clockwise contours.
fn boolean(a: &Contour, b: &Contour, op: BooleanOp) -> (Vec<Contour>, Vec<Contour>) {
    let result = to_pline(a).boolean(&to_pline(b), op);
    let pos = result
        .pos_plines
        .iter()
        .filter_map(|p| normalized(from_pline(&p.pline, f64::INFINITY)))
        .collect();
    let neg = result
        .neg_plines
        .iter()
        .filter_map(|p| normalized(from_pline(&p.pline, f64::INFINITY)))
        .collect();
    (pos, neg)
}

/// Clean a loop and orient it counter-clockwise; `None` if nothing with area is left.
fn normalized(contour: Contour) -> Option<Contour> {
    let contour = cleanup_contour(&contour.points);
    let bounds = contour.bounds()?;
    let area = contour.signed_area();
    if contour.len() < 3 || area.abs() <= SLIVER_TOLERANCE * bounds.diagonal().powi(2) {
        return None;
    }
    Some(if area < 0.0 { contour.reversed() } else { contour })
}

fn sum_area(contours: &[Contour]) -> f64 {
    contours.iter().map(Contour::area).sum()
}

fn check_area(step: &str, expected: f64, actual: f64, scale: &Bounds) -> Result<()> {
    let tolerance = AREA_TOLERANCE * scale.diagonal().powi(2);
    if (expected - actual).abs() <= tolerance {
        Ok(())
    } else {
        Err(Error::Geometry(format!(
            "fill_region: {step} changed the area from {expected} to {actual}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Outline;
    use crate::sampling::{rand01, rand_range};

    fn total_area(contours: &[Contour]) -> f64 {
        contours.iter().map(Contour::signed_area).sum()
    }

    fn poly(points: &[(f64, f64)]) -> Contour {
        Contour::new(points.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
        let ab = b - a;
        let len = ab.length_squared();
        let t = if len > 0.0 {
            ((p - a).dot(ab) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        p.distance(a + ab * t)
    }

    fn near_any_edge(p: DVec2, contours: &[Contour], margin: f64) -> bool {
        contours
            .iter()
            .flat_map(Contour::edges)
            .any(|(a, b)| distance_to_segment(p, a, b) < margin)
    }

    /// Compare nonzero fill of `input` and `output` at random points away from all edges.
    fn assert_same_fill(input: &[Contour], output: &[Contour], rng: &mut StdRng, samples: usize) {
        let before = Outline::new(input.to_vec());
        let after = Outline::new(output.to_vec());
        let Some(b) = before.bounds() else {
            assert!(output.is_empty());
            return;
        };
        let mut checked = 0;
        while checked < samples {
            let p = DVec2::new(
                rand_range(rng, b.left - 5.0, b.right() + 5.0),
                rand_range(rng, b.bottom - 5.0, b.top() + 5.0),
            );
            if near_any_edge(p, input, 1e-3) || near_any_edge(p, output, 1e-3) {
                continue;
            }
            checked += 1;
            let expected = before.winding_number(p) != 0;
            let w = after.winding_number(p);
            assert!(w == 0 || w == 1, "winding {w} at {p}");
            assert_eq!(w == 1, expected, "fill differs at {p}");
        }
    }

    #[test]
    fn overlapping_squares_merge_into_one_contour() {
        let a = Contour::rect(0.0, 0.0, 10.0, 10.0);
        let b = Contour::rect(5.0, 5.0, 10.0, 10.0);
        let out = fill_region(&[a, b], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 1);
        assert!((total_area(&out) - 175.0).abs() < 1e-6);
        assert!(out[0].is_ccw());
    }

    #[test]
    fn disjoint_shapes_stay_separate() {
        let a = Contour::rect(0.0, 0.0, 1.0, 1.0);
        let b = Contour::rect(3.0, 0.0, 1.0, 1.0);
        let out = fill_region(&[a, b], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 2);
        assert!((total_area(&out) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let a = Contour::rect(0.0, 0.0, 2.0, 2.0).reversed();
        let out = fill_region(&[a], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 1);
        assert!(out[0].is_ccw());
    }

    #[test]
    fn hole_survives_and_is_clockwise() {
        let outer = Contour::rect(0.0, 0.0, 10.0, 10.0);
        let hole = Contour::rect(3.0, 3.0, 4.0, 4.0).reversed();
        let out = fill_region(&[outer, hole], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 2);
        assert_eq!(out.iter().filter(|c| c.is_ccw()).count(), 1);
        assert!((total_area(&out) - 84.0).abs() < 1e-6);
    }

    #[test]
    fn island_inside_a_counter_is_kept() {
        let input = [
            Contour::rect(0.0, 0.0, 30.0, 30.0),
            Contour::rect(5.0, 5.0, 20.0, 20.0).reversed(),
            Contour::rect(10.0, 10.0, 10.0, 10.0),
        ];
        let out = fill_region(&input, FillRule::NonZero).expect("fill");
        assert!((total_area(&out) - 600.0).abs() < 1e-6);
        let mut rng = StdRng::seed_from_u64(3);
        assert_same_fill(&input, &out, &mut rng, 300);
    }

    #[test]
    fn contained_shape_is_absorbed() {
        let outer = Contour::rect(0.0, 0.0, 10.0, 10.0);
        let inner = Contour::rect(2.0, 2.0, 2.0, 2.0);
        let out = fill_region(&[outer, inner], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 1);
        assert!((total_area(&out) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn squares_sharing_an_edge_fuse() {
        let a = Contour::rect(0.0, 0.0, 1.0, 1.0);
        let b = Contour::rect(1.0, 0.0, 1.0, 1.0);
        let out = fill_region(&[a, b], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 1);
        assert!((total_area(&out) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn opposite_directions_cancel_where_they_overlap() {
        let a = Contour::rect(0.0, 0.0, 10.0, 10.0);
        let b = Contour::rect(5.0, 5.0, 10.0, 10.0).reversed();
        let input = [a, b];
        let out = fill_region(&input, FillRule::NonZero).expect("fill");
        assert!((total_area(&out) - 150.0).abs() < 1e-6);
        let mut rng = StdRng::seed_from_u64(5);
        assert_same_fill(&input, &out, &mut rng, 300);
    }

    #[test]
    fn positive_rule_drops_inverted_loops() {
        let inverted = Contour::rect(0.0, 0.0, 1.0, 1.0).reversed();
        let positive = fill_region(&[inverted.clone()], FillRule::Positive).expect("fill");
        assert!(positive.is_empty());
        let nonzero = fill_region(&[inverted], FillRule::NonZero).expect("fill");
        assert_eq!(nonzero.len(), 1);
    }

    #[test]
    fn self_intersecting_bowtie_becomes_two_triangles() {
        let bowtie = poly(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let out = fill_region(&[bowtie], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Contour::is_ccw));
        assert!((total_area(&out) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_area_spike_does_not_erase_other_contours() {
        let spike = poly(&[(4.0, 6.0), (2.0, 4.0), (4.0, 6.0)]);
        let triangle = poly(&[(0.0, 0.0), (8.0, 0.0), (4.0, 8.0)]);
        let out = fill_region(&[spike, triangle], FillRule::NonZero).expect("fill");
        assert_eq!(out.len(), 1);
        assert!((total_area(&out) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_integer_polygons_keep_their_full_area() {
        let input = [
            poly(&[(90.0, 20.0), (60.0, 10.0), (70.0, 0.0), (100.0, 30.0)]),
            poly(&[(20.0, 90.0), (30.0, 40.0), (80.0, 90.0), (60.0, 50.0), (10.0, 40.0)]),
            poly(&[(10.0, 60.0), (90.0, 80.0), (100.0, 0.0)]),
            poly(&[(30.0, 60.0), (70.0, 40.0), (70.0, 20.0), (20.0, 0.0), (90.0, 10.0)]),
        ];
        let out = fill_region(&input, FillRule::NonZero).expect("fill");
        // Grid estimate of the nonzero area is 4096.
        assert!((total_area(&out) - 4096.0).abs() < 10.0, "{}", total_area(&out));
        let mut rng = StdRng::seed_from_u64(14);
        assert_same_fill(&input, &out, &mut rng, 2000);
    }

    #[test]
    fn random_overlapping_integer_polygons_match_sampled_winding() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let grid = |rng: &mut StdRng| (rand01(rng) * 11.0).floor().min(10.0) * 10.0;
        for _ in 0..60 {
            let input: Vec<Contour> = (0..4)
                .map(|_| {
                    let n = 3 + (rand01(&mut rng) * 3.0) as usize;
                    Contour::new(
                        (0..n)
                            .map(|_| DVec2::new(grid(&mut rng), grid(&mut rng)))
                            .collect(),
                    )
                })
                .collect();
            let out = fill_region(&input, FillRule::NonZero)
                .unwrap_or_else(|e| panic!("{input:?}: {e}"));
            assert_same_fill(&input, &out, &mut rng, 200);
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(fill_region(&[], FillRule::NonZero).expect("fill").is_empty());
    }

    #[test]
    fn non_finite_input_is_an_error() {
        let nan = Contour::new(vec![DVec2::NAN, DVec2::X, DVec2::Y]);
        assert!(matches!(
            fill_region(&[nan], FillRule::NonZero),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn simple_loops_split_figure_eights() {
        let bowtie = poly(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let loops = simple_loops(&bowtie);
        assert_eq!(loops.len(), 2);
        let winding: i32 = loops
            .iter()
            .map(|l| l.winding_number(DVec2::new(1.0, 0.5)))
            .sum();
        assert_eq!(winding, bowtie.winding_number(DVec2::new(1.0, 0.5)));
    }
}
