use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use risorizer::prelude::*;

fn square(extent: f64) -> Outline {
    Outline::from_contour(Contour::rect(0.0, 0.0, extent, extent))
}

/// Ring-shaped "O" built from cubic arcs: outer radius 300, counter radius 150.
fn letter_o() -> Outline {
    fn circle(b: &mut PathBuilder, cx: f64, cy: f64, r: f64, clockwise: bool) {
        let k = 0.552_284_749_8 * r;
        let s = if clockwise { -1.0 } else { 1.0 };
        b.move_to(cx + r, cy)
            .curve_to(cx + r, cy + s * k, cx + k, cy + s * r, cx, cy + s * r)
            .curve_to(cx - k, cy + s * r, cx - r, cy + s * k, cx - r, cy)
            .curve_to(cx - r, cy - s * k, cx - k, cy - s * r, cx, cy - s * r)
            .curve_to(cx + k, cy - s * r, cx + r, cy - s * k, cx + r, cy);
    }
    let mut b = PathBuilder::with_tolerance(0.25);
    circle(&mut b, 400.0, 400.0, 300.0, false);
    circle(&mut b, 400.0, 400.0, 150.0, true);
    b.build()
}

#[test]
fn square_scenario_without_distribution() {
    let mut rng = StdRng::seed_from_u64(2024);
    let region = square(1000.0);
    let sampler = SpotSampler::new(0.0002, 15.0, 0.5);
    let set = sampler
        .generate(&region, &PolygonOps::default(), &mut rng)
        .expect("generate");

    assert_eq!(set.attempts, 200);
    assert!(
        (150..=200).contains(&set.len()),
        "accepted {} triangles",
        set.len()
    );
    for t in &set.triangles {
        assert!(region.contains(t.origin()));
        assert!(t.is_ccw());
    }

    // Every point of the merged shapes is covered exactly once.
    for ix in 0..200 {
        for iy in 0..200 {
            let p = DVec2::new(ix as f64 * 5.0 + 0.37, iy as f64 * 5.0 + 0.61);
            let w = set.merged.winding_number(p);
            assert!(w == 0 || w == 1, "winding {w} at {p:?}");
        }
    }
    assert!(set.merged.contours.iter().any(Contour::is_ccw));
}

#[test]
fn zero_density_returns_empty_set_for_any_region() {
    let mut rng = StdRng::seed_from_u64(1);
    for region in [square(1000.0), letter_o(), Outline::default()] {
        let set = SpotSampler::new(0.0, 15.0, 0.5)
            .generate(&region, &PolygonOps::default(), &mut rng)
            .expect("generate");
        assert!(set.is_empty());
        assert!(set.merged.is_empty());
    }
}

#[test]
fn gaussian_spots_cluster_around_the_spark() {
    let region = square(1000.0);
    let sampler = SpotSampler::new(0.002, 3.0, 0.5).with_distribution(Distribution::Gaussian);
    let radius = 150.0;

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = sampler.sample(&region, &mut rng);
        assert_eq!(set.attempts, 4000);
        let spark = set.spark.expect("spark");
        let corner = set.bounds.expect("bounds").farthest_corner(spark);

        let near_spark = set.origins().filter(|p| p.distance(spark) < radius).count() as f64;
        let near_corner = set.origins().filter(|p| p.distance(corner) < radius).count() as f64;

        // Normalize by the part of each disk inside the square.
        let spark_area = disk_area_inside(&region, spark, radius);
        let corner_area = disk_area_inside(&region, corner, radius);
        assert!(
            near_spark / spark_area > near_corner / corner_area,
            "seed {seed}: {near_spark}/{spark_area} vs {near_corner}/{corner_area}"
        );
    }
}

fn disk_area_inside(region: &Outline, center: DVec2, radius: f64) -> f64 {
    let step = radius / 50.0;
    let mut inside = 0usize;
    for ix in -50..50 {
        for iy in -50..50 {
            let p = center + DVec2::new((ix as f64 + 0.5) * step, (iy as f64 + 0.5) * step);
            if p.distance(center) < radius && region.contains(p) {
                inside += 1;
            }
        }
    }
    inside as f64 * step * step
}

#[test]
fn letter_o_spots_stay_inside_the_inset_ring() {
    let mut rng = StdRng::seed_from_u64(9);
    let ops = PolygonOps::default();
    let glyph = letter_o();
    let region = prepare_region(&glyph, 15.0, &ops).expect("region");
    assert_eq!(region.len(), 2);

    let set = RisoConfig::new()
        .with_density(50.0)
        .sampler()
        .generate(&region, &ops, &mut rng)
        .expect("generate");
    assert!(!set.is_empty());
    let center = DVec2::new(400.0, 400.0);
    for p in set.origins() {
        let d = p.distance(center);
        assert!(d > 150.0 + 29.0 && d < 300.0 - 29.0, "spot at distance {d}");
    }
}

#[test]
fn composited_spots_are_counters_of_the_glyph() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut layer = Layer::new("O", letter_o());
    let report = filter_layer(
        &mut layer,
        &RisoConfig::new().with_density(30.0),
        &PolygonOps::default(),
        &mut rng,
        None,
    )
    .expect("filter");
    assert!(report.contours_added > 0);
    assert_eq!(layer.outline.len(), 2 + report.contours_added);

    // Outer ring CCW, counter CW, spots inside the ink become clockwise counters.
    assert!(layer.outline.contours[0].is_ccw());
    assert!(!layer.outline.contours[1].is_ccw());
    let spots = &layer.outline.contours[2..];
    assert!(spots.iter().filter(|c| !c.is_ccw()).count() > 0);
}

#[test]
fn batch_continues_past_broken_layers() {
    let mut rng = StdRng::seed_from_u64(5);
    let broken = Outline::from_contour(Contour::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(f64::NAN, 100.0),
        DVec2::new(100.0, 100.0),
    ]));
    let mut layers = vec![
        Layer::new("A", square(500.0)),
        Layer::new("broken", broken),
        Layer::new("C", square(500.0)),
    ];
    let filter = Risorizer::try_new(RisoConfig::new().with_density(10.0)).expect("config");
    let mut sink = VecSink::new();
    let outcomes = filter.apply_all_with_events(&mut layers, &mut rng, &mut sink);

    assert!(outcomes[0].is_applied());
    assert!(matches!(&outcomes[1], LayerOutcome::Failed { layer, .. } if layer == "broken"));
    assert!(outcomes[2].is_applied());
    assert_eq!(layers[1].outline.point_count(), 3);
    assert!(layers[0].outline.len() > 1);
    assert!(sink
        .as_slice()
        .iter()
        .any(|e| matches!(e, FilterEvent::LayerFailed { index: 1, .. })));
}

#[test]
fn custom_parameter_drives_an_export_run() {
    let config =
        RisoConfig::from_custom_parameter("Risorizer; size:8; density:25; inset:5; distribute:4");
    assert_eq!(config.distribution, Distribution::Smooth);
    let filter = Risorizer::try_new(config).expect("config");
    let mut layer = Layer::new("A", square(400.0));
    let mut rng = StdRng::seed_from_u64(77);
    let report = filter.apply_with_rng(&mut layer, &mut rng).expect("filter");
    // 380 x 380 region, 0.0025 per unit, doubled for the weighted mode.
    assert!((718..=722).contains(&report.attempts), "{}", report.attempts);
}
