use risorizer::prelude::*;
use risorizer_examples::{init_tracing, mark_point, render_outline, square, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let extent = 600.0;
    let glyph = square(extent);
    let render = RenderConfig::fit((600, 600), Bounds::new(0.0, 0.0, extent, extent), 20.0)
        .with_ink([20, 20, 24])
        .with_background([250, 250, 250]);

    for distribution in Distribution::ALL {
        // Same seed per mode so only the weighting differs
        let mut rng = StdRng::seed_from_u64(7);
        let sampler = SpotSampler::new(0.0015, 6.0, 0.5).with_distribution(distribution);
        let set = sampler.sample(&glyph, &mut rng);
        tracing::info!(
            "{:?}: {} of {} attempts accepted ({} outside, {} covered, {} by distance)",
            distribution,
            set.len(),
            set.attempts,
            set.rejected_outside,
            set.rejected_covered,
            set.rejected_distribution
        );

        let spots: Outline = set.triangles.iter().map(|t| t.to_contour()).collect();
        let mut img = render_outline(&spots, &render);
        if let Some(spark) = set.spark {
            mark_point(&mut img, &render, spark, 6, [220, 40, 40]);
        }
        let path = format!(
            "distributions-compare-{}.png",
            format!("{distribution:?}").to_lowercase()
        );
        img.save(&path)?;
        tracing::info!("Wrote {path}.");
    }

    Ok(())
}
