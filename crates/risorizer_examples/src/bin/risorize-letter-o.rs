use risorizer::prelude::*;
use risorizer_examples::{init_tracing, letter_o, render_outline_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut layer = Layer::new("Regular", letter_o(0.5));
    let Some(bounds) = layer.outline.bounds() else {
        anyhow::bail!("empty glyph");
    };
    let render = RenderConfig::fit((800, 800), bounds, 40.0);
    render_outline_to_png(&layer.outline, &render, "risorize-letter-o-before.png")?;

    let config = RisoConfig::new()
        .with_size(12.0)
        .with_density(20.0)
        .with_inset(10.0)
        .with_variance(0.5);
    let risorizer = Risorizer::try_new(config)?;

    // Reproducible RNG
    let mut rng = StdRng::seed_from_u64(42);
    let report = risorizer.apply_with_rng(&mut layer, &mut rng)?;
    tracing::info!(
        "{}: {} attempts, {} spots, {} contours added",
        report.layer,
        report.attempts,
        report.spots,
        report.contours_added
    );

    render_outline_to_png(&layer.outline, &render, "risorize-letter-o-after.png")?;
    Ok(())
}
