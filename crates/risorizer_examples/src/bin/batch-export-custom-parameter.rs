use risorizer::prelude::*;
use risorizer_examples::{init_tracing, letter_h, letter_o, square};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Settings as stored in a font's custom parameter
    let parameter = "Risorizer; size:10; density:12; inset:8; variance:0.3; distribute:4";
    let config = RisoConfig::from_custom_parameter(parameter);
    tracing::info!("Parsed settings round trip to: {}", config.to_custom_parameter());

    let mut broken = square(100.0);
    broken.contours[0].points[2].x = f64::NAN;

    let mut layers = vec![
        Layer::new("O", letter_o(1.0)),
        Layer::new("H", letter_h()),
        Layer::new("broken", broken),
        Layer::new("period", square(40.0)),
    ];

    let mut events = VecSink::new();
    let mut rng = StdRng::seed_from_u64(1234);
    let risorizer = Risorizer::try_new(config)?;
    let outcomes = risorizer.apply_all_with_events(&mut layers, &mut rng, &mut events);

    for outcome in &outcomes {
        match outcome {
            LayerOutcome::Applied(report) => tracing::info!(
                "{}: {} spots merged into {} contours",
                report.layer,
                report.spots,
                report.contours_added
            ),
            LayerOutcome::Failed { layer, message } => {
                tracing::warn!("{layer}: left unchanged ({message})")
            }
        }
    }

    let warnings = events
        .as_slice()
        .iter()
        .filter(|e| matches!(e, FilterEvent::Warning { .. }))
        .count();
    tracing::info!(
        "{} of {} layers applied, {} events, {} warnings",
        outcomes.iter().filter(|o| o.is_applied()).count(),
        outcomes.len(),
        events.len(),
        warnings
    );
    Ok(())
}
