//! Demo entry point: loads synthetic light curves, phase-folds them and
//! replays a scripted ephemeris gesture

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use lc_core::{DataAdded, EphemerisParameters, EphemerisRegistry, EphemerisStore, EventBus};
use lc_data::{light_curve_parser, DataCollection, LightCurveHandler, ParserConfig, Subset};
use lc_views::tools::subscribe_to_renames;
use lc_views::{subscribe_phase_view, EphemerisGesture, PhaseView, ViewerTool};
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

const PHASE_VIEWER: &str = "flux-vs-phase:default";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting light-curve viewer demo");

    let events = Arc::new(EventBus::new());
    events.subscribe_fn::<DataAdded, _>(|event| {
        info!("Data '{}' loaded with {} cadences", event.label, event.row_count);
    });

    let registry = Arc::new(EphemerisRegistry::new());
    registry.add_component("default", EphemerisParameters::new(0.0, 3.0)?);

    let view = Arc::new(PhaseView::new(registry.clone(), PHASE_VIEWER));
    registry.add_subscriber(view.clone());
    subscribe_phase_view(&view, &events);

    let mut collection = DataCollection::new().with_event_bus(events.clone());
    let mut config = ParserConfig::default();
    config.add_phase_viewer(PHASE_VIEWER);

    let sector_1 = demo::transit_light_curve("TIC 25155310", 1325.0, 480)?;
    let sector_2 = demo::transit_light_curve("TIC 25155310", 1354.0, 480)?;
    let first = light_curve_parser(&mut collection, sector_1, None, &config)?;
    light_curve_parser(&mut collection, sector_2, None, &config)?;
    info!("Collection holds {:?}", collection.labels().collect::<Vec<_>>());

    let gesture = Arc::new(Mutex::new(EphemerisGesture::new(registry.clone(), PHASE_VIEWER)));
    subscribe_to_renames(&gesture, &events);
    gesture.lock().activate();

    let start = Instant::now();
    for (event, at) in demo::scripted_gestures(start) {
        let mut gesture = gesture.lock();
        gesture.handle_event(&event, at);
        gesture.tick(at);
    }
    let ephemeris = registry.get("default").context("ephemeris component disappeared")?;
    info!(
        "Ephemeris after gestures: t0={:.4} period={:.4} (injected period {})",
        ephemeris.t0,
        ephemeris.period,
        demo::TRUE_PERIOD
    );

    for label in view.labels() {
        let data = collection.get(&label).context("loaded data missing")?;
        let folded = view.folded_column(data, "flux")?;
        let in_transit = folded.iter().filter(|(_, flux)| *flux < 1.0).count();
        info!("'{}' folds {} samples, {} in transit", label, folded.len(), in_transit);
    }

    registry.rename_component("default", "planet b");
    collection.rename_viewer(PHASE_VIEWER, "flux-vs-phase:planet b");
    info!(
        "Gesture now edits '{}'",
        gesture.lock().ephemeris_component().unwrap_or("nothing")
    );

    let data = collection.get(&first).context("loaded data missing")?;
    let handler = LightCurveHandler::with_unit(config.time_unit);
    let opening = handler.to_light_curve(Subset::time_range(data, 0.0, 0.4), None)?;
    println!("{}", handler.to_table(&opening)?.pretty()?);

    Ok(())
}
