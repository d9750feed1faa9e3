use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossing_watch::cache::{CachedGeocoder, GeocodeCacheConfig};
use crossing_watch::config::AppConfig;
use crossing_watch::enrich::CrossingEnricher;
use crossing_watch::feed::{CrossingSource, FeedClient, MockFeed};
use crossing_watch::places::{FixedGeolocator, GazetteerGeocoder, Geocoder};
use crossing_watch::view::{Interaction, Phase, Session, SessionHandle, render_list};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crossing_watch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match &config.mock_dir {
        Some(dir) => match MockFeed::load(dir) {
            Ok(feed) => {
                info!(dir = %dir.display(), "Serving crossings from local files");
                run(feed, &config).await
            }
            Err(e) => Err(format!("failed to load mock feed: {e}")),
        },
        None => match FeedClient::new(config.feed.clone()) {
            Ok(client) => {
                info!(url = %client.base_url(), "Using crossing feed");
                run(client, &config).await
            }
            Err(e) => Err(format!("failed to create feed client: {e}")),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Run one session against `source` and print the ranked list.
async fn run<S: CrossingSource + 'static>(source: S, config: &AppConfig) -> Result<(), String> {
    let enricher = Arc::new(CrossingEnricher::new(
        Arc::new(source),
        config.enrich.clone(),
    ));
    let geolocator = Arc::new(match config.location {
        Some(position) => FixedGeolocator::at(position),
        None => FixedGeolocator::unavailable(),
    });

    let mut handle = Session::spawn(enricher, geolocator, &config.view);

    let expected_point = config.location;
    let settled = tokio::time::timeout(
        config.load_timeout,
        handle.wait_for(|s| {
            s.phase.is_settled() && expected_point.is_none_or(|p| s.point == p)
        }),
    )
    .await
    .map_err(|_| "timed out loading crossings".to_string())?
    .map_err(|e| e.to_string())?;

    if settled.phase == Phase::Error {
        print!("{}", render_list(&settled));
        handle.shutdown().await;
        return Err("could not load crossings".to_string());
    }

    if let Some(query) = &config.search {
        search_and_select(&mut handle, config, query).await?;
    }

    print!("{}", render_list(&handle.snapshot()));
    handle.shutdown().await;
    Ok(())
}

async fn search_and_select(
    handle: &mut SessionHandle,
    config: &AppConfig,
    query: &str,
) -> Result<(), String> {
    let Some(path) = &config.places_file else {
        warn!(query, "Search requested but CROSSING_PLACES_FILE is not set");
        return Ok(());
    };

    let gazetteer = GazetteerGeocoder::load(path).map_err(|e| e.to_string())?;
    let geocoder = CachedGeocoder::new(gazetteer, &GeocodeCacheConfig::default());

    let candidates = match geocoder.search(query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(query, error = %e, "Place search failed, keeping reference point");
            return Ok(());
        }
    };
    let Some(choice) = candidates.first() else {
        warn!(query, "No places matched");
        return Ok(());
    };
    info!(place = %choice.description, "Selected search result");

    let target = choice.location;
    handle
        .interact(Interaction::search_selected(choice))
        .await
        .map_err(|e| e.to_string())?;
    handle
        .wait_for(|s| s.point == target)
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
