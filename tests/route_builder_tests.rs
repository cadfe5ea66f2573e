use fieldroute::config::GeocoderConfig;
use fieldroute::error::{AppError, UnresolvedReason};
use fieldroute::models::StopRole;
use fieldroute::services::{ItineraryRequest, RouteBuilder, SheetColumns};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod common;

const COLUMNS: SheetColumns = SheetColumns {
    address: 1,
    institute: 0,
};

fn request(institute: &str, start: &str, destination: Option<&str>) -> ItineraryRequest {
    ItineraryRequest {
        institute: institute.to_string(),
        start_address: start.to_string(),
        destination_address: destination.map(str::to_string),
    }
}

fn metropolis() -> common::StubGeocoder {
    common::StubGeocoder::new()
        .with("1 Start Rd, Metropolis", 0.0, 0.0)
        .with("10 A St, Metropolis", 0.0, 2.0)
        .with("20 B St, Metropolis", 0.0, 1.0)
        .with("30 C St, Metropolis", 0.0, 3.0)
        .with("Depot, Metropolis", 0.0, 0.1)
}

#[tokio::test]
async fn test_builds_normalized_nearest_neighbor_route() {
    let geocoder = Arc::new(metropolis());
    let builder = common::builder(geocoder.clone());
    let ds = common::sheet(&[("X", "10 A St"), ("X", "20 B St, Metropolis")]);

    let itinerary = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .expect("route should build");

    assert_eq!(
        itinerary.addresses(),
        vec![
            "1 Start Rd, Metropolis",
            "20 B St, Metropolis",
            "10 A St, Metropolis"
        ]
    );
    assert_eq!(itinerary.start().role, StopRole::Start);
    assert!(itinerary.destination().is_none());
    assert_eq!(
        itinerary.coordinates(),
        vec![[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]]
    );

    // The unnormalized text never reaches the geocoder
    assert!(!geocoder.calls().contains(&"10 A St".to_string()));
}

#[tokio::test]
async fn test_destination_is_always_last() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[
        ("X", "10 A St, Metropolis"),
        ("X", "20 B St, Metropolis"),
        ("X", "30 C St, Metropolis"),
    ]);

    // Depot sits right next to the start but must still come last
    let itinerary = builder
        .build(
            &ds,
            COLUMNS,
            &request("X", "1 Start Rd, Metropolis", Some("Depot, Metropolis")),
        )
        .await
        .unwrap();

    assert_eq!(itinerary.len(), 5);
    let last = itinerary.stops().last().unwrap();
    assert_eq!(last.address, "Depot, Metropolis");
    assert_eq!(last.role, StopRole::Destination);
    assert_eq!(
        itinerary.addresses()[1..4],
        [
            "20 B St, Metropolis".to_string(),
            "10 A St, Metropolis".to_string(),
            "30 C St, Metropolis".to_string()
        ]
    );
}

#[tokio::test]
async fn test_start_and_destination_rows_are_not_waypoints() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[
        ("X", "1 Start Rd, Metropolis"),
        ("X", "10 A St, Metropolis"),
        ("X", "Depot, Metropolis"),
    ]);

    let itinerary = builder
        .build(
            &ds,
            COLUMNS,
            &request("X", "1 Start Rd, Metropolis", Some("Depot, Metropolis")),
        )
        .await
        .unwrap();

    assert_eq!(
        itinerary.addresses(),
        vec![
            "1 Start Rd, Metropolis",
            "10 A St, Metropolis",
            "Depot, Metropolis"
        ]
    );
}

#[tokio::test]
async fn test_institute_selection_is_case_insensitive_substring() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[
        ("Xavier Academy", "10 A St, Metropolis"),
        ("Other", "30 C St, Metropolis"),
    ]);

    let itinerary = builder
        .build(&ds, COLUMNS, &request("xavier", "1 Start Rd, Metropolis", None))
        .await
        .unwrap();

    assert_eq!(itinerary.len(), 2);
    assert_eq!(itinerary.addresses()[1], "10 A St, Metropolis");
}

#[tokio::test]
async fn test_empty_institute_match_is_an_error() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[("X", "10 A St, Metropolis")]);

    let err = builder
        .build(&ds, COLUMNS, &request("Y", "1 Start Rd, Metropolis", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmptyInstituteMatch { ref institute } if institute == "Y"));
}

#[tokio::test]
async fn test_blank_selection_is_rejected() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[("X", "10 A St, Metropolis")]);

    let err = builder
        .build(&ds, COLUMNS, &request("  ", "1 Start Rd, Metropolis", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    let err = builder
        .build(&ds, COLUMNS, &request("X", "", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_unresolved_start_fails_the_build() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[("X", "10 A St, Metropolis")]);

    let err = builder
        .build(&ds, COLUMNS, &request("X", "Atlantis", None))
        .await
        .unwrap_err();

    match err {
        AppError::UnresolvedAddress { address, reason } => {
            assert_eq!(address, "Atlantis");
            assert_eq!(reason, UnresolvedReason::NoMatch);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unresolved_waypoint_fails_fast() {
    let geocoder = Arc::new(metropolis().failing("20 B St, Metropolis", "HTTP 503"));
    let builder = common::builder(geocoder);
    let ds = common::sheet(&[
        ("X", "10 A St, Metropolis"),
        ("X", "20 B St, Metropolis"),
        ("X", "30 C St, Metropolis"),
    ]);

    let err = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .unwrap_err();

    match err {
        AppError::UnresolvedAddress { address, reason } => {
            assert_eq!(address, "20 B St, Metropolis");
            assert!(matches!(reason, UnresolvedReason::ServiceError(ref e) if e == "HTTP 503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unresolved_destination_fails_the_build() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = common::sheet(&[("X", "10 A St, Metropolis")]);

    let err = builder
        .build(
            &ds,
            COLUMNS,
            &request("X", "1 Start Rd, Metropolis", Some("Nowhere")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnresolvedAddress { ref address, .. } if address == "Nowhere"));
}

#[tokio::test]
async fn test_lookup_deadline_surfaces_as_unresolved() {
    let geocoder = Arc::new(metropolis().slow("10 A St, Metropolis", Duration::from_secs(5)));
    let config = GeocoderConfig {
        lookup_deadline: Duration::from_millis(50),
        ..GeocoderConfig::default()
    };
    let builder = RouteBuilder::new(geocoder, &config);
    let ds = common::sheet(&[("X", "10 A St, Metropolis")]);

    let err = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::UnresolvedAddress {
            reason: UnresolvedReason::ServiceError(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_institute_without_addresses_gives_start_only_route() {
    let builder = common::builder(Arc::new(metropolis()));
    let ds = fieldroute::models::Dataset::new(
        vec!["Institute".into(), "Address".into()],
        vec![vec![Some("X".into()), None]],
    );

    let itinerary = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .unwrap();

    assert_eq!(itinerary.addresses(), vec!["1 Start Rd, Metropolis"]);
}

#[tokio::test]
async fn test_waypoints_are_geocoded_concurrently_within_bound() {
    let geocoder = Arc::new(
        common::StubGeocoder::new()
            .latency(Duration::from_millis(50))
            .with("1 Start Rd, Metropolis", 0.0, 0.0)
            .with("1 A St, Metropolis", 0.0, 1.0)
            .with("2 A St, Metropolis", 0.0, 2.0)
            .with("3 A St, Metropolis", 0.0, 3.0)
            .with("4 A St, Metropolis", 0.0, 4.0)
            .with("5 A St, Metropolis", 0.0, 5.0)
            .with("6 A St, Metropolis", 0.0, 6.0)
            .with("7 A St, Metropolis", 0.0, 7.0),
    );
    let config = GeocoderConfig {
        concurrency: 3,
        ..GeocoderConfig::default()
    };
    let builder = RouteBuilder::new(geocoder.clone(), &config);
    let ds = common::sheet(&[
        ("X", "7 A St, Metropolis"),
        ("X", "3 A St, Metropolis"),
        ("X", "5 A St, Metropolis"),
        ("X", "1 A St, Metropolis"),
        ("X", "6 A St, Metropolis"),
        ("X", "2 A St, Metropolis"),
        ("X", "4 A St, Metropolis"),
    ]);

    let itinerary = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .unwrap();

    let peak = geocoder.peak_in_flight();
    assert!(peak > 1, "lookups ran one at a time");
    assert!(peak <= config.concurrency, "peak {} over the bound", peak);

    // Out-of-order completion does not disturb the nearest-neighbor order
    let expected: Vec<String> = std::iter::once("1 Start Rd, Metropolis".to_string())
        .chain((1..=7).map(|i| format!("{} A St, Metropolis", i)))
        .collect();
    assert_eq!(itinerary.addresses(), expected);
}

#[tokio::test]
async fn test_failed_waypoint_cancels_slow_lookups() {
    let geocoder = Arc::new(
        metropolis().slow("10 A St, Metropolis", Duration::from_secs(3)),
    );
    let builder = common::builder(geocoder.clone());
    // The slow address comes first, the unknown one fails immediately
    let ds = common::sheet(&[
        ("X", "10 A St, Metropolis"),
        ("X", "404 Missing St, Metropolis"),
    ]);

    let started = Instant::now();
    let err = builder
        .build(&ds, COLUMNS, &request("X", "1 Start Rd, Metropolis", None))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(
        matches!(err, AppError::UnresolvedAddress { ref address, .. } if address == "404 Missing St, Metropolis")
    );
    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
    assert!(geocoder.calls().contains(&"10 A St, Metropolis".to_string()));
    assert!(!geocoder.completed().contains(&"10 A St, Metropolis".to_string()));
}
