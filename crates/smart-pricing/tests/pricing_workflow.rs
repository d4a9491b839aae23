//! End-to-end scenarios for the pricing engine driven through the public crate surface:
//! profile loading, per-user decisions, batch simulation and the HTTP router.

mod common {
    use smart_pricing::workflows::pricing::{CityTier, DeviceType, UserProfile};

    pub(super) fn learner(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: None,
            mock_tests_taken: 0,
            added_to_cart: false,
            page_visits: 0,
            device_type: DeviceType::Android,
            city_tier: CityTier::Tier2,
            is_uninstalled: false,
            last_active_days: 0,
            competitor_signal: false,
            install_source: None,
        }
    }

    pub(super) fn cohort() -> Vec<UserProfile> {
        vec![
            UserProfile {
                mock_tests_taken: 3,
                added_to_cart: true,
                page_visits: 4,
                device_type: DeviceType::Ios,
                city_tier: CityTier::Tier1,
                ..learner("closing")
            },
            UserProfile {
                mock_tests_taken: 3,
                added_to_cart: true,
                page_visits: 4,
                city_tier: CityTier::Tier3,
                is_uninstalled: true,
                last_active_days: 45,
                competitor_signal: true,
                ..learner("win-back")
            },
            UserProfile {
                city_tier: CityTier::Tier3,
                is_uninstalled: true,
                last_active_days: 40,
                ..learner("retention")
            },
            UserProfile {
                mock_tests_taken: 4,
                added_to_cart: true,
                page_visits: 6,
                city_tier: CityTier::Tier3,
                ..learner("nudge")
            },
            learner("standard"),
        ]
    }
}

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower::ServiceExt;

use smart_pricing::workflows::pricing::{
    analyze_all, pricing_router, BatchSimulator, DiscountTier, Narrator, PricingService,
    ProfileSet, RunStatus, DEFAULT_BASE_PRICE,
};

#[test]
fn cohort_spans_every_discount_tier() {
    let tiers: Vec<DiscountTier> = analyze_all(&common::cohort())
        .into_iter()
        .map(|decision| decision.tier)
        .collect();
    assert_eq!(
        tiers,
        vec![
            DiscountTier::ClosingTheDeal,
            DiscountTier::WinBack,
            DiscountTier::PriceSensitiveRetention,
            DiscountTier::ConversionNudge,
            DiscountTier::Standard,
        ]
    );
}

#[test]
fn simulation_with_guaranteed_conversion_books_net_revenue() {
    let mut simulator = BatchSimulator::new(common::cohort(), StepRng::new(0, 0));
    assert_eq!(simulator.run(), RunStatus::Completed);

    let report = simulator.into_report(RunStatus::Completed);
    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.converted, 5);
    assert_eq!(report.summary.conversion_rate, 100.0);
    // (45 + 75 + 70 + 65 + 0) / 5
    assert_eq!(report.summary.avg_discount, 51);
    assert_eq!(report.summary.revenue, 550.0 + 250.0 + 300.0 + 350.0 + 1000.0);
}

#[test]
fn aborted_simulation_keeps_processed_prefix() {
    let mut simulator = BatchSimulator::new(common::cohort(), StdRng::seed_from_u64(99));
    let status = simulator.run_with(|progress| {
        if progress.latest.profile.id == "retention" {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(status, RunStatus::Aborted);
    let report = simulator.into_report(status);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.results[2].decision.discount, 70);
}

#[tokio::test]
async fn router_serves_simulation_over_loaded_cohort() {
    let service = Arc::new(PricingService::new(
        ProfileSet::new(common::cohort()),
        Narrator::disabled(),
        DEFAULT_BASE_PRICE,
    ));
    let router = pricing_router(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/pricing/simulate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"seed":1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["summary"]["total"], 5);
    assert_eq!(body["summary"]["avgDiscount"], 51);
    assert!(body.get("narrative").is_none());
}
