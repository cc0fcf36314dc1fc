use std::sync::Arc;

use chrono::{TimeZone, Utc};

use lcroute::{ActivationInterval, Route, RouteError, RoutesOptions, Strategy};
use lcroute_mock::MockFilters;

use crate::helpers::{TENANT, builder_with, event, profile};

#[tokio::test]
async fn heaviest_matching_profile_governs_the_event() {
    let mut light = profile("PRF_LIGHT", Strategy::Weight, vec![Route::new("r1", 10.0)]);
    light.weight = 10.0;
    let mut heavy = profile("PRF_HEAVY", Strategy::Weight, vec![Route::new("r2", 10.0)]);
    heavy.weight = 20.0;
    let svc = builder_with(vec![light, heavy]).build().unwrap();

    let ranked = svc
        .get_routes(&event("prf-1"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ranked.profile_id, "PRF_HEAVY");
}

#[tokio::test]
async fn equal_weights_fall_back_to_store_order() {
    let first = profile("PRF_FIRST", Strategy::Weight, vec![Route::new("r1", 10.0)]);
    let second = profile("PRF_SECOND", Strategy::Weight, vec![Route::new("r2", 10.0)]);
    let svc = builder_with(vec![first, second]).build().unwrap();

    let ranked = svc
        .get_routes(&event("prf-2"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ranked.profile_id, "PRF_FIRST");
}

#[tokio::test]
async fn expired_profiles_do_not_match() {
    let start = Utc.with_ymd_and_hms(2017, 11, 27, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2018, 11, 27, 0, 0, 0).unwrap();
    let mut windowed = profile("PRF_WINDOWED", Strategy::Weight, vec![Route::new("r1", 10.0)]);
    windowed.activation_interval = Some(ActivationInterval {
        activation_time: Some(start),
        expiry_time: Some(end),
    });
    let open = profile("PRF_OPEN", Strategy::Weight, vec![Route::new("r2", 10.0)]);
    let svc = builder_with(vec![windowed, open]).build().unwrap();

    let inside = event("prf-3").at(start + chrono::Duration::days(30));
    let matched = svc.profiles_for_event(&inside).await.unwrap();
    assert_eq!(matched.len(), 2);

    let after = event("prf-3").at(end + chrono::Duration::days(1));
    let matched = svc.profiles_for_event(&after).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "PRF_OPEN");
}

#[tokio::test]
async fn profile_filters_gate_matching() {
    let mut gated = profile("PRF_GATED", Strategy::Weight, vec![Route::new("r1", 10.0)]);
    gated.filter_ids = vec!["FLTR_ACNT_1001".to_string()];
    let svc = builder_with(vec![gated])
        .with_filters(Arc::new(MockFilters::passing_only(&[])))
        .build()
        .unwrap();

    let err = svc.profiles_for_event(&event("prf-4")).await.unwrap_err();
    assert!(matches!(err, RouteError::NotFound));

    let err = svc
        .get_routes(&event("prf-4"), &RoutesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::NotFound));
}

#[tokio::test]
async fn other_tenants_profiles_are_invisible() {
    let mut foreign = profile("PRF_FOREIGN", Strategy::Weight, vec![Route::new("r1", 10.0)]);
    foreign.tenant = "other.org".to_string();
    let svc = builder_with(vec![foreign]).build().unwrap();

    let err = svc
        .get_routes(&event("prf-5"), &RoutesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::NotFound));
}

#[tokio::test]
async fn profile_crud_round_trip() {
    let svc = builder_with(vec![]).build().unwrap();

    assert!(matches!(
        svc.profile(TENANT, "PRF_CRUD").await,
        Err(RouteError::NotFound)
    ));

    let p = profile("PRF_CRUD", Strategy::LeastCost, vec![Route::new("r1", 10.0)]);
    svc.set_profile(p.clone()).await.unwrap();
    assert_eq!(svc.profile(TENANT, "PRF_CRUD").await.unwrap(), p);
    assert_eq!(svc.profile_ids(TENANT).await.unwrap(), vec!["PRF_CRUD"]);

    let mut updated = p.clone();
    updated.weight = 33.0;
    svc.set_profile(updated.clone()).await.unwrap();
    assert_eq!(svc.profile(TENANT, "PRF_CRUD").await.unwrap().weight, 33.0);

    svc.remove_profile(TENANT, "PRF_CRUD").await.unwrap();
    assert!(matches!(
        svc.remove_profile(TENANT, "PRF_CRUD").await,
        Err(RouteError::NotFound)
    ));
    assert!(svc.profile_ids(TENANT).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_profiles_are_rejected_on_set() {
    let svc = builder_with(vec![]).build().unwrap();

    let mut nameless = profile("", Strategy::Weight, vec![]);
    nameless.tenant = TENANT.to_string();
    assert!(matches!(
        svc.set_profile(nameless).await,
        Err(RouteError::InvalidArg(_))
    ));

    let bad_route = profile("PRF_BAD", Strategy::Weight, vec![Route::new("", 10.0)]);
    assert!(matches!(
        svc.set_profile(bad_route).await,
        Err(RouteError::InvalidArg(_))
    ));
}
