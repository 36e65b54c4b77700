use std::collections::BTreeMap;
use std::sync::Arc;

use heirloom_nullables::{NullClock, NullTransport};
use heirloom_sources::{
    default_sources, DeathSource, GovernmentRegistrySource, NewsObituarySource,
    SourceEndpoints, SsdiSource,
};
use heirloom_types::{ConfidenceTier, Timestamp, VerificationQuery};
use serde_json::json;

const SSDI_URL: &str = "http://ssdi.test";
const NEWS_URL: &str = "http://news.test";
const US_REGISTRY: &str = "http://registry-us.test";

fn query() -> VerificationQuery {
    VerificationQuery::new("John Q Doe", "1950-01-01", "US")
}

fn clock() -> Arc<NullClock> {
    Arc::new(NullClock::new(1_700_000_000))
}

fn registries() -> BTreeMap<String, String> {
    BTreeMap::from([("us".to_string(), US_REGISTRY.to_string())])
}

#[tokio::test]
async fn ssdi_match_is_high_tier_with_record() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(
        SSDI_URL,
        json!({
            "deceased": true,
            "date_of_death": "2024-03-15",
            "location": "Springfield",
            "record_id": "SSA-991"
        }),
    );
    let source = SsdiSource::new(SSDI_URL, transport.clone(), clock());

    let verdict = source.probe(&query().with_national_id("123-45-6789")).await;

    assert!(verdict.is_verified);
    assert_eq!(verdict.source_name, "SSDI");
    assert_eq!(verdict.confidence, ConfidenceTier::High);
    let record = verdict.data.expect("record");
    assert_eq!(record.date_of_death(), "2024-03-15");
    assert_eq!(record.verification_id(), "SSA-991");
    assert_eq!(record.issued_at(), Timestamp::new(1_700_000_000));

    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://ssdi.test/search");
    assert_eq!(requests[0].param("first_name"), Some("John"));
    assert_eq!(requests[0].param("last_name"), Some("Doe"));
    assert_eq!(requests[0].param("national_id"), Some("123-45-6789"));
}

#[tokio::test]
async fn ssdi_requires_first_and_last_name() {
    let transport = Arc::new(NullTransport::new());
    let source = SsdiSource::new(SSDI_URL, transport.clone(), clock());

    let verdict = source
        .probe(&VerificationQuery::new("Cher", "1946-05-20", "US"))
        .await;

    assert!(!verdict.is_verified);
    assert_eq!(verdict.confidence, ConfidenceTier::Low);
    assert!(verdict.error.unwrap().contains("first and last name"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn ssdi_not_deceased_is_unverified_without_error() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(SSDI_URL, json!({"deceased": false}));
    let source = SsdiSource::new(SSDI_URL, transport, clock());

    let verdict = source.probe(&query()).await;
    assert!(!verdict.is_verified);
    assert!(verdict.error.is_none());
}

#[tokio::test]
async fn ssdi_deceased_without_date_is_invalid_response() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(SSDI_URL, json!({"deceased": true}));
    let source = SsdiSource::new(SSDI_URL, transport, clock());

    let verdict = source.probe(&query()).await;
    assert!(!verdict.is_verified);
    assert!(verdict.error.unwrap().contains("invalid response"));
}

#[tokio::test]
async fn transport_failure_is_absorbed_into_verdict() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_unreachable(SSDI_URL, "connection refused");
    let source = SsdiSource::new(SSDI_URL, transport, clock());

    let verdict = source.probe(&query()).await;
    assert!(!verdict.is_verified);
    assert_eq!(verdict.confidence, ConfidenceTier::Low);
    assert!(verdict.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn registry_match_uses_country_endpoint() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(
        US_REGISTRY,
        json!({"deceased": true, "date_of_death": "2024-03-14", "certificate_id": "CERT-7"}),
    );
    let source = GovernmentRegistrySource::new(registries(), transport.clone(), clock());

    let verdict = source.probe(&query()).await;

    assert!(verdict.is_verified);
    assert_eq!(verdict.source_name, "GovernmentRegistry");
    assert_eq!(verdict.confidence, ConfidenceTier::High);
    assert_eq!(verdict.data.unwrap().verification_id(), "CERT-7");
    assert_eq!(transport.requests()[0].url, "http://registry-us.test/deaths");
    assert_eq!(transport.requests()[0].param("full_name"), Some("John Q Doe"));
}

#[tokio::test]
async fn unmapped_country_makes_no_request() {
    let transport = Arc::new(NullTransport::new());
    let source = GovernmentRegistrySource::new(registries(), transport.clone(), clock());

    let verdict = source
        .probe(&VerificationQuery::new("John Doe", "1950-01-01", "ZZ"))
        .await;

    assert!(!verdict.is_verified);
    assert_eq!(verdict.confidence, ConfidenceTier::Low);
    assert_eq!(
        verdict.error.as_deref(),
        Some("no government registry configured for country ZZ")
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn news_match_is_medium_tier() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(
        NEWS_URL,
        json!({"results": [
            {"name": "Johnny Doe", "date_of_death": "2024-01-01"},
            {
                "name": "john q doe",
                "date_of_death": "2024-03-15",
                "location": "Springfield",
                "id": "OBIT-3"
            }
        ]}),
    );
    let source = NewsObituarySource::new(NEWS_URL, transport.clone(), clock());

    let verdict = source
        .probe(&query().with_claimed_date_of_death("2024-03-10"))
        .await;

    assert!(verdict.is_verified);
    assert_eq!(verdict.source_name, "News");
    assert_eq!(verdict.confidence, ConfidenceTier::Medium);
    let record = verdict.data.unwrap();
    assert_eq!(record.verification_id(), "OBIT-3");
    assert_eq!(record.location(), Some("Springfield"));

    let request = &transport.requests()[0];
    assert_eq!(request.param("from"), Some("2024-02-09"));
    assert_eq!(request.param("to"), Some("2024-04-09"));
}

#[tokio::test]
async fn news_without_matching_name_is_not_found() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(NEWS_URL, json!({"results": [{"name": "Someone Else"}]}));
    let source = NewsObituarySource::new(NEWS_URL, transport, clock());

    let verdict = source.probe(&query()).await;
    assert!(!verdict.is_verified);
    assert!(verdict.error.is_none());
}

#[tokio::test]
async fn news_matches_accented_names_regardless_of_case_and_spacing() {
    let transport = Arc::new(NullTransport::new());
    transport.respond_json(
        NEWS_URL,
        json!({"results": [{"name": "JOSÉ   GARCÍA", "date_of_death": "2023-11-02"}]}),
    );
    let source = NewsObituarySource::new(NEWS_URL, transport, clock());

    let verdict = source
        .probe(&VerificationQuery::new("José García", "1938-06-12", "ES"))
        .await;

    assert!(verdict.is_verified);
    assert_eq!(verdict.data.unwrap().date_of_death(), "2023-11-02");
}

#[tokio::test]
async fn default_sources_are_in_priority_order() {
    let sources = default_sources(
        &SourceEndpoints::default(),
        Arc::new(NullTransport::new()),
        clock(),
    );
    let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["SSDI", "GovernmentRegistry", "News"]);
}
