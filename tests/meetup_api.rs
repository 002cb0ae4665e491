//! Runs the HTTP side of the audit against a mock Meetup API.
//!
//! The crate uses a blocking client, so the tokio runtime here only starts and
//! programs the mock server. wiremock serves requests from its own thread.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use meetup_union::{
    attendees::fetch_attendee_ids,
    groups::{fetch_member_group_urlnames, GroupDirectory},
    membership::Membership,
    run_union_audit, Bootstrap, MeetupError, Pacing,
};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bootstrap_for(server: &MockServer) -> Bootstrap {
    Bootstrap::from_api_key(Some("secret".to_string()))
        .unwrap()
        .with_api_root(server.uri())
}

fn mount_groups(rt: &Runtime, server: &MockServer, member_id: &str, urlnames: &[&str]) {
    let results: Vec<_> = urlnames.iter().map(|u| json!({ "urlname": u })).collect();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/2/groups"))
            .and(query_param("member_id", member_id))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "results": results, "meta": {} })),
            )
            .mount(server),
    );
}

#[test]
fn attendees_come_back_in_source_order() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/pydata/events/42/attendance"))
            .and(query_param("sign", "true"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "member": { "id": 10, "name": "Ada" }, "rsvp": { "response": "yes" } },
                { "member": { "id": 20, "name": "Grace" }, "rsvp": { "response": "no" } },
            ])))
            .mount(&server),
    );

    let ids = fetch_attendee_ids(&bootstrap_for(&server), "pydata", 42).unwrap();

    assert_eq!(ids, vec![10, 20]);
}

#[test]
fn attendance_error_status_is_reported() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/pydata/events/42/attendance"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server),
    );

    let result = fetch_attendee_ids(&bootstrap_for(&server), "pydata", 42);

    assert_matches!(
        result,
        Err(MeetupError::Api { status: 401, ref message }) if message == "invalid key"
    );
}

#[test]
fn blank_group_page_is_retried_once() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/2/groups"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .mount(&server),
    );
    mount_groups(&rt, &server, "7", &["pydata", "pyladies"]);

    let urlnames =
        fetch_member_group_urlnames(&bootstrap_for(&server), 7, Duration::ZERO).unwrap();

    assert_eq!(urlnames, vec!["pydata", "pyladies"]);
    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 2);
}

#[test]
fn member_is_skipped_after_two_blank_pages() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/2/groups"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server),
    );

    let bootstrap = bootstrap_for(&server);
    assert_matches!(bootstrap.groups_for_member(7), Err(MeetupError::Decode(_)));

    let urlnames = fetch_member_group_urlnames(&bootstrap, 7, Duration::ZERO).unwrap();

    assert!(urlnames.is_empty());
}

#[test]
fn full_run_classifies_every_attendee() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/own/events/1/attendance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "member": { "id": 1 } },
                { "member": { "id": 2 } },
                { "member": { "id": 3 } },
                { "member": { "id": 4 } },
            ])))
            .mount(&server),
    );
    mount_groups(&rt, &server, "1", &["own"]);
    mount_groups(&rt, &server, "2", &["target", "chess"]);
    mount_groups(&rt, &server, "3", &["own", "target"]);
    mount_groups(&rt, &server, "4", &[]);

    let states = run_union_audit(
        &bootstrap_for(&server),
        "own",
        "target",
        1,
        Pacing::immediate(),
    )
    .unwrap();

    assert_eq!(
        states,
        vec![
            Some(Membership::OwnOnly),
            Some(Membership::TargetOnly),
            Some(Membership::Both),
            None,
        ]
    );
}
