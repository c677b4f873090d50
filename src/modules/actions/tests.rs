// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use http::Method;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::modules::client::fake::FakeTransport;
use crate::modules::error::code::ErrorCode;
use crate::modules::vault::DiskVault;

use super::{Action, Bridge};

fn harness(transport: FakeTransport) -> (Bridge<FakeTransport, DiskVault>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let vault = DiskVault::new(dir.path());
    (Bridge::new(transport, vault, 1024), dir)
}

fn window() -> Value {
    json!({"start_date": "2024-01-01T00:00:00", "end_date": "2024-01-02T00:00:00"})
}

#[tokio::test]
async fn spam_search_end_to_end() {
    let transport = FakeTransport::replying(json!({
        "meta": {"totalCount": 3},
        "data": [
            {"mid": 1, "attributes": {"subject": "a"}},
            {"mid": 2, "attributes": {"subject": "b"}},
            {"mid": 3, "attributes": {"subject": "c"}}
        ]
    }));
    let (bridge, _dir) = harness(transport);
    let mut params = window();
    params["limit"] = json!(50);

    let outcome = bridge
        .dispatch(Action::SearchSpamQuarantine, params)
        .await
        .unwrap();
    assert_eq!(outcome.action, "search-spam-quarantine");
    assert_eq!(outcome.status, "success");
    assert_eq!(outcome.data.len(), 3);
    assert_eq!(outcome.summary["total_messages"], json!(3));
    assert_eq!(outcome.summary["messages_returned"], json!(3));
    assert_eq!(outcome.data[0]["attributes.subject"], json!("a"));

    let sent = bridge.transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query_value("quarantineType"), Some("spam"));
    assert_eq!(sent[0].query_value("limit"), Some("50"));
}

#[tokio::test]
async fn validation_errors_never_reach_the_appliance() {
    let cases = [
        (Action::SearchSpamQuarantine, json!({"start_date": "2024-01-01"}), ErrorCode::MissingParameter),
        (Action::SearchQuarantine, window(), ErrorCode::MissingParameter),
        (
            Action::SearchSpamQuarantine,
            json!({"start_date": "03/04/2024", "end_date": "2024-01-02"}),
            ErrorCode::InvalidDate,
        ),
        (
            Action::SearchSpamQuarantine,
            json!({
                "start_date": "2024-01-01",
                "end_date": "2024-01-02",
                "filter_operator": "contains"
            }),
            ErrorCode::IncompleteFilter,
        ),
        (Action::GetSpamMessage, json!({}), ErrorCode::MissingParameter),
        (Action::ReleaseSpamMessage, json!({"message_id": "abc"}), ErrorCode::InvalidParameter),
        (
            Action::AddListEntry,
            json!({"view_by": "recipient"}),
            ErrorCode::IncompleteListEntry,
        ),
        (
            Action::AddListEntry,
            json!({"recipient_list": "a@y.com", "recipient_addresses": "r@y.com", "sender_list": "bad.com"}),
            ErrorCode::AmbiguousListEntry,
        ),
        (Action::DownloadAttachment, json!({"message_id": 8}), ErrorCode::MissingParameter),
        (Action::GetStatisticsReport, window(), ErrorCode::MissingParameter),
        (Action::SearchList, json!("not an object"), ErrorCode::InvalidParameter),
    ];
    for (action, params, code) in cases {
        let (bridge, _dir) = harness(FakeTransport::default());
        let err = bridge.dispatch(action, params).await.unwrap_err();
        assert_eq!(err.code(), code, "{action}");
        assert!(bridge.transport.requests().is_empty(), "{action}");
    }
}

#[tokio::test]
async fn general_search_names_the_quarantines() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({"data": []})));
    let mut params = window();
    params["quarantines"] = json!("Policy, Virus");
    let outcome = bridge.dispatch(Action::SearchQuarantine, params).await.unwrap();
    assert!(outcome.data.is_empty());
    assert_eq!(outcome.summary["total_messages"], json!(0));
    assert!(outcome.message.ends_with("Policy,Virus"));
}

#[tokio::test]
async fn message_details_carry_subject() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({
        "data": {"mid": 1234, "attributes": {"subject": "Invoice", "headers": {"from": "x"}}}
    })));
    let outcome = bridge
        .dispatch(Action::GetSpamMessage, json!({"message_id": 1234}))
        .await
        .unwrap();
    assert_eq!(outcome.summary["subject"], json!("Invoice"));
    assert_eq!(outcome.data[0]["attributes"]["headers"]["from"], json!("x"));

    let sent = bridge.transport.requests();
    assert_eq!(sent[0].query_value("mid"), Some("1234"));
}

#[tokio::test]
async fn release_and_delete_report_affected_counts() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({
        "data": {"action": "release", "totalCount": 2}
    })));
    let outcome = bridge
        .dispatch(Action::ReleaseSpamMessage, json!({"message_id": "10,11"}))
        .await
        .unwrap();
    assert_eq!(outcome.summary["total_released"], json!(2));
    assert_eq!(outcome.message, "Successfully released 2 message(s)");
    assert_eq!(bridge.transport.requests()[0].method, Method::POST);

    let (bridge, _dir) = harness(FakeTransport::replying(json!({"data": {"totalCount": 0}})));
    let outcome = bridge
        .dispatch(
            Action::DeleteQuarantineMessage,
            json!({"message_id": "10", "quarantine_name": "Policy"}),
        )
        .await
        .unwrap();
    assert_eq!(outcome.action, "delete-quarantine-message");
    assert_eq!(outcome.summary["total_deleted"], json!(0));
    assert_eq!(outcome.summary["action"], json!("delete"));
    assert_eq!(bridge.transport.requests()[0].method, Method::DELETE);
}

#[tokio::test]
async fn tracking_search_counts_bad_records() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({
        "data": [{"attributes": {"mid": [1], "subject": "s"}}],
        "meta": {"num_bad_records": 2, "totalCount": 1}
    })));
    let outcome = bridge
        .dispatch(Action::SearchTrackingMessages, window())
        .await
        .unwrap();
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(outcome.summary["bad_records"], json!(2));
    assert_eq!(
        bridge.transport.requests()[0].query_value("ciscoHost"),
        Some("All_Hosts")
    );
}

#[tokio::test]
async fn list_entry_round_trip() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({"data": {}})));
    let outcome = bridge
        .dispatch(
            Action::AddListEntry,
            json!({
                "view_by": "recipient",
                "recipient_addresses": "r@y.com",
                "sender_list": "a.com, b.com"
            }),
        )
        .await
        .unwrap();
    assert_eq!(outcome.action, "add-list-entry");
    assert_eq!(outcome.summary["list_type"], json!("safelist"));
    assert_eq!(outcome.summary["status"], json!("success"));
    let body = bridge.transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["action"], json!("add"));
    assert_eq!(body["viewBy"], json!("recipient"));
    assert_eq!(body["senderList"], json!(["a.com", "b.com"]));
    assert_eq!(outcome.data[0]["recipientAddresses"], json!(["r@y.com"]));
}

#[tokio::test]
async fn list_delete_reports_total_deleted() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({"data": {"totalCount": 1}})));
    let outcome = bridge
        .dispatch(
            Action::DeleteListEntry,
            json!({"list_type": "blocklist", "view_by": "sender", "sender_list": "x.com"}),
        )
        .await
        .unwrap();
    assert_eq!(outcome.summary["total_deleted"], json!(1));
    assert_eq!(outcome.summary["list_type"], json!("blocklist"));
    assert_eq!(bridge.transport.requests()[0].method, Method::DELETE);
}

#[tokio::test]
async fn search_list_reports_entries() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({
        "data": [{"recipientAddress": "a@y.com", "senderList": ["x.com"]}],
        "meta": {"totalCount": 1}
    })));
    let outcome = bridge.dispatch(Action::SearchList, json!({})).await.unwrap();
    assert_eq!(outcome.summary["entries_returned"], json!(1));
    assert_eq!(outcome.summary["view_by"], json!("recipient"));
    assert_eq!(outcome.data[0]["senderList"], json!(["x.com"]));
}

#[tokio::test]
async fn statistics_report_reads_result_set() {
    let (bridge, _dir) = harness(FakeTransport::replying(json!({
        "data": {"resultSet": [{"mail_incoming_traffic_summary": {"total": 4}}]}
    })));
    let mut params = window();
    params["report_type"] = json!("mail_incoming_traffic_summary");
    let outcome = bridge
        .dispatch(Action::GetStatisticsReport, params)
        .await
        .unwrap();
    assert_eq!(outcome.summary["report_type"], json!("mail_incoming_traffic_summary"));
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(
        bridge.transport.requests()[0].full_path(),
        "/sma/api/v2.0/reporting/mail_incoming_traffic_summary"
    );
}

#[tokio::test]
async fn download_attachment_stores_in_vault() {
    let transport = FakeTransport::serving(None, None, &[b"%PDF", b"-1.7"]);
    let (bridge, _dir) = harness(transport);
    let outcome = bridge
        .dispatch(
            Action::DownloadAttachment,
            json!({"message_id": 8, "attachment_id": "3"}),
        )
        .await
        .unwrap();
    assert_eq!(outcome.summary["file_name"], json!("attachment-8-3"));
    assert_eq!(outcome.summary["size"], json!(8));
    let vault_id = outcome.summary["vault_id"].as_str().unwrap().to_string();
    assert_eq!(bridge.store.read(&vault_id).await.unwrap(), b"%PDF-1.7");
    assert_eq!(outcome.data[0]["message_id"], json!("8"));
    assert_eq!(outcome.data[0]["attachment_id"], json!("3"));
}

#[tokio::test]
async fn appliance_errors_pass_through() {
    let (bridge, _dir) = harness(FakeTransport::failing(
        ErrorCode::NotFound,
        "Appliance returned 404: Message not found",
    ));
    let err = bridge
        .dispatch(Action::GetSpamMessage, json!({"message_id": 99}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.message().contains("Message not found"));
}

#[tokio::test]
async fn connectivity_check_logs_in() {
    let (bridge, _dir) = harness(FakeTransport::default());
    let outcome = bridge.test_connectivity().await.unwrap();
    assert_eq!(outcome.message, "Test Connectivity Passed");
    assert_eq!(bridge.transport.logins(), 1);

    let (bridge, _dir) = harness(FakeTransport::rejecting_login(
        ErrorCode::AuthenticationFailed,
        "Appliance returned 401: bad credentials",
    ));
    let err = bridge.test_connectivity().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthenticationFailed);
}
