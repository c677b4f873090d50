// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Value};

use crate::modules::common::params::ActionParams;
use crate::modules::error::code::ErrorCode;
use crate::modules::list_entry::{ListEntry, ListOperation, ListType, ViewBy};

use super::quarantine::Mutation;
use super::*;

fn spam_message(mid: u64, subject: &str) -> Value {
    json!({
        "mid": mid,
        "attributes": {
            "envelopeRecipient": ["user@example.com"],
            "subject": subject,
            "received": "08 Jan 2024 10:00 (GMT)",
            "size": "12.3K"
        }
    })
}

#[test]
fn spam_search_scenario() {
    let raw = json!({
        "meta": {"totalCount": 3},
        "data": [spam_message(1, "a"), spam_message(2, "b"), spam_message(3, "c")]
    });
    let result = quarantine::search(&raw).unwrap();
    assert_eq!(result.summary["total_messages"], json!(3));
    assert_eq!(result.summary["messages_returned"], json!(3));
    assert_eq!(result.data.len(), 3);
    for record in &result.data {
        assert!(record.contains_key("mid"));
        assert!(record.contains_key("attributes.subject"));
        assert_eq!(record["attributes.envelopeRecipient"], json!(["user@example.com"]));
        assert!(!record.contains_key("attributes"));
    }
}

#[test]
fn merged_quarantine_tags_are_preserved() {
    let raw = json!({
        "meta": {"totalCount": 2},
        "data": [
            {"mid": 10, "attributes": {
                "inQuarantines": "Policy, Virus",
                "quarantineDetails": [
                    {"reason": "content filter", "quarantineName": "Policy"},
                    {"reason": "virus", "quarantineName": "Virus"}
                ]
            }},
            {"mid": 11, "attributes": {"inQuarantines": ["Virus"]}}
        ]
    });
    let result = quarantine::search(&raw).unwrap();
    assert_eq!(result.data[0]["attributes.inQuarantines"], json!("Policy, Virus"));
    assert_eq!(
        result.data[0]["attributes.quarantineDetails"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(result.data[1]["attributes.inQuarantines"], json!(["Virus"]));
}

#[test]
fn returned_always_matches_record_count() {
    let payloads = [
        json!({}),
        json!({"data": null}),
        json!({"data": []}),
        json!({"data": {"mid": 1}}),
        json!({"data": [{"mid": 1}, 7, "junk", null, {"mid": 2}], "meta": {"totalCount": "40"}}),
        json!({"data": [{"mid": 1}, {"mid": 2}], "meta": {"totalCount": 1}}),
    ];
    for raw in payloads {
        for result in [
            quarantine::search(&raw).unwrap(),
            tracking::search(&raw).unwrap(),
            list::search(&raw, ListType::Safelist, ViewBy::Recipient).unwrap(),
        ] {
            let returned = result
                .summary
                .iter()
                .find(|(k, _)| k.ends_with("_returned"))
                .and_then(|(_, v)| v.as_u64());
            assert_eq!(returned, Some(result.data.len() as u64), "{raw}");
            let total = result
                .summary
                .iter()
                .find(|(k, _)| k.starts_with("total_"))
                .and_then(|(_, v)| v.as_u64());
            assert!(total >= returned, "{raw}");
        }
    }
}

#[test]
fn counters_without_or_with_odd_totals() {
    let result = quarantine::search(&json!({"data": [{"mid": 1}, {"mid": 2}]})).unwrap();
    assert_eq!(result.summary["total_messages"], json!(2));

    let result = quarantine::search(&json!({"data": [{"mid": 1}, 3], "meta": {"totalCount": "40"}}))
        .unwrap();
    assert_eq!(result.summary["total_messages"], json!(40));
    assert_eq!(result.summary["messages_returned"], json!(1));
    assert_eq!(result.skipped, 1);

    let result = quarantine::search(&json!({"data": [{"mid": 1}, {"mid": 2}], "meta": {"totalCount": 1}}))
        .unwrap();
    assert_eq!(result.summary["total_messages"], json!(2));
}

#[test]
fn zero_matches_is_an_empty_success() {
    let result = quarantine::search(&json!({"data": [], "meta": {"totalCount": 0}})).unwrap();
    assert!(result.data.is_empty());
    assert_eq!(result.summary["total_messages"], json!(0));
    assert_eq!(result.summary["messages_returned"], json!(0));
}

#[test]
fn scalar_data_is_unexpected() {
    let err = quarantine::search(&json!({"data": "oops"})).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedResponse);
}

#[test]
fn detail_is_kept_whole() {
    let raw = json!({"data": {
        "mid": 5,
        "attributes": {
            "subject": "Quarterly report",
            "headers": {"from": "a@x.com"},
            "messagePartDetails": [{"attachmentId": 2, "attachmentName": "q.pdf"}]
        },
        "quarantineDetails": [{"quarantineName": "Policy", "received": "..."}]
    }});
    let result = quarantine::details(&raw).unwrap();
    assert_eq!(result.data.len(), 1);
    assert_eq!(Value::Object(result.data[0].clone()), raw["data"]);
    assert_eq!(result.summary["subject"], json!("Quarterly report"));

    let err = quarantine::details(&json!({"data": []})).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedResponse);
}

#[test]
fn release_and_delete_outcomes() {
    let result = quarantine::mutation(
        &json!({"data": {"action": "release", "totalCount": 2}}),
        Mutation::Release,
    )
    .unwrap();
    assert_eq!(result.data[0]["totalCount"], json!(2));
    assert_eq!(result.summary["total_released"], json!(2));
    assert_eq!(result.summary["action"], json!("release"));

    let result = quarantine::mutation(&json!({"data": {"totalCount": 0}}), Mutation::Delete).unwrap();
    assert_eq!(result.data[0]["totalCount"], json!(0));
    assert_eq!(result.data[0]["action"], json!("delete"));
    assert_eq!(result.summary["total_deleted"], json!(0));

    let result = quarantine::mutation(&json!({}), Mutation::Delete).unwrap();
    assert_eq!(result.summary["total_deleted"], json!(0));
}

#[test]
fn tracking_bad_records_are_verbatim() {
    let raw = json!({
        "meta": {"totalCount": 12, "num_bad_records": 4},
        "data": [{"attributes": {"mid": [1], "subject": "x"}}]
    });
    let result = tracking::search(&raw).unwrap();
    assert_eq!(result.summary["bad_records"], json!(4));
    assert_eq!(result.summary["total_messages"], json!(12));
    assert_eq!(result.summary["messages_returned"], json!(1));
    assert_eq!(result.data[0]["attributes.mid"], json!([1]));

    let result = tracking::search(&json!({"data": []})).unwrap();
    assert_eq!(result.summary["bad_records"], json!(0));
}

#[test]
fn tracking_details_summary() {
    let raw = json!({"data": {"messages": {
        "subject": "hello",
        "messageStatus": {"1": "Delivered"},
        "direction": "incoming",
        "summary": [{"description": "Message 1 received"}]
    }}});
    let result = tracking::details(&raw).unwrap();
    assert_eq!(result.summary["subject"], json!("hello"));
    assert_eq!(result.summary["status"], json!({"1": "Delivered"}));
    assert_eq!(result.summary["direction"], json!("incoming"));
    assert!(result.data[0].contains_key("summary"));
}

#[test]
fn list_search_summary() {
    let raw = json!({
        "meta": {"totalCount": 5},
        "data": [{"recipientAddress": "r@y.com", "senderList": ["a.com", "b.com"]}]
    });
    let result = list::search(&raw, ListType::Blocklist, ViewBy::Recipient).unwrap();
    assert_eq!(result.summary["total_entries"], json!(5));
    assert_eq!(result.summary["entries_returned"], json!(1));
    assert_eq!(result.summary["list_type"], json!("blocklist"));
    assert_eq!(result.summary["view_by"], json!("recipient"));
    assert_eq!(result.data[0]["senderList"], json!(["a.com", "b.com"]));
}

#[test]
fn list_entry_outcomes() {
    let params = ActionParams::from_value(json!({
        "list_type": "blocklist",
        "view_by": "sender",
        "sender_addresses": "a@x.com, b@x.com",
        "recipient_list": "c@y.com"
    }))
    .unwrap();
    let entry = ListEntry::from_params(&params, ListOperation::Add).unwrap();
    let result = list::entry(&json!({"data": {}}), &entry).unwrap();
    assert_eq!(result.data[0]["senderAddresses"], json!(["a@x.com", "b@x.com"]));
    assert_eq!(result.summary["list_type"], json!("blocklist"));
    assert_eq!(result.summary["view_by"], json!("sender"));
    assert_eq!(result.summary["status"], json!("success"));
    assert!(!result.summary.contains_key("total_deleted"));

    let params =
        ActionParams::from_value(json!({"view_by": "sender", "sender_list": "a@x.com"})).unwrap();
    let entry = ListEntry::from_params(&params, ListOperation::Delete).unwrap();
    let result = list::entry(&json!({"data": {"totalCount": 1}}), &entry).unwrap();
    assert_eq!(result.summary["total_deleted"], json!(1));
}

#[test]
fn statistics_rows() {
    let raw = json!({"data": {"type": "mail_incoming_traffic_summary", "resultSet": [
        {"ip_address": "10.0.0.1", "counts": {"total": 5, "blocked": 1}},
        {"ip_address": "10.0.0.2", "counts": {"total": 3, "blocked": 0}}
    ]}});
    let result = report::statistics(&raw, "mail_incoming_traffic_summary").unwrap();
    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0]["counts.total"], json!(5));
    assert_eq!(result.summary["report_type"], json!("mail_incoming_traffic_summary"));
    assert_eq!(result.summary["total_records"], json!(2));
    assert_eq!(result.summary["records_returned"], json!(2));

    let single = json!({"data": {"resultSet": {"total_messages": 100}}});
    let result = report::statistics(&single, "mail_summary").unwrap();
    assert_eq!(result.data.len(), 1);

    let empty = report::statistics(&json!({"data": {}}), "mail_summary").unwrap();
    assert!(empty.data.is_empty());
    assert_eq!(empty.summary["records_returned"], json!(0));
}

#[test]
fn flatten_keeps_arrays_and_empty_objects() {
    let object = json!({"a": {"b": {"c": 1}, "d": [ {"e": 2} ], "f": {}}, "g": null});
    let record = flatten(object.as_object().unwrap());
    assert_eq!(record["a.b.c"], json!(1));
    assert_eq!(record["a.d"], json!([{"e": 2}]));
    assert_eq!(record["a.f"], json!({}));
    assert_eq!(record["g"], Value::Null);
}
