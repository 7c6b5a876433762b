//! End-to-end engine scenarios: JSON commands in, frames out.
//!
//! These tests drive the engine exactly the way a dispatcher does — decoding
//! wire-format JSON into commands and collecting the outbound frames — so
//! they exercise the protocol surface and the handlers together.

use serde_json::Value;

use remdom_core::protocol::commands::DomCommand;
use remdom_core::protocol::events::{EventDetail, HostEvent};
use remdom_core::protocol::outbound::OutboundFrame;
use remdom_engine::infrastructure::FrameChannel;
use remdom_engine::{DomEngine, RecordingChannel, Rect};

fn open_engine() -> DomEngine {
    let mut engine = DomEngine::new();
    engine.open();
    engine
}

fn send(engine: &mut DomEngine, sink: &mut RecordingChannel, json: &str) {
    let command: DomCommand = serde_json::from_str(json).expect("valid command JSON");
    engine.handle(command, sink);
}

#[test]
fn test_login_form_scenario_builds_interacts_and_tears_down() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    // Controller builds a login form under body in one nested create.
    send(
        &mut engine,
        &mut sink,
        r#"{
            "type": "create-dom",
            "element": "form",
            "attributes": {"id": "login"},
            "children": [
                {"element": "input",
                 "attributes": {"id": "user", "value": "admin"},
                 "listenEvents": ["input"]},
                {"element": "button",
                 "attributes": {"id": "submit"},
                 "textContent": "Sign in",
                 "listenEvents": ["click"]}
            ]
        }"#,
    );
    assert!(sink.frames.is_empty(), "mutations are fire-and-forget");

    // Host lays the button out; the controller inspects it.
    assert!(engine.set_geometry("submit", Rect::new(10.0, 20.0, 100.0, 30.0)));
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"get-bounding-rect","id":"submit","replyId":"q1"}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"read-props","id":"submit","props":["tagName","textContent"],"replyId":"q2"}"#,
    );

    let replies = sink.replies();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].reply_id, "q1");
    let rect: Value = serde_json::from_str(&replies[0].data).unwrap();
    assert_eq!(rect["width"], 100.0);
    assert_eq!(replies[1].reply_id, "q2");
    let props: Vec<Value> = serde_json::from_str(&replies[1].data).unwrap();
    assert_eq!(props, vec![Value::from("BUTTON"), Value::from("Sign in")]);

    // A user types into the field and clicks submit.
    let typing = HostEvent::new("input", EventDetail::TextInput);
    engine.deliver_event("user", &typing, &mut sink);
    let click = HostEvent::new("click", EventDetail::Pointer { x: 60.0, y: 35.0 });
    engine.deliver_event("submit", &click, &mut sink);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].0, "dispatch:input");
    assert_eq!(events[0].1, "admin");
    assert_eq!(events[1].0, "dispatch:click");
    let point: Value = serde_json::from_str(events[1].1).unwrap();
    assert_eq!(point["x"], 60.0);

    // Removing the form takes the whole subtree with it.
    send(&mut engine, &mut sink, r#"{"type":"remove-dom","id":"login"}"#);
    assert!(engine.resolve_id("login").is_none());
    assert!(engine.resolve_id("user").is_none());
    assert!(engine.resolve_id("submit").is_none());
    assert!(sink.errors().is_empty());
}

#[test]
fn test_errors_are_reported_and_processing_continues() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"div","attributes":{"id":"a"}}"#,
    );
    // Three failures in a row, each a different taxonomy entry.
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"span","attributes":{"id":"a"}}"#,
    );
    send(&mut engine, &mut sink, r#"{"type":"remove-dom","id":"ghost"}"#);
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"invoke-method","id":"a","methodName":"submit","replyId":"r1"}"#,
    );

    assert_eq!(
        sink.errors(),
        vec![
            "duplicate element id: a",
            "node not found: ghost",
            "method not found: submit on <div>",
        ]
    );
    assert!(sink.replies().is_empty());

    // The engine is still fully operational after every failure.
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"read-props","id":"a","props":["tagName"],"replyId":"r2"}"#,
    );
    assert_eq!(sink.replies().len(), 1);
    assert_eq!(sink.replies()[0].reply_id, "r2");
}

#[test]
fn test_reply_ids_correlate_interleaved_queries() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"input","attributes":{"id":"a","value":"one"}}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"input","attributes":{"id":"b","value":"two"}}"#,
    );

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"read-props","id":"a","props":["value"],"replyId":"alpha"}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"invoke-method","id":"b","methodName":"getAttribute","args":["value"],"replyId":"beta"}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"read-props","id":"b","props":["value"],"replyId":"gamma"}"#,
    );

    let replies = sink.replies();
    let by_id: Vec<(&str, &str)> = replies
        .iter()
        .map(|r| (r.reply_id.as_str(), r.data.as_str()))
        .collect();
    assert_eq!(
        by_id,
        vec![
            ("alpha", r#"["one"]"#),
            ("beta", r#""two""#),
            ("gamma", r#"["two"]"#),
        ]
    );
}

#[test]
fn test_update_moves_subtree_between_containers() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"div","attributes":{"id":"left"}}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"div","attributes":{"id":"right"}}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"p","attributes":{"id":"item"},"parent":"left","textContent":"movable"}"#,
    );

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"update-dom","id":"item","parent":"right","attributes":{"class":"moved"}}"#,
    );

    let item = engine.resolve_id("item").unwrap();
    let right = engine.resolve_id("right").unwrap();
    let doc = engine.document();
    assert_eq!(doc.node(item).unwrap().parent(), Some(right));
    assert_eq!(doc.node(item).unwrap().attribute("class"), Some("moved"));
    assert_eq!(doc.node(item).unwrap().text(), "movable");

    // The old container no longer lists it.
    let left = engine.resolve_id("left").unwrap();
    assert!(doc.node(left).unwrap().children().is_empty());
}

#[test]
fn test_recreated_id_is_addressable_after_subtree_removal() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"ul","attributes":{"id":"list"},
            "children":[{"element":"li","attributes":{"id":"row"}}]}"#,
    );
    send(&mut engine, &mut sink, r#"{"type":"remove-dom","id":"list"}"#);

    // Same ids, brand new nodes: registers cleanly, no duplicate report.
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"ul","attributes":{"id":"list"},
            "children":[{"element":"li","attributes":{"id":"row"}}]}"#,
    );
    assert!(sink.errors().is_empty());
    assert!(engine.resolve_id("list").is_some());
    assert!(engine.resolve_id("row").is_some());
}

#[test]
fn test_focus_tracking_across_focus_blur_and_removal() {
    let mut engine = open_engine();
    let mut sink = RecordingChannel::new();

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"create-dom","element":"input","attributes":{"id":"a"}}"#,
    );
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"invoke-method","id":"a","methodName":"focus","replyId":"r1"}"#,
    );
    assert_eq!(engine.focused(), engine.resolve_id("a"));

    send(
        &mut engine,
        &mut sink,
        r#"{"type":"invoke-method","id":"a","methodName":"blur","replyId":"r2"}"#,
    );
    assert_eq!(engine.focused(), None);

    // Removing a focused node clears focus too.
    send(
        &mut engine,
        &mut sink,
        r#"{"type":"invoke-method","id":"a","methodName":"focus","replyId":"r3"}"#,
    );
    send(&mut engine, &mut sink, r#"{"type":"remove-dom","id":"a"}"#);
    assert_eq!(engine.focused(), None);
}

#[tokio::test]
async fn test_frame_channel_carries_engine_output_to_writer_side() {
    let mut engine = open_engine();
    let (mut channel, mut rx) = FrameChannel::new();

    let command: DomCommand = serde_json::from_str(
        r#"{"type":"create-dom","element":"div","attributes":{"id":"a"},"listenEvents":["scroll"]}"#,
    )
    .unwrap();
    engine.handle(command, &mut channel);

    let query: DomCommand =
        serde_json::from_str(r#"{"type":"read-props","id":"a","props":["tagName"],"replyId":"r1"}"#)
            .unwrap();
    engine.handle(query, &mut channel);

    let scroll = HostEvent::new("scroll", EventDetail::Other);
    engine.deliver_event("a", &scroll, &mut channel);

    let first = rx.recv().await.unwrap();
    match first {
        OutboundFrame::Reply(reply) => {
            assert_eq!(reply.reply_id, "r1");
            assert_eq!(reply.data, r#"["DIV"]"#);
        }
        other => panic!("expected reply frame, got {other:?}"),
    }

    let second = rx.recv().await.unwrap();
    match second {
        OutboundFrame::Event { subject, data } => {
            assert_eq!(subject, "dispatch:scroll");
            assert_eq!(data, "");
        }
        other => panic!("expected event frame, got {other:?}"),
    }
}
