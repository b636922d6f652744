//! 会话集成测试
//!
//! 使用 MockLink 验证收发顺序、中断降落和 socket 释放。

use std::cell::RefCell;
use std::rc::Rc;
use tello_driver::{
    Acknowledgement, CancelToken, Command, CommandSource, ExitReason, FlightPlan, LineSource,
    ScriptedSource, Session, SessionError, SessionObserver, SessionState, ShutdownReport,
    SourceError,
};
use tello_link::{LinkError, LinkEvent, MockLink, MockLinkHandle, MockResponse};
use tello_protocol::{ACK_BUFFER_SIZE, FLIGHT_PATTERN};

fn mock_session() -> (Session<MockLink>, MockLinkHandle) {
    let (link, handle) = MockLink::new();
    (Session::with_link(link, ACK_BUFFER_SIZE), handle)
}

/// 模拟交互式输入在第 `after` 次取命令时被 Ctrl+C 打断
struct InterruptingSource {
    inner: ScriptedSource,
    after: usize,
    calls: usize,
    cancel: CancelToken,
}

impl CommandSource for InterruptingSource {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        self.calls += 1;
        if self.calls > self.after {
            self.cancel.cancel();
            return Ok(None);
        }
        self.inner.next_command()
    }
}

/// 检查事件日志中每个发送后紧跟恰好一个接收
fn assert_strict_pairing(events: &[LinkEvent]) {
    let traffic: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, LinkEvent::Sent(_) | LinkEvent::Received(_)))
        .collect();
    for pair in traffic.chunks(2) {
        assert!(matches!(pair[0], LinkEvent::Sent(_)), "expected send, got {:?}", pair[0]);
        if let Some(second) = pair.get(1) {
            assert!(matches!(second, LinkEvent::Received(_)), "expected receive, got {second:?}");
        }
    }
}

#[test]
fn test_handshake_is_first_datagram() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let mut source = ScriptedSource::new(["takeoff", "land"]);
    let outcome = session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Completed);
    assert_eq!(outcome.exchanges, 2);
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff", "land"]);
    assert_eq!(handle.events().first(), Some(&LinkEvent::Sent(b"command".to_vec())));
}

#[test]
fn test_each_send_followed_by_exactly_one_receive() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let mut source = ScriptedSource::new(["takeoff", "cw 90", "flip f", "land"]);
    session.run_loop(&mut source, &cancel).unwrap();

    let events = handle.events();
    assert_strict_pairing(&events);
    assert_eq!(handle.receive_calls(), 5);
    assert_eq!(events.last(), Some(&LinkEvent::Closed));
}

#[test]
fn test_interrupt_after_handshake_lands() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let mut source = InterruptingSource {
        inner: ScriptedSource::default(),
        after: 0,
        calls: 0,
        cancel: cancel.clone(),
    };
    let outcome = session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Interrupted);
    assert_eq!(outcome.exchanges, 0);
    assert_eq!(handle.sent_texts(), vec!["command", "land"]);
    assert_eq!(handle.close_calls(), 1);
    assert_eq!(session.state(), SessionState::Shutdown);
}

#[test]
fn test_land_precedes_release() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let mut source = InterruptingSource {
        inner: ScriptedSource::new(["takeoff"]),
        after: 1,
        calls: 0,
        cancel: cancel.clone(),
    };
    session.run_loop(&mut source, &cancel).unwrap();

    let events = handle.events();
    let n = events.len();
    assert_eq!(events[n - 2], LinkEvent::Sent(b"land".to_vec()));
    assert_eq!(events[n - 1], LinkEvent::Closed);
}

#[test]
fn test_failed_land_still_releases_once() {
    let (mut session, handle) = mock_session();
    handle.fail_send_of(b"land");
    let cancel = CancelToken::new();

    let mut source = InterruptingSource {
        inner: ScriptedSource::new(["takeoff"]),
        after: 1,
        calls: 0,
        cancel: cancel.clone(),
    };
    let outcome = session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Interrupted);
    assert!(handle.events().contains(&LinkEvent::SendFailed(b"land".to_vec())));
    assert_eq!(handle.close_calls(), 1);

    // 再次关闭不会重复发送或释放
    let report = session.shutdown();
    assert_eq!(report, ShutdownReport::default());
    drop(session);
    assert_eq!(handle.close_calls(), 1);
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff"]);
}

#[test]
fn test_cancel_while_waiting_for_ack() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    // 握手正常应答，之后无人机不再回应
    handle.push_reply("ok");
    handle.set_auto_reply(None);
    let token = cancel.clone();
    handle.on_receive(move |call| {
        if call == 5 {
            token.cancel();
        }
    });

    let mut source = FlightPlan::endless();
    let outcome = session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Interrupted);
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff", "land"]);
    assert_eq!(handle.receive_calls(), 5);
    assert_eq!(handle.close_calls(), 1);
}

#[test]
fn test_cancel_during_handshake_lands() {
    let (mut session, handle) = mock_session();
    handle.set_auto_reply(None);
    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = session.run_loop(&mut ScriptedSource::new(["takeoff"]), &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Interrupted);
    assert_eq!(handle.sent_texts(), vec!["command", "land"]);
    assert_eq!(handle.close_calls(), 1);
}

#[test]
fn test_flight_plan_cycles() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let outcome = session.run_loop(&mut FlightPlan::with_cycles(Some(3)), &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Completed);
    assert_eq!(outcome.exchanges, 1 + 3 * FLIGHT_PATTERN.len() as u64);

    let sent = handle.sent_texts();
    assert_eq!(sent[0], "command");
    assert_eq!(sent[1], "takeoff");
    for cycle in sent[2..].chunks(FLIGHT_PATTERN.len()) {
        assert_eq!(cycle, FLIGHT_PATTERN);
    }
    // 正常结束不降落
    assert!(!sent.contains(&"land".to_string()));
    assert_strict_pairing(&handle.events());
    assert_eq!(handle.receive_calls(), sent.len());
}

#[test]
fn test_line_source_session() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let input = "takeoff\n\nleft 100\nexit\nforward 200\n";
    let mut source = LineSource::new(input.as_bytes());
    let outcome = session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(outcome.reason, ExitReason::Completed);
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff", "left 100"]);
}

#[test]
fn test_line_source_sends_padded_input_verbatim() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();

    let input = "  cw 90\t\r\nforward 200  \n   \n";
    let mut source = LineSource::new(input.as_bytes());
    session.run_loop(&mut source, &cancel).unwrap();

    let sent: Vec<Vec<u8>> = handle
        .events()
        .into_iter()
        .filter_map(|e| match e {
            LinkEvent::Sent(bytes) => Some(bytes),
            _ => None,
        })
        .collect();
    assert_eq!(
        sent,
        vec![b"command".to_vec(), b"  cw 90\t".to_vec(), b"forward 200  ".to_vec()]
    );
}

#[test]
fn test_receive_error_releases_without_landing() {
    let (mut session, handle) = mock_session();
    handle.push_reply("ok");
    handle.push_response(MockResponse::Error(std::io::ErrorKind::ConnectionRefused));
    let cancel = CancelToken::new();

    let err = session.run_loop(&mut ScriptedSource::new(["takeoff"]), &cancel).unwrap_err();

    assert!(matches!(err, SessionError::Link(LinkError::Io(_))));
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff"]);
    assert_eq!(handle.close_calls(), 1);
    assert_eq!(session.state(), SessionState::Shutdown);
}

#[test]
fn test_send_error_surfaces_as_transport_error() {
    let (mut session, handle) = mock_session();
    handle.fail_send_of(b"takeoff");
    let cancel = CancelToken::new();

    let err = session.run_loop(&mut ScriptedSource::new(["takeoff"]), &cancel).unwrap_err();

    assert!(matches!(err, SessionError::Link(LinkError::Io(_))));
    assert_eq!(handle.close_calls(), 1);
}

#[test]
fn test_drop_releases_socket() {
    let (mut session, handle) = mock_session();
    let cancel = CancelToken::new();
    session.handshake(&cancel).unwrap();
    session.send_command(&Command::takeoff()).unwrap();

    drop(session);

    assert_eq!(handle.close_calls(), 1);
    // Drop 不降落
    assert_eq!(handle.sent_texts(), vec!["command", "takeoff"]);
}

#[test]
fn test_run_after_shutdown_rejected() {
    let (mut session, _handle) = mock_session();
    let cancel = CancelToken::new();
    session.run_loop(&mut ScriptedSource::default(), &cancel).unwrap();

    let err = session.run_loop(&mut ScriptedSource::default(), &cancel).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidState {
            state: SessionState::Shutdown,
            ..
        }
    ));
}

#[test]
fn test_truncated_ack_is_counted() {
    let (link, handle) = MockLink::new();
    let mut session = Session::with_link(link, 4);
    handle.push_reply("ok");
    handle.push_reply("battery low, please land");
    let cancel = CancelToken::new();

    let outcome = session.run_loop(&mut ScriptedSource::new(["battery?"]), &cancel).unwrap();

    assert_eq!(outcome.stats.truncated_acks, 1);
    assert_eq!(outcome.stats.acks_received, 2);
    assert!(handle.events().contains(&LinkEvent::Received(b"batte".to_vec())));
}

#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
}

struct RecordingObserver(Rc<RefCell<Transcript>>);

impl SessionObserver for RecordingObserver {
    fn on_handshake(&mut self, ack: &Acknowledgement) {
        self.0.borrow_mut().lines.push(format!("handshake {ack}"));
    }

    fn on_command_sent(&mut self, command: &Command) {
        self.0.borrow_mut().lines.push(format!("sent {command}"));
    }

    fn on_ack_received(&mut self, command: &Command, ack: &Acknowledgement) {
        self.0.borrow_mut().lines.push(format!("ack {command} -> {ack}"));
    }

    fn on_shutdown(&mut self, report: &ShutdownReport) {
        self.0.borrow_mut().lines.push(format!("shutdown land={}", report.land_sent));
    }
}

#[test]
fn test_observer_sees_both_directions() {
    let (mut session, handle) = mock_session();
    handle.push_reply("ok");
    handle.push_reply("ok");
    handle.push_reply("error Motor stop");
    let transcript = Rc::new(RefCell::new(Transcript::default()));
    session.set_observer(RecordingObserver(Rc::clone(&transcript)));
    let cancel = CancelToken::new();

    let mut source = InterruptingSource {
        inner: ScriptedSource::new(["takeoff", "flip x"]),
        after: 2,
        calls: 0,
        cancel: cancel.clone(),
    };
    session.run_loop(&mut source, &cancel).unwrap();

    assert_eq!(
        transcript.borrow().lines,
        vec![
            "handshake ok",
            "sent takeoff",
            "ack takeoff -> ok",
            "sent flip x",
            "ack flip x -> error Motor stop",
            "sent land",
            "shutdown land=true",
        ]
    );
}
