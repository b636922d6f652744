//! Mock 命令链路
//!
//! 不依赖网络的链路实现，用于测试会话层：
//! - 记录每一次发送、接收和释放（[`LinkEvent`] 日志）
//! - 按队列返回预设应答，队列为空时返回自动应答（默认 `ok`）
//! - 可注入发送失败和接收超时
//!
//! 链路本身交给会话持有，测试通过 [`MockLinkHandle`] 观察和操控同一份状态。

use crate::{CommandLink, LinkError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// 链路事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// 发送成功的数据报
    Sent(Vec<u8>),
    /// 发送失败的数据报
    SendFailed(Vec<u8>),
    /// 返回给调用方的数据报
    Received(Vec<u8>),
    /// 接收轮询超时
    Timeout,
    /// socket 释放
    Closed,
}

/// 预设的接收结果
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 返回一个数据报
    Datagram(Vec<u8>),
    /// 返回一次轮询超时
    Timeout,
    /// 返回一次 IO 错误
    Error(io::ErrorKind),
}

type ReceiveHook = Box<dyn FnMut(usize) + Send>;

struct MockState {
    events: Vec<LinkEvent>,
    responses: VecDeque<MockResponse>,
    auto_reply: Option<Vec<u8>>,
    fail_sends: Vec<Vec<u8>>,
    receive_calls: usize,
    close_calls: usize,
    closed: bool,
    receive_hook: Option<ReceiveHook>,
}

/// Mock 命令链路
pub struct MockLink {
    state: Arc<Mutex<MockState>>,
    remote: SocketAddr,
    local: SocketAddr,
}

/// Mock 链路的观察/操控句柄
#[derive(Clone)]
pub struct MockLinkHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockLink {
    /// 创建 Mock 链路及其句柄
    pub fn new() -> (Self, MockLinkHandle) {
        let state = Arc::new(Mutex::new(MockState {
            events: Vec::new(),
            responses: VecDeque::new(),
            auto_reply: Some(b"ok".to_vec()),
            fail_sends: Vec::new(),
            receive_calls: 0,
            close_calls: 0,
            closed: false,
            receive_hook: None,
        }));

        let link = Self {
            state: Arc::clone(&state),
            remote: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 10, 1)), 8889),
            local: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
        };
        (link, MockLinkHandle { state })
    }
}

impl MockLinkHandle {
    /// 追加一个预设接收结果
    pub fn push_response(&self, response: MockResponse) {
        self.state.lock().responses.push_back(response);
    }

    /// 追加一个文本应答
    pub fn push_reply(&self, text: &str) {
        self.push_response(MockResponse::Datagram(text.as_bytes().to_vec()));
    }

    /// 设置队列为空时的自动应答（`None` 表示一直超时）
    pub fn set_auto_reply(&self, reply: Option<&[u8]>) {
        self.state.lock().auto_reply = reply.map(<[u8]>::to_vec);
    }

    /// 发送该负载时返回 IO 错误
    pub fn fail_send_of(&self, payload: &[u8]) {
        self.state.lock().fail_sends.push(payload.to_vec());
    }

    /// 每次 `receive` 调用前执行回调，参数为本次调用的序号（从 1 开始）
    ///
    /// 回调在链路内部锁之外执行。
    pub fn on_receive(&self, hook: impl FnMut(usize) + Send + 'static) {
        self.state.lock().receive_hook = Some(Box::new(hook));
    }

    /// 全部事件
    pub fn events(&self) -> Vec<LinkEvent> {
        self.state.lock().events.clone()
    }

    /// 成功发送的数据报（按文本解码）
    pub fn sent_texts(&self) -> Vec<String> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                LinkEvent::Sent(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    /// `receive` 被调用的次数（含超时）
    pub fn receive_calls(&self) -> usize {
        self.state.lock().receive_calls
    }

    /// `close` 实际释放 socket 的次数
    pub fn close_calls(&self) -> usize {
        self.state.lock().close_calls
    }

    /// 是否已释放
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl CommandLink for MockLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LinkError::Closed);
        }

        if state.fail_sends.iter().any(|p| p.as_slice() == payload) {
            state.events.push(LinkEvent::SendFailed(payload.to_vec()));
            return Err(LinkError::Io(io::Error::new(
                io::ErrorKind::NetworkUnreachable,
                "mock send failure",
            )));
        }

        state.events.push(LinkEvent::Sent(payload.to_vec()));
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let (call, hook) = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(LinkError::Closed);
            }
            state.receive_calls += 1;
            (state.receive_calls, state.receive_hook.take())
        };

        // 回调可能通过句柄访问状态，不能持锁调用
        if let Some(mut hook) = hook {
            hook(call);
            let mut state = self.state.lock();
            if state.receive_hook.is_none() {
                state.receive_hook = Some(hook);
            }
        }

        let mut state = self.state.lock();
        let response = match state.responses.pop_front() {
            Some(response) => response,
            None => match &state.auto_reply {
                Some(reply) => MockResponse::Datagram(reply.clone()),
                None => MockResponse::Timeout,
            },
        };

        match response {
            MockResponse::Datagram(datagram) => {
                // 与 UDP 一致：超出缓冲区的部分被丢弃
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                state.events.push(LinkEvent::Received(datagram[..len].to_vec()));
                Ok(len)
            },
            MockResponse::Timeout => {
                state.events.push(LinkEvent::Timeout);
                Err(LinkError::Timeout)
            },
            MockResponse::Error(kind) => Err(LinkError::Io(io::Error::new(kind, "mock receive failure"))),
        }
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            state.close_calls += 1;
            state.events.push(LinkEvent::Closed);
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        if self.is_closed() { None } else { Some(self.local) }
    }
}
