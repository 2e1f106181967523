//! Shared test support
//!
//! A scripted mock transport substituted at the [`Transport`] seam: replies
//! are queued up front, and every interaction (dials, auths, options, command
//! vectors) is recorded for assertion.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rebloom::{Arg, Credentials, RebloomError, Reply, Result, Transport, TransportOption};

/// Everything the mock observed, in call order per category
#[derive(Default)]
pub struct CallLog {
    pub connects: usize,
    pub persistent_connects: usize,
    pub client_names: Vec<String>,
    pub auths: Vec<Credentials>,
    pub options: Vec<(TransportOption, bool)>,
    pub commands: Vec<Vec<String>>,
}

struct State {
    log: CallLog,
    replies: VecDeque<Reply>,
    connected: bool,
    fail_dial: bool,
    dial_error: Option<String>,
    send_error: Option<String>,
}

/// Scripted transport handed to the client under test
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

/// Test-side handle into the mock's recorded state
pub struct MockHandle {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> (Self, MockHandle) {
        Self::with_replies(Vec::new())
    }

    /// Mock that answers the queued replies in order
    pub fn with_replies(replies: Vec<Reply>) -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(State {
            log: CallLog::default(),
            replies: replies.into(),
            connected: false,
            fail_dial: false,
            dial_error: None,
            send_error: None,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHandle { state },
        )
    }

    /// Mock whose dial fails, optionally with a diagnostic message
    pub fn failing_dial(error: Option<&str>) -> (Self, MockHandle) {
        let (transport, handle) = Self::new();
        {
            let mut state = transport.state.lock();
            state.fail_dial = true;
            state.dial_error = error.map(str::to_string);
        }
        (transport, handle)
    }

    /// Mock whose command dispatch fails with a transport error
    pub fn failing_send(message: &str) -> (Self, MockHandle) {
        let (transport, handle) = Self::new();
        transport.state.lock().send_error = Some(message.to_string());
        (transport, handle)
    }
}

impl MockHandle {
    pub fn connects(&self) -> usize {
        self.state.lock().log.connects
    }

    pub fn persistent_connects(&self) -> usize {
        self.state.lock().log.persistent_connects
    }

    pub fn total_connects(&self) -> usize {
        let state = self.state.lock();
        state.log.connects + state.log.persistent_connects
    }

    pub fn client_names(&self) -> Vec<String> {
        self.state.lock().log.client_names.clone()
    }

    pub fn auths(&self) -> Vec<Credentials> {
        self.state.lock().log.auths.clone()
    }

    pub fn options(&self) -> Vec<(TransportOption, bool)> {
        self.state.lock().log.options.clone()
    }

    /// Dispatched command vectors, rendered to strings
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.state.lock().log.commands.clone()
    }

    /// Queue another reply after construction
    pub fn push_reply(&self, reply: Reply) {
        self.state.lock().replies.push_back(reply);
    }
}

impl Transport for MockTransport {
    fn connect(
        &mut self,
        _host: &str,
        _port: u16,
        _connect_timeout: Duration,
        _retry_interval: Duration,
        _read_timeout: Duration,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        if state.fail_dial {
            return Ok(false);
        }
        state.log.connects += 1;
        state.connected = true;
        Ok(true)
    }

    fn connect_persistent(
        &mut self,
        _host: &str,
        _port: u16,
        _connect_timeout: Duration,
        client_name: &str,
        _retry_interval: Duration,
        _read_timeout: Duration,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        if state.fail_dial {
            return Ok(false);
        }
        state.log.persistent_connects += 1;
        state.log.client_names.push(client_name.to_string());
        state.connected = true;
        Ok(true)
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn auth(&mut self, credentials: &Credentials) -> Result<bool> {
        self.state.lock().log.auths.push(credentials.clone());
        Ok(true)
    }

    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<()> {
        self.state.lock().log.options.push((option, enabled));
        Ok(())
    }

    fn send_command(&mut self, args: &[Arg]) -> Result<Reply> {
        let mut state = self.state.lock();
        if let Some(message) = &state.send_error {
            return Err(RebloomError::Transport(message.clone()));
        }

        let rendered: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        state.log.commands.push(rendered.clone());

        match state.replies.pop_front() {
            Some(reply) => Ok(reply),
            None => panic!("mock transport: no scripted reply for command {:?}", rendered),
        }
    }

    fn last_error(&self) -> Option<String> {
        self.state.lock().dial_error.clone()
    }
}

/// Render an expected command vector for comparison against the log
pub fn cmd(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// Install a tracing subscriber for test output (idempotent)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
