#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use common::api::{endpoints, BettingApi};
use common::dashboard::{execute, Command, Dashboard};
use common::error::{ClientError, Result};
use common::{
    BetsResponse, CurrencyResponse, EndBetRequest, FormFields, GreetingResponse, MatchesResponse,
    MessageResponse, PlaceBetRequest, UsersResponse,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// A recorded call: endpoint plus the body or query it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: &'static str,
    pub payload: Value,
}

#[derive(Default)]
struct Responses {
    queued: VecDeque<Result<Value>>,
    last: Option<Result<Value>>,
}

/// Canned backend. Each endpoint answers with its queued responses in order
/// and keeps repeating the most recent one once the queue runs dry.
#[derive(Default)]
pub struct MockApi {
    responses: RefCell<HashMap<&'static str, Responses>>,
    calls: RefCell<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: &'static str, body: Value) -> Self {
        self.push(endpoint, Ok(body));
        self
    }

    pub fn fail(self, endpoint: &'static str, status: u16) -> Self {
        self.push(endpoint, Err(ClientError::Status(status)));
        self
    }

    pub fn push(&self, endpoint: &'static str, response: Result<Value>) {
        self.responses
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .queued
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .map(|call| call.payload.clone())
            .collect()
    }

    fn answer<T: DeserializeOwned>(&self, endpoint: &'static str, payload: Value) -> Result<T> {
        self.calls.borrow_mut().push(Call { endpoint, payload });
        let mut responses = self.responses.borrow_mut();
        let entry = responses.entry(endpoint).or_default();
        if let Some(next) = entry.queued.pop_front() {
            entry.last = Some(next);
        }
        let response = entry
            .last
            .clone()
            .ok_or_else(|| ClientError::Transport(format!("no response for {endpoint}")))?;
        Ok(serde_json::from_value(response?)?)
    }
}

impl BettingApi for MockApi {
    async fn create_user(&self, fields: &FormFields) -> Result<MessageResponse> {
        self.answer(endpoints::CREATE_USER, json!(fields))
    }

    async fn get_users(&self) -> Result<UsersResponse> {
        self.answer(endpoints::GET_USERS, Value::Null)
    }

    async fn get_user_currency(&self, username: &str) -> Result<CurrencyResponse> {
        self.answer(endpoints::GET_USER_CURRENCY, json!({ "username": username }))
    }

    async fn get_user_bets(&self, username: &str) -> Result<BetsResponse> {
        self.answer(endpoints::GET_USER_BETS, json!({ "username": username }))
    }

    async fn place_bet(&self, bet: &PlaceBetRequest) -> Result<MessageResponse> {
        self.answer(endpoints::PLACE_BET, json!(bet))
    }

    async fn end_bet(&self, request: &EndBetRequest) -> Result<MessageResponse> {
        self.answer(endpoints::END_BET, json!(request))
    }

    async fn upcoming_matches(&self) -> Result<MatchesResponse> {
        self.answer(endpoints::UPCOMING_MATCHES, Value::Null)
    }

    async fn hello(&self) -> Result<GreetingResponse> {
        self.answer(endpoints::HELLO, Value::Null)
    }
}

/// Runs `commands` and everything they lead to, in order, the way the page
/// would once every response has arrived. Returns the alerts shown.
pub async fn drive(dashboard: &mut Dashboard, api: &MockApi, commands: Vec<Command>) -> Vec<String> {
    let mut queue: VecDeque<Command> = commands.into();
    let mut alerts = vec![];
    while let Some(command) = queue.pop_front() {
        if let Command::Alert(text) = command {
            alerts.push(text);
            continue;
        }
        if let Some(message) = execute(api, command).await {
            queue.extend(dashboard.update(message));
        }
    }
    alerts
}

/// Collects everything logged on this thread while the returned guard lives.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
