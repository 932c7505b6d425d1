//! In-memory gateway used by the loop and dispatcher tests.

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::json;
use tokio::sync::oneshot;

use crate::{
    api::{Payload, QuizGateway, SessionId, Team},
    error::{ClientError, ClientResult},
};

/// One scripted answer to a gateway call.
pub enum Step {
    /// Resolve immediately with this result.
    Reply(ClientResult<Payload>),
    /// Resolve once the paired sender fires.
    Gate(oneshot::Receiver<ClientResult<Payload>>),
}

/// Gateway fake replaying scripted results and recording every call.
#[derive(Default)]
pub struct ScriptedGateway {
    fetch_script: Mutex<VecDeque<Step>>,
    command_script: Mutex<VecDeque<Step>>,
    fetches: AtomicUsize,
    commands: Mutex<Vec<String>>,
    sessions: Mutex<Vec<Option<SessionId>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, step: Step) -> &Self {
        self.fetch_script.lock().unwrap().push_back(step);
        self
    }

    pub fn push_command(&self, step: Step) -> &Self {
        self.command_script.lock().unwrap().push_back(step);
        self
    }

    /// Queue a fetch that stays pending until the returned sender fires.
    pub fn gate_fetch(&self) -> oneshot::Sender<ClientResult<Payload>> {
        let (tx, rx) = oneshot::channel();
        self.push_fetch(Step::Gate(rx));
        tx
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn fetched_sessions(&self) -> Vec<Option<SessionId>> {
        self.sessions.lock().unwrap().clone()
    }

    fn resolve(step: Option<Step>) -> BoxFuture<'static, ClientResult<Payload>> {
        match step {
            Some(Step::Reply(result)) => future::ready(result).boxed(),
            Some(Step::Gate(rx)) => async move {
                rx.await.unwrap_or_else(|_| Err(transport_error(None, "gate dropped")))
            }
            .boxed(),
            None => future::pending().boxed(),
        }
    }

    fn command(&self, name: String) -> BoxFuture<'static, ClientResult<Payload>> {
        self.commands.lock().unwrap().push(name);
        let step = self
            .command_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::Reply(Ok(Payload::Json(json!({ "ok": true })))));
        Self::resolve(Some(step))
    }
}

impl QuizGateway for ScriptedGateway {
    fn fetch_state(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.sessions.lock().unwrap().push(session);
        let step = self.fetch_script.lock().unwrap().pop_front();
        Self::resolve(step)
    }

    fn go_previous(&self, _session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.command("previous".into())
    }

    fn go_next(&self, _session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.command("next".into())
    }

    fn reveal(&self, _session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.command("reveal".into())
    }

    fn mark_correct(
        &self,
        _session: Option<SessionId>,
        team: Team,
    ) -> BoxFuture<'static, ClientResult<Payload>> {
        self.command(format!("mark-correct:{team}"))
    }

    fn undo(&self, _session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.command("undo".into())
    }
}

pub fn transport_error(status: Option<u16>, message: &str) -> ClientError {
    ClientError::Transport {
        status,
        message: message.into(),
    }
}

/// Well-formed snapshot with the given scores.
pub fn snapshot(team_a: i64, team_b: i64) -> Payload {
    Payload::Json(json!({
        "question": {
            "id": 1,
            "title": "Q1",
            "body": "What is 2+2?",
            "answer": "4",
            "answerRevealed": false
        },
        "timers": { "questionRemaining": 30, "quizRemaining": 600 },
        "scores": { "teamA": team_a, "teamB": team_b }
    }))
}
