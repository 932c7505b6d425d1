use futures::future::BoxFuture;
use reqwest::Method;

use crate::error::ClientResult;

use super::{
    QuizGateway,
    dto::{MarkCorrectRequest, SessionId, SessionRequest, Team},
    transport::{HttpTransport, Payload},
};

const STATE_PATH: &str = "/api/quiz/state";
const PREVIOUS_PATH: &str = "/api/quiz/previous";
const NEXT_PATH: &str = "/api/quiz/next";
const REVEAL_PATH: &str = "/api/quiz/reveal";
const MARK_CORRECT_PATH: &str = "/api/quiz/mark-correct";
const UNDO_PATH: &str = "/api/quiz/undo";

/// [`QuizGateway`] backed by the HTTP transport.
#[derive(Clone)]
pub struct HttpQuizGateway {
    transport: HttpTransport,
}

impl HttpQuizGateway {
    /// Wrap an already configured transport.
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Shared POST path for the commands whose body only carries the session.
    fn post_session(
        &self,
        path: &'static str,
        session: Option<SessionId>,
    ) -> BoxFuture<'static, ClientResult<Payload>> {
        let transport = self.transport.clone();
        Box::pin(async move {
            let body = SessionRequest {
                session: session.as_ref(),
            };
            transport
                .request(Method::POST, path, &[], Some(&body))
                .await
        })
    }
}

impl QuizGateway for HttpQuizGateway {
    fn fetch_state(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        let transport = self.transport.clone();
        Box::pin(async move {
            let query = session
                .as_ref()
                .map(|id| vec![("session", id.as_str())])
                .unwrap_or_default();
            transport
                .request::<()>(Method::GET, STATE_PATH, &query, None)
                .await
        })
    }

    fn go_previous(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.post_session(PREVIOUS_PATH, session)
    }

    fn go_next(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.post_session(NEXT_PATH, session)
    }

    fn reveal(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.post_session(REVEAL_PATH, session)
    }

    fn mark_correct(
        &self,
        session: Option<SessionId>,
        team: Team,
    ) -> BoxFuture<'static, ClientResult<Payload>> {
        let transport = self.transport.clone();
        Box::pin(async move {
            let body = MarkCorrectRequest {
                session: session.as_ref(),
                team,
            };
            transport
                .request(Method::POST, MARK_CORRECT_PATH, &[], Some(&body))
                .await
        })
    }

    fn undo(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>> {
        self.post_session(UNDO_PATH, session)
    }
}
