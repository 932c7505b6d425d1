//! Remote session authority access: HTTP transport, request bodies, and the command gateway.

pub mod dto;
pub mod gateway;
pub mod transport;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::ClientResult;

pub use self::dto::{SessionId, Team};
pub use self::gateway::HttpQuizGateway;
pub use self::transport::{HttpTransport, Payload};

/// Operations exposed by the remote session authority.
///
/// Every method maps to exactly one endpoint and propagates transport failures unchanged.
pub trait QuizGateway: Send + Sync {
    /// Fetch the current raw snapshot.
    fn fetch_state(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>>;
    /// Move to the previous question.
    fn go_previous(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>>;
    /// Move to the next question.
    fn go_next(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>>;
    /// Reveal the current answer.
    fn reveal(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>>;
    /// Award the current question to `team`.
    fn mark_correct(
        &self,
        session: Option<SessionId>,
        team: Team,
    ) -> BoxFuture<'static, ClientResult<Payload>>;
    /// Undo the last scoring action.
    fn undo(&self, session: Option<SessionId>) -> BoxFuture<'static, ClientResult<Payload>>;

    /// Award the current question to the team named by a raw code.
    ///
    /// Unknown codes fail with `InvalidArgument` before any request is issued.
    fn mark_correct_code(
        &self,
        session: Option<SessionId>,
        code: &str,
    ) -> BoxFuture<'static, ClientResult<Payload>> {
        match code.parse::<Team>() {
            Ok(team) => self.mark_correct(session, team),
            Err(err) => future::ready(Err(err)).boxed(),
        }
    }
}
