//! Session operations that defer to the remote adjudicator.
//!
//! Each operation is split in two: `begin_*` validates local state and issues a
//! ticket, `finish_*` applies the service's answer if the ticket is still
//! current. The async helpers chain both around a single service call.

use tracing::warn;
use village_rules::HouseId;

use super::{GameSession, Overlay};
use crate::accusation::AccusationOutcome;
use crate::day_cycle::DayReport;
use crate::error::CoreError;
use crate::events::GameEvent;
use crate::remote::{
    Adjudicator, DayAdvance, Interrogation, RequestKind, RequestTicket, ServiceError, SessionId, Verdict,
    CONNECTION_FALLBACK,
};

impl GameSession {
    /// Open a session on the remote service.
    pub async fn connect<A: Adjudicator + ?Sized>(&mut self, oracle: &A) -> Result<SessionId, CoreError> {
        let remote = oracle.create_session().await.inspect_err(|err| self.report_failure(err))?;
        self.remote_session = Some(remote);
        Ok(remote)
    }

    pub fn remote_session(&self) -> Option<SessionId> {
        self.remote_session
    }

    /// A request is in flight; the UI should show a loading state.
    pub fn is_loading(&self) -> bool {
        self.requests.is_loading()
    }

    fn issue(&mut self, kind: RequestKind) -> Result<RequestTicket, CoreError> {
        if self.remote_session.is_none() {
            return Err(CoreError::NotConnected);
        }
        self.requests.begin(kind).ok_or(CoreError::RequestInFlight)
    }

    fn report_failure(&mut self, err: &ServiceError) {
        warn!(error = %err, "adjudicator call failed");
        self.events.emit(GameEvent::ServiceFailed {
            message: err.to_string(),
        });
    }

    /// Start a free-form question to the npc in the open conversation.
    ///
    /// `Ok(None)` when no conversation is open.
    pub fn begin_interrogation(&mut self) -> Result<Option<RequestTicket>, CoreError> {
        let Some(conversation) = &self.conversation else {
            return Ok(None);
        };
        let kind = RequestKind::Interrogate {
            house: conversation.house().clone(),
            character: conversation.speaker().to_string(),
        };
        self.issue(kind).map(Some)
    }

    /// Settle an interrogation. A failure becomes an in-fiction fallback line.
    ///
    /// Returns `None` for a stale ticket.
    pub fn finish_interrogation(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Interrogation, ServiceError>,
    ) -> Option<String> {
        if !self.requests.finish(ticket) {
            return None;
        }
        match result {
            Ok(reply) => Some(reply.response),
            Err(err) => {
                self.report_failure(&err);
                Some(CONNECTION_FALLBACK.to_string())
            }
        }
    }

    /// Ask the open conversation's npc anything. The text is forwarded verbatim.
    pub async fn interrogate<A: Adjudicator + ?Sized>(
        &mut self,
        oracle: &A,
        message: &str,
    ) -> Result<Option<String>, CoreError> {
        let Some(ticket) = self.begin_interrogation()? else {
            return Ok(None);
        };
        let RequestKind::Interrogate { character, .. } = ticket.kind() else {
            return Ok(None);
        };
        let remote = self.remote_session.ok_or(CoreError::NotConnected)?;
        let result = oracle.interrogate(remote, character, message, self.world.cycle).await;
        Ok(self.finish_interrogation(&ticket, result))
    }

    /// Start a remotely judged accusation.
    ///
    /// `Ok(None)` when not accusing or the suspect cannot be accused.
    pub fn begin_remote_accusation(&mut self, suspect: &HouseId) -> Result<Option<RequestTicket>, CoreError> {
        if !matches!(self.overlay, Some(Overlay::Accusation(_))) {
            return Ok(None);
        }
        let Some(house) = self.world.house(suspect).filter(|h| h.is_accusable()) else {
            return Ok(None);
        };
        let kind = RequestKind::Eliminate {
            house: house.id.clone(),
            character: house.display_name().unwrap_or(house.id.as_str()).to_string(),
        };
        self.issue(kind).map(Some)
    }

    /// Apply a remote verdict.
    ///
    /// A service failure resolves nothing: the picker stays open so the player
    /// can retry. Returns `Ok(None)` for a stale ticket.
    pub fn finish_remote_accusation(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Verdict, ServiceError>,
    ) -> Result<Option<AccusationOutcome>, CoreError> {
        if !self.requests.finish(ticket) {
            return Ok(None);
        }
        let RequestKind::Eliminate { house, .. } = ticket.kind() else {
            return Ok(None);
        };
        let verdict = result.inspect_err(|err| self.report_failure(err))?;

        let outcome = self.resolver.accept_verdict(&mut self.world, house, verdict.result);
        self.after_accusation(house, &outcome);
        Ok(Some(outcome))
    }

    /// Accuse `suspect` and let the remote service decide.
    pub async fn accuse_remote<A: Adjudicator + ?Sized>(
        &mut self,
        oracle: &A,
        suspect: &HouseId,
    ) -> Result<Option<AccusationOutcome>, CoreError> {
        let Some(ticket) = self.begin_remote_accusation(suspect)? else {
            return Ok(None);
        };
        let RequestKind::Eliminate { character, .. } = ticket.kind() else {
            return Ok(None);
        };
        let remote = self.remote_session.ok_or(CoreError::NotConnected)?;
        let result = oracle.eliminate(remote, character).await;
        self.finish_remote_accusation(&ticket, result)
    }

    /// Start a remotely synced night. `Ok(None)` when sleeping is not allowed here.
    pub fn begin_remote_sleep(&mut self) -> Result<Option<RequestTicket>, CoreError> {
        if !self.can_sleep() {
            return Ok(None);
        }
        self.issue(RequestKind::AdvanceDay).map(Some)
    }

    /// Advance the day once the service agrees. On failure the day does not
    /// advance and the guard house stays open.
    pub fn finish_remote_sleep(
        &mut self,
        ticket: &RequestTicket,
        result: Result<DayAdvance, ServiceError>,
    ) -> Result<Option<DayReport>, CoreError> {
        if !self.requests.finish(ticket) {
            return Ok(None);
        }
        let advance = result.inspect_err(|err| self.report_failure(err))?;
        if advance.current_day != self.world.cycle + 1 {
            warn!(
                remote = advance.current_day,
                local = self.world.cycle,
                "adjudicator day is out of step"
            );
        }
        Ok(self.sleep())
    }

    pub async fn sleep_remote<A: Adjudicator + ?Sized>(&mut self, oracle: &A) -> Result<Option<DayReport>, CoreError> {
        let Some(ticket) = self.begin_remote_sleep()? else {
            return Ok(None);
        };
        let remote = self.remote_session.ok_or(CoreError::NotConnected)?;
        let result = oracle.advance_day(remote).await;
        self.finish_remote_sleep(&ticket, result)
    }
}
