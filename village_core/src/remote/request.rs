//! Single in-flight request tracking with a stale-response guard.

use village_rules::HouseId;

use super::SessionId;

/// What a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Interrogate { house: HouseId, character: String },
    Eliminate { house: HouseId, character: String },
    AdvanceDay,
}

/// Proof of an issued request. Results are only applied with the ticket that
/// is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    session: SessionId,
    seq: u64,
    kind: RequestKind,
}

impl RequestTicket {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }
}

/// Allows at most one request in flight per session.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    session: SessionId,
    next_seq: u64,
    in_flight: Option<(u64, RequestKind)>,
}

impl RequestTracker {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            next_seq: 0,
            in_flight: None,
        }
    }

    /// The UI shows a loading state and refuses resubmission while true.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issue a ticket, or `None` while another request is pending.
    pub fn begin(&mut self, kind: RequestKind) -> Option<RequestTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some((seq, kind.clone()));
        Some(RequestTicket {
            session: self.session,
            seq,
            kind,
        })
    }

    /// Settle a request. Returns false when the ticket is stale, in which case
    /// its result must be discarded.
    pub fn finish(&mut self, ticket: &RequestTicket) -> bool {
        let current = ticket.session == self.session
            && matches!(&self.in_flight, Some((seq, _)) if *seq == ticket.seq);
        if current {
            self.in_flight = None;
        }
        current
    }

    /// Forget the pending request; whatever it returns is now stale.
    pub fn invalidate(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_request_at_a_time() {
        let mut tracker = RequestTracker::new(SessionId::new());
        let ticket = tracker.begin(RequestKind::AdvanceDay).unwrap();
        assert!(tracker.is_loading());
        assert!(tracker.begin(RequestKind::AdvanceDay).is_none());

        assert!(tracker.finish(&ticket));
        assert!(!tracker.is_loading());
        assert!(!tracker.finish(&ticket));
    }

    #[test]
    fn test_invalidated_ticket_is_stale() {
        let mut tracker = RequestTracker::new(SessionId::new());
        let old = tracker.begin(RequestKind::AdvanceDay).unwrap();
        tracker.invalidate();

        let new = tracker.begin(RequestKind::AdvanceDay).unwrap();
        assert!(!tracker.finish(&old));
        assert!(tracker.is_loading());
        assert!(tracker.finish(&new));
    }

    #[test]
    fn test_foreign_session_is_stale() {
        let mut ours = RequestTracker::new(SessionId::new());
        let mut theirs = RequestTracker::new(SessionId::new());
        let _pending = ours.begin(RequestKind::AdvanceDay).unwrap();
        let foreign = theirs.begin(RequestKind::AdvanceDay).unwrap();

        assert_eq!(foreign.seq(), 0);
        assert!(!ours.finish(&foreign));
        assert!(ours.is_loading());
    }
}
