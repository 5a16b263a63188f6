use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use hexwar_core::{EndTurn, MoveArmy, Reply};

/// Receipt for a queued request. Tickets grow with submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket-{}", self.0)
    }
}

/// Player requests waiting for the next tick, and the replies of requests
/// already processed.
///
/// A request leaves its queue only once it has been answered. When a stage
/// fails, the request being processed stays at the front and is retried on
/// the next tick; replies produced before the failure are kept.
#[derive(Debug, Default)]
pub struct RequestInbox {
    next_ticket: u64,
    moves: VecDeque<(Ticket, MoveArmy)>,
    end_turns: VecDeque<(Ticket, EndTurn)>,
    replies: BTreeMap<Ticket, Reply>,
}

impl RequestInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_move(&mut self, request: MoveArmy) -> Ticket {
        let ticket = self.issue();
        self.moves.push_back((ticket, request));
        ticket
    }

    pub fn push_end_turn(&mut self, request: EndTurn) -> Ticket {
        let ticket = self.issue();
        self.end_turns.push_back((ticket, request));
        ticket
    }

    pub fn pending_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn pending_end_turns(&self) -> usize {
        self.end_turns.len()
    }

    pub fn is_idle(&self) -> bool {
        self.moves.is_empty() && self.end_turns.is_empty()
    }

    /// Hands out every reply collected so far, in ticket order.
    pub fn take_replies(&mut self) -> Vec<(Ticket, Reply)> {
        std::mem::take(&mut self.replies).into_iter().collect()
    }

    pub(crate) fn front_move(&self) -> Option<(Ticket, MoveArmy)> {
        self.moves.front().copied()
    }

    pub(crate) fn front_end_turn(&self) -> Option<(Ticket, EndTurn)> {
        self.end_turns.front().copied()
    }

    /// Pops the front move and records its reply.
    pub(crate) fn answer_move(&mut self, ticket: Ticket, reply: Reply) {
        if self.moves.front().is_some_and(|(front, _)| *front == ticket) {
            self.moves.pop_front();
        }
        self.replies.insert(ticket, reply);
    }

    /// Pops the front end-turn and records its reply.
    pub(crate) fn answer_end_turn(&mut self, ticket: Ticket, reply: Reply) {
        if self.end_turns.front().is_some_and(|(front, _)| *front == ticket) {
            self.end_turns.pop_front();
        }
        self.replies.insert(ticket, reply);
    }

    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }
}
