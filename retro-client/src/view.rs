use tokio::time::Instant;

use std::{collections::HashSet, time::Duration};

use crate::{
    dto::{Board, BoardSummary},
    ordering::{self, Column},
};

/// User-facing action kinds. At most one request per kind is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateBoard,
    CreateNote,
    EditNote,
    DeleteNote,
    Vote,
    Move,
    Merge,
}

/// Issued for every board fetch; the response is applied only if the ticket is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub board_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    Stale,
    OtherBoard,
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    shown_at: Instant,
}

/// Client-side cache of the selected board.
///
/// The board is only ever replaced wholesale by a fetched snapshot; mutations never patch it.
#[derive(Debug)]
pub struct ViewModel {
    boards: Vec<BoardSummary>,
    selected: Option<String>,
    board: Option<Board>,
    issued: u64,
    applied: u64,
    in_flight: HashSet<ActionKind>,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl ViewModel {
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            boards: Vec::new(),
            selected: None,
            board: None,
            issued: 0,
            applied: 0,
            in_flight: HashSet::new(),
            notice: None,
            notice_ttl,
        }
    }

    pub fn boards(&self) -> &[BoardSummary] {
        &self.boards
    }

    pub fn set_boards(&mut self, boards: Vec<BoardSummary>) {
        self.boards = boards;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switches the selection. The cached board is dropped when it belongs to another board.
    pub fn select(&mut self, board_id: &str) {
        if self.selected.as_deref() != Some(board_id) {
            self.selected = Some(board_id.to_string());
            self.board = None;
        }
    }

    pub const fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn columns(&self) -> Option<[Column<'_>; 3]> {
        self.board.as_ref().map(ordering::columns)
    }

    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let board_id = self.selected.clone()?;
        self.issued += 1;
        Some(FetchTicket {
            seq: self.issued,
            board_id,
        })
    }

    /// Last issued response wins: anything older than the shown snapshot is dropped.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, board: Board) -> Applied {
        if self.selected.as_deref() != Some(ticket.board_id.as_str()) || board.id != ticket.board_id
        {
            return Applied::OtherBoard;
        }
        if ticket.seq <= self.applied {
            return Applied::Stale;
        }

        self.applied = ticket.seq;
        self.board = Some(board);
        Applied::Fresh
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.selected.as_deref() == Some(ticket.board_id.as_str()) && ticket.seq > self.applied
    }

    /// Marks `kind` as requesting. Returns false when one is already in flight.
    pub fn try_begin(&mut self, kind: ActionKind) -> bool {
        self.in_flight.insert(kind)
    }

    pub fn finish(&mut self, kind: ActionKind) {
        self.in_flight.remove(&kind);
    }

    #[cfg(test)]
    pub fn is_busy(&self, kind: ActionKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn report(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Current error message, if it has not yet timed out.
    pub fn notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| notice.shown_at.elapsed() < self.notice_ttl)
            .map(|notice| notice.message.as_str())
    }
}
