use crate::{dto::Category, intent::Intent, view::ViewModel};

pub const HELP: &str = "\
Commands:
  boards                          list boards
  select <n|board-id>             open a board (n from `boards`)
  new-board <name> [| <description>]
  add <good|bad|improve> <text> [@author]
  edit <note> <text> [@author]    replace a note's text
  delete <note>                   remove a note
  vote <note>                     add one vote
  move <note> <category>          move a note to another column
  merge <source> <target>         fold source into target
  refresh | show | help | quit
Notes are addressed by their label (g1, b2, i3) or by id.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Intent),
    ListBoards,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no note '{0}' on this board")]
    UnknownNote(String),

    #[error("no board '{0}'")]
    UnknownBoard(String),

    #[error("{0}")]
    Category(String),
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(word, rest)| (word, rest.trim()))
}

/// Resolves a label from the rendered board (`g2`) or a literal note id.
fn resolve_note(view: &ViewModel, reference: &str) -> Result<String, CommandError> {
    let unknown = || CommandError::UnknownNote(reference.to_string());
    let board = view.board().ok_or_else(unknown)?;

    if let Some(note) = board.note(reference) {
        return Ok(note.id.clone());
    }

    let mut chars = reference.chars();
    let initial = chars.next().ok_or_else(unknown)?;
    let position: usize = chars.as_str().parse().map_err(|_| unknown())?;
    let columns = view.columns().ok_or_else(unknown)?;

    columns
        .iter()
        .find(|column| column.category.initial() == initial.to_ascii_lowercase())
        .and_then(|column| column.notes.get(position.checked_sub(1)?))
        .map(|note| note.id.clone())
        .ok_or_else(unknown)
}

fn resolve_board(view: &ViewModel, reference: &str) -> Result<String, CommandError> {
    let boards = view.boards();
    if let Some(board) = boards.iter().find(|board| board.id == reference) {
        return Ok(board.id.clone());
    }

    reference
        .parse::<usize>()
        .ok()
        .and_then(|n| boards.get(n.checked_sub(1)?))
        .map(|board| board.id.clone())
        .ok_or_else(|| CommandError::UnknownBoard(reference.to_string()))
}

/// Splits a trailing ` @author` off the text. A bare `@` leaves the text as is.
fn split_author(text: &str) -> (&str, Option<&str>) {
    match text.rsplit_once(" @") {
        Some((text, author)) if !author.trim().is_empty() && !text.trim().is_empty() => {
            (text.trim(), Some(author.trim()))
        }
        _ => (text, None),
    }
}

fn category(raw: &str) -> Result<Category, CommandError> {
    raw.parse().map_err(CommandError::Category)
}

/// Parses one input line against the board currently on screen.
pub fn parse(line: &str, view: &ViewModel) -> Result<Command, CommandError> {
    let (word, rest) = split_word(line);

    let command = match word {
        "boards" => Command::ListBoards,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "refresh" => Command::Run(Intent::RefreshRequested),
        "select" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("select <n|board-id>"));
            }
            Command::Run(Intent::SelectBoardRequested {
                board_id: resolve_board(view, rest)?,
            })
        }
        "new-board" => {
            let (name, description) = rest.split_once('|').unwrap_or((rest, ""));
            if name.trim().is_empty() {
                return Err(CommandError::Usage("new-board <name> [| <description>]"));
            }
            Command::Run(Intent::CreateBoardRequested {
                name: name.trim().to_string(),
                description: description.trim().to_string(),
            })
        }
        "add" => {
            let (raw_category, text) = split_word(rest);
            if raw_category.is_empty() || text.is_empty() {
                return Err(CommandError::Usage("add <good|bad|improve> <text> [@author]"));
            }
            let (text, author) = split_author(text);
            Command::Run(Intent::CreateNoteRequested {
                category: category(raw_category)?,
                text: text.to_string(),
                author: author.map(str::to_string),
            })
        }
        "edit" => {
            let (note, text) = split_word(rest);
            if note.is_empty() || text.is_empty() {
                return Err(CommandError::Usage("edit <note> <text> [@author]"));
            }
            let note_id = resolve_note(view, note)?;
            let (text, author) = split_author(text);
            let author = author.map(str::to_string).or_else(|| {
                view.board()
                    .and_then(|board| board.note(&note_id))
                    .map(|note| note.author.clone())
            });
            Command::Run(Intent::EditNoteRequested {
                note_id,
                text: text.to_string(),
                author,
            })
        }
        "delete" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("delete <note>"));
            }
            Command::Run(Intent::DeleteNoteRequested {
                note_id: resolve_note(view, rest)?,
            })
        }
        "vote" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("vote <note>"));
            }
            Command::Run(Intent::VoteRequested {
                note_id: resolve_note(view, rest)?,
            })
        }
        "move" => {
            let (note, target) = split_word(rest);
            if note.is_empty() || target.is_empty() {
                return Err(CommandError::Usage("move <note> <category>"));
            }
            Command::Run(Intent::MoveNoteRequested {
                note_id: resolve_note(view, note)?,
                category: category(target)?,
            })
        }
        "merge" => {
            let (source, target) = split_word(rest);
            if source.is_empty() || target.is_empty() {
                return Err(CommandError::Usage("merge <source> <target>"));
            }
            Command::Run(Intent::MergeNotesRequested {
                source_note_id: resolve_note(view, source)?,
                target_note_id: resolve_note(view, target)?,
            })
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}
