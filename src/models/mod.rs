use chrono::{DateTime, Utc};

use std::{fmt, str::FromStr};

pub const ANONYMOUS: &str = "Anonymous";

/// Fixed bucket a note is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Good,
    Bad,
    Improve,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Improve => "improve",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "bad" => Ok(Self::Bad),
            "improve" => Ok(Self::Improve),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Board row together with the number of notes it holds.
#[derive(Debug, Clone)]
pub struct BoardSummary {
    pub board: Board,
    pub notes_count: i64,
}

#[derive(Debug, Clone)]
pub struct Note {
    pub id: String,
    pub board_id: String,
    pub text: String,
    pub author: String,
    pub category: Category,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Folds `source` into `self`: texts are joined, votes summed, authors combined.
    ///
    /// The vote sum saturates at `i32::MAX`, as single votes do.
    pub fn absorb(&mut self, source: &Self) {
        let votes = self.votes.saturating_add(source.votes.max(0));

        let target_text = self.text.trim();
        let source_text = source.text.trim();
        let separator = if target_text.is_empty() || source_text.is_empty() {
            ""
        } else {
            "\n\n---\n\n"
        };
        self.text = format!("{target_text}{separator}{source_text}");

        self.votes = votes;

        if self.author == ANONYMOUS && source.author != ANONYMOUS {
            self.author.clone_from(&source.author);
        } else if self.author != ANONYMOUS
            && source.author != ANONYMOUS
            && self.author != source.author
        {
            self.author = format!("{} & {}", self.author, source.author);
        }
    }
}

/// Trimmed author, falling back to [`ANONYMOUS`] when blank.
pub fn normalize_author(author: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        ANONYMOUS.to_string()
    } else {
        author.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str, author: &str, votes: i32) -> Note {
        Note {
            id: "id".to_string(),
            board_id: "board".to_string(),
            text: text.to_string(),
            author: author.to_string(),
            category: Category::Good,
            votes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn category_parses_only_fixed_values() {
        assert_eq!("good".parse::<Category>(), Ok(Category::Good));
        assert_eq!("improve".parse::<Category>(), Ok(Category::Improve));
        assert!("Good".parse::<Category>().is_err());
        assert!("ugly".parse::<Category>().is_err());
    }

    #[test]
    fn absorb_joins_text_and_sums_votes() {
        let mut target = note("  Slow CI ", "Anna", 2);
        target.absorb(&note("Flaky tests", "Igor", 3));

        assert_eq!(target.text, "Slow CI\n\n---\n\nFlaky tests");
        assert_eq!(target.votes, 5);
        assert_eq!(target.author, "Anna & Igor");
        assert_eq!(target.category, Category::Good);
    }

    #[test]
    fn absorb_saturates_vote_sum() {
        let mut target = note("t", "Anna", i32::MAX);
        target.absorb(&note("t", "Anna", 1));

        assert_eq!(target.votes, i32::MAX);
        assert_eq!(target.text, "t\n\n---\n\nt");
    }

    #[test]
    fn absorb_skips_separator_for_empty_text() {
        let mut target = note("", ANONYMOUS, 0);
        target.absorb(&note("Only source", "Maria", 1));

        assert_eq!(target.text, "Only source");
        assert_eq!(target.author, "Maria");
    }

    #[test]
    fn absorb_keeps_named_target_over_anonymous_or_same_source() {
        let mut target = note("a", "Anna", 0);
        target.absorb(&note("b", ANONYMOUS, 0));
        assert_eq!(target.author, "Anna");

        target.absorb(&note("c", "Anna", 0));
        assert_eq!(target.author, "Anna");
    }

    #[test]
    fn blank_author_becomes_anonymous() {
        assert_eq!(normalize_author("   "), ANONYMOUS);
        assert_eq!(normalize_author(" Sergey "), "Sergey");
    }
}
