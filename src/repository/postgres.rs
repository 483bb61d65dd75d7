use tokio_postgres::{
    Client, NoTls, Row,
    types::{FromSql, Type},
};

use super::{MergeOutcome, embedded::migrations};
use crate::models::{Board, BoardSummary, Category, Note, UnknownCategory};

impl<'a> FromSql<'a> for Category {
    fn from_sql(
        ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let value = <&str as FromSql>::from_sql(ty, raw)?;
        value
            .parse()
            .map_err(|UnknownCategory(value)| format!("unknown note category '{value}'").into())
    }

    fn accepts(ty: &Type) -> bool {
        <&str as FromSql>::accepts(ty)
    }
}

fn board_from_row(row: &Row) -> Result<Board, tokio_postgres::Error> {
    Ok(Board {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn note_from_row(row: &Row) -> Result<Note, tokio_postgres::Error> {
    Ok(Note {
        id: row.try_get("id")?,
        board_id: row.try_get("board_id")?,
        text: row.try_get("text")?,
        author: row.try_get("author")?,
        category: row.try_get("category")?,
        votes: row.try_get("votes")?,
        created_at: row.try_get("created_at")?,
    })
}

pub struct PgRepository {
    client: Client,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT b.id, b.name, b.description, b.created_at, COUNT(n.id) AS notes_count \
                 FROM boards b LEFT JOIN notes n ON n.board_id = b.id \
                 GROUP BY b.id ORDER BY b.seq",
                &[],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BoardSummary {
                    board: board_from_row(row)?,
                    notes_count: row.try_get("notes_count")?,
                })
            })
            .collect()
    }

    pub async fn create_board(
        &self,
        id: &str,
        name: &str,
        description: &str,
    ) -> Result<Board, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO boards (id, name, description) VALUES ($1, $2, $3) \
                 RETURNING id, name, description, created_at",
                &[&id, &name, &description],
            )
            .await?;

        board_from_row(&row)
    }

    pub async fn get_board(&self, id: &str) -> Result<Option<Board>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "SELECT id, name, description, created_at FROM boards WHERE id = $1",
                &[&id],
            )
            .await?;

        row.as_ref().map(board_from_row).transpose()
    }

    pub async fn list_notes(&self, board_id: &str) -> Result<Vec<Note>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT id, board_id, text, category, author, votes, created_at \
                 FROM notes WHERE board_id = $1 ORDER BY seq",
                &[&board_id],
            )
            .await?;

        rows.iter().map(note_from_row).collect()
    }

    pub async fn create_note(
        &self,
        id: &str,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> Result<Note, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (id, board_id, text, category, author) VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, board_id, text, category, author, votes, created_at",
                &[&id, &board_id, &text, &category.as_str(), &author],
            )
            .await?;

        note_from_row(&row)
    }

    pub async fn update_note(
        &self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET text = $1, author = $2 WHERE id = $3 AND board_id = $4 \
                 RETURNING id, board_id, text, category, author, votes, created_at",
                &[&text, &author, &note_id, &board_id],
            )
            .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    pub async fn delete_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> Result<bool, tokio_postgres::Error> {
        let rows = self
            .client
            .execute(
                "DELETE FROM notes WHERE id = $1 AND board_id = $2",
                &[&note_id, &board_id],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn vote_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET votes = votes + 1 WHERE id = $1 AND board_id = $2 \
                 RETURNING id, board_id, text, category, author, votes, created_at",
                &[&note_id, &board_id],
            )
            .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    pub async fn set_category(
        &self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET category = $1 WHERE id = $2 AND board_id = $3 \
                 RETURNING id, board_id, text, category, author, votes, created_at",
                &[&category.as_str(), &note_id, &board_id],
            )
            .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    pub async fn merge_notes(
        &mut self,
        board_id: &str,
        target_id: &str,
        source_id: &str,
    ) -> Result<MergeOutcome, tokio_postgres::Error> {
        let tx = self.client.transaction().await?;

        let select = "SELECT id, board_id, text, category, author, votes, created_at \
                      FROM notes WHERE id = $1 AND board_id = $2 FOR UPDATE";

        let Some(source) = tx.query_opt(select, &[&source_id, &board_id]).await? else {
            return Ok(MergeOutcome::SourceMissing);
        };
        let source = note_from_row(&source)?;

        let Some(target) = tx.query_opt(select, &[&target_id, &board_id]).await? else {
            return Ok(MergeOutcome::TargetMissing);
        };
        let mut target = note_from_row(&target)?;

        target.absorb(&source);

        let row = tx
            .query_one(
                "UPDATE notes SET text = $1, author = $2, votes = $3 WHERE id = $4 \
                 RETURNING id, board_id, text, category, author, votes, created_at",
                &[&target.text, &target.author, &target.votes, &target.id],
            )
            .await?;
        tx.execute("DELETE FROM notes WHERE id = $1", &[&source.id])
            .await?;

        tx.commit().await?;

        Ok(MergeOutcome::Merged(note_from_row(&row)?))
    }
}
