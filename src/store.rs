//! The pitch-accent store.
//!
//! A read-many SQLite table of accent entries, loaded once from TSV sources
//! and queried by headword or reading. Loading is transactional: one bad row
//! rejects the whole source, so the store never holds a partial load.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kana;
use crate::parse;
use crate::pitch::{self, PitchAccentEntry};

/// The source tag user-supplied overrides are loaded under.
pub const USER_SOURCE: &str = "user";

/// One pitch-accent record.
///
/// Entries sharing a headword and reading but disagreeing on the pitch number
/// are distinct records; both survive every dedup step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccentEntry {
    /// Display form of the word.
    pub headword: String,
    /// Katakana reading.
    pub katakana_reading: String,
    /// Derived HTML pitch markup (the bare reading when no single downstep
    /// describes the entry).
    pub html_notation: String,
    /// Pitch number as stored.
    pub pitch_number: String,
}

impl From<&AccentEntry> for PitchAccentEntry {
    fn from(entry: &AccentEntry) -> Self {
        Self {
            katakana_reading: entry.katakana_reading.clone(),
            pitch_number: entry.pitch_number.clone(),
        }
    }
}

/// Failures of the accent store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database is unreachable or corrupt.
    #[error("accent store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    /// A source row could not be parsed; the whole load is rejected.
    #[error("invalid accent source row {line}: {text:?}")]
    InvalidSource {
        /// 1-based line number within the source.
        line: usize,
        /// The offending line.
        text: String,
    },
}

/// SQLite-backed accent table.
pub struct AccentStore {
    db: Connection,
}

impl AccentStore {
    /// Opens (or creates) a store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be opened
    /// or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    /// Opens a transient in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch(
            r#"--sql
            create table if not exists pitch_accents (
                id                  integer primary key,
                headword            text not null,
                katakana_reading    text not null,
                html_notation       text not null,
                pitch_number        text not null,
                frequency           integer not null,
                source              text not null
            );

            create index if not exists idx_pitch_accents_headword on pitch_accents(headword);
            create index if not exists idx_pitch_accents_reading on pitch_accents(katakana_reading);
            create index if not exists idx_pitch_accents_source on pitch_accents(source);
            "#,
        )?;
        Ok(Self { db })
    }

    /// Loads one TSV source into the store, returning the number of entries
    /// inserted. Blank lines and `#` comments are skipped. Each pitch number
    /// of a row becomes its own entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSource`] on the first malformed row, in
    /// which case nothing is inserted, or [`StoreError::Unavailable`] on
    /// database failure.
    pub fn load_source(&mut self, source: &str, data: &str) -> Result<usize, StoreError> {
        // Parse everything up front so a bad row cannot leave a partial load.
        let mut rows = Vec::new();
        for (index, line) in data.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse::accent_row(line) {
                Ok(("", row)) => rows.push(row),
                _ => {
                    return Err(StoreError::InvalidSource {
                        line: index + 1,
                        text: line.to_string(),
                    })
                }
            }
        }

        let tx = self.db.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                r#"--sql
                insert into pitch_accents
                    (headword, katakana_reading, html_notation, pitch_number, frequency, source)
                values (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for row in &rows {
                for number in &row.pitch_numbers {
                    let notation = pitch::html_notation(row.katakana_reading, number)
                        .unwrap_or_else(|| row.katakana_reading.to_string());
                    stmt.execute((
                        row.headword,
                        row.katakana_reading,
                        notation,
                        number,
                        row.frequency.unwrap_or(0),
                        source,
                    ))?;
                    inserted += 1;
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Deletes every entry loaded under `source`, returning how many there
    /// were. Used when a user override file is re-loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database failure.
    pub fn clear_source(&mut self, source: &str) -> Result<usize, StoreError> {
        let deleted = self.db.execute(
            r#"--sql
            delete from pitch_accents where source = ?1
            "#,
            [source],
        )?;
        Ok(deleted)
    }

    /// Looks up entries by headword or katakana reading (the expression is
    /// katakana-folded for the reading comparison). When the preferred source
    /// has any matching rows, only those are returned; otherwise all matches
    /// are. Ordered by frequency descending, then pitch number, then reading.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database failure.
    pub fn search(
        &self,
        expression: &str,
        preferred_source: &str,
    ) -> Result<Vec<AccentEntry>, StoreError> {
        if expression.is_empty() {
            return Ok(Vec::new());
        }
        let reading_key = kana::to_katakana(expression);

        let mut stmt = self.db.prepare(
            r#"--sql
            with all_results as (
                select headword, katakana_reading, html_notation, pitch_number, frequency, source
                from pitch_accents
                where headword = ?1 or katakana_reading = ?2
            ),
            preferred_results as (
                select * from all_results where source = ?3
            )
            select headword, katakana_reading, html_notation, pitch_number, frequency
            from preferred_results
            union all
            select headword, katakana_reading, html_notation, pitch_number, frequency
            from all_results
            where not exists (select 1 from preferred_results)
            order by frequency desc, pitch_number asc, katakana_reading asc
            "#,
        )?;

        let rows = stmt.query_map((expression, reading_key.as_str(), preferred_source), |r| {
            Ok(AccentEntry {
                headword: r.get(0)?,
                katakana_reading: r.get(1)?,
                html_notation: r.get(2)?,
                pitch_number: r.get(3)?,
            })
        })?;

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for entry in rows {
            let entry = entry?;
            if seen.insert(entry.clone()) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Total number of entries across all sources.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database failure.
    pub fn count(&self) -> Result<u64, StoreError> {
        let count = self.db.query_row(
            r#"--sql
            select count(*) from pitch_accents
            "#,
            (),
            |r| r.get(0),
        )?;
        Ok(count)
    }
}
