use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::history::DrawHistory;
use crate::models::{Domain, Draw, DrawError};

// Les numéros sont stockés triés : la contrainte UNIQUE suffit à dédoublonner.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date    TEXT NOT NULL,
    main_1  INTEGER NOT NULL,
    main_2  INTEGER NOT NULL,
    main_3  INTEGER NOT NULL,
    main_4  INTEGER NOT NULL,
    main_5  INTEGER NOT NULL,
    euro_1  INTEGER NOT NULL,
    euro_2  INTEGER NOT NULL,
    UNIQUE (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("mastermind.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Échec de la migration")?;
    Ok(())
}

/// Retourne `false` si le tirage était déjà présent.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                draw.date,
                draw.main[0],
                draw.main[1],
                draw.main[2],
                draw.main[3],
                draw.main[4],
                draw.euro[0],
                draw.euro[1],
            ],
        )
        .context("Échec de l'insertion")?;
    Ok(changed > 0)
}

type RawRow = (NaiveDate, [i64; 5], [i64; 2]);

fn fetch_rows(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| -> rusqlite::Result<RawRow> {
            Ok((
                row.get(0)?,
                [row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
                [row.get(6)?, row.get(7)?],
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    // Une ligne invalide fait échouer tout le chargement, avant tout tirage de grille.
    rows.into_iter()
        .map(|(date, main, euro)| {
            let main = to_numbers(Domain::Main, &main);
            let euro = to_numbers(Domain::Euro, &euro);
            main.and_then(|main| euro.and_then(|euro| Draw::new(date, &main, &euro)))
                .with_context(|| format!("Tirage invalide en base ({})", date))
        })
        .collect()
}

/// Convertit les colonnes INTEGER ; une valeur hors u8 est signalée telle quelle.
fn to_numbers(domain: Domain, raw: &[i64]) -> Result<Vec<u8>, DrawError> {
    raw.iter()
        .map(|&n| {
            u8::try_from(n).map_err(|_| DrawError::StoredOutOfRange {
                domain,
                value: n,
                max: domain.max(),
            })
        })
        .collect()
}

/// Charge tout l'historique, validé, du plus ancien au plus récent.
pub fn fetch_history(conn: &Connection) -> Result<DrawHistory> {
    let draws = fetch_rows(
        conn,
        "SELECT date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2
         FROM draws ORDER BY date ASC, id ASC",
        [],
    )?;
    Ok(DrawHistory::from_draws(draws)?)
}

/// Derniers tirages, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    fetch_rows(
        conn,
        "SELECT date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2
         FROM draws ORDER BY date DESC, id DESC LIMIT ?1",
        [limit],
    )
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(date: &str, main: [u8; 5]) -> Draw {
        Draw::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), &main, &[1, 2]).unwrap()
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw("2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("2024-01-01", [5, 4, 3, 2, 1])).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw("2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        insert_draw(&conn, &test_draw("2024-01-05", [6, 7, 8, 9, 10])).unwrap();
        insert_draw(&conn, &test_draw("2024-01-03", [11, 12, 13, 14, 15])).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date.to_string(), "2024-01-05");
        assert_eq!(draws[2].date.to_string(), "2024-01-01");

        let history = fetch_history(&conn).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.draws()[0].date.to_string(), "2024-01-01");
        assert_eq!(history.latest().unwrap().main, [6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_malformed_row_fails_fast() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw("2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        conn.execute(
            "INSERT INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
             VALUES ('2024-01-04', 1, 2, 3, 4, 60, 1, 2)",
            [],
        )
        .unwrap();

        let err = fetch_history(&conn).unwrap_err();
        assert!(err.to_string().contains("2024-01-04"), "{err}");
        assert!(err.downcast_ref::<crate::models::DrawError>().is_some());
    }

    #[test]
    fn test_stored_value_beyond_u8_reported_verbatim() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
             VALUES ('2024-01-04', 1, 2, 3, 4, 300, 1, 2)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
             VALUES ('2024-01-07', 1, 2, 3, 4, 5, -1, 2)",
            [],
        )
        .unwrap();

        let err = fetch_history(&conn).unwrap_err();
        let cause = err.downcast_ref::<DrawError>().unwrap();
        assert_eq!(
            cause,
            &DrawError::StoredOutOfRange { domain: Domain::Main, value: 300, max: 50 }
        );
        assert!(format!("{err:#}").contains("300"), "{err:#}");

        let err = fetch_last_draws(&conn, 1).unwrap_err();
        assert!(format!("{err:#}").contains("-1"), "{err:#}");
    }
}
