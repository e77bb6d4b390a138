use crate::api::models::Contact;
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "example", "ContactBook")?;
    Some(proj.data_dir().join("cache.sqlite"))
}

/// Snapshot of the last fetched contact list, shown at start-up while the
/// first refresh is in flight. The backend stays the source of truth; the
/// snapshot is overwritten wholesale after every fetch.
pub struct ContactCache {
    conn: Connection,
}

impl ContactCache {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS contacts (
                position INTEGER PRIMARY KEY,
                id INTEGER,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                owner_id INTEGER
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    pub fn open_default() -> rusqlite::Result<Self> {
        let path = db_path().ok_or_else(|| rusqlite::Error::InvalidPath("no data dir".into()))?;
        Self::open(&path)
    }

    pub fn replace_all(&mut self, contacts: &[Contact]) -> rusqlite::Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM contacts", [])?;
        for (position, c) in contacts.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO contacts (position, id, first_name, last_name, email, phone, address, owner_id)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    position as i64,
                    c.id,
                    c.first_name,
                    c.last_name,
                    c.email,
                    c.phone,
                    c.address,
                    c.owner_id
                ],
            )?;
        }
        tx.commit()
    }

    pub fn load_all(&self) -> rusqlite::Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, email, phone, address, owner_id FROM contacts ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Contact {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
                phone: row.get(4)?,
                address: row.get(5)?,
                owner_id: row.get(6)?,
            })
        })?;
        rows.collect()
    }

    /// Drops the snapshot, e.g. when the user signs out.
    pub fn clear(&self) -> rusqlite::Result<()> {
        self.conn.execute("DELETE FROM contacts", [])?;
        Ok(())
    }
}
