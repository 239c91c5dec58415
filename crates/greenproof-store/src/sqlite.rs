//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for GreenProof. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use greenproof_core::{
    ActionContent, ActionId, Attestation, ImpactAction, Proof, ProofId,
};

use crate::error::{Result, StoreError};
use crate::ids::IdGenerator;
use crate::migration;
use crate::traits::{Page, RecordKind, Store, StoreStats};

const ACTION_COLUMNS: &str = "id, actor, title, description, category, quantity, unit, location,
     evidence_url, attested, proof_hash, tx_id, created_at, updated_at";

const PROOF_COLUMNS: &str = "id, action_id, proof_hash, tx_id, network, signer_address, signature,
     chain_id, created_at, updated_at";

const ACTIONS: &str = RecordKind::Action.table();
const PROOFS: &str = RecordKind::Proof.table();

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    /// Id source for new records.
    ids: Arc<IdGenerator>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path.as_ref())?;
        migration::migrate(&mut conn)?;
        tracing::info!(path = %path.as_ref().display(), "opened sqlite store");
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection, &IdGenerator) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let ids = self.ids.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&mut conn, &ids)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

/// `LIMIT`/`OFFSET` bind values. SQLite reads a negative offset as zero, so
/// out-of-range values saturate instead of wrapping.
fn page_params(page: Page) -> (i64, i64) {
    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Parse a text column through `FromStr`, reporting failures as conversion errors.
fn parse_column<T>(idx: usize, text: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_column<T>(idx: usize, text: Option<String>) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.map(|t| parse_column(idx, t)).transpose()
}

// Helper to convert a row (selected with ACTION_COLUMNS) to ImpactAction
fn row_to_action(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImpactAction> {
    Ok(ImpactAction {
        id: parse_column(0, row.get(0)?)?,
        content: ActionContent {
            actor: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            category: parse_column(4, row.get(4)?)?,
            quantity: row.get(5)?,
            unit: row.get(6)?,
            location: row.get(7)?,
            evidence_url: row.get(8)?,
        },
        attested: row.get(9)?,
        proof_hash: parse_optional_column(10, row.get(10)?)?,
        tx_id: parse_optional_column(11, row.get(11)?)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

// Helper to convert a row (selected with PROOF_COLUMNS) to Proof
fn row_to_proof(row: &rusqlite::Row<'_>) -> rusqlite::Result<Proof> {
    Ok(Proof {
        id: parse_column(0, row.get(0)?)?,
        action_id: parse_column(1, row.get(1)?)?,
        proof_hash: parse_column(2, row.get(2)?)?,
        tx_id: parse_column(3, row.get(3)?)?,
        network: parse_column(4, row.get(4)?)?,
        signer_address: row.get(5)?,
        signature: row.get(6)?,
        chain_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_action(&self, content: &ActionContent, now: i64) -> Result<ImpactAction> {
        let content = content.clone();

        self.blocking(move |conn, ids| {
            let action = ImpactAction::new(ids.next_action_id(now), content, now);
            let c = &action.content;

            conn.execute(
                &format!(
                    "INSERT INTO {ACTIONS} ({ACTION_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, NULL, NULL, ?10, ?11)"
                ),
                params![
                    action.id.to_hex(),
                    c.actor,
                    c.title,
                    c.description,
                    c.category.as_str(),
                    c.quantity,
                    c.unit,
                    c.location,
                    c.evidence_url,
                    action.created_at,
                    action.updated_at,
                ],
            )?;

            Ok(action)
        })
        .await
    }

    async fn get_action(&self, id: &ActionId) -> Result<Option<ImpactAction>> {
        let id = *id;

        self.blocking(move |conn, _| {
            conn.query_row(
                &format!("SELECT {ACTION_COLUMNS} FROM {ACTIONS} WHERE id = ?1"),
                params![id.to_hex()],
                row_to_action,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_actions(&self, page: Page) -> Result<Vec<ImpactAction>> {
        self.blocking(move |conn, _| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTION_COLUMNS} FROM {ACTIONS} ORDER BY seq LIMIT ?1 OFFSET ?2"
            ))?;
            let (limit, offset) = page_params(page);

            let actions = stmt
                .query_map(params![limit, offset], row_to_action)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(actions)
        })
        .await
    }

    async fn record_attestation(&self, attestation: &Attestation) -> Result<Option<Proof>> {
        let attestation = attestation.clone();

        self.blocking(move |conn, ids| {
            let tx = conn.transaction()?;
            let d = &attestation.derivation;

            let updated = tx.execute(
                &format!(
                    "UPDATE {ACTIONS}
                     SET attested = 1, proof_hash = ?1, tx_id = ?2, updated_at = ?3
                     WHERE id = ?4"
                ),
                params![
                    d.proof_hash.to_hex(),
                    d.tx_id.to_hex(),
                    attestation.attested_at,
                    attestation.action_id.to_hex(),
                ],
            )?;

            if updated == 0 {
                // Dropping the transaction rolls it back.
                return Ok(None);
            }

            let proof = Proof::from_attestation(ids.next_proof_id(attestation.attested_at), &attestation);
            tx.execute(
                &format!(
                    "INSERT INTO {PROOFS} ({PROOF_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    proof.id.to_hex(),
                    proof.action_id.to_hex(),
                    proof.proof_hash.to_hex(),
                    proof.tx_id.to_hex(),
                    proof.network.as_str(),
                    proof.signer_address,
                    proof.signature,
                    proof.chain_id,
                    proof.created_at,
                    proof.updated_at,
                ],
            )?;

            tx.commit()?;
            Ok(Some(proof))
        })
        .await
    }

    async fn get_proof(&self, id: &ProofId) -> Result<Option<Proof>> {
        let id = *id;

        self.blocking(move |conn, _| {
            conn.query_row(
                &format!("SELECT {PROOF_COLUMNS} FROM {PROOFS} WHERE id = ?1"),
                params![id.to_hex()],
                row_to_proof,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_proofs(&self, page: Page) -> Result<Vec<Proof>> {
        self.blocking(move |conn, _| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLUMNS} FROM {PROOFS} ORDER BY seq LIMIT ?1 OFFSET ?2"
            ))?;
            let (limit, offset) = page_params(page);

            let proofs = stmt
                .query_map(params![limit, offset], row_to_proof)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(proofs)
        })
        .await
    }

    async fn proofs_for_action(&self, action_id: &ActionId) -> Result<Vec<Proof>> {
        let action_id = *action_id;

        self.blocking(move |conn, _| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLUMNS} FROM {PROOFS} WHERE action_id = ?1 ORDER BY seq"
            ))?;

            let proofs = stmt
                .query_map(params![action_id.to_hex()], row_to_proof)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(proofs)
        })
        .await
    }

    async fn stats(&self) -> Result<StoreStats> {
        self.blocking(|conn, _| {
            let (actions, proofs): (i64, i64) = conn.query_row(
                &format!("SELECT (SELECT COUNT(*) FROM {ACTIONS}), (SELECT COUNT(*) FROM {PROOFS})"),
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(StoreStats {
                actions: actions as u64,
                proofs: proofs as u64,
            })
        })
        .await
    }
}
