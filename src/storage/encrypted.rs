//! SQLite-backed assessment store. The serialized prediction is stored
//! AES-GCM encrypted; score, category and timestamps stay queryable.
//! Key derived from a deployment secret.

use super::{AssessmentRecord, StoreError};
use crate::scoring::PredictionResult;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{TimeZone, Utc};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

fn derive_key(seed: &[u8]) -> [u8; KEY_LEN] {
    use ring::digest;
    let mut out = [0u8; KEY_LEN];
    let h = digest::digest(&digest::SHA256, seed);
    out[..h.as_ref().len().min(KEY_LEN)].copy_from_slice(h.as_ref());
    out
}

fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, StoreError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| StoreError::Crypto(e.to_string()))?;
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| StoreError::Crypto(e.to_string()))?;
    let mut out = nonce.to_vec();
    out.extend(ciphertext);
    Ok(BASE64.encode(&out))
}

fn decrypt(key: &[u8; KEY_LEN], encoded: &str) -> Result<Vec<u8>, StoreError> {
    let raw = BASE64.decode(encoded)?;
    if raw.len() < NONCE_LEN {
        return Err(StoreError::Crypto("payload too short".into()));
    }
    let (nonce, ct) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| StoreError::Crypto(e.to_string()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ct)
        .map_err(|e| StoreError::Crypto(e.to_string()))
}

pub struct AssessmentStore {
    conn: Mutex<Connection>,
    key: [u8; KEY_LEN],
}

impl AssessmentStore {
    /// Open or create DB at path. Key is derived from `secret`.
    pub fn open(path: &Path, secret: &[u8]) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assessments (
                application_id TEXT PRIMARY KEY,
                assessment_id TEXT NOT NULL,
                scored_at INTEGER NOT NULL,
                credit_score INTEGER NOT NULL,
                category TEXT NOT NULL,
                input_hash TEXT NOT NULL,
                payload_enc TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_assessments_scored_at ON assessments(scored_at);
            CREATE TABLE IF NOT EXISTS scoring_leases (
                application_id TEXT PRIMARY KEY,
                holder TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: derive_key(secret),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert or replace the assessment for `record.application_id`.
    pub fn upsert_assessment(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&record.result)?;
        let enc = encrypt(&self.key, payload.as_bytes())?;
        self.conn()?.execute(
            "INSERT INTO assessments
                (application_id, assessment_id, scored_at, credit_score, category,
                 input_hash, payload_enc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(application_id) DO UPDATE SET
                assessment_id = excluded.assessment_id,
                scored_at = excluded.scored_at,
                credit_score = excluded.credit_score,
                category = excluded.category,
                input_hash = excluded.input_hash,
                payload_enc = excluded.payload_enc",
            params![
                record.application_id,
                record.assessment_id,
                record.scored_at.timestamp_millis(),
                record.result.credit_score,
                record.result.category.as_str(),
                record.input_hash,
                enc
            ],
        )?;
        Ok(())
    }

    /// Read the latest assessment for an application (payload decrypted).
    pub fn get_assessment(
        &self,
        application_id: &str,
    ) -> Result<Option<AssessmentRecord>, StoreError> {
        let row = self
            .conn()?
            .query_row(
                "SELECT assessment_id, scored_at, input_hash, payload_enc
                 FROM assessments WHERE application_id = ?1",
                params![application_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((assessment_id, scored_at, input_hash, enc)) = row else {
            return Ok(None);
        };
        let plain = decrypt(&self.key, &enc)?;
        let result: PredictionResult = serde_json::from_slice(&plain)?;
        let scored_at = Utc
            .timestamp_millis_opt(scored_at)
            .single()
            .ok_or_else(|| StoreError::Corrupt(format!("scored_at {scored_at}")))?;
        Ok(Some(AssessmentRecord {
            application_id: application_id.to_string(),
            assessment_id,
            scored_at,
            input_hash,
            result,
        }))
    }

    pub fn count_assessments(&self) -> Result<u64, StoreError> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Take the scoring lease for an application. Returns false while another
    /// holder's lease is unexpired. Expiry saturates at `i64::MAX`.
    pub fn try_acquire_lease(
        &self,
        application_id: &str,
        holder: &str,
        now_ms: i64,
        lease_ms: i64,
    ) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "INSERT INTO scoring_leases (application_id, holder, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(application_id) DO UPDATE
                SET holder = excluded.holder, expires_at = excluded.expires_at
             WHERE scoring_leases.expires_at <= ?4",
            params![application_id, holder, now_ms.saturating_add(lease_ms), now_ms],
        )?;
        Ok(changed == 1)
    }

    pub fn release_lease(&self, application_id: &str, holder: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "DELETE FROM scoring_leases WHERE application_id = ?1 AND holder = ?2",
            params![application_id, holder],
        )?;
        Ok(())
    }

    /// Retention: delete assessments scored before the given timestamp
    pub fn prune_before(&self, ts_ms: i64) -> Result<u64, StoreError> {
        let n = self
            .conn()?
            .execute("DELETE FROM assessments WHERE scored_at < ?1", params![ts_ms])?;
        Ok(n as u64)
    }
}
