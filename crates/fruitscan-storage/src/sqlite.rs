//! SQLite 저장 백엔드.
//!
//! `local_storage` 테이블 하나에 키-값을 보관한다.

use fruitscan_core::error::CoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::area::Backend;
use crate::migration;

/// SQLite 백엔드
pub(crate) struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// 파일 기반 SQLite 백엔드 생성
    pub(crate) fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("저장소 디렉토리 생성: {}", parent.display());
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 백엔드 생성 (테스트용)
    pub(crate) fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Storage(format!("DB 잠금 실패: {e}")))
    }
}

fn query_error(e: rusqlite::Error) -> CoreError {
    CoreError::Storage(format!("쿼리 실패: {e}"))
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<Option<String>, CoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(query_error)?;

        let previous: Option<String> = tx
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_error)?;
        tx.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )
        .map_err(query_error)?;

        tx.commit().map_err(query_error)?;
        Ok(previous)
    }

    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])
            .map_err(query_error)?;
        Ok(deleted > 0)
    }

    fn clear(&self) -> Result<usize, CoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM local_storage", [])
            .map_err(query_error)
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key FROM local_storage ORDER BY key")
            .map_err(query_error)?;
        let keys = stmt
            .query_map([], |row| row.get(0))
            .map_err(query_error)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(query_error)?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("local_storage.db");

        {
            let backend = SqliteBackend::open(&path).unwrap();
            assert_eq!(backend.set("appSettings", r#"{"theme":"dark"}"#).unwrap(), None);
            assert_eq!(
                backend
                    .set("appSettings", r#"{"theme":"auto"}"#)
                    .unwrap()
                    .as_deref(),
                Some(r#"{"theme":"dark"}"#)
            );
        }

        let backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(
            backend.get("appSettings").unwrap().as_deref(),
            Some(r#"{"theme":"auto"}"#)
        );
    }

    #[test]
    fn remove_and_clear_report_counts() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.set("a", "1").unwrap();
        backend.set("b", "2").unwrap();

        assert!(backend.remove("a").unwrap());
        assert!(!backend.remove("a").unwrap());
        assert_eq!(backend.clear().unwrap(), 1);
        assert!(backend.keys().unwrap().is_empty());
    }
}
