//! 탭 간 공유 저장 영역.
//!
//! `StorageArea`는 한 출처의 영구 저장소 전체를, `TabStorage`는 그 영역에 대한
//! 탭 하나의 핸들을 나타낸다. 핸들을 통한 변경은 영역의 모든 구독자에게
//! `StorageChange`로 브로드캐스트된다. 값이 실제로 바뀐 경우에만 알린다.

use fruitscan_core::error::CoreError;
use fruitscan_core::ports::storage::{KeyValueStore, StorageChange};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::sqlite::SqliteBackend;

/// 변경 알림 채널 용량
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// 저장 백엔드
pub(crate) trait Backend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    /// 값을 쓰고 덮어쓴 이전 값을 반환 (읽기와 쓰기는 하나의 원자적 연산)
    fn set(&self, key: &str, value: &str) -> Result<Option<String>, CoreError>;
    fn remove(&self, key: &str) -> Result<bool, CoreError>;
    fn clear(&self) -> Result<usize, CoreError>;
    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

/// 인메모리 백엔드 (테스트, 세션 저장소)
#[derive(Default)]
struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().insert(key.to_string(), value.to_string()))
    }

    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn clear(&self) -> Result<usize, CoreError> {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        Ok(count)
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}

/// 출처 단위 저장 영역
#[derive(Clone)]
pub struct StorageArea {
    backend: Arc<dyn Backend>,
    tx: broadcast::Sender<StorageChange>,
    /// 변경과 알림 전송을 한 단위로 직렬화 (알림 순서 = 쓰기 순서)
    writes: Arc<Mutex<()>>,
}

impl StorageArea {
    fn with_backend(backend: Arc<dyn Backend>) -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            backend,
            tx,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// 인메모리 저장 영역
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::default()))
    }

    /// 파일 기반 SQLite 저장 영역
    pub fn open_sqlite(path: &Path) -> Result<Self, CoreError> {
        Ok(Self::with_backend(Arc::new(SqliteBackend::open(path)?)))
    }

    /// 인메모리 SQLite 저장 영역 (테스트용)
    pub fn open_sqlite_in_memory() -> Result<Self, CoreError> {
        Ok(Self::with_backend(Arc::new(SqliteBackend::open_in_memory()?)))
    }

    /// 새 탭 핸들 생성
    pub fn tab(&self) -> TabStorage {
        let origin = Uuid::new_v4();
        debug!("저장소 탭 핸들 생성: {origin}");
        TabStorage {
            area: self.clone(),
            origin,
        }
    }

    fn notify(&self, change: StorageChange) {
        // 구독자가 없으면 전송 실패: 무시
        let _ = self.tx.send(change);
    }
}

/// 탭 하나의 저장소 핸들: `KeyValueStore` 포트 구현
#[derive(Clone)]
pub struct TabStorage {
    area: StorageArea,
    origin: Uuid,
}

impl KeyValueStore for TabStorage {
    fn origin(&self) -> Uuid {
        self.origin
    }

    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.area.backend.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let _write = self.area.writes.lock();
        let previous = self.area.backend.set(key, value)?;

        if previous.as_deref() != Some(value) {
            self.area.notify(StorageChange {
                key: Some(key.to_string()),
                new_value: Some(value.to_string()),
                origin: self.origin,
            });
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let _write = self.area.writes.lock();
        if self.area.backend.remove(key)? {
            self.area.notify(StorageChange {
                key: Some(key.to_string()),
                new_value: None,
                origin: self.origin,
            });
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let _write = self.area.writes.lock();
        let removed = self.area.backend.clear()?;
        debug!("저장소 전체 삭제: {removed}개 키");
        if removed > 0 {
            self.area.notify(StorageChange {
                key: None,
                new_value: None,
                origin: self.origin,
            });
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        self.area.backend.keys()
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.area.tx.subscribe()
    }
}
