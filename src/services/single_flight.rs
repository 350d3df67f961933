//! 같은 작업의 중복 제출 막기
//!
//! 키(예: `comment:{user}:{project}`)가 처리 중이면 두 번째 요청은 가드를 얻지 못합니다.
//! 가드가 drop되면 키가 풀려 다음 제출을 받을 수 있습니다.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키가 비어 있으면 점유하고 가드를 돌려줍니다. 이미 처리 중이면 `None`.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !keys.insert(key.clone()) {
            tracing::debug!("Duplicate submission rejected: {}", key);
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    #[cfg(test)]
    fn is_busy(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}

pub fn comment_key(user_id: &str, project_id: &str) -> String {
    format!("comment:{user_id}:{project_id}")
}

pub fn project_update_key(user_id: &str, project_id: &str) -> String {
    format!("project-update:{user_id}:{project_id}")
}
