//! # 실시간 댓글 허브
//!
//! 댓글이 추가/삭제될 때마다 `CommentEvent`를 broadcast 채널로 퍼뜨립니다.
//! 프로젝트 상세 화면의 SSE 연결(`routes::comments::stream_comments`)이
//! `subscribe`로 받은 `Subscription`에서 자기 프로젝트 이벤트만 꺼내 씁니다.
//!
//! `Subscription`을 drop하면 수신기가 해제되므로, 클라이언트 연결이 끊기면
//! 구독도 함께 정리됩니다.

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::models::Comment;

/// 채널 버퍼 크기. 가득 차면 느린 구독자는 오래된 이벤트를 건너뜁니다.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentEvent {
    Added { comment: Comment },
    Deleted { project_id: String, comment_id: String },
}

impl CommentEvent {
    pub fn project_id(&self) -> &str {
        match self {
            CommentEvent::Added { comment } => &comment.project_id,
            CommentEvent::Deleted { project_id, .. } => project_id,
        }
    }

    /// SSE `event:` 이름
    pub fn kind(&self) -> &'static str {
        match self {
            CommentEvent::Added { .. } => "comment_added",
            CommentEvent::Deleted { .. } => "comment_deleted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentHub {
    sender: broadcast::Sender<CommentEvent>,
}

impl CommentHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 구독자가 없으면 이벤트는 그냥 버려집니다.
    pub fn publish(&self, event: CommentEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self, project_id: impl Into<String>) -> Subscription {
        let project_id = project_id.into();
        let receiver = self.sender.subscribe();
        tracing::debug!(
            "Comment subscription opened: project={}, subscribers={}",
            project_id,
            self.subscriber_count()
        );
        Subscription {
            project_id,
            receiver,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CommentHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// 한 프로젝트의 댓글 이벤트 구독
#[derive(Debug)]
pub struct Subscription {
    project_id: String,
    receiver: broadcast::Receiver<CommentEvent>,
}

impl Subscription {
    /// 다음 이벤트를 기다립니다. 허브가 닫히면 `None`.
    pub async fn next(&mut self) -> Option<CommentEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.project_id() == self.project_id => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Comment subscriber lagged: project={}, skipped={}",
                        self.project_id,
                        skipped
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!("Comment subscription closed: project={}", self.project_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn comment(id: &str, project_id: &str) -> Comment {
        Comment {
            id: id.into(),
            project_id: project_id.into(),
            user_id: "u1".into(),
            user_email: "u1@example.com".into(),
            content: "확인".into(),
            created_at: "2024-03-01T00:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn subscriber_only_sees_its_project() {
        let hub = CommentHub::default();
        let mut sub = hub.subscribe("p1");

        hub.publish(CommentEvent::Added { comment: comment("c1", "p2") });
        hub.publish(CommentEvent::Added { comment: comment("c2", "p1") });

        let event = sub.next().await.unwrap();
        assert_eq!(event, CommentEvent::Added { comment: comment("c2", "p1") });
    }

    #[tokio::test]
    async fn delete_event_is_delivered() {
        let hub = CommentHub::default();
        let mut sub = hub.subscribe("p1");

        hub.publish(CommentEvent::Deleted {
            project_id: "p1".into(),
            comment_id: "c9".into(),
        });

        let event = sub.next().await.unwrap();
        assert_eq!(event.kind(), "comment_deleted");
        assert_eq!(event.project_id(), "p1");
    }

    #[tokio::test]
    async fn dropping_subscription_releases_receiver() {
        let hub = CommentHub::default();
        let sub = hub.subscribe("p1");
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn lagged_subscriber_keeps_receiving() {
        let hub = CommentHub::new(2);
        let mut sub = hub.subscribe("p1");

        for i in 0..5 {
            hub.publish(CommentEvent::Added { comment: comment(&format!("c{i}"), "p1") });
        }

        let event = tokio::time::timeout(Duration::from_secs(1), sub.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, CommentEvent::Added { comment: comment("c3", "p1") });
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let hub = CommentHub::default();
        hub.publish(CommentEvent::Added { comment: comment("c1", "p1") });
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let value = serde_json::to_value(CommentEvent::Deleted {
            project_id: "p1".into(),
            comment_id: "c1".into(),
        })
        .unwrap();
        assert_eq!(value["type"], "deleted");
        assert_eq!(value["comment_id"], "c1");
    }
}
