//! # Link Flow Through the Runtime
//!
//! ```text
//! link_account ──→ UserAccountService ──ApprovalRequested──→ Event Bus
//!                                                               │
//!                                   ApprovalHandler ←───────────┘
//!                                         │
//!                                         ↓
//!                              RecordingTransactionQueue
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use account_runtime::adapters::RecordingTransactionQueue;
    use account_runtime::AccountRuntime;
    use shared_bus::{AccountEvent, EventFilter, EventTopic};
    use td_02_user_accounts::AccountError;

    use crate::integration::fixtures::{container, link_body, Wallet};

    fn started() -> (AccountRuntime, Arc<RecordingTransactionQueue>) {
        let queue = Arc::new(RecordingTransactionQueue::new());
        let runtime = AccountRuntime::new(container(), queue.clone());
        runtime.start();
        (runtime, queue)
    }

    async fn wait_for(queue: &RecordingTransactionQueue, count: usize) {
        timeout(Duration::from_secs(2), async {
            while queue.submitted().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("approvals reached the transaction queue");
    }

    #[tokio::test]
    async fn test_first_link_creates_user_and_queues_approval() {
        let (runtime, queue) = started();
        let accounts = Arc::clone(&runtime.container().accounts);
        let mut linked = runtime
            .container()
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Accounts]));
        let wallet = Wallet::random();

        let user = accounts
            .link_account(&link_body(&wallet.address, &wallet.sign_login(), "1001"))
            .await
            .unwrap();

        assert_eq!(user.address, wallet.address);
        assert_eq!(user.twitter_id.as_deref(), Some("1001"));
        assert_eq!(accounts.read(&wallet.address).await, Some(user.clone()));

        wait_for(&queue, 1).await;
        assert_eq!(queue.submitted()[0].user, user);

        match linked.recv().await {
            Some(AccountEvent::AccountLinked { user: event_user }) => assert_eq!(event_user, user),
            other => panic!("expected AccountLinked, got {other:?}"),
        }

        let stats = runtime.shutdown().await.unwrap();
        assert_eq!(stats.forwarded, 1);
    }

    #[tokio::test]
    async fn test_relink_updates_existing_user() {
        let (runtime, queue) = started();
        let accounts = Arc::clone(&runtime.container().accounts);
        let wallet = Wallet::random();
        let signature = wallet.sign_login();

        let first = accounts
            .link_account(&link_body(&wallet.address, &signature, "1001"))
            .await
            .unwrap();
        let second = accounts
            .link_account(&link_body(&wallet.address, &signature, "2002"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.twitter_id.as_deref(), Some("2002"));
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(accounts.read_by_twitter_id("1001").await, None);

        wait_for(&queue, 2).await;
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_same_owner_may_link_again() {
        let (runtime, queue) = started();
        let accounts = Arc::clone(&runtime.container().accounts);
        let wallet = Wallet::random();
        let body = link_body(&wallet.address, &wallet.sign_login(), "1001");

        let first = accounts.link_account(&body).await.unwrap();
        let again = accounts.link_account(&body).await.unwrap();

        assert_eq!(again.id, first.id);
        wait_for(&queue, 2).await;
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_twitter_account_owned_elsewhere_conflicts() {
        let (runtime, queue) = started();
        let accounts = Arc::clone(&runtime.container().accounts);
        let alice = Wallet::random();
        let bob = Wallet::random();

        let owner = accounts
            .link_account(&link_body(&alice.address, &alice.sign_login(), "1001"))
            .await
            .unwrap();
        wait_for(&queue, 1).await;

        let err = accounts
            .link_account(&link_body(&bob.address, &bob.sign_login(), "1001"))
            .await
            .unwrap_err();

        assert_eq!(err, AccountError::AlreadyLinked);
        assert_eq!(err.http_status(), 409);
        assert_eq!(accounts.read(&bob.address).await, None);
        assert_eq!(accounts.read_by_twitter_id("1001").await, Some(owner));

        let stats = runtime.shutdown().await.unwrap();
        assert_eq!(stats.forwarded, 1);
        assert_eq!(queue.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_approvals_before_start_are_lost() {
        let queue = Arc::new(RecordingTransactionQueue::new());
        let runtime = AccountRuntime::new(container(), queue.clone());
        let accounts = Arc::clone(&runtime.container().accounts);
        let early = Wallet::random();
        let late = Wallet::random();

        accounts
            .link_account(&link_body(&early.address, &early.sign_login(), "1"))
            .await
            .unwrap();

        runtime.start();
        let late_user = accounts
            .link_account(&link_body(&late.address, &late.sign_login(), "2"))
            .await
            .unwrap();

        wait_for(&queue, 1).await;
        runtime.shutdown().await;

        let submitted = queue.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].user, late_user);
    }
}
