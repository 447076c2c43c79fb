//! # Account Service Guarantees
//!
//! Each test states one guarantee of the wired service: real TD-01 recovery,
//! key-value repository, metered decorators and event bus.

#[cfg(test)]
mod tests {
    use shared_bus::{AccountEvent, EventFilter, EventTopic};
    use shared_types::{User, UserId};
    use td_01_signature_verification::domain::ecdsa::invert_s;
    use td_01_signature_verification::{encode_signature, parse_signature};
    use td_02_user_accounts::{AccountError, NewUser, UserPatch, USER_NOT_CREATED, USER_NOT_UPDATED};

    use crate::integration::fixtures::{container, flip_byte, link_body, Wallet};

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    #[tokio::test]
    async fn test_own_signature_is_valid() {
        let container = container();
        for _ in 0..8 {
            let wallet = Wallet::random();
            assert!(
                container
                    .accounts
                    .is_signature_valid(&wallet.address, &wallet.sign_login())
                    .await
            );
        }
    }

    #[tokio::test]
    async fn test_foreign_or_broken_signature_is_invalid() {
        let container = container();
        let alice = Wallet::random();
        let mallory = Wallet::random();
        let genuine = alice.sign_login();

        let candidates = [
            mallory.sign_login(),
            alice.sign("Trustdrops logout"),
            flip_byte(&genuine, 10),
            flip_byte(&genuine, 50),
            genuine[..genuine.len() - 4].to_string(),
            genuine[2..].to_string(),
            String::new(),
            "not a signature".to_string(),
        ];

        for signature in candidates {
            assert!(
                !container
                    .accounts
                    .is_signature_valid(&alice.address, &signature)
                    .await,
                "accepted {signature:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_high_s_signature_is_invalid() {
        let container = container();
        let wallet = Wallet::random();
        let mut signature = parse_signature(&wallet.sign_login()).unwrap();
        signature.s = invert_s(&signature.s);
        signature.v = if signature.v == 27 { 28 } else { 27 };

        assert!(
            !container
                .accounts
                .is_signature_valid(&wallet.address, &encode_signature(&signature))
                .await
        );
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    #[tokio::test]
    async fn test_create_then_read() {
        let container = container();
        let wallet = Wallet::random();

        let created = container
            .accounts
            .create(NewUser::new(&wallet.address))
            .await
            .unwrap();
        let read = container.accounts.read(&wallet.address).await.unwrap();

        assert_eq!(read.address, wallet.address);
        assert_eq!(read, created);
        assert_eq!(
            container.accounts.read_by_id(&created.id.to_string()).await,
            Some(created)
        );
    }

    #[tokio::test]
    async fn test_update_then_read_by_twitter_id() {
        let container = container();
        let user = container
            .accounts
            .create(NewUser::new("0xA11ce"))
            .await
            .unwrap();

        let updated = container
            .accounts
            .update(&user, UserPatch::twitter_id("4242"))
            .await
            .unwrap();
        assert!(updated);

        let found = container.accounts.read_by_twitter_id("4242").await.unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.twitter_id.as_deref(), Some("4242"));
    }

    #[tokio::test]
    async fn test_missing_records_are_absent() {
        let container = container();
        assert_eq!(container.accounts.read("0xNobody").await, None);
        assert_eq!(container.accounts.read_by_twitter_id("0").await, None);
        assert_eq!(
            container.accounts.read_by_id(&UserId::new().to_string()).await,
            None
        );
        assert_eq!(container.accounts.read_by_id("not-a-uuid").await, None);
    }

    #[tokio::test]
    async fn test_update_of_missing_user_fails_cleanly() {
        let container = container();
        let existing = container
            .accounts
            .create(NewUser::new("0xA11ce").with_twitter_id("1"))
            .await
            .unwrap();
        let ghost = User {
            id: UserId::new(),
            address: "0xDead".into(),
            twitter_id: None,
            created_at: 0,
            updated_at: 0,
        };

        let err = container
            .accounts
            .update(&ghost, UserPatch::twitter_id("2"))
            .await
            .unwrap_err();

        assert_eq!(err, AccountError::validation(USER_NOT_UPDATED));
        assert_eq!(err.http_status(), 400);
        assert_eq!(container.accounts.read("0xA11ce").await, Some(existing));
        assert_eq!(container.accounts.read("0xDead").await, None);
    }

    #[tokio::test]
    async fn test_duplicate_address_keeps_original() {
        let container = container();
        let original = container
            .accounts
            .create(NewUser::new("0xA11ce").with_twitter_id("1"))
            .await
            .unwrap();

        let err = container
            .accounts
            .create(NewUser::new("0xA11ce").with_twitter_id("2"))
            .await
            .unwrap_err();

        assert_eq!(err, AccountError::validation(USER_NOT_CREATED));
        assert_eq!(container.accounts.read("0xA11ce").await, Some(original));
        assert_eq!(container.accounts.read_by_twitter_id("2").await, None);
    }

    #[tokio::test]
    async fn test_twitter_id_of_another_user_is_refused() {
        let container = container();
        let alice = container
            .accounts
            .create(NewUser::new("0xA11ce").with_twitter_id("1"))
            .await
            .unwrap();
        let bob = container
            .accounts
            .create(NewUser::new("0xB0b").with_twitter_id("2"))
            .await
            .unwrap();

        let err = container
            .accounts
            .update(&bob, UserPatch::twitter_id("1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Validation { .. }));
        assert_eq!(container.accounts.read("0xA11ce").await, Some(alice.clone()));
        assert_eq!(container.accounts.read("0xB0b").await, Some(bob));
        assert_eq!(container.accounts.read_by_twitter_id("1").await, Some(alice));
    }

    // =========================================================================
    // APPROVALS
    // =========================================================================

    #[tokio::test]
    async fn test_one_event_per_queue_approval() {
        let container = container();
        let user = container
            .accounts
            .create(NewUser::new("0xA11ce"))
            .await
            .unwrap();
        let mut approvals = container
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Approvals]));

        container.accounts.queue_approval(&user).await;
        container.accounts.queue_approval(&user).await;

        let mut request_ids = Vec::new();
        while let Some(event) = approvals.try_recv().unwrap() {
            match event {
                AccountEvent::ApprovalRequested {
                    request_id,
                    user: approved,
                    ..
                } => {
                    assert_eq!(approved, user);
                    request_ids.push(request_id);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(request_ids.len(), 2);
        assert_ne!(request_ids[0], request_ids[1]);
    }

    #[tokio::test]
    async fn test_queue_approval_returns_without_subscriber() {
        let container = container();
        let user = container
            .accounts
            .create(NewUser::new("0xA11ce"))
            .await
            .unwrap();
        let dropped = container.event_bus.events_dropped();

        container.accounts.queue_approval(&user).await;

        assert_eq!(container.event_bus.events_dropped(), dropped + 1);
    }

    // =========================================================================
    // REQUEST VALIDATION
    // =========================================================================

    #[tokio::test]
    async fn test_link_request_validation_messages() {
        let container = container();
        let cases = [
            (
                serde_json::json!({ "signature": "0x1", "userId": "1" }),
                "\"address\" is required",
            ),
            (
                serde_json::json!({ "address": 7, "signature": "0x1", "userId": "1" }),
                "\"address\" must be a string",
            ),
            (
                serde_json::json!({ "address": "0xA", "signature": "", "userId": "1" }),
                "\"signature\" is not allowed to be empty",
            ),
            (
                serde_json::json!({ "address": "0xA", "signature": "0x1", "userId": "1", "extra": true }),
                "\"extra\" is not allowed",
            ),
            (
                serde_json::json!(["address"]),
                "\"value\" must be of type object",
            ),
        ];

        for (body, message) in cases {
            let err = container.accounts.link_account(&body).await.unwrap_err();
            assert_eq!(err, AccountError::validation(message), "body {body}");
        }
    }

    #[tokio::test]
    async fn test_link_with_wrong_signature_is_unauthorized() {
        let container = container();
        let alice = Wallet::random();
        let mallory = Wallet::random();

        let err = container
            .accounts
            .link_account(&link_body(&alice.address, &mallory.sign_login(), "1"))
            .await
            .unwrap_err();

        assert_eq!(err, AccountError::InvalidSignature);
        assert_eq!(err.http_status(), 401);
        assert_eq!(container.accounts.read(&alice.address).await, None);
    }
}
