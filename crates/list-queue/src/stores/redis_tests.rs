//! Tests for the Redis store. Command mapping and configuration are covered
//! without a server; lifecycle tests against a live instance are `#[ignore]`d.

use super::*;

fn args(options: SetOptions) -> Vec<Vec<u8>> {
    options.to_redis_args()
}

#[test]
fn connection_info_maps_plain_tcp() {
    let config = RedisConfig::new("cache.internal").with_port(6380);

    let info = connection_info(&config);

    match info.addr {
        ConnectionAddr::Tcp(host, port) => {
            assert_eq!(host, "cache.internal");
            assert_eq!(port, 6380);
        }
        other => panic!("expected a plain TCP address, got {other:?}"),
    }
    assert_eq!(info.redis.db, 0);
    assert_eq!(info.redis.username, None);
    assert_eq!(info.redis.password, None);
}

#[test]
fn connection_info_maps_tls_and_credentials() {
    let config = RedisConfig::new("cache.internal")
        .with_tls()
        .with_database(3)
        .with_credentials("worker", "secret");

    let info = connection_info(&config);

    match info.addr {
        ConnectionAddr::TcpTls {
            host,
            port,
            insecure,
            ..
        } => {
            assert_eq!(host, "cache.internal");
            assert_eq!(port, 6379);
            assert!(!insecure);
        }
        other => panic!("expected a TLS address, got {other:?}"),
    }
    assert_eq!(info.redis.db, 3);
    assert_eq!(info.redis.username.as_deref(), Some("worker"));
    assert_eq!(info.redis.password.as_deref(), Some("secret"));
}

#[test]
fn connect_rejects_an_empty_host() {
    let config = RedisConfig::new("");

    let err = RedisStore::from_config(&config).expect_err("empty host must fail");

    assert_eq!(
        err.message(),
        "cannot create Redis client: no host supplied"
    );
}

#[test]
fn connect_performs_no_io() {
    // The host does not exist; building the store must still succeed because
    // the connection is only made on first use.
    let config = RedisConfig::new("host.invalid");

    RedisStore::from_config(&config).expect("lazy construction");
}

#[test]
fn set_options_render_no_args_by_default() {
    assert!(args(SetOptions::new()).is_empty());
}

#[test]
fn set_options_render_expiry_modifiers() {
    assert_eq!(
        args(SetOptions::new().with_expiry(Expiry::Seconds(30))),
        vec![b"EX".to_vec(), b"30".to_vec()]
    );
    assert_eq!(
        args(SetOptions::new().with_expiry(Expiry::Milliseconds(1500))),
        vec![b"PX".to_vec(), b"1500".to_vec()]
    );
}

#[test]
fn set_options_render_conditions_and_keep_ttl() {
    assert_eq!(
        args(SetOptions::new().with_condition(SetCondition::IfNotExists)),
        vec![b"NX".to_vec()]
    );
    assert_eq!(
        args(SetOptions::new().with_condition(SetCondition::IfExists)),
        vec![b"XX".to_vec()]
    );
    assert_eq!(
        args(
            SetOptions::new()
                .with_keep_ttl()
                .with_condition(SetCondition::IfExists)
        ),
        vec![b"KEEPTTL".to_vec(), b"XX".to_vec()]
    );
}

#[test]
fn set_options_render_combined_modifiers_in_command_order() {
    let options = SetOptions::new()
        .with_expiry(Expiry::Seconds(60))
        .with_condition(SetCondition::IfNotExists);

    assert_eq!(
        args(options),
        vec![b"EX".to_vec(), b"60".to_vec(), b"NX".to_vec()]
    );
}

// ============================================================================
// Live-server tests
// ============================================================================

fn live_store() -> RedisStore {
    let config = RedisConfig::new("127.0.0.1");
    RedisStore::from_config(&config).expect("store")
}

#[tokio::test]
#[ignore = "requires a running Redis server on 127.0.0.1:6379"]
async fn live_list_roundtrip() {
    let store = live_store();
    let key = "list-queue:test:roundtrip";
    store.delete(key).await.expect("reset");

    store.push_back(key, "a").await.expect("push");
    store.push_back(key, "b").await.expect("push");
    store.push_front(key, "urgent").await.expect("push");
    assert_eq!(store.len(key).await.expect("len"), 3);

    let popped = store
        .pop_front(key, Duration::from_secs(1))
        .await
        .expect("pop");
    assert_eq!(popped, Some((key.to_string(), "urgent".to_string())));

    store.delete(key).await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a running Redis server on 127.0.0.1:6379"]
async fn live_pop_times_out_on_an_empty_list() {
    let store = live_store();
    let key = "list-queue:test:empty";
    store.delete(key).await.expect("reset");

    let popped = store
        .pop_front(key, Duration::from_millis(100))
        .await
        .expect("pop");

    assert_eq!(popped, None);
}

#[tokio::test]
#[ignore = "requires a running Redis server on 127.0.0.1:6379"]
async fn live_conditional_set() {
    let store = live_store();
    let key = "list-queue:test:flag";
    store.delete(key).await.expect("reset");

    let if_absent = SetOptions::new().with_condition(SetCondition::IfNotExists);
    assert!(store.set(key, "1", if_absent).await.expect("set"));
    assert!(!store.set(key, "2", if_absent).await.expect("set"));
    assert_eq!(store.get(key).await.expect("get"), Some("1".to_string()));

    store.delete(key).await.expect("cleanup");
}
