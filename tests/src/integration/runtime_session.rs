//! # Runtime Session
//!
//! Drives the line-command loop of `bloom-runtime` the way the binary does:
//! configuration from variables, a filter over a shared store, and one reply
//! line per command.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bitmap_bloom::{InMemoryBitStore, MembershipFilter, MembershipFilterApi, Metrics};
    use bloom_runtime::{serve, RuntimeConfig};

    fn runtime_config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        RuntimeConfig::from_lookup(move |name: &str| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .unwrap()
    }

    async fn run_session(
        filter: &MembershipFilter<InMemoryBitStore>,
        metrics: &Metrics,
        script: &str,
    ) -> Vec<String> {
        let mut output = Vec::new();
        serve(filter, metrics, script.as_bytes(), &mut output)
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_session_over_configured_filter() {
        let config = runtime_config(&[
            ("BLOOM_SIZE_BITS", "4096"),
            ("BLOOM_HASH_COUNT", "5"),
            ("BLOOM_ENCODER", "sha256"),
        ]);
        let metrics = Arc::new(Metrics::new());
        let filter = MembershipFilter::new(&config.filter, Arc::new(InMemoryBitStore::new()))
            .unwrap()
            .with_metrics(metrics.clone());

        let replies = run_session(
            &filter,
            &metrics,
            "EXIST emails alice@example.com\n\
             SET emails alice@example.com\n\
             EXISTS emails alice@example.com\n\
             EXIST emails bob@example.com\n\
             OFFSETS alice@example.com\n\
             STATS\n",
        )
        .await;

        assert_eq!(replies.len(), 6);
        assert_eq!(&replies[..4], &["0", "OK", "1", "0"]);

        let offsets: Vec<u64> = replies[4]
            .split(' ')
            .map(|offset| offset.parse().unwrap())
            .collect();
        let expected = filter.offsets_for("alice@example.com").unwrap();
        assert_eq!(offsets, expected.into_vec());
        assert!(offsets.iter().all(|&offset| offset < 4096));

        assert!(replies[5].contains(r#""sets_performed":1"#));
        assert!(replies[5].contains(r#""exists_performed":3"#));
    }

    #[tokio::test]
    async fn test_sessions_share_one_store() {
        let config = runtime_config(&[("BLOOM_SIZE_BITS", "1024")]);
        let store = Arc::new(InMemoryBitStore::new());
        let metrics = Metrics::new();

        let first = MembershipFilter::new(&config.filter, store.clone()).unwrap();
        let second = MembershipFilter::new(&config.filter, store.clone()).unwrap();

        let written = run_session(&first, &metrics, "SET tenants acme corp\n").await;
        let read = run_session(&second, &metrics, "EXIST tenants acme corp\n").await;

        assert_eq!(written, vec!["OK"]);
        assert_eq!(read, vec!["1"]);
    }

    #[tokio::test]
    async fn test_errors_become_reply_lines() {
        let config = runtime_config(&[]);
        let metrics = Metrics::new();
        let store = Arc::new(InMemoryBitStore::new());
        let filter = MembershipFilter::new(&config.filter, store).unwrap();

        let replies = run_session(&filter, &metrics, "SET onlykey\nFLUSH all\nSTATS\n").await;

        assert_eq!(replies.len(), 3);
        assert!(replies[0].starts_with("ERR usage"));
        assert_eq!(replies[1], "ERR unknown command: FLUSH");
        assert!(replies[2].starts_with('{'));
    }
}
