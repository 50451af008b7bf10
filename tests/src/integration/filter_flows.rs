//! # Filter Flows
//!
//! End-to-end `exist` / `set` behaviour against the in-memory store:
//!
//! 1. Fresh bitmaps answer `false`
//! 2. Every value that was `set` answers `true` (no false negatives)
//! 3. Values with disjoint offsets do not influence each other
//! 4. Filters built independently over one store agree on positions

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bitmap_bloom::{
        BitVectorStore, EncoderKind, FilterConfigBuilder, InMemoryBitStore, MembershipFilter,
        MembershipFilterApi, Murmur3Encoder, ScriptInvocation, ScriptKind,
    };

    use crate::integration::{memory_filter, table_encoder};

    // =========================================================================
    // WORKED EXAMPLE: m=64, k=3, foo -> [5, 19, 40]
    // =========================================================================

    #[tokio::test]
    async fn test_worked_example() {
        let filter = memory_filter(64, 3, table_encoder(&[("foo", 5), ("5", 19), ("19", 40)], 63));

        assert_eq!(filter.offsets_for("foo").unwrap().as_slice(), &[5, 19, 40]);

        filter.set("bloom", "foo").await.unwrap();
        assert!(filter.exist("bloom", "foo").await.unwrap());

        let store = filter.store();
        for offset in [5, 19, 40] {
            assert!(store.get_bit("bloom", offset).await.unwrap());
        }
        assert_eq!(store.count_ones("bloom").await, 3);

        // A value landing on [5, 19, 41] shares two bits but is still absent
        let check = ScriptInvocation::new(ScriptKind::CheckAllSet, "bloom", vec![5, 19, 41]);
        assert_eq!(store.atomic_eval(&check).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shared_prefix_value_is_absent() {
        // "bar" joins the chain of "foo" at 19 and runs past it to 41
        let encoder = table_encoder(&[("foo", 5), ("5", 19), ("19", 40), ("bar", 19)], 41);
        let filter = memory_filter(64, 3, encoder);

        filter.set("bloom", "foo").await.unwrap();

        assert_eq!(filter.offsets_for("bar").unwrap().as_slice(), &[19, 40, 41]);
        assert!(!filter.exist("bloom", "bar").await.unwrap());
    }

    // =========================================================================
    // MEMBERSHIP PROPERTIES
    // =========================================================================

    #[tokio::test]
    async fn test_fresh_bitmap_is_empty() {
        let filter = memory_filter(1 << 16, 5, Arc::new(Murmur3Encoder::new(0)));

        for i in 0..100 {
            let value = format!("never-added-{}", i);
            assert!(!filter.exist("fresh", &value).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_no_false_negatives() {
        let filter = memory_filter(1 << 14, 4, Arc::new(Murmur3Encoder::new(17)));

        let values: Vec<String> = (0..1_000).map(|i| format!("user-{}@example.com", i)).collect();
        for value in &values {
            filter.set("emails", value).await.unwrap();
        }

        for value in &values {
            assert!(
                filter.exist("emails", value).await.unwrap(),
                "Inserted value {} must be reported present",
                value
            );
        }
    }

    #[tokio::test]
    async fn test_disjoint_values_independent() {
        let encoder = table_encoder(
            &[("a", 1), ("1", 2), ("2", 3), ("b", 10), ("10", 11), ("11", 12)],
            0,
        );
        let filter = memory_filter(64, 3, encoder);

        assert!(!filter.exist("bloom", "b").await.unwrap());
        filter.set("bloom", "a").await.unwrap();
        assert!(!filter.exist("bloom", "b").await.unwrap());
        assert!(filter.exist("bloom", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_is_idempotent() {
        let filter = memory_filter(1024, 3, Arc::new(Murmur3Encoder::new(1)));

        filter.set("bloom", "value").await.unwrap();
        let after_first = filter.store().raw_bytes("bloom").await;
        filter.set("bloom", "value").await.unwrap();

        assert_eq!(filter.store().raw_bytes("bloom").await, after_first);
    }

    #[tokio::test]
    async fn test_false_positive_rate_is_plausible() {
        // n=500 in m=8192 with k=4 gives an expected rate near 0.2%
        let filter = memory_filter(8192, 4, Arc::new(Murmur3Encoder::new(5)));
        for i in 0..500 {
            filter.set("fpr", &format!("member-{}", i)).await.unwrap();
        }

        let mut positives = 0;
        for i in 0..2_000 {
            if filter.exist("fpr", &format!("outsider-{}", i)).await.unwrap() {
                positives += 1;
            }
        }
        assert!(positives < 100, "Too many false positives: {}", positives);
    }

    // =========================================================================
    // SHARED STORE
    // =========================================================================

    #[tokio::test]
    async fn test_filters_share_store_across_instances() {
        let store = Arc::new(InMemoryBitStore::new());
        let config = FilterConfigBuilder::new()
            .size_bits(1 << 12)
            .hash_count(5)
            .encoder(EncoderKind::Siphash { key0: 7, key1: 11 })
            .build()
            .unwrap();

        // Two independently constructed filters stand in for two processes
        let writer = MembershipFilter::new(&config, store.clone()).unwrap();
        let reader = MembershipFilter::new(&config, store.clone()).unwrap();

        writer.set("sessions", "token-abc").await.unwrap();
        assert!(reader.exist("sessions", "token-abc").await.unwrap());
        assert_eq!(
            writer.offsets_for("token-abc").unwrap(),
            reader.offsets_for("token-abc").unwrap()
        );
    }

    #[tokio::test]
    async fn test_keys_hold_separate_bitmaps() {
        let store = Arc::new(InMemoryBitStore::new());
        let config = FilterConfigBuilder::new().size_bits(256).hash_count(3).build().unwrap();
        let filter = MembershipFilter::new(&config, store.clone()).unwrap();

        filter.set("tenant:a", "shared-value").await.unwrap();

        assert!(filter.exist("tenant:a", "shared-value").await.unwrap());
        assert!(!filter.exist("tenant:b", "shared-value").await.unwrap());
        assert_eq!(store.count_ones("tenant:b").await, 0);
    }

    #[tokio::test]
    async fn test_different_encoders_disagree() {
        let store = Arc::new(InMemoryBitStore::new());
        let murmur = MembershipFilter::new(
            &FilterConfigBuilder::new()
                .size_bits(1 << 20)
                .hash_count(3)
                .encoder(EncoderKind::Murmur3 { seed: 0 })
                .build()
                .unwrap(),
            store.clone(),
        )
        .unwrap();
        let sha = MembershipFilter::new(
            &FilterConfigBuilder::new()
                .size_bits(1 << 20)
                .hash_count(3)
                .encoder(EncoderKind::Sha256)
                .build()
                .unwrap(),
            store.clone(),
        )
        .unwrap();

        murmur.set("bloom", "value").await.unwrap();
        assert!(!sha.exist("bloom", "value").await.unwrap());
    }
}
