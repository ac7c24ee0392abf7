use roaring_bitmap::Bitmap;

#[test]
fn intermediate_extend_consecutive_basic() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..1000);

    assert_eq!(bm.len(), 1000);
    for i in 0..1000 {
        assert!(bm.contains(i), "Should contain {}", i);
    }

    // Below the positive/dense threshold, a consecutive run is still a positive array.
    let stats = bm.container_stats();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].1, "Positive");
}

#[test]
fn intermediate_extend_consecutive_large() {
    let mut bm = Bitmap::new();

    // Insert 1 million consecutive values
    bm.extend_consecutive(0..1_000_000);

    assert_eq!(bm.len(), 1_000_000);

    // Full containers in the middle of the range land above the inverted-array
    // threshold with zero absent values, so they cost almost nothing; only the
    // trailing partial container pays for a dense bitmap's fixed 8KB.
    let memory = bm.memory_usage();
    println!("Memory for 1M consecutive values: {} bytes", memory);
    assert!(
        memory < 20_000,
        "Should stay compact for 1M consecutive values, got {}",
        memory
    );

    assert!(bm.contains(0));
    assert!(bm.contains(500_000));
    assert!(bm.contains(999_999));
    assert!(!bm.contains(1_000_000));
}

#[test]
fn intermediate_extend_consecutive_multiple_ranges() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..100);
    bm.extend_consecutive(1000..2000);
    bm.extend_consecutive(100_000..101_000);

    assert_eq!(bm.len(), 100 + 1000 + 1000);

    for i in 0..100 {
        assert!(bm.contains(i));
    }
    for i in 1000..2000 {
        assert!(bm.contains(i));
    }
    for i in 100_000..101_000 {
        assert!(bm.contains(i));
    }

    assert!(!bm.contains(500));
    assert!(!bm.contains(50_000));
}

#[test]
fn intermediate_extend_consecutive_across_containers() {
    let mut bm = Bitmap::new();

    // Container boundaries sit at multiples of 65536.
    bm.extend_consecutive(65000..66000);

    assert_eq!(bm.len(), 1000);

    for i in 65000..66000 {
        assert!(bm.contains(i), "Should contain {}", i);
    }

    let stats = bm.container_stats();
    assert_eq!(stats.len(), 2, "Should span 2 containers");
}

#[test]
fn intermediate_extend_consecutive_empty_range() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(100..100);
    assert_eq!(bm.len(), 0);

    bm.extend_consecutive(100..50);
    assert_eq!(bm.len(), 0);
}

#[test]
fn intermediate_extend_consecutive_then_fragment() {
    let mut bm = Bitmap::new();

    // A small consecutive run stays a positive array.
    bm.extend_consecutive(0..1000);
    assert_eq!(bm.container_type(0), Some("Positive"));

    // Remove every other value; the variant is re-picked by cardinality alone
    // after every mutation, so there's no separate optimization pass to run.
    for i in (0..1000).step_by(2) {
        bm.remove(i);
    }
    assert_eq!(bm.container_type(0), Some("Positive"));

    assert_eq!(bm.len(), 500);
    for i in (1..1000).step_by(2) {
        assert!(bm.contains(i), "Should contain {}", i);
    }
}

#[test]
fn intermediate_extend_sparse_basic() {
    let mut bm = Bitmap::new();

    bm.extend_sparse([10, 100, 1000, 10000, 100000]);

    assert_eq!(bm.len(), 5);
    assert!(bm.contains(10));
    assert!(bm.contains(100));
    assert!(bm.contains(1000));
    assert!(bm.contains(10000));
    assert!(bm.contains(100000));
    assert!(!bm.contains(50));
}

#[test]
fn intermediate_extend_sparse_from_vec() {
    let mut bm = Bitmap::new();

    let sparse_values: Vec<u32> = vec![42, 1337, 9999, 123456];
    bm.extend_sparse(sparse_values);

    assert_eq!(bm.len(), 4);
    assert!(bm.contains(42));
    assert!(bm.contains(1337));
    assert!(bm.contains(9999));
    assert!(bm.contains(123456));
}

#[test]
fn intermediate_extend_sparse_large_gaps() {
    let mut bm = Bitmap::new();

    let sparse_values: Vec<u32> = (0..100).map(|i| i * 100_000).collect();
    bm.extend_sparse(sparse_values);

    assert_eq!(bm.len(), 100);

    for i in 0..100 {
        assert!(bm.contains(i * 100_000));
    }
}

#[test]
fn intermediate_extend_sparse_duplicates() {
    let mut bm = Bitmap::new();

    bm.extend_sparse([10, 20, 10, 30, 20, 40]);

    assert_eq!(bm.len(), 4, "Should deduplicate");
    assert!(bm.contains(10));
    assert!(bm.contains(20));
    assert!(bm.contains(30));
    assert!(bm.contains(40));
}

#[test]
fn intermediate_extend_dense_basic() {
    let mut bm = Bitmap::new();

    bm.extend_dense((0..10_000).filter(|x| x % 2 == 0));

    assert_eq!(bm.len(), 5000);

    for i in (0..10_000).step_by(2) {
        assert!(bm.contains(i), "Should contain {}", i);
    }
    for i in (1..10_000).step_by(2) {
        assert!(!bm.contains(i), "Should not contain {}", i);
    }
}

#[test]
fn intermediate_extend_dense_high_density() {
    let mut bm = Bitmap::new();

    bm.extend_dense((0..9000).filter(|x| x % 3 != 0));

    let expected_count = (0..9000).filter(|x| x % 3 != 0).count();
    assert_eq!(bm.len(), expected_count as u64);

    for i in 0..9000 {
        if i % 3 != 0 {
            assert!(bm.contains(i), "Should contain {}", i);
        } else {
            assert!(!bm.contains(i), "Should not contain {}", i);
        }
    }
}

#[test]
fn intermediate_extend_dense_triggers_dense_variant() {
    let mut bm = Bitmap::new();

    // 4096 values crosses the positive/dense threshold.
    bm.extend_dense((0..8192).filter(|x| x % 2 == 0));

    assert_eq!(bm.len(), 4096);

    let stats = bm.container_stats();
    assert_eq!(stats.len(), 1);
    assert_eq!(
        stats[0].1, "Dense",
        "Should automatically pick the dense variant for high cardinality"
    );
}

#[test]
fn intermediate_mixing_methods() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..1000); // positive array
    bm.extend_sparse([50_000, 100_000, 150_000]); // separate small containers
    bm.extend_dense((200_000..210_000).filter(|x| x % 2 == 0)); // dense container

    let total = 1000 + 3 + 5000;
    assert_eq!(bm.len(), total as u64);

    assert!(bm.contains(500)); // from consecutive
    assert!(bm.contains(50_000)); // from sparse
    assert!(bm.contains(200_000)); // from dense
}

#[test]
fn intermediate_extend_consecutive_full_container() {
    let mut bm = Bitmap::new();

    // A full container (65536 consecutive values) has no absent low-parts, so it
    // picks the inverted-array variant with an empty absence list.
    bm.extend_consecutive(0..65536);

    assert_eq!(bm.len(), 65536);

    let stats = bm.container_stats();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].1, "Inverted");
    assert_eq!(stats[0].2, 65536, "Should have all 65536 values");

    let memory = bm.memory_usage();
    println!("Memory for full container (65536 values): {} bytes", memory);
    assert!(memory < 1000, "Should be very compact, got {}", memory);
}

#[test]
fn intermediate_performance_comparison() {
    // Compare semantic method vs regular insert for consecutive values

    let mut bm1 = Bitmap::new();
    for i in 0..10_000 {
        bm1.insert(i);
    }

    let mut bm2 = Bitmap::new();
    bm2.extend_consecutive(0..10_000);

    // Both paths converge to the same minimal-variant representation.
    assert_eq!(bm1.len(), bm2.len());
    for i in 0..10_000 {
        assert_eq!(bm1.contains(i), bm2.contains(i));
    }
    assert_eq!(bm1.container_type(0), bm2.container_type(0));
}

#[test]
fn intermediate_documentation_example_consecutive() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..1_000_000);
    println!("Memory: {} bytes", bm.memory_usage());

    bm.extend_consecutive(2_000_000..3_000_000);
    bm.extend_consecutive(5_000_000..6_000_000);

    assert_eq!(bm.len(), 3_000_000);
}

#[test]
fn intermediate_documentation_example_sparse() {
    let mut bm = Bitmap::new();

    bm.extend_sparse([1000, 5000, 10000, 50000, 100000]);

    let sparse_values: Vec<u32> = vec![42, 1337, 9999];
    bm.extend_sparse(sparse_values);

    assert_eq!(bm.len(), 8);
}

#[test]
fn intermediate_documentation_example_dense() {
    let mut bm = Bitmap::new();

    bm.extend_dense((0..10_000).filter(|x| x % 2 == 0));

    let values: Vec<u32> = (0..8000).filter(|x| x % 3 != 0).collect();
    bm.extend_dense(values);

    println!("Memory: {} bytes", bm.memory_usage());
}

#[test]
fn intermediate_variant_choice_is_data_driven() {
    // Every mutation re-picks the minimal variant for the resulting cardinality,
    // regardless of which method built it up.
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..100);
    assert_eq!(bm.container_type(0), Some("Positive"));

    for i in (0..100).step_by(2) {
        bm.remove(i);
    }

    let after_type = bm.container_type(0);
    println!("After fragmentation: {:?}", after_type);
    assert_eq!(after_type, Some("Positive"));

    assert_eq!(bm.len(), 50);
    for i in (1..100).step_by(2) {
        assert!(bm.contains(i));
    }
}

#[test]
fn intermediate_extend_consecutive_range_types() {
    let mut bm = Bitmap::new();

    bm.extend_consecutive(0..100); // exclusive end
    bm.extend_consecutive(1000..=2000); // inclusive end
    bm.extend_consecutive(10_000..10_100); // bounded tail range

    assert!(bm.contains(0));
    assert!(bm.contains(99));
    assert!(!bm.contains(100));

    assert!(bm.contains(1000));
    assert!(bm.contains(2000));

    assert!(bm.contains(10_000));
    assert!(bm.contains(10_099));
    assert!(!bm.contains(10_100));
}
