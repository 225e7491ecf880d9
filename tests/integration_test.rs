//! Integration tests for the generation pipeline

use std::collections::HashSet;

use pinfl_forge::{
    collect, generate_identifier, generate_passport, ErrorCode, IDENTIFIER_LEN, MAX_SAFE_COUNT,
    PASSPORT_PREFIXES,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn is_valid_identifier(id: &str) -> bool {
    id.len() == IDENTIFIER_LEN
        && id.chars().next().map(|c| ('1'..='9').contains(&c)).unwrap_or(false)
        && id.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_passport_full(full: &str) -> bool {
    PASSPORT_PREFIXES.iter().any(|prefix| {
        full.strip_prefix(prefix)
            .map(|rest| rest.len() == 7 && rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    })
}

#[test]
fn test_collected_batch_has_exact_count_and_no_duplicates() {
    let mut rng = StdRng::seed_from_u64(1001);
    let records = collect(5000, &mut rng).unwrap();

    assert_eq!(records.len(), 5000, "batch must contain exactly the requested count");

    let identifiers: HashSet<_> = records.iter().map(|r| r.identifier.as_str()).collect();
    let passports: HashSet<_> = records.iter().map(|r| r.passport.full.as_str()).collect();
    assert_eq!(identifiers.len(), 5000, "identifier column must be duplicate-free");
    assert_eq!(passports.len(), 5000, "passport column must be duplicate-free");
}

#[test]
fn test_every_record_matches_the_field_patterns() {
    let mut rng = StdRng::seed_from_u64(1002);
    let records = collect(1000, &mut rng).unwrap();

    for record in &records {
        assert!(
            is_valid_identifier(&record.identifier),
            "bad identifier: {}",
            record.identifier
        );
        assert!(
            is_valid_passport_full(&record.passport.full),
            "bad passport: {}",
            record.passport.full
        );
        assert_eq!(
            record.passport.full,
            format!("{}{}", record.passport.prefix, record.passport.number)
        );
    }
}

#[test]
fn test_sequence_numbers_are_one_based_and_contiguous() {
    let mut rng = StdRng::seed_from_u64(1003);
    let records = collect(250, &mut rng).unwrap();
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.sequence as usize, i + 1);
    }
}

#[test]
fn test_raw_generators_match_patterns_over_many_draws() {
    let mut rng = StdRng::seed_from_u64(1004);
    for _ in 0..10_000 {
        assert!(is_valid_identifier(&generate_identifier(&mut rng)));
        assert!(is_valid_passport_full(&generate_passport(&mut rng).full));
    }
}

#[test]
fn test_over_capacity_target_is_rejected_not_attempted() {
    let mut rng = StdRng::seed_from_u64(1005);
    let err = collect(MAX_SAFE_COUNT + 1, &mut rng).unwrap_err();
    assert_eq!(err.code, ErrorCode::GenCapacityExceeded);
}

#[test]
fn test_concurrent_batches_do_not_share_state() {
    // Uniqueness sets are request-local: one batch seeing a value must not
    // block another batch from emitting it.
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(2000 + i);
                collect(500, &mut rng).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let records = handle.join().unwrap();
        assert_eq!(records.len(), 500);
        let unique: HashSet<_> = records.iter().map(|r| r.passport.full.as_str()).collect();
        assert_eq!(unique.len(), 500);
    }
}
