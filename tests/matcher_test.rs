use std::cell::Cell;

use tunecrawl::pipeline::{
    matcher::RecordMatcher,
    similarity::{SimilarityMetric, gestalt_ratio},
};
use tunecrawl::types::{Candidate, TrackRecord};

// Helper function to create a search candidate
fn candidate(artist: &str, title: &str, song_id: u64) -> Candidate {
    Candidate {
        artist_name: artist.to_string(),
        song_title: title.to_string(),
        artist_id: Some(song_id * 10),
        song_id: Some(song_id),
        song_url: Some(format!("https://genius.com/songs/{}", song_id)),
        ..Default::default()
    }
}

// Scores identical strings 1.0, the two Beatles spellings 0.83, anything
// else 0.5.
fn beatles_similarity(a: &str, b: &str) -> f64 {
    let pair = [a, b];
    if a == b {
        1.0
    } else if pair.contains(&"The Beatles") && pair.contains(&"Beatles, The") {
        0.83
    } else {
        0.5
    }
}

#[test]
fn test_first_candidate_clearing_both_fields_wins() {
    let matcher = RecordMatcher::new(beatles_similarity, 0.8);
    let target = TrackRecord::new("The Beatles", "Let It Be");
    let candidates = vec![
        candidate("Beatles, The", "Let It Be", 1),
        candidate("The Beatles", "Let It Be (Remastered)", 2),
    ];

    let matched = matcher.find_match(&target, &candidates);
    assert_eq!(matched.and_then(|c| c.song_id), Some(1));
}

#[test]
fn test_earlier_candidate_wins_over_better_later_one() {
    let matcher = RecordMatcher::default();
    let target = TrackRecord::new("The Beatles", "Let It Be");
    let candidates = vec![
        candidate("The Beatles", "Let It Be!", 1),
        candidate("The Beatles", "Let It Be", 2),
    ];

    assert!(gestalt_ratio("Let It Be!", "Let It Be") > 0.8);
    let matched = matcher.find_match(&target, &candidates);
    assert_eq!(matched.and_then(|c| c.song_id), Some(1));
}

#[test]
fn test_empty_candidate_list_has_no_match() {
    let matcher = RecordMatcher::default();
    let target = TrackRecord::new("Nina Simone", "Feeling Good");
    assert!(matcher.find_match(&target, &[]).is_none());
}

#[test]
fn test_threshold_is_strict() {
    let matcher = RecordMatcher::new(|_: &str, _: &str| 0.8, 0.8);
    let target = TrackRecord::new("a", "b");
    assert!(matcher.find_match(&target, &[candidate("a", "b", 1)]).is_none());

    let matcher = RecordMatcher::new(|_: &str, _: &str| 0.800_001, 0.8);
    assert!(matcher.find_match(&target, &[candidate("a", "b", 1)]).is_some());
}

#[test]
fn test_both_fields_must_clear_threshold() {
    let matcher = RecordMatcher::default();
    let target = TrackRecord::new("Radiohead", "Creep");
    let candidates = vec![
        candidate("Radiohead", "Karma Police", 1),
        candidate("Stone Temple Pilots", "Creep", 2),
    ];
    assert!(matcher.find_match(&target, &candidates).is_none());
}

#[test]
fn test_artist_is_scored_before_title() {
    let calls = Cell::new(0);
    let similarity = |a: &str, b: &str| {
        calls.set(calls.get() + 1);
        if a == b { 1.0 } else { 0.0 }
    };
    let matcher = RecordMatcher::new(similarity, 0.8);
    let target = TrackRecord::new("Björk", "Army of Me");

    assert!(!matcher.accepts(&target, &candidate("Bjork", "Army of Me", 1)));
    assert_eq!(calls.get(), 1);

    assert!(matcher.accepts(&target, &candidate("Björk", "Army of Me", 2)));
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_candidate_is_first_argument_of_similarity() {
    let seen = Cell::new(("", ""));
    let target = TrackRecord::new("target artist", "target title");
    let c = candidate("candidate artist", "candidate title", 1);
    let matcher = RecordMatcher::new(
        |a: &str, b: &str| {
            if a.starts_with("candidate") && b.starts_with("target") {
                seen.set(("candidate", "target"));
                1.0
            } else {
                0.0
            }
        },
        0.8,
    );

    assert!(matcher.accepts(&target, &c));
    assert_eq!(seen.get(), ("candidate", "target"));
}

#[test]
fn test_partition_is_idempotent() {
    let matcher = RecordMatcher::new(SimilarityMetric::Gestalt, 0.8);
    let targets = vec![
        TrackRecord::new("Daft Punk", "Get Lucky"),
        TrackRecord::new("Adele", "Hello"),
        TrackRecord::new("Portishead", "Glory Box"),
    ];
    let candidate_lists = vec![
        vec![
            candidate("Daft Punk", "Get Lucky (Radio Edit)", 1),
            candidate("Daft Punk", "Get Lucky", 2),
        ],
        vec![candidate("Lionel Richie", "Hello", 3)],
        vec![],
    ];

    let first = matcher.partition(&targets, &candidate_lists);
    let second = matcher.partition(&targets, &candidate_lists);

    assert_eq!(first, second);
    assert_eq!(first, vec![Some(1), None, None]);
}

#[test]
fn test_alternate_metrics_accept_exact_matches() {
    let target = TrackRecord::new("Massive Attack", "Teardrop");
    let candidates = vec![candidate("Massive Attack", "Teardrop", 7)];

    for metric in [
        SimilarityMetric::Gestalt,
        SimilarityMetric::Levenshtein,
        SimilarityMetric::JaroWinkler,
    ] {
        let matcher = RecordMatcher::new(metric, 0.8);
        assert!(matcher.find_match(&target, &candidates).is_some(), "{}", metric);
    }
}
