//! Property tests for tagging, ranking and the divergence rule

mod common;

use proptest::prelude::*;

use carelens::analytics::{
    aggregate, explode, is_divergent, rank, rollup, tag, AggregationOptions, TargetEntity,
    Vocabulary, OTHER_THEME,
};
use carelens::models::{FeedbackRecord, TaggedRecord};

fn vocabulary_terms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z]{1,6}( [A-Za-z]{1,6})?", 1..8)
}

fn tagged_records() -> impl Strategy<Value = Vec<TaggedRecord>> {
    prop::collection::vec(
        (
            prop::collection::vec("[a-e]", 1..4),
            -1.0f64..=1.0,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(themes, sentiment)| TaggedRecord {
                record: FeedbackRecord {
                    sentiment: Some(sentiment),
                    ..Default::default()
                },
                master_themes: themes,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_tags_are_matching_terms_or_other(
        terms in vocabulary_terms(),
        text in "[A-Za-z ]{0,40}",
    ) {
        let vocabulary = Vocabulary::new(terms.clone()).unwrap();
        let tags = tag(&text, &vocabulary);
        let haystack = text.trim().to_lowercase();

        prop_assert!(!tags.is_empty());

        let any_match = terms.iter().any(|t| haystack.contains(&t.to_lowercase()));
        if any_match {
            for tag in &tags {
                prop_assert!(terms.contains(tag));
                prop_assert!(haystack.contains(&tag.to_lowercase()));
            }
        } else {
            prop_assert_eq!(tags, vec![OTHER_THEME.to_string()]);
        }
    }

    #[test]
    fn prop_tags_follow_vocabulary_order(
        terms in vocabulary_terms(),
        text in "[A-Za-z ]{0,40}",
    ) {
        let vocabulary = Vocabulary::new(terms.clone()).unwrap();
        let first = tag(&text, &vocabulary);
        let second = tag(&text, &vocabulary);
        prop_assert_eq!(&first, &second);

        let expected: Vec<String> = terms
            .iter()
            .filter(|t| text.trim().to_lowercase().contains(&t.to_lowercase()))
            .cloned()
            .collect();
        if !expected.is_empty() {
            prop_assert_eq!(first, expected);
        }
    }

    #[test]
    fn prop_rank_sorted_and_conserves_rows(records in tagged_records(), top_n in 1usize..10) {
        let rows = explode(&records);
        let expected_rows: usize = records.iter().map(|r| r.master_themes.len()).sum();
        prop_assert_eq!(rows.len(), expected_rows);

        let summary = rollup(&rows);
        prop_assert_eq!(summary.iter().map(|s| s.count).sum::<usize>(), expected_rows);

        let ranking = rank(&records, top_n).unwrap();
        prop_assert!(ranking.themes.len() <= top_n);
        prop_assert_eq!(ranking.themes.len(), top_n.min(summary.len()));
        for pair in ranking.themes.windows(2) {
            let ordered = pair[0].count > pair[1].count
                || (pair[0].count == pair[1].count && pair[0].theme < pair[1].theme);
            prop_assert!(ordered);
        }
    }

    #[test]
    fn prop_alert_matches_rule(
        target in prop::collection::vec(-1.0f64..=1.0, 1..6),
        competition in prop::collection::vec(-1.0f64..=1.0, 0..6),
        threshold in 0.0f64..=2.0,
    ) {
        let day = common::week1();
        let mut records: Vec<FeedbackRecord> = target
            .iter()
            .map(|&s| common::create_record("Kaiser Oakland", day, s, "Yelp"))
            .collect();
        records.extend(
            competition
                .iter()
                .map(|&s| common::create_record("Sutter Health", day, s, "Yelp")),
        );

        let entity = TargetEntity::new("Health System Alpha")
            .unwrap()
            .with_identity_pattern("kaiser")
            .unwrap();
        let options = AggregationOptions {
            divergence_threshold: threshold,
            ..Default::default()
        };
        let trend = aggregate(&records, &entity, &options).unwrap();

        for row in &trend.comparison {
            let expected = match (row.target_mean, row.competition_mean) {
                (Some(t), Some(c)) => c > 0.0 && t < -threshold,
                _ => false,
            };
            prop_assert_eq!(row.alert, expected);
            prop_assert_eq!(row.alert, is_divergent(row.target_mean, row.competition_mean, threshold));
            if competition.is_empty() {
                prop_assert!(!row.alert);
            }
        }
    }
}
