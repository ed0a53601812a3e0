use ideology_axes::scoring::{compute_coordinates, score_axis};
use ideology_axes::{
    Axis, AxisMapping, AxisMappingEntry, ClarityPolicy, DenominatorPolicy, ScoredResponse,
    ScoredResponses, ScoringPolicy,
};
use proptest::prelude::*;

const LABELS: [&str; 3] = ["a", "b", "c"];

fn arb_points() -> impl Strategy<Value = f64> {
    (-20i32..=20).prop_map(|v| v as f64 * 0.5)
}

fn arb_ceiling() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((0i32..=20).prop_map(|v| v as f64 * 0.5))
}

fn arb_entry() -> impl Strategy<Value = AxisMappingEntry> {
    let choice = (
        0usize..4,
        prop::collection::vec(arb_points(), 1..=3),
        arb_ceiling(),
    )
        .prop_map(|(axis, points, ceiling)| {
            AxisMappingEntry::choice(Axis::ALL[axis], LABELS.iter().copied().zip(points), ceiling)
        });
    let stance = (
        0usize..4,
        prop::collection::vec((-2i64..=2, arb_points()), 1..=5),
        arb_ceiling(),
    )
        .prop_map(|(axis, scale, ceiling)| AxisMappingEntry::stance(Axis::ALL[axis], scale, ceiling));
    prop_oneof![choice, stance]
}

fn arb_mapping() -> impl Strategy<Value = AxisMapping> {
    prop::collection::vec(arb_entry(), 0..12).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| (format!("Q{:02}", i), entry))
            .collect()
    })
}

fn arb_response() -> impl Strategy<Value = ScoredResponse> {
    let choice = (0usize..12, prop::option::of(-1i64..=4), 0usize..4).prop_map(|(q, clarity, label)| {
        let label = LABELS.get(label).copied().unwrap_or("z");
        ScoredResponse::choice(format!("Q{:02}", q), clarity, label)
    });
    let stance = (0usize..12, prop::option::of(-1i64..=4), -3i64..=3).prop_map(|(q, clarity, level)| {
        ScoredResponse::stance(format!("Q{:02}", q), clarity, level)
    });
    prop_oneof![choice, stance]
}

fn arb_responses() -> impl Strategy<Value = ScoredResponses> {
    prop::collection::vec(arb_response(), 0..16).prop_map(|list| list.into_iter().collect())
}

/// Any policy that passes startup validation
fn arb_policy() -> impl Strategy<Value = ScoringPolicy> {
    (
        prop_oneof![Just(ClarityPolicy::Discount), Just(ClarityPolicy::Exclude)],
        prop_oneof![Just(DenominatorPolicy::Ceiling), Just(DenominatorPolicy::Achievable)],
        0i64..=3,
        (0i32..=4).prop_map(|v| v as f64 * 0.25),
    )
        .prop_map(|(clarity, denominator, clarity_threshold, low_clarity_weight)| ScoringPolicy {
            clarity,
            clarity_threshold,
            low_clarity_weight,
            denominator,
        })
}

proptest! {
    #[test]
    fn scores_stay_in_range_with_two_decimals(
        mapping in arb_mapping(),
        responses in arb_responses(),
        policy in arb_policy()
    ) {
        let coordinate = compute_coordinates(&responses, &mapping, &policy);
        for (axis, score) in coordinate.iter() {
            prop_assert!((-10.0..=10.0).contains(&score), "{} out of range: {}", axis, score);
            let hundredths = score * 100.0;
            prop_assert!((hundredths - hundredths.round()).abs() < 1e-6, "{} not rounded: {}", axis, score);
        }
    }

    #[test]
    fn identical_inputs_give_identical_output(
        mapping in arb_mapping(),
        responses in arb_responses(),
        policy in arb_policy()
    ) {
        let first = compute_coordinates(&responses, &mapping, &policy);
        let second = compute_coordinates(&responses, &mapping, &policy);
        for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn empty_mapping_is_neutral(responses in arb_responses(), policy in arb_policy()) {
        let coordinate = compute_coordinates(&responses, &AxisMapping::new(), &policy);
        for (_, score) in coordinate.iter() {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn axes_are_independent(
        mapping in arb_mapping(),
        responses in arb_responses(),
        policy in arb_policy()
    ) {
        let full = compute_coordinates(&responses, &mapping, &policy);

        // Keep only answers to Economic questions
        let economic_only: ScoredResponses = responses
            .iter()
            .filter(|r| mapping.get(&r.question_id).map(|e| e.axis) == Some(Axis::Economic))
            .cloned()
            .collect();
        let reduced = compute_coordinates(&economic_only, &mapping, &policy);

        prop_assert_eq!(full.economic_axis.to_bits(), reduced.economic_axis.to_bits());
        prop_assert_eq!(reduced.social_axis, 0.0);
        prop_assert_eq!(reduced.authority_axis, 0.0);
        prop_assert_eq!(reduced.global_axis, 0.0);
    }

    #[test]
    fn higher_choice_never_lowers_score(
        mapping in arb_mapping(),
        responses in arb_responses(),
        low in arb_points(),
        step in 1i32..=10,
        clarity in prop::option::of(0i64..=3),
        policy in arb_policy()
    ) {
        let high = low + step as f64 * 0.5;
        let mut mapping = mapping;
        mapping.insert(
            "ZZ",
            AxisMappingEntry::choice(Axis::Economic, [("low", low), ("high", high)], Some(10.0)),
        );

        let with = |label: &str| {
            let mut answered = responses.clone();
            answered.insert(ScoredResponse::choice("ZZ", clarity, label));
            compute_coordinates(&answered, &mapping, &policy).economic_axis
        };

        prop_assert!(with("low") <= with("high"));
    }

    #[test]
    fn low_clarity_contributes_half(points in arb_points(), ceiling in 1i32..=20) {
        let mapping: AxisMapping = vec![(
            "Q1",
            AxisMappingEntry::choice(Axis::Social, [("a", points)], Some(ceiling as f64)),
        )]
        .into_iter()
        .collect();
        let raw = |clarity: i64| {
            let responses: ScoredResponses =
                vec![ScoredResponse::choice("Q1", Some(clarity), "a")].into_iter().collect();
            score_axis(Axis::Social, &responses, &mapping, &ScoringPolicy::default()).raw_score
        };

        prop_assert_eq!(raw(1), raw(3) * 0.5);
    }
}

#[test]
fn concrete_choice_scenario() {
    let mapping: AxisMapping = vec![(
        "Q1",
        AxisMappingEntry::choice(Axis::Economic, [("a", -4.0), ("b", 4.0)], Some(4.0)),
    )]
    .into_iter()
    .collect();
    let policy = ScoringPolicy::default();

    let chose_a: ScoredResponses = vec![ScoredResponse::choice("Q1", Some(3), "a")]
        .into_iter()
        .collect();
    assert_eq!(compute_coordinates(&chose_a, &mapping, &policy).economic_axis, -10.0);

    let chose_c: ScoredResponses = vec![ScoredResponse::choice("Q1", Some(3), "c")]
        .into_iter()
        .collect();
    let score = score_axis(Axis::Economic, &chose_c, &mapping, &policy);
    assert_eq!(score.score, 0.0);
    assert_eq!(score.max_abs_score, 4.0);
}

#[test]
fn concrete_stance_scenario() {
    let mapping: AxisMapping = vec![(
        "S1",
        AxisMappingEntry::stance(Axis::Global, [(-2, -5.0), (2, 5.0)], Some(5.0)),
    )]
    .into_iter()
    .collect();
    let responses: ScoredResponses = vec![ScoredResponse::stance("S1", Some(1), 1)]
        .into_iter()
        .collect();
    let score = score_axis(Axis::Global, &responses, &mapping, &ScoringPolicy::default());
    assert_eq!(score.raw_score, 0.0);
    assert_eq!(score.score, 0.0);
}
