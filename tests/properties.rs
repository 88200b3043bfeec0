use approxdur::ApproxDuration;
use proptest::prelude::*;

/// Per-unit counts: years, months, days, hours, minutes, seconds,
/// milliseconds, microseconds, nanoseconds. Bounded so the weighted sum
/// stays far from i64 overflow.
fn arb_components() -> impl Strategy<Value = [i64; 9]> {
    (
        (0i64..100, 0i64..12, 0i64..30, 0i64..24, 0i64..60),
        (0i64..60, 0i64..1000, 0i64..1000, 0i64..1000),
    )
        .prop_map(|((years, months, days, hours, minutes), (seconds, millis, micros, nanos))| {
            [years, months, days, hours, minutes, seconds, millis, micros, nanos]
        })
}

fn weighted_sum(counts: &[i64; 9]) -> ApproxDuration {
    ApproxDuration::YEAR * counts[0]
        + ApproxDuration::MONTH * counts[1]
        + ApproxDuration::DAY * counts[2]
        + ApproxDuration::HOUR * counts[3]
        + ApproxDuration::MINUTE * counts[4]
        + ApproxDuration::SECOND * counts[5]
        + ApproxDuration::MILLISECOND * counts[6]
        + ApproxDuration::MICROSECOND * counts[7]
        + ApproxDuration::NANOSECOND * counts[8]
}

fn unit_tokens(counts: &[i64; 9]) -> Vec<String> {
    vec![
        format!("{}y", counts[0]),
        format!("{}mo", counts[1]),
        format!("{}d", counts[2]),
        format!("{}h", counts[3]),
        format!("{}m", counts[4]),
        format!("{}s", counts[5]),
        format!("{}ms", counts[6]),
        format!("{}µs", counts[7]),
        format!("{}ns", counts[8]),
    ]
}

/// Components plus their unit tokens in a random order.
fn arb_shuffled_tokens() -> impl Strategy<Value = ([i64; 9], Vec<String>)> {
    arb_components().prop_flat_map(|counts| (Just(counts), Just(unit_tokens(&counts)).prop_shuffle()))
}

proptest! {
    /// Tokens may appear in any order; each contributes its weighted
    /// magnitude to the sum.
    #[test]
    fn additive_parse_ignores_token_order((counts, shuffled) in arb_shuffled_tokens()) {
        let text = shuffled.concat();
        prop_assert_eq!(
            ApproxDuration::parse(&text).unwrap(),
            weighted_sum(&counts)
        );
    }

    /// A leading negative marker negates the whole accumulated sum, not
    /// individual tokens.
    #[test]
    fn negation_applies_to_whole_sum((_, shuffled) in arb_shuffled_tokens()) {
        let text = shuffled.concat();
        let value = ApproxDuration::parse(&text).unwrap();
        prop_assert_eq!(ApproxDuration::parse(&format!("-{}", text)).unwrap(), -value);
        prop_assert_eq!(ApproxDuration::parse(&format!("~ -{}", text)).unwrap(), -value);
    }

    /// Compact exact output reconstructs the value exactly when fed back
    /// through the parser, for either sign.
    #[test]
    fn display_parse_round_trip(counts in arb_components(), negative in any::<bool>()) {
        let mut value = weighted_sum(&counts);
        if negative {
            value = -value;
        }
        prop_assert_eq!(ApproxDuration::parse(&value.to_string()).unwrap(), value);
    }

    /// Verbose exact output is also lossless through the parser.
    #[test]
    fn pretty_parse_round_trip(counts in arb_components(), negative in any::<bool>()) {
        let mut value = weighted_sum(&counts);
        if negative {
            value = -value;
        }
        prop_assert_eq!(ApproxDuration::parse(&value.pretty()).unwrap(), value);
    }

    /// Approximate output truncates downward by less than the tier's fine
    /// unit.
    #[test]
    fn approx_truncates_within_tier_granularity(counts in arb_components()) {
        let value = weighted_sum(&counts);
        prop_assume!(value >= ApproxDuration::DAY * 4);
        let approx = ApproxDuration::parse(&value.approx()).unwrap();
        prop_assert!(approx <= value);
        let granularity = if value < ApproxDuration::MONTH {
            ApproxDuration::HOUR
        } else if value < ApproxDuration::MONTH * 12 {
            ApproxDuration::DAY
        } else {
            ApproxDuration::MONTH
        };
        prop_assert!(value - approx < granularity);
    }

    /// Exact and approximate renderings agree on the tier head; exact only
    /// appends the remainder (and approximate only prepends the marker).
    #[test]
    fn approx_is_a_prefix_of_exact(counts in arb_components()) {
        let value = weighted_sum(&counts);
        prop_assume!(value >= ApproxDuration::DAY * 4);

        let approx = value.approx();
        let head = approx.strip_prefix('~').unwrap();
        prop_assert!(value.to_string().starts_with(head));

        let approx_pretty = value.approx_pretty();
        let head = approx_pretty.strip_prefix("~ ").unwrap();
        prop_assert!(value.pretty().starts_with(head));
    }

    /// Below four days there is no truncation and no marker in any mode.
    #[test]
    fn sub_four_day_values_render_exactly(nanos in 0i64..4 * 86_400_000_000_000) {
        let value = ApproxDuration::from_nanos(nanos);
        prop_assert_eq!(value.approx(), value.to_string());
        prop_assert_eq!(value.approx_pretty(), value.pretty());
        prop_assert!(!value.approx().starts_with('~'));
    }

    /// The boundary belongs to the upper tier: whole-day multiples from
    /// four days up always render with the approximation marker.
    #[test]
    fn day_multiples_at_or_above_boundary_truncate(days in 4i64..3 * 360) {
        let value = ApproxDuration::DAY * days;
        prop_assert!(value.approx().starts_with('~'));
    }

    /// Text without any unit token parses to zero, never an error.
    #[test]
    fn unitless_text_parses_to_zero(text in "[A-Z ,.!?]*") {
        prop_assert_eq!(ApproxDuration::parse(&text).unwrap(), ApproxDuration::ZERO);
    }
}
