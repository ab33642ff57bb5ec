//! End-to-end tests for filter expression parsing.

use hfilter_lang::leaf::{COMPARATORS, COMPARE_OPS};
use hfilter_lang::{
    parse, parse_with, CompareType, Comparator, Filter, ListOperator, ParseErrorKind,
    ParseOptions, SingleColumnValueFilter,
};
use pretty_assertions::assert_eq;

fn age() -> Filter {
    Filter::row_prefix("age")
}

fn eighteen() -> Filter {
    Filter::value(CompareType::Equal, Comparator::substring("18"))
}

/// Wraps a leaf in the three expression shapes it can appear in.
fn shapes(leaf: &str) -> Vec<String> {
    vec![
        leaf.to_string(),
        format!("({})", leaf),
        format!("PrefixFilter('k') AND ( {} OR PrefixFilter('j') )", leaf),
    ]
}

#[test]
fn scenario_prefix_filter() {
    assert_eq!(parse("PrefixFilter('age')").unwrap(), age());
}

#[test]
fn scenario_value_filter() {
    assert_eq!(parse("ValueFilter(=,'substring:18')").unwrap(), eighteen());
}

#[test]
fn scenario_and() {
    assert_eq!(
        parse("PrefixFilter('age') AND ValueFilter(=,'substring:18')").unwrap(),
        Filter::composite(ListOperator::MustPassAll, vec![age(), eighteen()])
    );
}

#[test]
fn scenario_or_with_group() {
    assert_eq!(
        parse("PrefixFilter('age') OR ( PrefixFilter('age') AND ValueFilter(=,'substring:18') )")
            .unwrap(),
        Filter::composite(
            ListOperator::MustPassOne,
            vec![
                age(),
                Filter::composite(ListOperator::MustPassAll, vec![age(), eighteen()]),
            ]
        )
    );
}

#[test]
fn scenario_and_with_group() {
    assert_eq!(
        parse("PrefixFilter('age') AND ( PrefixFilter('age') OR ValueFilter(=,'substring:18') )")
            .unwrap(),
        Filter::composite(
            ListOperator::MustPassAll,
            vec![
                age(),
                Filter::composite(ListOperator::MustPassOne, vec![age(), eighteen()]),
            ]
        )
    );
}

#[test]
fn scenario_group_with_three_members() {
    assert_eq!(
        parse(
            "PrefixFilter('age') OR ( PrefixFilter('age') AND ValueFilter(=,'substring:18') AND ValueFilter(=,'substring:18') )"
        )
        .unwrap(),
        Filter::composite(
            ListOperator::MustPassOne,
            vec![
                age(),
                Filter::composite(
                    ListOperator::MustPassAll,
                    vec![age(), eighteen(), eighteen()]
                ),
            ]
        )
    );
}

#[test]
fn scenario_two_groups() {
    let group = Filter::composite(ListOperator::MustPassOne, vec![age(), eighteen()]);
    assert_eq!(
        parse(
            "( PrefixFilter('age') OR ValueFilter(=,'substring:18') ) AND ( PrefixFilter('age') OR ValueFilter(=,'substring:18') )"
        )
        .unwrap(),
        Filter::composite(ListOperator::MustPassAll, vec![group.clone(), group])
    );
}

#[test]
fn scenario_single_column_value_filter() {
    let expected: Filter = SingleColumnValueFilter::new(
        "cf1",
        "col1",
        CompareType::Equal,
        Comparator::binary("14"),
    )
    .with_flags(true, false)
    .into();
    assert_eq!(
        parse("SingleColumnValueFilter('cf1','col1',=,'binary:14',true,false)").unwrap(),
        expected
    );
}

#[test]
fn scenario_missing_arguments() {
    let err = parse("PrefixFilter").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnresolvedExpression("PrefixFilter".to_string())
    );
}

#[test]
fn every_table_operator_is_accepted_in_every_shape() {
    for (token, op) in COMPARE_OPS {
        let leaf = format!("ValueFilter({}, 'binary:1')", token);
        for source in shapes(&leaf) {
            let filter = parse(&source).unwrap();
            let expected = Filter::value(op, Comparator::binary("1"));
            assert!(
                filter.leaves().contains(&&expected),
                "{} did not yield {:?}",
                source,
                expected
            );
        }
    }
}

#[test]
fn unknown_operators_are_rejected_in_every_shape() {
    for token in ["==", "=>", "<>", "~", "!", "=!"] {
        let leaf = format!("SingleColumnValueFilter('cf', 'q', {}, 'binary:1')", token);
        for source in shapes(&leaf) {
            let err = parse(&source).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::UnsupportedOperator(token.to_string()),
                "{}",
                source
            );
        }
    }
}

#[test]
fn every_table_comparator_is_accepted_in_every_shape() {
    for (name, ctor) in COMPARATORS {
        let leaf = format!("ValueFilter(!=, '{}:abc')", name.to_uppercase());
        for source in shapes(&leaf) {
            let filter = parse(&source).unwrap();
            let expected = Filter::value(CompareType::NotEqual, ctor("abc"));
            assert!(filter.leaves().contains(&&expected), "{}", source);
        }
    }
}

#[test]
fn unknown_comparators_are_rejected_in_every_shape() {
    for token in ["long", "Regex", "sub_string", "bin"] {
        let leaf = format!("ValueFilter(=, '{}:1')", token);
        for source in shapes(&leaf) {
            let err = parse(&source).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::UnsupportedComparator(token.to_string()),
                "{}",
                source
            );
        }
    }
}

#[test]
fn greater_or_equal_has_its_own_semantics() {
    let filter = parse("SingleColumnValueFilter('cf', 'age', >=, 'binary:18')").unwrap();
    if let Filter::SingleColumnValue(f) = filter {
        assert_eq!(f.compare.op, CompareType::GreaterOrEqual);
    } else {
        panic!("expected SingleColumnValue");
    }
}

#[test]
fn value_text_is_verbatim() {
    let filter = parse(r"ValueFilter(=, 'regexstring:^user:\d+ (a|b)$')").unwrap();
    assert_eq!(
        filter,
        Filter::value(
            CompareType::Equal,
            Comparator::regex_string(r"^user:\d+ (a|b)$")
        )
    );
}

#[test]
fn value_text_may_contain_quotes() {
    assert_eq!(
        parse("ValueFilter(=,'substring:it's')").unwrap(),
        Filter::value(CompareType::Equal, Comparator::substring("it's"))
    );

    let leaf = "SingleColumnValueFilter('cf', 'q', =, 'regexstring:^'[a-z]+'$' , true, false)";
    for source in shapes(leaf) {
        let filter = parse(&source).unwrap();
        let expected: Filter = SingleColumnValueFilter::new(
            "cf",
            "q",
            CompareType::Equal,
            Comparator::regex_string("^'[a-z]+'$"),
        )
        .with_flags(true, false)
        .into();
        assert!(filter.leaves().contains(&&expected), "{}", source);
    }
}

#[test]
fn quoted_values_survive_display() {
    let filter = parse("PrefixFilter('a') AND ValueFilter(!=, 'substring:o'clock')").unwrap();
    assert_eq!(
        filter.to_string(),
        "PrefixFilter('a') AND ValueFilter(!=, 'substring:o'clock')"
    );
    assert_eq!(parse(&filter.to_string()).unwrap(), filter);
}

#[test]
fn connectives_need_not_be_spaced() {
    let expected = Filter::composite(
        ListOperator::MustPassAll,
        vec![Filter::row_prefix("a"), Filter::row_prefix("b")],
    );
    assert_eq!(parse("PrefixFilter('a')AND PrefixFilter('b')").unwrap(), expected);
    assert_eq!(parse("(PrefixFilter('a'))AND(PrefixFilter('b'))").unwrap(), expected);
}

#[test]
fn parentheses_are_transparent() {
    for source in [
        "PrefixFilter('age')",
        "PrefixFilter('age') AND ValueFilter(=,'substring:18')",
        "PrefixFilter('age') OR ( PrefixFilter('b') AND ValueFilter(=,'substring:18') )",
    ] {
        let wrapped = format!("( {} )", source);
        assert_eq!(parse(&wrapped).unwrap(), parse(source).unwrap(), "{}", source);
    }
}

#[test]
fn identical_leaves_are_distinct_values() {
    let filter = parse("PrefixFilter('age') AND PrefixFilter('age')").unwrap();
    if let Filter::Composite(list) = &filter {
        let members = list.members();
        assert_eq!(members[0], members[1]);
        assert!(!std::ptr::eq(&members[0], &members[1]));
    } else {
        panic!("expected Composite");
    }
}

#[test]
fn reparsing_is_idempotent() {
    let source = "( PrefixFilter('age') OR ValueFilter(=,'substring:18') ) AND SingleColumnValueFilter('cf1', 'col1', <, 'binaryprefix:z', false, false)";
    assert_eq!(parse(source).unwrap(), parse(source).unwrap());
}

#[test]
fn concurrent_parses_are_independent() {
    let sources = [
        "PrefixFilter('a') AND ValueFilter(=,'substring:1')",
        "PrefixFilter('b') OR ( PrefixFilter('c') AND ValueFilter(<,'binary:2') )",
        "SingleColumnValueFilter('cf', 'q', >, 'regexstring:x.*', true, true)",
    ];
    let expected: Vec<Filter> = sources.iter().map(|s| parse(s).unwrap()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let source = sources[i % sources.len()];
                scope.spawn(move || (i, parse(source).unwrap()))
            })
            .collect();
        for handle in handles {
            let (i, filter) = handle.join().unwrap();
            assert_eq!(filter, expected[i % sources.len()]);
        }
    });
}

#[test]
fn malformed_calls_report_from_the_call() {
    let cases = [
        ("PrefixFilter('a-b')", "PrefixFilter('a-b')"),
        ("ValueFilter(=, 'substring')", "ValueFilter(=, 'substring')"),
        (
            "PrefixFilter('a') AND ValueFilter('substring:1')",
            "ValueFilter('substring:1')",
        ),
        (
            "SingleColumnValueFilter('cf', 'q', =, 'binary:1', true)",
            "SingleColumnValueFilter('cf', 'q', =, 'binary:1', true)",
        ),
        (
            "SingleColumnValueFilter('cf', 'q', =, 'binary:1', yes, no)",
            "SingleColumnValueFilter('cf', 'q', =, 'binary:1', yes, no)",
        ),
    ];
    for (source, leftover) in cases {
        let err = parse(source).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnresolvedExpression(leftover.to_string()),
            "{}",
            source
        );
    }
}

#[test]
fn unknown_predicate_is_unresolved() {
    let err = parse("PrefixFilter('a') OR ColumnPrefixFilter('b')").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnresolvedExpression("ColumnPrefixFilter('b')".to_string())
    );
}

#[test]
fn options_limit_nesting() {
    let options = ParseOptions::new().with_max_depth(3);
    let ok = "(((PrefixFilter('a'))))";
    let too_deep = "((((PrefixFilter('a')))))";
    assert_eq!(parse_with(ok, &options).unwrap(), Filter::row_prefix("a"));
    assert_eq!(
        parse_with(too_deep, &options).unwrap_err().kind,
        ParseErrorKind::NestingTooDeep { limit: 3 }
    );
}

#[test]
fn display_output_parses_back() {
    for source in [
        "PrefixFilter('age')",
        "ValueFilter(<=, 'binaryprefix:row_1')",
        "PrefixFilter('a') OR ( PrefixFilter('b') AND ( ValueFilter(=, 'null:') OR PrefixFilter('c') ) )",
        "SingleColumnValueFilter('cf1', 'col1', !=, 'substring:x', true, false) AND PrefixFilter('z')",
    ] {
        let filter = parse(source).unwrap();
        let rendered = filter.to_string();
        assert_eq!(parse(&rendered).unwrap(), filter, "{}", rendered);
    }
}
