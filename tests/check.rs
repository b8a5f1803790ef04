use crate::command::assert_cmd_snapshot;

fn check() -> crate::command::Command {
    crate::recur(["check"])
}

/// Test that valid rules pass through byte-for-byte.
#[test]
fn valid_passes_through() {
    assert_cmd_snapshot!(
        check().arg(r#"{ "recurrence_type": 2, "interval": 1, "days": 2 }"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    { "recurrence_type": 2, "interval": 1, "days": 2 }

    ----- stderr -----
    "#,
    );

    // A rule with no recurrence has nothing to check.
    assert_cmd_snapshot!(
        check().arg(r#"{"recurrence_type":0}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":0}

    ----- stderr -----
    "#,
    );
}

/// Test that every problem in a rule is reported, not just the first.
#[test]
fn reports_every_problem() {
    assert_cmd_snapshot!(
        check().arg(
            r#"{"recurrence_type":2,"interval":0,"occurrences":0}"#,
        ),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    rule 1: interval: must be a positive whole number
    rule 1: days: at least one weekday must be selected
    rule 1: occurrences: must be a positive whole number
    "#,
    );
}

/// Test that the until-date is compared against the anchor.
#[test]
fn until_against_anchor() {
    assert_cmd_snapshot!(
        check().args(["-a", "2025-06-02"]).arg(
            r#"{"recurrence_type":1,"interval":1,"until":"2025-01-01"}"#,
        ),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    rule 1: until: must fall on or after the start date
    "#,
    );

    // The same rule is fine from an earlier start date.
    assert_cmd_snapshot!(
        check().args(["-a", "2024-12-31"]).arg(
            r#"{"recurrence_type":1,"interval":1,"until":"2025-01-01"}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":1,"interval":1,"until":"2025-01-01"}

    ----- stderr -----
    "#,
    );
}

/// Test that valid rules keep flowing while invalid ones are withheld.
#[test]
fn filters_a_stream() {
    assert_cmd_snapshot!(
        check().stdin(
            "{\"recurrence_type\":1,\"interval\":1}\n\
             {\"recurrence_type\":2,\"interval\":1}\n",
        ),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    {"recurrence_type":1,"interval":1}

    ----- stderr -----
    rule 2: days: at least one weekday must be selected
    "#,
    );
}

/// Test that structurally broken input fails the whole command rather than
/// being reported as a rule problem.
#[test]
fn structural_errors_are_fatal() {
    assert_cmd_snapshot!(
        check().arg(r#"{"recurrence_type":2,"interval":1,"days":999}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: weekday bitmask must be in the range 1..=127, but got `999` at line 1 column 45
    ",
    );

    assert_cmd_snapshot!(
        check().arg(
            r#"{"recurrence_type":2,"interval":1,"days":4,"occurrences":2,"until":"2025-12-31"}"#,
        ),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: `occurrences` and `until` are mutually exclusive at line 1 column 80
    ",
    );

    assert_cmd_snapshot!(
        check().arg(r#"{"recurrence_type":1,"interval":1,"days":4}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: daily rules must not carry `days`, `day_in_month` or `month` at line 1 column 43
    ",
    );
}

/// Test checking the output of an editing pipeline.
#[test]
fn closes_a_pipeline() {
    assert_cmd_snapshot!(
        crate::recur(["new", "-a", "2025-06-02"])
            .pipe(crate::recur(["set", "--interval", "0"]))
            .pipe(crate::recur(["check"])),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    rule 1: interval: must be a positive whole number
    ",
    );

    assert_cmd_snapshot!(
        crate::recur(["new", "-a", "2025-06-02"])
            .pipe(crate::recur(["end", "count", "10"]))
            .pipe(crate::recur(["check"])),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"occurrences":10}

    ----- stderr -----
    "#,
    );
}
