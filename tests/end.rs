use crate::command::assert_cmd_snapshot;

fn end() -> crate::command::Command {
    crate::recur(["end"])
}

/// Test setting an explicit until-date and an explicit count.
#[test]
fn explicit_values() {
    assert_cmd_snapshot!(
        end()
            .args(["until", "2025-12-31"])
            .stdin("{\"recurrence_type\":2,\"interval\":1,\"days\":2}\n"),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"until":"2025-12-31"}

    ----- stderr -----
    "#,
    );

    assert_cmd_snapshot!(
        end()
            .args(["count", "10"])
            .stdin("{\"recurrence_type\":2,\"interval\":1,\"days\":2}\n"),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"occurrences":10}

    ----- stderr -----
    "#,
    );

    // The until-date takes the same formats as `-a/--anchor`, so relative
    // dates work. Tomorrow is 2025-06-03.
    assert_cmd_snapshot!(
        end()
            .args(["until", "tomorrow"])
            .stdin("{\"recurrence_type\":2,\"interval\":1,\"days\":2}\n"),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"until":"2025-06-03"}

    ----- stderr -----
    "#,
    );
}

/// Test that `never` drops the end condition entirely.
#[test]
fn never_strips() {
    assert_cmd_snapshot!(
        end().arg("never").arg(
            r#"{"recurrence_type":2,"interval":1,"days":2,"until":"2025-12-31"}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2}

    ----- stderr -----
    "#,
    );
}

/// Test converting between end conditions when the value is omitted.
#[test]
fn conversions() {
    // Ten weekly occurrences starting 2025-06-02 run through 2025-08-04,
    // nine weeks later.
    assert_cmd_snapshot!(
        end().args(["until", "-a", "2025-06-02"]).arg(
            r#"{"recurrence_type":2,"interval":1,"days":4,"occurrences":10}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":4,"until":"2025-08-04"}

    ----- stderr -----
    "#,
    );

    // And back: the until-date nine weeks out converts to ten occurrences.
    assert_cmd_snapshot!(
        end().args(["count", "-a", "2025-06-02"]).arg(
            r#"{"recurrence_type":2,"interval":1,"days":2,"until":"2025-08-04"}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"occurrences":10}

    ----- stderr -----
    "#,
    );

    // From never, until lands one period out.
    assert_cmd_snapshot!(
        end()
            .args(["until", "-a", "2025-06-02"])
            .arg(r#"{"recurrence_type":3,"interval":1,"day_in_month":2}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":3,"interval":1,"day_in_month":2,"until":"2025-07-02"}

    ----- stderr -----
    "#,
    );

    // A single occurrence is the start date itself.
    assert_cmd_snapshot!(
        end()
            .args(["until", "-a", "2025-06-02"])
            .arg(r#"{"recurrence_type":1,"interval":1,"occurrences":1}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":1,"interval":1,"until":"2025-06-02"}

    ----- stderr -----
    "#,
    );

    assert_cmd_snapshot!(
        end()
            .arg("count")
            .stdin("{\"recurrence_type\":2,\"interval\":1,\"days\":2}\n"),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"occurrences":1}

    ----- stderr -----
    "#,
    );
}

/// Test the ways `end` can be asked for something nonsensical.
#[test]
fn bad_requests() {
    assert_cmd_snapshot!(
        end(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    an end condition is required: `never`, `until` or `count`
    ",
    );

    assert_cmd_snapshot!(
        end().arg("quux"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    unrecognized end condition: `quux` (expected `never`, `until` or `count`)
    ",
    );

    assert_cmd_snapshot!(
        end().args(["never", "5"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    end condition `never` does not take a value, but `5` was given
    ",
    );

    assert_cmd_snapshot!(
        end().args(["count", "zero"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid occurrence count `zero`
    ",
    );

    assert_cmd_snapshot!(
        end().args(["count", "10"]).arg(r#"{"recurrence_type":0}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    this rule has no recurrence to set an end condition on
    ",
    );

    assert_cmd_snapshot!(
        end().args(["until", "-a", "2025-06-02"]).arg(
            r#"{"recurrence_type":4,"interval":1,"day_in_month":17,"month":5,"occurrences":20000}"#,
        ),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    `19999` periods is too many for calendar arithmetic: parameter 'years' is not in the required range of -19998..=19998
    ",
    );
}

/// Test composing `new` and `end` in a pipeline.
#[test]
fn composes_with_new() {
    assert_cmd_snapshot!(
        crate::recur(["new", "-a", "2025-06-02"])
            .pipe(crate::recur(["end", "count", "10"])),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2,"occurrences":10}

    ----- stderr -----
    "#,
    );
}
