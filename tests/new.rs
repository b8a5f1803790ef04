use crate::command::assert_cmd_snapshot;

fn new() -> crate::command::Command {
    crate::recur(["new"])
}

/// Test that `new` with no flags anchors on today.
///
/// `RECUR_NOW` pins today to 2025-06-02, a Monday, so the default rule
/// repeats every Monday.
#[test]
fn defaults_to_weekly_on_today() {
    assert_cmd_snapshot!(
        new(),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":2}

    ----- stderr -----
    "#,
    );
}

/// Test that the anchor flag picks the weekday of the rule.
#[test]
fn anchor_picks_the_weekday() {
    // 2025-06-05 is a Thursday.
    assert_cmd_snapshot!(
        new().args(["-a", "2025-06-05"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":16}

    ----- stderr -----
    "#,
    );

    // 2025-06-07 is a Saturday.
    assert_cmd_snapshot!(
        new().args(["--anchor", "2025-06-07"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":64}

    ----- stderr -----
    "#,
    );
}

/// Test that relative dates work as anchors.
#[test]
fn anchor_accepts_relative_dates() {
    // Tomorrow is 2025-06-03, a Tuesday.
    assert_cmd_snapshot!(
        new().args(["-a", "tomorrow"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":4}

    ----- stderr -----
    "#,
    );

    assert_cmd_snapshot!(
        new().args(["-a", "next friday"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":32}

    ----- stderr -----
    "#,
    );
}

/// Test that an unparseable anchor names the offending flag.
#[test]
fn anchor_unrecognized() {
    assert_cmd_snapshot!(
        new().args(["-a", "someday"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -a/--anchor: unrecognized date `someday`
    ",
    );
}
