use crate::command::assert_cmd_snapshot;

fn set() -> crate::command::Command {
    crate::recur(["set"])
}

/// Test that the interval can be replaced on its own.
#[test]
fn interval() {
    assert_cmd_snapshot!(
        set()
            .args(["--interval", "2"])
            .stdin("{\"recurrence_type\":2,\"interval\":1,\"days\":2}\n"),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":2,"days":2}

    ----- stderr -----
    "#,
    );
}

/// Test that `-w` replaces the whole weekday set of a weekly rule.
#[test]
fn weekdays_replace_the_set() {
    assert_cmd_snapshot!(
        set()
            .args(["-w", "mon,wed,fri"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":2}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":42}

    ----- stderr -----
    "#,
    );

    // For a monthly rule repeating by weekday, one weekday replaces the
    // weekday the ordinal refers to.
    assert_cmd_snapshot!(
        set().args(["-w", "fri"]).arg(
            r#"{"recurrence_type":3,"interval":1,"days":4,"day_in_month":3}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":3,"interval":1,"days":32,"day_in_month":3}

    ----- stderr -----
    "#,
    );

    assert_cmd_snapshot!(
        set().args(["-w", "mon,fri"]).arg(
            r#"{"recurrence_type":3,"interval":1,"days":4,"day_in_month":3}"#,
        ),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    monthly and yearly rules repeat on exactly one weekday, but 2 were given
    ",
    );
}

/// Test switching a weekly rule to "the third Tuesday of every month."
///
/// 2025-06-17 is the third Tuesday of its month, so the by-weekday pattern
/// is read straight off the anchor.
#[test]
fn monthly_by_weekday_from_anchor() {
    assert_cmd_snapshot!(
        set()
            .args(["-a", "2025-06-17", "--freq", "monthly", "--by", "weekday"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":4}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":3,"interval":1,"days":4,"day_in_month":3}

    ----- stderr -----
    "#,
    );
}

/// Test building "every year on May 4th" out of a weekly rule.
#[test]
fn yearly_month_and_day() {
    assert_cmd_snapshot!(
        set()
            .args(["--freq", "yearly", "--month", "may", "-d", "4"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":2}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":4,"interval":1,"day_in_month":4,"month":4}

    ----- stderr -----
    "#,
    );
}

/// Test the `weekdays` shorthand and its relationship to `RECUR_WORKWEEK`.
#[test]
fn weekdays_shorthand() {
    assert_cmd_snapshot!(
        set()
            .args(["--freq", "weekdays"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":2}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":62}

    ----- stderr -----
    "#,
    );

    // A Sunday-Thursday workweek selects a different mask.
    assert_cmd_snapshot!(
        set()
            .env("RECUR_WORKWEEK", "sun..thu")
            .args(["--freq", "weekdays"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":2}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":31}

    ----- stderr -----
    "#,
    );

    // The shorthand pins the interval.
    assert_cmd_snapshot!(
        set()
            .args(["--interval", "2"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":62}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    a rule repeating on every workday has a fixed interval of 1
    ",
    );
}

/// Test that flags which don't apply to a rule's cadence are rejected.
#[test]
fn inapplicable_flags() {
    assert_cmd_snapshot!(
        set().args(["-d", "10"]).arg(
            r#"{"recurrence_type":3,"interval":1,"days":4,"day_in_month":3}"#,
        ),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    this rule repeats by weekday; switch it with `--by date` before picking a day of the month
    ",
    );

    assert_cmd_snapshot!(
        set()
            .args(["--month", "may"])
            .arg(r#"{"recurrence_type":3,"interval":1,"day_in_month":15}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    a month only applies to yearly rules
    ",
    );

    assert_cmd_snapshot!(
        set().args(["--interval", "3"]).arg(
            r#"{"recurrence_type":4,"interval":1,"day_in_month":4,"month":4}"#,
        ),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    yearly rules always repeat every year
    ",
    );
}

/// Test that a bogus weekday in a sequence names the flag and the item.
#[test]
fn bad_weekday() {
    assert_cmd_snapshot!(
        set().args(["-w", "mon,funday"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -w/--weekday: failed to parse `funday` within sequence `mon,funday`: unrecognized weekday: `funday`
    ",
    );
}

/// Test composing `new` and `set` in a pipeline.
#[test]
fn composes_with_new() {
    assert_cmd_snapshot!(
        crate::recur(["new", "-a", "2025-06-02"])
            .pipe(crate::recur(["set", "--interval", "2", "-w", "mon,thu"])),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":2,"days":18}

    ----- stderr -----
    "#,
    );
}
