use crate::command::assert_cmd_snapshot;

fn mv() -> crate::command::Command {
    crate::recur(["move"])
}

/// Test that a weekly selection follows the start date, with a notice.
#[test]
fn weekly_follows() {
    // Tuesday to Wednesday.
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-03", "--to", "2025-06-04"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":4}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":8}

    ----- stderr -----
    rule 1: repeat pattern followed the start date from 2025-06-03 to 2025-06-04
    "#,
    );

    // A hand-picked selection keeps its shape: Monday, Wednesday and
    // Friday shifted two days over becomes Wednesday, Friday and Sunday.
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-02", "--to", "2025-06-04"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":42}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":41}

    ----- stderr -----
    rule 1: repeat pattern followed the start date from 2025-06-02 to 2025-06-04
    "#,
    );
}

/// Test that moving by a whole number of weeks changes nothing and says
/// nothing.
#[test]
fn whole_weeks_are_quiet() {
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-02", "--to", "2025-06-09"])
            .arg(r#"{"recurrence_type":2,"interval":1,"days":42}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":2,"interval":1,"days":42}

    ----- stderr -----
    "#,
    );
}

/// Test that monthly patterns are recomputed from the new date.
#[test]
fn monthly_recomputes() {
    // The third Tuesday becomes the fourth Friday.
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-17", "--to", "2025-06-27"]).arg(
            r#"{"recurrence_type":3,"interval":1,"days":4,"day_in_month":3}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":3,"interval":1,"days":32,"day_in_month":4}

    ----- stderr -----
    rule 1: repeat pattern followed the start date from 2025-06-17 to 2025-06-27
    "#,
    );

    // By date, the day of the month follows.
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-17", "--to", "2025-06-20"])
            .arg(r#"{"recurrence_type":3,"interval":1,"day_in_month":17}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":3,"interval":1,"day_in_month":20}

    ----- stderr -----
    rule 1: repeat pattern followed the start date from 2025-06-17 to 2025-06-20
    "#,
    );
}

/// Test that yearly rules re-pin their month.
#[test]
fn yearly_repins_month() {
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-17", "--to", "2025-09-05"]).arg(
            r#"{"recurrence_type":4,"interval":1,"day_in_month":17,"month":5}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":4,"interval":1,"day_in_month":5,"month":8}

    ----- stderr -----
    rule 1: repeat pattern followed the start date from 2025-06-17 to 2025-09-05
    "#,
    );
}

/// Test that an until-date stranded behind the new start date is dropped,
/// without a notice.
#[test]
fn stale_until_dropped_quietly() {
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-02", "--to", "2025-07-01"]).arg(
            r#"{"recurrence_type":1,"interval":1,"until":"2025-06-10"}"#,
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":1,"interval":1}

    ----- stderr -----
    "#,
    );
}

/// Test that notices carry the position of the rule they're about.
#[test]
fn notices_are_numbered() {
    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-02", "--to", "2025-06-03"]).stdin(
            "{\"recurrence_type\":1,\"interval\":1}\n\
             {\"recurrence_type\":2,\"interval\":1,\"days\":2}\n",
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":1,"interval":1}
    {"recurrence_type":2,"interval":1,"days":4}

    ----- stderr -----
    rule 2: repeat pattern followed the start date from 2025-06-02 to 2025-06-03
    "#,
    );
}

/// Test that both endpoints of the move are required.
#[test]
fn both_dates_required() {
    assert_cmd_snapshot!(
        mv().arg(r#"{"recurrence_type":1,"interval":1}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    the old start date is required; pass it with --from
    ",
    );

    assert_cmd_snapshot!(
        mv().args(["--from", "2025-06-02"])
            .arg(r#"{"recurrence_type":1,"interval":1}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    the new start date is required; pass it with --to
    ",
    );
}
