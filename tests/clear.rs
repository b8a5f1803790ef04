use crate::command::assert_cmd_snapshot;

fn clear() -> crate::command::Command {
    crate::recur(["clear"])
}

/// Test that clearing replaces a rule with the empty one.
#[test]
fn replaces_with_empty_rule() {
    assert_cmd_snapshot!(
        clear().arg(r#"{"recurrence_type":2,"interval":1,"days":4}"#),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":0}

    ----- stderr -----
    "#,
    );
}

/// Test that rules on stdin are cleared one per line.
#[test]
fn stdin_line_delimited() {
    assert_cmd_snapshot!(
        clear().stdin(
            "{\"recurrence_type\":2,\"interval\":1,\"days\":4}\n\
             {\"recurrence_type\":1,\"interval\":3,\"occurrences\":10}\n",
        ),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"recurrence_type":0}
    {"recurrence_type":0}

    ----- stderr -----
    "#,
    );

    // Should just do nothing.
    assert_cmd_snapshot!(
        clear().stdin(""),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----

    ----- stderr -----
    ",
    );
}

/// Test that input is still parsed. Garbage in, error out.
#[test]
fn rejects_garbage() {
    assert_cmd_snapshot!(
        clear().stdin("bogus\n"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    line 1 of <stdin>: invalid recurrence rule: expected value at line 1 column 1
    ",
    );

    assert_cmd_snapshot!(
        clear().arg("{}"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: missing field `recurrence_type` at line 1 column 2
    ",
    );

    // Recurring rules spell out their interval. There is no default.
    assert_cmd_snapshot!(
        clear().arg(r#"{"recurrence_type":2}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: missing field `interval` at line 1 column 21
    ",
    );

    assert_cmd_snapshot!(
        clear().arg(r#"{"recurrence_type":9}"#),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid recurrence rule: recurrence_type must be in the range 0..=4, but got `9` at line 1 column 21
    ",
    );
}
