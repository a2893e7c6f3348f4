use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const PAYMENT_SOURCE: &str = r#"function total() {
  const amount = compute(); // pardon java:S123 reviewed with the security team
  return amount;
}
"#;

const OPEN_ISSUE_SNAPSHOT: &str = r#"{
  "issues": [
    {
      "key": "AX-1",
      "componentKey": "src/payment.ts",
      "ruleKey": "java:S123",
      "line": 2,
      "status": "OPEN"
    }
  ]
}
"#;

fn payment_project() -> Result<CliTest> {
    let test = CliTest::with_file("src/payment.ts", PAYMENT_SOURCE)?;
    test.write_file(".pardon/issues.json", OPEN_ISSUE_SNAPSHOT)?;
    Ok(test)
}

#[test]
fn test_apply_dry_run_applies_directive() -> Result<()> {
    let test = payment_project()?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    accepted java:S123  src/payment.ts:2

    ✓ 1 applied (1 issue checked)
    note: dry run, pass --write to save the updated snapshot

    ----- stderr -----
    ");

    // Nothing is saved without --write.
    let saved: serde_json::Value = serde_json::from_str(&test.read_file(".pardon/issues.json")?)?;
    assert_eq!(saved["issues"][0]["status"], "OPEN");

    Ok(())
}

#[test]
fn test_apply_write_saves_snapshot() -> Result<()> {
    let test = payment_project()?;

    assert_cmd_snapshot!(test.apply_command().arg("--write"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    accepted java:S123  src/payment.ts:2

    ✓ 1 applied (1 issue checked)

    ----- stderr -----
    ");

    insta::assert_snapshot!(test.read_file(".pardon/issues.json")?.trim_end(), @r#"
    {
      "issues": [
        {
          "key": "AX-1",
          "componentKey": "src/payment.ts",
          "ruleKey": "java:S123",
          "line": 2,
          "status": "RESOLVED",
          "resolution": "WONT_FIX",
          "kind": "ordinary",
          "internalTags": [
            "issue-resolution"
          ],
          "comments": [
            {
              "message": "issue-resolution: reviewed with the security team"
            }
          ]
        }
      ]
    }
    "#);

    Ok(())
}

#[test]
fn test_apply_reopens_when_directive_removed() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".pardon/issues.json",
        r#"{
  "issues": [
    {
      "key": "AX-1",
      "componentKey": "src/payment.ts",
      "ruleKey": "java:S123",
      "line": 2,
      "status": "RESOLVED",
      "resolution": "WONT_FIX",
      "internalTags": ["issue-resolution"]
    }
  ]
}
"#,
    )?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    reopened java:S123  src/payment.ts:2 (directive removed)

    ✓ 1 reopened (1 issue checked)
    note: dry run, pass --write to save the updated snapshot

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_apply_hotspot_acknowledges() -> Result<()> {
    let test = CliTest::with_file(
        "src/sec.ts",
        "const t = rng(); // pardon ts:S2245 rotation handled by vault\n",
    )?;
    test.write_file(
        ".pardon/issues.json",
        r#"{
  "issues": [
    {
      "key": "HS-1",
      "componentKey": "src/sec.ts",
      "ruleKey": "ts:S2245",
      "line": 1,
      "status": "TO_REVIEW",
      "kind": "hotspot"
    }
  ]
}
"#,
    )?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    acknowledged ts:S2245  src/sec.ts:1

    ✓ 1 applied (1 issue checked)
    note: dry run, pass --write to save the updated snapshot

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_apply_no_matching_directives() -> Result<()> {
    let test = CliTest::with_file("src/payment.ts", "function total() {}\n")?;
    test.write_file(".pardon/issues.json", OPEN_ISSUE_SNAPSHOT)?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ no changes (1 issue checked)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_apply_missing_snapshot() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Failed to read issue snapshot: ./.pardon/issues.json
    ");

    Ok(())
}

#[test]
fn test_apply_counts_unmatched_issues() -> Result<()> {
    let test = CliTest::with_file("src/payment.ts", PAYMENT_SOURCE)?;
    test.write_file(
        ".pardon/issues.json",
        r#"{
  "issues": [
    {
      "key": "AX-1",
      "componentKey": "src/payment.ts",
      "ruleKey": "java:S123",
      "line": 2,
      "status": "OPEN"
    },
    {
      "key": "AX-2",
      "componentKey": "src/payment.ts",
      "ruleKey": "java:S999",
      "line": 3,
      "status": "OPEN"
    }
  ]
}
"#,
    )?;

    assert_cmd_snapshot!(test.apply_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    accepted java:S123  src/payment.ts:2

    ✓ 1 applied (2 issues checked)
    note: dry run, pass --write to save the updated snapshot

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_apply_issues_flag_overrides_path() -> Result<()> {
    let test = CliTest::with_file("src/payment.ts", PAYMENT_SOURCE)?;
    test.write_file("export/snapshot.json", OPEN_ISSUE_SNAPSHOT)?;

    let output = test
        .apply_command()
        .args(["--issues", "export/snapshot.json", "--write"])
        .output()?;
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&test.read_file("export/snapshot.json")?)?;
    assert_eq!(saved["issues"][0]["status"], "RESOLVED");
    assert_eq!(saved["issues"][0]["resolution"], "WONT_FIX");

    Ok(())
}

#[test]
fn test_apply_no_blame_flag() -> Result<()> {
    let test = payment_project()?;

    let output = test.apply_command().arg("--no-blame").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 applied"));

    Ok(())
}
