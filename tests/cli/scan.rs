use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_scan_reports_directive() -> Result<()> {
    let test = CliTest::with_file(
        "src/payment.ts",
        r#"function total() {
  const amount = compute(); // pardon java:S123 reviewed with the security team
  return amount;
}
"#,
    )?;

    assert_cmd_snapshot!(test.scan_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    accept: "reviewed with the security team"  java:S123
      --> src/payment.ts:2

    ✓ Found 1 directive in 1 component (1 file scanned)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_scan_false_positive_with_multiple_keys() -> Result<()> {
    let test = CliTest::with_file(
        "src/ui/app.tsx",
        "const token = rand(); // pardon [fp] ts:S2245,ts:S999 crypto use is test-only\n",
    )?;

    assert_cmd_snapshot!(test.scan_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    false-positive: "crypto use is test-only"  ts:S2245, ts:S999
      --> src/ui/app.tsx:1

    ✓ Found 1 directive in 1 component (1 file scanned)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_scan_sorts_components() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/b.ts", "x(); // pardon ts:S2 allow b\n")?;
    test.write_file("src/a.ts", "y(); // pardon ts:S1 allow a\n")?;

    assert_cmd_snapshot!(test.scan_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    accept: "allow a"  ts:S1
      --> src/a.ts:1

    accept: "allow b"  ts:S2
      --> src/b.ts:1

    ✓ Found 2 directives in 2 components (2 files scanned)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_scan_json_format() -> Result<()> {
    let test = CliTest::with_file(
        "src/payment.ts",
        r#"function total() {
  const amount = compute(); // pardon java:S123 reviewed with the security team
  return amount;
}
"#,
    )?;

    assert_cmd_snapshot!(test.scan_command().args(["--format", "json"]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "components": [
        {
          "component": "src/payment.ts",
          "directives": [
            {
              "ruleKeys": [
                "java:S123"
              ],
              "range": {
                "start": 2,
                "end": 2
              },
              "outcome": "accept",
              "comment": "reviewed with the security team"
            }
          ]
        }
      ],
      "warnings": [],
      "directiveCount": 1,
      "filesScanned": 1,
      "filesSkipped": 0
    }

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_scan_malformed_directive() -> Result<()> {
    let test = CliTest::with_file(
        "src/legacy.ts",
        "doWork(); // pardon bogus this will not parse\n",
    )?;

    assert_cmd_snapshot!(test.scan_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    ✘ No directives found (1 file scanned, 1 warning)

    ----- stderr -----
    warning: directive has no valid rule key in 'bogus' (src/legacy.ts:1)
    ");

    Ok(())
}

#[test]
fn test_scan_empty_project() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.scan_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ No directives found (0 files scanned)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_scan_config_includes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".pardonrc.json", r#"{ "includes": ["app"] }"#)?;
    test.write_file("app/main.go", "fmt.Println() // pardon go:S100 verified manually\n")?;
    test.write_file("src/skip.ts", "x(); // pardon ts:S1 not scanned\n")?;

    assert_cmd_snapshot!(test.scan_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    accept: "verified manually"  go:S100
      --> app/main.go:1

    ✓ Found 1 directive in 1 component (1 file scanned)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_scan_config_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".pardonrc.json",
        r#"{ "includes": ["src"], "ignores": ["**/generated/**"] }"#,
    )?;
    test.write_file("src/app.ts", "x(); // pardon ts:S100 reviewed\n")?;
    test.write_file("src/generated/gen.ts", "y(); // pardon ts:S200 ignored\n")?;

    assert_cmd_snapshot!(test.scan_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    accept: "reviewed"  ts:S100
      --> src/app.ts:1

    ✓ Found 1 directive in 1 component (1 file scanned)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("apply"));
    assert!(stdout.contains("init"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Usage:"));

    Ok(())
}
