use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert!(
        parsed.get("includes").is_some(),
        "Config should have 'includes' field"
    );
    assert!(
        parsed.get("issuesFile").is_some(),
        "Config should have 'issuesFile' field"
    );
    assert!(
        parsed.get("sourceRoot").is_some(),
        "Config should have 'sourceRoot' field"
    );
    assert!(
        parsed.get("blame").is_some(),
        "Config should have 'blame' field"
    );

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .pardonrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".pardonrc.json").exists());

    let content = test.read_file(".pardonrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".pardonrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .pardonrc.json already exists
    ");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    test.write_file(
        "src/app.ts",
        "const x = 1; // pardon ts:S100 reviewed and accepted\n",
    )?;

    let output = test.scan_command().output()?;
    assert!(
        output.status.success(),
        "Scan command should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
