use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let stations = common::station_file(&[("S1", "Active", "Normal"), ("S2", "Active", "Low")])?;
    let commands = common::command_file(&[
        "start,S1",
        "scan,S1,Milk,3.99,1.00,1.00",
        "scan,S1,Bread,2.50,0.50,1.80",
        "resolve_weight,S1,true",
        "pay,S1,cash,10.00",
        "start,S2",
        "scan,S2,Eggs,4.00,0.60,0.60",
    ])?;

    let mut cmd = Command::new(cargo_bin!("selfcheckout"));
    cmd.arg(stations.path()).arg("--commands").arg(commands.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,operational_status,transaction_state,needs_assistance,cash_level,total",
        ))
        .stdout(predicate::str::contains("S1,Active,Idle,false,Normal,0"))
        .stdout(predicate::str::contains("S2,Active,InProgress,false,Low,4.00"))
        .stderr(predicate::str::contains("weight mismatch"));

    Ok(())
}

#[test]
fn test_cli_reads_commands_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let stations = common::station_file(&[("S1", "Active", "Normal")])?;

    let mut cmd = Command::new(cargo_bin!("selfcheckout"));
    cmd.arg(stations.path())
        .write_stdin("start,S1\nscan,S1,Tea,2.10,0.10,0.90\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("S1,Active,WeightMismatch,true,Normal,2.10"));

    Ok(())
}

#[test]
fn test_cli_keeps_going_after_bad_commands() -> Result<(), Box<dyn std::error::Error>> {
    let stations = common::station_file(&[("S1", "Maintenance", "Normal"), ("S2", "Active", "Normal")])?;
    let commands = common::command_file(&[
        "start,S1",
        "launch,S2",
        "scan,S2,Milk,not_a_price,1,1",
        "start,S9",
        "start,S2",
        "scan,S2,Milk,3.99,1.00,1.00",
    ])?;

    let mut cmd = Command::new(cargo_bin!("selfcheckout"));
    cmd.arg(stations.path()).arg("--commands").arg(commands.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error processing command"))
        .stderr(predicate::str::contains("Error reading command"))
        .stdout(predicate::str::contains("S1,Maintenance,Idle,false,Normal,0"))
        .stdout(predicate::str::contains("S2,Active,InProgress,false,Normal,3.99"));

    Ok(())
}

#[test]
fn test_cli_transfer_and_receipts_file() -> Result<(), Box<dyn std::error::Error>> {
    let stations = common::station_file(&[("S1", "Active", "Normal"), ("S2", "Active", "Normal")])?;
    let commands = common::command_file(&[
        "start,S1",
        "scan,S1,Eggs,4.00,0.60,0.60",
        "scan,S1,Butter,3.50,0.25,0.85",
        "transfer,S1,S2",
        "pay,S2,cash,20",
    ])?;
    let dir = tempfile::tempdir()?;
    let receipts = dir.path().join("receipts.jsonl");

    let mut cmd = Command::new(cargo_bin!("selfcheckout"));
    cmd.arg(stations.path())
        .arg("--commands")
        .arg(commands.path())
        .arg("--receipts")
        .arg(&receipts);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("S1,Active,Idle,false,Normal,0"))
        .stdout(predicate::str::contains("S2,Active,Idle,false,Normal,0"));

    let content = std::fs::read_to_string(&receipts)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let receipt: serde_json::Value = serde_json::from_str(lines[0])?;
    assert_eq!(receipt["station_id"], "S2");
    assert_eq!(receipt["items"][0]["name"], "Eggs");
    assert_eq!(receipt["items"][1]["name"], "Butter");

    Ok(())
}

#[test]
fn test_cli_card_decline_with_seeded_gateway() -> Result<(), Box<dyn std::error::Error>> {
    let stations = common::station_file(&[("S1", "Active", "Normal")])?;
    let commands = common::command_file(&["start,S1", "scan,S1,Wine,9.99,1.2,1.2", "pay,S1,card,4111"])?;

    let mut cmd = Command::new(cargo_bin!("selfcheckout"));
    cmd.arg(stations.path())
        .arg("--commands")
        .arg(commands.path())
        .arg("--card-approval-rate")
        .arg("0.0")
        .arg("--card-seed")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("S1,Active,PaymentError,true,Normal,9.99"));

    Ok(())
}
