#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let stations = common::station_file(&[("S1", "Active", "Normal")]).unwrap();

    // 1. First run: leave a transaction open
    let commands1 = common::command_file(&["start,S1", "scan,S1,Milk,3.99,1.00,1.00"]).unwrap();
    let output1 = Command::new(cargo_bin!("selfcheckout"))
        .arg(stations.path())
        .arg("--commands")
        .arg(commands1.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("S1,Active,InProgress,false,Normal,3.99"));

    // 2. Second run: the open transaction is restored, extended and paid
    let receipts = dir.path().join("receipts.jsonl");
    let commands2 = common::command_file(&[
        "scan,S1,Bread,2.50,0.50,1.50",
        "pay,S1,cash,10.00",
    ])
    .unwrap();
    let output2 = Command::new(cargo_bin!("selfcheckout"))
        .arg(stations.path())
        .arg("--commands")
        .arg(commands2.path())
        .arg("--db-path")
        .arg(&db_path)
        .arg("--receipts")
        .arg(&receipts)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("S1,Active,Idle,false,Normal,0"));

    let receipt = std::fs::read_to_string(&receipts).unwrap();
    assert!(receipt.contains("Milk"));
    assert!(receipt.contains("\"6.49\""));
}
