use std::fs;
use std::process::Command;

#[test]
fn cli_writes_flat_book_for_one_move() {
    let dir = std::env::temp_dir().join(format!("kalah_book_cli_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    let exe = env!("CARGO_BIN_EXE_kalah_book");
    let output = Command::new(exe)
        .args(["horizon=1", "move=2", "table=1000"])
        .arg(format!("out={}", dir.display()))
        .output()
        .expect("failed to run book binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("first move 2: "), "{stdout}");
    assert!(stdout.contains(" nodes "));

    let written: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, vec!["flat_south_2_0000.txt".to_string()]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cli_runs_all_workers_on_threads() {
    let exe = env!("CARGO_BIN_EXE_kalah_book");
    let output = Command::new(exe)
        .args(["horizon=1", "record=off", "workers=4", "worker=all"])
        .output()
        .expect("failed to run book binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut moves: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("first move "))
        .filter_map(|rest| rest.split(':').next())
        .collect();
    moves.sort_unstable();
    assert_eq!(moves, vec!["0", "1", "2", "3", "4", "5", "6"]);
}

#[test]
fn cli_rejects_bad_arguments() {
    let exe = env!("CARGO_BIN_EXE_kalah_book");
    for args in [&["speed=fast"][..], &["tree=99"][..], &["workers=2", "worker=5"][..]] {
        let output = Command::new(exe)
            .args(args)
            .output()
            .expect("failed to run book binary");
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        assert!(String::from_utf8_lossy(&output.stderr).contains("error: "));
    }
}

#[test]
fn cli_rejects_illegal_first_move() {
    let exe = env!("CARGO_BIN_EXE_kalah_book");
    let output = Command::new(exe)
        .args(["horizon=1", "record=off", "move=11"])
        .output()
        .expect("failed to run book binary");
    assert_eq!(output.status.code(), Some(1));
}
