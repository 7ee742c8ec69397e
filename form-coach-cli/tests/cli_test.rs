use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Normalized squat landmarks on a 640x480 image for the given knee angle
fn squat_line(frame: u64, knee_deg: f32) -> String {
    let knee = (320.0f32, 300.0f32);
    let ankle = (320.0f32, 400.0f32);
    let (sin, cos) = knee_deg.to_radians().sin_cos();
    let hip = (knee.0 - 100.0 * sin, knee.1 + 100.0 * cos);
    let (tx, ty) = ((knee.0 - hip.0) / 100.0, (knee.1 - hip.1) / 100.0);
    let shoulder = (hip.0 - 100.0 * ty, hip.1 + 100.0 * tx);

    let points = [
        (11, shoulder.0 - 10.0, shoulder.1),
        (12, shoulder.0 + 10.0, shoulder.1),
        (23, hip.0 - 10.0, hip.1),
        (24, hip.0 + 10.0, hip.1),
        (25, knee.0, knee.1),
        (27, ankle.0, ankle.1),
    ];
    let landmarks: Vec<String> = points
        .iter()
        .map(|(index, x, y)| {
            format!(
                r#"{{"index": {}, "x": {}, "y": {}, "visibility": 0.95}}"#,
                index,
                x / 640.0,
                y / 480.0
            )
        })
        .collect();

    format!(
        r#"{{"frame": {}, "timestamp_ms": {}, "width": 640, "height": 480, "landmarks": [{}]}}"#,
        frame,
        frame * 33,
        landmarks.join(", ")
    )
}

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    frames: PathBuf,
}

/// Config with a short debounce plus a recording with one frame per knee angle
fn fixture(knees: &[f32]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[stability]\nrequired_stable_frames = 3\n").unwrap();

    let lines: Vec<String> = knees
        .iter()
        .enumerate()
        .map(|(i, knee)| squat_line(i as u64, *knee))
        .collect();
    let frames = dir.path().join("frames.jsonl");
    fs::write(&frames, lines.join("\n")).unwrap();

    Fixture {
        _dir: dir,
        config,
        frames,
    }
}

fn two_squats() -> Fixture {
    fixture(&[170.0, 170.0, 170.0, 170.0, 110.0, 110.0, 170.0, 140.0, 105.0, 170.0, 170.0])
}

fn form_coach(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("form-coach").unwrap();
    cmd.env_remove("FORM_COACH_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("form-coach").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Squat and lunge form coach"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("form-coach").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("form-coach").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_form__coach()"))
        .stdout(predicate::str::contains("complete -F"));
}

#[test]
fn test_replay_counts_reps() {
    let fixture = two_squats();

    form_coach(&fixture.config)
        .arg("replay")
        .arg(&fixture.frames)
        .arg("--exercise")
        .arg("squat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hold a steady position (1/3)..."))
        .stdout(predicate::str::contains("Great squat position!"))
        .stdout(predicate::str::contains("Great! Rep 2 completed."))
        .stdout(predicate::str::contains("Session Summary"))
        .stdout(predicate::str::contains("Reps:       2"));
}

#[test]
fn test_replay_stops_at_target() {
    let fixture = two_squats();

    form_coach(&fixture.config)
        .args(["replay", "--target", "1"])
        .arg(&fixture.frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("Great! Rep 1 completed."))
        .stdout(predicate::str::contains("CONGRATULATIONS! Target of 1 reps reached!"))
        .stdout(predicate::str::contains("Rep 2 completed").not())
        .stdout(predicate::str::contains("Reps:       1/1"));
}

#[test]
fn test_replay_json_output() {
    let fixture = two_squats();

    let output = form_coach(&fixture.config)
        .args(["replay", "--json"])
        .arg(&fixture.frames)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // one object per frame plus the summary
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0]["frame"], 0);
    assert_eq!(lines[0]["is_stable"], false);
    assert_eq!(lines[2]["notice"], "Stable. You may begin the exercise!");

    let summary = &lines[11]["summary"];
    assert_eq!(summary["reps"], 2);
    assert_eq!(summary["frames"], 11);
    assert_eq!(summary["exercise"], "squat");
}

#[test]
fn test_replay_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");

    form_coach(&config)
        .arg("replay")
        .arg(dir.path().join("nope.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_replay_malformed_record() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    let frames = dir.path().join("frames.jsonl");
    fs::write(&frames, format!("{}\n{{broken\n", squat_line(0, 170.0))).unwrap();

    form_coach(&config)
        .arg("replay")
        .arg(&frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2"));
}

#[test]
fn test_replay_rejects_unschedulable_fps() {
    let fixture = two_squats();

    form_coach(&fixture.config)
        .args(["replay", "--realtime", "--fps", "1e-30"])
        .arg(&fixture.frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Frame rate must be positive"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_replay_rejects_unknown_exercise() {
    let fixture = two_squats();

    form_coach(&fixture.config)
        .args(["replay", "--exercise", "pushup"])
        .arg(&fixture.frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown exercise"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("form-coach").join("config.toml");

    form_coach(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Configuration initialized"));
    assert!(config.exists());

    form_coach(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force to overwrite"));

    form_coach(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("required_stable_frames = 20"))
        .stdout(predicate::str::contains("min_visibility = 0.3\n"));
}

#[test]
fn test_config_path_uses_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");

    form_coach(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_invalid_config_is_reported() {
    let fixture = two_squats();
    fs::write(&fixture.config, "[stability]\nrequired_stable_frames = 0\n").unwrap();

    form_coach(&fixture.config)
        .arg("replay")
        .arg(&fixture.frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
