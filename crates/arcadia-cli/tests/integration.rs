//! Integration tests for arcadia-cli.
//!
//! Runs the `arcadia` binary against factory machines and machine files in
//! temporary directories.

use std::process::Command;

use arcadia_config::{InputConfig, MachineConfig, PaletteConfig, ProducerKind, StreamConfig};
use arcadia_io::{read_wav, read_wav_stereo};
use tempfile::TempDir;

/// Helper to get the path to the `arcadia` binary built by cargo.
fn arcadia_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_arcadia"))
}

fn run_ok(args: &[&str]) -> String {
    let output = arcadia_bin()
        .args(args)
        .output()
        .expect("failed to run arcadia");
    assert!(
        output.status.success(),
        "arcadia {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_err(args: &[&str]) -> String {
    let output = arcadia_bin()
        .args(args)
        .output()
        .expect("failed to run arcadia");
    assert!(!output.status.success(), "arcadia {args:?} should fail");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_factory_demo() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("demo.wav");

    let stdout = run_ok(&["render", "demo", out.to_str().unwrap(), "--seconds", "0.5"]);
    assert!(stdout.contains("Wrote"), "got: {stdout}");

    let (samples, spec) = read_wav(&out).unwrap();
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples.len(), 24000);
    assert!(samples.iter().any(|&s| s != 0));
}

#[test]
fn render_machine_file_in_stereo() {
    let temp = TempDir::new().unwrap();
    let machine_path = temp.path().join("pair.toml");
    let out = temp.path().join("pair.wav");

    MachineConfig::new("pair")
        .with_refresh_rate(50.0)
        .with_stream(StreamConfig::new(
            "src",
            16000,
            ProducerKind::Tone {
                frequency: 0.0,
                amplitude: 1200,
            },
        ))
        .with_stream(
            StreamConfig::new("left", 8000, ProducerKind::Mixer { inputs: 1 })
                .with_input(InputConfig::new("src")),
        )
        .with_stream(
            StreamConfig::new("right", 8000, ProducerKind::Mixer { inputs: 1 })
                .with_input(InputConfig::new("src").with_gain(0.25)),
        )
        .save(&machine_path)
        .unwrap();

    run_ok(&[
        "render",
        machine_path.to_str().unwrap(),
        out.to_str().unwrap(),
        "--seconds",
        "0.1",
        "--stream",
        "left",
        "--right",
        "right",
        "--bit-depth",
        "24",
    ]);

    let (stereo, spec) = read_wav_stereo(&out).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(stereo.len(), 800);
    assert!(stereo.left.iter().all(|&s| s == 1200));
    assert!(stereo.right.iter().all(|&s| s == 300));
}

#[test]
fn render_rejects_unknown_machine_and_stream() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("x.wav");
    let stderr = run_err(&["render", "no_such_machine_51d0", out.to_str().unwrap()]);
    assert!(stderr.contains("no_such_machine_51d0"), "got: {stderr}");

    let stderr = run_err(&["render", "demo", out.to_str().unwrap(), "--stream", "ghost"]);
    assert!(stderr.contains("ghost"), "got: {stderr}");
}

#[test]
fn render_reports_invalid_machine_file() {
    let temp = TempDir::new().unwrap();
    let machine_path = temp.path().join("bad.toml");
    MachineConfig::new("bad")
        .with_stream(
            StreamConfig::new("mix", 8000, ProducerKind::Mixer { inputs: 1 })
                .with_input(InputConfig::new("missing")),
        )
        .save(&machine_path)
        .unwrap();

    let stderr = run_err(&[
        "render",
        machine_path.to_str().unwrap(),
        temp.path().join("bad.wav").to_str().unwrap(),
    ]);
    assert!(stderr.contains("missing"), "got: {stderr}");
}

// ---------------------------------------------------------------------------
// graph / palette
// ---------------------------------------------------------------------------

#[test]
fn graph_json_describes_streams() {
    let stdout = run_ok(&["graph", "demo", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["machine"], "Demo");
    assert_eq!(report["output"], "speaker:0");
    let streams = report["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["kind"], "tone");
    assert_eq!(streams[0]["sample_rate"], 44100);
    assert_eq!(streams[0]["dependents"], 1);

    let input = &streams[1]["inputs"][0];
    assert_eq!(input["source"], "psg:0");
    assert_eq!(input["regime"], "upsample");
}

#[test]
fn graph_text_lists_every_stream() {
    let stdout = run_ok(&["graph", "arcade"]);
    for tag in ["psg1:0", "psg2:0", "noise:0", "speaker:0"] {
        assert!(stdout.contains(tag), "missing {tag} in: {stdout}");
    }
    assert!(stdout.contains("downsample"));
}

#[test]
fn palette_json_for_arcade() {
    let stdout = run_ok(&["palette", "arcade", "--json", "--pens", "4"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["format"], "indexed");
    assert_eq!(report["base_colors"], 256);
    assert_eq!(report["total_colors"], 768);
    assert_eq!(report["total_colors_with_ui"], 770);
    let pens = report["pens"].as_array().unwrap();
    assert_eq!(pens.len(), 4);
    assert_eq!(pens[2]["raw"], "#ff0000");
    assert_eq!(pens[2]["value"], 2);
}

#[test]
fn palette_shadow_mode_and_missing_palette() {
    let stdout = run_ok(&["palette", "silent", "--shadow-mode", "1"]);
    assert!(stdout.contains("Shadow mode:  1"), "got: {stdout}");

    let stderr = run_err(&["palette", "demo"]);
    assert!(stderr.contains("no palette"), "got: {stderr}");

    run_err(&["palette", "silent", "--shadow-mode", "7"]);
}

#[test]
fn palette_from_machine_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pal.toml");
    let mut palette = PaletteConfig::new(4).with_shadows(true);
    palette.pens = vec!["#204060".into()];
    MachineConfig::new("pal")
        .with_stream(StreamConfig::new("s", 8000, ProducerKind::Silence))
        .with_palette(palette)
        .save(&path)
        .unwrap();

    let stdout = run_ok(&["palette", path.to_str().unwrap(), "--pens", "0", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let pens = report["pens"].as_array().unwrap();
    assert_eq!(pens.len(), 8);
    assert_eq!(pens[0]["raw"], "#204060");
    // The shadow partner shares the raw color.
    assert_eq!(pens[4]["raw"], "#204060");
    assert_ne!(pens[4]["adjusted"], "#204060");
}

// ---------------------------------------------------------------------------
// machines
// ---------------------------------------------------------------------------

#[test]
fn machines_list_and_show() {
    let stdout = run_ok(&["machines", "list", "--factory"]);
    for name in ["Demo", "Arcade", "Silent"] {
        assert!(stdout.contains(name), "missing {name} in: {stdout}");
    }

    let toml = run_ok(&["machines", "show", "arcade"]);
    let machine = MachineConfig::from_toml(&toml).unwrap();
    assert_eq!(machine.name, "Arcade");
    assert_eq!(machine.len(), 4);
}

#[test]
fn machines_check_reports_problems() {
    let stdout = run_ok(&["machines", "check", "demo"]);
    assert!(stdout.contains("Demo: ok"));

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dup.toml");
    MachineConfig::new("dup")
        .with_stream(StreamConfig::new("a", 0, ProducerKind::Silence))
        .with_stream(StreamConfig::new("a", 8000, ProducerKind::Silence))
        .save(&path)
        .unwrap();
    let stderr = run_err(&["machines", "check", path.to_str().unwrap()]);
    assert!(stderr.contains("duplicate stream tag"), "got: {stderr}");
    assert!(stderr.contains("sample rate of zero"), "got: {stderr}");
}
