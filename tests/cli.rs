use assert_cmd::Command;
use predicates::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

fn codedocx(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codedocx").unwrap();
    cmd.current_dir(dir);
    cmd
}

/// (paragraph style, paragraph text) pairs from the document body.
fn read_paragraphs(docx: &Path) -> Vec<(String, String)> {
    let bytes = fs::read(docx).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                current = Some((String::new(), String::new()));
            }
            Event::Empty(e) => {
                if let Some((style, text)) = current.as_mut() {
                    match e.name().as_ref() {
                        b"w:pStyle" => {
                            let attr = e.try_get_attribute("w:val").unwrap().unwrap();
                            *style = attr.unescape_value().unwrap().into_owned();
                        }
                        b"w:br" => text.push('\n'),
                        b"w:tab" => text.push('\t'),
                        _ => {}
                    }
                }
            }
            Event::Text(e) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&e.unescape().unwrap());
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                if let Some(paragraph) = current.take() {
                    paragraphs.push(paragraph);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs
}

fn code_blocks(paragraphs: &[(String, String)]) -> Vec<&str> {
    paragraphs
        .iter()
        .filter(|(style, _)| style == "Code")
        .map(|(_, text)| text.as_str())
        .collect()
}

#[test]
fn exports_only_allowlisted_files_and_keeps_trailing_comments() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("a.py"), "print(1)  # hi").unwrap();
    fs::write(project.join("b.txt"), "not exported").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "project", "--ext", "py", "--no-comments", "--no-title"])
        .args(["--output", "out.docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 candidate files"))
        .stdout(predicate::str::contains("Selected 1 files for export"));

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(
        paragraphs,
        vec![("Code".to_string(), "print(1)  # hi".to_string())]
    );
}

#[test]
fn show_filename_adds_path_headings_in_sorted_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("src")).unwrap();
    fs::write(temp_dir.path().join("src/b.go"), "package b").unwrap();
    fs::write(temp_dir.path().join("src/a.go"), "package a").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "src", "--ext", "go", "--show-filename"])
        .args(["--output", "out.docx", "--title", "Sources"])
        .assert()
        .success();

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    let styles: Vec<&str> = paragraphs.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(
        styles,
        vec!["Heading1", "Heading2", "Code", "Heading2", "Code"]
    );
    assert_eq!(paragraphs[0].1, "Sources");
    assert!(paragraphs[1].1.ends_with("a.go"));
    assert!(Path::new(&paragraphs[1].1).is_absolute());
    assert!(paragraphs[3].1.ends_with("b.go"));
    assert_eq!(code_blocks(&paragraphs), vec!["package a", "package b"]);
}

#[test]
fn exclusion_prefix_removes_whole_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src/vendor")).unwrap();
    fs::write(temp_dir.path().join("src/main.go"), "package main").unwrap();
    fs::write(temp_dir.path().join("src/vendor/dep.go"), "package dep").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "src", "--exclude", "src/vendor", "--ext", "go"])
        .args(["--output", "out.docx", "--no-title"])
        .assert()
        .success();

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(code_blocks(&paragraphs), vec!["package main"]);
}

#[test]
fn overlapping_includes_export_each_file_once() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("src")).unwrap();
    fs::write(temp_dir.path().join("src/lib.js"), "let x = 1;").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "src", ".", "src/lib.js", "--ext", ".JS"])
        .args(["--output", "out.docx", "--no-title"])
        .assert()
        .success();

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(code_blocks(&paragraphs), vec!["let x = 1;"]);
}

#[test]
fn block_comments_are_stripped_from_c_family() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("main.c"),
        "/* header\nmore\n*/\ncode();\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("data.json"), "{\"k\": \"// v\"}\n").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", ".", "--ext", "c", "json", "--no-comments"])
        .args(["--output", "out.docx", "--no-title"])
        .assert()
        .success();

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(
        code_blocks(&paragraphs),
        vec!["{\"k\": \"// v\"}\n", "code();"]
    );
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_warned_and_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let locked = temp_dir.path().join("src/locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(temp_dir.path().join("src/main.go"), "package main").unwrap();
    fs::write(locked.join("hidden.go"), "package hidden").unwrap();
    set_mode(&locked, 0o000);

    // Permission bits do not stop root
    if fs::read_dir(&locked).is_ok() {
        set_mode(&locked, 0o755);
        return;
    }

    let assert = codedocx(temp_dir.path())
        .args(["--include", "src", "--ext", "go", "--show-filename", "--no-title"])
        .args(["--output", "out.docx"])
        .assert();
    set_mode(&locked, 0o755);

    assert
        .success()
        .stdout(predicate::str::contains("Permission denied"))
        .stdout(predicate::str::contains("locked"));

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].0, "Heading2");
    assert!(paragraphs[0].1.ends_with("main.go"));
    assert_eq!(code_blocks(&paragraphs), vec!["package main"]);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_warned_and_contributes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let secret = temp_dir.path().join("secret.go");
    fs::write(temp_dir.path().join("a.go"), "package a").unwrap();
    fs::write(&secret, "package secret").unwrap();
    fs::write(temp_dir.path().join("z.go"), "package z").unwrap();
    set_mode(&secret, 0o000);

    if fs::read(&secret).is_ok() {
        set_mode(&secret, 0o644);
        return;
    }

    let assert = codedocx(temp_dir.path())
        .args(["--include", ".", "--ext", "go", "--show-filename", "--no-title"])
        .args(["--output", "out.docx"])
        .assert();
    set_mode(&secret, 0o644);

    assert
        .success()
        .stdout(predicate::str::contains("Failed to read"))
        .stdout(predicate::str::contains("secret.go"));

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert!(paragraphs
        .iter()
        .all(|(_, text)| !text.ends_with("secret.go")));
    let headings: Vec<&str> = paragraphs
        .iter()
        .filter(|(style, _)| style == "Heading2")
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(headings.len(), 2);
    assert!(headings[0].ends_with("a.go"));
    assert!(headings[1].ends_with("z.go"));
    assert_eq!(code_blocks(&paragraphs), vec!["package a", "package z"]);
}

#[test]
fn missing_include_path_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "does-not-exist", "--output", "out.docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 candidate files"))
        .stdout(predicate::str::contains(
            "No files selected for export with extensions: go, js",
        ));

    let paragraphs = read_paragraphs(&temp_dir.path().join("out.docx"));
    assert_eq!(
        paragraphs,
        vec![("Heading1".to_string(), "Code Export".to_string())]
    );
}

#[test]
fn unwritable_output_fails_with_exit_code_one() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("main.go"), "package main").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", ".", "--output", "no/such/dir/out.docx"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no/such/dir/out.docx"));
}

#[test]
fn dry_run_lists_files_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("main.go"), "package main").unwrap();
    fs::write(temp_dir.path().join("image.png"), [0u8, 1, 2]).unwrap();

    codedocx(temp_dir.path())
        .args(["--include", ".", "--output", "out.docx", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go"))
        .stdout(predicate::str::contains("image.png").not());

    assert!(!temp_dir.path().join("out.docx").exists());
}

#[test]
fn json_output_ends_with_report() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("run.sh"), "# setup\necho hi\n").unwrap();

    codedocx(temp_dir.path())
        .args(["--include", ".", "--ext", "sh", "--no-comments"])
        .args(["--output", "out.docx", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"comment_lines_removed\": 1"))
        .stdout(predicate::str::contains("\"exported_files\""));
}

#[test]
fn config_file_supplies_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("main.go"), "package main").unwrap();
    fs::write(temp_dir.path().join("util.py"), "x = 1").unwrap();
    fs::write(
        temp_dir.path().join("codedocx.toml"),
        "[filters]\nextensions = [\"py\"]\n\n[document]\noutput = \"from_config.docx\"\ntitle = \"Configured\"\n",
    )
    .unwrap();

    codedocx(temp_dir.path())
        .args(["--include", "."])
        .assert()
        .success();

    let paragraphs = read_paragraphs(&temp_dir.path().join("from_config.docx"));
    assert_eq!(
        paragraphs,
        vec![
            ("Heading1".to_string(), "Configured".to_string()),
            ("Code".to_string(), "x = 1".to_string()),
        ]
    );
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    codedocx(temp_dir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("codedocx.toml"));

    let content = fs::read_to_string(temp_dir.path().join("codedocx.toml")).unwrap();
    assert!(content.contains("[filters]"));
    assert!(content.contains("[document]"));
}

#[test]
fn include_is_required() {
    let temp_dir = TempDir::new().unwrap();

    codedocx(temp_dir.path())
        .args(["--ext", "go"])
        .assert()
        .failure();
}
