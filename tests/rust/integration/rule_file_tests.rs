//! Rule files on disk: blank-line separation, partial failures, hot reload.

use std::io::Write;

use tinytalk::engine::{TinyObject, TinylandEngine};
use tinytalk::server::rules::RuleFile;

fn temp_rules(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write rules");
    file.flush().expect("flush");
    file
}

#[test]
fn loads_every_rule_separated_by_blank_lines() {
    let file = temp_rules(
        "when [#aruco id x y] create [#vessel id: id, x: x, y: y]\n\
         \n\
         when [#paddle y] as me/my; friend [#aruco y] as tag/its update my [y: its.y]\n",
    );
    let mut engine = TinylandEngine::new();
    let mut rule_file = RuleFile::new(file.path());
    let loaded = rule_file.reload_if_changed(&mut engine).expect("load");
    assert_eq!(loaded, 2);
    assert_eq!(engine.rule_count(), 2);
}

#[test]
fn a_parse_failure_only_discards_its_own_rule() {
    let file = temp_rules(
        "when [#aruco id] create [#vessel id: id]\n\
         \n\
         when [#oops no closing bracket\n\
         \n\
         when [#b] create [#c]\n",
    );
    let mut engine = TinylandEngine::new();
    let mut rule_file = RuleFile::new(file.path());
    let loaded = rule_file.reload_if_changed(&mut engine).expect("load");
    assert_eq!(loaded, 2);
    assert_eq!(engine.rule_count(), 2);
}

#[test]
fn loaded_rules_fire_against_ingestion() {
    let file = temp_rules("when [#aruco id x y] create [#vessel id: id, x: x, y: y]");
    let mut engine = TinylandEngine::new();
    let mut rule_file = RuleFile::new(file.path());
    rule_file.reload_if_changed(&mut engine).expect("load");

    engine.create(
        "111",
        TinyObject::new(["aruco"])
            .with_attr("x", 10.0)
            .with_attr("y", 20.0),
    );
    while engine.execute_loop() {}

    let vessel = engine
        .scene()
        .iter()
        .map(|(_, object)| object)
        .find(|object| object.tags == vec!["vessel".to_string()])
        .expect("a vessel should exist");
    assert_eq!(vessel.get("id").and_then(|v| v.as_str()), Some("111"));
}

#[test]
fn reload_picks_up_new_rules_and_keeps_old_ones() {
    let file = temp_rules("when [#a] create [#b]");
    let mut engine = TinylandEngine::new();
    let mut rule_file = RuleFile::new(file.path());
    rule_file.reload_if_changed(&mut engine).expect("first load");
    assert_eq!(engine.rule_count(), 1);

    std::fs::write(
        file.path(),
        "when [#a] create [#b]\n\nwhen [#x y] create [#z y: y]",
    )
    .expect("rewrite rules");
    let bumped = std::time::SystemTime::now() + std::time::Duration::from_secs(2);
    std::fs::File::options()
        .write(true)
        .open(file.path())
        .expect("reopen")
        .set_modified(bumped)
        .expect("bump mtime");

    let loaded = rule_file.reload_if_changed(&mut engine).expect("reload");
    assert_eq!(loaded, 2);
    assert_eq!(engine.rule_count(), 2);
}
