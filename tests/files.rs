//! Grammar files: reading, combining, and error attribution.

use std::fs;

use gibber::{parse_file, parse_files, Error};

#[test]
fn single_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting.grammar");
    fs::write(&path, "greeting [ hi | hello ]\n").unwrap();

    let mut tree = parse_file(&path).unwrap();
    let out = tree.generate("").unwrap();
    assert!(out == "hi" || out == "hello");
}

#[test]
fn definitions_combine_across_files() {
    let dir = tempfile::tempdir().unwrap();

    let words = dir.path().join("words.grammar");
    fs::write(&words, "weekday [ Monday | Tuesday ]\n").unwrap();

    let phrases = dir.path().join("phrases.grammar");
    fs::write(&phrases, "diary [ It was {weekday}. ]\n").unwrap();

    let mut tree = parse_files(&[&words, &phrases]).unwrap();
    let out = tree.generate("diary").unwrap();
    assert!(
        out == "It was Monday." || out == "It was Tuesday.",
        "{out:?}"
    );
}

#[test]
fn errors_name_the_offending_file_and_line() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.grammar");
    fs::write(&good, "a [ x ]\n").unwrap();

    let bad = dir.path().join("bad.grammar");
    fs::write(&bad, "b [ x ]\nc [ ]\n").unwrap();

    let err = parse_files(&[&good, &bad]).unwrap_err();

    match err {
        Error::EmptyGroup { at } => {
            assert!(at.file().ends_with("bad.grammar"), "{at}");
            assert_eq!(at.line(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn a_broken_file_fails_the_whole_parse() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.grammar");
    fs::write(&good, "a [ x ]\n").unwrap();

    let broken = dir.path().join("broken.grammar");
    fs::write(&broken, "b [ never closed\n").unwrap();

    assert!(matches!(
        parse_files(&[&good, &broken]),
        Err(Error::UnterminatedGroup { .. })
    ));
}

#[test]
fn missing_files_surface_as_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.grammar");

    assert!(matches!(parse_file(&missing), Err(Error::Io(_))));
}

#[test]
fn duplicate_identifiers_across_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let first = dir.path().join("first.grammar");
    fs::write(&first, "a [ x ]\n").unwrap();

    let second = dir.path().join("second.grammar");
    fs::write(&second, "a [ y ]\n").unwrap();

    let err = parse_files(&[&first, &second]).unwrap_err();

    match err {
        Error::DuplicateIdentifier { name, first, second } => {
            assert_eq!(name, "a");
            assert!(first.file().ends_with("first.grammar"));
            assert!(second.file().ends_with("second.grammar"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
