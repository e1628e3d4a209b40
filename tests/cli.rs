// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn renders_a_small_pixmap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.ppm");

    Command::cargo_bin("mandelplot")
        .unwrap()
        .args(&["-o", path.to_str().unwrap(), "-s", "32x24", "-t", "2", "-g", "5", "-i", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calculations took"));

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"P6"));
    assert!(bytes.len() >= 32 * 24 * 3);
}

#[test]
fn rejects_a_bad_size() {
    Command::cargo_bin("mandelplot")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_zero_segments() {
    Command::cargo_bin("mandelplot")
        .unwrap()
        .args(&["-o", "unused.ppm", "-g", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Segment count"));
}

#[test]
fn output_is_required() {
    Command::cargo_bin("mandelplot")
        .unwrap()
        .assert()
        .failure();
}
