use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use adofai_taiko::{
    ConvertError,
    convert::{ConversionRequest, run},
    malody::MalodyChart,
    package::{PackagingError, write_mcz},
};
use zip::ZipArchive;

/// A fresh directory under the system temporary directory, removed on drop.
struct TestDir(PathBuf);

impl TestDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "adofai-taiko-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(&self.0)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

#[test]
fn archive_holds_chart_and_music_only() {
    let dir = TestDir::new("archive");
    let chart = dir.join("level.adofai");
    let music = dir.join("song.ogg");
    fs::copy("tests/files/speed_changes.adofai", &chart).unwrap();
    fs::write(&music, b"OggS fake music").unwrap();

    let request = ConversionRequest {
        chart: Some(chart),
        music: Some(music),
        ..Default::default()
    };
    let written = run(&request).unwrap();
    assert_eq!(written, dir.join("level.mcz"));
    assert_eq!(archive_names(&written), vec!["level.mc", "song.ogg"]);
    assert_eq!(
        dir.entries(),
        vec!["level.adofai", "level.mcz", "song.ogg"],
        "no intermediate files are left"
    );

    let mut archive = ZipArchive::new(File::open(&written).unwrap()).unwrap();
    let mut text = String::new();
    archive
        .by_name("level.mc")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    let chart: MalodyChart = serde_json::from_str(&text).unwrap();
    assert_eq!(chart.hit_notes().count(), 6);

    let mut music = Vec::new();
    archive
        .by_name("song.ogg")
        .unwrap()
        .read_to_end(&mut music)
        .unwrap();
    assert_eq!(music, b"OggS fake music");
}

#[test]
fn explicit_output_names_the_chart_entry() {
    let dir = TestDir::new("output");
    let music = dir.join("track.mp3");
    fs::write(&music, b"ID3").unwrap();
    let archive = dir.join("Custom Name.mcz");

    write_mcz(&archive, "{}", &music).unwrap();
    assert_eq!(archive_names(&archive), vec!["Custom Name.mc", "track.mp3"]);
}

#[test]
fn missing_music_leaves_nothing_behind() {
    let dir = TestDir::new("missing-music");
    let chart = dir.join("level.adofai");
    fs::copy("tests/files/legacy_path.adofai", &chart).unwrap();

    let request = ConversionRequest {
        chart: Some(chart),
        music: Some(dir.join("absent.ogg")),
        ..Default::default()
    };
    let err = run(&request).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Packaging(PackagingError::MusicUnreadable { .. })
    ));
    assert!(err.user_message().contains("absent.ogg"));
    assert_eq!(dir.entries(), vec!["level.adofai"]);
}

#[test]
fn unwritable_archive_is_reported() {
    let dir = TestDir::new("unwritable");
    let music = dir.join("song.ogg");
    fs::write(&music, b"music").unwrap();

    let err = write_mcz(&dir.join("no-such-dir/out.mcz"), "{}", &music).unwrap_err();
    assert!(matches!(err, PackagingError::ArchiveUnwritable { .. }));
    assert_eq!(dir.entries(), vec!["song.ogg"]);
}

#[test]
fn chart_errors_stop_before_packaging() {
    let dir = TestDir::new("broken");
    let chart = dir.join("broken.adofai");
    let music = dir.join("song.ogg");
    fs::copy("tests/files/broken.adofai", &chart).unwrap();
    fs::write(&music, b"music").unwrap();

    let request = ConversionRequest {
        chart: Some(chart),
        music: Some(music),
        ..Default::default()
    };
    let err = run(&request).unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)));
    assert!(err.user_message().contains("line 2"), "{}", err.user_message());
    assert_eq!(dir.entries(), vec!["broken.adofai", "song.ogg"]);

    let request = ConversionRequest {
        chart: Some(dir.join("absent.adofai")),
        music: Some(dir.join("song.ogg")),
        ..Default::default()
    };
    assert!(matches!(
        run(&request),
        Err(ConvertError::ReadChart { .. })
    ));
}
