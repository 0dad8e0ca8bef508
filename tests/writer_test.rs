use std::fs;

use tunecrawl::pipeline::batch::Stub;
use tunecrawl::pipeline::writer::{BatchWriter, ChunkedReader, CsvRecord, count_rows, write_all};
use tunecrawl::types::{AudioFeatureRecord, AudioFeatures, TaggedTrack, TrackIdRow, TrackRecord};

// Helper function to create numbered test records
fn records(prefix: &str, n: usize) -> Vec<TrackRecord> {
    (0..n)
        .map(|i| TrackRecord::new(format!("{} artist {}", prefix, i), format!("{} song {}", prefix, i)))
        .collect()
}

fn read_rows(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (header, rows)
}

#[test]
fn test_chunks_share_one_header_and_a_running_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    let mut writer = BatchWriter::<TrackRecord>::new(&path);

    assert_eq!(writer.write(&records("a", 2), true).unwrap(), 2);
    assert_eq!(writer.write(&records("b", 3), false).unwrap(), 3);
    assert_eq!(writer.write(&records("c", 1), false).unwrap(), 1);
    assert_eq!(writer.rows_written(), 6);

    let (header, rows) = read_rows(&path);
    assert_eq!(&header[0], "");
    assert_eq!(&header[1], "artist_name");
    assert_eq!(header.len(), TrackRecord::header().len() + 1);

    assert_eq!(rows.len(), 6);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[0], i.to_string());
        assert_ne!(&row[1], "artist_name");
    }
    assert_eq!(&rows[2][1], "b artist 0");
    assert_eq!(&rows[5][2], "c song 0");
}

#[test]
fn test_first_batch_truncates_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.csv");

    let mut writer = BatchWriter::<TrackRecord>::new(&path);
    writer.write(&records("old", 4), true).unwrap();

    let mut writer = BatchWriter::<TrackRecord>::new(&path);
    writer.write(&records("new", 1), true).unwrap();

    let (_, rows) = read_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "0");
    assert_eq!(&rows[0][1], "new artist 0");
}

#[test]
fn test_optional_fields_are_empty_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.csv");

    let mut record = TrackRecord::new("Lorde", "Royals").with_genre("pop");
    record.song_id = Some(42);
    write_all(&path, &[record]).unwrap();

    let (header, rows) = read_rows(&path);
    let column = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][column("genre")], "pop");
    assert_eq!(&rows[0][column("song_id")], "42");
    assert_eq!(&rows[0][column("album_name")], "");
    assert_eq!(&rows[0][column("lyrics")], "");
}

#[test]
fn test_stub_feature_rows_keep_their_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.csv");

    let found = AudioFeatureRecord {
        trackid: "TRA".to_string(),
        features: Some(AudioFeatures {
            tempo: Some(98.5),
            key: Some(5),
            ..Default::default()
        }),
    };
    let stub = AudioFeatureRecord::stub("TRB");
    write_all(&path, &[found, stub]).unwrap();

    let (header, rows) = read_rows(&path);
    let tempo = header.iter().position(|h| h == "tempo").unwrap();
    assert_eq!(&rows[0][1], "TRA");
    assert_eq!(&rows[0][tempo], "98.5");
    assert_eq!(&rows[1][1], "TRB");
    assert!(rows[1].iter().skip(2).all(str::is_empty));
    assert_eq!(rows[1].len(), header.len());
}

#[test]
fn test_tagged_tracks_join_tags() {
    let track = TaggedTrack {
        artist_name: "Kate Bush".to_string(),
        track_name: "Hounds of Love".to_string(),
        tags: vec!["80s".to_string(), "art pop".to_string()],
    };
    assert_eq!(track.record(), vec!["Kate Bush", "Hounds of Love", "80s, art pop"]);
}

#[test]
fn test_chunked_reader_yields_fixed_size_chunks() {
    let input = "trackid,title\nA,one\nB,two\nC,three\nD,four\nE,five\n";
    let chunks: Vec<Vec<TrackIdRow>> = ChunkedReader::from_reader(input.as_bytes(), 2)
        .collect::<Result<_, _>>()
        .unwrap();

    let ids: Vec<Vec<&str>> = chunks
        .iter()
        .map(|c| c.iter().map(|r| r.trackid.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["A", "B"], vec!["C", "D"], vec!["E"]]);
}

#[test]
fn test_chunked_reader_on_empty_input() {
    let mut reader = ChunkedReader::<_, TrackIdRow>::from_reader("trackid\n".as_bytes(), 100);
    assert!(reader.next().is_none());
}

#[test]
fn test_chunked_reader_requires_trackid_column() {
    let mut reader = ChunkedReader::<_, TrackIdRow>::from_reader("id\nA\n".as_bytes(), 10);
    assert!(matches!(reader.next(), Some(Err(_))));
}

#[test]
fn test_count_rows_skips_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unique_tracks.csv");
    fs::write(&path, "trackid\nA\nB\nC\n").unwrap();

    assert_eq!(count_rows(&path).unwrap(), 3);
}
