use std::fs::{self, File};
use std::path::PathBuf;

use simple_huffman::metadata::{read_frequency_table, write_frequency_table};
use simple_huffman::{count_frequencies, HuffmanCodec, HuffmanError};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("simple_huffman_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_file_roundtrip() {
    let dir = scratch_dir("roundtrip");
    let input = dir.join("input.txt");
    let compressed = dir.join("input.huff");
    let output = dir.join("output.txt");

    let text = "We the People of the United States, in Order to form a more perfect Union,\n\
                establish Justice, insure domestic Tranquility, provide for the common defence.\n";
    fs::write(&input, text).unwrap();

    let codec = HuffmanCodec::from_file(&input).unwrap();
    let stats = codec.compress_file(&input, &compressed).unwrap();
    assert_eq!(stats.symbols, text.chars().count() as u64);
    assert_eq!(stats.bytes_out, fs::metadata(&compressed).unwrap().len());
    assert!(stats.ratio() < 1.0);

    let decoded = codec.decompress_file(&compressed, &output).unwrap();
    assert_eq!(decoded, stats.symbols);
    assert_eq!(fs::read_to_string(&output).unwrap(), text);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_tree_rebuilt_from_stored_counts() {
    let dir = scratch_dir("sidecar");
    let input = dir.join("input.txt");
    let compressed = dir.join("input.huff");
    let table = dir.join("input.huff.freq");
    let output = dir.join("output.txt");

    fs::write(&input, "a man a plan a canal panama").unwrap();

    let frequencies = count_frequencies(&input).unwrap();
    HuffmanCodec::new(&frequencies).compress_file(&input, &compressed).unwrap();
    write_frequency_table(&mut File::create(&table).unwrap(), &frequencies).unwrap();

    let stored = read_frequency_table(&mut File::open(&table).unwrap()).unwrap();
    let rebuilt = HuffmanCodec::new(&stored);
    rebuilt.decompress_file(&compressed, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "a man a plan a canal panama");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_empty_and_single_symbol_files() {
    let dir = scratch_dir("edge");
    for (name, text) in [("empty", ""), ("single", "zzzzzzzzz")] {
        let input = dir.join(format!("{name}.txt"));
        let compressed = dir.join(format!("{name}.huff"));
        let output = dir.join(format!("{name}.out"));
        fs::write(&input, text).unwrap();

        let codec = HuffmanCodec::from_file(&input).unwrap();
        codec.compress_file(&input, &compressed).unwrap();
        codec.decompress_file(&compressed, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), text);
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failures_are_isolated_per_file() {
    let dir = scratch_dir("batch");
    let good = dir.join("good.txt");
    let missing = dir.join("missing.txt");
    fs::write(&good, "good file").unwrap();

    let results: Vec<_> = [&missing, &good]
        .into_iter()
        .map(|path| {
            let codec = HuffmanCodec::from_file(path)?;
            codec.compress_file(path, path.with_extension("huff"))
        })
        .collect();

    assert!(matches!(results[0], Err(HuffmanError::Io(_))));
    assert!(results[1].is_ok());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_text_outside_table_fails_compression() {
    let dir = scratch_dir("unknown");
    let input = dir.join("input.txt");
    fs::write(&input, "hello").unwrap();

    let codec = HuffmanCodec::from_text("help");
    let err = codec.compress_file(&input, dir.join("input.huff")).unwrap_err();
    assert!(matches!(err, HuffmanError::UnknownSymbol('o')));

    fs::remove_dir_all(&dir).unwrap();
}
