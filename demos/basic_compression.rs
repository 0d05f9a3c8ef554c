use simple_huffman::metadata::{read_frequency_table, write_frequency_table};
use simple_huffman::{count_frequencies, HuffmanCodec};
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    std::fs::write("sample.txt", sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    // Compress, keeping the counts so the tree can be rebuilt later
    let frequencies = count_frequencies("sample.txt")?;
    let codec = HuffmanCodec::new(&frequencies);
    let stats = codec.compress_file("sample.txt", "sample.huff")?;
    write_frequency_table(&mut File::create("sample.huff.freq")?, &frequencies)?;

    println!(
        "Compressed to: {} bytes ({:.1}% of original)",
        stats.bytes_out,
        stats.ratio() * 100.0
    );

    // Decompress with a codec rebuilt from the stored counts
    let stored = read_frequency_table(&mut File::open("sample.huff.freq")?)?;
    let codec = HuffmanCodec::new(&stored);
    codec.decompress_file("sample.huff", "decompressed.txt")?;

    let decompressed_text = std::fs::read_to_string("decompressed.txt")?;
    if sample_text == decompressed_text {
        println!("Decompression successful, data matches exactly.");
    } else {
        println!("Decompression failed, data mismatch.");
        return Err("Decompression verification failed".into());
    }

    for path in ["sample.txt", "sample.huff", "sample.huff.freq", "decompressed.txt"] {
        std::fs::remove_file(path)?;
    }
    println!("Cleaned up temporary files");

    Ok(())
}
