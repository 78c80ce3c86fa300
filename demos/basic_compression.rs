use rust_huffman::{FrameMode, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    println!("📝 Sample text: {} bytes", sample_text.len());

    let codec = HuffmanCodec::default();
    let compressed = codec.compress(sample_text.as_bytes())?;

    let info = rust_huffman::inspect(&compressed)?;
    let compression_ratio = compressed.len() as f64 / sample_text.len() as f64;

    println!(
        "🗜️  Compressed to: {} bytes ({:.1}% of original)",
        compressed.len(),
        compression_ratio * 100.0
    );
    if info.mode == FrameMode::Compressed {
        println!(
            "   tree: {} bits, data: {} bits, padding: {} bits",
            info.tree_bits, info.data_bits, info.padding
        );
    } else {
        println!("   stored uncompressed");
    }

    let decompressed = codec.decompress(&compressed)?;

    if sample_text.as_bytes() == decompressed.as_slice() {
        println!("✅ Decompression successful! Data matches exactly.");
    } else {
        println!("❌ Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }

    Ok(())
}
