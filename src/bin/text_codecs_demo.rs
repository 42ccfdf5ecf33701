use classic_codecs::cs::compression::lz77::{self, DEFAULT_WINDOW_SIZE};
use classic_codecs::cs::compression::{huffman, lz78, run_all};

const TEXT: &[u8] = b"pablito clavo un clavito";

fn show(symbol: Option<u8>) -> String {
    match symbol {
        Some(b' ') => "' '".to_string(),
        Some(b) => format!("'{}'", b as char),
        None => "\\0".to_string(),
    }
}

fn run_huffman() -> classic_codecs::Result<()> {
    println!("== Huffman ==");
    let freq = huffman::build_frequency_table(TEXT);
    println!("Frequencies:");
    for (&symbol, count) in &freq {
        println!("  {} : {}", show(Some(symbol)), count);
    }

    println!("Tree construction:");
    let tree = huffman::build_huffman_tree_traced(&freq, |step, node| {
        if let Some((left, right)) = node.children() {
            println!(
                "  step {}: [{}:{}] + [{}:{}] = [{}:{}]",
                step,
                String::from_utf8_lossy(left.symbols()),
                left.freq(),
                String::from_utf8_lossy(right.symbols()),
                right.freq(),
                String::from_utf8_lossy(node.symbols()),
                node.freq()
            );
        }
    })?;

    let codes = huffman::build_code_table(&tree);
    println!("Codes:");
    for (&symbol, code) in &codes {
        println!("  {} : {}", show(Some(symbol)), code);
    }

    let encoded = huffman::encode(TEXT, &codes)?;
    println!("Encoded: {}", huffman::format_encoded(&encoded));

    let stats = huffman::statistics(TEXT, &codes)?;
    println!("  original bits   : {}", stats.original_bits);
    println!("  compressed bits : {}", stats.compressed_bits);
    println!("  ratio           : {:.2} %", stats.ratio_percent());
    println!();
    Ok(())
}

fn run_lz77() -> classic_codecs::Result<()> {
    println!("== LZ77 (window {}) ==", DEFAULT_WINDOW_SIZE);
    lz77::encode_traced(TEXT, DEFAULT_WINDOW_SIZE, |step, s| {
        println!("step {}:", step);
        println!(
            "  search buffer [{}..{}): \"{}\"",
            s.search_start,
            s.position,
            String::from_utf8_lossy(s.search_window)
        );
        println!("  lookahead: \"{}\"", String::from_utf8_lossy(s.lookahead));
        println!(
            "  token: (offset={}, length={}, next={})",
            s.token.offset,
            s.token.length,
            show(s.token.next)
        );
    })?;
    println!();
    Ok(())
}

fn run_lz78() {
    println!("== LZ78 ==");
    let (tokens, _) = lz78::encode_traced(TEXT, |step, s| {
        println!("step {}:", step);
        println!(
            "  w: \"{}\" (index {}), next {}",
            String::from_utf8_lossy(s.matched),
            s.token.index,
            show(s.token.next)
        );
        if let Some(slot) = s.new_entry {
            let phrase = s.dictionary.get(slot).unwrap_or_default();
            println!("  add [{}] = \"{}\"", slot, String::from_utf8_lossy(phrase));
        }
    });
    println!("Tokens:");
    for (i, t) in tokens.iter().enumerate() {
        println!("  [{}] ({}, {})", i, t.index, show(t.next));
    }
    println!();
}

fn main() -> classic_codecs::Result<()> {
    run_huffman()?;
    run_lz77()?;
    run_lz78();

    for report in run_all(TEXT, DEFAULT_WINDOW_SIZE)? {
        println!(
            "{}: {} bytes -> {} units, verified: {}",
            report.codec, report.input_len, report.encoded_units, report.verified
        );
    }
    Ok(())
}
