//! Loads a small word list into both symbol table backings and runs every
//! query family against it.
//!
//! Run with `RUST_LOG=trie_st=trace cargo run --example shellsort` to see
//! pruning as keys are removed.

use tracing_subscriber::EnvFilter;
use trie_st::{RwayTrie, SymbolTable, TernaryTrie};

const WORDS: [(&str, u32); 8] = [
    ("she", 0),
    ("sells", 1),
    ("sea", 2),
    ("shells", 3),
    ("by", 4),
    ("the", 5),
    ("sea", 6),
    ("shore", 7),
];

fn show(keys: Vec<Vec<u8>>) -> String {
    keys.iter()
        .map(|k| String::from_utf8_lossy(k).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(name: &str, st: &mut dyn SymbolTable<u32>) -> trie_st::Result<()> {
    println!("=== {} ===", name);
    for (key, value) in WORDS {
        st.insert(key.as_bytes(), value)?;
    }

    println!("size: {}", st.len());
    println!("keys: {}", show(st.keys()));
    println!("keys_with_prefix(\"shor\"): {}", show(st.keys_with_prefix(b"shor")?));
    println!("keys_with_prefix(\"s\"): {}", show(st.keys_with_prefix(b"s")?));
    println!("keys_that_match(\".he\"): {}", show(st.keys_that_match(b".he")?));
    println!("keys_that_match(\".he.l.\"): {}", show(st.keys_that_match(b".he.l.")?));
    for s in ["shellsort", "quicksort", "shell", "sea"] {
        println!(
            "longest_prefix_of({:?}): {:?}",
            s,
            String::from_utf8_lossy(st.longest_prefix_of(s.as_bytes())?)
        );
    }
    println!("get(\"sea\"): {:?}", st.get(b"sea")?);
    println!("contains(\"shell\"): {}", st.contains(b"shell")?);

    st.remove(b"shells")?;
    println!("after remove(\"shells\"): size {}, keys: {}", st.len(), show(st.keys()));
    println!();
    Ok(())
}

fn main() -> trie_st::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rway: RwayTrie<u32> = RwayTrie::new();
    run("R-way trie", &mut rway)?;
    rway.debug_print();

    let mut tst: TernaryTrie<u32> = TernaryTrie::new();
    run("ternary search trie", &mut tst)?;
    println!("ternary trie nodes: {}", tst.node_count());
    Ok(())
}
