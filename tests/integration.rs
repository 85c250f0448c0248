// tests/integration.rs
//
// End-to-end scenarios (spec §8): one test per concrete scenario plus a
// couple of property-style checks exercised against the public API.

use md_chunker::{chunk, Config, ContentType, OversizeReason};

#[test]
fn empty_input_is_rejected() {
    let result = chunk("", &Config::default());
    assert!(result.is_err());

    let result = chunk("   \n\t\n  ", &Config::default());
    assert!(result.is_err());
}

#[test]
fn single_paragraph_document_yields_one_fallback_chunk() {
    let text = "A short document with just one paragraph of plain prose in it.";
    let result = chunk(text, &Config::default()).unwrap();
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.strategy_used, "fallback");
    assert_eq!(result.chunks[0].content, text);
}

#[test]
fn three_section_document_gets_header_paths_per_section() {
    let text = "\
# Getting Started

Welcome to the guide.

## Installation

Run the installer and follow the prompts.

## Configuration

Edit the config file to your liking.

## Usage

Invoke the tool from the command line.
";
    let result = chunk(text, &Config::default()).unwrap();
    assert_eq!(result.strategy_used, "structural");

    let install = result
        .chunks
        .iter()
        .find(|c| c.content.contains("installer"))
        .expect("installation section present");
    assert_eq!(
        install.metadata.header_path.as_deref(),
        Some(["Getting Started".to_string(), "Installation".to_string()].as_slice())
    );
}

#[test]
fn large_code_block_is_split_into_oversize_flagged_chunks() {
    let mut body = String::new();
    for i in 0..400 {
        body.push_str(&format!("def f{i}():\n    return {i}\n"));
    }
    let text = format!("```python\n{body}```\n");

    let config = Config::builder().max_chunk_size(2000).build().unwrap();
    let result = chunk(&text, &config).unwrap();
    assert_eq!(result.strategy_used, "code_aware");

    let code_chunks: Vec<_> = result
        .chunks
        .iter()
        .filter(|c| c.metadata.content_type == ContentType::Code)
        .collect();
    assert_eq!(code_chunks.len(), 1);
    let code_chunk = code_chunks[0];
    if code_chunk.size() > config.max_chunk_size {
        assert_eq!(code_chunk.metadata.allow_oversize, Some(true));
        assert_eq!(
            code_chunk.metadata.oversize_reason,
            Some(OversizeReason::CodeBlockIntegrity)
        );
    }
}

#[test]
fn table_smaller_than_max_chunk_size_is_kept_whole() {
    let text = "\
| Name | Role | Location |
|------|------|----------|
| Ada | Engineer | London |
| Grace | Engineer | New York |
";
    let config = Config::builder().max_chunk_size(40).build().unwrap();
    let result = chunk(text, &config).unwrap();

    let table_chunk = result
        .chunks
        .iter()
        .find(|c| c.metadata.content_type == ContentType::Table)
        .expect("a table chunk");
    assert_eq!(table_chunk.metadata.column_count, Some(3));
    assert!(table_chunk.content.contains("Ada"));
    assert!(table_chunk.content.contains("Grace"));
}

#[test]
fn two_paragraphs_get_overlap_metadata_between_them() {
    let text = "\
The first paragraph talks about the beginning of the story in some detail.

The second paragraph continues the story and talks about the middle part.
";
    let config = Config::builder()
        .max_chunk_size(70)
        .min_chunk_size(10)
        .overlap_size(25)
        .build()
        .unwrap();
    let result = chunk(text, &config).unwrap();
    assert!(result.chunks.len() >= 2);

    let second = &result.chunks[1];
    assert!(second.metadata.previous_content.is_some());
    assert_eq!(second.metadata.previous_chunk_index, Some(0));

    let first = &result.chunks[0];
    assert!(first.metadata.next_content.is_some());
}

#[test]
fn chunks_are_sorted_and_non_overlapping_in_line_order() {
    let text = "\
# A

one

## B

two

## C

three
";
    let result = chunk(text, &Config::default()).unwrap();
    for window in result.chunks.windows(2) {
        assert!(window[0].start_line <= window[1].start_line);
    }
}

#[test]
fn serialization_round_trips_unknown_metadata_keys() {
    use md_chunker::serialize::{from_json, to_json};

    let result = chunk("Some plain prose to serialize.", &Config::default()).unwrap();
    let json = to_json(&result.chunks[0]).unwrap();
    let back = from_json(&json).unwrap();
    assert_eq!(back.content, result.chunks[0].content);
}

#[test]
fn strategy_override_forces_code_aware_even_without_code() {
    let config = Config::builder()
        .strategy_override(md_chunker::StrategyKind::CodeAware)
        .build()
        .unwrap();
    let result = chunk("Just plain prose, no code or tables here at all.", &config).unwrap();
    assert_eq!(result.strategy_used, "code_aware");
}
