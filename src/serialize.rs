// src/serialize.rs
//
// The wire format (spec §6): chunks serialize with an explicit `size`
// field alongside their line span and metadata, since that's what
// downstream consumers actually want without recomputing a code-point
// count. Grounded on the teacher's `Chunk`/`ChunkMetadata` serde pair in
// metadata.rs, adapted to the new field set.

use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkMetadata};
use crate::error::ChunkError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedChunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub size: usize,
    pub metadata: ChunkMetadata,
}

impl From<&Chunk> for SerializedChunk {
    fn from(chunk: &Chunk) -> Self {
        SerializedChunk {
            content: chunk.content.clone(),
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            size: chunk.size(),
            metadata: chunk.metadata.clone(),
        }
    }
}

impl TryFrom<SerializedChunk> for Chunk {
    type Error = ChunkError;

    fn try_from(s: SerializedChunk) -> Result<Self, Self::Error> {
        Chunk::new(s.content, s.start_line, s.end_line, s.metadata)
    }
}

/// Serialize a chunk to its JSON wire form (spec §6).
pub fn to_json(chunk: &Chunk) -> serde_json::Result<String> {
    serde_json::to_string(&SerializedChunk::from(chunk))
}

/// Deserialize a chunk from its JSON wire form, preserving unknown
/// metadata keys via `ChunkMetadata::extra` (spec §6, PROP-8).
pub fn from_json(s: &str) -> Result<Chunk, ChunkError> {
    let serialized: SerializedChunk =
        serde_json::from_str(s).map_err(|e| ChunkError::InvalidEncoding(e.to_string()))?;
    Chunk::try_from(serialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ContentType;

    #[test]
    fn round_trips_through_json() {
        let chunk = Chunk::new(
            "some content".to_string(),
            1,
            2,
            ChunkMetadata::new("fallback", ContentType::Text),
        )
        .unwrap();
        let json = to_json(&chunk).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(back.content, chunk.content);
        assert_eq!(back.start_line, chunk.start_line);
        assert_eq!(back.metadata.strategy, chunk.metadata.strategy);
    }

    #[test]
    fn unknown_metadata_keys_round_trip() {
        let json = r#"{
            "content": "hi",
            "start_line": 1,
            "end_line": 1,
            "size": 2,
            "metadata": { "strategy": "fallback", "content_type": "text", "custom_field": 42 }
        }"#;
        let chunk = from_json(json).unwrap();
        assert_eq!(
            chunk.metadata.extra.get("custom_field"),
            Some(&serde_json::json!(42))
        );
        let back = to_json(&chunk).unwrap();
        assert!(back.contains("custom_field"));
    }
}
