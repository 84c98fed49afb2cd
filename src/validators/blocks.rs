use crate::models::{Block, ParsedRecord};

/// The referenced block must exist; skipped while no blocks are loaded.
pub fn check_block(record: &ParsedRecord, blocks: &[Block]) -> Option<String> {
    if blocks.is_empty() || !record.is_supplied("block_name") {
        return None;
    }

    let block_name = record.text("block_name")?;
    let wanted = block_name.trim().to_lowercase();

    if find_block(blocks, &wanted).is_some() {
        return None;
    }

    let valid_names: Vec<&str> = blocks.iter().map(|b| b.block_name.as_str()).collect();
    Some(format!(
        "Block \"{}\" does not exist. Valid blocks: {}.",
        block_name.trim(),
        valid_names.join(", ")
    ))
}

/// Case-insensitive lookup; `wanted` must already be trimmed and lowercased.
pub fn find_block<'a>(blocks: &'a [Block], wanted: &str) -> Option<&'a Block> {
    blocks
        .iter()
        .find(|block| block.block_name.trim().to_lowercase() == wanted)
}
