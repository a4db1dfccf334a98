use crate::domains::retrieval::VectorMatch;

/// Separator placed between consecutive passages.
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Joins the passage text of every usable match, keeping retrieval order.
///
/// Matches without a `text` entry in their metadata are skipped. With no
/// usable matches the result is the empty string.
pub fn assemble_context(matches: &[VectorMatch]) -> String {
    matches
        .iter()
        .filter_map(VectorMatch::text)
        .collect::<Vec<_>>()
        .join(PASSAGE_SEPARATOR)
}
