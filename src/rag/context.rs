//! Context assembly: turns ranked search results into a bounded prompt block.

use super::store::ScoredNote;

/// Ordered note texts selected for prompt inclusion, most relevant first.
/// Produced per query and discarded with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalContext {
    texts: Vec<String>,
}

impl RetrievalContext {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Renders the context block: a header line followed by one bulleted
    /// line per note. An empty context renders as an empty string so no
    /// block marker ever reaches the prompt.
    pub fn render(&self) -> String {
        if self.texts.is_empty() {
            return String::new();
        }

        let mut block = String::from("Context:");
        for text in &self.texts {
            block.push_str("\n- ");
            block.push_str(text);
        }
        block
    }
}

/// Selects which retrieved notes make it into the prompt.
pub struct ContextAssembler {
    cutoff: f32,
    max_notes: usize,
}

impl ContextAssembler {
    pub fn new(cutoff: f32, max_notes: usize) -> Self {
        Self { cutoff, max_notes }
    }

    /// Keeps notes scoring strictly above the cutoff, preserving the input's
    /// descending-score order, and takes at most `max_notes` from the front.
    /// A score exactly at the cutoff is excluded.
    pub fn assemble(&self, scored_notes: &[ScoredNote]) -> RetrievalContext {
        let texts = scored_notes
            .iter()
            .filter(|scored| scored.score > self.cutoff)
            .take(self.max_notes)
            .map(|scored| scored.note.text.clone())
            .collect();

        RetrievalContext::new(texts)
    }
}
