use crate::error::VotError;
use crate::pipeline::runtime::{DocumentOutcome, VotExtractor};
use crate::report::ResultTable;
use crate::timeline::Document;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub table: ResultTable,
    pub skipped_words: usize,
}

/// Runs the extractor over `inputs` in order.
///
/// `load` turns an input into a document and `sink` persists each finished
/// document before the next one is loaded. The first error stops the batch:
/// documents already handed to `sink` stay as written, the failing document
/// never reaches it and later inputs are not loaded.
pub fn run_batch<T, D, L, S>(
    extractor: &VotExtractor,
    inputs: &[T],
    mut load: L,
    mut sink: S,
) -> Result<BatchSummary, VotError>
where
    D: AsRef<Document>,
    L: FnMut(&T) -> Result<D, VotError>,
    S: FnMut(&T, &D, &DocumentOutcome, &ResultTable) -> Result<(), VotError>,
{
    let mut summary = BatchSummary::default();
    for (position, input) in inputs.iter().enumerate() {
        let loaded = load(input)?;
        let document = loaded.as_ref();
        let outcome = match extractor.process(document) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    document = document.name.as_str(),
                    processed = position,
                    remaining = inputs.len() - position - 1,
                    error = %err,
                    "vot: batch halted"
                );
                return Err(err);
            }
        };
        summary.table.push_document(&outcome.rows);
        summary.skipped_words += outcome.skipped.len();
        sink(input, &loaded, &outcome, &summary.table)?;
    }
    Ok(summary)
}
