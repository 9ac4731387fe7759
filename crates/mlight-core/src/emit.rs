//! Document emission
//!
//! Writes the same serialized bytes under every output key of a document.
//! The write-enable flag turns the emitter into a dry run that performs no
//! sink calls but still counts toward the report, matching verification-run
//! behavior.

use crate::document::ReconciledDocument;
use crate::error::EmitError;
use crate::report::RunReport;
use crate::store::DocumentSink;

/// Persists reconciled documents through a [`DocumentSink`]
#[derive(Debug)]
pub struct Emitter<'a, K> {
    sink: &'a K,
    write_enabled: bool,
}

impl<'a, K> Emitter<'a, K>
where
    K: DocumentSink,
{
    /// Create an emitter over `sink`
    #[inline]
    #[must_use]
    pub fn new(sink: &'a K, write_enabled: bool) -> Self {
        Self {
            sink,
            write_enabled,
        }
    }

    /// Whether writes are enabled
    #[inline]
    #[must_use]
    pub fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Emit `doc` under all of its output keys
    ///
    /// A failure on any key is fatal; there is no partial-success policy.
    ///
    /// # Errors
    /// [`EmitError::Serialize`] or [`EmitError::WriteFailed`].
    pub async fn emit(
        &self,
        doc: &ReconciledDocument,
        report: &mut RunReport,
    ) -> Result<(), EmitError> {
        let keys = doc.output_keys();
        if self.write_enabled {
            let body = doc.document.to_json().map_err(|source| EmitError::Serialize {
                date: doc.date.to_string(),
                source,
            })?;
            for key in &keys {
                self.sink
                    .put(key, &body)
                    .await
                    .map_err(|source| EmitError::WriteFailed {
                        key: key.clone(),
                        source,
                    })?;
                tracing::info!(%key, neurons = doc.document.len(), "wrote metadata document");
            }
        } else {
            tracing::info!(?keys, neurons = doc.document.len(), "dry run; skipping write");
        }
        report.document_written();
        Ok(())
    }
}
