use crate::models::FlowAllocationResult;

/// Repository interface for the persisted per-region aggregates.
pub trait AggregateSink {
    /// Error type for storage operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or replace every record of the batch, keyed on
    /// `(interval, network, region)`.
    ///
    /// The write must be atomic: either every record is stored or none is,
    /// including when the returned future is dropped before completion.
    /// Re-submitting an identical batch must leave the store unchanged.
    ///
    /// # Returns
    ///
    /// The number of records written.
    fn upsert_batch(
        &self,
        records: &[FlowAllocationResult],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}
