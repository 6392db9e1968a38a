//! Report output port.

use crate::domain::CropReport;

/// Port for writing per-image reports.
pub trait ResultOutput: Send + Sync {
    /// Writes a single report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &CropReport) -> anyhow::Result<()>;

    /// Writes a whole batch at once.
    ///
    /// Defaults to one [`write`](Self::write) per report; outputs with a
    /// batch document form (such as a JSON array) override it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_batch(&self, reports: &[CropReport], pretty: bool) -> anyhow::Result<()> {
        let _ = pretty;
        reports.iter().try_for_each(|report| self.write(report))
    }

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
