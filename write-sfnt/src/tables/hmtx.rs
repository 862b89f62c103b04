//! Writing the hmtx table

use read_sfnt::tables::hmtx::LongMetric;

use crate::write::{FontWrite, TableWriter};

/// Builds the horizontal metrics table.
///
/// Trailing glyphs that share the final advance width are stored as bare
/// side bearings, which is the compact form the format allows.
#[derive(Debug, Clone, Default)]
pub struct HmtxBuilder {
    metrics: Vec<LongMetric>,
}

impl HmtxBuilder {
    pub fn new(metrics: Vec<LongMetric>) -> Self {
        HmtxBuilder { metrics }
    }

    pub fn push(&mut self, metric: LongMetric) {
        self.metrics.push(metric);
    }

    /// The numberOfHMetrics value for hhea.
    ///
    /// At least one long metric is always written.
    pub fn number_of_h_metrics(&self) -> u16 {
        let last_advance = match self.metrics.last() {
            Some(metric) => metric.advance,
            None => return 0,
        };
        let n_shared = self
            .metrics
            .iter()
            .rev()
            .take_while(|metric| metric.advance == last_advance)
            .count();
        (self.metrics.len() - n_shared + 1).min(self.metrics.len()) as u16
    }

    pub fn build(&self) -> Vec<u8> {
        let n_long = self.number_of_h_metrics() as usize;
        let mut writer = TableWriter::default();
        for metric in &self.metrics[..n_long] {
            metric.advance.write_into(&mut writer);
            metric.side_bearing.write_into(&mut writer);
        }
        for metric in &self.metrics[n_long..] {
            metric.side_bearing.write_into(&mut writer);
        }
        writer.pad_to_4byte_aligned();
        writer.into_data()
    }
}

impl FontWrite for HmtxBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.build());
    }
}
