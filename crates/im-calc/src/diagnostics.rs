//! 診斷報告：與移動指令並行的稽核軌跡

use im_core::{Action, DecisionRecord, FailureReason};
use serde::{Deserialize, Serialize};

/// 診斷彙總
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSummary {
    pub evaluated: usize,
    pub consolidate: usize,
    pub distribute: usize,
    pub no_action: usize,

    /// 完全未產生移動、需人工介入
    pub manual_intervention: usize,

    /// 部分分散
    pub partial: usize,

    /// 由級聯取得儲位
    pub cascaded: usize,
}

/// 診斷報告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub records: Vec<DecisionRecord>,
    pub summary: DiagnosticsSummary,
}

impl DiagnosticsReport {
    /// 需要人工介入的記錄
    pub fn manual_interventions(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.records
            .iter()
            .filter(|record| record.requires_manual_intervention())
    }
}

/// 診斷記錄器
#[derive(Debug, Default)]
pub struct DiagnosticsReporter {
    records: Vec<DecisionRecord>,
}

impl DiagnosticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記錄一筆決策
    pub fn record(&mut self, record: DecisionRecord) {
        if let Some(reason) = &record.error_reason {
            tracing::warn!(
                "產品批次 {}/{} ({}): {}",
                record.product_id,
                record.batch,
                record.action,
                reason
            );
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 完成並產生彙總
    pub fn finish(self) -> DiagnosticsReport {
        let mut summary = DiagnosticsSummary {
            evaluated: self.records.len(),
            ..Default::default()
        };

        for record in &self.records {
            match record.action {
                Action::Consolidate => summary.consolidate += 1,
                Action::Distribute => summary.distribute += 1,
                Action::NoAction => summary.no_action += 1,
            }
            match &record.error_reason {
                Some(FailureReason::PartialFulfillment { .. }) => summary.partial += 1,
                Some(_) => summary.manual_intervention += 1,
                None => {}
            }
            if record.donor_batch.is_some() {
                summary.cascaded += 1;
            }
        }

        DiagnosticsReport {
            records: self.records,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use im_core::ProductBatchKey;

    #[test]
    fn test_summary_counts() {
        let key = ProductBatchKey::new("P-1", "B1");
        let mut reporter = DiagnosticsReporter::new();

        reporter.record(DecisionRecord::new(&key, "SKU-1", Action::Consolidate, 3, 1));
        reporter.record(DecisionRecord::new(&key, "SKU-1", Action::NoAction, 2, 2));

        let mut failed = DecisionRecord::new(&key, "SKU-1", Action::Distribute, 1, 3);
        failed.error_reason = Some(FailureReason::NoConsolidationCandidate);
        reporter.record(failed);

        let mut partial = DecisionRecord::new(&key, "SKU-1", Action::Distribute, 1, 4);
        partial.error_reason = Some(FailureReason::PartialFulfillment {
            requested: 3,
            fulfilled: 1,
        });
        partial.donor_batch = Some("B2".to_string());
        reporter.record(partial);

        assert_eq!(reporter.len(), 4);
        let report = reporter.finish();

        assert_eq!(report.summary.evaluated, 4);
        assert_eq!(report.summary.consolidate, 1);
        assert_eq!(report.summary.distribute, 2);
        assert_eq!(report.summary.no_action, 1);
        assert_eq!(report.summary.manual_intervention, 1);
        assert_eq!(report.summary.partial, 1);
        assert_eq!(report.summary.cascaded, 1);
        assert_eq!(report.manual_interventions().count(), 2);
    }
}
