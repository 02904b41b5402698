//! Dashboard service: owns the current snapshot and runs screen operations
//!
//! Each successful fetch builds a fresh [`Snapshot`] and swaps it in whole
//! under a write lock. Readers clone the `Arc` and never see a torn update.
//! A failed fetch leaves the previous snapshot in place.

use crate::backend::{TestCaseBackend, UploadRequest};
use crate::error::{DashboardError, DashboardResult};
use chrono::NaiveDate;
use futures::future::try_join_all;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tcg_export::{
    compliance_report_csv, compliance_report_file_name, test_cases_csv, ExportError,
    TEST_CASES_FILE_NAME,
};
use tcg_matrix::{build_matrix, build_matrix_with_catalog, group_by_requirement, GroupedRequirement, MatrixModel};
use tcg_model::{
    ComplianceMetrics, ExtractionResponse, FileInfo, ImproveRequest, ImproveResponse,
    JiraPushResponse, Requirement, TestCaseRecord, UploadResponse,
};

/// Everything one fetch produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Requirement catalog, if it has been fetched
    pub requirements: Vec<Requirement>,
    /// Flat records
    pub records: Vec<TestCaseRecord>,
    /// Matrix built from `records`
    pub model: MatrixModel,
}

/// Outcome of a generation batch
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Requirements generated for
    pub requested: usize,
    /// Snapshot reloaded after the batch
    pub snapshot: Arc<Snapshot>,
}

/// Screen operations over a backend
pub struct Dashboard<B> {
    backend: B,
    snapshot: RwLock<Arc<Snapshot>>,
    metrics: RwLock<Arc<ComplianceMetrics>>,
}

impl<B: TestCaseBackend> Dashboard<B> {
    /// Create dashboard with empty state
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            metrics: RwLock::new(Arc::new(ComplianceMetrics::empty())),
        }
    }

    /// Backend in use
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Last fetched compliance metrics
    pub fn cached_metrics(&self) -> Arc<ComplianceMetrics> {
        Arc::clone(&self.metrics.read())
    }

    fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write() = Arc::clone(&snapshot);
        snapshot
    }

    /// Derive the next snapshot from the current one under a single write guard
    fn update(&self, next: impl FnOnce(&Snapshot) -> Snapshot) -> Arc<Snapshot> {
        let mut guard = self.snapshot.write();
        let snapshot = Arc::new(next(&guard));
        *guard = Arc::clone(&snapshot);
        snapshot
    }

    /// Fetch the requirement catalog into the snapshot
    ///
    /// # Errors
    /// Returns the backend error; the snapshot is unchanged.
    pub async fn load_requirements(&self) -> DashboardResult<Arc<Snapshot>> {
        let requirements = self.backend.list_requirements().await?;
        tracing::info!(count = requirements.len(), "loaded requirements");
        Ok(self.update(|current| Snapshot {
            requirements,
            records: current.records.clone(),
            model: current.model.clone(),
        }))
    }

    /// Fetch test cases and rebuild the matrix from them alone
    ///
    /// # Errors
    /// Returns the backend error; the snapshot is unchanged.
    pub async fn load_matrix(&self) -> DashboardResult<Arc<Snapshot>> {
        let records = self.backend.list_test_cases().await?.into_records();
        let model = build_matrix(&records);
        tracing::info!(
            records = records.len(),
            test_cases = model.metrics().total_test_cases,
            coverage = model.coverage(),
            "loaded traceability matrix"
        );
        Ok(self.update(|current| Snapshot {
            requirements: current.requirements.clone(),
            records,
            model,
        }))
    }

    /// Fetch catalog and test cases together; untested requirements count
    /// against coverage
    ///
    /// # Errors
    /// Returns the first backend error; the snapshot is unchanged.
    pub async fn load_matrix_with_catalog(&self) -> DashboardResult<Arc<Snapshot>> {
        let (requirements, payload) = futures::try_join!(
            self.backend.list_requirements(),
            self.backend.list_test_cases()
        )?;
        let records = payload.into_records();
        let model = build_matrix_with_catalog(&requirements, &records);
        tracing::info!(
            requirements = requirements.len(),
            records = records.len(),
            coverage = model.coverage(),
            "loaded traceability matrix with catalog"
        );
        Ok(self.install(Snapshot {
            requirements,
            records,
            model,
        }))
    }

    /// Current records grouped under the catalog
    pub fn generation_groups(&self, selection: Option<&[String]>) -> Vec<GroupedRequirement> {
        let snapshot = self.snapshot();
        group_by_requirement(&snapshot.records, &snapshot.requirements, selection)
    }

    /// Generate test cases for every selected requirement, then reload
    ///
    /// All requests run concurrently. If any fails the whole batch fails and
    /// the snapshot is left as it was.
    ///
    /// # Errors
    /// [`DashboardError::NoSelection`] for an empty selection,
    /// [`DashboardError::BatchFailed`] if any request fails, or the reload error.
    pub async fn generate_for_requirements(&self, requirement_ids: &[String]) -> DashboardResult<GenerationOutcome> {
        if requirement_ids.is_empty() {
            return Err(DashboardError::NoSelection);
        }
        let total = requirement_ids.len();
        tracing::info!(total, "generating test cases for selection");

        try_join_all(
            requirement_ids
                .iter()
                .map(|id| self.backend.generate_for_requirement(id.clone())),
        )
        .await
        .map_err(|source| DashboardError::BatchFailed { total, source })?;

        let snapshot = self.load_matrix().await?;
        Ok(GenerationOutcome {
            requested: total,
            snapshot,
        })
    }

    /// Generate test cases for every requirement of an uploaded file, then reload
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn generate_for_file(&self, file_id: &str) -> DashboardResult<Arc<Snapshot>> {
        self.backend.generate_for_file(file_id.to_string()).await?;
        self.load_matrix().await
    }

    /// Ask the backend to rewrite one test case description
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn improve(&self, request: ImproveRequest) -> DashboardResult<ImproveResponse> {
        Ok(self.backend.improve_test_case(request).await?)
    }

    /// Push every test case to the issue tracker
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn push_to_jira(&self) -> DashboardResult<JiraPushResponse> {
        let response = self.backend.push_to_jira().await?;
        tracing::info!(pushed = ?response.pushed(), "pushed to jira");
        Ok(response)
    }

    /// Fetch compliance metrics and cache them
    ///
    /// # Errors
    /// Returns the backend error; the cache is unchanged.
    pub async fn refresh_metrics(&self) -> DashboardResult<Arc<ComplianceMetrics>> {
        let metrics = Arc::new(self.backend.compliance_metrics().await?);
        *self.metrics.write() = Arc::clone(&metrics);
        Ok(metrics)
    }

    /// Fetch compliance metrics, showing an empty aggregate on failure
    pub async fn compliance_metrics_or_empty(&self) -> Arc<ComplianceMetrics> {
        match self.refresh_metrics().await {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(error = %err, "compliance metrics unavailable, showing empty state");
                let empty = Arc::new(ComplianceMetrics::empty());
                *self.metrics.write() = Arc::clone(&empty);
                empty
            }
        }
    }

    /// Upload requirement documents and input files
    ///
    /// # Errors
    /// Returns the backend or file read error.
    pub async fn upload(&self, request: UploadRequest) -> DashboardResult<UploadResponse> {
        Ok(self.backend.upload_files(request).await?)
    }

    /// List uploaded files
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn files(&self) -> DashboardResult<Vec<FileInfo>> {
        Ok(self.backend.list_files().await?)
    }

    /// Extract requirements from an uploaded file
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn extract(&self, file_id: &str) -> DashboardResult<ExtractionResponse> {
        Ok(self.backend.extract_requirements(file_id.to_string()).await?)
    }

    /// Write `compliance_report_all_<today>.csv` into `dir`
    ///
    /// Fresh metrics are fetched first; if that fails the cached ones are used.
    ///
    /// # Errors
    /// Returns an export error if the file cannot be written.
    pub async fn export_compliance_report(&self, dir: &Path, today: NaiveDate) -> DashboardResult<PathBuf> {
        let metrics = match self.refresh_metrics().await {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(error = %err, "exporting cached compliance metrics");
                self.cached_metrics()
            }
        };
        let csv = compliance_report_csv(&metrics)?;
        write_file(dir, &compliance_report_file_name(today), csv).await
    }

    /// Write `test_cases.csv` into `dir` from freshly fetched records
    ///
    /// # Errors
    /// Returns the fetch error or an export error.
    pub async fn export_test_cases(&self, dir: &Path) -> DashboardResult<PathBuf> {
        let snapshot = self.load_matrix().await?;
        let csv = test_cases_csv(&snapshot.records);
        write_file(dir, TEST_CASES_FILE_NAME, csv).await
    }
}

async fn write_file(dir: &Path, name: &str, contents: String) -> DashboardResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ExportError::io(dir, e))?;
    let path = dir.join(name);
    tokio::fs::write(&path, contents.as_bytes())
        .await
        .map_err(|e| ExportError::io(&path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}
