//! Test generation session
//!
//! Runs the query, reconcile and emit steps for whichever categories a test
//! run asks for. One session covers one DUT; its allow-lists start from the
//! configuration and grow only within the session.

use std::sync::Arc;

use log::{error, info, warn};

use crate::algorithm::AlgorithmCategory;
use crate::common::{MatrixError, Result};
use crate::config::{FailurePolicy, MatrixConfig};
use crate::matrix::{emit, select_category, TestMatrix};
use crate::query::{query_supported_algorithms, AnsibleExecutor, QueryTarget, RemoteExecutor};
use crate::reconcile::ReconciliationContext;
use crate::testbed::TestbedInfo;

/// Matrix generation against one DUT
pub struct GenerationSession {
    executor: Arc<dyn RemoteExecutor>,
    target: QueryTarget,
    marker: String,
    policy: FailurePolicy,
    context: ReconciliationContext,
}

impl GenerationSession {
    pub fn new(executor: Arc<dyn RemoteExecutor>, target: QueryTarget, config: &MatrixConfig) -> Self {
        Self {
            executor,
            target,
            marker: config.output_marker.clone(),
            policy: config.on_query_failure,
            context: ReconciliationContext::new(&config.allow_lists),
        }
    }

    /// Resolve the configured testbed's first DUT and query it through ansible
    pub fn from_config(config: &MatrixConfig) -> Result<Self> {
        let testbed_name = config.require_testbed()?;
        let testbeds = TestbedInfo::load(config.testbed_file())?;
        let testbed = testbeds.require(testbed_name)?;

        let target = QueryTarget::new(
            config.inventory_dir().join(&testbed.inv_name),
            testbed.primary_dut()?,
        );
        info!(
            "Testbed {}: querying DUT {} from inventory {}",
            testbed_name,
            target.host,
            target.inventory.display()
        );

        let executor = Arc::new(AnsibleExecutor::new(config.ansible_bin.as_str()));
        Ok(Self::new(executor, target, config))
    }

    pub fn target(&self) -> &QueryTarget {
        &self.target
    }

    pub fn context(&self) -> &ReconciliationContext {
        &self.context
    }

    /// Generate the matrix for a test declaring `declared` parameter names
    ///
    /// Returns `Ok(None)` when none of the names belongs to a category.
    pub fn generate_tests<S: AsRef<str>>(&mut self, declared: &[S]) -> Result<Option<TestMatrix>> {
        match select_category(declared) {
            Some(category) => self.generate(category).map(Some),
            None => Ok(None),
        }
    }

    /// Query, reconcile and emit one category
    pub fn generate(&mut self, category: AlgorithmCategory) -> Result<TestMatrix> {
        let queried = query_supported_algorithms(
            self.executor.as_ref(),
            &self.target,
            category,
            &self.marker,
        );
        self.finish(category, queried)
    }

    /// Generate every category, running the DUT queries concurrently
    ///
    /// Reconciliation still runs one category at a time, in category order.
    pub async fn generate_all(&mut self) -> Result<Vec<TestMatrix>> {
        let mut handles = Vec::with_capacity(AlgorithmCategory::ALL.len());
        for category in AlgorithmCategory::ALL {
            let executor = Arc::clone(&self.executor);
            let target = self.target.clone();
            let marker = self.marker.clone();
            handles.push((
                category,
                tokio::task::spawn_blocking(move || {
                    query_supported_algorithms(executor.as_ref(), &target, category, &marker)
                }),
            ));
        }

        let mut matrices = Vec::with_capacity(handles.len());
        for (category, handle) in handles {
            let queried = handle.await.map_err(|e| {
                MatrixError::Other(format!("{} query task failed: {}", category, e))
            })?;
            matrices.push(self.finish(category, queried)?);
        }

        Ok(matrices)
    }

    fn finish(&mut self, category: AlgorithmCategory, queried: Result<Vec<String>>) -> Result<TestMatrix> {
        let supported = match queried {
            Ok(supported) => supported,
            Err(e) => {
                metrics::counter!("ssh_algo_matrix.query.failures", "category" => category.short_name())
                    .increment(1);
                return match self.policy {
                    FailurePolicy::Fail => Err(e),
                    FailurePolicy::Degrade => {
                        error!("No {} test cases will be generated: {}", category, e);
                        Ok(TestMatrix::degraded(category))
                    }
                };
            }
        };

        let missing_from_dut: Vec<String> = self
            .context
            .allow_list(category)
            .iter()
            .filter(|name| !supported.iter().any(|s| s.as_str() == *name))
            .map(str::to_string)
            .collect();
        if !missing_from_dut.is_empty() {
            warn!("Allow-listed {} not advertised by {}: {:?}", category, self.target.host, missing_from_dut);
        }

        let params = self.context.reconcile(category, &supported);
        let mut matrix = emit(category, params);
        matrix.missing_from_dut = missing_from_dut;

        let failures = matrix.expected_failures().count();
        metrics::counter!("ssh_algo_matrix.cases.expected_failure", "category" => category.short_name())
            .increment(failures as u64);
        info!(
            "{}: {} test cases, {} expected to fail",
            matrix.parameter,
            matrix.len(),
            failures
        );

        Ok(matrix)
    }
}
