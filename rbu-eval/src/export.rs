//! JSON export of an evaluation run
//!
//! Same rows as the TSV report plus the parameters, the aggregate and the
//! ingestion diagnostics of both inputs.

use rbu_common::format::Diagnostic;
use rbu_common::{EvaluationResult, Ingestion, RbuParameters, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete record of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultExport {
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    pub metric: String,
    pub parameters: RbuParameters,
    pub gold_standard: String,
    pub system_output: String,
    /// Gold test cases first, then system-output-only ones
    pub test_cases: Vec<TestCaseScore>,
    pub aggregate: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseScore {
    pub test_case: String,
    pub score: Option<f64>,
    pub in_gold_standard: bool,
}

impl ResultExport {
    pub fn new(
        parameters: RbuParameters,
        gold: &Ingestion,
        output: &Ingestion,
        result: &EvaluationResult,
    ) -> Self {
        let gold_cases = gold.store.test_cases().map(|tc| (tc, true));
        let output_only = output
            .store
            .test_cases()
            .filter(|tc| !gold.store.contains_test_case(tc))
            .map(|tc| (tc, false));

        let test_cases = gold_cases
            .chain(output_only)
            .map(|(test_case, in_gold_standard)| TestCaseScore {
                test_case: test_case.to_string(),
                score: result.score(test_case),
                in_gold_standard,
            })
            .collect();

        let diagnostics = gold
            .outcome
            .diagnostics
            .iter()
            .chain(&output.outcome.diagnostics)
            .cloned()
            .collect();

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            metric: result.metric().to_string(),
            parameters,
            gold_standard: gold.store.source().to_string(),
            system_output: output.store.source().to_string(),
            test_cases,
            aggregate: result.aggregate(),
            diagnostics,
        }
    }

    /// Export to a pretty-printed JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Import from a JSON file
    pub fn import_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
