use std::fmt;

/// Terminal state of a single test function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    /// Upper-cased spelling used in the wire report.
    pub fn as_report_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_report_str())
    }
}

/// One recorded test result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    test_id: String,
    status: TestStatus,
    diagnostic: Option<String>,
}

impl TestOutcome {
    pub fn passed(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            status: TestStatus::Passed,
            diagnostic: None,
        }
    }

    /// A failure always carries its failure representation.
    pub fn failed(test_id: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            status: TestStatus::Failed,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn skipped(test_id: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            test_id: test_id.into(),
            status: TestStatus::Skipped,
            diagnostic: reason,
        }
    }

    /// Identifier of the test function within the host framework.
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }
}
