use serde::Serialize;
use std::fmt;
use vcp_canonical::HexDigest;

use crate::chain::ChainStatus;
use crate::errors::VerificationFailure;

/// Pipeline stage that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pack overview.
    Summary,
    /// Policy and architecture metadata.
    Compliance,
    /// Layer 1: per-event content hashes.
    EventHash,
    /// Layer 1: optional hash chain.
    Chain,
    /// Layer 2: recomputed Merkle root vs batch roots.
    MerkleRoot,
    /// Layer 2: inclusion proofs.
    InclusionProof,
    /// Layer 3: external anchors.
    Anchor,
    /// Timestamp ordering.
    Timeline,
    /// Event type counts.
    Distribution,
}

impl Stage {
    /// Stages in pipeline order.
    pub const ALL: [Stage; 9] = [
        Stage::Summary,
        Stage::Compliance,
        Stage::EventHash,
        Stage::Chain,
        Stage::MerkleRoot,
        Stage::InclusionProof,
        Stage::Anchor,
        Stage::Timeline,
        Stage::Distribution,
    ];

    /// Section title.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Summary => "Evidence Pack",
            Stage::Compliance => "Compliance (PolicyIdentification, Three-Layer Architecture, External Anchor)",
            Stage::EventHash => "Layer 1 - Event Hash Verification (SHA-256)",
            Stage::Chain => "Layer 1 - Hash Chain Verification (optional)",
            Stage::MerkleRoot => "Layer 2 - Merkle Root Verification (RFC 6962)",
            Stage::InclusionProof => "Layer 2 - Merkle Inclusion Proof Verification",
            Stage::Anchor => "Layer 3 - External Anchor Verification",
            Stage::Timeline => "Timeline Verification",
            Stage::Distribution => "Event Type Distribution",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Signal carried by one finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Advisory problem; never affects the verdict.
    Warn,
    /// Required check failed.
    Fail,
    /// Informational detail.
    Info,
}

impl CheckStatus {
    /// Single-character mark for text rendering.
    pub fn mark(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "⚠",
            CheckStatus::Fail => "✗",
            CheckStatus::Info => "·",
        }
    }
}

/// One diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Stage that produced it.
    pub stage: Stage,
    /// Pass/warn/fail/info signal.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.mark(), self.message)
    }
}

/// Accumulated result of a verification run.
///
/// Every stage appends to the same report; nothing short-circuits. The
/// verdict is the conjunction of all required checks, i.e. true iff no
/// [`VerificationFailure`] was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    findings: Vec<Finding>,
    failures: Vec<VerificationFailure>,
    computed_root: Option<HexDigest>,
    chain: ChainStatus,
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
            failures: Vec::new(),
            computed_root: None,
            chain: ChainStatus::NotUsed,
        }
    }

    /// Overall verdict.
    pub fn verified(&self) -> bool {
        self.failures.is_empty()
    }

    /// All findings in emission order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings of one stage.
    pub fn findings_for(&self, stage: Stage) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.stage == stage)
    }

    /// Recorded failures.
    pub fn failures(&self) -> &[VerificationFailure] {
        &self.failures
    }

    /// Number of advisory warnings.
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.status == CheckStatus::Warn)
            .count()
    }

    /// Root recomputed from the pack's leaf events, if it could be built.
    pub fn computed_root(&self) -> Option<&HexDigest> {
        self.computed_root.as_ref()
    }

    /// Hash-chain outcome.
    pub fn chain(&self) -> &ChainStatus {
        &self.chain
    }

    /// Diagnostic lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    pub(crate) fn pass(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(stage, CheckStatus::Pass, message);
    }

    pub(crate) fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(stage, CheckStatus::Warn, message);
    }

    pub(crate) fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(stage, CheckStatus::Info, message);
    }

    /// Records a failed required check: a `Fail` line plus the failure.
    pub(crate) fn fail(
        &mut self,
        stage: Stage,
        message: impl Into<String>,
        failure: VerificationFailure,
    ) {
        self.push(stage, CheckStatus::Fail, message);
        self.failures.push(failure);
    }

    pub(crate) fn push(&mut self, stage: Stage, status: CheckStatus, message: impl Into<String>) {
        self.findings.push(Finding {
            stage,
            status,
            message: message.into(),
        });
    }

    pub(crate) fn set_computed_root(&mut self, root: Option<HexDigest>) {
        self.computed_root = root;
    }

    pub(crate) fn set_chain(&mut self, chain: ChainStatus) {
        self.chain = chain;
    }
}
