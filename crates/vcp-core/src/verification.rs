//! Verification pipeline.
//!
//! ```text
//! Load -> Summary -> Compliance -> EventHash -> Chain -> MerkleRoot
//!      -> InclusionProof (xN) -> Anchor -> Timeline -> Distribution -> verdict
//! ```
//!
//! Only `Load` can abort. Every later stage runs to completion regardless of
//! earlier failures, appending to one [`VerificationReport`].

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use vcp_canonical::{Canonicalizer, HexDigest};

use crate::anchor::{verify_anchors, AnchorVerdict};
use crate::chain::{validate_chain, ChainStatus};
use crate::compliance::ComplianceChecker;
use crate::errors::{LoadError, VerificationFailure};
use crate::event_hash::compute_event_hash;
use crate::merkle::{build_root, verify_inclusion};
use crate::options::VerifyOptions;
use crate::pack::EvidencePack;
use crate::report::{CheckStatus, Stage, VerificationReport};
use crate::shared::display_value;
use crate::timeline::find_regressions;

/// Verifier for evidence packs.
pub struct Verifier {
    canonicalizer: Canonicalizer,
    options: VerifyOptions,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(VerifyOptions::default())
    }
}

impl Verifier {
    /// Creates a verifier with the given options.
    pub fn new(options: VerifyOptions) -> Self {
        Self {
            canonicalizer: Canonicalizer::new(),
            options,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Loads the three parsed documents and verifies the resulting pack.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the documents are structurally invalid; in
    /// that case no verification stage runs.
    pub fn verify_documents(
        &self,
        events: Value,
        batches: Value,
        anchors: Value,
    ) -> Result<VerificationReport, LoadError> {
        let pack = EvidencePack::from_documents(events, batches, anchors)?;
        Ok(self.verify(&pack))
    }

    /// Runs every verification stage over `pack`.
    pub fn verify(&self, pack: &EvidencePack) -> VerificationReport {
        info!(
            events = pack.events.len(),
            batches = pack.batches.len(),
            anchors = pack.anchors.len(),
            "verifying evidence pack"
        );

        let mut report = VerificationReport::new();
        self.summarize(pack, &mut report);
        self.check_compliance(pack, &mut report);
        self.check_event_hashes(pack, &mut report);
        self.check_chain(pack, &mut report);
        let root = self.check_merkle_root(pack, &mut report);
        self.check_inclusion_proofs(pack, &mut report);
        self.check_anchors(pack, root.as_ref(), &mut report);
        self.check_timeline(pack, &mut report);
        self.count_event_types(pack, &mut report);

        info!(
            verified = report.verified(),
            failures = report.failures().len(),
            warnings = report.warning_count(),
            "verification finished"
        );
        report
    }

    fn summarize(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let meta = &pack.metadata;
        let or_unknown = |v: &Option<Value>| display_value(v.as_ref(), "unknown");
        let stage = Stage::Summary;
        report.info(stage, format!("Specification: {}", or_unknown(&meta.specification)));
        report.info(stage, format!("Generator: {}", or_unknown(&meta.generator)));
        report.info(stage, format!("Conformance Tier: {}", or_unknown(&meta.conformance_tier)));
        report.info(stage, format!("PolicyID: {}", or_unknown(&meta.policy_id)));
        report.info(stage, format!("Total Events: {}", pack.events.len()));
        report.info(stage, format!("Total Batches: {}", pack.batches.len()));
        report.info(stage, format!("Total Anchors: {}", pack.anchors.len()));
        report.info(stage, format!("Protocol: {}", or_unknown(&meta.protocol)));
    }

    fn check_compliance(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let checks = ComplianceChecker::new(&self.options).check(pack);
        for check in checks {
            if check.status == CheckStatus::Fail {
                warn!(item = %check.item, "compliance check failed");
                report.fail(
                    Stage::Compliance,
                    check.message,
                    VerificationFailure::Compliance { item: check.item },
                );
            } else {
                report.push(Stage::Compliance, check.status, check.message);
            }
        }
    }

    fn check_event_hashes(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let stage = Stage::EventHash;
        let mut mismatches = 0;

        for event in &pack.events {
            let stored = event.stored_hash().unwrap_or("");
            match compute_event_hash(event, &self.canonicalizer) {
                Ok(computed) if computed == stored => {}
                Ok(computed) => {
                    mismatches += 1;
                    warn!(event_id = event.event_id(), "event hash mismatch");
                    let detail = if HexDigest::parse(stored).is_err() {
                        " (stored EventHash is not a 64-character lowercase hex digest)"
                    } else {
                        ""
                    };
                    report.fail(
                        stage,
                        format!("Hash mismatch: {}{}", event.event_id(), detail),
                        VerificationFailure::HashMismatch {
                            event_id: event.event_id().to_string(),
                            stored: stored.to_string(),
                            computed: computed.into_string(),
                        },
                    );
                }
                Err(e) => {
                    mismatches += 1;
                    report.fail(
                        stage,
                        format!("Hash not computable: {}: {}", event.event_id(), e),
                        VerificationFailure::HashUncomputable {
                            event_id: event.event_id().to_string(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        if mismatches == 0 {
            report.pass(
                stage,
                format!("All {} event hashes cryptographically verified", pack.events.len()),
            );
        }
        debug!(events = pack.events.len(), mismatches, "event hash stage complete");
    }

    fn check_chain(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let stage = Stage::Chain;
        let status = validate_chain(&pack.events);

        match &status {
            ChainStatus::NotUsed => {
                report.info(stage, "Hash chain not used (chaining is optional)");
            }
            ChainStatus::Intact { links } => {
                report.pass(stage, format!("Hash chain present and verified ({} links)", links));
            }
            ChainStatus::Broken { links, breaks } => {
                for b in breaks {
                    let message = format!("Chain break at event {} ({})", b.index, b.event_id);
                    if self.options.chain_breaks_fatal {
                        report.fail(
                            stage,
                            message,
                            VerificationFailure::ChainBreak {
                                index: b.index,
                                event_id: b.event_id.clone(),
                            },
                        );
                    } else {
                        report.warn(stage, message);
                    }
                }
                report.warn(
                    stage,
                    format!("Hash chain present but has {} break(s) in {} links", breaks.len(), links),
                );
            }
        }

        debug!(valid = status.is_valid(), "chain stage complete");
        report.set_chain(status);
    }

    fn check_merkle_root(
        &self,
        pack: &EvidencePack,
        report: &mut VerificationReport,
    ) -> Option<HexDigest> {
        let stage = Stage::MerkleRoot;
        let admin_types = self.options.admin_event_types();
        let leaf_hashes: Vec<&str> = pack
            .leaf_events(&admin_types)
            .map(|e| e.stored_hash().unwrap_or(""))
            .collect();

        let root = match build_root(&leaf_hashes) {
            Ok(root) => root,
            Err(e) => {
                warn!(error = %e, "merkle root unavailable");
                report.fail(
                    stage,
                    format!("Merkle root could not be rebuilt: {}", e),
                    VerificationFailure::MerkleRootUnavailable {
                        reason: e.to_string(),
                    },
                );
                return None;
            }
        };

        if pack.batches.is_empty() {
            report.info(
                stage,
                format!(
                    "No batch records; root over {} event hashes is {}",
                    leaf_hashes.len(),
                    root
                ),
            );
        }

        for (index, batch) in pack.batches.iter().enumerate() {
            if root == batch.merkle_root.as_str() {
                report.pass(stage, format!("Merkle root verified: {}...", prefix(root.as_str(), 32)));
                report.info(stage, format!("Tree rebuilt from {} event hashes", leaf_hashes.len()));
            } else {
                warn!(batch = index, "merkle root mismatch");
                report.fail(
                    stage,
                    format!("Merkle root mismatch in batch {}", batch_label(index, batch.batch_id.as_deref())),
                    VerificationFailure::MerkleRootMismatch {
                        batch: index,
                        stored: batch.merkle_root.clone(),
                        computed: root.to_string(),
                    },
                );
            }
        }

        report.set_computed_root(Some(root.clone()));
        Some(root)
    }

    fn check_inclusion_proofs(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let stage = Stage::InclusionProof;
        let mut checked = 0;

        for (index, batch) in pack.batches.iter().enumerate() {
            for proof in &batch.inclusion_proofs {
                checked += 1;
                if verify_inclusion(&proof.event_hash, &proof.audit_path, &proof.merkle_root) {
                    report.pass(
                        stage,
                        format!("Event {}... inclusion verified", prefix(&proof.event_id, 18)),
                    );
                } else {
                    warn!(batch = index, event_id = %proof.event_id, "inclusion proof failed");
                    report.fail(
                        stage,
                        format!("Inclusion proof failed for event {}", proof.event_id),
                        VerificationFailure::InclusionProof {
                            batch: index,
                            event_id: proof.event_id.clone(),
                            root: proof.merkle_root.clone(),
                        },
                    );
                }
            }
        }

        if checked == 0 {
            report.info(stage, "No inclusion proofs supplied");
        }
        debug!(proofs = checked, "inclusion proof stage complete");
    }

    fn check_anchors(
        &self,
        pack: &EvidencePack,
        root: Option<&HexDigest>,
        report: &mut VerificationReport,
    ) {
        let stage = Stage::Anchor;
        match verify_anchors(&pack.anchors, root) {
            AnchorVerdict::Missing => {
                warn!("no anchor records");
                report.fail(
                    stage,
                    "No anchors found (anchoring is mandatory)",
                    VerificationFailure::AnchorMissing,
                );
            }
            AnchorVerdict::Checked(checks) => {
                for check in checks {
                    if check.matched {
                        report.pass(stage, format!("Anchor {} verified", check.anchor_id));
                        report.info(stage, format!("Target: {}", check.target));
                    } else {
                        warn!(anchor_id = %check.anchor_id, "anchor root mismatch");
                        report.fail(
                            stage,
                            format!("Anchor {} Merkle root mismatch", check.anchor_id),
                            VerificationFailure::AnchorMismatch {
                                anchor_id: check.anchor_id,
                                stated: check.stated_root,
                                computed: root.map_or_else(
                                    || "unavailable".to_string(),
                                    ToString::to_string,
                                ),
                            },
                        );
                    }
                }
            }
        }
    }

    fn check_timeline(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let regressions = find_regressions(&pack.events);
        if regressions.is_empty() {
            report.pass(Stage::Timeline, "Timeline chronology verified");
        } else {
            report.warn(
                Stage::Timeline,
                format!("{} non-monotonic timestamps detected", regressions.len()),
            );
            for r in regressions {
                report.info(
                    Stage::Timeline,
                    format!("Event {} ({}) precedes its predecessor", r.index, r.event_id),
                );
            }
        }
    }

    fn count_event_types(&self, pack: &EvidencePack, report: &mut VerificationReport) {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for event in &pack.events {
            *counts.entry(event.event_type()).or_insert(0) += 1;
        }
        for (event_type, count) in counts {
            report.info(Stage::Distribution, format!("{}: {}", event_type, count));
        }
    }
}

fn prefix(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn batch_label(index: usize, batch_id: Option<&str>) -> String {
    match batch_id {
        Some(id) => format!("{} ({})", index, id),
        None => index.to_string(),
    }
}
