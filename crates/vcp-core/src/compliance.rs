//! Presence checks for policy and architecture metadata.
//!
//! These checks look at shape only; nothing here is cryptographic. Each
//! check yields its own signal, and only the required items can fail the
//! verdict.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::options::VerifyOptions;
use crate::pack::EvidencePack;
use crate::report::CheckStatus;
use crate::shared::{display_value, is_populated, PolicyIdentification};

/// Item examined by the compliance checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceItem {
    /// Declared specification version.
    SpecVersion,
    /// Pack-level `PolicyIdentification` block.
    GlobalPolicy,
    /// `PolicyIdentification.PolicyID`.
    PolicyId,
    /// `PolicyIdentification.ConformanceTier`.
    ConformanceTier,
    /// `PolicyIdentification.RegistrationPolicy.Issuer`.
    RegistrationIssuer,
    /// `PolicyIdentification.VerificationDepth`.
    VerificationDepth,
    /// Per-event `PolicyIdentification` blocks.
    EventPolicy,
    /// `metadata.three_layer_architecture`.
    ThreeLayerArchitecture,
    /// At least one anchor-marker event.
    AnchorEvent,
}

impl ComplianceItem {
    /// Whether a failure of this item affects the verdict.
    pub fn is_required(&self, options: &VerifyOptions) -> bool {
        match self {
            ComplianceItem::PolicyId
            | ComplianceItem::ConformanceTier
            | ComplianceItem::RegistrationIssuer
            | ComplianceItem::VerificationDepth
            | ComplianceItem::AnchorEvent => true,
            ComplianceItem::EventPolicy => options.require_event_policy,
            ComplianceItem::SpecVersion
            | ComplianceItem::GlobalPolicy
            | ComplianceItem::ThreeLayerArchitecture => false,
        }
    }
}

impl fmt::Display for ComplianceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplianceItem::SpecVersion => "specification version",
            ComplianceItem::GlobalPolicy => "global PolicyIdentification",
            ComplianceItem::PolicyId => "PolicyID",
            ComplianceItem::ConformanceTier => "ConformanceTier",
            ComplianceItem::RegistrationIssuer => "RegistrationPolicy.Issuer",
            ComplianceItem::VerificationDepth => "VerificationDepth",
            ComplianceItem::EventPolicy => "event-level PolicyIdentification",
            ComplianceItem::ThreeLayerArchitecture => "three-layer architecture declaration",
            ComplianceItem::AnchorEvent => "external anchor event",
        };
        f.write_str(name)
    }
}

/// One compliance signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceCheck {
    /// Item the signal is about.
    pub item: ComplianceItem,
    /// Pass/warn/fail, or info for supporting detail.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
}

/// Checks pack metadata against the configured policy requirements.
pub struct ComplianceChecker<'a> {
    options: &'a VerifyOptions,
}

impl<'a> ComplianceChecker<'a> {
    /// Creates a checker bound to `options`.
    pub fn new(options: &'a VerifyOptions) -> Self {
        Self { options }
    }

    /// Runs every compliance check, in a fixed order.
    pub fn check(&self, pack: &EvidencePack) -> Vec<ComplianceCheck> {
        let mut checks = Vec::new();
        self.check_spec_version(pack, &mut checks);
        self.check_global_policy(pack, &mut checks);
        self.check_event_policies(pack, &mut checks);
        self.check_three_layer(pack, &mut checks);
        self.check_anchor_events(pack, &mut checks);
        checks
    }

    /// Status for a present/absent outcome, honouring whether `item` is required.
    fn signal(&self, item: ComplianceItem, ok: bool) -> CheckStatus {
        match (ok, item.is_required(self.options)) {
            (true, _) => CheckStatus::Pass,
            (false, true) => CheckStatus::Fail,
            (false, false) => CheckStatus::Warn,
        }
    }

    fn check_spec_version(&self, pack: &EvidencePack, checks: &mut Vec<ComplianceCheck>) {
        let expected = &self.options.expected_spec_version;
        let spec = display_value(pack.metadata.specification.as_ref(), "");
        let version = display_value(pack.metadata.version.as_ref(), "");
        let declared = spec.contains(&format!("v{}", expected)) || version.contains(expected.as_str());

        let message = if declared {
            format!("Specification declared: {}", spec)
        } else {
            format!("Specification version unclear: {}", spec)
        };
        push(checks, ComplianceItem::SpecVersion, self.signal(ComplianceItem::SpecVersion, declared), message);
    }

    fn check_global_policy(&self, pack: &EvidencePack, checks: &mut Vec<ComplianceCheck>) {
        let policy = pack.policy_identification.clone().unwrap_or_default();
        let present = pack.policy_identification.is_some();
        push(
            checks,
            ComplianceItem::GlobalPolicy,
            self.signal(ComplianceItem::GlobalPolicy, present),
            if present {
                "Global PolicyIdentification present"
            } else {
                "Global PolicyIdentification not found"
            },
        );

        let populated = |v: &Option<Value>| v.clone().filter(is_populated);
        let fields = [
            (ComplianceItem::PolicyId, "PolicyID", populated(&policy.policy_id)),
            (
                ComplianceItem::ConformanceTier,
                "ConformanceTier",
                populated(&policy.conformance_tier),
            ),
            (
                ComplianceItem::RegistrationIssuer,
                "RegistrationPolicy.Issuer",
                policy.issuer().cloned(),
            ),
        ];
        for (item, label, value) in fields {
            let message = match &value {
                Some(v) => format!("{}: {}", label, display_value(Some(v), "")),
                None => format!("{} MISSING (REQUIRED)", label),
            };
            push(checks, item, self.signal(item, value.is_some()), message);
        }

        if policy.verification_depth.as_ref().is_some_and(is_populated) {
            push(
                checks,
                ComplianceItem::VerificationDepth,
                CheckStatus::Pass,
                "VerificationDepth present",
            );
            for line in depth_lines(&policy) {
                push(checks, ComplianceItem::VerificationDepth, CheckStatus::Info, line);
            }
        } else {
            push(
                checks,
                ComplianceItem::VerificationDepth,
                self.signal(ComplianceItem::VerificationDepth, false),
                "VerificationDepth MISSING (REQUIRED)",
            );
        }
    }

    fn check_event_policies(&self, pack: &EvidencePack, checks: &mut Vec<ComplianceCheck>) {
        let with_policy = pack
            .events
            .iter()
            .filter(|e| e.has_policy_identification())
            .count();
        let without_policy = pack.events.len() - with_policy;

        if without_policy == 0 {
            push(
                checks,
                ComplianceItem::EventPolicy,
                CheckStatus::Pass,
                format!("All {} events have PolicyIdentification", with_policy),
            );
        } else {
            push(
                checks,
                ComplianceItem::EventPolicy,
                self.signal(ComplianceItem::EventPolicy, false),
                format!("{} events missing PolicyIdentification", without_policy),
            );
            push(
                checks,
                ComplianceItem::EventPolicy,
                CheckStatus::Info,
                format!("{} events have PolicyIdentification", with_policy),
            );
        }
    }

    fn check_three_layer(&self, pack: &EvidencePack, checks: &mut Vec<ComplianceCheck>) {
        let item = ComplianceItem::ThreeLayerArchitecture;
        match pack.metadata.three_layer_architecture() {
            Some(layers) => {
                let layer_keys = [
                    "layer1_event_integrity",
                    "layer2_collection_integrity",
                    "layer3_external_verifiability",
                ];
                for (n, key) in layer_keys.into_iter().enumerate() {
                    let description = display_value(layers.get(key), "Not specified");
                    push(checks, item, CheckStatus::Pass, format!("Layer {}: {}", n + 1, description));
                }
            }
            None => push(
                checks,
                item,
                self.signal(item, false),
                "Three-layer architecture not declared in metadata",
            ),
        }
    }

    fn check_anchor_events(&self, pack: &EvidencePack, checks: &mut Vec<ComplianceCheck>) {
        let item = ComplianceItem::AnchorEvent;
        let anchor_events: Vec<_> = pack
            .events
            .iter()
            .filter(|e| e.event_type() == self.options.anchor_event_type)
            .collect();

        if anchor_events.is_empty() {
            push(checks, item, self.signal(item, false), "External anchor event MISSING (REQUIRED)");
            return;
        }

        push(
            checks,
            item,
            CheckStatus::Pass,
            format!("External anchor present ({} anchor event(s))", anchor_events.len()),
        );
        for event in anchor_events {
            let governance = event.governance();
            for field in ["AnchorID", "AnchorTarget", "AnchorFrequency"] {
                let value = governance.and_then(|g| g.get(field));
                push(checks, item, CheckStatus::Info, format!("{}: {}", field, display_value(value, "N/A")));
            }
        }
    }
}

fn push(checks: &mut Vec<ComplianceCheck>, item: ComplianceItem, status: CheckStatus, message: impl Into<String>) {
    checks.push(ComplianceCheck {
        item,
        status,
        message: message.into(),
    });
}

fn depth_lines(policy: &PolicyIdentification) -> Vec<String> {
    ["HashChainValidation", "MerkleProofRequired", "ExternalAnchorRequired"]
        .into_iter()
        .map(|flag| format!("{}: {}", flag, display_value(policy.depth_flag(flag), "N/A")))
        .collect()
}
