//! Report rendering.

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::fmt::{self, Write};
use vcp_core::{CheckStatus, Stage, VerificationReport};

const RULE_WIDTH: usize = 70;

/// Renders the report as sectioned text, one block per stage.
pub fn render_text(dir: &str, report: &VerificationReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_text(&mut out, dir, report)?;
    Ok(out)
}

fn write_text(out: &mut impl Write, dir: &str, report: &VerificationReport) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "{}", rule)?;
    writeln!(out, "VCP Evidence Pack Verification Report")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Evidence Path: {}", dir)?;
    writeln!(out, "Verification Time: {}", verification_time())?;
    writeln!(out)?;

    for stage in Stage::ALL {
        let findings: Vec<_> = report.findings_for(stage).collect();
        if findings.is_empty() {
            continue;
        }
        writeln!(out, "{}:", stage.title())?;
        for finding in &findings {
            writeln!(out, "  {}", finding)?;
        }
        if stage == Stage::Compliance {
            let compliant = findings.iter().all(|f| f.status != CheckStatus::Fail);
            let verdict = if compliant {
                "✓ FULLY COMPLIANT"
            } else {
                "⚠ PARTIAL COMPLIANCE"
            };
            writeln!(out, "  Compliance: {}", verdict)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", rule)?;
    if report.verified() {
        writeln!(out, "Overall: ✓ CRYPTOGRAPHICALLY VERIFIED")?;
        writeln!(out, "All hashes, proofs, and anchors have been independently verified.")?;
    } else {
        writeln!(out, "Overall: ✗ VERIFICATION FAILED")?;
        for failure in report.failures() {
            writeln!(out, "  - {}", failure)?;
        }
    }
    writeln!(out, "{}", rule)
}

/// Renders the report as a pretty-printed JSON document.
pub fn render_json(
    dir: &str,
    report: &VerificationReport,
) -> Result<String, serde_json::Error> {
    let failures: Vec<String> = report.failures().iter().map(ToString::to_string).collect();
    let doc = json!({
        "evidence_path": dir,
        "verification_time": verification_time(),
        "verified": report.verified(),
        "computed_root": report.computed_root(),
        "chain": report.chain(),
        "warnings": report.warning_count(),
        "failures": failures,
        "findings": report.findings(),
    });
    serde_json::to_string_pretty(&doc)
}

fn verification_time() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
