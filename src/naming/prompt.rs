// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Prompt assembly for directory naming

use crate::analyzer::AnalysisPayload;
use crate::taxonomy::NamingTaxonomy;
use crate::Result;

use super::MAX_NAME_LEN;

/// System instruction sent with every naming request
pub const SYSTEM_INSTRUCTION: &str = "You are a specialized directory naming agent. \
     Respond only with the requested directory name, nothing else.";

const GOOD_EXAMPLES: &[(&str, &str)] = &[
    ("transNewsIndPakEscalationAnalysis", "transcription about India-Pakistan escalation"),
    ("audPodClimateChangePolicy2024", "podcast audio about climate change policy"),
    ("docContractAcmeCorpServiceAgreement", "service contract with Acme Corp"),
    ("transInterviewAIEthicsResearch", "interview transcript on AI ethics research"),
    ("audMtgQuarterlyBudgetReview", "recorded meeting reviewing the quarterly budget"),
];

const BAD_EXAMPLES: &[(&str, &str)] = &[
    ("audTransNewsRecPod", "which news story?"),
    ("audTransMtgStrategy2024", "which strategy?"),
    ("docProfessionalStuff", "says nothing about the content"),
    ("transGenericMeeting", "no topic"),
];

/// Build the user prompt for one naming attempt.
///
/// `feedback` is the accumulated critique from earlier attempts, already
/// joined; it is inserted as a directive the model must address.
pub fn build_prompt(
    taxonomy: &NamingTaxonomy,
    payload: &AnalysisPayload,
    feedback: Option<&str>,
) -> Result<String> {
    let mut prompt = String::with_capacity(8 * 1024);

    prompt.push_str(
        "You name directories. Read the file structure and content snippets below and \
         produce one precise directory name that says what the material is actually about.\n\n",
    );

    prompt.push_str("NAMING RULES:\n");
    prompt.push_str("1. camelCase: a lowercase first letter, then letters and digits only (e.g. transNewsIndPakEscalationAnalysis)\n");
    prompt.push_str(&format!("2. At most {} characters\n", MAX_NAME_LEN));
    prompt.push_str("3. Begin with the content type abbreviation from the taxonomy, then the specific subject\n");
    prompt.push_str("4. Name real topics, people, organizations, places, projects or concepts found in the content\n");
    prompt.push_str("5. Prefer clear, searchable words over vague abbreviations\n");
    prompt.push_str("6. Add temporal or quality markers only when they carry meaning\n\n");

    prompt.push_str("TAXONOMY:\n");
    prompt.push_str(&serde_json::to_string_pretty(taxonomy)?);
    prompt.push_str("\n\n");

    prompt.push_str("GOOD NAMES:\n");
    for (name, why) in GOOD_EXAMPLES {
        prompt.push_str(&format!("- {} ({})\n", name, why));
    }
    prompt.push_str("\nBAD NAMES:\n");
    for (name, why) in BAD_EXAMPLES {
        prompt.push_str(&format!("- {} ({})\n", name, why));
    }

    if let Some(feedback) = feedback.filter(|f| !f.trim().is_empty()) {
        prompt.push_str("\nUSER FEEDBACK ON PREVIOUS ATTEMPTS:\n");
        prompt.push_str(feedback);
        prompt.push_str(
            "\n\nThe user rejected the earlier names. Address every complaint above \
             in this attempt, including any remarks about the destination.\n",
        );
    }

    prompt.push_str("\nANALYSIS DATA:\n");
    prompt.push_str(&format!("Directory Path: {}\n\n", payload.directory_path));
    prompt.push_str("File Tree Structure:\n");
    prompt.push_str(&serde_json::to_string_pretty(&payload.file_tree)?);
    prompt.push_str("\n\nText Snippets from Files:\n");
    prompt.push_str(&serde_json::to_string_pretty(&payload.text_snippets)?);
    prompt.push_str("\n\nAnalysis Metadata:\n");
    prompt.push_str(&serde_json::to_string_pretty(&payload.metadata)?);

    prompt.push_str("\n\nReply with the directory name only: no explanation, no quotes");
    if feedback.is_some() {
        prompt.push_str(", and make sure it answers the feedback");
    }
    prompt.push_str(".\n\nDirectory Name:");

    Ok(prompt)
}
