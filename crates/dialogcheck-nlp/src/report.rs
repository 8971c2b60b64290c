//! Per-conversation aggregation of line tags into compliance reports.

use std::collections::HashMap;

use dialogcheck_core::{ConversationReport, TaggedLine};

/// Fold tagged lines into one report per conversation.
///
/// Works the same for fresh tagger output and for tags read back from a
/// previously written table. Reports come out in order of first appearance of
/// each conversation id; the representative name and company are the first
/// present values in line order.
pub fn aggregate<'a, I>(lines: I) -> Vec<ConversationReport>
where
    I: IntoIterator<Item = &'a TaggedLine>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut reports: Vec<ConversationReport> = Vec::new();

    for line in lines {
        let slot = *index
            .entry(line.conversation_id.as_str())
            .or_insert_with(|| {
                reports.push(ConversationReport::empty(line.conversation_id.clone()));
                reports.len() - 1
            });
        let report = &mut reports[slot];
        let tags = &line.tags;

        report.greeting_count += u64::from(tags.greeting);
        report.farewell_count += u64::from(tags.farewell);

        if let Some(name) = &tags.name {
            report.name_count += 1;
            report.extracted_manager_name.get_or_insert_with(|| name.clone());
        }
        if tags.self_represented() {
            report.self_represented_count += 1;
        }
        if let Some(company) = &tags.company {
            report.company_count += 1;
            report
                .extracted_company_name
                .get_or_insert_with(|| company.clone());
        }
    }

    for report in &mut reports {
        report.compliance_passed = report.greeting_count > 0 && report.farewell_count > 0;
    }

    reports
}

/// Count of conversations that passed the greeting + farewell check.
pub fn passed_count(reports: &[ConversationReport]) -> usize {
    reports.iter().filter(|r| r.compliance_passed).count()
}
