//! Greedy section-preserving chunking for multi-message delivery.
//!
//! The report is split only at blank-line section breaks; a section is never
//! cut mid-text. Greedy single pass, no backtracking, so output ordering is
//! deterministic.

/// Character count in Unicode scalar values. The platform budget counts
/// characters, not bytes.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `report` into buffers of at most `max_len` characters, drawing
/// boundaries only at blank-line section breaks.
///
/// The header counts against the first buffer only. Each buffer takes
/// sections until the next one would overflow, then flushes trimmed. A
/// section that alone exceeds `max_len` becomes its own oversized buffer.
pub fn chunk_report(header: &str, report: &str, max_len: usize) -> Vec<String> {
    let combined = format!("{header}{report}");
    if char_len(&combined) <= max_len {
        return vec![combined];
    }

    let mut buffers = Vec::new();
    let mut current = header.to_string();
    let mut current_len = char_len(header);

    for section in report.split("\n\n") {
        let section_len = char_len(section);
        if current_len + section_len + 2 <= max_len {
            current.push_str(section);
            current.push_str("\n\n");
            current_len += section_len + 2;
        } else {
            let flushed = current.trim();
            if !flushed.is_empty() {
                buffers.push(flushed.to_string());
            }
            current = format!("{section}\n\n");
            current_len = section_len + 2;
        }
    }

    let flushed = current.trim();
    if !flushed.is_empty() {
        buffers.push(flushed.to_string());
    }

    buffers
}

/// Chunk a report and label every buffer after the first with its 1-based
/// position, e.g. `(continued 2/3)`.
pub fn outbound_messages(header: &str, report: &str, max_len: usize) -> Vec<String> {
    let buffers = chunk_report(header, report, max_len);
    let total = buffers.len();
    buffers
        .into_iter()
        .enumerate()
        .map(|(i, buffer)| {
            if i == 0 {
                buffer
            } else {
                format!("(continued {}/{})\n\n{}", i + 1, total, buffer)
            }
        })
        .collect()
}
