//! Section location and creation
//!
//! Finds or creates a named section inside a line-based Markdown document
//! and computes the half-open range of lines the section owns. A section
//! runs from the line after its heading to the next heading whose level is
//! less than or equal to the section's threshold, or to the end of the
//! enclosing range. Two nesting levels are supported: a top-level section
//! searched across the whole document, and a sub-section confined to its
//! parent's range.

use crate::heading::heading_level;

/// Half-open line range `[start, end)` of a section's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBlock {
    pub start: usize,
    pub end: usize,
}

impl SectionBlock {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies entirely within this range
    pub fn contains(&self, other: &SectionBlock) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// This range with its end moved by `shift` lines
    pub fn shifted(&self, shift: isize) -> SectionBlock {
        SectionBlock {
            start: self.start,
            end: (self.end as isize + shift) as usize,
        }
    }
}

/// Result of locating (or creating) a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Content range of the section, excluding its heading line
    pub block: SectionBlock,
    /// Index of the section's heading line
    pub heading_idx: usize,
    /// Net number of lines inserted (or removed) while creating the section
    ///
    /// Zero when the section already existed. Enclosing ranges must shift
    /// their end by this amount.
    pub shift: isize,
}

/// Find a section by its heading literal, creating it when absent
///
/// The search runs top-down over `parent` (the whole document when `None`)
/// and matches the first line whose trimmed text equals `heading`. A missing
/// section is appended at the end of the parent range: exactly one blank
/// line separating it from preceding content, the heading, then one blank
/// line. The returned content range ends at the first subsequent heading of
/// level `<= threshold`, or at the (shift-adjusted) parent end.
pub fn locate_or_create(
    lines: &mut Vec<String>,
    heading: &str,
    parent: Option<SectionBlock>,
    threshold: usize,
) -> Located {
    let (search_start, search_end) = match parent {
        Some(p) => (p.start, p.end),
        None => (0, lines.len()),
    };

    let found = lines[search_start..search_end]
        .iter()
        .position(|line| line.trim() == heading)
        .map(|i| i + search_start);

    let mut shift: isize = 0;
    let heading_idx = match found {
        Some(idx) => idx,
        None => {
            let mut at = search_end;
            // Collapse trailing blank lines so exactly one separates the
            // new heading from preceding content.
            while at > search_start && lines[at - 1].trim().is_empty() {
                lines.remove(at - 1);
                at -= 1;
                shift -= 1;
            }
            if at > 0 && !lines[at - 1].trim().is_empty() {
                lines.insert(at, String::new());
                at += 1;
                shift += 1;
            }
            lines.insert(at, heading.to_string());
            lines.insert(at + 1, String::new());
            shift += 2;
            at
        }
    };

    let limit = (search_end as isize + shift) as usize;
    let start = heading_idx + 1;
    let mut end = limit;
    for (offset, line) in lines[start..limit].iter().enumerate() {
        if let Some(level) = heading_level(line) {
            if level <= threshold {
                end = start + offset;
                break;
            }
        }
    }

    Located {
        block: SectionBlock::new(start, end),
        heading_idx,
        shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_find_existing_section() {
        let mut lines = doc("# 2025-01-01\n\n## Inbox\n\n- [a](a.md)\n\n## Done\n");
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        assert_eq!(located.heading_idx, 2);
        assert_eq!(located.shift, 0);
        // Runs up to the next level-2 heading
        assert_eq!(located.block, SectionBlock::new(3, 6));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut lines = doc("## Inbox\n\nfirst\n\n## Inbox\n\nsecond\n");
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        assert_eq!(located.heading_idx, 0);
        assert_eq!(located.block, SectionBlock::new(1, 4));
    }

    #[test]
    fn test_create_on_empty_document() {
        let mut lines: Vec<String> = Vec::new();
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        assert_eq!(lines, vec!["## Inbox".to_string(), String::new()]);
        assert_eq!(located.heading_idx, 0);
        assert_eq!(located.shift, 2);
        // Content range covers only the appended blank line
        assert_eq!(located.block, SectionBlock::new(1, 2));
    }

    #[test]
    fn test_create_appends_single_separator() {
        let mut lines = doc("# 2025-01-01\nsome text\n");
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        assert_eq!(
            lines,
            vec![
                "# 2025-01-01".to_string(),
                "some text".to_string(),
                String::new(),
                "## Inbox".to_string(),
                String::new(),
            ]
        );
        assert_eq!(located.heading_idx, 3);
        assert_eq!(located.shift, 3);
    }

    #[test]
    fn test_create_collapses_trailing_blanks() {
        let mut lines = doc("# 2025-01-01\ntext\n\n\n");
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        assert_eq!(
            lines,
            vec![
                "# 2025-01-01".to_string(),
                "text".to_string(),
                String::new(),
                "## Inbox".to_string(),
                String::new(),
            ]
        );
        // Two blanks removed, three lines inserted
        assert_eq!(located.shift, 1);
        assert_eq!(located.block, SectionBlock::new(4, 5));
    }

    #[test]
    fn test_deeper_headings_do_not_terminate() {
        let mut lines = doc("## Inbox\n\n### Saved Articles\n\n- [a](a.md)\n\n## Done\n");
        let located = locate_or_create(&mut lines, "## Inbox", None, 2);

        // The level-3 heading is inside the section; the level-2 one ends it
        assert_eq!(located.block, SectionBlock::new(1, 6));
    }

    #[test]
    fn test_equal_level_heading_terminates_subsection() {
        let mut lines = doc("## Inbox\n\n### Saved Articles\n\n- [a](a.md)\n\n### Other\n\nx\n");
        let parent = locate_or_create(&mut lines, "## Inbox", None, 2);
        let sub = locate_or_create(&mut lines, "### Saved Articles", Some(parent.block), 3);

        assert_eq!(sub.heading_idx, 2);
        assert_eq!(sub.block, SectionBlock::new(3, 6));
    }

    #[test]
    fn test_subsection_contained_in_parent() {
        let mut lines = doc("# day\n\n## Inbox\n\n- [a](a.md)\n\n## Done\n\nx\n");
        let parent = locate_or_create(&mut lines, "## Inbox", None, 2);
        let sub = locate_or_create(&mut lines, "### Saved Articles", Some(parent.block), 3);

        let adjusted_parent = parent.block.shifted(sub.shift);
        assert!(adjusted_parent.contains(&sub.block));
        // Parent's terminating heading is untouched
        assert_eq!(lines[lines.len() - 3], "## Done");
    }

    #[test]
    fn test_create_subsection_inside_parent() {
        let mut lines = doc("# day\n\n## Inbox\n");
        let parent = locate_or_create(&mut lines, "## Inbox", None, 2);
        let sub = locate_or_create(&mut lines, "### Saved Articles", Some(parent.block), 3);

        assert_eq!(
            lines,
            vec![
                "# day".to_string(),
                String::new(),
                "## Inbox".to_string(),
                String::new(),
                "### Saved Articles".to_string(),
                String::new(),
            ]
        );
        assert!(parent.block.shifted(sub.shift).contains(&sub.block));
    }
}
