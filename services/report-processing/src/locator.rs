//! Table section locator.
//!
//! A small state machine over the ordered page sequence: `Idle` until a
//! page contains a table kind's header phrase, then `Active(kind)` until a
//! page contains one of that kind's terminator keywords. Report layouts
//! vary in page breaks, so headers and terminators are never paired into a
//! contiguous block up front — a table may span any number of pages.
//!
//! The keyword tables live in [`SectionBoundaries`] configuration, not in
//! the machine. One standing exception is carried as data there: while
//! `CurrentDaily` is active, a page containing `HARMONIC 5:` keeps the
//! section open even when a terminator also matches.

use std::ops::Range;

use pqlens_models::TableKind;
use pqlens_utils::SectionBoundaries;

/// What to extract from one page: the active table kind and the byte range
/// of page text the regex fallback should scan. On a header page the range
/// is bounded by the nearest terminator after the header; on continuation
/// pages it is the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    pub kind: TableKind,
    pub text_range: Range<usize>,
}

#[derive(Debug)]
pub struct TableLocator<'a> {
    boundaries: &'a SectionBoundaries,
    active: Option<TableKind>,
}

impl<'a> TableLocator<'a> {
    pub fn new(boundaries: &'a SectionBoundaries) -> Self {
        Self {
            boundaries,
            active: None,
        }
    }

    /// Currently active table kind, if any.
    pub fn active(&self) -> Option<TableKind> {
        self.active
    }

    /// Advances the machine over one page and reports what to extract from
    /// it, if anything. Pages are ASCII report text, so uppercase search
    /// offsets are valid offsets into the original text.
    pub fn observe_page(&mut self, page_text: &str) -> Option<PageSection> {
        let upper = page_text.to_uppercase();

        // A header phrase on this page activates its kind regardless of the
        // previous state.
        for kind in TableKind::ALL {
            let header = kind.header_phrase();
            if let Some(start) = upper.find(header) {
                let end = self.section_end(&upper, kind, start + header.len());

                self.active = Some(kind);
                // The section may end on its own header page.
                if self.terminator_hit(&upper, kind) && !self.exception_present(&upper, kind) {
                    self.active = None;
                }

                tracing::debug!(table = %kind, "section header matched");
                return Some(PageSection {
                    kind,
                    text_range: start..end.min(page_text.len()),
                });
            }
        }

        let kind = self.active?;

        if self.terminator_hit(&upper, kind) && !self.exception_present(&upper, kind) {
            tracing::debug!(table = %kind, "section terminator matched");
            self.active = None;
            return None;
        }

        Some(PageSection {
            kind,
            text_range: 0..page_text.len(),
        })
    }

    /// End of the header-page section text: nearest terminator occurrence
    /// after the header, or the end of the page.
    fn section_end(&self, upper: &str, kind: TableKind, after: usize) -> usize {
        let rule = self.boundaries.rule(kind);
        let mut end = upper.len();
        for terminator in &rule.terminators {
            if let Some(idx) = upper[after..].find(terminator.as_str()) {
                end = end.min(after + idx);
            }
        }
        end
    }

    fn terminator_hit(&self, upper: &str, kind: TableKind) -> bool {
        self.boundaries
            .rule(kind)
            .terminators
            .iter()
            .any(|t| upper.contains(t.as_str()))
    }

    fn exception_present(&self, upper: &str, kind: TableKind) -> bool {
        self.boundaries
            .rule(kind)
            .exception_markers
            .iter()
            .any(|m| upper.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries() -> SectionBoundaries {
        SectionBoundaries::default()
    }

    #[test]
    fn test_header_activates_and_bounds_section() {
        let b = boundaries();
        let mut locator = TableLocator::new(&b);
        let page = "intro Harmonic Voltage Full Time Range data rows here SUMMARY trailer";
        let section = locator.observe_page(page).unwrap();
        assert_eq!(section.kind, TableKind::VoltageFullRange);
        let span = &page[section.text_range];
        assert!(span.contains("data rows here"));
        assert!(!span.contains("SUMMARY"));
        // Terminator on the same page closes the section.
        assert_eq!(locator.active(), None);
    }

    #[test]
    fn test_section_spans_pages_until_terminator() {
        let b = boundaries();
        let mut locator = TableLocator::new(&b);
        assert!(locator
            .observe_page("Harmonic Current Full Time Range 2 95 2.0 ...")
            .is_some());
        assert_eq!(locator.active(), Some(TableKind::CurrentFullRange));

        let continuation = locator.observe_page("more rows 17 95 1.5 1.1 1.0 0.9").unwrap();
        assert_eq!(continuation.kind, TableKind::CurrentFullRange);
        assert_eq!(continuation.text_range, 0.."more rows 17 95 1.5 1.1 1.0 0.9".len());

        assert!(locator.observe_page("TRANSIENT section begins").is_none());
        assert_eq!(locator.active(), None);
    }

    #[test]
    fn test_harmonic_5_marker_does_not_terminate_current_daily() {
        let b = boundaries();
        let mut locator = TableLocator::new(&b);
        locator.observe_page("Harmonic Current Daily 2 95 4.0 ...");
        assert_eq!(locator.active(), Some(TableKind::CurrentDaily));

        // Genuine terminator plus the colliding marker: stays active and the
        // page is still extracted.
        let page = "HARMONIC 5: trend graph TDD DAILY follows";
        assert!(locator.observe_page(page).is_some());
        assert_eq!(locator.active(), Some(TableKind::CurrentDaily));

        // Without the marker the same terminator closes the section.
        assert!(locator.observe_page("TDD DAILY follows").is_none());
        assert_eq!(locator.active(), None);
    }

    #[test]
    fn test_idle_pages_yield_nothing() {
        let b = boundaries();
        let mut locator = TableLocator::new(&b);
        assert!(locator.observe_page("page without any known header").is_none());
    }
}
