// Terminal table output for a StatusReport
use ghstatus_core::{Bucket, StatusItem, StatusReport};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DEFAULT_WIDTH: usize = 80;
pub const MAX_ROWS: usize = 5;
pub const EMPTY_SECTION: &str = "Nothing here ^_^";

const DIVIDER: &str = " │ ";

/// Sections shown side by side, then the one that gets the full width
const PAIRED_ROWS: [(Bucket, Bucket); 2] = [
    (Bucket::AssignedIssues, Bucket::AssignedPrs),
    (Bucket::ReviewRequests, Bucket::Mentions),
];

pub struct Renderer {
    width: usize,
    max_rows: usize,
}

impl Renderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(DIVIDER.width() + 2),
            max_rows: MAX_ROWS,
        }
    }

    /// Size to the current terminal, or 80 columns when there isn't one
    pub fn for_terminal() -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(width)
    }

    pub fn render(&self, report: &StatusReport) -> String {
        let mut output = String::new();

        if !report.login.is_empty() {
            output.push_str(&fit(&format!("Relevant activity for @{}", report.login), self.width));
            output.push_str("\n\n");
        }

        let column = (self.width - DIVIDER.width()) / 2;

        for (left, right) in PAIRED_ROWS {
            let left = self.section(left, report.bucket(left), column);
            let right = self.section(right, report.bucket(right), column);

            for i in 0..left.len().max(right.len()) {
                let l = left.get(i).map(String::as_str).unwrap_or_default();
                let r = right.get(i).map(String::as_str).unwrap_or_default();
                let line = format!("{}{}{}", pad(l, column), DIVIDER, r);
                output.push_str(line.trim_end());
                output.push('\n');
            }
            output.push('\n');
        }

        for line in self.section(
            Bucket::RepoActivity,
            report.bucket(Bucket::RepoActivity),
            self.width,
        ) {
            output.push_str(&line);
            output.push('\n');
        }

        output
    }

    /// Title plus up to `max_rows` item lines, each fitted to `width`
    fn section(&self, bucket: Bucket, items: &[StatusItem], width: usize) -> Vec<String> {
        let mut lines = vec![fit(bucket.title(), width)];

        if items.is_empty() {
            lines.push(fit(EMPTY_SECTION, width));
            return lines;
        }

        lines.extend(
            items
                .iter()
                .take(self.max_rows)
                .map(|item| fit(&row(item), width)),
        );
        lines
    }
}

fn row(item: &StatusItem) -> String {
    if item.reason.is_empty() {
        format!("{}  {}", item.identifier, item.preview)
    } else {
        format!("{}  {}: {}", item.identifier, item.reason, item.preview)
    }
}

/// Cut `text` to at most `max` display columns, ending in `…` if cut
pub fn fit(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Right-pad with spaces to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}
