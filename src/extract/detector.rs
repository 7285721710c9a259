//! Table detection over positioned page text.
//!
//! Rows come from clustering span Y positions. Column boundaries come from
//! drawn vertical rulings when the page has a grid, otherwise from left
//! edges that repeat across rows (the stream-mode strategy). Detection is
//! layout-based; cell content is never inspected.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::spans::{PageContent, TextSpan, VerticalRuling};
use crate::models::Row;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 10.0,
        }
    }
}

/// Spans grouped onto one baseline.
#[derive(Debug, Clone)]
struct RowCluster {
    y: f32,
    spans: Vec<TextSpan>,
}

/// Detects at most one table per page.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Single detection pass over one page.
    ///
    /// Returns the first table found, already shaped into cell rows in
    /// top-to-bottom order, or `None` when the page has no table.
    pub fn detect(&self, page: &PageContent) -> Option<Vec<Row>> {
        if page.spans.len() < self.config.min_rows * self.config.min_columns {
            return None;
        }

        let rows = self.group_into_rows(&page.spans);
        if rows.len() < self.config.min_rows {
            return None;
        }

        // Ruled grid first: the drawn boundaries bound both the columns and
        // the vertical extent of the table.
        if let Some((columns, (y0, y1))) = self.ruled_columns(&page.rulings) {
            let grid_rows: Vec<RowCluster> = rows
                .iter()
                .filter(|r| r.y >= y0 - 2.0 && r.y <= y1 + 2.0)
                .cloned()
                .collect();
            if grid_rows.len() >= self.config.min_rows {
                debug!(
                    columns = columns.len(),
                    rows = grid_rows.len(),
                    "Detected ruled table"
                );
                return Some(self.assemble_cells(&grid_rows, &columns));
            }
            // A grid without enough text falls through to alignment.
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            return None;
        }

        let (start, end) = self.find_table_region(&rows, &columns)?;
        debug!(
            columns = columns.len(),
            rows = end - start + 1,
            "Detected aligned table"
        );
        Some(self.assemble_cells(&rows[start..=end], &columns))
    }

    /// Group spans into rows by Y position, top of page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<RowCluster> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<RowCluster> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let tolerance = (span.font_size * self.config.y_tolerance_factor).max(2.0);
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(Self::close_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(Self::close_row(current));
        }

        rows
    }

    fn close_row(mut spans: Vec<TextSpan>) -> RowCluster {
        let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        RowCluster { y, spans }
    }

    /// Column boundaries from drawn vertical rulings, plus the vertical
    /// extent the grid covers. `None` when the page has no usable grid.
    fn ruled_columns(&self, rulings: &[VerticalRuling]) -> Option<(Vec<f32>, (f32, f32))> {
        if rulings.is_empty() {
            return None;
        }

        let mut xs: Vec<f32> = rulings.iter().map(|r| r.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut boundaries: Vec<f32> = Vec::new();
        for x in xs {
            match boundaries.last() {
                Some(&last) if x - last < 1.0 => {}
                _ => boundaries.push(x),
            }
        }
        // N columns need N+1 boundaries.
        if boundaries.len() < self.config.min_columns + 1 {
            return None;
        }

        let y0 = rulings.iter().map(|r| r.y0).fold(f32::MAX, f32::min);
        let y1 = rulings.iter().map(|r| r.y1).fold(f32::MIN, f32::max);
        boundaries.pop();
        Some((boundaries, (y0, y1)))
    }

    /// Detect column left edges that repeat across rows.
    fn detect_columns(&self, rows: &[RowCluster]) -> Vec<f32> {
        const BUCKET: f32 = 5.0;

        let multi: Vec<&RowCluster> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let sample: Vec<&RowCluster> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &sample {
            // Count each bucket once per row.
            let mut seen: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                seen.insert((span.x / BUCKET).round() as i32);
            }
            for bucket in seen {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((sample.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// First contiguous run of rows with good column alignment.
    fn find_table_region(&self, rows: &[RowCluster], columns: &[f32]) -> Option<(usize, usize)> {
        let mut start: Option<usize> = None;
        let mut run_len = 0;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                if start.is_none() {
                    start = Some(i);
                }
                run_len += 1;
            } else {
                if let Some(s) = start {
                    if run_len >= self.config.min_rows {
                        return Some((s, i - 1));
                    }
                }
                start = None;
                run_len = 0;
            }
        }

        match start {
            Some(s) if run_len >= self.config.min_rows => Some((s, rows.len() - 1)),
            _ => None,
        }
    }

    /// Fraction of a row's spans sitting on a detected column edge.
    fn alignment_score(&self, row: &RowCluster, columns: &[f32]) -> f32 {
        const TOLERANCE: f32 = 5.0;
        if row.spans.is_empty() {
            return 0.0;
        }
        let aligned = row
            .spans
            .iter()
            .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= TOLERANCE))
            .count();
        aligned as f32 / row.spans.len() as f32
    }

    /// Shape row clusters into cell rows; a column with no span yields `None`.
    fn assemble_cells(&self, rows: &[RowCluster], columns: &[f32]) -> Vec<Row> {
        rows.iter()
            .map(|row| {
                let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
                for span in &row.spans {
                    let idx = column_for_span(span.x, columns);
                    cells[idx].push(span.text.as_str());
                }
                cells
                    .into_iter()
                    .map(|parts| {
                        if parts.is_empty() {
                            None
                        } else {
                            Some(parts.join(" "))
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Column index for a span's left edge, with tolerance for spans starting
/// slightly before their column.
fn column_for_span(x: f32, columns: &[f32]) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(f32::INFINITY);
        if x >= start - 10.0 && x < end - 10.0 {
            return i;
        }
    }

    // No interval matched; fall back to the nearest column start.
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, &start) in columns.iter().enumerate() {
        let dist = (x - start).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}
