use crate::error::ExportError;
use crate::models::AnalysisRecord;
use crate::services::report::classify::{classify, Scale, ScoreBand};
use crate::services::report::extract::{extract, web_vital_score, WEB_VITAL_METRICS};
use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::{HashMap, HashSet};

// A4, points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
// Bottom strip reserved for the footer stamp
const FOOTER_AREA: f32 = 40.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

const DARK: (f32, f32, f32) = (0.13, 0.16, 0.19);
const GRAY: (f32, f32, f32) = (0.45, 0.5, 0.55);
const LIGHT: (f32, f32, f32) = (0.85, 0.87, 0.89);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);

const BOX_GAP: f32 = 12.0;
const BOX_HEIGHT: f32 = 44.0;
// Box row plus its label line underneath
const BOX_BLOCK_HEIGHT: f32 = BOX_HEIGHT + 18.0;
const TABLE_ROW_HEIGHT: f32 = 16.0;

// Page-by-page op lists with a vertical cursor. Blocks are only drawn after
// `ensure_space`, so no score-box row or table row straddles a page break.
struct PageComposer {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl PageComposer {
    fn new() -> Self {
        PageComposer {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN + FOOTER_AREA {
            self.break_page();
        }
    }

    fn advance(&mut self, height: f32) {
        self.cursor -= height;
    }

    // Rough Helvetica advance; exact kerning is not worth carrying here
    fn text_width(size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn text(&mut self, x: f32, y: f32, font: &str, size: f32, color: (f32, f32, f32), text: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current.push(Operation::new(
            "Tf",
            vec![font.into(), Object::Real(size)],
        ));
        self.current.push(Operation::new(
            "rg",
            vec![
                Object::Real(color.0),
                Object::Real(color.1),
                Object::Real(color.2),
            ],
        ));
        self.current
            .push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        self.current
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.current.push(Operation::new("ET", vec![]));
    }

    fn text_centered(
        &mut self,
        center_x: f32,
        y: f32,
        font: &str,
        size: f32,
        color: (f32, f32, f32),
        text: &str,
    ) {
        let x = center_x - Self::text_width(size, text) / 2.0;
        self.text(x, y, font, size, color, text);
    }

    // Draws a left-aligned line at the cursor and advances past it
    fn text_line(&mut self, font: &str, size: f32, color: (f32, f32, f32), text: &str) {
        self.ensure_space(size * 1.5);
        self.text(MARGIN, self.cursor - size, font, size, color, text);
        self.advance(size * 1.5);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
        self.current.push(Operation::new(
            "rg",
            vec![
                Object::Real(color.0),
                Object::Real(color.1),
                Object::Real(color.2),
            ],
        ));
        self.current.push(Operation::new(
            "re",
            vec![
                Object::Real(x),
                Object::Real(y),
                Object::Real(w),
                Object::Real(h),
            ],
        ));
        self.current.push(Operation::new("f", vec![]));
    }

    fn h_rule(&mut self, y: f32, color: (f32, f32, f32), width: f32) {
        self.current.push(Operation::new(
            "RG",
            vec![
                Object::Real(color.0),
                Object::Real(color.1),
                Object::Real(color.2),
            ],
        ));
        self.current
            .push(Operation::new("w", vec![Object::Real(width)]));
        self.current.push(Operation::new(
            "m",
            vec![Object::Real(MARGIN), Object::Real(y)],
        ));
        self.current.push(Operation::new(
            "l",
            vec![Object::Real(PAGE_WIDTH - MARGIN), Object::Real(y)],
        ));
        self.current.push(Operation::new("S", vec![]));
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.current);
        self.pages
    }
}

// Builds the complete paginated report in one call. Any assembly failure
// fails the whole export; a truncated byte stream is never returned.
pub fn build_pdf(records: &[AnalysisRecord], report_title: &str) -> Result<Vec<u8>, ExportError> {
    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut page = PageComposer::new();
    draw_header(&mut page, report_title, &generated_at);
    draw_summary(&mut page, records);
    page.break_page();
    draw_details(&mut page, records);

    let mut pages = page.finish();
    stamp_footers(&mut pages, &generated_at);
    assemble(pages)
}

fn draw_header(page: &mut PageComposer, report_title: &str, generated_at: &str) {
    page.text_line(FONT_BOLD, 22.0, DARK, "Website Performance Report");
    page.advance(4.0);
    page.text_line(FONT_REGULAR, 13.0, GRAY, report_title);
    page.text_line(
        FONT_REGULAR,
        9.0,
        GRAY,
        &format!("Generated: {generated_at}"),
    );
    page.advance(4.0);
    page.h_rule(page.cursor, LIGHT, 1.0);
    page.advance(18.0);
}

fn draw_summary(page: &mut PageComposer, records: &[AnalysisRecord]) {
    let distinct_urls: HashSet<&str> = records.iter().map(|r| r.url.as_str()).collect();

    page.text_line(FONT_BOLD, 15.0, DARK, "Summary");
    page.advance(2.0);
    page.text_line(
        FONT_REGULAR,
        10.0,
        DARK,
        &format!("URLs tested: {}", distinct_urls.len()),
    );
    page.text_line(
        FONT_REGULAR,
        10.0,
        DARK,
        &format!("Total test runs: {}", records.len()),
    );
    page.advance(6.0);

    if !records.iter().any(|r| r.raw_analysis.is_some()) {
        return;
    }

    let averages = [
        ("Performance", average_percent(records, |s| s.performance)),
        (
            "Accessibility",
            average_percent(records, |s| s.accessibility),
        ),
        (
            "Best Practices",
            average_percent(records, |s| s.best_practices),
        ),
        ("SEO", average_percent(records, |s| s.seo)),
    ];
    draw_score_boxes(page, &averages);
}

// Mean over records that carry the category, as a rounded percentage.
// Absent categories contribute nothing rather than dragging the mean down.
fn average_percent(
    records: &[AnalysisRecord],
    pick: impl Fn(&crate::models::CategoryScores) -> Option<f64>,
) -> Option<u32> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.raw_analysis.as_ref())
        .filter_map(|raw| pick(&raw.category_scores))
        .collect();
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 100.0).round() as u32)
}

// One atomic row of four colored score boxes with labels underneath
fn draw_score_boxes(page: &mut PageComposer, scores: &[(&str, Option<u32>)]) {
    page.ensure_space(BOX_BLOCK_HEIGHT);
    let box_width = (CONTENT_WIDTH - 3.0 * BOX_GAP) / 4.0;
    let top = page.cursor;

    for (i, (label, score)) in scores.iter().enumerate() {
        let x = MARGIN + i as f32 * (box_width + BOX_GAP);
        let center = x + box_width / 2.0;
        match score {
            Some(value) => {
                let band = classify(*value as f64, Scale::Percent);
                page.fill_rect(x, top - BOX_HEIGHT, box_width, BOX_HEIGHT, band.rgb());
                page.text_centered(
                    center,
                    top - BOX_HEIGHT / 2.0 - 6.0,
                    FONT_BOLD,
                    17.0,
                    WHITE,
                    &value.to_string(),
                );
            }
            None => {
                page.fill_rect(x, top - BOX_HEIGHT, box_width, BOX_HEIGHT, LIGHT);
                page.text_centered(
                    center,
                    top - BOX_HEIGHT / 2.0 - 6.0,
                    FONT_BOLD,
                    13.0,
                    GRAY,
                    "N/A",
                );
            }
        }
        page.text_centered(center, top - BOX_HEIGHT - 12.0, FONT_REGULAR, 8.0, GRAY, label);
    }
    page.advance(BOX_BLOCK_HEIGHT);
}

fn draw_details(page: &mut PageComposer, records: &[AnalysisRecord]) {
    // Group by URL in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&AnalysisRecord>> = HashMap::new();
    for record in records {
        let url = record.url.as_str();
        if !groups.contains_key(url) {
            order.push(url);
        }
        groups.entry(url).or_default().push(record);
    }

    page.text_line(FONT_BOLD, 15.0, DARK, "Detailed Results");
    page.advance(6.0);

    for url in order {
        page.ensure_space(40.0);
        page.text_line(FONT_BOLD, 12.0, DARK, url);
        for record in &groups[url] {
            draw_record(page, record);
        }
        page.advance(8.0);
    }
}

fn draw_record(page: &mut PageComposer, record: &AnalysisRecord) {
    page.text_line(
        FONT_REGULAR,
        10.0,
        GRAY,
        &format!("Strategy: {}", record.strategy.label()),
    );

    if let Some(message) = &record.error {
        page.text_line(
            FONT_REGULAR,
            10.0,
            ScoreBand::Poor.rgb(),
            &format!("Error: {message}"),
        );
        return;
    }
    if record.raw_analysis.is_none() {
        page.text_line(FONT_REGULAR, 10.0, GRAY, "No valid data available");
        return;
    }

    let metrics = extract(record);
    let boxes = [
        ("Performance", Some(metrics.scores.performance_or_zero())),
        (
            "Accessibility",
            Some(metrics.scores.accessibility_or_zero()),
        ),
        (
            "Best Practices",
            Some(metrics.scores.best_practices_or_zero()),
        ),
        ("SEO", Some(metrics.scores.seo_or_zero())),
    ];
    draw_score_boxes(page, &boxes);
    page.advance(4.0);
    draw_vitals_table(page, record);
    page.advance(6.0);
}

fn draw_vitals_table(page: &mut PageComposer, record: &AnalysisRecord) {
    let value_x = MARGIN + 300.0;

    page.ensure_space(TABLE_ROW_HEIGHT);
    page.text(MARGIN, page.cursor - 9.0, FONT_BOLD, 9.0, DARK, "Metric");
    page.text(value_x, page.cursor - 9.0, FONT_BOLD, 9.0, DARK, "Value");
    page.h_rule(page.cursor - TABLE_ROW_HEIGHT + 3.0, GRAY, 0.75);
    page.advance(TABLE_ROW_HEIGHT);

    for (metric_id, name) in WEB_VITAL_METRICS {
        let display = record
            .raw_analysis
            .as_ref()
            .and_then(|raw| raw.audits.get(metric_id))
            .and_then(|audit| audit.display_value.clone())
            .unwrap_or_else(|| "N/A".to_string());
        let color = match web_vital_score(record, metric_id) {
            Some(score) => classify(score, Scale::Fraction).rgb(),
            None => GRAY,
        };

        page.ensure_space(TABLE_ROW_HEIGHT);
        page.text(MARGIN, page.cursor - 9.0, FONT_REGULAR, 9.0, DARK, name);
        page.text(value_x, page.cursor - 9.0, FONT_REGULAR, 9.0, color, &display);
        page.h_rule(page.cursor - TABLE_ROW_HEIGHT + 3.0, LIGHT, 0.5);
        page.advance(TABLE_ROW_HEIGHT);
    }
}

// Stamped after layout, when the total page count is known
fn stamp_footers(pages: &mut [Vec<Operation>], generated_at: &str) {
    let total = pages.len();
    for (index, ops) in pages.iter_mut().enumerate() {
        let mut footer = PageComposer::new();
        footer.current = std::mem::take(ops);
        footer.text_centered(
            PAGE_WIDTH / 2.0,
            30.0,
            FONT_REGULAR,
            8.0,
            GRAY,
            &format!("Page {} of {}", index + 1, total),
        );
        footer.text_centered(
            PAGE_WIDTH / 2.0,
            20.0,
            FONT_REGULAR,
            7.0,
            GRAY,
            &format!("Generated {generated_at}"),
        );
        *ops = footer.current;
    }
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    });

    let page_count = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for operations in pages {
        let content = Content { operations };
        // Streams stay uncompressed so the output remains inspectable
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}
