//! # Document Renderer
//!
//! One renderer for both invoices and quotations. Layout is a single
//! top-to-bottom pass over an A4 page with a moving cursor; when a block
//! does not fit, the page is closed and a new one is started.
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       INVOICE                        │  title
//! │  ┌──────┐                                            │
//! │  │ logo │  Company Name                              │  header block
//! │  └──────┘  tagline / address                         │
//! │                                  Invoice #: DC0001   │  metadata
//! │                                  Date: 31/08/2025    │
//! │  Invoice to:                                         │
//! │  Customer Name                                       │  party block
//! │  address lines                                       │
//! │  ┌────┬──────────────────────┬─────┬───────┬───────┐ │
//! │  │ No │ Item Description     │ Qty │ Price │ Total │ │  header row repeats
//! │  ├────┼──────────────────────┼─────┼───────┼───────┤ │  on every page
//! │  │ 1  │ wrapped description  │  1  │  ...  │  ...  │ │
//! │  └────┴──────────────────────┴─────┴───────┴───────┘ │
//! │                              ┌──────────┬─────────┐  │
//! │                              │ Sub Total│   ...   │  │  totals block
//! │                              │ Tax      │   ...   │  │
//! │                              │ TOTAL         ...  │  │
//! │                              └────────────────────┘  │
//! │  Amount in Words: ...                                │
//! │  Terms and Conditions:                               │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Table rows are never split. A row that does not fit moves to the next
//! page, which starts with the header row again.

use pdf_writer::{Finish, Pdf, Rect, Ref, TextStr};
use tracing::{debug, info, warn};

use billforge_core::validation::validate_document;
use billforge_core::{to_words, DocType, Document, LineItem};

use crate::canvas::{Align, PageCanvas, BOLD_FONT, REGULAR_FONT, WATERMARK_STATE};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::fonts::{FontSet, FontWeight, TextMeasure};
use crate::logo::{Logo, LOGO_BOX, LOGO_NAME};
use crate::theme::{Color, ColorTheme};
use crate::wrap::{wrap_paragraphs, wrap_text};

// =============================================================================
// Page Geometry
// =============================================================================

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 841.89;
/// 20 mm.
pub const MARGIN: f32 = 56.69;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// No, Description, Qty, Price, Total
const COLUMN_WIDTHS: [f32; 5] = [30.0, 220.0, 40.0, 70.0, 90.0];
const COLUMN_ALIGN: [Align; 5] = [
    Align::Center,
    Align::Left,
    Align::Center,
    Align::Right,
    Align::Right,
];
const TABLE_HEADINGS: [&str; 5] = ["No", "Item Description", "Qty", "Price", "Total"];

const TOTALS_WIDTHS: [f32; 2] = [120.0, 90.0];

const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_Y: f32 = 3.0;
const OUTER_LINE: f32 = 1.0;
const INNER_LINE: f32 = 0.5;

const LOGO_GAP: f32 = 10.0;
const WATERMARK_BOX: f32 = 300.0;
const WATERMARK_ALPHA: f32 = 0.1;

// =============================================================================
// Text Styles
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    weight: FontWeight,
    size: f32,
    leading: f32,
}

impl TextStyle {
    const fn new(weight: FontWeight, size: f32, leading: f32) -> Self {
        TextStyle {
            weight,
            size,
            leading,
        }
    }
}

const TITLE: TextStyle = TextStyle::new(FontWeight::Bold, 18.0, 22.0);
const COMPANY_NAME: TextStyle = TextStyle::new(FontWeight::Bold, 20.0, 24.0);
const TAGLINE: TextStyle = TextStyle::new(FontWeight::Bold, 12.0, 14.0);
const DOC_INFO: TextStyle = TextStyle::new(FontWeight::Regular, 10.0, 12.0);
const PARTY_HEADING: TextStyle = TextStyle::new(FontWeight::Bold, 11.0, 14.0);
const PARTY_TEXT: TextStyle = TextStyle::new(FontWeight::Regular, 11.0, 14.0);
const NORMAL: TextStyle = TextStyle::new(FontWeight::Regular, 10.0, 12.0);
const BOLD: TextStyle = TextStyle::new(FontWeight::Bold, 10.0, 12.0);
const TERMS: TextStyle = TextStyle::new(FontWeight::Regular, 10.0, 13.0);
const TERMS_HEADING: TextStyle = TextStyle::new(FontWeight::Bold, 10.0, 13.0);

// =============================================================================
// Renderer
// =============================================================================

/// Renders documents into PDF bytes.
///
/// Fonts are resolved before construction and never re-resolved; the
/// renderer holds no mutable state, so one instance serves every call.
///
/// ## Example
/// ```rust,ignore
/// let renderer = DocumentRenderer::new(FontSet::resolve(regular, bold), config);
/// let bytes = renderer.render(&document, state.logo.as_ref())?;
/// std::fs::write(output_file_name(document.doc_type, "DC0001"), bytes)?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    fonts: FontSet,
    config: RenderConfig,
}

impl DocumentRenderer {
    pub fn new(fonts: FontSet, config: RenderConfig) -> Self {
        DocumentRenderer { fonts, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Validates `document` and lays it out.
    ///
    /// ## Errors
    /// `RenderError::Validation` if the document is rejected. Nothing is
    /// laid out in that case.
    pub fn render(&self, document: &Document, logo: Option<&Logo>) -> RenderResult<Vec<u8>> {
        validate_document(document)?;

        if document.doc_type != self.config.doc_type {
            warn!(
                configured = %self.config.doc_type,
                document = %document.doc_type,
                "Render config prepared for another document type, labels follow the document"
            );
        }

        let pages = self.layout(document, logo);
        let bytes = self.assemble(document, logo, &pages);

        info!(
            doc_type = %document.doc_type,
            number = %document.header.doc_number,
            pages = pages.len(),
            bytes = bytes.len(),
            "Document rendered"
        );
        Ok(bytes)
    }

    /// Produces one content stream per page.
    pub(crate) fn layout(&self, document: &Document, logo: Option<&Logo>) -> Vec<Vec<u8>> {
        let watermark = match (self.config.show_watermark, logo) {
            (true, Some(logo)) => Some(logo.fit(WATERMARK_BOX)),
            (true, None) => {
                debug!("Watermark requested but no logo is loaded");
                None
            }
            (false, _) => None,
        };

        let mut layout = Layout::new(&self.fonts, self.config.theme, watermark);
        let label = document.doc_type.label();
        let header = &document.header;

        // 1. Title
        layout.line(
            document.doc_type.title(),
            PAGE_WIDTH / 2.0,
            Align::Center,
            TITLE,
            self.config.theme.primary,
        );
        layout.space(10.0);

        // 2. Company block
        layout.company_block(
            &header.company_name,
            self.config.tagline.as_deref(),
            &header.company_address,
            logo,
        );
        layout.space(12.0);

        // 3. Metadata
        let right = PAGE_WIDTH - MARGIN;
        let text = self.config.theme.text;
        layout.line(
            &format!("{label} #: {}", header.doc_number),
            right,
            Align::Right,
            DOC_INFO,
            text,
        );
        layout.line(
            &format!("Date: {}", header.date_display()),
            right,
            Align::Right,
            DOC_INFO,
            text,
        );
        layout.space(12.0);

        // 4. Party block
        layout.line(&format!("{label} to:"), MARGIN, Align::Left, PARTY_HEADING, text);
        layout.paragraphs(&header.customer_name, MARGIN, CONTENT_WIDTH, PARTY_HEADING);
        layout.paragraphs(&header.customer_address, MARGIN, CONTENT_WIDTH, PARTY_TEXT);
        layout.space(16.0);

        // 5. Items
        layout.item_table(&document.items);
        layout.space(12.0);

        // 6. Totals
        layout.totals_table(&totals_rows(document));
        layout.space(12.0);

        // 7. Amount in words
        let totals = document.totals();
        layout.amount_in_words(&to_words(totals.grand_total.amount()));
        layout.space(16.0);

        // 8. Terms
        if let Some(terms) = self
            .config
            .terms_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            if self.config.terms_on_new_page {
                layout.new_page();
            }
            layout.line("Terms and Conditions:", MARGIN, Align::Left, TERMS_HEADING, text);
            layout.paragraphs(terms, MARGIN, CONTENT_WIDTH, TERMS);
        }

        layout.finish()
    }

    fn assemble(&self, document: &Document, logo: Option<&Logo>, pages: &[Vec<u8>]) -> Vec<u8> {
        let mut next_id = 1;
        let mut alloc = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let page_tree_id = alloc();
        let info_id = alloc();
        let regular_id = alloc();
        let bold_id = alloc();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);

        let title = format!(
            "{} {}",
            document.doc_type.label(),
            document.header.doc_number
        );
        pdf.document_info(info_id)
            .title(TextStr(&title))
            .author(TextStr(&document.header.company_name))
            .creator(TextStr("Billforge"));

        self.fonts.regular().write(&mut pdf, regular_id, &mut alloc);
        self.fonts.bold().write(&mut pdf, bold_id, &mut alloc);

        let image_id = logo.map(|logo| {
            let id = alloc();
            logo.write(&mut pdf, id, &mut alloc);
            id
        });

        let watermark_state = (self.config.show_watermark && image_id.is_some()).then(|| {
            let id = alloc();
            pdf.ext_graphics(id)
                .non_stroking_alpha(WATERMARK_ALPHA)
                .stroking_alpha(WATERMARK_ALPHA);
            id
        });

        let mut page_ids = Vec::with_capacity(pages.len());
        for content in pages {
            let page_id = alloc();
            let content_id = alloc();
            pdf.stream(content_id, content);

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(page_tree_id);
            page.contents(content_id);

            let mut resources = page.resources();
            resources
                .fonts()
                .pair(REGULAR_FONT, regular_id)
                .pair(BOLD_FONT, bold_id);
            if let Some(image_id) = image_id {
                resources.x_objects().pair(LOGO_NAME, image_id);
            }
            if let Some(state_id) = watermark_state {
                resources.ext_g_states().pair(WATERMARK_STATE, state_id);
            }
            resources.finish();
            page.finish();

            page_ids.push(page_id);
        }

        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        pdf.finish()
    }
}

/// Download name for a rendered document, e.g. `Invoice_DC0001.pdf`.
///
/// Characters that are unsafe in file names become `_`.
pub fn output_file_name(doc_type: DocType, number: &str) -> String {
    let safe: String = number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}.pdf", doc_type.label(), safe)
}

// =============================================================================
// Totals Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TotalsRow {
    pub label: String,
    pub amount: String,
    pub bold: bool,
}

impl TotalsRow {
    fn new(label: impl Into<String>, amount: String) -> Self {
        TotalsRow {
            label: label.into(),
            amount,
            bold: false,
        }
    }
}

/// Rows of the totals block. Tax-rate and discount rows appear only when
/// they are non-zero; Sub Total, Tax and TOTAL are always present.
pub(crate) fn totals_rows(document: &Document) -> Vec<TotalsRow> {
    let header = &document.header;
    let totals = document.totals();

    let mut rows = vec![TotalsRow::new(
        "Sub Total",
        totals.subtotal.format_grouped(),
    )];
    if !header.cgst_rate.is_zero() {
        rows.push(TotalsRow::new(
            format!("CGST @ {}%", header.cgst_rate),
            totals.cgst_amount.format_grouped(),
        ));
    }
    if !header.sgst_rate.is_zero() {
        rows.push(TotalsRow::new(
            format!("SGST @ {}%", header.sgst_rate),
            totals.sgst_amount.format_grouped(),
        ));
    }
    if totals.discount.is_positive() {
        rows.push(TotalsRow::new(
            "Discount",
            format!("- {}", totals.discount.format_grouped()),
        ));
    }
    rows.push(TotalsRow::new("Tax", totals.tax_total.format_grouped()));
    rows.push(TotalsRow {
        label: "TOTAL".to_string(),
        amount: totals.grand_total.format_grouped(),
        bold: true,
    });
    rows
}

// =============================================================================
// Layout Engine
// =============================================================================

struct Layout<'a> {
    fonts: &'a FontSet,
    theme: ColorTheme,
    watermark: Option<(f32, f32)>,
    pages: Vec<Vec<u8>>,
    canvas: PageCanvas<'a>,
    cursor: f32,
    /// Nothing drawn on the current page yet except the watermark.
    fresh: bool,
}

impl<'a> Layout<'a> {
    fn new(fonts: &'a FontSet, theme: ColorTheme, watermark: Option<(f32, f32)>) -> Self {
        let mut layout = Layout {
            fonts,
            theme,
            watermark,
            pages: Vec::new(),
            canvas: PageCanvas::new(fonts),
            cursor: PAGE_HEIGHT - MARGIN,
            fresh: true,
        };
        layout.paint_watermark();
        layout
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.pages.push(self.canvas.finish());
        self.pages
    }

    fn paint_watermark(&mut self) {
        if let Some((width, height)) = self.watermark {
            let x = (PAGE_WIDTH - width) / 2.0;
            let y = (PAGE_HEIGHT - height) / 2.0;
            self.canvas
                .translucent_image(WATERMARK_STATE, LOGO_NAME, x, y, width, height);
        }
    }

    /// Closes the current page unless nothing has been placed on it.
    fn new_page(&mut self) {
        if self.fresh {
            return;
        }
        let finished = std::mem::replace(&mut self.canvas, PageCanvas::new(self.fonts));
        self.pages.push(finished.finish());
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.fresh = true;
        self.paint_watermark();
        debug!(page = self.pages.len() + 1, "Started new page");
    }

    /// Starts a new page if `height` does not fit below the cursor.
    fn ensure(&mut self, height: f32) {
        if self.cursor - height < MARGIN && !self.fresh {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        if !self.fresh {
            self.cursor = (self.cursor - height).max(MARGIN);
        }
    }

    /// Baseline for a line whose box starts at `top`.
    fn baseline(&self, top: f32, style: TextStyle) -> f32 {
        let face = self.fonts.face(style.weight);
        let ascent = face.ascent() * style.size / 1000.0;
        let glyph_box = (face.ascent() - face.descent()) * style.size / 1000.0;
        top - (style.leading - glyph_box) / 2.0 - ascent
    }

    fn draw(&mut self, text: &str, x: f32, top: f32, align: Align, style: TextStyle, color: Color) {
        let baseline = self.baseline(top, style);
        self.canvas
            .text(text, x, baseline, align, style.weight, style.size, color);
        self.fresh = false;
    }

    /// One line of flowed text.
    fn line(&mut self, text: &str, x: f32, align: Align, style: TextStyle, color: Color) {
        self.ensure(style.leading);
        let top = self.cursor;
        self.draw(text, x, top, align, style, color);
        self.cursor -= style.leading;
    }

    /// Multi-line text; explicit line breaks kept, each line wrapped.
    fn paragraphs(&mut self, text: &str, x: f32, width: f32, style: TextStyle) {
        let fonts = self.fonts;
        for line in wrap_paragraphs(text, fonts.face(style.weight), style.size, width) {
            self.line(&line, x, Align::Left, style, self.theme.text);
        }
    }

    fn company_block(
        &mut self,
        company: &str,
        tagline: Option<&str>,
        address: &str,
        logo: Option<&Logo>,
    ) {
        let color = self.theme.text;
        let logo_size = logo.map(|logo| logo.fit(LOGO_BOX));
        let text_x = match logo_size {
            Some((width, _)) => MARGIN + width + LOGO_GAP,
            None => MARGIN,
        };
        let text_width = PAGE_WIDTH - MARGIN - text_x;

        let fonts = self.fonts;
        let styled = |text: &str, style: TextStyle| {
            wrap_paragraphs(text, fonts.face(style.weight), style.size, text_width)
                .into_iter()
                .map(move |line| (line, style))
        };
        let mut lines: Vec<(String, TextStyle)> = styled(company, COMPANY_NAME).collect();
        if let Some(tagline) = tagline {
            lines.extend(styled(tagline, TAGLINE));
        }
        lines.extend(styled(address, NORMAL));

        let Some((logo_width, logo_height)) = logo_size else {
            for (text, style) in lines {
                self.line(&text, MARGIN, Align::Left, style, color);
            }
            return;
        };

        // Logo and text side by side, both centred vertically in the row.
        let text_height: f32 = lines.iter().map(|(_, style)| style.leading).sum();
        let row_height = logo_height.max(text_height);
        self.ensure(row_height);

        let row_top = self.cursor;
        let logo_y = row_top - (row_height - logo_height) / 2.0 - logo_height;
        self.canvas
            .image(LOGO_NAME, MARGIN, logo_y, logo_width, logo_height);

        let mut top = row_top - (row_height - text_height) / 2.0;
        for (text, style) in lines {
            self.draw(&text, text_x, top, Align::Left, style, color);
            top -= style.leading;
        }
        self.fresh = false;
        self.cursor -= row_height;
    }

    // -------------------------------------------------------------------------
    // Items table
    // -------------------------------------------------------------------------

    fn item_table(&mut self, items: &[LineItem]) {
        let table_width: f32 = COLUMN_WIDTHS.iter().sum();
        let x0 = MARGIN + (CONTENT_WIDTH - table_width) / 2.0;
        let header_height = BOLD.leading + 2.0 * CELL_PAD_Y;
        let description_width = COLUMN_WIDTHS[1] - 2.0 * CELL_PAD_X;

        let rows: Vec<[Vec<String>; 5]> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                [
                    vec![(i + 1).to_string()],
                    wrap_text(
                        item.description(),
                        self.fonts.regular(),
                        NORMAL.size,
                        description_width,
                    ),
                    vec![item.quantity_display()],
                    vec![item.unit_price().format_grouped()],
                    vec![item.line_total().format_grouped()],
                ]
            })
            .collect();

        let first_row_height = rows.first().map_or(0.0, row_height);
        self.ensure(header_height + first_row_height);
        let mut segment_top = self.cursor;
        self.table_header(x0, header_height);

        for cells in &rows {
            let height = row_height(cells);
            if self.cursor - height < MARGIN {
                self.close_segment(x0, table_width, segment_top);
                self.new_page();
                segment_top = self.cursor;
                self.table_header(x0, header_height);
            }
            self.table_row(x0, cells, height);
        }

        self.close_segment(x0, table_width, segment_top);
    }

    fn table_header(&mut self, x0: f32, height: f32) {
        let top = self.cursor;
        let table_width: f32 = COLUMN_WIDTHS.iter().sum();
        self.canvas
            .fill_rect(x0, top - height, table_width, height, self.theme.primary);

        let mut x = x0;
        for ((heading, width), align) in TABLE_HEADINGS.iter().zip(COLUMN_WIDTHS).zip(COLUMN_ALIGN) {
            self.canvas
                .stroke_rect(x, top - height, width, height, INNER_LINE, self.theme.border);
            self.draw(
                heading,
                cell_anchor(x, width, align),
                top - CELL_PAD_Y,
                align,
                BOLD,
                Color::white(),
            );
            x += width;
        }
        self.cursor -= height;
    }

    fn table_row(&mut self, x0: f32, cells: &[Vec<String>; 5], height: f32) {
        let top = self.cursor;
        let mut x = x0;
        for ((lines, width), align) in cells.iter().zip(COLUMN_WIDTHS).zip(COLUMN_ALIGN) {
            self.canvas
                .stroke_rect(x, top - height, width, height, INNER_LINE, self.theme.border);

            let block = lines.len() as f32 * NORMAL.leading;
            let mut line_top = top - (height - block) / 2.0;
            for line in lines {
                self.draw(line, cell_anchor(x, width, align), line_top, align, NORMAL, self.theme.text);
                line_top -= NORMAL.leading;
            }
            x += width;
        }
        self.cursor -= height;
    }

    fn close_segment(&mut self, x0: f32, width: f32, top: f32) {
        let height = top - self.cursor;
        if height > 0.0 {
            self.canvas
                .stroke_rect(x0, self.cursor, width, height, OUTER_LINE, self.theme.border);
        }
    }

    // -------------------------------------------------------------------------
    // Totals and words
    // -------------------------------------------------------------------------

    fn totals_table(&mut self, rows: &[TotalsRow]) {
        let row_height = NORMAL.leading + 2.0 * CELL_PAD_Y;
        let width: f32 = TOTALS_WIDTHS.iter().sum();
        let x0 = PAGE_WIDTH - MARGIN - width;
        self.ensure(row_height * rows.len() as f32);

        let grid_top = self.cursor;
        let last = rows.len().saturating_sub(1);
        for (i, row) in rows.iter().enumerate() {
            let top = self.cursor;
            let style = if row.bold { BOLD } else { NORMAL };
            if i < last {
                self.canvas.line(
                    (x0 + TOTALS_WIDTHS[0], top),
                    (x0 + TOTALS_WIDTHS[0], top - row_height),
                    INNER_LINE,
                    self.theme.border,
                );
                if i + 1 < last {
                    self.canvas.line(
                        (x0, top - row_height),
                        (x0 + width, top - row_height),
                        INNER_LINE,
                        self.theme.border,
                    );
                }
            }
            self.draw(&row.label, x0 + CELL_PAD_X, top - CELL_PAD_Y, Align::Left, style, self.theme.text);
            self.draw(
                &row.amount,
                x0 + width - CELL_PAD_X,
                top - CELL_PAD_Y,
                Align::Right,
                style,
                self.theme.text,
            );
            self.cursor -= row_height;
        }

        // Outer box spans every row; the inner grid stops above TOTAL.
        let boxed_height = row_height * rows.len() as f32;
        if boxed_height > 0.0 {
            self.canvas.stroke_rect(
                x0,
                grid_top - boxed_height,
                width,
                boxed_height,
                OUTER_LINE,
                self.theme.border,
            );
        }
    }

    fn amount_in_words(&mut self, words: &str) {
        const PREFIX: &str = "Amount in Words: ";
        let prefix_width = self.fonts.bold().text_width(PREFIX, BOLD.size);
        let lines = wrap_text(words, self.fonts.regular(), NORMAL.size, CONTENT_WIDTH - prefix_width);

        for (i, line) in lines.iter().enumerate() {
            self.ensure(NORMAL.leading);
            let top = self.cursor;
            if i == 0 {
                self.draw(PREFIX, MARGIN, top, Align::Left, BOLD, self.theme.text);
            }
            self.draw(line, MARGIN + prefix_width, top, Align::Left, NORMAL, self.theme.text);
            self.cursor -= NORMAL.leading;
        }
    }
}

fn row_height(cells: &[Vec<String>; 5]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * NORMAL.leading + 2.0 * CELL_PAD_Y
}

fn cell_anchor(x: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left => x + CELL_PAD_X,
        Align::Center => x + width / 2.0,
        Align::Right => x + width - CELL_PAD_X,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::tests::png_bytes;
    use billforge_core::{DocumentHeader, Money, TaxRate};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn header(cgst: i64, sgst: i64, discount: i64) -> DocumentHeader {
        DocumentHeader {
            doc_number: "DC0001".to_string(),
            doc_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            company_name: "Data Center".to_string(),
            company_address: "Plot 7, MIDC\nSatara 415004".to_string(),
            customer_name: "The Secretary".to_string(),
            customer_address: "Rayat Shikshan Sanstha's\nMaharashtra, Satara 415002".to_string(),
            cgst_rate: TaxRate::from_percent(Decimal::from(cgst)),
            sgst_rate: TaxRate::from_percent(Decimal::from(sgst)),
            discount: Money::from_major_minor(discount, 0),
        }
    }

    fn item(desc: &str, qty: i64, price: i64) -> LineItem {
        LineItem::new(desc, Decimal::from(qty), Money::from_major_minor(price, 0))
    }

    fn sample(doc_type: DocType, items: Vec<LineItem>) -> Document {
        Document::new(doc_type, header(9, 9, 0), items)
    }

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(FontSet::builtin(), RenderConfig::default())
    }

    fn page_text(page: &[u8]) -> String {
        String::from_utf8_lossy(page).into_owned()
    }

    #[test]
    fn test_render_produces_pdf_with_company_name() {
        let doc = sample(DocType::Invoice, vec![item("A", 1, 100), item("B", 2, 50)]);
        let bytes = renderer().render(&doc, None).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Data Center) Tj"));
        assert!(text.contains("(INVOICE) Tj"));
        assert!(text.contains("(Invoice #: DC0001) Tj"));
        assert!(text.contains("(Date: 31/08/2025) Tj"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_quotation_labels() {
        let doc = sample(DocType::Quotation, vec![item("A", 1, 100)]);
        let pages = renderer().layout(&doc, None);
        let text = page_text(&pages[0]);
        assert!(text.contains("(QUOTATION) Tj"));
        assert!(text.contains("(Quotation to:) Tj"));
    }

    #[test]
    fn test_totals_and_words() {
        let doc = sample(DocType::Invoice, vec![item("A", 1, 100), item("B", 2, 50)]);
        let text = page_text(&renderer().layout(&doc, None)[0]);
        assert!(text.contains("(CGST @ 9%) Tj"));
        assert!(text.contains("(236.00) Tj"));
        assert!(text.contains("(Two Hundred Thirty Six Rupees Only) Tj"));
    }

    #[test]
    fn test_conditional_totals_rows() {
        let doc = Document::new(DocType::Invoice, header(0, 0, 0), vec![item("A", 1, 100)]);
        let labels: Vec<String> = totals_rows(&doc).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Sub Total", "Tax", "TOTAL"]);

        let doc = Document::new(DocType::Invoice, header(9, 0, 10), vec![item("A", 1, 100)]);
        let rows = totals_rows(&doc);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Sub Total", "CGST @ 9%", "Discount", "Tax", "TOTAL"]);
        assert_eq!(rows[2].amount, "- 10.00");
        assert_eq!(rows[4].amount, "99.00");
        assert!(rows[4].bold);
    }

    #[test]
    fn test_long_table_paginates_and_repeats_header() {
        let items: Vec<LineItem> = (0..120)
            .map(|i| item(&format!("Managed backup service tier {i}"), 1, 1500))
            .collect();
        let doc = sample(DocType::Invoice, items);
        let pages = renderer().layout(&doc, None);

        assert!(pages.len() > 1);
        for page in &pages[..pages.len() - 1] {
            assert!(page_text(page).contains("(Item Description) Tj"));
        }
        assert!(page_text(&pages[1]).contains("(Managed backup service tier"));
    }

    #[test]
    fn test_long_description_wraps_within_column() {
        let desc = "KVM 1 Hosting Server: 2 vCPU, 4 GB Memory, 50 GB SSD Disk Storage, \
                    Security and Backup, Technical Support";
        let doc = sample(DocType::Invoice, vec![item(desc, 1, 15158)]);
        let text = page_text(&renderer().layout(&doc, None)[0]);
        assert!(!text.contains(&format!("({desc}) Tj")));
        assert!(text.contains("(KVM 1 Hosting Server:"));
        assert!(text.contains("(15,158.00) Tj"));
    }

    #[test]
    fn test_terms_on_new_page() {
        let doc = sample(DocType::Quotation, vec![item("A", 1, 100)]);
        let config = RenderConfig::for_doc_type(DocType::Quotation).with_terms_on_new_page(true);
        let pages = DocumentRenderer::new(FontSet::builtin(), config).layout(&doc, None);
        assert_eq!(pages.len(), 2);
        assert!(page_text(&pages[1]).contains("(Terms and Conditions:) Tj"));
        assert!(!page_text(&pages[0]).contains("Terms and Conditions"));
    }

    #[test]
    fn test_terms_omitted() {
        let doc = sample(DocType::Invoice, vec![item("A", 1, 100)]);
        let config = RenderConfig::default().with_terms(None);
        let pages = DocumentRenderer::new(FontSet::builtin(), config).layout(&doc, None);
        assert!(!page_text(&pages[0]).contains("Terms and Conditions"));
    }

    #[test]
    fn test_logo_and_watermark() {
        let logo = Logo::from_bytes(&png_bytes(40, 20)).unwrap();
        let doc = sample(DocType::Invoice, vec![item("A", 1, 100)]);
        let config = RenderConfig::default()
            .with_watermark(true)
            .with_terms_on_new_page(true);
        let renderer = DocumentRenderer::new(FontSet::builtin(), config);

        let pages = renderer.layout(&doc, Some(&logo));
        assert_eq!(pages.len(), 2);
        for page in &pages {
            let text = page_text(page);
            assert!(text.contains("/Gs1 gs"));
        }
        // header logo plus watermark on the first page
        assert_eq!(page_text(&pages[0]).matches("/Im1 Do").count(), 2);

        let bytes = renderer.render(&doc, Some(&logo)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/SMask"));
        assert!(text.contains("/ExtGState"));
    }

    #[test]
    fn test_watermark_without_logo_is_skipped() {
        let doc = sample(DocType::Invoice, vec![item("A", 1, 100)]);
        let config = RenderConfig::default().with_watermark(true);
        let bytes = DocumentRenderer::new(FontSet::builtin(), config)
            .render(&doc, None)
            .unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("/Gs1"));
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        let mut doc = sample(DocType::Invoice, vec![item("A", 1, 100)]);
        doc.header.doc_number = "  ".to_string();
        assert!(renderer().render(&doc, None).is_err());

        let empty = sample(DocType::Invoice, vec![]);
        assert!(renderer().render(&empty, None).is_err());
    }

    /// Non-ASCII operands are written as hex strings.
    fn shows_hex(page: &[u8], encoded: &[u8]) -> bool {
        let hex: String = encoded.iter().map(|b| format!("{b:02X}")).collect();
        page_text(page).contains(&format!("<{hex}> Tj"))
    }

    #[test]
    fn test_latin1_text_with_builtin_fonts() {
        let mut doc = sample(DocType::Invoice, vec![item("Crème brûlée", 1, 100)]);
        doc.header.company_name = "Café Müller".to_string();
        doc.header.customer_name = "José Núñez".to_string();
        doc.header.customer_address = "Rayat Shikshan Sanstha’s".to_string();

        let pages = renderer().layout(&doc, None);
        let page = &pages[0];
        assert!(shows_hex(page, b"Caf\xE9 M\xFCller"));
        assert!(shows_hex(page, b"Jos\xE9 N\xFA\xF1ez"));
        assert!(shows_hex(page, b"Rayat Shikshan Sanstha\x92s"));
        assert!(shows_hex(page, b"Cr\xE8me br\xFBl\xE9e"));
        assert!(!page_text(page).contains("(Caf? M?ller) Tj"));
    }

    #[test]
    fn test_long_customer_name_wraps() {
        let mut doc = sample(DocType::Invoice, vec![item("A", 1, 100)]);
        let name = "The Principal, Yashwantrao Chavan Institute of Science and \
                    Rayat Shikshan Sanstha Central Administrative Office Satara";
        doc.header.customer_name = name.to_string();

        let fonts = FontSet::builtin();
        let size = PARTY_HEADING.size;
        assert!(fonts.bold().text_width(name, size) > CONTENT_WIDTH);

        let text = page_text(&renderer().layout(&doc, None)[0]);
        assert!(!text.contains(&format!("({name}) Tj")));
        for line in wrap_text(name, fonts.bold(), size, CONTENT_WIDTH) {
            assert!(text.contains(&format!("({line}) Tj")));
        }
    }

    #[test]
    fn test_totals_box_encloses_total_row() {
        // Sub Total, Tax, TOTAL: three 18 pt rows in a 210 pt wide box.
        let doc = Document::new(DocType::Invoice, header(0, 0, 0), vec![item("A", 1, 100)]);
        assert_eq!(totals_rows(&doc).len(), 3);

        let text = page_text(&renderer().layout(&doc, None)[0]);
        assert!(text.contains(" 210 54 re"));
        assert!(!text.contains(" 210 36 re"));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(DocType::Invoice, "DC0001"), "Invoice_DC0001.pdf");
        assert_eq!(
            output_file_name(DocType::Quotation, "Q/2025 07"),
            "Quotation_Q_2025_07.pdf"
        );
    }
}
