//! Text layout engine
//!
//! Converts a string into positioned glyph records. Handles word wrap,
//! kerning, letter spacing, horizontal alignment and multi-line metrics.
//!
//! # Layout Coordinate System
//!
//! - Pen space is y-down: the first line sits at `y = -height` and each
//!   following line is `line_height` further down (towards +y)
//! - Glyph x positions already include the line's alignment offset
//! - The 2D placement pass rotates the result half a turn around X so the
//!   block reads upright in a y-up scene

use super::{
    wrap_lines, AlignX, GlyphMeasure, GlyphResolver, LayoutError, LayoutOptions, LayoutResult, MeasureText,
    UNBOUNDED_WIDTH,
};
use crate::font::GlyphEntry;

/// One positioned glyph with its line, word and letter tallies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRecord {
    /// Pen-space position of the glyph origin
    pub position: [f32; 2],
    /// Glyph metrics (may be a synthesized whitespace glyph)
    pub glyph: GlyphEntry,
    /// Char index into the laid out text
    pub index: usize,
    /// Number of lines in the layout
    pub lines_total: usize,
    /// Line this glyph sits on
    pub line_index: usize,
    /// Letters on this line
    pub line_letters_total: usize,
    /// Letter index within the line
    pub line_letter_index: usize,
    /// Words on this line
    pub line_words_total: usize,
    /// Word index within the line
    pub line_word_index: usize,
    /// Words in the whole text
    pub words_total: usize,
    /// Word index within the whole text
    pub word_index: usize,
    /// Letters in the whole text
    pub letters_total: usize,
    /// Letter index within the whole text
    pub letter_index: usize,
}

/// Result of laying out one string
///
/// Owns its glyph sequence and aggregate metrics. Re-running
/// [`TextLayout::update`] replaces both wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    glyphs: Vec<GlyphRecord>,
    align_x: AlignX,
    width: f32,
    height: f32,
    descender: f32,
    ascender: f32,
    x_height: f32,
    baseline: f32,
    cap_height: f32,
    line_height: f32,
    lines_total: usize,
    letters_total: usize,
    words_total: usize,
}

/// Lay out `text` with `options`
///
/// Fails with [`LayoutError::MissingFont`] when no font table is supplied.
pub fn layout(text: &str, options: &LayoutOptions<'_>) -> LayoutResult<TextLayout> {
    let mut result = TextLayout::default();
    result.update(text, options)?;
    Ok(result)
}

fn letter_count(line: &[char]) -> usize {
    line.iter().filter(|ch| !ch.is_whitespace()).count()
}

fn word_count(line: &[char]) -> usize {
    line.split(|ch| ch.is_whitespace())
        .filter(|word| !word.is_empty())
        .count()
}

impl TextLayout {
    /// Re-run layout, replacing all glyphs and metrics
    pub fn update(&mut self, text: &str, options: &LayoutOptions<'_>) -> LayoutResult<()> {
        let font = options.font.ok_or(LayoutError::MissingFont)?;
        let text: Vec<char> = text.chars().collect();
        
        let resolver = GlyphResolver::new(font, options.tab_size);
        let default_measure = GlyphMeasure::new(&resolver, options.letter_spacing);
        let measure: &dyn MeasureText = match options.measure {
            Some(custom) => custom,
            None => &default_measure,
        };
        
        let wrap_width = options.width.unwrap_or(UNBOUNDED_WIDTH);
        let lines = wrap_lines(&text, wrap_width, measure);
        let min_width = options.width.unwrap_or(0.0);
        
        let max_line_width = lines
            .iter()
            .fold(0.0f32, |acc, line| acc.max(line.width).max(min_width));
        
        let line_height = options.line_height.unwrap_or_else(|| font.line_height());
        let baseline = font.base();
        let descender = line_height - baseline;
        let height = line_height * lines.len() as f32 - descender;
        let x_height = font.x_height();
        
        self.glyphs.clear();
        self.align_x = options.align_x;
        self.width = max_line_width;
        self.height = height;
        self.descender = descender;
        self.baseline = baseline;
        self.x_height = x_height;
        self.cap_height = font.cap_height();
        self.line_height = line_height;
        self.ascender = line_height - descender - x_height;
        self.lines_total = lines.len();
        
        let line_tallies: Vec<(usize, usize)> = lines
            .iter()
            .map(|line| {
                let span = &text[line.start..line.end];
                (letter_count(span), word_count(span))
            })
            .collect();
        self.letters_total = line_tallies.iter().map(|&(letters, _)| letters).sum();
        self.words_total = line_tallies.iter().map(|&(_, words)| words).sum();
        
        let mut y = -height;
        let mut word_index = 0;
        let mut letter_index = 0;
        
        for (line_index, (line, &(line_letters_total, line_words_total))) in
            lines.iter().zip(&line_tallies).enumerate()
        {
            let align_offset = options.align_x.line_offset(max_line_width, line.width);
            let mut x = 0.0f32;
            let mut line_letter_index = 0;
            let mut line_word_index = 0;
            let mut last: Option<(GlyphEntry, bool)> = None;
            
            for i in line.start..line.end {
                let ch = text[i];
                let Some(glyph) = resolver.resolve(ch) else {
                    continue;
                };
                
                if let Some((prev, _)) = last {
                    x += font.kerning(prev.id, glyph.id);
                }
                
                self.glyphs.push(GlyphRecord {
                    position: [x + align_offset, y],
                    glyph,
                    index: i,
                    lines_total: lines.len(),
                    line_index,
                    line_letters_total,
                    line_letter_index,
                    line_words_total,
                    line_word_index,
                    words_total: self.words_total,
                    word_index,
                    letters_total: self.letters_total,
                    letter_index,
                });
                
                let is_space = ch.is_whitespace();
                let after_word = matches!(last, Some((_, false)));
                if is_space && after_word {
                    line_word_index += 1;
                    word_index += 1;
                }
                if !is_space {
                    line_letter_index += 1;
                    letter_index += 1;
                }
                
                x += glyph.xadvance + options.letter_spacing;
                last = Some((glyph, is_space));
            }
            
            y += line_height;
        }
        
        log::trace!(
            "Laid out {} chars into {} lines, {} glyphs",
            text.len(),
            self.lines_total,
            self.glyphs.len()
        );
        Ok(())
    }
    
    /// All laid out glyphs, including empty whitespace glyphs
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }
    
    /// Glyphs with a non-empty bitmap, the ones that get geometry
    pub fn visible_glyphs(&self) -> impl Iterator<Item = &GlyphRecord> + '_ {
        self.glyphs.iter().filter(|record| record.glyph.has_area())
    }
    
    /// Horizontal alignment used for this layout
    pub fn align_x(&self) -> AlignX {
        self.align_x
    }
    
    /// Widest line, at least the configured width
    pub fn width(&self) -> f32 {
        self.width
    }
    
    /// Block height: `line_height * lines - descender`
    pub fn height(&self) -> f32 {
        self.height
    }
    
    /// `line_height - baseline`
    pub fn descender(&self) -> f32 {
        self.descender
    }
    
    /// `line_height - descender - x_height`
    pub fn ascender(&self) -> f32 {
        self.ascender
    }
    
    /// Probed x-height of the font
    pub fn x_height(&self) -> f32 {
        self.x_height
    }
    
    /// Font baseline
    pub fn baseline(&self) -> f32 {
        self.baseline
    }
    
    /// Probed cap height of the font
    pub fn cap_height(&self) -> f32 {
        self.cap_height
    }
    
    /// Effective line height
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
    
    /// Number of lines
    pub fn lines_total(&self) -> usize {
        self.lines_total
    }
    
    /// Number of non-whitespace chars across all lines
    pub fn letters_total(&self) -> usize {
        self.letters_total
    }
    
    /// Number of words across all lines
    pub fn words_total(&self) -> usize {
        self.words_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::bitmap_font::fixtures::test_font;
    use crate::layout::LineMeasure;
    use approx::assert_relative_eq;
    
    fn layout_with(text: &str, configure: impl FnOnce(&mut LayoutOptions<'_>)) -> TextLayout {
        let font = test_font();
        let mut options = LayoutOptions::with_font(&font);
        configure(&mut options);
        layout(text, &options).unwrap()
    }
    
    #[test]
    fn test_missing_font_is_configuration_error() {
        let result = layout("Hi", &LayoutOptions::default());
        assert_eq!(result.unwrap_err(), LayoutError::MissingFont);
    }
    
    #[test]
    fn test_single_line_hi() {
        let result = layout_with("Hi", |_| {});
        let glyphs = result.glyphs();
        
        assert_eq!(result.lines_total(), 1);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].position, [0.0, -16.0]);
        assert_eq!(glyphs[1].position, [10.0, -16.0]);
        assert_eq!(glyphs[1].index, 1);
    }
    
    #[test]
    fn test_aggregate_metrics() {
        let result = layout_with("ab\ncd", |_| {});
        
        assert_eq!(result.line_height(), 20.0);
        assert_eq!(result.baseline(), 16.0);
        assert_eq!(result.descender(), 4.0);
        assert_eq!(result.height(), 36.0);
        assert_eq!(result.x_height(), 8.0);
        assert_eq!(result.cap_height(), 8.0);
        assert_eq!(result.ascender(), 8.0);
        assert_eq!(result.width(), 18.0);
    }
    
    #[test]
    fn test_lines_follow_newlines_without_wrap_width() {
        for text in ["", "a", "a\nb", "a\n\nb\n", "\n", "ab cd\nef gh ij\n\n"] {
            let expected = 1 + text.matches('\n').count();
            assert_eq!(layout_with(text, |_| {}).lines_total(), expected, "text {:?}", text);
        }
    }
    
    #[test]
    fn test_lines_advance_by_line_height() {
        let result = layout_with("a\nb", |options| options.line_height = Some(30.0));
        let glyphs = result.glyphs();
        
        // height = 30 * 2 - (30 - 16)
        assert_eq!(glyphs[0].position[1], -46.0);
        assert_eq!(glyphs[1].position[1], -16.0);
        assert_eq!(glyphs[1].line_index, 1);
    }
    
    #[test]
    fn test_line_counts_sum_to_totals() {
        let result = layout_with("the quick  brown\nfox jumps over\tthe dog", |options| {
            options.width = Some(60.0);
        });
        
        let mut letters_per_line = vec![0; result.lines_total()];
        let mut words_per_line = vec![0; result.lines_total()];
        for glyph in result.glyphs() {
            letters_per_line[glyph.line_index] = glyph.line_letters_total;
            words_per_line[glyph.line_index] = glyph.line_words_total;
        }
        
        assert_eq!(letters_per_line.iter().sum::<usize>(), result.letters_total());
        assert_eq!(words_per_line.iter().sum::<usize>(), result.words_total());
        assert_eq!(result.letters_total(), 31);
        assert_eq!(result.words_total(), 8);
    }
    
    #[test]
    fn test_word_and_letter_indices() {
        let result = layout_with("ab cd", |_| {});
        let tallies: Vec<(usize, usize)> = result
            .glyphs()
            .iter()
            .map(|g| (g.word_index, g.letter_index))
            .collect();
        
        assert_eq!(tallies, vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 3)]);
        assert_eq!(result.words_total(), 2);
        assert_eq!(result.letters_total(), 4);
    }
    
    #[test]
    fn test_kerning_moves_pen() {
        let result = layout_with("AV", |_| {});
        assert_eq!(result.glyphs()[1].position[0], 8.0);
    }
    
    #[test]
    fn test_letter_spacing() {
        let result = layout_with("abc", |options| options.letter_spacing = 2.0);
        let xs: Vec<f32> = result.glyphs().iter().map(|g| g.position[0]).collect();
        
        assert_eq!(xs, vec![0.0, 12.0, 24.0]);
    }
    
    #[test]
    fn test_right_alignment() {
        let result = layout_with("abcd\nab", |options| options.align_x = AlignX::Right);
        let max = result.width();
        let second_line: Vec<&GlyphRecord> = result.glyphs().iter().filter(|g| g.line_index == 1).collect();
        
        // second line "ab" is 18 wide
        assert_relative_eq!(second_line[0].position[0] + 18.0, max);
        assert_relative_eq!(second_line[1].position[0], max - 18.0 + 10.0);
    }
    
    #[test]
    fn test_center_alignment_is_symmetric() {
        let result = layout_with("abcd\nab", |options| options.align_x = AlignX::Center);
        let max = result.width();
        let first = result.glyphs().iter().find(|g| g.line_index == 1).unwrap();
        
        let left_gap = first.position[0];
        let right_gap = max - (first.position[0] + 18.0);
        assert_relative_eq!(left_gap, right_gap);
    }
    
    #[test]
    fn test_min_width_widens_block() {
        let result = layout_with("ab", |options| {
            options.width = Some(100.0);
            options.align_x = AlignX::Right;
        });
        
        assert_eq!(result.width(), 100.0);
        assert_eq!(result.glyphs()[0].position[0], 82.0);
    }
    
    #[test]
    fn test_overlong_word_occupies_one_line() {
        let result = layout_with("abcdefgh", |options| options.width = Some(25.0));
        
        assert_eq!(result.lines_total(), 1);
        assert_eq!(result.glyphs().len(), 8);
        assert!(result.width() > 25.0);
        assert_eq!(result.width(), 78.0);
    }
    
    #[test]
    fn test_unsupported_chars_skipped_without_advance() {
        let result = layout_with("a\u{263a}b", |_| {});
        let glyphs = result.glyphs();
        
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[1].index, 2);
        assert_eq!(glyphs[1].position[0], 10.0);
    }
    
    #[test]
    fn test_whitespace_laid_out_but_not_visible() {
        let result = layout_with("a b\tc", |_| {});
        
        assert_eq!(result.glyphs().len(), 5);
        assert_eq!(result.visible_glyphs().count(), 3);
        // a(10) + space(5) + b(10) + tab(4 * 5)
        assert_eq!(result.glyphs()[4].position[0], 45.0);
    }
    
    #[test]
    fn test_update_replaces_previous_glyphs() {
        let font = test_font();
        let options = LayoutOptions::with_font(&font);
        let mut result = layout("abcdef", &options).unwrap();
        result.update("ab", &options).unwrap();
        
        assert_eq!(result.glyphs().len(), 2);
    }
    
    struct FixedWidth;
    
    impl MeasureText for FixedWidth {
        fn measure(&self, _text: &[char], start: usize, end: usize, width: f32) -> LineMeasure {
            // Every char is 1 wide
            let fits = ((width.min(1.0e6)) as usize).min(end - start);
            LineMeasure { start, end: start + fits, width: fits as f32 }
        }
    }
    
    #[test]
    fn test_custom_measure_drives_wrapping() {
        let font = test_font();
        let measure = FixedWidth;
        let options = LayoutOptions {
            width: Some(6.0),
            measure: Some(&measure),
            ..LayoutOptions::with_font(&font)
        };
        let result = layout("aa bb cc", &options).unwrap();
        
        assert_eq!(result.lines_total(), 2);
    }
}
