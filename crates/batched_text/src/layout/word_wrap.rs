//! Glyph resolution, span measurement and greedy word wrapping

use super::{LineMeasure, MeasureText};
use crate::font::{GlyphEntry, GlyphMetricsTable};

/// Width used when no wrap width is configured
pub const UNBOUNDED_WIDTH: f32 = f32::MAX;

/// Resolves characters to glyphs, synthesizing space and tab when missing
///
/// The synthesized glyphs are built from the font's space glyph (or `m`/`w`,
/// or its first glyph) with an empty bitmap, so they move the pen without
/// producing geometry. Characters with no glyph and no fallback resolve to
/// `None` and are skipped by layout.
#[derive(Debug, Clone)]
pub struct GlyphResolver<'a> {
    font: &'a GlyphMetricsTable,
    fallback_space: Option<GlyphEntry>,
    fallback_tab: Option<GlyphEntry>,
}

impl<'a> GlyphResolver<'a> {
    /// Resolver for `font`, tab width `tab_size` space advances
    pub fn new(font: &'a GlyphMetricsTable, tab_size: f32) -> Self {
        let space = font.space_source_glyph().copied();
        let blank = |id: char, xadvance: f32| GlyphEntry {
            id: id as u32,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            xoffset: 0.0,
            yoffset: 0.0,
            xadvance,
        };
        
        Self {
            font,
            fallback_space: space.map(|s| blank(' ', s.xadvance)),
            fallback_tab: space.map(|s| blank('\t', tab_size * s.xadvance)),
        }
    }
    
    /// Font the resolver reads from
    pub fn font(&self) -> &'a GlyphMetricsTable {
        self.font
    }
    
    /// Glyph for `ch`, or a whitespace fallback, or `None`
    pub fn resolve(&self, ch: char) -> Option<GlyphEntry> {
        if let Some(glyph) = self.font.glyph_for_char(ch) {
            return Some(*glyph);
        }
        
        match ch {
            '\t' => self.fallback_tab,
            ' ' => self.fallback_space,
            _ => None,
        }
    }
}

/// Default measurement: advances, kerning and letter spacing from the font
#[derive(Debug, Clone)]
pub struct GlyphMeasure<'r, 'a> {
    resolver: &'r GlyphResolver<'a>,
    letter_spacing: f32,
}

impl<'r, 'a> GlyphMeasure<'r, 'a> {
    /// Measure through `resolver` with `letter_spacing` after each glyph
    pub fn new(resolver: &'r GlyphResolver<'a>, letter_spacing: f32) -> Self {
        Self {
            resolver,
            letter_spacing,
        }
    }
}

impl MeasureText for GlyphMeasure<'_, '_> {
    fn measure(&self, text: &[char], start: usize, end: usize, width: f32) -> LineMeasure {
        if self.resolver.font().is_empty() {
            return LineMeasure { start, end: start, width: 0.0 };
        }
        
        let end = end.min(text.len());
        let mut pen = 0.0f32;
        let mut line_width = 0.0f32;
        let mut count = 0;
        let mut last: Option<GlyphEntry> = None;
        
        for &ch in &text[start..end] {
            if let Some(glyph) = self.resolver.resolve(ch) {
                if let Some(prev) = last {
                    pen += self.resolver.font().kerning(prev.id, glyph.id);
                }
                
                let next_pen = pen + glyph.xadvance + self.letter_spacing;
                let next_width = pen + glyph.width;
                
                // Stop before the glyph that would reach the limit
                if next_width >= width || next_pen >= width {
                    break;
                }
                
                pen = next_pen;
                line_width = next_width;
                last = Some(glyph);
            }
            count += 1;
        }
        
        // Right edge lines up with the last rendered bitmap
        if let Some(prev) = last {
            line_width += prev.xoffset;
        }
        
        LineMeasure {
            start,
            end: start + count,
            width: line_width,
        }
    }
}

/// Break `text` into lines no wider than `width`
///
/// Every `'\n'` starts a new line, so an unwrapped text always has one more
/// line than it has newlines. Leading whitespace of each line is dropped.
/// Lines break greedily at whitespace; a word wider than `width` is never
/// split and occupies a line of its own, wider than `width`.
pub fn wrap_lines(text: &[char], width: f32, measure: &dyn MeasureText) -> Vec<LineMeasure> {
    let mut lines = Vec::new();
    let mut paragraph_start = 0;
    
    loop {
        let paragraph_end = text[paragraph_start..]
            .iter()
            .position(|&ch| ch == '\n')
            .map_or(text.len(), |offset| paragraph_start + offset);
        
        wrap_paragraph(text, paragraph_start, paragraph_end, width, measure, &mut lines);
        
        if paragraph_end >= text.len() {
            break;
        }
        paragraph_start = paragraph_end + 1;
    }
    
    lines
}

fn wrap_paragraph(
    text: &[char],
    mut start: usize,
    end: usize,
    width: f32,
    measure: &dyn MeasureText,
    lines: &mut Vec<LineMeasure>,
) {
    let mut emitted = false;
    
    loop {
        while start < end && text[start].is_whitespace() {
            start += 1;
        }
        
        if start >= end {
            if !emitted {
                lines.push(LineMeasure { start, end: start, width: 0.0 });
            }
            return;
        }
        
        let fit = measure.measure(text, start, end, width);
        let mut line_end = start + (fit.end - fit.start);
        let next_start;
        
        if line_end >= end {
            line_end = end;
            next_start = end;
        } else {
            let mut split = line_end;
            while split > start && !text[split].is_whitespace() {
                split -= 1;
            }
            
            if split == start {
                // Overlong word: keep it whole
                line_end = text[start..end]
                    .iter()
                    .position(|ch| ch.is_whitespace())
                    .map_or(end, |offset| start + offset);
                next_start = line_end;
            } else {
                next_start = split;
                line_end = split;
                while line_end > start && text[line_end - 1].is_whitespace() {
                    line_end -= 1;
                }
            }
        }
        
        lines.push(measure.measure(text, start, line_end, UNBOUNDED_WIDTH));
        emitted = true;
        start = next_start;
    }
}
