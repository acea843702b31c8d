//! SVG word clouds for a single topic.

use std::fmt::Write as _;

use rdash_core::{TopicId, OUTLIER_TOPIC};
use thiserror::Error;

use crate::model::TopicModel;

/// Colours cycled over words in rank order.
const PALETTE: &[&str] = &["#440154", "#3b528b", "#21918c", "#27ad81", "#5ec962"];

const TITLE_BAND: f32 = 40.0;
const SPIRAL_STEPS: usize = 3000;
/// Approximate advance width of one glyph relative to the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// Why no image was produced for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloudSkip {
    #[error("Word cloud not applicable for outlier topic (-1).")]
    OutlierTopic,

    #[error("No significant keywords found for Topic ID {0} to generate a word cloud.")]
    NoSignificantKeywords(TopicId),

    #[error("Topic ID {0} does not exist in the fitted model.")]
    UnknownTopic(TopicId),
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub max_words: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// Share of font size driven by relative weight; the rest is constant.
    pub relative_scaling: f32,
}

impl Default for WordCloud {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: "white".to_string(),
            max_words: 100,
            min_font_size: 10.0,
            max_font_size: 80.0,
            relative_scaling: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudImage {
    pub topic: TopicId,
    /// Complete SVG document.
    pub svg: String,
    pub words_placed: usize,
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

struct Placed<'a> {
    word: &'a str,
    font_size: f32,
    rect: Rect,
}

/// Render a word cloud from a topic's positively weighted keywords.
///
/// # Errors
///
/// Returns a [`CloudSkip`] for the outlier topic, an unknown topic, or a
/// topic with no positive keyword weights.
pub fn generate_word_cloud(
    model: &dyn TopicModel,
    topic_id: TopicId,
    options: &WordCloud,
) -> Result<WordCloudImage, CloudSkip> {
    if topic_id == OUTLIER_TOPIC {
        return Err(CloudSkip::OutlierTopic);
    }
    let keywords = model
        .topic(topic_id)
        .ok_or(CloudSkip::UnknownTopic(topic_id))?;

    let mut weighted: Vec<(&str, f64)> = keywords
        .iter()
        .filter(|(_, weight)| *weight > 0.0)
        .map(|(word, weight)| (word.as_str(), *weight))
        .collect();
    if weighted.is_empty() {
        return Err(CloudSkip::NoSignificantKeywords(topic_id));
    }
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    weighted.truncate(options.max_words);

    let placed = layout(&weighted, options);
    let svg = render_svg(topic_id, &placed, options);
    tracing::debug!(topic = topic_id, words = placed.len(), "word cloud rendered");
    Ok(WordCloudImage {
        topic: topic_id,
        svg,
        words_placed: placed.len(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn layout<'a>(words: &[(&'a str, f64)], options: &WordCloud) -> Vec<Placed<'a>> {
    let width = options.width as f32;
    let height = options.height as f32;
    let max_weight = words.first().map_or(1.0, |(_, w)| *w);
    let center_x = width / 2.0;
    let center_y = TITLE_BAND + (height - TITLE_BAND) / 2.0;

    let mut placed: Vec<Placed<'a>> = Vec::with_capacity(words.len());
    for &(word, weight) in words {
        #[allow(clippy::cast_possible_truncation)]
        let relative = (weight / max_weight) as f32;
        let scale = options.relative_scaling * relative + (1.0 - options.relative_scaling);
        let mut font_size = (options.max_font_size * scale).max(options.min_font_size);

        while font_size >= options.min_font_size {
            let w = font_size * GLYPH_WIDTH * word.chars().count() as f32;
            let h = font_size;
            let spot = (0..SPIRAL_STEPS).find_map(|step| {
                let t = step as f32 * 0.1;
                let r = 1.5 * t;
                let rect = Rect {
                    x: center_x + r * t.cos() - w / 2.0,
                    y: center_y + r * t.sin() - h / 2.0,
                    w,
                    h,
                };
                let inside = rect.x >= 0.0
                    && rect.y >= TITLE_BAND
                    && rect.x + rect.w <= width
                    && rect.y + rect.h <= height;
                (inside && placed.iter().all(|p| !p.rect.intersects(&rect))).then_some(rect)
            });
            if let Some(rect) = spot {
                placed.push(Placed {
                    word,
                    font_size,
                    rect,
                });
                break;
            }
            font_size *= 0.9;
        }
    }
    placed
}

fn render_svg(topic_id: TopicId, placed: &[Placed<'_>], options: &WordCloud) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = options.width,
        h = options.height,
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        escape(&options.background)
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="28" font-family="sans-serif" font-size="16" text-anchor="middle">Word Cloud for Topic ID: {topic_id}</text>"#,
        f64::from(options.width) / 2.0,
    );
    for (i, p) in placed.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" fill="{}">{}</text>"#,
            p.rect.x,
            p.rect.y + p.font_size * 0.8,
            p.font_size,
            PALETTE[i % PALETTE.len()],
            escape(p.word),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
