//! Tunable thresholds for the extraction heuristics
//!
//! Every numeric cutoff used by title and abstract resolution lives here so
//! behavior can be tuned (and tested) per threshold instead of through
//! scattered literals.

/// Configuration for title and abstract extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum line width to be considered meaningful text (default: 30.0).
    /// Narrower lines are page numbers, stray marks, rotated single letters.
    pub min_width: f32,
    /// Maximum number of assembled title lines (default: 3)
    pub title_max_lines: usize,
    /// When no "Abstract" label bounds the search window, keep only this
    /// leading fraction of the candidate lines (default: 0.5)
    pub title_bottom_ratio: f32,
    /// Minimum width for a line to anchor the title (default: 100.0)
    pub title_min_length: f32,
    /// Maximum `upper_space` gap for a line to count as a continuation of
    /// the title (default: 6.0)
    pub connecting_space: f32,
    /// Maximum width of a line recognized as the "1 Introduction" heading
    /// (default: 120.0). Wider lines starting with "1" are body text.
    pub introduction_max_width: f32,
    /// `upper_space` below this marks the jump out of a vertically stacked
    /// "Abstract" label into body text (default: -50.0)
    pub vertical_label_exit_space: f32,
    /// `upper_space` below this signals a column change (default: -100.0)
    pub column_change_upper_space: f32,
    /// Tolerance around the implicit-abstract target `(height, upper_space)`
    /// pair (default: 1.0)
    pub implicit_target_margin: f32,
    /// Characters that disqualify a line from the title candidate pool;
    /// footnote and affiliation markers (default: `.` `†` `‡` `♭`)
    pub skip_characters: Vec<char>,
    /// Exact line texts excluded from title candidates; journal and venue
    /// names that render large enough to be mistaken for a title
    pub exclude_words: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_width: 30.0,
            title_max_lines: 3,
            title_bottom_ratio: 0.5,
            title_min_length: 100.0,
            connecting_space: 6.0,
            introduction_max_width: 120.0,
            vertical_label_exit_space: -50.0,
            column_change_upper_space: -100.0,
            implicit_target_margin: 1.0,
            skip_characters: vec!['.', '†', '‡', '♭'],
            exclude_words: vec![
                "Energy   and   Buildings".to_string(),
                "sensors".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ExtractConfig::default();
        assert!((config.min_width - 30.0).abs() < f32::EPSILON);
        assert_eq!(config.title_max_lines, 3);
        assert!((config.title_bottom_ratio - 0.5).abs() < 0.001);
        assert!((config.connecting_space - 6.0).abs() < 0.001);
        assert!((config.column_change_upper_space + 100.0).abs() < 0.001);
        assert!(config.skip_characters.contains(&'†'));
    }
}
