use crate::features::UrlFeatures;

const BASE_SCORE: f64 = 0.5;
const MAX_SCORE: f64 = 0.99;

/// Rule-based phishing score used when no trained model is available.
pub fn heuristic_score(f: &UrlFeatures) -> f64 {
    let mut score = BASE_SCORE;
    if f.has_ip_host {
        score += 0.2;
    }
    if f.suspicious_tld {
        score += 0.15;
    }
    if f.shortener {
        score += 0.1;
    }
    if f.num_at > 0 {
        score += 0.15;
    }
    if f.digit_ratio > 0.3 {
        score += 0.1;
    }
    score.min(MAX_SCORE)
}

/// Binary label for a score. Strictly above the base score counts as phishing.
pub fn label(score: f64) -> u8 {
    u8::from(score > BASE_SCORE)
}
