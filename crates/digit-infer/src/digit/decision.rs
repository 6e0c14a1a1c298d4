use super::Scores;

/// Pick the digit with the highest score.
///
/// Scans from index 1 and only replaces the running maximum on a strictly
/// greater score, so the first of several equal maxima wins. NaN scores never
/// win a comparison.
pub fn decide(scores: &Scores) -> u8 {
    let values = scores.as_slice();
    let mut best = 0;
    let mut best_value = values[0];
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best as u8
}
