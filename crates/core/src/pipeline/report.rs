use crate::pipeline::analyze_use_case::FaceAnalysis;

/// Formats analyses as the console table the menu flow prints.
///
/// One row per face; the empty case says so explicitly instead of printing
/// a bare header.
pub fn format_report(analyses: &[FaceAnalysis]) -> String {
    if analyses.is_empty() {
        return "No faces detected.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:>5} {:>5} {:>6} {:>7}  {:<7} {:>10}\n",
        "#", "x", "y", "width", "height", "gender", "confidence"
    ));
    for (i, a) in analyses.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:>5} {:>5} {:>6} {:>7}  {:<7} {:>10.2}\n",
            i + 1,
            a.region.x,
            a.region.y,
            a.region.width,
            a.region.height,
            a.gender.label.to_string(),
            a.gender.confidence
        ));
    }
    out
}
