use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40}] {pos}/{len} events ({per_sec}) {msg}";

/// Progress bar over reference events, drawn on stderr. Hidden when `visible` is false.
pub fn merge_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        assert!(ProgressStyle::default_bar().template(TEMPLATE).is_ok());
    }

    #[test]
    fn test_hidden_bar_tracks_position() {
        let bar = merge_bar(10, false);
        bar.set_position(4);
        assert_eq!(bar.position(), 4);
        assert!(bar.is_hidden());
    }
}
