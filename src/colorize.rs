//! The colorize pass: assign scheme colors to every discovered folder
//!
//! All discovered display paths are accumulated into a tracking set before
//! any colors are assigned. Slots are then applied in order; a path claimed
//! by one slot leaves the tracking set, so a later slot can never override
//! an earlier assignment. Whatever remains after all slots matched nothing
//! and is handled according to [`StalePolicy`].
//!
//! The pass is idempotent: identical inputs produce identical outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::LinearColor;
use crate::resolver::matches_scheme;
use crate::scheme::SchemeSet;

/// What happens to previously colored folders that no scheme matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Keep whatever color the folder already had (default)
    #[default]
    Leave,
    /// Clear any previously assigned color
    Clear,
}

/// Collaborator that stores per-folder display colors (the content browser)
pub trait FolderColorSink {
    fn set_color(&mut self, path: &str, color: LinearColor);
    fn clear_color(&mut self, path: &str);
}

/// A plain color map is a valid sink (tests, headless hosts)
impl FolderColorSink for BTreeMap<String, LinearColor> {
    fn set_color(&mut self, path: &str, color: LinearColor) {
        self.insert(path.to_string(), color);
    }

    fn clear_color(&mut self, path: &str) {
        self.remove(path);
    }
}

/// Result of one colorize pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorizeOutcome {
    /// `(display path, color)` pairs, in slot order then discovery order
    pub assignments: Vec<(String, LinearColor)>,
    /// Paths no scheme matched. Cleared through the sink only under
    /// [`StalePolicy::Clear`]; left untouched otherwise.
    pub unmatched: Vec<String>,
}

/// Run one pass over `dirs`, pushing assignments (and clears, per policy)
/// into `sink`
pub fn run_pass(
    dirs: &[String],
    schemes: &SchemeSet,
    policy: StalePolicy,
    sink: &mut dyn FolderColorSink,
) -> ColorizeOutcome {
    let mut outcome = ColorizeOutcome::default();
    let mut tracking: Vec<&String> = dirs.iter().collect();

    for scheme in schemes {
        if scheme.is_empty() {
            continue;
        }
        tracking.retain(|dir| {
            if matches_scheme(dir, scheme) {
                sink.set_color(dir, scheme.color);
                outcome.assignments.push(((*dir).clone(), scheme.color));
                false
            } else {
                true
            }
        });
    }

    if policy == StalePolicy::Clear {
        for dir in &tracking {
            sink.clear_color(dir);
        }
    }
    outcome.unmatched = tracking.into_iter().cloned().collect();

    tracing::debug!(
        "Colorize pass: {} assigned, {} unmatched ({:?})",
        outcome.assignments.len(),
        outcome.unmatched.len(),
        policy
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::empty_scheme_set;

    const RED: LinearColor = LinearColor::rgb(1.0, 0.0, 0.0);
    const GREEN: LinearColor = LinearColor::rgb(0.0, 1.0, 0.0);

    fn dirs(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_assigns_first_matching_slot() {
        let mut schemes = empty_scheme_set();
        schemes[0].set_folder_names(["Art"]);
        schemes[0].color = RED;
        schemes[1].set_folder_names(["Art", "Maps"]);
        schemes[1].color = GREEN;

        let mut sink = BTreeMap::new();
        let outcome = run_pass(
            &dirs(&["Game/Art", "Game/Maps"]),
            &schemes,
            StalePolicy::Leave,
            &mut sink,
        );

        assert_eq!(sink.get("Game/Art"), Some(&RED));
        assert_eq!(sink.get("Game/Maps"), Some(&GREEN));
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn test_later_slot_cannot_override_earlier_assignment() {
        let mut schemes = empty_scheme_set();
        schemes[0].set_folder_names(["Art"]);
        schemes[0].color = RED;
        // Slot 5 also claims Game/Art via explicit path, but the path left
        // the tracking set when slot 0 colored it
        schemes[5].set_explicit_paths(["Game/Art"]);
        schemes[5].color = GREEN;

        let mut sink = BTreeMap::new();
        run_pass(&dirs(&["Game/Art"]), &schemes, StalePolicy::Leave, &mut sink);
        assert_eq!(sink.get("Game/Art"), Some(&RED));
    }

    #[test]
    fn test_leave_policy_keeps_prior_colors() {
        let schemes = empty_scheme_set();
        let mut sink = BTreeMap::new();
        sink.set_color("Game/Old", GREEN);

        let outcome = run_pass(&dirs(&["Game/Old"]), &schemes, StalePolicy::Leave, &mut sink);
        assert_eq!(sink.get("Game/Old"), Some(&GREEN));
        assert_eq!(outcome.unmatched, vec!["Game/Old"]);
    }

    #[test]
    fn test_clear_policy_clears_unmatched() {
        let schemes = empty_scheme_set();
        let mut sink = BTreeMap::new();
        sink.set_color("Game/Old", GREEN);

        run_pass(&dirs(&["Game/Old"]), &schemes, StalePolicy::Clear, &mut sink);
        assert!(sink.get("Game/Old").is_none());
    }

    #[test]
    fn test_clear_policy_only_touches_discovered_paths() {
        let schemes = empty_scheme_set();
        let mut sink = BTreeMap::new();
        sink.set_color("Elsewhere/Folder", GREEN);

        run_pass(&dirs(&["Game/Art"]), &schemes, StalePolicy::Clear, &mut sink);
        assert_eq!(sink.get("Elsewhere/Folder"), Some(&GREEN));
    }

    #[test]
    fn test_pass_is_idempotent() {
        let mut schemes = empty_scheme_set();
        schemes[0].set_folder_names(["Art"]);
        schemes[0].color = RED;
        schemes[2].set_explicit_paths(["Game/Maps"]);
        schemes[2].color = GREEN;

        let input = dirs(&["Game/Art", "Game/Maps", "Game/Design"]);

        let mut first_sink = BTreeMap::new();
        let first = run_pass(&input, &schemes, StalePolicy::Leave, &mut first_sink);
        let mut second_sink = first_sink.clone();
        let second = run_pass(&input, &schemes, StalePolicy::Leave, &mut second_sink);

        assert_eq!(first, second);
        assert_eq!(first_sink, second_sink);
    }
}
