//! Prompt assembly for the generation model.
//!
//! Pure string work: a fixed clause per known style and era, a generic
//! templated clause for everything else, and the population repeated in more
//! than one place because the model otherwise likes to sneak bystanders in.
//! Free-text values are interpolated verbatim; they end up as natural-language
//! instruction, not anything executable.

use crate::constants::PRESENT_DAY;
use crate::reference::ReferenceKind;

const CLOSING: &str = "The result should be a creative interpretation, not a literal copy. \
Do not include any text, labels, or map artifacts in the final image.";

fn opening(reference: ReferenceKind) -> &'static str {
    match reference {
        ReferenceKind::StreetView => {
            "Based on this street-level photograph, generate a new, highly detailed image of the same place."
        }
        ReferenceKind::Roadmap => {
            "Based on this map of the area, generate a new, highly detailed image of the place it depicts."
        }
    }
}

fn style_clause(style: &str) -> String {
    match style {
        "Comic" => "Render it as a vibrant comic book panel with bold ink outlines, halftone shading, and saturated colors.".to_string(),
        "Realistic" => "Render it as a photorealistic scene with natural lighting and believable materials.".to_string(),
        "Futuristic" => "Render it as a gleaming futuristic version of the place, with sleek architecture and holographic signage woven into every surface.".to_string(),
        "Destroyed" => "Render it as a ruined, post-catastrophe version of the place, with collapsed structures, rubble, and overgrowth reclaiming the streets.".to_string(),
        "On Fire" => "Render it engulfed in a dramatic blaze, with towering flames, embers, and thick smoke rolling over the skyline.".to_string(),
        "Flooded" => "Render it flood-swamped, with submerged streets, drifting debris, and water reflections everywhere.".to_string(),
        other => format!("Strong {other} aesthetic throughout the whole scene."),
    }
}

fn era_clause(time_period: &str) -> String {
    match time_period {
        "Ancient Rome" => "Set the scene in Ancient Rome, with period-accurate architecture, dress, and technology.".to_string(),
        "Medieval Times" => "Set the scene in medieval times: timber and stone buildings, banners, and muddy lanes.".to_string(),
        "1920s Art Deco" => "Set the scene in the 1920s Art Deco era, with geometric facades, brass detailing, and period vehicles.".to_string(),
        "1980s Cyberpunk" => "Set the scene on a neon-soaked 1980s cyberpunk night, full of CRT glow and chrome.".to_string(),
        "Distant Future" => "Set the scene in the distant future, centuries ahead of today.".to_string(),
        "Prehistoric" => "Set the scene in the prehistoric era, long before any city stood here.".to_string(),
        other => format!("Imagine the scene is taking place in the {other} era."),
    }
}

/// Renders the full instruction string sent to the model.
///
/// The era clause is appended only when `time_period` differs from the
/// "Present Day" sentinel.
#[must_use]
pub fn build_prompt(
    style: &str,
    population: &str,
    time_period: &str,
    reference: ReferenceKind,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(opening(reference));
    prompt.push(' ');
    prompt.push_str(&style_clause(style));
    prompt.push(' ');
    prompt.push_str(&format!(
        "The scene is populated exclusively by {population}."
    ));
    if time_period != PRESENT_DAY {
        prompt.push(' ');
        prompt.push_str(&era_clause(time_period));
    }
    prompt.push(' ');
    prompt.push_str(&format!(
        "Every inhabitant, without exception, must be {population}; do not depict anyone or anything else living."
    ));
    prompt.push(' ');
    prompt.push_str(CLOSING);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_is_always_interpolated() {
        let prompt = build_prompt("Comic", "Robots", PRESENT_DAY, ReferenceKind::StreetView);
        assert!(prompt.matches("Robots").count() >= 2);
    }

    #[test]
    fn era_clause_only_for_non_present_day() {
        let present = build_prompt("Comic", "Robots", PRESENT_DAY, ReferenceKind::Roadmap);
        assert!(!present.contains("Set the scene"));
        assert!(!present.contains("Imagine the scene"));

        let rome = build_prompt("Comic", "Robots", "Ancient Rome", ReferenceKind::Roadmap);
        assert!(rome.contains("Ancient Rome"));
    }

    #[test]
    fn unknown_era_falls_through_to_generic_clause() {
        let prompt = build_prompt("Comic", "Robots", "Victorian London", ReferenceKind::Roadmap);
        assert!(prompt.contains("Imagine the scene is taking place in the Victorian London era."));
    }

    #[test]
    fn known_style_uses_canned_clause() {
        let prompt = build_prompt("Comic", "Ghosts", PRESENT_DAY, ReferenceKind::StreetView);
        assert!(prompt.contains("comic book panel"));
    }

    #[test]
    fn unknown_style_falls_through_to_generic_clause() {
        let prompt = build_prompt("Vaporwave", "Ghosts", PRESENT_DAY, ReferenceKind::StreetView);
        assert!(prompt.contains("Strong Vaporwave aesthetic"));
    }

    #[test]
    fn opening_matches_reference_kind() {
        let street = build_prompt("Comic", "Robots", PRESENT_DAY, ReferenceKind::StreetView);
        assert!(street.contains("street-level photograph"));

        let map = build_prompt("Comic", "Robots", PRESENT_DAY, ReferenceKind::Roadmap);
        assert!(map.contains("this map of the area"));
    }

    #[test]
    fn prompt_always_ends_with_the_no_artifacts_rule() {
        let prompt = build_prompt("Flooded", "Bananas", "Prehistoric", ReferenceKind::Roadmap);
        assert!(prompt.ends_with(CLOSING));
    }
}
