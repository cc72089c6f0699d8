//! Turns Claude-style encoded project directory names (`-home-alice-projects-foo`)
//! into short labels (`foo`).

const DELIMITER: char = '-';
const HOME_MARKERS: &[&str] = &["home", "Users"];
const PROJECTS_MARKER: &str = "projects";
const TEMP_PREFIXES: &[&str] = &["-var-folders-", "-private-var-folders-", "-private-tmp"];

pub const TEMP_LABEL: &str = "(temp)";
pub const HOME_LABEL: &str = "~";

/// Best-effort label for an encoded project directory. Never fails: names
/// that don't look like an encoded home path come back unchanged.
pub fn normalize_project_name(encoded: &str) -> String {
    if is_temp_dir(encoded) {
        return TEMP_LABEL.to_string();
    }

    let segments: Vec<&str> = encoded
        .split(DELIMITER)
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.as_slice() {
        [home, _user, rest @ ..] if HOME_MARKERS.contains(home) => {
            let rest = match rest {
                [marker, tail @ ..] if *marker == PROJECTS_MARKER => tail,
                _ => rest,
            };
            if rest.is_empty() {
                HOME_LABEL.to_string()
            } else {
                rest.join("-")
            }
        }
        _ => encoded.to_string(),
    }
}

fn is_temp_dir(encoded: &str) -> bool {
    let first_segment = encoded.split(DELIMITER).find(|segment| !segment.is_empty());
    first_segment == Some("tmp") || TEMP_PREFIXES.iter().any(|prefix| encoded.starts_with(prefix))
}
