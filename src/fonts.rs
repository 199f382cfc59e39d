//! Font family fallback for the cover text.
//!
//! Whether a family is installed depends on the machine rendering the cover,
//! so availability is answered by a [`FontProbe`] handed in by the caller.
//! The only probe that touches the system is [`FcListProbe`], which asks
//! fontconfig once and remembers the answer.

use std::collections::HashSet;
use std::process::Command;
use std::sync::OnceLock;

/// The generic family every stack ends with.
pub const GENERIC_FAMILY: &str = "sans-serif";

/// Answers "is this font family installed?".
pub trait FontProbe {
    fn is_available(&self, family: &str) -> bool;
}

/// Probe backed by `fc-list`. If fontconfig isn't installed nothing is
/// reported as available.
#[derive(Debug, Default)]
pub struct FcListProbe {
    families: OnceLock<HashSet<String>>,
}

impl FcListProbe {
    fn families(&self) -> &HashSet<String> {
        self.families.get_or_init(|| {
            let output = Command::new("fc-list").args([":", "family"]).output();
            match output {
                Ok(output) if output.status.success() => {
                    let families = parse_fc_list(&String::from_utf8_lossy(&output.stdout));
                    log::debug!("fc-list reported {} font families", families.len());
                    families
                }
                Ok(output) => {
                    log::warn!("fc-list exited with {}, assuming no fonts", output.status);
                    HashSet::new()
                }
                Err(e) => {
                    log::warn!("Failed to run fc-list ({e}), assuming no fonts");
                    HashSet::new()
                }
            }
        })
    }
}

impl FontProbe for FcListProbe {
    fn is_available(&self, family: &str) -> bool {
        self.families().contains(&family.to_lowercase())
    }
}

/// A fixed set of families.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticFonts(pub Vec<String>);

#[cfg(test)]
impl FontProbe for StaticFonts {
    fn is_available(&self, family: &str) -> bool {
        self.0.iter().any(|f| f.eq_ignore_ascii_case(family))
    }
}

/// Parse `fc-list : family` output. Each line may list several
/// comma-separated names for the same family; all are kept, lowercased.
pub fn parse_fc_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .flat_map(|line| line.split(','))
        .map(|family| family.trim().replace("\\-", "-").to_lowercase())
        .filter(|family| !family.is_empty())
        .collect()
}

/// Installed families from `preferred`, in order, followed by the generic family.
pub fn font_stack<P: FontProbe + ?Sized>(preferred: &[String], probe: &P) -> Vec<String> {
    let mut stack: Vec<String> = preferred
        .iter()
        .filter(|family| !family.eq_ignore_ascii_case(GENERIC_FAMILY))
        .filter(|family| probe.is_available(family))
        .cloned()
        .collect();
    stack.dedup();
    stack.push(GENERIC_FAMILY.to_string());
    stack
}

/// Render a stack as a CSS / SVG `font-family` value.
pub fn font_family_value(stack: &[String]) -> String {
    stack
        .iter()
        .map(|family| {
            if family == GENERIC_FAMILY || !family.contains(' ') {
                family.clone()
            } else {
                format!("'{family}'")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
