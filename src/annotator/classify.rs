//! Short, kid-readable labels for a block of changed lines.
//!
//! Labels come from sniffing the block text against an ordered rule table.
//! The first rule that matches wins, so the order of [`RULES`] is the
//! precedence. Matches are best effort: a label is a hint for the reader and
//! is never used to decide anything.

use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfunction\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("function definition regex")
});

/// The text of one block, kept both as written and lowercased.
pub struct BlockText {
    raw: String,
    lower: String,
}

impl BlockText {
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        let raw = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        let lower = raw.to_lowercase();
        Self { raw, lower }
    }

    /// Case-insensitive substring test. `needle` must be lowercase.
    fn has(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.has(needle))
    }

    fn defined_function(&self) -> Option<&str> {
        FUNCTION_DEF
            .captures(&self.raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn non_blank_lines(&self) -> usize {
        self.raw.lines().filter(|line| !line.trim().is_empty()).count()
    }
}

pub enum LabelTemplate {
    Fixed(&'static str),
    /// `Added <name>() function`, with the name of the defined function.
    DefinedFunction,
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&BlockText) -> bool,
    pub template: LabelTemplate,
}

impl Rule {
    /// The label for `text`, or `None` when this rule does not apply.
    pub fn apply(&self, text: &BlockText) -> Option<String> {
        if !(self.matches)(text) {
            return None;
        }
        match self.template {
            LabelTemplate::Fixed(label) => Some(label.to_string()),
            LabelTemplate::DefinedFunction => text
                .defined_function()
                .map(|name| format!("Added {name}() function")),
        }
    }
}

const fn rule(name: &'static str, matches: fn(&BlockText) -> bool, label: &'static str) -> Rule {
    Rule {
        name,
        matches,
        template: LabelTemplate::Fixed(label),
    }
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "function",
        matches: |t| t.defined_function().is_some(),
        template: LabelTemplate::DefinedFunction,
    },
    rule("speed", |t| t.has_any(&["velocity", "speed"]), "Added movement speed"),
    rule("gravity", |t| t.has("gravity"), "Added gravity"),
    rule("jump", |t| t.has("jump"), "Added jump mechanic"),
    rule("score", |t| t.has("score"), "Added score tracking"),
    rule("color", |t| t.has_any(&["color", "fill("]), "Changed colors"),
    rule("circle", |t| t.has_any(&["circle(", "ellipse("]), "Added/modified circle"),
    rule("rectangle", |t| t.has("rect("), "Added/modified rectangle"),
    rule(
        "keyboard",
        |t| t.has_any(&["keyispressed", "keypressed", "keycode", "keyisdown"]),
        "Added keyboard controls",
    ),
    rule("mouse", |t| t.has_any(&["mousex", "mousey"]), "Added mouse interaction"),
    rule("random", |t| t.has("random"), "Added randomness"),
    rule("condition", |t| t.has("if") && t.has("else"), "Added condition logic"),
    rule("loop", |t| t.has_any(&["for", "while"]), "Added loop"),
    rule("background", |t| t.has("background("), "Changed background"),
    rule("canvas", |t| t.has("createcanvas"), "Changed canvas size"),
    rule("text", |t| t.has("text("), "Added/modified text"),
    rule("image", |t| t.has_any(&["image(", "loadimage"]), "Added image"),
];

/// Label a block of changed lines.
pub fn classify_block<S: AsRef<str>>(lines: &[S]) -> String {
    let text = BlockText::new(lines);
    RULES
        .iter()
        .find_map(|rule| rule.apply(&text))
        .unwrap_or_else(|| fallback_label(text.non_blank_lines()))
}

fn fallback_label(non_blank: usize) -> String {
    if non_blank == 1 {
        "Modified line".to_string()
    } else {
        format!("Modified {non_blank} lines")
    }
}
